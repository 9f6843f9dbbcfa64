pub mod eval;
pub mod inspect;
pub mod lint;
pub mod table;
