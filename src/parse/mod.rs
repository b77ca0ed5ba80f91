pub mod cases;
pub mod function;
pub mod source;
