pub mod index;
pub mod tokenize;
