pub mod interface;
pub mod placeholder;
