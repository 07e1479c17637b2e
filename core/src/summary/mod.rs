pub mod aggregate;
pub mod render;
