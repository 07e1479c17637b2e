pub mod audit;
pub mod checks;
pub mod config;
pub mod detector;
pub mod determinism;
pub mod highlight;
pub mod model;
pub mod policy;
pub mod storage;
pub mod summary;
pub mod text;

pub mod error;
