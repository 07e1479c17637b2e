pub mod publication_gate;
pub mod thresholds;
