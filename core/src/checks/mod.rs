pub mod ai_content;
pub mod normalize;
pub mod orchestrator;
pub mod plagiarism;
