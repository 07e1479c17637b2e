pub mod check_result;
pub mod highlight;
pub mod submission;
