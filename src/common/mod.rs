pub mod best_effort;
pub mod response;
pub mod staging;
