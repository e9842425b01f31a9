pub mod shortcuts;
pub mod todo;
