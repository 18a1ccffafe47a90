pub mod executors;
pub mod expressions;
