
pub mod fixtures;
pub mod logger;
