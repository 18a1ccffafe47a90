pub mod catalog;
pub mod common;
pub mod sql;
pub mod storage;
pub mod types_db;
