pub mod abstract_executor;
pub mod hash_join_executor;
pub mod mock_scan_executor;
