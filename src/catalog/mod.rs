pub mod column;
pub mod schema;
