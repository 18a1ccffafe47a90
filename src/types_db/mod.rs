pub mod type_id;
pub mod value;
