use crate::types_db::type_id::TypeId;
use bincode::{Decode, Encode};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct Column {
    column_name: String,
    column_type: TypeId,
    length: usize,
}

impl Column {
    fn type_size(type_id: TypeId, length: usize) -> usize {
        match type_id {
            TypeId::Boolean => 1,
            TypeId::Integer => 4,
            TypeId::BigInt => 8,
            TypeId::VarChar | TypeId::Char => length,
        }
    }

    pub fn new(column_name: &str, column_type: TypeId) -> Self {
        Self {
            column_name: column_name.to_string(),
            column_type,
            length: Self::type_size(column_type, 0),
        }
    }

    pub fn new_varlen(column_name: &str, column_type: TypeId, length: usize) -> Self {
        assert!(
            matches!(column_type, TypeId::VarChar | TypeId::Char),
            "Wrong constructor for fixed-size type."
        );
        Self {
            column_name: column_name.to_string(),
            column_type,
            length: Self::type_size(column_type, length),
        }
    }

    pub fn get_name(&self) -> &str {
        &self.column_name
    }

    pub fn get_type(&self) -> TypeId {
        self.column_type
    }
}

impl Display for Column {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            write!(
                f,
                "Column(name: {}, type: {}, length: {})",
                self.column_name, self.column_type, self.length
            )
        } else {
            write!(f, "{}({})", self.column_name, self.column_type)
        }
    }
}
