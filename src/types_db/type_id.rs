use bincode::{Decode, Encode};
use serde::{Deserialize, Serialize};
use std::fmt;

// Every field type the catalog can describe
#[derive(Serialize, Deserialize, Encode, Decode, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeId {
    Boolean,
    Integer,
    BigInt,
    VarChar,
    /// Fixed-length string; the length lives on the column.
    Char,
}

impl fmt::Display for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TypeId::Boolean => "BOOLEAN",
            TypeId::Integer => "INTEGER",
            TypeId::BigInt => "BIGINT",
            TypeId::VarChar => "VARCHAR",
            TypeId::Char => "CHAR",
        };
        write!(f, "{}", name)
    }
}
