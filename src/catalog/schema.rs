//! # Schema Definition
//!
//! A `Schema` is the ordered list of column descriptors shared by every tuple
//! an executor produces. It is immutable once built; executors hold it behind
//! an `Arc` and hand out clones of the pointer.
//!
//! ## Schema Merging (Joins)
//!
//! ```text
//!   left_schema: [id, name]     right_schema: [id, dept]
//!        │                              │
//!        └──────────┬───────────────────┘
//!                   ▼
//!          merge(&left, &right)
//!                   │
//!                   ▼
//!   merged_schema: [id, name, id, dept]
//! ```
//!
//! Duplicate names survive the merge. Lookups by name return the first match.

use std::fmt;
use std::fmt::{Display, Formatter};

use bincode::{Decode, Encode};

use crate::catalog::column::Column;
use crate::common::exception::DBError;

#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode)]
pub struct Schema {
    columns: Vec<Column>,
}

impl Schema {
    pub fn new(columns: Vec<Column>) -> Self {
        Self { columns }
    }

    /// Concatenates two schemas, left columns first.
    pub fn merge(left: &Schema, right: &Schema) -> Self {
        let mut columns = Vec::with_capacity(left.columns.len() + right.columns.len());
        columns.extend(left.columns.iter().cloned());
        columns.extend(right.columns.iter().cloned());
        Self { columns }
    }

    pub fn get_columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn get_column(&self, column_index: usize) -> Option<&Column> {
        self.columns.get(column_index)
    }

    pub fn get_column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn get_column_name(&self, column_index: usize) -> Result<&str, DBError> {
        self.columns
            .get(column_index)
            .map(|col| col.get_name())
            .ok_or_else(|| {
                DBError::Catalog(format!(
                    "column index {} out of range for schema with {} columns",
                    column_index,
                    self.columns.len()
                ))
            })
    }
}

impl Display for Schema {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self.columns.iter().map(|c| c.to_string()).collect();
        write!(f, "{}", rendered.join(", "))
    }
}
