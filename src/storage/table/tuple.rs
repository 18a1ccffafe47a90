use crate::catalog::schema::Schema;
use crate::common::exception::TupleError;
use crate::common::rid::RID;
use crate::types_db::value::Value;
use bincode::config;
use bincode::error::EncodeError;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

/// A fixed-arity row of field slots described by a shared [`Schema`].
///
/// Each slot is either unset or holds a value. Slot count always equals the
/// column count of the schema the tuple was built with. Type agreement between
/// a slot and its column is the writer's responsibility.
#[derive(Debug, Clone)]
pub struct Tuple {
    values: Vec<Option<Value>>,
    schema: Arc<Schema>,
    rid: Option<RID>,
}

// Only slots and RID are encoded; the schema travels out of band.
impl bincode::Encode for Tuple {
    fn encode<E: bincode::enc::Encoder>(
        &self,
        encoder: &mut E,
    ) -> Result<(), bincode::error::EncodeError> {
        bincode::Encode::encode(&self.values, encoder)?;
        bincode::Encode::encode(&self.rid, encoder)
    }
}

impl PartialEq for Tuple {
    fn eq(&self, other: &Self) -> bool {
        self.values == other.values
    }
}

impl Eq for Tuple {}

impl Tuple {
    /// Creates a tuple with every slot unset.
    pub fn new(schema: Arc<Schema>) -> Self {
        Self {
            values: vec![None; schema.get_column_count()],
            schema,
            rid: None,
        }
    }

    /// Creates a fully populated tuple.
    ///
    /// # Panics
    ///
    /// Panics if the number of values doesn't match the schema's column count.
    pub fn from_values(values: Vec<Value>, schema: Arc<Schema>) -> Self {
        assert_eq!(
            values.len(),
            schema.get_column_count(),
            "Values length does not match schema column count"
        );

        Self {
            values: values.into_iter().map(Some).collect(),
            schema,
            rid: None,
        }
    }

    /// Concatenates `left`'s slots followed by `right`'s under `schema`.
    ///
    /// The result carries no RID: it does not live on any page.
    pub fn concat(left: &Tuple, right: &Tuple, schema: Arc<Schema>) -> Self {
        debug_assert_eq!(
            left.values.len() + right.values.len(),
            schema.get_column_count(),
            "Merged schema does not cover both tuples"
        );

        let mut values = Vec::with_capacity(left.values.len() + right.values.len());
        values.extend(left.values.iter().cloned());
        values.extend(right.values.iter().cloned());

        Self {
            values,
            schema,
            rid: None,
        }
    }

    pub fn get_schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    /// Replaces the schema without touching the slots.
    pub fn reset_schema(&mut self, schema: Arc<Schema>) {
        self.schema = schema;
    }

    pub fn get_rid(&self) -> Option<RID> {
        self.rid
    }

    pub fn set_rid(&mut self, rid: RID) {
        self.rid = Some(rid);
    }

    /// Returns the value in slot `column_index`, or `None` if the slot is
    /// unset or the index is out of range.
    pub fn get_value(&self, column_index: usize) -> Option<&Value> {
        self.values.get(column_index).and_then(Option::as_ref)
    }

    /// Overwrites slot `column_index`. Out-of-range indexes are ignored.
    pub fn set_value(&mut self, column_index: usize, value: Value) {
        if let Some(slot) = self.values.get_mut(column_index) {
            *slot = Some(value);
        }
    }

    /// Iterates the slots in schema order.
    pub fn fields(&self) -> impl Iterator<Item = Option<&Value>> + '_ {
        self.values.iter().map(Option::as_ref)
    }

    pub fn get_column_count(&self) -> usize {
        self.values.len()
    }

    /// Writes slots and RID into `storage`, returning the bytes written.
    pub fn serialize_to(&self, storage: &mut [u8]) -> Result<usize, TupleError> {
        bincode::encode_into_slice(self, storage, config::standard()).map_err(|e| match e {
            EncodeError::UnexpectedEnd => TupleError::BufferTooSmall,
            other => TupleError::Serialization(other.to_string()),
        })
    }

    pub fn get_length(&self) -> Result<usize, TupleError> {
        bincode::encode_to_vec(self, config::standard())
            .map(|vec| vec.len())
            .map_err(|e| TupleError::Serialization(e.to_string()))
    }

    /// Decodes a tuple written by [`Tuple::serialize_to`], attaching `schema`.
    pub fn deserialize_from(storage: &[u8], schema: Arc<Schema>) -> Result<Self, TupleError> {
        let ((values, rid), _): ((Vec<Option<Value>>, Option<RID>), usize) =
            bincode::decode_from_slice(storage, config::standard())
                .map_err(|e| TupleError::Deserialization(e.to_string()))?;

        if values.len() != schema.get_column_count() {
            return Err(TupleError::SchemaMismatch {
                expected: schema.get_column_count(),
                actual: values.len(),
            });
        }

        Ok(Self {
            values,
            schema,
            rid,
        })
    }
}

impl Display for Tuple {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for (i, slot) in self.values.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            match slot {
                Some(value) => write!(f, "{}", value)?,
                None => write!(f, "null")?,
            }
        }
        Ok(())
    }
}
