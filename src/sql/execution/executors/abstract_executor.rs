use crate::catalog::schema::Schema;
use crate::common::exception::DBError;
use crate::storage::table::tuple::Tuple;
use std::sync::Arc;

/// The AbstractExecutor implements the Volcano tuple-at-a-time iterator model.
/// Every operator in a plan tree, leaves included, exposes this interface and
/// drives its children through it.
pub trait AbstractExecutor: Send + Sync {
    /// Opens the executor and, transitively, its children.
    ///
    /// Fails with [`DBError::AlreadyOpen`] if called twice without a `close`.
    fn open(&mut self) -> Result<(), DBError>;

    /// Returns true if another tuple is available. Idempotent until `next`.
    fn has_next(&mut self) -> Result<bool, DBError>;

    /// Yields the next tuple.
    ///
    /// # Errors
    ///
    /// [`DBError::NoSuchElement`] if nothing is pending, [`DBError::NotOpen`]
    /// before `open`, or whatever a child raised.
    fn next(&mut self) -> Result<Arc<Tuple>, DBError>;

    /// Restarts iteration from the first tuple. Only valid while open.
    fn rewind(&mut self) -> Result<(), DBError>;

    /// Releases resources. Safe to call at any time, any number of times.
    fn close(&mut self);

    /// Get the schema of the tuples that this executor produces.
    fn get_output_schema(&self) -> &Arc<Schema>;

    fn get_children(&self) -> Vec<&dyn AbstractExecutor>;

    /// Replaces all children. The executor must be closed, and must be opened
    /// again before the new children are traversed.
    fn set_children(&mut self, children: Vec<Box<dyn AbstractExecutor>>) -> Result<(), DBError>;
}

/// Open flag plus the one tuple buffered between `has_next` and `next`.
#[derive(Debug, Default)]
pub struct Lookahead {
    open: bool,
    pending: Option<Arc<Tuple>>,
}

impl Lookahead {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn ensure_open(&self) -> Result<(), DBError> {
        if self.open {
            Ok(())
        } else {
            Err(DBError::NotOpen)
        }
    }

    pub fn ensure_closed(&self) -> Result<(), DBError> {
        if self.open {
            Err(DBError::AlreadyOpen)
        } else {
            Ok(())
        }
    }

    pub fn mark_open(&mut self) {
        self.open = true;
        self.pending = None;
    }

    /// Drops the buffered tuple; used on rewind.
    pub fn discard(&mut self) {
        self.pending = None;
    }

    pub fn close(&mut self) {
        self.open = false;
        self.pending = None;
    }
}

/// Executors that produce tuples through a single `fetch_next` routine.
///
/// `buffered_has_next` and `buffered_next` implement the `has_next`/`next`
/// half of [`AbstractExecutor`] on top of it.
pub trait Operator {
    fn lookahead(&mut self) -> &mut Lookahead;

    /// Produces the next tuple, or `None` once exhausted.
    fn fetch_next(&mut self) -> Result<Option<Arc<Tuple>>, DBError>;

    fn buffered_has_next(&mut self) -> Result<bool, DBError> {
        self.lookahead().ensure_open()?;
        if self.lookahead().pending.is_none() {
            let fetched = self.fetch_next()?;
            self.lookahead().pending = fetched;
        }
        Ok(self.lookahead().pending.is_some())
    }

    fn buffered_next(&mut self) -> Result<Arc<Tuple>, DBError> {
        if !self.buffered_has_next()? {
            return Err(DBError::NoSuchElement);
        }
        self.lookahead().pending.take().ok_or(DBError::NoSuchElement)
    }
}
