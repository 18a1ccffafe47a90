use crate::catalog::schema::Schema;
use crate::common::config::PageId;
use crate::common::exception::DBError;
use crate::common::rid::RID;
use crate::sql::execution::executors::abstract_executor::{AbstractExecutor, Lookahead, Operator};
use crate::storage::table::tuple::Tuple;
use crate::types_db::value::Value;
use log::{debug, trace};
use parking_lot::Mutex;
use std::sync::Arc;

/// Counters recorded by a [`MockScanExecutor`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ScanStats {
    pub opens: usize,
    pub rewinds: usize,
    pub closes: usize,
    pub fetched: usize,
}

/// Shared view of a scan's counters that outlives moving the scan into a plan.
#[derive(Debug, Clone, Default)]
pub struct ScanStatsHandle(Arc<Mutex<ScanStats>>);

impl ScanStatsHandle {
    pub fn snapshot(&self) -> ScanStats {
        *self.0.lock()
    }
}

/// In-memory leaf executor over a fixed list of rows.
///
/// Rows get RIDs `(page_id, slot)` in insertion order. Faults can be injected
/// to stand in for an unreadable page or an aborted transaction.
pub struct MockScanExecutor {
    lookahead: Lookahead,
    name: String,
    schema: Arc<Schema>,
    tuples: Vec<Arc<Tuple>>,
    cursor: usize,
    fail_after: Option<usize>,
    fail_on_open: bool,
    fetched_since_open: usize,
    stats: ScanStatsHandle,
}

impl MockScanExecutor {
    pub fn new(name: &str, schema: Arc<Schema>, rows: Vec<Vec<Value>>, page_id: PageId) -> Self {
        debug!("Creating MockScanExecutor '{}' with {} rows", name, rows.len());

        let tuples = rows
            .into_iter()
            .enumerate()
            .map(|(slot, values)| {
                let mut tuple = Tuple::from_values(values, schema.clone());
                tuple.set_rid(RID::new(page_id, slot as u32));
                Arc::new(tuple)
            })
            .collect();

        Self::with_tuples(name, schema, tuples)
    }

    /// Scans prebuilt tuples as-is, unset slots and RIDs included.
    pub fn from_tuples(name: &str, schema: Arc<Schema>, tuples: Vec<Tuple>) -> Self {
        debug!("Creating MockScanExecutor '{}' with {} tuples", name, tuples.len());
        Self::with_tuples(name, schema, tuples.into_iter().map(Arc::new).collect())
    }

    fn with_tuples(name: &str, schema: Arc<Schema>, tuples: Vec<Arc<Tuple>>) -> Self {
        Self {
            lookahead: Lookahead::new(),
            name: name.to_string(),
            schema,
            tuples,
            cursor: 0,
            fail_after: None,
            fail_on_open: false,
            fetched_since_open: 0,
            stats: ScanStatsHandle::default(),
        }
    }

    /// After `count` successful fetches in one open session, every further
    /// fetch fails with [`DBError::TransactionAborted`].
    pub fn with_failure_after(mut self, count: usize) -> Self {
        self.fail_after = Some(count);
        self
    }

    /// Makes `open` fail with [`DBError::Storage`].
    pub fn with_open_failure(mut self) -> Self {
        self.fail_on_open = true;
        self
    }

    pub fn stats(&self) -> ScanStatsHandle {
        self.stats.clone()
    }

    pub fn get_name(&self) -> &str {
        &self.name
    }
}

impl Operator for MockScanExecutor {
    fn lookahead(&mut self) -> &mut Lookahead {
        &mut self.lookahead
    }

    fn fetch_next(&mut self) -> Result<Option<Arc<Tuple>>, DBError> {
        let Some(tuple) = self.tuples.get(self.cursor) else {
            return Ok(None);
        };

        if self.fail_after.is_some_and(|limit| self.fetched_since_open >= limit) {
            return Err(DBError::TransactionAborted(format!(
                "scan '{}' aborted after {} tuples",
                self.name, self.fetched_since_open
            )));
        }

        trace!("MockScanExecutor '{}' yielding slot {}", self.name, self.cursor);
        let tuple = Arc::clone(tuple);
        self.cursor += 1;
        self.fetched_since_open += 1;
        self.stats.0.lock().fetched += 1;
        Ok(Some(tuple))
    }
}

impl AbstractExecutor for MockScanExecutor {
    fn open(&mut self) -> Result<(), DBError> {
        self.lookahead.ensure_closed()?;
        if self.fail_on_open {
            return Err(DBError::Storage(format!(
                "cannot open scan '{}'",
                self.name
            )));
        }

        debug!("Opening MockScanExecutor '{}'", self.name);
        self.cursor = 0;
        self.fetched_since_open = 0;
        self.lookahead.mark_open();
        self.stats.0.lock().opens += 1;
        Ok(())
    }

    fn has_next(&mut self) -> Result<bool, DBError> {
        self.buffered_has_next()
    }

    fn next(&mut self) -> Result<Arc<Tuple>, DBError> {
        self.buffered_next()
    }

    fn rewind(&mut self) -> Result<(), DBError> {
        self.lookahead.ensure_open()?;
        self.lookahead.discard();
        self.cursor = 0;
        self.stats.0.lock().rewinds += 1;
        Ok(())
    }

    fn close(&mut self) {
        if self.lookahead.is_open() {
            debug!("Closing MockScanExecutor '{}'", self.name);
        }
        self.lookahead.close();
        self.cursor = 0;
        self.stats.0.lock().closes += 1;
    }

    fn get_output_schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    fn get_children(&self) -> Vec<&dyn AbstractExecutor> {
        Vec::new()
    }

    fn set_children(&mut self, children: Vec<Box<dyn AbstractExecutor>>) -> Result<(), DBError> {
        if children.is_empty() {
            Ok(())
        } else {
            Err(DBError::Validation(format!(
                "scan '{}' takes no children, got {}",
                self.name,
                children.len()
            )))
        }
    }
}
