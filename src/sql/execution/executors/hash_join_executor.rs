//! # Chunked Hash Equi-Join
//!
//! Joins a build child and a probe child on `build[field1] = probe[field2]`
//! while holding at most `chunk_size` build tuples in memory.
//!
//! ```text
//!   build child ──► load_chunk ──► hash_table: Value ─► [build tuples]
//!                                        ▲
//!   probe child ──► scan ──── lookup ────┘
//!                    │
//!                    ▼
//!        concat(build, probe) per bucket entry
//! ```
//!
//! The outer loop walks the build child one chunk at a time and never rewinds
//! it mid-join. For each chunk the inner loop scans the whole probe child,
//! then rewinds it for the next chunk. Probe scans per traversal equal the
//! number of non-empty chunks.
//!
//! Output tuples are the build tuple's fields followed by the probe tuple's
//! fields; both copies of the join column are kept.
//!
//! ## Probe state
//!
//! ```text
//!           ┌─────────── hit ───────────┐
//!           ▼                           │
//!      Matching ──── bucket drained ──► Scanning ── probe exhausted ──► ChunkExhausted
//!                                          ▲                                  │
//!                                          └──── chunk loaded ────────────────┤
//!                                                                             ▼
//!                                                           build exhausted: Done
//! ```

use crate::catalog::schema::Schema;
use crate::common::config::HashJoinConfig;
use crate::common::exception::DBError;
use crate::sql::execution::executors::abstract_executor::{AbstractExecutor, Lookahead, Operator};
use crate::sql::execution::expressions::join_predicate::{ComparisonOp, JoinPredicate};
use crate::storage::table::tuple::Tuple;
use crate::types_db::value::Value;
use log::{debug, trace};
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Debug)]
enum ProbeState {
    /// No pending match; pull the next probe tuple.
    Scanning,
    /// Emitting `probe` against the bucket for `key`, starting at `position`.
    Matching {
        probe: Arc<Tuple>,
        key: Value,
        position: usize,
    },
    /// Probe child exhausted for the current chunk.
    ChunkExhausted,
    /// Build child exhausted.
    Done,
}

pub struct HashJoinExecutor {
    lookahead: Lookahead,
    predicate: JoinPredicate,
    config: HashJoinConfig,
    build_child: Box<dyn AbstractExecutor>,
    probe_child: Box<dyn AbstractExecutor>,
    output_schema: Arc<Schema>,
    hash_table: HashMap<Value, Vec<Arc<Tuple>>>,
    state: ProbeState,
    chunks_loaded: usize,
}

impl HashJoinExecutor {
    pub fn new(
        predicate: JoinPredicate,
        build_child: Box<dyn AbstractExecutor>,
        probe_child: Box<dyn AbstractExecutor>,
    ) -> Result<Self, DBError> {
        Self::with_config(predicate, build_child, probe_child, HashJoinConfig::default())
    }

    pub fn with_config(
        predicate: JoinPredicate,
        build_child: Box<dyn AbstractExecutor>,
        probe_child: Box<dyn AbstractExecutor>,
        config: HashJoinConfig,
    ) -> Result<Self, DBError> {
        config.validate()?;
        if predicate.get_operator() != ComparisonOp::Equals {
            return Err(DBError::Validation(format!(
                "hash join requires an equality predicate, got {}",
                predicate
            )));
        }
        let output_schema = Self::validated_schema(&predicate, &*build_child, &*probe_child)?;

        debug!(
            "Creating HashJoinExecutor on {} with chunk size {}",
            predicate, config.chunk_size
        );

        Ok(Self {
            lookahead: Lookahead::new(),
            predicate,
            config,
            build_child,
            probe_child,
            output_schema,
            hash_table: HashMap::new(),
            state: ProbeState::Done,
            chunks_loaded: 0,
        })
    }

    /// Checks the join fields against the children and builds the merged schema.
    fn validated_schema(
        predicate: &JoinPredicate,
        build_child: &dyn AbstractExecutor,
        probe_child: &dyn AbstractExecutor,
    ) -> Result<Arc<Schema>, DBError> {
        let build_schema = build_child.get_output_schema();
        let probe_schema = probe_child.get_output_schema();

        if predicate.get_field1() >= build_schema.get_column_count() {
            return Err(DBError::Validation(format!(
                "build join field {} out of range for {} columns",
                predicate.get_field1(),
                build_schema.get_column_count()
            )));
        }
        if predicate.get_field2() >= probe_schema.get_column_count() {
            return Err(DBError::Validation(format!(
                "probe join field {} out of range for {} columns",
                predicate.get_field2(),
                probe_schema.get_column_count()
            )));
        }

        Ok(Arc::new(Schema::merge(build_schema, probe_schema)))
    }

    pub fn get_join_predicate(&self) -> &JoinPredicate {
        &self.predicate
    }

    pub fn get_config(&self) -> &HashJoinConfig {
        &self.config
    }

    pub fn get_join_field1_name(&self) -> Result<&str, DBError> {
        self.build_child
            .get_output_schema()
            .get_column_name(self.predicate.get_field1())
    }

    pub fn get_join_field2_name(&self) -> Result<&str, DBError> {
        self.probe_child
            .get_output_schema()
            .get_column_name(self.predicate.get_field2())
    }

    /// Non-empty build chunks loaded since the last open or rewind.
    pub fn get_chunks_loaded(&self) -> usize {
        self.chunks_loaded
    }

    /// Refills the hash table with up to `chunk_size` build tuples.
    ///
    /// Returns whether anything was read. Build tuples with an unset join field
    /// count toward the chunk but are never inserted.
    fn load_chunk(&mut self) -> Result<bool, DBError> {
        self.hash_table.clear();

        let field = self.predicate.get_field1();
        let mut loaded = 0;
        while loaded < self.config.chunk_size && self.build_child.has_next()? {
            let tuple = self.build_child.next()?;
            if let Some(key) = tuple.get_value(field).cloned() {
                self.hash_table.entry(key).or_default().push(tuple);
            }
            loaded += 1;
        }

        if loaded > 0 {
            self.chunks_loaded += 1;
            debug!(
                "Loaded build chunk {} with {} tuples in {} buckets",
                self.chunks_loaded,
                loaded,
                self.hash_table.len()
            );
        }
        Ok(loaded > 0)
    }

    fn first_chunk_state(&mut self) -> Result<ProbeState, DBError> {
        self.chunks_loaded = 0;
        if self.load_chunk()? {
            Ok(ProbeState::Scanning)
        } else {
            Ok(ProbeState::Done)
        }
    }

    /// Pulls probe tuples until one hits the current chunk.
    fn scan_probe(&mut self) -> Result<ProbeState, DBError> {
        let field = self.predicate.get_field2();
        while self.probe_child.has_next()? {
            let probe = self.probe_child.next()?;
            let Some(key) = probe.get_value(field) else {
                continue;
            };
            if self.hash_table.contains_key(key) {
                let key = key.clone();
                return Ok(ProbeState::Matching {
                    probe,
                    key,
                    position: 0,
                });
            }
        }
        Ok(ProbeState::ChunkExhausted)
    }

    fn restart(&mut self) -> Result<ProbeState, DBError> {
        self.build_child.rewind()?;
        self.probe_child.rewind()?;
        self.first_chunk_state()
    }

    fn advance_chunk(&mut self) -> Result<ProbeState, DBError> {
        debug!("Probe side exhausted for chunk {}, rewinding", self.chunks_loaded);
        self.probe_child.rewind()?;
        if self.load_chunk()? {
            Ok(ProbeState::Scanning)
        } else {
            debug!("Build side exhausted after {} chunks", self.chunks_loaded);
            Ok(ProbeState::Done)
        }
    }
}

impl Operator for HashJoinExecutor {
    fn lookahead(&mut self) -> &mut Lookahead {
        &mut self.lookahead
    }

    fn fetch_next(&mut self) -> Result<Option<Arc<Tuple>>, DBError> {
        loop {
            let state = std::mem::replace(&mut self.state, ProbeState::Done);
            self.state = match state {
                ProbeState::Matching {
                    probe,
                    key,
                    position,
                } => {
                    let joined = self
                        .hash_table
                        .get(&key)
                        .and_then(|bucket| bucket.get(position))
                        .map(|build| Tuple::concat(build, &probe, self.output_schema.clone()));
                    match joined {
                        Some(joined) => {
                            trace!("Emitting match {} for key {}", position, key);
                            self.state = ProbeState::Matching {
                                probe,
                                key,
                                position: position + 1,
                            };
                            return Ok(Some(Arc::new(joined)));
                        }
                        None => ProbeState::Scanning,
                    }
                }
                ProbeState::Scanning => {
                    self.state = ProbeState::Scanning;
                    self.scan_probe()?
                }
                ProbeState::ChunkExhausted => {
                    self.state = ProbeState::ChunkExhausted;
                    self.advance_chunk()?
                }
                ProbeState::Done => return Ok(None),
            };
        }
    }
}

impl AbstractExecutor for HashJoinExecutor {
    fn open(&mut self) -> Result<(), DBError> {
        self.lookahead.ensure_closed()?;
        debug!("Opening HashJoinExecutor on {}", self.predicate);

        self.build_child.open()?;
        if let Err(e) = self.probe_child.open() {
            self.build_child.close();
            return Err(e);
        }

        match self.first_chunk_state() {
            Ok(state) => self.state = state,
            Err(e) => {
                debug!("First build chunk failed during open: {}", e);
                self.close();
                return Err(e);
            }
        }
        self.lookahead.mark_open();
        Ok(())
    }

    fn has_next(&mut self) -> Result<bool, DBError> {
        self.buffered_has_next()
    }

    fn next(&mut self) -> Result<Arc<Tuple>, DBError> {
        self.buffered_next()
    }

    /// Rewinds both children and reloads the first build chunk, so the next
    /// traversal matches a fresh open. On failure the join is closed.
    fn rewind(&mut self) -> Result<(), DBError> {
        self.lookahead.ensure_open()?;
        debug!("Rewinding HashJoinExecutor");

        self.lookahead.discard();
        match self.restart() {
            Ok(state) => {
                self.state = state;
                Ok(())
            }
            Err(e) => {
                debug!("Rewind failed, closing HashJoinExecutor: {}", e);
                self.close();
                Err(e)
            }
        }
    }

    fn close(&mut self) {
        if self.lookahead.is_open() {
            debug!(
                "Closing HashJoinExecutor after {} chunks",
                self.chunks_loaded
            );
        }
        self.lookahead.close();
        self.probe_child.close();
        self.build_child.close();
        self.hash_table = HashMap::new();
        self.state = ProbeState::Done;
    }

    fn get_output_schema(&self) -> &Arc<Schema> {
        &self.output_schema
    }

    fn get_children(&self) -> Vec<&dyn AbstractExecutor> {
        vec![self.build_child.as_ref(), self.probe_child.as_ref()]
    }

    fn set_children(&mut self, children: Vec<Box<dyn AbstractExecutor>>) -> Result<(), DBError> {
        if self.lookahead.is_open() {
            return Err(DBError::Validation(
                "cannot replace children of an open hash join".to_string(),
            ));
        }

        let [build_child, probe_child]: [Box<dyn AbstractExecutor>; 2] =
            children.try_into().map_err(|rejected: Vec<Box<dyn AbstractExecutor>>| {
                DBError::Validation(format!(
                    "hash join takes 2 children, got {}",
                    rejected.len()
                ))
            })?;

        self.output_schema = Self::validated_schema(&self.predicate, &*build_child, &*probe_child)?;
        self.build_child = build_child;
        self.probe_child = probe_child;
        self.hash_table.clear();
        self.state = ProbeState::Done;
        Ok(())
    }
}
