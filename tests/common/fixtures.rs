use chunkjoin::catalog::column::Column;
use chunkjoin::catalog::schema::Schema;
use chunkjoin::common::config::HashJoinConfig;
use chunkjoin::sql::execution::executors::abstract_executor::AbstractExecutor;
use chunkjoin::sql::execution::executors::hash_join_executor::HashJoinExecutor;
use chunkjoin::sql::execution::executors::mock_scan_executor::MockScanExecutor;
use chunkjoin::sql::execution::expressions::join_predicate::JoinPredicate;
use chunkjoin::storage::table::tuple::Tuple;
use chunkjoin::types_db::type_id::TypeId;
use chunkjoin::types_db::value::Value;
use std::sync::Arc;

pub type Row = (i32, String);

pub fn keyed_schema(key: &str, payload: &str) -> Arc<Schema> {
    Arc::new(Schema::new(vec![
        Column::new(key, TypeId::Integer),
        Column::new_varlen(payload, TypeId::Char, 8),
    ]))
}

pub fn rows(pairs: &[(i32, &str)]) -> Vec<Row> {
    pairs.iter().map(|(k, s)| (*k, s.to_string())).collect()
}

pub fn scan(name: &str, payload: &str, rows: &[Row]) -> MockScanExecutor {
    MockScanExecutor::new(
        name,
        keyed_schema("id", payload),
        rows.iter()
            .map(|(k, s)| vec![Value::new(*k), Value::new_char(s)])
            .collect(),
        0,
    )
}

pub fn hash_join(build: &[Row], probe: &[Row], chunk_size: usize) -> HashJoinExecutor {
    HashJoinExecutor::with_config(
        JoinPredicate::equals(0, 0),
        Box::new(scan("build", "b", build)),
        Box::new(scan("probe", "p", probe)),
        HashJoinConfig::with_chunk_size(chunk_size),
    )
    .expect("valid hash join")
}

pub fn drain(exec: &mut dyn AbstractExecutor) -> Vec<Arc<Tuple>> {
    let mut out = Vec::new();
    while exec.has_next().expect("has_next") {
        out.push(exec.next().expect("next"));
    }
    out
}

pub fn render(tuples: &[Arc<Tuple>]) -> Vec<String> {
    tuples.iter().map(|t| t.to_string()).collect()
}

/// Emission order of the chunked join: chunk by chunk, probe-major, bucket
/// (build) order within a chunk.
pub fn expected_order(build: &[Row], probe: &[Row], chunk_size: usize) -> Vec<String> {
    let mut out = Vec::new();
    for chunk in build.chunks(chunk_size) {
        for (pk, ps) in probe {
            for (bk, bs) in chunk {
                if bk == pk {
                    out.push(format!("{} {} {} {}", bk, bs, pk, ps));
                }
            }
        }
    }
    out
}

/// Nested-loop reference over the full cross product.
pub fn nested_loop(build: &[Row], probe: &[Row]) -> Vec<String> {
    let predicate = JoinPredicate::equals(0, 0);
    let build_schema = keyed_schema("id", "b");
    let probe_schema = keyed_schema("id", "p");
    let merged = Arc::new(Schema::merge(&build_schema, &probe_schema));

    let mut out = Vec::new();
    for (bk, bs) in build {
        let b = Tuple::from_values(
            vec![Value::new(*bk), Value::new_char(bs)],
            build_schema.clone(),
        );
        for (pk, ps) in probe {
            let p = Tuple::from_values(
                vec![Value::new(*pk), Value::new_char(ps)],
                probe_schema.clone(),
            );
            if predicate.filter(&b, &p) {
                out.push(Tuple::concat(&b, &p, merged.clone()).to_string());
            }
        }
    }
    out
}
