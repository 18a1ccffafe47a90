use crate::common::fixtures::{drain, hash_join, render, rows, scan};
use crate::common::logger::init_test_logger;
use chunkjoin::catalog::column::Column;
use chunkjoin::catalog::schema::Schema;
use chunkjoin::common::config::HashJoinConfig;
use chunkjoin::common::exception::DBError;
use chunkjoin::sql::execution::executors::abstract_executor::AbstractExecutor;
use chunkjoin::sql::execution::executors::hash_join_executor::HashJoinExecutor;
use chunkjoin::sql::execution::executors::mock_scan_executor::MockScanExecutor;
use chunkjoin::sql::execution::expressions::join_predicate::JoinPredicate;
use chunkjoin::types_db::type_id::TypeId;
use std::sync::Arc;

fn sorted(mut v: Vec<String>) -> Vec<String> {
    v.sort();
    v
}

#[test]
fn join_as_build_child() {
    init_test_logger();
    let inner = hash_join(
        &rows(&[(1, "a"), (2, "b")]),
        &rows(&[(1, "x"), (2, "y"), (2, "z")]),
        1,
    );
    let outer = HashJoinExecutor::with_config(
        JoinPredicate::equals(0, 0),
        Box::new(inner),
        Box::new(scan("third", "t", &rows(&[(2, "q"), (1, "r")]))),
        HashJoinConfig::with_chunk_size(2),
    );
    let mut outer = assert_ok!(outer);

    assert_eq!(outer.get_output_schema().get_column_count(), 6);
    assert_eq!(outer.get_children()[0].get_children().len(), 2);

    assert_ok!(outer.open());
    assert_eq!(
        sorted(render(&drain(&mut outer))),
        vec!["1 a 1 x 1 r", "2 b 2 y 2 q", "2 b 2 z 2 q"]
    );
}

#[test]
fn join_as_probe_child_is_rewound_per_chunk() {
    init_test_logger();
    let inner = hash_join(
        &rows(&[(1, "a"), (2, "b"), (3, "c")]),
        &rows(&[(3, "x"), (1, "y"), (2, "w")]),
        2,
    );
    let mut outer = HashJoinExecutor::with_config(
        JoinPredicate::equals(0, 2),
        Box::new(scan("outer_build", "o", &rows(&[(3, "k"), (1, "m"), (2, "n")]))),
        Box::new(inner),
        HashJoinConfig::with_chunk_size(1),
    )
    .unwrap();

    assert_ok!(outer.open());
    let out = render(&drain(&mut outer));
    // One outer chunk per build row, each re-scanning the full inner join.
    assert_eq!(
        out,
        vec!["3 k 3 c 3 x", "1 m 1 a 1 y", "2 n 2 b 2 w"]
    );
    assert_eq!(outer.get_chunks_loaded(), 3);
    assert_eq!(outer.get_join_field2_name().unwrap(), "id");
}

#[test]
fn set_children_rewires_plan() {
    init_test_logger();
    let mut exec = hash_join(&rows(&[(1, "a")]), &rows(&[(1, "x")]), 4);
    assert_ok!(exec.open());
    assert_eq!(render(&drain(&mut exec)), vec!["1 a 1 x"]);
    exec.close();

    let replacement: Vec<Box<dyn AbstractExecutor>> = vec![
        Box::new(scan("left", "l", &rows(&[(9, "u"), (8, "v")]))),
        Box::new(scan("right", "r", &rows(&[(8, "w")]))),
    ];
    assert_ok!(exec.set_children(replacement));
    assert_ok!(exec.open());
    assert_eq!(render(&drain(&mut exec)), vec!["8 v 8 w"]);
}

#[test]
fn set_children_revalidates_join_fields() {
    init_test_logger();
    let mut exec = HashJoinExecutor::new(
        JoinPredicate::equals(1, 1),
        Box::new(scan("build", "b", &[])),
        Box::new(scan("probe", "p", &[])),
    )
    .unwrap();

    let inner = hash_join(&[], &[], 1);
    let narrow = MockScanExecutor::new(
        "narrow",
        Arc::new(Schema::new(vec![Column::new("id", TypeId::Integer)])),
        vec![],
        0,
    );
    let replacement: Vec<Box<dyn AbstractExecutor>> = vec![Box::new(inner), Box::new(narrow)];
    let err = exec.set_children(replacement).unwrap_err();
    assert!(matches!(err, DBError::Validation(_)));
}
