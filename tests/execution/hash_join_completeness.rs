use crate::common::fixtures::{drain, expected_order, hash_join, nested_loop, render, rows, Row};
use crate::common::logger::init_test_logger;
use chunkjoin::catalog::schema::Schema;
use chunkjoin::sql::execution::executors::abstract_executor::AbstractExecutor;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn random_relation(rng: &mut StdRng, len: usize, key_range: i32, tag: char) -> Vec<Row> {
    (0..len)
        .map(|i| (rng.gen_range(0..key_range), format!("{}{}", tag, i)))
        .collect()
}

fn sorted(mut v: Vec<String>) -> Vec<String> {
    v.sort();
    v
}

#[test]
fn concrete_scenario() {
    init_test_logger();
    let build = rows(&[(1, "a"), (2, "b")]);
    let probe = rows(&[(1, "x"), (1, "y"), (3, "z")]);
    let mut exec = hash_join(&build, &probe, 20000);

    assert_ok!(exec.open());
    assert_eq!(render(&drain(&mut exec)), vec!["1 a 1 x", "1 a 1 y"]);
    exec.close();
}

#[test]
fn every_budget_yields_same_multiset() {
    init_test_logger();
    let mut rng = StdRng::seed_from_u64(0x5eed);

    for _ in 0..20 {
        let build_len = rng.gen_range(0..30);
        let probe_len = rng.gen_range(0..30);
        let build = random_relation(&mut rng, build_len, 6, 'b');
        let probe = random_relation(&mut rng, probe_len, 6, 'p');
        let reference = sorted(nested_loop(&build, &probe));

        for chunk_size in [1, 2, 3, 7, build_len.max(1), build_len + 5] {
            let mut exec = hash_join(&build, &probe, chunk_size);
            assert_ok!(exec.open());
            let out = render(&drain(&mut exec));
            exec.close();

            assert_eq!(
                out,
                expected_order(&build, &probe, chunk_size),
                "emission order, chunk_size={}",
                chunk_size
            );
            assert_eq!(sorted(out), reference, "multiset, chunk_size={}", chunk_size);
        }
    }
}

#[test]
fn budget_one_three_by_two_all_matching() {
    init_test_logger();
    let build = rows(&[(5, "a"), (5, "b"), (5, "c")]);
    let probe = rows(&[(5, "x"), (5, "y")]);
    let mut exec = hash_join(&build, &probe, 1);

    assert_ok!(exec.open());
    let out = drain(&mut exec);
    assert_eq!(out.len(), 6);
    assert_eq!(exec.get_chunks_loaded(), 3);
}

#[test]
fn empty_build_never_produces() {
    init_test_logger();
    let probe = rows(&[(1, "x"), (2, "y")]);
    let mut exec = hash_join(&[], &probe, 1);

    assert_ok!(exec.open());
    assert!(!assert_ok!(exec.has_next()));
    assert!(!assert_ok!(exec.has_next()));
    assert_err!(exec.next());
}

#[test]
fn output_tuples_follow_merged_schema() {
    init_test_logger();
    let build = rows(&[(1, "a"), (2, "b"), (2, "c")]);
    let probe = rows(&[(2, "x"), (1, "y")]);
    let mut exec = hash_join(&build, &probe, 2);

    let build_arity = exec.get_children()[0].get_output_schema().get_column_count();
    let expected = Schema::merge(
        exec.get_children()[0].get_output_schema(),
        exec.get_children()[1].get_output_schema(),
    );
    assert_eq!(exec.get_output_schema().as_ref(), &expected);

    assert_ok!(exec.open());
    for tuple in drain(&mut exec) {
        assert_eq!(tuple.get_column_count(), expected.get_column_count());
        assert_eq!(tuple.get_schema().as_ref(), &expected);
        for (i, field) in tuple.fields().enumerate() {
            let value = field.expect("join output slots are populated");
            assert_eq!(
                value.get_type_id(),
                expected.get_column(i).unwrap().get_type(),
                "slot {} (build arity {})",
                i,
                build_arity
            );
        }
        // Both copies of the join column are kept.
        assert_eq!(tuple.get_value(0), tuple.get_value(build_arity));
    }
}
