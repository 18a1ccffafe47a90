pub mod join_predicate;
