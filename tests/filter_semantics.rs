//! Scan Filter Semantics Tests
//!
//! Verifies lowering and evaluation of the residual filter:
//! - NOT is pushed into leaves or turned into NAND/NOR groups
//! - Double negation cancels
//! - Nested groups of the same kind are flattened
//! - IN-lists expand to equality groups
//! - Rows evaluate the same as the original predicate would

use std::sync::Arc;

use accesspath::executor::{
    FilterEvaluator, Group, OperationCall, ParamValue, Parameters, RecordingOperation, ScanFilter,
};
use accesspath::planner::{PlannerConfig, QueryPlanner};
use accesspath::predicate::{compile, CompareOp, ParseContext, PredicateNode, PredicateTree};
use accesspath::schema::{ColumnType, FieldDescriptor, TableMetadata};
use accesspath::value::{Value, ValueHandler};

// =============================================================================
// Helper Functions
// =============================================================================

/// Table without indexes so every conjunct stays in the filter
fn people() -> TableMetadata {
    TableMetadata::new(
        "people",
        vec![
            FieldDescriptor::new(0, "age", ColumnType::Int),
            FieldDescriptor::new(1, "name", ColumnType::String),
            FieldDescriptor::new(2, "city", ColumnType::String),
        ],
        vec![],
    )
    .unwrap()
}

fn lower(node: PredicateNode) -> ScanFilter {
    let table = people();
    let compiled = compile(&PredicateTree::new(node), &table).unwrap();
    ScanFilter::lower(compiled.predicate(), &table).unwrap()
}

/// Plans `node` as a full scan and binds `values`
fn planned(node: PredicateNode, values: Vec<ParamValue>) -> (ScanFilter, Parameters) {
    let p = QueryPlanner::new(Arc::new(people()), PlannerConfig::default());
    let path = p.plan(&PredicateTree::new(node)).unwrap();
    let params = p.bind(&path, values).unwrap();
    (path.filter().unwrap().clone(), params)
}

fn row(age: Option<i32>, name: &str, city: Option<&str>) -> ValueHandler {
    let mut row = ValueHandler::for_table(&people());
    match age {
        Some(age) => row.set_int(0, age).unwrap(),
        None => row.set_null(0).unwrap(),
    }
    row.set_string(1, name.to_string()).unwrap();
    match city {
        Some(city) => row.set_string(2, city.to_string()).unwrap(),
        None => row.set_null(2).unwrap(),
    }
    row
}

// =============================================================================
// Lowering Tests
// =============================================================================

/// A single leaf is wrapped in an AND group
#[test]
fn test_single_leaf_is_grouped() {
    let mut ctx = ParseContext::new();
    let filter = lower(ctx.equal("age"));
    assert_eq!(filter.to_string(), "AND(age = ?0)");
    assert_eq!(filter.group_count(), 1);
}

/// NOT over a comparison negates the operator
#[test]
fn test_not_negates_leaf() {
    let mut ctx = ParseContext::new();
    let filter = lower(ctx.compare("age", CompareOp::LessThan).not());
    assert_eq!(filter.to_string(), "AND(age >= ?0)");
}

/// NOT NOT p lowers exactly like p
#[test]
fn test_double_negation_cancels() {
    let mut ctx = ParseContext::new();
    let plain = lower(ctx.equal("age").and(ctx.equal("name")));
    ctx.reset_id();
    let doubled = lower(ctx.equal("age").and(ctx.equal("name")).parens().not().not());
    assert_eq!(plain, doubled);
}

/// NOT over a group becomes the negated group kind
#[test]
fn test_negated_groups() {
    let mut ctx = ParseContext::new();
    let not_and = lower(ctx.equal("age").and(ctx.equal("name")).parens().not());
    assert_eq!(not_and.to_string(), "NAND(age = ?0, name = ?1)");

    ctx.reset_id();
    let not_or = lower(ctx.equal("age").or(ctx.equal("name")).parens().not());
    assert_eq!(not_or.to_string(), "NOR(age = ?0, name = ?1)");
}

/// Chains of the same connective flatten into one group
#[test]
fn test_flattening() {
    let mut ctx = ParseContext::new();
    let filter = lower(
        ctx.equal("age")
            .or(ctx.equal("name"))
            .or(ctx.equal("city"))
            .or(ctx.is_null("city")),
    );
    assert_eq!(filter.to_string(), "OR(age = ?0, name = ?1, city = ?2, city IS NULL)");
    assert_eq!(filter.group_count(), 1);
    assert_eq!(filter.leaf_count(), 4);
}

/// IN-lists emit as an OR of equalities, NOT IN as a NOR
#[test]
fn test_in_list_emission() {
    let mut ctx = ParseContext::new();
    let (filter, params) = planned(
        ctx.in_list("city").not(),
        vec![vec![Value::from("Oslo"), Value::from("Rome")].into()],
    );
    assert_eq!(filter.to_string(), "AND(city NOT IN ?0)");

    let mut sink = RecordingOperation::new();
    filter.emit(&people(), &params, &mut sink).unwrap();
    assert_eq!(
        sink.calls(),
        &[
            OperationCall::Begin { group: Group::And },
            OperationCall::Begin { group: Group::Nor },
            OperationCall::Compare {
                op: CompareOp::Equal,
                column: "city".into(),
                value: Value::from("Oslo")
            },
            OperationCall::Compare {
                op: CompareOp::Equal,
                column: "city".into(),
                value: Value::from("Rome")
            },
            OperationCall::End,
            OperationCall::End,
        ]
    );
    assert_eq!(sink.filter_leaf_count(), 2);
}

// =============================================================================
// Evaluation Tests
// =============================================================================

/// Range and LIKE conjunction
#[test]
fn test_conjunction_matches() {
    let mut ctx = ParseContext::new();
    let (filter, params) = planned(
        ctx.compare("age", CompareOp::GreaterEqual)
            .and(ctx.compare("name", CompareOp::Like)),
        vec![Value::Int(18).into(), Value::from("A%").into()],
    );

    assert!(FilterEvaluator::matches(&filter, &row(Some(30), "Ada", None), &params).unwrap());
    assert!(!FilterEvaluator::matches(&filter, &row(Some(30), "Bob", None), &params).unwrap());
    assert!(!FilterEvaluator::matches(&filter, &row(Some(12), "Ada", None), &params).unwrap());
}

/// NOT(a AND b) matches when either side fails
#[test]
fn test_nand_matches() {
    let mut ctx = ParseContext::new();
    let (filter, params) = planned(
        ctx.equal("age").and(ctx.equal("name")).parens().not(),
        vec![Value::Int(30).into(), Value::from("Ada").into()],
    );

    assert!(!FilterEvaluator::matches(&filter, &row(Some(30), "Ada", None), &params).unwrap());
    assert!(FilterEvaluator::matches(&filter, &row(Some(30), "Bob", None), &params).unwrap());
    assert!(FilterEvaluator::matches(&filter, &row(Some(31), "Ada", None), &params).unwrap());
}

/// NOT(a OR b) matches only when both sides fail
#[test]
fn test_nor_matches() {
    let mut ctx = ParseContext::new();
    let (filter, params) = planned(
        ctx.equal("age").or(ctx.equal("name")).parens().not(),
        vec![Value::Int(30).into(), Value::from("Ada").into()],
    );

    assert!(!FilterEvaluator::matches(&filter, &row(Some(30), "Bob", None), &params).unwrap());
    assert!(!FilterEvaluator::matches(&filter, &row(Some(31), "Ada", None), &params).unwrap());
    assert!(FilterEvaluator::matches(&filter, &row(Some(31), "Bob", None), &params).unwrap());
}

/// BETWEEN is inclusive on both ends
#[test]
fn test_between_inclusive() {
    let mut ctx = ParseContext::new();
    let (filter, params) = planned(ctx.between("age"), vec![Value::Int(10).into(), Value::Int(20).into()]);

    assert!(FilterEvaluator::matches(&filter, &row(Some(10), "a", None), &params).unwrap());
    assert!(FilterEvaluator::matches(&filter, &row(Some(20), "a", None), &params).unwrap());
    assert!(!FilterEvaluator::matches(&filter, &row(Some(21), "a", None), &params).unwrap());
}

/// Null tests and null-valued comparisons
#[test]
fn test_null_handling() {
    let ctx = ParseContext::new();
    let (is_null, none) = planned(ctx.is_null("city"), vec![]);
    assert!(FilterEvaluator::matches(&is_null, &row(None, "a", None), &none).unwrap());
    assert!(!FilterEvaluator::matches(&is_null, &row(None, "a", Some("Oslo")), &none).unwrap());

    let mut ctx = ParseContext::new();
    let (eq, params) = planned(ctx.equal("age"), vec![Value::Int(1).into()]);
    assert!(!FilterEvaluator::matches(&eq, &row(None, "a", None), &params).unwrap());
}

/// Null makes a comparison unknown, whichever way its negation is lowered
#[test]
fn test_null_negation_consistent() {
    let values = || vec![Value::Int(5).into(), Value::Int(5).into()];
    let mut ctx = ParseContext::new();
    let (not_leaf, params) = planned(ctx.equal("age").not(), vec![Value::Int(5).into()]);
    assert_eq!(not_leaf.to_string(), "AND(age <> ?0)");
    assert!(!FilterEvaluator::matches(&not_leaf, &row(None, "a", None), &params).unwrap());

    ctx.reset_id();
    let (nor, params) = planned(ctx.equal("age").or(ctx.equal("age")).parens().not(), values());
    assert_eq!(nor.to_string(), "NOR(age = ?0, age = ?1)");
    assert!(!FilterEvaluator::matches(&nor, &row(None, "a", None), &params).unwrap());
    assert!(FilterEvaluator::matches(&nor, &row(Some(6), "a", None), &params).unwrap());

    ctx.reset_id();
    let (nand, params) = planned(ctx.equal("age").and(ctx.equal("age")).parens().not(), values());
    assert!(!FilterEvaluator::matches(&nand, &row(None, "a", None), &params).unwrap());

    ctx.reset_id();
    let (not_between, params) = planned(ctx.between("age").not(), values());
    assert_eq!(not_between.to_string(), "NAND(age >= ?0, age <= ?1)");
    assert!(!FilterEvaluator::matches(&not_between, &row(None, "a", None), &params).unwrap());
    assert!(FilterEvaluator::matches(&not_between, &row(Some(6), "a", None), &params).unwrap());
}

/// A non-string LIKE pattern is rejected before any call is issued
#[test]
fn test_non_string_like_pattern_rejected() {
    let table = people();
    let p = QueryPlanner::new(Arc::new(table.clone()), PlannerConfig::default());
    let mut ctx = ParseContext::new();
    let path = p
        .plan(&PredicateTree::new(ctx.compare("name", CompareOp::NotLike)))
        .unwrap();
    let params = p.bind(&path, vec![Value::Int(5).into()]).unwrap();

    let mut op = RecordingOperation::new();
    let err = path.apply(&table, &params, &mut op).unwrap_err();
    assert_eq!(err.code(), "PLAN_PARAMETER_TYPE");
    assert!(op.calls().is_empty());

    let filter = path.filter().unwrap();
    let err = FilterEvaluator::matches(filter, &row(Some(1), "Bob", None), &params).unwrap_err();
    assert_eq!(err.code(), "PLAN_PARAMETER_TYPE");
}

/// A parameter of the wrong type is an error, not a mismatch
#[test]
fn test_wrong_parameter_type() {
    let mut ctx = ParseContext::new();
    let (filter, params) = planned(ctx.equal("age"), vec![Value::from("thirty").into()]);
    let err = FilterEvaluator::matches(&filter, &row(Some(30), "a", None), &params).unwrap_err();
    assert_eq!(err.code(), "PLAN_PARAMETER_TYPE");
}
