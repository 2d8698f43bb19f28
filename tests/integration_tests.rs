//! Integration tests for condition compilation and action graphs
//!
//! These tests exercise the public API end to end with deterministic ids.

use powerflow::actions::{
    foreach, scope, ActionGraph, ActionNode, IdSource, IfStatement, InitVariable, RawActions,
    RunMode, SequentialIds, UntilStatement, VariableOp, VariableType,
};
use powerflow::condition::{compile_condition, Condition};
use powerflow::flow::{Flow, FlowBuilder, FlowLoader};
use powerflow::{ConditionError, GraphError};
use serde_json::{json, Map, Value};
use std::sync::Arc;

// ============================================================================
// Helpers
// ============================================================================

fn ids() -> Arc<dyn IdSource> {
    Arc::new(SequentialIds::new("op"))
}

fn compose(ids: &Arc<dyn IdSource>, name: &str, inputs: Value) -> ActionNode {
    let mut payload = Map::new();
    payload.insert("inputs".to_string(), inputs);
    ActionNode::with_id_source(ids.as_ref(), name, "Compose", payload)
}

// ============================================================================
// Condition compilation
// ============================================================================

#[test]
fn test_documented_condition_outputs() {
    assert_eq!(
        compile_condition("var2 == false").unwrap(),
        json!({"equals": ["@variables('var2')", false]})
    );
    assert_eq!(
        compile_condition("a != b").unwrap(),
        json!({"not": {"equals": ["@variables('a')", "@variables('b')"]}})
    );
    assert_eq!(
        compile_condition("a or b and c").unwrap(),
        compile_condition("a or (b and c)").unwrap()
    );
    assert_eq!(
        compile_condition("not a == 1").unwrap(),
        json!({"not": {"equals": ["@variables('a')", 1]}})
    );
}

#[test]
fn test_condition_failures() {
    assert!(matches!(
        compile_condition("\"unterminated"),
        Err(ConditionError::Lexical(_))
    ));
    assert!(matches!(
        compile_condition("a == "),
        Err(ConditionError::Structural(_))
    ));
    assert!(matches!(
        compile_condition(""),
        Err(ConditionError::Structural(_))
    ));
    assert!(matches!(
        compile_condition("a # b"),
        Err(ConditionError::Lexical(_))
    ));
}

#[test]
fn test_long_expression() {
    let compiled = compile_condition(
        r#"var == 1 or (var == "test" and var2 != "test2") or var3 > 1.22 or var6 <= 6 or not var7 == 7"#,
    )
    .unwrap();
    // Left-associative `or`: the last operand is the outermost right child.
    assert_eq!(
        compiled["or"][1],
        json!({"not": {"equals": ["@variables('var7')", 7]}})
    );
    assert_eq!(
        compiled["or"][0]["or"][1],
        json!({"lessOrEquals": ["@variables('var6')", 6]})
    );
}

// ============================================================================
// Action graphs
// ============================================================================

#[test]
fn test_same_name_twice_is_renamed() {
    let ids = ids();
    let mut graph = ActionGraph::with_id_source(false, ids.clone());
    graph
        .append(compose(&ids, "Notify", json!("first")), RunMode::Normal)
        .unwrap();
    graph
        .append(compose(&ids, "Notify", json!("second")), RunMode::Normal)
        .unwrap();

    let exported = graph.export();
    assert_eq!(exported.len(), 2);
    assert_eq!(exported["Notify"]["inputs"], json!("first"));
    assert_eq!(exported["Notify_1"]["inputs"], json!("second"));
}

#[test]
fn test_clone_then_mutate_leaves_original() {
    let ids = ids();
    let mut graph = ActionGraph::with_id_source(false, ids.clone());
    graph
        .append(compose(&ids, "Step", json!({"value": 1})), RunMode::Normal)
        .unwrap();

    let mut copy = graph.duplicate();
    copy.get_mut("Step")
        .unwrap()
        .payload_mut()
        .insert("inputs".to_string(), json!({"value": 2}));

    assert_eq!(graph.export()["Step"]["inputs"], json!({"value": 1}));
    assert_eq!(copy.export()["Step"]["inputs"], json!({"value": 2}));
}

#[test]
fn test_merge_two_single_node_graphs() {
    let ids = ids();
    let mut a = ActionGraph::with_id_source(false, ids.clone());
    a.add_top(compose(&ids, "X", json!(1))).unwrap();
    let mut b = ActionGraph::with_id_source(false, ids.clone());
    b.add_top(compose(&ids, "Y", json!(2))).unwrap();

    let merged = a.merge(&b);
    assert_eq!(
        merged.export()["Y"]["runAfter"],
        json!({"X": ["Succeeded"]})
    );
}

#[test]
fn test_restricted_kind_leaves_registry_unchanged() {
    let ids = ids();
    let mut graph = ActionGraph::with_id_source(false, ids.clone());
    graph.add_top(compose(&ids, "A", json!(1))).unwrap();
    let before = graph.len();

    let init = InitVariable::new("Init", "x", VariableType::Boolean).build_with(ids.as_ref());
    let err = graph.add_after(init, "A", RunMode::Force).unwrap_err();
    assert!(matches!(err, GraphError::RestrictedKind { .. }));
    assert_eq!(graph.len(), before);
}

#[test]
fn test_validation_order_identity_before_reference() {
    let ids = ids();
    let mut graph = ActionGraph::with_id_source(false, ids.clone());
    let node = compose(&ids, "A", json!(1));
    let copy = node.clone();
    graph.add_top(node).unwrap();

    let err = graph.add_after(copy, "Missing", RunMode::Normal).unwrap_err();
    assert!(matches!(err, GraphError::DuplicateIdentity { .. }));
}

// ============================================================================
// Composite actions and flows
// ============================================================================

#[test]
fn test_flow_with_branch_and_loop() {
    let ids = ids();
    let mut flow = Flow::with_id_source(ids.clone());
    flow.set_trigger("manual", json!({"type": "Request", "kind": "Button"}))
        .unwrap();

    let init = InitVariable::new("Init", "count", VariableType::Integer)
        .value(0)
        .build_with(ids.as_ref());
    flow.append_action(init, None, RunMode::Normal).unwrap();

    let mut body = ActionGraph::with_id_source(false, ids.clone());
    body.append(
        VariableOp::Increment.build_with(ids.as_ref(), "Bump", "count", 1),
        RunMode::Normal,
    )
    .unwrap();
    let each = foreach("Each", "@triggerBody()?['items']", body);
    flow.append_action(each, None, RunMode::Normal).unwrap();

    let mut big = ActionGraph::with_id_source(false, ids.clone());
    big.append(compose(&ids, "Big", json!("many")), RunMode::Normal)
        .unwrap();
    let check = IfStatement::new("Check", Condition::new("count > 10").unwrap())
        .true_actions(big)
        .build_with(ids.as_ref());
    flow.append_action(check, None, RunMode::Force).unwrap();

    let doc = flow.export();
    let actions = &doc["actions"];
    assert_eq!(doc["triggers"]["manual"]["kind"], json!("Button"));
    assert_eq!(actions["Each"]["runAfter"], json!({"Init": ["Succeeded"]}));
    assert_eq!(
        actions["Each"]["actions"]["Bump"]["inputs"],
        json!({"name": "count", "value": 1})
    );
    assert_eq!(
        actions["Check"]["expression"],
        json!({"greater": ["@variables('count')", 10]})
    );
    assert_eq!(
        actions["Check"]["runAfter"]["Each"],
        json!(["Succeeded", "Failed", "Skipped", "TimedOut"])
    );
    assert!(actions["Check"].get("else").is_none());
}

#[test]
fn test_merge_keeps_composite_payloads() {
    let ids = ids();
    let mut first = ActionGraph::with_id_source(false, ids.clone());
    first
        .append(compose(&ids, "Start", json!(0)), RunMode::Normal)
        .unwrap();

    let mut steps = ActionGraph::with_id_source(false, ids.clone());
    steps
        .append(compose(&ids, "Attempt", json!(1)), RunMode::Normal)
        .unwrap();
    let mut second = ActionGraph::with_id_source(false, ids.clone());
    second
        .append(
            UntilStatement::new("Retry", steps, "@true").build_with(ids.as_ref()),
            RunMode::Normal,
        )
        .unwrap();

    let merged = first.merge(&second);
    let exported = merged.export();
    assert_eq!(exported["Retry"]["runAfter"], json!({"Start": ["Succeeded"]}));
    assert!(exported["Retry"]["actions"].get("Attempt").is_some());
    assert_ne!(
        exported["Retry"]["actions"]["Attempt"]["metadata"],
        second.export()["Retry"]["actions"]["Attempt"]["metadata"]
    );
}

#[test]
fn test_scope_rejects_invalid_raw_actions() {
    let raw = RawActions::from_value(json!({"A": {"type": "Compose"}}));
    let node = scope("Group", raw);
    assert_eq!(node.export()["actions"], json!({}));
}

#[test]
fn test_build_flow_from_yaml() {
    let yaml = r#"
name: GetUserEnvironmentsFlow
triggers:
  manual:
    type: Request
    kind: Button
actions:
  - name: ListUserEnvironments
    type: OpenApiConnection
    top: true
    inputs:
      host:
        operationId: ListUserEnvironments
  - name: ListConnections
    type: OpenApiConnection
    top: true
    inputs:
      host:
        operationId: ListConnections
"#;
    let def = FlowLoader::parse_yaml(yaml).unwrap();
    let flow = FlowBuilder::with_id_source(ids()).build(&def).unwrap();
    let doc = flow.export();

    let names: Vec<&String> = doc["actions"].as_object().unwrap().keys().collect();
    assert_eq!(names, vec!["ListUserEnvironments", "ListConnections"]);
    assert_eq!(doc["actions"]["ListConnections"]["runAfter"], json!({}));
    assert_eq!(
        doc["actions"]["ListUserEnvironments"]["metadata"],
        json!({"operationMetadataId": "op-1"})
    );
}
