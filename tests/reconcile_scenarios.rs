//! 端到端对账场景 (JSON 输入 -> 对账 -> JSON 输出)

use receiving_reconciler::{BatchProcessor, ExhaustedLinePolicy, ReconcileError, Reconciler};
use serde_json::{json, Value};

fn run(input: Value) -> Value {
    let reconciled = BatchProcessor::default()
        .process_json(&input.to_string())
        .unwrap();
    serde_json::from_str(&reconciled.to_json().unwrap()).unwrap()
}

fn batch(orders: Value, pending: Value) -> Value {
    json!({
        "date": "10/01/2024",
        "invoice_number": 4521,
        "supplier_name": "ACME",
        "orders": orders,
        "pending_materials": pending,
    })
}

fn order(id: &str, code: &str, qty: f64) -> Value {
    json!({
        "order_id": id, "code": code, "description": "Chapa 2mm",
        "qty": qty, "qty_total": qty, "unit_type": "PC", "address": "A-01"
    })
}

fn pending(date: &str, code: &str, qty: f64, op: &str) -> Value {
    json!({
        "creation_date": date, "code": code, "op_number": op,
        "product": "Carreta", "pending_qty": qty
    })
}

#[test]
fn scenario_a_pending_fully_consumed() {
    let out = run(batch(
        json!([order("1", "X1", 10.0)]),
        json!([pending("01/01/24", "X1", 4.0, "OP1")]),
    ));
    assert_eq!(out["orders"][0]["qty"], json!(6.0));
    assert_eq!(out["orders"][0]["qty_total"], json!(10.0));
    assert_eq!(out["pending_materials"], json!([]));
}

#[test]
fn scenario_b_order_line_exhausted() {
    let out = run(batch(
        json!([order("1", "X1", 3.0)]),
        json!([pending("01/01/24", "X1", 10.0, "OP1")]),
    ));
    assert_eq!(out["orders"], json!([]));
    assert_eq!(out["pending_materials"][0]["pending_qty"], json!(7.0));
}

#[test]
fn scenario_c_earlier_material_matched_first() {
    let out = run(batch(
        json!([order("1", "X1", 5.0)]),
        json!([
            pending("02/01/24", "X1", 2.0, "LATE"),
            pending("01/01/24", "X1", 5.0, "EARLY"),
        ]),
    ));
    assert_eq!(out["orders"], json!([]));
    assert_eq!(out["pending_materials"], json!([]));
}

#[test]
fn scenario_c_with_skip_policy_keeps_later_material() {
    let processor = BatchProcessor::new(Reconciler::new(ExhaustedLinePolicy::Skip));
    let input = batch(
        json!([order("1", "X1", 5.0)]),
        json!([
            pending("02/01/24", "X1", 2.0, "LATE"),
            pending("01/01/24", "X1", 5.0, "EARLY"),
        ]),
    );
    let reconciled = processor.process_json(&input.to_string()).unwrap();
    assert!(reconciled.batch.orders.is_empty());
    assert_eq!(reconciled.batch.pending_materials.len(), 1);
    assert_eq!(reconciled.batch.pending_materials[0].op_number, "LATE");
    assert_eq!(reconciled.batch.pending_materials[0].pending_qty, 2.0);
}

#[test]
fn scenario_d_unknown_code_survives() {
    let out = run(batch(
        json!([order("1", "X1", 5.0)]),
        json!([pending("01/01/24", "NOPE", 3.0, "OP1")]),
    ));
    assert_eq!(out["orders"][0]["qty"], json!(5.0));
    assert_eq!(out["pending_materials"][0]["pending_qty"], json!(3.0));
}

#[test]
fn output_orders_keep_input_order_pending_sorted_by_date() {
    let out = run(batch(
        json!([order("C", "X3", 1.0), order("A", "X1", 9.0), order("B", "X2", 1.0)]),
        json!([
            pending("03/02/24", "Z1", 1.0, "feb"),
            pending("15/01/24", "Z2", 1.0, "jan"),
            pending("15/01/24", "X1", 2.0, "jan-x1"),
            pending("20/12/23", "Z3", 1.0, "dec"),
        ]),
    ));
    let ids: Vec<_> = out["orders"]
        .as_array()
        .unwrap()
        .iter()
        .map(|o| o["order_id"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(ids, vec!["C", "A", "B"]);

    let ops: Vec<_> = out["pending_materials"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["op_number"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(ops, vec!["dec", "jan", "feb"]);
    assert_eq!(out["orders"][1]["qty"], json!(7.0));
}

#[test]
fn reconciling_output_again_changes_nothing() {
    let first = run(batch(
        json!([order("1", "X1", 3.0), order("2", "X1", 4.0), order("3", "X2", 2.0)]),
        json!([
            pending("01/01/24", "X1", 5.0, "OP1"),
            pending("02/01/24", "X2", 6.0, "OP2"),
            pending("03/01/24", "X1", 1.0, "OP3"),
        ]),
    ));
    let second = run(first.clone());
    assert_eq!(first, second);
}

#[test]
fn empty_batch_is_not_an_error() {
    let out = run(batch(json!([order("1", "X1", 2.0), order("2", "X2", 0.0)]), json!([])));
    assert_eq!(out["orders"].as_array().unwrap().len(), 1);
    assert_eq!(out["pending_materials"], json!([]));

    let out = run(batch(json!([]), json!([pending("01/01/24", "X1", 2.0, "OP1")])));
    assert_eq!(out["pending_materials"].as_array().unwrap().len(), 1);
}

#[test]
fn invalid_quantity_aborts_whole_batch() {
    let input = batch(
        json!([order("1", "X1", 3.0), {"order_id": "2", "code": "X2", "qty": "muitos", "qty_total": 5}]),
        json!([pending("01/01/24", "X1", 1.0, "OP1")]),
    );
    let err = BatchProcessor::default()
        .process_json(&input.to_string())
        .unwrap_err();
    match err {
        ReconcileError::Validation(v) => {
            assert_eq!(v.issues.len(), 1);
            assert_eq!(v.issues[0].field, "orders[1].qty");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn malformed_json_is_reported() {
    let err = BatchProcessor::default().process_json("{not json").unwrap_err();
    assert!(matches!(err, ReconcileError::Json(_)));
}

#[test]
fn missing_order_id_is_a_validation_issue() {
    let input = batch(
        json!([{"code": 123, "qty": 1, "qty_total": 1}]),
        json!([]),
    );
    let err = BatchProcessor::default()
        .process_json(&input.to_string())
        .unwrap_err();
    match err {
        ReconcileError::Validation(v) => {
            let fields: Vec<_> = v.issues.iter().map(|i| i.field.as_str()).collect();
            assert_eq!(fields, vec!["orders[0].order_id"]);
        }
        other => panic!("unexpected error: {other}"),
    }
}
