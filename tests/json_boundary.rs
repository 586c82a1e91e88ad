//! 持久化中间形态与下游交付

use receiving_reconciler::models::{BatchRecord, ReconciledBatch};
use receiving_reconciler::service::{
    deliver_all, sinks_for, BatchSink, JsonFileSink, LabelManifestSink,
};
use receiving_reconciler::BatchProcessor;
use serde_json::{json, Value};

fn extractor_batch(invoice_number: i64) -> Value {
    json!({
        "date": "10/01/2024",
        "nfe_number": invoice_number,
        "supplier_name": "ACME",
        "orders": [
            {"order": 778, "code": "X1", "description": "Chapa 2mm", "qty": "12 PC",
             "qty_total": "12 PC", "unit_type": "PC", "address": "Rua 3, Prateleira B"},
            {"order": "PC-2", "code": "X2", "description": "Parafuso", "qty": "1.500",
             "qty_total": "1.500", "unit_type": "UN", "address": ""}
        ],
        "pending_materials": [
            {"creation_date": "05/01/24", "code": "X1", "op_number": "OP-7",
             "product": "Carreta", "pending_qty": "4"}
        ]
    })
}

#[test]
fn untouched_fields_round_trip() {
    let reconciled = BatchProcessor::default()
        .process_json(&extractor_batch(4521).to_string())
        .unwrap();
    let out: Value = serde_json::from_str(&reconciled.to_json().unwrap()).unwrap();

    assert_eq!(out["date"], "10/01/2024");
    assert_eq!(out["invoice_number"], 4521);
    assert_eq!(out["supplier_name"], "ACME");

    let first = &out["orders"][0];
    assert_eq!(first["order_id"], 778);
    assert_eq!(first["address"], "Rua 3, Prateleira B");
    assert_eq!(first["qty"], json!(8.0));
    assert_eq!(first["qty_total"], json!(12.0));

    let second = &out["orders"][1];
    assert_eq!(second["order_id"], "PC-2");
    // 订单数量的 `.` 是小数点
    assert_eq!(second["qty"], json!(1.5));

    assert_eq!(out["pending_materials"], json!([]));
}

#[test]
fn output_parses_back_as_input() {
    let processor = BatchProcessor::default();
    let reconciled = processor
        .process_json(&extractor_batch(1).to_string())
        .unwrap();
    let again = processor.process_json(&reconciled.to_json().unwrap()).unwrap();
    assert_eq!(again.batch, reconciled.batch);
}

#[test]
fn independent_batches_run_in_parallel() {
    let mut records: Vec<BatchRecord> = (1..=8)
        .map(|n| serde_json::from_value(extractor_batch(n)).unwrap())
        .collect();
    records.push(serde_json::from_value(json!({"date": "bad", "invoice_number": 99})).unwrap());

    let results = BatchProcessor::default().process_many(records);
    assert_eq!(results.len(), 9);
    for (i, result) in results.iter().take(8).enumerate() {
        let reconciled = result.as_ref().unwrap();
        assert_eq!(reconciled.batch.invoice_number, i as i64 + 1);
        assert_eq!(reconciled.stats.netted_qty, 4.0);
    }
    assert!(results[8].is_err());
}

#[test]
fn sinks_write_json_and_manifest() {
    let dir = tempfile::tempdir().unwrap();
    let reconciled = BatchProcessor::default()
        .process_json(&extractor_batch(4521).to_string())
        .unwrap();

    let sinks = sinks_for(dir.path(), true, true);
    deliver_all(&reconciled, &sinks).unwrap();

    let written = std::fs::read_to_string(JsonFileSink::new(dir.path()).path_for(4521)).unwrap();
    let out: Value = serde_json::from_str(&written).unwrap();
    assert_eq!(out["orders"][0]["qty"], json!(8.0));

    let manifest = std::fs::read_to_string(dir.path().join("labels_4521.csv")).unwrap();
    // 表头 + 2 条入库标签
    assert_eq!(manifest.lines().count(), 3);
    assert!(manifest.contains("X1;8"));
}

#[test]
fn disabled_sinks_write_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let reconciled = BatchProcessor::default()
        .process_json(&extractor_batch(7).to_string())
        .unwrap();

    let sinks = sinks_for(dir.path(), false, false);
    assert!(sinks.is_empty());
    deliver_all(&reconciled, &sinks).unwrap();
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn pending_quantity_dots_are_thousands() {
    let reconciled = BatchProcessor::default()
        .process_json(
            &json!({
                "date": "10/01/2024",
                "invoice_number": 12,
                "orders": [{"order_id": 1, "code": "X1", "qty": "2.000", "qty_total": "2.000"}],
                "pending_materials": [
                    {"creation_date": "05/01/24", "code": "X9", "pending_qty": "1.500 UN"}
                ]
            })
            .to_string(),
        )
        .unwrap();

    assert_eq!(reconciled.batch.orders[0].qty, 2.0);
    assert_eq!(reconciled.batch.pending_materials[0].pending_qty, 1500.0);
}

fn single_line_batch(invoice_number: i64, qty: f64) -> ReconciledBatch {
    BatchProcessor::default()
        .process_json(
            &json!({
                "date": "10/01/2024",
                "invoice_number": invoice_number,
                "orders": [{"order_id": 1, "code": "X1", "qty": qty, "qty_total": 5}]
            })
            .to_string(),
        )
        .unwrap()
}

#[test]
fn redelivery_without_labels_removes_old_manifest() {
    let dir = tempfile::tempdir().unwrap();
    let sinks = sinks_for(dir.path(), true, true);
    let manifest_path = LabelManifestSink::new(dir.path()).path_for(7);

    deliver_all(&single_line_batch(7, 5.0), &sinks).unwrap();
    assert!(manifest_path.exists());

    deliver_all(&single_line_batch(7, 0.0), &sinks).unwrap();
    assert!(!manifest_path.exists());

    let written = std::fs::read_to_string(JsonFileSink::new(dir.path()).path_for(7)).unwrap();
    let out: Value = serde_json::from_str(&written).unwrap();
    assert_eq!(out["orders"], json!([]));
}

struct OfflinePrinter;

impl BatchSink for OfflinePrinter {
    fn name(&self) -> &'static str {
        "printer"
    }

    fn deliver(&self, _batch: &ReconciledBatch) -> receiving_reconciler::Result<()> {
        Err(std::io::Error::new(std::io::ErrorKind::Other, "label printer offline").into())
    }
}

#[test]
fn failed_sink_keeps_earlier_outputs_whole() {
    let dir = tempfile::tempdir().unwrap();
    let sinks: Vec<Box<dyn BatchSink>> = vec![
        Box::new(JsonFileSink::new(dir.path())),
        Box::new(OfflinePrinter),
    ];

    let err = deliver_all(&single_line_batch(8, 3.0), &sinks).unwrap_err();
    assert!(err.to_string().contains("label printer offline"));

    // 只有改名后的最终文件，没有残留的临时文件
    let names: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|entry| entry.unwrap().file_name())
        .collect();
    assert_eq!(names, vec![std::ffi::OsString::from("batch_8.json")]);

    let written = std::fs::read_to_string(dir.path().join("batch_8.json")).unwrap();
    let out: Value = serde_json::from_str(&written).unwrap();
    assert_eq!(out["orders"][0]["qty"], json!(3.0));
}
