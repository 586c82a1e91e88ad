use crate::error::ReconcileError;
use crate::labels::{LabelEntry, LabelManifest};
use crate::models::{Batch, BatchRecord, ReconcileStats, ReconciledBatch};
use crate::service::{deliver_all, validate_batch, BatchProcessor, BatchSink};
use axum::{
    extract::{rejection::JsonRejection, Json, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use dashmap::DashMap;
use serde::Serialize;
use std::sync::Arc;

/// 共享状态
#[derive(Clone)]
pub struct AppState {
    pub processor: Arc<BatchProcessor>,
    pub sinks: Arc<Vec<Box<dyn BatchSink>>>,
    /// 正在对账的发票号; 同一批次不允许并发对账
    pub in_flight: Arc<DashMap<i64, ()>>,
}

impl AppState {
    pub fn new(processor: BatchProcessor, sinks: Vec<Box<dyn BatchSink>>) -> Self {
        Self {
            processor: Arc::new(processor),
            sinks: Arc::new(sinks),
            in_flight: Arc::new(DashMap::new()),
        }
    }
}

/// 在途登记, drop 时释放
struct InFlightGuard {
    registry: Arc<DashMap<i64, ()>>,
    invoice_number: i64,
}

impl InFlightGuard {
    fn acquire(registry: &Arc<DashMap<i64, ()>>, invoice_number: i64) -> Option<Self> {
        match registry.entry(invoice_number) {
            dashmap::mapref::entry::Entry::Occupied(_) => None,
            dashmap::mapref::entry::Entry::Vacant(slot) => {
                slot.insert(());
                Some(Self {
                    registry: Arc::clone(registry),
                    invoice_number,
                })
            }
        }
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.registry.remove(&self.invoice_number);
    }
}

/// 对账响应体
#[derive(Debug, Serialize)]
pub struct ReconcileResponse {
    pub success: bool,
    pub message: String,
    pub batch: Option<Batch>,
    pub stats: Option<ReconcileStats>,
}

/// 标签清单响应体
#[derive(Debug, Serialize)]
pub struct LabelsResponse {
    pub success: bool,
    pub message: String,
    pub pages: u32,
    pub labels: Option<Vec<LabelEntry>>,
}

/// 健康检查
pub async fn health_check() -> &'static str {
    "OK"
}

/// 校验 + 在途检查 + 对账 + 交付下游
fn run_batch(state: &AppState, record: BatchRecord) -> Result<ReconciledBatch, (StatusCode, String)> {
    let batch = validate_batch(record)
        .map_err(|e| (StatusCode::UNPROCESSABLE_ENTITY, e.to_string()))?;

    let invoice_number = batch.invoice_number;
    let Some(_guard) = InFlightGuard::acquire(&state.in_flight, invoice_number) else {
        tracing::warn!("Batch {} is already being reconciled", invoice_number);
        return Err((
            StatusCode::CONFLICT,
            format!("Batch {} is already being reconciled", invoice_number),
        ));
    };

    let reconciled = state.processor.process(batch);
    deliver_all(&reconciled, &state.sinks).map_err(|e: ReconcileError| {
        tracing::error!("Batch {} delivery failed: {}", invoice_number, e);
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    })?;

    Ok(reconciled)
}

/// 请求体解析 + 在阻塞线程池上跑 [`run_batch`]
///
/// 校验、对账与写文件都是同步的，不占用 tokio 工作线程。
async fn handle(
    state: AppState,
    payload: Result<Json<BatchRecord>, JsonRejection>,
) -> Result<ReconciledBatch, (StatusCode, String)> {
    let Json(record) = payload.map_err(|rejection| {
        tracing::warn!("Rejected batch body: {}", rejection.body_text());
        (rejection.status(), rejection.body_text())
    })?;

    tokio::task::spawn_blocking(move || run_batch(&state, record))
        .await
        .map_err(|e| {
            tracing::error!("Reconcile task join error: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Task join error: {}", e),
            )
        })?
}

/// 批次对账接口
pub async fn reconcile_batch(
    State(state): State<AppState>,
    payload: Result<Json<BatchRecord>, JsonRejection>,
) -> Response {
    match handle(state, payload).await {
        Ok(reconciled) => {
            let response = ReconcileResponse {
                success: true,
                message: format!(
                    "Batch {} reconciled: {} orders, {} pending materials",
                    reconciled.batch.invoice_number,
                    reconciled.stats.orders_out,
                    reconciled.stats.pending_out
                ),
                batch: Some(reconciled.batch),
                stats: Some(reconciled.stats),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err((status, message)) => {
            let response = ReconcileResponse {
                success: false,
                message: format!("Error: {}", message),
                batch: None,
                stats: None,
            };
            (status, Json(response)).into_response()
        }
    }
}

/// 对账并返回标签清单
pub async fn reconcile_labels(
    State(state): State<AppState>,
    payload: Result<Json<BatchRecord>, JsonRejection>,
) -> Response {
    match handle(state, payload).await {
        Ok(reconciled) => {
            let manifest = LabelManifest::from_batch(&reconciled.batch);
            let response = LabelsResponse {
                success: true,
                message: format!(
                    "Batch {}: {} labels",
                    reconciled.batch.invoice_number,
                    manifest.entries.len()
                ),
                pages: manifest.page_count(),
                labels: Some(manifest.entries),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err((status, message)) => {
            let response = LabelsResponse {
                success: false,
                message: format!("Error: {}", message),
                pages: 0,
                labels: None,
            };
            (status, Json(response)).into_response()
        }
    }
}
