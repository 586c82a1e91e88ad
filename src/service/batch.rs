use super::reconciler::Reconciler;
use super::validate::validate_batch;
use crate::error::Result;
use crate::models::{Batch, BatchRecord, ReconciledBatch};
use rayon::prelude::*;

/// 批次编排：校验 -> 对账 -> 交付
///
/// 一个批次只对账一次；校验失败整批放弃，不存在半个批次。
#[derive(Debug, Clone, Default)]
pub struct BatchProcessor {
    reconciler: Reconciler,
}

impl BatchProcessor {
    pub fn new(reconciler: Reconciler) -> Self {
        Self { reconciler }
    }

    pub fn reconciler(&self) -> &Reconciler {
        &self.reconciler
    }

    /// 对已校验的批次对账
    pub fn process(&self, batch: Batch) -> ReconciledBatch {
        if batch.is_empty() {
            tracing::warn!(
                "Batch {} is empty ({} orders, {} pending materials), nothing to net",
                batch.invoice_number,
                batch.orders.len(),
                batch.pending_materials.len()
            );
        }

        let Batch {
            date,
            invoice_number,
            supplier_name,
            orders,
            pending_materials,
        } = batch;

        let result = self.reconciler.reconcile(orders, pending_materials);
        let stats = result.stats;

        tracing::info!(
            "Batch {} ({}) 对账完成: 订单行 {}/{}, 待领料 {}/{}, 匹配编码 {}, 清零 {}, 冲抵数量 {}",
            invoice_number,
            supplier_name,
            stats.orders_out,
            stats.orders_in,
            stats.pending_out,
            stats.pending_in,
            stats.matched_codes,
            stats.absorbed_pending,
            stats.netted_qty
        );
        if stats.unmatched_pending > 0 {
            tracing::warn!(
                "Batch {}: {} 条待领料编码不在订单中",
                invoice_number,
                stats.unmatched_pending
            );
        }

        ReconciledBatch {
            batch: Batch {
                date,
                invoice_number,
                supplier_name,
                orders: result.orders,
                pending_materials: result.pending_materials,
            },
            stats,
        }
    }

    /// 校验原始记录后对账
    pub fn process_record(&self, record: BatchRecord) -> Result<ReconciledBatch> {
        let batch = validate_batch(record).map_err(|e| {
            tracing::error!("{}", e);
            e
        })?;
        Ok(self.process(batch))
    }

    /// 从持久化的 JSON 中间形态对账
    pub fn process_json(&self, json: &str) -> Result<ReconciledBatch> {
        let record: BatchRecord = serde_json::from_str(json)?;
        self.process_record(record)
    }

    /// 多个独立批次并行对账，结果与输入一一对应
    pub fn process_many(&self, records: Vec<BatchRecord>) -> Vec<Result<ReconciledBatch>> {
        records
            .into_par_iter()
            .map(|record| self.process_record(record))
            .collect()
    }
}
