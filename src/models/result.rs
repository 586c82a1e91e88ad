use super::batch::Batch;
use serde::Serialize;

/// 单批次对账统计
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReconcileStats {
    pub orders_in: usize,
    pub orders_out: usize,
    pub pending_in: usize,
    pub pending_out: usize,
    pub matched_codes: usize,     // 至少命中一条订单行的物料编码数
    pub unmatched_pending: usize, // 编码在订单中不存在的待领料数
    pub absorbed_pending: usize,  // 遇到已耗尽订单行被清零的待领料数
    pub netted_qty: f64,          // 订单与待领料之间冲抵的总数量
}

/// 对账后的批次及统计
#[derive(Debug, Clone, PartialEq)]
pub struct ReconciledBatch {
    pub batch: Batch,
    pub stats: ReconcileStats,
}

impl ReconciledBatch {
    /// 持久化中间形态 (与输入同构的 JSON)
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.batch)
    }
}
