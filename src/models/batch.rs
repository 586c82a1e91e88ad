use super::date::ErpDate;
use super::order::OrderLine;
use super::pending::PendingMaterial;
use serde::Serialize;

/// 对账批次：一张发票 (一次谈判) 的订单行与待领料
///
/// 每次抽取新建，交给标签端后即丢弃，不持有跨批次状态。
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Batch {
    pub date: ErpDate,
    pub invoice_number: i64,
    pub supplier_name: String,
    pub orders: Vec<OrderLine>,
    pub pending_materials: Vec<PendingMaterial>,
}

impl Batch {
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty() || self.pending_materials.is_empty()
    }
}
