use super::date::ErpDate;
use serde::Serialize;

/// 生产待领料 (已校验)
///
/// `pending_qty` 是生产仍然缺的数量，对账时被扣减；不变式 `pending_qty >= 0`。
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PendingMaterial {
    pub creation_date: ErpDate, // 缺料登记日期, 仅用于排序
    pub code: String,
    pub op_number: String,      // 生产单号
    pub product: String,
    pub pending_qty: f64,
}

impl PendingMaterial {
    pub fn new(creation_date: ErpDate, code: impl Into<String>, pending_qty: f64) -> Self {
        Self {
            creation_date,
            code: code.into(),
            op_number: String::new(),
            product: String::new(),
            pending_qty,
        }
    }

    pub fn is_settled(&self) -> bool {
        self.pending_qty == 0.0
    }
}
