use serde::Serialize;
use std::fmt;

/// 订单号：ERP 里既有数字也有文本，原样保留
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum OrderId {
    Number(i64),
    Text(String),
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderId::Number(n) => write!(f, "{}", n),
            OrderId::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for OrderId {
    fn from(value: &str) -> Self {
        OrderId::Text(value.to_string())
    }
}

impl From<i64> for OrderId {
    fn from(value: i64) -> Self {
        OrderId::Number(value)
    }
}

/// 采购订单行 (已校验)
///
/// `qty` 是当前仍欠的数量，只有对账器会修改；`qty_total` 记录对账前的原始订购量。
/// 不变式：`0 <= qty <= qty_total`。
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderLine {
    pub order_id: OrderId,
    pub code: String,        // 物料编码 (与待领料的关联键)
    pub description: String,
    pub qty: f64,
    pub qty_total: f64,
    pub unit_type: String,
    pub address: String,     // 库位
}

impl OrderLine {
    /// 只带关联字段的订单行，展示字段留空；`qty_total` 取 `qty`
    pub fn new(order_id: impl Into<OrderId>, code: impl Into<String>, qty: f64) -> Self {
        Self {
            order_id: order_id.into(),
            code: code.into(),
            description: String::new(),
            qty,
            qty_total: qty,
            unit_type: String::new(),
            address: String::new(),
        }
    }

    pub fn is_exhausted(&self) -> bool {
        self.qty == 0.0
    }
}
