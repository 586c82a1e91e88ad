use serde::Deserialize;
use serde_json::Value;

/// 抽取端交来的批次原始记录 (未校验)
///
/// 所有字段都保持为 `Value`：缺失、类型不对 (例如 `"code": 123` 或 `"qty": true`)
/// 都留给校验阶段按字段路径报告，而不是在反序列化时整体失败。
#[derive(Debug, Clone, Deserialize)]
pub struct BatchRecord {
    #[serde(default)]
    pub date: Value,
    #[serde(default, alias = "nfe_number")]
    pub invoice_number: Value,
    #[serde(default)]
    pub supplier_name: Value,
    #[serde(default)]
    pub orders: Vec<OrderRecord>,
    #[serde(default)]
    pub pending_materials: Vec<PendingRecord>,
}

/// 订单行原始记录
#[derive(Debug, Clone, Deserialize)]
pub struct OrderRecord {
    #[serde(default, alias = "order")]
    pub order_id: Value,
    #[serde(default)]
    pub code: Value,
    #[serde(default)]
    pub description: Value,
    #[serde(default)]
    pub qty: Value,
    #[serde(default)]
    pub qty_total: Value,
    #[serde(default)]
    pub unit_type: Value,
    #[serde(default)]
    pub address: Value,
}

/// 待领料原始记录
#[derive(Debug, Clone, Deserialize)]
pub struct PendingRecord {
    #[serde(default)]
    pub creation_date: Value,
    #[serde(default)]
    pub code: Value,
    #[serde(default)]
    pub op_number: Value,
    #[serde(default)]
    pub product: Value,
    #[serde(default)]
    pub pending_qty: Value,
}
