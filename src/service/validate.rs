use crate::error::{IssueKind, ValidationError, ValidationIssue};
use crate::models::{
    Batch, BatchRecord, ErpDate, OrderId, OrderLine, OrderRecord, PendingMaterial, PendingRecord,
    CREATION_DATE_FORMAT, INVOICE_DATE_FORMAT,
};
use serde_json::Value;

/// 数量单元格的文本写法
///
/// 订单页和待领料页的 ERP 导出不一样：订单数量是普通小数 (`"1.5"` -> `1.5`)，
/// 待领料数量按巴西写法，`.` 为千分位、`,` 为小数点 (`"1.234,5"` -> `1234.5`)。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityFormat {
    Order,
    Pending,
}

/// 解析数量字段
///
/// JSON 数字直接使用；字符串取第一个词 (`"12 PC"` -> `12`)，再按 `format` 解读分隔符。
pub fn parse_quantity(value: &Value, format: QuantityFormat) -> Result<f64, IssueKind> {
    let qty = match value {
        Value::Null => return Err(IssueKind::MissingQuantity),
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| IssueKind::NonNumericQuantity(n.to_string()))?,
        Value::String(s) => parse_quantity_text(s, format)?,
        other => return Err(IssueKind::NonNumericQuantity(other.to_string())),
    };

    if qty < 0.0 {
        return Err(IssueKind::NegativeQuantity(qty));
    }
    // 去掉 -0.0
    Ok(qty + 0.0)
}

fn parse_quantity_text(text: &str, format: QuantityFormat) -> Result<f64, IssueKind> {
    let token = text.split_whitespace().next().ok_or(IssueKind::MissingQuantity)?;
    let parsed = match format {
        QuantityFormat::Order => token.parse::<f64>(),
        QuantityFormat::Pending => token.replace('.', "").replace(',', ".").parse::<f64>(),
    };
    match parsed {
        Ok(q) if q.is_finite() => Ok(q),
        _ => Err(IssueKind::NonNumericQuantity(text.to_string())),
    }
}

fn parse_invoice_number(value: &Value) -> Result<i64, IssueKind> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .ok_or_else(|| IssueKind::InvalidInvoiceNumber(n.to_string())),
        Value::String(s) => s
            .trim()
            .parse::<i64>()
            .map_err(|_| IssueKind::InvalidInvoiceNumber(s.clone())),
        other => Err(IssueKind::InvalidInvoiceNumber(other.to_string())),
    }
}

/// 文本字段：缺失视为空串，数字单元格转成文本
fn parse_text(value: &Value) -> Result<String, IssueKind> {
    match value {
        Value::Null => Ok(String::new()),
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(IssueKind::NotText(other.to_string())),
    }
}

fn parse_code(value: &Value) -> Result<String, IssueKind> {
    let code = parse_text(value)?;
    match code.trim() {
        "" => Err(IssueKind::EmptyCode),
        trimmed => Ok(trimmed.to_string()),
    }
}

fn parse_order_id(value: &Value) -> Result<OrderId, IssueKind> {
    match value {
        Value::Null => Err(IssueKind::MissingOrderId),
        Value::Number(n) => n
            .as_i64()
            .map(OrderId::Number)
            .ok_or_else(|| IssueKind::InvalidOrderId(n.to_string())),
        Value::String(s) if s.trim().is_empty() => Err(IssueKind::MissingOrderId),
        Value::String(s) => Ok(OrderId::Text(s.clone())),
        other => Err(IssueKind::InvalidOrderId(other.to_string())),
    }
}

fn parse_date(
    value: &Value,
    expected: &'static str,
    parse: fn(&str) -> Result<ErpDate, chrono::ParseError>,
) -> Result<ErpDate, IssueKind> {
    let text = parse_text(value)?;
    parse(&text).map_err(|_| IssueKind::MalformedDate { value: text, expected })
}

/// 收集整批问题，不在第一个错误处中断
#[derive(Default)]
struct IssueCollector {
    issues: Vec<ValidationIssue>,
}

impl IssueCollector {
    fn check<T>(&mut self, field: impl FnOnce() -> String, result: Result<T, IssueKind>) -> Option<T> {
        match result {
            Ok(v) => Some(v),
            Err(kind) => {
                self.issues.push(ValidationIssue { field: field(), kind });
                None
            }
        }
    }

    /// 展示用文本字段出错时记下问题，用空串占位 (整批反正会失败)
    fn text(&mut self, field: impl FnOnce() -> String, value: &Value) -> String {
        self.check(field, parse_text(value)).unwrap_or_default()
    }

    fn push(&mut self, field: String, kind: IssueKind) {
        self.issues.push(ValidationIssue { field, kind });
    }
}

fn validate_order(idx: usize, rec: OrderRecord, issues: &mut IssueCollector) -> Option<OrderLine> {
    let path = |name: &str| format!("orders[{}].{}", idx, name);

    let order_id = issues.check(|| path("order_id"), parse_order_id(&rec.order_id));
    let code = issues.check(|| path("code"), parse_code(&rec.code));
    let description = issues.text(|| path("description"), &rec.description);
    let unit_type = issues.text(|| path("unit_type"), &rec.unit_type);
    let address = issues.text(|| path("address"), &rec.address);
    let qty = issues.check(|| path("qty"), parse_quantity(&rec.qty, QuantityFormat::Order));
    let qty_total = issues.check(
        || path("qty_total"),
        parse_quantity(&rec.qty_total, QuantityFormat::Order),
    );

    let (qty, qty_total) = (qty?, qty_total?);
    if qty > qty_total {
        issues.push(path("qty"), IssueKind::ExceedsTotal { qty, qty_total });
        return None;
    }

    Some(OrderLine {
        order_id: order_id?,
        code: code?,
        description,
        qty,
        qty_total,
        unit_type,
        address,
    })
}

fn validate_pending(
    idx: usize,
    rec: PendingRecord,
    issues: &mut IssueCollector,
) -> Option<PendingMaterial> {
    let path = |name: &str| format!("pending_materials[{}].{}", idx, name);

    let code = issues.check(|| path("code"), parse_code(&rec.code));
    let creation_date = issues.check(
        || path("creation_date"),
        parse_date(&rec.creation_date, CREATION_DATE_FORMAT, ErpDate::creation),
    );
    let op_number = issues.text(|| path("op_number"), &rec.op_number);
    let product = issues.text(|| path("product"), &rec.product);
    let pending_qty = issues.check(
        || path("pending_qty"),
        parse_quantity(&rec.pending_qty, QuantityFormat::Pending),
    );

    Some(PendingMaterial {
        creation_date: creation_date?,
        code: code?,
        op_number,
        product,
        pending_qty: pending_qty?,
    })
}

/// 对账前的整批校验
///
/// 任一字段不合法则整批失败，返回的错误包含所有问题；校验通过才产出可对账的 [`Batch`]。
pub fn validate_batch(record: BatchRecord) -> Result<Batch, ValidationError> {
    let mut issues = IssueCollector::default();

    let date = issues.check(
        || "date".to_string(),
        parse_date(&record.date, INVOICE_DATE_FORMAT, ErpDate::invoice),
    );
    let invoice_number = issues.check(
        || "invoice_number".to_string(),
        parse_invoice_number(&record.invoice_number),
    );
    let supplier_name = issues.text(|| "supplier_name".to_string(), &record.supplier_name);

    let orders: Vec<_> = record
        .orders
        .into_iter()
        .enumerate()
        .map(|(idx, rec)| validate_order(idx, rec, &mut issues))
        .collect();
    let pending_materials: Vec<_> = record
        .pending_materials
        .into_iter()
        .enumerate()
        .map(|(idx, rec)| validate_pending(idx, rec, &mut issues))
        .collect();

    // 无问题时所有 Option 均为 Some
    match (date, invoice_number) {
        (Some(date), Some(invoice_number)) if issues.issues.is_empty() => Ok(Batch {
            date,
            invoice_number,
            supplier_name,
            orders: orders.into_iter().flatten().collect(),
            pending_materials: pending_materials.into_iter().flatten().collect(),
        }),
        _ => Err(ValidationError {
            issues: issues.issues,
        }),
    }
}
