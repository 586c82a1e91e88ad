use std::fmt;

/// 单个字段的校验问题
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum IssueKind {
    #[error("missing quantity")]
    MissingQuantity,
    #[error("non-numeric quantity {0:?}")]
    NonNumericQuantity(String),
    #[error("negative quantity {0}")]
    NegativeQuantity(f64),
    #[error("qty {qty} exceeds qty_total {qty_total}")]
    ExceedsTotal { qty: f64, qty_total: f64 },
    #[error("malformed date {value:?}, expected {expected}")]
    MalformedDate { value: String, expected: &'static str },
    #[error("invoice number {0:?} is not an integer")]
    InvalidInvoiceNumber(String),
    #[error("empty material code")]
    EmptyCode,
    #[error("missing order id")]
    MissingOrderId,
    #[error("order id {0} is neither an integer nor text")]
    InvalidOrderId(String),
    #[error("expected text, found {0}")]
    NotText(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValidationIssue {
    pub field: String, // 例如 `orders[2].qty`
    pub kind: IssueKind,
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.kind)
    }
}

/// 批次校验失败：整批放弃，一次报告全部问题
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("batch validation failed: {}", join_issues(.issues))]
pub struct ValidationError {
    pub issues: Vec<ValidationIssue>,
}

fn join_issues(issues: &[ValidationIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[derive(Debug, thiserror::Error)]
pub enum ReconcileError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("invalid batch json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv export failed: {0}")]
    Csv(#[from] csv::Error),
    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

pub type Result<T> = std::result::Result<T, ReconcileError>;
