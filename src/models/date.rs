use chrono::NaiveDate;
use serde::{Serialize, Serializer};
use std::fmt;

/// 发票日期格式 `DD/MM/YYYY`
pub const INVOICE_DATE_FORMAT: &str = "%d/%m/%Y";
/// 待领料创建日期格式 `DD/MM/YY`
pub const CREATION_DATE_FORMAT: &str = "%d/%m/%y";

/// ERP 日期：解析后的日期用于排序，原始文本用于无损输出
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErpDate {
    raw: String,
    date: NaiveDate,
}

impl ErpDate {
    pub fn parse(raw: &str, format: &str) -> Result<Self, chrono::ParseError> {
        let trimmed = raw.trim();
        let date = NaiveDate::parse_from_str(trimmed, format)?;
        Ok(Self {
            raw: trimmed.to_string(),
            date,
        })
    }

    /// `DD/MM/YYYY`
    pub fn invoice(raw: &str) -> Result<Self, chrono::ParseError> {
        Self::parse(raw, INVOICE_DATE_FORMAT)
    }

    /// `DD/MM/YY`
    pub fn creation(raw: &str) -> Result<Self, chrono::ParseError> {
        Self::parse(raw, CREATION_DATE_FORMAT)
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl fmt::Display for ErpDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl Serialize for ErpDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}
