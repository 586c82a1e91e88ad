//! 标签清单
//!
//! 不做排版与渲染，只描述标签端要打印的内容：
//! 入库标签每条订单行打 2 份，待领料标签每条 1 份；数量按整数截断显示。

use crate::error::Result;
use crate::models::{Batch, OrderLine, PendingMaterial};
use serde::Serialize;
use std::io::Write;

/// 每条订单行的入库标签份数
pub const STOCK_LABEL_COPIES: u32 = 2;
/// 每条待领料的标签份数
pub const PENDING_LABEL_COPIES: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelKind {
    Stock,
    Pending,
}

/// 一张 (或一组相同的) 标签内容
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelEntry {
    pub kind: LabelKind,
    pub copies: u32,
    pub date: String,         // 发票日期, 待领料标签为空
    pub heading: String,      // "NF <发票号>" 或生产单号
    pub title: String,        // 供应商或产品
    pub reference: String,    // 订单号
    pub code: String,
    pub description: String,
    pub address: String,
    pub quantity_line: String,
    pub total_line: String,
    pub qr_payload: String,   // "<编码>;<数量>", 仅入库标签
}

fn whole(qty: f64) -> i64 {
    qty.trunc() as i64
}

impl LabelEntry {
    pub fn stock(batch: &Batch, line: &OrderLine) -> Self {
        Self {
            kind: LabelKind::Stock,
            copies: STOCK_LABEL_COPIES,
            date: batch.date.to_string(),
            heading: format!("NF {}", batch.invoice_number),
            title: batch.supplier_name.clone(),
            reference: line.order_id.to_string(),
            code: line.code.clone(),
            description: line.description.clone(),
            address: line.address.clone(),
            quantity_line: format!("Quantidade: {} {}", whole(line.qty), line.unit_type),
            total_line: format!("Lote Total: {} {}", whole(line.qty_total), line.unit_type),
            qr_payload: format!("{};{}", line.code, whole(line.qty)),
        }
    }

    pub fn pending(material: &PendingMaterial) -> Self {
        Self {
            kind: LabelKind::Pending,
            copies: PENDING_LABEL_COPIES,
            date: String::new(),
            heading: material.op_number.clone(),
            title: material.product.clone(),
            reference: String::new(),
            code: material.code.clone(),
            description: String::new(),
            address: String::new(),
            quantity_line: format!("QUANTIDADE: {} UND", whole(material.pending_qty)),
            total_line: String::new(),
            qr_payload: String::new(),
        }
    }
}

/// 一个批次的全部标签：先待领料，后入库
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LabelManifest {
    pub entries: Vec<LabelEntry>,
}

impl LabelManifest {
    pub fn from_batch(batch: &Batch) -> Self {
        let pending = batch
            .pending_materials
            .iter()
            .filter(|m| !m.is_settled())
            .map(LabelEntry::pending);
        let stock = batch
            .orders
            .iter()
            .filter(|l| !l.is_exhausted())
            .map(|l| LabelEntry::stock(batch, l));

        Self {
            entries: pending.chain(stock).collect(),
        }
    }

    /// 需要打印的总页数
    pub fn page_count(&self) -> u32 {
        self.entries.iter().map(|e| e.copies).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut wtr = csv::Writer::from_writer(writer);
        for entry in &self.entries {
            wtr.serialize(entry)?;
        }
        wtr.flush()?;
        Ok(())
    }
}
