use crate::models::{OrderLine, PendingMaterial, ReconcileStats};
use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

/// 待领料遇到已耗尽 (qty == 0) 的订单行时的处理方式
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExhaustedLinePolicy {
    /// 待领料视为无法满足，直接清零并停止匹配 (随后被过滤)
    #[default]
    Absorb,
    /// 跳过该订单行，继续匹配同编码的下一行
    Skip,
}

/// 对账结果：存活的订单行、存活的待领料、统计
#[derive(Debug, Clone, PartialEq)]
pub struct Reconciliation {
    pub orders: Vec<OrderLine>,
    pub pending_materials: Vec<PendingMaterial>,
    pub stats: ReconcileStats,
}

/// 对账器：按物料编码把待领料与订单行对冲
///
/// 纯同步、无 I/O；只修改传入的记录。
#[derive(Debug, Clone, Copy, Default)]
pub struct Reconciler {
    policy: ExhaustedLinePolicy,
}

impl Reconciler {
    pub fn new(policy: ExhaustedLinePolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> ExhaustedLinePolicy {
        self.policy
    }

    pub fn reconcile(
        &self,
        mut orders: Vec<OrderLine>,
        mut pending: Vec<PendingMaterial>,
    ) -> Reconciliation {
        let mut stats = ReconcileStats {
            orders_in: orders.len(),
            pending_in: pending.len(),
            ..Default::default()
        };

        // 1. 按缺料登记日期升序 (稳定排序, 同日保持原顺序)
        pending.sort_by_key(|m| m.creation_date.date());

        // 2. 物料编码 -> 订单行下标 (保持原列表顺序)
        let mut lines_by_code: IndexMap<String, Vec<usize>> = IndexMap::new();
        for (idx, line) in orders.iter().enumerate() {
            lines_by_code.entry(line.code.clone()).or_default().push(idx);
        }

        // 3. 匹配与截断
        let mut matched_codes: IndexSet<&str> = IndexSet::new();
        for material in pending.iter_mut() {
            let Some((_, code, line_ids)) = lines_by_code.get_full(material.code.as_str()) else {
                tracing::debug!("待领料 {} 编码 {} 无对应订单行", material.op_number, material.code);
                stats.unmatched_pending += 1;
                continue;
            };
            matched_codes.insert(code.as_str());

            for &idx in line_ids {
                if material.is_settled() {
                    break;
                }

                let line = &mut orders[idx];
                if line.is_exhausted() {
                    match self.policy {
                        ExhaustedLinePolicy::Absorb => {
                            tracing::debug!(
                                "订单行 {} 编码 {} 已耗尽, 待领料 {} 清零 (原 {})",
                                line.order_id, line.code, material.op_number, material.pending_qty
                            );
                            material.pending_qty = 0.0;
                            stats.absorbed_pending += 1;
                            break;
                        }
                        ExhaustedLinePolicy::Skip => continue,
                    }
                }

                let effective = material.pending_qty.min(line.qty);
                line.qty -= effective;
                material.pending_qty -= effective;
                stats.netted_qty += effective;

                tracing::debug!(
                    "编码 {}: 订单 {} 扣减 {}, 剩余 {}; 待领料 {} 剩余 {}",
                    line.code, line.order_id, effective, line.qty, material.op_number, material.pending_qty
                );
            }
        }
        stats.matched_codes = matched_codes.len();

        // 4. 过滤数量为 0 的记录
        pending.retain(|m| m.pending_qty > 0.0);
        orders.retain(|l| l.qty > 0.0);

        stats.orders_out = orders.len();
        stats.pending_out = pending.len();

        Reconciliation {
            orders,
            pending_materials: pending,
            stats,
        }
    }
}

/// 以默认策略 ([`ExhaustedLinePolicy::Absorb`]) 对账
pub fn reconcile(orders: Vec<OrderLine>, pending: Vec<PendingMaterial>) -> Reconciliation {
    Reconciler::default().reconcile(orders, pending)
}
