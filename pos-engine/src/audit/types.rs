//! 审计日志类型定义
//!
//! 每条记录不可变；列表有界（最新在前）。

use serde::{Deserialize, Serialize};
use shared::types::{Actor, Unit};

/// One immutable audit record of a stock mutation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuditEntry {
    /// 全局递增序列号（唯一标识）
    pub id: u64,
    /// 时间戳（Unix 毫秒）
    pub timestamp: i64,
    pub item_name: String,
    /// Category of the item ("side", "raw", "pantry", ...)
    pub category: String,
    /// Signed quantity change
    pub delta: f64,
    pub unit: Unit,
    /// Free-text note describing the triggering action
    pub note: String,
    pub actor: Actor,
    /// Links entries created by one logical transaction
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_id: Option<String>,
    /// Optional attachment reference
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// A rendered audit transaction: either a lone entry or a collapsed group.
///
/// The triggering note is shown once; each sub-delta beneath it.
#[derive(Debug, Clone, Serialize)]
pub struct AuditTransaction {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_id: Option<String>,
    pub note: String,
    pub timestamp: i64,
    pub actor: Actor,
    pub entries: Vec<AuditEntry>,
}
