// ==========================================
// 线材事业部经营看板 - 资本开支/技改条目
// ==========================================
// 职责: 原始条目（全部字段可选）与规范化条目
// 红线: 规范化只补 serial_number，其余字段原样透传
// ==========================================

use crate::domain::types::StatusTone;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// status_class 缺失时的分组标签
pub const UNKNOWN_STATUS: &str = "Unknown";

/// 迷你卡片描述截断长度（字符数）
pub const SHORT_DESCRIPTION_CHARS: usize = 36;

// ==========================================
// RawPlantRecord - 原始条目
// ==========================================
/// 来自 capex 文档的原始条目
///
/// 已知字段仅在类型为字符串时提取；类型不符的值留在 `extra` 中，
/// 保证畸形行原样保留而不被拒绝。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawPlantRecord {
    /// 原始序号（可能缺失、为 0、负数或非数字）
    pub serial_number: Option<Value>,
    pub description: Option<String>,
    pub completion_target: Option<String>,
    pub status_class: Option<String>,
    pub remarks: Option<String>,
    /// 其余字段（含类型不符的已知字段）
    pub extra: Map<String, Value>,
}

// ==========================================
// CanonicalCapexItem - 规范化条目
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalCapexItem {
    /// 序号（>= 1），同一工厂内允许重复
    pub serial_number: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completion_target: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_class: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CanonicalCapexItem {
    /// 由原始条目构造（serial_number 已由规范化器确定）
    pub fn from_raw(raw: RawPlantRecord, serial_number: u64) -> Self {
        Self {
            serial_number,
            description: raw.description,
            completion_target: raw.completion_target,
            status_class: raw.status_class,
            remarks: raw.remarks,
            extra: raw.extra,
        }
    }

    /// 分组/筛选使用的状态标签（缺失时为 Unknown）
    pub fn status_label(&self) -> &str {
        self.status_class.as_deref().unwrap_or(UNKNOWN_STATUS)
    }

    pub fn tone(&self) -> StatusTone {
        StatusTone::for_status(self.status_label())
    }

    /// 迷你卡片描述：超过 36 个字符时截断并追加 "..."
    pub fn short_description(&self) -> String {
        let description = self.description.as_deref().unwrap_or_default();
        if description.chars().count() > SHORT_DESCRIPTION_CHARS {
            let head: String = description.chars().take(SHORT_DESCRIPTION_CHARS).collect();
            format!("{}...", head)
        } else {
            description.to_string()
        }
    }
}
