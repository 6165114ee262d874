// ==========================================
// 线材事业部经营看板 - KRA 与汇总 KPI
// ==========================================
// 职责: 工厂 KRA 条目 / 汇总 KPI（含分厂明细与合计行）
// 红线: 加载后只读快照，不在原地修改
// ==========================================

use serde::{Deserialize, Serialize};

/// 财年月份标签（4 月起始）
pub const FISCAL_MONTH_LABELS: [&str; 12] = [
    "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec", "Jan", "Feb", "Mar",
];

/// 每个财年最多 12 个月度值
pub const MAX_FISCAL_MONTHS: usize = 12;

// ==========================================
// KraEntry - 工厂 KRA 条目
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KraEntry {
    pub id: String,
    pub title: String,
    #[serde(rename = "targetFY")]
    pub target_fy: Option<f64>,
    #[serde(rename = "targetYTD")]
    pub target_ytd: Option<f64>,
    #[serde(rename = "actualYTD")]
    pub actual_ytd: Option<f64>,
    #[serde(rename = "monthTargetSep")]
    pub month_target_sep: Option<f64>,
    /// 月度实绩（Apr..Mar），非数值项为 None
    #[serde(default)]
    pub months: Vec<Option<f64>>,
    pub remark: Option<String>,
}

// ==========================================
// SummaryKpi - 汇总 KPI
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryKpi {
    pub description: String,
    pub unit: String,
    #[serde(default)]
    pub details: Vec<KpiDetail>,
}

/// 分厂明细行（其中一行为跨厂合计）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KpiDetail {
    pub plant: Option<String>,
    pub target_ytd: Option<f64>,
    pub actual_ytd: Option<f64>,
}

impl KpiDetail {
    /// 是否为合计行（plant 含 "all plants" 或 "total"，忽略大小写）
    pub fn is_total_row(&self) -> bool {
        self.plant
            .as_deref()
            .map(|p| {
                let lower = p.to_lowercase();
                lower.contains("all plants") || lower.contains("total")
            })
            .unwrap_or(false)
    }
}

/// 合计提取结果：缺失项保持 None，不报错
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KpiTotals {
    pub target_ytd: Option<f64>,
    pub actual_ytd: Option<f64>,
    pub unit: String,
}
