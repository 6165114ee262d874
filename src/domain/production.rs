// ==========================================
// 线材事业部经营看板 - 月度产量/发运序列
// ==========================================
// 职责: 月度生产与发运时间序列（外部注入的只读数据）
// ==========================================

use crate::domain::types::PlantKey;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 目标/实绩对
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TargetActual {
    pub target: Option<f64>,
    pub actual: Option<f64>,
}

impl TargetActual {
    /// 目标 + 实绩（任一缺失按 0 计）
    pub fn sum(&self) -> f64 {
        self.target.unwrap_or(0.0) + self.actual.unwrap_or(0.0)
    }
}

/// 单工厂单月数据
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SiteMonth {
    pub target: Option<f64>,
    pub actual: Option<f64>,
    pub production_achievement_percent: Option<f64>,
    pub dispatches: TargetActual,
}

/// 集团内/外发运
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DespatchSplit {
    pub group: Option<f64>,
    pub outside: Option<f64>,
}

/// 月度记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyRecord {
    /// 月份标签（如 "Apr-25"）
    pub month: String,
    pub production: TargetActual,
    /// 按工厂归档；未知站点名在规范化时丢弃
    pub sites: BTreeMap<PlantKey, SiteMonth>,
    pub despatches: DespatchSplit,
}

/// 月度序列（按源顺序）
pub type ProductionSeries = Vec<MonthlyRecord>;
