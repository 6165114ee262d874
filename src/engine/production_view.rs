// ==========================================
// 线材事业部经营看板 - 产量/发运图表数据
// ==========================================
// 职责: 月度序列 → 单厂产量、单厂发运（堆叠）、跨厂达成率折线
// 输入: 外部注入的月度序列（不在此处硬编码）
// ==========================================

use crate::domain::production::{MonthlyRecord, SiteMonth};
use crate::domain::types::PlantKey;
use serde::Serialize;
use std::collections::BTreeMap;

/// 单厂产量（柱状图一点）
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductionPoint {
    pub month: String,
    pub target: Option<f64>,
    pub actual: Option<f64>,
}

/// 单厂发运（堆叠柱一点，total = target + actual）
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DispatchPoint {
    pub month: String,
    pub target: Option<f64>,
    pub actual: Option<f64>,
    pub total: f64,
}

/// 跨厂达成率（折线一点）
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AchievementPoint {
    pub month: String,
    pub by_plant: BTreeMap<PlantKey, Option<f64>>,
}

fn site<'a>(record: &'a MonthlyRecord, plant: PlantKey) -> Option<&'a SiteMonth> {
    record.sites.get(&plant)
}

/// 单厂月度产量；某月缺少该厂数据时目标/实绩为 None
pub fn production_chart(series: &[MonthlyRecord], plant: PlantKey) -> Vec<ProductionPoint> {
    series
        .iter()
        .map(|record| {
            let site = site(record, plant);
            ProductionPoint {
                month: record.month.clone(),
                target: site.and_then(|s| s.target),
                actual: site.and_then(|s| s.actual),
            }
        })
        .collect()
}

/// 单厂月度发运
pub fn dispatch_chart(series: &[MonthlyRecord], plant: PlantKey) -> Vec<DispatchPoint> {
    series
        .iter()
        .map(|record| {
            let dispatches = site(record, plant).map(|s| s.dispatches).unwrap_or_default();
            DispatchPoint {
                month: record.month.clone(),
                target: dispatches.target,
                actual: dispatches.actual,
                total: dispatches.sum(),
            }
        })
        .collect()
}

/// 各厂月度产量达成率
pub fn achievement_chart(series: &[MonthlyRecord]) -> Vec<AchievementPoint> {
    series
        .iter()
        .map(|record| AchievementPoint {
            month: record.month.clone(),
            by_plant: PlantKey::ALL
                .into_iter()
                .map(|plant| {
                    let percent = site(record, plant).and_then(|s| s.production_achievement_percent);
                    (plant, percent)
                })
                .collect(),
        })
        .collect()
}
