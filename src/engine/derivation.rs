// ==========================================
// 线材事业部经营看板 - 派生指标引擎
// ==========================================
// 职责: 达成率 / 进度估算 / KPI 合计提取
// 红线: 缺失输入 → None（显示占位符），不返回 0 冒充结果
// ==========================================

use crate::domain::kra::{KpiDetail, KpiTotals, SummaryKpi};
use chrono::{Datelike, NaiveDate};

/// 月份缩写（索引 + 1 即月份号）
const MONTH_ABBREVIATIONS: [&str; 12] = [
    "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
];

// ==========================================
// 达成率
// ==========================================

/// 达成率（百分比，保留 2 位小数）
///
/// # 规则
/// - target 为 None / 0 / NaN 或 actual 为 None → None
/// - 否则 round(actual / target * 10000) / 100
pub fn achievement_percent(actual: Option<f64>, target: Option<f64>) -> Option<f64> {
    let target = target.filter(|t| *t != 0.0 && !t.is_nan())?;
    let actual = actual?;
    Some(((actual / target) * 10000.0).round() / 100.0)
}

// ==========================================
// 进度估算（近似值，非真实完成度）
// ==========================================

/// 由自由文本完成时间估算进度
///
/// 规则（顺序执行，命中即返回）:
/// 1) 缺失或空串 → 0
/// 2) 含 "done" 或 "tbd"（忽略大小写）→ 100
/// 3) 找不到月份缩写 → 30
/// 4) 月份 == 当前月 → 60
/// 5) 月份 == 当前月 + 1 → 40（12 月不回绕到 1 月）
/// 6) 月份 < 当前月 → 80
/// 7) 其他（更远的未来）→ 20
///
/// 注意: 依赖 today，跨月调用结果不同
pub fn estimate_progress(completion_target: Option<&str>, today: NaiveDate) -> u8 {
    let text = match completion_target {
        Some(t) if !t.is_empty() => t.to_lowercase(),
        _ => return 0,
    };

    if text.contains("done") || text.contains("tbd") {
        return 100;
    }

    let Some(month) = find_month(&text) else {
        return 30;
    };

    let current = today.month();
    if month == current {
        60
    } else if month == current + 1 {
        40
    } else if month < current {
        80
    } else {
        20
    }
}

/// 最左侧出现的月份缩写 → 月份号（1-12）
fn find_month(lowercase_text: &str) -> Option<u32> {
    lowercase_text
        .char_indices()
        .find_map(|(pos, _)| {
            MONTH_ABBREVIATIONS
                .iter()
                .position(|abbr| lowercase_text[pos..].starts_with(abbr))
        })
        .map(|idx| idx as u32 + 1)
}

// ==========================================
// KPI 合计提取
// ==========================================

/// 定位合计行：plant 含 "all plants" / "total"，否则取最后一行
pub fn total_row(kpi: &SummaryKpi) -> Option<&KpiDetail> {
    kpi.details
        .iter()
        .find(|detail| detail.is_total_row())
        .or_else(|| kpi.details.last())
}

/// 提取合计（target_ytd / actual_ytd / unit），缺失项保持 None
pub fn extract_totals(kpi: Option<&SummaryKpi>) -> KpiTotals {
    let Some(kpi) = kpi else {
        return KpiTotals::default();
    };

    let row = total_row(kpi);
    KpiTotals {
        target_ytd: row.and_then(|r| r.target_ytd),
        actual_ytd: row.and_then(|r| r.actual_ytd),
        unit: kpi.unit.clone(),
    }
}

/// 按描述前缀查找 KPI（忽略大小写）
pub fn find_kpi<'a>(items: &'a [SummaryKpi], description_prefix: &str) -> Option<&'a SummaryKpi> {
    let prefix = description_prefix.to_lowercase();
    items
        .iter()
        .find(|kpi| kpi.description.to_lowercase().starts_with(&prefix))
}
