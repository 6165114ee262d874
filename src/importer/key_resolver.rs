// ==========================================
// 线材事业部经营看板 - 键名解析器
// ==========================================
// 职责: 在命名不统一的文档键中定位工厂技改清单 / 工厂简报
// 规则: 有序规则表，命中即返回，后续规则短路
//   1) 含技改标识 且 含工厂名
//   2) 仅含技改标识（按输入顺序取第一个）
//   3) 精确候选键名
//   4) 均未命中 → None（调用方按"无数据"处理）
// ==========================================

use crate::domain::types::PlantKey;
use serde_json::Value;

/// 技改标识子串（小写）
pub const TECH_INDICATORS: [&str; 11] = [
    "technological_upgrad",
    "technologicalupgrad",
    "tech_upgrad",
    "techupgrade",
    "tech_upgradations",
    "technological upgrad",
    "technologicalupgradations",
    "technology_upgrad",
    "technology_upgradations",
    "tech_upgradations",
    "technological_upgradations",
];

/// 精确候选键名前缀
const CANDIDATE_PREFIXES: [&str; 3] = ["Technological", "Tech", "Technology"];

/// 键名解析规则
pub struct ResolveRule {
    pub name: &'static str,
    pub apply: fn(&[String], PlantKey) -> Option<String>,
}

/// 技改键解析规则（按优先级排列）
pub const TECH_KEY_RULES: [ResolveRule; 3] = [
    ResolveRule {
        name: "indicator_and_plant",
        apply: match_indicator_and_plant,
    },
    ResolveRule {
        name: "indicator_only",
        apply: match_indicator_only,
    },
    ResolveRule {
        name: "exact_candidate",
        apply: match_exact_candidate,
    },
];

fn has_tech_indicator(lowercase_key: &str) -> bool {
    TECH_INDICATORS
        .iter()
        .any(|indicator| lowercase_key.contains(indicator))
}

fn match_indicator_and_plant(keys: &[String], plant: PlantKey) -> Option<String> {
    keys.iter()
        .find(|key| {
            let lower = key.to_lowercase();
            has_tech_indicator(&lower) && plant.is_mentioned_in(&lower)
        })
        .cloned()
}

fn match_indicator_only(keys: &[String], _plant: PlantKey) -> Option<String> {
    keys.iter()
        .find(|key| has_tech_indicator(&key.to_lowercase()))
        .cloned()
}

fn match_exact_candidate(keys: &[String], plant: PlantKey) -> Option<String> {
    candidate_keys(plant)
        .into_iter()
        .find(|candidate| keys.contains(candidate))
}

/// 精确候选键名：{Technological,Tech,Technology}_Upgradations_{显示名, 各别名}
pub fn candidate_keys(plant: PlantKey) -> Vec<String> {
    let mut names = vec![plant.display_name().to_string()];
    names.extend(plant.aliases().iter().map(|alias| alias.to_string()));

    CANDIDATE_PREFIXES
        .iter()
        .flat_map(|prefix| {
            names
                .iter()
                .map(move |name| format!("{}_Upgradations_{}", prefix, name))
        })
        .collect()
}

/// 解析工厂技改清单所在键
pub fn resolve_tech_key(all_keys: &[String], plant: PlantKey) -> Option<String> {
    for rule in TECH_KEY_RULES.iter() {
        if let Some(key) = (rule.apply)(all_keys, plant) {
            tracing::debug!("技改键命中: plant={}, rule={}, key={}", plant, rule.name, key);
            return Some(key);
        }
    }
    tracing::debug!("技改键未找到: plant={}", plant);
    None
}

/// 解析工厂简报键（如 Key_Updates_Bobilli / Tactical_Action_Plan_Bokaro）
///
/// 前缀忽略大小写；后缀按工厂别名匹配；按输入顺序取第一个
pub fn resolve_plant_section_key(all_keys: &[String], prefix: &str, plant: PlantKey) -> Option<String> {
    let prefix_lower = prefix.to_lowercase();
    all_keys
        .iter()
        .find(|key| {
            let lower = key.to_lowercase();
            lower
                .strip_prefix(&prefix_lower)
                .and_then(PlantKey::from_label)
                .map(|p| p == plant)
                .unwrap_or(false)
        })
        .cloned()
}

// ==========================================
// 技改值规范化
// ==========================================

/// 分隔符规则（按优先级）：换行 → 分号 → 逗号
const SPLIT_DELIMITERS: [char; 3] = ['\n', ';', ','];

/// 技改值 → 有序显示文本序列
///
/// # 规则
/// - 缺失 / null / false / 0 / 空串 → 空序列
/// - 数组 → 各元素文本
/// - 字符串 → 依次按换行、分号、逗号切分，切出 >= 2 个非空段才采用；否则整体 TRIM 作为单元素
/// - 对象 → 各值文本（按源顺序）
/// - 其他 → 空序列
pub fn normalize_tech_value(value: Option<&Value>) -> Vec<String> {
    let Some(value) = value else {
        return Vec::new();
    };

    match value {
        Value::Null | Value::Bool(false) => Vec::new(),
        Value::Number(n) if n.as_f64().map(|f| f == 0.0).unwrap_or(false) => Vec::new(),
        Value::String(s) if s.is_empty() => Vec::new(),
        Value::Array(items) => items.iter().map(display_text).collect(),
        Value::String(s) => split_text(s),
        Value::Object(map) => map.values().map(display_text).collect(),
        _ => Vec::new(),
    }
}

fn split_text(text: &str) -> Vec<String> {
    for delimiter in SPLIT_DELIMITERS {
        let segments: Vec<String> = text
            .split(delimiter)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
        if segments.len() >= 2 {
            return segments;
        }
    }
    vec![text.trim().to_string()]
}

/// JSON 值的显示文本
pub fn display_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        Value::Array(items) => items.iter().map(display_text).collect::<Vec<_>>().join(","),
        other => other.to_string(),
    }
}
