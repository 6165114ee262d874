// ==========================================
// 线材事业部经营看板 - 领域类型定义
// ==========================================
// 职责: 固定工厂集合 + 状态标签色调
// 红线: 工厂集合固定为 3 个，不允许运行时扩展
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ==========================================
// 工厂 (Plant)
// ==========================================
// 数据源中同一工厂存在多种拼写（Bobbili / Bobilli），统一按别名匹配
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlantKey {
    Bobbili,
    Bokaro,
    Roopangarh,
}

impl PlantKey {
    /// 固定工厂集合（界面按钮顺序）
    pub const ALL: [PlantKey; 3] = [PlantKey::Bobbili, PlantKey::Bokaro, PlantKey::Roopangarh];

    /// 规范小写键（KRA 文档中的键名）
    pub fn key(&self) -> &'static str {
        match self {
            PlantKey::Bobbili => "bobbili",
            PlantKey::Bokaro => "bokaro",
            PlantKey::Roopangarh => "roopangarh",
        }
    }

    /// 显示名（首字母大写）
    pub fn display_name(&self) -> &'static str {
        match self {
            PlantKey::Bobbili => "Bobbili",
            PlantKey::Bokaro => "Bokaro",
            PlantKey::Roopangarh => "Roopangarh",
        }
    }

    /// 已知拼写变体（小写），第一个为规范键
    pub fn aliases(&self) -> &'static [&'static str] {
        match self {
            PlantKey::Bobbili => &["bobbili", "bobilli"],
            PlantKey::Bokaro => &["bokaro"],
            PlantKey::Roopangarh => &["roopangarh"],
        }
    }

    /// 按标签匹配工厂（TRIM + 忽略大小写 + 别名）
    ///
    /// # 返回
    /// - Some(PlantKey): 命中固定集合
    /// - None: 未知标签（调用方静默丢弃）
    pub fn from_label(label: &str) -> Option<PlantKey> {
        let normalized = label.trim().to_lowercase();
        PlantKey::ALL
            .into_iter()
            .find(|plant| plant.aliases().iter().any(|alias| *alias == normalized))
    }

    /// 小写字符串是否包含本工厂任一别名
    pub fn is_mentioned_in(&self, lowercase_text: &str) -> bool {
        self.aliases()
            .iter()
            .any(|alias| lowercase_text.contains(alias))
    }
}

/// 按别名反序列化工厂标签（供配置字段 deserialize_with 使用）
///
/// 接受任意大小写与已知拼写变体，如 "Bobilli" / "BOKARO"
pub fn deserialize_plant_label<'de, D>(deserializer: D) -> Result<PlantKey, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let label = String::deserialize(deserializer)?;
    PlantKey::from_label(&label)
        .ok_or_else(|| serde::de::Error::custom(format!("未知工厂: {}", label)))
}

impl fmt::Display for PlantKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for PlantKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PlantKey::from_label(s).ok_or_else(|| format!("未知工厂: {}", s))
    }
}

// ==========================================
// 状态色调 (Status Tone)
// ==========================================
// status_class 为开放集合：未登记的标签一律落到 Neutral
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StatusTone {
    Success,   // Done
    Warning,   // In Progress
    Attention, // On Hold
    Info,      // Quotation
    Ordered,   // Ordered
    Testing,   // Testing
    Neutral,   // Unknown 及其他
}

impl StatusTone {
    pub fn for_status(status_class: &str) -> StatusTone {
        match status_class {
            "Done" => StatusTone::Success,
            "In Progress" => StatusTone::Warning,
            "On Hold" => StatusTone::Attention,
            "Quotation" => StatusTone::Info,
            "Ordered" => StatusTone::Ordered,
            "Testing" => StatusTone::Testing,
            _ => StatusTone::Neutral,
        }
    }
}

impl fmt::Display for StatusTone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusTone::Success => write!(f, "SUCCESS"),
            StatusTone::Warning => write!(f, "WARNING"),
            StatusTone::Attention => write!(f, "ATTENTION"),
            StatusTone::Info => write!(f, "INFO"),
            StatusTone::Ordered => write!(f, "ORDERED"),
            StatusTone::Testing => write!(f, "TESTING"),
            StatusTone::Neutral => write!(f, "NEUTRAL"),
        }
    }
}
