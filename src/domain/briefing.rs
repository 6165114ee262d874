// ==========================================
// 线材事业部经营看板 - 工厂简报
// ==========================================
// 职责: Key_Updates / Tactical_Action_Plan 的可渲染树
// 结构: 任意深度（文本 / 列表 / 嵌套条目）
// ==========================================

use crate::domain::kra::SummaryKpi;
use crate::domain::types::PlantKey;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "value")]
pub enum SectionValue {
    Text(String),
    Items(Vec<SectionValue>),
    Entries(Vec<SectionEntry>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionEntry {
    /// 显示标签（下划线已替换为空格）
    pub label: String,
    pub value: SectionValue,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub title: String,
    pub entries: Vec<SectionEntry>,
}

impl Section {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// 工厂关键动态
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KeyUpdates {
    pub highlights: Section,
    pub lowlights: Section,
}

/// 单工厂简报
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlantBriefing {
    pub plant: PlantKey,
    pub key_updates: Option<KeyUpdates>,
    pub tactical_plan: Option<Section>,
}

/// 经营汇总文档（Summary[0] + 分厂简报）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BusinessSummary {
    pub fiscal_year: Option<String>,
    pub kra_items: Vec<SummaryKpi>,
    pub briefings: Vec<PlantBriefing>,
}

impl BusinessSummary {
    pub fn briefing(&self, plant: PlantKey) -> Option<&PlantBriefing> {
        self.briefings.iter().find(|b| b.plant == plant)
    }
}
