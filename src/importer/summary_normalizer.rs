// ==========================================
// 线材事业部经营看板 - 经营汇总文档规范化
// ==========================================
// 职责: Summary[0].kra_items + 财年标签 + 分厂简报
// 输入: Summary / Key_Updates_<Plant> / Tactical_Action_Plan_<Plant>
// ==========================================

use crate::domain::briefing::{
    BusinessSummary, KeyUpdates, PlantBriefing, Section, SectionEntry, SectionValue,
};
use crate::domain::kra::SummaryKpi;
use crate::domain::types::PlantKey;
use crate::importer::field_mapper::FieldMapper;
use crate::importer::key_resolver::resolve_plant_section_key;
use serde_json::{Map, Value};
use tracing::instrument;

pub const KEY_UPDATES_PREFIX: &str = "Key_Updates_";
pub const TACTICAL_PLAN_PREFIX: &str = "Tactical_Action_Plan_";

const HIGHLIGHT_KEYS: [&str; 2] = ["Highlight", "Highlights"];
const LOWLIGHT_KEYS: [&str; 2] = ["Lowlight", "Lowlights"];
const FISCAL_YEAR_KEYS: [&str; 5] = ["fiscal_year", "financial_year", "fy", "FY", "year"];

pub struct SummaryNormalizer {
    mapper: FieldMapper,
}

impl Default for SummaryNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl SummaryNormalizer {
    pub fn new() -> Self {
        Self {
            mapper: FieldMapper,
        }
    }

    /// 规范化经营汇总文档
    ///
    /// 任一部分缺失或形状不符均降级为空，不报错
    #[instrument(skip(self, raw_document))]
    pub fn normalize_summary(&self, raw_document: &Value) -> BusinessSummary {
        let empty = Map::new();
        let document = raw_document.as_object().unwrap_or(&empty);

        // Summary 为数组，首元素承载 kra_items 与财年标签
        let head = document
            .get("Summary")
            .and_then(Value::as_array)
            .and_then(|rows| rows.first())
            .and_then(Value::as_object);

        let (fiscal_year, kra_items) = match head {
            Some(head) => {
                let items: Vec<SummaryKpi> = head
                    .get("kra_items")
                    .and_then(Value::as_array)
                    .map(|items| {
                        items
                            .iter()
                            .filter_map(|item| self.mapper.map_summary_kpi(item))
                            .collect()
                    })
                    .unwrap_or_default();
                (self.mapper.get_text(head, &FISCAL_YEAR_KEYS), items)
            }
            None => {
                tracing::warn!("经营汇总文档缺少 Summary[0]，KPI 卡片按空处理");
                (None, Vec::new())
            }
        };

        let keys: Vec<String> = document.keys().cloned().collect();
        let briefings = PlantKey::ALL
            .into_iter()
            .map(|plant| PlantBriefing {
                plant,
                key_updates: self.key_updates(document, &keys, plant),
                tactical_plan: resolve_plant_section_key(&keys, TACTICAL_PLAN_PREFIX, plant)
                    .and_then(|key| document.get(&key))
                    .and_then(|value| build_section("Tactical Action Plan", value)),
            })
            .collect();

        tracing::info!("经营汇总规范化完成: {} 个 KPI", kra_items.len());
        BusinessSummary {
            fiscal_year,
            kra_items,
            briefings,
        }
    }

    fn key_updates(&self, document: &Map<String, Value>, keys: &[String], plant: PlantKey) -> Option<KeyUpdates> {
        let key = resolve_plant_section_key(keys, KEY_UPDATES_PREFIX, plant)?;
        let Some(updates) = document.get(&key).and_then(Value::as_object) else {
            tracing::warn!("{} 不是对象，视为缺失", key);
            return None;
        };

        let section = |title: &str, aliases: &[&str]| {
            self.mapper
                .first_present(updates, aliases)
                .and_then(|value| build_section(title, value))
                .unwrap_or_else(|| Section {
                    title: title.to_string(),
                    entries: Vec::new(),
                })
        };

        Some(KeyUpdates {
            highlights: section("Highlight", &HIGHLIGHT_KEYS[..]),
            lowlights: section("Lowlight", &LOWLIGHT_KEYS[..]),
        })
    }
}

/// 映射/数组 → 可渲染段落；其他形状 → None
pub fn build_section(title: &str, value: &Value) -> Option<Section> {
    let entries = match value {
        Value::Object(map) => map
            .iter()
            .map(|(key, v)| SectionEntry {
                label: display_label(key),
                value: build_value(v),
            })
            .collect(),
        Value::Array(items) => items
            .iter()
            .enumerate()
            .map(|(idx, v)| SectionEntry {
                label: (idx + 1).to_string(),
                value: build_value(v),
            })
            .collect(),
        _ => return None,
    };

    Some(Section {
        title: title.to_string(),
        entries,
    })
}

/// 任意深度的值 → 渲染树
pub fn build_value(value: &Value) -> SectionValue {
    match value {
        Value::String(s) => SectionValue::Text(s.clone()),
        Value::Null => SectionValue::Text(String::new()),
        Value::Array(items) => SectionValue::Items(items.iter().map(build_value).collect()),
        Value::Object(map) => SectionValue::Entries(
            map.iter()
                .map(|(key, v)| SectionEntry {
                    label: display_label(key),
                    value: build_value(v),
                })
                .collect(),
        ),
        other => SectionValue::Text(other.to_string()),
    }
}

/// 显示标签：下划线替换为空格
pub fn display_label(key: &str) -> String {
    key.replace('_', " ")
}
