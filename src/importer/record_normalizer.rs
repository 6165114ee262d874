// ==========================================
// 线材事业部经营看板 - 记录规范化器
// ==========================================
// 职责: 原始分组文档 → 按工厂归档的规范化集合
// 红线: 宽松导入，不抛错
//   - 未知工厂键静默丢弃
//   - 固定工厂集合全部存在（缺失补空序列）
//   - 形状不符（期望数组却是对象等）视为键缺失
// ==========================================

use crate::domain::capex::CanonicalCapexItem;
use crate::domain::kra::KraEntry;
use crate::domain::production::ProductionSeries;
use crate::domain::types::PlantKey;
use crate::importer::field_mapper::FieldMapper;
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::instrument;

/// 按工厂归档的集合
pub type PlantCollections<T> = BTreeMap<PlantKey, Vec<T>>;

pub struct RecordNormalizer {
    mapper: FieldMapper,
}

impl Default for RecordNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordNormalizer {
    pub fn new() -> Self {
        Self {
            mapper: FieldMapper,
        }
    }

    // ==========================================
    // capex 文档
    // ==========================================

    /// 规范化 capex 文档
    ///
    /// # 规则
    /// 1. 顶层键 TRIM + 忽略大小写匹配固定工厂（含别名）
    /// 2. 值必须是数组，否则视为缺失
    /// 3. serial_number 缺失或非正整数 → 源序列中 1 起始的位置
    /// 4. 同一工厂出现多个分组键时，后出现者覆盖
    #[instrument(skip(self, raw_groups))]
    pub fn normalize_capex(&self, raw_groups: &Value) -> PlantCollections<CanonicalCapexItem> {
        self.normalize_groups(raw_groups, "capex", |items| {
            items
                .iter()
                .enumerate()
                .map(|(idx, value)| {
                    let raw = self.mapper.map_raw_plant_record(value);
                    let serial = derive_serial_number(raw.serial_number.as_ref(), idx);
                    CanonicalCapexItem::from_raw(raw, serial)
                })
                .collect()
        })
    }

    // ==========================================
    // KRA 文档
    // ==========================================

    /// 规范化 KRA 文档（工厂键 → KRA 条目数组）
    ///
    /// 文档中的其他键（如技改清单）不在此处处理，由 KeyResolver 解析
    #[instrument(skip(self, raw_document))]
    pub fn normalize_kra(&self, raw_document: &Value) -> PlantCollections<KraEntry> {
        self.normalize_groups(raw_document, "kra", |items| {
            items
                .iter()
                .enumerate()
                .map(|(idx, value)| self.mapper.map_kra_entry(value, idx + 1))
                .collect()
        })
    }

    // ==========================================
    // 月度产量/发运序列
    // ==========================================

    /// 规范化月度序列（非数组 → 空序列；无效月份记录跳过）
    #[instrument(skip(self, raw_series))]
    pub fn normalize_production_series(&self, raw_series: &Value) -> ProductionSeries {
        let Some(records) = raw_series.as_array() else {
            if !raw_series.is_null() {
                tracing::warn!("月度序列不是数组，按空序列处理");
            }
            return Vec::new();
        };

        let series: ProductionSeries = records
            .iter()
            .filter_map(|value| {
                let record = self.mapper.map_monthly_record(value);
                if record.is_none() {
                    tracing::debug!("月度记录缺少 month 或形状不符，跳过: {}", value);
                }
                record
            })
            .collect();

        tracing::info!("月度序列规范化完成: {} 个月", series.len());
        series
    }

    // ==========================================
    // 内部: 分组归档
    // ==========================================

    fn normalize_groups<T, F>(&self, raw: &Value, document: &str, map_items: F) -> PlantCollections<T>
    where
        F: Fn(&[Value]) -> Vec<T>,
    {
        let mut normalized: PlantCollections<T> = BTreeMap::new();

        match raw.as_object() {
            Some(groups) => {
                for (key, value) in groups {
                    let Some(plant) = PlantKey::from_label(key) else {
                        tracing::debug!("{} 文档: 非工厂键，忽略: {}", document, key);
                        continue;
                    };
                    let Some(items) = value.as_array() else {
                        tracing::warn!("{} 文档: 工厂 {} 的值不是数组，视为缺失", document, key);
                        continue;
                    };
                    if normalized.contains_key(&plant) {
                        tracing::warn!("{} 文档: 工厂 {} 存在重复分组键 {}，后者覆盖", document, plant, key);
                    }
                    normalized.insert(plant, map_items(items.as_slice()));
                }
            }
            None => {
                if !raw.is_null() {
                    tracing::warn!("{} 文档顶层不是对象，全部工厂按空集合处理", document);
                }
            }
        }

        // 保证固定工厂集合全部存在
        for plant in PlantKey::ALL {
            normalized.entry(plant).or_default();
        }

        for (plant, items) in &normalized {
            tracing::debug!("{} 文档: {} → {} 条", document, plant, items.len());
        }
        normalized
    }
}

/// 序号派生：正整数原样保留，否则取 1 起始位置
pub fn derive_serial_number(raw: Option<&Value>, index: usize) -> u64 {
    let fallback = index as u64 + 1;
    let Some(Value::Number(n)) = raw else {
        return fallback;
    };

    if let Some(serial) = n.as_u64() {
        return if serial >= 1 { serial } else { fallback };
    }

    match n.as_f64() {
        Some(f) if f >= 1.0 && f.fract() == 0.0 && f <= u64::MAX as f64 => f as u64,
        _ => fallback,
    }
}
