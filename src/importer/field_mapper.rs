// ==========================================
// 线材事业部经营看板 - 字段映射器实现
// ==========================================
// 职责: 松散 JSON / 表格行 → 部分记录（全部字段可选）
// 规则: 别名按优先级依次取第一个非 null 值；类型不符视为缺失
// ==========================================

use crate::domain::capex::RawPlantRecord;
use crate::domain::kra::{KpiDetail, KraEntry, SummaryKpi, MAX_FISCAL_MONTHS};
use crate::domain::production::{DespatchSplit, MonthlyRecord, SiteMonth, TargetActual};
use crate::domain::types::PlantKey;
use serde_json::{Map, Number, Value};
use std::collections::{BTreeMap, HashMap};

/// capex 条目的已知字段
const CAPEX_TEXT_FIELDS: [&str; 4] = ["description", "completion_target", "status_class", "remarks"];

pub struct FieldMapper;

impl FieldMapper {
    // ==========================================
    // 通用取值
    // ==========================================

    /// 按别名顺序取第一个非 null 值
    pub fn first_present<'a>(&self, obj: &'a Map<String, Value>, aliases: &[&str]) -> Option<&'a Value> {
        aliases
            .iter()
            .filter_map(|alias| obj.get(*alias))
            .find(|v| !v.is_null())
    }

    /// 提取字符串字段（非字符串视为缺失）
    pub fn get_text(&self, obj: &Map<String, Value>, aliases: &[&str]) -> Option<String> {
        self.first_present(obj, aliases)
            .and_then(Value::as_str)
            .map(str::to_string)
    }

    /// 提取数值字段（非数值视为缺失，不做字符串转换）
    pub fn get_number(&self, obj: &Map<String, Value>, aliases: &[&str]) -> Option<f64> {
        self.first_present(obj, aliases).and_then(Value::as_f64)
    }

    // ==========================================
    // capex 条目
    // ==========================================

    /// 原始 capex 条目
    ///
    /// 非对象行 → 全部字段缺失的空记录（仍参与序号派生）
    pub fn map_raw_plant_record(&self, value: &Value) -> RawPlantRecord {
        let Some(obj) = value.as_object() else {
            tracing::debug!("capex 条目不是对象，按空记录保留: {}", value);
            return RawPlantRecord::default();
        };

        let mut record = RawPlantRecord::default();
        for (key, field) in obj {
            if field.is_null() {
                continue;
            }
            match (key.as_str(), field) {
                ("serial_number", _) => record.serial_number = Some(field.clone()),
                ("description", Value::String(s)) => record.description = Some(s.clone()),
                ("completion_target", Value::String(s)) => record.completion_target = Some(s.clone()),
                ("status_class", Value::String(s)) => record.status_class = Some(s.clone()),
                ("remarks", Value::String(s)) => record.remarks = Some(s.clone()),
                _ => {
                    if CAPEX_TEXT_FIELDS.contains(&key.as_str()) {
                        tracing::debug!("字段 {} 类型不符，原样保留: {}", key, field);
                    }
                    record.extra.insert(key.clone(), field.clone());
                }
            }
        }
        record
    }

    // ==========================================
    // KRA 条目
    // ==========================================

    /// KRA 条目（position 为 1 起始的源位置，用于缺失 id 的兜底）
    pub fn map_kra_entry(&self, value: &Value, position: usize) -> KraEntry {
        let empty = Map::new();
        let obj = value.as_object().unwrap_or(&empty);

        let id = match self.first_present(obj, &["id"]) {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            _ => position.to_string(),
        };

        let mut months: Vec<Option<f64>> = obj
            .get("months")
            .and_then(Value::as_array)
            .map(|items| items.iter().map(|m| self.month_value(m)).collect())
            .unwrap_or_default();
        if months.len() > MAX_FISCAL_MONTHS {
            tracing::warn!("KRA {} 月度值超过 12 个，截断: {}", id, months.len());
            months.truncate(MAX_FISCAL_MONTHS);
        }

        KraEntry {
            title: self.get_text(obj, &["title"]).unwrap_or_default(),
            target_fy: self.get_number(obj, &["targetFY", "target_fy"]),
            target_ytd: self.get_number(obj, &["targetYTD", "target_ytd"]),
            actual_ytd: self.get_number(obj, &["actualYTD", "actual_ytd"]),
            month_target_sep: self.get_number(obj, &["monthTargetSep", "month_target_sep"]),
            months,
            remark: self.get_text(obj, &["remark", "remarks"]),
            id,
        }
    }

    /// 月度值：数值直接取；数值字符串按浮点解析；其他为 None
    fn month_value(&self, value: &Value) -> Option<f64> {
        match value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
            _ => None,
        }
    }

    // ==========================================
    // 汇总 KPI
    // ==========================================

    /// 汇总 KPI（非对象 → None）
    pub fn map_summary_kpi(&self, value: &Value) -> Option<SummaryKpi> {
        let obj = value.as_object()?;
        let details = obj
            .get("details")
            .and_then(Value::as_array)
            .map(|rows| rows.iter().map(|row| self.map_kpi_detail(row)).collect())
            .unwrap_or_default();

        Some(SummaryKpi {
            description: self.get_text(obj, &["description"]).unwrap_or_default(),
            unit: self.get_text(obj, &["unit"]).unwrap_or_default(),
            details,
        })
    }

    /// 分厂明细行：snake_case 优先，camelCase 兜底
    pub fn map_kpi_detail(&self, value: &Value) -> KpiDetail {
        let empty = Map::new();
        let obj = value.as_object().unwrap_or(&empty);
        KpiDetail {
            plant: self.get_text(obj, &["plant"]),
            target_ytd: self.get_number(obj, &["target_ytd", "targetYTD"]),
            actual_ytd: self.get_number(obj, &["actual_ytd", "actualYTD"]),
        }
    }

    // ==========================================
    // 月度产量/发运
    // ==========================================

    /// 月度记录（非对象或缺少 month → None）
    pub fn map_monthly_record(&self, value: &Value) -> Option<MonthlyRecord> {
        let obj = value.as_object()?;
        let month = self.get_text(obj, &["month"])?;

        let mut sites = BTreeMap::new();
        if let Some(site_map) = obj.get("sites").and_then(Value::as_object) {
            for (name, site) in site_map {
                match PlantKey::from_label(name) {
                    Some(plant) => {
                        sites.insert(plant, self.map_site_month(site));
                    }
                    None => tracing::debug!("未知站点，丢弃: month={}, site={}", month, name),
                }
            }
        }

        let despatches = obj
            .get("despatches")
            .and_then(Value::as_object)
            .map(|d| DespatchSplit {
                group: self.get_number(d, &["group"]),
                outside: self.get_number(d, &["outside"]),
            })
            .unwrap_or_default();

        Some(MonthlyRecord {
            production: self.map_target_actual(obj.get("production")),
            sites,
            despatches,
            month,
        })
    }

    fn map_site_month(&self, value: &Value) -> SiteMonth {
        let empty = Map::new();
        let obj = value.as_object().unwrap_or(&empty);
        SiteMonth {
            target: self.get_number(obj, &["target"]),
            actual: self.get_number(obj, &["actual"]),
            production_achievement_percent: self.get_number(obj, &["production_achievement_percent"]),
            dispatches: self.map_target_actual(obj.get("dispatches")),
        }
    }

    fn map_target_actual(&self, value: Option<&Value>) -> TargetActual {
        match value.and_then(Value::as_object) {
            Some(obj) => TargetActual {
                target: self.get_number(obj, &["target"]),
                actual: self.get_number(obj, &["actual"]),
            },
            None => TargetActual::default(),
        }
    }

    // ==========================================
    // 表格导出 → capex 文档
    // ==========================================

    /// 表格行转换为 capex 原始文档（工厂列 → 条目数组）
    ///
    /// # 规则
    /// - 列名忽略大小写，支持常见别名
    /// - 序号列为正整数时写为数值，否则省略（交由规范化器按位置派生）
    /// - 工厂列按别名解析，统一归入规范键（拼写不同的行合并到同一分组）
    /// - 缺少工厂列或工厂未知的行丢弃
    pub fn map_sheet_rows(&self, rows: &[HashMap<String, String>]) -> Value {
        let mut document = Map::new();

        for (idx, row) in rows.iter().enumerate() {
            let Some(label) = self.sheet_cell(row, &["plant", "plant name", "site", "工厂"]) else {
                tracing::warn!("表格第 {} 行缺少工厂列，丢弃", idx + 2);
                continue;
            };
            let Some(plant) = PlantKey::from_label(&label) else {
                tracing::warn!("表格第 {} 行工厂未知，丢弃: {}", idx + 2, label);
                continue;
            };

            let mut item = Map::new();
            if let Some(serial) = self
                .sheet_cell(row, &["serial_number", "s.no", "s no", "sr no", "序号"])
                .and_then(|s| s.parse::<u64>().ok())
            {
                item.insert("serial_number".to_string(), Value::Number(Number::from(serial)));
            }

            let text_columns: [(&str, &[&str]); 4] = [
                ("description", &["description", "project", "项目"]),
                ("completion_target", &["completion_target", "completion target", "target", "完成时间"]),
                ("status_class", &["status_class", "status", "状态"]),
                ("remarks", &["remarks", "remark", "备注"]),
            ];
            for (field, aliases) in text_columns {
                if let Some(text) = self.sheet_cell(row, aliases) {
                    item.insert(field.to_string(), Value::String(text));
                }
            }

            match document.get_mut(plant.key()) {
                Some(Value::Array(items)) => items.push(Value::Object(item)),
                _ => {
                    document.insert(plant.key().to_string(), Value::Array(vec![Value::Object(item)]));
                }
            }
        }

        Value::Object(document)
    }

    /// 表格单元格（列名忽略大小写，空值视为缺失）
    fn sheet_cell(&self, row: &HashMap<String, String>, aliases: &[&str]) -> Option<String> {
        aliases.iter().find_map(|alias| {
            row.iter()
                .find(|(header, _)| header.trim().eq_ignore_ascii_case(alias))
                .map(|(_, value)| value.trim())
                .filter(|value| !value.is_empty())
                .map(str::to_string)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_map_raw_plant_record_类型不符原样保留() {
        let value = json!({
            "serial_number": "7",
            "description": 42,
            "status_class": "Done",
            "owner": "Maintenance"
        });
        let record = FieldMapper.map_raw_plant_record(&value);

        assert_eq!(record.serial_number, Some(json!("7")));
        assert_eq!(record.description, None);
        assert_eq!(record.status_class.as_deref(), Some("Done"));
        assert_eq!(record.extra.get("description"), Some(&json!(42)));
        assert_eq!(record.extra.get("owner"), Some(&json!("Maintenance")));
    }

    #[test]
    fn test_map_raw_plant_record_非对象() {
        let record = FieldMapper.map_raw_plant_record(&json!("stray text"));
        assert_eq!(record, RawPlantRecord::default());
    }

    #[test]
    fn test_map_kra_entry_缺失字段() {
        let value = json!({
            "id": 3,
            "title": "Power consumption",
            "targetYTD": 1950,
            "months": [320, "315.5", null, "n/a"]
        });
        let entry = FieldMapper.map_kra_entry(&value, 1);

        assert_eq!(entry.id, "3");
        assert_eq!(entry.target_ytd, Some(1950.0));
        assert_eq!(entry.actual_ytd, None);
        assert_eq!(entry.months, vec![Some(320.0), Some(315.5), None, None]);
        assert_eq!(entry.remark, None);
    }

    #[test]
    fn test_map_kra_entry_月度值截断() {
        let months: Vec<i32> = (1..=14).collect();
        let entry = FieldMapper.map_kra_entry(&json!({ "months": months }), 5);
        assert_eq!(entry.id, "5");
        assert_eq!(entry.months.len(), MAX_FISCAL_MONTHS);
    }

    #[test]
    fn test_map_kpi_detail_snake_case优先() {
        let detail = FieldMapper.map_kpi_detail(&json!({
            "plant": "All Plants Total",
            "target_ytd": 100,
            "targetYTD": 999,
            "actualYTD": 88
        }));
        assert_eq!(detail.target_ytd, Some(100.0));
        assert_eq!(detail.actual_ytd, Some(88.0));
    }

    #[test]
    fn test_map_monthly_record_未知站点丢弃() {
        let record = FieldMapper
            .map_monthly_record(&json!({
                "month": "Apr-25",
                "production": { "target": 4290, "actual": 4043 },
                "sites": {
                    "Bobbili": { "target": 1950, "actual": 1739, "dispatches": { "target": 653, "actual": 720 } },
                    "Hosur": { "target": 1 }
                },
                "despatches": { "group": 2263, "outside": 1076 }
            }))
            .unwrap();

        assert_eq!(record.sites.len(), 1);
        let bobbili = &record.sites[&PlantKey::Bobbili];
        assert_eq!(bobbili.dispatches.actual, Some(720.0));
        assert_eq!(record.despatches.outside, Some(1076.0));
    }

    #[test]
    fn test_map_sheet_rows() {
        let mut row1 = HashMap::new();
        row1.insert("Plant".to_string(), "Bokaro".to_string());
        row1.insert("S.No".to_string(), "4".to_string());
        row1.insert("Description".to_string(), "Annealing furnace".to_string());
        row1.insert("Status".to_string(), "Done".to_string());

        let mut row2 = HashMap::new();
        row2.insert("Plant".to_string(), "Bokaro".to_string());
        row2.insert("S.No".to_string(), "x".to_string());
        row2.insert("Description".to_string(), "Crane".to_string());

        let mut orphan = HashMap::new();
        orphan.insert("Description".to_string(), "No plant".to_string());

        let document = FieldMapper.map_sheet_rows(&[row1, row2, orphan]);
        let items = document["bokaro"].as_array().unwrap();

        assert_eq!(items.len(), 2);
        assert_eq!(items[0]["serial_number"], 4);
        assert_eq!(items[0]["status_class"], "Done");
        assert!(items[1].get("serial_number").is_none());
        assert_eq!(document.as_object().unwrap().len(), 1);
    }

    fn sheet_row(plant: &str, description: &str) -> HashMap<String, String> {
        let mut row = HashMap::new();
        row.insert("Plant".to_string(), plant.to_string());
        row.insert("Description".to_string(), description.to_string());
        row
    }

    #[test]
    fn test_map_sheet_rows_工厂拼写合并() {
        let rows = [
            sheet_row("Bobbili", "A"),
            sheet_row("Bobilli", "B"),
            sheet_row("BOKARO", "C"),
            sheet_row("Bokaro", "D"),
            sheet_row("Hosur", "E"),
        ];
        let document = FieldMapper.map_sheet_rows(&rows);

        // 未知工厂丢弃；别名/大小写归入同一规范键
        assert_eq!(document.as_object().unwrap().len(), 2);
        let descriptions = |key: &str| -> Vec<String> {
            document[key]
                .as_array()
                .unwrap()
                .iter()
                .map(|item| item["description"].as_str().unwrap().to_string())
                .collect()
        };
        assert_eq!(descriptions("bobbili"), vec!["A", "B"]);
        assert_eq!(descriptions("bokaro"), vec!["C", "D"]);

        let collections = crate::importer::record_normalizer::RecordNormalizer::new().normalize_capex(&document);
        assert_eq!(collections[&PlantKey::Bobbili].len(), 2);
        assert_eq!(collections[&PlantKey::Bokaro].len(), 2);
    }
}
