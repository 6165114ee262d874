// ==========================================
// 线材事业部经营看板 - 文档加载器
// ==========================================
// 职责: 读取四类源文档 → 规范化 → 只读快照
// 流程:
//   1. 读取 capex（JSON 或表格导出）/ KRA / 经营汇总 / 月度序列
//   2. RecordNormalizer / SummaryNormalizer 规范化
//   3. KeyResolver 解析各工厂技改清单
// ==========================================

use crate::config::DashboardConfig;
use crate::domain::snapshot::DashboardSnapshot;
use crate::domain::types::PlantKey;
use crate::importer::error::ImportResult;
use crate::importer::field_mapper::FieldMapper;
use crate::importer::file_parser::{JsonDocumentParser, UniversalFileParser};
use crate::importer::key_resolver::{normalize_tech_value, resolve_tech_key};
use crate::importer::record_normalizer::RecordNormalizer;
use crate::importer::summary_normalizer::SummaryNormalizer;
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::instrument;

/// 原始源文档（已解析为 JSON，尚未规范化）
#[derive(Debug, Clone, Default)]
pub struct RawDocuments {
    pub capex: Value,
    pub kra: Value,
    pub summary: Value,
    pub production: Value,
}

pub struct DocumentLoader {
    records: RecordNormalizer,
    summary: SummaryNormalizer,
}

impl Default for DocumentLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentLoader {
    pub fn new() -> Self {
        Self {
            records: RecordNormalizer::new(),
            summary: SummaryNormalizer::new(),
        }
    }

    /// 按配置读取源文档
    ///
    /// # 返回
    /// - Err: 文件存在但 JSON 语法错误 / 表格无法解析
    pub fn read_documents(&self, config: &DashboardConfig) -> ImportResult<RawDocuments> {
        let parser = JsonDocumentParser;

        let capex = match config.capex_sheet_path() {
            Some(sheet) => {
                tracing::info!("从表格导入 capex 清单: {}", sheet.display());
                let rows = UniversalFileParser.parse(&sheet)?;
                FieldMapper.map_sheet_rows(&rows)
            }
            None => parser.parse_document(&config.capex_path())?,
        };

        Ok(RawDocuments {
            capex,
            kra: parser.parse_document(&config.kra_path())?,
            summary: parser.parse_document(&config.summary_path())?,
            production: parser.parse_document(&config.production_path())?,
        })
    }

    /// 读取并规范化
    #[instrument(skip(self, config), fields(data_dir = %config.data_dir.display()))]
    pub fn load(&self, config: &DashboardConfig) -> ImportResult<DashboardSnapshot> {
        let documents = self.read_documents(config)?;
        Ok(self.build_snapshot(&documents))
    }

    /// 由已解析文档构造快照（纯函数，便于注入测试夹具）
    pub fn build_snapshot(&self, documents: &RawDocuments) -> DashboardSnapshot {
        let snapshot = DashboardSnapshot {
            capex: self.records.normalize_capex(&documents.capex),
            kra: self.records.normalize_kra(&documents.kra),
            tech_upgrades: self.tech_upgrades(&documents.kra),
            summary: self.summary.normalize_summary(&documents.summary),
            production: self.records.normalize_production_series(&documents.production),
        };

        tracing::info!(
            "快照构建完成: capex={}, kra={}, months={}",
            snapshot.capex.values().map(Vec::len).sum::<usize>(),
            snapshot.kra.values().map(Vec::len).sum::<usize>(),
            snapshot.production.len()
        );
        snapshot
    }

    /// 各工厂技改清单（未找到键 → 空序列）
    fn tech_upgrades(&self, kra_document: &Value) -> BTreeMap<PlantKey, Vec<String>> {
        let keys: Vec<String> = kra_document
            .as_object()
            .map(|doc| doc.keys().cloned().collect())
            .unwrap_or_default();

        PlantKey::ALL
            .into_iter()
            .map(|plant| {
                let items = resolve_tech_key(&keys, plant)
                    .map(|key| normalize_tech_value(kra_document.get(&key)))
                    .unwrap_or_default();
                (plant, items)
            })
            .collect()
    }
}
