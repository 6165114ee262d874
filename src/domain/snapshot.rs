// ==========================================
// 线材事业部经营看板 - 只读数据快照
// ==========================================
// 职责: 会话期内一次加载、不再修改的全部规范化数据
// 红线: 视图只读取快照，从不原地修改
// ==========================================

use crate::domain::briefing::BusinessSummary;
use crate::domain::capex::CanonicalCapexItem;
use crate::domain::kra::KraEntry;
use crate::domain::production::ProductionSeries;
use crate::domain::types::PlantKey;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardSnapshot {
    pub capex: BTreeMap<PlantKey, Vec<CanonicalCapexItem>>,
    pub kra: BTreeMap<PlantKey, Vec<KraEntry>>,
    pub tech_upgrades: BTreeMap<PlantKey, Vec<String>>,
    pub summary: BusinessSummary,
    pub production: ProductionSeries,
}

impl DashboardSnapshot {
    pub fn capex_items(&self, plant: PlantKey) -> &[CanonicalCapexItem] {
        self.capex.get(&plant).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn kra_entries(&self, plant: PlantKey) -> &[KraEntry] {
        self.kra.get(&plant).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn tech_upgrades(&self, plant: PlantKey) -> &[String] {
        self.tech_upgrades.get(&plant).map(Vec::as_slice).unwrap_or(&[])
    }
}
