// ==========================================
// 线材事业部经营看板 - 领域模型层
// ==========================================
// 职责: 定义领域实体与类型
// 红线: 不含文件读取逻辑,不含派生计算
// ==========================================

pub mod briefing;
pub mod capex;
pub mod kra;
pub mod production;
pub mod snapshot;
pub mod types;

// 重导出核心类型
pub use briefing::{BusinessSummary, KeyUpdates, PlantBriefing, Section, SectionEntry, SectionValue};
pub use capex::{CanonicalCapexItem, RawPlantRecord, UNKNOWN_STATUS};
pub use kra::{KpiDetail, KpiTotals, KraEntry, SummaryKpi, FISCAL_MONTH_LABELS};
pub use production::{DespatchSplit, MonthlyRecord, ProductionSeries, SiteMonth, TargetActual};
pub use snapshot::DashboardSnapshot;
pub use types::{PlantKey, StatusTone};
