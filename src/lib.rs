// ==========================================
// 线材事业部经营看板 - 核心库
// ==========================================
// 职责: 源文档规范化 + 派生指标 + 页面视图
// 技术栈: Rust + serde_json（只读、单会话）
// 系统定位: 报表展示的数据层（渲染外壳不在本库内）
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 导入层 - 外部文档
pub mod importer;

// 引擎层 - 派生指标与视图
pub mod engine;

// 配置层 - 数据位置
pub mod config;

// 日志系统
pub mod logging;

// API 层 - 页面视图
pub mod api;

// 应用层 - 会话状态
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{PlantKey, StatusTone};

// 领域实体
pub use domain::{
    BusinessSummary, CanonicalCapexItem, DashboardSnapshot, KpiDetail, KpiTotals, KraEntry,
    MonthlyRecord, PlantBriefing, RawPlantRecord, SummaryKpi,
};

// 导入
pub use importer::{DocumentLoader, ImportError, ImportResult};

// 配置
pub use config::DashboardConfig;

// API
pub use api::{ApiError, ApiResult, DashboardApi};

// 应用
pub use app::AppState;

// ==========================================
// 系统常量
// ==========================================

/// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// 系统名称
pub const APP_NAME: &str = "线材事业部经营看板";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
