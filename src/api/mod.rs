// ==========================================
// 线材事业部经营看板 - API 层
// ==========================================
// 职责: 向渲染外壳提供页面视图接口
// ==========================================

pub mod dashboard_api;
pub mod error;

// 重导出核心类型
pub use dashboard_api::{
    CapexColumnView, CapexItemView, CapexOverview, DashboardApi, HomeOverview, KpiCard,
    KraCard, KraDetail, KraOverview, MonthlyActual, WiresOverview, PLACEHOLDER,
};
pub use error::{ApiError, ApiResult};
