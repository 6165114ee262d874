// ==========================================
// 线材事业部经营看板 - 引擎层
// ==========================================
// 职责: 派生指标与筛选/汇总视图（纯函数）
// 红线: 不读文件, 不修改输入, 缺失输入返回占位而非报错
// ==========================================

pub mod capex_view;
pub mod derivation;
pub mod production_view;

// 重导出核心函数
pub use capex_view::{
    capex_stats, filter_items, index_by_serial, status_board, status_options, status_tally,
    BoardColumn, CapexStats, StatusCount, ALL_STATUSES,
};
pub use derivation::{
    achievement_percent, estimate_progress, extract_totals, find_kpi, total_row,
};
pub use production_view::{
    achievement_chart, dispatch_chart, production_chart, AchievementPoint, DispatchPoint,
    ProductionPoint,
};
