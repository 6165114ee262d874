// ==========================================
// 线材事业部经营看板 - 配置层
// ==========================================
// 职责: 看板配置加载,支持文件 / 环境变量 / 默认值
// ==========================================

pub mod dashboard_config;

// 重导出核心配置
pub use dashboard_config::{config_keys, get_default_data_dir, DashboardConfig, DATA_DIR_ENV};
