// ==========================================
// 线材事业部经营看板 - 应用层
// ==========================================
// 职责: 会话级状态（一次加载，只读共享）
// ==========================================

pub mod state;

// 重导出
pub use state::AppState;
