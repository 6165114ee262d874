// ==========================================
// 线材事业部经营看板 - 应用状态
// ==========================================
// 职责: 会话开始时加载一次数据，之后只读共享给各页面
// 红线: 会话期内不重新加载、不修改快照
// ==========================================

use std::sync::Arc;

use crate::api::DashboardApi;
use crate::config::DashboardConfig;
use crate::domain::snapshot::DashboardSnapshot;
use crate::domain::types::PlantKey;
use crate::importer::{DocumentLoader, ImportResult};

/// 应用状态
///
/// 包含配置、只读快照与 API 实例
pub struct AppState {
    /// 启动配置
    pub config: DashboardConfig,

    /// 当前选中工厂（界面单一所有者）
    pub selected_plant: PlantKey,

    /// 只读快照
    pub snapshot: Arc<DashboardSnapshot>,

    /// 看板API
    pub dashboard_api: Arc<DashboardApi>,
}

impl AppState {
    /// 创建新的AppState实例
    ///
    /// # 参数
    /// - config: 看板配置
    ///
    /// # 返回
    /// - Err(ImportError): 源文档语法错误 / 表格无法解析
    pub fn new(config: DashboardConfig) -> ImportResult<Self> {
        tracing::info!("初始化AppState，数据目录: {}", config.data_dir.display());

        let snapshot = DocumentLoader::new().load(&config)?;
        let state = Self::from_snapshot(config, snapshot);

        tracing::info!("AppState初始化完成");
        Ok(state)
    }

    /// 由已构建的快照创建（测试/嵌入场景）
    pub fn from_snapshot(config: DashboardConfig, snapshot: DashboardSnapshot) -> Self {
        let snapshot = Arc::new(snapshot);
        let dashboard_api = Arc::new(DashboardApi::new(snapshot.clone()));

        Self {
            selected_plant: config.default_plant,
            config,
            snapshot,
            dashboard_api,
        }
    }

    /// 切换选中工厂
    pub fn select_plant(&mut self, plant: PlantKey) {
        tracing::debug!("切换工厂: {} → {}", self.selected_plant, plant);
        self.selected_plant = plant;
    }
}
