// ==========================================
// 线材事业部经营看板 - 命令行入口
// ==========================================
// 用法: wires-dashboard [配置文件.json]
// 输出: 首页概览 + 各工厂 capex/KRA 视图 + 线材产销视图（JSON，stdout）
// ==========================================

use anyhow::Context;
use serde::Serialize;
use wires_dashboard::api::{CapexOverview, HomeOverview, KraOverview, WiresOverview};
use wires_dashboard::engine::ALL_STATUSES;
use wires_dashboard::{logging, AppState, DashboardConfig, PlantKey};

#[derive(Serialize)]
struct PlantReport {
    capex: CapexOverview,
    kra: KraOverview,
}

#[derive(Serialize)]
struct DashboardReport {
    version: &'static str,
    home: HomeOverview,
    wires: WiresOverview,
    plants: Vec<PlantReport>,
}

fn main() -> anyhow::Result<()> {
    // 初始化日志系统
    logging::init();

    tracing::info!("==================================================");
    tracing::info!("{}", wires_dashboard::APP_NAME);
    tracing::info!("系统版本: {}", wires_dashboard::VERSION);
    tracing::info!("==================================================");

    let config = match std::env::args().nth(1) {
        Some(path) => DashboardConfig::load(&path)
            .with_context(|| format!("无法加载配置文件: {}", path))?,
        None => DashboardConfig::default(),
    };

    let state = AppState::new(config).context("无法初始化AppState")?;
    let api = &state.dashboard_api;
    let selected = state.selected_plant;

    let report = DashboardReport {
        version: wires_dashboard::VERSION,
        home: api.home_overview(selected),
        wires: api.wires_view(selected, selected),
        plants: PlantKey::ALL
            .into_iter()
            .map(|plant| PlantReport {
                capex: api.capex_view_now(plant, "", ALL_STATUSES),
                kra: api.kra_view(plant),
            })
            .collect(),
    };

    let output = serde_json::to_string_pretty(&report).context("视图序列化失败")?;
    println!("{}", output);

    Ok(())
}
