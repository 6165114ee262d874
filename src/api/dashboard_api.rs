// ==========================================
// 线材事业部经营看板 - 看板 API
// ==========================================
// 职责: 基于只读快照组装各页面视图（首页 / capex / KRA / 线材产销）
// 架构: API 层 → Engine 层（纯函数） → Domain 快照
// 红线: 不修改快照；缺失数据返回占位，不报错
// ==========================================

use std::sync::Arc;

use chrono::{Local, NaiveDate};
use serde::Serialize;
use tracing::instrument;

use crate::api::error::{ApiError, ApiResult};
use crate::domain::briefing::PlantBriefing;
use crate::domain::capex::CanonicalCapexItem;
use crate::domain::kra::{KraEntry, FISCAL_MONTH_LABELS};
use crate::domain::snapshot::DashboardSnapshot;
use crate::domain::types::{PlantKey, StatusTone};
use crate::engine::capex_view::{
    capex_stats, filter_items, index_by_serial, status_board, status_options, status_tally,
    CapexStats, StatusCount,
};
use crate::engine::derivation::{achievement_percent, estimate_progress, extract_totals, find_kpi};
use crate::engine::production_view::{
    achievement_chart, dispatch_chart, production_chart, AchievementPoint, DispatchPoint,
    ProductionPoint,
};

/// 缺失值显示占位符
pub const PLACEHOLDER: &str = "-";

/// 首页 KPI 卡片（标题, 描述前缀）
pub const HOME_KPIS: [(&str, &str); 4] = [
    ("Production", "production"),
    ("Dispatches", "dispatches"),
    ("Working Capital", "working capital"),
    ("Revenue", "revenue"),
];

// ==========================================
// 视图 DTO
// ==========================================

/// KPI 卡片（合计 + 达成率）
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KpiCard {
    pub title: String,
    pub unit: String,
    pub target_ytd: Option<f64>,
    pub actual_ytd: Option<f64>,
    /// None → 显示占位符
    pub achievement: Option<f64>,
}

/// 首页概览
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HomeOverview {
    pub plant: PlantKey,
    pub fiscal_year: Option<String>,
    pub kpis: Vec<KpiCard>,
    pub briefing: Option<PlantBriefing>,
}

/// capex 列表/看板中的单条目
///
/// 原始条目整体嵌套在 item 下，透传字段不会与派生字段重名
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CapexItemView {
    pub item: CanonicalCapexItem,
    pub status: String,
    pub short_description: String,
    /// 近似进度（由完成时间文本估算）
    pub progress: u8,
    pub tone: StatusTone,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CapexColumnView {
    pub status: String,
    pub tone: StatusTone,
    pub items: Vec<CapexItemView>,
}

/// capex 页面
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CapexOverview {
    pub plant: PlantKey,
    pub query: String,
    pub status_filter: String,
    /// 下拉选项（"All" 在首位）
    pub status_options: Vec<String>,
    pub stats: CapexStats,
    /// 基于未筛选集合
    pub tally: Vec<StatusCount>,
    pub items: Vec<CapexItemView>,
    /// 基于未筛选集合
    pub board: Vec<CapexColumnView>,
}

/// KRA 卡片
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KraCard {
    pub id: String,
    pub title: String,
    pub target_fy: Option<f64>,
    pub target_ytd: Option<f64>,
    pub actual_ytd: Option<f64>,
    pub month_target_sep: Option<f64>,
    pub achievement: Option<f64>,
}

/// KRA 页面
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KraOverview {
    pub plant: PlantKey,
    pub cards: Vec<KraCard>,
    pub tech_upgrades: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyActual {
    pub label: String,
    pub value: Option<f64>,
}

/// KRA 明细面板（标量已格式化，缺失为占位符）
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KraDetail {
    pub plant: PlantKey,
    pub id: String,
    pub title: String,
    pub target_fy: String,
    pub target_ytd: String,
    pub actual_ytd: String,
    pub month_target_sep: String,
    pub achievement: String,
    pub monthly: Vec<MonthlyActual>,
    pub remark: String,
}

/// 线材产销页面
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WiresOverview {
    pub fiscal_year: Option<String>,
    pub kpis: Vec<KpiCard>,
    pub production_site: PlantKey,
    pub production: Vec<ProductionPoint>,
    pub dispatch_site: PlantKey,
    pub dispatch: Vec<DispatchPoint>,
    pub achievement: Vec<AchievementPoint>,
}

// ==========================================
// DashboardApi - 看板 API
// ==========================================

/// 看板API
///
/// 持有会话期只读快照；每次调用都从快照重新计算视图，
/// 相同输入（同一自然月内）返回相同结果。
pub struct DashboardApi {
    snapshot: Arc<DashboardSnapshot>,
}

impl DashboardApi {
    /// 创建新的DashboardApi实例
    ///
    /// # 参数
    /// - snapshot: 已加载的只读快照
    pub fn new(snapshot: Arc<DashboardSnapshot>) -> Self {
        Self { snapshot }
    }

    pub fn snapshot(&self) -> &DashboardSnapshot {
        &self.snapshot
    }

    /// 解析界面传入的工厂标签
    ///
    /// # 返回
    /// - Err(ApiError::InvalidInput): 不在固定工厂集合内
    pub fn parse_plant(label: &str) -> ApiResult<PlantKey> {
        PlantKey::from_label(label)
            .ok_or_else(|| ApiError::InvalidInput(format!("未知工厂: {}", label)))
    }

    // ==========================================
    // 首页
    // ==========================================

    /// 首页概览：财年 + 四张 KPI 卡 + 所选工厂简报
    #[instrument(skip(self))]
    pub fn home_overview(&self, plant: PlantKey) -> HomeOverview {
        HomeOverview {
            plant,
            fiscal_year: self.snapshot.summary.fiscal_year.clone(),
            kpis: self.kpi_cards(),
            briefing: self.snapshot.summary.briefing(plant).cloned(),
        }
    }

    fn kpi_cards(&self) -> Vec<KpiCard> {
        let items = &self.snapshot.summary.kra_items;

        HOME_KPIS
            .iter()
            .map(|(title, prefix)| {
                let totals = extract_totals(find_kpi(items, prefix));
                KpiCard {
                    title: title.to_string(),
                    achievement: achievement_percent(totals.actual_ytd, totals.target_ytd),
                    unit: totals.unit,
                    target_ytd: totals.target_ytd,
                    actual_ytd: totals.actual_ytd,
                }
            })
            .collect()
    }

    // ==========================================
    // capex / 技改
    // ==========================================

    /// capex 页面
    ///
    /// # 参数
    /// - query: 关键字（描述 / 备注 / 序号子串）
    /// - status_filter: 状态（"All" 关闭筛选）
    /// - today: 进度估算基准日
    #[instrument(skip(self))]
    pub fn capex_view(
        &self,
        plant: PlantKey,
        query: &str,
        status_filter: &str,
        today: NaiveDate,
    ) -> CapexOverview {
        let items = self.snapshot.capex_items(plant);
        let item_view = |item: &CanonicalCapexItem| Self::capex_item_view(item, today);

        let filtered: Vec<CapexItemView> = filter_items(items, query, status_filter)
            .into_iter()
            .map(item_view)
            .collect();

        let board = status_board(items)
            .into_iter()
            .map(|column| CapexColumnView {
                tone: StatusTone::for_status(&column.status),
                items: column.items.into_iter().map(item_view).collect(),
                status: column.status,
            })
            .collect();

        tracing::debug!("capex 视图: plant={}, 命中 {}/{}", plant, filtered.len(), items.len());

        CapexOverview {
            plant,
            query: query.to_string(),
            status_filter: status_filter.to_string(),
            status_options: status_options(items),
            stats: capex_stats(items),
            tally: status_tally(items),
            items: filtered,
            board,
        }
    }

    /// 以当前本地日期为进度基准的 capex 页面
    pub fn capex_view_now(
        &self,
        plant: PlantKey,
        query: &str,
        status_filter: &str,
    ) -> CapexOverview {
        self.capex_view(plant, query, status_filter, Local::now().date_naive())
    }

    /// 按序号查看单条目（展开面板）
    ///
    /// # 返回
    /// - Err(ApiError::NotFound): 该工厂下无此序号
    ///
    /// 序号重复时取源顺序中最后一条
    pub fn capex_item(
        &self,
        plant: PlantKey,
        serial_number: u64,
        today: NaiveDate,
    ) -> ApiResult<CapexItemView> {
        let index = index_by_serial(self.snapshot.capex_items(plant));
        index
            .get(&serial_number)
            .map(|item| Self::capex_item_view(item, today))
            .ok_or_else(|| {
                ApiError::NotFound(format!("capex(plant={}, serial_number={})", plant, serial_number))
            })
    }

    fn capex_item_view(item: &CanonicalCapexItem, today: NaiveDate) -> CapexItemView {
        CapexItemView {
            status: item.status_label().to_string(),
            short_description: item.short_description(),
            progress: estimate_progress(item.completion_target.as_deref(), today),
            tone: item.tone(),
            item: item.clone(),
        }
    }

    // ==========================================
    // KRA
    // ==========================================

    /// KRA 页面：所选工厂卡片 + 技改清单
    #[instrument(skip(self))]
    pub fn kra_view(&self, plant: PlantKey) -> KraOverview {
        KraOverview {
            plant,
            cards: self
                .snapshot
                .kra_entries(plant)
                .iter()
                .map(|entry| KraCard {
                    id: entry.id.clone(),
                    title: entry.title.clone(),
                    target_fy: entry.target_fy,
                    target_ytd: entry.target_ytd,
                    actual_ytd: entry.actual_ytd,
                    month_target_sep: entry.month_target_sep,
                    achievement: achievement_percent(entry.actual_ytd, entry.target_ytd),
                })
                .collect(),
            tech_upgrades: self.snapshot.tech_upgrades(plant).to_vec(),
        }
    }

    /// KRA 明细
    ///
    /// # 返回
    /// - Err(ApiError::NotFound): 该工厂下无此 id
    pub fn kra_detail(&self, plant: PlantKey, id: &str) -> ApiResult<KraDetail> {
        let entry = self
            .snapshot
            .kra_entries(plant)
            .iter()
            .find(|entry| entry.id == id)
            .ok_or_else(|| ApiError::NotFound(format!("KRA(plant={}, id={})", plant, id)))?;

        Ok(Self::detail_of(plant, entry))
    }

    fn detail_of(plant: PlantKey, entry: &KraEntry) -> KraDetail {
        KraDetail {
            plant,
            id: entry.id.clone(),
            title: entry.title.clone(),
            target_fy: display_number(entry.target_fy),
            target_ytd: display_number(entry.target_ytd),
            actual_ytd: display_number(entry.actual_ytd),
            month_target_sep: display_number(entry.month_target_sep),
            achievement: achievement_percent(entry.actual_ytd, entry.target_ytd)
                .map(|p| format!("{}%", p))
                .unwrap_or_else(|| PLACEHOLDER.to_string()),
            monthly: entry
                .months
                .iter()
                .enumerate()
                .map(|(index, value)| MonthlyActual {
                    label: fiscal_month_label(index),
                    value: *value,
                })
                .collect(),
            remark: entry
                .remark
                .as_deref()
                .filter(|r| !r.is_empty())
                .unwrap_or(PLACEHOLDER)
                .to_string(),
        }
    }

    // ==========================================
    // 线材产销
    // ==========================================

    /// 线材产销页面：KPI 卡 + 单厂产量 / 单厂发运 + 跨厂达成率
    #[instrument(skip(self))]
    pub fn wires_view(&self, production_site: PlantKey, dispatch_site: PlantKey) -> WiresOverview {
        let series = &self.snapshot.production;

        WiresOverview {
            fiscal_year: self.snapshot.summary.fiscal_year.clone(),
            kpis: self.kpi_cards(),
            production_site,
            production: production_chart(series, production_site),
            dispatch_site,
            dispatch: dispatch_chart(series, dispatch_site),
            achievement: achievement_chart(series),
        }
    }
}

/// 财年月份标签；超出 12 个标签时为 M<n>
fn fiscal_month_label(index: usize) -> String {
    FISCAL_MONTH_LABELS
        .get(index)
        .map(|label| label.to_string())
        .unwrap_or_else(|| format!("M{}", index + 1))
}

fn display_number(value: Option<f64>) -> String {
    value
        .map(|v| v.to_string())
        .unwrap_or_else(|| PLACEHOLDER.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::importer::document_loader::{DocumentLoader, RawDocuments};
    use serde_json::{json, Value};

    fn api() -> DashboardApi {
        let documents = RawDocuments {
            capex: json!({
                "bobbili": [
                    {"description": "Wire drawing machine", "status_class": "Done", "completion_target": "Done"},
                    {"description": "Galvanizing bath line with zinc recovery unit", "status_class": "In Progress", "completion_target": "Oct 2025", "serial_number": 12}
                ]
            }),
            kra: json!({
                "bobbili": [
                    {"id": "K1", "title": "Yield", "targetFY": 98.5, "targetYTD": 1950, "actualYTD": 1739, "months": [95, "96.5", null]},
                    {"id": "K2", "title": "Power"}
                ],
                "Technological_Upgradations_Bobilli": ["Install furnace"]
            }),
            summary: json!({
                "Summary": [{
                    "fiscal_year": "FY 2025-26",
                    "kra_items": [{
                        "description": "Production (MT)",
                        "unit": "MT",
                        "details": [
                            {"plant": "Bobilli", "target_ytd": 100, "actual_ytd": 90},
                            {"plant": "All Plants", "target_ytd": 1950, "actual_ytd": 1739}
                        ]
                    }]
                }]
            }),
            production: Value::Null,
        };
        let snapshot = DocumentLoader::new().build_snapshot(&documents);
        DashboardApi::new(Arc::new(snapshot))
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 9, 1).unwrap()
    }

    fn api_with(documents: RawDocuments) -> DashboardApi {
        DashboardApi::new(Arc::new(DocumentLoader::new().build_snapshot(&documents)))
    }

    #[test]
    fn test_parse_plant() {
        assert_eq!(DashboardApi::parse_plant(" Bobilli ").unwrap(), PlantKey::Bobbili);
        assert!(matches!(
            DashboardApi::parse_plant("Jamshedpur"),
            Err(ApiError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_home_overview_kpi卡片() {
        let overview = api().home_overview(PlantKey::Bobbili);
        assert_eq!(overview.fiscal_year.as_deref(), Some("FY 2025-26"));
        assert_eq!(overview.kpis.len(), 4);

        let production = &overview.kpis[0];
        assert_eq!(production.title, "Production");
        assert_eq!(production.achievement, Some(89.18));

        // 未找到的 KPI → 空合计 + 不可用达成率
        let revenue = &overview.kpis[3];
        assert_eq!(revenue.target_ytd, None);
        assert_eq!(revenue.achievement, None);
    }

    #[test]
    fn test_capex_view() {
        let view = api().capex_view(PlantKey::Bobbili, "zinc", "All", today());
        assert_eq!(view.items.len(), 1);
        assert_eq!(view.items[0].item.serial_number, 12);
        assert_eq!(view.items[0].progress, 40);
        assert_eq!(view.items[0].tone, StatusTone::Warning);
        assert!(view.items[0].short_description.ends_with("..."));

        // 统计与看板不受筛选影响
        assert_eq!(view.stats.total, 2);
        assert_eq!(view.board.len(), 2);
        assert_eq!(view.status_options, vec!["All", "Done", "In Progress"]);
    }

    #[test]
    fn test_capex_item_按序号_后者覆盖() {
        let api = api_with(RawDocuments {
            capex: json!({
                "bokaro": [
                    {"description": "First crane", "serial_number": 5, "status_class": "Done"},
                    {"description": "Pickling line", "serial_number": 6},
                    {"description": "Second crane", "serial_number": 5, "status_class": "Ordered"}
                ]
            }),
            ..RawDocuments::default()
        });

        let item = api.capex_item(PlantKey::Bokaro, 5, today()).unwrap();
        assert_eq!(item.item.description.as_deref(), Some("Second crane"));
        assert_eq!(item.tone, StatusTone::Ordered);

        assert!(matches!(
            api.capex_item(PlantKey::Bokaro, 99, today()),
            Err(ApiError::NotFound(_))
        ));
        assert!(api.capex_item(PlantKey::Bobbili, 5, today()).is_err());
    }

    #[test]
    fn test_capex_view_now_与指定日期一致() {
        let api = api();
        let now = api.capex_view_now(PlantKey::Bobbili, "", "All");
        let fixed = api.capex_view(
            PlantKey::Bobbili,
            "",
            "All",
            Local::now().date_naive(),
        );
        assert_eq!(now.items.len(), fixed.items.len());
        assert_eq!(now.tally, fixed.tally);
    }

    #[test]
    fn test_capex_item_透传字段不与派生字段冲突() {
        let api = api_with(RawDocuments {
            capex: json!({
                "bobbili": [
                    {"description": "Wire drawing", "status_class": "Done", "tone": "custom", "progress": "half"}
                ]
            }),
            ..RawDocuments::default()
        });

        let view = api.capex_view(PlantKey::Bobbili, "", "All", today());
        let text = serde_json::to_string(&view.items[0]).unwrap();
        assert_eq!(text.matches("\"tone\"").count(), 2);

        let value = serde_json::to_value(&view.items[0]).unwrap();
        assert_eq!(value["tone"], "SUCCESS");
        assert_eq!(value["status"], "Done");
        assert_eq!(value["progress"], 0);
        assert_eq!(value["item"]["tone"], "custom");
        assert_eq!(value["item"]["progress"], "half");
    }

    #[test]
    fn test_home_overview_dispatches前缀不误选() {
        let api = api_with(RawDocuments {
            summary: json!({
                "Summary": [{
                    "kra_items": [
                        {"description": "Dispatch plan adherence", "unit": "%", "details": [{"plant": "Total", "target_ytd": 100, "actual_ytd": 95}]},
                        {"description": "Dispatches", "unit": "MT", "details": [{"plant": "All Plants", "target_ytd": 1800, "actual_ytd": 1700}]}
                    ]
                }]
            }),
            ..RawDocuments::default()
        });

        let overview = api.home_overview(PlantKey::Bobbili);
        let dispatches = &overview.kpis[1];
        assert_eq!(dispatches.title, "Dispatches");
        assert_eq!(dispatches.unit, "MT");
        assert_eq!(dispatches.target_ytd, Some(1800.0));
    }

    #[test]
    fn test_capex_view_空工厂() {
        let view = api().capex_view(PlantKey::Roopangarh, "", "All", today());
        assert!(view.items.is_empty());
        assert_eq!(view.status_options, vec!["All"]);
    }

    #[test]
    fn test_kra_view() {
        let view = api().kra_view(PlantKey::Bobbili);
        assert_eq!(view.cards.len(), 2);
        assert_eq!(view.cards[0].achievement, Some(89.18));
        assert_eq!(view.cards[1].achievement, None);
        assert_eq!(view.tech_upgrades, vec!["Install furnace"]);
    }

    #[test]
    fn test_kra_detail_占位符() {
        let api = api();

        let detail = api.kra_detail(PlantKey::Bobbili, "K1").unwrap();
        assert_eq!(detail.actual_ytd, "1739");
        assert_eq!(detail.month_target_sep, PLACEHOLDER);
        assert_eq!(detail.remark, PLACEHOLDER);
        assert_eq!(detail.achievement, "89.18%");
        let labels: Vec<&str> = detail.monthly.iter().map(|m| m.label.as_str()).collect();
        assert_eq!(labels, vec!["Apr", "May", "Jun"]);
        assert_eq!(detail.monthly[1].value, Some(96.5));
        assert_eq!(detail.monthly[2].value, None);

        let detail = api.kra_detail(PlantKey::Bobbili, "K2").unwrap();
        assert_eq!(detail.achievement, PLACEHOLDER);
    }

    #[test]
    fn test_kra_detail_未找到() {
        let result = api().kra_detail(PlantKey::Bokaro, "K1");
        assert!(matches!(result, Err(ApiError::NotFound(_))));
    }

    #[test]
    fn test_fiscal_month_label() {
        assert_eq!(fiscal_month_label(0), "Apr");
        assert_eq!(fiscal_month_label(11), "Mar");
        assert_eq!(fiscal_month_label(12), "M13");
    }

    #[test]
    fn test_wires_view_空序列() {
        let view = api().wires_view(PlantKey::Bobbili, PlantKey::Bokaro);
        assert!(view.production.is_empty());
        assert!(view.dispatch.is_empty());
        assert_eq!(view.kpis.len(), 4);
    }
}
