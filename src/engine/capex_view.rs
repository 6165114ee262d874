// ==========================================
// 线材事业部经营看板 - capex 筛选/汇总视图
// ==========================================
// 职责: 关键字 + 状态筛选 / 状态下拉选项 / 状态计数 / 看板分组
// 红线: 保持源顺序，不修改输入
// ==========================================

use crate::domain::capex::CanonicalCapexItem;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use tracing::instrument;

/// "全部" 哨兵值：关闭状态筛选
pub const ALL_STATUSES: &str = "All";

pub const STATUS_DONE: &str = "Done";
pub const STATUS_IN_PROGRESS: &str = "In Progress";

// ==========================================
// 筛选
// ==========================================

/// 关键字 + 状态筛选
///
/// # 规则
/// - status_filter == "All" → 不按状态过滤；否则与 status_class 精确（区分大小写）比较
/// - query TRIM + 小写；空 → 全部命中
/// - 非空 → description / remarks 小写包含，或序号字符串包含（子串，不是数值相等）
#[instrument(skip(items), fields(count = items.len()))]
pub fn filter_items<'a>(
    items: &'a [CanonicalCapexItem],
    query: &str,
    status_filter: &str,
) -> Vec<&'a CanonicalCapexItem> {
    let query = query.trim().to_lowercase();

    items
        .iter()
        .filter(|item| status_filter == ALL_STATUSES || item.status_label() == status_filter)
        .filter(|item| matches_query(item, &query))
        .collect()
}

/// 单条目关键字匹配（query 已 TRIM + 小写）
pub fn matches_query(item: &CanonicalCapexItem, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }

    let contains = |text: &Option<String>| {
        text.as_deref()
            .map(|t| t.to_lowercase().contains(query))
            .unwrap_or(false)
    };

    contains(&item.description)
        || contains(&item.remarks)
        || item.serial_number.to_string().contains(query)
}

// ==========================================
// 状态选项 / 计数 / 看板
// ==========================================

/// 下拉选项: "All" + 去重排序后的状态
pub fn status_options(items: &[CanonicalCapexItem]) -> Vec<String> {
    let distinct: BTreeSet<&str> = items.iter().map(|item| item.status_label()).collect();

    std::iter::once(ALL_STATUSES.to_string())
        .chain(distinct.into_iter().map(str::to_string))
        .collect()
}

/// 状态计数（基于未筛选集合）
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusCount {
    pub status: String,
    pub count: usize,
}

/// 各状态条目数，按状态排序；计数之和等于集合长度
pub fn status_tally(items: &[CanonicalCapexItem]) -> Vec<StatusCount> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for item in items {
        *counts.entry(item.status_label()).or_insert(0) += 1;
    }

    counts
        .into_iter()
        .map(|(status, count)| StatusCount {
            status: status.to_string(),
            count,
        })
        .collect()
}

/// 看板列：一个状态一列，列内保持源顺序
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoardColumn<'a> {
    pub status: String,
    pub items: Vec<&'a CanonicalCapexItem>,
}

pub fn status_board(items: &[CanonicalCapexItem]) -> Vec<BoardColumn<'_>> {
    let mut columns: BTreeMap<&str, Vec<&CanonicalCapexItem>> = BTreeMap::new();
    for item in items {
        columns.entry(item.status_label()).or_default().push(item);
    }

    columns
        .into_iter()
        .map(|(status, items)| BoardColumn {
            status: status.to_string(),
            items,
        })
        .collect()
}

// ==========================================
// 概览统计
// ==========================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CapexStats {
    pub total: usize,
    pub completed: usize,
    pub in_progress: usize,
}

pub fn capex_stats(items: &[CanonicalCapexItem]) -> CapexStats {
    let count_of = |status: &str| items.iter().filter(|item| item.status_label() == status).count();

    CapexStats {
        total: items.len(),
        completed: count_of(STATUS_DONE),
        in_progress: count_of(STATUS_IN_PROGRESS),
    }
}

// ==========================================
// 按序号索引
// ==========================================

/// 按序号建索引；序号重复时后出现者覆盖（已知限制，源数据未去重）
pub fn index_by_serial(items: &[CanonicalCapexItem]) -> BTreeMap<u64, &CanonicalCapexItem> {
    let mut index = BTreeMap::new();
    for item in items {
        if index.insert(item.serial_number, item).is_some() {
            tracing::debug!("序号重复，后者覆盖: serial_number={}", item.serial_number);
        }
    }
    index
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Map;

    fn item(serial: u64, description: &str, status: Option<&str>, remarks: Option<&str>) -> CanonicalCapexItem {
        CanonicalCapexItem {
            serial_number: serial,
            description: Some(description.to_string()),
            completion_target: None,
            status_class: status.map(str::to_string),
            remarks: remarks.map(str::to_string),
            extra: Map::new(),
        }
    }

    fn sample() -> Vec<CanonicalCapexItem> {
        vec![
            item(1, "Wire drawing machine", Some("Done"), None),
            item(12, "Galvanizing bath", Some("In Progress"), Some("Zinc kettle ordered")),
            item(123, "Packing robot", Some("Quotation"), None),
            item(4, "Annealing furnace", None, Some("awaiting budget")),
        ]
    }

    #[test]
    fn test_filter_序号子串匹配() {
        let items = sample();
        let serials: Vec<u64> = filter_items(&items, "12", ALL_STATUSES)
            .iter()
            .map(|i| i.serial_number)
            .collect();
        assert_eq!(serials, vec![12, 123]);
    }

    #[test]
    fn test_filter_描述与备注() {
        let items = sample();
        assert_eq!(filter_items(&items, "  ZINC ", ALL_STATUSES).len(), 1);
        assert_eq!(filter_items(&items, "furnace", ALL_STATUSES)[0].serial_number, 4);
        assert_eq!(filter_items(&items, "", ALL_STATUSES).len(), 4);
    }

    #[test]
    fn test_filter_状态精确匹配() {
        let items = sample();
        assert_eq!(filter_items(&items, "", "Done").len(), 1);
        assert_eq!(filter_items(&items, "", "done").len(), 0);
        assert_eq!(filter_items(&items, "", "Unknown")[0].serial_number, 4);
        assert_eq!(filter_items(&items, "bath", "Done").len(), 0);
    }

    #[test]
    fn test_filter_保持顺序且幂等() {
        let items = sample();
        let before = items.clone();
        let first: Vec<u64> = filter_items(&items, "a", ALL_STATUSES).iter().map(|i| i.serial_number).collect();
        let second: Vec<u64> = filter_items(&items, "a", ALL_STATUSES).iter().map(|i| i.serial_number).collect();
        assert_eq!(first, second);
        assert_eq!(first, vec![1, 12, 123, 4]);
        assert_eq!(items, before);
    }

    #[test]
    fn test_status_options() {
        let options = status_options(&sample());
        assert_eq!(options, vec!["All", "Done", "In Progress", "Quotation", "Unknown"]);
        assert_eq!(status_options(&[]), vec!["All"]);
    }

    #[test]
    fn test_status_tally_完整性() {
        let items = sample();
        let tally = status_tally(&items);
        assert_eq!(tally.iter().map(|c| c.count).sum::<usize>(), items.len());
        assert_eq!(tally.len(), 4);
    }

    #[test]
    fn test_status_board_每条目恰好一列() {
        let mut items = sample();
        items.push(item(9, "Second done", Some("Done"), None));
        let board = status_board(&items);

        let placed: usize = board.iter().map(|col| col.items.len()).sum();
        assert_eq!(placed, items.len());

        let done = board.iter().find(|col| col.status == "Done").unwrap();
        let serials: Vec<u64> = done.items.iter().map(|i| i.serial_number).collect();
        assert_eq!(serials, vec![1, 9]);
    }

    #[test]
    fn test_capex_stats() {
        let stats = capex_stats(&sample());
        assert_eq!(stats, CapexStats { total: 4, completed: 1, in_progress: 1 });
    }

    #[test]
    fn test_index_by_serial_后者覆盖() {
        let items = vec![
            item(2, "first", None, None),
            item(2, "second", None, None),
            item(3, "third", None, None),
        ];
        let index = index_by_serial(&items);
        assert_eq!(index.len(), 2);
        assert_eq!(index[&2].description.as_deref(), Some("second"));
    }
}
