//! Derived views over a BOM snapshot: cost by category and top services.
//!
//! Everything here is recomputed from the slice on each call.

use crate::domain::model::{BomItem, ServiceCategory};
use serde::Serialize;

pub const DEFAULT_TOP_N: usize = 5;
pub const DEFAULT_LABEL_MAX_LEN: usize = 15;
const ELLIPSIS: &str = "...";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotal {
    pub category: ServiceCategory,
    pub subtotal: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryShare {
    pub category: ServiceCategory,
    pub subtotal: f64,
    pub percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CostBar {
    pub label: String,
    pub cost: f64,
}

/// Subtotals per category, in order of each category's first appearance.
pub fn group_by_category(items: &[BomItem]) -> Vec<CategoryTotal> {
    let mut groups: Vec<CategoryTotal> = Vec::new();
    for item in items {
        match groups.iter_mut().find(|g| g.category == item.category()) {
            Some(group) => group.subtotal += item.total_monthly_cost(),
            None => groups.push(CategoryTotal {
                category: item.category(),
                subtotal: item.total_monthly_cost(),
            }),
        }
    }
    groups
}

/// Category subtotals with their percentage of the overall total.
pub fn category_share(items: &[BomItem]) -> Vec<CategoryShare> {
    let groups = group_by_category(items);
    let total: f64 = groups.iter().map(|g| g.subtotal).sum();
    groups
        .into_iter()
        .map(|g| CategoryShare {
            category: g.category,
            subtotal: g.subtotal,
            percent: if total > 0.0 {
                g.subtotal / total * 100.0
            } else {
                0.0
            },
        })
        .collect()
}

/// The `n` most expensive items, ties kept in registry order.
pub fn top_by_cost(items: &[BomItem], n: usize) -> Vec<CostBar> {
    top_by_cost_with_label_len(items, n, DEFAULT_LABEL_MAX_LEN)
}

pub fn top_by_cost_with_label_len(items: &[BomItem], n: usize, max_len: usize) -> Vec<CostBar> {
    let mut sorted: Vec<&BomItem> = items.iter().collect();
    // slice::sort_by is stable
    sorted.sort_by(|a, b| b.total_monthly_cost().total_cmp(&a.total_monthly_cost()));
    sorted
        .into_iter()
        .take(n)
        .map(|item| CostBar {
            label: truncate_label(item.service_name(), max_len),
            cost: item.total_monthly_cost(),
        })
        .collect()
}

pub fn truncate_label(label: &str, max_len: usize) -> String {
    if label.chars().count() > max_len {
        let head: String = label.chars().take(max_len).collect();
        format!("{head}{ELLIPSIS}")
    } else {
        label.to_string()
    }
}
