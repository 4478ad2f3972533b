use crate::core::estimator::BomSummary;
use crate::domain::model::BomItem;
use std::fmt::Write;

const BAR_WIDTH: usize = 30;

/// `$1,234.56`: two decimals with thousands grouping.
pub fn format_money(amount: f64) -> String {
    let fixed = format!("{:.2}", amount.abs());
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if amount < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("{sign}${grouped}.{cents}")
}

/// Plain-text BOM table, totals and the two chart views.
pub fn render(items: &[BomItem], summary: &BomSummary) -> String {
    let mut out = String::new();

    if items.is_empty() {
        out.push_str("No services added to the Bill of Materials yet.\n");
        out.push_str("Use --add or --prompt to get started.\n");
        return out;
    }

    render_table(&mut out, items, summary);
    render_categories(&mut out, summary);
    render_top_services(&mut out, summary);
    out
}

fn render_table(out: &mut String, items: &[BomItem], summary: &BomSummary) {
    let name_width = items
        .iter()
        .map(|i| i.service_name().chars().count())
        .max()
        .unwrap_or(0)
        .max("Service Name".len());
    let category_width = items
        .iter()
        .map(|i| i.category().to_string().chars().count())
        .max()
        .unwrap_or(0)
        .max("Category".len());
    let region_width = items
        .iter()
        .map(|i| i.region().chars().count())
        .max()
        .unwrap_or(0)
        .max("Region".len());

    let _ = writeln!(
        out,
        "{:<name_width$}  {:<category_width$}  {:<region_width$}  {:>5}  {:>12}  {:>14}",
        "Service Name", "Category", "Region", "Qty", "Unit Cost", "Total"
    );
    let rule = name_width + category_width + region_width + 5 + 12 + 14 + 10;
    let _ = writeln!(out, "{}", "-".repeat(rule));

    for item in items {
        let _ = writeln!(
            out,
            "{:<name_width$}  {:<category_width$}  {:<region_width$}  {:>5}  {:>12}  {:>14}",
            item.service_name(),
            item.category().to_string(),
            item.region(),
            item.quantity(),
            format_money(item.monthly_unit_cost()),
            format_money(item.total_monthly_cost()),
        );
    }

    let _ = writeln!(out, "{}", "-".repeat(rule));
    let label_width = rule - 16;
    let _ = writeln!(
        out,
        "{:>label_width$}  {:>14}",
        "Monthly Total",
        format_money(summary.total_monthly_cost)
    );
    let _ = writeln!(
        out,
        "{:>label_width$}  {:>14}",
        "Annual Total (Est.)",
        format_money(summary.annual_estimate)
    );
    let _ = writeln!(out, "{} Services Configured", summary.item_count);
}

fn render_categories(out: &mut String, summary: &BomSummary) {
    let _ = writeln!(out, "\nCost by Category");
    for share in &summary.by_category {
        let _ = writeln!(
            out,
            "  {:<24} {:>14}  {:>5.1}%",
            share.category.to_string(),
            format_money(share.subtotal),
            share.percent
        );
    }
}

fn render_top_services(out: &mut String, summary: &BomSummary) {
    let _ = writeln!(out, "\nTop Services by Cost");
    let max = summary
        .top_services
        .iter()
        .map(|bar| bar.cost)
        .fold(0.0_f64, f64::max);

    for bar in &summary.top_services {
        let width = if max > 0.0 {
            ((bar.cost / max) * BAR_WIDTH as f64).round() as usize
        } else {
            0
        };
        let _ = writeln!(
            out,
            "  {:<18} {:<BAR_WIDTH$} {}",
            bar.label,
            "#".repeat(width),
            format_money(bar.cost)
        );
    }
}
