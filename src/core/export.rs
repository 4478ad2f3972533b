use crate::domain::model::BomItem;
use crate::utils::error::{EstimatorError, Result};

pub const EXPORT_HEADERS: [&str; 7] = [
    "Service Name",
    "Category",
    "Description",
    "Region",
    "Quantity",
    "Unit Cost",
    "Total Cost",
];

pub const DEFAULT_EXPORT_FILENAME: &str = "celebal_azure_bom.csv";

/// Comma-separated export of the BOM.
pub fn format(items: &[BomItem]) -> Result<String> {
    format_delimited(items, b',')
}

/// Header row plus one row per item, rows joined by `\n` without a trailing
/// line break. Fields are quoted only when they contain the delimiter, a
/// quote or a line break.
pub fn format_delimited(items: &[BomItem], delimiter: u8) -> Result<String> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .quote_style(csv::QuoteStyle::Necessary)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(EXPORT_HEADERS)?;
    for item in items {
        writer.write_record([
            item.service_name().to_string(),
            item.category().to_string(),
            item.description().to_string(),
            item.region().to_string(),
            item.quantity().to_string(),
            format!("{:.2}", item.monthly_unit_cost()),
            format!("{:.2}", item.total_monthly_cost()),
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| EstimatorError::IoError(e.into_error()))?;
    let mut text = String::from_utf8(bytes)
        .map_err(|e| EstimatorError::IoError(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))?;

    if text.ends_with('\n') {
        text.pop();
    }
    tracing::debug!("Formatted {} BOM rows for export", items.len());
    Ok(text)
}
