use crate::domain::model::{BomItem, ItemId};

/// Ordered, single-owner collection of BOM line items.
///
/// Insertion order is display order. Every operation is total: unknown ids
/// are ignored and sub-1 quantities clamp to 1.
#[derive(Debug, Clone, Default)]
pub struct BomRegistry {
    items: Vec<BomItem>,
}

impl BomRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, item: BomItem) {
        tracing::debug!(id = %item.id(), service = item.service_name(), "adding BOM item");
        self.items.push(item);
    }

    /// Appends a whole batch in order.
    pub fn extend(&mut self, items: Vec<BomItem>) {
        tracing::debug!(count = items.len(), "appending BOM batch");
        self.items.extend(items);
    }

    pub fn remove(&mut self, id: ItemId) {
        if let Some(index) = self.items.iter().position(|item| item.id() == id) {
            let removed = self.items.remove(index);
            tracing::debug!(id = %id, service = removed.service_name(), "removed BOM item");
        }
    }

    pub fn update_quantity(&mut self, id: ItemId, new_quantity: i64) {
        if let Some(item) = self.items.iter_mut().find(|item| item.id() == id) {
            item.set_quantity(new_quantity);
            tracing::debug!(
                id = %id,
                quantity = item.quantity(),
                total = item.total_monthly_cost(),
                "updated BOM item quantity"
            );
        }
    }

    pub fn get(&self, id: ItemId) -> Option<&BomItem> {
        self.items.iter().find(|item| item.id() == id)
    }

    pub fn items(&self) -> &[BomItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn total_monthly_cost(&self) -> f64 {
        self.items.iter().map(BomItem::total_monthly_cost).sum()
    }

    pub fn annual_estimate(&self) -> f64 {
        self.total_monthly_cost() * 12.0
    }
}

/// Parses a user-typed quantity; anything that is not a positive integer becomes 1.
///
/// Leading digits are honoured the way a lenient form field reads them, so
/// `"3 VMs"` yields 3.
pub fn coerce_quantity(input: &str) -> u32 {
    let trimmed = input.trim();
    let digits_end = trimmed
        .char_indices()
        .find(|&(i, c)| !(c.is_ascii_digit() || (i == 0 && (c == '-' || c == '+'))))
        .map(|(i, _)| i)
        .unwrap_or(trimmed.len());

    match trimmed[..digits_end].parse::<i64>() {
        Ok(n) if n >= 1 => u32::try_from(n).unwrap_or(u32::MAX),
        _ => 1,
    }
}
