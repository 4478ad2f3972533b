use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use strum::{Display, EnumIter, EnumString};
use uuid::Uuid;

/// Sentinel `service_id` for items proposed by the suggestion source.
pub const AI_SERVICE_ID: &str = "ai-generated";

/// Region recorded on AI-sourced items; the source never names a region.
pub const AI_REGION: &str = "Global/Recommended";

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
pub enum ServiceCategory {
    Compute,
    Storage,
    Networking,
    Database,
    #[serde(rename = "AI + Machine Learning")]
    #[strum(to_string = "AI + Machine Learning")]
    AiMl,
    Analytics,
    Identity,
    Security,
    Other,
}

impl ServiceCategory {
    /// Exact match on the display label; anything else is `Other`.
    pub fn from_label(label: &str) -> Self {
        label.parse().unwrap_or(ServiceCategory::Other)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceDefinition {
    pub id: &'static str,
    pub name: &'static str,
    pub category: ServiceCategory,
    pub base_price: f64,
    pub unit: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ItemId(Uuid);

impl ItemId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ItemId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One line of the bill of materials.
///
/// `total_monthly_cost` is derived: every constructor and mutator recomputes
/// it from `monthly_unit_cost * quantity`, so the fields stay private.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BomItem {
    id: ItemId,
    service_id: String,
    service_name: String,
    category: ServiceCategory,
    description: String,
    region: String,
    quantity: u32,
    monthly_unit_cost: f64,
    total_monthly_cost: f64,
}

impl BomItem {
    pub fn new(
        service_id: impl Into<String>,
        service_name: impl Into<String>,
        category: ServiceCategory,
        description: impl Into<String>,
        region: impl Into<String>,
        quantity: u32,
        monthly_unit_cost: f64,
    ) -> Self {
        let quantity = quantity.max(1);
        let monthly_unit_cost = non_negative(monthly_unit_cost);
        Self {
            id: ItemId::new(),
            service_id: service_id.into(),
            service_name: service_name.into(),
            category,
            description: description.into(),
            region: region.into(),
            quantity,
            monthly_unit_cost,
            total_monthly_cost: monthly_unit_cost * f64::from(quantity),
        }
    }

    /// Manual add from the catalog, priced at the catalog base price.
    pub fn from_service(service: &ServiceDefinition, region: &str, quantity: u32) -> Self {
        Self::new(
            service.id,
            service.name,
            service.category,
            format!("Standard tier - {}", service.unit),
            region,
            quantity,
            service.base_price,
        )
    }

    pub fn id(&self) -> ItemId {
        self.id
    }

    pub fn service_id(&self) -> &str {
        &self.service_id
    }

    pub fn service_name(&self) -> &str {
        &self.service_name
    }

    pub fn category(&self) -> ServiceCategory {
        self.category
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub fn monthly_unit_cost(&self) -> f64 {
        self.monthly_unit_cost
    }

    pub fn total_monthly_cost(&self) -> f64 {
        self.total_monthly_cost
    }

    pub fn is_ai_generated(&self) -> bool {
        self.service_id == AI_SERVICE_ID
    }

    /// Values below 1 clamp to 1.
    pub(crate) fn set_quantity(&mut self, quantity: i64) {
        let quantity = u32::try_from(quantity.max(1)).unwrap_or(u32::MAX);
        self.quantity = quantity;
        self.total_monthly_cost = self.monthly_unit_cost * f64::from(quantity);
    }
}

fn non_negative(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

/// An item proposed by the suggestion source, as it arrives on the wire.
///
/// The three text fields are required; a batch with any of them missing
/// fails to parse as a whole. Numeric fields are lenient.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestedItem {
    pub service_name: String,
    pub category: String,
    pub description: String,
    #[serde(default, deserialize_with = "lenient_number")]
    pub estimated_monthly_cost: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub quantity: Option<f64>,
    #[serde(default)]
    pub reasoning: String,
}

/// Numbers and numeric strings parse; anything else (including NaN) is absent.
fn lenient_number<'de, D>(deserializer: D) -> std::result::Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value
        .and_then(|v| match v {
            serde_json::Value::Number(n) => n.as_f64(),
            serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        })
        .filter(|n| n.is_finite()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_category_labels_round_trip() {
        for category in ServiceCategory::iter() {
            assert_eq!(ServiceCategory::from_label(&category.to_string()), category);
        }
        assert_eq!(ServiceCategory::AiMl.to_string(), "AI + Machine Learning");
    }

    #[test]
    fn test_unknown_category_falls_back_to_other() {
        assert_eq!(ServiceCategory::from_label("Quantum"), ServiceCategory::Other);
        assert_eq!(ServiceCategory::from_label("compute"), ServiceCategory::Other);
        assert_eq!(ServiceCategory::from_label(""), ServiceCategory::Other);
    }

    #[test]
    fn test_new_item_derives_total() {
        let item = BomItem::new("x", "X", ServiceCategory::Compute, "d", "East US", 3, 70.0);
        assert_eq!(item.total_monthly_cost(), 210.0);
        assert!(!item.is_ai_generated());
    }

    #[test]
    fn test_new_item_clamps_quantity_and_cost() {
        let item = BomItem::new("x", "X", ServiceCategory::Other, "d", "r", 0, -4.0);
        assert_eq!(item.quantity(), 1);
        assert_eq!(item.monthly_unit_cost(), 0.0);
        assert_eq!(item.total_monthly_cost(), 0.0);
    }

    #[test]
    fn test_set_quantity_recomputes_total() {
        let mut item = BomItem::new("x", "X", ServiceCategory::Storage, "d", "r", 1, 20.0);
        item.set_quantity(4);
        assert_eq!(item.total_monthly_cost(), 80.0);
        item.set_quantity(-5);
        assert_eq!(item.quantity(), 1);
        assert_eq!(item.total_monthly_cost(), 20.0);
    }

    #[test]
    fn test_ids_are_unique() {
        let a = BomItem::new("x", "X", ServiceCategory::Other, "d", "r", 1, 1.0);
        let b = BomItem::new("x", "X", ServiceCategory::Other, "d", "r", 1, 1.0);
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_suggested_item_lenient_numbers() {
        let json = serde_json::json!([
            {"serviceName": "A", "category": "Compute", "description": "a",
             "estimatedMonthlyCost": 300, "quantity": 3, "reasoning": "r"},
            {"serviceName": "B", "category": "Storage", "description": "b",
             "estimatedMonthlyCost": "45.5", "quantity": null, "reasoning": "r"},
            {"serviceName": "C", "category": "Other", "description": "c",
             "estimatedMonthlyCost": "lots"}
        ]);

        let items: Vec<SuggestedItem> = serde_json::from_value(json).unwrap();

        assert_eq!(items[0].estimated_monthly_cost, Some(300.0));
        assert_eq!(items[0].quantity, Some(3.0));
        assert_eq!(items[1].estimated_monthly_cost, Some(45.5));
        assert_eq!(items[1].quantity, None);
        assert_eq!(items[2].estimated_monthly_cost, None);
        assert_eq!(items[2].quantity, None);
        assert_eq!(items[2].reasoning, "");
    }

    #[test]
    fn test_suggested_item_requires_text_fields() {
        let json = serde_json::json!([
            {"serviceName": "A", "category": "Compute", "description": "a",
             "estimatedMonthlyCost": 300, "quantity": 3, "reasoning": "r"},
            {}
        ]);

        assert!(serde_json::from_value::<Vec<SuggestedItem>>(json).is_err());

        let no_description = serde_json::json!({"serviceName": "A", "category": "Compute"});
        assert!(serde_json::from_value::<SuggestedItem>(no_description).is_err());
    }
}
