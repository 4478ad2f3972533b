use crate::core::aggregation::{self, CategoryShare, CostBar};
use crate::core::export;
use crate::core::ingest::AiIngestAdapter;
use crate::core::registry::BomRegistry;
use crate::domain::catalog;
use crate::domain::model::{BomItem, ItemId};
use crate::domain::ports::{Storage, SuggestionSource};
use crate::utils::error::{EstimatorError, Result};
use serde::Serialize;

/// Snapshot of the derived views shown next to the BOM table.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BomSummary {
    pub item_count: usize,
    pub total_monthly_cost: f64,
    pub annual_estimate: f64,
    pub by_category: Vec<CategoryShare>,
    pub top_services: Vec<CostBar>,
}

/// One estimating session: a registry plus the AI path that feeds it.
pub struct Estimator<S: SuggestionSource> {
    registry: BomRegistry,
    ingest: AiIngestAdapter<S>,
}

impl<S: SuggestionSource> Estimator<S> {
    pub fn new(source: S) -> Self {
        Self {
            registry: BomRegistry::new(),
            ingest: AiIngestAdapter::new(source),
        }
    }

    pub fn registry(&self) -> &BomRegistry {
        &self.registry
    }

    /// Split borrow so a generation can be awaited while the registry is edited.
    pub fn parts(&mut self) -> (&AiIngestAdapter<S>, &mut BomRegistry) {
        (&self.ingest, &mut self.registry)
    }

    pub fn is_generating(&self) -> bool {
        self.ingest.is_generating()
    }

    pub fn add_from_catalog(
        &mut self,
        service_id: &str,
        region: &str,
        quantity: u32,
    ) -> Result<ItemId> {
        let service =
            catalog::find_service(service_id).ok_or_else(|| EstimatorError::UnknownService {
                service_id: service_id.to_string(),
            })?;

        if !catalog::regions().contains(&region) {
            tracing::warn!("Region '{}' is not in the catalog region list", region);
        }

        let item = BomItem::from_service(service, region, quantity);
        let id = item.id();
        tracing::info!(
            "Added {} x{} in {} ({:.2}/mo)",
            service.name,
            item.quantity(),
            region,
            item.total_monthly_cost()
        );
        self.registry.add(item);
        Ok(id)
    }

    pub fn add_item(&mut self, item: BomItem) -> ItemId {
        let id = item.id();
        self.registry.add(item);
        id
    }

    pub fn remove(&mut self, id: ItemId) {
        self.registry.remove(id);
    }

    pub fn update_quantity(&mut self, id: ItemId, quantity: i64) {
        self.registry.update_quantity(id, quantity);
    }

    /// Runs the AI path and appends the batch only if it succeeded.
    /// Returns the number of items added.
    pub async fn generate_from_prompt(&mut self, prompt: &str) -> Result<usize> {
        let (ingest, registry) = self.parts();
        let batch = ingest.generate(prompt).await?;
        let added = batch.len();
        registry.extend(batch);
        Ok(added)
    }

    pub fn summary(&self, top_n: usize, label_max_len: usize) -> BomSummary {
        let items = self.registry.items();
        BomSummary {
            item_count: items.len(),
            total_monthly_cost: self.registry.total_monthly_cost(),
            annual_estimate: self.registry.annual_estimate(),
            by_category: aggregation::category_share(items),
            top_services: aggregation::top_by_cost_with_label_len(items, top_n, label_max_len),
        }
    }

    pub fn export_csv(&self) -> Result<String> {
        export::format(self.registry.items())
    }

    /// Writes the CSV export through `storage` under `filename`.
    pub async fn save_export<St: Storage>(&self, storage: &St, filename: &str) -> Result<()> {
        let csv = self.export_csv()?;
        storage.write_file(filename, csv.as_bytes()).await?;
        tracing::info!(
            "Exported {} BOM rows to {}",
            self.registry.len(),
            filename
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{ServiceCategory, SuggestedItem};
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    /// `None` simulates an upstream outage.
    struct CannedSource(Option<Vec<SuggestedItem>>);

    #[async_trait]
    impl SuggestionSource for CannedSource {
        async fn suggest(&self, _description: &str) -> Result<Vec<SuggestedItem>> {
            self.0.clone().ok_or_else(|| EstimatorError::UpstreamStatus {
                status: 500,
                body: "boom".to_string(),
            })
        }
    }

    #[derive(Clone)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    }

    impl MockStorage {
        fn new() -> Self {
            Self {
                files: Arc::new(Mutex::new(HashMap::new())),
            }
        }

        async fn get_file(&self, path: &str) -> Option<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned()
        }
    }

    impl Storage for MockStorage {
        async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            let mut files = self.files.lock().await;
            files.insert(path.to_string(), data.to_vec());
            Ok(())
        }
    }

    fn suggestion(name: &str, category: &str, cost: f64, quantity: f64) -> SuggestedItem {
        SuggestedItem {
            service_name: name.to_string(),
            category: category.to_string(),
            description: "suggested".to_string(),
            estimated_monthly_cost: Some(cost),
            quantity: Some(quantity),
            reasoning: String::new(),
        }
    }

    fn empty_estimator() -> Estimator<CannedSource> {
        Estimator::new(CannedSource(Some(vec![])))
    }

    #[test]
    fn test_add_from_catalog_uses_base_price() {
        let mut estimator = empty_estimator();

        let id = estimator
            .add_from_catalog("vm-linux-d2s", "West Europe", 2)
            .unwrap();

        let item = estimator.registry().get(id).unwrap();
        assert_eq!(item.service_name(), "Virtual Machine (Linux, D2s v3)");
        assert_eq!(item.description(), "Standard tier - Instance");
        assert_eq!(item.region(), "West Europe");
        assert_eq!(item.monthly_unit_cost(), 70.0);
        assert_eq!(item.total_monthly_cost(), 140.0);
    }

    #[test]
    fn test_add_from_catalog_unknown_service() {
        let mut estimator = empty_estimator();
        let err = estimator
            .add_from_catalog("mainframe", "East US", 1)
            .unwrap_err();
        assert!(matches!(err, EstimatorError::UnknownService { .. }));
        assert!(estimator.registry().is_empty());
    }

    #[tokio::test]
    async fn test_generate_appends_after_manual_items() {
        let mut estimator = Estimator::new(CannedSource(Some(vec![
            suggestion("Front Door", "Networking", 300.0, 3.0),
            suggestion("Quantum Annealer", "Quantum", 50.0, 1.0),
        ])));
        estimator
            .add_from_catalog("sql-db-s0", "East US", 1)
            .unwrap();

        let added = estimator.generate_from_prompt("global web app").await.unwrap();

        assert_eq!(added, 2);
        let items = estimator.registry().items();
        assert_eq!(items.len(), 3);
        assert_eq!(items[0].service_id(), "sql-db-s0");
        assert_eq!(items[1].monthly_unit_cost(), 100.0);
        assert_eq!(items[2].category(), ServiceCategory::Other);
        assert_eq!(estimator.registry().total_monthly_cost(), 365.0);
    }

    #[tokio::test]
    async fn test_failed_generation_leaves_registry_untouched() {
        let mut estimator = Estimator::new(CannedSource(None));
        estimator.add_from_catalog("vnet", "East US", 1).unwrap();

        let err = estimator.generate_from_prompt("anything").await.unwrap_err();

        assert!(matches!(err, EstimatorError::GenerationFailed { .. }));
        assert_eq!(estimator.registry().len(), 1);
        assert!(!estimator.is_generating());
    }

    #[test]
    fn test_summary() {
        let mut estimator = empty_estimator();
        estimator.add_from_catalog("vm-linux-d2s", "East US", 1).unwrap();
        estimator.add_from_catalog("blob-storage-hot", "East US", 1).unwrap();
        estimator.add_from_catalog("vm-windows-d2s", "East US", 1).unwrap();

        let summary = estimator.summary(2, 15);

        assert_eq!(summary.item_count, 3);
        assert_eq!(summary.total_monthly_cost, 226.0);
        assert_eq!(summary.annual_estimate, 2712.0);
        assert_eq!(summary.by_category.len(), 2);
        assert_eq!(summary.by_category[0].subtotal, 206.0);
        assert_eq!(summary.top_services.len(), 2);
        assert_eq!(summary.top_services[0].label, "Virtual Machine...");
        assert_eq!(summary.top_services[0].cost, 136.0);
    }

    #[test]
    fn test_update_and_remove_through_session() {
        let mut estimator = empty_estimator();
        let id = estimator.add_from_catalog("disk-p10", "East US", 1).unwrap();

        estimator.update_quantity(id, 4);
        assert_eq!(estimator.registry().total_monthly_cost(), 72.0);

        estimator.remove(id);
        assert!(estimator.registry().is_empty());
    }

    #[tokio::test]
    async fn test_save_export_writes_csv() {
        let storage = MockStorage::new();
        let mut estimator = empty_estimator();
        estimator.add_from_catalog("vm-linux-d2s", "East US", 2).unwrap();

        estimator.save_export(&storage, "celebal_azure_bom.csv").await.unwrap();

        let data = storage.get_file("celebal_azure_bom.csv").await.unwrap();
        let text = String::from_utf8(data).unwrap();
        assert_eq!(
            text.lines().nth(1).unwrap(),
            "\"Virtual Machine (Linux, D2s v3)\",Compute,Standard tier - Instance,East US,2,70.00,140.00"
        );
    }
}
