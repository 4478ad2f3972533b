use crate::domain::model::{BomItem, ServiceCategory, SuggestedItem, AI_REGION, AI_SERVICE_ID};
use crate::domain::ports::SuggestionSource;
use crate::utils::error::{EstimatorError, Result};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Converts suggestion-source output into BOM items, one request at a time.
pub struct AiIngestAdapter<S: SuggestionSource> {
    source: S,
    in_flight: Arc<AtomicBool>,
}

/// Held for the duration of one generation; clears the in-flight flag on drop.
struct GenerationPermit {
    in_flight: Arc<AtomicBool>,
}

impl Drop for GenerationPermit {
    fn drop(&mut self) {
        self.in_flight.store(false, Ordering::Release);
    }
}

impl<S: SuggestionSource> AiIngestAdapter<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            in_flight: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn is_generating(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    fn try_begin(&self) -> Result<GenerationPermit> {
        self.in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| EstimatorError::GenerationInProgress)?;
        Ok(GenerationPermit {
            in_flight: Arc::clone(&self.in_flight),
        })
    }

    /// Asks the source for suggestions and converts the whole batch.
    ///
    /// Returns either every converted item or an error; the caller appends
    /// the batch to its registry only on `Ok`. A blank prompt returns an
    /// empty batch without contacting the source.
    pub async fn generate(&self, prompt: &str) -> Result<Vec<BomItem>> {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            tracing::debug!("Empty prompt, skipping BOM generation");
            return Ok(Vec::new());
        }

        let _permit = self.try_begin()?;
        tracing::info!("Requesting BOM suggestions ({} chars of description)", prompt.len());

        let suggestions = match self.source.suggest(prompt).await {
            Ok(suggestions) => suggestions,
            Err(e @ EstimatorError::MissingCredential { .. })
            | Err(e @ EstimatorError::GenerationFailed { .. }) => return Err(e),
            Err(e) => {
                tracing::error!("Suggestion source failed: {}", e);
                return Err(EstimatorError::GenerationFailed {
                    reason: e.to_string(),
                });
            }
        };

        let items = ingest(suggestions);
        tracing::info!("Generated {} BOM items", items.len());
        Ok(items)
    }
}

/// Maps suggestions to BOM items, preserving order.
pub fn ingest(suggestions: Vec<SuggestedItem>) -> Vec<BomItem> {
    suggestions.iter().map(ingest_suggestion).collect()
}

pub fn ingest_suggestion(suggestion: &SuggestedItem) -> BomItem {
    let quantity = suggested_quantity(suggestion.quantity);
    let estimated = suggestion.estimated_monthly_cost.unwrap_or(0.0).max(0.0);
    let unit_cost = estimated / f64::from(quantity);

    if !suggestion.reasoning.is_empty() {
        tracing::debug!(
            service = suggestion.service_name.as_str(),
            "AI reasoning: {}",
            suggestion.reasoning
        );
    }

    BomItem::new(
        AI_SERVICE_ID,
        suggestion.service_name.as_str(),
        ServiceCategory::from_label(&suggestion.category),
        suggestion.description.as_str(),
        AI_REGION,
        quantity,
        unit_cost,
    )
}

/// Fractional quantities truncate; anything below 1 or absent becomes 1.
fn suggested_quantity(quantity: Option<f64>) -> u32 {
    match quantity.map(f64::trunc) {
        Some(q) if q >= 1.0 => q as u32,
        _ => 1,
    }
}
