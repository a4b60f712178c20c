use crate::traits::SuggestionSource;
use crate::{AddressSuggestion, SuggestError};
use async_trait::async_trait;

/// Slot for a geocoding/places provider. Not wired to a real backend
/// yet; answers empty so the aggregation order already accounts for it.
/// A real implementation replaces `fetch` without touching the
/// orchestrator.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlacesSource;

#[async_trait]
impl SuggestionSource for PlacesSource {
    fn name(&self) -> &str {
        "places"
    }

    async fn fetch(
        &self,
        _query: &str,
        _limit: usize,
    ) -> Result<Vec<AddressSuggestion>, SuggestError> {
        Ok(Vec::new())
    }
}
