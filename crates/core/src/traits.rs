use crate::{AddressSuggestion, SuggestError};
use async_trait::async_trait;

/// One upstream suggestion source. Implementations wrap whatever the
/// backend speaks and come back with ready-built suggestions; the
/// orchestrator isolates a failing source, but well-behaved adapters
/// keep their own errors behind this boundary where they can.
#[async_trait]
pub trait SuggestionSource {
    /// Stable short name, used for suggestion id prefixes and logs.
    fn name(&self) -> &str;

    async fn fetch(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<AddressSuggestion>, SuggestError>;
}
