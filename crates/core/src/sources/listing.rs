use crate::classify::suggestion_from_address;
use crate::traits::SuggestionSource;
use crate::{AddressSuggestion, SuggestError};
use async_trait::async_trait;
use reqwest::Client;
use std::sync::Arc;
use url::Url;

/// Confidence the listing backend implies for every suggestion; it
/// returns bare strings with no per-result scoring of its own.
const LISTING_CONFIDENCE: f64 = 0.8;

const SUGGESTIONS_PATH: &str = "api/properties/suggestions";

/// Adapter over the property-search backend's suggestion endpoint:
/// HTTP GET with a free-text query, answering a bare JSON array of
/// address strings.
pub struct ListingSearchSource {
    client: Arc<Client>,
    base_url: String,
    country: String,
}

impl ListingSearchSource {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Arc::new(Client::new()),
            base_url: base_url.into(),
            country: crate::models::DEFAULT_COUNTRY.to_string(),
        }
    }

    fn endpoint(&self, query: &str, limit: usize) -> Result<Url, SuggestError> {
        let mut url = Url::parse(&self.base_url)?.join(SUGGESTIONS_PATH)?;
        url.query_pairs_mut()
            .append_pair("q", query)
            .append_pair("limit", &limit.to_string());
        Ok(url)
    }
}

#[async_trait]
impl SuggestionSource for ListingSearchSource {
    fn name(&self) -> &str {
        "listing"
    }

    async fn fetch(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<AddressSuggestion>, SuggestError> {
        let response = self.client.get(self.endpoint(query, limit)?).send().await?;

        if !response.status().is_success() {
            return Err(SuggestError::BackendResponse {
                source_name: self.name().to_string(),
                details: response.status().to_string(),
            });
        }

        let addresses: Vec<String> = response.json().await?;

        Ok(addresses
            .iter()
            .take(limit)
            .enumerate()
            .map(|(index, address)| {
                suggestion_from_address(
                    self.name(),
                    index,
                    address,
                    LISTING_CONFIDENCE,
                    &self.country,
                )
            })
            .collect())
    }
}
