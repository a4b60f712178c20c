use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Country assumed for metadata extraction when a source returns bare
/// address strings with no country of their own.
pub const DEFAULT_COUNTRY: &str = "US";

/// Specificity class of a suggestion, derived heuristically from the
/// address text. Lower `priority` sorts earlier in ranked output.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum AddressType {
    Address,
    Street,
    Neighborhood,
    City,
    Zip,
    Area,
}

impl AddressType {
    pub fn priority(self) -> u8 {
        match self {
            AddressType::Address => 0,
            AddressType::Street => 1,
            AddressType::Neighborhood => 2,
            AddressType::City => 3,
            AddressType::Zip => 4,
            AddressType::Area => 5,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

/// Best-effort fields split out of the comma-separated address text.
/// Any of them may be absent or wrong for malformed input; ranking
/// never reads this.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct AddressMetadata {
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
    pub country: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AddressSuggestion {
    /// Unique within one response batch only; no cross-call stability.
    pub id: String,
    pub display_name: String,
    /// Dedup key across sources (compared lowercased and trimmed).
    pub full_address: String,
    pub kind: AddressType,
    pub confidence: f64,
    pub coordinates: Option<Coordinates>,
    pub metadata: Option<AddressMetadata>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddressSearchResult {
    pub suggestions: Vec<AddressSuggestion>,
    /// Count of ranked candidates before truncation.
    pub total: usize,
    pub has_more: bool,
    pub cached_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct AutocompleteOptions {
    pub max_suggestions: usize,
    pub min_query_chars: usize,
    pub source_fetch_limit: usize,
    /// No bound by default; when set, a source that exceeds it counts as
    /// a failed source for that call.
    pub source_timeout: Option<Duration>,
    pub cache_ttl: Duration,
    pub cache_max_entries: usize,
    pub cache_evict_batch: usize,
    pub default_country: &'static str,
}

impl Default for AutocompleteOptions {
    fn default() -> Self {
        Self {
            max_suggestions: 10,
            min_query_chars: 2,
            source_fetch_limit: 10,
            source_timeout: None,
            cache_ttl: Duration::from_secs(5 * 60),
            cache_max_entries: 100,
            cache_evict_batch: 20,
            default_country: DEFAULT_COUNTRY,
        }
    }
}
