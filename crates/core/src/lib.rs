pub mod cache;
pub mod classify;
pub mod error;
pub mod models;
pub mod normalize;
pub mod ranking;
pub mod service;
pub mod sources;
pub mod traits;
pub mod validate;

pub use cache::{Clock, SuggestionCache, SystemClock};
pub use classify::{determine_address_type, extract_metadata, suggestion_from_address};
pub use error::SuggestError;
pub use models::{
    AddressMetadata, AddressSearchResult, AddressSuggestion, AddressType, AutocompleteOptions,
    Coordinates, DEFAULT_COUNTRY,
};
pub use normalize::normalize_query;
pub use ranking::rank;
pub use service::{AddressAutocompleteService, SharedSource};
pub use sources::{ListingSearchSource, PlacesSource};
pub use traits::SuggestionSource;
pub use validate::{validate_address, AddressValidation};
