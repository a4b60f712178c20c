mod listing;
mod places;

pub use listing::ListingSearchSource;
pub use places::PlacesSource;
