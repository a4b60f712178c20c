use crate::models::{AddressMetadata, AddressSuggestion, AddressType};
use regex::Regex;
use std::sync::OnceLock;

fn house_number_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\d+\s").expect("valid pattern"))
}

fn street_suffix_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?i)\b(st|street|ave|avenue|rd|road|blvd|boulevard|dr|drive|ln|lane|ct|court|pl|place|way|cir|circle)\b",
        )
        .expect("valid pattern")
    })
}

fn neighborhood_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)\b(district|neighborhood|area|heights|hills|valley|park|gardens)\b")
            .expect("valid pattern")
    })
}

fn zip_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\b\d{5}(-\d{4})?\b").expect("valid pattern"))
}

/// Heuristic specificity classification, evaluated against the
/// original-case address text in strict precedence order. `City` is
/// never produced here: the catch-all is `Area`, matching the behavior
/// callers already rank against.
pub fn determine_address_type(address: &str) -> AddressType {
    if house_number_re().is_match(address) {
        AddressType::Address
    } else if street_suffix_re().is_match(address) {
        AddressType::Street
    } else if neighborhood_re().is_match(address) {
        AddressType::Neighborhood
    } else if zip_re().is_match(address) {
        AddressType::Zip
    } else {
        AddressType::Area
    }
}

/// Best-effort split of `"street, city, state zip"` shaped text. Fields
/// may come out absent or wrong for anything else; nothing downstream
/// depends on them.
pub fn extract_metadata(address: &str, default_country: &str) -> AddressMetadata {
    let parts: Vec<&str> = address.split(',').map(str::trim).collect();

    let city = parts.get(1).filter(|p| !p.is_empty()).map(|p| p.to_string());
    let mut state = None;
    let mut zip = None;
    if let Some(region) = parts.get(2) {
        let mut tokens = region.split_whitespace();
        state = tokens.next().map(str::to_string);
        zip = tokens.next().map(str::to_string);
    }

    AddressMetadata {
        city,
        state,
        zip,
        country: Some(default_country.to_string()),
    }
}

/// Builds one suggestion out of a bare address string returned by a
/// source. `index` is the position within that source's batch; ids are
/// unique per batch only.
pub fn suggestion_from_address(
    source: &str,
    index: usize,
    address: &str,
    confidence: f64,
    default_country: &str,
) -> AddressSuggestion {
    AddressSuggestion {
        id: format!("{source}-{index}"),
        display_name: address.to_string(),
        full_address: address.to_string(),
        kind: determine_address_type(address),
        confidence,
        coordinates: None,
        metadata: Some(extract_metadata(address, default_country)),
    }
}
