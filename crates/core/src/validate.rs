use serde::{Deserialize, Serialize};

const MIN_ADDRESS_CHARS: usize = 3;
const FORBIDDEN_CHARS: [char; 5] = ['<', '>', '\'', '"', '&'];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AddressValidation {
    pub is_valid: bool,
    pub errors: Vec<String>,
}

/// Checks a free-text address for minimal well-formedness before it is
/// interpolated into markup or URLs elsewhere. Collects every violated
/// rule rather than stopping at the first. Stateless, independent of
/// the suggestion pipeline.
pub fn validate_address(address: &str) -> AddressValidation {
    let mut errors = Vec::new();

    if address.trim().is_empty() {
        errors.push("Address is required".to_string());
    }
    if address.len() < MIN_ADDRESS_CHARS {
        errors.push(format!(
            "Address must be at least {MIN_ADDRESS_CHARS} characters"
        ));
    }
    if address.chars().any(|c| FORBIDDEN_CHARS.contains(&c)) {
        errors.push("Address contains invalid characters".to_string());
    }

    AddressValidation {
        is_valid: errors.is_empty(),
        errors,
    }
}
