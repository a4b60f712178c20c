use crate::models::AddressSuggestion;

/// Orders candidates against the normalized query. Three tie-break
/// levels in strict precedence: substring match of the query in the
/// lowercased full address, then type priority, then confidence
/// descending. The sort is stable, so candidates equal on all three
/// keep their input order.
pub fn rank(candidates: Vec<AddressSuggestion>, normalized_query: &str) -> Vec<AddressSuggestion> {
    let mut keyed: Vec<(bool, AddressSuggestion)> = candidates
        .into_iter()
        .map(|candidate| {
            let matched = candidate
                .full_address
                .to_lowercase()
                .contains(normalized_query);
            (matched, candidate)
        })
        .collect();

    keyed.sort_by(|(left_match, left), (right_match, right)| {
        right_match
            .cmp(left_match)
            .then_with(|| left.kind.priority().cmp(&right.kind.priority()))
            .then_with(|| right.confidence.total_cmp(&left.confidence))
    });

    keyed.into_iter().map(|(_, candidate)| candidate).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AddressType;

    fn candidate(id: &str, address: &str, kind: AddressType, confidence: f64) -> AddressSuggestion {
        AddressSuggestion {
            id: id.to_string(),
            display_name: address.to_string(),
            full_address: address.to_string(),
            kind,
            confidence,
            coordinates: None,
            metadata: None,
        }
    }

    #[test]
    fn substring_matches_come_first_regardless_of_type() {
        let ranked = rank(
            vec![
                candidate("a", "Elm Park", AddressType::Neighborhood, 0.9),
                candidate("b", "123 Main St", AddressType::Address, 0.1),
            ],
            "main",
        );
        assert_eq!(ranked[0].id, "b");
        assert_eq!(ranked[1].id, "a");
    }

    #[test]
    fn type_priority_breaks_ties_within_match_group() {
        let ranked = rank(
            vec![
                candidate("zip", "Main 62704", AddressType::Zip, 0.8),
                candidate("street", "Main Street", AddressType::Street, 0.8),
                candidate("addr", "123 Main St", AddressType::Address, 0.8),
                candidate("hood", "Main Heights", AddressType::Neighborhood, 0.8),
            ],
            "main",
        );
        let order: Vec<&str> = ranked.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(order, vec!["addr", "street", "hood", "zip"]);
    }

    #[test]
    fn confidence_breaks_remaining_ties_descending() {
        let ranked = rank(
            vec![
                candidate("low", "Main Street", AddressType::Street, 0.3),
                candidate("high", "Main Avenue", AddressType::Street, 0.9),
            ],
            "main",
        );
        assert_eq!(ranked[0].id, "high");
    }

    #[test]
    fn full_ties_keep_input_order() {
        let ranked = rank(
            vec![
                candidate("first", "123 Main St, Springfield, IL 62704", AddressType::Address, 0.8),
                candidate("second", "123 Main Ave, Springfield, IL", AddressType::Address, 0.8),
            ],
            "123 main",
        );
        assert_eq!(ranked[0].id, "first");
        assert_eq!(ranked[1].id, "second");
    }

    #[test]
    fn ranking_is_deterministic() {
        let input = vec![
            candidate("a", "Main Street", AddressType::Street, 0.8),
            candidate("b", "Elm Park", AddressType::Neighborhood, 0.8),
            candidate("c", "123 Main St", AddressType::Address, 0.8),
        ];
        let first = rank(input.clone(), "main");
        let second = rank(input, "main");
        assert_eq!(first, second);
    }
}
