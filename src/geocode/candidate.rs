//! Address candidates and component extraction
//!
//! A reverse-geocoding provider proposes several candidates for a coordinate
//! pair. Selection prefers the most specific candidate (street addresses
//! inside a sublocality, typical of dense informal addressing) and falls back
//! to the provider's own relevance order. Only the selected candidate is
//! extracted; the rest are discarded.

use serde::Deserialize;

/// Typed address component tags used by the provider
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentKind {
    StreetNumber,
    Route,
    Premise,
    Subpremise,
    Sublocality,
    SublocalityLevel1,
    SublocalityLevel2,
    Locality,
    AdminAreaLevel1,
    AdminAreaLevel2,
    Country,
    PostalCode,
}

impl ComponentKind {
    /// Wire tag used in provider responses
    pub fn tag(&self) -> &'static str {
        match self {
            ComponentKind::StreetNumber => "street_number",
            ComponentKind::Route => "route",
            ComponentKind::Premise => "premise",
            ComponentKind::Subpremise => "subpremise",
            ComponentKind::Sublocality => "sublocality",
            ComponentKind::SublocalityLevel1 => "sublocality_level_1",
            ComponentKind::SublocalityLevel2 => "sublocality_level_2",
            ComponentKind::Locality => "locality",
            ComponentKind::AdminAreaLevel1 => "administrative_area_level_1",
            ComponentKind::AdminAreaLevel2 => "administrative_area_level_2",
            ComponentKind::Country => "country",
            ComponentKind::PostalCode => "postal_code",
        }
    }
}

/// One typed component of a candidate address
#[derive(Debug, Clone, Deserialize)]
pub struct AddressComponent {
    pub long_name: String,
    #[serde(default)]
    pub short_name: String,
    #[serde(default)]
    pub types: Vec<String>,
}

/// A geocoder's proposal for a coordinate pair
#[derive(Debug, Clone, Deserialize)]
pub struct AddressCandidate {
    /// Result-type tags for the candidate as a whole
    #[serde(default)]
    pub types: Vec<String>,
    /// Provider-formatted display string
    #[serde(default)]
    pub formatted_address: String,
    /// Ranked typed components
    #[serde(default)]
    pub address_components: Vec<AddressComponent>,
}

impl AddressCandidate {
    /// Whether the candidate as a whole carries the given result-type tag
    pub fn is_type(&self, tag: &str) -> bool {
        self.types.iter().any(|t| t == tag)
    }

    /// First component carrying the given kind, by long name
    pub fn component(&self, kind: ComponentKind) -> Option<&str> {
        self.address_components
            .iter()
            .find(|c| c.types.iter().any(|t| t == kind.tag()))
            .map(|c| c.long_name.as_str())
    }

    /// Whether any component carries the given kind
    pub fn has(&self, kind: ComponentKind) -> bool {
        self.component(kind).is_some()
    }

    /// Whether the candidate carries a sublocality component of any tier
    pub fn has_sublocality(&self) -> bool {
        self.has(ComponentKind::Sublocality)
            || self.has(ComponentKind::SublocalityLevel1)
            || self.has(ComponentKind::SublocalityLevel2)
    }
}

/// Structured fields extracted from the selected candidate
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AddressExtract {
    /// Display street address (premise and street segments)
    pub address: Option<String>,
    /// Display city (sublocality-first)
    pub city: Option<String>,
    /// First-level administrative area
    pub state: Option<String>,
    pub country: Option<String>,
    pub postal_code: Option<String>,
    /// Provider-formatted full address
    pub formatted_address: Option<String>,
}

/// Pick the best candidate from a provider's ranked list
///
/// Precedence, with ties broken by first occurrence:
/// 1. a street address that also carries a sublocality component;
/// 2. a premise that carries a locality component;
/// 3. any candidate with a first-level sublocality when the held best lacks one;
/// 4. the provider's first result.
pub fn select_candidate(candidates: &[AddressCandidate]) -> Option<&AddressCandidate> {
    if let Some(candidate) = candidates
        .iter()
        .find(|c| c.is_type("street_address") && c.has_sublocality())
    {
        return Some(candidate);
    }

    if let Some(candidate) = candidates
        .iter()
        .find(|c| c.is_type("premise") && c.has(ComponentKind::Locality))
    {
        return Some(candidate);
    }

    let mut best = candidates.first()?;
    for candidate in &candidates[1..] {
        if candidate.has(ComponentKind::SublocalityLevel1)
            && !best.has(ComponentKind::SublocalityLevel1)
        {
            best = candidate;
        }
    }
    Some(best)
}

/// Extract structured display fields from one candidate
pub fn extract_address(candidate: &AddressCandidate) -> AddressExtract {
    AddressExtract {
        address: display_address(candidate),
        city: display_city(candidate),
        state: candidate.component(ComponentKind::AdminAreaLevel1).map(str::to_string),
        country: candidate.component(ComponentKind::Country).map(str::to_string),
        postal_code: candidate.component(ComponentKind::PostalCode).map(str::to_string),
        formatted_address: if candidate.formatted_address.is_empty() {
            None
        } else {
            Some(candidate.formatted_address.clone())
        },
    }
}

/// Premise (+ sub-premise), then street-number + route, trimmed
fn display_address(candidate: &AddressCandidate) -> Option<String> {
    let mut building = String::new();
    if let Some(premise) = candidate.component(ComponentKind::Premise) {
        building.push_str(premise);
        if let Some(subpremise) = candidate.component(ComponentKind::Subpremise) {
            building.push(' ');
            building.push_str(subpremise);
        }
    }

    let mut street = String::new();
    if let Some(number) = candidate.component(ComponentKind::StreetNumber) {
        street.push_str(number);
    }
    if let Some(route) = candidate.component(ComponentKind::Route) {
        if !street.is_empty() {
            street.push(' ');
        }
        street.push_str(route);
    }

    let segments: Vec<&str> = [building.as_str(), street.as_str()]
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect();
    if segments.is_empty() {
        None
    } else {
        Some(segments.join(", ").trim().to_string())
    }
}

/// Prefer the first-level sublocality, appending the parent locality only
/// when it is a distinct, non-overlapping string
fn display_city(candidate: &AddressCandidate) -> Option<String> {
    if let Some(sublocality) = candidate.component(ComponentKind::SublocalityLevel1) {
        if let Some(locality) = candidate.component(ComponentKind::Locality) {
            if !overlapping(sublocality, locality) {
                return Some(format!("{}, {}", sublocality, locality));
            }
        }
        return Some(sublocality.to_string());
    }

    candidate
        .component(ComponentKind::Sublocality)
        .or_else(|| candidate.component(ComponentKind::Locality))
        .or_else(|| candidate.component(ComponentKind::AdminAreaLevel2))
        .map(str::to_string)
}

fn overlapping(a: &str, b: &str) -> bool {
    let a = a.to_lowercase();
    let b = b.to_lowercase();
    a.contains(&b) || b.contains(&a)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn component(long_name: &str, tags: &[&str]) -> AddressComponent {
        AddressComponent {
            long_name: long_name.to_string(),
            short_name: long_name.to_string(),
            types: tags.iter().map(|t| t.to_string()).collect(),
        }
    }

    fn candidate(types: &[&str], components: Vec<AddressComponent>) -> AddressCandidate {
        AddressCandidate {
            types: types.iter().map(|t| t.to_string()).collect(),
            formatted_address: "formatted".to_string(),
            address_components: components,
        }
    }

    fn street_address_with_sublocality() -> AddressCandidate {
        candidate(
            &["street_address"],
            vec![
                component("14", &["street_number"]),
                component("MG Road", &["route"]),
                component("Indiranagar", &["sublocality_level_1", "sublocality"]),
                component("Bengaluru", &["locality"]),
                component("Karnataka", &["administrative_area_level_1"]),
                component("India", &["country"]),
                component("560038", &["postal_code"]),
            ],
        )
    }

    #[test]
    fn test_street_address_with_sublocality_wins() {
        let route_only = candidate(
            &["route"],
            vec![component("MG Road", &["route"]), component("Bengaluru", &["locality"])],
        );
        let street = street_address_with_sublocality();

        // Rule 1 wins regardless of provider ordering
        let list = vec![route_only.clone(), street.clone()];
        let selected = select_candidate(&list).unwrap();
        assert!(selected.is_type("street_address"));

        let list = vec![street, route_only];
        let selected = select_candidate(&list).unwrap();
        assert!(selected.is_type("street_address"));
    }

    #[test]
    fn test_premise_with_locality_is_second_choice() {
        let premise = candidate(
            &["premise"],
            vec![
                component("Shanti Apartments", &["premise"]),
                component("Bengaluru", &["locality"]),
            ],
        );
        let route = candidate(&["route"], vec![component("MG Road", &["route"])]);

        let candidates = [route, premise];
        let selected = select_candidate(&candidates).unwrap();
        assert!(selected.is_type("premise"));
    }

    #[test]
    fn test_sublocality_upgrade_over_first() {
        let bare = candidate(&["route"], vec![component("Outer Ring Road", &["route"])]);
        let with_sublocality = candidate(
            &["route"],
            vec![
                component("Outer Ring Road", &["route"]),
                component("Koramangala", &["sublocality_level_1"]),
            ],
        );

        let candidates = [bare, with_sublocality];
        let selected = select_candidate(&candidates).unwrap();
        assert!(selected.has(ComponentKind::SublocalityLevel1));
    }

    #[test]
    fn test_falls_back_to_first_candidate() {
        let first = candidate(&["route"], vec![component("First Road", &["route"])]);
        let second = candidate(&["route"], vec![component("Second Road", &["route"])]);

        let candidates = [first, second];
        let selected = select_candidate(&candidates).unwrap();
        assert_eq!(selected.component(ComponentKind::Route), Some("First Road"));
    }

    #[test]
    fn test_first_occurrence_breaks_ties() {
        let a = street_address_with_sublocality();
        let mut b = street_address_with_sublocality();
        b.formatted_address = "second".to_string();

        let candidates = [a, b];
        let selected = select_candidate(&candidates).unwrap();
        assert_eq!(selected.formatted_address, "formatted");
    }

    #[test]
    fn test_select_empty_list() {
        assert!(select_candidate(&[]).is_none());
    }

    #[test]
    fn test_extract_full_candidate() {
        let extract = extract_address(&street_address_with_sublocality());

        assert_eq!(extract.address.as_deref(), Some("14 MG Road"));
        assert_eq!(extract.city.as_deref(), Some("Indiranagar, Bengaluru"));
        assert_eq!(extract.state.as_deref(), Some("Karnataka"));
        assert_eq!(extract.country.as_deref(), Some("India"));
        assert_eq!(extract.postal_code.as_deref(), Some("560038"));
        assert_eq!(extract.formatted_address.as_deref(), Some("formatted"));
    }

    #[test]
    fn test_premise_and_street_segments_joined() {
        let c = candidate(
            &["street_address"],
            vec![
                component("Prestige Towers", &["premise"]),
                component("Unit 4B", &["subpremise"]),
                component("14", &["street_number"]),
                component("MG Road", &["route"]),
            ],
        );

        let extract = extract_address(&c);
        assert_eq!(extract.address.as_deref(), Some("Prestige Towers Unit 4B, 14 MG Road"));
    }

    #[test]
    fn test_city_overlap_suppresses_locality() {
        let c = candidate(
            &["street_address"],
            vec![
                component("Bengaluru South", &["sublocality_level_1"]),
                component("Bengaluru", &["locality"]),
            ],
        );

        // "Bengaluru" is contained in "Bengaluru South": do not append it
        let extract = extract_address(&c);
        assert_eq!(extract.city.as_deref(), Some("Bengaluru South"));
    }

    #[test]
    fn test_city_fallback_chain() {
        let generic_sublocality = candidate(
            &["route"],
            vec![component("Shivajinagar", &["sublocality"])],
        );
        assert_eq!(
            extract_address(&generic_sublocality).city.as_deref(),
            Some("Shivajinagar")
        );

        let locality_only = candidate(&["route"], vec![component("Mysuru", &["locality"])]);
        assert_eq!(extract_address(&locality_only).city.as_deref(), Some("Mysuru"));

        let admin_only = candidate(
            &["route"],
            vec![component("Bengaluru Urban", &["administrative_area_level_2"])],
        );
        assert_eq!(extract_address(&admin_only).city.as_deref(), Some("Bengaluru Urban"));
    }

    #[test]
    fn test_extract_bare_candidate() {
        let c = candidate(&["plus_code"], vec![]);
        let extract = extract_address(&c);

        assert!(extract.address.is_none());
        assert!(extract.city.is_none());
        assert_eq!(extract.formatted_address.as_deref(), Some("formatted"));
    }

    #[test]
    fn test_candidate_deserialization() {
        let json = r#"{
            "types": ["street_address"],
            "formatted_address": "14 MG Road, Bengaluru",
            "address_components": [
                {"long_name": "14", "short_name": "14", "types": ["street_number"]}
            ]
        }"#;
        let c: AddressCandidate = serde_json::from_str(json).unwrap();
        assert!(c.is_type("street_address"));
        assert_eq!(c.component(ComponentKind::StreetNumber), Some("14"));
    }
}
