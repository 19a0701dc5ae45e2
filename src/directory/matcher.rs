//! Entity extraction and lookup over the loaded centres.

use serde::Serialize;
use tracing::debug;

use super::normalize::{find_phrase, normalize};
use super::record::HealthCenter;

/// Words that mark the question as being about a neighbourhood.
const NEIGHBORHOOD_KEYWORDS: &[&str] = &[
    "bairro",
    "vila",
    "comunidade",
    "localidade",
    "setor",
    "nucleo",
    "quadra",
    "conjunto",
    "residencial",
    "loteamento",
    "parque",
    "jardim",
    "favela",
    "morro",
];

/// Words that mark the question as being about a health district.
const DISTRICT_KEYWORDS: &[&str] = &[
    "regiao",
    "distrito",
    "area",
    "zona",
    "regional",
    "territorio",
];

/// What a question refers to, as normalised phrases.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Entities {
    #[serde(rename = "centro_saude")]
    pub center: Option<String>,
    #[serde(rename = "distrito")]
    pub district: Option<String>,
    #[serde(rename = "bairro")]
    pub neighborhood: Option<String>,
}

/// Finds known phrases in normalised text.
#[derive(Debug, Clone, Default)]
struct PhraseSet {
    phrases: Vec<String>,
}

impl PhraseSet {
    fn new<'a>(values: impl Iterator<Item = &'a str>) -> Self {
        let mut phrases: Vec<String> = values.map(normalize).filter(|p| !p.is_empty()).collect();
        phrases.sort();
        phrases.dedup();
        Self { phrases }
    }

    /// Earliest match in `text`; longer phrases win ties.
    fn first_match(&self, text: &str) -> Option<String> {
        self.phrases
            .iter()
            .filter_map(|p| find_phrase(text, p).map(|pos| (pos, p)))
            .min_by_key(|(pos, p)| (*pos, std::cmp::Reverse(p.len())))
            .map(|(_, p)| p.clone())
    }
}

/// Column a lookup searched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchKind {
    Center,
    Neighborhood,
    District,
}

/// Searchable index over the centres.
#[derive(Debug, Clone)]
pub struct Matcher {
    centers: Vec<IndexedCenter>,
    center_names: PhraseSet,
    districts: PhraseSet,
    neighborhoods: PhraseSet,
}

#[derive(Debug, Clone)]
struct IndexedCenter {
    center: HealthCenter,
    name: String,
    neighborhood: String,
    district: String,
}

impl Matcher {
    #[must_use]
    pub fn new(centers: Vec<HealthCenter>) -> Self {
        let center_names = PhraseSet::new(centers.iter().map(|c| c.name.as_str()));
        let districts = PhraseSet::new(centers.iter().map(|c| c.district.as_str()));
        let neighborhoods = PhraseSet::new(centers.iter().map(|c| c.neighborhood.as_str()));

        let centers = centers
            .into_iter()
            .map(|center| IndexedCenter {
                name: normalize(&center.name),
                neighborhood: normalize(&center.neighborhood),
                district: normalize(&center.district),
                center,
            })
            .collect();

        Self {
            centers,
            center_names,
            districts,
            neighborhoods,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.centers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.centers.is_empty()
    }

    /// Extract what the question refers to.
    ///
    /// A centre name is always picked up. A district keyword restricts the
    /// rest to districts, a neighbourhood keyword to neighbourhoods; with
    /// neither, a district is preferred over a neighbourhood.
    #[must_use]
    pub fn extract(&self, text: &str) -> Entities {
        let normalized = normalize(text);
        let has_keyword =
            |keywords: &[&str]| normalized.split(' ').any(|word| keywords.contains(&word));

        let mut entities = Entities {
            center: self.center_names.first_match(&normalized),
            ..Entities::default()
        };

        if has_keyword(DISTRICT_KEYWORDS) {
            entities.district = self.districts.first_match(&normalized);
        } else if has_keyword(NEIGHBORHOOD_KEYWORDS) {
            entities.neighborhood = self.neighborhoods.first_match(&normalized);
        } else {
            entities.district = self.districts.first_match(&normalized);
            if entities.district.is_none() {
                entities.neighborhood = self.neighborhoods.first_match(&normalized);
            }
        }
        entities
    }

    /// Look up centres for the extracted entities.
    ///
    /// Tries centre name, then neighbourhood, then district; the first
    /// search with results wins and results are never mixed.
    #[must_use]
    pub fn lookup(&self, entities: &Entities) -> Option<(SearchKind, Vec<&HealthCenter>)> {
        let searches = [
            (SearchKind::Center, entities.center.as_deref()),
            (SearchKind::Neighborhood, entities.neighborhood.as_deref()),
            (SearchKind::District, entities.district.as_deref()),
        ];

        for (kind, term) in searches {
            let Some(term) = term else { continue };
            let term = normalize(term);
            if term.is_empty() {
                continue;
            }

            let found: Vec<&HealthCenter> = self
                .centers
                .iter()
                .filter(|c| c.column(kind).contains(&term))
                .map(|c| &c.center)
                .collect();

            if !found.is_empty() {
                debug!(name: "directory.lookup.hit", kind = ?kind, term = %term, results = found.len(), "Centres found");
                return Some((kind, found));
            }
        }

        debug!(name: "directory.lookup.miss", entities = ?entities, "No centre found");
        None
    }
}

impl IndexedCenter {
    fn column(&self, kind: SearchKind) -> &str {
        match kind {
            SearchKind::Center => &self.name,
            SearchKind::Neighborhood => &self.neighborhood,
            SearchKind::District => &self.district,
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn center(name: &str, neighborhood: &str, district: &str) -> HealthCenter {
        HealthCenter {
            name: name.to_string(),
            address: format!("Rua Um, 1 - {neighborhood}"),
            neighborhood: neighborhood.to_string(),
            phone: "(31) 3277-0000".to_string(),
            district: district.to_string(),
        }
    }

    pub(crate) fn sample() -> Matcher {
        Matcher::new(vec![
            center("CENTRO DE SAUDE LAGOA", "LAGOA", "NOROESTE"),
            center("CENTRO DE SAUDE PADRE EUSTAQUIO", "PADRE EUSTAQUIO", "NOROESTE"),
            center("CENTRO DE SAUDE SANTA LUCIA", "SANTA LUCIA", "CENTRO-SUL"),
            center("CENTRO DE SAUDE BARREIRO", "BARREIRO", "BARREIRO"),
        ])
    }

    #[test]
    fn test_center_name_from_variant() {
        let entities = sample().extract("Onde fica o posto de saúde Santa Lúcia?");
        assert_eq!(
            entities.center.as_deref(),
            Some("centro de saude santa lucia")
        );
    }

    #[test]
    fn test_district_keyword_restricts_to_district() {
        let entities = sample().extract("centros na região noroeste do bairro lagoa");
        assert_eq!(entities.district.as_deref(), Some("noroeste"));
        assert_eq!(entities.neighborhood, None);
    }

    #[test]
    fn test_neighborhood_keyword_restricts_to_neighborhood() {
        let entities = sample().extract("quero atendimento no bairro Lagoa");
        assert_eq!(entities.neighborhood.as_deref(), Some("lagoa"));
        assert_eq!(entities.district, None);
    }

    #[test]
    fn test_no_keyword_prefers_district() {
        let entities = sample().extract("barreiro");
        assert_eq!(entities.district.as_deref(), Some("barreiro"));
        assert_eq!(entities.neighborhood, None);

        let entities = sample().extract("padre eustaquio");
        assert_eq!(entities.district, None);
        assert_eq!(entities.neighborhood.as_deref(), Some("padre eustaquio"));
    }

    #[test]
    fn test_lookup_priority_never_mixes() {
        let matcher = sample();
        let entities = Entities {
            center: Some("centro de saude lagoa".to_string()),
            district: Some("noroeste".to_string()),
            neighborhood: None,
        };
        let (kind, found) = matcher.lookup(&entities).unwrap();
        assert_eq!(kind, SearchKind::Center);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "CENTRO DE SAUDE LAGOA");
    }

    #[test]
    fn test_lookup_by_district() {
        let matcher = sample();
        let entities = matcher.extract("distrito noroeste");
        let (kind, found) = matcher.lookup(&entities).unwrap();
        assert_eq!(kind, SearchKind::District);
        assert_eq!(found.len(), 2);
    }

    #[test]
    fn test_lookup_miss() {
        let matcher = sample();
        assert!(matcher.lookup(&matcher.extract("bom dia")).is_none());
    }
}
