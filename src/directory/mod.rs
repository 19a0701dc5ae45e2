//! Health-centre directory: the service behind `/api/chat`.
//!
//! Answers questions like "onde fica o posto de saúde da Lagoa?" by matching
//! centre names, neighbourhoods and health districts from the city's
//! open-data export.
//!
//! # Pipeline
//!
//! 1. [`normalize`]: accent, abbreviation and facility-name folding
//! 2. [`Matcher::extract`]: find the centre, neighbourhood or district asked about
//! 3. [`Matcher::lookup`]: fetch centres, one search kind at a time
//! 4. [`compose_reply`]: HTML reply text

mod matcher;
mod normalize;
mod record;
mod reply;

pub use matcher::{Entities, Matcher, SearchKind};
pub use normalize::{CANONICAL_FACILITY, normalize};
pub use record::{HealthCenter, format_address, load_centers, normalize_phone, parse_centers};
pub use reply::{NO_MATCH_TEXT, compose_reply};

use std::path::Path;

/// Errors that can occur while loading the directory.
#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    /// The data file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The data file is not valid CSV.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A required column is absent.
    #[error("required column {0} is missing")]
    MissingColumn(&'static str),
}

/// Result of answering one question.
#[derive(Debug, Clone, serde::Serialize)]
pub struct Answer {
    pub response: String,
    pub entities: Entities,
    pub center_info: Option<Vec<HealthCenter>>,
}

/// Loaded directory.
#[derive(Debug, Clone)]
pub struct Directory {
    matcher: Matcher,
}

impl Directory {
    /// Load from a CSV export.
    pub fn load(path: &Path) -> Result<Self, DirectoryError> {
        Ok(Self::from_centers(load_centers(path)?))
    }

    #[must_use]
    pub fn from_centers(centers: Vec<HealthCenter>) -> Self {
        Self {
            matcher: Matcher::new(centers),
        }
    }

    /// Number of centres loaded.
    #[must_use]
    pub fn len(&self) -> usize {
        self.matcher.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.matcher.is_empty()
    }

    /// Answer a question.
    #[must_use]
    pub fn answer(&self, question: &str) -> Answer {
        let entities = self.matcher.extract(question);
        let found = self
            .matcher
            .lookup(&entities)
            .map(|(_, centers)| centers)
            .unwrap_or_default();

        Answer {
            response: compose_reply(&entities, &found),
            center_info: (!found.is_empty())
                .then(|| found.iter().map(|c| (*c).clone()).collect()),
            entities,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_answer_by_center_name() {
        let directory = Directory {
            matcher: matcher::tests::sample(),
        };
        let answer = directory.answer("Qual o telefone da UBS Padre Eustáquio?");

        assert!(answer.response.starts_with("Encontrei 1 centro(s) de saúde:"));
        assert!(answer.response.contains("<b>CENTRO DE SAUDE PADRE EUSTAQUIO</b>"));
        assert_eq!(answer.center_info.unwrap().len(), 1);
    }

    #[test]
    fn test_answer_without_match() {
        let directory = Directory {
            matcher: matcher::tests::sample(),
        };
        let answer = directory.answer("que horas são?");

        assert_eq!(answer.response, NO_MATCH_TEXT);
        assert!(answer.center_info.is_none());
        assert_eq!(answer.entities, Entities::default());
    }
}
