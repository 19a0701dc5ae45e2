//! Health-centre records and CSV loading.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::DirectoryError;
use super::normalize::title_case;

/// A public health centre as presented to users.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthCenter {
    pub name: String,
    /// Formatted street address.
    pub address: String,
    pub neighborhood: String,
    /// Formatted phone numbers, empty if unknown.
    pub phone: String,
    pub district: String,
}

/// One row of the city's open-data export.
#[derive(Debug, Deserialize)]
struct RawRecord {
    #[serde(rename = "NOME_CENTRO_SAUDE")]
    name: Option<String>,
    #[serde(rename = "TIPO_LOGRADOURO_CS")]
    street_type: Option<String>,
    #[serde(rename = "NOME_LOGRADOURO_CS")]
    street: Option<String>,
    #[serde(rename = "NUMERO_IMOVEL_CS")]
    number: Option<String>,
    #[serde(rename = "NOME_BAIRRO_POPULAR_CS")]
    neighborhood: Option<String>,
    #[serde(rename = "TELEFONE_CENTRO_SAUDE")]
    phone: Option<String>,
    #[serde(rename = "DISTRITO_SANITARIO")]
    district: Option<String>,
}

impl RawRecord {
    fn into_center(self) -> Option<HealthCenter> {
        let name = non_empty(self.name)?;
        let neighborhood = non_empty(self.neighborhood).unwrap_or_default();
        let address = format_address(
            self.street_type.as_deref().unwrap_or_default(),
            self.street.as_deref(),
            self.number.as_deref(),
            &neighborhood,
        );

        Some(HealthCenter {
            name,
            address,
            neighborhood,
            phone: normalize_phone(self.phone.as_deref().unwrap_or_default()),
            district: non_empty(self.district).unwrap_or_default(),
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

/// Load health centres from a CSV file.
///
/// The file is read as UTF-8, falling back to Latin-1. Semicolon is tried as
/// the delimiter before comma.
pub fn load_centers(path: &Path) -> Result<Vec<HealthCenter>, DirectoryError> {
    info!(name: "directory.load.started", path = %path.display(), "Loading health centres");
    let bytes = std::fs::read(path).map_err(|source| DirectoryError::Io {
        path: path.display().to_string(),
        source,
    })?;

    let text = match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => {
            warn!(name: "directory.load.latin1", "File is not UTF-8, decoding as Latin-1");
            e.into_bytes().iter().map(|&b| char::from(b)).collect()
        }
    };

    let centers = parse_centers(&text, b';').or_else(|_| parse_centers(&text, b','))?;
    info!(name: "directory.load.finished", records = centers.len(), "Health centres loaded");
    Ok(centers)
}

/// Parse CSV text with the given delimiter.
///
/// Rows without a name are dropped, as are repeated names (first wins).
pub fn parse_centers(text: &str, delimiter: u8) -> Result<Vec<HealthCenter>, DirectoryError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let headers = reader.headers()?.clone();
    for required in ["NOME_CENTRO_SAUDE", "NOME_BAIRRO_POPULAR_CS"] {
        if !headers.iter().any(|h| h == required) {
            return Err(DirectoryError::MissingColumn(required));
        }
    }

    let mut seen = HashSet::new();
    let mut centers = Vec::new();
    for row in reader.deserialize::<RawRecord>() {
        let Some(center) = row?.into_center() else {
            continue;
        };
        if seen.insert(center.name.clone()) {
            centers.push(center);
        }
    }
    Ok(centers)
}

/// Format phone numbers from the export.
///
/// `"32777487,32777488"` becomes `"(31) 3277-7487 / (31) 3277-7488"`.
#[must_use]
pub fn normalize_phone(raw: &str) -> String {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == ',')
        .collect();

    cleaned
        .split(',')
        .filter(|n| !n.is_empty())
        .map(|n| match n.len() {
            8 => format!("(31) {}-{}", &n[..4], &n[4..]),
            10 => format!("({}) {}-{}", &n[..2], &n[2..6], &n[6..]),
            11 => format!("({}) {}-{}", &n[..2], &n[2..7], &n[7..]),
            _ => n.to_string(),
        })
        .collect::<Vec<_>>()
        .join(" / ")
}

/// Format a street address: `"Rua Itapecerica, 123 - Lagoinha"`.
#[must_use]
pub fn format_address(
    street_type: &str,
    street: Option<&str>,
    number: Option<&str>,
    neighborhood: &str,
) -> String {
    let street_type = match street_type.trim() {
        "AVE" => "Avenida",
        "R" => "Rua",
        "TV" => "Travessa",
        "PCA" => "Praça",
        "AL" => "Alameda",
        "ROD" => "Rodovia",
        other => other,
    };
    let street = street.map(title_case).unwrap_or_default();
    let number = number
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .unwrap_or("s/n");

    format!(
        "{street_type} {street}, {number} - {}",
        title_case(neighborhood)
    )
}
