//! Text normalisation shared by matching and lookup.

use std::sync::LazyLock;

use regex::Regex;

/// Canonical form every health-facility variant folds into.
pub const CANONICAL_FACILITY: &str = "centro de saude";

/// Word-level abbreviations expanded after accent folding.
const ABBREVIATIONS: &[(&str, &str)] = &[
    ("av", "avenida"),
    ("ave", "avenida"),
    ("aven", "avenida"),
    ("r", "rua"),
    ("ru", "rua"),
    ("tv", "travessa"),
    ("trav", "travessa"),
    ("pca", "praca"),
    ("al", "alameda"),
    ("alam", "alameda"),
    ("rod", "rodovia"),
    ("rodov", "rodovia"),
    ("est", "estrada"),
    ("estr", "estrada"),
    ("lg", "largo"),
    ("lgo", "largo"),
    ("qd", "quadra"),
    ("quad", "quadra"),
    ("bl", "bloco"),
    ("cj", "conjunto"),
    ("conj", "conjunto"),
    ("res", "residencial"),
    ("resid", "residencial"),
    ("st", "santa"),
    ("sta", "santa"),
];

/// Ways people refer to a public health unit, already accent-free.
const FACILITY_VARIANTS: &[&str] = &[
    "posto",
    "posto de saude",
    "posto saude",
    "posto medico",
    "posto assistencial",
    "posto de atendimento",
    "posto saude familiar",
    "unidade basica",
    "unidade basica saude",
    "unidade basica de saude",
    "unidade de saude",
    "unidade saude",
    "unidade mista",
    "unidade publica",
    "ubs",
    "ubs usf",
    "centro",
    "centro de saude",
    "centro saude",
    "centro medico",
    "centro assistencial",
    "cs",
    "clinica basica",
    "clinica da familia",
    "clinica familia",
    "policlinica",
    "caps",
];

static PUNCTUATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\s]").expect("valid punctuation pattern"));

static FACILITY: LazyLock<Regex> = LazyLock::new(|| {
    let mut variants = FACILITY_VARIANTS.to_vec();
    // Leftmost-first alternation: longer variants must win.
    variants.sort_by_key(|v| std::cmp::Reverse(v.len()));
    let alternation = variants
        .iter()
        .map(|v| regex::escape(v))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"\b(?:{alternation})\b")).expect("valid facility pattern")
});

/// Normalise free text for matching.
///
/// Lowercases, strips accents and punctuation, expands abbreviations, folds
/// facility variants into [`CANONICAL_FACILITY`] and collapses whitespace.
#[must_use]
pub fn normalize(text: &str) -> String {
    let folded = deunicode::deunicode(&text.trim().to_lowercase());
    let stripped = PUNCTUATION.replace_all(&folded, "");

    let expanded = stripped
        .split_whitespace()
        .map(|word| {
            ABBREVIATIONS
                .iter()
                .find(|(abbr, _)| *abbr == word)
                .map_or(word, |(_, full)| full)
        })
        .collect::<Vec<_>>()
        .join(" ");

    FACILITY
        .replace_all(&expanded, CANONICAL_FACILITY)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Byte offset of `phrase` in `text` as a run of whole words.
///
/// Both arguments must already be normalised.
#[must_use]
pub fn find_phrase(text: &str, phrase: &str) -> Option<usize> {
    if phrase.is_empty() {
        return None;
    }
    let haystack = format!(" {text} ");
    let needle = format!(" {phrase} ");
    haystack.find(&needle)
}

/// Title-case each alphabetic run, like Python's `str.title`.
#[must_use]
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev_alpha = false;
    for c in text.chars() {
        if c.is_alphabetic() {
            if prev_alpha {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(c);
            prev_alpha = false;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accents_case_and_punctuation() {
        assert_eq!(normalize("  São   Gabriel!! "), "sao gabriel");
        assert_eq!(normalize("Região Noroeste?"), "regiao noroeste");
    }

    #[test]
    fn test_abbreviations_expand() {
        assert_eq!(normalize("Av. Amazonas"), "avenida amazonas");
        assert_eq!(normalize("R Itapecerica"), "rua itapecerica");
        assert_eq!(normalize("Sta Lúcia"), "santa lucia");
    }

    #[test]
    fn test_facility_variants_fold() {
        assert_eq!(normalize("posto de saúde Lagoa"), "centro de saude lagoa");
        assert_eq!(normalize("UBS Lagoa"), "centro de saude lagoa");
        assert_eq!(normalize("CS Lagoa"), "centro de saude lagoa");
        assert_eq!(normalize("Centro de Saúde Lagoa"), "centro de saude lagoa");
        assert_eq!(normalize("Unidade Básica de Saúde Lagoa"), "centro de saude lagoa");
    }

    #[test]
    fn test_normalize_is_stable() {
        let once = normalize("Posto Médico Santa Lúcia");
        assert_eq!(normalize(&once), once);
    }

    #[test]
    fn test_find_phrase_respects_word_boundaries() {
        assert_eq!(find_phrase("bairro lagoa", "lagoa"), Some(7));
        assert_eq!(find_phrase("bairro lagoinha", "lagoa"), None);
        assert_eq!(find_phrase("qualquer", ""), None);
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("SANTA LÚCIA"), "Santa Lúcia");
        assert_eq!(title_case("joão pinheiro-velho"), "João Pinheiro-Velho");
    }
}
