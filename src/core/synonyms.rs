use serde::Deserialize;
use std::collections::{BTreeMap, HashSet};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// Errors raised while loading the category dictionary at startup.
///
/// All of these are fatal: no resolution is possible without a valid
/// dictionary.
#[derive(Debug, Error)]
pub enum DictionaryError {
    #[error("Failed to read dictionary file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse dictionary file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Dictionary contains an empty canonical label")]
    EmptyLabel,

    #[error("Duplicate canonical label '{0}'")]
    DuplicateLabel(String),

    #[error("Synonym list for '{0}' contains an empty string")]
    EmptySynonym(String),

    #[error("Synonym list for '{0}' contains duplicate '{1}'")]
    DuplicateSynonym(String, String),
}

#[derive(Debug, Deserialize)]
struct DictionaryFile {
    categories: BTreeMap<String, Vec<String>>,
}

#[derive(Debug, Clone)]
struct Entry {
    /// Display label as declared, e.g. "Electricians"
    label: String,
    /// Normalized lookup key, e.g. "electricians"
    key: String,
    /// Normalized synonyms, order preserved
    synonyms: Vec<String>,
}

/// Immutable canonical-label -> synonym-set mapping, loaded once at process
/// start and shared across requests.
///
/// Every canonical label maps to a term set containing at least itself; the
/// canonical is implicit, so synonym lists never repeat it. Labels and
/// synonyms are normalized (trimmed, lowercased) at construction.
#[derive(Debug, Clone)]
pub struct CategoryDictionary {
    entries: Vec<Entry>,
}

impl CategoryDictionary {
    /// Build a dictionary from (label, synonyms) pairs, enforcing the
    /// no-empty, no-duplicate invariants.
    pub fn from_entries<L, S>(pairs: Vec<(L, Vec<S>)>) -> Result<Self, DictionaryError>
    where
        L: AsRef<str>,
        S: AsRef<str>,
    {
        let mut entries: Vec<Entry> = Vec::with_capacity(pairs.len());
        let mut seen_keys: HashSet<String> = HashSet::new();

        for (label, synonyms) in pairs {
            let label = label.as_ref().trim().to_string();
            let key = label.to_lowercase();
            if key.is_empty() {
                return Err(DictionaryError::EmptyLabel);
            }
            if !seen_keys.insert(key.clone()) {
                return Err(DictionaryError::DuplicateLabel(label));
            }

            let mut normalized: Vec<String> = Vec::with_capacity(synonyms.len());
            let mut seen: HashSet<String> = HashSet::new();
            for synonym in synonyms {
                let synonym = synonym.as_ref().trim().to_lowercase();
                if synonym.is_empty() {
                    return Err(DictionaryError::EmptySynonym(label));
                }
                // The canonical label is implicitly in its own set
                if synonym == key || !seen.insert(synonym.clone()) {
                    return Err(DictionaryError::DuplicateSynonym(label, synonym));
                }
                normalized.push(synonym);
            }

            entries.push(Entry {
                label,
                key,
                synonyms: normalized,
            });
        }

        Ok(Self { entries })
    }

    /// Parse a `[categories]` TOML table
    pub fn from_toml(raw: &str) -> Result<Self, DictionaryError> {
        let file: DictionaryFile = toml::from_str(raw)?;
        Self::from_entries(file.categories.into_iter().collect())
    }

    /// Load from a TOML file on disk
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, DictionaryError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_toml(&raw)
    }

    /// The dictionary shipped in the binary, mirroring the marketplace's
    /// service catalogue. Used when no dictionary file is configured.
    pub fn builtin() -> Result<Self, DictionaryError> {
        Self::from_entries(vec![
            (
                "Cleaning Services",
                vec![
                    "cleaning",
                    "house cleaning",
                    "commercial cleaning",
                    "deep cleaning",
                ],
            ),
            (
                "Plumbers",
                vec![
                    "plumbing",
                    "plumbing services",
                    "professional plumbing services",
                    "residential plumbing",
                    "commercial plumbing",
                ],
            ),
            (
                "Electricians",
                vec!["electrical services", "electrical", "electric", "electrician"],
            ),
            (
                "Carpenters",
                vec![
                    "carpentry",
                    "carpentry services",
                    "custom furniture",
                    "deck building",
                ],
            ),
            (
                "Flooring",
                vec![
                    "flooring installation",
                    "hardwood flooring",
                    "tile installation",
                ],
            ),
            (
                "Painters",
                vec![
                    "painting",
                    "interior painting",
                    "exterior painting",
                    "commercial painting",
                ],
            ),
            ("Handyman", vec!["general repairs", "home repairs", "maintenance"]),
            (
                "HVAC Services",
                vec!["hvac", "heating", "cooling", "air conditioning", "ventilation"],
            ),
            (
                "General Contractor",
                vec!["general contracting", "construction", "contracting"],
            ),
            (
                "Roofing",
                vec!["roof repair", "roof installation", "commercial roofing"],
            ),
            (
                "Landscaping",
                vec!["lawn care", "garden maintenance", "outdoor services"],
            ),
            (
                "Renovations",
                vec!["home renovation", "remodeling", "kitchen renovation"],
            ),
        ])
    }

    /// Load the configured dictionary file, or the builtin one
    pub fn load(path: Option<&Path>) -> Result<Self, DictionaryError> {
        match path {
            Some(path) => Self::from_path(path),
            None => Self::builtin(),
        }
    }

    /// Synonyms for a normalized canonical key, if known
    pub fn synonyms(&self, key: &str) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|e| e.key == key)
            .map(|e| e.synonyms.as_slice())
    }

    /// Canonical display labels. Builtin entries keep their declaration
    /// order; dictionaries parsed from TOML iterate in sorted label order.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.label.as_str())
    }

    /// Canonical keys whose synonym list contains `term`
    fn reverse_keys<'a>(&'a self, term: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.entries
            .iter()
            .filter(move |e| e.synonyms.iter().any(|s| s == term))
            .map(|e| e.key.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Expands a user-facing category label into the full ordered term set:
/// the label itself, its synonyms, and every canonical whose synonym list
/// contains the label (reverse lookup).
#[derive(Debug, Clone)]
pub struct SynonymResolver {
    dictionary: Arc<CategoryDictionary>,
}

impl SynonymResolver {
    pub fn new(dictionary: Arc<CategoryDictionary>) -> Self {
        Self { dictionary }
    }

    pub fn dictionary(&self) -> &CategoryDictionary {
        &self.dictionary
    }

    /// Resolve a label into a duplicate-free, first-seen-ordered term set.
    ///
    /// Unknown labels fall back to a single-element literal set; blank
    /// labels resolve to an empty set, which callers must treat as "no
    /// category filter".
    pub fn resolve(&self, label: &str) -> Vec<String> {
        let label = label.trim().to_lowercase();
        if label.is_empty() {
            return Vec::new();
        }

        let mut terms: Vec<String> = vec![label.clone()];

        if let Some(synonyms) = self.dictionary.synonyms(&label) {
            terms.extend(synonyms.iter().cloned());
        }

        for key in self.dictionary.reverse_keys(&label) {
            terms.push(key.to_string());
        }

        let mut seen: HashSet<String> = HashSet::new();
        terms.retain(|t| !t.is_empty() && seen.insert(t.clone()));
        terms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver() -> SynonymResolver {
        SynonymResolver::new(Arc::new(CategoryDictionary::builtin().unwrap()))
    }

    #[test]
    fn test_builtin_dictionary_is_valid() {
        let dictionary = CategoryDictionary::builtin().unwrap();
        assert!(!dictionary.is_empty());
        assert_eq!(dictionary.labels().count(), dictionary.len());
    }

    #[test]
    fn test_resolve_canonical_expansion() {
        let terms = resolver().resolve("Electricians");
        assert_eq!(
            terms,
            vec![
                "electricians",
                "electrical services",
                "electrical",
                "electric",
                "electrician"
            ]
        );
    }

    #[test]
    fn test_resolve_normalizes_input() {
        let terms = resolver().resolve("  ELECTRICIANS  ");
        assert_eq!(terms[0], "electricians");
        assert!(terms.contains(&"electrical services".to_string()));
    }

    #[test]
    fn test_reverse_lookup_finds_canonical() {
        let terms = resolver().resolve("electrical");
        assert_eq!(terms[0], "electrical");
        assert!(terms.contains(&"electricians".to_string()));
    }

    #[test]
    fn test_unknown_label_is_literal_fallback() {
        let terms = resolver().resolve("snow removal");
        assert_eq!(terms, vec!["snow removal"]);
    }

    #[test]
    fn test_blank_label_resolves_empty() {
        assert!(resolver().resolve("").is_empty());
        assert!(resolver().resolve("   ").is_empty());
    }

    #[test]
    fn test_resolve_has_no_duplicates() {
        let resolver = resolver();
        for label in CategoryDictionary::builtin().unwrap().labels() {
            let terms = resolver.resolve(label);
            let unique: HashSet<&String> = terms.iter().collect();
            assert_eq!(unique.len(), terms.len(), "duplicates for {}", label);
            assert!(terms.contains(&label.to_lowercase()));
        }
    }

    #[test]
    fn test_rejects_empty_synonym() {
        let result = CategoryDictionary::from_entries(vec![("Plumbers", vec!["plumbing", "  "])]);
        assert!(matches!(result, Err(DictionaryError::EmptySynonym(_))));
    }

    #[test]
    fn test_rejects_duplicate_synonym() {
        let result =
            CategoryDictionary::from_entries(vec![("Plumbers", vec!["plumbing", "Plumbing"])]);
        assert!(matches!(result, Err(DictionaryError::DuplicateSynonym(_, _))));
    }

    #[test]
    fn test_rejects_duplicate_label() {
        let result = CategoryDictionary::from_entries(vec![
            ("Plumbers", vec!["plumbing"]),
            ("plumbers", vec!["pipes"]),
        ]);
        assert!(matches!(result, Err(DictionaryError::DuplicateLabel(_))));
    }

    #[test]
    fn test_from_toml() {
        let dictionary = CategoryDictionary::from_toml(
            r#"
            [categories]
            "Electricians" = ["electrical services", "electrical"]
            "#,
        )
        .unwrap();
        assert_eq!(dictionary.len(), 1);
        assert_eq!(
            dictionary.synonyms("electricians").unwrap(),
            &["electrical services", "electrical"]
        );
    }

    #[test]
    fn test_toml_labels_iterate_sorted() {
        let dictionary = CategoryDictionary::from_toml(
            r#"
            [categories]
            "Roofing" = ["roof repair"]
            "Electricians" = ["electrical"]
            "#,
        )
        .unwrap();
        let labels: Vec<&str> = dictionary.labels().collect();
        assert_eq!(labels, vec!["Electricians", "Roofing"]);
    }
}
