// Symptom collection: sanitizing, validating and holding the symptom set

use crate::models::SymptomCategory;
use crate::validation::ValidationError;

pub const DEFAULT_MAX_SYMPTOMS: usize = 10;
pub const MIN_SYMPTOM_LEN: usize = 2;
pub const MAX_SYMPTOM_LEN: usize = 30;

/// Sanitize raw user input into a symptom token.
///
/// Strips characters outside `[a-zA-Z0-9\s\-_]`, trims, lowercases and
/// joins whitespace-separated words with `_`.
pub fn sanitize_symptom(raw: &str) -> String {
    let kept: String = raw
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || c.is_whitespace() || *c == '-' || *c == '_')
        .collect();
    kept.split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .to_lowercase()
}

/// Ordered, size-bounded set of normalized symptom tokens.
///
/// Both the tag input and the checklist go through [`SymptomSet::add`],
/// so they enforce the same rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymptomSet {
    tokens: Vec<String>,
    max: usize,
}

impl SymptomSet {
    pub fn new(max: usize) -> Self {
        Self {
            tokens: Vec::new(),
            max,
        }
    }

    /// Validate a raw token against the current set without adding it.
    ///
    /// # Rules (first failure wins)
    /// 1. Sanitized value must not be empty
    /// 2. Length must be within 2..=30
    /// 3. No case-insensitive duplicate
    /// 4. Set must not be at capacity
    pub fn check(&self, raw: &str) -> Result<String, ValidationError> {
        let token = sanitize_symptom(raw);
        if token.is_empty() {
            return Err(ValidationError::EmptySymptom);
        }
        let len = token.chars().count();
        if len < MIN_SYMPTOM_LEN {
            return Err(ValidationError::SymptomTooShort { min: MIN_SYMPTOM_LEN });
        }
        if len > MAX_SYMPTOM_LEN {
            return Err(ValidationError::SymptomTooLong { max: MAX_SYMPTOM_LEN });
        }
        if self.contains(&token) {
            return Err(ValidationError::DuplicateSymptom(token));
        }
        if self.tokens.len() >= self.max {
            return Err(ValidationError::TooManySymptoms(self.max));
        }
        Ok(token)
    }

    /// Add a symptom; the set is left untouched on error
    pub fn add(&mut self, raw: &str) -> Result<(), ValidationError> {
        let token = self.check(raw)?;
        self.tokens.push(token);
        Ok(())
    }

    /// Remove a symptom (no-op when absent)
    pub fn remove(&mut self, raw: &str) {
        let token = sanitize_symptom(raw);
        self.tokens.retain(|t| !t.eq_ignore_ascii_case(&token));
    }

    /// Checkbox semantics: add when absent, remove when present.
    /// Returns whether the symptom is selected afterwards.
    pub fn toggle(&mut self, raw: &str) -> Result<bool, ValidationError> {
        let token = sanitize_symptom(raw);
        if self.contains(&token) {
            self.remove(&token);
            Ok(false)
        } else {
            self.add(raw)?;
            Ok(true)
        }
    }

    pub fn clear(&mut self) {
        self.tokens.clear();
    }

    pub fn contains(&self, raw: &str) -> bool {
        let token = sanitize_symptom(raw);
        self.tokens.iter().any(|t| t.eq_ignore_ascii_case(&token))
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.tokens.len() >= self.max
    }

    pub fn max(&self) -> usize {
        self.max
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.tokens
    }

    /// Comma-joined value for the `symptoms` form field, `None` when empty
    pub fn to_form_value(&self) -> Option<String> {
        if self.tokens.is_empty() {
            None
        } else {
            Some(self.tokens.join(","))
        }
    }
}

impl Default for SymptomSet {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_SYMPTOMS)
    }
}

/// Category-grouped symptom list used by the checklist and autocomplete
#[derive(Debug, Clone, PartialEq)]
pub struct SymptomCatalog {
    categories: Vec<SymptomCategory>,
}

const BUILTIN_CATEGORIES: &[(&str, &[&str])] = &[
    (
        "Skin Appearance",
        &["redness", "patches", "spots", "bumps", "scaly_skin", "discoloration", "white_patches", "rash", "hives"],
    ),
    (
        "Sensations",
        &["itching", "burning", "pain", "tenderness", "stinging", "numbness", "tingling", "soreness"],
    ),
    (
        "Texture Changes",
        &["dry_skin", "rough_texture", "waxy_growth", "firm_bump", "thick_plaques", "thickened_skin"],
    ),
    (
        "Lesion Changes",
        &["rapid_growth", "irregular_border", "color_variation", "changing_shape", "spreading", "new_growth"],
    ),
    (
        "Surface Issues",
        &["bleeding", "crusting", "oozing", "ulceration", "peeling", "cracking", "blisters"],
    ),
    (
        "Acne Symptoms",
        &["pimples", "blackheads", "whiteheads", "oily_skin", "cysts", "nodules", "pustules"],
    ),
    (
        "Fungal Signs",
        &["ring_shaped_rash", "red_border", "clear_center", "nail_changes", "hair_loss"],
    ),
    (
        "Systemic Symptoms",
        &["fever", "fatigue", "joint_pain", "swelling", "mouth_sores", "eye_irritation"],
    ),
];

impl SymptomCatalog {
    pub fn new(categories: Vec<SymptomCategory>) -> Self {
        Self { categories }
    }

    /// Catalog shipped with the client, used until the server list arrives
    pub fn builtin() -> Self {
        let categories = BUILTIN_CATEGORIES
            .iter()
            .map(|(name, symptoms)| SymptomCategory {
                name: name.to_string(),
                symptoms: symptoms.iter().map(|s| s.to_string()).collect(),
            })
            .collect();
        Self { categories }
    }

    pub fn categories(&self) -> &[SymptomCategory] {
        &self.categories
    }

    /// Every distinct symptom, in category order
    pub fn all(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for symptom in self.categories.iter().flat_map(|c| c.symptoms.iter()) {
            if !seen.contains(&symptom.as_str()) {
                seen.push(symptom);
            }
        }
        seen
    }

    /// Autocomplete suggestions for `query`, excluding already-selected tokens.
    /// Prefix matches come before substring matches.
    pub fn suggest(&self, query: &str, selected: &SymptomSet, limit: usize) -> Vec<String> {
        let needle = sanitize_symptom(query);
        if needle.is_empty() {
            return Vec::new();
        }

        let candidates: Vec<&str> = self
            .all()
            .into_iter()
            .filter(|s| !selected.contains(s) && s.contains(needle.as_str()))
            .collect();

        let (mut prefix, rest): (Vec<&str>, Vec<&str>) =
            candidates.into_iter().partition(|s| s.starts_with(needle.as_str()));
        prefix.extend(rest);
        prefix.into_iter().take(limit).map(str::to_string).collect()
    }
}

impl Default for SymptomCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_strips_and_lowercases() {
        assert_eq!(sanitize_symptom("  Itching!! "), "itching");
        assert_eq!(sanitize_symptom("Dry   Skin"), "dry_skin");
        assert_eq!(sanitize_symptom("red-ness<script>"), "red-nessscript");
        assert_eq!(sanitize_symptom("@@@"), "");
    }

    #[test]
    fn test_add_accepts_valid_token() {
        let mut set = SymptomSet::default();
        set.add("Itching").unwrap();
        assert_eq!(set.as_slice(), &["itching".to_string()]);
    }

    #[test]
    fn test_rule_order_first_failure_wins() {
        let mut set = SymptomSet::new(1);
        set.add("redness").unwrap();

        // Empty beats everything else
        assert_eq!(set.add("!!"), Err(ValidationError::EmptySymptom));
        // Length before duplicate / capacity
        assert_eq!(set.add("a"), Err(ValidationError::SymptomTooShort { min: 2 }));
        assert_eq!(
            set.add(&"x".repeat(31)),
            Err(ValidationError::SymptomTooLong { max: 30 })
        );
        // Duplicate before capacity
        assert_eq!(
            set.add("REDNESS"),
            Err(ValidationError::DuplicateSymptom("redness".to_string()))
        );
        assert_eq!(set.add("itching"), Err(ValidationError::TooManySymptoms(1)));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_length_bounds_inclusive() {
        let mut set = SymptomSet::default();
        assert!(set.add("ab").is_ok());
        assert!(set.add(&"y".repeat(30)).is_ok());
    }

    #[test]
    fn test_never_exceeds_max() {
        let mut set = SymptomSet::new(3);
        for s in ["aa", "bb", "cc", "dd", "ee"] {
            let _ = set.add(s);
        }
        assert_eq!(set.len(), 3);
        assert!(set.is_full());
    }

    #[test]
    fn test_clear_twice_is_idempotent() {
        let mut set = SymptomSet::default();
        set.add("itching").unwrap();
        set.clear();
        assert!(set.is_empty());
        set.clear();
        assert!(set.is_empty());
    }

    #[test]
    fn test_toggle() {
        let mut set = SymptomSet::default();
        assert_eq!(set.toggle("Dry skin"), Ok(true));
        assert!(set.contains("dry_skin"));
        assert_eq!(set.toggle("dry_skin"), Ok(false));
        assert!(set.is_empty());
    }

    #[test]
    fn test_remove_is_case_insensitive() {
        let mut set = SymptomSet::default();
        set.add("itching").unwrap();
        set.remove("ITCHING");
        assert!(set.is_empty());
        // Removing something absent is fine
        set.remove("redness");
    }

    #[test]
    fn test_form_value() {
        let mut set = SymptomSet::default();
        assert_eq!(set.to_form_value(), None);
        set.add("itching").unwrap();
        set.add("redness").unwrap();
        assert_eq!(set.to_form_value().as_deref(), Some("itching,redness"));
    }

    #[test]
    fn test_suggest_prefers_prefix_and_skips_selected() {
        let catalog = SymptomCatalog::builtin();
        let mut selected = SymptomSet::default();
        selected.add("redness").unwrap();

        let suggestions = catalog.suggest("red", &selected, 5);
        assert!(!suggestions.contains(&"redness".to_string()));
        assert_eq!(suggestions.first().map(String::as_str), Some("red_border"));
    }

    #[test]
    fn test_suggest_respects_limit_and_empty_query() {
        let catalog = SymptomCatalog::builtin();
        let selected = SymptomSet::default();
        assert!(catalog.suggest("  ", &selected, 5).is_empty());
        assert!(catalog.suggest("s", &selected, 3).len() <= 3);
    }

    #[test]
    fn test_all_is_deduplicated() {
        let catalog = SymptomCatalog::new(vec![
            SymptomCategory { name: "A".into(), symptoms: vec!["itching".into(), "redness".into()] },
            SymptomCategory { name: "B".into(), symptoms: vec!["redness".into()] },
        ]);
        assert_eq!(catalog.all(), vec!["itching", "redness"]);
    }
}
