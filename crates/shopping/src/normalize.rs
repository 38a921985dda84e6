//! Ingredient noun-phrase normalization.
//!
//! `normalize_name` boils a free-text ingredient tail down to a lowercase
//! singular noun phrase usable as an aggregation key. The function is
//! idempotent: running it over its own output changes nothing.

use std::sync::LazyLock;

use regex::Regex;

/// Trailing qualifier phrases that never belong to the ingredient itself.
static TRAILING_PHRASES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)[,\s]*\b(to taste|divided|or more\b.*|as needed|plus more\b.*|at room temperature|cut into\b.*|like\s+.+|such as\s+.+|for\s+.+|preferably\b.*|store-bought|if available)\s*$",
    )
    .expect("valid trailing-phrase pattern")
});

/// Measurements embedded mid-name, e.g. "8 oz" in "8 oz can crushed tomato".
static EMBEDDED_MEASUREMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:\d+\s+)?\d+(?:[./]\d+)?\s*(?:oz|ounces?|cups?|lbs?|pounds?|grams?|g|kg|ml|liters?|tablespoons?|teaspoons?|tbsp|tsp)\b\.?",
    )
    .expect("valid embedded-measurement pattern")
});

/// Tokens that carry preparation, size or freshness detail rather than
/// identity.
const STRIP_WORDS: &[&str] = &[
    // prep verbs
    "chopped", "minced", "diced", "sliced", "grated", "shredded", "crumbled", "crushed", "melted",
    "softened", "beaten", "whisked", "cooked", "uncooked", "peeled", "seeded", "stemmed",
    "trimmed", "rinsed", "drained", "packed", "pitted", "halved", "quartered", "cubed", "torn",
    "toasted", "boneless", "skinless",
    // size adjectives
    "large", "medium", "small", "big", "jumbo", "extra", "baby", "thick", "thin", "heaping",
    "level", "generous",
    // freshness markers
    "fresh", "freshly", "frozen", "ripe", "raw",
    // adverbs and connectives
    "finely", "coarsely", "thinly", "roughly", "lightly", "very", "and", "of", "with", "without",
    "into", "about", "optional",
];

const LEADING_CONJUNCTIONS: &[&str] = &["and", "or", "then", "plus"];

/// Irregular plurals checked before the suffix rules.
const IRREGULAR_SINGULARS: &[(&str, &str)] = &[
    ("leaves", "leaf"),
    ("loaves", "loaf"),
    ("halves", "half"),
    ("knives", "knife"),
    ("feet", "foot"),
];

/// Drop every parenthesized run, including nested ones.
pub fn strip_parenthesized(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut depth = 0usize;
    for c in s.chars() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            _ if depth == 0 => out.push(c),
            _ => {}
        }
    }
    out
}

/// Reduce a plural token to its singular form.
///
/// Irregular table first, then suffix rules: ies -> y, oes -> o,
/// ches/shes -> ch/sh, ses -> s, and a trailing single s is dropped except
/// after ss or us.
pub fn singularize(token: &str) -> String {
    for (plural, singular) in IRREGULAR_SINGULARS {
        if token == *plural {
            return (*singular).to_string();
        }
    }
    if let Some(stem) = token.strip_suffix("ies") {
        if stem.len() > 1 {
            return format!("{stem}y");
        }
    }
    if token.ends_with("oes") || token.ends_with("ches") || token.ends_with("shes") || token.ends_with("ses") {
        return token[..token.len() - 2].to_string();
    }
    if token.ends_with('s') && !token.ends_with("ss") && !token.ends_with("us") {
        return token[..token.len() - 1].to_string();
    }
    token.to_string()
}

/// Tokens with no letters at all are loose numerics ("2", "1/2", "1-2")
/// left behind by quantity text; they never name an ingredient.
fn is_bare_number(token: &str) -> bool {
    !token.chars().any(|c| c.is_alphabetic())
}

/// Normalize a raw ingredient tail into its aggregation key.
///
/// Returns the empty string when nothing meaningful is left (length <= 1
/// after trimming), which callers treat as "drop this line".
pub fn normalize_name(raw: &str) -> String {
    let mut s = strip_parenthesized(raw);

    // Qualifier phrases can stack ("divided, or more to taste"), so strip
    // until the tail is clean.
    loop {
        let stripped = TRAILING_PHRASES.replace(&s, "").into_owned();
        if stripped == s {
            break;
        }
        s = stripped;
    }

    if let Some(comma) = s.find(',') {
        s.truncate(comma);
    }

    s = EMBEDDED_MEASUREMENT.replace_all(&s, " ").into_owned();
    s = s.to_lowercase();

    let mut tokens: Vec<&str> = s.split_whitespace().collect();
    while let Some(first) = tokens.first() {
        if LEADING_CONJUNCTIONS.contains(first) {
            tokens.remove(0);
        } else {
            break;
        }
    }

    let normalized: Vec<String> = tokens
        .into_iter()
        .filter(|t| !STRIP_WORDS.contains(t))
        .filter(|t| !is_bare_number(t))
        .map(singularize)
        .collect();

    let result = normalized.join(" ").trim().to_string();
    if result.chars().count() <= 1 {
        String::new()
    } else {
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_prep_and_freshness_words() {
        assert_eq!(normalize_name("chopped fresh cilantro"), "cilantro");
        assert_eq!(normalize_name("finely minced garlic"), "garlic");
    }

    #[test]
    fn trims_at_the_first_comma() {
        assert_eq!(normalize_name("all-purpose flour, sifted"), "all-purpose flour");
        assert_eq!(normalize_name("garlic, minced"), "garlic");
    }

    #[test]
    fn removes_parenthesized_detail() {
        assert_eq!(normalize_name("butter (at room temperature)"), "butter");
        assert_eq!(normalize_name("tomatoes (about 3 (ripe))"), "tomato");
    }

    #[test]
    fn strips_trailing_qualifier_phrases() {
        assert_eq!(normalize_name("olive oil to taste"), "olive oil");
        assert_eq!(normalize_name("parsley for garnish"), "parsley");
        assert_eq!(normalize_name("onion cut into wedges"), "onion");
        assert_eq!(normalize_name("flour plus more for dusting"), "flour");
    }

    #[test]
    fn removes_embedded_measurements() {
        assert_eq!(normalize_name("8 oz cream cheese"), "cream cheese");
        assert_eq!(normalize_name("2 cups baby spinach"), "spinach");
    }

    #[test]
    fn singularizes_common_plural_shapes() {
        assert_eq!(singularize("berries"), "berry");
        assert_eq!(singularize("tomatoes"), "tomato");
        assert_eq!(singularize("bunches"), "bunch");
        assert_eq!(singularize("radishes"), "radish");
        assert_eq!(singularize("buses"), "bus");
        assert_eq!(singularize("carrots"), "carrot");
        assert_eq!(singularize("glass"), "glass");
        assert_eq!(singularize("asparagus"), "asparagus");
        assert_eq!(singularize("leaves"), "leaf");
    }

    #[test]
    fn drops_bare_numbers_and_leading_conjunctions() {
        assert_eq!(normalize_name("and 2 carrots"), "carrot");
        assert_eq!(normalize_name("or 1/2 onion"), "onion");
    }

    #[test]
    fn salt_and_pepper_collapses() {
        assert_eq!(normalize_name("salt and pepper"), "salt pepper");
    }

    #[test]
    fn too_short_results_become_empty() {
        assert_eq!(normalize_name("2"), "");
        assert_eq!(normalize_name("chopped"), "");
    }

    #[test]
    fn normalize_is_idempotent() {
        let samples = [
            "1 1/2 cups all-purpose flour, sifted",
            "chopped fresh cilantro",
            "8 oz cream cheese (softened)",
            "salt and pepper to taste",
            "3 large eggs, beaten",
            "baby spinach leaves",
            "boneless skinless chicken thighs",
            "butter plus more for the pan",
        ];
        for sample in samples {
            let once = normalize_name(sample);
            let twice = normalize_name(&once);
            assert_eq!(once, twice, "normalization must be idempotent for {sample:?}");
        }
    }
}
