//! Free-text ingredient parsing.
//!
//! One line in, one `(quantity, unit, name, category)` out. Parsing never
//! fails outright: a missing quantity defaults to 1, an unknown unit stays
//! empty and a name that normalizes to nothing is the caller's signal to
//! drop the line.

use serde::{Deserialize, Serialize};

use crate::categorization::categorize;
use crate::normalize::{normalize_name, strip_parenthesized};
use crate::types::IngredientCategory;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedIngredient {
    pub quantity: f64,
    pub unit: String,
    pub name: String,
    pub category: IngredientCategory,
}

/// Unit spellings folded to their canonical singular. "lb" is canonical
/// over "pound".
fn canonical_unit(token: &str) -> Option<&'static str> {
    Some(match token {
        "cup" | "cups" => "cup",
        "tbsp" => "tbsp",
        "tablespoon" | "tablespoons" => "tablespoon",
        "tsp" => "tsp",
        "teaspoon" | "teaspoons" => "teaspoon",
        "oz" | "ounce" | "ounces" => "oz",
        "lb" | "lbs" | "pound" | "pounds" => "lb",
        "g" | "gram" | "grams" => "g",
        "kg" => "kg",
        "ml" => "ml",
        "liter" | "liters" => "liter",
        "clove" | "cloves" => "clove",
        "can" | "cans" => "can",
        "bunch" | "bunches" => "bunch",
        "pinch" => "pinch",
        "dash" => "dash",
        "slice" | "slices" => "slice",
        "piece" | "pieces" => "piece",
        "stalk" | "stalks" => "stalk",
        "head" | "heads" => "head",
        "sprig" | "sprigs" => "sprig",
        _ => return None,
    })
}

fn vulgar_value(c: char) -> Option<f64> {
    Some(match c {
        '½' => 0.5,
        '⅓' => 1.0 / 3.0,
        '⅔' => 2.0 / 3.0,
        '¼' => 0.25,
        '¾' => 0.75,
        '⅕' => 0.2,
        '⅖' => 0.4,
        '⅗' => 0.6,
        '⅘' => 0.8,
        '⅙' => 1.0 / 6.0,
        '⅚' => 5.0 / 6.0,
        '⅛' => 0.125,
        '⅜' => 0.375,
        '⅝' => 0.625,
        '⅞' => 0.875,
        _ => return None,
    })
}

fn parse_integer(token: &str) -> Option<f64> {
    token.parse::<u32>().ok().map(f64::from)
}

fn parse_fraction(token: &str) -> Option<f64> {
    let (num, den) = token.split_once('/')?;
    let num: f64 = num.parse::<u32>().ok().map(f64::from)?;
    let den: f64 = den.parse::<u32>().ok().map(f64::from)?;
    if den == 0.0 {
        return None;
    }
    Some(num / den)
}

/// Decimal, integer, lone vulgar fraction, or a decimal immediately
/// followed by a vulgar fraction ("1½" is 1.5).
fn parse_decimal_or_vulgar(token: &str) -> Option<f64> {
    if let Some(last) = token.chars().last() {
        if let Some(frac) = vulgar_value(last) {
            let rest: String = token.chars().take(token.chars().count() - 1).collect();
            if rest.is_empty() {
                return Some(frac);
            }
            if let Ok(whole) = rest.parse::<f64>() {
                if whole >= 0.0 {
                    return Some(whole + frac);
                }
            }
            return None;
        }
    }
    token.parse::<f64>().ok().filter(|v| *v >= 0.0)
}

/// Consume a leading quantity, trying mixed fraction, plain fraction,
/// decimal/integer, then vulgar fraction.
fn take_quantity(tokens: &[&str], idx: &mut usize) -> Option<f64> {
    let first = *tokens.get(*idx)?;

    if let Some(whole) = parse_integer(first) {
        if let Some(frac) = tokens.get(*idx + 1).and_then(|t| parse_fraction(t)) {
            *idx += 2;
            return Some(whole + frac);
        }
    }
    if let Some(frac) = parse_fraction(first) {
        *idx += 1;
        return Some(frac);
    }
    if let Some(value) = parse_decimal_or_vulgar(first) {
        *idx += 1;
        return Some(value);
    }
    None
}

/// Consume a unit token, folding plurals and a trailing period; a
/// following "of" is discarded.
fn take_unit(tokens: &[&str], idx: &mut usize) -> Option<String> {
    let token = tokens.get(*idx)?;
    let trimmed = token.trim_end_matches('.').to_lowercase();
    let canonical = canonical_unit(&trimmed)?;
    *idx += 1;
    if tokens
        .get(*idx)
        .is_some_and(|t| t.eq_ignore_ascii_case("of"))
    {
        *idx += 1;
    }
    Some(canonical.to_string())
}

/// Parse one free-text ingredient line.
pub fn parse_ingredient(raw: &str) -> ParsedIngredient {
    let cleaned = strip_parenthesized(raw);
    let tokens: Vec<&str> = cleaned.split_whitespace().collect();

    let mut idx = 0;
    let quantity = take_quantity(&tokens, &mut idx).unwrap_or(1.0);
    let unit = take_unit(&tokens, &mut idx).unwrap_or_default();

    let name = normalize_name(&tokens[idx..].join(" "));
    let category = if name.is_empty() {
        IngredientCategory::Other
    } else {
        categorize(&name)
    };

    ParsedIngredient {
        quantity,
        unit,
        name,
        category,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mixed_fraction_with_unit_and_comma_qualifier() {
        let parsed = parse_ingredient("1 1/2 cups all-purpose flour, sifted");
        assert_eq!(parsed.quantity, 1.5);
        assert_eq!(parsed.unit, "cup");
        assert_eq!(parsed.name, "all-purpose flour");
        assert_eq!(parsed.category, IngredientCategory::Grains);
    }

    #[test]
    fn vulgar_fraction_quantity() {
        let parsed = parse_ingredient("½ cup chopped fresh cilantro");
        assert_eq!(parsed.quantity, 0.5);
        assert_eq!(parsed.unit, "cup");
        assert_eq!(parsed.name, "cilantro");
        assert_eq!(parsed.category, IngredientCategory::Produce);
    }

    #[test]
    fn decimal_followed_by_vulgar_fraction_sums() {
        let parsed = parse_ingredient("1½ cups milk");
        assert_eq!(parsed.quantity, 1.5);
        assert_eq!(parsed.unit, "cup");
        assert_eq!(parsed.name, "milk");
        assert_eq!(parsed.category, IngredientCategory::Dairy);
    }

    #[test]
    fn plain_fraction_quantity() {
        let parsed = parse_ingredient("3/4 tsp ground cumin");
        assert_eq!(parsed.quantity, 0.75);
        assert_eq!(parsed.unit, "tsp");
        assert_eq!(parsed.category, IngredientCategory::Pantry);
    }

    #[test]
    fn missing_quantity_defaults_to_one() {
        let parsed = parse_ingredient("pinch of saffron");
        assert_eq!(parsed.quantity, 1.0);
        assert_eq!(parsed.unit, "pinch");
        assert_eq!(parsed.name, "saffron");
    }

    #[test]
    fn unit_plurals_fold_to_canonical_singular() {
        assert_eq!(parse_ingredient("2 lbs chicken thighs").unit, "lb");
        assert_eq!(parse_ingredient("3 pounds potatoes").unit, "lb");
        assert_eq!(parse_ingredient("2 tablespoons olive oil").unit, "tablespoon");
        assert_eq!(parse_ingredient("1 clove garlic, minced").unit, "clove");
    }

    #[test]
    fn trailing_period_on_unit_is_accepted() {
        let parsed = parse_ingredient("2 tbsp. butter");
        assert_eq!(parsed.unit, "tbsp");
        assert_eq!(parsed.name, "butter");
    }

    #[test]
    fn of_after_unit_is_discarded() {
        let parsed = parse_ingredient("2 cups of brown rice");
        assert_eq!(parsed.unit, "cup");
        assert_eq!(parsed.name, "brown rice");
        assert_eq!(parsed.category, IngredientCategory::Grains);
    }

    #[test]
    fn no_unit_keeps_unit_empty() {
        let parsed = parse_ingredient("2 eggs");
        assert_eq!(parsed.quantity, 2.0);
        assert_eq!(parsed.unit, "");
        assert_eq!(parsed.name, "egg");
        assert_eq!(parsed.category, IngredientCategory::Protein);
    }

    #[test]
    fn parenthesized_detail_is_ignored() {
        let parsed = parse_ingredient("1 can (15 oz) black beans, drained");
        assert_eq!(parsed.quantity, 1.0);
        assert_eq!(parsed.unit, "can");
        assert_eq!(parsed.name, "black bean");
    }

    #[test]
    fn unparseable_name_comes_back_empty() {
        let parsed = parse_ingredient("2 large");
        assert_eq!(parsed.name, "");
        assert_eq!(parsed.category, IngredientCategory::Other);
    }
}
