//! Plain-text rendering of a shopping list for the clipboard.

use std::collections::BTreeMap;

use crate::types::ShoppingItem;

/// Render quantities without trailing zeros: 2.00 -> "2", 1.50 -> "1.5".
fn format_quantity(quantity: f64) -> String {
    let mut s = format!("{quantity:.2}");
    while s.ends_with('0') {
        s.pop();
    }
    if s.ends_with('.') {
        s.pop();
    }
    s
}

/// Naive plural for unit display: es after a sibilant-ish ending, s
/// otherwise.
fn pluralize_unit(unit: &str) -> String {
    if unit.ends_with("ch") || unit.ends_with("sh") || unit.ends_with('s') || unit.ends_with('x') {
        format!("{unit}es")
    } else {
        format!("{unit}s")
    }
}

/// Group items by category and render one checklist section per category,
/// categories in alphabetical order.
pub fn format_for_clipboard(items: &[ShoppingItem]) -> String {
    let mut by_category: BTreeMap<&str, Vec<&ShoppingItem>> = BTreeMap::new();
    for item in items {
        by_category
            .entry(item.category.as_str())
            .or_default()
            .push(item);
    }

    let mut out = String::new();
    for (category, items) in by_category {
        if !out.is_empty() {
            out.push('\n');
        }
        out.push_str(&format!("--- {} ---\n", category.to_uppercase()));
        for item in items {
            let quantity = format_quantity(item.quantity);
            if item.unit.is_empty() {
                out.push_str(&format!("[ ] {} — {}\n", item.name, quantity));
            } else {
                let unit = if item.quantity > 1.0 {
                    pluralize_unit(&item.unit)
                } else {
                    item.unit.clone()
                };
                out.push_str(&format!("[ ] {} — {} {}\n", item.name, quantity, unit));
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::IngredientCategory;

    #[test]
    fn quantities_drop_trailing_zeros() {
        assert_eq!(format_quantity(2.0), "2");
        assert_eq!(format_quantity(1.5), "1.5");
        assert_eq!(format_quantity(0.33), "0.33");
        assert_eq!(format_quantity(2.5), "2.5");
    }

    #[test]
    fn units_pluralize_past_one() {
        assert_eq!(pluralize_unit("cup"), "cups");
        assert_eq!(pluralize_unit("bunch"), "bunches");
        assert_eq!(pluralize_unit("dash"), "dashes");
    }

    #[test]
    fn sections_group_by_category_alphabetically() {
        let items = vec![
            ShoppingItem::new("rice", 2.0, "cup", IngredientCategory::Grains),
            ShoppingItem::new("garlic", 2.0, "clove", IngredientCategory::Produce),
            ShoppingItem::new("onion", 1.0, "", IngredientCategory::Produce),
        ];
        let text = format_for_clipboard(&items);

        let grains_at = text.find("--- GRAINS ---").unwrap();
        let produce_at = text.find("--- PRODUCE ---").unwrap();
        assert!(grains_at < produce_at);
        assert!(text.contains("[ ] rice — 2 cups"));
        assert!(text.contains("[ ] garlic — 2 cloves"));
        assert!(text.contains("[ ] onion — 1"), "unitless lines skip the unit");
    }
}
