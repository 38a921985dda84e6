//! Keyword categorization of normalized ingredient names.
//!
//! Categories are probed in a fixed order and the first hit wins, so the
//! earlier lists effectively shadow the later ones ("eggplant" is produce
//! even though "egg" is protein). Names arrive already lowercased and
//! singularized.

use crate::types::IngredientCategory;

const PRODUCE_KEYWORDS: &[&str] = &[
    // vegetables
    "onion", "tomato", "potato", "lettuce", "carrot", "celery", "bell pepper", "cucumber",
    "zucchini", "broccoli", "cauliflower", "spinach", "kale", "cabbage", "mushroom", "eggplant",
    "squash", "pumpkin", "asparagus", "green bean", "pea", "corn", "avocado", "jalapeno",
    "jalapeño", "scallion", "green onion", "shallot", "leek", "garlic", "ginger", "radish",
    "beet", "turnip",
    // herbs
    "cilantro", "parsley", "basil", "mint", "thyme", "rosemary", "oregano", "dill", "sage",
    "chive", "herb",
    // fruits
    "apple", "banana", "orange", "lemon", "lime", "strawberry", "blueberry", "raspberry",
    "blackberry", "cranberry", "grape", "mango", "pineapple", "watermelon", "peach", "pear",
    "plum", "cherry", "kiwi", "pomegranate", "berry",
];

const PROTEIN_KEYWORDS: &[&str] = &[
    "chicken", "beef", "pork", "turkey", "lamb", "steak", "bacon", "sausage", "ham",
    "prosciutto", "chorizo", "salmon", "tuna", "cod", "tilapia", "halibut", "trout", "shrimp",
    "prawn", "scallop", "crab", "lobster", "anchov", "sardine", "fish", "egg", "tofu", "tempeh",
    "seitan", "edamame", "lentil", "chickpea", "black bean", "kidney bean", "pinto bean",
    "cannellini", "white bean",
];

const DAIRY_KEYWORDS: &[&str] = &[
    "milk", "cream", "butter", "cheese", "yogurt", "mozzarella", "cheddar", "parmesan", "feta",
    "ricotta", "mascarpone", "brie", "gouda", "provolone", "ghee", "buttermilk", "kefir",
    "half-and-half",
];

const GRAINS_KEYWORDS: &[&str] = &[
    "flour", "bread", "rice", "pasta", "noodle", "spaghetti", "macaroni", "penne", "oat",
    "oatmeal", "quinoa", "couscous", "barley", "tortilla", "pita", "bagel", "bun", "roll",
    "cracker", "breadcrumb", "panko", "cereal", "granola", "cornmeal", "polenta",
];

const PANTRY_KEYWORDS: &[&str] = &[
    "oil", "vinegar", "sugar", "honey", "maple syrup", "molasses", "soy sauce", "fish sauce",
    "worcestershire", "mustard", "mayonnaise", "ketchup", "salsa", "broth", "stock", "paste",
    "sauce", "salt", "pepper", "cumin", "paprika", "chili powder", "cinnamon", "nutmeg",
    "turmeric", "curry", "coriander", "cayenne", "saffron", "vanilla", "baking powder",
    "baking soda", "yeast", "cocoa", "chocolate", "almond", "walnut", "pecan", "peanut",
    "cashew", "pistachio", "seed", "sesame", "tahini", "coconut", "raisin", "date", "spice",
];

const CATEGORY_TABLE: &[(IngredientCategory, &[&str])] = &[
    (IngredientCategory::Produce, PRODUCE_KEYWORDS),
    (IngredientCategory::Protein, PROTEIN_KEYWORDS),
    (IngredientCategory::Dairy, DAIRY_KEYWORDS),
    (IngredientCategory::Grains, GRAINS_KEYWORDS),
    (IngredientCategory::Pantry, PANTRY_KEYWORDS),
];

/// Assign a grocery category to a normalized ingredient name.
pub fn categorize(name: &str) -> IngredientCategory {
    let name = name.to_lowercase();
    for (category, keywords) in CATEGORY_TABLE {
        if keywords.iter().any(|k| name.contains(k)) {
            return *category;
        }
    }
    IngredientCategory::Other
}
