use crate::domain::preferences::entities::UserPreferences;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DietClass {
    Vegan,
    Vegetarian,
    Pescatarian,
    Unrestricted,
}

impl DietClass {
    pub fn from_diet_type(diet_type: &str) -> Self {
        let diet = diet_type.trim().to_lowercase();

        if diet.contains("non-veg") || diet.contains("non veg") || diet.contains("nonveg") {
            DietClass::Unrestricted
        } else if diet.contains("vegan") || diet.contains("plant-based") || diet.contains("plant based") {
            DietClass::Vegan
        } else if diet.contains("vegetarian") {
            DietClass::Vegetarian
        } else if diet.contains("pescatarian") || diet.contains("pescetarian") {
            DietClass::Pescatarian
        } else {
            DietClass::Unrestricted
        }
    }

    /// Ingredient keywords the diet rules out.
    pub fn excluded_keywords(&self) -> Vec<&'static str> {
        match self {
            DietClass::Vegan => [MEAT, SEAFOOD, ANIMAL_PRODUCTS].concat(),
            DietClass::Vegetarian => [MEAT, SEAFOOD].concat(),
            DietClass::Pescatarian => MEAT.to_vec(),
            DietClass::Unrestricted => Vec::new(),
        }
    }

    fn constraint(&self) -> Option<&'static str> {
        match self {
            DietClass::Vegan => Some(
                "Diet is vegan: exclude meat, poultry, fish, seafood, eggs, dairy, honey and every other animal product.",
            ),
            DietClass::Vegetarian => {
                Some("Diet is vegetarian: exclude meat, poultry, fish and seafood.")
            }
            DietClass::Pescatarian => {
                Some("Diet is pescatarian: exclude meat and poultry; fish and seafood are allowed.")
            }
            DietClass::Unrestricted => None,
        }
    }
}

const MEAT: &[&str] = &[
    "meat", "beef", "steak", "pork", "bacon", "ham", "sausage", "chicken", "turkey", "duck",
    "lamb", "mutton", "goat", "veal", "venison", "chorizo", "pepperoni", "salami", "prosciutto",
    "gelatin",
];

const SEAFOOD: &[&str] = &[
    "fish", "salmon", "tuna", "cod", "tilapia", "sardine", "anchovy", "shrimp", "prawn", "crab",
    "lobster", "clam", "mussel", "oyster", "squid", "octopus", "scallop",
];

pub const ANIMAL_PRODUCTS: &[&str] = &[
    "egg", "milk", "cheese", "butter", "cream", "yogurt", "yoghurt", "ghee", "whey", "honey",
    "paneer", "mayonnaise",
];

/// Words that make a following dairy keyword plant-based ("almond milk").
pub const PLANT_QUALIFIERS: &[&str] = &[
    "almond", "oat", "soy", "coconut", "rice", "cashew", "peanut", "cocoa", "shea", "vegan",
    "plant", "nut",
];

const NO_ALLERGY_MARKERS: &[&str] = &["none", "no", "n/a", "na", "nil", "nothing", "no allergies"];

/// Individual allergens named in the free-text allergies preference.
pub fn allergens(preferences: &UserPreferences) -> Vec<String> {
    let Some(allergies) = preferences.get("allergies") else {
        return Vec::new();
    };

    let allergies = allergies.trim().to_lowercase();
    if NO_ALLERGY_MARKERS.contains(&allergies.as_str()) {
        return Vec::new();
    }

    allergies
        .replace(" and ", ",")
        .split([',', ';', '/'])
        .map(str::trim)
        .filter(|a| !a.is_empty() && !NO_ALLERGY_MARKERS.contains(a))
        .map(str::to_string)
        .collect()
}

fn is_specified(value: Option<&str>) -> Option<&str> {
    value.filter(|v| {
        let v = v.trim().to_lowercase();
        !v.is_empty() && v != "not specified" && v != "none" && v != "any"
    })
}

/// Rules every generated recipe must satisfy, derived from the preferences.
pub fn hard_constraints(preferences: &UserPreferences) -> Vec<String> {
    let mut constraints = Vec::new();

    let allergens = allergens(preferences);
    if !allergens.is_empty() {
        constraints.push(format!(
            "Never include these allergens or anything derived from them: {}.",
            allergens.join(", ")
        ));
    }

    let diet = DietClass::from_diet_type(preferences.get("diet_type").unwrap_or_default());
    if let Some(rule) = diet.constraint() {
        constraints.push(rule.to_string());
    }

    if let Some(target) = is_specified(preferences.get("calorie_target")) {
        constraints.push(format!(
            "Adjust portions and macros so one serving fits the calorie target: {target}."
        ));
    }

    if let Some(goal) = is_specified(preferences.get("fitness_goal")) {
        constraints.push(format!(
            "Balance protein, carbs and fat toward the fitness goal: {goal}."
        ));
    }

    if let Some(time) = is_specified(preferences.get("cooking_time")) {
        constraints.push(format!("Respect the cooking time preference: {time}."));
    }

    constraints
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::storage::entities::into_object;
    use serde_json::json;

    fn prefs(value: serde_json::Value) -> UserPreferences {
        UserPreferences::resolve(&into_object(value))
    }

    #[test]
    fn test_diet_classification() {
        assert_eq!(DietClass::from_diet_type("non-vegetarian"), DietClass::Unrestricted);
        assert_eq!(DietClass::from_diet_type("Vegan"), DietClass::Vegan);
        assert_eq!(DietClass::from_diet_type("lacto vegetarian"), DietClass::Vegetarian);
        assert_eq!(DietClass::from_diet_type("pescatarian"), DietClass::Pescatarian);
        assert_eq!(DietClass::from_diet_type("keto"), DietClass::Unrestricted);
    }

    #[test]
    fn test_allergens_are_split_and_none_is_ignored() {
        assert!(allergens(&UserPreferences::defaults()).is_empty());
        assert_eq!(
            allergens(&prefs(json!({"allergies": "Peanuts, shellfish and soy"}))),
            vec!["peanuts".to_string(), "shellfish".to_string(), "soy".to_string()]
        );
    }

    #[test]
    fn test_defaults_only_constrain_fitness_and_time() {
        let constraints = hard_constraints(&UserPreferences::defaults());
        assert_eq!(constraints.len(), 2);
        assert!(constraints[0].contains("general health"));
        assert!(constraints[1].contains("moderate"));
    }

    #[test]
    fn test_vegan_with_allergy_and_calories() {
        let constraints = hard_constraints(&prefs(json!({
            "diet_type": "vegan",
            "allergies": "peanuts",
            "calorie_target": "1800 kcal"
        })));
        let joined = constraints.join("\n");

        assert!(joined.contains("peanuts"));
        assert!(joined.contains("Diet is vegan"));
        assert!(joined.contains("1800 kcal"));
    }
}
