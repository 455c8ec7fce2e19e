//! Per-serving nutrition facts and the reference values used to fill gaps.
//!
//! The reference dish is one samosa. Whenever the model omits a field, the
//! reference value stands in so every panel can be rendered.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Vitamin codes and their reference amounts.
pub const REFERENCE_VITAMINS: [(&str, f64); 11] = [
    ("A", 80.0),
    ("C", 4.0),
    ("D", 0.0),
    ("E", 1.2),
    ("K", 8.0),
    ("B1", 0.1),
    ("B2", 0.08),
    ("B3", 1.5),
    ("B6", 0.2),
    ("B12", 0.0),
    ("Folate", 40.0),
];

/// Mineral names and their reference amounts.
pub const REFERENCE_MINERALS: [(&str, f64); 7] = [
    ("Calcium", 25.0),
    ("Iron", 1.8),
    ("Magnesium", 30.0),
    ("Phosphorus", 80.0),
    ("Potassium", 210.0),
    ("Sodium", 380.0),
    ("Zinc", 0.5),
];

/// The six headline nutrients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Macro {
    Calories,
    Protein,
    Carbs,
    Fat,
    Sugar,
    Fiber,
}

impl Macro {
    pub const ALL: [Macro; 6] = [
        Macro::Calories,
        Macro::Protein,
        Macro::Carbs,
        Macro::Fat,
        Macro::Sugar,
        Macro::Fiber,
    ];

    /// Field name in the model's JSON.
    pub fn key(&self) -> &'static str {
        match self {
            Macro::Calories => "calories",
            Macro::Protein => "protein",
            Macro::Carbs => "carbs",
            Macro::Fat => "fat",
            Macro::Sugar => "sugar",
            Macro::Fiber => "fiber",
        }
    }

    pub fn reference(&self) -> f64 {
        match self {
            Macro::Calories => 262.0,
            Macro::Protein => 4.5,
            Macro::Carbs => 28.0,
            Macro::Fat => 16.0,
            Macro::Sugar => 1.5,
            Macro::Fiber => 2.5,
        }
    }

    /// Daily value on a 2,000 kcal diet (kcal or grams).
    pub fn daily_value(&self) -> f64 {
        match self {
            Macro::Calories => 2000.0,
            Macro::Protein => 50.0,
            Macro::Carbs => 300.0,
            Macro::Fat => 65.0,
            Macro::Fiber => 25.0,
            Macro::Sugar => 50.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct NutritionInfo {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    pub sugar: f64,
    pub fiber: f64,
    pub vitamins: BTreeMap<String, f64>,
    pub minerals: BTreeMap<String, f64>,
}

/// Share of macro calories contributed by each macronutrient, in percent.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, ToSchema)]
pub struct MacroSplit {
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

/// What the nutrition panel shows next to the raw values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NutritionSummary {
    pub macro_calories: f64,
    pub macro_split: MacroSplit,
    /// Percent of daily value, keyed like the nutrition fields ("calories", "fiber", ...).
    pub daily_values: BTreeMap<String, f64>,
}

impl NutritionInfo {
    /// The reference dish's values for every field.
    pub fn reference() -> Self {
        let mut info = Self::zeroed();
        for nutrient in Macro::ALL {
            info.set(nutrient, nutrient.reference());
        }
        info.vitamins = REFERENCE_VITAMINS
            .iter()
            .map(|(code, value)| (code.to_string(), *value))
            .collect();
        info.minerals = REFERENCE_MINERALS
            .iter()
            .map(|(name, value)| (name.to_string(), *value))
            .collect();
        info
    }

    /// Every field present, every value zero.
    pub fn zeroed() -> Self {
        Self {
            calories: 0.0,
            protein: 0.0,
            carbs: 0.0,
            fat: 0.0,
            sugar: 0.0,
            fiber: 0.0,
            vitamins: REFERENCE_VITAMINS
                .iter()
                .map(|(code, _)| (code.to_string(), 0.0))
                .collect(),
            minerals: REFERENCE_MINERALS
                .iter()
                .map(|(name, _)| (name.to_string(), 0.0))
                .collect(),
        }
    }

    pub fn get(&self, nutrient: Macro) -> f64 {
        match nutrient {
            Macro::Calories => self.calories,
            Macro::Protein => self.protein,
            Macro::Carbs => self.carbs,
            Macro::Fat => self.fat,
            Macro::Sugar => self.sugar,
            Macro::Fiber => self.fiber,
        }
    }

    pub fn set(&mut self, nutrient: Macro, value: f64) {
        let slot = match nutrient {
            Macro::Calories => &mut self.calories,
            Macro::Protein => &mut self.protein,
            Macro::Carbs => &mut self.carbs,
            Macro::Fat => &mut self.fat,
            Macro::Sugar => &mut self.sugar,
            Macro::Fiber => &mut self.fiber,
        };
        *slot = value;
    }

    /// Energy from protein and carbs (4 kcal/g) and fat (9 kcal/g).
    pub fn macro_calories(&self) -> f64 {
        self.protein * 4.0 + self.carbs * 4.0 + self.fat * 9.0
    }

    pub fn macro_split(&self) -> MacroSplit {
        let total = self.macro_calories();
        if total <= 0.0 {
            return MacroSplit::default();
        }
        MacroSplit {
            protein: self.protein * 4.0 / total * 100.0,
            carbs: self.carbs * 4.0 / total * 100.0,
            fat: self.fat * 9.0 / total * 100.0,
        }
    }

    pub fn daily_value_percent(&self, nutrient: Macro) -> f64 {
        self.get(nutrient) / nutrient.daily_value() * 100.0
    }

    pub fn summary(&self) -> NutritionSummary {
        NutritionSummary {
            macro_calories: self.macro_calories(),
            macro_split: self.macro_split(),
            daily_values: Macro::ALL
                .iter()
                .map(|nutrient| (nutrient.key().to_string(), self.daily_value_percent(*nutrient)))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_has_all_keys() {
        let info = NutritionInfo::reference();
        assert_eq!(info.vitamins.len() + info.minerals.len(), 18);
        assert_eq!(info.calories, 262.0);
        assert_eq!(info.vitamins["Folate"], 40.0);
        assert_eq!(info.minerals["Sodium"], 380.0);
    }

    #[test]
    fn test_zeroed_keeps_keys() {
        let info = NutritionInfo::zeroed();
        assert_eq!(info.vitamins.len(), 11);
        assert_eq!(info.minerals.len(), 7);
        assert!(info.vitamins.values().all(|v| *v == 0.0));
    }

    #[test]
    fn test_macro_calories_and_split() {
        let info = NutritionInfo::reference();
        // 4.5*4 + 28*4 + 16*9
        assert!((info.macro_calories() - 274.0).abs() < 1e-9);

        let split = info.macro_split();
        assert!((split.protein + split.carbs + split.fat - 100.0).abs() < 1e-9);
        assert!((split.fat - 144.0 / 274.0 * 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_split_of_nothing_is_zero() {
        assert_eq!(NutritionInfo::zeroed().macro_split(), MacroSplit::default());
    }

    #[test]
    fn test_summary_covers_every_macro() {
        let summary = NutritionInfo::reference().summary();
        assert!((summary.macro_calories - 274.0).abs() < 1e-9);
        assert_eq!(summary.daily_values.len(), 6);
        assert!((summary.daily_values["fat"] - 16.0 / 65.0 * 100.0).abs() < 1e-9);

        let wire = serde_json::to_value(&summary).unwrap();
        assert!(wire["macroSplit"]["protein"].is_number());
        assert!(wire["dailyValues"]["calories"].is_number());
    }

    #[test]
    fn test_daily_value_percent() {
        let info = NutritionInfo::reference();
        assert!((info.daily_value_percent(Macro::Calories) - 13.1).abs() < 1e-9);
        assert!((info.daily_value_percent(Macro::Fiber) - 10.0).abs() < 1e-9);
    }
}
