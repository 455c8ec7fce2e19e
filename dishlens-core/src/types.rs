use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use crate::image::ImageError;
use crate::locale::{Language, Message};
use crate::nutrition::{NutritionInfo, NutritionSummary};

/// An ingredient of a recognized dish.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Ingredient {
    pub name: String,
    /// Kept as text so fractions like "1/2" survive untouched.
    pub quantity: String,
    pub unit: String,
    pub is_available: bool,
    pub substitutes: Vec<String>,
}

impl Ingredient {
    pub fn new(
        name: impl Into<String>,
        quantity: impl Into<String>,
        unit: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            quantity: quantity.into(),
            unit: unit.into(),
            is_available: true,
            substitutes: Vec::new(),
        }
    }
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema,
)]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    /// Map a model-reported difficulty onto the enum. Anything unrecognised is Medium.
    pub fn coerce(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "easy" => Difficulty::Easy,
            "hard" => Difficulty::Hard,
            _ => Difficulty::Medium,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub name: String,
    pub ingredients: Vec<Ingredient>,
    pub steps: Vec<String>,
    /// "<n> minutes"
    pub prep_time: String,
    pub cook_time: String,
    pub servings: u32,
    pub difficulty: Difficulty,
}

impl Recipe {
    /// Recipe with nothing but a name, for results where only the dish was identified.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ingredients: Vec::new(),
            steps: Vec::new(),
            prep_time: String::new(),
            cook_time: String::new(),
            servings: 0,
            difficulty: Difficulty::Medium,
        }
    }
}

/// Where a result's fields came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    /// Parsed from the model's JSON; confidence is the model's own.
    Model,
    /// Pattern-matched out of unparseable output; confidence is a placeholder.
    Salvaged,
}

/// A recognized dish with its recipe and nutrition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecognitionResult {
    pub food_name: String,
    pub confidence: f64,
    pub ingredients: Vec<Ingredient>,
    pub recipe: Recipe,
    pub nutrition: NutritionInfo,
    pub provenance: Provenance,
}

/// Advisory attached to a result that is usable but incomplete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartialNotice {
    /// The model named the dish but listed no ingredients.
    FoodNameOnly,
    /// The response could not be parsed; fields were pattern-matched.
    BestEffort,
}

impl PartialNotice {
    pub fn message(&self) -> Message {
        match self {
            PartialNotice::FoodNameOnly => Message::PartialFoodNameOnly,
            PartialNotice::BestEffort => Message::PartialBestEffort,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RecognitionFailure {
    #[error("food name missing or empty")]
    Unrecognized,

    #[error("confidence missing or outside [0, 1]")]
    LowConfidence,

    #[error("model response contained no usable recognition data")]
    Unprocessable,

    #[error("recognition service failed: {0}")]
    Transport(String),

    #[error(transparent)]
    InvalidImage(#[from] ImageError),
}

impl RecognitionFailure {
    pub fn message(&self) -> Message {
        match self {
            RecognitionFailure::Unrecognized => Message::Unrecognized,
            RecognitionFailure::LowConfidence => Message::LowConfidence,
            RecognitionFailure::Unprocessable => Message::Unprocessable,
            RecognitionFailure::Transport(_) => Message::TransportFailed,
            RecognitionFailure::InvalidImage(e) => e.message(),
        }
    }
}

/// Result of one recognition attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum RecognitionOutcome {
    Complete(RecognitionResult),
    Partial {
        result: RecognitionResult,
        notice: PartialNotice,
    },
    Failed(RecognitionFailure),
}

impl RecognitionOutcome {
    pub fn result(&self) -> Option<&RecognitionResult> {
        match self {
            RecognitionOutcome::Complete(result) => Some(result),
            RecognitionOutcome::Partial { result, .. } => Some(result),
            RecognitionOutcome::Failed(_) => None,
        }
    }

    pub fn is_success(&self) -> bool {
        !matches!(self, RecognitionOutcome::Failed(_))
    }

    /// Wire form for the UI, with any notice or error rendered in `language`.
    pub fn to_response(&self, language: Language) -> RecognitionResponse {
        match self {
            RecognitionOutcome::Complete(result) => RecognitionResponse {
                success: true,
                nutrition_summary: Some(result.nutrition.summary()),
                result: Some(result.clone()),
                error: None,
            },
            RecognitionOutcome::Partial { result, notice } => RecognitionResponse {
                success: true,
                nutrition_summary: Some(result.nutrition.summary()),
                result: Some(result.clone()),
                error: Some(notice.message().text(language).to_string()),
            },
            RecognitionOutcome::Failed(failure) => RecognitionResponse {
                success: false,
                result: None,
                nutrition_summary: None,
                error: Some(failure.message().text(language).to_string()),
            },
        }
    }
}

/// Tagged envelope returned to the UI. `error` carries the advisory note on partial results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RecognitionResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<RecognitionResult>,
    /// Macro split and daily values derived from `result.nutrition`.
    #[serde(rename = "nutritionSummary", default, skip_serializing_if = "Option::is_none")]
    pub nutrition_summary: Option<NutritionSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_difficulty_coercion() {
        assert_eq!(Difficulty::coerce("Easy"), Difficulty::Easy);
        assert_eq!(Difficulty::coerce(" hard "), Difficulty::Hard);
        assert_eq!(Difficulty::coerce("Medium"), Difficulty::Medium);
        assert_eq!(Difficulty::coerce("Unknown"), Difficulty::Medium);
        assert_eq!(Difficulty::coerce("कठिन"), Difficulty::Medium);
    }

    #[test]
    fn test_partial_response_carries_notice() {
        let result = RecognitionResult {
            food_name: "Idli".to_string(),
            confidence: 0.8,
            ingredients: vec![],
            recipe: Recipe::named("Idli"),
            nutrition: NutritionInfo::reference(),
            provenance: Provenance::Model,
        };
        let outcome = RecognitionOutcome::Partial {
            result,
            notice: PartialNotice::FoodNameOnly,
        };

        let response = outcome.to_response(Language::En);
        assert!(response.success);
        assert_eq!(
            response.error.as_deref(),
            Some("Partial result: Only food name detected.")
        );
        assert_eq!(response.result.unwrap().food_name, "Idli");

        let summary = response.nutrition_summary.unwrap();
        assert_eq!(summary, NutritionInfo::reference().summary());
        assert!((summary.daily_values["calories"] - 13.1).abs() < 1e-9);
    }

    #[test]
    fn test_failed_response_is_localized() {
        let outcome = RecognitionOutcome::Failed(RecognitionFailure::LowConfidence);
        let response = outcome.to_response(Language::Kn);
        assert!(!response.success);
        assert!(response.result.is_none());
        assert!(response.nutrition_summary.is_none());
        assert_eq!(
            response.error.as_deref(),
            Some(Message::LowConfidence.text(Language::Kn))
        );
    }

    #[test]
    fn test_result_serializes_camel_case() {
        let json = serde_json::to_value(Ingredient::new("Flour", "1/2", "cup")).unwrap();
        assert_eq!(json["isAvailable"], true);
        assert_eq!(json["quantity"], "1/2");
        assert!(json["substitutes"].as_array().unwrap().is_empty());
    }
}
