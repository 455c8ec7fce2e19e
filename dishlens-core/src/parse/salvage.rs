//! Last-resort field extraction for responses that will not parse.
//!
//! Each field is matched on its own so one broken field does not take the
//! others down with it. Only the food name is mandatory.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use super::coerce::ingredient;
use super::repair::quote_bare_keys;
use crate::nutrition::NutritionInfo;
use crate::types::{
    Difficulty, Ingredient, PartialNotice, Provenance, Recipe, RecognitionFailure,
    RecognitionOutcome, RecognitionResult,
};

/// Confidence reported for salvaged results, which carry no model-reported value.
pub const SALVAGED_CONFIDENCE: f64 = 0.5;

static FOOD_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""foodName"\s*:\s*"([^"]+)""#).expect("Invalid foodName regex")
});

static INGREDIENTS_BODY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)"ingredients"\s*:\s*\[(.*?)\]"#).expect("Invalid ingredients regex")
});

static STEPS_BODY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)"steps"\s*:\s*\[(.*?)\]"#).expect("Invalid steps regex")
});

static STRING_LITERAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""([^"]*)""#).expect("Invalid string literal regex"));

static PREP_TIME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""prepTime"\s*:\s*"([^"]+)""#).expect("Invalid prepTime regex")
});

static COOK_TIME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""cookTime"\s*:\s*"([^"]+)""#).expect("Invalid cookTime regex")
});

static SERVINGS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""servings"\s*:\s*(\d+)"#).expect("Invalid servings regex"));

static DIFFICULTY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""difficulty"\s*:\s*"([^"]+)""#).expect("Invalid difficulty regex")
});

fn first_capture<'a>(pattern: &Regex, text: &'a str) -> Option<&'a str> {
    pattern
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Pull whatever fields can be found out of `cleaned`.
///
/// Succeeds (as a partial result) whenever a food name is present. Nutrition
/// is zero-filled: numbers salvaged from broken output are not trusted.
pub fn salvage(cleaned: &str) -> RecognitionOutcome {
    let Some(food_name) = first_capture(&FOOD_NAME, cleaned)
        .map(str::trim)
        .filter(|name| !name.is_empty())
    else {
        tracing::debug!("salvage found no food name");
        return RecognitionOutcome::Failed(RecognitionFailure::Unprocessable);
    };

    let ingredients = first_capture(&INGREDIENTS_BODY, cleaned)
        .map(salvage_ingredients)
        .unwrap_or_default();

    let steps: Vec<String> = first_capture(&STEPS_BODY, cleaned)
        .map(|body| {
            STRING_LITERAL
                .captures_iter(body)
                .filter_map(|caps| caps.get(1))
                .map(|m| m.as_str().trim())
                .filter(|step| !step.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    let recipe = Recipe {
        name: food_name.to_string(),
        ingredients: ingredients.clone(),
        steps,
        prep_time: first_capture(&PREP_TIME, cleaned)
            .unwrap_or_default()
            .to_string(),
        cook_time: first_capture(&COOK_TIME, cleaned)
            .unwrap_or_default()
            .to_string(),
        servings: first_capture(&SERVINGS, cleaned)
            .and_then(|n| n.parse().ok())
            .unwrap_or(0),
        difficulty: first_capture(&DIFFICULTY, cleaned)
            .map(Difficulty::coerce)
            .unwrap_or_default(),
    };

    tracing::warn!(
        food_name,
        ingredients = ingredients.len(),
        steps = recipe.steps.len(),
        "salvaged partial recognition from unparseable response"
    );

    RecognitionOutcome::Partial {
        result: RecognitionResult {
            food_name: food_name.to_string(),
            confidence: SALVAGED_CONFIDENCE,
            ingredients,
            recipe,
            nutrition: NutritionInfo::zeroed(),
            provenance: Provenance::Salvaged,
        },
        notice: PartialNotice::BestEffort,
    }
}

/// Re-wrap an ingredients array body and parse it on its own.
fn salvage_ingredients(body: &str) -> Vec<Ingredient> {
    let wrapped = quote_bare_keys(&format!("[{}]", body.replace('\'', "\"")));
    match serde_json::from_str::<Vec<Value>>(&wrapped) {
        Ok(items) => items.iter().filter_map(ingredient).collect(),
        Err(e) => {
            tracing::debug!(error = %e, "ingredients array unrecoverable");
            Vec::new()
        }
    }
}
