//! Strict JSON parse followed by field-by-field coercion into a
//! [`RecognitionResult`].
//!
//! The parsed document stays a loose `serde_json::Value` until each field has
//! been checked; nothing is deserialized straight into the result types.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};

use crate::error::ParseError;
use crate::nutrition::{Macro, NutritionInfo, REFERENCE_MINERALS, REFERENCE_VITAMINS};
use crate::types::{
    Difficulty, Ingredient, PartialNotice, Provenance, Recipe, RecognitionFailure,
    RecognitionOutcome, RecognitionResult,
};

/// Leading number in strings like "262 kcal" or "4.5g".
static LEADING_NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(-?[0-9]+(?:\.[0-9]+)?)").expect("Invalid leading number regex")
});

/// Parse repaired text as a JSON object.
///
/// If the text does not parse, it is cut after its last `}` and parsed once
/// more; output truncated by a token limit often ends in a dangling fragment.
pub fn parse_object(cleaned: &str) -> Result<Value, ParseError> {
    let value = match serde_json::from_str::<Value>(cleaned) {
        Ok(value) => value,
        Err(first) => {
            let truncated = cleaned
                .rfind('}')
                .map(|end| &cleaned[..=end])
                .ok_or_else(|| ParseError::Malformed(first.to_string()))?;
            tracing::debug!(
                error = %first,
                dropped = cleaned.len() - truncated.len(),
                "retrying parse truncated at last closing brace"
            );
            serde_json::from_str::<Value>(truncated)
                .map_err(|_| ParseError::Malformed(first.to_string()))?
        }
    };

    if value.is_object() {
        Ok(value)
    } else {
        Err(ParseError::NotAnObject(json_kind(&value)))
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Validate and coerce a parsed model response.
///
/// Checks run in order: food name, then confidence, then ingredients. A
/// response with no ingredients is still a success, flagged as partial.
pub fn coerce_recognition(value: &Value) -> RecognitionOutcome {
    let Some(food_name) = value
        .get("foodName")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|name| !name.is_empty())
    else {
        return RecognitionOutcome::Failed(RecognitionFailure::Unrecognized);
    };

    let Some(confidence) = value
        .get("confidence")
        .and_then(Value::as_f64)
        .filter(|c| (0.0..=1.0).contains(c))
    else {
        return RecognitionOutcome::Failed(RecognitionFailure::LowConfidence);
    };

    let nutrition = backfill_nutrition(value.get("nutrition"));

    let raw_ingredients = match value.get("ingredients").and_then(Value::as_array) {
        Some(items) if !items.is_empty() => items,
        _ => {
            tracing::debug!(food_name, "response lists no ingredients");
            return RecognitionOutcome::Partial {
                result: RecognitionResult {
                    food_name: food_name.to_string(),
                    confidence,
                    ingredients: Vec::new(),
                    recipe: Recipe::named(food_name),
                    nutrition,
                    provenance: Provenance::Model,
                },
                notice: PartialNotice::FoodNameOnly,
            };
        }
    };

    let ingredients: Vec<Ingredient> = raw_ingredients.iter().filter_map(ingredient).collect();

    // Some responses flatten the recipe fields into the top level.
    let empty = Map::new();
    let recipe = value.get("recipe").and_then(Value::as_object).unwrap_or(&empty);
    let field = |key: &str| recipe.get(key).or_else(|| value.get(key));

    let recipe = Recipe {
        name: food_name.to_string(),
        ingredients: ingredients.clone(),
        steps: field("steps").map(steps).unwrap_or_default(),
        prep_time: minutes(field("prepTime")),
        cook_time: minutes(field("cookTime")),
        servings: field("servings").and_then(servings).unwrap_or(0),
        difficulty: field("difficulty")
            .and_then(Value::as_str)
            .map(Difficulty::coerce)
            .unwrap_or_default(),
    };

    RecognitionOutcome::Complete(RecognitionResult {
        food_name: food_name.to_string(),
        confidence,
        ingredients,
        recipe,
        nutrition,
        provenance: Provenance::Model,
    })
}

/// One ingredient entry. Objects are read field by field; a bare string is
/// taken as the name. Anything else is skipped.
pub(crate) fn ingredient(value: &Value) -> Option<Ingredient> {
    match value {
        Value::Object(fields) => Some(Ingredient::new(
            fields.get("name").map(text).unwrap_or_default(),
            fields.get("quantity").map(text).unwrap_or_default(),
            fields.get("unit").map(text).unwrap_or_default(),
        )),
        Value::String(name) => Some(Ingredient::new(name.trim(), "", "")),
        _ => None,
    }
}

/// Strings and numbers as display text; anything else as empty.
fn text(value: &Value) -> String {
    match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    }
}

fn steps(value: &Value) -> Vec<String> {
    value
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::trim)
                .filter(|step| !step.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// Render a duration field as "<n> minutes". Free text that is not a bare
/// number ("1 hour") is kept as written.
fn minutes(value: Option<&Value>) -> String {
    let raw = match value {
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::String(s)) => s.trim().to_string(),
        _ => String::new(),
    };

    if raw.is_empty() {
        "0 minutes".to_string()
    } else if raw.chars().all(|c| c.is_ascii_digit() || c == '.') {
        format!("{} minutes", raw)
    } else {
        raw
    }
}

fn servings(value: &Value) -> Option<u32> {
    loose_number(value).map(|n| n.round().clamp(0.0, u32::MAX as f64) as u32)
}

/// A JSON number, or the leading number of a string.
pub(crate) fn loose_number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => LEADING_NUMBER.captures(s)?[1].parse().ok()?,
        _ => return None,
    };
    n.is_finite().then_some(n)
}

/// Start from the reference values and overwrite every field the response
/// supplies with a usable number. Unknown vitamin and mineral keys are dropped.
pub fn backfill_nutrition(value: Option<&Value>) -> NutritionInfo {
    let mut info = NutritionInfo::reference();
    let Some(fields) = value.and_then(Value::as_object) else {
        return info;
    };

    for nutrient in Macro::ALL {
        if let Some(amount) = fields.get(nutrient.key()).and_then(amount) {
            info.set(nutrient, amount);
        }
    }

    if let Some(vitamins) = fields.get("vitamins").and_then(Value::as_object) {
        overlay(&mut info.vitamins, vitamins, &REFERENCE_VITAMINS);
    }
    if let Some(minerals) = fields.get("minerals").and_then(Value::as_object) {
        overlay(&mut info.minerals, minerals, &REFERENCE_MINERALS);
    }

    info
}

fn amount(value: &Value) -> Option<f64> {
    loose_number(value).filter(|n| *n >= 0.0)
}

/// Copy known keys from `supplied` into `target` under their canonical
/// spelling, matching case-insensitively ("calcium" fills "Calcium").
fn overlay(
    target: &mut std::collections::BTreeMap<String, f64>,
    supplied: &Map<String, Value>,
    known: &[(&str, f64)],
) {
    for (key, value) in supplied {
        let Some((canonical, _)) = known
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(key.trim()))
        else {
            tracing::debug!(key = %key, "dropping unknown nutrient");
            continue;
        };
        if let Some(amount) = amount(value) {
            target.insert(canonical.to_string(), amount);
        }
    }
}
