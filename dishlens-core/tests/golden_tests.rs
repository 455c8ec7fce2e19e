//! Golden file tests for interpreting raw model output.
//!
//! Each JSON file in `fixtures/` holds one raw response and the outcome it
//! must produce.

use dishlens_core::{interpret_recognition, Language, Provenance, RecognitionOutcome};
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct TestCase {
    #[allow(dead_code)]
    description: String,
    /// Text exactly as the model returned it.
    raw: String,
    expected: Expected,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Expected {
    /// "complete", "partial" or "failed".
    outcome: String,
    food_name: Option<String>,
    confidence: Option<f64>,
    ingredients: Option<Vec<String>>,
    steps: Option<usize>,
    provenance: Option<Provenance>,
    calories: Option<f64>,
    /// Substring of the English notice or error text.
    error: Option<String>,
}

fn load_test_cases() -> Vec<(String, TestCase)> {
    let fixtures_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures");

    let mut cases = Vec::new();
    for entry in fs::read_dir(&fixtures_dir).expect("Failed to read fixtures directory") {
        let path = entry.expect("Failed to read directory entry").path();
        if path.extension().map(|e| e == "json").unwrap_or(false) {
            let name = path.file_stem().unwrap().to_string_lossy().into_owned();
            let content = fs::read_to_string(&path)
                .unwrap_or_else(|e| panic!("Failed to read {}: {}", path.display(), e));
            let case: TestCase = serde_json::from_str(&content)
                .unwrap_or_else(|e| panic!("Failed to parse {}: {}", path.display(), e));
            cases.push((name, case));
        }
    }

    assert!(!cases.is_empty(), "No test fixtures found in {:?}", fixtures_dir);
    cases.sort_by(|a, b| a.0.cmp(&b.0));
    cases
}

fn outcome_kind(outcome: &RecognitionOutcome) -> &'static str {
    match outcome {
        RecognitionOutcome::Complete(_) => "complete",
        RecognitionOutcome::Partial { .. } => "partial",
        RecognitionOutcome::Failed(_) => "failed",
    }
}

#[test]
fn test_golden_responses() {
    let mut failures = Vec::new();

    for (name, case) in load_test_cases() {
        let outcome = interpret_recognition(&case.raw);
        let expected = &case.expected;
        let mut problems = Vec::new();

        if outcome_kind(&outcome) != expected.outcome {
            problems.push(format!(
                "outcome: expected {}, got {:?}",
                expected.outcome, outcome
            ));
        }

        let response = outcome.to_response(Language::En);
        if let Some(error) = &expected.error {
            let actual = response.error.as_deref().unwrap_or("");
            if !actual.contains(error.as_str()) {
                problems.push(format!("error: expected to contain {:?}, got {:?}", error, actual));
            }
        }

        if let Some(result) = outcome.result() {
            if let Some(food_name) = &expected.food_name {
                if &result.food_name != food_name {
                    problems.push(format!("foodName: {:?} != {:?}", result.food_name, food_name));
                }
            }
            if let Some(confidence) = expected.confidence {
                if (result.confidence - confidence).abs() > 1e-9 {
                    problems.push(format!("confidence: {} != {}", result.confidence, confidence));
                }
            }
            if let Some(ingredients) = &expected.ingredients {
                let names: Vec<&str> = result.ingredients.iter().map(|i| i.name.as_str()).collect();
                if names != *ingredients {
                    problems.push(format!("ingredients: {:?} != {:?}", names, ingredients));
                }
            }
            if let Some(steps) = expected.steps {
                if result.recipe.steps.len() != steps {
                    problems.push(format!("steps: {:?}, expected {}", result.recipe.steps, steps));
                }
            }
            if let Some(provenance) = expected.provenance {
                if result.provenance != provenance {
                    problems.push(format!("provenance: {:?} != {:?}", result.provenance, provenance));
                }
            }
            if let Some(calories) = expected.calories {
                if (result.nutrition.calories - calories).abs() > 1e-9 {
                    problems.push(format!("calories: {} != {}", result.nutrition.calories, calories));
                }
            }
        }

        if !problems.is_empty() {
            failures.push(format!("{}:\n  {}", name, problems.join("\n  ")));
        }
    }

    assert!(failures.is_empty(), "Golden test failures:\n{}", failures.join("\n"));
}
