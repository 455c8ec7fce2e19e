//! Recipe lookup in TheMealDB.

use async_trait::async_trait;
use serde_json::Value;

use super::{RecipeProvider, SearchError, SearchRecipe};
use crate::error::FetchError;
use crate::http::HttpClient;
use crate::locale::Language;

pub const MEALDB_SOURCE: &str = "TheMealDB";

/// TheMealDB numbers its ingredient fields 1 through 20.
const MAX_INGREDIENTS: usize = 20;

pub struct MealDbProvider<C> {
    http: C,
    base_url: String,
}

impl<C: HttpClient> MealDbProvider<C> {
    pub fn new(http: C, base_url: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn search_url(&self, query: &str) -> Result<reqwest::Url, FetchError> {
        reqwest::Url::parse_with_params(
            &format!("{}/search.php", self.base_url),
            &[("s", query.trim())],
        )
        .map_err(|e| FetchError::InvalidUrl(e.to_string()))
    }
}

#[async_trait]
impl<C: HttpClient> RecipeProvider for MealDbProvider<C> {
    fn name(&self) -> &str {
        MEALDB_SOURCE
    }

    /// Only English data exists; the language is ignored.
    async fn fetch(&self, query: &str, _language: Language) -> Result<SearchRecipe, SearchError> {
        let url = self.search_url(query)?;
        let body = self.http.get_json(url.as_str()).await?;

        // "meals" is null when nothing matches.
        let meal = body["meals"]
            .as_array()
            .and_then(|meals| meals.first())
            .ok_or_else(|| SearchError::NotFound(query.trim().to_string()))?;

        meal_to_recipe(meal)
    }
}

fn field<'a>(meal: &'a Value, key: &str) -> &'a str {
    meal.get(key).and_then(Value::as_str).unwrap_or("").trim()
}

fn meal_to_recipe(meal: &Value) -> Result<SearchRecipe, SearchError> {
    let title = field(meal, "strMeal");
    if title.is_empty() {
        return Err(SearchError::Invalid("meal has no name".to_string()));
    }

    let ingredients = (1..=MAX_INGREDIENTS)
        .filter_map(|i| {
            let ingredient = field(meal, &format!("strIngredient{i}"));
            if ingredient.is_empty() {
                return None;
            }
            let measure = field(meal, &format!("strMeasure{i}"));
            Some(format!("{} {}", measure, ingredient).trim().to_string())
        })
        .collect();

    let instructions = field(meal, "strInstructions")
        .split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect();

    Ok(SearchRecipe {
        title: title.to_string(),
        ingredients,
        instructions,
        image_prompt: Some(title.to_string()),
        cooking_time: None,
        servings: None,
        difficulty: None,
        source: MEALDB_SOURCE.to_string(),
    })
}
