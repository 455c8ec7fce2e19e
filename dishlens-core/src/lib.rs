pub mod ai;
pub mod error;
pub mod http;
pub mod image;
pub mod latest;
pub mod locale;
pub mod nutrition;
pub mod parse;
pub mod recognize;
pub mod search;
pub mod speech;
pub mod types;

pub use error::{ExtractError, FetchError, ParseError};
pub use http::{HttpClient, JsonClient, MockClient, MockResponse};
pub use image::{validate_upload, ImageError, ValidatedImage, MAX_FILE_SIZE};
pub use latest::{LatestSlot, Ticket};
pub use locale::{Language, Message};
pub use nutrition::{MacroSplit, NutritionInfo, NutritionSummary};
pub use parse::interpret_recognition;
pub use recognize::recognize_food;
pub use search::{ImageGenerator, RecipeSearch, SearchConfig, SearchRecipe};
pub use speech::{speech_chunks, step_utterances, NarrationState, Narrator, SpeechEngine};
pub use types::{
    Difficulty, Ingredient, PartialNotice, Provenance, Recipe, RecognitionFailure,
    RecognitionOutcome, RecognitionResponse, RecognitionResult,
};
