mod voice;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use dishlens_core::ai::create_vision_client_from_env;
use dishlens_core::search::{clipboard_text, speech_script};
use dishlens_core::{
    interpret_recognition, recognize_food, speech_chunks, step_utterances, HttpClient,
    ImageGenerator, JsonClient, Language, Message, Narrator, RecipeSearch, RecognitionOutcome,
    SearchConfig,
};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use voice::{narrate, TerminalVoice};

#[derive(Parser)]
#[command(name = "dishlens")]
#[command(about = "DishLens CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Recognize the dish in a photo
    Recognize {
        /// JPEG or PNG photo
        image: PathBuf,
        /// Language for the recipe and messages (en, hi, kn)
        #[arg(long, default_value = "en")]
        language: Language,
        /// Read the recipe steps aloud (printed to the terminal)
        #[arg(long)]
        narrate: bool,
    },
    /// Interpret a saved model response without calling the model
    Interpret {
        /// File holding the raw model output
        file: PathBuf,
        #[arg(long, default_value = "en")]
        language: Language,
    },
    /// Search for a recipe by dish name
    Search {
        query: String,
        #[arg(long, default_value = "en")]
        language: Language,
        /// Also generate a picture of the dish
        #[arg(long)]
        image: bool,
        /// Read the recipe aloud (printed to the terminal)
        #[arg(long)]
        narrate: bool,
        /// Print the plain-text form for copying instead of JSON
        #[arg(long)]
        plain: bool,
    },
    /// List supported languages
    Languages,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Recognize {
            image,
            language,
            narrate,
        } => recognize(&image, language, narrate).await?,
        Commands::Interpret { file, language } => {
            let raw = tokio::fs::read_to_string(&file)
                .await
                .with_context(|| format!("Failed to read {}", file.display()))?;
            report(&interpret_recognition(&raw), language)?;
        }
        Commands::Search {
            query,
            language,
            image,
            narrate,
            plain,
        } => search(&query, language, image, narrate, plain).await?,
        Commands::Languages => {
            for language in Language::ALL {
                println!(
                    "{}\t{}\t{}\t{}",
                    language.code(),
                    language.native_name(),
                    language.english_name(),
                    language.speech_locale()
                );
            }
        }
    }

    Ok(())
}

async fn recognize(image: &Path, language: Language, speak: bool) -> Result<()> {
    let bytes = tokio::fs::read(image)
        .await
        .with_context(|| format!("Failed to read {}", image.display()))?;
    let client = create_vision_client_from_env()?;

    let outcome = recognize_food(client.as_ref(), bytes, language).await;
    report(&outcome, language)?;

    if speak {
        if let Some(result) = outcome.result() {
            let mut narrator = Narrator::new(TerminalVoice::default(), language);
            narrate(&mut narrator, step_utterances(&result.recipe.steps, language));
        }
    }
    Ok(())
}

/// Print the response envelope; a failed outcome is an error exit.
fn report(outcome: &RecognitionOutcome, language: Language) -> Result<()> {
    let response = outcome.to_response(language);
    println!("{}", serde_json::to_string_pretty(&response)?);
    if !response.success {
        bail!(response.error.unwrap_or_default());
    }
    Ok(())
}

async fn search(
    query: &str,
    language: Language,
    with_image: bool,
    speak: bool,
    plain: bool,
) -> Result<()> {
    let config = SearchConfig::from_env();
    let http: Arc<dyn HttpClient> =
        Arc::new(JsonClient::new().context("Failed to build HTTP client")?);
    let search = RecipeSearch::from_config(http.clone(), &config);

    let recipe = match search.search(query, language).await {
        Ok(recipe) => recipe,
        Err(e) => bail!("{} ({})", Message::RecipeSearchFailed.text(language), e),
    };

    if plain {
        println!("{}", clipboard_text(&recipe));
    } else {
        println!("{}", serde_json::to_string_pretty(&recipe)?);
    }

    if with_image {
        let prompt = recipe.image_prompt.as_deref().unwrap_or(&recipe.title);
        let images = ImageGenerator::new(http, &config.ollama_url, &config.image_model);
        match images.generate(prompt).await {
            Ok(data_url) => println!("{}", data_url),
            Err(e) => tracing::warn!(error = %e, "image generation failed"),
        }
    }

    if speak {
        let mut narrator = Narrator::new(TerminalVoice::default(), language);
        narrate(&mut narrator, speech_chunks(&speech_script(&recipe, language)));
    }
    Ok(())
}
