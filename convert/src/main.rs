use std::io::{prelude::*, stdin};
use std::path::PathBuf;

use clap::Parser;
use prompt_converter::{
    AutoQualityTags, Category, CategoryFilter, ConvertOptions, Generation, ModelProfile,
    PromptConverter, Rating, TagDictionary,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "convert",
    about = "A program to convert tag lists into prompts for each model."
)]
struct Args {
    /// Tag list to convert. When omitted, each line of stdin is converted.
    #[arg(long)]
    text: Option<String>,

    /// Tag dictionary file. A missing file is treated as an empty dictionary.
    #[arg(long, default_value = "tag_dict.json")]
    dict: PathBuf,

    /// Auto quality tag file. The built-in table is used when omitted.
    #[arg(long)]
    auto_tags: Option<PathBuf>,

    /// Content rating (safe, sensitive, questionable, explicit)
    #[arg(long, default_value = "safe")]
    rating: Rating,

    /// Keep repeated tags
    #[arg(long)]
    no_unique: bool,

    /// Do not append the default quality tags of each model
    #[arg(long)]
    no_auto_quality_tags: bool,

    /// Reset every weight to 1.0
    #[arg(long)]
    remove_weights: bool,

    /// Exclude a category from every prompt and report the removed tags.
    /// (general, style, genre, character, other, unknown, person, score, quality,
    /// rating, era)
    #[arg(long)]
    exclude: Vec<Category>,

    /// Profile set (first, current)
    #[arg(long, default_value = "current")]
    generation: Generation,
}

/// Builds the log filter from `RUST_LOG` directives, falling back to `info` when they
/// are unset or invalid.
fn log_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new("info"))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let directives = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(log_filter(directives.as_deref()))
        .init();

    let args = Args::parse();

    tracing::info!("Loading dictionary file...");
    let dict = TagDictionary::load(&args.dict);
    let auto_tags = match &args.auto_tags {
        Some(path) => AutoQualityTags::from_path(path)?,
        None => AutoQualityTags::builtin(),
    };
    let converter =
        PromptConverter::new(dict, auto_tags).profiles(ModelProfile::builtin(args.generation));
    let profiles: Vec<_> = converter.get_profiles().iter().map(|p| p.name()).collect();
    tracing::info!(?profiles, "Converting...");

    let options = ConvertOptions {
        rating: args.rating,
        unique: !args.no_unique,
        auto_quality_tags: !args.no_auto_quality_tags,
        remove_weights: args.remove_weights,
    };
    let filter: CategoryFilter = args.exclude.iter().copied().collect();

    let mut out = std::io::stdout().lock();
    let mut process = |text: &str| -> std::io::Result<()> {
        if filter.is_empty() {
            for prompt in converter.convert(text, &options) {
                writeln!(out, "{}\t{}", prompt.profile, prompt.text)?;
            }
        } else {
            let result = converter.convert_with_filter(text, &options, &filter);
            for prompt in result.prompts {
                writeln!(out, "{}\t{}", prompt.profile, prompt.text)?;
            }
            writeln!(out, "filtered\t{}", result.filtered)?;
        }
        Ok(())
    };

    if let Some(text) = &args.text {
        process(text.as_str())?;
    } else {
        for line in stdin().lock().lines() {
            process(line?.as_str())?;
        }
    }

    Ok(())
}
