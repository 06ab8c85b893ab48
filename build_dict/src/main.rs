use std::fs;
use std::io::{BufWriter, Read};
use std::path::PathBuf;

use clap::Parser;
use prompt_converter::{Category, DictEntry, TagDictionary, Vocabulary};
use serde::Deserialize;

#[derive(Parser, Debug)]
#[command(
    name = "build_dict",
    about = "A program to build a tag dictionary from tag CSV files."
)]
struct Args {
    /// Danbooru tag CSV (name,category,count,aliases)
    #[arg(long)]
    danbooru: Option<PathBuf>,

    /// e621 tag CSV (name,category,count,aliases)
    #[arg(long)]
    e621: Option<PathBuf>,

    /// Output path of the dictionary file
    #[arg(long)]
    output: PathBuf,
}

#[derive(Debug, Deserialize)]
struct TagRecord {
    name: String,
    category: i32,
    count: u64,
    #[serde(default)]
    aliases: Option<String>,
}

/// Adds every row of a tag CSV to the dictionary.
///
/// Canonical names are registered first so that an alias never shadows a tag of the
/// same name.
fn add_csv<R>(dict: &mut TagDictionary, vocabulary: Vocabulary, rdr: R) -> csv::Result<usize>
where
    R: Read,
{
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(rdr);
    let mut records = vec![];
    for result in rdr.deserialize() {
        let record: TagRecord = result?;
        records.push(record);
    }
    for record in &records {
        dict.insert(
            vocabulary,
            record.name.as_str(),
            DictEntry {
                name: record.name.clone(),
                category: Category::from_code(record.category),
                frequency: record.count,
            },
        );
    }
    for record in &records {
        let aliases = record.aliases.as_deref().unwrap_or_default();
        for alias in aliases.split(',').map(str::trim).filter(|a| !a.is_empty()) {
            if dict.get(vocabulary, alias).is_none() {
                dict.insert(
                    vocabulary,
                    alias,
                    DictEntry {
                        name: record.name.clone(),
                        category: Category::from_code(record.category),
                        frequency: record.count,
                    },
                );
            }
        }
    }
    Ok(records.len())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let mut dict = TagDictionary::new();
    for (vocabulary, path) in [
        (Vocabulary::Danbooru, &args.danbooru),
        (Vocabulary::E621, &args.e621),
    ] {
        if let Some(path) = path {
            tracing::info!(%vocabulary, path = %path.display(), "Loading tag file...");
            let n_tags = add_csv(&mut dict, vocabulary, fs::File::open(path)?)?;
            tracing::info!(
                %vocabulary,
                n_tags,
                n_entries = dict.len(vocabulary),
                "Loaded tag file"
            );
        }
    }

    tracing::info!(path = %args.output.display(), "Saving dictionary file...");
    dict.write(BufWriter::new(fs::File::create(&args.output)?))?;

    Ok(())
}
