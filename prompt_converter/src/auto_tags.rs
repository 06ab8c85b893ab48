//! Default quality tags injected per model profile.

use std::fs;
use std::io::Read;
use std::path::Path;

use hashbrown::HashMap;
use serde::Deserialize;

use crate::errors::{ConverterError, Result};
use crate::tag::{Category, ClassifiedTag, UNKNOWN_FREQUENCY};

const BUILTIN_DOCUMENT: &str = include_str!("../data/auto_quality_tags.json");

fn default_weight() -> f64 {
    1.0
}

#[derive(Deserialize)]
struct RawAutoTag {
    name: String,
    #[serde(default = "default_weight")]
    weight: f64,
    #[serde(rename = "type")]
    category: Category,
}

/// Pre-categorized quality tags keyed by profile name.
#[derive(Debug, Clone, Default)]
pub struct AutoQualityTags {
    tags: HashMap<String, Vec<ClassifiedTag>>,
}

impl AutoQualityTags {
    /// Creates an empty table. No profile gets auto tags.
    pub fn new() -> Self {
        Self::default()
    }

    /// Gets the table embedded in the library.
    pub fn builtin() -> Self {
        Self::from_reader(BUILTIN_DOCUMENT.as_bytes())
            .unwrap_or_else(|e| panic!("embedded auto quality tags are invalid: {e}"))
    }

    /// Reads an auto-quality-tag document.
    ///
    /// The document is a JSON object mapping a profile name to a list of
    /// `{"name", "weight", "type"}` objects. `weight` defaults to 1.0.
    ///
    /// # Errors
    ///
    /// When `rdr` generates an error or the document is malformed, an error variant
    /// will be returned.
    pub fn from_reader<R>(rdr: R) -> Result<Self>
    where
        R: Read,
    {
        let raw: HashMap<String, Vec<RawAutoTag>> = serde_json::from_reader(rdr)?;
        let mut tags = HashMap::with_capacity(raw.len());
        for (profile, list) in raw {
            let list = list
                .into_iter()
                .map(|t| {
                    if t.name.is_empty() {
                        return Err(ConverterError::invalid_document(format!(
                            "profile `{profile}` has a tag without a name"
                        )));
                    }
                    Ok(ClassifiedTag {
                        name: t.name,
                        weight: t.weight,
                        category: t.category,
                        frequency: UNKNOWN_FREQUENCY,
                    })
                })
                .collect::<Result<Vec<_>>>()?;
            tags.insert(profile, list);
        }
        Ok(Self { tags })
    }

    /// Reads an auto-quality-tag file.
    ///
    /// # Errors
    ///
    /// Unlike [`crate::TagDictionary::load`], a missing or corrupt file is an error.
    pub fn from_path<P>(path: P) -> Result<Self>
    where
        P: AsRef<Path>,
    {
        let f = fs::File::open(path)?;
        Self::from_reader(std::io::BufReader::new(f))
    }

    /// Sets the tags of a profile.
    pub fn insert<S>(&mut self, profile: S, tags: Vec<ClassifiedTag>)
    where
        S: Into<String>,
    {
        self.tags.insert(profile.into(), tags);
    }

    /// Gets the tags of a profile. A profile without an entry gets none.
    pub fn get(&self, profile: &str) -> &[ClassifiedTag] {
        self.tags.get(profile).map(Vec::as_slice).unwrap_or(&[])
    }
}
