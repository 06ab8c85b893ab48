//! Tag dictionaries.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::io::{Read, Write};
use std::path::Path;

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::errors::{ConverterError, Result};
use crate::tag::Category;

/// Tagging vocabulary.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum Vocabulary {
    /// Danbooru tags.
    Danbooru,

    /// e621 tags.
    E621,
}

impl Vocabulary {
    /// Gets the key of the vocabulary in the dictionary document.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Danbooru => "danbooru",
            Self::E621 => "e621",
        }
    }
}

impl fmt::Display for Vocabulary {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Dictionary entry of a tag.
#[derive(Debug, Clone, PartialEq)]
pub struct DictEntry {
    /// Canonical tag name.
    pub name: String,
    pub category: Category,
    pub frequency: u64,
}

/// Integer that the dictionary document may store as an integer, a float, or a numeric
/// string.
#[derive(Deserialize)]
#[serde(untagged)]
enum LenientInt {
    Int(i64),
    Float(f64),
    Str(String),
}

impl LenientInt {
    /// Floats are truncated toward zero.
    fn parse(&self, raw_name: &str, field: &str) -> Result<i64> {
        match self {
            Self::Int(v) => Ok(*v),
            Self::Float(v) if v.is_finite() => Ok(v.trunc() as i64),
            Self::Float(v) => Err(ConverterError::invalid_document(format!(
                "tag `{raw_name}`: `{field}` is not an integer: {v}"
            ))),
            Self::Str(s) => s.trim().parse().map_err(|_| {
                ConverterError::invalid_document(format!(
                    "tag `{raw_name}`: `{field}` is not an integer: {s:?}"
                ))
            }),
        }
    }
}

#[derive(Deserialize)]
struct RawEntry {
    name: String,
    #[serde(rename = "type")]
    category: LenientInt,
    count: Option<LenientInt>,
}

#[derive(Serialize)]
struct EntryRef<'a> {
    name: &'a str,
    #[serde(rename = "type")]
    category: i32,
    count: u64,
}

fn sorted_table(table: &HashMap<String, DictEntry>) -> BTreeMap<&str, EntryRef> {
    table
        .iter()
        .map(|(raw_name, e)| {
            let entry = EntryRef {
                name: &e.name,
                category: e.category.code(),
                count: e.frequency,
            };
            (raw_name.as_str(), entry)
        })
        .collect()
}

#[derive(Default, Deserialize)]
struct RawDictionary {
    #[serde(default)]
    danbooru: HashMap<String, RawEntry>,
    #[serde(default)]
    e621: HashMap<String, RawEntry>,
}

fn convert_entry(raw_name: &str, entry: RawEntry) -> Result<DictEntry> {
    let code = entry.category.parse(raw_name, "type")?;
    let code = i32::try_from(code).map_err(|_| {
        ConverterError::invalid_document(format!("tag `{raw_name}`: `type` is out of range"))
    })?;
    let frequency = match &entry.count {
        Some(count) => u64::try_from(count.parse(raw_name, "count")?).unwrap_or(0),
        None => 0,
    };
    Ok(DictEntry {
        name: entry.name,
        category: Category::from_code(code),
        frequency,
    })
}

/// Converts a raw table. Entries with malformed numbers are skipped.
fn convert_table(
    vocabulary: Vocabulary,
    raw: HashMap<String, RawEntry>,
) -> HashMap<String, DictEntry> {
    let mut table = HashMap::with_capacity(raw.len());
    for (raw_name, entry) in raw {
        match convert_entry(&raw_name, entry) {
            Ok(entry) => {
                table.insert(raw_name, entry);
            }
            Err(e) => {
                tracing::warn!(%vocabulary, error = %e, "skipping dictionary entry");
            }
        }
    }
    table
}

/// Read-only mapping from raw tag names to dictionary entries, one table per
/// vocabulary.
#[derive(Debug, Clone, Default)]
pub struct TagDictionary {
    danbooru: HashMap<String, DictEntry>,
    e621: HashMap<String, DictEntry>,
}

impl TagDictionary {
    /// Creates an empty dictionary. Every lookup misses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads a dictionary document.
    ///
    /// The document is a JSON object with optional `danbooru` and `e621` tables, each
    /// mapping a raw tag name to `{"name", "type", "count"}`.
    ///
    /// # Arguments
    ///
    /// * `rdr` - A data source.
    ///
    /// # Errors
    ///
    /// When `rdr` generates an error or the document is not a valid JSON object of
    /// tables, an error variant will be returned. An entry whose `type` or `count` is
    /// not a number is skipped with a warning.
    ///
    /// # Examples
    ///
    /// ```
    /// use prompt_converter::{Category, TagDictionary, Vocabulary};
    ///
    /// let doc = r#"{"danbooru": {"game_cg": {"name": "game_cg", "type": "5", "count": 9000}}}"#;
    /// let dict = TagDictionary::from_reader(doc.as_bytes()).unwrap();
    /// let entry = dict.get(Vocabulary::Danbooru, "game_cg").unwrap();
    /// assert_eq!(Category::Other, entry.category);
    /// ```
    pub fn from_reader<R>(rdr: R) -> Result<Self>
    where
        R: Read,
    {
        let raw: RawDictionary = serde_json::from_reader(rdr)?;
        Ok(Self {
            danbooru: convert_table(Vocabulary::Danbooru, raw.danbooru),
            e621: convert_table(Vocabulary::E621, raw.e621),
        })
    }

    /// Exports the dictionary in the format read by [`TagDictionary::from_reader`].
    /// Keys are written in sorted order.
    ///
    /// # Errors
    ///
    /// When `wtr` generates an error, it will be returned as is.
    pub fn write<W>(&self, wtr: W) -> Result<()>
    where
        W: Write,
    {
        let mut doc = BTreeMap::new();
        doc.insert(Vocabulary::Danbooru.as_str(), sorted_table(&self.danbooru));
        doc.insert(Vocabulary::E621.as_str(), sorted_table(&self.e621));
        serde_json::to_writer(wtr, &doc)?;
        Ok(())
    }

    /// Loads a dictionary file.
    ///
    /// A missing file is not an error: the returned dictionary is empty and all
    /// lookups resolve to the unknown category. An unreadable or corrupt file is
    /// reported as a warning and also results in an empty dictionary.
    pub fn load<P>(path: P) -> Self
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        if !path.exists() {
            tracing::debug!(path = %path.display(), "tag dictionary not found; using empty tables");
            return Self::new();
        }
        match fs::File::open(path)
            .map_err(ConverterError::from)
            .and_then(|f| Self::from_reader(std::io::BufReader::new(f)))
        {
            Ok(dict) => {
                tracing::debug!(
                    path = %path.display(),
                    danbooru = dict.danbooru.len(),
                    e621 = dict.e621.len(),
                    "loaded tag dictionary"
                );
                dict
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "failed to load tag dictionary");
                Self::new()
            }
        }
    }

    /// Adds an entry. An existing entry for `raw_name` is replaced.
    pub fn insert<S>(&mut self, vocabulary: Vocabulary, raw_name: S, entry: DictEntry)
    where
        S: Into<String>,
    {
        self.table_mut(vocabulary).insert(raw_name.into(), entry);
    }

    /// Looks up a raw tag name.
    pub fn get(&self, vocabulary: Vocabulary, raw_name: &str) -> Option<&DictEntry> {
        self.table(vocabulary).get(raw_name)
    }

    /// Gets the number of entries of a vocabulary.
    pub fn len(&self, vocabulary: Vocabulary) -> usize {
        self.table(vocabulary).len()
    }

    /// Returns `true` if both tables are empty.
    pub fn is_empty(&self) -> bool {
        self.danbooru.is_empty() && self.e621.is_empty()
    }

    fn table(&self, vocabulary: Vocabulary) -> &HashMap<String, DictEntry> {
        match vocabulary {
            Vocabulary::Danbooru => &self.danbooru,
            Vocabulary::E621 => &self.e621,
        }
    }

    fn table_mut(&mut self, vocabulary: Vocabulary) -> &mut HashMap<String, DictEntry> {
        match vocabulary {
            Vocabulary::Danbooru => &mut self.danbooru,
            Vocabulary::E621 => &mut self.e621,
        }
    }
}
