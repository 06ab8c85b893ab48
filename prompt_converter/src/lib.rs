#![cfg_attr(docsrs, feature(doc_cfg))]

//! # Prompt Converter
//!
//! Prompt Converter rewrites a comma-separated list of image-generation tags into
//! one prompt per target model. Each model gets its own category order, rating
//! tags, quality tags, and emphasis syntax.
//!
//! ## Examples
//!
//! ```no_run
//! use std::io::{prelude::*, stdin};
//!
//! use prompt_converter::{AutoQualityTags, ConvertOptions, PromptConverter, TagDictionary};
//!
//! let dict = TagDictionary::load("tag_dict.json");
//! let converter = PromptConverter::new(dict, AutoQualityTags::builtin());
//!
//! for line in stdin().lock().lines() {
//!     for prompt in converter.convert(&line.unwrap(), &ConvertOptions::default()) {
//!         println!("{}\t{}", prompt.profile, prompt.text);
//!     }
//! }
//! ```

mod auto_tags;
mod classifier;
mod converter;
mod dictionary;
pub mod errors;
mod filter;
mod order;
mod profile;
mod serializer;
mod tag;
mod weight;

pub use auto_tags::AutoQualityTags;
pub use classifier::{
    is_person_tag, Classifier, StaticLists, QUALITY_TAGS, RATING_TAGS, SCORE_TAGS,
};
pub use converter::{dedup_by_name, ConvertOptions, FilteredConversion, Prompt, PromptConverter};
pub use dictionary::{DictEntry, TagDictionary, Vocabulary};
pub use errors::ConverterError;
pub use filter::{CategoryFilter, FilteredTags};
pub use order::order_tags;
pub use profile::{BracketStyle, Generation, ModelProfile, Rating};
pub use serializer::{
    escape_parentheses, nest_depth, serialize_tag, serialize_tags, WEIGHT_EPSILON,
};
pub use tag::{Category, ClassifiedTag, Tag, UNKNOWN_FREQUENCY};
pub use weight::{parse_weight, tokenize, DEEMPHASIS_BASE, EMPHASIS_BASE};
