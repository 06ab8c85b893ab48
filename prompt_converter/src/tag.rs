use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer};

use crate::errors::{ConverterError, Result};

/// Frequency assigned to tags the dictionary does not know.
pub const UNKNOWN_FREQUENCY: u64 = 9;

/// Tag category.
///
/// Dictionary codes outside the known set are kept as [`Category::Unmapped`]. No
/// built-in priority sequence lists them, so ordering always drops such tags.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum Category {
    /// General tag. (e.g. long_hair, smile, ...)
    General,

    /// Art style or artist.
    Style,

    /// Genre or copyright.
    Genre,

    /// Character name.
    Character,

    /// Other or meta tag.
    Other,

    /// Not found in the dictionary.
    Unknown,

    /// Person or count tag. (e.g. 1girl, solo, ...)
    Person,

    /// Score tag. (e.g. score_9, ...)
    Score,

    /// Quality tag. (e.g. masterpiece, ...)
    Quality,

    /// Rating tag. (e.g. nsfw, rating_safe, ...)
    Rating,

    /// Era tag. (e.g. newest, ...)
    Era,

    /// Dictionary code outside the known set.
    Unmapped(i32),
}

impl Category {
    /// Every known category, in code order.
    pub const KNOWN: [Self; 11] = [
        Self::Era,
        Self::Rating,
        Self::Quality,
        Self::Score,
        Self::Person,
        Self::General,
        Self::Style,
        Self::Genre,
        Self::Character,
        Self::Other,
        Self::Unknown,
    ];

    /// Gets a category from a numeric code.
    ///
    /// # Examples
    ///
    /// ```
    /// use prompt_converter::Category;
    ///
    /// assert_eq!(Category::Person, Category::from_code(-1));
    /// assert_eq!(Category::Unmapped(2), Category::from_code(2));
    /// ```
    pub const fn from_code(code: i32) -> Self {
        match code {
            0 => Self::General,
            1 => Self::Style,
            3 => Self::Genre,
            4 => Self::Character,
            5 => Self::Other,
            9 => Self::Unknown,
            -1 => Self::Person,
            -2 => Self::Score,
            -3 => Self::Quality,
            -4 => Self::Rating,
            -5 => Self::Era,
            code => Self::Unmapped(code),
        }
    }

    /// Gets the numeric code of the category.
    pub const fn code(self) -> i32 {
        match self {
            Self::General => 0,
            Self::Style => 1,
            Self::Genre => 3,
            Self::Character => 4,
            Self::Other => 5,
            Self::Unknown => 9,
            Self::Person => -1,
            Self::Score => -2,
            Self::Quality => -3,
            Self::Rating => -4,
            Self::Era => -5,
            Self::Unmapped(code) => code,
        }
    }

    /// Gets the name used on the command line, or `None` for unmapped codes.
    pub const fn name(self) -> Option<&'static str> {
        Some(match self {
            Self::General => "general",
            Self::Style => "style",
            Self::Genre => "genre",
            Self::Character => "character",
            Self::Other => "other",
            Self::Unknown => "unknown",
            Self::Person => "person",
            Self::Score => "score",
            Self::Quality => "quality",
            Self::Rating => "rating",
            Self::Era => "era",
            Self::Unmapped(_) => return None,
        })
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.name() {
            Some(name) => f.write_str(name),
            None => write!(f, "unmapped({})", self.code()),
        }
    }
}

impl FromStr for Category {
    type Err = ConverterError;

    fn from_str(s: &str) -> Result<Self> {
        Self::KNOWN
            .iter()
            .copied()
            .find(|c| c.name() == Some(s))
            .ok_or_else(|| {
                ConverterError::invalid_argument("category", format!("unknown category `{s}`"))
            })
    }
}

impl<'de> Deserialize<'de> for Category {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let code = i32::deserialize(deserializer)?;
        Ok(Self::from_code(code))
    }
}

/// Tag with an emphasis weight, as written by the user.
#[derive(Debug, Clone, PartialEq)]
pub struct Tag {
    pub name: String,
    pub weight: f64,
}

impl Tag {
    /// Creates a new tag with weight 1.0.
    pub fn new<S>(name: S) -> Self
    where
        S: Into<String>,
    {
        Self::with_weight(name, 1.0)
    }

    /// Creates a new tag.
    pub fn with_weight<S>(name: S, weight: f64) -> Self
    where
        S: Into<String>,
    {
        Self {
            name: name.into(),
            weight,
        }
    }
}

/// Tag resolved to a category.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedTag {
    pub name: String,
    pub weight: f64,
    pub category: Category,

    /// Occurrence count taken from the dictionary. Informational only.
    pub frequency: u64,
}

impl ClassifiedTag {
    /// Creates a new classified tag with weight 1.0 and an unknown frequency.
    ///
    /// # Arguments
    ///
    /// * `name` - Tag name.
    /// * `category` - Category of the tag.
    ///
    /// # Returns
    ///
    /// A new classified tag.
    pub fn new<S>(name: S, category: Category) -> Self
    where
        S: Into<String>,
    {
        Self {
            name: name.into(),
            weight: 1.0,
            category,
            frequency: UNKNOWN_FREQUENCY,
        }
    }
}
