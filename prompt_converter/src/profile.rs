//! Model profiles.

use std::fmt;
use std::str::FromStr;

use crate::dictionary::Vocabulary;
use crate::errors::{ConverterError, Result};
use crate::tag::Category;

/// Content rating requested by the caller.
#[derive(Debug, Clone, Copy, Default, Hash, PartialEq, Eq)]
pub enum Rating {
    #[default]
    Safe,
    Sensitive,
    Questionable,
    Explicit,
}

impl Rating {
    /// All ratings, from the least to the most explicit.
    pub const ALL: [Self; 4] = [
        Self::Safe,
        Self::Sensitive,
        Self::Questionable,
        Self::Explicit,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Safe => "safe",
            Self::Sensitive => "sensitive",
            Self::Questionable => "questionable",
            Self::Explicit => "explicit",
        }
    }

    const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Rating {
    type Err = ConverterError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| {
                ConverterError::invalid_argument("rating", format!("unknown rating `{s}`"))
            })
    }
}

/// How emphasis weights are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BracketStyle {
    /// `(tag:1.2)`
    ExplicitWeight,

    /// `{{tag}}` and `[[tag]]`
    NestedEmphasis,
}

/// Set of built-in profiles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Generation {
    /// novelai3, ponyxl, animagine3.1, illustrious.
    First,

    /// All built-in profiles.
    #[default]
    Current,
}

impl FromStr for Generation {
    type Err = ConverterError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "first" => Ok(Self::First),
            "current" => Ok(Self::Current),
            _ => Err(ConverterError::invalid_argument(
                "generation",
                format!("unknown generation `{s}`"),
            )),
        }
    }
}

/// Prompt dialect of a target model.
#[derive(Debug, Clone)]
pub struct ModelProfile {
    pub(crate) name: String,
    pub(crate) vocabulary: Vocabulary,
    pub(crate) priority: Vec<Category>,
    pub(crate) rating_tags: [Vec<String>; 4],
    pub(crate) bracket_style: BracketStyle,
    pub(crate) escape_parentheses: bool,
}

impl ModelProfile {
    /// Creates a new profile without rating tags and without escaping.
    ///
    /// # Arguments
    ///
    /// * `name` - Profile name. Also the key in the auto-quality-tag document.
    /// * `vocabulary` - Vocabulary used for classification.
    /// * `priority` - Output order of categories. Categories not listed are dropped.
    /// * `bracket_style` - How weights are written.
    ///
    /// # Returns
    ///
    /// A new profile.
    pub fn new<S>(
        name: S,
        vocabulary: Vocabulary,
        priority: Vec<Category>,
        bracket_style: BracketStyle,
    ) -> Self
    where
        S: Into<String>,
    {
        Self {
            name: name.into(),
            vocabulary,
            priority,
            rating_tags: Default::default(),
            bracket_style,
            escape_parentheses: false,
        }
    }

    /// Sets whether `(` and `)` in tag names are escaped with a backslash.
    pub fn escape_parentheses(mut self, escape: bool) -> Self {
        self.escape_parentheses = escape;
        self
    }

    /// Sets the tags injected for a rating.
    pub fn rating_tags(mut self, rating: Rating, tags: &[&str]) -> Self {
        self.rating_tags[rating.index()] = tags.iter().map(|t| t.to_string()).collect();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub const fn vocabulary(&self) -> Vocabulary {
        self.vocabulary
    }

    pub fn priority(&self) -> &[Category] {
        &self.priority
    }

    pub const fn bracket_style(&self) -> BracketStyle {
        self.bracket_style
    }

    pub const fn escapes_parentheses(&self) -> bool {
        self.escape_parentheses
    }

    /// Gets the tags injected for a rating.
    pub fn tags_for_rating(&self, rating: Rating) -> &[String] {
        &self.rating_tags[rating.index()]
    }

    /// NovelAI Diffusion V3.
    pub fn novelai3() -> Self {
        use Category as C;
        Self::new(
            "novelai3",
            Vocabulary::Danbooru,
            vec![
                C::Person,
                C::Character,
                C::Genre,
                C::Style,
                C::Other,
                C::General,
                C::Unknown,
                C::Quality,
                C::Score,
                C::Rating,
                C::Era,
            ],
            BracketStyle::NestedEmphasis,
        )
        .rating_tags(Rating::Questionable, &["nsfw"])
        .rating_tags(Rating::Explicit, &["nsfw"])
    }

    /// Pony Diffusion V6 XL.
    pub fn ponyxl() -> Self {
        use Category as C;
        Self::new(
            "ponyxl",
            Vocabulary::E621,
            vec![
                C::Score,
                C::Quality,
                C::Person,
                C::Character,
                C::Genre,
                C::Style,
                C::Other,
                C::General,
                C::Unknown,
                C::Rating,
                C::Era,
            ],
            BracketStyle::ExplicitWeight,
        )
        .escape_parentheses(true)
        .rating_tags(Rating::Safe, &["rating_safe"])
        .rating_tags(Rating::Sensitive, &["rating_questionable"])
        .rating_tags(Rating::Questionable, &["rating_questionable"])
        .rating_tags(Rating::Explicit, &["rating_explicit"])
    }

    /// Animagine XL 3.1.
    pub fn animagine31() -> Self {
        use Category as C;
        Self::new(
            "animagine3.1",
            Vocabulary::Danbooru,
            vec![
                C::Person,
                C::Character,
                C::Genre,
                C::Other,
                C::General,
                C::Unknown,
                C::Style,
                C::Quality,
                C::Score,
                C::Rating,
                C::Era,
            ],
            BracketStyle::ExplicitWeight,
        )
        .escape_parentheses(true)
        .rating_tags(Rating::Safe, &["general"])
        .rating_tags(Rating::Sensitive, &["sensitive"])
        .rating_tags(Rating::Questionable, &["nsfw"])
        .rating_tags(Rating::Explicit, &["nsfw", "explicit"])
    }

    /// Animagine XL 4.0.
    pub fn animagine40() -> Self {
        use Category as C;
        Self::new(
            "animagine4.0",
            Vocabulary::Danbooru,
            vec![
                C::Person,
                C::Character,
                C::Genre,
                C::Other,
                C::General,
                C::Unknown,
                C::Style,
                C::Quality,
                C::Score,
                C::Rating,
                C::Era,
            ],
            BracketStyle::ExplicitWeight,
        )
        .escape_parentheses(true)
        .rating_tags(Rating::Safe, &["general"])
        .rating_tags(Rating::Sensitive, &["sensitive"])
        .rating_tags(Rating::Questionable, &["questionable"])
        .rating_tags(Rating::Explicit, &["explicit"])
    }

    /// Illustrious XL.
    pub fn illustrious() -> Self {
        use Category as C;
        Self::new(
            "illustrious",
            Vocabulary::Danbooru,
            vec![
                C::Person,
                C::Character,
                C::Genre,
                C::Rating,
                C::Other,
                C::General,
                C::Unknown,
                C::Style,
                C::Quality,
                C::Score,
                C::Era,
            ],
            BracketStyle::ExplicitWeight,
        )
        .escape_parentheses(true)
        .rating_tags(Rating::Safe, &["general"])
        .rating_tags(Rating::Sensitive, &["sensitive"])
        .rating_tags(Rating::Questionable, &["questionable"])
        .rating_tags(Rating::Explicit, &["explicit"])
    }

    /// Gets the built-in profiles of a generation in output order.
    pub fn builtin(generation: Generation) -> Vec<Self> {
        match generation {
            Generation::First => vec![
                Self::novelai3(),
                Self::ponyxl(),
                Self::animagine31(),
                Self::illustrious(),
            ],
            Generation::Current => vec![
                Self::novelai3(),
                Self::ponyxl(),
                Self::animagine31(),
                Self::animagine40(),
                Self::illustrious(),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rating_from_str() {
        for r in Rating::ALL {
            assert_eq!(r, r.as_str().parse().unwrap());
        }
        assert!("r18".parse::<Rating>().is_err());
    }

    #[test]
    fn test_builtin_names() {
        let names: Vec<_> = ModelProfile::builtin(Generation::Current)
            .iter()
            .map(|p| p.name().to_string())
            .collect();
        assert_eq!(
            vec!["novelai3", "ponyxl", "animagine3.1", "animagine4.0", "illustrious"],
            names
        );
        assert_eq!(4, ModelProfile::builtin(Generation::First).len());
    }

    #[test]
    fn test_builtin_priorities_are_permutations() {
        for p in ModelProfile::builtin(Generation::Current) {
            assert_eq!(Category::KNOWN.len(), p.priority().len(), "{}", p.name());
            for c in Category::KNOWN {
                assert!(p.priority().contains(&c), "{} lacks {c}", p.name());
            }
        }
    }

    #[test]
    fn test_rating_tags() {
        let expected: [(&str, [&[&str]; 4]); 5] = [
            ("novelai3", [&[], &[], &["nsfw"], &["nsfw"]]),
            (
                "ponyxl",
                [
                    &["rating_safe"],
                    &["rating_questionable"],
                    &["rating_questionable"],
                    &["rating_explicit"],
                ],
            ),
            (
                "animagine3.1",
                [&["general"], &["sensitive"], &["nsfw"], &["nsfw", "explicit"]],
            ),
            (
                "animagine4.0",
                [&["general"], &["sensitive"], &["questionable"], &["explicit"]],
            ),
            (
                "illustrious",
                [&["general"], &["sensitive"], &["questionable"], &["explicit"]],
            ),
        ];
        let profiles = ModelProfile::builtin(Generation::Current);
        assert_eq!(expected.len(), profiles.len());
        for (p, (name, tables)) in profiles.iter().zip(expected) {
            assert_eq!(name, p.name());
            for (rating, tags) in Rating::ALL.into_iter().zip(tables) {
                assert_eq!(tags, p.tags_for_rating(rating), "{name} {rating}");
            }
        }
    }

    #[test]
    fn test_only_novelai_uses_nested_emphasis() {
        for p in ModelProfile::builtin(Generation::Current) {
            let nested = p.bracket_style() == BracketStyle::NestedEmphasis;
            assert_eq!(p.name() == "novelai3", nested);
            assert_eq!(!nested, p.escapes_parentheses());
        }
    }
}
