//! Tag classification.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::dictionary::{TagDictionary, Vocabulary};
use crate::tag::{Category, ClassifiedTag, Tag, UNKNOWN_FREQUENCY};

pub const SCORE_TAGS: &[&str] = &[
    "score_9",
    "score_8",
    "score_7",
    "score_6",
    "score_5",
    "score_4",
    "score_3",
    "score_2",
    "score_1",
    "score_8_up",
    "score_7_up",
    "score_6_up",
    "score_5_up",
    "score_4_up",
    "score_3_up",
    "score_2_up",
    "score_1_up",
    "high_score",
    "great_score",
    "good_score",
    "average_score",
    "bad_score",
    "low_score",
];

pub const QUALITY_TAGS: &[&str] = &[
    "masterpiece",
    "best_quality",
    "great_quality",
    "good_quality",
    "average_quality",
    "normal_quality",
    "bad_quality",
    "low_quality",
    "worst_quality",
    "very_aesthetic",
    "aesthetic",
    "displeasing",
    "very_displeasing",
    "absurdres",
    "source_anime",
];

pub const RATING_TAGS: &[&str] = &[
    "sfw",
    "nsfw",
    "explicit",
    "questionable",
    "safe",
    "sensitive",
    "general",
    "rating_safe",
    "rating_questionable",
    "rating_explicit",
];

// Checked in order; the first match wins.
const PERSON_PATTERNS: &[&str] = &[
    r"^\d+girls?$",
    r"^\d+boys?$",
    "^1girl$",
    "^1boy$",
    "^male$",
    "^female$",
    "^solo$",
    "^multiple_girls$",
    "^multiple_boys$",
    "^female_child$",
    "^male_child$",
    "^mature_female$",
    "^mature_male$",
    "^old_female$",
    "^old_male$",
    "^(male|female)/(male/female)$",
];

static PERSON_REGEXES: Lazy<Vec<Regex>> = Lazy::new(|| {
    PERSON_PATTERNS
        .iter()
        .map(|p| Regex::new(p).unwrap_or_else(|e| panic!("invalid pattern {p:?}: {e}")))
        .collect()
});

/// Returns `true` if the name is a person or count tag.
pub fn is_person_tag(name: &str) -> bool {
    PERSON_REGEXES.iter().any(|re| re.is_match(name))
}

/// Name lists that force a category regardless of the dictionary.
#[derive(Debug, Clone, Copy)]
pub struct StaticLists<'a> {
    pub score: &'a [&'a str],
    pub quality: &'a [&'a str],
    pub rating: &'a [&'a str],
}

impl StaticLists<'static> {
    pub const DEFAULT: Self = Self {
        score: SCORE_TAGS,
        quality: QUALITY_TAGS,
        rating: RATING_TAGS,
    };
}

impl Default for StaticLists<'static> {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Dictionary-driven classifier.
pub struct Classifier<'a> {
    dict: &'a TagDictionary,
    lists: StaticLists<'a>,
}

impl<'a> Classifier<'a> {
    /// Creates a new classifier using the built-in static lists.
    pub const fn new(dict: &'a TagDictionary) -> Self {
        Self {
            dict,
            lists: StaticLists::DEFAULT,
        }
    }

    /// Creates a new classifier with custom static lists.
    pub const fn with_static_lists(dict: &'a TagDictionary, lists: StaticLists<'a>) -> Self {
        Self { dict, lists }
    }

    /// Resolves the canonical name and category of a tag.
    ///
    /// The Danbooru table is consulted first. For the e621 vocabulary, a hit in the
    /// e621 table replaces the Danbooru result. Afterwards the static lists are
    /// applied to the canonical name: score, then quality or rating, then the
    /// person/count patterns. Each later match overwrites the earlier one, so a
    /// name in both the score and quality lists ends up as quality.
    ///
    /// # Arguments
    ///
    /// * `tag` - A parsed tag.
    /// * `vocabulary` - Vocabulary of the target model.
    ///
    /// # Returns
    ///
    /// A classified tag carrying the weight of `tag`.
    pub fn classify(&self, tag: &Tag, vocabulary: Vocabulary) -> ClassifiedTag {
        let mut result = ClassifiedTag {
            name: tag.name.clone(),
            weight: tag.weight,
            category: Category::Unknown,
            frequency: UNKNOWN_FREQUENCY,
        };

        let e621 = (vocabulary == Vocabulary::E621).then_some(Vocabulary::E621);
        for v in std::iter::once(Vocabulary::Danbooru).chain(e621) {
            if let Some(entry) = self.dict.get(v, &tag.name) {
                result.name.clone_from(&entry.name);
                result.category = entry.category;
                result.frequency = entry.frequency;
            }
        }

        let name = result.name.as_str();
        if self.lists.score.contains(&name) {
            result.category = Category::Score;
        }
        if self.lists.quality.contains(&name) {
            result.category = Category::Quality;
        } else if self.lists.rating.contains(&name) {
            result.category = Category::Rating;
        }
        if is_person_tag(name) {
            result.category = Category::Person;
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::dictionary::DictEntry;

    fn entry(name: &str, code: i32, frequency: u64) -> DictEntry {
        DictEntry {
            name: name.into(),
            category: Category::from_code(code),
            frequency,
        }
    }

    #[test]
    fn test_classify_unknown() {
        let dict = TagDictionary::new();
        let c = Classifier::new(&dict)
            .classify(&Tag::with_weight("foo", 1.2), Vocabulary::Danbooru);
        assert_eq!("foo", c.name);
        assert_eq!(1.2, c.weight);
        assert_eq!(Category::Unknown, c.category);
        assert_eq!(UNKNOWN_FREQUENCY, c.frequency);
    }

    #[test]
    fn test_classify_canonical_name() {
        let mut dict = TagDictionary::new();
        dict.insert(Vocabulary::Danbooru, "kancolle", entry("kantai_collection", 3, 100));
        let c = Classifier::new(&dict).classify(&Tag::new("kancolle"), Vocabulary::Danbooru);
        assert_eq!("kantai_collection", c.name);
        assert_eq!(Category::Genre, c.category);
        assert_eq!(100, c.frequency);
    }

    #[test]
    fn test_classify_e621_overrides_danbooru() {
        let mut dict = TagDictionary::new();
        dict.insert(Vocabulary::Danbooru, "fox", entry("fox", 0, 10));
        dict.insert(Vocabulary::E621, "fox", entry("fox_(species)", 5, 20));
        let classifier = Classifier::new(&dict);

        let c = classifier.classify(&Tag::new("fox"), Vocabulary::E621);
        assert_eq!("fox_(species)", c.name);
        assert_eq!(Category::Other, c.category);
        assert_eq!(20, c.frequency);

        let c = classifier.classify(&Tag::new("fox"), Vocabulary::Danbooru);
        assert_eq!("fox", c.name);
        assert_eq!(Category::General, c.category);
    }

    #[test]
    fn test_classify_e621_uses_original_name() {
        let mut dict = TagDictionary::new();
        dict.insert(Vocabulary::Danbooru, "a", entry("b", 0, 10));
        dict.insert(Vocabulary::E621, "b", entry("c", 4, 20));
        let c = Classifier::new(&dict).classify(&Tag::new("a"), Vocabulary::E621);
        assert_eq!("b", c.name);
        assert_eq!(Category::General, c.category);
    }

    #[test]
    fn test_classify_static_lists_override_dictionary() {
        let mut dict = TagDictionary::new();
        dict.insert(Vocabulary::Danbooru, "general", entry("general", 0, 10));
        dict.insert(Vocabulary::Danbooru, "1girl", entry("1girl", 0, 10));
        let classifier = Classifier::new(&dict);
        assert_eq!(
            Category::Rating,
            classifier.classify(&Tag::new("general"), Vocabulary::Danbooru).category
        );
        assert_eq!(
            Category::Person,
            classifier.classify(&Tag::new("1girl"), Vocabulary::Danbooru).category
        );
        assert_eq!(
            Category::Score,
            classifier.classify(&Tag::new("score_9"), Vocabulary::E621).category
        );
    }

    #[test]
    fn test_remapped_name_hits_static_list() {
        let mut dict = TagDictionary::new();
        dict.insert(Vocabulary::Danbooru, "x", entry("masterpiece", 0, 1));
        let c = Classifier::new(&dict).classify(&Tag::new("x"), Vocabulary::Danbooru);
        assert_eq!("masterpiece", c.name);
        assert_eq!(Category::Quality, c.category);
    }

    #[test]
    fn test_quality_precedes_rating() {
        let dict = TagDictionary::new();
        let lists = StaticLists {
            score: &[],
            quality: &["both"],
            rating: &["both", "only_rating"],
        };
        let classifier = Classifier::with_static_lists(&dict, lists);
        assert_eq!(
            Category::Quality,
            classifier.classify(&Tag::new("both"), Vocabulary::Danbooru).category
        );
        assert_eq!(
            Category::Rating,
            classifier.classify(&Tag::new("only_rating"), Vocabulary::Danbooru).category
        );
    }

    #[test]
    fn test_quality_overwrites_score() {
        let dict = TagDictionary::new();
        let lists = StaticLists {
            score: &["both"],
            quality: &["both"],
            rating: &[],
        };
        let c = Classifier::with_static_lists(&dict, lists)
            .classify(&Tag::new("both"), Vocabulary::Danbooru);
        assert_eq!(Category::Quality, c.category);
    }

    #[test]
    fn test_person_overwrites_static_lists() {
        let dict = TagDictionary::new();
        let lists = StaticLists {
            score: &[],
            quality: &["solo"],
            rating: &[],
        };
        let c = Classifier::with_static_lists(&dict, lists)
            .classify(&Tag::new("solo"), Vocabulary::Danbooru);
        assert_eq!(Category::Person, c.category);
    }

    #[test]
    fn test_person_patterns() {
        for name in ["1girl", "2girls", "10boys", "solo", "mature_female", "male/male/female"] {
            assert!(is_person_tag(name), "{name}");
        }
        for name in ["girls", "1girl_solo", "solo_focus", "male/female"] {
            assert!(!is_person_tag(name), "{name}");
        }
    }
}
