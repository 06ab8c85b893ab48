use hashbrown::HashSet;

use crate::auto_tags::AutoQualityTags;
use crate::classifier::Classifier;
use crate::dictionary::TagDictionary;
use crate::filter::{CategoryFilter, FilteredTags};
use crate::order::order_tags;
use crate::profile::{Generation, ModelProfile, Rating};
use crate::serializer::serialize_tags;
use crate::tag::{Category, ClassifiedTag, Tag};
use crate::weight::{parse_weight, tokenize};

/// Options of a conversion.
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    /// Selects the rating tags injected per profile.
    pub rating: Rating,

    /// Drops repeated tag names, keeping the first occurrence.
    pub unique: bool,

    /// Appends the default quality tags of each profile.
    pub auto_quality_tags: bool,

    /// Resets every user weight to 1.0.
    pub remove_weights: bool,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            rating: Rating::Safe,
            unique: true,
            auto_quality_tags: true,
            remove_weights: false,
        }
    }
}

/// Prompt generated for one profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub profile: String,
    pub text: String,
}

/// Result of [`PromptConverter::convert_with_filter`].
#[derive(Debug, Clone)]
pub struct FilteredConversion {
    pub prompts: Vec<Prompt>,

    /// Every tag removed by the filter in any profile.
    pub filtered: FilteredTags,
}

/// Tag waiting for classification, or an injected tag whose category is fixed.
enum Pending {
    Parsed(Tag),
    Injected(ClassifiedTag),
}

impl Pending {
    fn name(&self) -> &str {
        match self {
            Self::Parsed(t) => &t.name,
            Self::Injected(t) => &t.name,
        }
    }
}

/// Removes items whose name appeared earlier, keeping the first occurrence.
pub fn dedup_by_name<T, F>(mut items: Vec<T>, name: F) -> Vec<T>
where
    F: Fn(&T) -> &str,
{
    let mut seen = HashSet::new();
    items.retain(|item| seen.insert(name(item).to_string()));
    items
}

/// Converts tag lists into prompts for each model profile.
///
/// The converter is immutable once built and can be shared between threads.
///
/// # Examples
///
/// ```
/// use prompt_converter::{AutoQualityTags, ConvertOptions, PromptConverter, TagDictionary};
///
/// let converter = PromptConverter::new(TagDictionary::new(), AutoQualityTags::new());
/// let prompts = converter.convert("{{solo}}, 1girl", &ConvertOptions::default());
/// assert_eq!("novelai3", prompts[0].profile);
/// assert_eq!("{{solo}}, 1girl", prompts[0].text);
/// assert_eq!("ponyxl", prompts[1].profile);
/// assert_eq!("(solo:1.1025), 1girl, rating safe", prompts[1].text);
/// ```
pub struct PromptConverter {
    dict: TagDictionary,
    auto_tags: AutoQualityTags,
    profiles: Vec<ModelProfile>,
}

impl PromptConverter {
    /// Creates a new converter with the current built-in profiles.
    ///
    /// # Arguments
    ///
    /// * `dict` - Tag dictionary.
    /// * `auto_tags` - Default quality tags keyed by profile name.
    ///
    /// # Returns
    ///
    /// A new converter.
    pub fn new(dict: TagDictionary, auto_tags: AutoQualityTags) -> Self {
        Self {
            dict,
            auto_tags,
            profiles: ModelProfile::builtin(Generation::Current),
        }
    }

    /// Replaces the profiles. Prompts are returned in the order of `profiles`.
    pub fn profiles(mut self, profiles: Vec<ModelProfile>) -> Self {
        self.profiles = profiles;
        self
    }

    /// Gets the profiles in output order.
    pub fn get_profiles(&self) -> &[ModelProfile] {
        &self.profiles
    }

    /// Tokenizes and parses a tag list.
    pub fn parse(&self, text: &str, remove_weights: bool) -> Vec<Tag> {
        let mut tags: Vec<Tag> = tokenize(text).iter().map(|t| parse_weight(t)).collect();
        if remove_weights {
            for tag in &mut tags {
                tag.weight = 1.0;
            }
        }
        tags
    }

    /// Converts a tag list into one prompt per profile.
    ///
    /// # Arguments
    ///
    /// * `text` - Comma-separated tags.
    /// * `options` - Conversion options.
    ///
    /// # Returns
    ///
    /// Prompts in profile order.
    pub fn convert(&self, text: &str, options: &ConvertOptions) -> Vec<Prompt> {
        let tags = self.parse(text, options.remove_weights);
        self.profiles
            .iter()
            .map(|profile| self.convert_profile(&tags, profile, options, None))
            .collect()
    }

    /// Converts a tag list and removes excluded categories after ordering.
    ///
    /// # Arguments
    ///
    /// * `text` - Comma-separated tags.
    /// * `options` - Conversion options.
    /// * `filter` - Excluded categories.
    ///
    /// # Returns
    ///
    /// Prompts in profile order, and the names removed from any profile.
    pub fn convert_with_filter(
        &self,
        text: &str,
        options: &ConvertOptions,
        filter: &CategoryFilter,
    ) -> FilteredConversion {
        let tags = self.parse(text, options.remove_weights);
        let mut filtered = FilteredTags::new();
        let prompts = self
            .profiles
            .iter()
            .map(|profile| {
                self.convert_profile(&tags, profile, options, Some((filter, &mut filtered)))
            })
            .collect();
        FilteredConversion { prompts, filtered }
    }

    fn convert_profile(
        &self,
        tags: &[Tag],
        profile: &ModelProfile,
        options: &ConvertOptions,
        filter: Option<(&CategoryFilter, &mut FilteredTags)>,
    ) -> Prompt {
        let mut pending: Vec<Pending> = tags.iter().cloned().map(Pending::Parsed).collect();
        if options.auto_quality_tags {
            pending.extend(
                self.auto_tags
                    .get(profile.name())
                    .iter()
                    .cloned()
                    .map(Pending::Injected),
            );
        }
        pending.extend(profile.tags_for_rating(options.rating).iter().map(|name| {
            Pending::Injected(ClassifiedTag::new(name.as_str(), Category::Rating))
        }));
        if options.unique {
            pending = dedup_by_name(pending, Pending::name);
        }

        let classifier = Classifier::new(&self.dict);
        let classified = pending
            .into_iter()
            .map(|p| match p {
                Pending::Parsed(tag) => classifier.classify(&tag, profile.vocabulary()),
                Pending::Injected(tag) => tag,
            })
            .collect();
        let mut ordered = order_tags(classified, profile.priority());
        if let Some((filter, removed)) = filter {
            ordered = filter.apply(ordered, removed);
        }
        tracing::debug!(profile = profile.name(), n_tags = ordered.len(), "converted");

        Prompt {
            profile: profile.name().to_string(),
            text: serialize_tags(
                &ordered,
                profile.bracket_style(),
                profile.escapes_parentheses(),
            ),
        }
    }
}
