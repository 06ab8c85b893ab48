//! Category exclusion applied after ordering.

use std::collections::BTreeSet;
use std::fmt;

use hashbrown::HashSet;

use crate::tag::{Category, ClassifiedTag};

/// Removes tags of excluded categories.
#[derive(Debug, Clone, Default)]
pub struct CategoryFilter {
    excluded: HashSet<Category>,
}

impl CategoryFilter {
    /// Creates a filter that excludes nothing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Excludes a category.
    pub fn exclude(mut self, category: Category) -> Self {
        self.excluded.insert(category);
        self
    }

    pub fn is_excluded(&self, category: Category) -> bool {
        self.excluded.contains(&category)
    }

    pub fn is_empty(&self) -> bool {
        self.excluded.is_empty()
    }

    /// Removes excluded tags.
    ///
    /// # Arguments
    ///
    /// * `tags` - Ordered tags.
    /// * `removed` - Receives the names of the removed tags.
    ///
    /// # Returns
    ///
    /// The remaining tags in their original order.
    pub fn apply(
        &self,
        tags: Vec<ClassifiedTag>,
        removed: &mut FilteredTags,
    ) -> Vec<ClassifiedTag> {
        let (dropped, kept): (Vec<_>, Vec<_>) =
            tags.into_iter().partition(|t| self.is_excluded(t.category));
        removed.extend(dropped.into_iter().map(|t| t.name));
        kept
    }
}

impl FromIterator<Category> for CategoryFilter {
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = Category>,
    {
        Self {
            excluded: iter.into_iter().collect(),
        }
    }
}

/// Names removed by a [`CategoryFilter`], deduplicated and sorted.
///
/// Formats as the names joined with `", "`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilteredTags(BTreeSet<String>);

impl FilteredTags {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl Extend<String> for FilteredTags {
    fn extend<I>(&mut self, iter: I)
    where
        I: IntoIterator<Item = String>,
    {
        self.0.extend(iter);
    }
}

impl fmt::Display for FilteredTags {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (i, name) in self.0.iter().enumerate() {
            if i != 0 {
                f.write_str(", ")?;
            }
            f.write_str(name)?;
        }
        Ok(())
    }
}
