use crate::tag::{Category, ClassifiedTag};

/// Sorts tags by category priority.
///
/// For each category of `priority`, the tags of that category are emitted in their
/// input order. Tags whose category is absent from `priority` are dropped
/// (drop-if-absent); this is how a profile excludes whole categories.
///
/// # Arguments
///
/// * `tags` - Classified tags.
/// * `priority` - Output order of categories.
///
/// # Returns
///
/// The ordered tags.
///
/// # Examples
///
/// ```
/// use prompt_converter::{order_tags, Category, ClassifiedTag};
///
/// let tags = vec![
///     ClassifiedTag::new("smile", Category::General),
///     ClassifiedTag::new("newest", Category::Era),
///     ClassifiedTag::new("1girl", Category::Person),
/// ];
/// let sorted = order_tags(tags, &[Category::Person, Category::General]);
/// let names: Vec<_> = sorted.iter().map(|t| t.name.as_str()).collect();
/// assert_eq!(vec!["1girl", "smile"], names);
/// ```
pub fn order_tags(tags: Vec<ClassifiedTag>, priority: &[Category]) -> Vec<ClassifiedTag> {
    let mut buckets: Vec<Vec<ClassifiedTag>> = vec![vec![]; priority.len()];
    for tag in tags {
        match priority.iter().position(|&c| c == tag.category) {
            Some(rank) => buckets[rank].push(tag),
            None => {
                tracing::trace!(name = %tag.name, category = %tag.category, "dropped by priority");
            }
        }
    }
    buckets.into_iter().flatten().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tag(name: &str, category: Category) -> ClassifiedTag {
        ClassifiedTag::new(name, category)
    }

    fn names(tags: &[ClassifiedTag]) -> Vec<&str> {
        tags.iter().map(|t| t.name.as_str()).collect()
    }

    #[test]
    fn test_order_empty() {
        assert!(order_tags(vec![], &[Category::General]).is_empty());
    }

    #[test]
    fn test_order_stable_within_category() {
        let tags = vec![
            tag("a", Category::General),
            tag("b", Category::Character),
            tag("c", Category::General),
            tag("d", Category::Character),
        ];
        let sorted = order_tags(tags, &[Category::Character, Category::General]);
        assert_eq!(vec!["b", "d", "a", "c"], names(&sorted));
    }

    #[test]
    fn test_order_drops_absent_categories() {
        let tags = vec![
            tag("a", Category::General),
            tag("newest", Category::Era),
            tag("b", Category::Unmapped(2)),
            tag("1girl", Category::Person),
        ];
        let sorted = order_tags(tags, &[Category::Person, Category::General]);
        assert_eq!(vec!["1girl", "a"], names(&sorted));
    }

    #[test]
    fn test_order_keeps_every_listed_tag() {
        let tags: Vec<_> = Category::KNOWN
            .iter()
            .enumerate()
            .map(|(i, &c)| tag(&i.to_string(), c))
            .collect();
        let mut priority = Category::KNOWN.to_vec();
        priority.reverse();
        let sorted = order_tags(tags.clone(), &priority);
        assert_eq!(tags.len(), sorted.len());
        for t in &tags {
            assert_eq!(1, sorted.iter().filter(|s| s.name == t.name).count());
        }
        assert_eq!(Category::Unknown, sorted[0].category);
    }
}
