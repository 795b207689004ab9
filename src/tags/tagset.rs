//! Per-category tag lists

use serde::{Deserialize, Deserializer, Serialize};

use super::vocabulary::Category;

/// Tags grouped by category. Absent categories deserialize as empty lists.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryTags {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub component: Vec<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub style: Vec<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub context: Vec<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub vibe: Vec<String>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

impl CategoryTags {
    pub fn get(&self, category: Category) -> &[String] {
        match category {
            Category::Component => &self.component,
            Category::Style => &self.style,
            Category::Context => &self.context,
            Category::Vibe => &self.vibe,
        }
    }

    pub fn get_mut(&mut self, category: Category) -> &mut Vec<String> {
        match category {
            Category::Component => &mut self.component,
            Category::Style => &mut self.style,
            Category::Context => &mut self.context,
            Category::Vibe => &mut self.vibe,
        }
    }

    /// All tags in category order: component, style, context, vibe.
    pub fn flatten(&self) -> Vec<&str> {
        Category::ALL
            .iter()
            .flat_map(|c| self.get(*c).iter().map(String::as_str))
            .collect()
    }

    pub fn len(&self) -> usize {
        Category::ALL.iter().map(|c| self.get(*c).len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Normalize to lowercase, drop tags outside each category's vocabulary
    /// and remove duplicates. Returns the number of tags dropped.
    pub fn retain_known(&mut self) -> usize {
        let mut dropped = 0;
        for category in Category::ALL {
            let tags = self.get_mut(category);
            let before = tags.len();
            let mut kept: Vec<String> = Vec::with_capacity(before);
            for tag in tags.drain(..) {
                let tag = tag.trim().to_lowercase();
                if category.is_known(&tag) && !kept.contains(&tag) {
                    kept.push(tag);
                } else if !category.is_known(&tag) {
                    tracing::debug!("Dropping unknown {} tag '{}'", category, tag);
                }
            }
            dropped += before - kept.len();
            *tags = kept;
        }
        dropped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_categories_default_to_empty() {
        let tags: CategoryTags = serde_json::from_str(r#"{"component": ["hero"]}"#).unwrap();
        assert_eq!(tags.component, vec!["hero"]);
        assert!(tags.style.is_empty());
        assert!(tags.vibe.is_empty());
    }

    #[test]
    fn test_null_category_is_empty() {
        let tags: CategoryTags = serde_json::from_str(r#"{"style": null}"#).unwrap();
        assert!(tags.style.is_empty());
    }

    #[test]
    fn test_retain_known() {
        let mut tags = CategoryTags {
            component: vec!["Hero".into(), "hero".into(), "carousel".into()],
            style: vec![" dark-mode ".into()],
            context: vec![],
            vibe: vec!["calm".into(), "hero".into()],
        };

        let dropped = tags.retain_known();

        assert_eq!(dropped, 3);
        assert_eq!(tags.component, vec!["hero"]);
        assert_eq!(tags.style, vec!["dark-mode"]);
        assert_eq!(tags.vibe, vec!["calm"]);
    }

    #[test]
    fn test_flatten_order() {
        let tags = CategoryTags {
            component: vec!["cards".into()],
            style: vec!["minimal".into()],
            context: vec!["saas".into()],
            vibe: vec!["calm".into()],
        };
        assert_eq!(tags.flatten(), vec!["cards", "minimal", "saas", "calm"]);
        assert_eq!(tags.len(), 4);
    }
}
