//! Tag matcher for ranking reference blocks by weighted tag overlap
//!
//! score = Σ weight(category) · |query(category) ∩ block(category)|
//!
//! There is no normalization by tag-set size: a block that shares more tags
//! in heavily weighted categories always ranks higher.

use serde::Serialize;
use std::collections::HashSet;

use super::index::TaggedBlock;
use super::tagset::CategoryTags;
use super::vocabulary::Category;

/// Number of matches that get scored, explained and returned
pub const TOP_MATCHES: usize = 6;

/// Number of matches that go into an export pack
pub const EXPORT_LIMIT: usize = 4;

/// Overlap between a query and one block
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TagOverlap {
    pub score: f64,
    pub matched: CategoryTags,
}

/// Score a block's tags against query tags.
///
/// Matched tags keep the block's order; duplicates count once.
pub fn score_tags(query: &CategoryTags, block: &CategoryTags) -> TagOverlap {
    let mut score = 0.0;
    let mut matched = CategoryTags::default();

    for category in Category::ALL {
        let query_set: HashSet<&str> = query.get(category).iter().map(String::as_str).collect();
        let shared = matched.get_mut(category);

        for tag in block.get(category) {
            if query_set.contains(tag.as_str()) && !shared.contains(tag) {
                shared.push(tag.clone());
            }
        }

        score += shared.len() as f64 * category.weight();
    }

    TagOverlap { score, matched }
}

/// A block with its overlap, borrowed from the index it came from
#[derive(Debug, Clone)]
pub struct ScoredBlock<'a> {
    pub block: &'a TaggedBlock,
    pub score: f64,
    pub matched: CategoryTags,
}

/// Ranks indexed blocks against query tags
pub struct TagMatcher {
    limit: usize,
}

impl TagMatcher {
    pub fn new() -> Self {
        Self { limit: TOP_MATCHES }
    }

    /// Set how many ranked blocks to keep
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Score every block, drop zero scores, sort descending and truncate.
    /// Equal scores keep their index order.
    pub fn rank<'a>(&self, query: &CategoryTags, blocks: &'a [TaggedBlock]) -> Vec<ScoredBlock<'a>> {
        let mut scored: Vec<ScoredBlock<'a>> = blocks
            .iter()
            .filter_map(|block| {
                let overlap = score_tags(query, &block.tags);
                (overlap.score > 0.0).then_some(ScoredBlock {
                    block,
                    score: overlap.score,
                    matched: overlap.matched,
                })
            })
            .collect();

        // sort_by is stable
        scored.sort_by(|a, b| b.score.total_cmp(&a.score));
        scored.truncate(self.limit);

        scored
    }
}

impl Default for TagMatcher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn tags(component: &[&str], style: &[&str], context: &[&str], vibe: &[&str]) -> CategoryTags {
        let own = |xs: &[&str]| xs.iter().map(|s| s.to_string()).collect();
        CategoryTags {
            component: own(component),
            style: own(style),
            context: own(context),
            vibe: own(vibe),
        }
    }

    fn block(id: i64, tags: CategoryTags) -> TaggedBlock {
        TaggedBlock {
            id,
            title: None,
            arena_url: format!("https://www.are.na/block/{}", id),
            image_url: None,
            tags,
            one_liner: format!("block {}", id),
            indexed_at: Utc::now(),
        }
    }

    #[test]
    fn test_component_overlap() {
        let query = tags(&["dashboard", "cards"], &[], &[], &[]);
        let block = tags(&["cards", "hero"], &[], &[], &[]);

        let overlap = score_tags(&query, &block);

        assert_eq!(overlap.matched.component, vec!["cards"]);
        assert_eq!(overlap.score, 3.0);
    }

    #[test]
    fn test_weighted_sum() {
        let query = tags(
            &["dashboard", "charts"],
            &["dark-mode", "minimal"],
            &["saas", "fintech"],
            &["calm", "premium"],
        );
        let block = tags(
            &["charts", "dashboard", "table"],
            &["minimal"],
            &["saas", "b2b"],
            &["premium", "calm", "bold"],
        );

        let overlap = score_tags(&query, &block);

        // 3·2 + 1.5·1 + 2·1 + 1·2
        assert_eq!(overlap.score, 11.5);
        assert_eq!(overlap.matched.component, vec!["charts", "dashboard"]);
        assert_eq!(overlap.matched.vibe, vec!["premium", "calm"]);
    }

    #[test]
    fn test_duplicate_block_tags_count_once() {
        let query = tags(&["hero"], &[], &[], &[]);
        let block = tags(&["hero", "hero"], &[], &[], &[]);

        let overlap = score_tags(&query, &block);

        assert_eq!(overlap.score, 3.0);
        assert_eq!(overlap.matched.component, vec!["hero"]);
    }

    #[test]
    fn test_empty_categories_score_zero() {
        let overlap = score_tags(&CategoryTags::default(), &tags(&["hero"], &[], &[], &[]));
        assert_eq!(overlap.score, 0.0);
        assert!(overlap.matched.is_empty());
    }

    #[test]
    fn test_rank_excludes_zero_and_sorts_descending() {
        let query = tags(&["dashboard", "metrics", "charts"], &[], &["saas"], &[]);
        let blocks = vec![
            block(1, tags(&["dashboard", "charts"], &[], &[], &[])), // 6
            block(2, tags(&["hero"], &["neon"], &[], &[])),          // 0
            block(3, tags(&["dashboard", "metrics", "charts"], &[], &[], &[])), // 9
        ];

        let ranked = TagMatcher::new().rank(&query, &blocks);

        let ids: Vec<i64> = ranked.iter().map(|r| r.block.id).collect();
        assert_eq!(ids, vec![3, 1]);
        assert_eq!(ranked[0].score, 9.0);
        assert_eq!(ranked[1].score, 6.0);
    }

    #[test]
    fn test_rank_ties_keep_index_order() {
        let query = tags(&["hero"], &[], &[], &[]);
        let blocks: Vec<_> = (1..=3).map(|id| block(id, tags(&["hero"], &[], &[], &[]))).collect();

        let ids: Vec<i64> = TagMatcher::new()
            .rank(&query, &blocks)
            .iter()
            .map(|r| r.block.id)
            .collect();

        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_rank_truncates() {
        let query = tags(&["cards"], &[], &[], &[]);
        let blocks: Vec<_> = (0..10).map(|id| block(id, tags(&["cards"], &[], &[], &[]))).collect();

        assert_eq!(TagMatcher::new().rank(&query, &blocks).len(), TOP_MATCHES);
        assert_eq!(
            TagMatcher::new().with_limit(EXPORT_LIMIT).rank(&query, &blocks).len(),
            EXPORT_LIMIT
        );
    }

    #[test]
    fn test_scoring_is_repeatable() {
        let query = tags(&["form", "modal"], &["rounded"], &["mobile-app"], &["friendly"]);
        let blocks = vec![
            block(1, tags(&["form"], &["rounded"], &[], &["friendly"])),
            block(2, tags(&["modal"], &[], &["mobile-app"], &[])),
        ];
        let matcher = TagMatcher::new();

        let first: Vec<(i64, f64)> = matcher.rank(&query, &blocks).iter().map(|r| (r.block.id, r.score)).collect();
        let second: Vec<(i64, f64)> = matcher.rank(&query, &blocks).iter().map(|r| (r.block.id, r.score)).collect();

        assert_eq!(first, second);
    }
}
