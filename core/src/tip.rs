//! Tips and Tip Collections
//!
//! A [`Tip`] is a single piece of content tagged with a topic. A
//! [`TipCollection`] is the ordered set of tips kept in the tips file.
//!
//! # Invariants
//!
//! - A tip never carries an empty `topic` or `content`; [`TipCollection::add_tip`]
//!   trims both and skips the insert when either ends up empty.
//! - Insertion order is preserved across load and save.
//! - Id uniqueness is not checked on insert; UUID v4 collisions are left to
//!   probability.

use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// A single stored tip
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tip {
    /// Opaque unique identifier
    pub id: String,
    /// Topic category (trimmed, non-empty)
    pub topic: String,
    /// Tip content (trimmed, non-empty)
    pub content: String,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl Tip {
    /// Create a tip with a fresh id and the current time
    ///
    /// Returns `None` when `topic` or `content` is empty after trimming.
    #[must_use]
    pub fn new(topic: &str, content: &str) -> Option<Self> {
        let topic = topic.trim();
        let content = content.trim();
        if topic.is_empty() || content.is_empty() {
            return None;
        }

        Some(Self {
            id: uuid::Uuid::new_v4().to_string(),
            topic: topic.to_string(),
            content: content.to_string(),
            created_at: Utc::now(),
        })
    }

    /// First eight characters of the id, for log lines
    #[must_use]
    pub fn short_id(&self) -> &str {
        self.id.get(..8).unwrap_or(&self.id)
    }

    /// Whether this tip passes a topic filter (empty filter = all topics)
    #[must_use]
    pub fn matches(&self, filter: &[String]) -> bool {
        filter.is_empty() || filter.iter().any(|t| *t == self.topic)
    }
}

/// The full ordered set of tips, as stored on disk
///
/// Serializes as `{"tips": [...]}`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TipCollection {
    /// Tips in insertion order
    #[serde(default)]
    pub tips: Vec<Tip>,
}

impl TipCollection {
    /// Create an empty collection
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a collection from existing tips, keeping their order
    #[must_use]
    pub fn from_tips(tips: Vec<Tip>) -> Self {
        Self { tips }
    }

    /// Append a new tip
    ///
    /// Returns the id of the new tip, or `None` if it was skipped because the
    /// topic or content was empty.
    pub fn add_tip(&mut self, topic: &str, content: &str) -> Option<String> {
        let tip = Tip::new(topic, content)?;
        let id = tip.id.clone();
        self.tips.push(tip);
        Some(id)
    }

    /// Remove a tip by id, returning it if it was present
    pub fn remove_tip(&mut self, id: &str) -> Option<Tip> {
        let index = self.tips.iter().position(|t| t.id == id)?;
        Some(self.tips.remove(index))
    }

    /// Look up a tip by id
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Tip> {
        self.tips.iter().find(|t| t.id == id)
    }

    /// Tips whose topic is in `filter` (all tips when `filter` is empty)
    #[must_use]
    pub fn candidates(&self, filter: &[String]) -> Vec<&Tip> {
        self.tips.iter().filter(|t| t.matches(filter)).collect()
    }

    /// Pick a tip uniformly at random among the candidates for `filter`
    pub fn pick_random<R: Rng + ?Sized>(&self, filter: &[String], rng: &mut R) -> Option<&Tip> {
        self.candidates(filter).choose(rng).copied()
    }

    /// Number of tips
    #[must_use]
    pub fn len(&self) -> usize {
        self.tips.len()
    }

    /// Whether the collection holds no tips
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tips.is_empty()
    }

    /// Iterate over tips in order
    pub fn iter(&self) -> std::slice::Iter<'_, Tip> {
        self.tips.iter()
    }
}

impl<'a> IntoIterator for &'a TipCollection {
    type Item = &'a Tip;
    type IntoIter = std::slice::Iter<'a, Tip>;

    fn into_iter(self) -> Self::IntoIter {
        self.tips.iter()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    /// Build a tip with a fixed id, for deterministic tests
    pub(crate) fn tip(id: &str, topic: &str, content: &str) -> Tip {
        Tip {
            id: id.to_string(),
            topic: topic.to_string(),
            content: content.to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_add_tip_trims_topic_and_content() {
        let mut collection = TipCollection::new();
        let id = collection.add_tip("  git ", "\tuse git stash\n").unwrap();

        let tip = collection.get(&id).unwrap();
        assert_eq!(tip.topic, "git");
        assert_eq!(tip.content, "use git stash");
        assert_eq!(tip.id.len(), 36);
    }

    #[test]
    fn test_add_tip_skips_empty_fields() {
        let mut collection = TipCollection::new();

        assert!(collection.add_tip("", "content").is_none());
        assert!(collection.add_tip("git", "").is_none());
        assert!(collection.add_tip("   ", "content").is_none());
        assert!(collection.add_tip("git", "  \n ").is_none());
        assert!(collection.is_empty());
    }

    #[test]
    fn test_add_tip_generates_distinct_ids() {
        let mut collection = TipCollection::new();
        let a = collection.add_tip("git", "one").unwrap();
        let b = collection.add_tip("git", "two").unwrap();
        assert_ne!(a, b);
        assert_eq!(collection.len(), 2);
    }

    #[test]
    fn test_remove_tip_preserves_order() {
        let mut collection = TipCollection::from_tips(vec![
            tip("1", "git", "a"),
            tip("2", "vim", "b"),
            tip("3", "bash", "c"),
        ]);

        let removed = collection.remove_tip("2").unwrap();
        assert_eq!(removed.content, "b");

        let ids: Vec<_> = collection.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "3"]);
    }

    #[test]
    fn test_remove_missing_tip() {
        let mut collection = TipCollection::from_tips(vec![tip("1", "git", "a")]);
        assert!(collection.remove_tip("nope").is_none());
        assert_eq!(collection.len(), 1);
    }

    #[test]
    fn test_candidates_respect_filter() {
        let collection = TipCollection::from_tips(vec![
            tip("1", "git", "a"),
            tip("2", "vim", "b"),
            tip("3", "git", "c"),
        ]);

        assert_eq!(collection.candidates(&[]).len(), 3);
        assert_eq!(collection.candidates(&["git".to_string()]).len(), 2);
        assert_eq!(
            collection
                .candidates(&["vim".to_string(), "bash".to_string()])
                .len(),
            1
        );
        assert!(collection.candidates(&["bash".to_string()]).is_empty());
    }

    #[test]
    fn test_pick_random_only_yields_filtered_topics() {
        let collection = TipCollection::from_tips(vec![
            tip("1", "git", "a"),
            tip("2", "vim", "b"),
            tip("3", "bash", "c"),
            tip("4", "git", "d"),
        ]);
        let filter = vec!["git".to_string()];
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..200 {
            let picked = collection.pick_random(&filter, &mut rng).unwrap();
            assert_eq!(picked.topic, "git");
        }
    }

    #[test]
    fn test_pick_random_covers_all_candidates() {
        let collection = TipCollection::from_tips(vec![
            tip("1", "git", "a"),
            tip("2", "vim", "b"),
            tip("3", "bash", "c"),
        ]);
        let mut rng = StdRng::seed_from_u64(42);
        let mut seen = std::collections::HashSet::new();

        for _ in 0..200 {
            seen.insert(collection.pick_random(&[], &mut rng).unwrap().id.clone());
        }
        assert_eq!(seen.len(), 3);
    }

    #[test]
    fn test_pick_random_empty() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(TipCollection::new().pick_random(&[], &mut rng).is_none());

        let collection = TipCollection::from_tips(vec![tip("1", "git", "a")]);
        assert!(collection
            .pick_random(&["bash".to_string()], &mut rng)
            .is_none());
    }

    #[test]
    fn test_json_shape() {
        let collection = TipCollection::from_tips(vec![tip("1", "git", "a")]);
        let value = serde_json::to_value(&collection).unwrap();

        let first = &value["tips"][0];
        assert_eq!(first["id"], "1");
        assert_eq!(first["topic"], "git");
        assert_eq!(first["content"], "a");
        assert!(first["created_at"].is_string());
    }

    #[test]
    fn test_short_id() {
        let t = tip("0123456789abcdef", "git", "a");
        assert_eq!(t.short_id(), "01234567");
        assert_eq!(tip("1", "git", "a").short_id(), "1");
    }
}
