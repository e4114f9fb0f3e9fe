//! Vocabulary novelty tracking across one battle
//!
//! Counts how often the hero has used each word. Queries never mutate;
//! only `add_action` grows the counts, and a new battle gets a new tracker.

use std::collections::{HashMap, HashSet};

/// Common words that never count as new or overused
const STOP_WORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "all", "am", "an", "and", "any", "are",
    "as", "at", "be", "because", "been", "before", "being", "below", "between", "both", "but",
    "by", "can", "could", "did", "do", "does", "doing", "down", "during", "each", "few", "for",
    "from", "further", "had", "has", "have", "having", "he", "her", "here", "hers", "herself",
    "him", "himself", "his", "how", "i", "if", "in", "into", "is", "it", "its", "itself", "just",
    "me", "more", "most", "my", "myself", "no", "nor", "not", "now", "of", "off", "on", "once",
    "only", "or", "other", "our", "ours", "ourselves", "out", "over", "own", "same", "she",
    "should", "so", "some", "such", "than", "that", "the", "their", "theirs", "them",
    "themselves", "then", "there", "these", "they", "this", "those", "through", "to", "too",
    "under", "until", "up", "very", "was", "we", "were", "what", "when", "where", "which",
    "while", "who", "whom", "why", "will", "with", "would", "you", "your", "yours", "yourself",
    "yourselves",
];

#[derive(Debug, Clone, PartialEq)]
pub struct CreativityTracker {
    word_usage_counts: HashMap<String, u32>,
    word_overuse_threshold: u32,
}

impl CreativityTracker {
    pub fn new(word_overuse_threshold: u32) -> Self {
        Self {
            word_usage_counts: HashMap::new(),
            word_overuse_threshold,
        }
    }

    pub fn word_overuse_threshold(&self) -> u32 {
        self.word_overuse_threshold
    }

    /// Times `word` has been used this battle
    pub fn usage_count(&self, word: &str) -> u32 {
        self.word_usage_counts.get(word).copied().unwrap_or(0)
    }

    /// Lowercase, strip punctuation, split, drop stop words; order kept
    pub fn preprocess(action: &str) -> Vec<String> {
        let cleaned: String = action
            .to_lowercase()
            .chars()
            .filter(|c| c.is_alphanumeric() || c.is_whitespace())
            .collect();
        cleaned
            .split_whitespace()
            .filter(|word| !STOP_WORDS.contains(word))
            .map(str::to_string)
            .collect()
    }

    fn unique_words(action: &str) -> Vec<String> {
        let mut seen = HashSet::new();
        Self::preprocess(action)
            .into_iter()
            .filter(|word| seen.insert(word.clone()))
            .collect()
    }

    /// Distinct words in `action` never used before this battle
    pub fn count_new_words_in_action(&self, action: &str) -> u32 {
        Self::unique_words(action)
            .iter()
            .filter(|word| self.usage_count(word) == 0)
            .count() as u32
    }

    /// Occurrences in `action` of words whose prior usage already meets the
    /// threshold; a repeated overused word counts every time
    pub fn count_overused_words_in_action(&self, action: &str) -> u32 {
        Self::preprocess(action)
            .iter()
            .filter(|word| self.usage_count(word) >= self.word_overuse_threshold)
            .count() as u32
    }

    /// Record every word occurrence of a resolved hero action
    pub fn add_action(&mut self, action: &str) {
        for word in Self::preprocess(action) {
            *self.word_usage_counts.entry(word).or_insert(0) += 1;
        }
    }
}
