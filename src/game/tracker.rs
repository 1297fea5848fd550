use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::content::Category;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CategoryScore {
    pub correct: u32,
    pub total: u32,
}

impl CategoryScore {
    pub fn accuracy(&self) -> Option<f64> {
        if self.total == 0 {
            None
        } else {
            Some(self.correct as f64 / self.total as f64)
        }
    }
}

/// Per-category accuracy for the whole run. Holds all eight categories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PerformanceTracker {
    scores: BTreeMap<Category, CategoryScore>,
}

impl Default for PerformanceTracker {
    fn default() -> Self {
        PerformanceTracker {
            scores: Category::ALL
                .into_iter()
                .map(|c| (c, CategoryScore::default()))
                .collect(),
        }
    }
}

impl PerformanceTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, category: Category, correct: bool) {
        let score = self.scores.entry(category).or_default();
        score.total += 1;
        if correct {
            score.correct += 1;
        }
    }

    pub fn score(&self, category: Category) -> CategoryScore {
        self.scores.get(&category).copied().unwrap_or_default()
    }

    pub fn accuracy(&self, category: Category) -> Option<f64> {
        self.score(category).accuracy()
    }

    /// (correct, total) summed across every category.
    pub fn totals(&self) -> (u32, u32) {
        self.scores
            .values()
            .fold((0, 0), |(c, t), s| (c + s.correct, t + s.total))
    }

    /// Categories with at least one attempt, in canonical order.
    pub fn attempted(&self) -> impl Iterator<Item = (Category, CategoryScore)> + '_ {
        self.scores
            .iter()
            .filter(|(_, s)| s.total > 0)
            .map(|(c, s)| (*c, *s))
    }

    /// Checks the shape of a tracker read from disk.
    pub fn validate(&self) -> Result<(), String> {
        for category in Category::ALL {
            let Some(score) = self.scores.get(&category) else {
                return Err(format!("performance is missing {category:?}"));
            };
            if score.correct > score.total {
                return Err(format!(
                    "{category:?} has {} correct out of {}",
                    score.correct, score.total
                ));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MistakeRecord {
    pub chapter: u32,
    pub category: Category,
    pub question: String,
    pub your_answer: String,
    pub correct_answer: String,
    pub lesson: String,
}

/// Append-only list of wrong answers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MistakeLog {
    records: Vec<MistakeRecord>,
}

impl MistakeLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: MistakeRecord) {
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn all(&self) -> &[MistakeRecord] {
        &self.records
    }

    /// The last `n` records, oldest first.
    pub fn recent(&self, n: usize) -> &[MistakeRecord] {
        let start = self.records.len().saturating_sub(n);
        &self.records[start..]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mistake(chapter: u32) -> MistakeRecord {
        MistakeRecord {
            chapter,
            category: Category::Phishing,
            question: format!("q{chapter}"),
            your_answer: "wrong".into(),
            correct_answer: "right".into(),
            lesson: format!("lesson {chapter}"),
        }
    }

    #[test]
    fn record_counts_attempts_and_hits() {
        let mut t = PerformanceTracker::new();
        t.record(Category::Malware, true);
        t.record(Category::Malware, false);
        t.record(Category::Malware, true);
        assert_eq!(
            t.score(Category::Malware),
            CategoryScore {
                correct: 2,
                total: 3
            }
        );
        assert_eq!(t.totals(), (2, 3));
    }

    #[test]
    fn zero_attempts_have_no_accuracy() {
        let t = PerformanceTracker::new();
        assert_eq!(t.accuracy(Category::Phishing), None);
        assert_eq!(t.attempted().count(), 0);
        assert_eq!(t.totals(), (0, 0));
    }

    #[test]
    fn attempted_skips_untouched_categories() {
        let mut t = PerformanceTracker::new();
        t.record(Category::SecureConfiguration, false);
        t.record(Category::Phishing, true);
        let seen: Vec<Category> = t.attempted().map(|(c, _)| c).collect();
        assert_eq!(seen, vec![Category::Phishing, Category::SecureConfiguration]);
    }

    #[test]
    fn validate_catches_impossible_scores() {
        let mut t = PerformanceTracker::new();
        assert!(t.validate().is_ok());
        t.scores.insert(
            Category::Malware,
            CategoryScore {
                correct: 3,
                total: 1,
            },
        );
        assert!(t.validate().is_err());

        let mut t = PerformanceTracker::new();
        t.scores.remove(&Category::Malware);
        assert!(t.validate().is_err());
    }

    #[test]
    fn recent_keeps_insertion_order() {
        let mut log = MistakeLog::new();
        for chapter in 1..=7 {
            log.push(mistake(chapter));
        }
        let chapters: Vec<u32> = log.recent(5).iter().map(|m| m.chapter).collect();
        assert_eq!(chapters, vec![3, 4, 5, 6, 7]);
        assert_eq!(log.recent(50).len(), 7);
        assert_eq!(log.len(), 7);
    }
}
