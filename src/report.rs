//! End-of-run performance report.

use chrono::NaiveDate;

use crate::content::{Category, Role};
use crate::game::progress::ProgressState;
use crate::game::rules::{MISTAKE_REVIEW_SIZE, RECOMMENDATION_THRESHOLD};
use crate::game::tracker::{MistakeLog, PerformanceTracker};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Band {
    Good,
    Warning,
    Danger,
}

impl Band {
    fn for_overall(percent: u32) -> Self {
        if percent >= 80 {
            Band::Good
        } else if percent >= 60 {
            Band::Warning
        } else {
            Band::Danger
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryStatus {
    Poor,
    NeedsWork,
    Good,
    Excellent,
}

impl CategoryStatus {
    pub fn from_percent(percent: u32) -> Self {
        match percent {
            0..=49 => CategoryStatus::Poor,
            50..=69 => CategoryStatus::NeedsWork,
            70..=89 => CategoryStatus::Good,
            _ => CategoryStatus::Excellent,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            CategoryStatus::Poor => "poor",
            CategoryStatus::NeedsWork => "needs-work",
            CategoryStatus::Good => "good",
            CategoryStatus::Excellent => "excellent",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryLine {
    pub category: Category,
    pub correct: u32,
    pub total: u32,
    pub percent: u32,
    pub status: CategoryStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recommendation {
    pub category: Option<Category>,
    pub title: &'static str,
    pub advice: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MistakeLine {
    pub label: &'static str,
    pub lesson: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub generated: NaiveDate,
    pub player_name: String,
    pub role: Role,
    pub accuracy: u32,
    pub band: Band,
    pub total_correct: u32,
    pub total_questions: u32,
    pub chapters: u32,
    pub reputation: i64,
    pub categories: Vec<CategoryLine>,
    pub recommendations: Vec<Recommendation>,
    pub mistakes: Vec<MistakeLine>,
    pub summary: String,
}

const CHECKLIST: [(Category, &str, &str); 5] = [
    (
        Category::Phishing,
        "Email Verification",
        "Always verify sender addresses and be suspicious of urgency tactics.",
    ),
    (
        Category::SocialEngineering,
        "Verify Requests",
        "Never bypass verification procedures regardless of urgency claims.",
    ),
    (
        Category::PasswordSecurity,
        "Credential Protection",
        "Never share passwords. Use a password manager and enable MFA.",
    ),
    (
        Category::DataProtection,
        "Data Handling",
        "Verify data sharing procedures before sending information externally.",
    ),
    (
        Category::IncidentResponse,
        "Incident Response",
        "Report suspicious activity immediately. Prioritize containment.",
    ),
];

const STAY_VIGILANT: Recommendation = Recommendation {
    category: None,
    title: "Stay Vigilant",
    advice: "Great job! Continue questioning unexpected requests and reporting suspicious activity.",
};

fn percent(correct: u32, total: u32) -> u32 {
    if total == 0 {
        return 0;
    }
    (correct as f64 / total as f64 * 100.0).round() as u32
}

impl Report {
    pub fn generate(
        progress: &ProgressState,
        tracker: &PerformanceTracker,
        mistakes: &MistakeLog,
        generated: NaiveDate,
    ) -> Report {
        let (total_correct, total_questions) = tracker.totals();
        let accuracy = percent(total_correct, total_questions);

        let categories = tracker
            .attempted()
            .map(|(category, score)| {
                let pct = percent(score.correct, score.total);
                CategoryLine {
                    category,
                    correct: score.correct,
                    total: score.total,
                    percent: pct,
                    status: CategoryStatus::from_percent(pct),
                }
            })
            .collect();

        Report {
            generated,
            player_name: progress.player_name.clone(),
            role: progress.role,
            accuracy,
            band: Band::for_overall(accuracy),
            total_correct,
            total_questions,
            chapters: progress.current_chapter,
            reputation: progress.reputation,
            categories,
            recommendations: recommendations(tracker),
            mistakes: mistakes
                .recent(MISTAKE_REVIEW_SIZE)
                .iter()
                .map(|m| MistakeLine {
                    label: m.category.label(),
                    lesson: m.lesson.clone(),
                })
                .collect(),
            summary: summary(progress.role, accuracy),
        }
    }
}

pub fn recommendations(tracker: &PerformanceTracker) -> Vec<Recommendation> {
    let mut recs: Vec<Recommendation> = CHECKLIST
        .iter()
        .filter(|(category, _, _)| {
            tracker
                .accuracy(*category)
                .is_some_and(|a| a < RECOMMENDATION_THRESHOLD)
        })
        .map(|&(category, title, advice)| Recommendation {
            category: Some(category),
            title,
            advice,
        })
        .collect();

    if recs.is_empty() {
        recs.push(STAY_VIGILANT);
    }
    recs
}

pub fn summary(role: Role, accuracy: u32) -> String {
    let verdict = if accuracy >= 80 {
        "your performance demonstrates strong security awareness. Keep it up!"
    } else if accuracy >= 60 {
        "you have a good foundation but should review the areas identified above."
    } else {
        "we recommend additional training, particularly in the weak areas listed."
    };
    format!("As a {}, {}", role.name(), verdict)
}
