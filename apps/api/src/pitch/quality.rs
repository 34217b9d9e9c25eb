//! Quality gate: a fixed-weight checklist over the idea and the generated pack.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QualityLabel {
    Strong,
    Decent,
    #[serde(rename = "Needs work")]
    NeedsWork,
}

impl QualityLabel {
    pub fn from_score(score: u32) -> Self {
        match score {
            s if s >= 80 => QualityLabel::Strong,
            s if s >= 60 => QualityLabel::Decent,
            _ => QualityLabel::NeedsWork,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualityReport {
    /// 0 – 100
    pub score: u32,
    pub label: QualityLabel,
    /// One entry per failed check.
    pub reasons: Vec<String>,
}

/// What the gate looks at. `genre`/`tone` are what the caller supplied, before defaults.
pub struct QualityInput<'a> {
    pub title: &'a str,
    pub logline: &'a str,
    pub genre: Option<&'a str>,
    pub tone: Option<&'a str>,
    pub beat_count: usize,
    pub synopsis: &'a str,
}

struct Check {
    points: u32,
    passed: bool,
    reason: &'static str,
}

pub fn assess(input: &QualityInput<'_>) -> QualityReport {
    let checks = [
        Check {
            points: 20,
            passed: input.title.chars().count() >= 3,
            reason: "Title too short",
        },
        Check {
            points: 25,
            passed: word_count(input.logline) >= 10,
            reason: "Logline needs more detail (>=10 words)",
        },
        Check {
            points: 15,
            passed: supplied(input.genre),
            reason: "No genre provided",
        },
        Check {
            points: 10,
            passed: supplied(input.tone),
            reason: "No tone provided",
        },
        Check {
            points: 15,
            passed: input.beat_count >= 3,
            reason: "Beat sheet should have at least 3 beats",
        },
        Check {
            points: 15,
            passed: word_count(input.synopsis) >= 60,
            reason: "Synopsis is very short",
        },
    ];

    let score = checks.iter().filter(|c| c.passed).map(|c| c.points).sum();
    let reasons = checks
        .iter()
        .filter(|c| !c.passed)
        .map(|c| c.reason.to_string())
        .collect();

    QualityReport {
        score,
        label: QualityLabel::from_score(score),
        reasons,
    }
}

fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

fn supplied(value: Option<&str>) -> bool {
    value.is_some_and(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(n: usize) -> String {
        vec!["word"; n].join(" ")
    }

    #[test]
    fn test_all_checks_pass() {
        let logline = words(10);
        let synopsis = words(60);
        let report = assess(&QualityInput {
            title: "Dhuaan",
            logline: &logline,
            genre: Some("Thriller"),
            tone: Some("Gritty"),
            beat_count: 10,
            synopsis: &synopsis,
        });
        assert_eq!(report.score, 100);
        assert_eq!(report.label, QualityLabel::Strong);
        assert!(report.reasons.is_empty());
    }

    #[test]
    fn test_missing_genre_and_tone_is_decent() {
        let logline = words(12);
        let synopsis = words(80);
        let report = assess(&QualityInput {
            title: "Dhuaan",
            logline: &logline,
            genre: None,
            tone: Some("  "),
            beat_count: 10,
            synopsis: &synopsis,
        });
        // 20 + 25 + 15 + 15
        assert_eq!(report.score, 75);
        assert_eq!(report.label, QualityLabel::Decent);
        assert_eq!(report.reasons, vec!["No genre provided", "No tone provided"]);
    }

    #[test]
    fn test_thin_idea_needs_work() {
        let report = assess(&QualityInput {
            title: "Go",
            logline: "Short logline here",
            genre: Some("Drama"),
            tone: None,
            beat_count: 2,
            synopsis: "Too short.",
        });
        assert_eq!(report.score, 15);
        assert_eq!(report.label, QualityLabel::NeedsWork);
        assert_eq!(report.reasons.len(), 5);
    }

    #[test]
    fn test_label_thresholds() {
        assert_eq!(QualityLabel::from_score(80), QualityLabel::Strong);
        assert_eq!(QualityLabel::from_score(79), QualityLabel::Decent);
        assert_eq!(QualityLabel::from_score(60), QualityLabel::Decent);
        assert_eq!(QualityLabel::from_score(59), QualityLabel::NeedsWork);
    }

    #[test]
    fn test_needs_work_serializes_with_space() {
        let json = serde_json::to_string(&QualityLabel::NeedsWork).unwrap();
        assert_eq!(json, r#""Needs work""#);
    }
}
