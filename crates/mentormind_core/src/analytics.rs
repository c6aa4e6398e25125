//! crates/mentormind_core/src/analytics.rs
//!
//! The analytics aggregator: pure functions that fold the raw analytics
//! bundle into the derived progress / performance / recommendation metrics
//! shown on the dashboard. No side effects; identical inputs always produce
//! identical outputs.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::domain::{AnalyticsBundle, UserProfile};

/// Quiz scores at or above this mark no longer flag their topic as weak.
const WEAK_AREA_THRESHOLD: f64 = 70.0;
/// At most this many weak areas and next-topic suggestions are reported.
const MAX_WEAK_AREAS: usize = 3;
const MAX_NEXT_TOPICS: usize = 3;
/// How many trailing confidence samples feed the growth series.
const CONFIDENCE_WINDOW: usize = 3;
/// How many trailing quiz scores feed the trend series.
const QUIZ_SCORE_WINDOW: usize = 5;

//=========================================================================================
// Inputs and Outputs
//=========================================================================================

/// The trailing period over which derived metrics are computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeWindow {
    Week,
    Month,
    All,
}

impl TimeWindow {
    /// The cutoff instant for this window. Records strictly after the cutoff
    /// are in the window; a record exactly at the cutoff is excluded.
    pub fn cutoff(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        match self {
            TimeWindow::Week => now - Duration::days(7),
            TimeWindow::Month => now - Duration::days(30),
            TimeWindow::All => DateTime::UNIX_EPOCH,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LearningPace {
    Slow,
    Moderate,
    Fast,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Progress {
    pub topics_completed: usize,
    /// Minutes, floored.
    pub total_time_spent: i64,
    pub confidence_growth: Vec<u8>,
    pub sessions_completed: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Performance {
    pub quiz_scores: Vec<f64>,
    pub average_score: i64,
    pub weak_areas: Vec<String>,
    pub learning_pace: LearningPace,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendations {
    pub next_topics: Vec<String>,
    pub study_schedule: Vec<String>,
    pub resources: Vec<String>,
    pub improvement_areas: Vec<String>,
}

/// The derived metrics for one learner over one time window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsReport {
    pub progress: Progress,
    pub performance: Performance,
    pub recommendations: Recommendations,
}

//=========================================================================================
// Aggregation
//=========================================================================================

/// Folds the raw bundle into derived metrics for the given window.
///
/// Two deliberate asymmetries, carried over from the product's dashboard:
/// windowed topic counts measure session topic diversity rather than the
/// cumulative distinct-topics set, and learning pace always reflects the
/// trailing 7 days of real behavior regardless of the selected window.
pub fn compute_analytics(
    bundle: &AnalyticsBundle,
    profile: &UserProfile,
    window: TimeWindow,
    now: DateTime<Utc>,
) -> AnalyticsReport {
    let cutoff = window.cutoff(now);

    let window_sessions: Vec<_> = bundle
        .sessions
        .iter()
        .filter(|s| s.start_time > cutoff)
        .collect();
    let window_quizzes: Vec<_> = bundle
        .quiz_results
        .iter()
        .filter(|q| q.timestamp > cutoff)
        .collect();

    let topics_completed = match window {
        TimeWindow::All => bundle.topics_studied.len(),
        _ => window_sessions
            .iter()
            .map(|s| s.topic.as_str())
            .collect::<HashSet<_>>()
            .len(),
    };

    let total_seconds: i64 = window_sessions.iter().map(|s| s.duration).sum();

    // Confidence growth ignores the window; an empty history falls back to
    // the profile's stated confidence.
    let recent_confidence: Vec<u8> = bundle
        .confidence_levels
        .iter()
        .rev()
        .take(CONFIDENCE_WINDOW)
        .rev()
        .map(|c| c.level)
        .collect();
    let confidence_growth = if recent_confidence.is_empty() {
        vec![profile.confidence]
    } else {
        recent_confidence
    };

    let quiz_scores: Vec<f64> = window_quizzes
        .iter()
        .rev()
        .take(QUIZ_SCORE_WINDOW)
        .rev()
        .map(|q| q.score)
        .collect();
    let average_score = if quiz_scores.is_empty() {
        0
    } else {
        (quiz_scores.iter().sum::<f64>() / quiz_scores.len() as f64).round() as i64
    };

    let mut weak_areas: Vec<String> = Vec::new();
    for quiz in &window_quizzes {
        if weak_areas.len() == MAX_WEAK_AREAS {
            break;
        }
        if quiz.score < WEAK_AREA_THRESHOLD && !weak_areas.contains(&quiz.topic) {
            weak_areas.push(quiz.topic.clone());
        }
    }

    // Pace is computed over all-time sessions in the trailing 7 days,
    // not the display window.
    let week_ago = now - Duration::days(7);
    let sessions_last_week = bundle
        .sessions
        .iter()
        .filter(|s| s.start_time > week_ago)
        .count();
    let learning_pace = if sessions_last_week >= 5 {
        LearningPace::Fast
    } else if sessions_last_week >= 2 {
        LearningPace::Moderate
    } else {
        LearningPace::Slow
    };

    let recommendations = build_recommendations(bundle, profile, average_score, &weak_areas);

    AnalyticsReport {
        progress: Progress {
            topics_completed,
            total_time_spent: total_seconds / 60,
            confidence_growth,
            sessions_completed: window_sessions.len(),
        },
        performance: Performance {
            quiz_scores,
            average_score,
            weak_areas,
            learning_pace,
        },
        recommendations,
    }
}

fn build_recommendations(
    bundle: &AnalyticsBundle,
    profile: &UserProfile,
    average_score: i64,
    weak_areas: &[String],
) -> Recommendations {
    let candidates = [
        format!("{} - Advanced Concepts", profile.topic),
        "Practical Applications".to_string(),
        "Real-world Case Studies".to_string(),
        "Problem Solving Techniques".to_string(),
    ];
    let next_topics: Vec<String> = candidates
        .into_iter()
        .filter(|t| !bundle.topics_studied.contains(t))
        .take(MAX_NEXT_TOPICS)
        .collect();

    let study_schedule = vec![
        format!(
            "Study {} for {} daily",
            profile.topic, profile.session_length
        ),
        format!("Practice {} times per week", profile.study_frequency),
        if average_score < 70 {
            "Focus on foundational concepts".to_string()
        } else {
            "Challenge yourself with harder topics".to_string()
        },
        "Take regular quizzes to track progress".to_string(),
    ];

    let resources = vec![
        "AI-generated quizzes".to_string(),
        "Step-by-step explanations".to_string(),
        "Interactive chat learning".to_string(),
        "Progress tracking".to_string(),
    ];

    let improvement_areas = if weak_areas.is_empty() {
        vec![
            "Keep up the great work!".to_string(),
            "Try more challenging quizzes".to_string(),
            "Explore advanced topics".to_string(),
        ]
    } else {
        weak_areas
            .iter()
            .map(|area| format!("Review and practice: {area}"))
            .collect()
    };

    Recommendations {
        next_topics,
        study_schedule,
        resources,
        improvement_areas,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ConfidenceSample, Difficulty, LearningSession, QuizResult};
    use crate::test_support::sample_profile;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 7, 15, 12, 0, 0).unwrap()
    }

    fn session(start: DateTime<Utc>, topic: &str, duration: i64) -> LearningSession {
        LearningSession {
            start_time: start,
            end_time: start + Duration::seconds(duration),
            duration,
            topic: topic.to_string(),
            messages_count: 1,
            confidence_before: 2,
            confidence_after: 3,
        }
    }

    fn quiz(ts: DateTime<Utc>, topic: &str, score: f64) -> QuizResult {
        QuizResult {
            topic: topic.to_string(),
            score,
            total_questions: 5,
            correct_answers: 3,
            timestamp: ts,
            difficulty: Difficulty::Beginner,
        }
    }

    #[test]
    fn identical_inputs_produce_identical_reports() {
        let mut bundle = AnalyticsBundle::empty(now());
        bundle.sessions.push(session(now() - Duration::days(1), "Algebra", 600));
        bundle.quiz_results.push(quiz(now() - Duration::days(2), "Algebra", 85.0));
        bundle.record_topic("Algebra");
        let profile = sample_profile("Algebra", 3);

        let first = compute_analytics(&bundle, &profile, TimeWindow::Week, now());
        let second = compute_analytics(&bundle, &profile, TimeWindow::Week, now());
        assert_eq!(first, second);
    }

    #[test]
    fn record_exactly_at_cutoff_is_excluded() {
        let cutoff = TimeWindow::Week.cutoff(now());
        let mut bundle = AnalyticsBundle::empty(now());
        bundle.sessions.push(session(cutoff, "Algebra", 600));
        bundle.sessions.push(session(cutoff + Duration::seconds(1), "Algebra", 600));
        let profile = sample_profile("Algebra", 3);

        let report = compute_analytics(&bundle, &profile, TimeWindow::Week, now());
        assert_eq!(report.progress.sessions_completed, 1);
        assert_eq!(report.progress.total_time_spent, 10);
    }

    #[test]
    fn average_score_and_weak_areas_scenario() {
        let mut bundle = AnalyticsBundle::empty(now());
        bundle.quiz_results.push(quiz(now() - Duration::days(3), "Physics", 60.0));
        bundle.quiz_results.push(quiz(now() - Duration::days(2), "Physics", 90.0));
        bundle.quiz_results.push(quiz(now() - Duration::days(1), "Math", 50.0));
        let profile = sample_profile("Physics", 3);

        let report = compute_analytics(&bundle, &profile, TimeWindow::Week, now());
        assert_eq!(report.performance.average_score, 67);
        assert_eq!(report.performance.weak_areas, vec!["Physics", "Math"]);
    }

    #[test]
    fn score_at_threshold_is_not_weak() {
        let mut bundle = AnalyticsBundle::empty(now());
        bundle.quiz_results.push(quiz(now() - Duration::days(1), "Math", 70.0));
        let profile = sample_profile("Math", 3);

        let report = compute_analytics(&bundle, &profile, TimeWindow::Week, now());
        assert!(report.performance.weak_areas.is_empty());
        assert_eq!(
            report.recommendations.improvement_areas,
            vec![
                "Keep up the great work!",
                "Try more challenging quizzes",
                "Explore advanced topics"
            ]
        );
    }

    #[test]
    fn weak_areas_cap_at_three_in_first_occurrence_order() {
        let mut bundle = AnalyticsBundle::empty(now());
        for (i, topic) in ["A", "B", "C", "D"].iter().enumerate() {
            bundle
                .quiz_results
                .push(quiz(now() - Duration::hours(10 - i as i64), topic, 40.0));
        }
        let profile = sample_profile("A", 3);

        let report = compute_analytics(&bundle, &profile, TimeWindow::Week, now());
        assert_eq!(report.performance.weak_areas, vec!["A", "B", "C"]);
    }

    #[test]
    fn learning_pace_thresholds() {
        let profile = sample_profile("Algebra", 3);
        for (count, expected) in [
            (0, LearningPace::Slow),
            (3, LearningPace::Moderate),
            (6, LearningPace::Fast),
        ] {
            let mut bundle = AnalyticsBundle::empty(now());
            for i in 0..count {
                bundle
                    .sessions
                    .push(session(now() - Duration::hours(i + 1), "Algebra", 60));
            }
            let report = compute_analytics(&bundle, &profile, TimeWindow::All, now());
            assert_eq!(report.performance.learning_pace, expected);
        }
    }

    #[test]
    fn pace_ignores_the_display_window() {
        let mut bundle = AnalyticsBundle::empty(now());
        for i in 0..6 {
            bundle
                .sessions
                .push(session(now() - Duration::days(i + 10), "Algebra", 60));
        }
        let profile = sample_profile("Algebra", 3);

        let report = compute_analytics(&bundle, &profile, TimeWindow::Month, now());
        // The month window sees all six sessions, but none fall in the
        // trailing 7 days, so pace stays slow.
        assert_eq!(report.progress.sessions_completed, 6);
        assert_eq!(report.performance.learning_pace, LearningPace::Slow);
    }

    #[test]
    fn windowed_topic_count_diverges_from_all_time_set() {
        let mut bundle = AnalyticsBundle::empty(now());
        bundle.sessions.push(session(now() - Duration::days(60), "Algebra", 60));
        bundle.sessions.push(session(now() - Duration::days(1), "Physics", 60));
        bundle.sessions.push(session(now() - Duration::days(2), "Physics", 60));
        bundle.record_topic("Algebra");
        bundle.record_topic("Physics");
        let profile = sample_profile("Algebra", 3);

        let week = compute_analytics(&bundle, &profile, TimeWindow::Week, now());
        assert_eq!(week.progress.topics_completed, 1);

        let all = compute_analytics(&bundle, &profile, TimeWindow::All, now());
        assert_eq!(all.progress.topics_completed, 2);
    }

    #[test]
    fn confidence_growth_takes_last_three_samples_unwindowed() {
        let mut bundle = AnalyticsBundle::empty(now());
        for (i, level) in [1u8, 2, 3, 4, 5].iter().enumerate() {
            bundle.confidence_levels.push(ConfidenceSample {
                timestamp: now() - Duration::days(100 - i as i64),
                level: *level,
                topic: "Algebra".into(),
            });
        }
        let profile = sample_profile("Algebra", 3);

        let report = compute_analytics(&bundle, &profile, TimeWindow::Week, now());
        assert_eq!(report.progress.confidence_growth, vec![3, 4, 5]);
    }

    #[test]
    fn confidence_growth_falls_back_to_profile_value() {
        let bundle = AnalyticsBundle::empty(now());
        let profile = sample_profile("Algebra", 4);

        let report = compute_analytics(&bundle, &profile, TimeWindow::Week, now());
        assert_eq!(report.progress.confidence_growth, vec![4]);
    }

    #[test]
    fn quiz_scores_are_last_five_in_chronological_order() {
        let mut bundle = AnalyticsBundle::empty(now());
        for i in 0..7 {
            bundle
                .quiz_results
                .push(quiz(now() - Duration::hours(12 - i), "Algebra", 50.0 + i as f64));
        }
        let profile = sample_profile("Algebra", 3);

        let report = compute_analytics(&bundle, &profile, TimeWindow::Week, now());
        assert_eq!(report.performance.quiz_scores, vec![52.0, 53.0, 54.0, 55.0, 56.0]);
    }

    #[test]
    fn no_quizzes_yields_zero_average_and_empty_trend() {
        let bundle = AnalyticsBundle::empty(now());
        let profile = sample_profile("Algebra", 3);

        let report = compute_analytics(&bundle, &profile, TimeWindow::Month, now());
        assert!(report.performance.quiz_scores.is_empty());
        assert_eq!(report.performance.average_score, 0);
    }

    #[test]
    fn next_topics_exclude_already_studied_candidates() {
        let mut bundle = AnalyticsBundle::empty(now());
        bundle.record_topic("Practical Applications");
        let profile = sample_profile("Rust", 3);

        let report = compute_analytics(&bundle, &profile, TimeWindow::All, now());
        assert_eq!(
            report.recommendations.next_topics,
            vec![
                "Rust - Advanced Concepts",
                "Real-world Case Studies",
                "Problem Solving Techniques"
            ]
        );
    }

    #[test]
    fn study_schedule_branches_on_average_score() {
        let profile = sample_profile("Rust", 3);

        let mut low = AnalyticsBundle::empty(now());
        low.quiz_results.push(quiz(now() - Duration::days(1), "Rust", 40.0));
        let report = compute_analytics(&low, &profile, TimeWindow::Week, now());
        assert!(report
            .recommendations
            .study_schedule
            .contains(&"Focus on foundational concepts".to_string()));

        let mut high = AnalyticsBundle::empty(now());
        high.quiz_results.push(quiz(now() - Duration::days(1), "Rust", 95.0));
        let report = compute_analytics(&high, &profile, TimeWindow::Week, now());
        assert!(report
            .recommendations
            .study_schedule
            .contains(&"Challenge yourself with harder topics".to_string()));
    }

    #[test]
    fn schedule_is_parameterized_by_profile() {
        let bundle = AnalyticsBundle::empty(now());
        let profile = sample_profile("Calculus", 3);

        let report = compute_analytics(&bundle, &profile, TimeWindow::All, now());
        assert_eq!(
            report.recommendations.study_schedule[0],
            "Study Calculus for 15-30min daily"
        );
        assert_eq!(
            report.recommendations.study_schedule[1],
            "Practice 3 times per week"
        );
    }
}
