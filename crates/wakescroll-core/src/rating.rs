//! Onboarding quiz scoring.
//!
//! Pure functions behind the intake quiz: a fixed question catalog where
//! every choice carries a severity weight, a current lifestyle rating
//! derived from the answers, the potential rating the program promises, and
//! the share of answers flagging poor habits. No state lives here; answers
//! are passed in explicitly.

use serde::{Deserialize, Serialize};

/// Lowest value any rating field can take.
pub const RATING_MIN: u8 = 15;
/// Highest value any rating field can take.
pub const RATING_MAX: u8 = 48;

const OVERALL_CAP: u8 = 92;
const FOCUS_CAP: u8 = 90;
const SLEEP_CAP: u8 = 88;
const PRODUCTIVITY_CAP: u8 = 91;

/// Highest severity a quiz choice can carry.
pub const MAX_SEVERITY: u8 = 3;

/// A question in the intake quiz.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct QuizQuestion {
    pub id: &'static str,
    pub text: &'static str,
    pub choices: &'static [QuizChoice],
}

/// A choice option with its severity weight (0 harmless .. 3 severe).
#[derive(Debug, Clone, Copy, Serialize)]
pub struct QuizChoice {
    pub id: &'static str,
    pub text: &'static str,
    pub severity: u8,
}

const FREQUENCY_CHOICES: [QuizChoice; 4] = [
    QuizChoice { id: "rarely", text: "Rarely", severity: 0 },
    QuizChoice { id: "sometimes", text: "Sometimes", severity: 1 },
    QuizChoice { id: "often", text: "Often", severity: 2 },
    QuizChoice { id: "constantly", text: "Constantly", severity: 3 },
];

const QUESTIONS: [QuizQuestion; 6] = [
    QuizQuestion {
        id: "first_thing",
        text: "How often do you reach for your phone within minutes of waking up?",
        choices: &FREQUENCY_CHOICES,
    },
    QuizQuestion {
        id: "lost_time",
        text: "How often do you look up from scrolling and realize an hour has passed?",
        choices: &FREQUENCY_CHOICES,
    },
    QuizQuestion {
        id: "late_night",
        text: "How often does scrolling keep you up past your intended bedtime?",
        choices: &FREQUENCY_CHOICES,
    },
    QuizQuestion {
        id: "work_interrupt",
        text: "How often does your phone pull you out of focused work?",
        choices: &FREQUENCY_CHOICES,
    },
    QuizQuestion {
        id: "restless",
        text: "How often do you feel restless when your phone is out of reach?",
        choices: &FREQUENCY_CHOICES,
    },
    QuizQuestion {
        id: "autopilot",
        text: "How often do you open an app without deciding to?",
        choices: &FREQUENCY_CHOICES,
    },
];

/// The intake quiz question catalog.
pub fn questions() -> &'static [QuizQuestion] {
    &QUESTIONS
}

/// A lifestyle rating as shown after the quiz. Fields live in
/// `[RATING_MIN, RATING_MAX]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LifestyleRating {
    pub overall: u8,
    pub focus: u8,
    pub sleep: u8,
    pub productivity: u8,
}

/// The rating the program projects for a user who sticks with it. Each
/// field is at least the current field and at most its cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PotentialRating {
    pub overall: u8,
    pub focus: u8,
    pub sleep: u8,
    pub productivity: u8,
}

/// Mean severity of the answers, each clamped to `MAX_SEVERITY`.
fn mean_severity(answers: &[u8]) -> f64 {
    if answers.is_empty() {
        return 0.0;
    }
    let sum: u32 = answers
        .iter()
        .map(|&a| u32::from(a.min(MAX_SEVERITY)))
        .sum();
    f64::from(sum) / answers.len() as f64
}

fn scaled(base: f64, penalty_per_severity: f64, mean: f64) -> u8 {
    let value = (base - penalty_per_severity * mean).round();
    (value as i32).clamp(i32::from(RATING_MIN), i32::from(RATING_MAX)) as u8
}

/// Score the quiz answers into the current lifestyle rating.
///
/// `answers` holds one severity per answered question; values above
/// `MAX_SEVERITY` are clamped, extra or missing answers are tolerated. All
/// output fields are clamped to `[RATING_MIN, RATING_MAX]`.
pub fn calculate_rating(answers: &[u8]) -> LifestyleRating {
    let mean = mean_severity(answers);
    LifestyleRating {
        overall: scaled(48.0, 11.0, mean),
        focus: scaled(48.0, 12.0, mean),
        sleep: scaled(48.0, 13.0, mean),
        productivity: scaled(48.0, 10.0, mean),
    }
}

fn potential_field(current: u8, cap: u8) -> u8 {
    // Close four fifths of the gap to the cap, never regressing.
    let current = current.min(cap);
    let uplift = (f64::from(cap - current) * 0.8).round() as u8;
    (current + uplift).min(cap)
}

/// Project the potential rating from a current one.
pub fn calculate_potential_rating(current: &LifestyleRating) -> PotentialRating {
    PotentialRating {
        overall: potential_field(current.overall, OVERALL_CAP),
        focus: potential_field(current.focus, FOCUS_CAP),
        sleep: potential_field(current.sleep, SLEEP_CAP),
        productivity: potential_field(current.productivity, PRODUCTIVITY_CAP),
    }
}

/// Share of answers flagging a poor habit (severity 2 or above), as a
/// percentage in `[0, 100]`. Empty input scores 0.
pub fn poor_lifestyle_percentage(answers: &[u8]) -> u8 {
    if answers.is_empty() {
        return 0;
    }
    let poor = answers.iter().filter(|&&a| a >= 2).count();
    ((poor as f64 / answers.len() as f64) * 100.0).round() as u8
}
