//! Percentage, letter grade and pass/fail rules.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::rounding::{ratio_or_zero, round_whole};

/// The percentage at or above which a student passes.
pub const DEFAULT_PASS_PERCENTAGE: Decimal = Decimal::from_parts(35, 0, 0, false, 0);

/// Letter grade thresholds, highest first. The first band a percentage
/// reaches wins; anything below the last band is an F.
const GRADE_BANDS: [(Decimal, LetterGrade); 6] = [
    (Decimal::from_parts(90, 0, 0, false, 0), LetterGrade::APlus),
    (Decimal::from_parts(80, 0, 0, false, 0), LetterGrade::A),
    (Decimal::from_parts(70, 0, 0, false, 0), LetterGrade::BPlus),
    (Decimal::from_parts(60, 0, 0, false, 0), LetterGrade::B),
    (Decimal::from_parts(50, 0, 0, false, 0), LetterGrade::C),
    (Decimal::from_parts(35, 0, 0, false, 0), LetterGrade::D),
];

/// A letter grade, ordered from worst (`F`) to best (`A+`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum LetterGrade {
    /// Below 35%.
    F,
    /// 35% and above.
    D,
    /// 50% and above.
    C,
    /// 60% and above.
    B,
    /// 70% and above.
    #[serde(rename = "B+")]
    BPlus,
    /// 80% and above.
    A,
    /// 90% and above.
    #[serde(rename = "A+")]
    APlus,
}

impl LetterGrade {
    /// The grade as printed on a report, e.g. `"B+"`.
    pub fn as_str(&self) -> &'static str {
        match self {
            LetterGrade::APlus => "A+",
            LetterGrade::A => "A",
            LetterGrade::BPlus => "B+",
            LetterGrade::B => "B",
            LetterGrade::C => "C",
            LetterGrade::D => "D",
            LetterGrade::F => "F",
        }
    }
}

impl fmt::Display for LetterGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a percentage clears the pass mark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PassStatus {
    /// At or above the pass mark.
    Pass,
    /// Below the pass mark.
    Fail,
}

/// Computes `round(obtained / max * 100)`.
///
/// A zero `max` yields 0 rather than an error.
///
/// ```
/// use tuition_engine::calculation::percentage;
/// use rust_decimal::Decimal;
///
/// assert_eq!(percentage(Decimal::new(170, 0), Decimal::new(200, 0)), Decimal::new(85, 0));
/// assert_eq!(percentage(Decimal::new(5, 0), Decimal::ZERO), Decimal::ZERO);
/// ```
pub fn percentage(obtained: Decimal, max: Decimal) -> Decimal {
    round_whole(ratio_or_zero(obtained * Decimal::ONE_HUNDRED, max))
}

/// Maps a percentage to its letter grade.
///
/// Total over every value: anything above 100 is still `A+`, anything
/// below 35 (including negatives) is `F`.
///
/// ```
/// use tuition_engine::calculation::{grade, LetterGrade};
/// use rust_decimal::Decimal;
///
/// assert_eq!(grade(Decimal::new(85, 0)), LetterGrade::A);
/// assert_eq!(grade(Decimal::new(120, 0)), LetterGrade::APlus);
/// ```
pub fn grade(percentage: Decimal) -> LetterGrade {
    GRADE_BANDS
        .iter()
        .find(|(threshold, _)| percentage >= *threshold)
        .map(|(_, grade)| *grade)
        .unwrap_or(LetterGrade::F)
}

/// Pass/fail against the default 35% pass mark.
pub fn pass_status(percentage: Decimal) -> PassStatus {
    pass_status_with(percentage, DEFAULT_PASS_PERCENTAGE)
}

/// Pass/fail against an explicit pass mark.
pub fn pass_status_with(percentage: Decimal, passing_percentage: Decimal) -> PassStatus {
    if percentage >= passing_percentage {
        PassStatus::Pass
    } else {
        PassStatus::Fail
    }
}
