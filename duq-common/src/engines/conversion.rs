//! Unit conversion questions
//!
//! "Convert 250 kilobytes to megabytes" style questions. The answer comes
//! from a single direct [`units::convert`] call; the explanation walks the
//! ladder one rung at a time with each intermediate rounded for display.

use rand::rngs::StdRng;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, warn};

use super::{entropy_rng, pick, seeded_rng, MAX_SAMPLE_ATTEMPTS};
use crate::format::{format_number, round_for_explanation};
use crate::question::{ExplanationSection, QuestionCategory, QuizQuestion};
use crate::units::{self, Unit, BITS_PER_BYTE, DECIMAL_STEP};
use crate::Error;

/// Sampling ceiling when starting from bits or bytes (keeps ÷8 arithmetic easy)
const SMALL_UNIT_CEILING: u32 = 300;

/// Sampling ceiling for every other starting unit
const LARGE_UNIT_CEILING: u32 = 999;

/// Correct when |user - answer| is below this
pub const CONVERSION_TOLERANCE: f64 = 0.001;

/// How far apart the two units of a question may be
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    /// Neighbouring units only
    #[default]
    Basic,
    /// Up to three rungs apart
    Advanced,
}

impl Difficulty {
    pub fn max_steps(self) -> usize {
        match self {
            Difficulty::Basic => 1,
            Difficulty::Advanced => 3,
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Difficulty::Basic => f.write_str("basic"),
            Difficulty::Advanced => f.write_str("advanced"),
        }
    }
}

impl FromStr for Difficulty {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "basic" => Ok(Difficulty::Basic),
            "advanced" => Ok(Difficulty::Advanced),
            _ => Err(Error::InvalidInput(format!("Unknown difficulty: {:?}", s))),
        }
    }
}

/// A generated conversion question
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionQuestion {
    value: u32,
    from_unit: Unit,
    to_unit: Unit,
    answer: f64,
    explanation: Vec<ExplanationSection>,
}

impl ConversionQuestion {
    /// Build a question from explicit parameters
    pub fn new(value: u32, from_unit: Unit, to_unit: Unit) -> Self {
        let answer = units::convert(f64::from(value), from_unit, to_unit);
        let explanation = explain(f64::from(value), from_unit, to_unit);
        Self {
            value,
            from_unit,
            to_unit,
            answer,
            explanation,
        }
    }

    pub fn value(&self) -> u32 {
        self.value
    }

    pub fn from_unit(&self) -> Unit {
        self.from_unit
    }

    pub fn to_unit(&self) -> Unit {
        self.to_unit
    }

    pub fn steps(&self) -> usize {
        units::steps_between(self.from_unit, self.to_unit)
    }

    /// Units visited by the step-by-step explanation
    pub fn conversion_path(&self) -> Vec<Unit> {
        units::conversion_path(self.from_unit, self.to_unit)
    }
}

impl QuizQuestion for ConversionQuestion {
    fn category(&self) -> QuestionCategory {
        QuestionCategory::ConvertUnit
    }

    fn text(&self) -> String {
        format!(
            "Convert {} {} to {}",
            format_number(f64::from(self.value)),
            self.from_unit,
            self.to_unit
        )
    }

    fn hint(&self) -> &'static str {
        "Moving up a unit? Divide. Moving down? Multiply. 8 bits in a byte, 1,000 of everything else."
    }

    fn answer(&self) -> f64 {
        self.answer
    }

    fn explanation(&self) -> &[ExplanationSection] {
        &self.explanation
    }

    fn tolerance(&self) -> f64 {
        CONVERSION_TOLERANCE
    }
}

/// Worked explanation, one line per ladder rung
fn explain(value: f64, from: Unit, to: Unit) -> Vec<ExplanationSection> {
    let identify = ExplanationSection::new(
        "Identify the conversion",
        vec![
            format!("Starting value: {} {}", format_number(value), from),
            format!("Target unit: {}", to),
        ],
    );

    let mut steps = Vec::new();
    let mut working_unit = from;
    let mut working_value = value;

    while working_unit != to {
        let going_up = working_unit < to;
        let next = if going_up {
            working_unit.next_larger()
        } else {
            working_unit.next_smaller()
        };
        let Some(next) = next else { break };

        // The only ×8 rung is between bit and byte
        let crosses_bit = working_unit == Unit::Bit || next == Unit::Bit;
        let (factor, factor_label) = if crosses_bit {
            (BITS_PER_BYTE, "8")
        } else {
            (DECIMAL_STEP, "1,000")
        };
        let (result, operator) = if going_up {
            (working_value / factor, "÷")
        } else {
            (working_value * factor, "×")
        };
        let result = round_for_explanation(result);

        steps.push(format!(
            "Convert {value} {unit} to {next} → {value} {operator} {factor_label} = {result} {next}",
            value = format_number(working_value),
            unit = working_unit,
            next = next,
            operator = operator,
            factor_label = factor_label,
            result = format_number(result),
        ));

        working_value = result;
        working_unit = next;
    }

    vec![
        identify,
        ExplanationSection::new("Step-by-step conversion", steps),
    ]
}

/// One rejection-sampling draw: any unit but the largest, then any unit
fn sample_pair<R: Rng + ?Sized>(rng: &mut R) -> (Unit, Unit) {
    let from_choices = &Unit::ALL[..Unit::ALL.len() - 1];
    (pick(rng, from_choices), pick(rng, &Unit::ALL))
}

fn is_eligible(from: Unit, to: Unit, max_steps: usize) -> bool {
    from != to && units::steps_between(from, to) <= max_steps
}

/// Every pair the sampler could accept for a difficulty
pub fn eligible_pairs(difficulty: Difficulty) -> Vec<(Unit, Unit)> {
    let max_steps = difficulty.max_steps();
    let from_choices = &Unit::ALL[..Unit::ALL.len() - 1];
    from_choices
        .iter()
        .flat_map(|&from| Unit::ALL.iter().map(move |&to| (from, to)))
        .filter(|&(from, to)| is_eligible(from, to, max_steps))
        .collect()
}

/// Generates conversion questions
pub struct ConversionEngine<R = StdRng> {
    rng: R,
}

impl ConversionEngine<StdRng> {
    pub fn new() -> Self {
        Self::with_rng(entropy_rng())
    }

    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(seeded_rng(seed))
    }
}

impl Default for ConversionEngine<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> ConversionEngine<R> {
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }

    /// Random question whose units are at most `difficulty.max_steps()` apart
    pub fn generate_question(&mut self, difficulty: Difficulty) -> ConversionQuestion {
        let (from, to) = self.choose_units(difficulty);
        let steps = units::steps_between(from, to) as u32;

        let ceiling = match from {
            Unit::Bit | Unit::Byte => SMALL_UNIT_CEILING,
            _ => LARGE_UNIT_CEILING,
        };
        let max_value = (ceiling / steps).max(1);
        let mut value = self.rng.gen_range(1..=max_value);
        if from == Unit::Bit {
            // Whole bytes keep the ÷8 step exact
            value = value.div_ceil(8) * 8;
        }

        debug!(
            "Generated {} conversion: {} {} -> {}",
            difficulty, value, from, to
        );
        ConversionQuestion::new(value, from, to)
    }

    fn choose_units(&mut self, difficulty: Difficulty) -> (Unit, Unit) {
        let max_steps = difficulty.max_steps();
        for _ in 0..MAX_SAMPLE_ATTEMPTS {
            let (from, to) = sample_pair(&mut self.rng);
            if is_eligible(from, to, max_steps) {
                return (from, to);
            }
        }

        warn!(
            "No eligible unit pair after {} draws, picking from the eligible set",
            MAX_SAMPLE_ATTEMPTS
        );
        let pairs = eligible_pairs(difficulty);
        pick(&mut self.rng, &pairs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::mock::StepRng;

    #[test]
    fn test_basic_always_one_step() {
        let mut engine = ConversionEngine::seeded(1);
        for _ in 0..500 {
            let q = engine.generate_question(Difficulty::Basic);
            assert_eq!(q.steps(), 1, "{:?}", q);
        }
    }

    #[test]
    fn test_advanced_within_three_steps() {
        let mut engine = ConversionEngine::seeded(2);
        let mut saw_multi_step = false;
        for _ in 0..500 {
            let q = engine.generate_question(Difficulty::Advanced);
            assert!((1..=3).contains(&q.steps()), "{:?}", q);
            assert_ne!(q.from_unit(), Unit::Petabyte);
            saw_multi_step |= q.steps() > 1;
        }
        assert!(saw_multi_step);
    }

    #[test]
    fn test_value_bounds() {
        let mut engine = ConversionEngine::seeded(3);
        for _ in 0..500 {
            let q = engine.generate_question(Difficulty::Advanced);
            let ceiling = match q.from_unit() {
                Unit::Bit | Unit::Byte => SMALL_UNIT_CEILING,
                _ => LARGE_UNIT_CEILING,
            };
            let max = ceiling / q.steps() as u32;
            assert!(q.value() >= 1);
            if q.from_unit() == Unit::Bit {
                assert_eq!(q.value() % 8, 0);
                assert!(q.value() <= max.div_ceil(8) * 8);
            } else {
                assert!(q.value() <= max);
            }
        }
    }

    #[test]
    fn test_eligible_pairs_non_empty() {
        assert!(eligible_pairs(Difficulty::Basic).contains(&(Unit::Bit, Unit::Byte)));
        assert!(eligible_pairs(Difficulty::Advanced).len() > eligible_pairs(Difficulty::Basic).len());
        for (from, to) in eligible_pairs(Difficulty::Basic) {
            assert_eq!(units::steps_between(from, to), 1);
        }
    }

    #[test]
    fn test_degenerate_rng_falls_back() {
        // A constant generator keeps drawing (bit, bit), which is never eligible
        let mut engine = ConversionEngine::with_rng(StepRng::new(0, 0));
        let q = engine.generate_question(Difficulty::Basic);
        assert_eq!(q.steps(), 1);
    }

    #[test]
    fn test_answer_uses_direct_conversion() {
        let q = ConversionQuestion::new(500, Unit::Megabyte, Unit::Gigabyte);
        assert_eq!(q.answer(), 0.5);
        assert!(q.is_correct(0.5));
        assert!(q.is_correct(0.5009));
        assert!(!q.is_correct(0.502));
    }

    #[test]
    fn test_explanation_upwards_from_bits() {
        let q = ConversionQuestion::new(16, Unit::Bit, Unit::Kilobyte);
        let sections = q.explanation();
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].title, "Identify the conversion");
        assert_eq!(sections[0].details[0], "Starting value: 16 bits");
        assert_eq!(sections[0].details[1], "Target unit: kilobytes");
        assert_eq!(
            sections[1].details,
            vec![
                "Convert 16 bits to bytes → 16 ÷ 8 = 2 bytes".to_string(),
                "Convert 2 bytes to kilobytes → 2 ÷ 1,000 = 0.002 kilobytes".to_string(),
            ]
        );
    }

    #[test]
    fn test_explanation_downwards_to_bits() {
        let q = ConversionQuestion::new(3, Unit::Kilobyte, Unit::Bit);
        assert_eq!(
            q.explanation()[1].details,
            vec![
                "Convert 3 kilobytes to bytes → 3 × 1,000 = 3,000 bytes".to_string(),
                "Convert 3,000 bytes to bits → 3,000 × 8 = 24,000 bits".to_string(),
            ]
        );
        assert_eq!(q.answer(), 24_000.0);
    }

    #[test]
    fn test_explanation_steps_match_path() {
        let q = ConversionQuestion::new(250, Unit::Gigabyte, Unit::Kilobyte);
        assert_eq!(q.explanation()[1].details.len(), q.conversion_path().len() - 1);
    }

    #[test]
    fn test_text() {
        let q = ConversionQuestion::new(1500, Unit::Byte, Unit::Kilobyte);
        assert_eq!(q.text(), "Convert 1,500 bytes to kilobytes");
        assert_eq!(q.category(), QuestionCategory::ConvertUnit);
    }

    #[test]
    fn test_difficulty_parse() {
        assert_eq!("Basic".parse::<Difficulty>().unwrap(), Difficulty::Basic);
        assert_eq!("advanced".parse::<Difficulty>().unwrap(), Difficulty::Advanced);
        assert!("expert".parse::<Difficulty>().is_err());
    }
}
