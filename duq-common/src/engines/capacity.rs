//! Storage capacity questions
//!
//! Two shapes, chosen by coin flip:
//! - file count: how many files of a given size fit on a drive
//! - total size: how large a set of identical files is

use rand::rngs::StdRng;
use rand::Rng;
use std::fmt;
use tracing::debug;

use super::{entropy_rng, multiple_of, pick, seeded_rng};
use crate::format::format_number;
use crate::question::{ExplanationSection, QuestionCategory, QuizQuestion};
use crate::units::{Unit, DECIMAL_STEP};

/// Correct when |user - answer| is below this
pub const CAPACITY_TOLERANCE: f64 = 0.01;

/// A size paired with its unit, e.g. 2.5 megabytes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StorageSize {
    pub size: f64,
    pub unit: Unit,
}

impl StorageSize {
    pub const fn new(size: f64, unit: Unit) -> Self {
        Self { size, unit }
    }
}

impl fmt::Display for StorageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", format_number(self.size), self.unit)
    }
}

/// Drive sizes with easy arithmetic
pub const DRIVE_SIZES: [StorageSize; 9] = [
    StorageSize::new(500.0, Unit::Megabyte),
    StorageSize::new(1.0, Unit::Gigabyte),
    StorageSize::new(2.0, Unit::Gigabyte),
    StorageSize::new(4.0, Unit::Gigabyte),
    StorageSize::new(5.0, Unit::Gigabyte),
    StorageSize::new(10.0, Unit::Gigabyte),
    StorageSize::new(20.0, Unit::Gigabyte),
    StorageSize::new(50.0, Unit::Gigabyte),
    StorageSize::new(100.0, Unit::Gigabyte),
];

/// File sizes with easy arithmetic
pub const FILE_SIZES: [StorageSize; 12] = [
    StorageSize::new(1.0, Unit::Megabyte),
    StorageSize::new(2.0, Unit::Megabyte),
    StorageSize::new(2.5, Unit::Megabyte),
    StorageSize::new(5.0, Unit::Megabyte),
    StorageSize::new(10.0, Unit::Megabyte),
    StorageSize::new(20.0, Unit::Megabyte),
    StorageSize::new(25.0, Unit::Megabyte),
    StorageSize::new(50.0, Unit::Megabyte),
    StorageSize::new(100.0, Unit::Megabyte),
    StorageSize::new(200.0, Unit::Megabyte),
    StorageSize::new(250.0, Unit::Megabyte),
    StorageSize::new(500.0, Unit::Megabyte),
];

/// Power of 1000 for a unit, counting from bytes
///
/// Bits have no place on this ladder and are treated as bytes; neither
/// table above uses them.
fn decimal_exponent(unit: Unit) -> i32 {
    unit.ordinal().saturating_sub(1) as i32
}

/// Convert between byte-based units with powers of 1000
pub fn convert_decimal(value: f64, from: Unit, to: Unit) -> f64 {
    let difference = decimal_exponent(from) - decimal_exponent(to);
    if difference >= 0 {
        value * DECIMAL_STEP.powi(difference)
    } else {
        value / DECIMAL_STEP.powi(-difference)
    }
}

/// Parameters of one capacity question
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CapacityScenario {
    /// How many files fit on the drive
    FileCount {
        drive: StorageSize,
        file: StorageSize,
    },
    /// Total size of `file_count` files, in `target_unit`
    TotalSize {
        file: StorageSize,
        file_count: u32,
        target_unit: Unit,
    },
}

/// A generated capacity question
#[derive(Debug, Clone, PartialEq)]
pub struct CapacityQuestion {
    scenario: CapacityScenario,
    answer: f64,
    explanation: Vec<ExplanationSection>,
}

impl CapacityQuestion {
    pub fn file_count(drive: StorageSize, file: StorageSize) -> Self {
        let drive_in_file_units = convert_decimal(drive.size, drive.unit, file.unit);
        let answer = (drive_in_file_units / file.size).floor();

        let explanation = vec![
            ExplanationSection::new(
                format!("Convert drive size to {}", file.unit),
                vec![format!(
                    "{} = {} {}",
                    drive,
                    format_number(drive_in_file_units),
                    file.unit
                )],
            ),
            ExplanationSection::new(
                "Divide by file size to get number of files",
                vec![format!(
                    "{} {} ÷ {} = {} files",
                    format_number(drive_in_file_units),
                    file.unit,
                    file,
                    format_number(answer)
                )],
            ),
        ];

        Self {
            scenario: CapacityScenario::FileCount { drive, file },
            answer,
            explanation,
        }
    }

    pub fn total_size(file: StorageSize, file_count: u32, target_unit: Unit) -> Self {
        let total_in_file_units = f64::from(file_count) * file.size;
        let answer = convert_decimal(total_in_file_units, file.unit, target_unit);

        let explanation = vec![
            ExplanationSection::new(
                "Calculate the total size of all files",
                vec![format!(
                    "{} files × {} = {} {}",
                    file_count,
                    file,
                    format_number(total_in_file_units),
                    file.unit
                )],
            ),
            ExplanationSection::new(
                format!("Convert to {}", target_unit),
                vec![format!(
                    "{} {} = {} {}",
                    format_number(total_in_file_units),
                    file.unit,
                    format_number(answer),
                    target_unit
                )],
            ),
        ];

        Self {
            scenario: CapacityScenario::TotalSize {
                file,
                file_count,
                target_unit,
            },
            answer,
            explanation,
        }
    }

    pub fn scenario(&self) -> &CapacityScenario {
        &self.scenario
    }
}

impl QuizQuestion for CapacityQuestion {
    fn category(&self) -> QuestionCategory {
        QuestionCategory::CalculateCapacity
    }

    fn text(&self) -> String {
        match self.scenario {
            CapacityScenario::FileCount { drive, file } => format!(
                "A drive can hold {}. How many {} files can it store?",
                drive, file
            ),
            CapacityScenario::TotalSize {
                file,
                file_count,
                target_unit,
            } => format!(
                "What is the total size of {} files that are each {}? Give your answer in {}.",
                file_count, file, target_unit
            ),
        }
    }

    fn hint(&self) -> &'static str {
        match self.scenario {
            CapacityScenario::FileCount { .. } => {
                "💾 - convert the drive size into the file's unit, then divide by the file size"
            }
            CapacityScenario::TotalSize { .. } => {
                "🗂️ - multiply number of files × file size, then convert to the unit asked for"
            }
        }
    }

    fn answer(&self) -> f64 {
        self.answer
    }

    fn explanation(&self) -> &[ExplanationSection] {
        &self.explanation
    }

    fn tolerance(&self) -> f64 {
        CAPACITY_TOLERANCE
    }
}

/// Generates capacity questions
pub struct CapacityEngine<R = StdRng> {
    rng: R,
}

impl CapacityEngine<StdRng> {
    pub fn new() -> Self {
        Self::with_rng(entropy_rng())
    }

    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(seeded_rng(seed))
    }
}

impl Default for CapacityEngine<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> CapacityEngine<R> {
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }

    pub fn generate_question(&mut self) -> CapacityQuestion {
        let question = if self.rng.gen_bool(0.5) {
            self.generate_file_count()
        } else {
            self.generate_total_size()
        };
        debug!("Generated capacity question: {:?}", question.scenario());
        question
    }

    pub fn generate_file_count(&mut self) -> CapacityQuestion {
        let drive = pick(&mut self.rng, &DRIVE_SIZES);
        let file = pick(&mut self.rng, &FILE_SIZES);
        CapacityQuestion::file_count(drive, file)
    }

    pub fn generate_total_size(&mut self) -> CapacityQuestion {
        let file = pick(&mut self.rng, &FILE_SIZES);
        let file_count = multiple_of(&mut self.rng, 5, 10, 30);
        let target_unit = if self.rng.gen_bool(0.5) {
            Unit::Gigabyte
        } else {
            file.unit
        };
        CapacityQuestion::total_size(file, file_count, target_unit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_decimal() {
        assert_eq!(convert_decimal(1.0, Unit::Gigabyte, Unit::Megabyte), 1000.0);
        assert_eq!(convert_decimal(1000.0, Unit::Megabyte, Unit::Gigabyte), 1.0);
        assert_eq!(convert_decimal(2.0, Unit::Terabyte, Unit::Byte), 2e12);
        assert_eq!(convert_decimal(7.0, Unit::Megabyte, Unit::Megabyte), 7.0);
    }

    #[test]
    fn test_total_size_in_gigabytes() {
        let q = CapacityQuestion::total_size(
            StorageSize::new(100.0, Unit::Megabyte),
            10,
            Unit::Gigabyte,
        );
        assert_eq!(q.answer(), 1.0);
        assert_eq!(
            q.explanation()[0].details[0],
            "10 files × 100 megabytes = 1,000 megabytes"
        );
        assert_eq!(
            q.explanation()[1].details[0],
            "1,000 megabytes = 1 gigabytes"
        );
    }

    #[test]
    fn test_total_size_in_file_units() {
        let q = CapacityQuestion::total_size(
            StorageSize::new(2.5, Unit::Megabyte),
            25,
            Unit::Megabyte,
        );
        assert_eq!(q.answer(), 62.5);
    }

    #[test]
    fn test_file_count_floors() {
        let q = CapacityQuestion::file_count(
            StorageSize::new(1.0, Unit::Gigabyte),
            StorageSize::new(250.0, Unit::Megabyte),
        );
        assert_eq!(q.answer(), 4.0);

        let q = CapacityQuestion::file_count(
            StorageSize::new(500.0, Unit::Megabyte),
            StorageSize::new(200.0, Unit::Megabyte),
        );
        assert_eq!(q.answer(), 2.0);
        assert_eq!(
            q.explanation()[1].details[0],
            "500 megabytes ÷ 200 megabytes = 2 files"
        );
    }

    #[test]
    fn test_file_count_fractional_file_size() {
        let q = CapacityQuestion::file_count(
            StorageSize::new(2.0, Unit::Gigabyte),
            StorageSize::new(2.5, Unit::Megabyte),
        );
        assert_eq!(q.answer(), 800.0);
        assert!(q.text().contains("2.5 megabytes"));
    }

    #[test]
    fn test_generated_values_come_from_tables() {
        let mut engine = CapacityEngine::seeded(21);
        let mut saw_count = false;
        let mut saw_total = false;
        for _ in 0..300 {
            match *engine.generate_question().scenario() {
                CapacityScenario::FileCount { drive, file } => {
                    saw_count = true;
                    assert!(DRIVE_SIZES.contains(&drive));
                    assert!(FILE_SIZES.contains(&file));
                }
                CapacityScenario::TotalSize {
                    file,
                    file_count,
                    target_unit,
                } => {
                    saw_total = true;
                    assert!(FILE_SIZES.contains(&file));
                    assert!((10..=30).contains(&file_count));
                    assert_eq!(file_count % 5, 0);
                    assert!(target_unit == Unit::Gigabyte || target_unit == file.unit);
                }
            }
        }
        assert!(saw_count && saw_total);
    }

    #[test]
    fn test_category() {
        let mut engine = CapacityEngine::seeded(1);
        assert_eq!(
            engine.generate_question().category(),
            QuestionCategory::CalculateCapacity
        );
    }
}
