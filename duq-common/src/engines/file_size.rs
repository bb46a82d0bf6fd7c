//! File size questions
//!
//! Five sub-types:
//! - image: width × height × colour depth
//! - sound: sample rate × duration × bit depth
//! - text: characters × 8 bits (ASCII)
//! - options: how many values n bits can represent (2^n)
//! - bits from options: minimum bits for n values (⌈log2 n⌉)

use rand::rngs::StdRng;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

use super::{entropy_rng, multiple_of, pick, seeded_rng};
use crate::format::format_number;
use crate::question::{ExplanationSection, QuestionCategory, QuizQuestion};
use crate::units::{self, Unit};

/// Correct when |user - answer| is below this
pub const FILE_SIZE_TOLERANCE: f64 = 0.01;

const COLOUR_DEPTHS: [u32; 7] = [1, 2, 3, 4, 5, 6, 8];
const IMAGE_TARGETS: [Unit; 2] = [Unit::Bit, Unit::Byte];
const SAMPLE_RATES: [u32; 4] = [20, 40, 60, 80];
const BIT_DEPTHS: [u32; 3] = [2, 4, 8];
const SOUND_TARGETS: [Unit; 2] = [Unit::Byte, Unit::Kilobyte];
const TEXT_TARGETS: [Unit; 2] = [Unit::Byte, Unit::Kilobyte];

/// ASCII
pub const BITS_PER_CHAR: u32 = 8;

/// File size sub-type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FileSizeKind {
    Image,
    Sound,
    Text,
    Options,
    BitsFromOptions,
}

impl FileSizeKind {
    pub fn all_variants() -> &'static [FileSizeKind] {
        &[
            FileSizeKind::Image,
            FileSizeKind::Sound,
            FileSizeKind::Text,
            FileSizeKind::Options,
            FileSizeKind::BitsFromOptions,
        ]
    }

    /// Formula reminder for this sub-type
    pub fn hint(&self) -> &'static str {
        match self {
            FileSizeKind::Image => "📷 - colour depth * image height (px) * image width (px)",
            FileSizeKind::Sound => "🔊 - sample rate (Hz) * duration (s) * bit depth",
            FileSizeKind::Text => "🔤 - number of characters * bits per character (8 for ASCII)",
            FileSizeKind::Options => "Number of options? 2 to the power of the number of bits",
            FileSizeKind::BitsFromOptions => {
                "Bits needed for options? Log2(number of options) and round up"
            }
        }
    }
}

impl fmt::Display for FileSizeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FileSizeKind::Image => "image",
            FileSizeKind::Sound => "sound",
            FileSizeKind::Text => "text",
            FileSizeKind::Options => "options",
            FileSizeKind::BitsFromOptions => "bitsFromOptions",
        };
        f.write_str(name)
    }
}

/// Parameters of one file size question
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileSizeScenario {
    Image {
        width: u32,
        height: u32,
        colour_depth: u32,
        target_unit: Unit,
    },
    Sound {
        sample_rate: u32,
        duration: u32,
        bit_depth: u32,
        target_unit: Unit,
    },
    Text {
        char_count: u32,
        target_unit: Unit,
    },
    Options {
        num_of_bits: u32,
    },
    BitsFromOptions {
        number_of_options: u32,
    },
}

impl FileSizeScenario {
    pub fn kind(&self) -> FileSizeKind {
        match self {
            FileSizeScenario::Image { .. } => FileSizeKind::Image,
            FileSizeScenario::Sound { .. } => FileSizeKind::Sound,
            FileSizeScenario::Text { .. } => FileSizeKind::Text,
            FileSizeScenario::Options { .. } => FileSizeKind::Options,
            FileSizeScenario::BitsFromOptions { .. } => FileSizeKind::BitsFromOptions,
        }
    }

    /// Unit the answer is expressed in
    ///
    /// Options questions count values rather than storage, so they have none.
    pub fn target_unit(&self) -> Option<Unit> {
        match *self {
            FileSizeScenario::Image { target_unit, .. }
            | FileSizeScenario::Sound { target_unit, .. }
            | FileSizeScenario::Text { target_unit, .. } => Some(target_unit),
            FileSizeScenario::Options { .. } => None,
            FileSizeScenario::BitsFromOptions { .. } => Some(Unit::Bit),
        }
    }
}

/// Convert a bit count for the file size questions
///
/// Only bits, bytes and kilobytes (8000 bits) appear in these questions.
pub fn bits_to_unit(bits: u64, unit: Unit) -> f64 {
    let bits = bits as f64;
    match unit {
        Unit::Bit => bits,
        Unit::Byte => bits / 8.0,
        Unit::Kilobyte => bits / 8_000.0,
        other => units::convert(bits, Unit::Bit, other),
    }
}

/// Minimum whole bits needed to give each of `options` values its own code
///
/// ⌈log2 n⌉ computed on integers; one option needs no bits at all.
pub fn bits_for_options(options: u64) -> u32 {
    u64::BITS - options.saturating_sub(1).leading_zeros()
}

/// Number of distinct values `bits` bits can represent
///
/// Computed in floating point so any bit count is accepted; powers of two
/// stay exact until they overflow to infinity.
pub fn options_for_bits(bits: u32) -> f64 {
    i32::try_from(bits).map_or(f64::INFINITY, |exponent| 2f64.powi(exponent))
}

/// A generated file size question
#[derive(Debug, Clone, PartialEq)]
pub struct FileSizeQuestion {
    scenario: FileSizeScenario,
    answer: f64,
    explanation: Vec<ExplanationSection>,
}

impl FileSizeQuestion {
    pub fn image(width: u32, height: u32, colour_depth: u32, target_unit: Unit) -> Self {
        let size_in_bits = u64::from(width) * u64::from(height) * u64::from(colour_depth);
        let answer = bits_to_unit(size_in_bits, target_unit);

        let mut explanation = vec![
            ExplanationSection::new(
                "Identify the values",
                vec![
                    format!("Width: {} pixels", width),
                    format!("Height: {} pixels", height),
                    format!("Colour depth: {} bits", colour_depth),
                ],
            ),
            ExplanationSection::new(
                "Multiply width × height × colour depth",
                vec![format!(
                    "{} × {} × {} = {} bits",
                    width,
                    height,
                    colour_depth,
                    format_number(size_in_bits as f64)
                )],
            ),
        ];
        if target_unit != Unit::Bit {
            explanation.push(convert_section(size_in_bits, answer, target_unit));
        }

        Self {
            scenario: FileSizeScenario::Image {
                width,
                height,
                colour_depth,
                target_unit,
            },
            answer,
            explanation,
        }
    }

    pub fn sound(sample_rate: u32, duration: u32, bit_depth: u32, target_unit: Unit) -> Self {
        let bits = u64::from(sample_rate) * u64::from(duration) * u64::from(bit_depth);
        let answer = bits_to_unit(bits, target_unit);

        let mut explanation = vec![
            ExplanationSection::new(
                "Identify the values",
                vec![
                    format!("Sample rate: {} Hz", sample_rate),
                    format!("Duration: {} seconds", duration),
                    format!("Bit depth: {} bits", bit_depth),
                ],
            ),
            ExplanationSection::new(
                "Multiply sample rate × duration × bit depth",
                vec![format!(
                    "{} × {} × {} = {} bits",
                    sample_rate,
                    duration,
                    bit_depth,
                    format_number(bits as f64)
                )],
            ),
        ];
        if target_unit != Unit::Bit {
            explanation.push(convert_section(bits, answer, target_unit));
        }

        Self {
            scenario: FileSizeScenario::Sound {
                sample_rate,
                duration,
                bit_depth,
                target_unit,
            },
            answer,
            explanation,
        }
    }

    pub fn text(char_count: u32, target_unit: Unit) -> Self {
        let bits = u64::from(char_count) * u64::from(BITS_PER_CHAR);
        let answer = bits_to_unit(bits, target_unit);

        let mut explanation = vec![
            ExplanationSection::new(
                "Identify the values",
                vec![
                    format!("Number of characters: {}", format_number(f64::from(char_count))),
                    format!("Bits per character (ASCII): {}", BITS_PER_CHAR),
                ],
            ),
            ExplanationSection::new(
                "Multiply number of characters × bits per character",
                vec![format!(
                    "{} × {} = {} bits",
                    format_number(f64::from(char_count)),
                    BITS_PER_CHAR,
                    format_number(bits as f64)
                )],
            ),
        ];
        if target_unit != Unit::Bit {
            explanation.push(convert_section(bits, answer, target_unit));
        }

        Self {
            scenario: FileSizeScenario::Text {
                char_count,
                target_unit,
            },
            answer,
            explanation,
        }
    }

    pub fn options(num_of_bits: u32) -> Self {
        let options = options_for_bits(num_of_bits);
        let explanation = vec![
            ExplanationSection::new(
                "Identify the values",
                vec![format!("Number of bits: {}", num_of_bits)],
            ),
            ExplanationSection::new(
                "Calculate 2 ^ number of bits",
                vec![format!("2^{} = {} options", num_of_bits, format_number(options))],
            ),
        ];

        Self {
            scenario: FileSizeScenario::Options { num_of_bits },
            answer: options,
            explanation,
        }
    }

    pub fn bits_from_options(number_of_options: u32) -> Self {
        let bits = bits_for_options(u64::from(number_of_options));
        let explanation = vec![
            ExplanationSection::new(
                "Identify the values",
                vec![format!("Number of options: {}", number_of_options)],
            ),
            ExplanationSection::new(
                "Use trial and error - which power of 2 is it less than or equal to?",
                vec![
                    "2^1 = 2, 2^2 = 4, 2^3 = 8, 2^4 = 16, 2^5 = 32, 2^6 = 64, 2^7 = 128, 2^8 = 256"
                        .to_string(),
                    format!("Answer: {} bits", bits),
                ],
            ),
            ExplanationSection::new(
                "The maths: calculate log2(number of options) and round up",
                vec![format!(
                    "log2({}) = {} → {} bits",
                    number_of_options,
                    format_number(crate::format::round_to(
                        f64::from(number_of_options.max(1)).log2(),
                        3
                    )),
                    bits
                )],
            ),
        ];

        Self {
            scenario: FileSizeScenario::BitsFromOptions { number_of_options },
            answer: f64::from(bits),
            explanation,
        }
    }

    pub fn scenario(&self) -> &FileSizeScenario {
        &self.scenario
    }

    pub fn kind(&self) -> FileSizeKind {
        self.scenario.kind()
    }
}

fn convert_section(bits: u64, answer: f64, target_unit: Unit) -> ExplanationSection {
    ExplanationSection::new(
        format!("Convert to {}", target_unit),
        vec![format!(
            "{} bits = {} {}",
            format_number(bits as f64),
            format_number(answer),
            target_unit
        )],
    )
}

impl QuizQuestion for FileSizeQuestion {
    fn category(&self) -> QuestionCategory {
        QuestionCategory::CalculateFileSize
    }

    fn text(&self) -> String {
        match self.scenario {
            FileSizeScenario::Image {
                width,
                height,
                colour_depth,
                target_unit,
            } => format!(
                "An image is {} pixels by {} pixels using a colour depth of {} bits. How large is the file? Give your answer in {}.",
                width, height, colour_depth, target_unit
            ),
            FileSizeScenario::Sound {
                sample_rate,
                duration,
                bit_depth,
                target_unit,
            } => format!(
                "A sound file has a sample rate of {} Hz, duration of {} seconds, and bit depth of {} bits. What is the file size in {}?",
                sample_rate, duration, bit_depth, target_unit
            ),
            FileSizeScenario::Text {
                char_count,
                target_unit,
            } => format!(
                "A text file is stored in ASCII. It has {} characters. How large is the file in {}?",
                format_number(f64::from(char_count)),
                target_unit
            ),
            FileSizeScenario::Options { num_of_bits } => format!(
                "A file uses {} bits to store each value. How many different options can it represent?",
                num_of_bits
            ),
            FileSizeScenario::BitsFromOptions { number_of_options } => format!(
                "An image wants to use {} different colours. What's the minimum number of bits to store each pixel?",
                number_of_options
            ),
        }
    }

    fn hint(&self) -> &'static str {
        self.kind().hint()
    }

    fn answer(&self) -> f64 {
        self.answer
    }

    fn explanation(&self) -> &[ExplanationSection] {
        &self.explanation
    }

    fn tolerance(&self) -> f64 {
        FILE_SIZE_TOLERANCE
    }
}

/// Generates file size questions
pub struct FileSizeEngine<R = StdRng> {
    rng: R,
}

impl FileSizeEngine<StdRng> {
    pub fn new() -> Self {
        Self::with_rng(entropy_rng())
    }

    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(seeded_rng(seed))
    }
}

impl Default for FileSizeEngine<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> FileSizeEngine<R> {
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }

    /// Random question of a uniformly chosen sub-type
    pub fn generate_question(&mut self) -> FileSizeQuestion {
        let kind = pick(&mut self.rng, FileSizeKind::all_variants());
        self.generate(kind)
    }

    /// Random question of a specific sub-type
    pub fn generate(&mut self, kind: FileSizeKind) -> FileSizeQuestion {
        let rng = &mut self.rng;
        let question = match kind {
            FileSizeKind::Image => {
                let width = multiple_of(rng, 2, 2, 20);
                let height = multiple_of(rng, 2, 2, 20);
                let colour_depth = pick(rng, &COLOUR_DEPTHS);
                let target = pick(rng, &IMAGE_TARGETS);
                FileSizeQuestion::image(width, height, colour_depth, target)
            }
            FileSizeKind::Sound => {
                let sample_rate = pick(rng, &SAMPLE_RATES);
                let duration = rng.gen_range(1..=10);
                let bit_depth = pick(rng, &BIT_DEPTHS);
                let target = pick(rng, &SOUND_TARGETS);
                FileSizeQuestion::sound(sample_rate, duration, bit_depth, target)
            }
            FileSizeKind::Text => {
                let char_count = multiple_of(rng, 100, 1000, 6000);
                let target = pick(rng, &TEXT_TARGETS);
                FileSizeQuestion::text(char_count, target)
            }
            FileSizeKind::Options => FileSizeQuestion::options(rng.gen_range(1..=8)),
            FileSizeKind::BitsFromOptions => {
                FileSizeQuestion::bits_from_options(rng.gen_range(1..=256))
            }
        };

        debug!("Generated {} file size question: {:?}", kind, question.scenario());
        question
    }
}
