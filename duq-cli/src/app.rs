//! Interactive quiz loop and stats output
//!
//! Generic over the reader and writer so the loop can be driven from tests.

use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use clap::ValueEnum;
use duq_common::config::SiteConfig;
use duq_common::engines::{seeded_rng, CapacityEngine, ConversionEngine, Difficulty, FileSizeEngine};
use duq_common::question::QuizQuestion;
use duq_common::storage::KeyValueStore;
use duq_common::{AnswerCheck, Question, QuestionCategory, QuizSession, ScoreManager};
use rand::rngs::StdRng;
use rand::Rng;
use tracing::debug;

/// Which engine(s) to draw questions from
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    Convert,
    FileSize,
    Capacity,
    /// Uniform pick among the three engines
    Mixed,
}

/// Question generators for one session
pub struct QuestionSource {
    mode: Mode,
    difficulty: Difficulty,
    conversion: ConversionEngine,
    file_size: FileSizeEngine,
    capacity: CapacityEngine,
    picker: StdRng,
}

impl QuestionSource {
    pub fn new(mode: Mode, difficulty: Difficulty) -> Self {
        Self {
            mode,
            difficulty,
            conversion: ConversionEngine::new(),
            file_size: FileSizeEngine::new(),
            capacity: CapacityEngine::new(),
            picker: duq_common::engines::entropy_rng(),
        }
    }

    /// Reproducible source; each engine gets its own stream
    pub fn seeded(mode: Mode, difficulty: Difficulty, seed: u64) -> Self {
        Self {
            mode,
            difficulty,
            conversion: ConversionEngine::seeded(seed),
            file_size: FileSizeEngine::seeded(seed.wrapping_add(1)),
            capacity: CapacityEngine::seeded(seed.wrapping_add(2)),
            picker: seeded_rng(seed.wrapping_add(3)),
        }
    }

    pub fn next_question(&mut self) -> Question {
        let mode = match self.mode {
            Mode::Mixed => match self.picker.gen_range(0..3) {
                0 => Mode::Convert,
                1 => Mode::FileSize,
                _ => Mode::Capacity,
            },
            mode => mode,
        };

        match mode {
            Mode::FileSize => self.file_size.generate_question().into(),
            Mode::Capacity => self.capacity.generate_question().into(),
            _ => self.conversion.generate_question(self.difficulty).into(),
        }
    }
}

/// Totals for one run of the loop
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct QuizSummary {
    pub asked: u32,
    pub correct: u32,
}

fn is_quit(line: &str) -> bool {
    let line = line.trim();
    line.eq_ignore_ascii_case("q") || line.eq_ignore_ascii_case("quit")
}

pub fn print_header<W: Write>(output: &mut W, config: &SiteConfig) -> Result<()> {
    writeln!(output, "{} {}", config.icon, config.title)?;
    if !config.subtitle.is_empty() {
        writeln!(output, "{}", config.subtitle)?;
    }
    writeln!(output, "Type 'q' to finish.")?;
    Ok(())
}

fn print_feedback<W: Write>(output: &mut W, check: &AnswerCheck) -> Result<()> {
    let mark = if check.is_correct { "✓" } else { "✗" };
    writeln!(output, "{} {}", mark, check.message)?;
    for section in &check.explanation {
        writeln!(output, "  {}", section.title)?;
        for detail in &section.details {
            writeln!(output, "    {}", detail)?;
        }
    }
    Ok(())
}

fn print_badge<W: Write, S: KeyValueStore>(output: &mut W, scores: &ScoreManager<S>) -> Result<()> {
    let stats = scores.overall_stats();
    writeln!(
        output,
        "{} | {} points | {:.0}% accuracy | streak {}",
        stats.level.badge(),
        stats.total_points,
        stats.accuracy_percent(),
        stats.streak
    )?;
    Ok(())
}

/// Ask questions until `limit` is reached, the learner quits, or input ends
pub fn run_quiz<I, W, S>(
    input: &mut I,
    output: &mut W,
    source: &mut QuestionSource,
    scores: &mut ScoreManager<S>,
    limit: Option<u32>,
) -> Result<QuizSummary>
where
    I: BufRead,
    W: Write,
    S: KeyValueStore,
{
    let mut session = QuizSession::new();
    let mut summary = QuizSummary::default();
    let mut line = String::new();

    while limit.map_or(true, |max| summary.asked < max) {
        let question = session.present(source.next_question());
        writeln!(output)?;
        writeln!(output, "Question {}: {}", summary.asked + 1, question.text())?;
        writeln!(output, "Hint: {}", question.hint())?;
        write!(output, "> ")?;
        output.flush()?;

        line.clear();
        let read = input.read_line(&mut line).context("Failed to read answer")?;
        if read == 0 || is_quit(&line) {
            debug!("Quiz ended by learner");
            break;
        }

        if let Some(check) = session.submit(&line, scores) {
            summary.asked += 1;
            if check.is_correct {
                summary.correct += 1;
            }
            print_feedback(output, &check)?;
            print_badge(output, scores)?;
        }
    }

    writeln!(output)?;
    writeln!(
        output,
        "Answered {}, {} correct.",
        summary.asked, summary.correct
    )?;
    if !scores.is_persistent() {
        writeln!(output, "Scores could not be saved this session.")?;
    }
    Ok(summary)
}

/// Level, totals, per-category counts and the next tier
pub fn print_stats<W: Write, S: KeyValueStore>(output: &mut W, scores: &ScoreManager<S>) -> Result<()> {
    let stats = scores.overall_stats();
    writeln!(output, "Scores for '{}'", scores.site_key())?;
    writeln!(output, "{}", stats.level.badge())?;
    writeln!(output, "{}", stats.level.description)?;
    writeln!(output)?;
    writeln!(output, "Points:      {}", stats.total_points)?;
    writeln!(
        output,
        "Accuracy:    {:.0}% ({}/{})",
        stats.accuracy_percent(),
        stats.correct,
        stats.total
    )?;
    writeln!(output, "Streak:      {}", stats.streak)?;
    writeln!(output, "Best streak: {}", scores.best_streak())?;
    writeln!(output)?;

    for category in QuestionCategory::all_variants() {
        let counts = scores.category_stats(category.as_str());
        writeln!(
            output,
            "{:<22}{}/{}",
            category.display_name(),
            counts.correct,
            counts.total
        )?;
    }

    match scores.next_level() {
        Some(next) if next.points_needed > 0 => writeln!(
            output,
            "\nNext: {} ({} more points)",
            next.tier.badge(),
            next.points_needed
        )?,
        Some(next) => writeln!(
            output,
            "\nNext: {} (reach {}% accuracy)",
            next.tier.badge(),
            next.tier.min_accuracy
        )?,
        None => writeln!(output, "\nTop level reached!")?,
    }
    Ok(())
}
