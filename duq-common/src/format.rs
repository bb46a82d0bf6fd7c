//! Human-readable number formatting for questions and explanations
//!
//! Provides consistent number display across all engines: integer parts are
//! grouped with commas, fractional parts are printed as-is with no trailing
//! zeros.

/// Decimal places kept for every intermediate explanation value
///
/// Large enough that a single byte expressed in gigabytes (1e-9) still keeps
/// its leading digits.
pub const EXPLANATION_DECIMALS: usize = 12;

/// Format a number with comma thousands separators.
///
/// # Examples
///
/// ```
/// use duq_common::format::format_number;
///
/// assert_eq!(format_number(1000.0), "1,000");
/// assert_eq!(format_number(1234567.5), "1,234,567.5");
/// assert_eq!(format_number(0.038), "0.038");
/// assert_eq!(format_number(-2500.0), "-2,500");
/// ```
pub fn format_number(value: f64) -> String {
    // Display for f64 never switches to exponent notation
    let raw = value.to_string();
    let (sign, unsigned) = match raw.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", raw.as_str()),
    };

    let (integer, fraction) = match unsigned.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (unsigned, None),
    };

    let mut grouped = String::with_capacity(integer.len() + integer.len() / 3);
    for (i, digit) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    match fraction {
        Some(f) => format!("{}{}.{}", sign, grouped, f),
        None => format!("{}{}", sign, grouped),
    }
}

/// Round to a fixed number of decimal places.
///
/// Goes through the decimal string so the result is the closest double to
/// the rounded decimal, which keeps later `format_number` output clean
/// (no `0.30000000000000004`).
pub fn round_to(value: f64, decimals: usize) -> f64 {
    if !value.is_finite() {
        return value;
    }
    format!("{:.*}", decimals, value).parse().unwrap_or(value)
}

/// Round for explanation display
pub fn round_for_explanation(value: f64) -> f64 {
    round_to(value, EXPLANATION_DECIMALS)
}
