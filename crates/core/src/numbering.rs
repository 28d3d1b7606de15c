//! Document number parsing and formatting.
//!
//! A document number is its series prefix followed by a zero-padded counter,
//! e.g. `JE000001`. The counter itself lives in storage; this module only knows
//! how to read counters back out of existing numbers and how to render them.

/// Default zero-padded width of the counter part.
pub const DEFAULT_WIDTH: usize = 6;

/// Extracts the counter from `number` if it belongs to `series`.
///
/// Returns `None` for numbers of another series or with a non-numeric suffix.
#[must_use]
pub fn parse_suffix(series: &str, number: &str) -> Option<u64> {
    let suffix = number.strip_prefix(series)?;
    if suffix.is_empty() || !suffix.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    suffix.parse().ok()
}

/// Returns the highest counter found among `numbers`, or 0 if none parse.
pub fn max_suffix<'a, I>(series: &str, numbers: I) -> u64
where
    I: IntoIterator<Item = &'a str>,
{
    numbers
        .into_iter()
        .filter_map(|number| parse_suffix(series, number))
        .max()
        .unwrap_or(0)
}

/// Renders `value` as a number in `series`, zero-padded to `width` digits.
///
/// Values wider than `width` are rendered in full rather than truncated.
#[must_use]
pub fn format_number(series: &str, value: u64, width: usize) -> String {
    format!("{series}{value:0width$}")
}
