//! Time values and CSS number formatting.

/// Seconds per unit for the suffixes a time string may carry.
///
/// Unknown suffixes (including none at all) count as seconds.
const TIME_UNITS: &[(&str, f64)] = &[("s", 1.0), ("ms", 0.001)];

/// A time as written by the caller: plain seconds or a unit-tagged string.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(untagged))]
pub enum TimeValue {
    /// Already in seconds
    Seconds(f64),
    /// A string such as `"2s"` or `"500ms"`
    Text(String),
}

impl TimeValue {
    /// Resolve to seconds, or `None` when the value is not a usable number.
    pub fn seconds(&self) -> Option<f64> {
        match self {
            TimeValue::Seconds(value) => value.is_finite().then_some(*value),
            TimeValue::Text(text) => {
                let magnitude: String = text
                    .chars()
                    .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
                    .collect();
                let value = parse_leading_float(&magnitude)?;
                let seconds = value * unit_factor(text);
                seconds.is_finite().then_some(seconds)
            }
        }
    }
}

impl From<f64> for TimeValue {
    fn from(value: f64) -> Self {
        TimeValue::Seconds(value)
    }
}

impl From<i32> for TimeValue {
    fn from(value: i32) -> Self {
        TimeValue::Seconds(value as f64)
    }
}

impl From<&str> for TimeValue {
    fn from(value: &str) -> Self {
        TimeValue::Text(value.to_string())
    }
}

impl From<String> for TimeValue {
    fn from(value: String) -> Self {
        TimeValue::Text(value)
    }
}

/// Get a time value in seconds, falling back to `default`.
///
/// The fallback is used when the value is absent or its number can't be
/// parsed, so the result is always a finite number of seconds.
///
/// ## Example
///
/// ```rust
/// use funtext::{extract_seconds, TimeValue};
///
/// assert_eq!(extract_seconds(Some(&TimeValue::Seconds(3.0)), 1.0), 3.0);
/// assert_eq!(extract_seconds(Some(&"2s".into()), 1.0), 2.0);
/// assert_eq!(extract_seconds(Some(&"500ms".into()), 1.0), 0.5);
/// assert_eq!(extract_seconds(Some(&"soon".into()), 1.0), 1.0);
/// assert_eq!(extract_seconds(None, 0.0), 0.0);
/// ```
pub fn extract_seconds(value: Option<&TimeValue>, default: f64) -> f64 {
    value.and_then(TimeValue::seconds).unwrap_or(default)
}

fn unit_factor(text: &str) -> f64 {
    let unit: String = text
        .chars()
        .filter(|c| c.is_ascii_alphabetic())
        .collect::<String>()
        .to_ascii_lowercase();
    TIME_UNITS
        .iter()
        .find(|(suffix, _)| *suffix == unit)
        .map(|(_, factor)| *factor)
        .unwrap_or(1.0)
}

/// Parse the longest numeric prefix of `s` (`-`, digits, one `.`).
fn parse_leading_float(s: &str) -> Option<f64> {
    let bytes = s.as_bytes();
    let mut end = usize::from(bytes.first() == Some(&b'-'));
    let mut seen_digit = false;
    let mut seen_dot = false;

    while end < bytes.len() {
        match bytes[end] {
            b'0'..=b'9' => seen_digit = true,
            b'.' if !seen_dot => seen_dot = true,
            _ => break,
        }
        end += 1;
    }

    if !seen_digit {
        return None;
    }
    s[..end].parse().ok()
}

/// Format a number the way it should appear in CSS text.
///
/// Integral values drop the fraction (`1`, not `1.0`) and negative zero
/// prints as `0`.
pub fn format_number(value: f64) -> String {
    if value == 0.0 {
        "0".to_string()
    } else {
        format!("{value}")
    }
}

/// Format seconds with the trailing `s` unit.
pub fn format_seconds(value: f64) -> String {
    format!("{}s", format_number(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_numbers_pass_through() {
        assert_eq!(extract_seconds(Some(&TimeValue::Seconds(2.5)), 1.0), 2.5);
        assert_eq!(extract_seconds(Some(&TimeValue::Seconds(0.0)), 1.0), 0.0);
        assert_eq!(extract_seconds(Some(&TimeValue::Seconds(f64::NAN)), 1.0), 1.0);
    }

    #[test]
    fn unit_strings() {
        assert_eq!(extract_seconds(Some(&"2s".into()), 1.0), 2.0);
        assert_eq!(extract_seconds(Some(&"500ms".into()), 1.0), 0.5);
        assert_eq!(extract_seconds(Some(&"1.5s".into()), 1.0), 1.5);
        assert_eq!(extract_seconds(Some(&"-3s".into()), 1.0), -3.0);
        assert_eq!(extract_seconds(Some(&"4".into()), 1.0), 4.0);
        assert_eq!(extract_seconds(Some(&"250MS".into()), 1.0), 0.25);
    }

    #[test]
    fn unknown_unit_counts_as_seconds() {
        assert_eq!(extract_seconds(Some(&"3min".into()), 1.0), 3.0);
    }

    #[test]
    fn unparseable_falls_back() {
        assert_eq!(extract_seconds(Some(&"later".into()), 7.0), 7.0);
        assert_eq!(extract_seconds(Some(&"ms".into()), 0.0), 0.0);
        assert_eq!(extract_seconds(Some(&"".into()), 1.0), 1.0);
        assert_eq!(extract_seconds(None, 1.0), 1.0);
    }

    #[test]
    fn leading_float() {
        assert_eq!(parse_leading_float("1.2.3"), Some(1.2));
        assert_eq!(parse_leading_float("-.5"), Some(-0.5));
        assert_eq!(parse_leading_float("-"), None);
        assert_eq!(parse_leading_float("."), None);
    }

    #[test]
    fn number_formatting() {
        assert_eq!(format_number(1.0), "1");
        assert_eq!(format_number(0.5), "0.5");
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(format_number(-12.25), "-12.25");
        assert_eq!(format_seconds(2.0), "2s");
        assert_eq!(format_seconds(0.1), "0.1s");
    }
}
