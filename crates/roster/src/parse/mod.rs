use std::fmt::{Display, Formatter};
use std::sync::OnceLock;

use regex::Regex;

use crate::models::{CommandFailure, Record};

/// first name, last name, email, vehicle type, vehicle name, vehicle length
pub const REQUIRED_FIELD_COUNT: usize = 6;
pub const DEFAULT_SEPARATOR: &str = ",";

/// Field delimiter for input lines. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Separator(String);

impl Separator {
    pub fn new(value: impl Into<String>) -> Result<Self, CommandFailure> {
        let value = value.into();
        if value.is_empty() {
            return Err(CommandFailure::configuration("separator must not be empty"));
        }
        Ok(Self(value))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Separator {
    fn default() -> Self {
        Self(DEFAULT_SEPARATOR.to_string())
    }
}

impl Display for Separator {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A line that did not split into the expected number of fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineParseFailure {
    pub expected: usize,
    pub found: usize,
}

impl Display for LineParseFailure {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "expected {} fields, found {}", self.expected, self.found)
    }
}

impl std::error::Error for LineParseFailure {}

/// Takes the first integer in a free-form length description as feet.
///
/// `"52 ft 8 in"` is 52. Descriptions without any digits are 0, and digit
/// runs past `u32::MAX` saturate.
#[must_use]
pub fn extract_length_ft(description: &str) -> u32 {
    let Some(digits) = length_digits_regex().find(description) else {
        return 0;
    };
    digits.as_str().parse::<u32>().unwrap_or(u32::MAX)
}

/// Splits `line` on every literal occurrence of `separator` and builds a
/// [`Record`] from exactly [`REQUIRED_FIELD_COUNT`] fields.
pub fn parse_line(line: &str, separator: &Separator) -> Result<Record, LineParseFailure> {
    let content = strip_line_terminator(line);
    let fields = content.split(separator.as_str()).collect::<Vec<_>>();

    let [first_name, last_name, email, vehicle_type, vehicle_name, length_description] =
        fields.as_slice()
    else {
        return Err(LineParseFailure {
            expected: REQUIRED_FIELD_COUNT,
            found: fields.len(),
        });
    };

    Ok(Record::new(
        *first_name,
        *last_name,
        *email,
        *vehicle_type,
        *vehicle_name,
        Some(extract_length_ft(length_description)),
    ))
}

#[must_use]
pub fn strip_line_terminator(line: &str) -> &str {
    line.strip_suffix('\n')
        .map(|rest| rest.strip_suffix('\r').unwrap_or(rest))
        .unwrap_or(line)
}

fn length_digits_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(r"[0-9]+").expect("length digits regex must compile"))
}
