//! crates/logging/src/timestamp.rs
//! Clock abstraction and timestamp formatting.
//!
//! Timestamp patterns in configuration files use moment-style tokens
//! (`YYYY-MM-DD HH:mm:ss`). [`TimestampFormat::parse`] translates them into a
//! [`time`] format description once, when the configuration is loaded.

use time::OffsetDateTime;
use time::format_description::{self, OwnedFormatItem, well_known::Rfc3339};

/// Source of the current time.
pub trait Clock: Send + Sync {
    /// Returns the current instant.
    fn now(&self) -> OffsetDateTime;
}

/// Wall clock in the local offset, falling back to UTC when the offset cannot
/// be determined.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc())
    }
}

/// Clock frozen at a single instant.
#[derive(Clone, Copy, Debug)]
pub struct FixedClock(OffsetDateTime);

impl FixedClock {
    /// Creates a clock that always reports `at`.
    #[must_use]
    pub const fn new(at: OffsetDateTime) -> Self {
        Self(at)
    }
}

impl Clock for FixedClock {
    fn now(&self) -> OffsetDateTime {
        self.0
    }
}

/// Error raised when a timestamp pattern cannot be compiled.
#[derive(Debug, thiserror::Error)]
pub enum TimeFormatError {
    /// A `[` literal section was never closed.
    #[error("unterminated literal in time format {pattern:?}")]
    UnterminatedLiteral {
        /// The offending pattern.
        pattern: String,
    },
    /// A letter outside `[...]` is not a supported token.
    #[error("unsupported token {token:?} in time format {pattern:?}; wrap literal text in [...]")]
    UnsupportedToken {
        /// The offending pattern.
        pattern: String,
        /// First letter that did not start a known token.
        token: char,
    },
    /// The translated description was rejected by `time`.
    #[error("invalid time format {pattern:?}: {source}")]
    Invalid {
        /// The offending pattern.
        pattern: String,
        /// Underlying parse error.
        #[source]
        source: time::error::InvalidFormatDescription,
    },
}

/// How timestamps are rendered.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum TimestampFormat {
    /// RFC 3339 with millisecond precision.
    #[default]
    Rfc3339,
    /// A compiled moment-style pattern.
    Pattern {
        /// Pattern as written in the configuration.
        source: String,
        /// Compiled description.
        items: OwnedFormatItem,
    },
}

impl TimestampFormat {
    /// Compiles a moment-style pattern.
    ///
    /// Recognised tokens: `YYYY`, `YY`, `MMMM`, `MMM`, `MM`, `M`, `DDDD`,
    /// `DDD`, `DD`, `D`, `dddd`, `ddd`, `HH`, `H`, `hh`, `h`, `mm`, `m`,
    /// `SSS`, `SS`, `S`, `ss`, `s`, `A`, `a`, `ZZ`, `Z`, `X`. Text inside
    /// `[...]` is copied verbatim. Any other letter is rejected with
    /// [`TimeFormatError::UnsupportedToken`]; other characters are literals.
    ///
    /// ```
    /// use logging::TimestampFormat;
    /// use time::macros::datetime;
    ///
    /// let format = TimestampFormat::parse("YYYY-MM-DD HH:mm:ss").unwrap();
    /// assert_eq!(format.format(datetime!(2024-03-05 14:07:09 UTC)), "2024-03-05 14:07:09");
    /// ```
    pub fn parse(pattern: &str) -> Result<Self, TimeFormatError> {
        let description = translate(pattern)?;
        let items = format_description::parse_owned::<1>(&description).map_err(|source| {
            TimeFormatError::Invalid {
                pattern: pattern.to_owned(),
                source,
            }
        })?;
        Ok(Self::Pattern {
            source: pattern.to_owned(),
            items,
        })
    }

    /// Compiles `pattern` when present, otherwise selects RFC 3339.
    pub fn from_config(pattern: Option<&str>) -> Result<Self, TimeFormatError> {
        pattern.map_or(Ok(Self::Rfc3339), Self::parse)
    }

    /// Renders `at`. Formatting never fails; instants outside the
    /// representable range fall back to the Unix timestamp.
    #[must_use]
    pub fn format(&self, at: OffsetDateTime) -> String {
        let rendered = match self {
            Self::Rfc3339 => {
                let millis = at
                    .replace_nanosecond(u32::from(at.millisecond()) * 1_000_000)
                    .unwrap_or(at);
                millis.format(&Rfc3339)
            }
            Self::Pattern { items, .. } => at.format(items),
        };
        rendered.unwrap_or_else(|_| at.unix_timestamp().to_string())
    }
}

// Longest token first where one token is a prefix of another.
const TOKENS: &[(&str, &str)] = &[
    ("YYYY", "[year]"),
    ("YY", "[year repr:last_two]"),
    ("MMMM", "[month repr:long]"),
    ("MMM", "[month repr:short]"),
    ("MM", "[month]"),
    ("M", "[month padding:none]"),
    ("DDDD", "[ordinal]"),
    ("DDD", "[ordinal padding:none]"),
    ("DD", "[day]"),
    ("D", "[day padding:none]"),
    ("dddd", "[weekday repr:long]"),
    ("ddd", "[weekday repr:short]"),
    ("HH", "[hour]"),
    ("H", "[hour padding:none]"),
    ("hh", "[hour repr:12]"),
    ("h", "[hour repr:12 padding:none]"),
    ("mm", "[minute]"),
    ("m", "[minute padding:none]"),
    ("SSS", "[subsecond digits:3]"),
    ("SS", "[subsecond digits:2]"),
    ("S", "[subsecond digits:1]"),
    ("ss", "[second]"),
    ("s", "[second padding:none]"),
    ("A", "[period]"),
    ("a", "[period case:lower]"),
    ("ZZ", "[offset_hour sign:mandatory][offset_minute]"),
    ("Z", "[offset_hour sign:mandatory]:[offset_minute]"),
    ("X", "[unix_timestamp]"),
];

fn translate(pattern: &str) -> Result<String, TimeFormatError> {
    let mut out = String::with_capacity(pattern.len() * 4);
    let mut rest = pattern;

    'outer: while let Some(ch) = rest.chars().next() {
        if ch == '[' {
            let end = rest.find(']').ok_or_else(|| TimeFormatError::UnterminatedLiteral {
                pattern: pattern.to_owned(),
            })?;
            push_literal(&mut out, &rest[1..end]);
            rest = &rest[end + 1..];
            continue;
        }

        for (token, replacement) in TOKENS {
            if let Some(tail) = rest.strip_prefix(token) {
                out.push_str(replacement);
                rest = tail;
                continue 'outer;
            }
        }

        if ch.is_ascii_alphabetic() {
            return Err(TimeFormatError::UnsupportedToken {
                pattern: pattern.to_owned(),
                token: ch,
            });
        }
        push_literal(&mut out, &rest[..ch.len_utf8()]);
        rest = &rest[ch.len_utf8()..];
    }

    Ok(out)
}

fn push_literal(out: &mut String, literal: &str) {
    for ch in literal.chars() {
        if ch == '[' {
            out.push_str("[[");
        } else {
            out.push(ch);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn translates_common_tokens() {
        assert_eq!(
            translate("YYYY-MM-DD HH:mm:ss").expect("valid"),
            "[year]-[month]-[day] [hour]:[minute]:[second]"
        );
        assert_eq!(
            translate("hh:mm A").expect("valid"),
            "[hour repr:12]:[minute] [period]"
        );
    }

    #[test]
    fn bracketed_text_is_literal() {
        assert_eq!(
            translate("YYYY[T]HH").expect("valid"),
            "[year]T[hour]"
        );
        assert!(matches!(
            translate("YYYY[T"),
            Err(TimeFormatError::UnterminatedLiteral { .. })
        ));
    }

    #[test]
    fn pattern_formats_instant() {
        let at = datetime!(2024-03-05 14:07:09.250 UTC);

        let format = TimestampFormat::parse("YYYY-MM-DD HH:mm:ss.SSS").expect("valid");
        assert_eq!(format.format(at), "2024-03-05 14:07:09.250");

        let format = TimestampFormat::parse("DD/MM/YY hh:mm A").expect("valid");
        assert_eq!(format.format(at), "05/03/24 02:07 PM");

        let format = TimestampFormat::parse("YYYY-MM-DD[T]HH:mm:ssZ").expect("valid");
        assert_eq!(format.format(at), "2024-03-05T14:07:09+00:00");
    }

    #[test]
    fn month_and_weekday_names() {
        let at = datetime!(2024-03-05 14:07:09 UTC);

        let format = TimestampFormat::parse("DD-MMM-YYYY").expect("valid");
        assert_eq!(format.format(at), "05-Mar-2024");

        let format = TimestampFormat::parse("dddd, MMMM D").expect("valid");
        assert_eq!(format.format(at), "Tuesday, March 5");

        let format = TimestampFormat::parse("ddd h:mm a").expect("valid");
        assert_eq!(format.format(at), "Tue 2:07 pm");
    }

    #[test]
    fn unsupported_letters_are_rejected() {
        for pattern in ["Do MMM", "YYYY-MM-DDTHH:mm", "Q YYYY", "wo"] {
            assert!(
                matches!(
                    TimestampFormat::parse(pattern),
                    Err(TimeFormatError::UnsupportedToken { .. })
                ),
                "{pattern}"
            );
        }
        let err = TimestampFormat::parse("Do").unwrap_err();
        assert!(matches!(err, TimeFormatError::UnsupportedToken { token: 'o', .. }));
    }

    #[test]
    fn rfc3339_is_the_default() {
        let format = TimestampFormat::from_config(None).expect("default");
        assert_eq!(format, TimestampFormat::Rfc3339);

        let rendered = format.format(datetime!(2024-03-05 14:07:09.250123 UTC));
        assert!(rendered.starts_with("2024-03-05T14:07:09.25"), "{rendered}");
        assert!(rendered.ends_with('Z'), "{rendered}");
    }

    #[test]
    fn fixed_clock_reports_its_instant() {
        let at = datetime!(2020-01-01 00:00 UTC);
        assert_eq!(FixedClock::new(at).now(), at);
    }
}
