//! Named string formats for the `format` constraint.

use chrono::{DateTime, NaiveDate};
use regex::Regex;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;
use validator::{ValidateEmail, ValidateIp, ValidateUrl};

static BYTE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:[A-Za-z0-9+/]{4})*(?:[A-Za-z0-9+/]{2}==|[A-Za-z0-9+/]{3}=)?$")
        .expect("byte pattern compiles")
});

static DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("date pattern compiles"));

static UUID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$")
        .expect("uuid pattern compiles")
});

/// The closed set of supported formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    /// Base64-encoded bytes
    Byte,
    /// RFC 3339 timestamp
    DateTime,
    /// ISO 8601 calendar date, `YYYY-MM-DD`
    Date,
    /// Email address
    Email,
    /// Dotted-quad IPv4 address
    Ipv4,
    /// IPv6 address
    Ipv6,
    /// Absolute URI
    Uri,
    /// Hyphenated UUID
    Uuid,
}

impl Format {
    /// All formats.
    pub const ALL: [Format; 8] = [
        Format::Byte,
        Format::DateTime,
        Format::Date,
        Format::Email,
        Format::Ipv4,
        Format::Ipv6,
        Format::Uri,
        Format::Uuid,
    ];

    /// Returns the name used in `@constraint(format: ...)`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Format::Byte => "byte",
            Format::DateTime => "date-time",
            Format::Date => "date",
            Format::Email => "email",
            Format::Ipv4 => "ipv4",
            Format::Ipv6 => "ipv6",
            Format::Uri => "uri",
            Format::Uuid => "uuid",
        }
    }

    fn reason(&self) -> &'static str {
        match self {
            Format::Byte => "Must be in byte format",
            Format::DateTime => "Must be a date-time in RFC 3339 format",
            Format::Date => "Must be a date in ISO 8601 format",
            Format::Email => "Must be in email format",
            Format::Ipv4 => "Must be in IP v4 format",
            Format::Ipv6 => "Must be in IP v6 format",
            Format::Uri => "Must be in URI format",
            Format::Uuid => "Must be in UUID format",
        }
    }

    /// Returns true if `value` is in this format.
    pub fn matches(&self, value: &str) -> bool {
        match self {
            Format::Byte => BYTE_RE.is_match(value),
            Format::DateTime => DateTime::parse_from_rfc3339(value).is_ok(),
            Format::Date => {
                DATE_RE.is_match(value) && NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok()
            }
            Format::Email => value.validate_email(),
            Format::Ipv4 => value.validate_ipv4(),
            Format::Ipv6 => value.validate_ipv6(),
            Format::Uri => value.validate_url(),
            Format::Uuid => UUID_RE.is_match(value),
        }
    }

    /// Validator for the `format` kind.
    pub fn check(&self, value: &str) -> Result<(), String> {
        if self.matches(value) {
            Ok(())
        } else {
            Err(self.reason().to_string())
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Format::ALL
            .into_iter()
            .find(|format| format.as_str() == s)
            .ok_or_else(|| s.to_string())
    }
}
