//! String formats: checks, canonical literals, and recognition of the regex
//! spellings used for domain formats.

use std::fmt;
use std::net::{Ipv4Addr, Ipv6Addr};
use std::sync::OnceLock;

use chrono::{DateTime, NaiveDate};
use regex::Regex;
use url::Url;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

const EMAIL_PATTERN: &str = r"^[^\s@]+@[^\s@]+\.[^\s@]+$";
const UUID_PATTERN: &str =
    r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$";
const DATE_PATTERN: &str = r"^\d{4}-\d{2}-\d{2}$";
const SSN_PATTERN: &str = r"^\d{3}-\d{2}-\d{4}$";
const PHONE_PATTERN: &str = r"^\d{3}-\d{3}-\d{4}$";

/// Regex spellings recognised as the SSN shape.
const SSN_PATTERN_FORMS: &[&str] = &[
    r"^\d{3}-\d{2}-\d{4}$",
    r"\d{3}-\d{2}-\d{4}",
    r"^[0-9]{3}-[0-9]{2}-[0-9]{4}$",
    r"[0-9]{3}-[0-9]{2}-[0-9]{4}",
];

/// Regex spellings recognised as the phone shape.
const PHONE_PATTERN_FORMS: &[&str] = &[
    r"^\d{3}-\d{3}-\d{4}$",
    r"\d{3}-\d{3}-\d{4}",
    r"^[0-9]{3}-[0-9]{3}-[0-9]{4}$",
    r"[0-9]{3}-[0-9]{3}-[0-9]{4}",
];

// ---------------------------------------------------------------------------
// Format
// ---------------------------------------------------------------------------

/// Value of a schema's `format` keyword.
///
/// Unrecognised formats are carried as [`Format::Other`] and never fail
/// validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Format {
    Email,
    Uri,
    Url,
    Date,
    DateTime,
    Uuid,
    Ssn,
    Phone,
    Ipv4,
    Ipv6,
    Other(String),
}

impl Format {
    pub fn parse(name: &str) -> Self {
        match name {
            "email" => Format::Email,
            "uri" => Format::Uri,
            "url" => Format::Url,
            "date" => Format::Date,
            "date-time" => Format::DateTime,
            "uuid" => Format::Uuid,
            "ssn" => Format::Ssn,
            "phone" => Format::Phone,
            "ipv4" => Format::Ipv4,
            "ipv6" => Format::Ipv6,
            other => Format::Other(other.to_string()),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Format::Email => "email",
            Format::Uri => "uri",
            Format::Url => "url",
            Format::Date => "date",
            Format::DateTime => "date-time",
            Format::Uuid => "uuid",
            Format::Ssn => "ssn",
            Format::Phone => "phone",
            Format::Ipv4 => "ipv4",
            Format::Ipv6 => "ipv6",
            Format::Other(name) => name.as_str(),
        }
    }

    /// Check a string against this format. Unknown formats always pass.
    pub fn check(&self, value: &str) -> bool {
        match self {
            Format::Email => is_email(value),
            Format::Uri | Format::Url => Url::parse(value).is_ok(),
            Format::Date => is_iso_date(value),
            Format::DateTime => DateTime::parse_from_rfc3339(value).is_ok(),
            Format::Uuid => is_uuid(value),
            Format::Ssn => is_ssn(value),
            Format::Phone => is_phone(value),
            Format::Ipv4 => value.parse::<Ipv4Addr>().is_ok(),
            Format::Ipv6 => value.parse::<Ipv6Addr>().is_ok(),
            Format::Other(name) => {
                tracing::debug!(format = %name, "unknown format is not checked");
                true
            }
        }
    }

    /// Literals satisfying the format, canonical first, then shorter or
    /// longer spellings for length-bounded fields.
    pub fn examples(&self) -> &'static [&'static str] {
        match self {
            Format::Email => &["user@example.com", "a@b.co", "firstname.lastname@example.com"],
            Format::Uri | Format::Url => &["https://example.com", "http://a.io", "https://www.example.com/path"],
            Format::Date => &["2024-01-15"],
            Format::DateTime => &["2024-01-15T10:30:00Z", "2024-01-15T10:30:00.000+00:00"],
            Format::Uuid => &["123e4567-e89b-12d3-a456-426614174000"],
            Format::Ssn => &["123-45-6789"],
            Format::Phone => &["555-123-4567"],
            Format::Ipv4 => &["192.168.1.1", "10.0.0.1", "192.168.100.100"],
            Format::Ipv6 => &["2001:db8::1", "::1", "2001:0db8:0000:0000:0000:0000:0000:0001"],
            Format::Other(_) => &[],
        }
    }

    /// A canonical literal satisfying the format.
    pub fn example(&self) -> Option<&'static str> {
        self.examples().first().copied()
    }

    /// Placeholder template for digit-shaped domain formats.
    pub fn template(&self) -> Option<&'static str> {
        match self {
            Format::Ssn => Some("XXX-XX-XXXX"),
            Format::Phone => Some("XXX-XXX-XXXX"),
            _ => None,
        }
    }

    /// Human noun phrase used in messages ("a valid email address").
    pub fn noun(&self) -> &str {
        match self {
            Format::Email => "email address",
            Format::Uri | Format::Url => "absolute URL",
            Format::Date => "ISO 8601 date (YYYY-MM-DD)",
            Format::DateTime => "ISO 8601 date-time",
            Format::Uuid => "UUID",
            Format::Ssn => "social security number",
            Format::Phone => "phone number",
            Format::Ipv4 => "IPv4 address",
            Format::Ipv6 => "IPv6 address",
            Format::Other(name) => name.as_str(),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Map a regex source onto the domain format it spells, if any.
///
/// # Example
/// ```
/// use jsonschema_payload_core::format::{recognize_pattern, Format};
/// assert_eq!(recognize_pattern(r"^\d{3}-\d{2}-\d{4}$"), Some(Format::Ssn));
/// assert_eq!(recognize_pattern("^[a-z]+$"), None);
/// ```
pub fn recognize_pattern(source: &str) -> Option<Format> {
    let source = source.trim();
    if SSN_PATTERN_FORMS.contains(&source) {
        Some(Format::Ssn)
    } else if PHONE_PATTERN_FORMS.contains(&source) {
        Some(Format::Phone)
    } else {
        None
    }
}

// ---------------------------------------------------------------------------
// Compiled format regexes
// ---------------------------------------------------------------------------

fn matches(cell: &'static OnceLock<Option<Regex>>, pattern: &str, value: &str) -> bool {
    cell.get_or_init(|| Regex::new(pattern).ok())
        .as_ref()
        .is_some_and(|re| re.is_match(value))
}

fn is_email(value: &str) -> bool {
    static CELL: OnceLock<Option<Regex>> = OnceLock::new();
    matches(&CELL, EMAIL_PATTERN, value)
}

/// `YYYY-MM-DD` with zero-padded fields, then a calendar check.
fn is_iso_date(value: &str) -> bool {
    static CELL: OnceLock<Option<Regex>> = OnceLock::new();
    matches(&CELL, DATE_PATTERN, value) && NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok()
}

fn is_uuid(value: &str) -> bool {
    static CELL: OnceLock<Option<Regex>> = OnceLock::new();
    matches(&CELL, UUID_PATTERN, value)
}

fn is_ssn(value: &str) -> bool {
    static CELL: OnceLock<Option<Regex>> = OnceLock::new();
    matches(&CELL, SSN_PATTERN, value)
}

fn is_phone(value: &str) -> bool {
    static CELL: OnceLock<Option<Regex>> = OnceLock::new();
    matches(&CELL, PHONE_PATTERN, value)
}
