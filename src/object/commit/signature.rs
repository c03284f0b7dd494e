use std::fmt::Display;
use std::str::FromStr;

use time::{OffsetDateTime, UtcOffset};

use super::*;
use crate::{Error, Result};

/// The identity and moment recorded for the author or the committer of a commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    name: String,
    email: String,
    /// Seconds since the unix epoch
    timestamp: i64,
    offset: UtcOffset,
}

impl Signature {
    /// Creates a signature, validating that the name has no angle brackets or newlines and the
    /// email has no angle brackets or newlines either.
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        timestamp: i64,
        offset: UtcOffset,
    ) -> Result<Self> {
        let name = name.into();
        let email = email.into();

        if name.contains(['<', '>', '\n']) {
            return Err(Error::InvalidSignature(format!(
                "name {:?} cannot contain '<', '>' or newlines",
                name
            )));
        }
        if email.contains(['<', '>', '\n']) {
            return Err(Error::InvalidSignature(format!(
                "email {:?} cannot contain '<', '>' or newlines",
                email
            )));
        }

        Ok(Self {
            name,
            email,
            timestamp,
            offset,
        })
    }

    /// Same as `new`, with the offset given in signed minutes east of UTC.
    pub fn with_offset_minutes(
        name: impl Into<String>,
        email: impl Into<String>,
        timestamp: i64,
        offset_minutes: i16,
    ) -> Result<Self> {
        let offset = UtcOffset::from_whole_seconds(i32::from(offset_minutes) * 60)?;
        Self::new(name, email, timestamp, offset)
    }

    /// Creates a signature from a date, dropping anything smaller than a second.
    pub fn from_datetime(
        name: impl Into<String>,
        email: impl Into<String>,
        when: OffsetDateTime,
    ) -> Result<Self> {
        Self::new(name, email, when.unix_timestamp(), when.offset())
    }

    /// Creates a signature stamped with the current time, in the local offset if it can be
    /// determined and in UTC otherwise.
    pub fn now(name: impl Into<String>, email: impl Into<String>) -> Result<Self> {
        let now = OffsetDateTime::now_local().unwrap_or_else(|_| {
            log::debug!("could not determine local offset, using UTC");
            OffsetDateTime::now_utc()
        });
        Self::from_datetime(name, email, now)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }

    pub fn offset(&self) -> UtcOffset {
        self.offset
    }

    pub fn offset_minutes(&self) -> i16 {
        self.offset.whole_minutes()
    }

    /// The instant of this signature, expressed in its own offset.
    pub fn when(&self) -> Result<OffsetDateTime> {
        Ok(OffsetDateTime::from_unix_timestamp(self.timestamp)?.to_offset(self.offset))
    }

    /// Returns the signature as it is written in a commit: `{name} <{email}> {timestamp} {offset}`
    pub fn format(&self) -> String {
        let minutes = self.offset.whole_minutes();
        let sign = if minutes < 0 { '-' } else { '+' };
        let minutes = minutes.unsigned_abs();
        format!(
            "{} <{}> {} {}{:02}{:02}",
            self.name,
            self.email,
            self.timestamp,
            sign,
            minutes / 60,
            minutes % 60
        )
    }
}

impl Display for Signature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} <{}>", self.name, self.email)
    }
}

impl FromStr for Signature {
    type Err = Error;

    /// Parses the text following `author ` or `committer ` in a commit.
    ///
    /// # Errors
    ///
    /// Fails with `Error::MalformedCommit` if the text can't be split into name, email, timestamp
    /// and offset.
    fn from_str(s: &str) -> Result<Self> {
        let malformed = |reason: &str| Error::MalformedCommit(format!("{} in {:?}", reason, s));

        let mut parts = s.rsplitn(3, ' ');
        let offset = parts.next().ok_or_else(|| malformed("expected offset"))?;
        let timestamp = parts.next().ok_or_else(|| malformed("expected timestamp"))?;
        let identifier = parts.next().ok_or_else(|| malformed("expected identifier"))?;

        let identifier = identifier
            .strip_suffix('>')
            .ok_or_else(|| malformed("expected '>' after email"))?;
        let (name, email) = identifier
            .split_once('<')
            .ok_or_else(|| malformed("expected '<' before email"))?;
        let name = name
            .strip_suffix(' ')
            .ok_or_else(|| malformed("expected space between name and email"))?;

        let timestamp: i64 = timestamp
            .parse()
            .map_err(|_| malformed("timestamp is not a number"))?;
        let offset =
            UtcOffset::parse(offset, TIMEZONE_FORMAT).map_err(|_| malformed("offset is invalid"))?;

        Signature::new(name, email, timestamp, offset)
            .map_err(|e| Error::MalformedCommit(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_NAME: &str = "John Doe";
    const TEST_EMAIL: &str = "john@example.com";
    const TEST_TIMESTAMP: i64 = 1640995200;

    #[test]
    fn test_signature_validation() {
        assert!(Signature::with_offset_minutes(TEST_NAME, TEST_EMAIL, TEST_TIMESTAMP, 0).is_ok());
        for (name, email) in [
            ("John <Doe>", TEST_EMAIL),
            ("John\nDoe", TEST_EMAIL),
            (TEST_NAME, "<john@example.com>"),
            (TEST_NAME, "john@example.com\n"),
        ] {
            assert!(matches!(
                Signature::with_offset_minutes(name, email, TEST_TIMESTAMP, 0),
                Err(Error::InvalidSignature(_))
            ));
        }
    }

    #[test]
    fn test_format_offsets() {
        let cases = [
            (0, "+0000"),
            (480, "+0800"),
            (-300, "-0500"),
            (330, "+0530"),
            (-570, "-0930"),
            (-30, "-0030"),
        ];
        for (minutes, expected) in cases {
            let signature =
                Signature::with_offset_minutes(TEST_NAME, TEST_EMAIL, TEST_TIMESTAMP, minutes)
                    .unwrap();
            assert_eq!(
                signature.format(),
                format!("{} <{}> {} {}", TEST_NAME, TEST_EMAIL, TEST_TIMESTAMP, expected)
            );
        }
    }

    #[test]
    fn test_parse() {
        let signature: Signature = "John Doe <john@example.com> 1640995200 +0800"
            .parse()
            .unwrap();
        assert_eq!(signature.name(), TEST_NAME);
        assert_eq!(signature.email(), TEST_EMAIL);
        assert_eq!(signature.timestamp(), TEST_TIMESTAMP);
        assert_eq!(signature.offset_minutes(), 480);
    }

    #[test]
    fn test_parse_round_trip() {
        for minutes in [0, 60, -480, 330, 765] {
            let signature =
                Signature::with_offset_minutes(TEST_NAME, TEST_EMAIL, TEST_TIMESTAMP, minutes)
                    .unwrap();
            let parsed: Signature = signature.format().parse().unwrap();
            assert_eq!(parsed, signature);
        }
    }

    #[test]
    fn test_parse_empty_name_and_email() {
        let signature = Signature::with_offset_minutes("", "", 0, 0).unwrap();
        let formatted = signature.format();
        assert_eq!(formatted, " <> 0 +0000");
        assert_eq!(formatted.parse::<Signature>().unwrap(), signature);
    }

    #[test]
    fn test_parse_malformed() {
        for input in [
            "",
            "John Doe",
            "John Doe <john@example.com>",
            "John Doe <john@example.com> 1640995200",
            "John Doe john@example.com 1640995200 +0000",
            "John Doe<john@example.com> 1640995200 +0000",
            "John Doe <john@example.com> notanumber +0000",
            "John Doe <john@example.com> 1640995200 invalid",
            "John > Doe <john@example.com> 1640995200 +0000",
        ] {
            assert!(
                matches!(input.parse::<Signature>(), Err(Error::MalformedCommit(_))),
                "{:?} should not parse",
                input
            );
        }
    }

    #[test]
    fn test_when() {
        let signature =
            Signature::with_offset_minutes(TEST_NAME, TEST_EMAIL, TEST_TIMESTAMP, -300).unwrap();
        let when = signature.when().unwrap();
        assert_eq!(when.unix_timestamp(), TEST_TIMESTAMP);
        assert_eq!(when.offset().whole_hours(), -5);

        let again = Signature::from_datetime(TEST_NAME, TEST_EMAIL, when).unwrap();
        assert_eq!(again, signature);
    }

    #[test]
    fn test_now() {
        let signature = Signature::now(TEST_NAME, TEST_EMAIL).unwrap();
        assert!(signature.timestamp() > TEST_TIMESTAMP);
    }
}
