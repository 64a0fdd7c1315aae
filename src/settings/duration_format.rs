//! Serde support for humane duration values in settings files.
//!
//! Accepted representations:
//!
//! - a bare non-negative integer, interpreted as milliseconds: `250`
//! - a string of a decimal number with a unit suffix: `"30s"`, `"250ms"`,
//!   `"1.5m"`, `"100us"`, `"500ns"`, `"2h"`
//!
//! Values are carried as [`std::time::Duration`], i.e. with nanosecond
//! precision; nothing is truncated on the way to the builder.

use serde::de::{Deserialize, Deserializer, Error};
use std::time::Duration;

const NANOS_PER_MILLI: u64 = 1_000_000;
const NANOS_PER_SEC: u64 = 1_000_000_000;

pub(crate) fn deserialize<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Millis(u64),
        Text(String),
    }

    match Option::<Repr>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Repr::Millis(ms)) => ms
            .checked_mul(NANOS_PER_MILLI)
            .map(|nanos| Some(Duration::from_nanos(nanos)))
            .ok_or_else(|| D::Error::custom(format!("duration out of range: '{ms}'"))),
        Some(Repr::Text(s)) => parse(&s).map(Some).map_err(D::Error::custom),
    }
}

/// Parses a duration string of the form `<number><unit>`.
pub(crate) fn parse(input: &str) -> Result<Duration, String> {
    let s = input.trim();
    let split = s
        .find(|c: char| !c.is_ascii_digit() && c != '.')
        .unwrap_or(s.len());
    let (number, unit) = s.split_at(split);
    if number.is_empty() {
        return Err(format!("not a duration: '{input}'"));
    }

    let unit_nanos: u64 = match unit.trim() {
        "ns" => 1,
        "us" | "µs" => 1_000,
        "" | "ms" => NANOS_PER_MILLI,
        "s" => NANOS_PER_SEC,
        "m" => 60 * NANOS_PER_SEC,
        "h" => 3_600 * NANOS_PER_SEC,
        other => return Err(format!("unsupported duration unit '{other}' in '{input}'")),
    };

    // integers stay exact, fractions go through f64
    if let Ok(n) = number.parse::<u64>() {
        n.checked_mul(unit_nanos)
            .map(Duration::from_nanos)
            .ok_or_else(|| format!("duration out of range: '{input}'"))
    } else {
        let f: f64 = number
            .parse()
            .map_err(|_| format!("not a duration: '{input}'"))?;
        #[allow(clippy::cast_precision_loss, clippy::cast_sign_loss)]
        #[allow(clippy::cast_possible_truncation)]
        Ok(Duration::from_nanos((f * unit_nanos as f64).round() as u64))
    }
}

#[cfg(test)]
mod test {
    use super::parse;
    use std::time::Duration;

    #[test]
    fn test_parse_units() {
        assert_eq!(parse("500ns").unwrap(), Duration::from_nanos(500));
        assert_eq!(parse("100us").unwrap(), Duration::from_micros(100));
        assert_eq!(parse("250ms").unwrap(), Duration::from_millis(250));
        assert_eq!(parse("30s").unwrap(), Duration::from_secs(30));
        assert_eq!(parse("2m").unwrap(), Duration::from_secs(120));
        assert_eq!(parse("1h").unwrap(), Duration::from_secs(3_600));
        assert_eq!(parse("250").unwrap(), Duration::from_millis(250));
    }

    #[test]
    fn test_parse_fractional() {
        assert_eq!(parse("1.5s").unwrap(), Duration::from_millis(1_500));
        assert_eq!(parse("0.5m").unwrap(), Duration::from_secs(30));
    }

    #[test]
    fn test_sub_second_precision_is_kept() {
        // the original integration layer truncated sub-second parts
        assert_eq!(
            parse("2.000000001s").unwrap(),
            Duration::new(2, 1),
            "nanosecond part must survive"
        );
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse("fast").is_err());
        assert!(parse("5 parsecs").is_err());
        assert!(parse("").is_err());
    }

    #[test]
    fn test_out_of_range_millis_value_is_rejected() {
        #[derive(Debug, Deserialize)]
        struct S {
            #[serde(default, deserialize_with = "super::deserialize")]
            t: Option<Duration>,
        }

        // more nanoseconds than u64 can hold, e.g. a pasted epoch-nanos value
        let err = serde_json::from_str::<S>(r#"{"t": 18446744073710}"#).unwrap_err();
        assert!(err.to_string().contains("duration out of range"));

        let ok: S = serde_json::from_str(r#"{"t": 250}"#).unwrap();
        assert_eq!(ok.t, Some(Duration::from_millis(250)));
    }
}
