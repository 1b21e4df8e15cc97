//! ISO-8601 timestamp codec.
//!
//! Output is always `yyyy-MM-ddTHH:mm:ssZ`. Input accepts the common ISO-8601 shapes
//! (with or without offset, hour-only times and offsets, date-only, ordinal date,
//! year-month, year) but must start with a four digit year, so two digit years never
//! parse into surprising dates.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, SecondsFormat, TimeZone, Utc};

use crate::domain::ValidationError;

const OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%:z",
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%dT%H:%M%:z",
    "%Y-%m-%dT%H:%M%z",
];

const LOCAL_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

pub fn format_timestamp(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Secs, true)
}

pub fn parse_timestamp(field: &'static str, input: &str) -> Result<DateTime<Utc>, ValidationError> {
    let invalid = || ValidationError::InvalidTimestamp {
        field,
        input: input.to_owned(),
    };

    if !has_four_digit_year(input) {
        return Err(invalid());
    }

    let normalized = normalize(input);

    for format in OFFSET_FORMATS {
        if let Ok(parsed) = DateTime::<FixedOffset>::parse_from_str(&normalized, format) {
            return Ok(parsed.with_timezone(&Utc));
        }
    }
    for format in LOCAL_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(&normalized, format) {
            return Ok(Utc.from_utc_datetime(&parsed));
        }
    }

    let date = match normalized.len() {
        4 => NaiveDate::parse_from_str(&format!("{normalized}-01-01"), "%Y-%m-%d"),
        7 => NaiveDate::parse_from_str(&format!("{normalized}-01"), "%Y-%m-%d"),
        8 => NaiveDate::parse_from_str(&normalized, "%Y-%j"),
        _ => NaiveDate::parse_from_str(&normalized, "%Y-%m-%d"),
    }
    .map_err(|_| invalid())?;

    let midnight = date.and_hms_opt(0, 0, 0).ok_or_else(invalid)?;
    Ok(Utc.from_utc_datetime(&midnight))
}

pub fn parse_optional_timestamp(
    field: &'static str,
    input: Option<&str>,
) -> Result<Option<DateTime<Utc>>, ValidationError> {
    input.map(|value| parse_timestamp(field, value)).transpose()
}

/// Rewrite `Z`, `±hh` offsets and hour-only times into shapes chrono can parse:
/// `2011-10-10T12+11` becomes `2011-10-10T12:00+11:00`.
fn normalize(input: &str) -> String {
    let input = match input.strip_suffix(['Z', 'z']) {
        Some(stripped) => format!("{stripped}+00:00"),
        None => input.to_owned(),
    };
    let Some((date, time)) = input.split_once('T') else {
        return input;
    };

    let (clock, offset) = time.split_at(time.find(['+', '-']).unwrap_or(time.len()));
    let clock = if clock.len() == 2 {
        format!("{clock}:00")
    } else {
        clock.to_owned()
    };
    let offset = if offset.len() == 3 {
        format!("{offset}:00")
    } else {
        offset.to_owned()
    };
    format!("{date}T{clock}{offset}")
}

fn has_four_digit_year(input: &str) -> bool {
    input.len() >= 4 && input.as_bytes()[..4].iter().all(u8::is_ascii_digit)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(seconds: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(seconds, 0).unwrap()
    }

    #[test]
    fn accepts_iso8601_variants_and_normalizes_to_utc() {
        let cases = [
            ("2011-10-10T23:00:00+11:00", 1_318_248_000),
            ("2011-10-10T12:00:00Z", 1_318_248_000),
            ("2011-10-10T12:00:00+11:00", 1_318_208_400),
            ("2011-10-10T12:00:00-00:00", 1_318_248_000),
            ("2011-10-10T01:00:00-00:00", 1_318_208_400),
            ("2011-10-10T01:00-00:00", 1_318_208_400),
            ("2011-10-10T01:00:00-07:00", 1_318_233_600),
            ("2011-10-09T18:00:00-07:00", 1_318_208_400),
            ("2011-10-10T01:00:00", 1_318_208_400),
            ("2011-10-10T01:00", 1_318_208_400),
            ("2011-10-10T01:00:00.250Z", 1_318_208_400),
            ("2011-10-10T12:00:00+11", 1_318_208_400),
            ("2011-10-10T12:00:00+1100", 1_318_208_400),
            ("2011-10-10T12Z", 1_318_248_000),
            ("2011-10-10T23+11", 1_318_248_000),
            ("2011-10-10T12", 1_318_248_000),
            ("2011-283", 1_318_204_800),
            ("2011-10-10", 1_318_204_800),
            ("2011-10", 1_317_427_200),
        ];

        for (input, expected) in cases {
            let parsed = parse_timestamp("date_received", input)
                .unwrap_or_else(|err| panic!("failed on {input}: {err}"));
            assert_eq!(parsed.timestamp(), expected, "input: {input}");
        }
    }

    #[test]
    fn rejects_inputs_without_four_digit_year() {
        for input in [
            "",
            "-",
            "201",
            "Hello!",
            "11-10-10T12:00:00Z",
            "2011-13-45",
            "2011-10-10T1",
            "2011-10-10T12+1",
            "2011-400",
        ] {
            let err = parse_timestamp("scheduled", input).unwrap_err();
            assert_eq!(
                err,
                ValidationError::InvalidTimestamp {
                    field: "scheduled",
                    input: input.to_owned()
                },
                "input: {input:?}"
            );
        }
    }

    #[test]
    fn formats_without_fraction_in_utc() {
        let value = at(1_318_248_000) + chrono::Duration::milliseconds(999);
        assert_eq!(format_timestamp(&value), "2011-10-10T12:00:00Z");
    }

    #[test]
    fn optional_timestamps_pass_through_none() {
        assert_eq!(parse_optional_timestamp("scheduled", None), Ok(None));
        assert_eq!(
            parse_optional_timestamp("scheduled", Some("2011-10-10T12:00:00Z")),
            Ok(Some(at(1_318_248_000)))
        );
    }
}
