//! Answer log import and export in the quiz server's CSV export format.
//!
//! The header names the columns; their order is free and unknown columns are
//! ignored. `user`, `place_asked` and `inserted` are required,
//! `place_answered` is empty when the user skipped the question, and
//! `response_time` and `number_of_options` default to 0 when absent.

use std::{fs::File, io, path::Path};

use anyhow::Context as _;
use chrono::{DateTime, NaiveDateTime, Utc};
use csv::{ReaderBuilder, StringRecord, Trim, Writer};
use geoskill_rating::{AnswerEvent, PlaceId, Timestamp, UserId};

/// Column list written by [`write_answers`].
pub(crate) const HEADER: [&str; 10] = [
    "id",
    "user",
    "place_asked",
    "place_answered",
    "type",
    "inserted",
    "response_time",
    "number_of_options",
    "place_map",
    "ip_address",
];

const DATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Question type for "find the place on the map".
const TYPE_OPEN: u8 = 1;
/// Question type for "pick one of the highlighted places".
const TYPE_CHOICE: u8 = 2;

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub(crate) enum CsvError {
    #[display("input has no header line")]
    MissingHeader,
    #[display("header has no `{column}` column")]
    MissingColumn { column: &'static str },
    #[display("line {line}: {reason}")]
    InvalidRow { line: u64, reason: String },
    #[display("failed to read line {line}")]
    Read { line: u64, source: csv::Error },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Columns {
    user: usize,
    place_asked: usize,
    inserted: usize,
    place_answered: Option<usize>,
    response_time: Option<usize>,
    number_of_options: Option<usize>,
}

impl Columns {
    fn from_header(header: &StringRecord) -> Result<Self, CsvError> {
        if header.is_empty() {
            return Err(CsvError::MissingHeader);
        }
        let find = |column: &str| header.iter().position(|name| name == column);
        let require =
            |column: &'static str| find(column).ok_or(CsvError::MissingColumn { column });
        Ok(Self {
            user: require("user")?,
            place_asked: require("place_asked")?,
            inserted: require("inserted")?,
            place_answered: find("place_answered"),
            response_time: find("response_time"),
            number_of_options: find("number_of_options"),
        })
    }

    fn parse_row(&self, line: u64, record: &StringRecord) -> Result<AnswerEvent, CsvError> {
        let invalid = |reason: String| CsvError::InvalidRow { line, reason };
        let required = |index: usize, column: &str| {
            record
                .get(index)
                .filter(|value| !value.is_empty())
                .ok_or_else(|| invalid(format!("missing value for `{column}`")))
        };
        let optional = |index: Option<usize>| {
            index
                .and_then(|index| record.get(index))
                .filter(|value| !value.is_empty())
        };
        let number = |value: &str, column: &str| {
            value
                .parse::<u64>()
                .map_err(|e| invalid(format!("invalid `{column}` value {value:?}: {e}")))
        };
        let narrow = |value: u64, column: &str| {
            u32::try_from(value).map_err(|e| invalid(format!("`{column}` value {value}: {e}")))
        };

        let user = narrow(number(required(self.user, "user")?, "user")?, "user")?;
        let place = narrow(
            number(required(self.place_asked, "place_asked")?, "place_asked")?,
            "place_asked",
        )?;
        let answered = optional(self.place_answered)
            .map(|value| narrow(number(value, "place_answered")?, "place_answered"))
            .transpose()?;
        let response_time_ms = optional(self.response_time)
            .map(|value| number(value, "response_time"))
            .transpose()?
            .unwrap_or(0);
        let option_count = optional(self.number_of_options)
            .map(|value| narrow(number(value, "number_of_options")?, "number_of_options"))
            .transpose()?
            .unwrap_or(0);
        let inserted = required(self.inserted, "inserted")?;
        let timestamp = parse_timestamp(inserted)
            .ok_or_else(|| invalid(format!("invalid `inserted` timestamp {inserted:?}")))?;

        Ok(AnswerEvent::new(
            UserId(user),
            PlaceId(place),
            answered.map(PlaceId),
            option_count,
            response_time_ms,
            timestamp,
        ))
    }
}

/// Parses `YYYY-MM-DD HH:MM:SS` (optionally with fractional seconds) as UTC,
/// or an RFC 3339 timestamp with any offset.
fn parse_timestamp(value: &str) -> Option<Timestamp> {
    NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S%.f")
        .map(|naive| naive.and_utc())
        .or_else(|_| DateTime::parse_from_rfc3339(value).map(|time| time.with_timezone(&Utc)))
        .ok()
}

/// Reads answer events from `reader`.
///
/// Fields may be quoted, so values such as IP address lists can contain
/// commas. With `skip_invalid`, rows that cannot be parsed are logged and
/// dropped instead of failing the whole import. Header problems always fail.
pub(crate) fn parse_answers<R>(reader: R, skip_invalid: bool) -> Result<Vec<AnswerEvent>, CsvError>
where
    R: io::Read,
{
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);
    let columns = Columns::from_header(
        reader
            .headers()
            .map_err(|source| CsvError::Read { line: 1, source })?,
    )?;

    let mut events = vec![];
    let mut skipped = 0_usize;
    for (fallback_line, record) in (2_u64..).zip(reader.records()) {
        let record = record.map_err(|source| CsvError::Read {
            line: source
                .position()
                .map_or(fallback_line, csv::Position::line),
            source,
        })?;
        let line = record
            .position()
            .map_or(fallback_line, csv::Position::line);
        match columns.parse_row(line, &record) {
            Ok(event) => events.push(event),
            Err(err) if skip_invalid => {
                tracing::warn!(line, %err, "skipping invalid answer row");
                skipped += 1;
            }
            Err(err) => return Err(err),
        }
    }
    if skipped > 0 {
        tracing::warn!(skipped, "some answer rows were skipped");
    }
    Ok(events)
}

pub(crate) fn read_answers<P>(path: P, skip_invalid: bool) -> anyhow::Result<Vec<AnswerEvent>>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("Failed to open answers file: {}", path.display()))?;
    let events = parse_answers(io::BufReader::new(file), skip_invalid)
        .with_context(|| format!("Failed to parse answers file: {}", path.display()))?;
    tracing::info!(answers = events.len(), path = %path.display(), "answers loaded");
    Ok(events)
}

/// Writes `events` with [`HEADER`], numbering rows from 1.
pub(crate) fn write_answers<W>(writer: W, events: &[AnswerEvent]) -> csv::Result<()>
where
    W: io::Write,
{
    let mut writer = Writer::from_writer(writer);
    writer.write_record(HEADER)?;
    for (index, event) in events.iter().enumerate() {
        let answered = event
            .answered
            .map(|place| place.to_string())
            .unwrap_or_default();
        let question_type = if event.option_count == 0 {
            TYPE_OPEN
        } else {
            TYPE_CHOICE
        };
        writer.write_record([
            (index + 1).to_string(),
            event.user.to_string(),
            event.place.to_string(),
            answered,
            question_type.to_string(),
            event.timestamp.format(DATE_TIME_FORMAT).to_string(),
            event.response_time_ms.to_string(),
            event.option_count.to_string(),
            String::new(),
            String::new(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone as _;

    use super::*;

    fn parse(input: &str, skip_invalid: bool) -> Result<Vec<AnswerEvent>, CsvError> {
        parse_answers(input.as_bytes(), skip_invalid)
    }

    #[test]
    fn test_parse_export() {
        let input = "\
id,user,place_asked,place_answered,type,inserted,response_time,number_of_options,place_map,ip_address
1,7,51,51,1,2013-11-15 09:12:03,2841,0,,10.0.0.1
2,7,60,,2,2013-11-15 09:12:09,11003,4,,10.0.0.1
";
        let events = parse(input, false).unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].user, UserId(7));
        assert_eq!(events[0].answered, Some(PlaceId(51)));
        assert!(events[0].is_correct());
        assert_eq!(events[0].response_time_ms, 2841);
        assert_eq!(
            events[0].timestamp,
            Utc.with_ymd_and_hms(2013, 11, 15, 9, 12, 3).unwrap()
        );
        assert_eq!(events[1].answered, None);
        assert_eq!(events[1].option_count, 4);
        assert!(!events[1].is_correct());
    }

    #[test]
    fn test_quoted_field_may_contain_commas() {
        let input = "\
id,ip_address,user,place_asked,inserted
1,\"10.0.0.1, 10.0.0.2\",7,51,2013-11-15 09:12:03
2,\"10.0.0.3\",8,\"52\",2013-11-15 09:12:04
";
        let events = parse(input, false).unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].user, UserId(7));
        assert_eq!(events[0].place, PlaceId(51));
        assert_eq!(
            events[0].timestamp,
            Utc.with_ymd_and_hms(2013, 11, 15, 9, 12, 3).unwrap()
        );
        assert_eq!(events[1].user, UserId(8));
        assert_eq!(events[1].place, PlaceId(52));
    }

    #[test]
    fn test_columns_in_any_order() {
        let input = "inserted,place_asked,user,extra\n2014-01-02T03:04:05+01:00,9,3,x\n";
        let events = parse(input, false).unwrap();
        assert_eq!(events[0].user, UserId(3));
        assert_eq!(events[0].place, PlaceId(9));
        assert_eq!(events[0].answered, None);
        assert_eq!(events[0].option_count, 0);
        assert_eq!(
            events[0].timestamp,
            Utc.with_ymd_and_hms(2014, 1, 2, 2, 4, 5).unwrap()
        );
    }

    #[test]
    fn test_missing_column() {
        let err = parse("id,user,inserted\n", false).unwrap_err();
        assert!(matches!(
            err,
            CsvError::MissingColumn {
                column: "place_asked"
            }
        ));
        assert!(matches!(parse("", false), Err(CsvError::MissingHeader)));
    }

    #[test]
    fn test_invalid_row_is_line_numbered() {
        let input = "user,place_asked,inserted\n1,2,2014-01-01 00:00:00\n,2,2014-01-01 00:00:01\n";
        let err = parse(input, false).unwrap_err();
        assert!(matches!(err, CsvError::InvalidRow { line: 3, .. }));
        assert_eq!(err.to_string(), "line 3: missing value for `user`");
    }

    #[test]
    fn test_short_row_is_invalid() {
        let input = "user,place_asked,inserted\n1,2\n";
        let err = parse(input, false).unwrap_err();
        assert_eq!(err.to_string(), "line 2: missing value for `inserted`");
    }

    #[test]
    fn test_skip_invalid_rows() {
        let input = "\
user,place_asked,inserted
1,2,2014-01-01 00:00:00
1,2,yesterday
x,2,2014-01-01 00:00:02
1,3,2014-01-01 00:00:03
";
        let events = parse(input, true).unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[1].place, PlaceId(3));
    }

    #[test]
    fn test_written_log_reads_back() {
        let events = vec![
            AnswerEvent::new(
                UserId(1),
                PlaceId(4),
                Some(PlaceId(4)),
                0,
                1500,
                Utc.with_ymd_and_hms(2014, 2, 1, 12, 0, 0).unwrap(),
            ),
            AnswerEvent::new(
                UserId(2),
                PlaceId(5),
                None,
                6,
                9000,
                Utc.with_ymd_and_hms(2014, 2, 1, 12, 0, 30).unwrap(),
            ),
        ];
        let mut buffer = vec![];
        write_answers(&mut buffer, &events).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert!(text.starts_with(&HEADER.join(",")));
        assert!(text.contains("2,2,5,,2,2014-02-01 12:00:30,9000,6,,"));
        assert_eq!(parse(&text, false).unwrap(), events);
    }
}
