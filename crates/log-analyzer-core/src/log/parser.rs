use crate::{Error, Result};
use lazy_static::lazy_static;
use regex::Regex;
use rust_decimal::Decimal;
use std::io;
use std::iter::FusedIterator;
use std::str::FromStr;

lazy_static! {
    // remote_addr remote_user  http_x_real_ip [time_local] "request" status ... request_time
    static ref LINE_PATTERN: Regex =
        Regex::new(r#"^\S* \S*  - \[.+\] "\S* (\S*) HT.+" ([0-9]{3}) .* (\S*)$"#).unwrap();
}

const SUCCESS_STATUS: &str = "200";

/// Upper bound on a plausible request time, one day in seconds
const MAX_REQUEST_SECONDS: u32 = 86_400;

/// URL and upstream response time of one successful request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedRecord {
    pub url: String,
    pub request_time: Decimal,
}

/// Parse a single access log line
///
/// Returns `None` unless the line matches the access log format, carries
/// status 200, and ends in a decimal request time between zero and one day.
pub fn parse_line(line: &str) -> Option<ParsedRecord> {
    let captures = LINE_PATTERN.captures(line)?;
    if &captures[2] != SUCCESS_STATUS {
        return None;
    }
    let request_time = Decimal::from_str(&captures[3]).ok()?;
    if request_time.is_sign_negative() || request_time > Decimal::from(MAX_REQUEST_SECONDS) {
        return None;
    }

    Some(ParsedRecord {
        url: captures[1].to_string(),
        request_time,
    })
}

/// Lazily turns raw log lines into [`ParsedRecord`]s
///
/// Lines that fail [`parse_line`] are counted and skipped. Once the input is
/// exhausted the parser yields one final [`Error::Unparsable`] if the failed
/// lines outnumber half of the parsed ones. A read error is yielded as-is and
/// ends the sequence.
pub struct LineParser<I> {
    lines: I,
    parsed: usize,
    errors: usize,
    finished: bool,
}

impl<I> LineParser<I>
where
    I: Iterator<Item = io::Result<String>>,
{
    pub fn new(lines: I) -> Self {
        Self {
            lines,
            parsed: 0,
            errors: 0,
            finished: false,
        }
    }

    /// Number of lines yielded so far
    pub fn parsed(&self) -> usize {
        self.parsed
    }

    /// Number of lines rejected so far
    pub fn errors(&self) -> usize {
        self.errors
    }

    fn verdict(&self) -> Option<Result<ParsedRecord>> {
        tracing::info!(
            "Parsing complete: {} lines parsed, {} rejected",
            self.parsed,
            self.errors
        );

        if self.errors > self.parsed / 2 {
            tracing::error!(
                "Log is unparsable: {} of {} lines rejected",
                self.errors,
                self.parsed + self.errors
            );
            return Some(Err(Error::Unparsable {
                errors: self.errors,
                parsed: self.parsed,
            }));
        }

        None
    }
}

impl<I> Iterator for LineParser<I>
where
    I: Iterator<Item = io::Result<String>>,
{
    type Item = Result<ParsedRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        loop {
            match self.lines.next() {
                Some(Ok(line)) => match parse_line(&line) {
                    Some(record) => {
                        self.parsed += 1;
                        return Some(Ok(record));
                    }
                    None => {
                        self.errors += 1;
                        tracing::trace!("Rejected line: {}", line);
                    }
                },
                Some(Err(e)) => {
                    self.finished = true;
                    return Some(Err(e.into()));
                }
                None => {
                    self.finished = true;
                    return self.verdict();
                }
            }
        }
    }
}

impl<I> FusedIterator for LineParser<I> where I: Iterator<Item = io::Result<String>> {}
