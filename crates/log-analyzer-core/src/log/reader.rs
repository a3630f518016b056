use crate::Result;
use flate2::read::MultiGzDecoder;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::iter::FusedIterator;
use std::path::Path;

pub struct LogReader;

impl LogReader {
    /// Open a log file for line-by-line reading
    ///
    /// `compressed` files are gunzipped on the fly; the locator sets the flag
    /// from the file name.
    pub fn open(path: &Path, compressed: bool) -> Result<LogLines> {
        tracing::debug!("Opening log file: {}", path.display());

        let file = File::open(path)?;
        let reader: Box<dyn BufRead> = if compressed {
            tracing::debug!("Reading {} through gzip", path.display());
            Box::new(BufReader::new(MultiGzDecoder::new(file)))
        } else {
            Box::new(BufReader::new(file))
        };

        Ok(LogLines {
            reader: Some(reader),
            buf: Vec::new(),
        })
    }
}

/// Lines of an open log file
///
/// Owns the file handle; it is closed as soon as the input is exhausted, a
/// read fails, or the iterator is dropped. Line terminators are stripped and
/// invalid UTF-8 is replaced rather than rejected.
pub struct LogLines {
    reader: Option<Box<dyn BufRead>>,
    buf: Vec<u8>,
}

impl Iterator for LogLines {
    type Item = io::Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        let reader = self.reader.as_mut()?;
        self.buf.clear();

        match reader.read_until(b'\n', &mut self.buf) {
            Ok(0) => {
                self.reader = None;
                None
            }
            Ok(_) => {
                if self.buf.last() == Some(&b'\n') {
                    self.buf.pop();
                    if self.buf.last() == Some(&b'\r') {
                        self.buf.pop();
                    }
                }
                Some(Ok(String::from_utf8_lossy(&self.buf).into_owned()))
            }
            Err(e) => {
                self.reader = None;
                Some(Err(e))
            }
        }
    }
}

impl FusedIterator for LogLines {}
