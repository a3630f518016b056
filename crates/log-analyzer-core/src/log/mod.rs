mod locator;
mod parser;
mod reader;

pub use locator::{LogDate, LogFile, LogLocator};
pub use parser::{LineParser, ParsedRecord, parse_line};
pub use reader::{LogLines, LogReader};
