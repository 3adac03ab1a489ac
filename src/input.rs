//! Input handling: turning the configured input file into a stream of XML
//! document texts.

use std::fmt;
use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, Lines};
use std::path::Path;
use std::str::FromStr;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// How XML documents are packed into the input file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum InputStructure {
    /// The whole file is one XML document.
    OneXml,
    /// Every line of the file is a complete XML document.
    OneXmlByLine,
}

impl InputStructure {
    /// Configuration-file spelling of this mode.
    pub fn as_str(&self) -> &'static str {
        match self {
            InputStructure::OneXml => "one-xml",
            InputStructure::OneXmlByLine => "one-xml-by-line",
        }
    }
}

impl fmt::Display for InputStructure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InputStructure {
    type Err = String;

    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        match value {
            "one-xml" => Ok(InputStructure::OneXml),
            "one-xml-by-line" => Ok(InputStructure::OneXmlByLine),
            other => Err(format!(
                "unknown input structure '{}' (expected one-xml or one-xml-by-line)",
                other
            )),
        }
    }
}

/// Iterator over the XML document texts of one input file.
///
/// `OneXml` yields the whole file once. `OneXmlByLine` yields each line,
/// blank lines included, so sequence numbers stay aligned with line numbers
/// (a blank line is counted downstream as a parse failure, not skipped).
#[derive(Debug)]
pub struct DocumentReader {
    kind: ReaderKind,
}

#[derive(Debug)]
enum ReaderKind {
    Whole(Option<String>),
    PerLine(Lines<BufReader<File>>),
}

impl DocumentReader {
    /// Open the input file in the given structure mode.
    ///
    /// Whole-file mode reads eagerly, so both open and read errors surface
    /// here; line mode reads lazily and surfaces read errors from the
    /// iterator.
    pub fn open(path: &Path, structure: InputStructure) -> io::Result<Self> {
        let kind = match structure {
            InputStructure::OneXml => ReaderKind::Whole(Some(fs::read_to_string(path)?)),
            InputStructure::OneXmlByLine => {
                let file = File::open(path)?;
                ReaderKind::PerLine(BufReader::new(file).lines())
            }
        };
        Ok(Self { kind })
    }
}

impl Iterator for DocumentReader {
    type Item = io::Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        match &mut self.kind {
            ReaderKind::Whole(document) => document.take().map(Ok),
            ReaderKind::PerLine(lines) => lines.next(),
        }
    }
}
