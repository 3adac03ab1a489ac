//! Extraction engine: drives parse, locate and flatten over a stream of
//! document texts and accumulates the resulting table.
//!
//! Documents are processed strictly in input order, one at a time. The
//! engine owns all run state: the growing column schema, the accumulated
//! rows, per-document outcomes and the run counters. Malformed XML and
//! unmatched documents are counted and skipped; only stream I/O errors
//! abort a run.

use std::io::{self, Write};

use roxmltree::Document;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::emit;
use crate::error::Result;
use crate::flatten::flatten;
use crate::locator::{RecordPath, locate};
use crate::schema::{ColumnSchema, Row, RunCounters};

/// Outcome of processing one input document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentStatus {
    /// The document produced a row with this many stored columns.
    Extracted { columns: usize },
    /// The document was not well-formed XML.
    ParseFailed { message: String },
    /// The document was well-formed but no candidate path matched.
    NoRecordElement,
}

impl DocumentStatus {
    /// Check if the document produced a row.
    pub fn is_extracted(&self) -> bool {
        matches!(self, DocumentStatus::Extracted { .. })
    }

    /// Check if the document failed to parse.
    pub fn is_parse_failure(&self) -> bool {
        matches!(self, DocumentStatus::ParseFailed { .. })
    }

    /// Check if no candidate path matched the document.
    pub fn is_not_found(&self) -> bool {
        matches!(self, DocumentStatus::NoRecordElement)
    }
}

/// Status of one document plus its position in the input stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentOutcome {
    /// 1-based position in the input stream.
    pub sequence: u64,
    /// What became of the document.
    pub status: DocumentStatus,
}

/// Accumulating driver for one extraction run.
#[derive(Debug)]
pub struct ExtractionEngine {
    paths: Vec<RecordPath>,
    schema: ColumnSchema,
    rows: Vec<Row>,
    outcomes: Vec<DocumentOutcome>,
    counters: RunCounters,
}

impl ExtractionEngine {
    /// Create an engine that locates records with the given candidate
    /// paths, in priority order.
    pub fn new(paths: Vec<RecordPath>) -> Self {
        Self {
            paths,
            schema: ColumnSchema::new(),
            rows: Vec::new(),
            outcomes: Vec::new(),
            counters: RunCounters::new(),
        }
    }

    /// Process one document text, recording its outcome and, on success,
    /// appending a row. The sequence number is the document's 1-based
    /// position in the input stream, failed documents included.
    pub fn process_document(&mut self, xml: &str) -> DocumentStatus {
        self.counters.total += 1;
        let sequence = self.counters.total;

        let status = match Document::parse(xml) {
            Err(error) => {
                self.counters.parse_failures += 1;
                debug!(sequence, %error, "document is not well-formed XML");
                DocumentStatus::ParseFailed {
                    message: error.to_string(),
                }
            }
            Ok(document) => match locate(&document, &self.paths) {
                None => {
                    self.counters.not_found += 1;
                    debug!(sequence, "no record element matched");
                    DocumentStatus::NoRecordElement
                }
                Some(elements) => {
                    let row = flatten(&elements, sequence, &mut self.schema);
                    let columns = row.len();
                    debug!(sequence, columns, "document flattened");
                    self.rows.push(row);
                    self.counters.extracted += 1;
                    DocumentStatus::Extracted { columns }
                }
            },
        };

        self.outcomes.push(DocumentOutcome {
            sequence,
            status: status.clone(),
        });
        status
    }

    /// Drive the engine over a stream of document units. Stream I/O errors
    /// are fatal and abort the run; per-document XML problems are counted
    /// and skipped.
    pub fn run<I>(&mut self, units: I) -> Result<()>
    where
        I: IntoIterator<Item = io::Result<String>>,
    {
        for unit in units {
            let xml = unit?;
            self.process_document(&xml);
        }
        Ok(())
    }

    /// Counters so far.
    pub fn counters(&self) -> &RunCounters {
        &self.counters
    }

    /// Schema discovered so far.
    pub fn schema(&self) -> &ColumnSchema {
        &self.schema
    }

    /// Conclude the run: check counter consistency (a mismatch is reported,
    /// never fatal) and hand over the accumulated table.
    pub fn finish(self) -> ExtractionResults {
        if !self.counters.is_consistent() {
            warn!(
                total = self.counters.total,
                extracted = self.counters.extracted,
                parse_failures = self.counters.parse_failures,
                not_found = self.counters.not_found,
                "document counters do not add up"
            );
        }
        ExtractionResults {
            schema: self.schema,
            rows: self.rows,
            outcomes: self.outcomes,
            counters: self.counters,
        }
    }
}

/// Everything one run produced: the final schema, the rows in append order,
/// per-document outcomes and the closing counters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionResults {
    /// Final column schema in discovery order.
    pub schema: ColumnSchema,
    /// Accumulated rows in append order.
    pub rows: Vec<Row>,
    /// Per-document outcomes in input order.
    pub outcomes: Vec<DocumentOutcome>,
    /// Closing counters.
    pub counters: RunCounters,
}

impl ExtractionResults {
    /// Write the flattened table to `writer`.
    pub fn write_table<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        emit::write_table(writer, &self.schema, &self.rows)
    }

    /// Render the flattened table to a string.
    pub fn render_table(&self) -> String {
        emit::render_table(&self.schema, &self.rows)
    }

    /// Whether every document produced a row.
    pub fn all_extracted(&self) -> bool {
        self.counters.extracted == self.counters.total
    }

    /// Outcomes of documents that produced no row, in input order.
    pub fn failures(&self) -> impl Iterator<Item = &DocumentOutcome> {
        self.outcomes
            .iter()
            .filter(|outcome| !outcome.status.is_extracted())
    }
}
