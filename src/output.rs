//! Simple Output and Reporting
//!
//! This module provides console formatting for extraction results. The
//! flattened table itself goes to the output file; everything here is the
//! human-facing run summary.

use atty;

use crate::cli::VerbosityLevel;
use crate::engine::{DocumentOutcome, DocumentStatus, ExtractionResults};

/// Simple output formatter for human-readable results
pub struct Output {
    verbosity: VerbosityLevel,
    show_colors: bool,
}

impl Output {
    pub fn new(verbosity: VerbosityLevel) -> Self {
        Self {
            verbosity,
            show_colors: atty::is(atty::Stream::Stdout),
        }
    }

    #[cfg(test)]
    fn without_colors(verbosity: VerbosityLevel) -> Self {
        Self {
            verbosity,
            show_colors: false,
        }
    }

    fn colorize(&self, text: &str, color: &str) -> String {
        if self.show_colors {
            format!("\x1b[{}m{}\x1b[0m", color, text)
        } else {
            text.to_string()
        }
    }

    pub fn format_results(&self, results: &ExtractionResults) -> String {
        let mut output = String::new();

        match self.verbosity {
            VerbosityLevel::Quiet => {
                if results.counters.has_failures() {
                    output.push_str(&format!(
                        "Parse failures: {} Not found: {}\n",
                        results.counters.parse_failures, results.counters.not_found
                    ));
                }
            }
            VerbosityLevel::Normal | VerbosityLevel::Verbose | VerbosityLevel::Debug => {
                output.push_str(&self.format_summary(results));
                output.push('\n');

                if self.verbosity >= VerbosityLevel::Verbose {
                    for outcome in results.failures() {
                        output.push_str(&self.format_outcome(outcome));
                        output.push('\n');
                    }
                }

                if self.verbosity == VerbosityLevel::Debug {
                    output.push_str(&self.format_debug_info(results));
                }
            }
        }

        output
    }

    pub fn format_outcome(&self, outcome: &DocumentOutcome) -> String {
        match &outcome.status {
            DocumentStatus::Extracted { columns } => {
                format!(
                    "{}  document {} - {} column{}",
                    self.colorize("✓ EXTRACTED", "32"),
                    outcome.sequence,
                    columns,
                    if *columns == 1 { "" } else { "s" }
                )
            }
            DocumentStatus::ParseFailed { message } => {
                format!(
                    "{}  document {} - {}",
                    self.colorize("✗ PARSE FAILED", "31"),
                    outcome.sequence,
                    message
                )
            }
            DocumentStatus::NoRecordElement => {
                format!(
                    "{}  document {} - no candidate path matched",
                    self.colorize("- NO RECORD", "36"),
                    outcome.sequence
                )
            }
        }
    }

    fn format_summary(&self, results: &ExtractionResults) -> String {
        let counters = &results.counters;
        let mut output = String::new();
        output.push_str("Flattening Summary:\n");
        output.push_str(&format!("  Documents: {}\n", counters.total));
        output.push_str(&format!(
            "  {} {}\n",
            self.colorize("Extracted:", "32"),
            counters.extracted
        ));

        if counters.parse_failures > 0 {
            output.push_str(&format!(
                "  {} {}\n",
                self.colorize("Parse failures:", "31"),
                counters.parse_failures
            ));
        }
        if counters.not_found > 0 {
            output.push_str(&format!(
                "  {} {}\n",
                self.colorize("No record element:", "36"),
                counters.not_found
            ));
        }

        output.push_str(&format!("  Columns: {}\n", results.schema.len()));

        if !counters.is_consistent() {
            output.push_str(&format!(
                "  {} outcome counts do not sum to the document total\n",
                self.colorize("Warning:", "33")
            ));
        }

        output
    }

    fn format_debug_info(&self, results: &ExtractionResults) -> String {
        let mut output = String::new();
        output.push_str("\nDiscovered Columns:\n");
        for (i, name) in results.schema.iter().enumerate() {
            output.push_str(&format!("    {}: {}\n", i, name));
        }
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{ColumnSchema, RunCounters};

    fn results_with(counters: RunCounters, outcomes: Vec<DocumentOutcome>) -> ExtractionResults {
        let mut schema = ColumnSchema::new();
        schema.intern("rownum");
        schema.intern("entry.word");
        ExtractionResults {
            schema,
            rows: Vec::new(),
            outcomes,
            counters,
        }
    }

    fn mixed_results() -> ExtractionResults {
        results_with(
            RunCounters {
                total: 3,
                extracted: 1,
                parse_failures: 1,
                not_found: 1,
            },
            vec![
                DocumentOutcome {
                    sequence: 1,
                    status: DocumentStatus::Extracted { columns: 2 },
                },
                DocumentOutcome {
                    sequence: 2,
                    status: DocumentStatus::ParseFailed {
                        message: "unexpected end of stream".to_string(),
                    },
                },
                DocumentOutcome {
                    sequence: 3,
                    status: DocumentStatus::NoRecordElement,
                },
            ],
        )
    }

    #[test]
    fn test_normal_summary() {
        let output = Output::without_colors(VerbosityLevel::Normal);
        let formatted = output.format_results(&mixed_results());

        assert!(formatted.contains("Flattening Summary:"));
        assert!(formatted.contains("Documents: 3"));
        assert!(formatted.contains("Extracted: 1"));
        assert!(formatted.contains("Parse failures: 1"));
        assert!(formatted.contains("No record element: 1"));
        assert!(formatted.contains("Columns: 2"));
        // Per-document lines only appear at verbose level
        assert!(!formatted.contains("document 2"));
    }

    #[test]
    fn test_verbose_lists_failed_documents() {
        let output = Output::without_colors(VerbosityLevel::Verbose);
        let formatted = output.format_results(&mixed_results());

        assert!(formatted.contains("✗ PARSE FAILED"));
        assert!(formatted.contains("document 2 - unexpected end of stream"));
        assert!(formatted.contains("- NO RECORD"));
        assert!(formatted.contains("document 3"));
        // Successful documents are not listed
        assert!(!formatted.contains("✓ EXTRACTED"));
    }

    #[test]
    fn test_quiet_reports_only_failures() {
        let output = Output::without_colors(VerbosityLevel::Quiet);
        let formatted = output.format_results(&mixed_results());
        assert_eq!(formatted, "Parse failures: 1 Not found: 1\n");

        let clean = results_with(
            RunCounters {
                total: 2,
                extracted: 2,
                parse_failures: 0,
                not_found: 0,
            },
            Vec::new(),
        );
        assert_eq!(output.format_results(&clean), "");
    }

    #[test]
    fn test_clean_summary_omits_failure_lines() {
        let output = Output::without_colors(VerbosityLevel::Normal);
        let clean = results_with(
            RunCounters {
                total: 2,
                extracted: 2,
                parse_failures: 0,
                not_found: 0,
            },
            Vec::new(),
        );
        let formatted = output.format_results(&clean);

        assert!(formatted.contains("Extracted: 2"));
        assert!(!formatted.contains("Parse failures:"));
        assert!(!formatted.contains("No record element:"));
        assert!(!formatted.contains("Warning:"));
    }

    #[test]
    fn test_inconsistent_counters_add_a_warning() {
        let output = Output::without_colors(VerbosityLevel::Normal);
        let drifted = results_with(
            RunCounters {
                total: 5,
                extracted: 3,
                parse_failures: 0,
                not_found: 1,
            },
            Vec::new(),
        );
        let formatted = output.format_results(&drifted);

        assert!(formatted.contains("Warning:"));
        assert!(formatted.contains("do not sum"));
    }

    #[test]
    fn test_debug_lists_discovered_columns() {
        let output = Output::without_colors(VerbosityLevel::Debug);
        let formatted = output.format_results(&mixed_results());

        assert!(formatted.contains("Discovered Columns:"));
        assert!(formatted.contains("0: rownum"));
        assert!(formatted.contains("1: entry.word"));
    }

    #[test]
    fn test_extracted_outcome_formatting() {
        let output = Output::without_colors(VerbosityLevel::Normal);
        let outcome = DocumentOutcome {
            sequence: 7,
            status: DocumentStatus::Extracted { columns: 1 },
        };
        let formatted = output.format_outcome(&outcome);
        assert!(formatted.contains("document 7 - 1 column"));
        assert!(!formatted.contains("columns"));
    }
}
