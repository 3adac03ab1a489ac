//! Record location: find the elements of a document that hold one record's
//! data by trying a prioritized list of candidate structural paths.
//!
//! Paths are parsed once at startup; namespace prefixes resolve against the
//! configured alias table at parse time, so evaluation never fails. The
//! first candidate with at least one match wins and later candidates are not
//! consulted, even if they would match a different record shape.

use indexmap::IndexMap;
use roxmltree::{Document, Node};
use tracing::trace;

use crate::error::{PathError, PathResult};

/// One resolved segment of a record path: an optional namespace URI plus a
/// local element name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathSegment {
    namespace: Option<String>,
    name: String,
}

impl PathSegment {
    /// Whether an element's expanded tag name matches this segment.
    ///
    /// An unqualified segment matches only elements without a namespace.
    fn matches(&self, node: Node) -> bool {
        let tag = node.tag_name();
        tag.name() == self.name && tag.namespace() == self.namespace.as_deref()
    }

    /// Namespace URI this segment requires, if any.
    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// Local element name this segment requires.
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// A candidate structural path, parsed once with its namespace prefixes
/// already resolved to URIs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordPath {
    expression: String,
    segments: Vec<PathSegment>,
}

impl RecordPath {
    /// Parse an XPath-like expression such as `./tei:body/tei:entry/`.
    ///
    /// The expression is split on `/`; empty segments and `.` segments are
    /// no-ops, so `./a/`, `./a` and `a` are equivalent. A `prefix:name`
    /// segment resolves `prefix` through the alias table and fails on an
    /// unknown alias. An expression with no name segments addresses the
    /// document root element itself.
    pub fn parse(expression: &str, namespaces: &IndexMap<String, String>) -> PathResult<Self> {
        if expression.trim().is_empty() {
            return Err(PathError::Empty);
        }

        let mut segments = Vec::new();
        for segment in expression.split('/') {
            if segment.is_empty() || segment == "." {
                continue;
            }
            if let Some((prefix, name)) = segment.split_once(':') {
                let namespace =
                    namespaces
                        .get(prefix)
                        .ok_or_else(|| PathError::UnknownPrefix {
                            prefix: prefix.to_string(),
                            expression: expression.to_string(),
                        })?;
                segments.push(PathSegment {
                    namespace: Some(namespace.clone()),
                    name: name.to_string(),
                });
            } else {
                segments.push(PathSegment {
                    namespace: None,
                    name: segment.to_string(),
                });
            }
        }

        Ok(Self {
            expression: expression.to_string(),
            segments,
        })
    }

    /// Parse a whole candidate list, preserving priority order.
    pub fn parse_all(
        expressions: &[String],
        namespaces: &IndexMap<String, String>,
    ) -> PathResult<Vec<Self>> {
        expressions
            .iter()
            .map(|expression| Self::parse(expression, namespaces))
            .collect()
    }

    /// The original expression, for diagnostics.
    pub fn expression(&self) -> &str {
        &self.expression
    }

    /// The resolved segments, root-relative.
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// All elements matched by this path, in document order.
    ///
    /// Evaluation starts at the root element; each segment maps the current
    /// element set to its matching immediate element children.
    pub fn find_all<'a, 'input>(&self, document: &'a Document<'input>) -> Vec<Node<'a, 'input>> {
        let mut current = vec![document.root_element()];
        for segment in &self.segments {
            let mut next = Vec::new();
            for element in &current {
                for child in element.children() {
                    if child.is_element() && segment.matches(child) {
                        next.push(child);
                    }
                }
            }
            if next.is_empty() {
                return next;
            }
            current = next;
        }
        current
    }
}

/// Locate one document's record elements: the match set of the first
/// candidate path that matches at least one element, or `None` when no
/// candidate matches. Match sets from different candidates are never merged.
pub fn locate<'a, 'input>(
    document: &'a Document<'input>,
    candidates: &[RecordPath],
) -> Option<Vec<Node<'a, 'input>>> {
    for path in candidates {
        let matched = path.find_all(document);
        if !matched.is_empty() {
            trace!(
                path = path.expression(),
                matches = matched.len(),
                "record path matched"
            );
            return Some(matched);
        }
        trace!(path = path.expression(), "record path had no match");
    }
    None
}
