//! Flattening matched record elements into one sparse row.
//!
//! Only the immediate children of a matched element become columns;
//! grandchildren are never descended into. Column names are lowercased so
//! accumulation is case-insensitive across documents that capitalize tags
//! differently.

use roxmltree::Node;

use crate::schema::{ColumnSchema, ROWNUM_COLUMN, Row};

/// Flatten one document's matched record elements into a single row.
///
/// The reserved `rownum` column receives the document's 1-based position in
/// the input stream and is registered before any data column. Every
/// immediate child element of every matched element contributes a column
/// named `<parent-local-name>.<child-local-name>`, lowercased; the value is
/// the child's leading text, `None` when the child is empty. Later children
/// overwrite earlier ones for the same column name, within one element and
/// across matched elements alike. New column names extend `schema` in
/// discovery order.
pub fn flatten(elements: &[Node], sequence: u64, schema: &mut ColumnSchema) -> Row {
    let mut row = Row::new();

    schema.intern(ROWNUM_COLUMN);
    row.set(ROWNUM_COLUMN.to_string(), Some(sequence.to_string()));

    for element in elements {
        let prefix = element.tag_name().name();
        for child in element.children() {
            if !child.is_element() {
                continue;
            }
            let column = format!("{}.{}", prefix, child.tag_name().name()).to_lowercase();
            schema.intern(&column);
            row.set(column, child.text().map(str::to_owned));
        }
    }

    row
}

#[cfg(test)]
mod tests {
    use super::*;
    use roxmltree::Document;

    fn flatten_str(xml: &str, sequence: u64, schema: &mut ColumnSchema) -> Row {
        let document = Document::parse(xml).unwrap();
        flatten(&[document.root_element()], sequence, schema)
    }

    #[test]
    fn test_children_become_prefixed_columns() {
        let mut schema = ColumnSchema::new();
        let row = flatten_str(
            "<entry><word>chat</word><definition>cat</definition></entry>",
            1,
            &mut schema,
        );

        let names: Vec<&str> = schema.iter().collect();
        assert_eq!(names, vec!["rownum", "entry.word", "entry.definition"]);
        assert_eq!(row.get("rownum"), Some("1"));
        assert_eq!(row.get("entry.word"), Some("chat"));
        assert_eq!(row.get("entry.definition"), Some("cat"));
    }

    #[test]
    fn test_column_names_are_lowercased() {
        let mut schema = ColumnSchema::new();
        let row = flatten_str("<Entry><Word>chien</Word></Entry>", 1, &mut schema);

        assert_eq!(row.get("entry.word"), Some("chien"));
        assert_eq!(schema.index_of("Entry.Word"), None);
    }

    #[test]
    fn test_same_parent_case_variants_share_a_column() {
        let mut schema = ColumnSchema::new();
        flatten_str("<entry><Foo>1</Foo></entry>", 1, &mut schema);
        flatten_str("<entry><foo>2</foo></entry>", 2, &mut schema);

        assert_eq!(schema.len(), 2);
        assert_eq!(schema.index_of("entry.foo"), Some(1));
    }

    #[test]
    fn test_duplicate_children_last_write_wins() {
        let mut schema = ColumnSchema::new();
        let row = flatten_str("<entry><a>1</a><a>2</a></entry>", 1, &mut schema);

        assert_eq!(row.get("entry.a"), Some("2"));
        assert_eq!(schema.len(), 2);
    }

    #[test]
    fn test_multiple_elements_sharing_a_prefix_merge_into_one_row() {
        let xml = "<doc><entry><a>1</a><b>2</b></entry><entry><a>3</a></entry></doc>";
        let document = Document::parse(xml).unwrap();
        let elements: Vec<_> = document
            .root_element()
            .children()
            .filter(|node| node.is_element())
            .collect();
        let mut schema = ColumnSchema::new();

        let row = flatten(&elements, 1, &mut schema);

        assert_eq!(row.get("entry.a"), Some("3"));
        assert_eq!(row.get("entry.b"), Some("2"));
        let names: Vec<&str> = schema.iter().collect();
        assert_eq!(names, vec!["rownum", "entry.a", "entry.b"]);
    }

    #[test]
    fn test_empty_child_is_recorded_as_null() {
        let mut schema = ColumnSchema::new();
        let row = flatten_str("<entry><word>chat</word><note/></entry>", 1, &mut schema);

        assert!(row.contains("entry.note"));
        assert_eq!(row.get("entry.note"), None);
        assert_eq!(schema.index_of("entry.note"), Some(2));
    }

    #[test]
    fn test_grandchildren_are_not_descended_into() {
        let mut schema = ColumnSchema::new();
        let row = flatten_str(
            "<entry><sense><definition>deep</definition></sense></entry>",
            1,
            &mut schema,
        );

        assert!(row.contains("entry.sense"));
        assert_eq!(row.get("entry.sense"), None);
        assert_eq!(schema.index_of("entry.sense.definition"), None);
        assert_eq!(schema.len(), 2);
    }

    #[test]
    fn test_schema_grows_across_documents_without_renumbering() {
        let mut schema = ColumnSchema::new();
        flatten_str("<entry><a>1</a></entry>", 1, &mut schema);
        let second = flatten_str("<entry><b>2</b></entry>", 2, &mut schema);

        let names: Vec<&str> = schema.iter().collect();
        assert_eq!(names, vec!["rownum", "entry.a", "entry.b"]);
        assert_eq!(second.get("entry.a"), None);
        assert!(!second.contains("entry.a"));
        assert_eq!(second.get("rownum"), Some("2"));
    }

    #[test]
    fn test_sequence_number_is_taken_verbatim() {
        let mut schema = ColumnSchema::new();
        let row = flatten_str("<entry><a>x</a></entry>", 41, &mut schema);

        assert_eq!(row.get("rownum"), Some("41"));
    }

    #[test]
    fn test_rownum_is_always_ordinal_zero() {
        let mut schema = ColumnSchema::new();
        flatten_str("<entry><a>x</a></entry>", 1, &mut schema);

        assert_eq!(schema.index_of(ROWNUM_COLUMN), Some(0));
    }
}
