use divan::Bencher;
use indexmap::IndexMap;
use roxmltree::Document;

use flatten_xml::engine::ExtractionEngine;
use flatten_xml::flatten::flatten;
use flatten_xml::locator::{locate, RecordPath};
use flatten_xml::schema::ColumnSchema;

fn main() {
    divan::main();
}

const DICTIONARY_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<TEI xmlns="http://www.tei-c.org/ns/1.0">
    <body>
        <entry><word>chat</word><definition>cat</definition><gender>m</gender></entry>
        <entry><word>chien</word><definition>dog</definition><gender>m</gender></entry>
        <entry><word>souris</word><definition>mouse</definition><gender>f</gender></entry>
    </body>
</TEI>"#;

fn tei_namespaces() -> IndexMap<String, String> {
    let mut namespaces = IndexMap::new();
    namespaces.insert(
        "tei".to_string(),
        "http://www.tei-c.org/ns/1.0".to_string(),
    );
    namespaces
}

#[divan::bench]
fn parse_record_path(bencher: Bencher) {
    let namespaces = tei_namespaces();

    bencher.bench_local(move || {
        RecordPath::parse("./tei:body/tei:entry/", &namespaces).expect("Failed to parse path")
    });
}

#[divan::bench]
fn locate_record_elements(bencher: Bencher) {
    let document = Document::parse(DICTIONARY_XML).expect("Failed to parse document");
    let paths = RecordPath::parse_all(
        &["./tei:body/tei:entry/".to_string()],
        &tei_namespaces(),
    )
    .expect("Failed to parse paths");

    bencher.bench_local(move || locate(&document, &paths).expect("No record elements").len());
}

#[divan::bench]
fn flatten_record_elements(bencher: Bencher) {
    let document = Document::parse(DICTIONARY_XML).expect("Failed to parse document");
    let paths = RecordPath::parse_all(
        &["./tei:body/tei:entry/".to_string()],
        &tei_namespaces(),
    )
    .expect("Failed to parse paths");
    let elements = locate(&document, &paths).expect("No record elements");
    let mut schema = ColumnSchema::new();

    bencher.bench_local(move || flatten(&elements, 1, &mut schema));
}

#[divan::bench]
fn run_line_batch(bencher: Bencher) {
    let batch: String = (0..100)
        .map(|i| {
            format!(
                "<row><entry><sku>a{}</sku><qty>{}</qty><price>9.50</price></entry></row>\n",
                i,
                i % 7
            )
        })
        .collect();
    let paths = RecordPath::parse_all(&["./entry/".to_string()], &IndexMap::new())
        .expect("Failed to parse paths");

    bencher.bench_local(move || {
        let mut engine = ExtractionEngine::new(paths.clone());
        engine
            .run(batch.lines().map(|line| Ok::<_, std::io::Error>(line.to_string())))
            .expect("Engine run failed");
        engine.finish().render_table()
    });
}
