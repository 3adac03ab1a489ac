use std::fs::File;
use std::io::{BufWriter, Write};
use std::process;

use anyhow::Context;

use flatten_xml::cli::Cli;
use flatten_xml::config::ConfigManager;
use flatten_xml::engine::ExtractionEngine;
use flatten_xml::input::DocumentReader;
use flatten_xml::locator::RecordPath;
use flatten_xml::output::Output;

fn run(cli: &Cli) -> anyhow::Result<()> {
    let config = ConfigManager::load_config(cli).context("load configuration")?;

    let paths = RecordPath::parse_all(&config.records.paths, &config.records.namespaces)
        .context("parse record paths")?;

    let input_path = config.input_path()?;
    let structure = config.structure()?;
    let reader = DocumentReader::open(input_path, structure)
        .with_context(|| format!("open input file {}", input_path.display()))?;

    let mut engine = ExtractionEngine::new(paths);
    engine.run(reader).context("process input documents")?;
    let results = engine.finish();

    // The output file is created only after the whole input was processed.
    let output_path = config.output_path()?;
    let file = File::create(output_path)
        .with_context(|| format!("create output file {}", output_path.display()))?;
    let mut writer = BufWriter::new(file);
    results
        .write_table(&mut writer)
        .with_context(|| format!("write table to {}", output_path.display()))?;
    writer.flush().context("flush output file")?;

    let output = Output::new(config.verbosity());
    print!("{}", output.format_results(&results));

    Ok(())
}

fn main() {
    let cli = Cli::parse_args();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    if let Err(message) = cli.validate() {
        eprintln!("Error: {}", message);
        process::exit(2);
    }

    if let Err(error) = run(&cli) {
        eprintln!("Error: {:#}", error);
        process::exit(1);
    }
}
