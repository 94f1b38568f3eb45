use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;

use condges_ingest::config::IngestConfig;
use condges_ingest::dataset::Dataset;
use condges_ingest::detect;
use condges_ingest::logging;
use condges_ingest::pipeline::{ingest_batch, RawDocument};
use condges_ingest::xml;

#[derive(Parser)]
#[command(name = "condges_ingest")]
#[command(about = "CondGes hotel PMS export ingestion")]
#[command(version = "0.1.0")]
struct Cli {
    /// Optional TOML config overriding attribution/detection vocabularies
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Ingest XML export files into one merged dataset
    Ingest {
        /// Export files, processed in the given order
        files: Vec<PathBuf>,
        /// Write the tabular rows to this path
        #[arg(long)]
        output: Option<PathBuf>,
        /// Output format for --output
        #[arg(long, value_enum, default_value = "json")]
        format: OutputFormat,
    },
    /// Print the detected schema variant per file
    Detect {
        files: Vec<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Json,
    Csv,
}

fn filename_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn print_summary(dataset: &Dataset) {
    println!("\n📊 Ingest results:");
    println!("   Documents processed: {}", dataset.losses.documents_processed);
    println!("   Total records: {}", dataset.len());

    let mut by_hotel: BTreeMap<&str, usize> = BTreeMap::new();
    let mut by_type: BTreeMap<&str, usize> = BTreeMap::new();
    let mut by_year: BTreeMap<i32, usize> = BTreeMap::new();
    for record in &dataset.records {
        *by_hotel.entry(record.hotel.as_str()).or_default() += 1;
        *by_type.entry(record.record.type_label()).or_default() += 1;
        *by_year.entry(record.year).or_default() += 1;
    }

    println!("   Records per hotel:");
    for (hotel, count) in by_hotel {
        println!("     • {hotel}: {count}");
    }
    println!("   Records per type:");
    for (tipo, count) in by_type {
        println!("     • {tipo}: {count}");
    }
    println!("   Records per year:");
    for (year, count) in by_year {
        println!("     • {year}: {count}");
    }

    let losses = &dataset.losses;
    if losses.structural_errors
        + losses.unrecognized_documents
        + losses.dropped_missing_date
        + losses.numeric_fallbacks
        + losses.mixed_code_documents
        > 0
    {
        println!("\n⚠️  Degradations:");
        if losses.structural_errors > 0 {
            println!("   - unparseable documents skipped: {}", losses.structural_errors);
        }
        if losses.unrecognized_documents > 0 {
            println!("   - unrecognized documents (0 records): {}", losses.unrecognized_documents);
        }
        if losses.dropped_missing_date > 0 {
            println!("   - day records dropped (missing date): {}", losses.dropped_missing_date);
        }
        if losses.numeric_fallbacks > 0 {
            println!("   - numeric values degraded to zero: {}", losses.numeric_fallbacks);
        }
        if losses.mixed_code_documents > 0 {
            println!("   - mixed channel/segment documents: {}", losses.mixed_code_documents);
        }
    }
}

fn main() -> anyhow::Result<()> {
    logging::init_logging();

    let cli = Cli::parse();
    let config = IngestConfig::load_or_default(cli.config.as_deref())?;

    match cli.command {
        Commands::Ingest { files, output, format } => {
            println!("🔄 Ingesting {} file(s)...", files.len());

            let mut documents = Vec::new();
            for path in &files {
                let content = fs::read(path)
                    .with_context(|| format!("failed to read {}", path.display()))?;
                documents.push(RawDocument::new(content, filename_of(path)));
            }

            let dataset = ingest_batch(documents, &config);
            print_summary(&dataset);

            if let Some(path) = output {
                match format {
                    OutputFormat::Json => {
                        let rows = dataset.rows();
                        fs::write(&path, serde_json::to_string_pretty(&rows)?)
                            .with_context(|| format!("failed to write {}", path.display()))?;
                    }
                    OutputFormat::Csv => {
                        let file = fs::File::create(&path)
                            .with_context(|| format!("failed to write {}", path.display()))?;
                        dataset.write_csv(file)?;
                    }
                }
                info!(path = %path.display(), rows = dataset.len(), ?format, "wrote tabular output");
                println!("\n📥 Wrote {} rows to {}", dataset.len(), path.display());
            }
        }
        Commands::Detect { files } => {
            for path in &files {
                let content = fs::read(path)
                    .with_context(|| format!("failed to read {}", path.display()))?;
                match xml::parse_document(&content) {
                    Ok(root) => {
                        println!("{}: {}", filename_of(path), detect::detect(&root, &config));
                    }
                    Err(e) => {
                        println!("{}: structural error ({e})", filename_of(path));
                    }
                }
            }
        }
    }

    Ok(())
}
