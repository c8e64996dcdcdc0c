//! chara CLI - Command-line tool for PNG character cards.
//!
//! This is the main entry point for the chara command-line application.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use tracing::{debug, info, warn, Level as TraceLevel};
use tracing_subscriber::FmtSubscriber;
use walkdir::WalkDir;

use chara::card::{DEFAULT_CHARACTER_VERSION, DEFAULT_CREATOR};
use chara::prelude::*;

/// chara - V2 character card tool
#[derive(Parser)]
#[command(name = "chara")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the chunks of a PNG file
    Inspect {
        /// Input PNG file
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Extract the character card from a PNG file
    Decode {
        /// Input PNG file
        #[arg(short, long)]
        input: PathBuf,

        /// Output JSON file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Write the application record instead of the card JSON
        #[arg(long)]
        record: bool,
    },

    /// Embed an application record into a PNG avatar
    Encode {
        /// Application record JSON file
        #[arg(short, long)]
        record: PathBuf,

        /// Base PNG image
        #[arg(short, long)]
        image: PathBuf,

        /// Output PNG file (defaults to <name>_card.png next to the image)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Creator written into the card
        #[arg(long, env = "CHARA_CREATOR", default_value = DEFAULT_CREATOR)]
        creator: String,

        /// Character version written into the card
        #[arg(long, default_value = DEFAULT_CHARACTER_VERSION)]
        character_version: String,
    },

    /// Classify every PNG under a directory as card, plain image or invalid
    Scan {
        /// Directory to scan
        #[arg(short, long)]
        dir: PathBuf,

        /// Filter pattern for file names (glob-style)
        #[arg(short, long)]
        filter: Option<String>,
    },

    /// Convert a repository document into application record files
    RepoImport {
        /// Repository JSON document
        #[arg(short, long)]
        input: PathBuf,

        /// Output directory
        #[arg(short, long)]
        output: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(&cli.log_level)?;

    match cli.command {
        Commands::Inspect { input } => {
            cmd_inspect(&input)?;
        }
        Commands::Decode { input, output, record } => {
            cmd_decode(&input, output.as_deref(), record)?;
        }
        Commands::Encode {
            record,
            image,
            output,
            creator,
            character_version,
        } => {
            let options = EncodeOptions {
                creator,
                character_version,
            };
            cmd_encode(&record, &image, output.as_deref(), &options)?;
        }
        Commands::Scan { dir, filter } => {
            cmd_scan(&dir, filter.as_deref())?;
        }
        Commands::RepoImport { input, output } => {
            cmd_repo_import(&input, &output)?;
        }
    }

    Ok(())
}

fn init_logging(level: &str) -> Result<()> {
    let log_level = match level.to_lowercase().as_str() {
        "trace" => TraceLevel::TRACE,
        "debug" => TraceLevel::DEBUG,
        "warn" => TraceLevel::WARN,
        "error" => TraceLevel::ERROR,
        _ => TraceLevel::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

fn cmd_inspect(input: &Path) -> Result<()> {
    let data = fs::read(input).context("Failed to read input file")?;
    let png = Png::parse(&data).context("Failed to parse PNG")?;

    println!("{:<6} {:<9} {:>10} {:>10}  CRC", "Type", "Class", "Length", "Checksum");
    for chunk in png.chunks() {
        println!(
            "{:<6} {:<9} {:>10} {:#010x}  {}",
            chunk.kind().to_string(),
            if chunk.kind().is_ancillary() { "ancillary" } else { "critical" },
            chunk.len(),
            chunk.crc(),
            if chunk.verify_crc() { "ok" } else { "BAD" }
        );

        if chunk.kind() == ChunkType::TEXT {
            match TextChunk::decode(chunk.data()) {
                Ok(text) => println!("       keyword={:?} text={} bytes", text.keyword(), text.text().len()),
                Err(e) => warn!("Undecodable tEXt chunk: {}", e),
            }
        }
    }

    println!(
        "\nTotal: {} chunks ({} image data), {} bytes",
        png.chunks().len(),
        png.chunks_of(ChunkType::IDAT).count(),
        data.len()
    );

    Ok(())
}

fn cmd_decode(input: &Path, output: Option<&Path>, as_record: bool) -> Result<()> {
    let storage = FsStorage::new();
    let uri = input.to_string_lossy();

    let card = match import_image(&storage, &uri) {
        Ok(ImportOutcome::Card(card)) => card,
        Ok(ImportOutcome::PlainImage) => {
            info!("{} has no character card; treating it as a plain avatar", input.display());
            println!("Not a character card");
            return Ok(());
        }
        Err(e) => {
            let reason = match e.kind() {
                ErrorKind::Decode => "invalid character card",
                ErrorKind::Validation => "unsupported card version",
                ErrorKind::Format => "not a valid PNG",
                ErrorKind::Io | ErrorKind::NotFound => "failed to read card",
            };
            return Err(e).context(format!("{}: {}", input.display(), reason));
        }
    };

    debug!("Decoded card for {:?}", card.data.name);

    let json = if as_record {
        serde_json::to_string_pretty(&CharacterRecord::from_card(&card))?
    } else {
        serde_json::to_string_pretty(&card)?
    };

    match output {
        Some(path) => {
            fs::write(path, json).context("Failed to write output file")?;
            info!("Wrote {}", path.display());
        }
        None => println!("{}", json),
    }

    Ok(())
}

fn cmd_encode(
    record_path: &Path,
    image: &Path,
    output: Option<&Path>,
    options: &EncodeOptions,
) -> Result<()> {
    let record_json = fs::read(record_path).context("Failed to read record file")?;
    let record = CharacterRecord::from_json(&record_json).context("Failed to parse record")?;

    if record.data.name.is_empty() {
        anyhow::bail!("Record has no name");
    }

    let output = match output {
        Some(path) => path.to_path_buf(),
        None => image.with_file_name(export_file_name(&record.data.name)),
    };

    println!("Encoding: {} + {} -> {}", record_path.display(), image.display(), output.display());

    let storage = FsStorage::new();
    write_card(
        &storage,
        &record,
        &image.to_string_lossy(),
        &output.to_string_lossy(),
        options,
    )
    .context("Failed to write character card")?;

    println!("Card written");

    Ok(())
}

/// Outcome of classifying one file during a scan.
enum ScanResult {
    Card(String),
    Plain,
    Invalid(String),
}

fn cmd_scan(dir: &Path, filter: Option<&str>) -> Result<()> {
    let pattern = filter
        .map(glob::Pattern::new)
        .transpose()
        .context("Invalid filter pattern")?;

    let files: Vec<PathBuf> = WalkDir::new(dir)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!("Skipping unreadable entry: {}", e);
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| {
            path.extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case("png"))
        })
        .filter(|path| match (&pattern, path.file_name().and_then(|n| n.to_str())) {
            (Some(pattern), Some(name)) => pattern.matches(name),
            (Some(_), None) => false,
            (None, _) => true,
        })
        .collect();

    println!("Scanning {} PNG files in {}...", files.len(), dir.display());

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")?
            .progress_chars("#>-"),
    );

    let start = Instant::now();
    let results: Vec<(PathBuf, ScanResult)> = files
        .into_par_iter()
        .map(|path| {
            let result = match fs::read(&path) {
                Ok(bytes) => match import_bytes(&bytes) {
                    Ok(ImportOutcome::Card(card)) => ScanResult::Card(card.data.name),
                    Ok(ImportOutcome::PlainImage) => ScanResult::Plain,
                    Err(e) => ScanResult::Invalid(e.to_string()),
                },
                Err(e) => ScanResult::Invalid(e.to_string()),
            };
            pb.inc(1);
            (path, result)
        })
        .collect();
    pb.finish_with_message("Done");

    let mut cards = 0;
    let mut plain = 0;
    let mut invalid = 0;

    for (path, result) in &results {
        match result {
            ScanResult::Card(name) => {
                cards += 1;
                println!("card    {}  ({})", path.display(), name);
            }
            ScanResult::Plain => {
                plain += 1;
                debug!("plain   {}", path.display());
            }
            ScanResult::Invalid(reason) => {
                invalid += 1;
                warn!("{}: {}", path.display(), reason);
            }
        }
    }

    println!(
        "\nScanned in {:?}: {} cards, {} plain images, {} invalid",
        start.elapsed(),
        cards,
        plain,
        invalid
    );

    Ok(())
}

fn cmd_repo_import(input: &Path, output: &Path) -> Result<()> {
    println!("Importing repository: {}", input.display());

    let data = fs::read(input).context("Failed to read repository file")?;
    let document = RepositoryDocument::parse(&data).context("Failed to parse repository")?;

    let metadata = &document.metadata;
    println!(
        "{} v{} by {}: {} characters",
        metadata.name,
        metadata.version,
        metadata.author,
        document.characters.len()
    );
    if let Some(website) = &metadata.website {
        info!("Repository website: {}", website);
    }

    let records = document.records();
    check_file_names(&records)?;

    fs::create_dir_all(output)?;

    for record in records {
        let path = output.join(record_file_name(&record));

        let json = serde_json::to_string_pretty(&record)?;
        fs::write(&path, json).with_context(|| format!("Failed to write {}", path.display()))?;
        debug!("Wrote {} ({})", path.display(), record.id);
    }

    println!("Import complete");

    Ok(())
}

/// File name for a record: its id with path-unsafe characters replaced.
fn record_file_name(record: &CharacterRecord) -> String {
    let stem: String = record
        .id
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
        .collect();
    format!("{}.json", stem)
}

/// Fail when two records would be written to the same file.
fn check_file_names(records: &[CharacterRecord]) -> Result<()> {
    let mut owners: HashMap<String, &str> = HashMap::new();
    for record in records {
        let name = record_file_name(record);
        if let Some(previous) = owners.insert(name.clone(), &record.id) {
            anyhow::bail!(
                "Records {:?} and {:?} would both be written to {}",
                previous,
                record.id,
                name
            );
        }
    }
    Ok(())
}
