use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;
use voxelesque_nbt::{Compound, DEFAULT_MAX_DEPTH, DecodeConfig, Element, ReadError};
use voxelesque_persist::ElementStore;

#[derive(Parser)]
#[command(name = "voxelesque-cli", about = "CLI tool for tagged element files")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Maximum container nesting accepted when decoding
    #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
    max_depth: usize,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and crate info
    Info,
    /// Print every element in a file of concatenated elements
    Inspect {
        /// File to read
        file: PathBuf,
    },
    /// Print the elements of a file as JSON
    Dump {
        /// File to read
        file: PathBuf,
        /// Pretty-print the JSON
        #[arg(short, long)]
        pretty: bool,
    },
    /// Write a sample element file
    Demo {
        /// File to create
        file: PathBuf,
    },
    /// Work with an element store directory
    Store {
        #[command(subcommand)]
        command: StoreCommands,
    },
}

#[derive(Subcommand)]
enum StoreCommands {
    /// Append the sample elements to a store
    AppendDemo { dir: PathBuf },
    /// List the elements in a store
    List { dir: PathBuf },
    /// Check a store's data against its recorded digest
    Verify { dir: PathBuf },
    /// Rebuild a store's metadata from its data file
    Rehash { dir: PathBuf },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    let config = DecodeConfig::with_max_depth(cli.max_depth);

    match cli.command {
        Commands::Info => {
            println!("voxelesque-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("nbt: {}", voxelesque_nbt::crate_info());
            println!("persist: {}", voxelesque_persist::crate_info());
            println!("max depth: {}", config.max_depth);
        }
        Commands::Inspect { file } => {
            let scan = scan_file(&file, &config)?;
            for (offset, element) in &scan.elements {
                println!(
                    "{offset:>8}  {:<11} {:>6}B  {element}",
                    element.tag().name(),
                    element.encoded_len()
                );
            }
            report_skipped(&scan.skipped);
            println!(
                "{} element(s), {} malformed",
                scan.elements.len(),
                scan.skipped.len()
            );
        }
        Commands::Dump { file, pretty } => {
            let scan = scan_file(&file, &config)?;
            report_skipped(&scan.skipped);
            let elements: Vec<&Element> = scan.elements.iter().map(|(_, e)| e).collect();
            let json = if pretty {
                serde_json::to_string_pretty(&elements)?
            } else {
                serde_json::to_string(&elements)?
            };
            println!("{json}");
        }
        Commands::Demo { file } => {
            let mut bytes = Vec::new();
            for element in demo_elements()? {
                element.encode_into(&mut bytes)?;
            }
            std::fs::write(&file, &bytes)
                .with_context(|| format!("writing {}", file.display()))?;
            tracing::info!("wrote {} bytes to {}", bytes.len(), file.display());
        }
        Commands::Store { command } => match command {
            StoreCommands::AppendDemo { dir } => {
                let mut store = ElementStore::open_with(&dir, config)?;
                store.append_all(&demo_elements()?)?;
                println!(
                    "store: {} element(s), {} bytes",
                    store.meta().element_count,
                    store.meta().data_len
                );
            }
            StoreCommands::List { dir } => {
                let store = ElementStore::open_with(&dir, config)?;
                let report = store.load()?;
                for element in &report.elements {
                    println!("{element}");
                }
                report_skipped(&report.skipped);
            }
            StoreCommands::Verify { dir } => {
                let store = ElementStore::open_with(&dir, config)?;
                store.verify_integrity()?;
                println!("OK: sha256 {}", store.meta().sha256);
            }
            StoreCommands::Rehash { dir } => {
                let mut store = ElementStore::open_with(&dir, config)?;
                let report = store.rehash()?;
                report_skipped(&report.skipped);
                println!(
                    "store: {} element(s), {} bytes, sha256 {}",
                    store.meta().element_count,
                    store.meta().data_len,
                    store.meta().sha256
                );
            }
        },
    }

    Ok(())
}

/// Decoded elements of a file with their offsets, plus what was skipped.
struct FileScan {
    elements: Vec<(usize, Element)>,
    skipped: Vec<ReadError>,
}

fn scan_file(path: &Path, config: &DecodeConfig) -> anyhow::Result<FileScan> {
    let data = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    Ok(scan_bytes(&data, config))
}

fn scan_bytes(data: &[u8], config: &DecodeConfig) -> FileScan {
    let mut scan = FileScan {
        elements: Vec::new(),
        skipped: Vec::new(),
    };
    let mut reader = config.reader(data);
    loop {
        let offset = reader.position();
        match reader.next() {
            Some(Ok(element)) => scan.elements.push((offset, element)),
            Some(Err(err)) => scan.skipped.push(err),
            None => break,
        }
    }
    scan
}

fn report_skipped(skipped: &[ReadError]) {
    for err in skipped {
        tracing::warn!("{err}");
    }
}

/// A small chunk-shaped sample covering every kind.
fn demo_elements() -> anyhow::Result<Vec<Element>> {
    let positions = Element::new("positions", vec![1.0f32, -2.5, 3.0])?;

    let mut section = Compound::new();
    section.insert(Element::new("y", 4i8)?);
    section.insert(Element::new("palette", vec![0i16, 1, 9])?);
    section.insert(Element::new("blocks", vec![0i8, 1, 1, 2])?);
    section.insert(Element::new("light", vec![0x0f0f_0f0fi32; 2])?);

    let mut entity = Compound::new();
    entity.insert(Element::new("id", "pig")?);
    entity.insert(Element::new("pos", vec![10.5f64, 64.0, -3.25])?);
    entity.insert(Element::new("uuid", vec![0x1234_5678_9abc_def0i64, 42])?);
    entity.insert(Element::new("health", 10.0f32)?);

    let mut chunk = Compound::new();
    chunk.insert(Element::new("x", 3i32)?);
    chunk.insert(Element::new("z", -9i32)?);
    chunk.insert(Element::new("version", 2i16)?);
    chunk.insert(Element::new("seed", 42i64)?);
    chunk.insert(Element::new("temperature", 0.8f64)?);
    chunk.insert(Element::new("sections", vec![Element::new("", section)?])?);
    chunk.insert(Element::new("entities", vec![Element::new("", entity)?])?);

    Ok(vec![positions, Element::new("chunk", chunk)?])
}
