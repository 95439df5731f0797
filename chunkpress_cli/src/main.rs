use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Context;
use clap::{ArgAction, Parser, Subcommand};
use tracing::Level;
use xxhash_rust::xxh3::xxh3_64;

use chunkpress_codecs::Compressor;
use chunkpress_core::CompressionSpec;

// ── CLI definition ─────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(
    name = "chunkpress",
    about = "Self-describing chunk compression for single in-memory chunks",
    version
)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compress one file as a single chunk
    Compress {
        /// Source file ("-" reads stdin)
        input: PathBuf,
        /// Destination chunk file ("-" writes to stdout)
        output: PathBuf,
        /// Compression spec: none | lz4 | zstd[,1-22] | zlib[,0-9] | lzma[,0-9] | auto,<spec>
        #[arg(short = 'C', long, default_value = "lz4")]
        compression: CompressionSpec,
    },
    /// Decompress a chunk, whichever codec produced it
    Decompress {
        /// Source chunk file ("-" reads stdin)
        input: PathBuf,
        /// Destination file ("-" writes to stdout)
        output: PathBuf,
    },
    /// Print which codec produced a chunk
    Detect {
        /// Chunk file
        file: PathBuf,
    },
    /// Round-trip a file through a spec and check the content hash survives
    Verify {
        /// Source file
        input: PathBuf,
        /// Compression spec to verify
        #[arg(short = 'C', long, default_value = "auto,zstd,3")]
        compression: CompressionSpec,
    },
}

// ── Helpers ────────────────────────────────────────────────────────────────

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();
}

fn read_input(path: &Path) -> anyhow::Result<Vec<u8>> {
    if path.to_str() == Some("-") {
        let mut buf = Vec::new();
        io::stdin().lock().read_to_end(&mut buf)?;
        Ok(buf)
    } else {
        fs::read(path).with_context(|| format!("reading input file {:?}", path))
    }
}

fn write_output(path: &Path, data: &[u8]) -> anyhow::Result<()> {
    if path.to_str() == Some("-") {
        let mut out = io::stdout().lock();
        out.write_all(data)?;
        out.flush()?;
        Ok(())
    } else {
        fs::write(path, data).with_context(|| format!("creating output file {:?}", path))
    }
}

fn human_bytes(n: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
    let mut v = n as f64;
    let mut unit = 0;
    while v >= 1024.0 && unit < UNITS.len() - 1 {
        v /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{} B", n)
    } else {
        format!("{:.2} {}", v, UNITS[unit])
    }
}

fn ratio(raw: usize, compressed: usize) -> f64 {
    if compressed == 0 {
        return 1.0;
    }
    raw as f64 / compressed as f64
}

// ── Subcommand implementations ─────────────────────────────────────────────

fn run_compress(input: PathBuf, output: PathBuf, spec: CompressionSpec) -> anyhow::Result<()> {
    let raw = read_input(&input)?;
    let mut compressor = Compressor::new(spec);

    let t0 = Instant::now();
    let compressed = compressor
        .compress(&raw)
        .with_context(|| format!("compressing {:?}", input))?;
    let elapsed = t0.elapsed();
    let stored_as = Compressor::detect(&compressed)?;

    write_output(&output, &compressed)?;

    eprintln!("  spec        : {}", compressor.spec());
    eprintln!("  stored as   : {}", stored_as);
    eprintln!("  raw size    : {}", human_bytes(raw.len() as u64));
    eprintln!("  compressed  : {}", human_bytes(compressed.len() as u64));
    eprintln!("  ratio       : {:.2}x", ratio(raw.len(), compressed.len()));
    eprintln!("  elapsed     : {:.3}s", elapsed.as_secs_f64());
    Ok(())
}

fn run_decompress(input: PathBuf, output: PathBuf) -> anyhow::Result<()> {
    let compressed = read_input(&input)?;
    let mut compressor = Compressor::default();

    let t0 = Instant::now();
    let raw = compressor
        .decompress(&compressed)
        .with_context(|| format!("decompressing {:?}", input))?;
    let elapsed = t0.elapsed();

    write_output(&output, &raw)?;

    eprintln!("  codec       : {}", Compressor::detect(&compressed)?);
    eprintln!("  raw size    : {}", human_bytes(raw.len() as u64));
    eprintln!("  elapsed     : {:.3}s", elapsed.as_secs_f64());
    Ok(())
}

fn run_detect(file: PathBuf) -> anyhow::Result<()> {
    let data = read_input(&file)?;
    let kind = Compressor::detect(&data).with_context(|| format!("inspecting {:?}", file))?;
    println!("{}", kind);
    Ok(())
}

fn run_verify(input: PathBuf, spec: CompressionSpec) -> anyhow::Result<()> {
    let raw = read_input(&input)?;
    let id = xxh3_64(&raw);

    let mut compressor = Compressor::new(spec);
    let compressed = compressor.compress(&raw)?;
    let restored = compressor.decompress(&compressed)?;
    let restored_id = xxh3_64(&restored);

    println!("  spec        : {}", compressor.spec());
    println!("  stored as   : {}", Compressor::detect(&compressed)?);
    println!("  chunk id    : {:016x}", id);
    println!("  ratio       : {:.2}x", ratio(raw.len(), compressed.len()));

    if restored_id != id || restored.len() != raw.len() {
        anyhow::bail!(
            "round-trip changed the chunk: {:016x} ({} bytes) became {:016x} ({} bytes)",
            id,
            raw.len(),
            restored_id,
            restored.len()
        );
    }
    println!("  round-trip  : ok");
    Ok(())
}

// ── Entry point ────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    match cli.command {
        Commands::Compress {
            input,
            output,
            compression,
        } => run_compress(input, output, compression),
        Commands::Decompress { input, output } => run_decompress(input, output),
        Commands::Detect { file } => run_detect(file),
        Commands::Verify { input, compression } => run_verify(input, compression),
    }
}
