//! hufftext: compress and decompress text files with Huffman coding.
//!
//! Compression writes two artifacts: the packed payload and the tree snapshot
//! needed to decode it. Decompression reads both back.

mod config;
mod input_gen;
mod logger;

use std::fs;
use std::path::Path;
use std::process::ExitCode;

use hufftext_core::metrics::CompressionReport;
use hufftext_core::{BinarySnapshot, Error, HuffmanCodec, HuffmanTree, Result, TreeStore};
use log::{error, info};

use crate::config::{Command, Config};

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let config = match Config::from_args(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {e}");
            eprintln!("run with --help for usage");
            return ExitCode::from(2);
        }
    };

    logger::init(config.log_level);
    if config.print_config {
        config.print();
    }

    match run(&config) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            error!("{e}");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Dispatch the configured command. `Ok(false)` means the run completed but
/// verification failed.
fn run(config: &Config) -> Result<bool> {
    match config.command {
        Command::Compress => compress_file(config).map(|()| true),
        Command::Decompress => decompress_file(config).map(|()| true),
        Command::Demo => demo(config),
    }
}

fn compress_file(config: &Config) -> Result<()> {
    let (input, output, tree_path) = file_paths(config)?;

    // size is filled in once the whole input has been read
    let mut report = CompressionReport::new(0);
    let compressed = HuffmanCodec::new().compress_reader(fs::File::open(input)?)?;

    // an empty tree file stands for "no tree" (empty input)
    let blob = compressed
        .tree
        .as_ref()
        .map(|tree| BinarySnapshot.persist(tree))
        .unwrap_or_default();
    fs::write(output, &compressed.payload)?;
    fs::write(&tree_path, &blob)?;

    report.original_size = compressed.original_len as u64;
    report.compressed_size = compressed.payload.len() as u64;
    report.tree_size = blob.len() as u64;
    report.distinct_symbols = compressed.tree.as_ref().map_or(0, HuffmanTree::leaf_count);
    report.complete();

    info!(
        "compressed {} -> {} (+ tree {})",
        input.display(),
        output.display(),
        tree_path.display()
    );
    if config.print_metrics {
        report.print_summary();
    }
    Ok(())
}

fn decompress_file(config: &Config) -> Result<()> {
    let (input, output, tree_path) = file_paths(config)?;

    let payload = fs::read(input)?;
    let tree = load_tree(&fs::read(&tree_path)?)?;
    let decoded = HuffmanCodec::new().decompress(&payload, tree.as_ref())?;
    fs::write(output, &decoded)?;

    info!(
        "decompressed {} ({} bytes) -> {} ({} bytes)",
        input.display(),
        payload.len(),
        output.display(),
        decoded.len()
    );
    Ok(())
}

fn demo(config: &Config) -> Result<bool> {
    let sample = input_gen::generate_sample_text(config.seed, config.sample_bytes);
    if let Some(path) = &config.output_file {
        input_gen::write_sample_file(path, config.seed, config.sample_bytes)?;
        info!("sample text written to {}", path.display());
    }

    let codec = HuffmanCodec::new();
    let mut report = CompressionReport::new(sample.len() as u64);
    let compressed = codec.compress(&sample)?;
    let blob = compressed
        .tree
        .as_ref()
        .map(|tree| BinarySnapshot.persist(tree))
        .unwrap_or_default();

    let tree = load_tree(&blob)?;
    let restored = codec.decompress(&compressed.payload, tree.as_ref())?;

    report.compressed_size = compressed.payload.len() as u64;
    report.tree_size = blob.len() as u64;
    report.distinct_symbols = tree.as_ref().map_or(0, HuffmanTree::leaf_count);
    report.complete();

    if config.print_metrics {
        report.print_summary();
    }

    let verified = restored == sample;
    if verified {
        println!("✓ Round trip verified (seed {}, {} bytes)", config.seed, sample.len());
    } else {
        println!("✗ Round trip FAILED (seed {})", config.seed);
    }
    Ok(verified)
}

/// Empty blob means the input was empty and no tree exists.
fn load_tree(blob: &[u8]) -> Result<Option<HuffmanTree>> {
    if blob.is_empty() {
        return Ok(None);
    }
    BinarySnapshot.load(blob).map(Some)
}

fn file_paths(config: &Config) -> Result<(&Path, &Path, std::path::PathBuf)> {
    let missing = || Error::Config("input, output and tree paths are required".to_string());
    let input = config.input_file.as_deref().ok_or_else(missing)?;
    let output = config.output_file.as_deref().ok_or_else(missing)?;
    let tree = config.tree_path().ok_or_else(missing)?;
    Ok((input, output, tree))
}
