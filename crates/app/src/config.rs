//! Configuration for the hufftext command-line tool.
//!
//! Handles parsing command-line arguments and filling in defaults. The tree
//! file defaults to a sibling of the compressed file, so the common case needs
//! only `--in` and `--out`.

use std::path::{Path, PathBuf};

use hufftext_core::{Error, Result};
use log::LevelFilter;

/// What the tool should do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Compress a file into a payload file and a tree file
    Compress,
    /// Rebuild the original file from a payload file and a tree file
    Decompress,
    /// Generate sample text and round-trip it in memory
    Demo,
}

/// Complete configuration for one run.
#[derive(Debug, Clone)]
pub struct Config {
    pub command: Command,

    // === Files ===
    /// Input file path
    pub input_file: Option<PathBuf>,

    /// Output file path
    pub output_file: Option<PathBuf>,

    /// Tree snapshot path (defaults next to the compressed file)
    pub tree_file: Option<PathBuf>,

    // === Demo ===
    /// Random seed for sample generation
    pub seed: u64,

    /// Size of generated sample text in bytes
    pub sample_bytes: usize,

    // === Behavior ===
    /// Log verbosity
    pub log_level: LevelFilter,

    /// Whether to print the resolved configuration
    pub print_config: bool,

    /// Whether to print the compression summary
    pub print_metrics: bool,
}

impl Config {
    /// Parse configuration from command-line arguments (without the program name).
    ///
    /// If `--seed` is omitted, a time-based seed is used and printed with the
    /// config so the run can be repeated.
    pub fn from_args(args: &[String]) -> Result<Self> {
        let mut command: Option<Command> = None;
        let mut input_file: Option<PathBuf> = None;
        let mut output_file: Option<PathBuf> = None;
        let mut tree_file: Option<PathBuf> = None;
        let mut seed: Option<u64> = None;
        let mut sample_bytes: Option<usize> = None;
        let mut log_level = LevelFilter::Warn;
        let mut print_config = false;
        let mut print_metrics = true;

        let mut i = 0;
        while i < args.len() {
            match args[i].as_str() {
                "compress" if command.is_none() => command = Some(Command::Compress),
                "decompress" if command.is_none() => command = Some(Command::Decompress),
                "demo" if command.is_none() => command = Some(Command::Demo),
                "--in" => {
                    input_file = Some(PathBuf::from(value(args, &mut i, "a path")?));
                }
                "--out" => {
                    output_file = Some(PathBuf::from(value(args, &mut i, "a path")?));
                }
                "--tree" => {
                    tree_file = Some(PathBuf::from(value(args, &mut i, "a path")?));
                }
                "--seed" => {
                    let raw = value(args, &mut i, "a number")?;
                    seed = Some(raw.parse().map_err(|_| config_error("invalid seed"))?);
                }
                "--size" => {
                    let raw = value(args, &mut i, "a number")?;
                    sample_bytes = Some(raw.parse().map_err(|_| config_error("invalid size"))?);
                }
                "-v" | "--verbose" => {
                    log_level = match log_level {
                        LevelFilter::Warn => LevelFilter::Info,
                        LevelFilter::Info => LevelFilter::Debug,
                        _ => LevelFilter::Trace,
                    };
                }
                "-q" | "--quiet" => log_level = LevelFilter::Error,
                "--print-config" => print_config = true,
                "--no-metrics" => print_metrics = false,
                "--help" | "-h" => {
                    print_help();
                    std::process::exit(0);
                }
                other => {
                    return Err(config_error(&format!("unknown argument: {other}")));
                }
            }
            i += 1;
        }

        let command = command.ok_or_else(|| config_error("missing command"))?;
        if command != Command::Demo {
            if input_file.is_none() {
                return Err(config_error("--in is required"));
            }
            if output_file.is_none() {
                return Err(config_error("--out is required"));
            }
        }

        let seed = seed.unwrap_or_else(|| {
            use std::time::{SystemTime, UNIX_EPOCH};
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_millis() as u64)
                .unwrap_or(0)
        });

        Ok(Config {
            command,
            input_file,
            output_file,
            tree_file,
            seed,
            sample_bytes: sample_bytes.unwrap_or(16 * 1024),
            log_level,
            print_config,
            print_metrics,
        })
    }

    /// Where the tree snapshot lives for this run.
    ///
    /// Explicit `--tree` wins; otherwise `<out>.tree` when compressing and
    /// `<in>.tree` when decompressing.
    pub fn tree_path(&self) -> Option<PathBuf> {
        if let Some(path) = &self.tree_file {
            return Some(path.clone());
        }
        let compressed = match self.command {
            Command::Compress => self.output_file.as_deref(),
            Command::Decompress => self.input_file.as_deref(),
            Command::Demo => None,
        }?;
        Some(with_tree_suffix(compressed))
    }

    /// Print the configuration in human-readable form.
    pub fn print(&self) {
        println!("=== Configuration ===");
        println!("Command:     {:?}", self.command);
        println!("Input file:  {}", display_path(self.input_file.as_deref()));
        println!("Output file: {}", display_path(self.output_file.as_deref()));
        println!("Tree file:   {}", display_path(self.tree_path().as_deref()));
        if self.command == Command::Demo {
            println!("Seed: {}", self.seed);
            println!("Sample size: {} bytes", self.sample_bytes);
        }
        println!("Log level: {}", self.log_level);
        println!();
    }
}

/// Take the value following the flag at `args[*i]`.
fn value<'a>(args: &'a [String], i: &mut usize, what: &str) -> Result<&'a str> {
    let flag = &args[*i];
    *i += 1;
    args.get(*i)
        .map(String::as_str)
        .ok_or_else(|| config_error(&format!("{flag} requires {what}")))
}

fn config_error(message: &str) -> Error {
    Error::Config(message.to_string())
}

fn with_tree_suffix(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".tree");
    PathBuf::from(name)
}

fn display_path(path: Option<&Path>) -> String {
    path.map_or_else(|| "(none)".to_string(), |p| p.display().to_string())
}

fn print_help() {
    println!("hufftext: lossless text compression with Huffman coding");
    println!();
    println!("USAGE:");
    println!("    hufftext compress   --in <PATH> --out <PATH> [--tree <PATH>]");
    println!("    hufftext decompress --in <PATH> --out <PATH> [--tree <PATH>]");
    println!("    hufftext demo       [--seed <N>] [--size <BYTES>] [--out <PATH>]");
    println!();
    println!("OPTIONS:");
    println!("    --in <PATH>         Input file");
    println!("    --out <PATH>        Output file (demo: also save the sample text here)");
    println!("    --tree <PATH>       Tree file (default: <compressed file>.tree)");
    println!("    --seed <N>          Random seed for the demo sample");
    println!("    --size <BYTES>      Demo sample size (default: 16384)");
    println!();
    println!("    -v, --verbose       More log output (repeat for debug/trace)");
    println!("    -q, --quiet         Only log errors");
    println!("    --print-config      Print resolved configuration");
    println!("    --no-metrics        Don't print the compression summary");
    println!("    -h, --help          Print this help");
    println!();
    println!("EXAMPLES:");
    println!("    hufftext compress --in original.txt --out compressed.bin");
    println!("    hufftext decompress --in compressed.bin --out decompressed.txt");
    println!("    hufftext demo --seed 42 -v");
    println!();
}
