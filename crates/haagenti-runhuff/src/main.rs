//! RunHuff command-line compressor
//!
//! ## Usage
//!
//! ```bash
//! # Compress to stdout
//! runhuff input.bin > input.rh
//!
//! # Decompress to a file
//! runhuff -d input.rh -o input.bin
//!
//! # Plain run-length records, with the run table on stderr
//! runhuff --rle --dump-runs input.bin -o input.rle
//! ```

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use tracing::{debug, error, info, Level};
use tracing_subscriber::FmtSubscriber;

use haagenti_core::{CompressionRatio, Result};
use haagenti_runhuff::{codeword, rle, ContainerHeader, HuffmanTree, RunCatalog};

/// Exit status when the input file cannot be opened (ENOENT).
const EXIT_NO_INPUT: u8 = 2;

#[derive(Parser, Debug)]
#[command(name = "runhuff")]
#[command(author = "Daemoniorum LLC")]
#[command(version)]
#[command(about = "Run-length + Huffman file compressor", long_about = None)]
struct Args {
    /// Compress the input (default)
    #[arg(short, long, conflicts_with = "decompress")]
    compress: bool,

    /// Decompress the input
    #[arg(short, long)]
    decompress: bool,

    /// Output path (default: stdout)
    #[arg(short = 'o', long = "output-file")]
    output_file: Option<PathBuf>,

    /// Use the plain run-length codec instead
    #[arg(long)]
    rle: bool,

    /// Print the run catalog to stderr (compress only)
    #[arg(long)]
    dump_runs: bool,

    /// Print the Huffman tree to stderr
    #[arg(long)]
    dump_tree: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    log_level: String,

    /// Input file
    input: PathBuf,
}

impl Args {
    fn verb(&self) -> &'static str {
        if self.compress || !self.decompress {
            "compress"
        } else {
            "decompress"
        }
    }
}

fn main() -> ExitCode {
    let args = Args::parse();

    // Initialize logging; stdout carries data
    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::WARN,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_writer(io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");

    let input = match File::open(&args.input) {
        Ok(file) => BufReader::new(file),
        Err(err) => {
            eprintln!("{}", failure_report(&args, &args.input, &io_reason(&err)));
            return ExitCode::from(EXIT_NO_INPUT);
        }
    };

    let result = match &args.output_file {
        Some(path) => match File::create(path) {
            Ok(file) => run(&args, input, BufWriter::new(file)),
            Err(err) => {
                eprintln!("{}", failure_report(&args, path, &io_reason(&err)));
                return ExitCode::FAILURE;
            }
        },
        None => run(&args, input, BufWriter::new(io::stdout().lock())),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(category = err.category(), input = %args.input.display(), "{}", err);
            eprintln!("{}", failure_report(&args, &args.input, &err.to_string()));
            ExitCode::FAILURE
        }
    }
}

/// Two-line report: the failing path with its reason, then the verdict.
fn failure_report(args: &Args, path: &Path, reason: &str) -> String {
    format!(
        "{}: {}\nCannot {} file {}.",
        path.display(),
        reason,
        args.verb(),
        args.input.display()
    )
}

/// The OS message for an I/O error without the `(os error N)` suffix.
fn io_reason(err: &io::Error) -> String {
    let text = err.to_string();
    match text.find(" (os error ") {
        Some(end) => text[..end].to_string(),
        None => text,
    }
}

fn run<R: Read, W: Write>(args: &Args, mut input: R, mut output: W) -> Result<()> {
    info!(mode = args.verb(), rle = args.rle, input = %args.input.display(), "starting");

    if args.decompress {
        if args.rle {
            rle::decode(input, &mut output)?;
        } else if args.dump_tree {
            let mut data = Vec::new();
            input.read_to_end(&mut data)?;
            let header = ContainerHeader::read_from(&mut data.as_slice())?;
            let mut tree = HuffmanTree::build(&header.entries);
            if let Some(tree) = tree.as_mut() {
                codeword::assign(tree)?;
            }
            dump_tree(tree.as_ref());
            haagenti_runhuff::decompress(data.as_slice(), &mut output)?;
        } else {
            haagenti_runhuff::decompress(input, &mut output)?;
        }
        output.flush()?;
        return Ok(());
    }

    let mut data = Vec::new();
    input.read_to_end(&mut data)?;

    if args.dump_runs {
        eprint!("{}", RunCatalog::collect(&data)?);
    }

    if args.rle {
        rle::encode(data.as_slice(), &mut output)?;
        output.flush()?;
        return Ok(());
    }

    let (summary, tree) = haagenti_runhuff::compress_with_tree(&data, &mut output)?;
    output.flush()?;

    if args.dump_tree {
        dump_tree(tree.as_ref());
    }

    let ratio = CompressionRatio::new(
        summary.original_size as usize,
        summary.compressed_size() as usize,
    );
    info!(
        original = summary.original_size,
        compressed = summary.compressed_size(),
        tokens = summary.token_count,
        depth = summary.tree_depth,
        "compressed {} ({:.1}% saved)",
        args.input.display(),
        ratio.savings_percent()
    );
    Ok(())
}

fn dump_tree(tree: Option<&HuffmanTree>) {
    match tree {
        Some(tree) => eprint!("{}", tree),
        None => debug!("empty token table, no tree"),
    }
}
