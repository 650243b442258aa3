use std::fs::{self, File, Metadata};
use std::io::{self, BufReader, BufWriter, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use color_eyre::eyre::{Result, WrapErr};
use console::style;
use ruhuff::{CompressionStats, DecompressionStats, Histogram};
use tracing::{debug, info};
use tracing_indicatif::IndicatifLayer;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[path = "huff/progress.rs"]
mod progress;
use progress::ProgressMonitor;

/// Permissions stored for input that does not come from a file
const DEFAULT_PERMISSIONS: u16 = 0o600;

#[derive(Parser)]
#[command(version, about = "A Huffman coding compressor")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Print compression statistics to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Compress a file into a huffman container
    #[command(visible_alias = "c")]
    Compress(Paths),
    /// Restore the original file from a huffman container
    #[command(visible_alias = "d")]
    Decompress(Paths),
}

#[derive(Args)]
struct Paths {
    /// File to read from, standard input if omitted
    #[arg(short, long)]
    input: Option<PathBuf>,
    /// File to write to, standard output if omitted
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Compress(paths) => compress(&paths, cli.verbose),
        Commands::Decompress(paths) => decompress(&paths, cli.verbose),
    }
}

fn init_tracing(verbose: bool) {
    let indicatif_layer = IndicatifLayer::new();
    let level = if verbose {
        LevelFilter::INFO
    } else {
        LevelFilter::WARN
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(indicatif_layer.get_stderr_writer())
                .without_time(),
        )
        .with(indicatif_layer)
        .with(level)
        .init();
}

fn compress(paths: &Paths, verbose: bool) -> Result<()> {
    let stats = match &paths.input {
        Some(path) => {
            let mut file = File::open(path)
                .wrap_err_with(|| format!("failed to open input file {}", path.display()))?;
            let metadata = file.metadata()?;
            let permissions = permissions_of(&metadata);

            if metadata.is_file() {
                // regular files can be scanned twice, once for the histogram and once for encoding
                let histogram = Histogram::from_reader(BufReader::new(&mut file))
                    .wrap_err("failed to read input file")?;
                file.seek(SeekFrom::Start(0))?;
                let source = ProgressMonitor::new(file, histogram.total(), "compress");
                encode_to_output(source, &histogram, permissions, paths.output.as_deref())?
            } else {
                let data = read_all(file)?;
                let histogram = Histogram::from_bytes(&data);
                encode_to_output(&data[..], &histogram, permissions, paths.output.as_deref())?
            }
        }
        None => {
            // stdin can't be rewound, buffer it for the second pass
            let data = read_all(io::stdin().lock())?;
            let histogram = Histogram::from_bytes(&data);
            encode_to_output(&data[..], &histogram, DEFAULT_PERMISSIONS, paths.output.as_deref())?
        }
    };

    if verbose {
        print_compression_stats(&stats);
    }
    Ok(())
}

fn encode_to_output(
    source: impl Read,
    histogram: &Histogram,
    permissions: u16,
    output: Option<&Path>,
) -> Result<CompressionStats> {
    debug!(distinct_symbols = histogram.distinct_symbols(), "histogram done");
    match output {
        Some(path) => {
            let file = create_output(path)?;
            apply_permissions(&file, permissions)?;
            let stats = ruhuff::encode(source, histogram, permissions, BufWriter::new(file));
            if stats.is_err() {
                remove_partial_output(path);
            }
            stats.wrap_err("failed to compress")
        }
        None => ruhuff::encode(source, histogram, permissions, io::stdout().lock())
            .wrap_err("failed to compress"),
    }
}

fn decompress(paths: &Paths, verbose: bool) -> Result<()> {
    let stats = match &paths.input {
        Some(path) => {
            let file = File::open(path)
                .wrap_err_with(|| format!("failed to open input file {}", path.display()))?;
            let size = file.metadata()?.len();
            let source = ProgressMonitor::new(BufReader::new(file), size, "decompress");
            decode_to_output(source, paths.output.as_deref())?
        }
        None => decode_to_output(io::stdin().lock(), paths.output.as_deref())?,
    };

    if verbose {
        print_decompression_stats(&stats);
    }
    Ok(())
}

fn decode_to_output(source: impl Read, output: Option<&Path>) -> Result<DecompressionStats> {
    match output {
        Some(path) => {
            let file = create_output(path)?;
            let mut decoder = match ruhuff::decoding::ContainerDecoder::new(source) {
                Ok(decoder) => decoder,
                Err(e) => {
                    remove_partial_output(path);
                    return Err(e).wrap_err("unable to read the container header or tree");
                }
            };
            apply_permissions(&file, decoder.header().permissions)?;
            let result = drain_decoder(&mut decoder, BufWriter::new(file));
            if result.is_err() {
                remove_partial_output(path);
            }
            result
        }
        None => {
            let mut decoder = ruhuff::decoding::ContainerDecoder::new(source)
                .wrap_err("unable to read the container header or tree")?;
            drain_decoder(&mut decoder, io::stdout().lock())
        }
    }
}

fn drain_decoder<R: Read>(
    decoder: &mut ruhuff::decoding::ContainerDecoder<R>,
    mut sink: impl Write,
) -> Result<DecompressionStats> {
    let mut block = Vec::with_capacity(ruhuff::BLOCK_SIZE);
    while let Some(symbol) = decoder
        .next_symbol()
        .wrap_err("input file corrupted")?
    {
        block.push(symbol);
        if block.len() == ruhuff::BLOCK_SIZE {
            sink.write_all(&block)?;
            block.clear();
        }
    }
    sink.write_all(&block)?;
    sink.flush()?;
    Ok(DecompressionStats {
        compressed_size: decoder.bytes_read(),
        decompressed_size: decoder.decoded(),
    })
}

fn read_all(mut source: impl Read) -> Result<Vec<u8>> {
    let mut data = Vec::new();
    source
        .read_to_end(&mut data)
        .wrap_err("failed to read input")?;
    Ok(data)
}

fn create_output(path: &Path) -> Result<File> {
    File::create(path).wrap_err_with(|| format!("failed to create output file {}", path.display()))
}

fn remove_partial_output(path: &Path) {
    if let Err(e) = fs::remove_file(path) {
        info!("could not remove partial output {}: {}", path.display(), e);
    }
}

#[cfg(unix)]
fn permissions_of(metadata: &Metadata) -> u16 {
    use std::os::unix::fs::PermissionsExt;
    (metadata.permissions().mode() & 0xFFFF) as u16
}

#[cfg(not(unix))]
fn permissions_of(_metadata: &Metadata) -> u16 {
    DEFAULT_PERMISSIONS
}

#[cfg(unix)]
fn apply_permissions(file: &File, permissions: u16) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    let mode = u32::from(permissions) & 0o7777;
    file.set_permissions(fs::Permissions::from_mode(mode))
        .wrap_err("failed to set permissions of the output file")
}

#[cfg(not(unix))]
fn apply_permissions(_file: &File, _permissions: u16) -> Result<()> {
    Ok(())
}

fn print_compression_stats(stats: &CompressionStats) {
    eprintln!(
        "{} {} bytes",
        style("Uncompressed file size:").bold(),
        stats.original_size
    );
    eprintln!(
        "{} {} bytes",
        style("Compressed file size:").bold(),
        stats.compressed_size
    );
    eprintln!("{} {:.2}%", style("Space saving:").bold(), stats.space_saving());
}

fn print_decompression_stats(stats: &DecompressionStats) {
    eprintln!(
        "{} {} bytes",
        style("Compressed file size:").bold(),
        stats.compressed_size
    );
    eprintln!(
        "{} {} bytes",
        style("Decompressed file size:").bold(),
        stats.decompressed_size
    );
    eprintln!("{} {:.2}%", style("Space saving:").bold(), stats.space_saving());
}
