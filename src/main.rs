use clap::{CommandFactory, Parser, Subcommand};
use colored::Colorize;
use ezcodec::format::header::HEADER_SIZE;
use ezcodec::{EzcConverter, EzcHeader, EzcResult, VERSION};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;
use tracing::{debug, info};

#[derive(Parser)]
#[command(
    name = "ezc",
    about = "EZC block-DCT grayscale image codec",
    disable_version_flag = true
)]
struct Cli {
    /// Print version
    #[arg(short = 'v', long = "version")]
    version: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Encode an image file into an .ezc container
    Encode {
        #[arg(short, long, value_name = "IMAGE")]
        input: PathBuf,
        #[arg(short, long, value_name = "EZC")]
        output: PathBuf,
        /// Compression quality 1-100, out-of-range values are clamped
        #[arg(short, long, default_value_t = 50, allow_negative_numbers = true)]
        quality: i32,
        /// Worker threads (defaults to available parallelism)
        #[arg(short = 'j', long)]
        threads: Option<usize>,
    },
    /// Decode an .ezc container into an image file
    Decode {
        #[arg(short, long, value_name = "EZC")]
        input: PathBuf,
        #[arg(short, long, value_name = "IMAGE")]
        output: PathBuf,
        #[arg(short = 'j', long)]
        threads: Option<usize>,
    },
    /// Show the header of an .ezc container
    Info {
        #[arg(short, long, value_name = "EZC")]
        input: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if cli.version {
        println!("EzCodec {}", VERSION);
        return ExitCode::SUCCESS;
    }

    let Some(command) = cli.command else {
        let _ = Cli::command().print_help();
        return ExitCode::FAILURE;
    };

    let result = match command {
        Command::Encode {
            input,
            output,
            quality,
            threads,
        } => encode_image(&input, &output, quality, threads),
        Command::Decode {
            input,
            output,
            threads,
        } => decode_image(&input, &output, threads),
        Command::Info { input } => show_info(&input),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

fn converter(threads: Option<usize>) -> EzcConverter {
    match threads {
        Some(n) => EzcConverter::new().with_threads(n),
        None => EzcConverter::new(),
    }
}

fn encode_image(
    input: &Path,
    output: &Path,
    quality: i32,
    threads: Option<usize>,
) -> EzcResult<()> {
    let converter = converter(threads).with_quality(quality);
    println!(
        "{} {} → {} (quality: {})",
        "Encoding".cyan().bold(),
        input.display().to_string().yellow(),
        output.display().to_string().green(),
        converter.quality().to_string().magenta()
    );

    let start = Instant::now();
    let encoded = converter.to_ezc(input, output)?;
    info!(
        blocks = encoded.blocks.len(),
        elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
        "encoded"
    );

    let input_size = std::fs::metadata(input)?.len();
    let output_size = std::fs::metadata(output)?.len();
    let ratio = output_size as f64 / input_size.max(1) as f64 * 100.0;

    println!("{}", "✓ Encoded successfully!".green().bold());
    println!(
        "  {} {}x{}, {} blocks",
        "Image: ".dimmed(),
        encoded.header.width.to_string().white(),
        encoded.header.height.to_string().white(),
        encoded.blocks.len().to_string().white()
    );
    println!(
        "  {} {} bytes",
        "Input: ".dimmed(),
        input_size.to_string().white()
    );
    println!(
        "  {} {} bytes",
        "Output:".dimmed(),
        output_size.to_string().white()
    );
    println!(
        "  {} {}%",
        "Ratio: ".dimmed(),
        format!("{:.1}", ratio).cyan()
    );

    Ok(())
}

fn decode_image(input: &Path, output: &Path, threads: Option<usize>) -> EzcResult<()> {
    println!(
        "{} {} → {}",
        "Decoding".cyan().bold(),
        input.display().to_string().yellow(),
        output.display().to_string().green()
    );

    let start = Instant::now();
    let decoded = converter(threads).from_ezc(input, output)?;
    info!(
        blocks = decoded.header.block_count(),
        elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
        "decoded"
    );

    println!("{}", "✓ Decoded successfully!".green().bold());
    println!(
        "  {} {}x{}",
        "Dimensions:".dimmed(),
        decoded.header.width.to_string().white(),
        decoded.header.height.to_string().white()
    );
    println!(
        "  {} {}",
        "Quality:   ".dimmed(),
        decoded.header.quality.to_string().magenta()
    );

    Ok(())
}

fn show_info(input: &Path) -> EzcResult<()> {
    let file_size = std::fs::metadata(input)?.len();
    let header = EzcHeader::read(&mut BufReader::new(File::open(input)?))?;
    header.validate()?;
    debug!(?header, file_size, "read header");

    println!();
    println!("{}", "═══ EZC Image Information ═══".cyan().bold());
    println!("{} {}", "Version:".dimmed(), header.version.to_string().green());
    println!(
        "{} {}x{}",
        "Dimensions:".dimmed(),
        header.width.to_string().white(),
        header.height.to_string().white()
    );
    println!(
        "{} {}",
        "Quality:".dimmed(),
        header.quality.to_string().yellow()
    );
    println!(
        "{} {}x{} blocks of {}x{}",
        "Block Grid:".dimmed(),
        header.block_count_x.to_string().white(),
        header.block_count_y.to_string().white(),
        header.block_dim,
        header.block_dim
    );
    println!(
        "{} {} bytes (+{} header)",
        "Payload:".dimmed(),
        header.payload_size().to_string().white(),
        HEADER_SIZE
    );
    if file_size as usize != header.file_size() {
        println!(
            "{} file is {} bytes, expected {}",
            "Warning:".yellow().bold(),
            file_size,
            header.file_size()
        );
    }
    println!(
        "{} {}",
        "Bytes/Pixel:".dimmed(),
        format!("{:.3}", file_size as f64 / header.pixel_count() as f64).cyan()
    );
    println!();

    Ok(())
}
