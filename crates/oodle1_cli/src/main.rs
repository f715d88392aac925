use std::{io::stdout, path::PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};
use miette::{IntoDiagnostic, miette};
use oodle1_decompress::Compression;
use tracing_subscriber::{EnvFilter, prelude::*};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decompresses a section extracted from a GR2 file
    Decompress(DecompressArgs),
}

#[derive(Args)]
struct DecompressArgs {
    /// Input file holding the compressed section
    input: PathBuf,

    /// Output file
    output: Option<PathBuf>,

    /// Output offset where the second pass starts
    #[arg(long, default_value_t = 0)]
    stop0: u32,

    /// Output offset where the third pass starts
    #[arg(long, default_value_t = 0)]
    stop1: u32,

    /// Decompressed size of the section
    #[arg(long)]
    size: u32,

    /// Compression of the section
    #[arg(long, value_enum, default_value_t = CompressionArg::Oodle1)]
    compression: CompressionArg,
}

#[derive(Clone, Copy, ValueEnum)]
enum CompressionArg {
    None,
    Oodle0,
    Oodle1,
    Bitknit1,
    Bitknit2,
}

impl From<CompressionArg> for Compression {
    fn from(arg: CompressionArg) -> Self {
        match arg {
            CompressionArg::None => Self::None,
            CompressionArg::Oodle0 => Self::Oodle0,
            CompressionArg::Oodle1 => Self::Oodle1,
            CompressionArg::Bitknit1 => Self::BitKnit1,
            CompressionArg::Bitknit2 => Self::BitKnit2,
        }
    }
}

fn main() -> miette::Result<()> {
    let cli = Cli::parse();

    let file_appender = tracing_appender::rolling::never("target", "dump.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .without_time()
        .with_level(false);

    let stdout_layer = tracing_subscriber::fmt::layer()
        .with_writer(stdout)
        .with_ansi(true)
        .without_time()
        .with_level(false);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(file_layer)
        .with(stdout_layer)
        .init();

    match cli.command {
        Commands::Decompress(args) => {
            let output = match args.output {
                Some(output) => output,
                None => args
                    .input
                    .file_stem()
                    .ok_or_else(|| miette!("Unnamed input file {}", args.input.display()))?
                    .into(),
            };

            let data = std::fs::read(&args.input).into_diagnostic()?;
            let compression = Compression::from(args.compression);
            tracing::info!(
                input = %args.input.display(),
                %compression,
                compressed = data.len(),
                size = args.size,
                "decompressing section"
            );

            let decompressed = oodle1_decompress::decompress_section(
                compression,
                &data,
                args.stop0,
                args.stop1,
                args.size,
            )?;

            std::fs::write(&output, decompressed).into_diagnostic()?;
        }
    }
    Ok(())
}
