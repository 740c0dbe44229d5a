mod commands;

use blendjobs_handler::HandlerError;
use blendjobs_parser::{BlendError, ErrorClass, ScanMode, ScanOptions};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(author, version, about = "Read render frame ranges from .blend files and size array jobs")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Walk every block instead of stopping at the first non-REND block
    #[arg(long, global = true)]
    all_blocks: bool,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List the scene records stored in a file
    Scenes { file: PathBuf },
    /// Compute frame count and array job size for the first scene
    Jobs {
        file: PathBuf,
        #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..))]
        frames_per_job: u32,
    },
    /// Run the event handler on a JSON request read from a file or stdin ("-")
    Handle {
        event: PathBuf,
        /// Directory downloaded objects are written to
        #[arg(long)]
        download_dir: Option<PathBuf>,
        /// Texture key fetched from the input's bucket
        #[arg(long)]
        texture_key: Option<String>,
    },
}

impl Cli {
    fn scan_options(&self) -> ScanOptions {
        ScanOptions {
            mode: if self.all_blocks {
                ScanMode::AllBlocks
            } else {
                ScanMode::LeadingRend
            },
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e:#}");
            ExitCode::from(exit_code(&e))
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let options = cli.scan_options();
    match cli.command {
        Commands::Scenes { file } => commands::cmd_scenes(&file, &options, cli.json),
        Commands::Jobs {
            file,
            frames_per_job,
        } => commands::cmd_jobs(&file, frames_per_job, &options, cli.json),
        Commands::Handle {
            event,
            download_dir,
            texture_key,
        } => commands::cmd_handle(&event, download_dir, texture_key, options.mode),
    }
}

/// 2: input not found, 3: no scene record to size jobs from, 1: anything else.
fn exit_code(err: &anyhow::Error) -> u8 {
    let scan = err.downcast_ref::<BlendError>().or_else(|| {
        err.downcast_ref::<HandlerError>()
            .and_then(HandlerError::as_scan_error)
    });
    if let Some(scan) = scan {
        return match scan.kind() {
            ErrorClass::NotFound => 2,
            ErrorClass::MissingData => 3,
            ErrorClass::Decode | ErrorClass::Input => 1,
        };
    }
    if let Some(HandlerError::NotFound(_)) = err.downcast_ref::<HandlerError>() {
        return 2;
    }
    1
}

fn init_logging(verbose: u8) {
    let log_level = match verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };

    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .format_timestamp(None)
        .format(|buf, record| {
            use std::io::Write;
            writeln!(buf, "[{}] {}", record.level(), record.args())
        })
        .init();
}
