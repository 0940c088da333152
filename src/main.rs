use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use log::{error, info};
use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode};

use sci_rename::interrupt;
use sci_rename::pdf::PdfTitleSource;
use sci_rename::prompt::TerminalPrompt;
use sci_rename::renamer::{self, RenameConfig, Renamer};

/// Renames scientific paper PDFs after their extracted titles.
///
/// For each PDF the tool hashes the content to spot duplicates, reads the
/// metadata title, mines the largest-font text of the first page, and renames
/// the file after the chosen candidate. Renamed files move into an archive
/// subfolder next to the originals.
#[derive(Debug, Parser)]
#[command(name = "sci-rename", version)]
struct Cli {
    /// PDF file or directory of PDF files to rename
    target: PathBuf,

    /// Rename every file without asking for confirmation
    #[arg(short = 'y', long)]
    yes: bool,

    /// Prefix added to files whose content duplicates an earlier file
    #[arg(long, default_value = "dup_")]
    dup_prefix: String,

    /// Subfolder (under the target directory) renamed files are moved into
    #[arg(long, default_value = "auto_renamed_pdf")]
    archive_dir: String,

    /// Log every hash and extraction decision
    #[arg(short, long)]
    verbose: bool,
}

extern "C" fn on_sigint(_signal: libc::c_int) {
    interrupt::flag_interrupt();
}

/// Install the SIGINT handler without SA_RESTART, so a Ctrl+C makes a
/// blocked prompt read return EINTR instead of silently restarting.
fn install_sigint_handler() {
    unsafe {
        let mut action: libc::sigaction = std::mem::zeroed();
        action.sa_sigaction = on_sigint as extern "C" fn(libc::c_int) as libc::sighandler_t;
        action.sa_flags = 0;
        libc::sigemptyset(&mut action.sa_mask);
        libc::sigaction(libc::SIGINT, &action, std::ptr::null_mut());
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    TermLogger::init(
        if cli.verbose { LevelFilter::Debug } else { LevelFilter::Info },
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )?;

    if !cli.target.exists() {
        error!("Directory or file {} does not exist", cli.target.display());
        std::process::exit(1);
    }
    if cli.target.is_file() && !cli.target.to_string_lossy().ends_with(".pdf") {
        error!("{} is not a pdf file", cli.target.display());
        std::process::exit(1);
    }

    install_sigint_handler();

    info!("Target: {}", renamer::display_target(&cli.target).display());

    let config = RenameConfig {
        dup_prefix: cli.dup_prefix,
        archive_dir: cli.archive_dir,
        assume_yes: cli.yes,
    };
    let titles = PdfTitleSource;
    let mut prompt = TerminalPrompt;
    let mut renamer = Renamer::new(config, &titles, &mut prompt);

    let summary = renamer.run(&cli.target)?;

    if summary.aborted {
        info!("Run aborted");
    }
    info!(
        "Finished! Total files: {}, files renamed: {}",
        summary.scanned, summary.renamed
    );
    Ok(())
}
