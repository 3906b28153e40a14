// Entrypoint for `data-loader`: log in, then either list the available
// programs or download a program's AJAX exports into a directory.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

use esp_schedule_tools::config::ConnectionArgs;
use esp_schedule_tools::loader::{load_data, DATA_ENDPOINTS};
use esp_schedule_tools::{logging, programs, ui};

#[derive(Parser)]
#[command(name = "data-loader", version, about = "Download a program's scheduling data exports")]
struct Args {
    /// Print the programs on the site and exit
    #[arg(short = 'l', long)]
    list_programs: bool,

    #[command(flatten)]
    connection: ConnectionArgs,

    /// Program slug, e.g. Splash/2012 (see --list-programs)
    #[arg(short = 'r', long, required_unless_present = "list_programs")]
    program: Option<String>,

    /// Directory the exports are written to
    #[arg(short = 't', long, required_unless_present = "list_programs")]
    target_dir: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    logging::init(args.connection.verbose);

    let session = ui::connect(&args.connection)?;

    if args.list_programs {
        let slugs = programs::list_programs(&session)?;
        programs::print_programs(&slugs);
        return Ok(());
    }

    let program = args.program.context("--program is required")?;
    let target_dir = args.target_dir.context("--target-dir is required")?;

    let progress = ui::download_progress(DATA_ENDPOINTS.len() as u64)?;
    let written = load_data(&session, &program, &target_dir, &progress)?;
    println!("Saved {} files to {}", written.len(), target_dir.display());
    Ok(())
}
