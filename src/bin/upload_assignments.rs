// Entrypoint for `upload-assignments`: log in, then either list the
// available programs or push a CSV of room assignments to a program.

use anyhow::{Context, Result};
use clap::Parser;
use std::io;
use std::path::PathBuf;

use esp_schedule_tools::config::ConnectionArgs;
use esp_schedule_tools::ui::TerminalPrompt;
use esp_schedule_tools::upload::upload_assignments;
use esp_schedule_tools::{logging, programs, ui};

#[derive(Parser)]
#[command(name = "upload-assignments", version, about = "Schedule sections from a CSV of room assignments")]
struct Args {
    /// Print the programs on the site and exit
    #[arg(short = 'l', long)]
    list_programs: bool,

    #[command(flatten)]
    connection: ConnectionArgs,

    /// Program slug, e.g. Splash/2012 (see --list-programs)
    #[arg(short = 'r', long, required_unless_present = "list_programs")]
    program: Option<String>,

    /// CSV of section,room,period rows, no header
    #[arg(short = 's', long, required_unless_present = "list_programs")]
    source_csv: Option<PathBuf>,
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
    let source_csv = args.source_csv.context("--source-csv is required")?;

    upload_assignments(&session, &program, &source_csv, &mut TerminalPrompt, &mut io::stdout().lock())?;
    Ok(())
}
