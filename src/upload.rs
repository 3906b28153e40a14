// Assignment upload: replay a CSV of room assignments as one scheduling
// POST per section. Two typed confirmations guard the run; there is no
// undo, so a failure part-way leaves earlier sections scheduled.

use anyhow::{Context, Result};
use std::io::Write;
use std::path::Path;
use tracing::info;

use crate::assignments::{block_room_assignments, Block, SectionAssignments};
use crate::session::{Session, CSRF_FIELD};
use crate::transport::Transport;
use crate::ui::Confirmation;

pub const SCHEDULE_ENDPOINT: &str = "ajax_schedule_class";
pub const ASSIGN_ACTION: &str = "assignreg";
pub const PROGRESS_EVERY: usize = 100;
pub const DECLINED_MESSAGE: &str = "You told me to stop.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadOutcome {
    /// The operator said no; nothing was sent.
    Declined,
    Completed { scheduled: usize },
}

/// Ask twice, then schedule every section in `source_csv`.
///
/// The CSV is read between the two prompts so the second one can show
/// how much is about to change. Per-section responses and progress
/// counts go to `out`.
pub fn upload_assignments<T, C, W>(
    session: &Session<T>,
    program: &str,
    source_csv: &Path,
    confirm: &mut C,
    out: &mut W,
) -> Result<UploadOutcome>
where
    T: Transport,
    C: Confirmation + ?Sized,
    W: Write + ?Sized,
{
    let host = session.site().host();
    if !confirm.confirm(&format!("Are you sure you want to load data to {}? (type yes)", host))? {
        writeln!(out, "{}", DECLINED_MESSAGE)?;
        return Ok(UploadOutcome::Declined);
    }

    let assignments = SectionAssignments::from_path(source_csv)?;

    let prompt = format!(
        "About to schedule {} sections ({} rows). Are you really sure? (type yes)",
        assignments.section_count(),
        assignments.row_count()
    );
    if !confirm.confirm(&prompt)? {
        writeln!(out, "{}", DECLINED_MESSAGE)?;
        return Ok(UploadOutcome::Declined);
    }

    let url = session.site().program_url(program, SCHEDULE_ENDPOINT);
    let mut scheduled = 0;

    for (section, blocks) in assignments.into_sorted() {
        let token = session.csrf_token()?;
        let fields = schedule_fields(&token, &section, &blocks);
        let page = session
            .post_form(&url, &fields)
            .with_context(|| format!("Failed to schedule section {} ({} done before it)", section, scheduled))?;

        writeln!(out, " -- Scheduled section {}.  Response: {}", section, page.text())?;
        scheduled += 1;
        if scheduled % PROGRESS_EVERY == 0 {
            writeln!(out, "Scheduled {} sections so far.", scheduled)?;
        }
    }

    writeln!(out, "Scheduled {} sections successfully.", scheduled)?;
    info!(scheduled, %url, "upload finished");
    Ok(UploadOutcome::Completed { scheduled })
}

/// Form body for one section.
pub fn schedule_fields(token: &str, section: &str, blocks: &[Block]) -> Vec<(String, String)> {
    vec![
        (CSRF_FIELD.to_string(), token.to_string()),
        ("cls".to_string(), section.to_string()),
        ("action".to_string(), ASSIGN_ACTION.to_string()),
        ("block_room_assignments".to_string(), block_room_assignments(blocks)),
    ]
}
