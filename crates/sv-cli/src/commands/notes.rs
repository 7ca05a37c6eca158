//! Notes command implementation - prints release notes from the ledger

use anyhow::Result;
use sv_deploy::ReleaseEntry;

use crate::cli::{GlobalArgs, NotesArgs};
use crate::context::ProjectContext;

/// Execute the notes command
pub(crate) fn execute(args: &NotesArgs, global: &GlobalArgs) -> Result<()> {
    let ctx = ProjectContext::load(global)?;
    let store = ctx.open_store()?;
    let entries = ctx.version_service(&store).release_notes(args.level.into())?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    print!("{}", format_entries(&entries));
    Ok(())
}

/// Plain-text rendering: one heading per release, one bullet per note.
fn format_entries(entries: &[ReleaseEntry]) -> String {
    let mut out = String::new();
    for entry in entries {
        match entry.deployed_at {
            Some(at) => out.push_str(&format!("{} ({})\n", entry.release, at.format("%Y-%m-%d"))),
            None => out.push_str(&format!("{}\n", entry.release)),
        }
        match entry.notes.value() {
            serde_json::Value::Array(items) => {
                for item in items {
                    match item {
                        serde_json::Value::String(s) => out.push_str(&format!("  - {s}\n")),
                        other => out.push_str(&format!("  - {other}\n")),
                    }
                }
            }
            serde_json::Value::String(s) if !s.is_empty() => out.push_str(&format!("  {s}\n")),
            value if !entry.notes.is_empty() => out.push_str(&format!("  {value}\n")),
            _ => {}
        }
    }
    out
}
