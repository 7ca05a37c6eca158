//! Version command implementation

use anyhow::Result;

use crate::cli::{GlobalArgs, VersionArgs};
use crate::context::ProjectContext;

/// Execute the version command
pub(crate) fn execute(args: &VersionArgs, global: &GlobalArgs) -> Result<()> {
    let ctx = ProjectContext::load(global)?;
    let store = ctx.open_store()?;
    let service = ctx.version_service(&store);

    if args.date {
        match service.date()? {
            Some(date) => println!("{}", date.format("%Y-%m-%d %H:%M:%S")),
            None => println!("unknown"),
        }
        return Ok(());
    }

    println!("{}", service.render(args.format.into())?);
    Ok(())
}
