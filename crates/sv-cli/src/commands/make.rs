//! Make command implementation - scaffolds a new deployment manifest

use anyhow::{anyhow, bail, Context, Result};
use chrono::{NaiveDateTime, Utc};
use minijinja::{context, Environment};
use std::fs;
use sv_core::scanner::TIMESTAMP_FORMAT;
use sv_core::{discover, BumpKind, DeploymentName, PreRelease};

use crate::cli::{GlobalArgs, MakeArgs};
use crate::context::ProjectContext;

/// Release note given to the first major deployment of a new project.
const INITIAL_RELEASE_NOTE: &str = "Initial Release";

const MANIFEST_TEMPLATE: &str = r#"# {{ name }}
bump: {{ bump }}
{% if pre_release %}
pre_release: {{ pre_release }}
{% endif %}
migrate: {{ migrate }}
transaction: true
{% if release_notes %}
release_notes:
{% for note in release_notes %}
  - {{ note }}
{% endfor %}
{% else %}
release_notes: []
{% endif %}
# SQL statements, executed in order
sql: []
"#;

/// Values rendered into a new manifest.
#[derive(Debug)]
pub(crate) struct ManifestStub {
    pub name: String,
    pub bump: BumpKind,
    pub pre_release: Option<PreRelease>,
    pub migrate: bool,
    pub notes: Vec<String>,
}

/// Execute the make command
pub(crate) fn execute(args: &MakeArgs, global: &GlobalArgs) -> Result<()> {
    let ctx = ProjectContext::load(global)?;

    let name = snake_case(&args.name)
        .ok_or_else(|| anyhow!("Invalid deployment name '{}'", args.name))?;
    let identifier = DeploymentName::try_new(name.as_str())
        .ok_or_else(|| anyhow!("Invalid deployment name '{}'", args.name))?;

    let paths = ctx.deployment_paths();
    let Some(dir) = paths.first() else {
        bail!("No deployment_paths configured");
    };
    if discover(&paths)?.iter().any(|f| f.name == identifier) {
        bail!("A deployment named '{identifier}' already exists");
    }

    let new_directory = !dir.exists();
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create directory: {}", dir.display()))?;

    let bump = args.bump();
    let mut notes = args.notes.clone();
    if new_directory && bump == BumpKind::Major && notes.is_empty() {
        notes.push(INITIAL_RELEASE_NOTE.to_string());
    }
    let pre_release = args
        .pre_release
        .as_deref()
        .map(PreRelease::parse)
        .transpose()?;

    let stub = ManifestStub {
        name: name.clone(),
        bump,
        pre_release,
        migrate: args.migrate,
        notes,
    };
    let content = render_manifest(&stub)?;

    let path = dir.join(manifest_file_name(Utc::now().naive_utc(), &name));
    fs::write(&path, content)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    println!("Created deployment: {}", path.display());
    Ok(())
}

/// `YYYY_MM_DD_HHMMSS_<name>.yml`
pub(crate) fn manifest_file_name(at: NaiveDateTime, name: &str) -> String {
    format!("{}_{}.yml", at.format(TIMESTAMP_FORMAT), name)
}

/// Normalise a free-form name to snake_case; `None` when nothing is left.
pub(crate) fn snake_case(name: &str) -> Option<String> {
    let mut out = String::new();
    let mut prev: Option<char> = None;
    for c in name.trim().chars() {
        if c.is_ascii_alphanumeric() {
            let boundary = c.is_ascii_uppercase()
                && prev.is_some_and(|p| p.is_ascii_lowercase() || p.is_ascii_digit());
            if boundary {
                out.push('_');
            }
            out.push(c.to_ascii_lowercase());
            prev = Some(c);
        } else {
            if !out.is_empty() && !out.ends_with('_') {
                out.push('_');
            }
            prev = None;
        }
    }
    let out = out.trim_end_matches('_');
    (!out.is_empty()).then(|| out.to_string())
}

/// Render the manifest body. Strings are emitted as JSON literals, which
/// YAML reads as double-quoted scalars.
pub(crate) fn render_manifest(stub: &ManifestStub) -> Result<String> {
    let mut env = Environment::new();
    env.set_trim_blocks(true);
    env.add_template("manifest", MANIFEST_TEMPLATE)?;

    let notes = stub
        .notes
        .iter()
        .map(|n| serde_json::to_string(n))
        .collect::<Result<Vec<_>, _>>()?;
    let pre_release = stub
        .pre_release
        .as_ref()
        .map(|p| serde_json::to_string(p.as_str()))
        .transpose()?;

    let rendered = env.get_template("manifest")?.render(context! {
        name => &stub.name,
        bump => stub.bump.as_str(),
        pre_release => pre_release,
        migrate => stub.migrate,
        release_notes => notes,
    })?;
    Ok(rendered + "\n")
}

#[cfg(test)]
#[path = "make_test.rs"]
mod tests;
