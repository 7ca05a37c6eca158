use super::*;
use clap::CommandFactory;

#[test]
fn verify_cli_args() {
    // Validates the entire command tree: short flag conflicts,
    // duplicate args, and other clap definition errors.
    Cli::command().debug_assert();
}

#[test]
fn make_bump_flags_are_exclusive() {
    let result = Cli::try_parse_from(["shipver", "make", "launch", "--major", "--minor"]);
    assert!(result.is_err());
}

#[test]
fn make_defaults_to_patch() {
    let cli = Cli::try_parse_from(["shipver", "make", "fix_typo"]).unwrap();
    match cli.command {
        Commands::Make(args) => {
            assert_eq!(args.bump(), BumpKind::Patch);
            assert!(args.notes.is_empty());
        }
        other => panic!("unexpected command {other:?}"),
    }
}

#[test]
fn make_collects_options() {
    let cli = Cli::try_parse_from([
        "shipver", "make", "launch", "--major", "--pre", "beta", "--migrate", "-n", "One", "-n",
        "Two",
    ])
    .unwrap();
    let Commands::Make(args) = cli.command else {
        panic!("expected make");
    };
    assert_eq!(args.bump(), BumpKind::Major);
    assert_eq!(args.pre_release.as_deref(), Some("beta"));
    assert!(args.migrate);
    assert_eq!(args.notes, vec!["One", "Two"]);
}

#[test]
fn global_flags_after_subcommand() {
    let cli = Cli::try_parse_from(["shipver", "status", "-p", "/srv/app", "-d", ":memory:", "-v"])
        .unwrap();
    assert_eq!(cli.global.project_dir, PathBuf::from("/srv/app"));
    assert_eq!(cli.global.database.as_deref(), Some(":memory:"));
    assert!(cli.global.verbose);
}

#[test]
fn version_format_maps_to_service_format() {
    let cli = Cli::try_parse_from(["shipver", "version", "--format", "long"]).unwrap();
    let Commands::Version(args) = cli.command else {
        panic!("expected version");
    };
    assert_eq!(VersionFormat::from(args.format), VersionFormat::Long);
}

#[test]
fn notes_level_defaults_to_all() {
    let cli = Cli::try_parse_from(["shipver", "notes", "--json"]).unwrap();
    let Commands::Notes(args) = cli.command else {
        panic!("expected notes");
    };
    assert_eq!(NotesLevel::from(args.level), NotesLevel::All);
    assert!(args.json);
}
