//! Command handlers.
//!
//! Each handler writes its report to the given sink so the binary can pass
//! stdout and tests can capture a buffer.

use crate::cli::{Cli, Command, CompareArgs, GenerateArgs, ViewArgs};
use crate::config::Config;
use crate::display::listing::{write_delta, write_listing};
use crate::snapshot::{compare_snapshots, read_snapshot, SnapshotWriter};
use crate::utils::errors::{Result, SnapshotError};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

const SNAPSHOT_EXTENSION: &str = "snap";

/// Dispatch a parsed command line.
pub fn run(cli: &Cli, config: &Config, out: &mut dyn Write) -> Result<()> {
    let human = cli.human || config.display.human;

    match &cli.command {
        Command::Generate(args) => generate(args, config, human, out),
        Command::View(args) => view(args, human, out),
        Command::Compare(args) => compare(args, human, out),
    }
}

/// Snapshot `args.src_path` into the output directory.
pub fn generate(
    args: &GenerateArgs,
    config: &Config,
    human: bool,
    out: &mut dyn Write,
) -> Result<()> {
    let mut options = config.snapshot.walk_options();
    options.ignore_hidden |= args.ignore_hidden;
    options.ignore_symlinks |= args.ignore_symlinks;
    if let Some(depth) = args.max_recursion_depth {
        options = options.with_depth_limit(depth);
    }

    // Resolves the source; a missing one fails before any output exists
    let writer = SnapshotWriter::new(&args.src_path, options)?;

    let output_dir = match args.output_dir.as_ref().or(config.snapshot.output_dir.as_ref()) {
        Some(dir) => dir.clone(),
        None => std::env::current_dir().map_err(|e| SnapshotError::io(".", e))?,
    };
    fs::create_dir_all(&output_dir).map_err(|e| SnapshotError::io(&output_dir, e))?;

    let destination = resolve_output_path(writer.root(), args.output.as_deref(), &output_dir);
    info!(
        "Generate: source={}, snapshot={}",
        writer.root().display(),
        destination.display()
    );

    writeln!(out, "Taking snapshot from source: {}", writer.root().display())?;
    writeln!(out)?;

    writer.write_to_path(&destination)?;

    let saved = fs::canonicalize(&destination).unwrap_or_else(|_| destination.clone());
    writeln!(out, "Snapshot Saved in: {}", saved.display())?;
    writeln!(out)?;

    if args.show_override().unwrap_or(config.snapshot.show) {
        let entries = read_snapshot(&destination)?;
        write_listing(out, &entries, human)?;
    }

    Ok(())
}

/// Print the summary and entries of one snapshot file.
pub fn view(args: &ViewArgs, human: bool, out: &mut dyn Write) -> Result<()> {
    let path = resolve_existing(&args.snapshot_file)?;
    let entries = read_snapshot(&path)?;

    writeln!(out, "Viewing Snapshot: {}", path.display())?;
    write_listing(out, &entries, human)?;

    Ok(())
}

/// Print the differences between two snapshot files.
pub fn compare(args: &CompareArgs, human: bool, out: &mut dyn Write) -> Result<()> {
    let path_a = resolve_existing(&args.snap_a)?;
    let path_b = resolve_existing(&args.snap_b)?;
    let delta = compare_snapshots(&path_a, &path_b)?;

    writeln!(
        out,
        "Comparing Snapshots:\n  1. {}\n  2. {}",
        path_a.display(),
        path_b.display()
    )?;
    writeln!(out)?;
    write_delta(out, &delta, human)?;

    Ok(())
}

/// Destination for a new snapshot of `source` inside `output_dir`.
///
/// An explicit name is used as given. Otherwise the source's name with a
/// `.snap` extension, adding ` (2)`, ` (3)`, ... until the name is free.
pub fn resolve_output_path(source: &Path, output: Option<&str>, output_dir: &Path) -> PathBuf {
    if let Some(name) = output.filter(|n| !n.is_empty()) {
        return output_dir.join(name);
    }

    let stem = source
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "snapshot".to_string());

    let mut candidate = output_dir.join(format!("{}.{}", stem, SNAPSHOT_EXTENSION));
    let mut counter = 2u64;
    while candidate.exists() {
        candidate = output_dir.join(format!("{} ({}).{}", stem, counter, SNAPSHOT_EXTENSION));
        counter += 1;
    }

    candidate
}

fn resolve_existing(path: &Path) -> Result<PathBuf> {
    fs::canonicalize(path).map_err(|e| SnapshotError::io(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use tempfile::TempDir;

    fn run_cli(args: &[&str], config: &Config) -> Result<String> {
        let cli = Cli::try_parse_from(args).unwrap();
        let mut buf = Vec::new();
        run(&cli, config, &mut buf)?;
        Ok(String::from_utf8(buf).unwrap())
    }

    fn sample_tree(base: &Path) -> PathBuf {
        let root = base.join("data");
        fs::create_dir_all(root.join("sub")).unwrap();
        fs::write(root.join("a.txt"), b"abc").unwrap();
        fs::write(root.join("sub/b.txt"), b"hello").unwrap();
        root
    }

    #[test]
    fn test_resolve_output_path_explicit_name() {
        let dir = TempDir::new().unwrap();
        let path = resolve_output_path(Path::new("/src/data"), Some("mine.bin"), dir.path());
        assert_eq!(path, dir.path().join("mine.bin"));
    }

    #[test]
    fn test_resolve_output_path_numbers_collisions() {
        let dir = TempDir::new().unwrap();
        let source = Path::new("/src/data");

        assert_eq!(resolve_output_path(source, None, dir.path()), dir.path().join("data.snap"));

        fs::write(dir.path().join("data.snap"), b"").unwrap();
        assert_eq!(
            resolve_output_path(source, None, dir.path()),
            dir.path().join("data (2).snap")
        );

        fs::write(dir.path().join("data (2).snap"), b"").unwrap();
        assert_eq!(
            resolve_output_path(source, None, dir.path()),
            dir.path().join("data (3).snap")
        );
    }

    #[test]
    fn test_generate_then_view() {
        let tmp = TempDir::new().unwrap();
        let root = sample_tree(tmp.path());
        let out_dir = tmp.path().join("snaps");

        let text = run_cli(
            &[
                "disk-snapshot",
                "generate",
                root.to_str().unwrap(),
                "--output-dir",
                out_dir.to_str().unwrap(),
            ],
            &Config::default(),
        )
        .unwrap();

        assert!(out_dir.join("data.snap").is_file());
        assert!(text.starts_with("Taking snapshot from source: "));
        assert!(text.contains("Snapshot Saved in: "));
        assert!(text.contains("Contains: 2 Files, 2 Directories, 0 Others"));
        assert!(text.contains("FILE: data/a.txt hash=\"ba7816bf"));

        let snap = out_dir.join("data.snap");
        let text = run_cli(&["disk-snapshot", "view", snap.to_str().unwrap(), "-H"], &Config::default())
            .unwrap();
        assert!(text.starts_with("Viewing Snapshot: "));
        assert!(text.contains("size=\"5 bytes\""));
    }

    #[test]
    fn test_generate_no_show_and_auto_numbering() {
        let tmp = TempDir::new().unwrap();
        let root = sample_tree(tmp.path());
        let out_dir = tmp.path().join("snaps");
        let args = [
            "disk-snapshot",
            "g",
            root.to_str().unwrap(),
            "--output-dir",
            out_dir.to_str().unwrap(),
            "--no-show",
        ];

        let first = run_cli(&args, &Config::default()).unwrap();
        let second = run_cli(&args, &Config::default()).unwrap();

        assert!(!first.contains("Snapshot Summary:"));
        assert!(out_dir.join("data.snap").is_file());
        assert!(out_dir.join("data (2).snap").is_file());
        assert!(second.contains("data (2).snap"));
    }

    #[test]
    fn test_generate_uses_config_output_dir() {
        let tmp = TempDir::new().unwrap();
        let root = sample_tree(tmp.path());

        let mut config = Config::default();
        config.snapshot.output_dir = Some(tmp.path().join("from-config"));
        config.snapshot.show = false;

        run_cli(&["disk-snapshot", "generate", root.to_str().unwrap()], &config).unwrap();
        assert!(tmp.path().join("from-config/data.snap").is_file());
    }

    #[test]
    fn test_generate_missing_source_writes_nothing() {
        let tmp = TempDir::new().unwrap();
        let out_dir = tmp.path().join("snaps");
        let missing = tmp.path().join("missing");

        let result = run_cli(
            &[
                "disk-snapshot",
                "generate",
                missing.to_str().unwrap(),
                "--output-dir",
                out_dir.to_str().unwrap(),
            ],
            &Config::default(),
        );

        assert!(matches!(result, Err(SnapshotError::NotFound(_))));
        assert!(!out_dir.exists());
    }

    #[test]
    fn test_compare_reports_changes() {
        let tmp = TempDir::new().unwrap();
        let root = sample_tree(tmp.path());
        let before = tmp.path().join("before.snap");
        let after = tmp.path().join("after.snap");

        SnapshotWriter::new(&root, Default::default())
            .unwrap()
            .write_to_path(&before)
            .unwrap();
        fs::write(root.join("c.txt"), b"new").unwrap();
        fs::remove_file(root.join("sub/b.txt")).unwrap();
        SnapshotWriter::new(&root, Default::default())
            .unwrap()
            .write_to_path(&after)
            .unwrap();

        let text = run_cli(
            &["disk-snapshot", "compare", before.to_str().unwrap(), after.to_str().unwrap()],
            &Config::default(),
        )
        .unwrap();

        assert!(text.starts_with("Comparing Snapshots:\n  1. "));
        assert!(text.contains("--- Added ---\n+ FILE: data/c.txt"));
        assert!(text.contains("--- Removed ---\n- FILE: data/sub/b.txt"));
    }

    #[test]
    fn test_compare_identical() {
        let tmp = TempDir::new().unwrap();
        let root = sample_tree(tmp.path());
        let snap = tmp.path().join("one.snap");
        SnapshotWriter::new(&root, Default::default())
            .unwrap()
            .write_to_path(&snap)
            .unwrap();

        let text = run_cli(
            &["disk-snapshot", "c", snap.to_str().unwrap(), snap.to_str().unwrap()],
            &Config::default(),
        )
        .unwrap();
        assert!(text.ends_with("Compare: No differences found!\n"));
    }

    #[test]
    fn test_view_missing_file() {
        let tmp = TempDir::new().unwrap();
        let missing = tmp.path().join("nope.snap");
        let result = run_cli(&["disk-snapshot", "view", missing.to_str().unwrap()], &Config::default());
        assert!(matches!(result, Err(SnapshotError::NotFound(_))));
    }
}
