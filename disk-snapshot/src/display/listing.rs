//! Text rendering of snapshots and deltas.

use crate::display::units::{format_count, format_size, format_time};
use crate::snapshot::{Delta, Entry, EntryType, Modification};
use std::io::{self, Write};

/// One line describing an entry.
///
/// Files show hash, size and time; directories and symlinks only time.
pub fn entry_line(entry: &Entry, human: bool) -> String {
    let mut line = format!("{}: {}", entry.entry_type, entry.path);

    if entry.entry_type == EntryType::File {
        line.push_str(&format!(
            " hash=\"{}\" size=\"{}\"",
            entry.hash_hex(),
            format_size(entry.size, human)
        ));
    }
    line.push_str(&format!(" time=\"{}\"", format_time(entry.mtime, human)));

    line
}

/// One line describing a modification as `old -> new` per field.
pub fn modification_line(change: &Modification, human: bool) -> String {
    let (before, after) = (&change.before, &change.after);
    let mut line = format!("{}: {}", before.entry_type, before.path);

    if before.entry_type == EntryType::File {
        line.push_str(&format!(
            " hash=\"{} -> {}\" size=\"{} -> {}\"",
            before.hash_hex(),
            after.hash_hex(),
            format_size(before.size, human),
            format_size(after.size, human)
        ));
    }
    line.push_str(&format!(
        " time=\"{} -> {}\"",
        format_time(before.mtime, human),
        format_time(after.mtime, human)
    ));

    line
}

/// Summary counts; symlinks are reported under "Others".
pub fn summary(entries: &[Entry]) -> String {
    let files = entries
        .iter()
        .filter(|e| e.entry_type == EntryType::File)
        .count();
    let directories = entries
        .iter()
        .filter(|e| e.entry_type == EntryType::Directory)
        .count();
    let others = entries.len() - files - directories;

    format!(
        "Snapshot Summary:\nContains: {} Files, {} Directories, {} Others",
        format_count(files),
        format_count(directories),
        format_count(others)
    )
}

/// Write the summary followed by every entry.
pub fn write_listing<W: Write + ?Sized>(
    out: &mut W,
    entries: &[Entry],
    human: bool,
) -> io::Result<()> {
    writeln!(out, "{}", summary(entries))?;
    writeln!(out)?;
    for entry in entries {
        writeln!(out, "{}", entry_line(entry, human))?;
    }
    Ok(())
}

/// Write a delta as counts plus added/removed/modified sections.
pub fn write_delta<W: Write + ?Sized>(out: &mut W, delta: &Delta, human: bool) -> io::Result<()> {
    if delta.is_empty() {
        writeln!(out, "Compare: No differences found!")?;
        return Ok(());
    }

    writeln!(
        out,
        "[Added: {}, Removed: {}, Modified: {}]",
        delta.added.len(),
        delta.removed.len(),
        delta.modified.len()
    )?;

    if !delta.added.is_empty() {
        writeln!(out, "--- Added ---")?;
        for entry in &delta.added {
            writeln!(out, "+ {}", entry_line(entry, human))?;
        }
        writeln!(out)?;
    }
    if !delta.removed.is_empty() {
        writeln!(out, "--- Removed ---")?;
        for entry in &delta.removed {
            writeln!(out, "- {}", entry_line(entry, human))?;
        }
        writeln!(out)?;
    }
    if !delta.modified.is_empty() {
        writeln!(out, "--- Modified ---")?;
        for change in &delta.modified {
            writeln!(out, "* {}", modification_line(change, human))?;
        }
        writeln!(out)?;
    }

    Ok(())
}
