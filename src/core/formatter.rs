//! Display formatting for entries in filebeam.
//!
//! Turns entry sizes, modification times and device usage into the strings shown in the listing,
//! and provides [sanitize_to_exact_width] for fitting text into fixed width columns.

use crate::core::fm::{Entry, EntryKind};

use chrono::{DateTime, Local};
use humansize::{DECIMAL, format_size};
use unicode_width::UnicodeWidthChar;

use std::time::SystemTime;

/// Shown in place of a directory size while its size job is outstanding.
pub const CALCULATING: &str = "calculating…";

/// Formats a byte count into a human-readable string.
pub fn format_file_size(size: u64) -> String {
    format_size(size, DECIMAL)
}

/// Size column text for an entry.
///
/// Blank for the `..` entry and [CALCULATING] for a directory whose size is not known yet.
pub fn format_entry_size(entry: &Entry) -> String {
    match entry.kind() {
        EntryKind::Parent => String::new(),
        _ if !entry.size_known() => CALCULATING.to_string(),
        _ => format_file_size(entry.size()),
    }
}

/// "1 item" / "N items".
pub fn format_item_count(count: usize) -> String {
    if count == 1 {
        "1 item".to_string()
    } else {
        format!("{} items", count)
    }
}

/// Formats the modification time in local time, or "-" if unknown.
pub fn format_file_time(modified: Option<SystemTime>) -> String {
    modified
        .map(|mtime| {
            let dt: DateTime<Local> = DateTime::from(mtime);
            dt.format("%Y-%m-%d %H:%M").to_string()
        })
        .unwrap_or_else(|| "-".to_string())
}

/// Share of `capacity` taken by `size`, in percent.
///
/// `None` when the capacity is unknown (zero).
pub fn usage_percent(size: u64, capacity: u64) -> Option<f64> {
    if capacity == 0 {
        return None;
    }
    Some(size as f64 * 100.0 / capacity as f64)
}

/// Usage column text for an entry on a device of the given capacity.
///
/// Blank while the size is unknown, for the `..` entry, and when the capacity is unknown.
pub fn format_usage(entry: &Entry, capacity: u64) -> String {
    if entry.is_parent() || !entry.size_known() {
        return String::new();
    }
    match usage_percent(entry.size(), capacity) {
        Some(pct) if pct > 0.0 && pct < 0.1 => "<0.1%".to_string(),
        Some(pct) => format!("{pct:.1}%"),
        None => String::new(),
    }
}

/// Cleans `line` to exactly `width` terminal columns.
///
/// Control characters are removed, tabs expand to 4 column stops, and the result is truncated or
/// padded with spaces to fit.
pub fn sanitize_to_exact_width(line: &str, width: usize) -> String {
    let mut out = String::with_capacity(width);
    let mut current_w = 0;

    for ch in line.chars() {
        if ch == '\t' {
            let space_count = 4 - (current_w % 4);
            if current_w + space_count > width {
                break;
            }
            out.push_str(&" ".repeat(space_count));
            current_w += space_count;
            continue;
        }

        if ch.is_control() {
            continue;
        }

        let w = ch.width().unwrap_or(0);
        if current_w + w > width {
            break;
        }

        out.push(ch);
        current_w += w;
    }

    if current_w < width {
        out.push_str(&" ".repeat(width - current_w));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::core::list_dir;

    use std::fs::{self, File};
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn sanitize_produces_exact_width() {
        let cases = ["short.txt", "very_long_filename.txt", "🦀_crab.rs", "\t_tab", "bell\x07"];

        for input in cases {
            let result = sanitize_to_exact_width(input, 10);
            let width = unicode_width::UnicodeWidthStr::width(result.as_str());
            assert_eq!(width, 10, "input {input:?} produced {result:?}");
            assert!(!result.chars().any(|c| c.is_control()));
        }
    }

    #[test]
    fn sizes_are_decimal() {
        assert_eq!(format_file_size(0), "0 B");
        assert!(format_file_size(1500).ends_with("kB"));
    }

    #[test]
    fn usage_needs_capacity() {
        assert_eq!(usage_percent(50, 0), None);
        assert_eq!(usage_percent(50, 200), Some(25.0));
    }

    #[test]
    fn entry_columns_follow_size_state() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        File::create(dir.path().join("f"))?.write_all(&[0u8; 100])?;
        fs::create_dir(dir.path().join("d"))?;

        let entries = list_dir(dir.path(), false)?;
        let parent = &entries[0];
        let sub = entries.iter().find(|e| e.name() == "d").ok_or("d missing")?;
        let file = entries.iter().find(|e| e.name() == "f").ok_or("f missing")?;

        assert_eq!(format_entry_size(parent), "");
        assert_eq!(format_entry_size(sub), CALCULATING);
        assert_eq!(format_usage(sub, 1000), "");
        assert_eq!(format_entry_size(file), "100 B");
        assert_eq!(format_usage(file, 1000), "10.0%");
        assert_eq!(format_usage(file, 0), "");

        let sized = sub.with_size(0);
        assert_eq!(format_entry_size(&sized), "0 B");
        assert_eq!(format_usage(&sized, 1000), "0.0%");
        Ok(())
    }

    #[test]
    fn unknown_time_is_dash() {
        assert_eq!(format_file_time(None), "-");
    }
}
