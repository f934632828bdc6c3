use colored::*;
use std::fs;
use std::path::Path;
use sysinfo::Disks;
use walkdir::WalkDir;

use crate::colors;
use crate::USAGE_BAR_WIDTH;

/// Render a usage bar like `████████░░░░░░░░░░░░` for `used` of `total`.
pub fn usage_bar(used: u64, total: u64, width: usize) -> String {
    let ratio = if total == 0 {
        0.0
    } else {
        used as f64 / total as f64
    };
    let filled = ((ratio * width as f64) as usize).min(width);
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

fn gb(bytes: u64) -> f64 {
    bytes as f64 / (1024.0 * 1024.0 * 1024.0)
}

/// Print a usage summary for every mounted volume.
pub fn report() {
    let disks = Disks::new_with_refreshed_list();
    if disks.list().is_empty() {
        println!("{}", "No volumes found.".color(colors::WARNING));
        return;
    }

    println!("{}", "Storage usage".color(colors::HEADER).bold());
    for disk in disks.list() {
        let total = disk.total_space();
        let available = disk.available_space();
        let used = total.saturating_sub(available);
        let pct = if total == 0 {
            0.0
        } else {
            used as f64 / total as f64 * 100.0
        };
        println!(
            "  {}  {} {:>5.1}%  {:.1} / {:.1} GB",
            disk.mount_point().display().to_string().color(colors::PATH),
            usage_bar(used, total, USAGE_BAR_WIDTH),
            pct,
            gb(used),
            gb(total)
        );
    }
}

/// Delete everything under `dir` (not `dir` itself), counting removed files.
/// Entries that refuse to go are left behind silently; temp trees routinely
/// contain files held open by other processes.
pub fn clean_temp(dir: &Path) -> usize {
    let mut removed = 0;
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .contents_first(true)
        .into_iter()
        .flatten()
    {
        let path = entry.path();
        if entry.file_type().is_dir() {
            let _ = fs::remove_dir(path);
        } else if fs::remove_file(path).is_ok() {
            removed += 1;
        }
    }
    removed
}
