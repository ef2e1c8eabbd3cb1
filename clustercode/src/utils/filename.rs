//! File name helpers for collision-avoiding output names.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};

/// Timestamp token inserted into alternate file names (second granularity).
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d-%H%M%S";

/// Insert a timestamp token before the extension of `path`'s file name.
///
/// `out/movie.mkv` becomes `out/movie.20240309-140507.mkv`. Names without an
/// extension get the token appended. The directory part is kept.
///
/// # Examples
///
/// ```
/// use chrono::{Local, TimeZone};
/// use clustercode::utils::filename::timestamped_path;
/// use std::path::Path;
///
/// let at = Local.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap();
/// assert_eq!(
///     timestamped_path(Path::new("out/movie.mkv"), at),
///     Path::new("out/movie.20240309-140507.mkv")
/// );
/// ```
pub fn timestamped_path(path: &Path, at: DateTime<Local>) -> PathBuf {
    let token = at.format(TIMESTAMP_FORMAT).to_string();

    let mut name = OsString::new();
    if let Some(stem) = path.file_stem() {
        name.push(stem);
    }
    name.push(".");
    name.push(&token);
    if let Some(ext) = path.extension() {
        name.push(".");
        name.push(ext);
    }

    path.with_file_name(name)
}

/// Lowercased extension of a path, without the dot.
pub fn extension_lowercase(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
}
