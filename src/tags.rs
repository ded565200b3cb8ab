//! Tag files for the tag gallery.
//!
//! Tags live next to the media they describe. For a file `<stem><ext>`, every
//! sibling named `<stem>-<anything>.tags` is a tag file, and each non-empty
//! line in it is one tag:
//!
//! ```text
//! holiday/
//! ├── cat.jpg
//! ├── cat-colors.tags      # "Orange\n"
//! └── cat-mood.tags        # "Fluffy\nOrange\n"
//! ```
//!
//! gives `cat.jpg` the tags `{image, orange, fluffy}`: the media type is always
//! included, all tag files contribute, and tags are trimmed and lowercased so
//! the set is case-insensitive.
//!
//! Matching is literal on the file name. Characters in the stem that would be
//! glob syntax elsewhere (`[`, `*`, `?`) match only themselves here.

use log::warn;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Extension shared by all tag files.
pub const TAG_FILE_EXTENSION: &str = ".tags";

/// Collect the full tag set for a media file.
pub fn collect_tags(media_path: &Path, media_type: Option<&str>) -> BTreeSet<String> {
    let mut tags: BTreeSet<String> = media_type.map(str::to_lowercase).into_iter().collect();
    for tag_file in tag_files(media_path) {
        match fs::read_to_string(&tag_file) {
            Ok(content) => tags.extend(parse_tags(&content)),
            Err(e) => warn!("Skipping unreadable tag file {}: {}", tag_file.display(), e),
        }
    }
    tags
}

/// Split tag file content into lowercase tags, one per non-empty line.
pub fn parse_tags(content: &str) -> impl Iterator<Item = String> + '_ {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_lowercase)
}

/// Find the tag files belonging to a media file, sorted by name.
///
/// A missing or unreadable parent directory simply means no tag files.
pub fn tag_files(media_path: &Path) -> Vec<PathBuf> {
    let Some(stem) = media_path.file_stem() else {
        return Vec::new();
    };
    let prefix = format!("{}-", stem.to_string_lossy());
    let dir = match media_path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let Ok(entries) = fs::read_dir(dir) else {
        return Vec::new();
    };

    let mut files: Vec<PathBuf> = entries
        .filter_map(|e| e.ok())
        .filter(|e| is_tag_file_for(&e.file_name().to_string_lossy(), &prefix))
        .map(|e| e.path())
        .filter(|p| p.is_file())
        .collect();
    files.sort();
    files
}

fn is_tag_file_for(name: &str, prefix: &str) -> bool {
    name.len() >= prefix.len() + TAG_FILE_EXTENSION.len()
        && name.starts_with(prefix)
        && name.ends_with(TAG_FILE_EXTENSION)
}
