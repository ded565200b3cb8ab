//! Shared test utilities for the quick-gallery test suite.
//!
//! Provides a small media tree on disk plus extractors that read rendered
//! gallery HTML back without a full HTML parser.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = media_tree();
//! let medias = resolve_tree(&tmp);
//! let html = Gallery::new(GalleryVariant::Simple, &medias).render();
//!
//! assert_eq!(count_items(&html), 3);
//! assert_eq!(item_sources(&html).len(), 3);
//! ```

use std::fs;
use tempfile::TempDir;

use crate::media::MediaReference;
use crate::naming::keep_host_path;
use crate::resolve::resolve_files;

// =========================================================================
// Fixture setup
// =========================================================================

/// Create a temp directory holding three media files and one text file.
///
/// ```text
/// top.jpg
/// sub/mid.png
/// sub/deeper/low.mp4
/// sub/deeper/readme.txt
/// ```
pub fn media_tree() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let deeper = tmp.path().join("sub/deeper");
    fs::create_dir_all(&deeper).unwrap();
    fs::write(tmp.path().join("top.jpg"), b"jpeg").unwrap();
    fs::write(tmp.path().join("sub/mid.png"), b"png").unwrap();
    fs::write(deeper.join("low.mp4"), b"mp4").unwrap();
    fs::write(deeper.join("readme.txt"), b"not media").unwrap();
    tmp
}

/// Recursively resolve a tree, keeping host paths as public paths.
pub fn resolve_tree(tmp: &TempDir) -> Vec<MediaReference> {
    resolve_files([tmp.path()], true, keep_host_path)
        .collect::<Result<Vec<_>, _>>()
        .unwrap()
}

// =========================================================================
// Rendered HTML extractors
// =========================================================================

/// Number of media placeholders in a rendered document.
pub fn count_items(html: &str) -> usize {
    html.matches(r#"class="media-container""#).count()
}

/// The `data-src` values of all placeholders, in document order.
pub fn item_sources(html: &str) -> Vec<String> {
    html.split(r#"data-src=""#)
        .skip(1)
        .filter_map(|rest| rest.split('"').next())
        .map(str::to_string)
        .collect()
}
