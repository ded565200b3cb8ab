//! Human-readable CLI summaries.
//!
//! Each summary has a `format_*` function returning lines (pure, tested) and a
//! `print_*` wrapper. Summaries go to **stderr**: in static mode stdout carries
//! the HTML document itself.
//!
//! ## Static
//!
//! ```text
//! SimpleGallery: 3 of 5 files rendered (2 skipped)
//!     image/jpeg: 2
//!     video/mp4: 1
//! ```
//!
//! ## Serve
//!
//! ```text
//! TagGallery: 3 of 3 files rendered (0 skipped)
//!     image/jpeg: 3
//! Serving 3 files on http://0.0.0.0:8000/
//! ```

use crate::gallery::Gallery;
use std::collections::BTreeMap;
use std::net::SocketAddr;

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Mimetype counts, most common first, ties by name.
fn sorted_counts<'a>(counts: &BTreeMap<&'a str, usize>) -> Vec<(&'a str, usize)> {
    let mut sorted: Vec<(&str, usize)> = counts.iter().map(|(m, n)| (*m, *n)).collect();
    sorted.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)));
    sorted
}

/// One-line form for log messages: `image/jpeg: 2, video/mp4: 1`.
pub fn format_mimetype_counts(counts: &BTreeMap<&str, usize>) -> String {
    if counts.is_empty() {
        return "none".to_string();
    }
    sorted_counts(counts)
        .into_iter()
        .map(|(mime, n)| format!("{}: {}", mime, n))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Summary of a built gallery against the number of resolved files.
pub fn format_gallery_summary(gallery: &Gallery, resolved: usize) -> Vec<String> {
    let rendered = gallery.items().len();
    let mut lines = vec![format!(
        "{}: {} of {} files rendered ({} skipped)",
        gallery.variant(),
        rendered,
        resolved,
        resolved.saturating_sub(rendered)
    )];
    for (mime, n) in sorted_counts(gallery.mimetype_counts()) {
        lines.push(format!("{}{}: {}", indent(1), mime, n));
    }
    lines
}

pub fn format_serve_banner(addr: SocketAddr, routes: usize) -> Vec<String> {
    let noun = if routes == 1 { "file" } else { "files" };
    vec![format!("Serving {} {} on http://{}/", routes, noun, addr)]
}

pub fn print_gallery_summary(gallery: &Gallery, resolved: usize) {
    for line in format_gallery_summary(gallery, resolved) {
        eprintln!("{}", line);
    }
}

pub fn print_serve_banner(addr: SocketAddr, routes: usize) {
    for line in format_serve_banner(addr, routes) {
        eprintln!("{}", line);
    }
}
