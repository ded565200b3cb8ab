//! Public path naming functions.
//!
//! The resolver asks a naming function for the public path of every file it
//! yields. Three are provided:
//!
//! - [`keep_host_path`]: publish the file under its own path, verbatim.
//! - [`encoded_host_path`]: the host path with each segment percent-encoded.
//!   Used for static output, where the browser opens the files directly and a
//!   `#`, `?` or `%` in a file name would otherwise end the URL early.
//! - [`hashed_public_path`]: publish under `media/<sha-256 of the host path>`.
//!   Used when serving, so URLs reveal nothing about the filesystem layout and
//!   two `cat.jpg` in different directories never share a URL.
//!
//! ## Stability
//!
//! The hash covers the host path exactly as given on the command line (not the
//! canonical path), so the same invocation produces the same URLs run after
//! run, and a link to `/media/<hash>` stays valid across restarts.

use sha2::{Digest, Sha256};
use std::path::Path;

/// Prefix segment for hashed public paths.
pub const MEDIA_PREFIX: &str = "media/";

/// Naming function that keeps the host path.
pub fn keep_host_path(_path: &Path) -> Option<String> {
    None
}

/// Naming function that keeps the host path but percent-encodes each segment.
///
/// Separators stay as `/`, so relative and absolute paths still resolve from
/// the page's location.
pub fn encoded_host_path(path: &Path) -> Option<String> {
    let raw = path.to_string_lossy();
    let encoded: Vec<String> = raw
        .split(['/', std::path::MAIN_SEPARATOR])
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect();
    Some(encoded.join("/"))
}

/// Naming function that publishes a path under a hash of itself.
pub fn hashed_public_path(path: &Path) -> Option<String> {
    Some(format!("{}{}", MEDIA_PREFIX, hash_path(path)))
}

/// SHA-256 of the raw path bytes, as lowercase hex.
///
/// Raw bytes rather than a lossy string, so two non-UTF-8 paths that display
/// the same still hash apart.
pub fn hash_path(path: &Path) -> String {
    let digest = Sha256::digest(path.as_os_str().as_encoded_bytes());
    format!("{:x}", digest)
}
