//! Media references and type classification.
//!
//! A [`MediaReference`] pairs a file on the host with the path it is published
//! under. Everything else (mimetype, media family, tags) is derived from the
//! host path on demand, so a reference is a plain immutable value.
//!
//! ## Classification
//!
//! The mimetype comes from the file extension alone, looked up in the
//! `mime_guess` registry. A handful of extensions that registry does not know
//! (or knows differently) are resolved first from [`EXTRA_MIMETYPES`]:
//!
//! ```text
//! cat.jpg    → image/jpeg  → image
//! clip.webm  → video/webm  → video
//! scan.jfif  → image/jfif  → image
//! notes.xyz  → None        → None
//! ```
//!
//! Only the three families in [`MediaKind`] are ever rendered; everything else
//! classifies fine but is dropped by the gallery.

use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};

/// Extensions resolved before consulting `mime_guess`. Keys are lowercase.
pub const EXTRA_MIMETYPES: &[(&str, &str)] = &[("jfif", "image/jfif")];

/// Guess the mimetype of a path from its extension.
///
/// Pure function of the path: the file does not need to exist.
pub fn guess_mimetype(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_string_lossy().to_lowercase();
    EXTRA_MIMETYPES
        .iter()
        .find(|(e, _)| *e == ext)
        .map(|(_, mime)| *mime)
        .or_else(|| mime_guess::from_ext(&ext).first_raw())
}

/// The media families the gallery knows how to embed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MediaKind {
    Image,
    Video,
    Audio,
}

impl MediaKind {
    /// Map a mimetype's first segment to a kind, if it is one we render.
    pub fn from_media_type(media_type: &str) -> Option<Self> {
        match media_type {
            "image" => Some(Self::Image),
            "video" => Some(Self::Video),
            "audio" => Some(Self::Audio),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Video => "video",
            Self::Audio => "audio",
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A host file plus the path it is exposed under.
///
/// Ordering compares host paths first, which is what `serve` sorts by.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MediaReference {
    host_path: PathBuf,
    public_path: String,
}

impl MediaReference {
    /// Wrap a host path. With no public path the host path is published as-is.
    pub fn new(host_path: impl Into<PathBuf>, public_path: Option<String>) -> Self {
        let host_path = host_path.into();
        let public_path =
            public_path.unwrap_or_else(|| host_path.to_string_lossy().into_owned());
        Self {
            host_path,
            public_path,
        }
    }

    pub fn host_path(&self) -> &Path {
        &self.host_path
    }

    pub fn public_path(&self) -> &str {
        &self.public_path
    }

    pub fn mimetype(&self) -> Option<&'static str> {
        guess_mimetype(&self.host_path)
    }

    /// First segment of the mimetype, e.g. `"video"` for `video/mp4`.
    pub fn media_type(&self) -> Option<&'static str> {
        self.mimetype()
            .map(|mime| mime.split_once('/').map_or(mime, |(family, _)| family))
    }

    /// The renderable family, or `None` for unknown and unsupported files.
    pub fn kind(&self) -> Option<MediaKind> {
        self.media_type().and_then(MediaKind::from_media_type)
    }

    /// Lowercase tag set: the media type plus the contents of sibling tag files.
    pub fn tags(&self) -> BTreeSet<String> {
        crate::tags::collect_tags(&self.host_path, self.media_type())
    }
}

impl fmt::Display for MediaReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} → {}", self.host_path.display(), self.public_path)
    }
}
