//! # Quick Gallery
//!
//! Turns a pile of image, video and audio files into a single-page,
//! browser-based gallery. Either write the page out as one self-contained HTML
//! file, or serve it together with the media over HTTP.
//!
//! ```text
//! quick-gallery static photos/*.jpg > gallery.html
//! find ~/Pictures -name '*.png' | quick-gallery serve --gallery TagGallery -
//! ```
//!
//! # Pipeline
//!
//! ```text
//! paths ─▶ resolve ─▶ MediaReference ─▶ gallery ─▶ HTML
//!                            │                      │
//!                            └──────▶ server ◀──────┘   (serve only)
//! ```
//!
//! 1. [`resolve`] expands command-line paths (directories, `-` for stdin)
//!    into [`media::MediaReference`]s, naming each one through a function from
//!    [`naming`].
//! 2. [`gallery`] keeps the image, video and audio references and renders the
//!    page. The tag variant reads sidecar files via [`tags`].
//! 3. `static` prints the page. `serve` hands the page and the references to
//!    [`server`], which answers `/` with the page and each public path with
//!    the file behind it.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`resolve`] | Lazy expansion of inputs into media references |
//! | [`media`] | `MediaReference`, mimetype guessing and media kinds |
//! | [`naming`] | Public path functions: (percent-encoded) host path, or `media/<sha256>` |
//! | [`tags`] | `<stem>-*.tags` sidecar discovery and parsing |
//! | [`gallery`] | Gallery variants and HTML rendering with Maud |
//! | [`server`] | Threaded HTTP server over a fixed route table |
//! | [`config`] | `quick-gallery.toml` loading, merging and validation |
//! | [`output`] | CLI summaries printed to stderr |
//!
//! # Design Decisions
//!
//! ## Public Paths Decouple URLs From Disk
//!
//! The page never sees where files live when served: every file is published
//! as `media/<sha256 of its path>`, so two `cat.jpg` in different folders never
//! clash and directory names do not leak. Static pages keep host paths,
//! percent-encoded per segment, since the browser has to open them directly.
//!
//! ## One Page, No Assets
//!
//! CSS and JavaScript are compiled into the binary and inlined into the page.
//! The static output is a single file that can be mailed or dropped next to
//! the media; the server has exactly one non-media route.
//!
//! ## Placeholders, Not Media Elements
//!
//! Items are rendered as empty `<span>`s carrying `data-src` and
//! `data-mimetype`. The script materializes `<img>`/`<video>`/`<audio>` near
//! the viewport and drops them again when they scroll away, so thousands of
//! files cost a few hundred bytes of markup each.

pub mod config;
pub mod gallery;
pub mod media;
pub mod naming;
pub mod output;
pub mod resolve;
pub mod server;
pub mod tags;

#[cfg(test)]
pub(crate) mod test_helpers;
