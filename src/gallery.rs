//! Gallery rendering.
//!
//! Builds the single-page gallery document from a list of media references.
//! The page is fully self-contained: CSS and JavaScript are embedded at compile
//! time from `static/`, and media are referenced only through their public
//! paths.
//!
//! ## Items
//!
//! Every renderable file becomes one empty placeholder:
//!
//! ```html
//! <span class="media-container" data-src="media/3f2a…" data-mimetype="image/jpeg"
//!       data-index="0" data-tags="cat,image"></span>
//! ```
//!
//! The script fills placeholders with `<img>`, `<video>` or `<audio>` as they
//! approach the viewport and empties them again when they leave, so memory,
//! DOM size and network use stay bounded on galleries of thousands of files.
//! `data-tags` is only present for the tag variant.
//!
//! Files are skipped, never rejected: no mimetype, or a mimetype outside
//! image/video/audio, means the file is logged at debug level and left out.
//!
//! ## Variants
//!
//! [`GalleryVariant`] is a closed set. Both variants share one document; a
//! variant only contributes through hook points:
//!
//! | Hook | Simple | Tag |
//! |------|--------|-----|
//! | per-item attributes | - | `data-tags` |
//! | extra controls | - | `#tag-filter` checkbox list |
//! | extra CSS | - | `static/tags.css` |
//! | extra JS | - | `static/tags.js` |
//!
//! ## Determinism
//!
//! Rendering is a pure function of the items and [`GallerySettings`]; tags are
//! sorted, so rendering the same references twice yields identical bytes.

use crate::media::MediaReference;
use crate::output;
use log::{debug, info};
use maud::{DOCTYPE, Markup, PreEscaped, html};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

const GALLERY_CSS: &str = include_str!("../static/gallery.css");
const GALLERY_JS: &str = include_str!("../static/gallery.js");
const TAGS_CSS: &str = include_str!("../static/tags.css");
const TAGS_JS: &str = include_str!("../static/tags.js");

#[derive(Error, Debug, PartialEq)]
pub enum GalleryError {
    #[error("Unknown gallery '{0}' (expected one of: SimpleGallery, TagGallery)")]
    UnknownVariant(String),
}

/// The available gallery renderers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum GalleryVariant {
    /// Media only, with slideshow, shuffle and keyboard navigation.
    #[default]
    Simple,
    /// Everything in Simple plus tag extraction and tag filter controls.
    Tag,
}

impl GalleryVariant {
    pub const ALL: [GalleryVariant; 2] = [GalleryVariant::Simple, GalleryVariant::Tag];

    /// Name used on the command line and in config files.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Simple => "SimpleGallery",
            Self::Tag => "TagGallery",
        }
    }

    fn wants_tags(&self) -> bool {
        matches!(self, Self::Tag)
    }

    fn extra_css(&self) -> &'static str {
        match self {
            Self::Simple => "",
            Self::Tag => TAGS_CSS,
        }
    }

    fn extra_js(&self) -> &'static str {
        match self {
            Self::Simple => "",
            Self::Tag => TAGS_JS,
        }
    }

    fn extra_controls(&self) -> Markup {
        match self {
            Self::Simple => html! {},
            Self::Tag => html! { div.tag-filter id="tag-filter" {} },
        }
    }
}

impl fmt::Display for GalleryVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for GalleryVariant {
    type Err = GalleryError;

    /// Case-insensitive, so `taggallery` works as well as `TagGallery`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|v| v.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| GalleryError::UnknownVariant(s.to_string()))
    }
}

impl TryFrom<String> for GalleryVariant {
    type Error = GalleryError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<GalleryVariant> for String {
    fn from(variant: GalleryVariant) -> Self {
        variant.name().to_string()
    }
}

/// Page-level settings that do not depend on the media.
#[derive(Debug, Clone, PartialEq)]
pub struct GallerySettings {
    /// Document `<title>`.
    pub title: String,
    /// Initial value of the slideshow delay field, in seconds.
    pub slideshow_delay: u32,
}

impl Default for GallerySettings {
    fn default() -> Self {
        Self {
            title: "Gallery".to_string(),
            slideshow_delay: 3,
        }
    }
}

/// One renderable media file.
#[derive(Debug, Clone, PartialEq)]
pub struct GalleryItem {
    pub public_path: String,
    pub mimetype: &'static str,
    /// Sorted tags; always empty for the simple variant.
    pub tags: Vec<String>,
}

impl GalleryItem {
    fn markup(&self, index: usize, with_tags: bool) -> Markup {
        let tags = with_tags.then(|| self.tags.join(","));
        html! {
            span class="media-container"
                data-src=(self.public_path)
                data-mimetype=(self.mimetype)
                data-index=(index)
                data-tags=[tags] {}
        }
    }
}

/// A gallery ready to render.
#[derive(Debug, Clone)]
pub struct Gallery {
    variant: GalleryVariant,
    settings: GallerySettings,
    items: Vec<GalleryItem>,
    mimetype_counts: BTreeMap<&'static str, usize>,
}

impl Gallery {
    pub fn new(variant: GalleryVariant, medias: &[MediaReference]) -> Self {
        Self::with_settings(variant, GallerySettings::default(), medias)
    }

    /// Classify `medias` in order and keep the renderable ones.
    pub fn with_settings(
        variant: GalleryVariant,
        settings: GallerySettings,
        medias: &[MediaReference],
    ) -> Self {
        let mut items = Vec::with_capacity(medias.len());
        let mut mimetype_counts: BTreeMap<&'static str, usize> = BTreeMap::new();

        for media in medias {
            let Some(mimetype) = media.mimetype() else {
                debug!("No mimetype for file: {}", media.host_path().display());
                continue;
            };
            if media.kind().is_none() {
                debug!(
                    "Unsupported media type {} for file: {}",
                    mimetype,
                    media.host_path().display()
                );
                continue;
            }
            let tags = if variant.wants_tags() {
                media.tags().into_iter().collect()
            } else {
                Vec::new()
            };
            *mimetype_counts.entry(mimetype).or_default() += 1;
            items.push(GalleryItem {
                public_path: media.public_path().to_string(),
                mimetype,
                tags,
            });
        }

        info!(
            "Found mime-types: {}",
            output::format_mimetype_counts(&mimetype_counts)
        );

        Self {
            variant,
            settings,
            items,
            mimetype_counts,
        }
    }

    pub fn variant(&self) -> GalleryVariant {
        self.variant
    }

    pub fn items(&self) -> &[GalleryItem] {
        &self.items
    }

    /// How many accepted items carry each mimetype.
    pub fn mimetype_counts(&self) -> &BTreeMap<&'static str, usize> {
        &self.mimetype_counts
    }

    /// Render the full HTML document.
    pub fn render(&self) -> String {
        self.document().into_string()
    }

    fn document(&self) -> Markup {
        let with_tags = self.variant.wants_tags();
        html! {
            (DOCTYPE)
            html lang="en" {
                head {
                    meta charset="UTF-8";
                    meta name="viewport" content="width=device-width, initial-scale=1.0";
                    title { (self.settings.title) }
                    style {
                        (PreEscaped(GALLERY_CSS))
                        (PreEscaped(self.variant.extra_css()))
                    }
                    script {
                        (PreEscaped(GALLERY_JS))
                        (PreEscaped(self.variant.extra_js()))
                    }
                }
                body {
                    (self.controls())
                    div.gallery {
                        @for (index, item) in self.items.iter().enumerate() {
                            (item.markup(index, with_tags))
                        }
                    }
                }
            }
        }
    }

    fn controls(&self) -> Markup {
        html! {
            div.controls id="controls" {
                button id="randomize" { "shuffle" }
                button id="toggle-sound" { "Muted" }
                input type="number" id="slideshow-delay" min="1" placeholder="Delay (s)"
                    value=(self.settings.slideshow_delay);
                button id="toggle-slideshow" { "▶" }
                (self.variant.extra_controls())
            }
        }
    }
}
