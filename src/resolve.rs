//! Input resolution: command-line paths to media references.
//!
//! Turns the paths given on the command line into a flat, lazy sequence of
//! [`MediaReference`]s. Three kinds of input are understood:
//!
//! ```text
//! photos/cat.jpg   → one reference
//! photos/          → every file below it (only with `recursive`)
//! -                → more paths, one per line, read from stdin
//! ```
//!
//! Paths read from stdin follow the same rules, so `find . -type d | quick-gallery
//! static --recursive -` works, and a `-` line re-enters stdin (it then sees
//! whatever input remains).
//!
//! ## Worklist
//!
//! Resolution keeps an explicit stack of pending sources instead of recursing:
//! the argument list at the bottom, then any directory walks or stdin readers
//! opened while draining it. The top source is always drained first, which
//! gives depth-first order without call-stack depth growing with the tree.
//!
//! ## What is not checked
//!
//! Paths are not validated. A missing file is still yielded and surfaces later
//! as a file without a mimetype, or a 404 when served. Paths are not
//! deduplicated either: listing a file twice yields it twice.
//!
//! Directories are never yielded. Without `recursive` a directory argument is
//! skipped with a debug message.

use crate::media::MediaReference;
use log::{debug, warn};
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("Failed reading paths from stdin: {0}")]
    Stdin(#[source] io::Error),
    #[error("Cannot read directory: {0}")]
    Walk(#[from] walkdir::Error),
}

/// Token that stands for "read more paths from stdin".
pub const STDIN_TOKEN: &str = "-";

enum Source {
    Paths(std::vec::IntoIter<PathBuf>),
    Walk(walkdir::IntoIter),
    Stdin,
}

/// Lazy iterator over resolved media references.
///
/// Built by [`resolve_files`]. Yields `Err` only for setup-level failures: an
/// input directory that cannot be listed, or stdin that cannot be read.
/// Unreadable subdirectories deeper in a walk are logged and skipped.
pub struct Resolver<'a, F> {
    stack: Vec<Source>,
    recursive: bool,
    naming: F,
    stdin: Box<dyn BufRead + 'a>,
}

/// Resolve input paths into media references.
///
/// `naming` computes each file's public path; returning `None` publishes the
/// file under its host path (see [`crate::naming`]).
pub fn resolve_files<I, P, F>(paths: I, recursive: bool, naming: F) -> Resolver<'static, F>
where
    I: IntoIterator<Item = P>,
    P: Into<PathBuf>,
    F: Fn(&Path) -> Option<String>,
{
    let paths: Vec<PathBuf> = paths.into_iter().map(Into::into).collect();
    Resolver {
        stack: vec![Source::Paths(paths.into_iter())],
        recursive,
        naming,
        stdin: Box::new(BufReader::new(io::stdin())),
    }
}

impl<'a, F> Resolver<'a, F>
where
    F: Fn(&Path) -> Option<String>,
{
    /// Read `-` paths from `reader` instead of the process stdin.
    pub fn with_stdin<'b>(self, reader: impl BufRead + 'b) -> Resolver<'b, F> {
        Resolver {
            stack: self.stack,
            recursive: self.recursive,
            naming: self.naming,
            stdin: Box::new(reader),
        }
    }

    fn reference(&self, path: PathBuf) -> MediaReference {
        let public = (self.naming)(&path);
        MediaReference::new(path, public)
    }

    /// Decide what a single path turns into. Returns a reference to yield, or
    /// `None` when the path opened a new source (or was skipped).
    fn dispatch(&mut self, path: PathBuf) -> Option<MediaReference> {
        if self.recursive && path.is_dir() {
            debug!("Walking {}", path.display());
            let walk = WalkDir::new(&path)
                .min_depth(1)
                .follow_links(true)
                .sort_by_file_name()
                .into_iter();
            self.stack.push(Source::Walk(walk));
            None
        } else if path.as_os_str() == STDIN_TOKEN {
            debug!("Reading paths from stdin");
            self.stack.push(Source::Stdin);
            None
        } else if path.is_dir() {
            debug!("Skipping directory {} (not recursive)", path.display());
            None
        } else {
            Some(self.reference(path))
        }
    }
}

impl<F> Iterator for Resolver<'_, F>
where
    F: Fn(&Path) -> Option<String>,
{
    type Item = Result<MediaReference, ResolveError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let path = match self.stack.last_mut()? {
                Source::Paths(paths) => match paths.next() {
                    Some(path) => path,
                    None => {
                        self.stack.pop();
                        continue;
                    }
                },
                Source::Stdin => {
                    let mut line = String::new();
                    match self.stdin.read_line(&mut line) {
                        Ok(0) => {
                            self.stack.pop();
                            continue;
                        }
                        Ok(_) => {
                            let line = line.trim();
                            if line.is_empty() {
                                continue;
                            }
                            PathBuf::from(line)
                        }
                        Err(e) => {
                            self.stack.pop();
                            return Some(Err(ResolveError::Stdin(e)));
                        }
                    }
                }
                // Walk entries are final: a child named `-` is a file, not stdin.
                Source::Walk(walk) => match walk.next() {
                    Some(Ok(entry)) => {
                        if entry.file_type().is_dir() {
                            continue;
                        }
                        return Some(Ok(self.reference(entry.into_path())));
                    }
                    Some(Err(e)) if e.depth() == 0 => {
                        self.stack.pop();
                        return Some(Err(ResolveError::Walk(e)));
                    }
                    Some(Err(e)) => {
                        if let Some(link) = dangling_link(&e) {
                            return Some(Ok(self.reference(link)));
                        }
                        warn!("Skipping unreadable entry: {}", e);
                        continue;
                    }
                    None => {
                        self.stack.pop();
                        continue;
                    }
                },
            };

            if let Some(media) = self.dispatch(path) {
                return Some(Ok(media));
            }
        }
    }
}

/// A symlink whose target is gone. Following it fails inside the walk, but
/// it is still a file entry, the same as when passed as an argument.
fn dangling_link(e: &walkdir::Error) -> Option<PathBuf> {
    if e.loop_ancestor().is_some() {
        return None;
    }
    let path = e.path()?;
    let is_link = path.symlink_metadata().ok()?.file_type().is_symlink();
    (is_link && !path.exists()).then(|| path.to_path_buf())
}
