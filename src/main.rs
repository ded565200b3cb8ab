use clap::builder::BoolishValueParser;
use clap::{Parser, Subcommand};
use env_logger::{Builder, Target};
use log::{LevelFilter, info};
use quick_gallery::config::{self, AppConfig};
use quick_gallery::gallery::{Gallery, GalleryVariant};
use quick_gallery::media::MediaReference;
use quick_gallery::naming;
use quick_gallery::output;
use quick_gallery::resolve::resolve_files;
use quick_gallery::server::MediaServer;
use std::io::{Write, stdout};
use std::path::{Path, PathBuf};

/// Flags shared by every command that builds a gallery.
#[derive(clap::Args, Clone)]
struct GalleryArgs {
    /// Expand directories into every file below them
    #[arg(
        long,
        short,
        env = "QUICK_GALLERY_RECURSIVE",
        value_parser = BoolishValueParser::new()
    )]
    recursive: bool,

    /// Gallery renderer: SimpleGallery or TagGallery
    #[arg(long, short, env = "QUICK_GALLERY_GALLERY")]
    gallery: Option<GalleryVariant>,

    /// Media files or directories; `-` reads more paths from stdin
    #[arg(required = true)]
    media: Vec<PathBuf>,
}

#[derive(Parser)]
#[command(name = "quick-gallery")]
#[command(version)]
#[command(about = "Browser gallery for image, video and audio files")]
#[command(long_about = "\
Browser gallery for image, video and audio files

Renders one self-contained HTML page that lazily loads each file as it
scrolls into view, with slideshow, shuffle, keyboard navigation and, for
TagGallery, filtering by tags read from <stem>-*.tags files.

  quick-gallery static photos/*.jpg > gallery.html
  quick-gallery serve --recursive ~/Videos
  find . -name '*.png' | quick-gallery serve -

Defaults can be kept in quick-gallery.toml; run 'quick-gallery gen-config'
for a documented template.")]
struct Cli {
    /// Log debug messages
    #[arg(long, global = true, conflicts_with = "silent")]
    debug: bool,

    /// Log errors only and skip summaries
    #[arg(long, global = true)]
    silent: bool,

    /// Config file (default: ./quick-gallery.toml if present)
    #[arg(long, global = true, env = "QUICK_GALLERY_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print a gallery page referencing files by their paths
    Static {
        #[command(flatten)]
        gallery: GalleryArgs,

        /// Write the page here instead of stdout
        #[arg(long, short, env = "QUICK_GALLERY_STATIC_OUTPUT")]
        output: Option<PathBuf>,
    },
    /// Serve the gallery and its files over HTTP
    Serve {
        #[command(flatten)]
        gallery: GalleryArgs,

        /// Address to listen on
        #[arg(long, env = "QUICK_GALLERY_SERVE_HOST")]
        host: Option<String>,

        /// Port to listen on (0 picks a free one)
        #[arg(long, short, env = "QUICK_GALLERY_SERVE_PORT")]
        port: Option<u16>,

        /// Threads answering requests
        #[arg(long, env = "QUICK_GALLERY_SERVE_WORKERS")]
        workers: Option<usize>,
    },
    /// Print a stock quick-gallery.toml with all options documented
    GenConfig,
}

impl Cli {
    fn log_level(&self) -> LevelFilter {
        if self.debug {
            LevelFilter::Debug
        } else if self.silent {
            LevelFilter::Error
        } else {
            LevelFilter::Info
        }
    }
}

/// Log to stderr; stdout carries the static page. `RUST_LOG` wins when set.
fn init_logger(level: LevelFilter) {
    Builder::new()
        .target(Target::Stderr)
        .filter_level(level)
        .parse_default_env()
        .format(|buf, record| {
            writeln!(
                buf,
                "[{}][{}][{}] {}",
                buf.timestamp(),
                record.level(),
                record.module_path().unwrap_or("quick_gallery"),
                record.args()
            )
        })
        .init();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logger(cli.log_level());

    let app_config = match cli.command {
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
            return Ok(());
        }
        _ => config::load_config(cli.config.as_deref(), &std::env::current_dir()?)?,
    };

    match cli.command {
        Command::Static { gallery, output } => {
            let medias = resolve(&gallery, &app_config, naming::encoded_host_path)?;
            let page = build_gallery(&gallery, &app_config, &medias, cli.silent);
            write_page(&page.render(), output.as_deref())?;
        }
        Command::Serve {
            gallery,
            host,
            port,
            workers,
        } => {
            let mut medias = resolve(&gallery, &app_config, naming::hashed_public_path)?;
            medias.sort_by(|a, b| a.host_path().cmp(b.host_path()));
            let page = build_gallery(&gallery, &app_config, &medias, cli.silent);

            let server = MediaServer::new(
                host.unwrap_or(app_config.server.host),
                port.unwrap_or(app_config.server.port),
                page.render(),
                medias,
            )?
            .with_workers(workers.unwrap_or(app_config.server.workers));
            let bound = server.bind()?;
            if let Some(addr) = bound.local_addr() {
                if !cli.silent {
                    output::print_serve_banner(addr, bound.route_count());
                }
                info!("Listening on {}", addr);
            }
            bound.run()?;
        }
        Command::GenConfig => {}
    }

    Ok(())
}

fn resolve(
    args: &GalleryArgs,
    app_config: &AppConfig,
    naming: fn(&Path) -> Option<String>,
) -> Result<Vec<MediaReference>, Box<dyn std::error::Error>> {
    let recursive = args.recursive || app_config.gallery.recursive;
    let medias = resolve_files(args.media.iter(), recursive, naming)
        .collect::<Result<Vec<_>, _>>()?;
    info!("Resolved {} file(s)", medias.len());
    Ok(medias)
}

fn build_gallery(
    args: &GalleryArgs,
    app_config: &AppConfig,
    medias: &[MediaReference],
    silent: bool,
) -> Gallery {
    let variant = args.gallery.unwrap_or(app_config.gallery.variant);
    let gallery = Gallery::with_settings(variant, app_config.gallery.settings(), medias);
    if !silent {
        output::print_gallery_summary(&gallery, medias.len());
    }
    gallery
}

fn write_page(html: &str, output: Option<&Path>) -> std::io::Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, html)?;
            info!("Wrote {}", path.display());
            Ok(())
        }
        None => {
            let mut out = stdout().lock();
            out.write_all(html.as_bytes())?;
            out.flush()
        }
    }
}
