//! # Cardsmith CLI
//!
//! Command-line interface for business card templates.
//!
//! ## Usage
//!
//! ```bash
//! # List bindable fields, element types and QR styles
//! cardsmith fields
//! cardsmith elements
//! cardsmith qr-styles
//!
//! # Resolve one field against a profile
//! cardsmith resolve workAddress1 --profile me.json
//!
//! # Export a card to PNG
//! cardsmith preview card.json --profile me.json --png card.png --dpi 300
//!
//! # Run the preview service
//! cardsmith serve --listen 0.0.0.0:8080
//! ```

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

use cardsmith::{
    CardsmithError,
    fetch::{DEFAULT_FETCH_TIMEOUT_SECS, ImageFetcher},
    qr::{qr_style_catalog, style_of},
    render::{
        RenderMode,
        raster::{RasterOptions, load_font, render_png},
        render_template,
    },
    resolve::{ProfileData, ResolveOptions, field_catalog, resolve},
    server::{ServerConfig, serve},
    template::{Template, palette},
};

/// Cardsmith - business card template toolkit
#[derive(Parser, Debug)]
#[command(name = "cardsmith")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List bindable profile fields
    Fields,

    /// Print the element palette with editor defaults as JSON
    Elements,

    /// List QR style tokens
    QrStyles,

    /// Resolve one field against a profile
    Resolve {
        /// Field key (e.g. firstName, workAddress1)
        field: String,

        /// Profile JSON file (omit for an empty profile)
        #[arg(long, value_name = "FILE")]
        profile: Option<PathBuf>,

        /// Compose addresses without administrative-division prefixes
        #[arg(long)]
        no_prefix: bool,
    },

    /// Print the QR render configuration for a style token
    QrStyle {
        /// Style token (unknown tokens fall back to standard)
        style: String,

        /// Dot and corner color
        #[arg(long)]
        color: Option<String>,
    },

    /// Print per-element render views as JSON
    Render {
        /// Template JSON file
        template: PathBuf,

        /// Profile JSON file
        #[arg(long, value_name = "FILE")]
        profile: Option<PathBuf>,

        /// edit, preview or print
        #[arg(long, default_value = "preview", value_parser = parse_mode)]
        mode: RenderMode,
    },

    /// Export a template to PNG
    Preview {
        /// Template JSON file
        template: PathBuf,

        /// Profile JSON file
        #[arg(long, value_name = "FILE")]
        profile: Option<PathBuf>,

        /// Output PNG path
        #[arg(long, value_name = "FILE")]
        png: PathBuf,

        /// Output resolution
        #[arg(long, default_value = "300")]
        dpi: f32,

        /// edit, preview or print
        #[arg(long, default_value = "print", value_parser = parse_mode)]
        mode: RenderMode,

        /// TrueType font for text (defaults to the built-in bitmap font)
        #[arg(long, value_name = "FILE")]
        font: Option<PathBuf>,

        /// Remote image download timeout in seconds
        #[arg(long, default_value_t = DEFAULT_FETCH_TIMEOUT_SECS)]
        fetch_timeout: u64,
    },

    /// Run the preview HTTP service
    Serve {
        /// Address to listen on
        #[arg(long, default_value = "127.0.0.1:8080")]
        listen: String,

        /// TrueType font for PNG previews
        #[arg(long, value_name = "FILE")]
        font: Option<PathBuf>,

        /// Remote image download timeout in seconds
        #[arg(long, default_value_t = DEFAULT_FETCH_TIMEOUT_SECS)]
        fetch_timeout: u64,
    },
}

fn parse_mode(value: &str) -> Result<RenderMode, String> {
    RenderMode::parse(value).ok_or_else(|| format!("unknown mode '{}' (expected edit, preview or print)", value))
}

fn main() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), CardsmithError> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Fields => {
            for field in field_catalog() {
                let kind = if field.is_address {
                    "address"
                } else if field.is_image {
                    "image"
                } else {
                    "text"
                };
                println!("  {:<20} {:<8} {}", field.key, kind, field.label);
            }
        }

        Commands::Elements => {
            println!("{}", serde_json::to_string_pretty(&palette())?);
        }

        Commands::QrStyles => {
            for style in qr_style_catalog() {
                println!("  {:<16} {}", style.token, style.label);
            }
        }

        Commands::Resolve {
            field,
            profile,
            no_prefix,
        } => {
            let profile = read_profile(profile.as_deref())?;
            let value = resolve(&field, &profile, ResolveOptions::with_prefix(!no_prefix));
            println!("{}", value);
        }

        Commands::QrStyle { style, color } => {
            let config = style_of(&style, color.as_deref());
            println!("{}", serde_json::to_string_pretty(&config)?);
        }

        Commands::Render {
            template,
            profile,
            mode,
        } => {
            let template = read_template(&template)?;
            let profile = read_profile(profile.as_deref())?;
            let views = render_template(&template, &profile, mode);
            println!("{}", serde_json::to_string_pretty(&views)?);
        }

        Commands::Preview {
            template: template_path,
            profile,
            png,
            dpi,
            mode,
            font,
            fetch_timeout,
        } => {
            if !(dpi > 0.0) {
                return Err(CardsmithError::Template(format!("dpi must be positive, got {}", dpi)));
            }
            let template = read_template(&template_path)?;
            let profile = read_profile(profile.as_deref())?;
            let font = font.as_deref().map(load_font).transpose()?;
            let base_dir = template_path.parent().unwrap_or(Path::new("."));

            let fetcher = ImageFetcher::new(Duration::from_secs(fetch_timeout))?;
            let runtime = tokio::runtime::Runtime::new()?;
            let images = runtime.block_on(fetcher.gather(&template, &profile, Some(base_dir)));

            let options = RasterOptions { dpi, mode, font };
            let bytes = render_png(&template, &profile, &images, &options)?;
            std::fs::write(&png, &bytes)?;

            let (w, h) = template.paper.pixel_size(dpi);
            tracing::info!(path = %png.display(), width = w, height = h, "wrote preview");
        }

        Commands::Serve {
            listen,
            font,
            fetch_timeout,
        } => {
            let config = ServerConfig {
                listen_addr: listen,
                font_path: font,
                fetch_timeout_secs: fetch_timeout,
            };
            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(serve(config))?;
        }
    }

    Ok(())
}

fn read_template(path: &Path) -> Result<Template, CardsmithError> {
    let json = std::fs::read_to_string(path)
        .map_err(|e| CardsmithError::Template(format!("{}: {}", path.display(), e)))?;
    Template::from_json(&json)
}

fn read_profile(path: Option<&Path>) -> Result<ProfileData, CardsmithError> {
    let Some(path) = path else {
        return Ok(ProfileData::default());
    };
    let json = std::fs::read_to_string(path)
        .map_err(|e| CardsmithError::Profile(format!("{}: {}", path.display(), e)))?;
    serde_json::from_str(&json).map_err(|e| CardsmithError::Profile(format!("{}: {}", path.display(), e)))
}
