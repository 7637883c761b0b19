//! Render command implementation.
//!
//! Looks a release up in the catalog (or takes a cover image directly),
//! renders its preview card and writes it to the output directory.

use std::path::PathBuf;
use std::time::Duration;

use clap::Args;

use crate::catalog::{
    find_album, remove_parentheses, Album, AlbumCache, Chooser, Credentials, LookupOptions,
    PromptChooser, RankedChooser, ReleaseType, SpotifyClient,
};
use crate::config::{Config, CONFIG_FILE};
use crate::error::{PreviewError, Result};
use crate::output::{display_path, write_preview, Printer};
use crate::render::{Assets, RenderRequest, Renderer};
use crate::resolve::ColourSpec;
use crate::source::SourceLoader;
use crate::types::{Colour, Role, Swatch};

/// Render a preview card for a release
#[derive(Args, Debug)]
pub struct RenderArgs {
    /// Release to search for, as "Artist - Title"
    #[arg(conflicts_with = "title")]
    pub query: Option<String>,

    /// Artist name
    #[arg(long)]
    pub artist: Option<String>,

    /// Release title
    #[arg(long, requires = "artist")]
    pub title: Option<String>,

    /// Cover image URL or path; skips the catalog lookup
    #[arg(long, requires_all = ["artist", "title"])]
    pub image: Option<String>,

    /// Config file
    #[arg(long, default_value = CONFIG_FILE)]
    pub config: PathBuf,

    /// Output directory (overrides the config file)
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// Ignore cached lookups and query the catalog again
    #[arg(long)]
    pub refresh: bool,

    /// Choose among matching releases interactively
    #[arg(long, short)]
    pub interactive: bool,

    /// Only accept releases of this type
    #[arg(long, value_enum)]
    pub release_type: Option<ReleaseType>,

    /// Canvas side length in pixels
    #[arg(long)]
    pub size: Option<u32>,

    /// Do not draw the frame around the cover
    #[arg(long)]
    pub no_frame: bool,

    /// Do not draw the cover shadow
    #[arg(long)]
    pub no_shadow: bool,

    /// Do not apply the vignette
    #[arg(long)]
    pub no_vignette: bool,

    /// Vignette strength, 0-100
    #[arg(long)]
    pub vignette_strength: Option<f32>,

    /// Role colour: ROLE=VALUE (ordinal, swatch name or colour)
    #[arg(long = "colour", value_name = "ROLE=VALUE", value_parser = parse_colour_override)]
    pub colours: Vec<(Role, String)>,

    /// Darken a role: ROLE=PERCENT
    #[arg(long = "darken", value_name = "ROLE=PERCENT", value_parser = parse_percentage)]
    pub darken: Vec<(Role, f32)>,

    /// Lighten a role: ROLE=PERCENT
    #[arg(long = "lighten", value_name = "ROLE=PERCENT", value_parser = parse_percentage)]
    pub lighten: Vec<(Role, f32)>,

    /// Catalog client id
    #[arg(long, env = "SPOTIFY_CLIENT_ID", hide_env_values = true)]
    pub client_id: Option<String>,

    /// Catalog client secret
    #[arg(long, env = "SPOTIFY_CLIENT_SECRET", hide_env_values = true)]
    pub client_secret: Option<String>,
}

/// What to render once the release is known.
#[derive(Debug, Clone, PartialEq)]
struct Release {
    artist: String,
    name: String,
    cover: String,
}

pub fn run(args: RenderArgs, printer: &Printer) -> Result<()> {
    let config = load_config(&args)?;

    let release = match direct_release(&args) {
        Some(release) => release,
        None => lookup(&args, &config, printer)?,
    };
    let name = release.name.clone();

    printer.status("Rendering", &format!("{} - {}", release.artist, name));
    let assets = Assets::load(&config.fonts, &config.logo)?;
    let loader = SourceLoader::new(Duration::from_secs(config.catalog.timeout_secs));
    let renderer = Renderer::new(assets, loader);

    let result = renderer.render(&RenderRequest {
        cover: release.cover,
        artist: release.artist.clone(),
        release: name.clone(),
        options: config.render,
    })?;

    let path = write_preview(&config.output, &release.artist, &name, &result.image)?;
    printer.status(
        "Finished",
        &format!(
            "{} {}",
            display_path(&path),
            printer.dim(&format!("({} swatches)", result.palette.len()))
        ),
    );
    Ok(())
}

/// The release given in full on the command line, used as typed.
fn direct_release(args: &RenderArgs) -> Option<Release> {
    match (&args.image, &args.artist, &args.title) {
        (Some(image), Some(artist), Some(title)) => Some(Release {
            artist: artist.clone(),
            name: title.clone(),
            cover: image.clone(),
        }),
        _ => None,
    }
}

/// Config file merged with command-line overrides.
fn load_config(args: &RenderArgs) -> Result<Config> {
    let mut config = Config::load_or_default(&args.config)?;

    if let Some(output) = &args.output {
        config.output = output.clone();
    }
    if args.release_type.is_some() {
        config.catalog.release_type = args.release_type;
    }

    let render = &mut config.render;
    if let Some(size) = args.size {
        render.canvas_size = size;
    }
    if args.no_frame {
        render.frame = false;
    }
    if args.no_shadow {
        render.shadow = false;
    }
    if args.no_vignette {
        render.vignette = false;
    }
    if let Some(strength) = args.vignette_strength {
        render.vignette_strength = strength;
    }
    for (role, value) in &args.colours {
        render.role_mut(*role).colour = Some(ColourSpec::from(value.as_str()));
    }
    for &(role, pct) in &args.darken {
        render.role_mut(role).darken = Some(pct);
    }
    for &(role, pct) in &args.lighten {
        render.role_mut(role).lighten = Some(pct);
    }

    render.validate()?;
    Ok(config)
}

fn lookup(args: &RenderArgs, config: &Config, printer: &Printer) -> Result<Release> {
    let query = search_query(args)?;

    let credentials = match (&args.client_id, &args.client_secret) {
        (Some(id), Some(secret)) => Credentials {
            client_id: id.clone(),
            client_secret: secret.clone(),
        },
        _ => {
            return Err(PreviewError::Catalog {
                message: "missing catalog credentials".to_string(),
                help: Some(
                    "Set SPOTIFY_CLIENT_ID and SPOTIFY_CLIENT_SECRET, or pass --image".to_string(),
                ),
            })
        }
    };

    printer.status("Searching", &query);
    let mut client = SpotifyClient::new(credentials, config.catalog.clone());
    let cache = AlbumCache::new(&config.cache);
    let chooser: &dyn Chooser = if args.interactive {
        &PromptChooser
    } else {
        &RankedChooser
    };
    let options = LookupOptions {
        refresh: args.refresh,
        release_type: config.catalog.release_type,
    };

    let album = find_album(&mut client, &cache, chooser, &query, options)?;
    printer.info(
        "Found",
        &format!("{} {}", album.display_name(), printer.dim(&format!("({}, {})", album.album_type, album.release_date))),
    );

    Ok(catalog_release(album))
}

/// Catalog names lose edition suffixes such as "(Deluxe)".
fn catalog_release(album: Album) -> Release {
    Release {
        name: remove_parentheses(&album.name).to_string(),
        artist: album.artist,
        cover: album.cover_url,
    }
}

/// The catalog query: the positional `QUERY` or `--artist` with `--title`.
fn search_query(args: &RenderArgs) -> Result<String> {
    match (&args.query, &args.artist, &args.title) {
        (Some(query), _, _) => Ok(query.trim().to_string()),
        (None, Some(artist), Some(title)) => Ok(format!("{} - {}", artist.trim(), title.trim())),
        _ => Err(PreviewError::Parse {
            message: "nothing to render".to_string(),
            help: Some(
                "Pass \"Artist - Title\", --artist with --title, or --image with both".to_string(),
            ),
        }),
    }
}

fn split_assignment(input: &str) -> std::result::Result<(Role, &str), String> {
    let (role, value) = input
        .split_once('=')
        .ok_or_else(|| format!("expected ROLE=VALUE, got '{}'", input))?;
    let role = role.parse::<Role>().map_err(|e| e.to_string())?;
    Ok((role, value.trim()))
}

/// Parse `ROLE=VALUE`, accepting an ordinal, a swatch name or a colour.
fn parse_colour_override(input: &str) -> std::result::Result<(Role, String), String> {
    let (role, value) = split_assignment(input)?;
    let valid = value.parse::<i64>().is_ok()
        || value.parse::<Swatch>().is_ok()
        || Colour::is_valid(value);
    if !valid {
        return Err(PreviewError::InvalidColour {
            value: value.to_string(),
        }
        .to_string());
    }
    Ok((role, value.to_string()))
}

/// Parse `ROLE=PERCENT` with the percentage in 0..=100.
fn parse_percentage(input: &str) -> std::result::Result<(Role, f32), String> {
    let (role, value) = split_assignment(input)?;
    let pct: f32 = value
        .trim_end_matches('%')
        .parse()
        .map_err(|_| format!("'{}' is not a number", value))?;
    if !(0.0..=100.0).contains(&pct) {
        return Err(format!("{} is outside 0-100", pct));
    }
    Ok((role, pct))
}
