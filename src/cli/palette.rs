use clap::Args;

use crate::error::{PreviewError, Result};
use crate::extract::{decode_image, extract_palette};
use crate::output::{plural, Printer};
use crate::source::SourceLoader;
use crate::types::Palette;

/// Print the swatch palette extracted from an image
#[derive(Args, Debug)]
pub struct PaletteArgs {
    /// Image file or http(s) URL to extract swatches from
    #[arg(required = true)]
    pub image: String,

    /// Print the palette as a JSON object instead of lines
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: PaletteArgs, printer: &Printer) -> Result<()> {
    let bytes = SourceLoader::default().load(&args.image)?;
    let image = decode_image(&bytes, &args.image)?;
    let palette = extract_palette(&image);

    printer.status(
        "Extracted",
        &format!("{} from {}", plural(palette.len(), "swatch", "swatches"), args.image),
    );
    if palette.is_empty() {
        printer.warning("Empty", "the image has no distinct tones; every role will need an explicit colour");
    }

    // Palette lines go to stdout
    println!("{}", format_palette(&palette, args.json)?);
    Ok(())
}

fn format_palette(palette: &Palette, json: bool) -> Result<String> {
    if json {
        return serde_json::to_string_pretty(palette).map_err(|e| PreviewError::Encode {
            message: e.to_string(),
        });
    }
    Ok(palette
        .iter()
        .map(|(swatch, colour)| format!("{}: {}", swatch, colour))
        .collect::<Vec<_>>()
        .join("\n"))
}
