use miette::Diagnostic;
use thiserror::Error;

/// Main error type for muzovano operations
#[derive(Error, Diagnostic, Debug)]
pub enum PreviewError {
    #[error("Invalid colour format: {value}")]
    #[diagnostic(
        code(muzovano::colour),
        help("Use #RGB, #RRGGBB, rgb(r, g, b), rgba(r, g, b, a), a CSS colour name or [r, g, b]")
    )]
    InvalidColour { value: String },

    #[error("Failed to load image {source_ref}: {message}")]
    #[diagnostic(code(muzovano::image))]
    ImageLoad { source_ref: String, message: String },

    #[error("Failed to load font {path}: {message}")]
    #[diagnostic(
        code(muzovano::font),
        help("Point fonts.regular and fonts.bold in muzovano.yaml at TrueType/OpenType files")
    )]
    FontLoad {
        path: std::path::PathBuf,
        message: String,
    },

    #[error("Failed to encode preview: {message}")]
    #[diagnostic(code(muzovano::encode))]
    Encode { message: String },

    #[error("No accent colour could be resolved: {message}")]
    #[diagnostic(
        code(muzovano::palette),
        help("Pass an explicit colour, e.g. --colour accent=#3366CC")
    )]
    PaletteResolution { message: String },

    #[error("IO error with {path}: {message}")]
    #[diagnostic(code(muzovano::io))]
    Io {
        path: std::path::PathBuf,
        message: String,
    },

    #[error("Parse error: {message}")]
    #[diagnostic(code(muzovano::parse))]
    Parse {
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("Catalog error: {message}")]
    #[diagnostic(code(muzovano::catalog))]
    Catalog {
        message: String,
        #[help]
        help: Option<String>,
    },
}

impl PreviewError {
    pub(crate) fn image_load(source_ref: impl Into<String>, message: impl ToString) -> Self {
        Self::ImageLoad {
            source_ref: source_ref.into(),
            message: message.to_string(),
        }
    }

    pub(crate) fn catalog(message: impl Into<String>) -> Self {
        Self::Catalog {
            message: message.into(),
            help: None,
        }
    }
}

pub type Result<T> = std::result::Result<T, PreviewError>;
