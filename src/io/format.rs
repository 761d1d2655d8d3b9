use std::{fmt, path::Path};

/// Document formats understood by the loaders and emitters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DocumentFormat {
    #[default]
    Json,
    #[cfg(feature = "yaml")]
    Yaml,
    #[cfg(feature = "toml")]
    Toml,
}

impl DocumentFormat {
    pub fn available_formats() -> Vec<DocumentFormat> {
        vec![
            DocumentFormat::Json,
            #[cfg(feature = "yaml")]
            DocumentFormat::Yaml,
            #[cfg(feature = "toml")]
            DocumentFormat::Toml,
        ]
    }

    /// Guesses the format from a file extension.
    pub fn probe(path: &Path) -> FormatProbe {
        let Some(ext) = path.extension() else {
            return FormatProbe::Unknown;
        };
        match ext.to_string_lossy().to_ascii_lowercase().as_str() {
            "json" => FormatProbe::Known(DocumentFormat::Json),
            #[cfg(feature = "yaml")]
            "yaml" | "yml" => FormatProbe::Known(DocumentFormat::Yaml),
            #[cfg(not(feature = "yaml"))]
            "yaml" | "yml" => FormatProbe::MissingFeature("yaml"),
            #[cfg(feature = "toml")]
            "toml" => FormatProbe::Known(DocumentFormat::Toml),
            #[cfg(not(feature = "toml"))]
            "toml" => FormatProbe::MissingFeature("toml"),
            _ => FormatProbe::Unknown,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatProbe {
    Known(DocumentFormat),
    /// Recognised extension whose cargo feature is not compiled in.
    MissingFeature(&'static str),
    Unknown,
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentFormat::Json => write!(f, "json"),
            #[cfg(feature = "yaml")]
            DocumentFormat::Yaml => write!(f, "yaml"),
            #[cfg(feature = "toml")]
            DocumentFormat::Toml => write!(f, "toml"),
        }
    }
}
