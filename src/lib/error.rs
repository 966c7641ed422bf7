use super::i18n::{render, Locale, MessageKey};
use super::pipeline::ImportStage;
use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ImportError {
    #[error("'{file_name}' is not a .zip file")]
    NotZip { file_name: String },

    #[error("No .shp file found")]
    NoShapefile,

    #[error("could not read archive: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("could not open '{file_name}': {source}")]
    Open {
        file_name: String,
        #[source]
        source: io::Error,
    },

    #[error("could not read upload: {0}")]
    Io(#[from] io::Error),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Measure(#[from] MeasureError),

    #[error("No features found in '{collection}'")]
    NoFeatures { collection: String },

    #[error("Too many features ({count}). Max is {limit}")]
    TooManyFeatures { count: usize, limit: usize },

    #[error("another upload is in progress")]
    Busy,

    #[error("upload was superseded by a newer one while {stage}")]
    Superseded { stage: ImportStage },
}

impl ImportError {
    /// The stage the pipeline was in when the error was raised.
    pub fn stage(&self) -> ImportStage {
        match self {
            ImportError::NotZip { .. } | ImportError::Open { .. } | ImportError::Busy => {
                ImportStage::Idle
            }
            ImportError::NoShapefile | ImportError::Archive(_) => ImportStage::Validating,
            ImportError::Io(_) => ImportStage::Unpacking,
            ImportError::Decode(_) => ImportStage::Parsing,
            ImportError::Measure(_)
            | ImportError::NoFeatures { .. }
            | ImportError::TooManyFeatures { .. } => ImportStage::Enriching,
            ImportError::Superseded { stage } => *stage,
        }
    }

    pub fn message_key(&self) -> MessageKey {
        match self {
            ImportError::NotZip { .. } => MessageKey::OnlyZipAllowed,
            ImportError::NoShapefile => MessageKey::NoShpFound,
            ImportError::Open { .. } | ImportError::Archive(_) | ImportError::Io(_) => {
                MessageKey::CouldNotReadFile
            }
            ImportError::Decode(_) | ImportError::Measure(_) => MessageKey::CouldNotParseShapefile,
            ImportError::NoFeatures { .. } => MessageKey::NoFeaturesFound,
            ImportError::TooManyFeatures { .. } => MessageKey::TooManyFeatures,
            ImportError::Busy => MessageKey::UploadInProgress,
            ImportError::Superseded { .. } => MessageKey::UploadSuperseded,
        }
    }

    /// Localized text for the toast shown to the user.
    pub fn user_message(&self, locale: Locale) -> String {
        let text = self.message_key().text(locale);
        match self {
            ImportError::TooManyFeatures { count, limit } => render(
                text,
                &[("count", count.to_string()), ("limit", limit.to_string())],
            ),
            ImportError::NotZip { file_name } => render(text, &[("file", file_name.clone())]),
            _ => text.to_string(),
        }
    }
}

#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("i/o error: {0}")]
    Io(#[from] io::Error),

    #[error("shapefile '{name}' is corrupt: {source}")]
    Shapefile {
        name: String,
        #[source]
        source: shapefile::Error,
    },

    #[error("attribute table '{name}' is corrupt: {source}")]
    Dbase {
        name: String,
        #[source]
        source: shapefile::dbase::Error,
    },

    #[error("unsupported shape type in '{name}': {shape}")]
    Unsupported { name: String, shape: String },
}

#[derive(Error, Debug, PartialEq)]
pub enum MeasureError {
    #[error("feature has no geometry")]
    MissingGeometry,

    #[error("expected a {expected} geometry, got {found}")]
    WrongGeometry {
        expected: &'static str,
        found: &'static str,
    },
}

#[derive(Error, Debug, PartialEq)]
#[error("unknown locale '{0}'")]
pub struct LocaleError(pub String);
