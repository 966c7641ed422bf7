use super::error::LocaleError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Locale {
    #[default]
    #[serde(rename = "en_US")]
    EnUs,
    #[serde(rename = "da_DK")]
    DaDk,
}

impl Locale {
    pub fn code(self) -> &'static str {
        match self {
            Locale::EnUs => "en_US",
            Locale::DaDk => "da_DK",
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Locale {
    type Err = LocaleError;

    fn from_str(code: &str) -> Result<Self, Self::Err> {
        match code.replace('-', "_").as_str() {
            "en_US" => Ok(Locale::EnUs),
            "da_DK" => Ok(Locale::DaDk),
            _ => Err(LocaleError(code.into())),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MessageKey {
    UploadShapefile,
    OnlyZipAllowed,
    NoShpFound,
    CouldNotReadFile,
    CouldNotParseShapefile,
    NoFeaturesFound,
    TooManyFeatures,
    UploadInProgress,
    UploadSuperseded,
    ChooseOption,
    AddOption,
}

impl MessageKey {
    pub const ALL: [MessageKey; 11] = [
        MessageKey::UploadShapefile,
        MessageKey::OnlyZipAllowed,
        MessageKey::NoShpFound,
        MessageKey::CouldNotReadFile,
        MessageKey::CouldNotParseShapefile,
        MessageKey::NoFeaturesFound,
        MessageKey::TooManyFeatures,
        MessageKey::UploadInProgress,
        MessageKey::UploadSuperseded,
        MessageKey::ChooseOption,
        MessageKey::AddOption,
    ];

    /// The English source text, which doubles as the key of the message in
    /// runtime dictionaries.
    pub fn raw(self) -> &'static str {
        self.text(Locale::EnUs)
    }

    pub fn text(self, locale: Locale) -> &'static str {
        use Locale::*;
        use MessageKey::*;

        match (self, locale) {
            (UploadShapefile, EnUs) => "Select a .zip file containing a shapefile",
            (UploadShapefile, DaDk) => "Vælg en .zip-fil med en shapefil",
            (OnlyZipAllowed, EnUs) => "'{file}' is not a .zip file. Only .zip files are allowed",
            (OnlyZipAllowed, DaDk) => "'{file}' er ikke en .zip-fil. Kun .zip-filer er tilladt",
            (NoShpFound, EnUs) => "No .shp file found",
            (NoShpFound, DaDk) => "Ingen .shp-fil fundet",
            (CouldNotReadFile, EnUs) => "Could not read the file",
            (CouldNotReadFile, DaDk) => "Filen kunne ikke læses",
            (CouldNotParseShapefile, EnUs) => "Could not parse the shapefile",
            (CouldNotParseShapefile, DaDk) => "Shapefilen kunne ikke fortolkes",
            (NoFeaturesFound, EnUs) => "No features found",
            (NoFeaturesFound, DaDk) => "Ingen objekter fundet",
            (TooManyFeatures, EnUs) => "Too many features ({count}). Max is {limit}",
            (TooManyFeatures, DaDk) => "For mange objekter ({count}). Maks. er {limit}",
            (UploadInProgress, EnUs) => "Another upload is in progress",
            (UploadInProgress, DaDk) => "En anden upload er i gang",
            (UploadSuperseded, EnUs) => "The upload was replaced by a newer one",
            (UploadSuperseded, DaDk) => "Upload blev erstattet af en nyere",
            (ChooseOption, EnUs) => "Choose...",
            (ChooseOption, DaDk) => "Vælg...",
            (AddOption, EnUs) => "Add \"{value}\"",
            (AddOption, DaDk) => "Tilføj \"{value}\"",
        }
    }
}

/// Substitute `{name}` placeholders in `template`. Unknown placeholders are
/// left as they are.
pub fn render(template: &str, args: &[(&str, String)]) -> String {
    args.iter().fold(template.to_string(), |text, (name, value)| {
        text.replace(&format!("{{{}}}", name), value)
    })
}

/// Runtime message table: key → locale → text.
///
/// Dictionaries shipped by host extensions are plain JSON objects keyed by the
/// source text:
///
/// ```
/// use vidi_shp_import::i18n::{Dictionary, Locale};
///
/// let dict: Dictionary = serde_json::from_str(
///     r#"{ "Layers": { "da_DK": "Lag", "en_US": "Layers" } }"#,
/// ).unwrap();
/// assert_eq!(dict.lookup("Layers", Locale::DaDk), "Lag");
/// assert_eq!(dict.lookup("Legend", Locale::DaDk), "Legend");
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Dictionary {
    entries: HashMap<String, HashMap<Locale, String>>,
}

impl Dictionary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: &str, locale: Locale, text: &str) {
        self.entries
            .entry(key.into())
            .or_default()
            .insert(locale, text.into());
    }

    pub fn lookup<'a>(&'a self, key: &'a str, locale: Locale) -> &'a str {
        self.entries
            .get(key)
            .and_then(|texts| texts.get(&locale))
            .map(String::as_str)
            .unwrap_or(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl From<&[MessageKey]> for Dictionary {
    fn from(keys: &[MessageKey]) -> Self {
        let mut dict = Dictionary::new();
        for key in keys {
            for locale in &[Locale::EnUs, Locale::DaDk] {
                dict.insert(key.raw(), *locale, key.text(*locale));
            }
        }
        dict
    }
}
