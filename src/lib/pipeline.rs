use super::archive::{check_extension, shapefile_entries};
use super::decoder::ShapeDecoder;
use super::error::ImportError;
use super::features::{enrich, explode};
use super::host::{MapHost, Notifier, ToastOptions};
use super::items::{DrawEvent, NamedCollection};
use super::measure::DisplayConfig;
use super::session::{ConcurrencyPolicy, ImportSession, ImportTicket};
use std::fmt;
use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;
use tracing::{debug, info, warn};

/// Largest number of features a single shapefile may contribute.
pub const MAX_FEATURES: usize = 200;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ImportStage {
    Idle,
    Validating,
    Unpacking,
    Parsing,
    Enriching,
    Committed,
}

impl fmt::Display for ImportStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ImportConfig {
    pub display: DisplayConfig,
    pub max_features: usize,
    pub concurrency: ConcurrencyPolicy,
    pub toast: ToastOptions,
}

impl Default for ImportConfig {
    fn default() -> Self {
        ImportConfig {
            display: DisplayConfig::default(),
            max_features: MAX_FEATURES,
            concurrency: ConcurrencyPolicy::default(),
            toast: ToastOptions::default(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ImportSummary {
    pub collections: usize,
    pub features_committed: usize,
}

pub struct Importer<D> {
    decoder: D,
    config: ImportConfig,
    session: ImportSession,
}

fn enter(stage: ImportStage, file_name: &str) {
    debug!(%stage, file_name, "upload stage");
}

impl<D: ShapeDecoder> Importer<D> {
    pub fn new(decoder: D, config: ImportConfig) -> Self {
        let session = ImportSession::new(config.concurrency);
        Importer {
            decoder,
            config,
            session,
        }
    }

    pub fn config(&self) -> &ImportConfig {
        &self.config
    }

    /// Session shared by every upload run through this importer. Clone it to
    /// check from another thread whether an upload is in flight.
    pub fn session(&self) -> &ImportSession {
        &self.session
    }

    /// Run one upload from file selection to commit. Failures are shown to the
    /// user through `notifier` and returned; layers fired before a failure
    /// stay on the map.
    pub fn run<R: Read + Seek>(
        &self,
        file_name: &str,
        reader: R,
        map: &mut dyn MapHost,
        notifier: &mut dyn Notifier,
    ) -> Result<ImportSummary, ImportError> {
        let result = check_extension(file_name)
            .and_then(|_| self.session.begin())
            .and_then(|ticket| self.process(&ticket, file_name, reader, map));
        self.report(file_name, result, notifier)
    }

    pub fn run_path(
        &self,
        path: &Path,
        map: &mut dyn MapHost,
        notifier: &mut dyn Notifier,
    ) -> Result<ImportSummary, ImportError> {
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        if let Err(error) = check_extension(&file_name) {
            return self.report(&file_name, Err(error), notifier);
        }
        match File::open(path) {
            Ok(file) => self.run(&file_name, file, map, notifier),
            Err(source) => {
                let error = ImportError::Open {
                    file_name: file_name.clone(),
                    source,
                };
                self.report(&file_name, Err(error), notifier)
            }
        }
    }

    fn report(
        &self,
        file_name: &str,
        result: Result<ImportSummary, ImportError>,
        notifier: &mut dyn Notifier,
    ) -> Result<ImportSummary, ImportError> {
        match &result {
            Ok(summary) => info!(
                file_name,
                collections = summary.collections,
                features = summary.features_committed,
                "upload committed"
            ),
            Err(ImportError::Superseded { stage }) => {
                info!(file_name, %stage, "upload superseded")
            }
            Err(error) => {
                warn!(file_name, stage = %error.stage(), "upload failed: {}", error);
                let message = error.user_message(self.config.display.locale);
                notifier.show_info_toast(&message, &self.config.toast);
            }
        }
        result
    }

    fn check_count(&self, collection: &NamedCollection) -> Result<(), ImportError> {
        let count = collection.len();
        if count == 0 {
            return Err(ImportError::NoFeatures {
                collection: collection.name.clone(),
            });
        }
        if count > self.config.max_features {
            return Err(ImportError::TooManyFeatures {
                count,
                limit: self.config.max_features,
            });
        }
        Ok(())
    }

    fn process<R: Read + Seek>(
        &self,
        ticket: &ImportTicket,
        file_name: &str,
        mut reader: R,
        map: &mut dyn MapHost,
    ) -> Result<ImportSummary, ImportError> {
        enter(ImportStage::Validating, file_name);
        let entries = shapefile_entries(&mut reader)?;
        debug!(file_name, shapefiles = ?entries, "archive inspected");

        enter(ImportStage::Unpacking, file_name);
        reader.seek(SeekFrom::Start(0))?;
        let mut bytes = vec![];
        reader.read_to_end(&mut bytes)?;
        ticket.check(ImportStage::Unpacking)?;

        enter(ImportStage::Parsing, file_name);
        let collections = self.decoder.decode(&bytes)?;
        ticket.check(ImportStage::Parsing)?;

        enter(ImportStage::Enriching, file_name);
        let mut summary = ImportSummary {
            collections: collections.len(),
            features_committed: 0,
        };
        for collection in collections {
            self.check_count(&collection)?;
            for feature in collection.collection.features {
                for part in explode(feature) {
                    let layer = enrich(part, &self.config.display)?;
                    ticket.check(ImportStage::Enriching)?;
                    map.fire(DrawEvent::Created(layer));
                    summary.features_committed += 1;
                }
            }
        }

        ticket.check(ImportStage::Enriching)?;
        enter(ImportStage::Committed, file_name);
        map.fire(DrawEvent::Updated);
        Ok(summary)
    }
}
