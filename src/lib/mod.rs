use decoder::ShpDecoder;
use host::{CollectingHost, LogNotifier};
use items::DrawLayer;
use std::path::Path;

pub mod archive;
pub mod decoder;
pub mod error;
pub mod features;
pub mod format;
pub mod forms;
pub mod host;
pub mod i18n;
pub mod items;
pub mod measure;
pub mod output;
pub mod pipeline;
pub mod session;
#[cfg(test)]
mod test_helpers;

pub use error::{DecodeError, ImportError, MeasureError};
pub use pipeline::{ImportConfig, ImportStage, ImportSummary, Importer, MAX_FEATURES};

/// Import a zipped shapefile from disk and return the layers it produced.
///
/// Failures are logged the way a toast would show them and returned.
pub fn import(path: &Path, config: ImportConfig) -> Result<Vec<DrawLayer>, ImportError> {
    let importer = Importer::new(ShpDecoder, config);
    let mut host = CollectingHost::default();
    importer.run_path(path, &mut host, &mut LogNotifier)?;
    Ok(host.layers)
}
