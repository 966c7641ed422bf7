use super::items::{DrawEvent, DrawLayer};
use std::time::Duration;
use tracing::{debug, warn};

/// The map a committed upload is drawn onto.
pub trait MapHost {
    fn fire(&mut self, event: DrawEvent);
}

/// Transient, non-fatal user notifications.
pub trait Notifier {
    fn show_info_toast(&mut self, html: &str, options: &ToastOptions);
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ToastOptions {
    pub timeout: Duration,
}

impl Default for ToastOptions {
    fn default() -> Self {
        ToastOptions {
            timeout: Duration::from_secs(5),
        }
    }
}

/// Keeps every created layer, for hosts that render after the fact.
#[derive(Debug, Default)]
pub struct CollectingHost {
    pub layers: Vec<DrawLayer>,
    pub updates: usize,
}

impl MapHost for CollectingHost {
    fn fire(&mut self, event: DrawEvent) {
        debug!("{} fired", event.name());
        match event {
            DrawEvent::Created(layer) => self.layers.push(layer),
            DrawEvent::Updated => self.updates += 1,
        }
    }
}

#[derive(Debug, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn show_info_toast(&mut self, html: &str, options: &ToastOptions) {
        warn!(timeout_ms = options.timeout.as_millis() as u64, "{}", html);
    }
}
