//! Format-preserving rewrite of the weather section of a README.
//!
//! The managed section sits between two literal sentinel markers. Everything
//! outside it is left byte-identical, except the optional
//! `<em>Last refresh: …</em>` stamp whose value is replaced on each write.

pub mod gate;
pub mod locator;
pub mod render;
pub mod stamp;
pub mod updater;

pub use gate::should_write;
pub use locator::{locate, section_span};
pub use render::{SectionFormat, SectionRenderer};
pub use stamp::{refresh_timestamp, stamp};
pub use updater::{ReadmeUpdater, UpdateOptions};

/// The exact start/end comment pair bounding the managed section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionMarkers {
    pub start: String,
    pub end: String,
}

impl SectionMarkers {
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
        }
    }

    /// Text between the markers of a section returned by [`locate`].
    pub fn inner<'a>(&self, section: &'a str) -> &'a str {
        section
            .strip_prefix(self.start.as_str())
            .and_then(|rest| rest.strip_suffix(self.end.as_str()))
            .unwrap_or("")
    }

    /// Surround `body` with the markers, one per line.
    pub fn wrap(&self, body: &str) -> String {
        format!("{}\n{}\n{}", self.start, body, self.end)
    }
}

impl Default for SectionMarkers {
    fn default() -> Self {
        Self::new("<!--START-->", "<!--END-->")
    }
}
