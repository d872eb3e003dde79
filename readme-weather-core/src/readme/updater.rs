use anyhow::Result;
use chrono::Utc;
use chrono_tz::Tz;
use std::{
    env,
    path::{Path, PathBuf},
};

use crate::{
    config::Config,
    model::{PayloadError, WeatherUpdatePayload},
};

use super::{
    SectionMarkers, SectionRenderer,
    gate::{self, CI_ENV, FORCE_UPDATE_ENV},
    locator, stamp,
};

/// Process-level switches for one update run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateOptions {
    /// Rewrite even when the rendered section is unchanged.
    pub force: bool,
    /// Running under CI. Only affects logging.
    pub ci: bool,
}

impl UpdateOptions {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Read `FORCE_UPDATE` and `CI` through `lookup`. Unset, empty and
    /// `"false"` all leave `ci` off.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            force: gate::force_override(lookup(FORCE_UPDATE_ENV).as_deref()),
            ci: lookup(CI_ENV).is_some_and(|v| !v.is_empty() && v != "false"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
enum UpdateError {
    #[error("document {0} does not exist")]
    MissingDocument(PathBuf),
    #[error("payload rejected: {0}")]
    InvalidPayload(#[from] PayloadError),
    #[error("document has no weather section markers")]
    MissingMarkers,
    #[error("file system error: {0}")]
    Io(#[from] std::io::Error),
}

/// Rewrites the weather section of one document per call.
#[derive(Debug, Clone)]
pub struct ReadmeUpdater {
    renderer: SectionRenderer,
    tz: Tz,
    default_path: PathBuf,
    options: UpdateOptions,
}

impl ReadmeUpdater {
    pub fn new(markers: SectionMarkers, tz: Tz, default_path: impl Into<PathBuf>) -> Self {
        Self {
            renderer: SectionRenderer::new(markers),
            tz,
            default_path: default_path.into(),
            options: UpdateOptions::default(),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(
            config.readme.markers(),
            config.location.tz()?,
            config.readme.path.clone(),
        ))
    }

    pub fn with_options(mut self, options: UpdateOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> UpdateOptions {
        self.options
    }

    /// Returns `true` only when the document was rewritten. Every failure is
    /// logged and reported as `false`.
    pub async fn update(&self, payload: &WeatherUpdatePayload, path: Option<&Path>) -> bool {
        let path = path.unwrap_or(self.default_path.as_path());

        match self.try_update(payload, path).await {
            Ok(written) => written,
            Err(e) => {
                tracing::warn!(path = %path.display(), "Skipping README update: {e}");
                false
            }
        }
    }

    async fn try_update(
        &self,
        payload: &WeatherUpdatePayload,
        path: &Path,
    ) -> Result<bool, UpdateError> {
        if !tokio::fs::try_exists(path).await? {
            return Err(UpdateError::MissingDocument(path.to_path_buf()));
        }

        payload.validate()?;

        let original = tokio::fs::read_to_string(path).await?;
        let span = locator::section_span(&original, self.renderer.markers())
            .ok_or(UpdateError::MissingMarkers)?;

        let section = self.renderer.render(payload, &original[span.clone()]);

        let mut updated = String::with_capacity(original.len() + section.len());
        updated.push_str(&original[..span.start]);
        updated.push_str(&section);
        updated.push_str(&original[span.end..]);

        // Compared before stamping: the clock alone never triggers a write.
        if !gate::should_write(&original, &updated, self.options.force) {
            tracing::debug!(path = %path.display(), "Weather section unchanged, nothing to write");
            return Ok(false);
        }

        let stamped = stamp::stamp(&updated, &stamp::refresh_timestamp(Utc::now(), self.tz));
        tokio::fs::write(path, stamped).await?;

        tracing::info!(
            path = %path.display(),
            forced = self.options.force,
            ci = self.options.ci,
            "README weather section updated: {}",
            payload.summary()
        );
        Ok(true)
    }
}
