//! Post-download qualification.
//!
//! Dimensions are read from the stored file's header, never from the
//! listing. The content-type check applies regardless of which size/ratio
//! constraints are active.

use std::path::{Path, PathBuf};

use image::ImageReader;
use thiserror::Error;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use super::criteria::SelectionCriteria;
use crate::cache::{AcceptedContentTypes, CachedImage};
use crate::candidate::Dimensions;

/// Per-image selection failure.
#[derive(Debug, Error)]
pub enum SelectionError {
    #[error("cannot read dimensions of {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

/// Read pixel dimensions from an image file header.
///
/// The format is sniffed from the file contents, not its extension.
pub fn stored_dimensions(path: &Path) -> Result<Dimensions, SelectionError> {
    let decode_err = |source: image::ImageError| SelectionError::Decode {
        path: path.to_path_buf(),
        source,
    };

    let (width, height) = ImageReader::open(path)
        .and_then(|reader| reader.with_guessed_format())
        .map_err(|e| decode_err(e.into()))?
        .into_dimensions()
        .map_err(decode_err)?;

    Ok(Dimensions::new(width, height))
}

/// Applies [`SelectionCriteria`] and the content-type allow-list to cached
/// images.
#[derive(Debug, Clone, Default)]
pub struct SelectionFilter {
    criteria: SelectionCriteria,
    accepted: AcceptedContentTypes,
}

impl SelectionFilter {
    pub fn new(criteria: SelectionCriteria, accepted: AcceptedContentTypes) -> Self {
        Self { criteria, accepted }
    }

    pub fn criteria(&self) -> &SelectionCriteria {
        &self.criteria
    }

    /// Decide whether one image qualifies.
    ///
    /// Blocking: reads the image header from disk.
    pub fn qualifies(&self, image: &CachedImage) -> Result<bool, SelectionError> {
        if !self.accepted.accepts(Some(&image.entry().content_type)) {
            debug!(
                url = image.candidate().url(),
                content_type = %image.entry().content_type,
                "Content type no longer accepted"
            );
            return Ok(false);
        }

        let dimensions = stored_dimensions(image.path())?;
        let fits = self.criteria.fits(dimensions);
        debug!(
            url = image.candidate().url(),
            dimensions = %dimensions,
            fits = fits,
            "Checked wallpaper"
        );
        Ok(fits)
    }

    /// Keep the qualifying images.
    ///
    /// Header reads run on the blocking pool. Images that cannot be read are
    /// logged and dropped.
    pub async fn select(&self, images: Vec<CachedImage>) -> Vec<CachedImage> {
        let total = images.len();
        let mut tasks = JoinSet::new();
        for image in images {
            let filter = self.clone();
            tasks.spawn_blocking(move || {
                let verdict = filter.qualifies(&image);
                (image, verdict)
            });
        }

        let mut selected = Vec::new();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((image, Ok(true))) => selected.push(image),
                Ok((_, Ok(false))) => {}
                Ok((image, Err(e))) => {
                    warn!(url = image.candidate().url(), error = %e, "Skipping unreadable wallpaper")
                }
                Err(e) => warn!(error = %e, "Selection task panicked"),
            }
        }

        info!(total = total, selected = selected.len(), "Wallpapers filtered");
        selected
    }
}
