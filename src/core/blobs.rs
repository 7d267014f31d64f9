//! Blob store for uploaded images.
//!
//! A blob is written under a relative path and exposed at a public URL. The
//! only implementation keeps the blobs in a local directory which the API
//! serves under `/blobs`.
use std::panic::Location;
use std::sync::Arc;

use async_trait::async_trait;
use camino::{Utf8Component, Utf8Path, Utf8PathBuf};
#[cfg(test)]
use mockall::automock;
use thiserror::Error;
use tracing::debug;
use url::Url;

use crate::shared::DynError;

const BLOBS_LOG_TARGET: &str = "BLOBS";

#[derive(Error, Debug, Clone)]
pub enum Error {
    #[error("invalid blob path `{path}`")]
    InvalidPath { path: String },

    #[error("unable to write blob `{path}`: {err}, {location}")]
    Write {
        path: String,
        err: DynError,
        location: &'static Location<'static>,
    },

    #[error("unable to build the public url of blob `{path}`: {err}")]
    PublicUrl { path: String, err: url::ParseError },
}

/// Durable storage with public URLs.
#[async_trait]
#[cfg_attr(test, automock)]
pub trait BlobStore: Sync + Send {
    /// Stores the bytes under the relative `path` and returns the URL where
    /// the blob can be downloaded.
    ///
    /// # Errors
    ///
    /// Will return an `Error` if the path is not a plain relative path or the
    /// blob can't be written.
    async fn put(&self, path: String, bytes: Vec<u8>) -> Result<Url, Error>;

    /// The local directory the blobs are served from, if any.
    fn local_root(&self) -> Option<Utf8PathBuf>;
}

/// A [`BlobStore`] in a local directory.
#[derive(Debug, Clone)]
pub struct LocalBlobStore {
    root: Utf8PathBuf,
    public_base_url: Url,
}

impl LocalBlobStore {
    #[must_use]
    pub fn new(root: Utf8PathBuf, mut public_base_url: Url) -> Self {
        if !public_base_url.path().ends_with('/') {
            let path = format!("{}/", public_base_url.path());
            public_base_url.set_path(&path);
        }

        Self { root, public_base_url }
    }

    #[must_use]
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }
}

/// Only `Normal` components are allowed: no root, no `..`, no `.`.
fn validate(path: &str) -> Result<&Utf8Path, Error> {
    let relative = Utf8Path::new(path);

    if path.is_empty() || !relative.components().all(|component| matches!(component, Utf8Component::Normal(_))) {
        return Err(Error::InvalidPath { path: path.to_string() });
    }

    Ok(relative)
}

#[async_trait]
impl BlobStore for LocalBlobStore {
    async fn put(&self, path: String, bytes: Vec<u8>) -> Result<Url, Error> {
        let relative = validate(&path)?;

        let url = self
            .public_base_url
            .join(relative.as_str())
            .map_err(|err| Error::PublicUrl { path: path.clone(), err })?;

        let destination = self.root.join(relative);

        let write_error = |err: std::io::Error| Error::Write {
            path: path.clone(),
            err: Arc::new(err),
            location: Location::caller(),
        };

        if let Some(parent) = destination.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(write_error)?;
        }

        tokio::fs::write(&destination, bytes).await.map_err(write_error)?;

        debug!(target: BLOBS_LOG_TARGET, %destination, %url, "blob stored");

        Ok(url)
    }

    fn local_root(&self) -> Option<Utf8PathBuf> {
        Some(self.root.clone())
    }
}
