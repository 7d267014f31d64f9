use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};
use url::Url;

/// Configuration for the store where uploaded images are kept.
#[derive(Serialize, Deserialize, PartialEq, Eq, Debug, Clone)]
pub struct BlobStore {
    /// Directory where the blobs are written.
    #[serde(default = "BlobStore::default_root")]
    pub root: Utf8PathBuf,

    /// Base URL used to build the public URL of a stored blob. It must end
    /// with a slash, otherwise the last path segment is replaced when the
    /// blob path is joined.
    #[serde(default = "BlobStore::default_public_base_url")]
    pub public_base_url: Url,
}

impl Default for BlobStore {
    fn default() -> Self {
        Self {
            root: Self::default_root(),
            public_base_url: Self::default_public_base_url(),
        }
    }
}

impl BlobStore {
    fn default_root() -> Utf8PathBuf {
        Utf8PathBuf::from("./storage/campus-quest/blobs")
    }

    fn default_public_base_url() -> Url {
        Url::parse("http://127.0.0.1:3000/blobs/").expect("the default public base URL should be valid")
    }
}
