//! Asset reference resolution for custom-icon nodes.
//!
//! The pipeline never reads icon bitmaps itself. A node of kind
//! [`NodeKind::CustomIcon`](rampart_core::kind::NodeKind::CustomIcon) carries
//! an [`AssetRef`], which is resolved once, when the node is declared, into a
//! [`ResolvedAsset`] whose location is handed to the layout engine.

use std::{
    collections::HashMap,
    fmt,
    path::{Path, PathBuf},
};

use thiserror::Error;

/// Opaque identifier of an image asset.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AssetRef(String);

impl AssetRef {
    pub fn new(reference: impl Into<String>) -> Self {
        Self(reference.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AssetRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AssetRef {
    fn from(reference: &str) -> Self {
        Self::new(reference)
    }
}

/// An asset reference together with the location it resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedAsset {
    reference: AssetRef,
    location: PathBuf,
}

impl ResolvedAsset {
    pub fn new(reference: AssetRef, location: impl Into<PathBuf>) -> Self {
        Self {
            reference,
            location: location.into(),
        }
    }

    pub fn reference(&self) -> &AssetRef {
        &self.reference
    }

    /// Location passed to the layout engine as the node image.
    pub fn location(&self) -> &Path {
        &self.location
    }
}

/// Reasons an asset reference fails to resolve.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssetError {
    #[error("asset `{asset}` not found at `{}`", path.display())]
    NotFound { asset: String, path: PathBuf },

    #[error("asset `{asset}` at `{}` is not a file", path.display())]
    NotAFile { asset: String, path: PathBuf },

    #[error("asset `{0}` is not in the catalog")]
    Unknown(String),
}

/// Resolves asset references into locations the layout engine can read.
pub trait AssetResolver {
    fn resolve(&self, asset: &AssetRef) -> Result<ResolvedAsset, AssetError>;
}

/// Resolves assets as file paths relative to a base directory.
#[derive(Debug, Clone)]
pub struct FsAssetResolver {
    base_dir: PathBuf,
}

impl FsAssetResolver {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }
}

impl Default for FsAssetResolver {
    fn default() -> Self {
        Self::new(".")
    }
}

impl AssetResolver for FsAssetResolver {
    fn resolve(&self, asset: &AssetRef) -> Result<ResolvedAsset, AssetError> {
        let path = self.base_dir.join(asset.as_str());
        match path.metadata() {
            Ok(meta) if meta.is_file() => Ok(ResolvedAsset::new(asset.clone(), path)),
            Ok(_) => Err(AssetError::NotAFile {
                asset: asset.to_string(),
                path,
            }),
            Err(_) => Err(AssetError::NotFound {
                asset: asset.to_string(),
                path,
            }),
        }
    }
}

/// A fixed set of known assets.
///
/// Useful when icons are shipped alongside a binary or when no filesystem
/// lookup is wanted.
#[derive(Debug, Clone, Default)]
pub struct AssetCatalog {
    assets: HashMap<AssetRef, PathBuf>,
}

impl AssetCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, asset: impl Into<AssetRef>, location: impl Into<PathBuf>) -> Self {
        self.assets.insert(asset.into(), location.into());
        self
    }
}

impl AssetResolver for AssetCatalog {
    fn resolve(&self, asset: &AssetRef) -> Result<ResolvedAsset, AssetError> {
        self.assets
            .get(asset)
            .map(|location| ResolvedAsset::new(asset.clone(), location.clone()))
            .ok_or_else(|| AssetError::Unknown(asset.to_string()))
    }
}
