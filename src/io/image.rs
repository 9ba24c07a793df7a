//! PNG loading for depth maps and textures, and stereogram export

use crate::algorithm::generator::Stereogram;
use crate::buffers::{DepthMap, Texture};
use crate::io::error::{GenerationError, Result};
use std::path::Path;

/// Load an image as a grayscale depth map
///
/// Any supported image format is accepted; colour sources are converted to
/// grayscale. 0 reads as the far plane and 255 as nearest the viewer.
///
/// # Errors
///
/// Returns `ImageLoad` if the file cannot be decoded and
/// `InvalidSourceData` if the image has zero pixels in either dimension.
pub fn load_depthmap(path: &Path) -> Result<DepthMap> {
    let decoded = image::open(path).map_err(|e| GenerationError::ImageLoad {
        path: path.to_path_buf(),
        source: e,
    })?;
    DepthMap::from_luma(&decoded.to_luma8())
}

/// Load an image as a bitmap texture tile
///
/// # Errors
///
/// Returns `ImageLoad` if the file cannot be decoded and
/// `InvalidSourceData` if the image has zero pixels in either dimension.
pub fn load_texture(path: &Path) -> Result<Texture> {
    let decoded = image::open(path).map_err(|e| GenerationError::ImageLoad {
        path: path.to_path_buf(),
        source: e,
    })?;
    Texture::from_image(decoded.to_rgba8())
}

/// Save a finished stereogram, creating parent directories as needed
///
/// # Errors
///
/// Returns `FileSystem` if a parent directory cannot be created and
/// `ImageExport` if encoding or writing fails.
pub fn export_stereogram(stereogram: &Stereogram, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(|e| GenerationError::FileSystem {
            path: parent.to_path_buf(),
            operation: "create directory",
            source: e,
        })?;
    }

    stereogram
        .image()
        .save(path)
        .map_err(|e| GenerationError::ImageExport {
            path: path.to_path_buf(),
            source: e,
        })
}
