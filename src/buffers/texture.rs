//! Tileable RGBA texture buffers
//!
//! Textures are logically infinite: the sampler wraps coordinates in both
//! axes. Dot textures hold independently-random bytes and are regenerated
//! for every synthesis request; capture a `snapshot()` to pin exact pixels.

use crate::io::error::{Result, invalid_source};
use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};
use rand::Rng;

/// How a texture's pixels were produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureType {
    /// Random grayscale dots, one byte replicated across R, G, B
    GreyDots,
    /// Random coloured dots, three independent bytes per pixel
    ColourDots,
    /// Pixels supplied by the caller (or pinned via `snapshot`)
    Bitmap,
}

/// Tileable RGBA texture
#[derive(Debug, Clone)]
pub struct Texture {
    pixels: RgbaImage,
    texture_type: TextureType,
}

impl Texture {
    /// Generate a random grayscale dot texture
    ///
    /// Not reproducible across calls; callers wanting identical pixels must
    /// take a `snapshot` and reuse it.
    ///
    /// # Errors
    ///
    /// Returns `InvalidSourceData` if either dimension is zero.
    pub fn grey_dots(width: u32, height: u32) -> Result<Self> {
        check_dimensions(width, height)?;
        let mut rng = rand::rng();
        let pixels = RgbaImage::from_fn(width, height, |_, _| {
            let v = rng.random::<u8>();
            Rgba([v, v, v, 255])
        });
        Ok(Self {
            pixels,
            texture_type: TextureType::GreyDots,
        })
    }

    /// Generate a random coloured dot texture
    ///
    /// # Errors
    ///
    /// Returns `InvalidSourceData` if either dimension is zero.
    pub fn colour_dots(width: u32, height: u32) -> Result<Self> {
        check_dimensions(width, height)?;
        let mut rng = rand::rng();
        let pixels = RgbaImage::from_fn(width, height, |_, _| {
            Rgba([rng.random::<u8>(), rng.random::<u8>(), rng.random::<u8>(), 255])
        });
        Ok(Self {
            pixels,
            texture_type: TextureType::ColourDots,
        })
    }

    /// Wrap a decoded RGBA image as a bitmap texture
    ///
    /// # Errors
    ///
    /// Returns `InvalidSourceData` if the image has zero pixels in either
    /// dimension.
    pub fn from_image(pixels: RgbaImage) -> Result<Self> {
        check_dimensions(pixels.width(), pixels.height())?;
        Ok(Self {
            pixels,
            texture_type: TextureType::Bitmap,
        })
    }

    /// Width of the tile in pixels
    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    /// Height of the tile in pixels
    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// How this texture's pixels were produced
    pub const fn texture_type(&self) -> TextureType {
        self.texture_type
    }

    /// Access the tile pixels
    pub const fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    /// Pin the current pixels by re-typing them as a bitmap texture
    ///
    /// A generator regenerates dot textures per request; a snapshot is
    /// passed through untouched, which makes repeated syntheses
    /// byte-reproducible.
    pub fn snapshot(&self) -> Self {
        Self {
            pixels: self.pixels.clone(),
            texture_type: TextureType::Bitmap,
        }
    }

    /// Resample the tile to exactly the given dimensions
    ///
    /// Deterministic for identical inputs; returns a copy when the size
    /// already matches.
    ///
    /// # Errors
    ///
    /// Returns `InvalidSourceData` if either target dimension is zero.
    pub fn to_scale(&self, width: u32, height: u32) -> Result<RgbaImage> {
        check_dimensions(width, height)?;
        if width == self.width() && height == self.height() {
            return Ok(self.pixels.clone());
        }
        Ok(imageops::resize(
            &self.pixels,
            width,
            height,
            FilterType::Triangle,
        ))
    }
}

fn check_dimensions(width: u32, height: u32) -> Result<()> {
    if width == 0 || height == 0 {
        return Err(invalid_source(&format!(
            "texture has zero pixels ({width}x{height})"
        )));
    }
    Ok(())
}
