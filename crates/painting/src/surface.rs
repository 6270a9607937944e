//! CPU surface for painting - RGBA f32 storage with PNG export

use std::path::Path;

use image::{ImageFormat, RgbaImage};
use tracing::info;

/// Errors from surface creation and export
#[derive(Debug, thiserror::Error)]
pub enum SurfaceError {
    #[error("Invalid surface size {width}x{height}")]
    InvalidSize { width: u32, height: u32 },
    #[error("Image export failed: {0}")]
    Export(#[from] image::ImageError),
}

/// An RGBA CPU surface for painting
/// Stores pixels as [f32; 4], straight (non-premultiplied) alpha
pub struct CpuSurface {
    /// Surface dimensions
    pub width: u32,
    pub height: u32,
    /// Pixel data in row-major order, each pixel is [r, g, b, a] as f32
    pixels: Vec<[f32; 4]>,
}

impl CpuSurface {
    /// Create a new surface with the given dimensions, initialized to transparent black
    pub fn new(width: u32, height: u32) -> Self {
        let pixel_count = (width as usize) * (height as usize);
        Self {
            width,
            height,
            pixels: vec![[0.0, 0.0, 0.0, 0.0]; pixel_count],
        }
    }

    /// Clear the surface to a solid color
    pub fn clear(&mut self, color: [f32; 4]) {
        self.pixels.fill(color);
    }

    /// Get a pixel at the given coordinates
    /// Returns None if coordinates are out of bounds
    #[inline]
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<[f32; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let index = (y as usize) * (self.width as usize) + (x as usize);
        Some(self.pixels[index])
    }

    /// Set a pixel at the given coordinates
    /// Does nothing if coordinates are out of bounds
    #[inline]
    pub fn set_pixel(&mut self, x: u32, y: u32, color: [f32; 4]) {
        if x >= self.width || y >= self.height {
            return;
        }
        let index = (y as usize) * (self.width as usize) + (x as usize);
        self.pixels[index] = color;
    }

    /// Composite a color over an existing pixel ("source-over")
    #[inline]
    pub fn blend_pixel(&mut self, x: u32, y: u32, color: [f32; 4], opacity: f32) {
        if x >= self.width || y >= self.height {
            return;
        }
        let index = (y as usize) * (self.width as usize) + (x as usize);
        let dst = self.pixels[index];

        let src_alpha = (color[3] * opacity).clamp(0.0, 1.0);
        if src_alpha <= 0.0 {
            return;
        }
        let out_alpha = src_alpha + dst[3] * (1.0 - src_alpha);
        let mix = |s: f32, d: f32| (s * src_alpha + d * dst[3] * (1.0 - src_alpha)) / out_alpha;

        self.pixels[index] = [
            mix(color[0], dst[0]),
            mix(color[1], dst[1]),
            mix(color[2], dst[2]),
            out_alpha,
        ];
    }

    /// Get the total number of pixels
    #[inline]
    pub fn pixel_count(&self) -> usize {
        self.pixels.len()
    }

    /// Get direct access to pixel data
    #[inline]
    pub fn pixels(&self) -> &[[f32; 4]] {
        &self.pixels
    }

    /// Quantize to 8-bit RGBA
    pub fn to_rgba8(&self) -> RgbaImage {
        let to_u8 = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        RgbaImage::from_fn(self.width, self.height, |x, y| {
            let p = self.pixels[(y as usize) * (self.width as usize) + (x as usize)];
            image::Rgba([to_u8(p[0]), to_u8(p[1]), to_u8(p[2]), to_u8(p[3])])
        })
    }

    /// Encode the current pixels as PNG
    pub fn export_png(&self, path: impl AsRef<Path>) -> Result<(), SurfaceError> {
        if self.width == 0 || self.height == 0 {
            return Err(SurfaceError::InvalidSize {
                width: self.width,
                height: self.height,
            });
        }
        let path = path.as_ref();
        self.to_rgba8().save_with_format(path, ImageFormat::Png)?;
        info!(
            "Exported {}x{} canvas to {}",
            self.width,
            self.height,
            path.display()
        );
        Ok(())
    }
}
