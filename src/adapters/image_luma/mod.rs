//! Image decoding and luminance metrics backed by the `image` crate

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use image::{ImageReader, RgbImage};

use crate::domain::errors::*;
use crate::domain::model::LumaStats;
use crate::ports::*;

/// Decodes captured frames and measures sharpness
pub struct ImageLumaAdapter;

impl ImageLumaAdapter {
    pub fn new() -> Self {
        Self
    }

    fn decode(path: &Path) -> Result<RgbImage, DomainError> {
        let reader = ImageReader::open(path)
            .map_err(|e| DomainError::FileNotFound(format!("{}: {}", path.display(), e)))?
            .with_guessed_format()
            .map_err(|e| DomainError::InvalidFormat(format!("{}: {}", path.display(), e)))?;
        let image = reader
            .decode()
            .map_err(|e| DomainError::InvalidFormat(format!("{}: {}", path.display(), e)))?;
        Ok(image.to_rgb8())
    }

    async fn run_blocking<T, F>(path: &Path, work: F) -> Result<T, DomainError>
    where
        T: Send + 'static,
        F: FnOnce(PathBuf) -> Result<T, DomainError> + Send + 'static,
    {
        let path = path.to_path_buf();
        tokio::task::spawn_blocking(move || work(path))
            .await
            .map_err(|e| DomainError::ProcessingError(format!("Image task failed: {}", e)))?
    }
}

impl Default for ImageLumaAdapter {
    fn default() -> Self {
        Self::new()
    }
}

/// BT.601 luminance, rounded, as used for 8-bit greyscale conversion
pub fn luminance(image: &RgbImage) -> Vec<f64> {
    image
        .pixels()
        .map(|p| {
            let [r, g, b] = p.0;
            (0.299 * r as f64 + 0.587 * g as f64 + 0.114 * b as f64).round()
        })
        .collect()
}

/// Mirror an out-of-range index without repeating the edge sample
fn reflect_101(index: isize, len: isize) -> usize {
    if len == 1 {
        return 0;
    }
    let mirrored = if index < 0 {
        -index
    } else if index >= len {
        2 * len - 2 - index
    } else {
        index
    };
    mirrored as usize
}

/// Mean luminance and variance of the 3x3 Laplacian response
pub fn luma_stats(luma: &[f64], width: usize, height: usize) -> LumaStats {
    let count = (width * height) as f64;
    if luma.is_empty() || count == 0.0 {
        return LumaStats {
            laplacian_variance: 0.0,
            mean: 0.0,
        };
    }

    let mean = luma.iter().sum::<f64>() / count;
    let (w, h) = (width as isize, height as isize);
    let at = |x: isize, y: isize| luma[reflect_101(y, h) * width + reflect_101(x, w)];

    let mut sum = 0.0;
    let mut sum_sq = 0.0;
    for y in 0..h {
        for x in 0..w {
            let response =
                at(x, y - 1) + at(x - 1, y) + at(x + 1, y) + at(x, y + 1) - 4.0 * at(x, y);
            sum += response;
            sum_sq += response * response;
        }
    }
    let response_mean = sum / count;
    let variance = (sum_sq / count - response_mean * response_mean).max(0.0);

    LumaStats {
        laplacian_variance: variance,
        mean,
    }
}

#[async_trait]
impl ImageCheckPort for ImageLumaAdapter {
    async fn verify_image(&self, image_path: &Path) -> Result<(u32, u32), DomainError> {
        Self::run_blocking(image_path, |path| {
            let image = Self::decode(&path)?;
            if image.width() == 0 || image.height() == 0 {
                return Err(DomainError::InvalidFormat(format!(
                    "{} has no pixels",
                    path.display()
                )));
            }
            Ok(image.dimensions())
        })
        .await
    }
}

#[async_trait]
impl LumaMetricsPort for ImageLumaAdapter {
    async fn measure(&self, image_path: &Path) -> Result<LumaStats, DomainError> {
        Self::run_blocking(image_path, |path| {
            let image = Self::decode(&path)?;
            let luma = luminance(&image);
            Ok(luma_stats(
                &luma,
                image.width() as usize,
                image.height() as usize,
            ))
        })
        .await
    }
}
