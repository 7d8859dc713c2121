// Quality interactor - Sharpness score with black-screen sentinel

use std::path::Path;
use std::sync::Arc;

use crate::domain::model::*;
use crate::domain::rules::*;
use crate::ports::*;

/// Interactor for the quality analysis use case
pub struct QualityInteractor {
    luma_metrics_port: Arc<dyn LumaMetricsPort>,
    log_port: Arc<dyn LogPort>,
}

impl QualityInteractor {
    /// Create new quality interactor with injected ports
    pub fn new(luma_metrics_port: Arc<dyn LumaMetricsPort>, log_port: Arc<dyn LogPort>) -> Self {
        Self {
            luma_metrics_port,
            log_port,
        }
    }

    /// Classify the frame at `image_path`
    pub async fn verdict(&self, image_path: &Path) -> QualityVerdict {
        match self.luma_metrics_port.measure(image_path).await {
            Ok(stats) => FrameClassifier::classify(&stats),
            Err(e) => {
                self.log_port
                    .warn(&format!("Error analyzing image {}: {}", image_path.display(), e))
                    .await;
                QualityVerdict::Unscored
            }
        }
    }

    /// Score the frame: `-1.0` black screen, `0.0` unscored, otherwise the
    /// Laplacian variance
    pub async fn analyze(&self, image_path: &Path) -> f64 {
        self.verdict(image_path).await.score()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{ImageLumaAdapter, TracingLogAdapter};
    use image::{Rgb, RgbImage};
    use tempfile::TempDir;

    fn analyzer() -> QualityInteractor {
        QualityInteractor::new(
            Arc::new(ImageLumaAdapter::new()),
            Arc::new(TracingLogAdapter::new()),
        )
    }

    #[tokio::test]
    async fn test_all_black_image_is_sentinel() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("black.png");
        RgbImage::new(320, 240).save(&path).unwrap();

        assert_eq!(analyzer().analyze(&path).await, -1.0);
    }

    #[tokio::test]
    async fn test_sharp_image_scores_positive() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("stripes.png");
        RgbImage::from_fn(64, 64, |x, _| {
            if x % 2 == 0 {
                Rgb([255, 255, 255])
            } else {
                Rgb([0, 0, 0])
            }
        })
        .save(&path)
        .unwrap();

        assert!(analyzer().analyze(&path).await > 0.0);
    }

    #[tokio::test]
    async fn test_flat_grey_image_is_not_black() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("grey.png");
        RgbImage::from_pixel(32, 32, Rgb([128, 128, 128]))
            .save(&path)
            .unwrap();

        let verdict = analyzer().verdict(&path).await;
        assert_eq!(verdict, QualityVerdict::Measured(0.0));
    }

    #[tokio::test]
    async fn test_corrupt_file_scores_zero() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.jpg");
        std::fs::write(&path, [0xFF, 0xD8, 0xFF, 0x00, 0x13]).unwrap();

        assert_eq!(analyzer().analyze(&path).await, 0.0);
    }

    #[tokio::test]
    async fn test_missing_file_scores_zero() {
        let dir = TempDir::new().unwrap();
        assert_eq!(analyzer().analyze(&dir.path().join("nope.jpg")).await, 0.0);
    }
}
