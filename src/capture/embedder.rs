use std::sync::Arc;

use async_trait::async_trait;
use image::imageops::FilterType;

use crate::classifier::Embedding;
use crate::error::ExtractionError;

use super::Frame;

const GRID: u32 = 16;

/// Frame-to-embedding seam. Stateless from the loops' perspective; real
/// deployments back this with a pretrained vision model.
#[async_trait]
pub trait FeatureExtractor: Send + Sync {
    async fn embed(&self, frame: &Frame) -> Result<Embedding, ExtractionError>;
}

/// Built-in extractor: decode the frame, downscale to a GRID x GRID
/// luminance patch, L2-normalize. Coarse but stable, and enough for the
/// nearest-neighbor store to separate two visually distinct gestures.
pub struct PixelEmbedder;

impl PixelEmbedder {
    pub fn new() -> Self {
        Self
    }

    pub const fn dim() -> usize {
        (GRID * GRID) as usize
    }
}

impl Default for PixelEmbedder {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FeatureExtractor for PixelEmbedder {
    async fn embed(&self, frame: &Frame) -> Result<Embedding, ExtractionError> {
        let bytes = Arc::clone(&frame.png_bytes);
        // Decode and pixel math off the async threads.
        tokio::task::spawn_blocking(move || embed_bytes(&bytes))
            .await
            .map_err(|err| ExtractionError::Failed(format!("embed worker join failed: {err}")))?
    }
}

fn embed_bytes(png_bytes: &[u8]) -> Result<Embedding, ExtractionError> {
    let img = image::load_from_memory(png_bytes)
        .map_err(|err| ExtractionError::Decode(err.to_string()))?;

    let luma = img
        .resize_exact(GRID, GRID, FilterType::Triangle)
        .to_luma8();

    let mut values: Vec<f32> = luma.pixels().map(|p| p.0[0] as f32 / 255.0).collect();

    let norm = values.iter().map(|v| v * v).sum::<f32>().sqrt();
    if norm > 0.0 {
        for v in &mut values {
            *v /= norm;
        }
    }

    Ok(Embedding::new(values))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, RgbImage};
    use std::io::Cursor;

    fn solid_frame(r: u8, g: u8, b: u8) -> Frame {
        let img = RgbImage::from_pixel(64, 64, image::Rgb([r, g, b]));
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        Frame::new(bytes)
    }

    #[tokio::test]
    async fn embedding_has_fixed_dimension_and_unit_norm() {
        let frame = solid_frame(200, 200, 200);
        let embedding = PixelEmbedder::new().embed(&frame).await.unwrap();

        assert_eq!(embedding.dim(), PixelEmbedder::dim());
        let norm: f32 = embedding.as_slice().iter().map(|v| v * v).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-4);
    }

    #[tokio::test]
    async fn garbage_bytes_fail_with_decode_error() {
        let frame = Frame::new(vec![0xde, 0xad, 0xbe, 0xef]);
        let err = PixelEmbedder::new().embed(&frame).await.unwrap_err();
        assert!(matches!(err, ExtractionError::Decode(_)));
    }
}
