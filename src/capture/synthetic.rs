use std::io::Cursor;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use image::{ImageFormat, Rgb, RgbImage};
use rand::Rng;

use crate::error::CaptureError;

use super::{Frame, FrameSource};

const WIDTH: u32 = 64;
const HEIGHT: u32 = 64;
const NOISE_AMPLITUDE: i16 = 10;

/// What the synthetic camera is currently "seeing".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scene {
    Clear,
    Touching,
}

/// Deterministic-plus-noise frame generator for the demo binary and the
/// integration tests. The two scenes render visually distinct patterns so
/// the pixel embedder lands them in separable clusters; per-pixel noise
/// keeps consecutive frames from being byte-identical, like a real sensor.
pub struct SyntheticCamera {
    scene: Arc<RwLock<Scene>>,
}

impl SyntheticCamera {
    pub fn new(scene: Scene) -> Self {
        Self {
            scene: Arc::new(RwLock::new(scene)),
        }
    }

    pub fn set_scene(&self, scene: Scene) {
        *self.scene.write().unwrap() = scene;
    }

    /// Handle for flipping the scene while the camera is owned elsewhere.
    pub fn scene_handle(&self) -> SceneHandle {
        SceneHandle {
            scene: Arc::clone(&self.scene),
        }
    }

    fn render(&self) -> Result<Vec<u8>, CaptureError> {
        let scene = *self.scene.read().unwrap();
        let mut rng = rand::thread_rng();

        let img = RgbImage::from_fn(WIDTH, HEIGHT, |x, y| {
            let base = match scene {
                // Horizontal gradient, bright.
                Scene::Clear => ((x * 255) / WIDTH) as i16,
                // Dark diagonal blob in the lower half, as if a hand crossed
                // the face region.
                Scene::Touching => {
                    if y > HEIGHT / 2 && x.abs_diff(y) < 12 {
                        20
                    } else {
                        180
                    }
                }
            };
            let noise = rng.gen_range(-NOISE_AMPLITUDE..=NOISE_AMPLITUDE);
            let value = (base + noise).clamp(0, 255) as u8;
            Rgb([value, value, value])
        });

        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .map_err(|err| CaptureError::Failed(format!("frame encode failed: {err}")))?;
        Ok(bytes)
    }
}

#[derive(Clone)]
pub struct SceneHandle {
    scene: Arc<RwLock<Scene>>,
}

impl SceneHandle {
    pub fn set(&self, scene: Scene) {
        *self.scene.write().unwrap() = scene;
    }
}

#[async_trait]
impl FrameSource for SyntheticCamera {
    async fn ensure_ready(&self) -> Result<(), CaptureError> {
        Ok(())
    }

    async fn current_frame(&self) -> Result<Frame, CaptureError> {
        Ok(Frame::new(self.render()?))
    }
}
