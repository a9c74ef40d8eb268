use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use log::info;

use handsoff::{
    CuePlayer, KnnStore, Label, LogNotifier, PixelEmbedder, Scene, SettingsStore, Supervisor,
    SyntheticCamera,
};

/// End-to-end demo against the built-in synthetic camera: train both
/// gestures, then monitor while the scripted scene toggles between them.
/// Real deployments swap the camera for a device-backed FrameSource and the
/// notifier for a desktop backend; the wiring stays the same.
#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let settings = SettingsStore::new(PathBuf::from("handsoff-settings.json"))?;
    let guard = settings.guard();

    let camera = Arc::new(SyntheticCamera::new(Scene::Clear));
    let scene = camera.scene_handle();

    let supervisor = Supervisor::new(
        camera,
        Arc::new(PixelEmbedder::new()),
        Arc::new(KnnStore::with_k(guard.knn_k)),
        Arc::new(CuePlayer::new()),
        Arc::new(LogNotifier),
        guard,
    );

    supervisor.init().await?;

    info!("training the clear gesture, keep hands away from your face");
    supervisor.request_training(Label::NotTouched).await?;

    info!("training the touch gesture");
    scene.set(Scene::Touching);
    supervisor.request_training(Label::Touched).await?;
    info!("label counts after training: {:?}", supervisor.label_counts().await);

    scene.set(Scene::Clear);
    supervisor.start_monitoring().await?;
    info!("monitoring started");

    // Scripted session: clear for 2s, touching for 2s, clear again.
    tokio::time::sleep(Duration::from_secs(2)).await;
    info!("touched flag: {}", supervisor.touched());

    scene.set(Scene::Touching);
    tokio::time::sleep(Duration::from_secs(2)).await;
    info!("touched flag: {}", supervisor.touched());

    scene.set(Scene::Clear);
    tokio::time::sleep(Duration::from_secs(2)).await;
    info!("touched flag: {}", supervisor.touched());

    supervisor.stop_monitoring().await?;

    let stats = supervisor.stats();
    info!(
        "session done: {} cycles ({} touched, {} skipped), {} alert episodes",
        stats.cycles_completed, stats.touched_cycles, stats.cycles_skipped, stats.alert_episodes
    );

    Ok(())
}
