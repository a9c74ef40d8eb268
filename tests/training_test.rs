use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use handsoff::{
    CaptureError, Classification, Embedding, ExampleStore, ExtractionError, FeatureExtractor,
    Frame, FrameSource, KnnStore, Label, LabelCounts, StoreError, TrainError, TrainingController,
};
use handsoff::utils::pacing::Pacer;

struct StaticCamera;

#[async_trait]
impl FrameSource for StaticCamera {
    async fn ensure_ready(&self) -> Result<(), CaptureError> {
        Ok(())
    }

    async fn current_frame(&self) -> Result<Frame, CaptureError> {
        Ok(Frame::new(vec![0]))
    }
}

struct StaticExtractor;

#[async_trait]
impl FeatureExtractor for StaticExtractor {
    async fn embed(&self, _frame: &Frame) -> Result<Embedding, ExtractionError> {
        Ok(Embedding::new(vec![1.0, 0.0]))
    }
}

fn trainer(store: Arc<dyn ExampleStore>) -> TrainingController {
    TrainingController::new(
        Arc::new(StaticCamera),
        Arc::new(StaticExtractor),
        store,
        Pacer::from_millis(100),
    )
}

#[tokio::test(start_paused = true)]
async fn training_is_additive_across_labels_and_runs() {
    let store = Arc::new(KnnStore::new());
    let trainer = trainer(Arc::clone(&store) as Arc<dyn ExampleStore>);

    trainer.train(Label::NotTouched, 50).await.unwrap();
    trainer.train(Label::Touched, 50).await.unwrap();

    let counts = store.label_counts().await;
    assert_eq!(counts.not_touched, 50);
    assert_eq!(counts.touched, 50);
    assert_eq!(counts.total(), 100);

    // A second run for the same label only adds.
    trainer.train(Label::Touched, 10).await.unwrap();
    let counts = store.label_counts().await;
    assert_eq!(counts.touched, 60);
    assert_eq!(counts.total(), 110);
}

#[tokio::test(start_paused = true)]
async fn report_describes_the_completed_run() {
    let store = Arc::new(KnnStore::new());
    let trainer = trainer(Arc::clone(&store) as Arc<dyn ExampleStore>);

    let report = trainer.train(Label::NotTouched, 20).await.unwrap();

    assert_eq!(report.label, Label::NotTouched);
    assert_eq!(report.requested_passes, 20);
    assert_eq!(report.stored_passes, 20);
    assert!(report.finished_at >= report.started_at);
    assert_eq!(report.label_counts.not_touched, 20);
    assert!(!report.run_id.is_empty());
}

/// Store that starts failing at a configured add-example call.
struct FlakyStore {
    inner: KnnStore,
    adds: AtomicUsize,
    fail_from: usize,
}

#[async_trait]
impl ExampleStore for FlakyStore {
    async fn add_example(&self, embedding: Embedding, label: Label) -> Result<(), StoreError> {
        let call = self.adds.fetch_add(1, Ordering::SeqCst);
        if call >= self.fail_from {
            return Err(StoreError::Classification("backend went away".into()));
        }
        self.inner.add_example(embedding, label).await
    }

    async fn predict(&self, embedding: &Embedding) -> Result<Classification, StoreError> {
        self.inner.predict(embedding).await
    }

    async fn label_counts(&self) -> LabelCounts {
        self.inner.label_counts().await
    }
}

#[tokio::test(start_paused = true)]
async fn first_failure_aborts_the_run_and_keeps_prior_examples() {
    let store = Arc::new(FlakyStore {
        inner: KnnStore::new(),
        adds: AtomicUsize::new(0),
        fail_from: 7,
    });
    let trainer = trainer(Arc::clone(&store) as Arc<dyn ExampleStore>);

    let err = trainer.train(Label::Touched, 50).await.unwrap_err();
    assert!(matches!(err, TrainError::Store(StoreError::Classification(_))));

    // The seven successful steps stay stored; nothing was rolled back and
    // nothing beyond the failure was attempted.
    assert_eq!(store.label_counts().await.touched, 7);
    assert_eq!(store.adds.load(Ordering::SeqCst), 8);
}

#[tokio::test(start_paused = true)]
async fn capture_failure_propagates_as_a_train_error() {
    struct DeadCamera;

    #[async_trait]
    impl FrameSource for DeadCamera {
        async fn ensure_ready(&self) -> Result<(), CaptureError> {
            Err(CaptureError::DeviceUnavailable("unplugged".into()))
        }

        async fn current_frame(&self) -> Result<Frame, CaptureError> {
            Err(CaptureError::Failed("no frame".into()))
        }
    }

    let trainer = TrainingController::new(
        Arc::new(DeadCamera),
        Arc::new(StaticExtractor),
        Arc::new(KnnStore::new()),
        Pacer::from_millis(100),
    );

    let err = trainer.train(Label::NotTouched, 5).await.unwrap_err();
    assert!(matches!(err, TrainError::Capture(CaptureError::Failed(_))));
}
