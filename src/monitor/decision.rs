use crate::classifier::{Classification, Label};

/// Confidence the winning label must clear for a frame to count as a touch.
pub const TOUCHED_CONFIDENCE: f32 = 0.8;

/// The decision rule: a frame is a touch iff the classifier picked
/// `Touched` AND its confidence in that winning label strictly exceeds the
/// threshold. High confidence on the losing label never counts.
pub fn is_touched(result: &Classification, threshold: f32) -> bool {
    result.label == Label::Touched && result.confidences.of(Label::Touched) > threshold
}
