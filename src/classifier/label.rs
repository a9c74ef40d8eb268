use serde::{Deserialize, Serialize};

/// The two gesture classes the system is trained on. Fixed; callers cannot
/// register additional labels.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum Label {
    NotTouched,
    Touched,
}

impl Label {
    pub const ALL: [Label; 2] = [Label::NotTouched, Label::Touched];

    pub fn as_str(&self) -> &'static str {
        match self {
            Label::NotTouched => "not_touched",
            Label::Touched => "touched",
        }
    }
}

/// Per-label probabilities for a single prediction. Sums to 1 across labels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Confidences {
    pub not_touched: f32,
    pub touched: f32,
}

impl Confidences {
    pub fn of(&self, label: Label) -> f32 {
        match label {
            Label::NotTouched => self.not_touched,
            Label::Touched => self.touched,
        }
    }
}

/// One prediction: the winning label plus the confidence mapping it won
/// under. Produced fresh each inference cycle and never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Classification {
    pub label: Label,
    pub confidences: Confidences,
}

/// How many examples the store holds per label.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelCounts {
    pub not_touched: usize,
    pub touched: usize,
}

impl LabelCounts {
    pub fn of(&self, label: Label) -> usize {
        match label {
            Label::NotTouched => self.not_touched,
            Label::Touched => self.touched,
        }
    }

    pub fn total(&self) -> usize {
        self.not_touched + self.touched
    }
}
