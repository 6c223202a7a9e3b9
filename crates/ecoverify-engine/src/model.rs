//! Model runtime seam and label map
//!
//! The inference handle and its label list are obtained once at startup;
//! a missing or mismatched artifact is a fatal construction error, never a
//! per-request one.

use ecoverify_core::VerifyError;
use serde::{Deserialize, Serialize};

/// Number of classes the frozen model was trained on
pub const CLASS_COUNT: usize = 5;

/// Fixed input geometry of the loaded model: `(1, height, width, 3)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TensorShape {
    pub height: u32,
    pub width: u32,
}

impl TensorShape {
    /// Elements in one batched input tensor
    pub fn element_count(&self) -> usize {
        self.height as usize * self.width as usize * 3
    }
}

/// Loaded inference handle. One forward pass per verification call:
/// `set_input`, `invoke`, `get_output`.
pub trait ModelRuntime: Send {
    fn input_shape(&self) -> TensorShape;
    fn set_input(&mut self, tensor: &[f32]) -> Result<(), VerifyError>;
    fn invoke(&mut self) -> Result<(), VerifyError>;
    fn get_output(&self) -> Result<Vec<f32>, VerifyError>;
}

/// Exactly five class labels, positionally aligned with the model output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelMap {
    labels: Vec<String>,
}

impl LabelMap {
    pub fn new(labels: Vec<String>) -> Result<Self, VerifyError> {
        if labels.len() != CLASS_COUNT {
            return Err(VerifyError::LabelMap(format!(
                "expected {} labels, got {}",
                CLASS_COUNT,
                labels.len()
            )));
        }
        Ok(Self { labels })
    }

    /// Parse `index: label` lines, the label_map.txt layout
    pub fn parse(text: &str) -> Result<Self, VerifyError> {
        let labels = text
            .lines()
            .filter_map(|line| line.split_once(": ").map(|(_, label)| label.trim().to_string()))
            .collect();
        Self::new(labels)
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }
}

/// Deterministic runtime replaying a fixed output vector. Stands in for the
/// on-device model in tests and demos.
#[derive(Debug, Clone)]
pub struct ScriptedModelRuntime {
    shape: TensorShape,
    output: Vec<f32>,
    input_loaded: bool,
}

impl ScriptedModelRuntime {
    pub fn new(shape: TensorShape, output: Vec<f32>) -> Self {
        Self {
            shape,
            output,
            input_loaded: false,
        }
    }
}

impl ModelRuntime for ScriptedModelRuntime {
    fn input_shape(&self) -> TensorShape {
        self.shape
    }

    fn set_input(&mut self, tensor: &[f32]) -> Result<(), VerifyError> {
        if tensor.len() != self.shape.element_count() {
            return Err(VerifyError::ModelInput(format!(
                "tensor length {} does not match input shape (1, {}, {}, 3)",
                tensor.len(),
                self.shape.height,
                self.shape.width
            )));
        }
        self.input_loaded = true;
        Ok(())
    }

    fn invoke(&mut self) -> Result<(), VerifyError> {
        if !self.input_loaded {
            return Err(VerifyError::ModelInput("invoke called before set_input".to_string()));
        }
        Ok(())
    }

    fn get_output(&self) -> Result<Vec<f32>, VerifyError> {
        Ok(self.output.clone())
    }
}
