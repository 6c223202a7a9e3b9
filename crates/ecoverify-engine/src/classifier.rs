//! Image classifier wrapper: preprocessing, inference, argmax mapping
use crate::model::{LabelMap, ModelRuntime, TensorShape, CLASS_COUNT};
use ecoverify_core::{ClassificationResult, VerifyError};
use ecoverify_image::Photo;
use std::collections::BTreeMap;
use std::sync::Mutex;
use tracing::{debug, info};

/// Wraps the frozen model behind a lock so one classifier can serve
/// concurrent verification calls
pub struct ImageClassifier {
    runtime: Mutex<Box<dyn ModelRuntime>>,
    labels: LabelMap,
    shape: TensorShape,
}

impl ImageClassifier {
    pub fn new(runtime: Box<dyn ModelRuntime>, labels: LabelMap) -> Result<Self, VerifyError> {
        let shape = runtime.input_shape();
        if shape.height == 0 || shape.width == 0 {
            return Err(VerifyError::ModelInput(
                "model input shape must be non-zero".to_string(),
            ));
        }
        info!(
            height = shape.height,
            width = shape.width,
            classes = CLASS_COUNT,
            "image classifier initialized"
        );
        Ok(Self {
            runtime: Mutex::new(runtime),
            labels,
            shape,
        })
    }

    pub fn labels(&self) -> &LabelMap {
        &self.labels
    }

    /// One forward pass over the photo. `is_valid` stays false until the
    /// challenge rules run.
    pub fn classify(&self, photo: &Photo) -> Result<ClassificationResult, VerifyError> {
        if !photo.format.is_allowed() {
            return Err(VerifyError::ImageFormat(format!(
                "unsupported encoding: {:?}",
                photo.format
            )));
        }
        let tensor = self.preprocess(photo)?;
        let output = self.infer(&tensor)?;
        Ok(self.map_predictions(&output))
    }

    fn preprocess(&self, photo: &Photo) -> Result<Vec<f32>, VerifyError> {
        if photo.pixels.is_empty() {
            return Err(VerifyError::ModelInput("photo has no pixel data".to_string()));
        }
        let resized = photo
            .pixels
            .resize_fit(self.shape.width, self.shape.height)
            .map_err(|e| VerifyError::ModelInput(e.to_string()))?;

        // scale to [0,1]; the leading batch axis of one is implicit in the
        // flat tensor length
        let mut tensor = Vec::with_capacity(self.shape.element_count());
        for [r, g, b] in resized.pixels() {
            tensor.push(f32::from(r) / 255.0);
            tensor.push(f32::from(g) / 255.0);
            tensor.push(f32::from(b) / 255.0);
        }
        debug!(
            source_w = photo.pixels.width(),
            source_h = photo.pixels.height(),
            tensor_len = tensor.len(),
            "photo preprocessed for inference"
        );
        Ok(tensor)
    }

    fn infer(&self, tensor: &[f32]) -> Result<Vec<f32>, VerifyError> {
        let mut runtime = self
            .runtime
            .lock()
            .map_err(|_| VerifyError::ModelInput("model runtime lock poisoned".to_string()))?;
        runtime.set_input(tensor)?;
        runtime.invoke()?;
        let output = runtime.get_output()?;

        if output.len() != CLASS_COUNT {
            return Err(VerifyError::ModelInput(format!(
                "expected {} output probabilities, got {}",
                CLASS_COUNT,
                output.len()
            )));
        }
        if output.iter().all(|p| *p == 0.0) {
            return Err(VerifyError::ModelInput(
                "model returned all zeros, tensor likely uninitialized".to_string(),
            ));
        }
        Ok(output)
    }

    fn map_predictions(&self, output: &[f32]) -> ClassificationResult {
        let mut best = 0usize;
        for (i, p) in output.iter().enumerate() {
            if *p > output[best] {
                best = i;
            }
        }
        let per_class_scores: BTreeMap<String, f64> = self
            .labels
            .labels()
            .iter()
            .zip(output)
            .map(|(label, p)| (label.clone(), f64::from(*p)))
            .collect();

        ClassificationResult {
            predicted_class: self.labels.labels()[best].clone(),
            confidence: f64::from(output[best]),
            per_class_scores,
            is_valid: false,
        }
    }
}
