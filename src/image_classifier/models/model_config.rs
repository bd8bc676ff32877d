#[derive(Debug, Clone, PartialEq)]
pub struct ModelConfig {
    pub onnx_model_path: String,
    /// (height, width) of the tensor the model expects.
    pub input_shape: (u32, u32),
    /// Class names in the order of the model's output scores.
    pub labels: Vec<String>,
    /// Set when the model emits logits rather than probabilities. A single logit goes
    /// through a sigmoid, several through a softmax.
    pub apply_softmax: bool,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            onnx_model_path: "./models/chest_xray_classifier.onnx".to_string(),
            input_shape: (224, 224),
            labels: vec!["Abnormal".to_string(), "Normal".to_string()],
            apply_softmax: true,
        }
    }
}
