use crate::image_classifier::interface::{Classification, ImageClassifier};
use crate::image_classifier::tract::image::image_to_tensor;
use crate::library::logger::interface::Logger;
use image::DynamicImage;
use std::sync::Arc;
use tract_onnx::prelude::*;

use super::models::model_config::ModelConfig;

pub struct ImageClassifierTractOnnx {
    model: TypedRunnableModel<TypedModel>,
    config: ModelConfig,
    logger: Arc<dyn Logger + Send + Sync>,
}

impl ImageClassifierTractOnnx {
    pub fn new(
        config: ModelConfig,
        logger: Arc<dyn Logger + Send + Sync>,
    ) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let logger = logger
            .with_namespace("image_classifier")
            .with_namespace("tract");
        let (height, width) = config.input_shape;

        logger.info(&format!("Loading model {}", config.onnx_model_path))?;

        let model = tract_onnx::onnx()
            .model_for_path(&config.onnx_model_path)?
            .with_input_fact(0, f32::fact([1, 3, height as usize, width as usize]).into())?
            .into_optimized()?
            .into_runnable()?;

        logger.info("Model loaded")?;

        Ok(Self {
            model,
            config,
            logger,
        })
    }
}

impl ImageClassifier for ImageClassifierTractOnnx {
    fn classify(
        &self,
        image: &DynamicImage,
    ) -> Result<Vec<Classification>, Box<dyn std::error::Error + Send + Sync>> {
        let (height, width) = self.config.input_shape;
        let input = image_to_tensor(image, width, height);

        let outputs = self.model.run(tvec!(input.into_tvalue()))?;
        let output = outputs
            .first()
            .ok_or("model produced no outputs")?
            .to_array_view::<f32>()?;

        let scores: Vec<f32> = output.iter().copied().collect();

        self.logger
            .info(&format!("Raw scores: {:?}", scores))?;

        Ok(rank_scores(
            &scores,
            &self.config.labels,
            self.config.apply_softmax,
        ))
    }
}

fn softmax(scores: &[f32]) -> Vec<f32> {
    let max = scores.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = scores.iter().map(|s| (s - max).exp()).collect();
    let sum: f32 = exps.iter().sum();
    exps.iter().map(|e| e / sum).collect()
}

fn sigmoid(score: f32) -> f32 {
    1.0 / (1.0 + (-score).exp())
}

/// Pairs each score with its label and sorts best first. Indices past the label list get a
/// `class_<index>` name.
///
/// With `apply_softmax` the scores are logits. A single-output head is squashed with a
/// sigmoid instead, since a softmax over one value is always 1.
pub fn rank_scores(scores: &[f32], labels: &[String], apply_softmax: bool) -> Vec<Classification> {
    let scores = match scores {
        _ if !apply_softmax => scores.to_vec(),
        [] => vec![],
        [logit] => vec![sigmoid(*logit)],
        _ => softmax(scores),
    };

    let mut classifications: Vec<Classification> = scores
        .iter()
        .enumerate()
        .map(|(index, &confidence)| Classification {
            label: labels
                .get(index)
                .cloned()
                .unwrap_or_else(|| format!("class_{}", index)),
            confidence,
        })
        .collect();

    classifications.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));

    classifications
}
