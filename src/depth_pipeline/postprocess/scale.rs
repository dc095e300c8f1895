//! Median scale alignment against ground truth

use crate::depth_pipeline::common::error::{PipelineError, Result};

/// Ratio `median(gt) / median(pred)` over pixels where `min_depth < gt < max_depth`.
///
/// Multiplying the prediction by the result puts it in the ground truth's units.
pub fn estimate_scale(prediction: &[f32], ground_truth: &[f32], min_depth: f32, max_depth: f32) -> Result<f32> {
    if prediction.len() != ground_truth.len() {
        return Err(PipelineError::ShapeMismatch {
            expected: vec![ground_truth.len()],
            actual: vec![prediction.len()],
        });
    }

    let (mut gt_valid, mut pred_valid): (Vec<f32>, Vec<f32>) = ground_truth
        .iter()
        .zip(prediction.iter())
        .filter(|&(&gt, _)| gt > min_depth && gt < max_depth)
        .map(|(&gt, &pred)| (gt, pred))
        .unzip();

    let (Some(gt_median), Some(pred_median)) = (median(&mut gt_valid), median(&mut pred_valid)) else {
        return Err(PipelineError::EmptyValidMask { min_depth, max_depth });
    };

    if pred_median == 0.0 || !pred_median.is_finite() {
        return Err(PipelineError::DegenerateScale);
    }
    Ok(gt_median / pred_median)
}

/// Clamps a prediction into `[min_depth, max_depth]` in place; `+inf` becomes `max_depth` and
/// NaN becomes `min_depth`.
pub fn sanitize_prediction(prediction: &mut [f32], min_depth: f32, max_depth: f32) {
    for value in prediction.iter_mut() {
        *value = if value.is_nan() {
            min_depth
        } else {
            value.clamp(min_depth, max_depth)
        };
    }
}

/// Median with the two middle values averaged for even counts. Reorders `values`.
fn median(values: &mut [f32]) -> Option<f32> {
    let n = values.len();
    if n == 0 {
        return None;
    }
    let mid = n / 2;
    let (lower, upper, _) = values.select_nth_unstable_by(mid, f32::total_cmp);
    let upper = *upper;
    if n % 2 == 1 {
        return Some(upper);
    }
    let lower_max = lower.iter().copied().max_by(f32::total_cmp)?;
    Some((lower_max + upper) / 2.0)
}
