//! Classifier input preparation: resize, center crop, rescale, normalize.
//!
//! Mirrors the image processor the leaf classifier was trained with:
//! shortest edge to `resize_shortest_edge`, center crop to `crop_size`,
//! pixel / 255, then `(x - mean) / std` per channel, CHW layout.

use image::imageops::FilterType;
use image::RgbImage;

/// What the classifier needs. Changes per model, not per request.
#[derive(Debug, Clone)]
pub struct ModelInputConfig {
    pub resize_shortest_edge: u32,
    pub crop_size: u32,
    pub mean: [f32; 3],
    pub std: [f32; 3],
}

impl ModelInputConfig {
    /// MobileNetV2 (1.0, 224) plant disease classifier.
    pub fn mobilenet_v2_224() -> Self {
        Self {
            resize_shortest_edge: 256,
            crop_size: 224,
            mean: [0.5, 0.5, 0.5],
            std: [0.5, 0.5, 0.5],
        }
    }

    /// Number of f32 values in one CHW input tensor.
    pub fn tensor_len(&self) -> usize {
        3 * (self.crop_size as usize) * (self.crop_size as usize)
    }
}

impl Default for ModelInputConfig {
    fn default() -> Self {
        Self::mobilenet_v2_224()
    }
}

/// Compute dimensions after scaling the shortest edge to `shortest`.
/// Always returns at least 1x1.
pub fn compute_resize_dimensions(width: u32, height: u32, shortest: u32) -> (u32, u32) {
    let w = width.max(1) as f64;
    let h = height.max(1) as f64;
    let scale = shortest as f64 / w.min(h);
    let new_w = ((w * scale).round() as u32).max(1);
    let new_h = ((h * scale).round() as u32).max(1);
    (new_w, new_h)
}

/// Resize + center crop to a `crop_size` square.
pub fn resize_and_crop(image: &RgbImage, config: &ModelInputConfig) -> RgbImage {
    let (w, h) = compute_resize_dimensions(
        image.width(),
        image.height(),
        config.resize_shortest_edge.max(config.crop_size),
    );
    let resized = image::imageops::resize(image, w, h, FilterType::Triangle);

    let crop = config.crop_size;
    let x = (w - crop) / 2;
    let y = (h - crop) / 2;
    image::imageops::crop_imm(&resized, x, y, crop, crop).to_image()
}

/// Build the normalized CHW tensor data for one image.
pub fn to_input_tensor(image: &RgbImage, config: &ModelInputConfig) -> Vec<f32> {
    let cropped = resize_and_crop(image, config);
    let plane = (config.crop_size as usize) * (config.crop_size as usize);
    let mut data = vec![0.0f32; 3 * plane];

    for (idx, pixel) in cropped.pixels().enumerate() {
        for c in 0..3 {
            let value = pixel.0[c] as f32 / 255.0;
            data[c * plane + idx] = (value - config.mean[c]) / config.std[c];
        }
    }

    data
}

/// Numerically stable softmax.
pub fn softmax(logits: &[f32]) -> Vec<f32> {
    if logits.is_empty() {
        return Vec::new();
    }
    let max = logits.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = logits.iter().map(|&l| (l - max).exp()).collect();
    let sum: f32 = exps.iter().sum();
    exps.into_iter().map(|e| e / sum).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn resize_landscape_scales_height_to_shortest() {
        assert_eq!(compute_resize_dimensions(800, 400, 256), (512, 256));
    }

    #[test]
    fn resize_portrait_scales_width_to_shortest() {
        assert_eq!(compute_resize_dimensions(300, 600, 256), (256, 512));
    }

    #[test]
    fn resize_small_image_upscales() {
        assert_eq!(compute_resize_dimensions(64, 64, 256), (256, 256));
    }

    #[test]
    fn resize_zero_dimensions_clamped() {
        let (w, h) = compute_resize_dimensions(0, 0, 256);
        assert!(w >= 1 && h >= 1);
    }

    #[test]
    fn crop_is_square_of_crop_size() {
        let config = ModelInputConfig::mobilenet_v2_224();
        let img = RgbImage::from_pixel(640, 480, Rgb([10, 200, 30]));
        let cropped = resize_and_crop(&img, &config);
        assert_eq!((cropped.width(), cropped.height()), (224, 224));
    }

    #[test]
    fn tensor_has_chw_length() {
        let config = ModelInputConfig::mobilenet_v2_224();
        let img = RgbImage::from_pixel(300, 500, Rgb([0, 0, 0]));
        assert_eq!(to_input_tensor(&img, &config).len(), config.tensor_len());
    }

    #[test]
    fn tensor_values_normalized_to_unit_range() {
        let config = ModelInputConfig::mobilenet_v2_224();
        let white = RgbImage::from_pixel(256, 256, Rgb([255, 255, 255]));
        let black = RgbImage::from_pixel(256, 256, Rgb([0, 0, 0]));
        assert!(to_input_tensor(&white, &config).iter().all(|v| (v - 1.0).abs() < 1e-5));
        assert!(to_input_tensor(&black, &config).iter().all(|v| (v + 1.0).abs() < 1e-5));
    }

    #[test]
    fn channels_are_planar() {
        let config = ModelInputConfig::mobilenet_v2_224();
        let red = RgbImage::from_pixel(224, 224, Rgb([255, 0, 0]));
        let data = to_input_tensor(&red, &config);
        let plane = 224 * 224;
        assert!((data[0] - 1.0).abs() < 1e-5);
        assert!((data[plane] + 1.0).abs() < 1e-5);
        assert!((data[2 * plane] + 1.0).abs() < 1e-5);
    }

    #[test]
    fn softmax_sums_to_one() {
        let probs = softmax(&[2.0, 1.0, 0.1]);
        let sum: f32 = probs.iter().sum();
        assert!((sum - 1.0).abs() < 1e-5);
        assert!(probs[0] > probs[1] && probs[1] > probs[2]);
    }

    #[test]
    fn softmax_handles_large_logits() {
        let probs = softmax(&[1000.0, 1000.0]);
        assert!((probs[0] - 0.5).abs() < 1e-5);
    }

    #[test]
    fn softmax_empty() {
        assert!(softmax(&[]).is_empty());
    }
}
