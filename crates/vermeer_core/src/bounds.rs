//! Documented bounds for numeric generation parameters.
//!
//! Values are clamped, never rejected: a width of 3000 becomes 2048 and a
//! width of 10 becomes 64. The same functions are applied when settings are
//! written and when a request is constructed.

/// Smallest accepted width or height in pixels.
pub const MIN_DIMENSION: u32 = 64;
/// Largest accepted width or height in pixels.
pub const MAX_DIMENSION: u32 = 2048;
/// Fewest sampling steps.
pub const MIN_STEPS: u32 = 1;
/// Most sampling steps.
pub const MAX_STEPS: u32 = 150;
/// Lowest classifier-free guidance scale.
pub const MIN_CFG_SCALE: f32 = 1.0;
/// Highest classifier-free guidance scale.
pub const MAX_CFG_SCALE: f32 = 20.0;
/// Fewest images per task.
pub const MIN_IMAGE_COUNT: u32 = 1;
/// Most images per task.
pub const MAX_IMAGE_COUNT: u32 = 4;

/// Clamp a width or height to `[64, 2048]`.
pub fn clamp_dimension(value: u32) -> u32 {
    value.clamp(MIN_DIMENSION, MAX_DIMENSION)
}

/// Clamp a step count to `[1, 150]`.
pub fn clamp_steps(value: u32) -> u32 {
    value.clamp(MIN_STEPS, MAX_STEPS)
}

/// Clamp a guidance scale to `[1.0, 20.0]`.
///
/// NaN is not orderable and collapses to the lower bound.
pub fn clamp_cfg_scale(value: f32) -> f32 {
    if value.is_nan() {
        return MIN_CFG_SCALE;
    }
    value.clamp(MIN_CFG_SCALE, MAX_CFG_SCALE)
}

/// Clamp an image count to `[1, 4]`.
pub fn clamp_image_count(value: u32) -> u32 {
    value.clamp(MIN_IMAGE_COUNT, MAX_IMAGE_COUNT)
}

/// Clamp a modifier weight to `[0.0, 1.0]`.
pub fn clamp_weight(value: f32) -> f32 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimension_clamps_both_ends() {
        assert_eq!(clamp_dimension(3000), 2048);
        assert_eq!(clamp_dimension(10), 64);
        assert_eq!(clamp_dimension(0), 64);
        assert_eq!(clamp_dimension(512), 512);
    }

    #[test]
    fn test_steps_clamp() {
        assert_eq!(clamp_steps(0), 1);
        assert_eq!(clamp_steps(151), 150);
        assert_eq!(clamp_steps(30), 30);
    }

    #[test]
    fn test_cfg_scale_clamp() {
        assert_eq!(clamp_cfg_scale(0.5), 1.0);
        assert_eq!(clamp_cfg_scale(25.0), 20.0);
        assert_eq!(clamp_cfg_scale(7.5), 7.5);
        assert_eq!(clamp_cfg_scale(f32::NAN), 1.0);
    }

    #[test]
    fn test_weight_and_count_clamp() {
        assert_eq!(clamp_weight(1.5), 1.0);
        assert_eq!(clamp_weight(-0.2), 0.0);
        assert_eq!(clamp_image_count(0), 1);
        assert_eq!(clamp_image_count(9), 4);
    }
}
