//! Document-unit to device-pixel conversion.

/// Document-unit-to-pixel ratio at 100% zoom. A system constant, not
/// configurable per document.
pub const BASE_SCALE: f32 = 1.5;

/// The combined device-pixel scale for a zoom factor.
pub fn device_scale(zoom: f32) -> f32 {
    BASE_SCALE * zoom
}

/// Convert a document-unit value into device pixels. Pure; any finite
/// input is valid.
pub fn to_device_pixels(value: f32, zoom: f32) -> f32 {
    value * BASE_SCALE * zoom
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scaling_is_linear() {
        assert_eq!(to_device_pixels(100.0, 1.0), 150.0);
        assert_eq!(to_device_pixels(100.0, 2.0), 300.0);
        assert_eq!(to_device_pixels(0.0, 0.5), 0.0);
        assert_eq!(to_device_pixels(-10.0, 1.0), -15.0);
    }

    #[test]
    fn test_device_scale_matches_pointwise_conversion() {
        let zoom = 1.3;
        assert_eq!(device_scale(zoom) * 7.0, to_device_pixels(7.0, zoom));
    }
}
