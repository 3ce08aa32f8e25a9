//! Colours for bars, heatmap cells and annotations

use plotters::style::RGBColor;

/// Hue colours for value 0 and value 1 (blue, orange)
pub const CATEGORY_COLORS: [RGBColor; 2] = [RGBColor(31, 119, 180), RGBColor(255, 127, 14)];

const NEGATIVE: (f64, f64, f64) = (59.0, 76.0, 192.0);
const NEUTRAL: (f64, f64, f64) = (221.0, 221.0, 221.0);
const POSITIVE: (f64, f64, f64) = (180.0, 4.0, 38.0);

/// Bar colour for a categorical value
pub fn category_color(value: i32) -> RGBColor {
    CATEGORY_COLORS[value.rem_euclid(CATEGORY_COLORS.len() as i32) as usize]
}

fn lerp(a: (f64, f64, f64), b: (f64, f64, f64), t: f64) -> RGBColor {
    let mix = |x: f64, y: f64| (x + (y - x) * t).round().clamp(0.0, 255.0) as u8;
    RGBColor(mix(a.0, b.0), mix(a.1, b.1), mix(a.2, b.2))
}

/// Diverging scale centred at 0. `t` is clamped to [-1, 1].
pub fn diverging(t: f64) -> RGBColor {
    let t = if t.is_nan() { 0.0 } else { t.clamp(-1.0, 1.0) };
    if t < 0.0 {
        lerp(NEUTRAL, NEGATIVE, -t)
    } else {
        lerp(NEUTRAL, POSITIVE, t)
    }
}

/// Relative luminance (sRGB, linearised)
pub fn luminance(color: RGBColor) -> f64 {
    let channel = |c: u8| {
        let c = c as f64 / 255.0;
        if c <= 0.03928 {
            c / 12.92
        } else {
            ((c + 0.055) / 1.055).powf(2.4)
        }
    };
    0.2126 * channel(color.0) + 0.7152 * channel(color.1) + 0.0722 * channel(color.2)
}

/// Annotation colour readable on the given background
pub fn text_color(background: RGBColor) -> RGBColor {
    if luminance(background) > 0.408 {
        RGBColor(38, 38, 38)
    } else {
        RGBColor(255, 255, 255)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diverging_endpoints_and_centre() {
        assert_eq!(diverging(0.0), RGBColor(221, 221, 221));
        assert_eq!(diverging(-1.0), RGBColor(59, 76, 192));
        assert_eq!(diverging(1.0), RGBColor(180, 4, 38));
        assert_eq!(diverging(5.0), diverging(1.0));
    }

    #[test]
    fn text_contrasts_with_background() {
        assert_eq!(text_color(RGBColor(255, 255, 255)), RGBColor(38, 38, 38));
        assert_eq!(text_color(RGBColor(0, 0, 0)), RGBColor(255, 255, 255));
    }

    #[test]
    fn category_colors_alternate() {
        assert_eq!(category_color(0), CATEGORY_COLORS[0]);
        assert_eq!(category_color(1), CATEGORY_COLORS[1]);
    }
}
