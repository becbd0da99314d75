use crate::{Color, Float};

/// Guess of average display maximum luminance, cd/m^2.
const DISPLAY_LUMINANCE_MAX: Float = 200.0;

/// ITU-R BT.709 RGB luminance weights.
const RGB_LUMINANCE: (Float, Float, Float) = (0.2126, 0.7152, 0.0722);

/// ITU-R BT.709 gamma.
const GAMMA_ENCODE: Float = 0.45;

/// Row-major buffer of raw high-dynamic-range radiance, one [`Color`] per
/// pixel, plus the conversion to displayable RGBA bytes.
pub struct Film {
    width: usize,
    height: usize,
    pixels: Vec<Color>,
}

impl Film {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height, pixels: vec![Color::BLACK; width * height] }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pixel(&self, x: usize, y: usize) -> Color {
        self.pixels[y * self.width + x]
    }

    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    pub fn pixels_mut(&mut self) -> &mut [Color] {
        &mut self.pixels
    }

    fn luminance(c: &Color) -> Float {
        c.r * RGB_LUMINANCE.0 + c.g * RGB_LUMINANCE.1 + c.b * RGB_LUMINANCE.2
    }

    /// Display scale factor from the log-average scene luminance, after
    /// Ward's contrast-based scale factor. Ratio of minimum visible
    /// luminance differences under display and world adaptation, divided by
    /// the display maximum to land in [0, 1].
    pub fn tone_scale(&self) -> Float {
        if self.pixels.is_empty() {
            return 1.0;
        }

        let sum_of_logs: Float = self
            .pixels
            .iter()
            .map(|p| {
                // clamp luminance to a perceptual minimum
                Self::luminance(p).max(1e-4).log10()
            })
            .sum();
        let adapt_luminance = (10.0 as Float).powf(sum_of_logs / self.pixels.len() as Float);

        let a = 1.219 + (DISPLAY_LUMINANCE_MAX * 0.25).powf(0.4);
        let b = 1.219 + adapt_luminance.powf(0.4);
        (a / b).powf(2.5) / DISPLAY_LUMINANCE_MAX
    }

    /// Converts the whole buffer to row-major RGBA8 display bytes. With tone
    /// mapping disabled only the clamp and gamma encode are applied.
    pub fn to_rgba8(&self, tone_mapping: bool) -> Vec<u8> {
        let scale = if tone_mapping { self.tone_scale() } else { 1.0 };

        let mut out = Vec::with_capacity(self.pixels.len() * 4);
        for px in &self.pixels {
            out.push(Self::encode(px.r, scale));
            out.push(Self::encode(px.g, scale));
            out.push(Self::encode(px.b, scale));
            out.push(255);
        }
        out
    }

    fn encode(channel: Float, scale: Float) -> u8 {
        let c = (channel * scale).powf(GAMMA_ENCODE);
        // NaN (from a negative channel) clamps to 0 here
        (c.max(0.0).min(1.0) * 255.0) as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn unit_white_gamma_encodes_to_255_without_tone_mapping() {
        let mut film = Film::new(2, 1);
        film.pixels_mut()[0] = Color::WHITE;
        let bytes = film.to_rgba8(false);
        assert_eq!(&bytes[0..4], &[255, 255, 255, 255]);
        // the untouched pixel stays black with opaque alpha
        assert_eq!(&bytes[4..8], &[0, 0, 0, 255]);
    }

    #[test]
    fn tone_scale_is_inverse_display_max_at_quarter_adaptation() {
        // uniform luminance Lmax/4 makes the contrast ratio cancel, leaving
        // exactly the 1/Lmax display normalization
        // the BT.709 weights sum to 1, so uniform (50, 50, 50) has Y = 50
        let mut film = Film::new(4, 4);
        for px in film.pixels_mut() {
            *px = Color::uniform(50.0);
        }
        assert_abs_diff_eq!(
            film.tone_scale() * DISPLAY_LUMINANCE_MAX,
            1.0,
            epsilon = 1e-4
        );
    }

    #[test]
    fn dim_scene_gets_boosted() {
        let mut film = Film::new(2, 2);
        for px in film.pixels_mut() {
            *px = Color::uniform(0.01);
        }
        // adaptation below Lmax/4 must raise the scale above 1/Lmax
        assert!(film.tone_scale() > 1.0 / DISPLAY_LUMINANCE_MAX);
    }

    #[test]
    fn black_buffer_encodes_to_black() {
        let film = Film::new(3, 2);
        for chunk in film.to_rgba8(true).chunks(4) {
            assert_eq!(chunk, &[0, 0, 0, 255]);
        }
    }

    #[test]
    fn buffer_is_row_major_rgba() {
        let mut film = Film::new(2, 2);
        let w = film.width();
        film.pixels_mut()[1 * w + 0] = Color::WHITE; // x = 0, y = 1
        let bytes = film.to_rgba8(false);
        assert_eq!(bytes.len(), 2 * 2 * 4);
        assert_eq!(&bytes[8..12], &[255, 255, 255, 255]);
    }
}
