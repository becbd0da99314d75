use crate::Float;

/// RGBA radiance value.
///
/// The color channels carry linear high-dynamic-range radiance. Alpha only
/// exists so the display hand-off is RGBA shaped; the integrator keeps it
/// pinned at 1 and all arithmetic leaves it untouched.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    pub r: Float,
    pub g: Float,
    pub b: Float,
    pub a: Float,
}

impl Color {
    pub const BLACK: Color = Color { r: 0.0, g: 0.0, b: 0.0, a: 1.0 };
    pub const WHITE: Color = Color { r: 1.0, g: 1.0, b: 1.0, a: 1.0 };

    pub fn new(r: Float, g: Float, b: Float) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub fn uniform(val: Float) -> Self {
        Self::new(val, val, val)
    }

    /// Maximum of the three color channels, used as a lobe selection weight.
    pub fn max3(&self) -> Float {
        self.r.max(self.g).max(self.b)
    }

    pub fn is_black(&self) -> bool {
        self.r == 0.0 && self.g == 0.0 && self.b == 0.0
    }

    pub fn has_nans(&self) -> bool {
        self.r.is_nan() || self.g.is_nan() || self.b.is_nan() || self.a.is_nan()
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::BLACK
    }
}

impl std::ops::Add for Color {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self { r: self.r + rhs.r, g: self.g + rhs.g, b: self.b + rhs.b, a: self.a }
    }
}

impl std::ops::AddAssign for Color {
    fn add_assign(&mut self, rhs: Self) {
        self.r += rhs.r;
        self.g += rhs.g;
        self.b += rhs.b;
    }
}

impl std::ops::Mul for Color {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        Self { r: self.r * rhs.r, g: self.g * rhs.g, b: self.b * rhs.b, a: self.a }
    }
}

impl std::ops::Mul<Float> for Color {
    type Output = Self;

    fn mul(self, rhs: Float) -> Self {
        Self { r: self.r * rhs, g: self.g * rhs, b: self.b * rhs, a: self.a }
    }
}

impl std::ops::Mul<Color> for Float {
    type Output = Color;

    fn mul(self, rhs: Color) -> Color {
        rhs * self
    }
}

impl std::ops::Div<Float> for Color {
    type Output = Self;

    fn div(self, rhs: Float) -> Self {
        Self { r: self.r / rhs, g: self.g / rhs, b: self.b / rhs, a: self.a }
    }
}

impl std::iter::Sum for Color {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Color::BLACK, std::ops::Add::add)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn max3_ignores_alpha() {
        let c = Color::new(0.1, 0.7, 0.3);
        assert_eq!(c.max3(), 0.7);
        assert_eq!(Color::BLACK.max3(), 0.0);
    }

    #[test]
    fn arithmetic_keeps_alpha_at_one() {
        let c = Color::new(1.0, 2.0, 3.0) + Color::new(0.5, 0.5, 0.5);
        assert_eq!(c.a, 1.0);
        let c = c * Color::uniform(2.0) * 0.5 / 2.0;
        assert_eq!(c.a, 1.0);
        assert_eq!(c.r, 0.75);
    }

    #[test]
    fn iter_sum() {
        let sum: Color = vec![Color::uniform(1.0), Color::new(0.0, 1.0, 0.5)]
            .into_iter()
            .sum();
        assert_eq!(sum, Color::new(1.0, 2.0, 1.5));
    }
}
