use crate::Color;

/// Two fixed reflection lobes plus emission. The diffuse and specular weights
/// are independent; they are not required to sum to one.
#[derive(Clone, Copy, Debug)]
pub struct Material {
    pub diffuse: Color,
    pub specular: Color,
    pub emissive: Color,
}

impl Material {
    pub fn new(diffuse: Color, specular: Color, emissive: Color) -> Self {
        Self { diffuse, specular, emissive }
    }

    pub fn matte(diffuse: Color) -> Self {
        Self::new(diffuse, Color::BLACK, Color::BLACK)
    }

    pub fn emitter(emissive: Color) -> Self {
        Self::new(Color::BLACK, Color::BLACK, emissive)
    }

    pub fn is_emissive(&self) -> bool {
        self.emissive.max3() > 0.0
    }
}
