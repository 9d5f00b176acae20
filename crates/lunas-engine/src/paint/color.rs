/// Linear premultiplied RGBA color.
///
/// Invariant:
/// - `rgb` components are expected to be multiplied by `a` (premultiplied alpha).
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Color {
    pub r: f32, // premultiplied
    pub g: f32, // premultiplied
    pub b: f32, // premultiplied
    pub a: f32,
}

impl Color {
    /// Fully opaque black, the default clear color of the loop driver.
    pub const BLACK: Color = Color::from_premul(0.0, 0.0, 0.0, 1.0);

    /// Creates a premultiplied color from premultiplied components.
    #[inline]
    pub const fn from_premul(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }
}

impl From<Color> for wgpu::Color {
    fn from(c: Color) -> Self {
        wgpu::Color {
            r: c.r as f64,
            g: c.g as f64,
            b: c.b as f64,
            a: c.a as f64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn black_is_opaque_black_on_the_gpu() {
        let c: wgpu::Color = Color::BLACK.into();
        assert_eq!(c, wgpu::Color::BLACK);
    }

    #[test]
    fn components_pass_through_unchanged() {
        let c: wgpu::Color = Color::from_premul(0.25, 0.5, 0.0, 0.5).into();
        assert_eq!((c.r, c.g, c.b, c.a), (0.25, 0.5, 0.0, 0.5));
    }
}
