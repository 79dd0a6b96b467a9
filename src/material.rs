use crate::color::Color;

/// Surface appearance under the Phong model, plus a mirror term.
///
/// The ambient and diffuse colours respond to ambient and direct light
/// respectively; the specular colour and exponent shape highlights (higher
/// exponents give smaller, sharper ones); a non-black mirror colour tints
/// and weights recursively traced reflections.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Material {
    pub ambient: Color,
    pub diffuse: Color,
    pub specular: Color,
    pub specular_exponent: f64,
    pub mirror: Color,
}

impl Default for Material {
    /// A deliberately garish magenta, so an object that never got a
    /// material assigned is obvious in the render.
    fn default() -> Material {
        Material {
            ambient: Color::rgb(1.0, 0.0, 1.0),
            diffuse: Color::rgb(1.0, 0.0, 1.0),
            specular: Color::black(),
            specular_exponent: 1.0,
            mirror: Color::black(),
        }
    }
}

#[test]
fn default_is_magenta_matte() {
    let m: Material = Default::default();

    assert_eq!(m.ambient, Color::rgb(1.0, 0.0, 1.0));
    assert_eq!(m.diffuse, Color::rgb(1.0, 0.0, 1.0));
    assert_eq!(m.specular, Color::black());
    assert_eq!(m.mirror, Color::black());
    assert_eq!(m.specular_exponent, 1.0);
}
