use crate::color::Color;
use crate::consts::EPSILON;
use crate::tuple::Tuple4D;

/// A light in the scene.
///
/// The closed set of light kinds is dispatched through three capabilities:
/// how much light reaches a point, how far away the source is from it, and
/// which way the light travels to get there.
///
/// `distance_to_light` doubles as a shadow-policy flag. Ambient lights have
/// no location and cast no shadows, signalled by the sentinel -1 (never a
/// valid distance). Directional lights are infinitely far away, so any
/// object along the shadow ray, at any finite distance, occludes them.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum LightSource {
    /// Background illumination. A hack to avoid pitch-black shadows
    /// without modelling indirect lighting.
    Ambient { colour: Color },

    /// A located source with inverse-square falloff.
    Point { colour: Color, location: Tuple4D },

    /// An infinitely distant source shining in a fixed direction.
    Directional { colour: Color, direction: Tuple4D },

    /// A point source restricted to a cone about an axis.
    Spot { colour: Color, location: Tuple4D, direction: Tuple4D, angle: f64 },
}

impl LightSource {
    pub fn ambient(colour: Color) -> LightSource {
        LightSource::Ambient { colour }
    }

    /// Creates a point light. If `location` isn't a point, it is coerced
    /// to one.
    pub fn point(colour: Color, mut location: Tuple4D) -> LightSource {
        location.w = 1.0;
        LightSource::Point { colour, location }
    }

    pub fn directional(colour: Color, mut direction: Tuple4D) -> LightSource {
        direction.w = 0.0;
        LightSource::Directional { colour, direction }
    }

    /// Creates a spot light with a cone half-angle in degrees.
    pub fn spot(colour: Color, mut location: Tuple4D, mut direction: Tuple4D,
        angle: f64) -> LightSource {
        location.w = 1.0;
        direction.w = 0.0;
        LightSource::Spot { colour, location, direction, angle }
    }

    /// How much light from this source reaches `point`.
    pub fn illumination_at(&self, point: &Tuple4D) -> Color {
        match *self {
            LightSource::Ambient { colour } => colour,

            LightSource::Point { colour, location } => {
                // Floor the distance so coincident points don't blow up.
                let distance = (location - *point).norm().max(EPSILON);
                colour * (1.0 / (distance * distance))
            },

            LightSource::Directional { colour, .. } => colour,

            LightSource::Spot { colour, location, direction, angle } => {
                let to_point = *point - location;
                let spread = direction.normalize()
                    .dot(&to_point.normalize())
                    .min(1.0).max(-1.0)
                    .acos();

                if spread > angle.to_radians() {
                    return Color::black();
                }

                let distance = to_point.norm().max(EPSILON);
                colour * (1.0 / (distance * distance))
            },
        }
    }

    /// Distance from `point` to this source, with the sentinels described
    /// on the enum: -1 for ambient, infinity for directional.
    pub fn distance_to_light(&self, point: &Tuple4D) -> f64 {
        match *self {
            LightSource::Ambient { .. } => -1.0,

            LightSource::Point { location, .. }
                | LightSource::Spot { location, .. }
                => (*point - location).norm(),

            LightSource::Directional { .. } => f64::INFINITY,
        }
    }

    /// The direction light from this source travels to reach `point`, i.e.
    /// pointing from the light toward the point. Callers negate it to aim
    /// shadow rays back at the light. Arbitrary (zero) for ambient lights,
    /// which never take part in directional shading.
    pub fn light_direction(&self, point: &Tuple4D) -> Tuple4D {
        match *self {
            LightSource::Ambient { .. } => Tuple4D::vector(0.0, 0.0, 0.0),

            LightSource::Point { location, .. }
                | LightSource::Spot { location, .. }
                => *point - location,

            LightSource::Directional { direction, .. } => direction,
        }
    }
}

/* Tests */

#[test]
fn ambient_sentinel_distance() {
    let light = LightSource::ambient(Color::white());
    let p = Tuple4D::point(3.0, -2.0, 7.0);

    assert_eq!(light.distance_to_light(&p), -1.0);
    assert_eq!(light.illumination_at(&p), Color::white());
}

#[test]
fn point_light_inverse_square_falloff() {
    let light = LightSource::point(
        Color::rgb(8.0, 8.0, 8.0),
        Tuple4D::point(0.0, 0.0, 2.0),
    );
    let p = Tuple4D::point(0.0, 0.0, 0.0);

    assert_eq!(light.illumination_at(&p), Color::rgb(2.0, 2.0, 2.0));
    assert_eq!(light.distance_to_light(&p), 2.0);
}

#[test]
fn point_light_direction_points_at_queried_point() {
    let light = LightSource::point(
        Color::white(),
        Tuple4D::point(0.0, 5.0, 0.0),
    );
    let p = Tuple4D::point(0.0, 0.0, 0.0);

    assert_eq!(light.light_direction(&p), Tuple4D::vector(0.0, -5.0, 0.0));
}

#[test]
fn directional_light_is_infinitely_far() {
    let light = LightSource::directional(
        Color::white(),
        Tuple4D::vector(0.0, -1.0, 0.0),
    );
    let near = Tuple4D::point(0.0, 0.0, 0.0);
    let far = Tuple4D::point(100.0, 100.0, 100.0);

    assert_eq!(light.distance_to_light(&near), f64::INFINITY);
    assert_eq!(light.illumination_at(&near), light.illumination_at(&far));
    assert_eq!(light.light_direction(&near), Tuple4D::vector(0.0, -1.0, 0.0));
}

#[test]
fn spot_light_cone_cutoff() {
    let light = LightSource::spot(
        Color::rgb(4.0, 4.0, 4.0),
        Tuple4D::point(0.0, 0.0, 2.0),
        Tuple4D::vector(0.0, 0.0, -1.0),
        30.0,
    );

    // On the axis, two units away: ordinary inverse-square falloff.
    let on_axis = Tuple4D::point(0.0, 0.0, 0.0);
    assert_eq!(light.illumination_at(&on_axis), Color::rgb(1.0, 1.0, 1.0));

    // Well outside the 30 degree cone: no light at all.
    let off_axis = Tuple4D::point(4.0, 0.0, 0.0);
    assert_eq!(light.illumination_at(&off_axis), Color::black());
}
