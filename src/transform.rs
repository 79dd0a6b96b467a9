use crate::matrix::Matrix4D;
use crate::ray::Ray4D;
use crate::tuple::Tuple4D;

/// A composed affine transform together with its inverse.
///
/// Shapes and cameras are defined in a fixed canonical frame (unit sphere
/// at the origin, cube with faces at one, and so on); their `Transform`
/// carries them into world space. Each composition operation acts on the
/// already-posed entity, so the order in which a scene description applies
/// operations determines the final pose.
///
/// The inverse is co-maintained from each operation's analytic inverse
/// (rotate by the negated angle, translate by the negated offset, scale by
/// the reciprocals), so it is always consistent with the forward map and
/// never has to be recovered by general matrix inversion.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Transform {
    forward: Matrix4D,
    inverse: Matrix4D,
}

impl Default for Transform {
    fn default() -> Transform {
        Transform {
            forward: Matrix4D::identity(),
            inverse: Matrix4D::identity(),
        }
    }
}

impl Transform {
    pub fn new() -> Transform {
        Default::default()
    }

    fn compose(&mut self, op: Matrix4D, op_inverse: Matrix4D) {
        self.forward = op * self.forward;
        self.inverse = self.inverse * op_inverse;
    }

    /// Translates by `(x, y, z)`.
    pub fn translate(&mut self, x: f64, y: f64, z: f64) {
        self.compose(
            Matrix4D::translation(x, y, z),
            Matrix4D::translation(-x, -y, -z),
        );
    }

    /// Rotates about the X axis by an angle in degrees.
    pub fn rotate_x(&mut self, degrees: f64) {
        let r = degrees.to_radians();
        self.compose(Matrix4D::rotation_x(r), Matrix4D::rotation_x(-r));
    }

    /// Rotates about the Y axis by an angle in degrees.
    pub fn rotate_y(&mut self, degrees: f64) {
        let r = degrees.to_radians();
        self.compose(Matrix4D::rotation_y(r), Matrix4D::rotation_y(-r));
    }

    /// Rotates about the Z axis by an angle in degrees.
    pub fn rotate_z(&mut self, degrees: f64) {
        let r = degrees.to_radians();
        self.compose(Matrix4D::rotation_z(r), Matrix4D::rotation_z(-r));
    }

    /// Scales uniformly by `s`.
    pub fn scale(&mut self, s: f64) {
        self.scale3(s, s, s);
    }

    /// Scales by separate factors along the three axes.
    pub fn scale3(&mut self, sx: f64, sy: f64, sz: f64) {
        self.compose(
            Matrix4D::scaling(sx, sy, sz),
            Matrix4D::scaling(1.0 / sx, 1.0 / sy, 1.0 / sz),
        );
    }

    /// Maps a local-space point into world space.
    pub fn apply_point(&self, point: &Tuple4D) -> Tuple4D {
        self.forward * *point
    }

    /// Maps a local-space direction into world space.
    ///
    /// Directions carry `w == 0.0`, so the translation column drops out.
    pub fn apply_direction(&self, direction: &Tuple4D) -> Tuple4D {
        self.forward * *direction
    }

    /// Maps a local-space surface normal into world space.
    ///
    /// Normals do not transform like directions under non-uniform scaling;
    /// they go through the transpose of the inverse, then renormalize.
    pub fn apply_normal(&self, normal: &Tuple4D) -> Tuple4D {
        let mut world = self.inverse.transposition() * *normal;
        world.w = 0.0;
        world.normalize()
    }

    /// Maps a local-space ray into world space.
    pub fn apply(&self, ray: &Ray4D) -> Ray4D {
        Ray4D {
            origin: self.forward * ray.origin,
            direction: self.forward * ray.direction,
        }
    }

    /// Maps a world-space ray into local space, for intersection testing
    /// against canonical geometry.
    pub fn apply_inverse(&self, ray: &Ray4D) -> Ray4D {
        Ray4D {
            origin: self.inverse * ray.origin,
            direction: self.inverse * ray.direction,
        }
    }
}

/* Tests */

#[cfg(test)]
fn composed() -> Transform {
    let mut transform = Transform::new();
    transform.scale3(2.0, 3.0, 4.0);
    transform.rotate_y(45.0);
    transform.translate(1.0, -2.0, 5.0);
    transform
}

#[test]
fn inverse_undoes_forward() {
    let transform = composed();
    let ray = Ray4D::new(
        Tuple4D::point(1.5, -2.5, 3.5),
        Tuple4D::vector(0.5, 1.0, -1.0),
    );

    let round_trip = transform.apply(&transform.apply_inverse(&ray));
    assert_eq!(round_trip.origin, ray.origin);
    assert_eq!(round_trip.direction, ray.direction);
}

#[test]
fn operations_apply_in_order() {
    // Scaling after translating also scales the translation.
    let mut a = Transform::new();
    a.translate(1.0, 0.0, 0.0);
    a.scale(2.0);

    let mut b = Transform::new();
    b.scale(2.0);
    b.translate(1.0, 0.0, 0.0);

    let origin = Tuple4D::point(0.0, 0.0, 0.0);
    assert_eq!(a.apply_point(&origin), Tuple4D::point(2.0, 0.0, 0.0));
    assert_eq!(b.apply_point(&origin), Tuple4D::point(1.0, 0.0, 0.0));
}

#[test]
fn rotation_takes_degrees() {
    let mut transform = Transform::new();
    transform.rotate_x(90.0);

    let p = Tuple4D::point(0.0, 1.0, 0.0);
    assert_eq!(transform.apply_point(&p), Tuple4D::point(0.0, 0.0, 1.0));
}

#[test]
fn translation_ignores_directions() {
    let mut transform = Transform::new();
    transform.translate(3.0, 4.0, 5.0);

    let d = Tuple4D::vector(0.0, 1.0, 0.0);
    assert_eq!(transform.apply_direction(&d), d);
}

#[test]
fn normals_under_nonuniform_scale() {
    // Squashing a sphere along y: the surface normal tilts away from the
    // squashed axis rather than following the point transform.
    let mut transform = Transform::new();
    transform.scale3(1.0, 0.5, 1.0);

    let s = 2.0f64.sqrt() / 2.0;
    let normal = transform.apply_normal(&Tuple4D::vector(0.0, s, -s));

    assert_eq!(normal, Tuple4D::vector(0.0, 0.894427, -0.447214));
}

#[test]
fn normals_stay_unit_length() {
    let transform = composed();
    let normal = transform.apply_normal(&Tuple4D::vector(1.0, 2.0, 2.0));

    assert!(crate::feq(normal.norm(), 1.0));
}
