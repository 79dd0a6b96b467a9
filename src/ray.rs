use crate::tuple::Tuple4D;

/// A ray, parameterized as `origin + lambda * direction`.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Ray4D {
    pub origin: Tuple4D,
    pub direction: Tuple4D,
}

impl Ray4D {
    /// Creates a ray, coercing `origin` to a point and `direction` to a
    /// vector if their `w` components disagree.
    pub fn new(mut origin: Tuple4D, mut direction: Tuple4D) -> Ray4D {
        if !origin.is_point() {
            origin.w = 1.0;
        }

        if !direction.is_vector() {
            direction.w = 0.0;
        }

        Ray4D { origin, direction }
    }

    /// The point `lambda` units along the ray.
    pub fn position(&self, lambda: f64) -> Tuple4D {
        self.origin + (self.direction * lambda)
    }
}

#[test]
fn position_along_ray() {
    let r = Ray4D::new(
                Tuple4D::point(2.0, 3.0, 4.0),
                Tuple4D::vector(1.0, 0.0, 0.0)
            );

    assert_eq!(r.position(0.0), Tuple4D::point(2.0, 3.0, 4.0));
    assert_eq!(r.position(1.0), Tuple4D::point(3.0, 3.0, 4.0));
    assert_eq!(r.position(-1.0), Tuple4D::point(1.0, 3.0, 4.0));
    assert_eq!(r.position(2.5), Tuple4D::point(4.5, 3.0, 4.0));
}

#[test]
fn new_fixes_w_components() {
    let r = Ray4D::new(
                Tuple4D::vector(1.0, 2.0, 3.0),
                Tuple4D::point(0.0, 1.0, 0.0)
            );

    assert!(r.origin.is_point());
    assert!(r.direction.is_vector());
}
