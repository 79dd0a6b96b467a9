use crate::ray::Ray4D;
use crate::transform::Transform;
use crate::tuple::Tuple4D;

/// A pinhole camera.
///
/// Rays leave the camera's local origin and pass through the image plane
/// at z = `focal_length`, so the camera looks along its local +z axis and
/// larger focal lengths narrow the field of view. The camera's transform
/// then poses the ray in world space.
#[derive(Clone, Debug)]
pub struct Camera {
    pub focal_length: f64,
    pub transform: Transform,
}

impl Camera {
    pub fn pinhole(focal_length: f64) -> Camera {
        Camera {
            focal_length,
            transform: Transform::new(),
        }
    }

    /// Generates the primary ray for a normalized image-plane coordinate.
    ///
    /// `u` runs over [-1, 1] left to right; `v` spans the same scale
    /// vertically, so its range depends on the image aspect ratio. The
    /// render loop derives both from pixel centres.
    pub fn cast_ray(&self, u: f64, v: f64) -> Ray4D {
        let local = Ray4D::new(
            Tuple4D::point(0.0, 0.0, 0.0),
            Tuple4D::vector(u, v, self.focal_length).normalize(),
        );

        self.transform.apply(&local)
    }
}

/* Tests */

#[test]
fn ray_through_image_centre() {
    let c = Camera::pinhole(1.0);
    let r = c.cast_ray(0.0, 0.0);

    assert_eq!(r.origin, Tuple4D::point(0.0, 0.0, 0.0));
    assert_eq!(r.direction, Tuple4D::vector(0.0, 0.0, 1.0));
}

#[test]
fn ray_through_image_corner() {
    let c = Camera::pinhole(1.0);
    let r = c.cast_ray(1.0, 0.0);

    let s = 2.0f64.sqrt() / 2.0;
    assert_eq!(r.direction, Tuple4D::vector(s, 0.0, s));
}

#[test]
fn longer_focal_length_narrows_view() {
    let c = Camera::pinhole(4.0);
    let r = c.cast_ray(1.0, 0.0);

    // The same image-plane offset subtends a smaller angle.
    assert!(r.direction.z > r.direction.x);
}

#[test]
fn transformed_camera() {
    let mut c = Camera::pinhole(1.0);
    c.transform.rotate_y(180.0);
    c.transform.translate(0.0, 0.0, -10.0);

    let r = c.cast_ray(0.0, 0.0);
    assert_eq!(r.origin, Tuple4D::point(0.0, 0.0, -10.0));
    assert_eq!(r.direction, Tuple4D::vector(0.0, 0.0, -1.0));
}
