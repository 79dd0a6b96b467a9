use std::ops::{ Index, IndexMut, Mul };
use std::convert::From;

use crate::feq;
use crate::tuple::Tuple4D;

/// A 4x4 matrix in row-major order.
///
/// These encode the affine building blocks of a `Transform`: translations,
/// rotations, and scalings, applied to tuples by multiplication on the
/// right. Only the constructors needed by `Transform` are provided; general
/// inversion is not, since transforms carry their inverses alongside.
#[derive(Copy, Clone, Debug, Default, PartialOrd)]
pub struct Matrix4D {
    data: [f64; 16],
}

/// Element-wise approximate equality, accounting for floating point error.
impl PartialEq for Matrix4D {
    fn eq(&self, other: &Matrix4D) -> bool {
        self.data.iter().zip(other.data.iter()).all(|(x, y)| feq(*x, *y))
    }
}

impl Matrix4D {
    /// Creates a zero matrix.
    pub fn new() -> Matrix4D {
        Matrix4D { data: [0.0; 16] }
    }

    /// The 4x4 identity matrix.
    pub fn identity() -> Matrix4D {
        let mut buf = [0.0; 16];
        buf[0] = 1.0; buf[5] = 1.0; buf[10] = 1.0; buf[15] = 1.0;

        Matrix4D { data: buf }
    }

    /// A matrix offsetting points by `x`, `y` and `z`.
    ///
    /// Directions (`w == 0.0`) are unaffected by translation.
    pub fn translation(x: f64, y: f64, z: f64) -> Matrix4D {
        let mut trans = Self::identity();
        trans[(0, 3)] = x;
        trans[(1, 3)] = y;
        trans[(2, 3)] = z;

        trans
    }

    /// A matrix scaling by `x`, `y` and `z` along the respective axes.
    pub fn scaling(x: f64, y: f64, z: f64) -> Matrix4D {
        let mut scale = Self::identity();
        scale[(0, 0)] = x;
        scale[(1, 1)] = y;
        scale[(2, 2)] = z;

        scale
    }

    /// A rotation of `r` radians about the X axis.
    pub fn rotation_x(r: f64) -> Matrix4D {
        let mut rotate = Self::identity();
        rotate[(1, 1)] =  r.cos();
        rotate[(1, 2)] = -r.sin();
        rotate[(2, 1)] =  r.sin();
        rotate[(2, 2)] =  r.cos();

        rotate
    }

    /// A rotation of `r` radians about the Y axis.
    pub fn rotation_y(r: f64) -> Matrix4D {
        let mut rotate = Self::identity();
        rotate[(0, 0)] =  r.cos();
        rotate[(0, 2)] =  r.sin();
        rotate[(2, 0)] = -r.sin();
        rotate[(2, 2)] =  r.cos();

        rotate
    }

    /// A rotation of `r` radians about the Z axis.
    pub fn rotation_z(r: f64) -> Matrix4D {
        let mut rotate = Self::identity();
        rotate[(0, 0)] =  r.cos();
        rotate[(0, 1)] = -r.sin();
        rotate[(1, 0)] =  r.sin();
        rotate[(1, 1)] =  r.cos();

        rotate
    }

    /// Returns the transpose of this matrix.
    ///
    /// Needed for mapping surface normals: normals transform through the
    /// transpose of the inverse of the point transform.
    pub fn transposition(&self) -> Matrix4D {
        let mut buf = self.clone();

        for r in 0..4 {
            for c in (r + 1)..4 {
                let tmp = buf[(r, c)];
                buf[(r, c)] = buf[(c, r)];
                buf[(c, r)] = tmp;
            }
        }

        buf
    }
}

impl From<[f64; 16]> for Matrix4D {
    fn from(data: [f64; 16]) -> Matrix4D {
        Matrix4D { data }
    }
}

impl Index<(usize, usize)> for Matrix4D {
    type Output = f64;

    fn index<'a>(&'a self, index: (usize, usize)) -> &'a f64 {
        &self.data[(index.0 * 4) + index.1]
    }
}

impl IndexMut<(usize, usize)> for Matrix4D {
    fn index_mut<'a>(&'a mut self, index: (usize, usize)) -> &'a mut f64 {
        &mut self.data[(index.0 * 4) + index.1]
    }
}

/// Matrix product. Not commutative; `A * B` applies `B` first when the
/// product multiplies a tuple on the right.
impl Mul<Matrix4D> for Matrix4D {
    type Output = Matrix4D;

    fn mul(self, other: Matrix4D) -> Matrix4D {
        let mut res = Matrix4D::new();

        for r in 0..4 {
            for c in 0..4 {
                res[(r, c)] = self[(r, 0)] * other[(0, c)]
                    + self[(r, 1)] * other[(1, c)]
                    + self[(r, 2)] * other[(2, c)]
                    + self[(r, 3)] * other[(3, c)]
            }
        }

        res
    }
}

/// Matrix-tuple product, treating the tuple as a column vector.
impl Mul<Tuple4D> for Matrix4D {
    type Output = Tuple4D;

    fn mul(self, other: Tuple4D) -> Tuple4D {
        let mut buf: [f64; 4] = Default::default();

        for r in 0..4 {
            buf[r] = self[(r, 0)] * other.x
                + self[(r, 1)] * other.y
                + self[(r, 2)] * other.z
                + self[(r, 3)] * other.w;
        }

        Tuple4D { x: buf[0], y: buf[1], z: buf[2], w: buf[3] }
    }
}

/* Tests */

#[test]
fn identity() {
    let i = Matrix4D::identity();
    let a: Matrix4D = [ 0.0, 1.0,  2.0,  4.0,
                        1.0, 2.0,  4.0,  8.0,
                        2.0, 4.0,  8.0, 16.0,
                        4.0, 8.0, 16.0, 32.0, ].into();

    assert_eq!(i * a, a);
    assert_eq!(a * i, a);
}

#[test]
fn transposition() {
    let a: Matrix4D = [ 0.0, 9.0, 3.0, 0.0,
                        9.0, 8.0, 0.0, 8.0,
                        1.0, 8.0, 5.0, 3.0,
                        0.0, 0.0, 5.0, 8.0, ].into();

    let t: Matrix4D = [ 0.0, 9.0, 1.0, 0.0,
                        9.0, 8.0, 8.0, 0.0,
                        3.0, 0.0, 5.0, 5.0,
                        0.0, 8.0, 3.0, 8.0, ].into();

    assert_eq!(t, a.transposition());
    assert_eq!(t.transposition(), a);
}

#[test]
fn translate_point() {
    let transform = Matrix4D::translation(5.0, -3.0, 2.0);
    let point = Tuple4D::point(-3.0, 4.0, 5.0);

    assert_eq!(transform * point, Tuple4D::point(2.0, 1.0, 7.0));
}

#[test]
fn translate_leaves_vectors_alone() {
    let transform = Matrix4D::translation(5.0, -3.0, 2.0);
    let vector = Tuple4D::vector(-3.0, 4.0, 5.0);

    assert_eq!(transform * vector, vector);
}

#[test]
fn scale_vector() {
    let transform = Matrix4D::scaling(2.0, 3.0, 4.0);
    let vector = Tuple4D::vector(-4.0, 6.0, 8.0);

    assert_eq!(transform * vector, Tuple4D::vector(-8.0, 18.0, 32.0));
}

#[test]
fn rotate_x() {
    let half_quarter = Matrix4D::rotation_x(std::f64::consts::PI / 4.0);
    let full_quarter = Matrix4D::rotation_x(std::f64::consts::PI / 2.0);
    let point = Tuple4D::point(0.0, 1.0, 0.0);

    assert_eq!(full_quarter * point,
        Tuple4D::point(0.0, 0.0, 1.0));
    assert_eq!(half_quarter * point,
        Tuple4D::point(0.0, 2.0f64.sqrt() / 2.0, 2.0f64.sqrt() / 2.0));
}

#[test]
fn rotate_y() {
    let full_quarter = Matrix4D::rotation_y(std::f64::consts::PI / 2.0);
    let point = Tuple4D::point(0.0, 0.0, 1.0);

    assert_eq!(full_quarter * point, Tuple4D::point(1.0, 0.0, 0.0));
}

#[test]
fn rotate_z() {
    let full_quarter = Matrix4D::rotation_z(std::f64::consts::PI / 2.0);
    let point = Tuple4D::point(0.0, 1.0, 0.0);

    assert_eq!(full_quarter * point, Tuple4D::point(-1.0, 0.0, 0.0));
}

#[test]
fn chained_transforms_apply_right_to_left() {
    let a = Matrix4D::rotation_x(std::f64::consts::PI / 2.0);
    let b = Matrix4D::scaling(5.0, 5.0, 5.0);
    let c = Matrix4D::translation(10.0, 5.0, 7.0);

    let t = c * b * a;
    let p = Tuple4D::point(1.0, 0.0, 1.0);

    assert_eq!(t * p, Tuple4D::point(15.0, 0.0, 7.0));
}
