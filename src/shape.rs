use crate::consts::EPSILON;
use crate::intersect::RayIntersection;
use crate::material::Material;
use crate::ray::Ray4D;
use crate::transform::Transform;
use crate::tuple::Tuple4D;

/// The closed set of primitives, each defined in a canonical local frame.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum ShapeKind {
    /// Unit square in the z = 0 plane, spanning x, y in [-1, 1].
    Plane,

    /// Axis-aligned cube with faces at x, y, z = +/-1.
    Cube,

    /// Unit sphere centred on the origin.
    Sphere,

    /// Unit-radius cylinder along the z axis, z in [-1, 1], with end caps.
    Cylinder,

    /// Hollow cylinder along the z axis: outer radius 1, inner radius
    /// given by the ratio, z in [-1, 1], with ring-shaped end caps.
    Tube(f64),
}

/// A primitive posed in world space.
///
/// Every shape owns its transform and material outright; scenes copy
/// materials in rather than sharing them.
#[derive(Clone, Debug)]
pub struct Shape {
    pub kind: ShapeKind,
    pub transform: Transform,
    pub material: Material,
}

/// A candidate hit in the local frame: point and geometric normal.
type LocalHit = (Tuple4D, Tuple4D);

impl Shape {
    pub fn plane() -> Shape {
        Shape::with_kind(ShapeKind::Plane)
    }

    pub fn cube() -> Shape {
        Shape::with_kind(ShapeKind::Cube)
    }

    pub fn sphere() -> Shape {
        Shape::with_kind(ShapeKind::Sphere)
    }

    pub fn cylinder() -> Shape {
        Shape::with_kind(ShapeKind::Cylinder)
    }

    /// Creates a tube with the given inner/outer radius ratio.
    pub fn tube(ratio: f64) -> Shape {
        Shape::with_kind(ShapeKind::Tube(ratio))
    }

    fn with_kind(kind: ShapeKind) -> Shape {
        Shape {
            kind,
            transform: Transform::new(),
            material: Default::default(),
        }
    }

    /// Intersects a world-space ray with this shape.
    ///
    /// The ray is carried into the local canonical frame by the inverse
    /// transform, solved there in closed form, and the surviving hits are
    /// mapped back out. Every returned hit has a distance strictly greater
    /// than `EPSILON` along the original ray (the self-intersection guard
    /// shadow rays rely on), and a normal re-oriented against the ray.
    ///
    /// All crossings are returned; picking the nearest is the scene's job.
    pub fn intersect(&self, ray: &Ray4D) -> Vec<RayIntersection> {
        let local = self.transform.apply_inverse(ray);

        let candidates = match self.kind {
            ShapeKind::Plane => intersect_plane(&local),
            ShapeKind::Cube => intersect_cube(&local),
            ShapeKind::Sphere => intersect_sphere(&local),
            ShapeKind::Cylinder => intersect_cylinder(&local),
            ShapeKind::Tube(ratio) => intersect_tube(&local, ratio),
        };

        candidates.into_iter()
            .filter_map(|(point, normal)| self.to_world(ray, point, normal))
            .collect()
    }

    /// Maps a local hit back to world space.
    ///
    /// The distance is recomputed from the world coordinates rather than
    /// carried over from the local ray parameter, which keeps it measured
    /// along the original ray even under non-uniform scaling.
    fn to_world(&self, ray: &Ray4D, local_point: Tuple4D, local_normal: Tuple4D)
        -> Option<RayIntersection> {
        let point = self.transform.apply_point(&local_point);

        let mut normal = self.transform.apply_normal(&local_normal);
        if normal.dot(&ray.direction) > 0.0 {
            normal = -normal;
        }

        let distance = (point - ray.origin).norm();
        if distance <= EPSILON {
            return None;
        }

        Some(RayIntersection {
            point,
            normal,
            distance,
            material: self.material,
        })
    }
}

/// Roots of `a*l^2 + b*l + c = 0`. A discriminant within `EPSILON` of zero
/// counts as a tangent and yields the single grazing root.
fn solve_quadratic(a: f64, b: f64, c: f64) -> Vec<f64> {
    let discriminant = b * b - 4.0 * a * c;

    if discriminant < -EPSILON {
        Vec::new()
    } else if discriminant.abs() <= EPSILON {
        vec![-b / (2.0 * a)]
    } else {
        let root = discriminant.sqrt();
        vec![(-b - root) / (2.0 * a), (-b + root) / (2.0 * a)]
    }
}

fn intersect_plane(ray: &Ray4D) -> Vec<LocalHit> {
    // A ray with no z component runs parallel to the plane.
    if ray.direction.z.abs() <= EPSILON {
        return Vec::new();
    }

    // Solve z = 0 for the ray parameter.
    let lambda = -ray.origin.z / ray.direction.z;
    if lambda <= EPSILON {
        return Vec::new();
    }

    let x = ray.origin.x + lambda * ray.direction.x;
    let y = ray.origin.y + lambda * ray.direction.y;

    if x.abs() <= 1.0 && y.abs() <= 1.0 {
        vec![(Tuple4D::point(x, y, 0.0), Tuple4D::vector(0.0, 0.0, 1.0))]
    } else {
        Vec::new()
    }
}

fn intersect_cube(ray: &Ray4D) -> Vec<LocalHit> {
    let origin = [ray.origin.x, ray.origin.y, ray.origin.z];
    let direction = [ray.direction.x, ray.direction.y, ray.direction.z];

    let mut hits = Vec::new();

    for axis in 0..3 {
        // A ray parallel to an axis never crosses that axis' face pair.
        if direction[axis].abs() <= EPSILON {
            continue;
        }

        for &side in &[-1.0, 1.0] {
            let lambda = (side - origin[axis]) / direction[axis];
            if lambda <= EPSILON {
                continue;
            }

            let mut p = [
                origin[0] + lambda * direction[0],
                origin[1] + lambda * direction[1],
                origin[2] + lambda * direction[2],
            ];
            p[axis] = side;

            let u = (axis + 1) % 3;
            let v = (axis + 2) % 3;
            if p[u].abs() <= 1.0 && p[v].abs() <= 1.0 {
                let mut n = [0.0; 3];
                n[axis] = side;

                hits.push((
                    Tuple4D::point(p[0], p[1], p[2]),
                    Tuple4D::vector(n[0], n[1], n[2]),
                ));
            }
        }
    }

    hits
}

fn intersect_sphere(ray: &Ray4D) -> Vec<LocalHit> {
    // Subtracting the origin point strips the w component.
    let p = ray.origin - Tuple4D::point(0.0, 0.0, 0.0);
    let d = ray.direction;

    let a = d.dot(&d);
    let b = 2.0 * d.dot(&p);
    let c = p.dot(&p) - 1.0;

    solve_quadratic(a, b, c).into_iter()
        .filter(|&lambda| lambda > EPSILON)
        .map(|lambda| {
            let hit = ray.position(lambda);
            // The sphere is centred on the origin, so the hit point itself
            // is the outward normal.
            (hit, Tuple4D { w: 0.0, ..hit })
        })
        .collect()
}

fn intersect_cylinder(ray: &Ray4D) -> Vec<LocalHit> {
    let mut hits = intersect_barrel(ray, 1.0);
    intersect_caps(ray, 0.0, 1.0, &mut hits);
    hits
}

fn intersect_tube(ray: &Ray4D, ratio: f64) -> Vec<LocalHit> {
    let mut hits = intersect_barrel(ray, 1.0);
    hits.extend(intersect_barrel(ray, ratio));
    intersect_caps(ray, ratio, 1.0, &mut hits);
    hits
}

/// Wall hits on a cylinder of the given radius about the z axis,
/// restricted to z in [-1, 1]. The z coordinate drops out of the
/// quadratic: it is a circle intersection in the (x, y) plane.
fn intersect_barrel(ray: &Ray4D, radius: f64) -> Vec<LocalHit> {
    let a = ray.direction.x * ray.direction.x
        + ray.direction.y * ray.direction.y;

    // Parallel to the axis: the walls are never crossed.
    if a <= EPSILON {
        return Vec::new();
    }

    let b = 2.0 * (ray.origin.x * ray.direction.x
        + ray.origin.y * ray.direction.y);
    let c = ray.origin.x * ray.origin.x
        + ray.origin.y * ray.origin.y
        - radius * radius;

    solve_quadratic(a, b, c).into_iter()
        .filter(|&lambda| lambda > EPSILON)
        .filter_map(|lambda| {
            let hit = ray.position(lambda);
            if hit.z.abs() <= 1.0 {
                Some((hit, Tuple4D::vector(hit.x, hit.y, 0.0)))
            } else {
                None
            }
        })
        .collect()
}

/// Cap hits at z = +/-1, with radial extent inner <= r <= outer. A plain
/// cylinder passes inner = 0; a tube's caps are rings.
fn intersect_caps(ray: &Ray4D, inner: f64, outer: f64,
    hits: &mut Vec<LocalHit>) {
    if ray.direction.z.abs() <= EPSILON {
        return;
    }

    for &side in &[-1.0f64, 1.0] {
        let lambda = (side - ray.origin.z) / ray.direction.z;
        if lambda <= EPSILON {
            continue;
        }

        let hit = ray.position(lambda);
        let r2 = hit.x * hit.x + hit.y * hit.y;
        if r2 >= inner * inner && r2 <= outer * outer {
            hits.push((hit, Tuple4D::vector(0.0, 0.0, side)));
        }
    }
}

/* Tests */
