use crate::material::Material;
use crate::tuple::Tuple4D;

/// A single ray/surface crossing.
///
/// Produced per intersection test and consumed immediately by shading.
/// `distance` is measured along the original world-space ray: shapes
/// recompute it from world coordinates after mapping the hit out of their
/// local frame, so it remains comparable across shapes regardless of their
/// transforms. `normal` always faces the side the ray came from
/// (`normal . direction <= 0`).
#[derive(Copy, Clone, Debug)]
pub struct RayIntersection {
    pub point: Tuple4D,
    pub normal: Tuple4D,
    pub distance: f64,
    pub material: Material,
}
