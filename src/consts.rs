// Geometric tolerance. Intersection solutions at or below this distance are
// treated as the ray hitting its own origin surface and discarded.
pub const EPSILON: f64 = 1e-6;

// Floating point comparisons
pub const FEQ_EPSILON: f64 = 0.0001;

// Scene defaults, in effect until a SCENE block overrides them
pub const DEFAULT_RENDER_WIDTH: u32 = 800;
pub const DEFAULT_RENDER_HEIGHT: u32 = 600;
pub const DEFAULT_OUTPUT_FILE: &'static str = "render.png";
pub const DEFAULT_RAY_DEPTH: u32 = 3;
