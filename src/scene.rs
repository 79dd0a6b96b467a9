use log::{ debug, info };

use crate::camera::Camera;
use crate::canvas::Canvas;
use crate::color::Color;
use crate::consts::{ EPSILON, DEFAULT_RENDER_WIDTH, DEFAULT_RENDER_HEIGHT,
    DEFAULT_OUTPUT_FILE, DEFAULT_RAY_DEPTH };
use crate::intersect::RayIntersection;
use crate::light::LightSource;
use crate::ray::Ray4D;
use crate::shape::Shape;

/// A scene to be ray traced.
///
/// A scene owns its camera, shapes, and light sources for the whole render,
/// together with the global render parameters: background colour, ambient
/// light level, maximum reflection depth, output resolution, and output
/// filename. Entities only accumulate; there is no removal.
///
/// Everything here is immutable during rendering, which is what makes the
/// row-parallel renderer in `parallel` safe without locking the scene.
#[derive(Debug)]
pub struct Scene {
    pub camera: Option<Camera>,
    pub objects: Vec<Shape>,
    pub lights: Vec<LightSource>,

    /// Colour for any ray that hits nothing.
    pub background_colour: Color,

    /// Scene-wide ambient light level, applied through each material's
    /// ambient colour in addition to any ambient light sources.
    pub ambient_light: Color,

    /// Maximum number of reflected rays to trace per primary ray.
    pub max_ray_depth: u32,

    pub render_width: u32,
    pub render_height: u32,

    /// File to save the render to; the extension picks the image format.
    pub filename: String,
}

impl Default for Scene {
    fn default() -> Scene {
        Scene {
            camera: None,
            objects: Vec::new(),
            lights: Vec::new(),
            background_colour: Color::black(),
            ambient_light: Color::black(),
            max_ray_depth: DEFAULT_RAY_DEPTH,
            render_width: DEFAULT_RENDER_WIDTH,
            render_height: DEFAULT_RENDER_HEIGHT,
            filename: DEFAULT_OUTPUT_FILE.to_string(),
        }
    }
}

impl Scene {
    pub fn new() -> Scene {
        Default::default()
    }

    /// Sets the scene's camera, replacing any existing one.
    pub fn set_camera(&mut self, camera: Camera) {
        self.camera = Some(camera);
    }

    pub fn add_object(&mut self, object: Shape) {
        self.objects.push(object);
    }

    pub fn add_light(&mut self, light: LightSource) {
        self.lights.push(light);
    }

    /// Whether a camera has been defined; rendering requires one.
    pub fn has_camera(&self) -> bool {
        self.camera.is_some()
    }

    /// Finds the first thing the ray hits.
    ///
    /// Collects every shape's hits and keeps the one with the smallest
    /// distance strictly greater than `EPSILON`. Both primary visibility
    /// and shadow testing go through here.
    pub fn intersect(&self, ray: &Ray4D) -> Option<RayIntersection> {
        let mut nearest: Option<RayIntersection> = None;

        for object in &self.objects {
            for hit in object.intersect(ray) {
                if hit.distance > EPSILON
                    && nearest.map_or(true, |best| hit.distance < best.distance)
                {
                    nearest = Some(hit);
                }
            }
        }

        nearest
    }

    /// Computes the colour seen along a ray.
    ///
    /// Ambient, diffuse, and specular contributions are summed over the
    /// light sources, with a shadow ray deciding whether each non-ambient
    /// light reaches the hit point. Mirror surfaces then blend in a
    /// recursively traced reflection. `depth` bounds that recursion: it
    /// strictly decreases on each reflected ray and no reflection is cast
    /// at zero, so a primary ray costs at most `depth` extra traces.
    pub fn compute_colour(&self, ray: &Ray4D, depth: u32) -> Color {
        let hit = match self.intersect(ray) {
            Some(hit) => hit,
            None => return self.background_colour,
        };

        let normal = hit.normal.normalize();
        let mut colour = self.ambient_light * hit.material.ambient;

        for light in &self.lights {
            let dist_to_light = light.distance_to_light(&hit.point);

            if dist_to_light < 0.0 {
                // Ambient sentinel: no shadow test, no geometry term.
                colour = colour
                    + light.illumination_at(&hit.point) * hit.material.ambient;
                continue;
            }

            // Shadow test: does anything sit between the hit point and the
            // light? The ray starts exactly on the surface; the epsilon
            // guard in `intersect` keeps the surface from occluding itself.
            let to_light = -light.light_direction(&hit.point);
            let shadow_ray = Ray4D::new(hit.point, to_light);
            if let Some(occluder) = self.intersect(&shadow_ray) {
                if dist_to_light >= occluder.distance {
                    continue;
                }
            }

            let illumination = light.illumination_at(&hit.point);
            let l = to_light.normalize();

            // Lights behind the surface contribute nothing.
            let n_dot_l = normal.dot(&l);
            if n_dot_l < 0.0 {
                continue;
            }

            colour = colour + illumination * hit.material.diffuse * n_dot_l;

            // Phong highlight: how closely the viewer lines up with the
            // light's mirror direction.
            let viewer = (-ray.direction).normalize();
            let reflected = (-l).reflect(&normal);
            let r_dot_e = reflected.dot(&viewer);
            if r_dot_e > 0.0 {
                colour = colour + illumination * hit.material.specular
                    * r_dot_e.powf(hit.material.specular_exponent);
            }
        }

        if depth > 0 && !hit.material.mirror.is_black() {
            let direction = ray.direction.normalize().reflect(&normal);
            let reflected_ray = Ray4D::new(hit.point, direction);
            let reflected_colour = self.compute_colour(&reflected_ray, depth - 1);

            // The mirror colour weights how much of the surface acts as a
            // tinted mirror versus a matte surface.
            colour = (Color::white() - hit.material.mirror) * colour
                + hit.material.mirror * reflected_colour;
        }

        colour.clip()
    }

    /// Renders one row of the image.
    ///
    /// Shared by the serial loop and the parallel renderer. The normalized
    /// image-plane coordinates place pixel centres so that `u` spans
    /// [-1, 1] and `v` spans [-h/w, h/w].
    pub fn render_row(&self, v: usize) -> Vec<Color> {
        let camera = self.camera.as_ref()
            .expect("Rendering requires a camera.");

        let w = self.render_width as f64;
        let h = self.render_height as f64;

        (0..self.render_width as usize)
            .map(|u| {
                let cu = -1.0 + (u as f64 + 0.5) * (2.0 / w);
                let cv = -h / w + (v as f64 + 0.5) * (2.0 / w);
                let ray = camera.cast_ray(cu, cv);
                self.compute_colour(&ray, self.max_ray_depth)
            })
            .collect()
    }

    /// Renders the whole image on the calling thread.
    pub fn render(&self) -> Canvas {
        let width = self.render_width as usize;
        let height = self.render_height as usize;
        let mut canvas = Canvas::new(width, height);

        info!("rendering {}x{} image", width, height);
        for v in 0..height {
            let row = self.render_row(v);
            for (u, colour) in row.iter().enumerate() {
                canvas.write_pixel(u, v, colour);
            }

            debug!("rendered row {}/{}", v + 1, height);
        }

        canvas
    }
}

/* Tests */

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::Material;
    use crate::tuple::Tuple4D;

    // A canonical plane lit by a point light two units along +z, viewed
    // from the +z side at an angle (so a blocker can sit on the light path
    // without shadowing the viewing ray).
    fn lit_plane() -> Scene {
        let mut scene = Scene::new();

        let mut floor = Shape::plane();
        floor.material = Material {
            ambient: Color::black(),
            diffuse: Color::white(),
            specular: Color::black(),
            specular_exponent: 1.0,
            mirror: Color::black(),
        };
        scene.add_object(floor);

        scene.add_light(LightSource::point(
            Color::rgb(8.0, 8.0, 8.0),
            Tuple4D::point(0.0, 0.0, 2.0),
        ));

        scene
    }

    fn oblique_ray() -> Ray4D {
        Ray4D::new(
            Tuple4D::point(2.0, 0.0, 2.0),
            Tuple4D::vector(-1.0, 0.0, -1.0).normalize(),
        )
    }

    #[test]
    fn miss_returns_background() {
        let mut scene = Scene::new();
        scene.background_colour = Color::rgb(0.25, 0.5, 0.75);

        let ray = Ray4D::new(
            Tuple4D::point(0.0, 0.0, -5.0),
            Tuple4D::vector(0.0, 1.0, 0.0),
        );

        assert!(scene.intersect(&ray).is_none());
        assert_eq!(scene.compute_colour(&ray, 3),
            Color::rgb(0.25, 0.5, 0.75));
    }

    #[test]
    fn nearest_hit_wins() {
        let mut scene = Scene::new();

        let near = Shape::sphere();
        scene.add_object(near);

        let mut far = Shape::sphere();
        far.transform.translate(0.0, 0.0, 3.0);
        scene.add_object(far);

        let ray = Ray4D::new(
            Tuple4D::point(0.0, 0.0, -5.0),
            Tuple4D::vector(0.0, 0.0, 1.0),
        );

        let hit = scene.intersect(&ray).unwrap();
        assert!(crate::feq(hit.distance, 4.0));
        assert_eq!(hit.point, Tuple4D::point(0.0, 0.0, -1.0));
    }

    #[test]
    fn unobstructed_light_gives_positive_diffuse() {
        let scene = lit_plane();
        let colour = scene.compute_colour(&oblique_ray(), 0);

        // Illumination 8/4 through a white diffuse surface facing the
        // light head-on, clipped to the displayable range.
        assert_eq!(colour, Color::white());
    }

    #[test]
    fn occluded_light_contributes_nothing() {
        let mut scene = lit_plane();

        // A small sphere squarely between the hit point and the light.
        let mut blocker = Shape::sphere();
        blocker.transform.scale(0.25);
        blocker.transform.translate(0.0, 0.0, 1.0);
        scene.add_object(blocker);

        let colour = scene.compute_colour(&oblique_ray(), 0);
        assert_eq!(colour, Color::black());
    }

    #[test]
    fn ambient_light_source_skips_shadowing() {
        let mut scene = lit_plane();

        scene.objects[0].material.ambient = Color::rgb(0.2, 0.4, 0.6);
        scene.add_light(LightSource::ambient(Color::rgb(0.5, 0.5, 0.5)));

        // Block the point light; only the ambient term should remain, and
        // the blocker must not darken it.
        let mut blocker = Shape::sphere();
        blocker.transform.scale(0.25);
        blocker.transform.translate(0.0, 0.0, 1.0);
        scene.add_object(blocker);

        let colour = scene.compute_colour(&oblique_ray(), 0);
        assert_eq!(colour, Color::rgb(0.1, 0.2, 0.3));
    }

    #[test]
    fn scene_ambient_level_seeds_shading() {
        let mut scene = Scene::new();
        scene.ambient_light = Color::white();

        let mut floor = Shape::plane();
        floor.material = Material {
            ambient: Color::rgb(0.3, 0.3, 0.3),
            diffuse: Color::black(),
            ..Default::default()
        };
        scene.add_object(floor);

        let colour = scene.compute_colour(&oblique_ray(), 0);
        assert_eq!(colour, Color::rgb(0.3, 0.3, 0.3));
    }

    #[test]
    fn directional_light_blocked_by_any_occluder() {
        let mut scene = lit_plane();
        scene.lights.clear();
        scene.add_light(LightSource::directional(
            Color::white(),
            Tuple4D::vector(0.0, 0.0, -1.0),
        ));

        let lit = scene.compute_colour(&oblique_ray(), 0);
        assert_eq!(lit, Color::white());

        let mut blocker = Shape::sphere();
        blocker.transform.scale(0.25);
        blocker.transform.translate(0.0, 0.0, 1.0);
        scene.add_object(blocker);

        let shadowed = scene.compute_colour(&oblique_ray(), 0);
        assert_eq!(shadowed, Color::black());
    }

    #[test]
    fn specular_highlight_in_mirror_direction() {
        let mut scene = Scene::new();

        let mut floor = Shape::plane();
        floor.material = Material {
            ambient: Color::black(),
            diffuse: Color::black(),
            specular: Color::rgb(0.5, 0.5, 0.5),
            specular_exponent: 20.0,
            mirror: Color::black(),
        };
        scene.add_object(floor);

        scene.add_light(LightSource::point(
            Color::rgb(100.0, 100.0, 100.0),
            Tuple4D::point(0.0, 0.0, 10.0),
        ));

        // Viewer dead in the reflection of the light: full highlight.
        let ray = Ray4D::new(
            Tuple4D::point(0.0, 0.0, 5.0),
            Tuple4D::vector(0.0, 0.0, -1.0),
        );

        let colour = scene.compute_colour(&ray, 0);
        assert_eq!(colour, Color::rgb(0.5, 0.5, 0.5));
    }

    #[test]
    fn zero_depth_casts_no_reflection() {
        let mut scene = lit_plane();
        scene.background_colour = Color::rgb(0.25, 0.5, 0.75);
        scene.objects[0].material.mirror = Color::white();

        // With no remaining depth the mirror term is skipped entirely and
        // the result matches a plain matte shade.
        assert_eq!(scene.compute_colour(&oblique_ray(), 0), Color::white());

        // With one bounce, a fully mirrored surface shows only what the
        // reflected ray sees (here, the sky).
        assert_eq!(scene.compute_colour(&oblique_ray(), 1),
            Color::rgb(0.25, 0.5, 0.75));
    }

    #[test]
    fn mirror_box_recursion_is_bounded() {
        // Two fully mirrored planes facing each other; a ray bouncing
        // between them terminates because the depth strictly decreases.
        let mut scene = Scene::new();

        let mut near = Shape::plane();
        near.material.ambient = Color::black();
        near.material.diffuse = Color::black();
        near.material.mirror = Color::white();

        let mut far = near.clone();
        far.transform.translate(0.0, 0.0, 2.0);

        scene.add_object(near);
        scene.add_object(far);

        let ray = Ray4D::new(
            Tuple4D::point(0.0, 0.0, 1.0),
            Tuple4D::vector(0.0, 0.0, 1.0),
        );

        assert_eq!(scene.compute_colour(&ray, 5), Color::black());
    }

    #[test]
    fn computed_colours_are_clipped() {
        let mut scene = lit_plane();

        // An absurdly bright light: the result must still be displayable.
        scene.lights[0] = LightSource::point(
            Color::rgb(1e6, 1e6, 1e6),
            Tuple4D::point(0.0, 0.0, 2.0),
        );

        let colour = scene.compute_colour(&oblique_ray(), 0);
        assert!(colour.r <= 1.0 && colour.g <= 1.0 && colour.b <= 1.0);
    }

    #[test]
    fn render_empty_scene_is_background() {
        let mut scene = Scene::new();
        scene.set_camera(Camera::pinhole(1.0));
        scene.background_colour = Color::rgb(0.1, 0.2, 0.3);
        scene.render_width = 4;
        scene.render_height = 4;

        let canvas = scene.render();
        for y in 0..4 {
            for x in 0..4 {
                assert_eq!(canvas.read_pixel(x, y).unwrap(),
                    Color::rgb(0.1, 0.2, 0.3));
            }
        }
    }
}
