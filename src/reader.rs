use std::collections::{ HashMap, VecDeque };
use std::fs;
use std::path::Path;

use custom_error::custom_error;
use log::{ info, warn };

use crate::camera::Camera;
use crate::color::Color;
use crate::light::LightSource;
use crate::material::Material;
use crate::scene::Scene;
use crate::shape::Shape;
use crate::transform::Transform;
use crate::tuple::Tuple4D;

custom_error! {pub SceneReaderError
    Io { description: String }
        = "Unable to read scene file: {description}",
    UnknownBlock { token: String, line: usize }
        = "Unexpected block type '{token}' starting on line {line}",
    UnknownCamera { token: String, line: usize }
        = "Unexpected camera type '{token}' in block starting on line {line}",
    UnknownLight { token: String, line: usize }
        = "Unexpected light type '{token}' in block starting on line {line}",
    UnknownObject { token: String, line: usize }
        = "Unexpected object type '{token}' in block starting on line {line}",
    UnexpectedToken { token: String, line: usize }
        = "Unexpected token '{token}' in block starting on line {line}",
    ExpectedNumber { token: String, line: usize }
        = "Expected a number but found '{token}' in block starting on line {line}",
    UndefinedMaterial { name: String, line: usize }
        = "Undefined material '{name}' in block starting on line {line}",
    EndOfBlock { line: usize }
        = "Unexpected end of block starting on line {line}",
    UnterminatedBlock { source_name: String }
        = "Unexpected end of input in {source_name}",
}

/// A parser for scene description files.
///
/// Scene descriptions are whitespace-delimited tokens grouped into blocks,
/// each opened by a block-type keyword (SCENE, CAMERA, LIGHT, MATERIAL, or
/// OBJECT) and closed by the token `End`. Keywords are case-insensitive
/// and `#` comments run to the end of the line.
///
/// A reader is linked to one `Scene` and can read several files into it in
/// sequence; later files add to the scene, they never replace anything.
/// Materials defined by MATERIAL blocks live in the reader's dictionary
/// and are copied into objects that reference them by name, so they are
/// gone once parsing finishes.
///
/// Any syntax error aborts the parse with a diagnostic naming the
/// offending token and the line its block started on.
pub struct SceneReader<'a> {
    scene: &'a mut Scene,
    materials: HashMap<String, Material>,
    start_line: usize,
}

impl<'a> SceneReader<'a> {
    pub fn new(scene: &'a mut Scene) -> SceneReader<'a> {
        SceneReader {
            scene,
            materials: HashMap::new(),
            start_line: 0,
        }
    }

    /// Reads scene data from a file.
    pub fn read(&mut self, path: &Path) -> Result<(), SceneReaderError> {
        info!("reading scene from {}", path.display());

        let text = fs::read_to_string(path).map_err(|err| {
            SceneReaderError::Io {
                description: format!("{}: {}", path.display(), err),
            }
        })?;

        self.read_str(&text, &path.display().to_string())
    }

    /// Tokenizes scene text and parses it block by block. `source_name`
    /// only labels the unterminated-block diagnostic.
    pub fn read_str(&mut self, text: &str, source_name: &str)
        -> Result<(), SceneReaderError> {
        let mut block: VecDeque<String> = VecDeque::new();
        self.start_line = 0;

        for (index, line) in text.lines().enumerate() {
            for token in line.split_whitespace() {
                if token.starts_with('#') {
                    // A comment - skip the rest of the line.
                    break;
                }

                if token.eq_ignore_ascii_case("end") {
                    self.parse_block(&mut block)?;
                } else {
                    if block.is_empty() {
                        self.start_line = index + 1;
                    }
                    block.push_back(token.to_string());
                }
            }
        }

        if !block.is_empty() {
            return Err(SceneReaderError::UnterminatedBlock {
                source_name: source_name.to_string(),
            });
        }

        Ok(())
    }

    fn parse_block(&mut self, block: &mut VecDeque<String>)
        -> Result<(), SceneReaderError> {
        let block_type = self.next_token(block)?;

        match block_type.to_ascii_uppercase().as_str() {
            "SCENE" => self.parse_scene_block(block),
            "CAMERA" => self.parse_camera_block(block),
            "LIGHT" => self.parse_light_block(block),
            "MATERIAL" => self.parse_material_block(block),
            "OBJECT" => self.parse_object_block(block),
            _ => Err(SceneReaderError::UnknownBlock {
                token: block_type,
                line: self.start_line,
            }),
        }
    }

    fn next_token(&self, block: &mut VecDeque<String>)
        -> Result<String, SceneReaderError> {
        block.pop_front().ok_or(SceneReaderError::EndOfBlock {
            line: self.start_line,
        })
    }

    fn parse_number(&self, block: &mut VecDeque<String>)
        -> Result<f64, SceneReaderError> {
        let token = self.next_token(block)?;
        token.parse::<f64>().map_err(|_| SceneReaderError::ExpectedNumber {
            token,
            line: self.start_line,
        })
    }

    fn parse_colour(&self, block: &mut VecDeque<String>)
        -> Result<Color, SceneReaderError> {
        let r = self.parse_number(block)?;
        let g = self.parse_number(block)?;
        let b = self.parse_number(block)?;
        Ok(Color::rgb(r, g, b))
    }

    /// Applies one transform operation if `token` names one. Returns false
    /// when the token is not a transform keyword, leaving the block
    /// untouched for the caller to interpret.
    fn parse_transform_op(&self, token: &str, transform: &mut Transform,
        block: &mut VecDeque<String>) -> Result<bool, SceneReaderError> {
        match token {
            "ROTATE" => {
                let axis = self.next_token(block)?;
                let angle = self.parse_number(block)?;
                match axis.to_ascii_uppercase().as_str() {
                    "X" => transform.rotate_x(angle),
                    "Y" => transform.rotate_y(angle),
                    "Z" => transform.rotate_z(angle),
                    _ => return Err(SceneReaderError::UnexpectedToken {
                        token: axis,
                        line: self.start_line,
                    }),
                }
            },
            "TRANSLATE" => {
                let x = self.parse_number(block)?;
                let y = self.parse_number(block)?;
                let z = self.parse_number(block)?;
                transform.translate(x, y, z);
            },
            "SCALE" => {
                let s = self.parse_number(block)?;
                transform.scale(s);
            },
            "SCALE3" => {
                let sx = self.parse_number(block)?;
                let sy = self.parse_number(block)?;
                let sz = self.parse_number(block)?;
                transform.scale3(sx, sy, sz);
            },
            _ => return Ok(false),
        }

        Ok(true)
    }

    fn parse_scene_block(&mut self, block: &mut VecDeque<String>)
        -> Result<(), SceneReaderError> {
        while let Some(token) = block.pop_front() {
            match token.to_ascii_uppercase().as_str() {
                "RENDERSIZE" => {
                    let width = self.parse_number(block)? as u32;
                    let height = self.parse_number(block)? as u32;
                    self.scene.render_width = width;
                    self.scene.render_height = height;
                },
                "BACKGROUNDCOLOUR" => {
                    let colour = self.parse_colour(block)?;
                    self.scene.background_colour = colour;
                },
                "AMBIENTLIGHT" => {
                    let colour = self.parse_colour(block)?;
                    self.scene.ambient_light = colour;
                },
                "FILENAME" => {
                    let name = self.next_token(block)?;
                    self.scene.filename = name.to_lowercase();
                },
                "RAYDEPTH" => {
                    let depth = self.parse_number(block)? as u32;
                    self.scene.max_ray_depth = depth;
                },
                _ => return Err(SceneReaderError::UnexpectedToken {
                    token,
                    line: self.start_line,
                }),
            }
        }

        Ok(())
    }

    fn parse_camera_block(&mut self, block: &mut VecDeque<String>)
        -> Result<(), SceneReaderError> {
        let kind = self.next_token(block)?;
        if !kind.eq_ignore_ascii_case("pinholecamera") {
            return Err(SceneReaderError::UnknownCamera {
                token: kind,
                line: self.start_line,
            });
        }

        let focal_length = self.parse_number(block)?;
        let mut camera = Camera::pinhole(focal_length);

        while let Some(token) = block.pop_front() {
            let upper = token.to_ascii_uppercase();
            if !self.parse_transform_op(&upper, &mut camera.transform, block)? {
                return Err(SceneReaderError::UnexpectedToken {
                    token,
                    line: self.start_line,
                });
            }
        }

        self.scene.set_camera(camera);
        Ok(())
    }

    fn parse_light_block(&mut self, block: &mut VecDeque<String>)
        -> Result<(), SceneReaderError> {
        let kind = self.next_token(block)?;

        // Collect all properties first; each light kind picks the ones it
        // uses and ignores the rest.
        let mut colour = Color::black();
        let mut location = Tuple4D::point(0.0, 0.0, 0.0);
        let mut direction = Tuple4D::vector(0.0, 0.0, 0.0);
        let mut angle = 0.0;

        while let Some(token) = block.pop_front() {
            match token.to_ascii_uppercase().as_str() {
                "COLOUR" => colour = self.parse_colour(block)?,
                "LOCATION" => {
                    let x = self.parse_number(block)?;
                    let y = self.parse_number(block)?;
                    let z = self.parse_number(block)?;
                    location = Tuple4D::point(x, y, z);
                },
                "DIRECTION" => {
                    let x = self.parse_number(block)?;
                    let y = self.parse_number(block)?;
                    let z = self.parse_number(block)?;
                    direction = Tuple4D::vector(x, y, z);
                },
                "ANGLE" => angle = self.parse_number(block)?,
                _ => return Err(SceneReaderError::UnexpectedToken {
                    token,
                    line: self.start_line,
                }),
            }
        }

        let light = match kind.to_ascii_uppercase().as_str() {
            "AMBIENTLIGHT" => LightSource::ambient(colour),
            "POINTLIGHT" => LightSource::point(colour, location),
            "DIRECTIONALLIGHT" => LightSource::directional(colour, direction),
            "SPOTLIGHT" => LightSource::spot(colour, location, direction, angle),
            _ => return Err(SceneReaderError::UnknownLight {
                token: kind,
                line: self.start_line,
            }),
        };

        self.scene.add_light(light);
        Ok(())
    }

    fn parse_material_block(&mut self, block: &mut VecDeque<String>)
        -> Result<(), SceneReaderError> {
        // Material names are case-sensitive, unlike keywords.
        let name = self.next_token(block)?;

        let mut material = match self.materials.get(&name) {
            Some(existing) => {
                warn!("duplicate definition of material '{}' in block \
                    starting on line {}", name, self.start_line);
                *existing
            },
            None => Default::default(),
        };

        while let Some(token) = block.pop_front() {
            self.parse_material_property(&token, &mut material, block)?;
        }

        self.materials.insert(name, material);
        Ok(())
    }

    fn parse_material_property(&self, token: &str, material: &mut Material,
        block: &mut VecDeque<String>) -> Result<(), SceneReaderError> {
        match token.to_ascii_uppercase().as_str() {
            "COLOUR" => {
                let colour = self.parse_colour(block)?;
                material.ambient = colour;
                material.diffuse = colour;
            },
            "AMBIENT" => material.ambient = self.parse_colour(block)?,
            "DIFFUSE" => material.diffuse = self.parse_colour(block)?,
            "SPECULAR" => {
                material.specular = self.parse_colour(block)?;
                material.specular_exponent = self.parse_number(block)?;
            },
            "MIRROR" => material.mirror = self.parse_colour(block)?,
            _ => return Err(SceneReaderError::UnexpectedToken {
                token: token.to_string(),
                line: self.start_line,
            }),
        }

        Ok(())
    }

    fn parse_object_block(&mut self, block: &mut VecDeque<String>)
        -> Result<(), SceneReaderError> {
        let kind = self.next_token(block)?;

        let mut object = match kind.to_ascii_uppercase().as_str() {
            "SPHERE" => Shape::sphere(),
            "CUBE" => Shape::cube(),
            "PLANE" => Shape::plane(),
            "CYLINDER" => Shape::cylinder(),
            "TUBE" => Shape::tube(self.parse_number(block)?),
            _ => return Err(SceneReaderError::UnknownObject {
                token: kind,
                line: self.start_line,
            }),
        };

        // Object bodies freely mix transform operations, a named material
        // reference, and inline material overrides.
        while let Some(token) = block.pop_front() {
            let upper = token.to_ascii_uppercase();

            if self.parse_transform_op(&upper, &mut object.transform, block)? {
                continue;
            }

            if upper == "MATERIAL" {
                let name = self.next_token(block)?;
                match self.materials.get(&name) {
                    Some(material) => object.material = *material,
                    None => return Err(SceneReaderError::UndefinedMaterial {
                        name,
                        line: self.start_line,
                    }),
                }
                continue;
            }

            self.parse_material_property(&token, &mut object.material, block)?;
        }

        self.scene.add_object(object);
        Ok(())
    }
}

/* Tests */

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::ShapeKind;

    fn read(text: &str) -> Result<Scene, SceneReaderError> {
        let mut scene = Scene::new();
        SceneReader::new(&mut scene).read_str(text, "test")?;
        Ok(scene)
    }

    #[test]
    fn full_scene_description() {
        let scene = read("
            # A small but complete scene.
            Scene
              renderSize 320 240
              backgroundColour 0.1 0.2 0.3
              ambientLight 0.5 0.5 0.5
              filename OUT.PNG
              rayDepth 5
            End

            Camera PinholeCamera 1.5
              Rotate X -15
              Translate 0 -8 -15
            End

            Material Gold
              Colour 1 0.88 0.25
              Specular 1 1 1 100
              Mirror 1 0.88 0.25
            End

            Object Sphere
              Material Gold
              Scale3 1 2 3
              Rotate Y 45
              Translate 0 0 3
            End

            Object Tube 0.5
              Colour 0.2 0.8 0.2
            End

            Light PointLight
              Location 1 2 3
              Colour 20 30 40
            End
        ").unwrap();

        assert_eq!(scene.render_width, 320);
        assert_eq!(scene.render_height, 240);
        assert_eq!(scene.background_colour, Color::rgb(0.1, 0.2, 0.3));
        assert_eq!(scene.ambient_light, Color::rgb(0.5, 0.5, 0.5));
        assert_eq!(scene.filename, "out.png");
        assert_eq!(scene.max_ray_depth, 5);

        assert!(scene.has_camera());
        assert_eq!(scene.objects.len(), 2);
        assert_eq!(scene.lights.len(), 1);

        // The named material was copied onto the sphere.
        assert_eq!(scene.objects[0].material.diffuse,
            Color::rgb(1.0, 0.88, 0.25));
        assert_eq!(scene.objects[0].material.specular_exponent, 100.0);
        assert_eq!(scene.objects[1].kind, ShapeKind::Tube(0.5));
    }

    #[test]
    fn keywords_are_case_insensitive() {
        let scene = read("sCeNe RENDERSIZE 10 20 eNd").unwrap();

        assert_eq!(scene.render_width, 10);
        assert_eq!(scene.render_height, 20);
    }

    #[test]
    fn files_accumulate_into_one_scene() {
        let mut scene = Scene::new();
        let mut reader = SceneReader::new(&mut scene);

        reader.read_str("Material Red Colour 1 0 0 End", "first").unwrap();
        reader.read_str("Object Sphere Material Red End", "second").unwrap();

        assert_eq!(scene.objects.len(), 1);
        assert_eq!(scene.objects[0].material.diffuse, Color::rgb(1.0, 0.0, 0.0));
    }

    #[test]
    fn unknown_block_type() {
        let err = read("Foo 1 2 End").unwrap_err();

        assert!(matches!(err, SceneReaderError::UnknownBlock { .. }));
        assert!(err.to_string().contains("'Foo'"));
        assert!(err.to_string().contains("line 1"));
    }

    #[test]
    fn diagnostics_name_the_block_start_line() {
        let err = read("\n\nScene\n  renderSize 10 10\n  shiny 1\nEnd").unwrap_err();

        // The block starts on line 3, not where the bad token sits.
        assert!(err.to_string().contains("'shiny'"));
        assert!(err.to_string().contains("line 3"));
    }

    #[test]
    fn non_numeric_where_number_required() {
        let err = read("Scene rayDepth lots End").unwrap_err();

        assert!(matches!(err, SceneReaderError::ExpectedNumber { .. }));
        assert!(err.to_string().contains("'lots'"));
    }

    #[test]
    fn undefined_material_reference() {
        let err = read("Object Sphere Material Gold End").unwrap_err();

        assert!(matches!(err, SceneReaderError::UndefinedMaterial { .. }));
        assert!(err.to_string().contains("'Gold'"));
    }

    #[test]
    fn unknown_light_kind() {
        let err = read("Light LaserLight Colour 1 1 1 End").unwrap_err();

        assert!(matches!(err, SceneReaderError::UnknownLight { .. }));
    }

    #[test]
    fn unterminated_block() {
        let err = read("Scene renderSize 4 4").unwrap_err();

        assert!(matches!(err, SceneReaderError::UnterminatedBlock { .. }));
        assert!(err.to_string().contains("test"));
    }

    #[test]
    fn comments_hide_the_rest_of_the_line() {
        let scene = read("
            Scene rayDepth 2 # rayDepth 9 End garbage
            End
        ").unwrap();

        assert_eq!(scene.max_ray_depth, 2);
    }

    #[test]
    fn spot_light_block() {
        let scene = read("
            Light SpotLight
              Location 0 -5 0
              Colour 10 10 10
              Direction 0 1 0
              Angle 30
            End
        ").unwrap();

        assert_eq!(scene.lights.len(), 1);
        assert!(matches!(scene.lights[0],
            LightSource::Spot { angle, .. } if angle == 30.0));
    }
}
