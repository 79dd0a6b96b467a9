use std::path::Path;

use image::{ ImageResult, Rgb, RgbImage };

use crate::color::Color;

/// A pixel buffer for accumulating render results.
///
/// Pixels are stored as float colours while rendering; on save they are
/// clipped to [0, 1], scaled to 8-bit channels, and encoded to an image
/// file whose format is chosen from the filename extension.
#[derive(Clone, Default, Debug, PartialEq)]
pub struct Canvas {
    /// The width of the canvas, in pixels.
    pub width: usize,

    /// The height of the canvas, in pixels.
    pub height: usize,

    /// The pixels of the canvas, stored as a flattened vector.
    pixels: Vec<Color>,
}

impl Canvas {
    /// Creates a black canvas with the given dimensions.
    pub fn new(width: usize, height: usize) -> Canvas {
        Canvas {
            width,
            height,
            pixels: vec![Color::black(); width * height],
        }
    }

    /// Writes a colour at `(x, y)`, zero-indexed from the top-left corner.
    /// Out-of-bounds writes are silently ignored.
    pub fn write_pixel(&mut self, x: usize, y: usize, pixel: &Color) {
        if x >= self.width || y >= self.height {
            return;
        }

        self.pixels[(y * self.width) + x] = *pixel;
    }

    /// Reads the colour at `(x, y)`, or `None` when out of bounds.
    pub fn read_pixel(&self, x: usize, y: usize) -> Option<Color> {
        if x >= self.width || y >= self.height {
            return None;
        }

        Some(self.pixels[(y * self.width) + x])
    }

    /// Encodes the canvas to an image file.
    ///
    /// The format is selected by the path's extension (`render.png` writes
    /// a PNG, `RENDER.JPG` a JPEG, and so on).
    pub fn save<P: AsRef<Path>>(&self, path: P) -> ImageResult<()> {
        let mut out = RgbImage::new(self.width as u32, self.height as u32);

        for (x, y, px) in out.enumerate_pixels_mut() {
            let c = self.pixels[(y as usize * self.width) + x as usize].clip();
            *px = Rgb([
                (c.r * 255.0).round() as u8,
                (c.g * 255.0).round() as u8,
                (c.b * 255.0).round() as u8,
            ]);
        }

        out.save(path)
    }
}

/* Tests */

#[test]
fn write_and_read_pixel() {
    let purple = Color::rgb(1.0, 0.0, 1.0);
    let mut canvas = Canvas::new(8, 8);

    canvas.write_pixel(4, 2, &purple);
    assert_eq!(canvas.read_pixel(4, 2).unwrap(), purple);
    assert_eq!(canvas.read_pixel(2, 4).unwrap(), Color::black());
}

#[test]
fn out_of_bounds_access() {
    let mut canvas = Canvas::new(4, 4);

    canvas.write_pixel(9, 9, &Color::white());
    assert_eq!(canvas.read_pixel(9, 9), None);
    assert_eq!(canvas.read_pixel(3, 3).unwrap(), Color::black());
}
