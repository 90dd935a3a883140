use std::fs::File;
use std::io::{ BufWriter, Write };
use std::path::{ Path, PathBuf };

use tracing::info;

use crate::error::Error;
use crate::color::Rgb;

/// Somewhere finished pixels go.
///
/// Pixels are addressed with a top-left origin, `0 <= x < width` and
/// `0 <= y < height`. `present` is called once a whole frame is written.
pub trait PixelSink {
    fn set_pixel(&mut self, x: usize, y: usize, color: Rgb);
    fn present(&mut self) -> Result<(), Error>;
}

/// A canvas for drawing pixels.
///
/// The canvas stores one `Rgb` per pixel in a flattened vector, and can
/// export itself as a plain-text PPM image.
#[derive(Clone, Default, Debug, PartialEq)]
pub struct Canvas {
    /// The width of the canvas, in pixels.
    pub width: usize,

    /// The height of the canvas, in pixels.
    pub height: usize,

    pixels: Vec<Rgb>,
}

impl Canvas {
    /// Creates a black canvas.
    pub fn new(width: usize, height: usize) -> Canvas {
        Canvas {
            width,
            height,
            pixels: vec![Rgb::default(); width * height],
        }
    }

    /// Writes a color to a location on the canvas.
    ///
    /// Out-of-bounds pixels are ignored.
    ///
    /// ```
    /// # use sphere_tracer::color::Rgb;
    /// # use sphere_tracer::canvas::Canvas;
    /// let purple = Rgb::new(255, 0, 255);
    /// let mut canvas = Canvas::new(8, 8);
    /// canvas.write_pixel(4, 2, purple);
    /// assert_eq!(canvas.read_pixel(4, 2), Some(purple));
    /// ```
    pub fn write_pixel(&mut self, x: usize, y: usize, pixel: Rgb) {
        if x >= self.width || y >= self.height {
            return;
        }

        self.pixels[(y * self.width) + x] = pixel;
    }

    /// Reads a color from the canvas, or `None` if out-of-bounds.
    pub fn read_pixel(&self, x: usize, y: usize) -> Option<Rgb> {
        if x >= self.width || y >= self.height {
            return None;
        }

        Some(self.pixels[(y * self.width) + x])
    }

    /// Writes the canvas as a P3 (plain text) PPM image.
    ///
    /// No line in the pixel data exceeds 70 columns.
    pub fn write_ppm<W: Write>(&self, mut out: W) -> Result<(), Error> {
        writeln!(out, "P3")?;
        writeln!(out, "{} {}", self.width, self.height)?;
        writeln!(out, "255")?;

        for row in self.pixels.chunks(self.width.max(1)) {
            let mut col = 0;
            for pixel in row.iter() {
                for channel in [pixel.r, pixel.g, pixel.b].iter() {
                    let s = channel.to_string();

                    if col == 0 {
                        write!(out, "{}", s)?;
                        col = s.len();
                    } else if col + 1 + s.len() > 70 {
                        write!(out, "\n{}", s)?;
                        col = s.len();
                    } else {
                        write!(out, " {}", s)?;
                        col += 1 + s.len();
                    }
                }
            }
            writeln!(out)?;
        }

        out.flush()?;
        Ok(())
    }

    /// Saves the canvas to a PPM file.
    pub fn save(&self, path: &Path) -> Result<(), Error> {
        let out = BufWriter::new(File::create(path)?);
        self.write_ppm(out)
    }
}

/// An in-memory canvas is its own sink; presenting it does nothing.
impl PixelSink for Canvas {
    fn set_pixel(&mut self, x: usize, y: usize, color: Rgb) {
        self.write_pixel(x, y, color);
    }

    fn present(&mut self) -> Result<(), Error> {
        Ok(())
    }
}

/// A sink that saves every presented frame as a PPM file.
///
/// The first frame goes to `path` itself. Later frames get a numbered
/// suffix, so `out.ppm` is followed by `out_001.ppm`, `out_002.ppm` and so
/// on.
#[derive(Clone, Debug)]
pub struct PpmSink {
    pub canvas: Canvas,
    path: PathBuf,
    frames: usize,
}

impl PpmSink {
    pub fn new(width: usize, height: usize, path: impl Into<PathBuf>) -> PpmSink {
        PpmSink { canvas: Canvas::new(width, height), path: path.into(), frames: 0 }
    }

    /// Number of frames written so far.
    pub fn frames(&self) -> usize {
        self.frames
    }

    /// The file the given frame is saved to.
    pub fn frame_path(&self, frame: usize) -> PathBuf {
        if frame == 0 {
            return self.path.clone();
        }

        let stem = self.path.file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let name = match self.path.extension() {
            Some(ext) => format!("{}_{:03}.{}", stem, frame, ext.to_string_lossy()),
            None => format!("{}_{:03}", stem, frame),
        };

        self.path.with_file_name(name)
    }
}

impl PixelSink for PpmSink {
    fn set_pixel(&mut self, x: usize, y: usize, color: Rgb) {
        self.canvas.write_pixel(x, y, color);
    }

    fn present(&mut self) -> Result<(), Error> {
        let path = self.frame_path(self.frames);
        self.canvas.save(&path)?;
        info!(path = %path.display(), "saved frame");

        self.frames += 1;
        Ok(())
    }
}

#[test]
fn out_of_bounds_pixels_are_ignored() {
    let mut c = Canvas::new(2, 2);
    c.write_pixel(2, 0, Rgb::new(1, 2, 3));

    assert_eq!(c.read_pixel(2, 0), None);
    assert_eq!(c, Canvas::new(2, 2));
}

#[test]
fn ppm_header_and_pixels() {
    let mut c = Canvas::new(2, 2);
    c.set_pixel(0, 0, Rgb::new(255, 0, 0));
    c.set_pixel(1, 1, Rgb::new(128, 200, 255));

    let mut out = Vec::new();
    c.write_ppm(&mut out).unwrap();

    assert_eq!(String::from_utf8(out).unwrap(),
        "P3\n2 2\n255\n255 0 0 0 0 0\n0 0 0 128 200 255\n");
}

#[test]
fn ppm_lines_wrap_at_70_columns() {
    let mut c = Canvas::new(10, 2);
    for y in 0..2 {
        for x in 0..10 {
            c.write_pixel(x, y, Rgb::new(255, 204, 153));
        }
    }

    let mut out = Vec::new();
    c.write_ppm(&mut out).unwrap();
    let text = String::from_utf8(out).unwrap();
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(lines[3], "255 204 153 255 204 153 255 204 153 255 204 153 255 204 153 255 204");
    assert_eq!(lines[4], "153 255 204 153 255 204 153 255 204 153 255 204 153");
    assert!(lines.iter().all(|l| l.len() <= 70));
}

#[test]
fn frame_paths_are_numbered() {
    let sink = PpmSink::new(1, 1, "renders/out.ppm");

    assert_eq!(sink.frame_path(0), PathBuf::from("renders/out.ppm"));
    assert_eq!(sink.frame_path(1), PathBuf::from("renders/out_001.ppm"));
    assert_eq!(sink.frame_path(12), PathBuf::from("renders/out_012.ppm"));
}

#[test]
fn ppm_sink_saves_each_frame() {
    let dir = std::env::temp_dir().join("sphere_tracer_ppm_sink");
    std::fs::create_dir_all(&dir).unwrap();
    let mut sink = PpmSink::new(1, 1, dir.join("frame.ppm"));

    sink.set_pixel(0, 0, Rgb::new(1, 2, 3));
    sink.present().unwrap();
    sink.present().unwrap();

    let first = std::fs::read_to_string(dir.join("frame.ppm")).unwrap();
    assert_eq!(first, "P3\n1 1\n255\n1 2 3\n");
    assert!(dir.join("frame_001.ppm").exists());
    assert_eq!(sink.frames(), 2);

    let _ = std::fs::remove_dir_all(&dir);
}
