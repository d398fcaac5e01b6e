/// ASCII rasterizer for terminal rendering
use crossterm::{
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use nalgebra::{Matrix4, Point3, Vector3};
use std::io::Write;
use warpmesh_core::projection::ScreenPoint;
use warpmesh_core::{Camera, MarkerRenderer, Mesh, Rgb, Viewport};

/// Character luminosity ramp for shading (darkest to lightest)
const LUMINOSITY_RAMP: &[char] = &[' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];

const VERTEX_CHAR: char = 'o';
const MARKER_CHAR: char = '@';

/// ASCII renderer that converts meshes to terminal characters
pub struct AsciiRenderer {
    width: usize,
    height: usize,
    depth_buffer: Vec<f32>,
    char_buffer: Vec<char>,
    color_buffer: Vec<Color>,
}

impl AsciiRenderer {
    pub fn new(width: usize, height: usize) -> Self {
        let size = width * height;
        Self {
            width,
            height,
            depth_buffer: vec![f32::INFINITY; size],
            char_buffer: vec![' '; size],
            color_buffer: vec![Color::Reset; size],
        }
    }

    /// Renderer matching a viewport, one cell per screen unit
    pub fn for_viewport(viewport: &Viewport) -> Self {
        Self::new(
            viewport.width.max(0.0) as usize,
            viewport.height.max(0.0) as usize,
        )
    }

    pub fn size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub fn clear(&mut self) {
        self.depth_buffer.fill(f32::INFINITY);
        self.char_buffer.fill(' ');
        self.color_buffer.fill(Color::Reset);
    }

    pub fn cell(&self, x: usize, y: usize) -> Option<char> {
        (x < self.width && y < self.height).then(|| self.char_buffer[y * self.width + x])
    }

    fn viewport(&self) -> Viewport {
        Viewport::new(0.0, 0.0, self.width as f32, self.height as f32)
    }

    fn put(&mut self, x: i32, y: i32, character: char, color: Color) {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return;
        }
        let idx = y as usize * self.width + x as usize;
        self.char_buffer[idx] = character;
        self.color_buffer[idx] = color;
    }

    /// Shade every face of the mesh
    pub fn render_mesh(&mut self, mesh: &Mesh, camera: &Camera) {
        let viewport = self.viewport();
        let light_dir = Vector3::new(0.0, 0.0, 1.0);

        for face in &mesh.faces {
            let Some(normal) = mesh.face_normal(face) else {
                continue;
            };
            let corners: Option<Vec<ScreenPoint>> = face
                .iter()
                .map(|&i| {
                    let vertex = mesh.vertices.get(i)?;
                    camera.project(vertex, &mesh.transform, &viewport)
                })
                .collect();
            // Faces with a clipped corner are skipped
            let Some(corners) = corners else {
                continue;
            };

            // Warp grids are viewed from both sides
            let normal = mesh.transform.transform_vector(&normal);
            let brightness = normal.try_normalize(1e-12).map_or(0.0, |n| n.dot(&light_dir).abs());
            let char_index = (brightness * (LUMINOSITY_RAMP.len() - 1) as f32) as usize;
            let character = LUMINOSITY_RAMP[char_index.min(LUMINOSITY_RAMP.len() - 1)];

            self.rasterize_triangle(&corners, character);
        }
    }

    /// Overlay every vertex so there is something to click on
    pub fn render_vertices(&mut self, mesh: &Mesh, camera: &Camera) {
        let viewport = self.viewport();
        for vertex in &mesh.vertices {
            if let Some(p) = camera.project(vertex, &mesh.transform, &viewport) {
                self.put(p.x.floor() as i32, p.y.floor() as i32, VERTEX_CHAR, Color::DarkCyan);
            }
        }
    }

    /// Marker pass projecting through `camera` and `model`
    pub fn markers<'a>(
        &'a mut self,
        camera: &'a Camera,
        model: &'a Matrix4<f32>,
    ) -> MarkerPass<'a> {
        MarkerPass {
            renderer: self,
            camera,
            model,
        }
    }

    fn rasterize_triangle(&mut self, coords: &[ScreenPoint], character: char) {
        let (v0, v1, v2) = (coords[0], coords[1], coords[2]);

        // Bounding box clipped to the screen
        let min_x = v0.x.min(v1.x).min(v2.x).floor().max(0.0) as i32;
        let max_x = (v0.x.max(v1.x).max(v2.x).ceil() as i32).min(self.width as i32 - 1);
        let min_y = v0.y.min(v1.y).min(v2.y).floor().max(0.0) as i32;
        let max_y = (v0.y.max(v1.y).max(v2.y).ceil() as i32).min(self.height as i32 - 1);

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let px = x as f32 + 0.5;
                let py = y as f32 + 0.5;

                let Some((w0, w1, w2)) =
                    barycentric((v0.x, v0.y), (v1.x, v1.y), (v2.x, v2.y), (px, py))
                else {
                    continue;
                };
                if w0 < 0.0 || w1 < 0.0 || w2 < 0.0 {
                    continue;
                }

                let depth = w0 * v0.depth + w1 * v1.depth + w2 * v2.depth;
                let idx = y as usize * self.width + x as usize;
                if depth < self.depth_buffer[idx] {
                    self.depth_buffer[idx] = depth;
                    self.char_buffer[idx] = character;
                    self.color_buffer[idx] = shade_color(character);
                }
            }
        }
    }

    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        for y in 0..self.height {
            for x in 0..self.width {
                let idx = y * self.width + x;
                writer.queue(SetForegroundColor(self.color_buffer[idx]))?;
                writer.queue(Print(self.char_buffer[idx]))?;
            }
            if y + 1 < self.height {
                writer.queue(Print("\r\n"))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

/// Draws selection markers into an [`AsciiRenderer`]
pub struct MarkerPass<'a> {
    renderer: &'a mut AsciiRenderer,
    camera: &'a Camera,
    model: &'a Matrix4<f32>,
}

impl MarkerRenderer for MarkerPass<'_> {
    fn draw_marker(&mut self, position: &Point3<f32>, size: f32, color: Rgb) {
        let viewport = self.renderer.viewport();
        let Some(centre) = self.camera.project(position, self.model, &viewport) else {
            return;
        };
        let color = Color::Rgb {
            r: color.r,
            g: color.g,
            b: color.b,
        };

        // Cells are roughly twice as tall as wide
        let radius = size.max(0.0).floor() as i32;
        let (cx, cy) = (centre.x.floor() as i32, centre.y.floor() as i32);
        for dy in -radius..=radius {
            for dx in -2 * radius..=2 * radius {
                if dx * dx + 4 * dy * dy <= 4 * radius * radius {
                    self.renderer.put(cx + dx, cy + dy, MARKER_CHAR, color);
                }
            }
        }
    }
}

fn shade_color(c: char) -> Color {
    match c {
        ' ' | '.' | ':' => Color::DarkGrey,
        '-' | '=' => Color::Grey,
        '+' | '*' => Color::White,
        _ => Color::Cyan,
    }
}

/// Calculate barycentric coordinates for a point in a triangle
fn barycentric(
    v0: (f32, f32),
    v1: (f32, f32),
    v2: (f32, f32),
    p: (f32, f32),
) -> Option<(f32, f32, f32)> {
    let denom = (v1.1 - v2.1) * (v0.0 - v2.0) + (v2.0 - v1.0) * (v0.1 - v2.1);

    if denom.abs() < 1e-6 {
        return None;
    }

    let w0 = ((v1.1 - v2.1) * (p.0 - v2.0) + (v2.0 - v1.0) * (p.1 - v2.1)) / denom;
    let w1 = ((v2.1 - v0.1) * (p.0 - v2.0) + (v0.0 - v2.0) * (p.1 - v2.1)) / denom;
    let w2 = 1.0 - w0 - w1;

    Some((w0, w1, w2))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_covers_centre() {
        let mut renderer = AsciiRenderer::new(80, 24);
        let mesh = Mesh::grid(2, 2, 2.0, 2.0);
        renderer.render_mesh(&mesh, &Camera::new());
        assert_eq!(renderer.cell(40, 12), Some('@'));
        assert_eq!(renderer.cell(0, 0), Some(' '));
    }

    #[test]
    fn test_marker_sizes() {
        let mut renderer = AsciiRenderer::new(80, 24);
        let camera = Camera::new();
        let model = Matrix4::identity();
        let yellow = Rgb::new(255, 255, 0);

        renderer
            .markers(&camera, &model)
            .draw_marker(&Point3::origin(), 0.5, yellow);
        assert_eq!(renderer.cell(40, 12), Some(MARKER_CHAR));
        assert_eq!(renderer.cell(41, 12), Some(' '));

        renderer.clear();
        renderer
            .markers(&camera, &model)
            .draw_marker(&Point3::origin(), 1.0, yellow);
        assert_eq!(renderer.cell(42, 12), Some(MARKER_CHAR));
        assert_eq!(renderer.cell(40, 13), Some(MARKER_CHAR));
        assert_eq!(renderer.cell(43, 12), Some(' '));
    }

    #[test]
    fn test_barycentric_degenerate() {
        assert!(barycentric((0.0, 0.0), (1.0, 1.0), (2.0, 2.0), (1.0, 1.0)).is_none());
    }
}
