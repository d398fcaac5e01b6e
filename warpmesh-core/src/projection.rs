/// Camera, viewport and world-to-screen projection
use std::cell::RefCell;

use nalgebra::{Matrix4, Point2, Point3, Vector3};

/// Projection mode for rendering
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProjectionMode {
    Orthographic,
    Perspective,
}

/// Axis-aligned screen rectangle, origin at the top-left
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Viewport {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Viewport covering a whole surface
    pub fn full(size: DisplaySize) -> Self {
        Self::new(0.0, 0.0, size.width, size.height)
    }

    /// A zero-sized viewport means "use the display"
    pub fn is_unset(&self) -> bool {
        self.width == 0.0 && self.height == 0.0
    }

    pub fn aspect(&self) -> f32 {
        if self.height == 0.0 {
            1.0
        } else {
            self.width / self.height
        }
    }
}

/// Current size of the display surface
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DisplaySize {
    pub width: f32,
    pub height: f32,
}

impl DisplaySize {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Source of the full-surface size used when no viewport is set
pub trait DisplaySurface {
    fn display_size(&self) -> DisplaySize;
}

impl DisplaySurface for DisplaySize {
    fn display_size(&self) -> DisplaySize {
        *self
    }
}

impl<F> DisplaySurface for F
where
    F: Fn() -> DisplaySize,
{
    fn display_size(&self) -> DisplaySize {
        self()
    }
}

/// Pick the viewport for a projection.
///
/// A custom viewport wins unless it is unset; otherwise the display is
/// queried again on every call so resizes are picked up.
pub fn resolve_viewport(custom: Option<Viewport>, display: &dyn DisplaySurface) -> Viewport {
    match custom {
        Some(viewport) if !viewport.is_unset() => viewport,
        _ => Viewport::full(display.display_size()),
    }
}

/// Anything that maps a world-space point into a viewport
pub trait ScreenProjector {
    /// Screen position of `world`.
    ///
    /// No clipping is applied. Points on the camera plane have no finite
    /// projection and come back with non-finite coordinates.
    fn world_to_screen(&self, world: &Point3<f32>, viewport: &Viewport) -> Point2<f32>;
}

impl<P: ScreenProjector + ?Sized> ScreenProjector for RefCell<P> {
    fn world_to_screen(&self, world: &Point3<f32>, viewport: &Viewport) -> Point2<f32> {
        self.borrow().world_to_screen(world, viewport)
    }
}

/// Screen position plus normalized depth, for rasterizing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenPoint {
    pub x: f32,
    pub y: f32,
    pub depth: f32,
}

/// Camera configuration for 3D rendering
#[derive(Debug, Clone)]
pub struct Camera {
    pub position: Point3<f32>,
    pub target: Point3<f32>,
    pub up: Vector3<f32>,
    pub fov: f32,
    pub near: f32,
    pub far: f32,
    pub mode: ProjectionMode,
}

impl Camera {
    pub fn new() -> Self {
        Self {
            position: Point3::new(0.0, 0.0, 5.0),
            target: Point3::new(0.0, 0.0, 0.0),
            up: Vector3::new(0.0, 1.0, 0.0),
            fov: std::f32::consts::PI / 4.0, // 45 degrees
            near: 0.1,
            far: 100.0,
            mode: ProjectionMode::Perspective,
        }
    }

    /// Create the view matrix (camera transformation)
    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(&self.position, &self.target, &self.up)
    }

    /// Projection matrix for a given aspect ratio
    pub fn projection_matrix(&self, aspect: f32) -> Matrix4<f32> {
        match self.mode {
            ProjectionMode::Perspective => {
                Matrix4::new_perspective(aspect, self.fov, self.near, self.far)
            }
            ProjectionMode::Orthographic => {
                let height = (self.position - self.target).norm();
                let width = height * aspect;
                Matrix4::new_orthographic(
                    -width / 2.0,
                    width / 2.0,
                    -height / 2.0,
                    height / 2.0,
                    self.near,
                    self.far,
                )
            }
        }
    }

    fn to_viewport(ndc_x: f32, ndc_y: f32, viewport: &Viewport) -> (f32, f32) {
        let x = viewport.x + (ndc_x + 1.0) * 0.5 * viewport.width;
        let y = viewport.y + (1.0 - ndc_y) * 0.5 * viewport.height;
        (x, y)
    }

    /// Project a model-space point for rendering.
    ///
    /// Returns `None` for points behind the camera or outside the depth range.
    pub fn project(
        &self,
        point: &Point3<f32>,
        model: &Matrix4<f32>,
        viewport: &Viewport,
    ) -> Option<ScreenPoint> {
        let mvp = self.projection_matrix(viewport.aspect()) * self.view_matrix() * model;
        let clip = mvp * point.to_homogeneous();

        // Prevent division by near-zero w
        if clip.w < 1e-6 {
            return None;
        }

        let depth = clip.z / clip.w;
        if !(-1.0..=1.0).contains(&depth) {
            return None;
        }

        let (x, y) = Self::to_viewport(clip.x / clip.w, clip.y / clip.w, viewport);
        Some(ScreenPoint { x, y, depth })
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

/// Unclipped projection for picking.
///
/// Points behind the camera (negative w) are mirrored through the eye onto
/// the screen and can still be the nearest match; use [`Camera::project`]
/// when clipping is wanted.
impl ScreenProjector for Camera {
    fn world_to_screen(&self, world: &Point3<f32>, viewport: &Viewport) -> Point2<f32> {
        let view_projection = self.projection_matrix(viewport.aspect()) * self.view_matrix();
        let clip = view_projection * world.to_homogeneous();
        let (x, y) = Self::to_viewport(clip.x / clip.w, clip.y / clip.w, viewport);
        Point2::new(x, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camera_creation() {
        let camera = Camera::new();
        assert_eq!(camera.mode, ProjectionMode::Perspective);
        assert!(camera.view_matrix().norm() > 0.0);
    }

    #[test]
    fn test_target_projects_to_viewport_centre() {
        let camera = Camera::new();
        let viewport = Viewport::new(10.0, 20.0, 800.0, 600.0);
        let screen = camera.world_to_screen(&Point3::origin(), &viewport);
        assert!((screen.x - 410.0).abs() < 1e-3);
        assert!((screen.y - 320.0).abs() < 1e-3);
    }

    #[test]
    fn test_screen_y_grows_downward() {
        let camera = Camera::new();
        let viewport = Viewport::new(0.0, 0.0, 800.0, 600.0);
        let above = camera.world_to_screen(&Point3::new(0.0, 1.0, 0.0), &viewport);
        let right = camera.world_to_screen(&Point3::new(1.0, 0.0, 0.0), &viewport);
        assert!(above.y < 300.0);
        assert!(right.x > 400.0);
    }

    #[test]
    fn test_project_rejects_points_behind_camera() {
        let camera = Camera::new();
        let viewport = Viewport::new(0.0, 0.0, 80.0, 24.0);
        let behind = Point3::new(0.0, 0.0, 10.0);
        assert!(camera.project(&behind, &Matrix4::identity(), &viewport).is_none());
        let front = camera.project(&Point3::origin(), &Matrix4::identity(), &viewport);
        assert!(front.is_some());
    }

    #[test]
    fn test_resolve_viewport_prefers_custom() {
        let display = DisplaySize::new(1024.0, 768.0);
        let custom = Viewport::new(5.0, 5.0, 100.0, 50.0);
        assert_eq!(resolve_viewport(Some(custom), &display), custom);
        assert_eq!(
            resolve_viewport(Some(Viewport::default()), &display),
            Viewport::new(0.0, 0.0, 1024.0, 768.0)
        );
        assert_eq!(
            resolve_viewport(None, &display),
            Viewport::new(0.0, 0.0, 1024.0, 768.0)
        );
    }

    #[test]
    fn test_resolve_viewport_requeries_display() {
        let size = std::cell::Cell::new(DisplaySize::new(80.0, 24.0));
        let display = || size.get();
        assert_eq!(resolve_viewport(None, &display).width, 80.0);
        size.set(DisplaySize::new(120.0, 40.0));
        assert_eq!(resolve_viewport(None, &display).width, 120.0);
    }
}
