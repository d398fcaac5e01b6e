/// Interactive vertex selection and nudging
///
/// The selector picks the vertex nearest to a pointer in screen space and
/// moves the selection by fixed steps from arrow keys. The mesh, camera and
/// display are owned by the host and passed in or weakly referenced.
use std::rc::{Rc, Weak};

use nalgebra::{Point2, Point3, Vector3};
use tracing::{debug, error, warn};

use crate::config::{validate_increment, SelectorConfig};
use crate::editing::Direction;
use crate::error::{SelectError, SelectResult};
use crate::events::{InputEvent, Key, ListenerId, VertexListeners, VertexMoved};
use crate::geometry::VertexStore;
use crate::picking::{centroid_distance_squared, nearest_vertices, Nearest};
use crate::projection::{resolve_viewport, DisplaySurface, ScreenProjector, Viewport};
use crate::selection::SelectionSet;

/// Marker colour for selection overlays
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Draws selection markers on behalf of the selector
pub trait MarkerRenderer {
    /// Draw a marker at a model-space position; the renderer applies the
    /// mesh transform itself.
    fn draw_marker(&mut self, position: &Point3<f32>, size: f32, color: Rgb);
}

pub struct VertexSelector {
    config: SelectorConfig,
    selection: SelectionSet,
    camera: Option<Weak<dyn ScreenProjector>>,
    custom_viewport: Option<Viewport>,
    display: Box<dyn DisplaySurface>,
    listeners: VertexListeners,
    pointer_events: bool,
    key_events: bool,
}

impl VertexSelector {
    pub fn new<D: DisplaySurface + 'static>(display: D) -> Self {
        Self::build(Box::new(display), SelectorConfig::default())
    }

    /// Selector with custom tunables; rejects an invalid increment
    pub fn with_config<D: DisplaySurface + 'static>(
        display: D,
        config: SelectorConfig,
    ) -> SelectResult<Self> {
        config.validate()?;
        Ok(Self::build(Box::new(display), config))
    }

    fn build(display: Box<dyn DisplaySurface>, config: SelectorConfig) -> Self {
        Self {
            config,
            selection: SelectionSet::new(),
            camera: None,
            custom_viewport: None,
            display,
            listeners: VertexListeners::new(),
            pointer_events: false,
            key_events: false,
        }
    }

    pub fn config(&self) -> &SelectorConfig {
        &self.config
    }

    pub fn increment(&self) -> f32 {
        self.config.increment
    }

    pub fn set_increment(&mut self, increment: f32) -> SelectResult<()> {
        validate_increment(increment)?;
        self.config.increment = increment;
        Ok(())
    }

    pub fn select_equidistant(&self) -> bool {
        self.config.select_equidistant
    }

    pub fn set_select_equidistant(&mut self, enabled: bool) {
        self.config.select_equidistant = enabled;
    }

    /// Keep a weak reference to the host's camera.
    ///
    /// The selector never keeps the camera alive; once the host drops it,
    /// picking behaves as if no camera were bound.
    pub fn bind_camera<P: ScreenProjector + 'static>(&mut self, camera: &Rc<P>) {
        let camera: Rc<dyn ScreenProjector> = camera.clone();
        self.camera = Some(Rc::downgrade(&camera));
    }

    pub fn unbind_camera(&mut self) {
        self.camera = None;
    }

    pub fn has_camera(&self) -> bool {
        self.camera().is_some()
    }

    fn camera(&self) -> Option<Rc<dyn ScreenProjector>> {
        self.camera.as_ref().and_then(Weak::upgrade)
    }

    /// Override the display-sized viewport. An unset (zero-sized) viewport
    /// behaves like `None`.
    pub fn set_custom_viewport(&mut self, viewport: Option<Viewport>) {
        self.custom_viewport = viewport;
    }

    pub fn custom_viewport(&self) -> Option<Viewport> {
        self.custom_viewport
    }

    /// Viewport used for the next projection
    pub fn effective_viewport(&self) -> Viewport {
        resolve_viewport(self.custom_viewport, self.display.as_ref())
    }

    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Pick the vertex (or tied vertices) nearest to a screen position.
    ///
    /// A non-additive pick replaces the selection, an additive one appends
    /// to it. If the mesh has no vertices the selection is left untouched.
    pub fn try_select_vertex<M>(
        &mut self,
        mesh: &M,
        screen_x: i32,
        screen_y: i32,
        additive: bool,
    ) -> SelectResult<Nearest>
    where
        M: VertexStore + ?Sized,
    {
        let camera = self.camera().ok_or(SelectError::NoCameraBound)?;
        let viewport = self.effective_viewport();
        let query = Point2::new(screen_x as f32, screen_y as f32);
        let nearest = nearest_vertices(
            mesh,
            camera.as_ref(),
            &viewport,
            query,
            self.config.select_equidistant,
        );

        if !nearest.is_empty() {
            if !additive {
                self.selection.clear();
            }
            self.selection.extend(nearest.indices.iter().copied());
        }

        debug!(
            x = screen_x,
            y = screen_y,
            additive,
            picked = ?nearest.indices,
            distance = nearest.distance(),
            "vertex pick"
        );
        Ok(nearest)
    }

    /// Pick and return the screen distance to the match.
    ///
    /// Returns `f32::INFINITY` when nothing changed: no camera is bound
    /// (logged as an error) or the mesh is empty.
    pub fn select_vertex<M>(
        &mut self,
        mesh: &M,
        screen_x: i32,
        screen_y: i32,
        additive: bool,
    ) -> f32
    where
        M: VertexStore + ?Sized,
    {
        match self.try_select_vertex(mesh, screen_x, screen_y, additive) {
            Ok(nearest) => nearest.distance(),
            Err(err) => {
                error!(%err, "vertex pick skipped");
                f32::INFINITY
            }
        }
    }

    /// Squared screen distance from a pointer to the projected mesh centroid
    pub fn distance_to_centroid_squared<M>(
        &self,
        mesh: &M,
        screen_x: i32,
        screen_y: i32,
    ) -> SelectResult<f32>
    where
        M: VertexStore + ?Sized,
    {
        let camera = self.camera().ok_or(SelectError::NoCameraBound)?;
        let viewport = self.effective_viewport();
        let query = Point2::new(screen_x as f32, screen_y as f32);
        Ok(centroid_distance_squared(mesh, camera.as_ref(), &viewport, query))
    }

    /// Move every selection entry one step, returning how many moves fired.
    ///
    /// Duplicated entries move (and notify) once per occurrence. Entries
    /// past the end of the mesh are skipped.
    pub fn nudge<M>(&mut self, mesh: &mut M, direction: Direction, modifier: bool) -> usize
    where
        M: VertexStore + ?Sized,
    {
        let displacement = direction.displacement(modifier, self.config.increment);
        if displacement == Vector3::zeros() {
            return 0;
        }

        let mut moved = 0;
        for index in self.selection.iter() {
            match mesh.translate_vertex(index, &displacement) {
                Some(position) => {
                    self.listeners.notify(&VertexMoved {
                        index,
                        displacement,
                        position,
                    });
                    moved += 1;
                }
                None => warn!(
                    index,
                    vertex_count = mesh.vertex_count(),
                    "selected vertex no longer exists"
                ),
            }
        }

        debug!(?direction, modifier, moved, "nudged selection");
        moved
    }

    /// Nudge from a key press; keys other than arrows are ignored
    pub fn on_directional_input<M>(&mut self, mesh: &mut M, key: Key, modifier: bool) -> usize
    where
        M: VertexStore + ?Sized,
    {
        match Direction::from_key(key) {
            Some(direction) => self.nudge(mesh, direction, modifier),
            None => 0,
        }
    }

    /// Ask `renderer` to mark every selected vertex at its model-space position
    pub fn draw_selected<M, R>(&self, mesh: &M, renderer: &mut R, point_size: f32, color: Rgb)
    where
        M: VertexStore + ?Sized,
        R: MarkerRenderer + ?Sized,
    {
        for index in self.selection.iter() {
            match mesh.vertex(index) {
                Some(position) => renderer.draw_marker(&position, point_size, color),
                None => warn!(index, "cannot draw missing selected vertex"),
            }
        }
    }

    pub fn subscribe<F>(&mut self, callback: F) -> ListenerId
    where
        F: FnMut(&VertexMoved) + 'static,
    {
        self.listeners.subscribe(callback)
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.listeners.unsubscribe(id)
    }

    /// Subscribe to (or drop) both pointer and key input
    pub fn set_events_enabled(&mut self, enabled: bool) {
        self.set_pointer_events_enabled(enabled);
        self.set_key_events_enabled(enabled);
    }

    pub fn set_pointer_events_enabled(&mut self, enabled: bool) {
        self.pointer_events = enabled;
        debug!(enabled, "pointer events");
    }

    pub fn set_key_events_enabled(&mut self, enabled: bool) {
        self.key_events = enabled;
        debug!(enabled, "key events");
    }

    pub fn pointer_events_enabled(&self) -> bool {
        self.pointer_events
    }

    pub fn key_events_enabled(&self) -> bool {
        self.key_events
    }

    /// Route a host event. Returns `true` when the event's stream is enabled
    /// and it was handled here.
    ///
    /// Pointer presses pick, additively while shift is held. Key presses
    /// nudge, with shift as the depth modifier.
    pub fn handle_input<M>(&mut self, mesh: &mut M, event: &InputEvent) -> bool
    where
        M: VertexStore + ?Sized,
    {
        match event {
            InputEvent::PointerPressed(press) if self.pointer_events => {
                self.select_vertex(&*mesh, press.x, press.y, press.modifiers.shift);
                true
            }
            InputEvent::KeyPressed(press) if self.key_events => {
                self.on_directional_input(mesh, press.key, press.modifiers.shift);
                true
            }
            _ => false,
        }
    }
}

impl std::fmt::Debug for VertexSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VertexSelector")
            .field("config", &self.config)
            .field("selection", &self.selection)
            .field("has_camera", &self.has_camera())
            .field("custom_viewport", &self.custom_viewport)
            .field("listeners", &self.listeners)
            .field("pointer_events", &self.pointer_events)
            .field("key_events", &self.key_events)
            .finish()
    }
}
