/// Terminal host for interactive mesh warping
use crossterm::{
    cursor,
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};
use nalgebra::Vector3;
use std::cell::{Cell, RefCell};
use std::io::{self, stdout, Write};
use std::rc::Rc;
use std::time::Duration;
use warpmesh_core::{
    Camera, DisplaySize, InputEvent, Mesh, Orientation, Rgb, Transform, VertexSelector,
};

pub mod input;
pub mod renderer;

pub use input::to_input_event;
pub use renderer::AsciiRenderer;

const MARKER_SIZE: f32 = 1.0;
const MARKER_COLOR: Rgb = Rgb::new(255, 220, 0);
const ROTATE_STEP: f32 = 0.1;
const HELP: &str = "click/shift-click=pick arrows=nudge shift+up/down=depth \
                    WASD=rotate +/-=step e=ties c=clear t=input q=quit";

fn terminal_size() -> DisplaySize {
    terminal::size()
        .map(|(w, h)| DisplaySize::new(w as f32, h as f32))
        .unwrap_or_default()
}

/// Main application struct for warping a mesh in the terminal
pub struct TerminalApp {
    mesh: Mesh,
    orientation: Orientation,
    camera: Rc<RefCell<Camera>>,
    selector: VertexSelector,
    renderer: AsciiRenderer,
    moves: Rc<Cell<usize>>,
    centroid_distance: Option<f32>,
    running: bool,
}

impl TerminalApp {
    pub fn new(mesh: Mesh) -> Self {
        let camera = Rc::new(RefCell::new(Camera::new()));
        let mut selector = VertexSelector::new(terminal_size);
        selector.bind_camera(&camera);
        selector.set_events_enabled(true);

        let moves = Rc::new(Cell::new(0));
        let counter = Rc::clone(&moves);
        selector.subscribe(move |_| counter.set(counter.get() + 1));

        let renderer = AsciiRenderer::for_viewport(&selector.effective_viewport());

        Self {
            mesh,
            orientation: Orientation::zero(),
            camera,
            selector,
            renderer,
            moves,
            centroid_distance: None,
            running: true,
        }
    }

    pub fn run(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(stdout(), terminal::EnterAlternateScreen, EnableMouseCapture, cursor::Hide)?;

        let result = self.main_loop();

        // Cleanup
        terminal::disable_raw_mode()?;
        execute!(stdout(), DisableMouseCapture, terminal::LeaveAlternateScreen, cursor::Show)?;

        result
    }

    fn main_loop(&mut self) -> io::Result<()> {
        self.render()?;
        while self.running {
            // Redraw only after input; nothing animates on its own
            if event::poll(Duration::from_millis(250))? {
                let event = event::read()?;
                self.handle_event(&event);
                self.render()?;
            }
        }
        Ok(())
    }

    /// Apply one terminal event to the app and selector
    pub fn handle_event(&mut self, event: &Event) {
        match event {
            Event::Resize(..) => {
                self.resize();
                return;
            }
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                if self.handle_app_key(key.code) {
                    return;
                }
            }
            _ => {}
        }

        let Some(input) = to_input_event(event) else {
            return;
        };
        if let InputEvent::PointerPressed(press) = input {
            self.centroid_distance = self
                .selector
                .distance_to_centroid_squared(&self.mesh, press.x, press.y)
                .ok()
                .map(f32::sqrt);
        }
        self.selector.handle_input(&mut self.mesh, &input);
    }

    /// Keys the host keeps for itself; returns `false` to pass the key on
    fn handle_app_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => self.running = false,
            KeyCode::Char('w') => self.rotate(ROTATE_STEP, 0.0),
            KeyCode::Char('s') => self.rotate(-ROTATE_STEP, 0.0),
            KeyCode::Char('a') => self.rotate(0.0, -ROTATE_STEP),
            KeyCode::Char('d') => self.rotate(0.0, ROTATE_STEP),
            KeyCode::Char('+') | KeyCode::Char('=') => self.scale_increment(2.0),
            KeyCode::Char('-') => self.scale_increment(0.5),
            KeyCode::Char('e') => {
                let enabled = !self.selector.select_equidistant();
                self.selector.set_select_equidistant(enabled);
            }
            KeyCode::Char('c') => self.selector.clear_selection(),
            KeyCode::Char('t') => {
                let enabled = !self.events_enabled();
                self.selector.set_events_enabled(enabled);
            }
            _ => return false,
        }
        true
    }

    fn events_enabled(&self) -> bool {
        self.selector.pointer_events_enabled() && self.selector.key_events_enabled()
    }

    fn rotate(&mut self, dx: f32, dy: f32) {
        self.orientation.rotate(dx, dy, 0.0);
        self.mesh.transform = Transform::model_matrix(&Vector3::zeros(), &self.orientation, 1.0);
    }

    fn scale_increment(&mut self, factor: f32) {
        let increment = self.selector.increment() * factor;
        if let Err(err) = self.selector.set_increment(increment) {
            tracing::warn!(%err, "increment unchanged");
        }
    }

    fn resize(&mut self) {
        self.renderer = AsciiRenderer::for_viewport(&self.selector.effective_viewport());
    }

    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    pub fn selector(&self) -> &VertexSelector {
        &self.selector
    }

    pub fn moves(&self) -> usize {
        self.moves.get()
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Draw mesh, vertices and selection markers into the back buffer
    pub fn compose(&mut self) {
        let camera = self.camera.borrow();
        self.renderer.clear();
        self.renderer.render_mesh(&self.mesh, &camera);
        self.renderer.render_vertices(&self.mesh, &camera);
        let mut markers = self.renderer.markers(&camera, &self.mesh.transform);
        self.selector
            .draw_selected(&self.mesh, &mut markers, MARKER_SIZE, MARKER_COLOR);
    }

    fn status_line(&self) -> String {
        let centroid = self
            .centroid_distance
            .map_or_else(|| "-".to_string(), |d| format!("{d:.1}"));
        format!(
            "warpmesh | selected: {} | step: {} | ties: {} | input: {} | moves: {} | centroid: {} | {}",
            self.selector.selection().len(),
            self.selector.increment(),
            if self.selector.select_equidistant() { "all" } else { "first" },
            if self.events_enabled() { "on" } else { "off" },
            self.moves.get(),
            centroid,
            HELP,
        )
    }

    fn render(&mut self) -> io::Result<()> {
        self.compose();

        let mut stdout = stdout();
        queue!(stdout, cursor::MoveTo(0, 0), Clear(ClearType::All))?;
        self.renderer.draw(&mut stdout)?;

        let (width, _) = self.renderer.size();
        let status: String = self.status_line().chars().take(width).collect();
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            SetForegroundColor(Color::Yellow),
            Print(status),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }
}
