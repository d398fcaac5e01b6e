/// Host input events and "vertex moved" notifications
///
/// Everything is dispatched synchronously on the caller's thread. Listeners
/// run in registration order, once per moved vertex.
use nalgebra::{Point3, Vector3};

/// Modifier keys held during an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub shift: bool,
}

impl Modifiers {
    pub const NONE: Self = Self { shift: false };
    pub const SHIFT: Self = Self { shift: true };
}

/// Logical key code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    Char(char),
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerPress {
    pub x: i32,
    pub y: i32,
    pub modifiers: Modifiers,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeyPress {
    pub key: Key,
    pub modifiers: Modifiers,
}

/// Input forwarded from the host's event loop
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    PointerPressed(PointerPress),
    KeyPressed(KeyPress),
}

/// A selected vertex was nudged
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VertexMoved {
    pub index: usize,
    pub displacement: Vector3<f32>,
    /// Model-space position after the move
    pub position: Point3<f32>,
}

/// Handle returned by [`VertexListeners::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Callback = Box<dyn FnMut(&VertexMoved)>;

/// Registered observers of vertex moves
#[derive(Default)]
pub struct VertexListeners {
    next_id: u64,
    listeners: Vec<(ListenerId, Callback)>,
}

impl VertexListeners {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&mut self, callback: F) -> ListenerId
    where
        F: FnMut(&VertexMoved) + 'static,
    {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(callback)));
        id
    }

    /// Returns `false` if the id was not registered
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener, _)| *listener != id);
        self.listeners.len() != before
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    pub fn notify(&mut self, event: &VertexMoved) {
        tracing::trace!(index = event.index, listeners = self.listeners.len(), "vertex moved");
        for (_, callback) in &mut self.listeners {
            callback(event);
        }
    }
}

impl std::fmt::Debug for VertexListeners {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VertexListeners")
            .field("count", &self.listeners.len())
            .finish()
    }
}
