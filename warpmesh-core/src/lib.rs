/// warpmesh core - vertex picking and nudging for projection-mapping meshes
///
/// This library provides the mesh storage, camera projection and the
/// interactive vertex selector used by warpmesh hosts. It owns no window
/// or event loop; hosts forward pointer and key presses to the selector.

pub mod config;
pub mod editing;
pub mod error;
pub mod events;
pub mod geometry;
pub mod picking;
pub mod projection;
pub mod selection;
pub mod selector;
pub mod stl;
pub mod transform;

// Re-export commonly used types
pub use config::SelectorConfig;
pub use editing::Direction;
pub use error::{SelectError, SelectResult, StlError};
pub use events::{InputEvent, Key, KeyPress, ListenerId, Modifiers, PointerPress, VertexMoved};
pub use geometry::{Mesh, VertexStore};
pub use picking::Nearest;
pub use projection::{
    Camera, DisplaySize, DisplaySurface, ProjectionMode, ScreenProjector, Viewport,
};
pub use selection::SelectionSet;
pub use selector::{MarkerRenderer, Rgb, VertexSelector};
pub use transform::{Orientation, Transform};
