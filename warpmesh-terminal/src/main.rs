/// warpmesh terminal - pick and nudge mesh vertices with mouse and arrows
///
/// Usage: warpmesh-terminal [file.stl]
///
/// Without a file a planar warp grid is loaded. Set WARPMESH_LOG to a file
/// path to capture logs (filtered by RUST_LOG, default "warn").

use std::env;
use std::fs;
use std::io;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;
use warpmesh_core::{stl, Mesh};
use warpmesh_terminal::TerminalApp;

fn init_logging() -> io::Result<()> {
    // The alternate screen owns the terminal, so logs only go to a file
    let Ok(path) = env::var("WARPMESH_LOG") else {
        return Ok(());
    };
    let file = fs::File::create(path)?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn load_mesh(path: &str) -> io::Result<Mesh> {
    let data = fs::read(path).map_err(|e| {
        io::Error::new(e.kind(), format!("Failed to read STL file {path}: {e}"))
    })?;
    stl::parse_stl(&data).map_err(|e| {
        io::Error::new(io::ErrorKind::InvalidData, format!("Failed to parse STL: {e}"))
    })
}

fn main() -> io::Result<()> {
    init_logging()?;

    let mesh = match env::args().nth(1) {
        Some(path) => load_mesh(&path)?,
        None => Mesh::grid(8, 6, 4.0, 3.0),
    };
    tracing::info!(
        vertices = mesh.vertices.len(),
        faces = mesh.faces.len(),
        "mesh loaded"
    );

    let mut app = TerminalApp::new(mesh);
    app.run()?;

    println!("warpmesh: {} vertex moves", app.moves());
    Ok(())
}
