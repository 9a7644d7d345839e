//! Binary entry point: resolve paths, start file logging, build the catalog
//! and run the Ratatui event loop until the user exits.
use anyhow::Context;
use atrium_praise::{logging, run_app, App, AppPaths, Catalog};
use tracing::info;

fn main() -> anyhow::Result<()> {
    let paths = AppPaths::resolve()?;
    let _guard = logging::init(&paths.log_dir)?;

    let catalog = Catalog::builtin().context("built-in catalog is invalid")?;
    info!(
        songs = catalog.len(),
        export_dir = %paths.export_dir.display(),
        "atrium-praise v{} starting",
        env!("CARGO_PKG_VERSION")
    );

    let mut app = App::new(catalog, paths.export_dir);
    run_app(&mut app)
}
