mod bootstrap;
mod prompt;
mod session;

use std::io;
use std::path::PathBuf;

use anyhow::Result;
use explorer_core::cities::CityRegistry;
use explorer_core::settings::Settings;

fn main() -> Result<()> {
    let settings = Settings::load_with_last_used();

    bootstrap::ensure_directories()?;
    bootstrap::setup_logging(&settings.log_level, settings.log_file.as_ref())?;

    tracing::info!("Bikeshare Explorer v{} starting", env!("CARGO_PKG_VERSION"));

    let data_dir = settings
        .data_dir
        .clone()
        .or_else(bootstrap::discover_data_dir)
        .unwrap_or_else(|| PathBuf::from("data"));
    tracing::info!("Using data directory {}", data_dir.display());

    let registry = CityRegistry::new(&data_dir);

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut input = stdin.lock();
    let mut output = stdout.lock();

    session::run(&registry, &mut input, &mut output)?;

    tracing::info!("Session ended");
    Ok(())
}
