//! Pasta Bounce entry point
//!
//! Loads settings and the background asset, opens the window and runs the
//! frame loop until the window is closed.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use pasta_bounce::app::{self, FrameClock, SimContext};
use pasta_bounce::asset::BackgroundImage;
use pasta_bounce::platform::WinitPlatform;
use pasta_bounce::renderer::RenderState;
use pasta_bounce::{DemoResult, Settings};

fn main() -> ExitCode {
    env_logger::init();
    log::info!("Pasta Bounce starting...");

    match run() {
        Ok(()) => {
            log::info!("Exited cleanly");
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> DemoResult<()> {
    let config_path = std::env::args_os().nth(1).map(PathBuf::from);
    let settings = Settings::load(config_path.as_deref())?;

    // Missing asset is fatal before any window appears
    let background = Arc::new(BackgroundImage::load(&settings.asset_path)?);

    let (mut platform, window) = WinitPlatform::open(&settings.window)?;
    let mut renderer = RenderState::new(window, &background)?;
    let mut ctx = SimContext::new(&settings, background);
    let mut pacer = FrameClock::new();

    app::run(&mut ctx, &mut platform, &mut renderer, &mut pacer)
}
