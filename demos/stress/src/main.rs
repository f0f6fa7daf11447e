//! Headless reproduction of the start/stress stage pair: a single button that
//! swaps in a 30x40 grid of buttons, any of which swaps back.

mod scripted;
mod stages;

use std::path::Path;

use tableau_core::{HeadlessBackend, Vec2};
use tableau_platform::{App, logging};

use scripted::Scripted;

const FRAMES: usize = 240;
const CLICK_PERIOD: usize = 30;

fn main() -> anyhow::Result<()> {
    logging::init(Some(Path::new("stress.log")))?;
    let frames = std::env::args()
        .nth(1)
        .and_then(|a| a.parse().ok())
        .unwrap_or(FRAMES);

    let app = App::new(stages::STAGES, "start").with_config_file("settings.toml");
    let surface = app.config.surface();
    let headless = HeadlessBackend::from_spec(&surface);
    headless.move_pointer(Vec2::new(surface.size.width / 2, surface.size.height / 2));

    let backend = Scripted::clicking(headless, CLICK_PERIOD, frames);
    app.run(Box::new(backend))
}
