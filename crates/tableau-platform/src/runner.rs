use std::panic::{AssertUnwindSafe, catch_unwind};
use std::path::PathBuf;

use anyhow::anyhow;
use tableau_core::Backend;
use tableau_devtools::Hud;
use tableau_stage::StageTable;
use tableau_ui::Engine;
use web_time::Instant;

use crate::AppConfig;

/// Title of the message box shown when the loop dies.
pub const CRASH_TITLE: &str = "crash";

/// An application: its stages, the one to start on, and its settings.
pub struct App {
    pub config: AppConfig,
    config_path: Option<PathBuf>,
    stages: &'static StageTable<Engine>,
    start: &'static str,
    frame_limit: Option<u64>,
}

impl App {
    pub fn new(stages: &'static StageTable<Engine>, start: &'static str) -> Self {
        Self {
            config: AppConfig::default(),
            config_path: None,
            stages,
            start,
            frame_limit: None,
        }
    }

    /// Loads settings from `path` and saves them back there on a clean exit.
    pub fn with_config_file(mut self, path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        self.config = AppConfig::load(&path);
        self.config_path = Some(path);
        self
    }

    pub fn with_config(mut self, config: AppConfig) -> Self {
        self.config = config;
        self
    }

    /// Stops after `frames` frames even if nothing asked to quit.
    pub fn with_frame_limit(mut self, frames: u64) -> Self {
        self.frame_limit = Some(frames);
        self
    }

    /// Runs the frame loop on `backend` until quit.
    ///
    /// Errors and panics out of the loop are logged and shown in a blocking
    /// message box before being returned, so `main` can exit non-zero.
    pub fn run(self, backend: Box<dyn Backend>) -> anyhow::Result<()> {
        log::info!(
            "starting `{}` on stage `{}` ({} stages registered)",
            self.config.caption,
            self.start,
            self.stages.len()
        );
        let mut ui = Engine::new(backend, self.config.style.clone());
        ui.install_stages(self.stages);
        let mut hud = Hud::new();
        hud.enabled = self.config.show_timings;

        let outcome = catch_unwind(AssertUnwindSafe(|| self.drive(&mut ui, &mut hud)));
        let failure = match outcome {
            Ok(Ok(())) => None,
            Ok(Err(e)) => Some(e),
            Err(payload) => {
                let msg = payload
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| payload.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unknown panic".to_string());
                Some(anyhow!("panicked: {msg}"))
            }
        };

        if let Some(e) = failure {
            let report = format!("{e:#}");
            log::error!("{report}");
            ui.backend_mut().message_box(CRASH_TITLE, &report);
            return Err(e);
        }

        log::info!("quit after {} frames", ui.frames());
        if let Some(path) = &self.config_path {
            if let Err(e) = self.config.save(path) {
                log::warn!("settings not saved: {e:#}");
            }
        }
        Ok(())
    }

    fn drive(&self, ui: &mut Engine, hud: &mut Hud) -> anyhow::Result<()> {
        ui.boot(self.start)?;
        let budget = self.config.frame_budget();

        while ui.is_running() {
            let started = Instant::now();
            let metrics = ui.tick()?;
            hud.record(metrics);
            hud.overlay(ui.backend_mut())?;
            ui.present()?;

            if self.frame_limit.is_some_and(|limit| ui.frames() >= limit) {
                log::debug!("frame limit reached");
                break;
            }
            if let Some(budget) = budget {
                let spent = started.elapsed();
                if spent < budget {
                    std::thread::sleep(budget - spent);
                }
            }
        }
        Ok(())
    }
}
