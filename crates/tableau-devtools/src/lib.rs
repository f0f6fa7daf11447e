use std::time::Duration;

use web_time::Instant;

use tableau_core::{Backend, Color, Picture, Result, Size, Vec2};
use tableau_ui::FrameMetrics;

const LINE_PX: u32 = 16;

/// Frame timing overlay: one line per pipeline phase, drawn bottom-left,
/// with a smoothed fps counter above them.
pub struct Hud {
    pub enabled: bool,
    frame_count: u64,
    last_frame: Option<Instant>,
    fps_smooth: f32,
    pub metrics: Option<FrameMetrics>,
}

impl Default for Hud {
    fn default() -> Self {
        Self::new()
    }
}

impl Hud {
    pub fn new() -> Self {
        Self {
            enabled: false,
            frame_count: 0,
            last_frame: None,
            fps_smooth: 0.0,
            metrics: None,
        }
    }

    pub fn toggle(&mut self) {
        self.enabled = !self.enabled;
        log::debug!("timing hud {}", if self.enabled { "on" } else { "off" });
    }

    pub fn fps(&self) -> f32 {
        self.fps_smooth
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Stores this frame's metrics and folds the time since the previous
    /// call into the fps average.
    pub fn record(&mut self, metrics: FrameMetrics) {
        let now = Instant::now();
        let dt = self.last_frame.replace(now).map(|prev| now - prev);
        self.record_with(metrics, dt);
    }

    pub fn record_with(&mut self, metrics: FrameMetrics, dt: Option<Duration>) {
        self.frame_count += 1;
        self.metrics = Some(metrics);
        let Some(dt) = dt.map(|d| d.as_secs_f32()).filter(|d| *d > 0.0) else {
            return;
        };
        let fps = 1.0 / dt;
        // simple EMA
        let a = 0.2;
        self.fps_smooth = if self.fps_smooth == 0.0 {
            fps
        } else {
            (1.0 - a) * self.fps_smooth + a * fps
        };
    }

    /// Overlay text, bottom line first.
    pub fn lines(&self) -> Vec<String> {
        let mut lines: Vec<String> = self
            .metrics
            .iter()
            .flat_map(|m| m.phases())
            .map(|(name, d)| format!("{name}: {:.2} ms", d.as_secs_f64() * 1000.0))
            .collect();
        lines.push(format!("fps: {:.1}", self.fps_smooth));
        lines
    }

    pub fn overlay(&self, backend: &mut dyn Backend) -> Result<()> {
        if !self.enabled {
            return Ok(());
        }
        let height = backend.size().height;
        for (i, line) in self.lines().into_iter().enumerate() {
            let size = backend.text_size(&line, LINE_PX);
            let at = Vec2::new(0, height - size.height * (i as i32 + 1));
            let picture =
                Picture::new(Size::new(size.width, size.height)).with_text(Vec2::ZERO, line, Color::WHITE, LINE_PX);
            backend.draw(&picture, at)?;
        }
        Ok(())
    }
}
