use tableau_stage::{Stage, StageFactory, StageTable};
use tableau_ui::widgets::Button;
use tableau_ui::{BoxLayout, ElementId, Engine};

const ROWS: usize = 30;
const COLS: usize = 40;

pub static STAGES: &StageTable<Engine> = &[
    ("start", start as StageFactory<Engine>),
    ("stress", stress as StageFactory<Engine>),
];

fn start() -> Box<dyn Stage<Engine>> {
    Box::new(Start)
}

fn stress() -> Box<dyn Stage<Engine>> {
    Box::new(Stress::default())
}

fn go(ui: &mut Engine, stage: &str) {
    if let Err(e) = ui.switch_stage(stage) {
        log::error!("{e}");
    }
}

/// A single button leading to the stress grid.
struct Start;

impl Stage<Engine> for Start {
    fn start(&mut self, ui: &mut Engine) {
        let button = ui.create(Button::new("Click me!", |ui, _| go(ui, "stress")));
        if let Err(e) = ui.insert("test", button) {
            log::error!("start: {e}");
        }
    }

    fn cleanup(&mut self, ui: &mut Engine) {
        if let Err(e) = ui.remove("test") {
            log::error!("start cleanup: {e}");
        }
    }
}

/// A grid of numbered buttons; any of them leads back.
#[derive(Default)]
struct Stress {
    grid: Option<ElementId>,
}

impl Stress {
    fn build(&mut self, ui: &mut Engine) -> tableau_core::Result<()> {
        let grid = ui.panel(BoxLayout::vertical());
        for i in 0..ROWS {
            let row = ui.panel(BoxLayout::horizontal());
            let buttons: Vec<_> = (0..COLS)
                .map(|j| {
                    let label = (j + i * COLS).to_string();
                    (None, ui.create(Button::new(label, |ui, _| go(ui, "start"))))
                })
                .collect();
            ui.add_elements(row, buttons)?;
            ui.add_child(grid, &i.to_string(), row)?;
        }
        ui.insert("stress", grid)?;
        self.grid = Some(grid);
        log::info!("stress grid: {} elements live", ui.live_count());
        Ok(())
    }
}

impl Stage<Engine> for Stress {
    fn start(&mut self, ui: &mut Engine) {
        if let Err(e) = self.build(ui) {
            log::error!("stress: {e}");
        }
    }

    fn cleanup(&mut self, ui: &mut Engine) {
        if let Some(grid) = self.grid.take()
            && let Err(e) = ui.delete(grid)
        {
            log::error!("stress cleanup: {e}");
        }
    }
}
