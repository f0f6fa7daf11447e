mod common;

use std::cell::RefCell;
use std::time::Duration;

use common::{engine, frame};
use tableau_ui::widgets::Label;
use tableau_ui::{Engine, Stage, StageError, StageFactory, StageTable};

thread_local! {
    static JOURNAL: RefCell<Vec<String>> = const { RefCell::new(Vec::new()) };
}

fn note(line: impl Into<String>) {
    JOURNAL.with(|j| j.borrow_mut().push(line.into()));
}

fn journal() -> Vec<String> {
    JOURNAL.with(|j| j.borrow().clone())
}

/// Shows a label under its own name while active.
struct Screen(&'static str);

impl Stage<Engine> for Screen {
    fn start(&mut self, ui: &mut Engine) {
        note(format!("start:{}", self.0));
        let label = ui.create(Label::new(self.0));
        ui.insert(self.0, label).unwrap();
    }

    fn cleanup(&mut self, ui: &mut Engine) {
        note(format!("cleanup:{}", self.0));
        ui.remove(self.0).unwrap();
    }

    fn pause(&mut self, _ui: &mut Engine) {
        note(format!("pause:{}", self.0));
    }

    fn resume(&mut self, _ui: &mut Engine) {
        note(format!("resume:{}", self.0));
    }
}

/// Navigates away from inside its own update.
struct Hop;

impl Stage<Engine> for Hop {
    fn start(&mut self, _ui: &mut Engine) {
        note("start:hop");
    }

    fn update(&mut self, _dt: Duration, ui: &mut Engine) {
        note("update:hop");
        ui.switch_stage("title").unwrap();
        note("update:hop:returned");
    }

    fn cleanup(&mut self, _ui: &mut Engine) {
        note("cleanup:hop");
    }
}

fn outcome(result: Result<(), StageError>) -> String {
    match result {
        Ok(()) => "ok".into(),
        Err(e) => e.to_string(),
    }
}

/// On its first update, navigates three ways and records what each call
/// reported.
#[derive(Default)]
struct Navigator {
    ran: bool,
}

impl Stage<Engine> for Navigator {
    fn start(&mut self, _ui: &mut Engine) {
        note("start:navigator");
    }

    fn update(&mut self, _dt: Duration, ui: &mut Engine) {
        if std::mem::replace(&mut self.ran, true) {
            return;
        }
        note(format!("switch missing: {}", outcome(ui.switch_stage("missing"))));
        note(format!("transfer detour: {}", outcome(ui.transfer_stage("detour", None))));
        note(format!(
            "transfer navigator: {}",
            outcome(ui.transfer_stage("navigator", None))
        ));
    }

    fn pause(&mut self, _ui: &mut Engine) {
        note("pause:navigator");
    }

    fn resume(&mut self, _ui: &mut Engine) {
        note("resume:navigator");
    }
}

/// Returns from inside its own update, twice.
struct Detour;

impl Stage<Engine> for Detour {
    fn start(&mut self, _ui: &mut Engine) {
        note("start:detour");
    }

    fn update(&mut self, _dt: Duration, ui: &mut Engine) {
        note(format!("return: {}", ui.return_stage()));
        note(format!("return again: {}", ui.return_stage()));
    }

    fn cleanup(&mut self, _ui: &mut Engine) {
        note("cleanup:detour");
    }
}

fn navigator() -> Box<dyn Stage<Engine>> {
    Box::new(Navigator::default())
}

fn detour() -> Box<dyn Stage<Engine>> {
    Box::new(Detour)
}

fn title() -> Box<dyn Stage<Engine>> {
    Box::new(Screen("title"))
}

fn settings() -> Box<dyn Stage<Engine>> {
    Box::new(Screen("settings"))
}

fn hop() -> Box<dyn Stage<Engine>> {
    Box::new(Hop)
}

static STAGES: &StageTable<Engine> = &[
    ("title", title as StageFactory<Engine>),
    ("settings", settings as StageFactory<Engine>),
    ("hop", hop as StageFactory<Engine>),
    ("navigator", navigator as StageFactory<Engine>),
    ("detour", detour as StageFactory<Engine>),
];

#[test]
fn test_switch_cleans_up_the_previous_stage() {
    let (mut ui, _) = engine(200, 100);
    ui.install_stages(STAGES);
    ui.boot("title").unwrap();
    frame(&mut ui);
    assert!(ui.contains("title"));

    ui.switch_stage("settings").unwrap();
    frame(&mut ui);

    assert_eq!(ui.current_stage(), Some("settings"));
    assert!(!ui.contains("title"));
    assert!(ui.contains("settings"));
    assert_eq!(journal(), vec!["start:title", "cleanup:title", "start:settings"]);
}

#[test]
fn test_transfer_and_return_runs_resume_callback_once() {
    let (mut ui, _) = engine(200, 100);
    ui.install_stages(STAGES);
    ui.boot("title").unwrap();

    ui.transfer_stage("settings", Some(Box::new(|ui: &mut Engine| ui.quit())))
        .unwrap();
    frame(&mut ui);
    assert!(ui.contains("title"));
    assert!(ui.contains("settings"));
    assert_eq!(ui.stages().suspended(), &["title".to_string()]);

    assert!(ui.return_stage());
    frame(&mut ui);
    assert!(!ui.is_running());
    assert_eq!(ui.current_stage(), Some("title"));
    assert!(!ui.contains("settings"));
    assert!(!ui.return_stage());

    assert_eq!(
        journal(),
        vec![
            "start:title",
            "pause:title",
            "start:settings",
            "cleanup:settings",
            "resume:title",
        ]
    );
}

#[test]
fn test_navigation_from_a_stage_hook_is_deferred() {
    let (mut ui, _) = engine(200, 100);
    ui.install_stages(STAGES);
    ui.boot("hop").unwrap();
    frame(&mut ui);

    assert_eq!(ui.current_stage(), Some("title"));
    assert_eq!(
        journal(),
        vec![
            "start:hop",
            "update:hop",
            "update:hop:returned",
            "cleanup:hop",
            "start:title",
        ]
    );
}

#[test]
fn test_unknown_stage_is_an_error() {
    let (mut ui, _) = engine(200, 100);
    ui.install_stages(STAGES);
    assert_eq!(
        ui.boot("nope"),
        Err(StageError::UnknownStage("nope".into()))
    );
    assert_eq!(ui.current_stage(), None);
}

#[test]
fn test_navigation_from_a_stage_hook_reports_what_will_happen() {
    let (mut ui, _) = engine(200, 100);
    ui.install_stages(STAGES);
    ui.boot("navigator").unwrap();

    frame(&mut ui);
    assert_eq!(ui.current_stage(), Some("detour"));
    assert_eq!(ui.stages().suspended(), &["navigator".to_string()]);

    frame(&mut ui);
    assert_eq!(ui.current_stage(), Some("navigator"));
    assert!(ui.stages().suspended().is_empty());

    frame(&mut ui);
    assert_eq!(
        journal(),
        vec![
            "start:navigator",
            "switch missing: no stage named `missing`",
            "transfer detour: ok",
            "transfer navigator: stage `navigator` is already active or suspended",
            "pause:navigator",
            "start:detour",
            "return: true",
            "return again: false",
            "cleanup:detour",
            "resume:navigator",
        ]
    );
}
