#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use tableau_core::{
    Color, HeadlessBackend, KeyEvent, Picture, RawEvent, ScrollDirection, Size, Style, Vec2,
};
use tableau_ui::{Cx, DrawCx, Element, Engine, FrameMetrics, MeasureCx, MenuEntry};

pub type Journal = Rc<RefCell<Vec<String>>>;

/// Fixed-size element that writes every hook call into a shared journal.
pub struct Recorder {
    pub name: &'static str,
    pub size: Size,
    pub log: Journal,
    pub menu: bool,
}

impl Recorder {
    pub fn new(name: &'static str, w: i32, h: i32, log: &Journal) -> Self {
        Self {
            name,
            size: Size::new(w, h),
            log: log.clone(),
            menu: false,
        }
    }

    pub fn with_menu(mut self) -> Self {
        self.menu = true;
        self
    }

    fn note(&self, what: &str) {
        self.log.borrow_mut().push(format!("{what}:{}", self.name));
    }
}

impl Element for Recorder {
    fn measure(&self, _cx: &MeasureCx<'_>) -> Size {
        self.size
    }

    fn draw(&mut self, cx: &DrawCx<'_>) -> Option<Picture> {
        self.note("draw");
        Some(Picture::rounded(cx.size, Color::WHITE, 0))
    }

    fn cleanup(&mut self, _cx: &mut Cx<'_>) {
        self.note("cleanup");
    }

    fn on_click(&mut self, _cx: &mut Cx<'_>, _at: Vec2) {
        self.note("click");
    }

    fn on_down(&mut self, _cx: &mut Cx<'_>, _at: Vec2) {
        self.note("down");
    }

    fn on_up(&mut self, _cx: &mut Cx<'_>) {
        self.note("up");
    }

    fn on_enter(&mut self, _cx: &mut Cx<'_>) {
        self.note("enter");
    }

    fn on_exit(&mut self, _cx: &mut Cx<'_>) {
        self.note("exit");
    }

    fn on_scroll(&mut self, _cx: &mut Cx<'_>, direction: ScrollDirection) {
        self.note(&format!("scroll-{direction:?}"));
    }

    fn on_right(&mut self, _cx: &mut Cx<'_>) -> Vec<MenuEntry> {
        if !self.menu {
            return Vec::new();
        }
        let rename = self.log.clone();
        let delete = self.log.clone();
        vec![
            MenuEntry::new("Rename", move |_| rename.borrow_mut().push("action:Rename".into())),
            MenuEntry::new("Delete", move |_| delete.borrow_mut().push("action:Delete".into())),
        ]
    }

    fn on_keystroke(&mut self, _cx: &mut Cx<'_>, key: &KeyEvent) {
        self.note(&format!("key-{:?}", key.text));
    }
}

pub fn journal() -> Journal {
    Rc::new(RefCell::new(Vec::new()))
}

/// Journal entries without the draw calls.
pub fn hooks(log: &Journal) -> Vec<String> {
    log.borrow()
        .iter()
        .filter(|l| !l.starts_with("draw:"))
        .cloned()
        .collect()
}

pub fn count(log: &Journal, entry: &str) -> usize {
    log.borrow().iter().filter(|l| *l == entry).count()
}

pub fn engine(w: i32, h: i32) -> (Engine, HeadlessBackend) {
    let backend = HeadlessBackend::new(Size::new(w, h));
    let ui = Engine::new(Box::new(backend.clone()), Style::default());
    (ui, backend)
}

pub fn frame(ui: &mut Engine) -> FrameMetrics {
    ui.tick_with(Duration::from_millis(16)).unwrap()
}

pub fn click(ui: &mut Engine, backend: &HeadlessBackend, at: Vec2) {
    use tableau_core::MouseButton;

    backend.move_pointer(at);
    backend.push(RawEvent::MouseDown(MouseButton::Primary));
    frame(ui);
    backend.push(RawEvent::MouseUp(MouseButton::Primary));
    frame(ui);
}
