use std::any::Any;
use std::rc::Rc;
use std::time::Duration;

use tableau_core::{
    InteractionState, KeyEvent, Picture, Rect, Result, ScrollDirection, Size, Style, TextMetrics,
    Vec2,
};

use crate::Engine;

slotmap::new_key_type! {
    /// Handle to an element owned by an [`Engine`]. Stale once the element is
    /// swept.
    pub struct ElementId;
}

/// What an element needs to report its preferred size.
pub struct MeasureCx<'a> {
    pub style: &'a Style,
    pub metrics: &'a dyn TextMetrics,
    pub viewport: Size,
    pub state: &'a InteractionState,
}

/// What an element needs to produce its picture.
pub struct DrawCx<'a> {
    /// Size the layout pass assigned.
    pub size: Size,
    pub style: &'a Style,
    pub metrics: &'a dyn TextMetrics,
    pub state: &'a InteractionState,
}

/// Hook context: the engine plus the element the hook runs for.
pub struct Cx<'a> {
    pub ui: &'a mut Engine,
    pub id: ElementId,
}

static IDLE: InteractionState = InteractionState::new();

impl Cx<'_> {
    pub fn mark_dirty(&mut self) {
        self.ui.mark_dirty(self.id);
    }

    pub fn reflow(&mut self) {
        self.ui.reflow(self.id);
    }

    /// Queues this element for deletion at the end of the frame.
    pub fn delete(&mut self) -> Result<()> {
        self.ui.delete(self.id)
    }

    pub fn focus(&mut self) -> Result<()> {
        self.ui.focus(self.id)
    }

    pub fn state(&self) -> &InteractionState {
        self.ui.state(self.id).unwrap_or(&IDLE)
    }

    pub fn state_mut(&mut self) -> Option<&mut InteractionState> {
        self.ui.state_mut(self.id)
    }

    pub fn rect(&self) -> Option<Rect> {
        self.ui.rect(self.id)
    }

    pub fn style(&self) -> &Style {
        self.ui.style()
    }
}

pub type Action = Rc<dyn Fn(&mut Engine)>;

/// One line of a context menu.
#[derive(Clone)]
pub struct MenuEntry {
    pub label: String,
    pub action: Action,
}

impl MenuEntry {
    pub fn new(label: impl Into<String>, action: impl Fn(&mut Engine) + 'static) -> Self {
        Self {
            label: label.into(),
            action: Rc::new(action),
        }
    }
}

impl std::fmt::Debug for MenuEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MenuEntry").field("label", &self.label).finish()
    }
}

/// Behaviour of a node in the element tree.
///
/// Every hook is optional. Geometry, caching, interaction state and the
/// parent/child links live in the engine; an implementation only describes
/// what it looks like and how it reacts. Pointer positions handed to hooks are
/// relative to the element's top-left.
#[allow(unused_variables)]
pub trait Element: Any {
    /// Preferred size. Containers are measured by their layout strategy
    /// instead.
    fn measure(&self, cx: &MeasureCx<'_>) -> Size {
        Size::ZERO
    }

    /// Fresh picture for the assigned size, or `None` for nothing visible.
    /// Only called when the element is dirty or has no cached picture.
    fn draw(&mut self, cx: &DrawCx<'_>) -> Option<Picture> {
        None
    }

    fn update(&mut self, cx: &mut Cx<'_>, dt: Duration) {}

    /// Runs exactly once, when the element is swept.
    fn cleanup(&mut self, cx: &mut Cx<'_>) {}

    fn on_click(&mut self, cx: &mut Cx<'_>, at: Vec2) {}
    fn on_down(&mut self, cx: &mut Cx<'_>, at: Vec2) {}
    fn on_up(&mut self, cx: &mut Cx<'_>) {}
    fn on_enter(&mut self, cx: &mut Cx<'_>) {}
    fn on_exit(&mut self, cx: &mut Cx<'_>) {}
    fn on_scroll(&mut self, cx: &mut Cx<'_>, direction: ScrollDirection) {}

    /// Context menu entries for a secondary press. Empty means no menu.
    fn on_right(&mut self, cx: &mut Cx<'_>) -> Vec<MenuEntry> {
        Vec::new()
    }

    fn on_keystroke(&mut self, cx: &mut Cx<'_>, key: &KeyEvent) {}
    fn on_kb_focus(&mut self, cx: &mut Cx<'_>) {}
    fn on_kb_defocus(&mut self, cx: &mut Cx<'_>) {}
    fn while_clicked(&mut self, cx: &mut Cx<'_>, at: Vec2) {}
    fn while_hovered(&mut self, cx: &mut Cx<'_>, at: Vec2) {}
}
