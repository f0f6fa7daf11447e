use tableau_core::{Picture, Result, Vec2};

use super::Button;
use crate::element::{Cx, DrawCx, Element, ElementId, MenuEntry};
use crate::layout::BoxLayout;
use crate::listeners::{EventPayload, GlobalEvent};
use crate::{Alignment, Engine, Position};

const CLOSING_EVENTS: [GlobalEvent; 3] = [
    GlobalEvent::PrimaryRelease,
    GlobalEvent::KeyDown,
    GlobalEvent::Resize,
];

/// Vertical column of buttons opened at the pointer by a secondary press.
///
/// Closes on the next primary release, key press or resize, and on a
/// secondary press outside of itself.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ContextMenu;

impl ContextMenu {
    /// Builds the menu for `entries`, attaches it to the root with its
    /// top-left at `at`, and subscribes its closing listeners.
    pub fn spawn(ui: &mut Engine, entries: Vec<MenuEntry>, at: Vec2) -> Result<ElementId> {
        let padding = ui.style().padding.layout;
        let menu = ui.create_container(ContextMenu, BoxLayout::vertical().with_padding(padding));

        let mut items = Vec::with_capacity(entries.len());
        for entry in entries {
            let action = entry.action.clone();
            let button = ui.create(Button::new(entry.label.clone(), move |ui, _| action(ui)));
            items.push((Some(entry.label), button));
        }
        if let Err(e) = ui.add_elements(menu, items.iter().cloned()) {
            for (_, button) in &items {
                if ui.parent(*button).is_none() {
                    let _ = ui.delete(*button);
                }
            }
            let _ = ui.delete(menu);
            return Err(e);
        }

        ui.place(menu, Position::new(Alignment::TopLeft).offset(at.x, at.y))?;
        ui.push_child(ui.root(), menu)?;

        for event in CLOSING_EVENTS {
            ui.add_listener(event, menu, move |ui, _| close(ui, menu))?;
        }
        ui.add_listener(GlobalEvent::SecondaryPress, menu, move |ui, payload| {
            // No rect yet means the menu was opened by this very press.
            if let EventPayload::Pointer(p) = payload
                && let Some(rect) = ui.rect(menu)
                && !rect.contains(*p)
            {
                close(ui, menu);
            }
        })?;
        log::debug!("context menu opened at ({}, {})", at.x, at.y);
        Ok(menu)
    }
}

fn close(ui: &mut Engine, menu: ElementId) {
    if ui.is_live(menu) && !ui.is_queued(menu) {
        if let Err(e) = ui.delete(menu) {
            log::debug!("context menu close: {e}");
        }
    }
}

impl Element for ContextMenu {
    fn draw(&mut self, cx: &DrawCx<'_>) -> Option<Picture> {
        Some(Picture::rounded(
            cx.size,
            cx.style.colors.foreground.with_alpha(cx.style.alpha.layout),
            cx.style.padding.corner_radius,
        ))
    }

    fn cleanup(&mut self, cx: &mut Cx<'_>) {
        let id = cx.id;
        for event in CLOSING_EVENTS.into_iter().chain([GlobalEvent::SecondaryPress]) {
            if let Err(e) = cx.ui.remove_listener(event, id) {
                log::debug!("context menu cleanup: {e}");
            }
        }
    }
}
