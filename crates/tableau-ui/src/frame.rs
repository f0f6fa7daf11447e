use std::time::Duration;

use indexmap::IndexSet;
use smallvec::SmallVec;
use tableau_core::{FrameInput, RawEvent, Rect, Result, Size, Vec2};
use web_time::Instant;

use crate::element::{DrawCx, ElementId, MeasureCx};
use crate::layout::Measured;
use crate::listeners::{EventPayload, GlobalEvent, ListenerKey};
use crate::widgets::ContextMenu;
use crate::Engine;

/// Wall time spent in each phase of one frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameMetrics {
    pub handle_events: Duration,
    pub update: Duration,
    pub reflow: Duration,
    pub render: Duration,
    pub cleanup: Duration,
}

impl FrameMetrics {
    pub fn phases(&self) -> [(&'static str, Duration); 5] {
        [
            ("events", self.handle_events),
            ("update", self.update),
            ("reflow", self.reflow),
            ("render", self.render),
            ("cleanup", self.cleanup),
        ]
    }

    pub fn total(&self) -> Duration {
        self.phases().iter().map(|(_, d)| *d).sum()
    }
}

impl Engine {
    /// Runs one frame: clear, events, update, reflow, render, cleanup.
    /// Presenting is left to the caller so overlays can be drawn on top.
    pub fn tick(&mut self) -> Result<FrameMetrics> {
        let now = Instant::now();
        let dt = self.last_tick.map(|t| now - t).unwrap_or_default();
        self.last_tick = Some(now);
        self.tick_with(dt)
    }

    /// [`Engine::tick`] with an explicit frame delta.
    pub fn tick_with(&mut self, dt: Duration) -> Result<FrameMetrics> {
        let mut metrics = FrameMetrics::default();
        self.backend.clear(self.style.colors.background);

        let t = Instant::now();
        self.handle_events()?;
        metrics.handle_events = t.elapsed();

        let t = Instant::now();
        self.update(dt);
        metrics.update = t.elapsed();

        let t = Instant::now();
        self.handle_reflow();
        metrics.reflow = t.elapsed();

        let t = Instant::now();
        self.render()?;
        metrics.render = t.elapsed();

        let t = Instant::now();
        self.cleanup();
        metrics.cleanup = t.elapsed();

        self.frames += 1;
        Ok(metrics)
    }

    pub fn present(&mut self) -> Result<()> {
        self.backend.present()
    }

    /// Polls the backend and dispatches the frame's input through the tree.
    pub fn handle_events(&mut self) -> Result<()> {
        let raw = self.backend.poll_events();
        let raw = self
            .with_stages(move |stages, ui| stages.handle_events(raw, ui))
            .unwrap_or_default();
        let pointer = self.backend.pointer();
        let input = FrameInput::aggregate(pointer, &raw);

        if input.quit {
            log::info!("quit requested");
            self.running = false;
        }
        if let Some(size) = input.resize {
            log::debug!("surface resized to {}x{}", size.width, size.height);
            self.reflow(self.root);
        }
        if let Some(focused) = self.focused {
            for event in &raw {
                if let RawEvent::KeyDown(key) = event {
                    let key = key.clone();
                    self.call_hook(focused, move |w, cx| w.on_keystroke(cx, &key));
                }
            }
        }

        let mut hit_taken = false;
        for id in self.walk_post_order(self.root) {
            let Some(rect) = self.rect(id) else {
                continue;
            };
            if !hit_taken && rect.contains(pointer) {
                hit_taken = true;
                self.dispatch_hit(id, pointer - rect.origin(), &input)?;
            } else {
                self.dispatch_miss(id, &input);
            }

            if input.primary_up() && self.state(id).is_some_and(|s| s.is_clicked) {
                self.with_widget(id, |w, cx| w.on_up(cx));
                if let Some(state) = self.state_mut(id) {
                    state.is_clicked = false;
                }
            }
        }

        if input.secondary_down() {
            self.fire(GlobalEvent::SecondaryPress, EventPayload::Pointer(pointer));
        }
        if input.primary_up() {
            self.fire(GlobalEvent::PrimaryRelease, EventPayload::Pointer(pointer));
        }
        if let Some(key) = input.keystroke {
            self.fire(GlobalEvent::KeyDown, EventPayload::Key(key));
        }
        if let Some(size) = input.resize {
            self.fire(GlobalEvent::Resize, EventPayload::Resize(size));
        }
        Ok(())
    }

    fn dispatch_hit(&mut self, id: ElementId, at: Vec2, input: &FrameInput) -> Result<()> {
        let Some(state) = self.state_mut(id) else {
            return Ok(());
        };
        state.pointer = Some(at);
        if !state.is_hovered {
            self.with_widget(id, |w, cx| w.on_enter(cx));
            if let Some(state) = self.state_mut(id) {
                state.is_hovered = true;
            }
        }

        self.with_widget(id, |w, cx| w.while_hovered(cx, at));
        if self.state(id).is_some_and(|s| s.is_clicked) {
            self.with_widget(id, |w, cx| w.while_clicked(cx, at));
        }

        if input.primary_down() {
            self.with_widget(id, |w, cx| w.on_down(cx, at));
            if let Some(state) = self.state_mut(id) {
                state.is_clicked = true;
            }
        } else if input.primary_up() && self.state(id).is_some_and(|s| s.is_clicked) {
            self.with_widget(id, |w, cx| w.on_click(cx, at));
        } else if input.secondary_down() {
            let entries = self
                .with_widget(id, |w, cx| w.on_right(cx))
                .unwrap_or_default();
            if !entries.is_empty() {
                ContextMenu::spawn(self, entries, input.pointer)?;
            }
        } else if let Some(direction) = input.scroll {
            self.with_widget(id, |w, cx| w.on_scroll(cx, direction));
        }
        Ok(())
    }

    fn dispatch_miss(&mut self, id: ElementId, input: &FrameInput) {
        let Some(state) = self.state_mut(id) else {
            return;
        };
        state.pointer = None;
        let was_hovered = state.is_hovered;
        let lose_focus = state.is_kb_focused && !state.keep_kb_focus && input.primary_up();

        if was_hovered {
            self.with_widget(id, |w, cx| w.on_exit(cx));
            if let Some(state) = self.state_mut(id) {
                state.is_hovered = false;
            }
        }
        if lose_focus {
            self.defocus(id);
        }
    }

    /// Advances stage logic, widget logic, interaction fades and jobs.
    pub fn update(&mut self, dt: Duration) {
        self.with_stages(|stages, ui| stages.update(dt, ui));

        let fade = self.style.fade_time();
        for id in self.walk_pre_order(self.root) {
            self.with_widget(id, |w, cx| w.update(cx, dt));
            if let Some(state) = self.state_mut(id) {
                state.advance(dt, fade);
            }
        }

        self.poll_jobs();
    }

    /// Re-lays out the tree when anything below the root asked for it.
    pub fn handle_reflow(&mut self) {
        if !self.needs_reflow(self.root) {
            return;
        }
        let viewport = self.viewport();
        log::trace!("reflow at {}x{}", viewport.w, viewport.h);
        self.distribute(self.root, viewport);
    }

    pub(crate) fn measure(&self, id: ElementId) -> Size {
        let Some(node) = self.nodes.get(id) else {
            return Size::ZERO;
        };
        match &node.container {
            Some(container) => {
                let sizes: SmallVec<[Size; 8]> = container
                    .children
                    .values()
                    .map(|child| self.measure(*child))
                    .collect();
                container.strategy.measure(&sizes)
            }
            None => node
                .widget
                .as_ref()
                .map(|w| {
                    w.measure(&MeasureCx {
                        style: &self.style,
                        metrics: self.backend.as_ref(),
                        viewport: self.backend.size(),
                        state: &node.state,
                    })
                })
                .unwrap_or(Size::ZERO),
        }
    }

    fn distribute(&mut self, id: ElementId, rect: Rect) {
        let Some(node) = self.nodes.get_mut(id) else {
            return;
        };
        // Only a size change invalidates the picture; moving just re-places it.
        if node.rect.map(|r| r.size()) != Some(rect.size()) {
            node.dirty = true;
        }
        node.rect = Some(rect);
        node.reflow = false;

        let children: SmallVec<[ElementId; 16]> = match &node.container {
            Some(container) => container.children.values().copied().collect(),
            None => return,
        };
        let measured: Vec<Measured> = children
            .iter()
            .map(|child| Measured {
                size: self.measure(*child),
                position: self.nodes[*child].position,
            })
            .collect();
        let rects = match &self.nodes[id].container {
            Some(container) => container.strategy.distribute(&measured, rect),
            None => return,
        };
        for (child, rect) in children.into_iter().zip(rects) {
            self.distribute(child, rect);
        }
    }

    /// Draws every visible element, regenerating stale pictures first.
    pub fn render(&mut self) -> Result<()> {
        let Some(view) = self.rect(self.root) else {
            return Ok(());
        };
        for id in self.walk_pre_order(self.root) {
            let Engine {
                nodes,
                backend,
                style,
                ..
            } = self;
            let Some(node) = nodes.get_mut(id) else {
                continue;
            };
            let Some(rect) = node.rect else {
                continue;
            };
            if !rect.intersects(&view) {
                continue;
            }
            if node.dirty || node.cache.is_none() {
                let Some(widget) = node.widget.as_mut() else {
                    continue;
                };
                node.cache = widget.draw(&DrawCx {
                    size: rect.size(),
                    style,
                    metrics: backend.as_ref(),
                    state: &node.state,
                });
                node.dirty = false;
            }
            if let Some(picture) = &node.cache {
                backend.draw(picture, rect.origin())?;
            }
        }
        Ok(())
    }

    /// Sweeps every element queued with [`Engine::delete`], subtree by
    /// subtree, leaves first.
    pub fn cleanup(&mut self) {
        let queue = std::mem::take(&mut self.pending);
        if queue.is_empty() {
            return;
        }
        let mut parents: IndexSet<ElementId> = IndexSet::new();

        for top in queue {
            if !self.nodes.contains_key(top) {
                continue;
            }
            for id in self.walk_post_order(top) {
                if self.focused == Some(id) {
                    self.focused = None;
                }
                self.with_widget(id, |w, cx| w.cleanup(cx));
                self.listeners.drop_owner(&ListenerKey::Element(id));

                let Some(node) = self.nodes.remove(id) else {
                    continue;
                };
                self.live.remove(&node.uid);
                parents.shift_remove(&id);
                log::trace!("swept #{:06x}", node.uid);

                if let Some(parent) = node.parent {
                    if let Some(container) = self.nodes.get_mut(parent).and_then(|p| p.container.as_mut()) {
                        container.children.retain(|_, child| *child != id);
                    }
                    parents.insert(parent);
                }
            }
        }

        for parent in parents {
            if self.nodes.contains_key(parent) {
                self.reflow(parent);
            }
        }
    }
}
