use std::collections::HashMap;
use std::collections::VecDeque;

use indexmap::{IndexMap, IndexSet};
use rand::Rng;
use slotmap::SlotMap;
use smallvec::SmallVec;
use tableau_core::{
    Backend, InteractionState, LayoutError, Picture, Rect, Result, Style, UiError,
};
use tableau_stage::{ResumeFn, StageError, StageManager, StageStack, StageTable};
use web_time::Instant;

use crate::element::{Cx, Element, ElementId};
use crate::jobs::Jobs;
use crate::layout::{StackLayout, Strategy};
use crate::listeners::Listeners;
use crate::widgets::Panel;
use crate::Position;

/// Element ids are drawn from this many values.
const UID_SPACE: u32 = 0x100_0000;

pub(crate) struct Container {
    pub children: IndexMap<String, ElementId>,
    pub strategy: Box<dyn Strategy>,
}

pub(crate) struct Node {
    pub uid: u32,
    pub position: Position,
    pub rect: Option<Rect>,
    pub cache: Option<Picture>,
    pub dirty: bool,
    pub reflow: bool,
    pub parent: Option<ElementId>,
    pub state: InteractionState,
    pub container: Option<Container>,
    /// Taken out while one of the element's hooks runs.
    pub widget: Option<Box<dyn Element>>,
}

type Hook = Box<dyn FnOnce(&mut dyn Element, &mut Cx<'_>)>;

enum Navigation {
    Switch(String),
    Transfer(String, Option<ResumeFn<Engine>>),
    Return,
}

impl std::fmt::Debug for Navigation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Navigation::Switch(key) => write!(f, "switch to `{key}`"),
            Navigation::Transfer(key, _) => write!(f, "transfer to `{key}`"),
            Navigation::Return => f.write_str("return"),
        }
    }
}

/// Owns the element tree, the backend and the stages, and drives the frame
/// pipeline.
pub struct Engine {
    pub(crate) nodes: SlotMap<ElementId, Node>,
    pub(crate) live: HashMap<u32, ElementId>,
    pub(crate) root: ElementId,
    pub(crate) pending: IndexSet<ElementId>,
    pub(crate) focused: Option<ElementId>,
    pub(crate) backend: Box<dyn Backend>,
    pub(crate) style: Style,
    pub(crate) listeners: Listeners,
    pub(crate) jobs: Jobs,
    pub(crate) running: bool,
    pub(crate) last_tick: Option<Instant>,
    pub(crate) frames: u64,
    stages: StageManager<Engine>,
    stages_busy: bool,
    /// The stage stack as it will be once `deferred_nav` is applied.
    stage_plan: StageStack,
    deferred_nav: VecDeque<Navigation>,
    deferred_hooks: Vec<(ElementId, Hook)>,
}

impl Engine {
    pub fn new(backend: Box<dyn Backend>, style: Style) -> Self {
        let mut engine = Self {
            nodes: SlotMap::with_key(),
            live: HashMap::new(),
            root: ElementId::default(),
            pending: IndexSet::new(),
            focused: None,
            backend,
            style,
            listeners: Listeners::default(),
            jobs: Jobs::default(),
            running: true,
            last_tick: None,
            frames: 0,
            stages: StageManager::new(),
            stages_busy: false,
            stage_plan: StageStack::default(),
            deferred_nav: VecDeque::new(),
            deferred_hooks: Vec::new(),
        };
        engine.root = engine.create_container(Panel::transparent(), StackLayout);
        engine
    }

    fn alloc_uid(&mut self) -> u32 {
        assert!(
            (self.live.len() as u32) < UID_SPACE - 1,
            "element id space exhausted"
        );
        let mut rng = rand::thread_rng();
        loop {
            let uid = rng.gen_range(1..UID_SPACE);
            if !self.live.contains_key(&uid) {
                return uid;
            }
        }
    }

    fn insert_node(&mut self, widget: Box<dyn Element>, container: Option<Container>) -> ElementId {
        let uid = self.alloc_uid();
        let id = self.nodes.insert(Node {
            uid,
            position: Position::default(),
            rect: None,
            cache: None,
            dirty: true,
            reflow: true,
            parent: None,
            state: InteractionState::new(),
            container,
            widget: Some(widget),
        });
        self.live.insert(uid, id);
        log::trace!("created element #{uid:06x}");
        id
    }

    /// Creates a detached leaf element.
    pub fn create(&mut self, widget: impl Element) -> ElementId {
        self.insert_node(Box::new(widget), None)
    }

    /// Creates a detached container laid out by `strategy`.
    pub fn create_container(
        &mut self,
        widget: impl Element,
        strategy: impl Strategy + 'static,
    ) -> ElementId {
        self.insert_node(
            Box::new(widget),
            Some(Container {
                children: IndexMap::new(),
                strategy: Box::new(strategy),
            }),
        )
    }

    /// Creates a container with the default panel background.
    pub fn panel(&mut self, strategy: impl Strategy + 'static) -> ElementId {
        self.create_container(Panel::new(), strategy)
    }

    pub fn root(&self) -> ElementId {
        self.root
    }

    pub fn is_live(&self, id: ElementId) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    pub fn uid(&self, id: ElementId) -> Option<u32> {
        self.nodes.get(id).map(|n| n.uid)
    }

    pub fn by_uid(&self, uid: u32) -> Option<ElementId> {
        self.live.get(&uid).copied()
    }

    pub fn parent(&self, id: ElementId) -> Option<ElementId> {
        self.nodes.get(id).and_then(|n| n.parent)
    }

    /// Direct children in insertion order. Empty for leaves.
    pub fn children(&self, id: ElementId) -> Vec<ElementId> {
        self.nodes
            .get(id)
            .and_then(|n| n.container.as_ref())
            .map(|c| c.children.values().copied().collect())
            .unwrap_or_default()
    }

    pub fn child(&self, container: ElementId, key: &str) -> Option<ElementId> {
        self.nodes
            .get(container)?
            .container
            .as_ref()?
            .children
            .get(key)
            .copied()
    }

    pub fn rect(&self, id: ElementId) -> Option<Rect> {
        self.nodes.get(id).and_then(|n| n.rect)
    }

    pub fn position(&self, id: ElementId) -> Option<Position> {
        self.nodes.get(id).map(|n| n.position)
    }

    pub fn state(&self, id: ElementId) -> Option<&InteractionState> {
        self.nodes.get(id).map(|n| &n.state)
    }

    pub fn state_mut(&mut self, id: ElementId) -> Option<&mut InteractionState> {
        self.nodes.get_mut(id).map(|n| &mut n.state)
    }

    pub fn is_dirty(&self, id: ElementId) -> bool {
        self.nodes.get(id).is_some_and(|n| n.dirty)
    }

    pub fn needs_reflow(&self, id: ElementId) -> bool {
        self.nodes.get(id).is_some_and(|n| n.reflow)
    }

    pub fn is_queued(&self, id: ElementId) -> bool {
        self.pending.contains(&id)
    }

    /// The element's widget, if it is a `T`. `None` while one of its hooks
    /// runs.
    pub fn widget<T: Element>(&self, id: ElementId) -> Option<&T> {
        let widget: &dyn std::any::Any = self.nodes.get(id)?.widget.as_deref()?;
        widget.downcast_ref()
    }

    pub fn widget_mut<T: Element>(&mut self, id: ElementId) -> Option<&mut T> {
        let widget: &mut dyn std::any::Any = self.nodes.get_mut(id)?.widget.as_deref_mut()?;
        widget.downcast_mut()
    }

    pub fn style(&self) -> &Style {
        &self.style
    }

    pub fn set_style(&mut self, style: Style) {
        self.style = style;
        for node in self.nodes.values_mut() {
            node.dirty = true;
        }
        self.reflow(self.root);
    }

    pub fn backend(&self) -> &dyn Backend {
        self.backend.as_ref()
    }

    pub fn backend_mut(&mut self) -> &mut dyn Backend {
        self.backend.as_mut()
    }

    pub fn viewport(&self) -> Rect {
        Rect::from_origin_size(tableau_core::Vec2::ZERO, self.backend.size())
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Asks the main loop to stop after the current frame.
    pub fn quit(&mut self) {
        self.running = false;
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn mark_dirty(&mut self, id: ElementId) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.dirty = true;
        }
    }

    /// Flags `id` and every ancestor up to the root for re-layout.
    pub fn reflow(&mut self, id: ElementId) {
        let mut cursor = Some(id);
        while let Some(cur) = cursor {
            let Some(node) = self.nodes.get_mut(cur) else {
                break;
            };
            node.reflow = true;
            cursor = node.parent;
        }
    }

    /// Sets where the element sits inside its parent's slot and schedules a
    /// re-layout.
    pub fn place(&mut self, id: ElementId, position: Position) -> Result<()> {
        let node = self.nodes.get_mut(id).ok_or(LayoutError::UnknownElement)?;
        node.position = position;
        self.reflow(id);
        Ok(())
    }

    fn uid_of(&self, id: ElementId) -> Result<u32> {
        Ok(self.nodes.get(id).ok_or(LayoutError::UnknownElement)?.uid)
    }

    fn is_ancestor_or_self(&self, candidate: ElementId, of: ElementId) -> bool {
        let mut cursor = Some(of);
        while let Some(cur) = cursor {
            if cur == candidate {
                return true;
            }
            cursor = self.nodes.get(cur).and_then(|n| n.parent);
        }
        false
    }

    /// Adds `entries` to `container`, in order. `None` keys are synthesised
    /// from the child's id.
    ///
    /// Insertion is best effort: entries before the first rejected one stay
    /// added, and the container is still flagged for re-layout.
    pub fn add_elements<I>(&mut self, container: ElementId, entries: I) -> Result<()>
    where
        I: IntoIterator<Item = (Option<String>, ElementId)>,
    {
        let container_uid = self.uid_of(container)?;
        if self.nodes[container].container.is_none() {
            return Err(LayoutError::NotAContainer(container_uid).into());
        }

        let mut added = 0usize;
        let mut outcome = Ok(());
        for (key, child) in entries {
            if let Err(e) = self.attach(container, key, child) {
                outcome = Err(e);
                break;
            }
            added += 1;
        }
        if added > 0 {
            self.reflow(container);
        }
        outcome
    }

    fn attach(&mut self, container: ElementId, key: Option<String>, child: ElementId) -> Result<()> {
        let uid = self.uid_of(child)?;
        let key = key.unwrap_or_else(|| uid.to_string());

        let children = self.nodes[container]
            .container
            .as_ref()
            .map(|c| &c.children)
            .ok_or(LayoutError::UnknownElement)?;
        if children.contains_key(&key) {
            return Err(LayoutError::DuplicateKey(key).into());
        }
        if children.values().any(|v| *v == child) {
            return Err(LayoutError::AddedTwice(uid).into());
        }
        if self.nodes[child].parent.is_some() || child == self.root {
            return Err(LayoutError::AlreadyParented(uid).into());
        }
        if self.is_ancestor_or_self(child, container) {
            return Err(LayoutError::Cycle(uid).into());
        }

        self.nodes[child].parent = Some(container);
        if let Some(c) = self.nodes[container].container.as_mut() {
            c.children.insert(key, child);
        }
        Ok(())
    }

    /// Adds one keyed child.
    pub fn add_child(&mut self, container: ElementId, key: &str, child: ElementId) -> Result<()> {
        self.add_elements(container, [(Some(key.to_string()), child)])
    }

    /// Adds one child under a key synthesised from its id.
    pub fn push_child(&mut self, container: ElementId, child: ElementId) -> Result<()> {
        self.add_elements(container, [(None, child)])
    }

    /// Adds one keyed child; reusing a key that is already present is
    /// refused rather than replacing the old child.
    pub fn insert_child(&mut self, container: ElementId, key: &str, child: ElementId) -> Result<()> {
        if self.child(container, key).is_some() {
            return Err(LayoutError::KeyReassigned(key.to_string()).into());
        }
        self.add_child(container, key, child)
    }

    /// Queues the child stored under `key` for deletion.
    pub fn remove_child(&mut self, container: ElementId, key: &str) -> Result<()> {
        let child = self
            .child(container, key)
            .ok_or_else(|| UiError::Usage(format!("no child under key `{key}`")))?;
        self.delete(child)
    }

    /// [`Engine::add_elements`] on the root.
    pub fn add<I>(&mut self, entries: I) -> Result<()>
    where
        I: IntoIterator<Item = (Option<String>, ElementId)>,
    {
        self.add_elements(self.root, entries)
    }

    /// [`Engine::insert_child`] on the root.
    pub fn insert(&mut self, key: &str, child: ElementId) -> Result<()> {
        self.insert_child(self.root, key, child)
    }

    pub fn get(&self, key: &str) -> Option<ElementId> {
        self.child(self.root, key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// [`Engine::remove_child`] on the root.
    pub fn remove(&mut self, key: &str) -> Result<()> {
        self.remove_child(self.root, key)
    }

    /// Queues `id` and its subtree for removal at the end of the frame.
    ///
    /// Queuing twice is a no-op. Queuing an element below one that is
    /// already queued is refused: the ancestor's sweep takes it anyway.
    pub fn delete(&mut self, id: ElementId) -> Result<()> {
        if id == self.root {
            return Err(LayoutError::RootDeletion.into());
        }
        let uid = self.uid_of(id)?;
        let mut cursor = self.nodes[id].parent;
        while let Some(cur) = cursor {
            if self.pending.contains(&cur) {
                return Err(LayoutError::AncestorQueued(uid).into());
            }
            cursor = self.nodes.get(cur).and_then(|n| n.parent);
        }
        if self.pending.insert(id) {
            log::trace!("queued #{uid:06x} for deletion");
        }
        Ok(())
    }

    /// Subtree of `id` in pre-order, children in insertion order.
    pub fn walk_pre_order(&self, id: ElementId) -> Vec<ElementId> {
        let mut out = Vec::new();
        let mut stack: SmallVec<[ElementId; 32]> = SmallVec::new();
        if self.nodes.contains_key(id) {
            stack.push(id);
        }
        while let Some(cur) = stack.pop() {
            out.push(cur);
            if let Some(c) = self.nodes[cur].container.as_ref() {
                stack.extend(c.children.values().rev().copied());
            }
        }
        out
    }

    /// Subtree of `id` in post-order with the most recently added child
    /// first, so elements drawn on top come before what they cover.
    pub fn walk_post_order(&self, id: ElementId) -> Vec<ElementId> {
        let mut out = Vec::new();
        let mut stack: SmallVec<[(ElementId, bool); 32]> = SmallVec::new();
        if self.nodes.contains_key(id) {
            stack.push((id, false));
        }
        while let Some((cur, expanded)) = stack.pop() {
            if expanded {
                out.push(cur);
                continue;
            }
            stack.push((cur, true));
            if let Some(c) = self.nodes[cur].container.as_ref() {
                stack.extend(c.children.values().map(|k| (*k, false)));
            }
        }
        out
    }

    /// Gives keyboard focus to `id`, taking it from the previous holder.
    pub fn focus(&mut self, id: ElementId) -> Result<()> {
        if !self.nodes.contains_key(id) {
            return Err(LayoutError::UnknownElement.into());
        }
        if let Some(prev) = self.focused.take() {
            self.defocus(prev);
        }
        self.focused = Some(id);
        self.nodes[id].state.is_kb_focused = true;
        self.call_hook(id, |w, cx| w.on_kb_focus(cx));
        Ok(())
    }

    /// Drops keyboard focus, if anything holds it.
    pub fn blur(&mut self) {
        if let Some(prev) = self.focused.take() {
            self.defocus(prev);
        }
    }

    pub fn focused(&self) -> Option<ElementId> {
        self.focused
    }

    pub(crate) fn defocus(&mut self, id: ElementId) {
        if self.focused == Some(id) {
            self.focused = None;
        }
        let Some(node) = self.nodes.get_mut(id) else {
            return;
        };
        node.state.is_kb_focused = false;
        self.call_hook(id, |w, cx| w.on_kb_defocus(cx));
    }

    /// Runs `f` with the element's widget checked out of the arena.
    ///
    /// Returns `None` for stale handles and for widgets that are already
    /// checked out.
    pub(crate) fn with_widget<R>(
        &mut self,
        id: ElementId,
        f: impl FnOnce(&mut dyn Element, &mut Cx<'_>) -> R,
    ) -> Option<R> {
        let mut widget = self.nodes.get_mut(id)?.widget.take()?;
        let out = f(widget.as_mut(), &mut Cx { ui: self, id });
        if let Some(node) = self.nodes.get_mut(id) {
            node.widget = Some(widget);
        }
        self.run_deferred_hooks(id);
        Some(out)
    }

    /// Like [`Engine::with_widget`], but a hook aimed at an element whose
    /// widget is checked out runs as soon as the widget is put back.
    pub(crate) fn call_hook(
        &mut self,
        id: ElementId,
        hook: impl FnOnce(&mut dyn Element, &mut Cx<'_>) + 'static,
    ) {
        match self.nodes.get(id) {
            None => {}
            Some(node) if node.widget.is_none() => self.deferred_hooks.push((id, Box::new(hook))),
            Some(_) => {
                self.with_widget(id, hook);
            }
        }
    }

    fn run_deferred_hooks(&mut self, id: ElementId) {
        while let Some(at) = self.deferred_hooks.iter().position(|(k, _)| *k == id) {
            let (_, hook) = self.deferred_hooks.remove(at);
            self.with_widget(id, hook);
        }
    }

    /// Registers the stages of `table`, replacing any earlier registry.
    pub fn install_stages(&mut self, table: &StageTable<Engine>) {
        self.stages = StageManager::from_table(table);
        self.stage_plan = self.stages.stack().clone();
    }

    pub fn stages(&self) -> &StageManager<Engine> {
        &self.stages
    }

    pub fn current_stage(&self) -> Option<&str> {
        self.stages.current_stage()
    }

    /// Activates the first stage.
    pub fn boot(&mut self, start: &str) -> Result<(), StageError> {
        self.switch_stage(start)
    }

    /// See [`StageManager::switch_stage`]. Called from inside a stage hook,
    /// the key is checked at once and the switch happens right after that
    /// hook returns.
    pub fn switch_stage(&mut self, key: &str) -> Result<(), StageError> {
        self.navigate(Navigation::Switch(key.to_string())).map(drop)
    }

    /// See [`StageManager::transfer_stage`].
    pub fn transfer_stage(
        &mut self,
        key: &str,
        on_resume: Option<ResumeFn<Engine>>,
    ) -> Result<(), StageError> {
        self.navigate(Navigation::Transfer(key.to_string(), on_resume))
            .map(drop)
    }

    /// See [`StageManager::return_stage`]. Called from inside a stage hook,
    /// reports whether the return will happen once the hook returns.
    pub fn return_stage(&mut self) -> bool {
        self.navigate(Navigation::Return).unwrap_or(false)
    }

    fn navigate(&mut self, nav: Navigation) -> Result<bool, StageError> {
        if self.stages_busy {
            let accepted = match &nav {
                Navigation::Switch(key) => self.stage_plan.switch(key).map(|_| true)?,
                Navigation::Transfer(key, _) => self.stage_plan.transfer(key).map(|_| true)?,
                Navigation::Return => self.stage_plan.step_back(),
            };
            if accepted {
                log::debug!("stage: deferring {nav:?} until the running hook returns");
                self.deferred_nav.push_back(nav);
            }
            return Ok(accepted);
        }
        let outcome = self
            .with_stages(|stages, ui| match nav {
                Navigation::Switch(key) => stages.switch_stage(&key, ui).map(|_| true),
                Navigation::Transfer(key, cb) => stages.transfer_stage(&key, cb, ui).map(|_| true),
                Navigation::Return => Ok(stages.return_stage(ui)),
            })
            .unwrap_or(Ok(false));
        self.stage_plan = self.stages.stack().clone();
        outcome
    }

    /// Runs `f` with the stage manager checked out, then applies navigation
    /// requested meanwhile.
    pub(crate) fn with_stages<R>(
        &mut self,
        f: impl FnOnce(&mut StageManager<Engine>, &mut Engine) -> R,
    ) -> Option<R> {
        if self.stages_busy {
            return None;
        }
        let mut stages = std::mem::take(&mut self.stages);
        self.stages_busy = true;
        let out = f(&mut stages, self);
        self.stages = stages;
        self.stages_busy = false;

        while let Some(nav) = self.deferred_nav.pop_front() {
            let desc = format!("{nav:?}");
            if let Err(e) = self.navigate(nav) {
                log::error!("stage: deferred {desc} failed: {e}");
            }
        }
        Some(out)
    }
}
