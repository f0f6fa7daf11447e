mod common;

use std::collections::HashSet;

use common::{Recorder, count, engine, frame, hooks, journal};
use tableau_core::{LayoutError, UiError};
use tableau_ui::{BoxLayout, StackLayout, widgets::Panel};

fn layout_err(result: tableau_core::Result<()>) -> LayoutError {
    match result {
        Err(UiError::Layout(e)) => e,
        other => panic!("expected a layout error, got {other:?}"),
    }
}

#[test]
fn test_element_cannot_have_two_parents() {
    let (mut ui, _) = engine(200, 100);
    let a = ui.panel(BoxLayout::vertical());
    let b = ui.panel(BoxLayout::vertical());
    let leaf = ui.create(Panel::new());
    ui.add(vec![(Some("a".to_string()), a), (Some("b".to_string()), b)])
        .unwrap();

    ui.add_child(a, "leaf", leaf).unwrap();
    let uid = ui.uid(leaf).unwrap();
    assert_eq!(
        layout_err(ui.add_child(b, "leaf", leaf)),
        LayoutError::AlreadyParented(uid)
    );
    assert_eq!(ui.parent(leaf), Some(a));
    assert!(ui.children(b).is_empty());
}

#[test]
fn test_add_is_best_effort_up_to_the_first_bad_entry() {
    let (mut ui, _) = engine(200, 100);
    let c = ui.panel(BoxLayout::vertical());
    ui.push_child(ui.root(), c).unwrap();
    frame(&mut ui);
    assert!(!ui.needs_reflow(c));

    let first = ui.create(Panel::new());
    let clash = ui.create(Panel::new());
    let never = ui.create(Panel::new());
    let err = ui.add_elements(
        c,
        vec![
            (Some("x".to_string()), first),
            (Some("x".to_string()), clash),
            (Some("y".to_string()), never),
        ],
    );

    assert_eq!(layout_err(err), LayoutError::DuplicateKey("x".into()));
    assert_eq!(ui.child(c, "x"), Some(first));
    assert_eq!(ui.parent(clash), None);
    assert_eq!(ui.child(c, "y"), None);
    assert!(ui.needs_reflow(c));
}

#[test]
fn test_same_element_under_two_keys() {
    let (mut ui, _) = engine(200, 100);
    let c = ui.panel(BoxLayout::vertical());
    let leaf = ui.create(Panel::new());
    let uid = ui.uid(leaf).unwrap();

    let err = ui.add_elements(
        c,
        vec![(Some("one".to_string()), leaf), (Some("two".to_string()), leaf)],
    );
    assert_eq!(layout_err(err), LayoutError::AddedTwice(uid));
    assert_eq!(ui.children(c), vec![leaf]);
}

#[test]
fn test_structural_misuse_is_rejected() {
    let (mut ui, _) = engine(200, 100);
    let outer = ui.panel(StackLayout);
    let inner = ui.panel(StackLayout);
    let leaf = ui.create(Panel::new());
    ui.add_child(outer, "inner", inner).unwrap();

    let outer_uid = ui.uid(outer).unwrap();
    let leaf_uid = ui.uid(leaf).unwrap();
    assert_eq!(
        layout_err(ui.add_child(inner, "outer", outer)),
        LayoutError::Cycle(outer_uid)
    );
    assert_eq!(
        layout_err(ui.add_child(leaf, "x", inner)),
        LayoutError::NotAContainer(leaf_uid)
    );
    assert_eq!(layout_err(ui.delete(ui.root())), LayoutError::RootDeletion);
    let root = ui.root();
    assert!(matches!(
        layout_err(ui.add_child(outer, "root", root)),
        LayoutError::AlreadyParented(_)
    ));
}

#[test]
fn test_root_shorthands() {
    let (mut ui, _) = engine(200, 100);
    let first = ui.create(Panel::new());
    let second = ui.create(Panel::new());

    ui.insert("menu", first).unwrap();
    assert!(ui.contains("menu"));
    assert_eq!(ui.get("menu"), Some(first));
    assert_eq!(
        layout_err(ui.insert("menu", second)),
        LayoutError::KeyReassigned("menu".into())
    );

    ui.remove("menu").unwrap();
    assert!(ui.is_queued(first));
    frame(&mut ui);
    assert!(!ui.contains("menu"));
    assert!(!ui.is_live(first));
    assert!(matches!(ui.remove("menu"), Err(UiError::Usage(_))));
}

#[test]
fn test_synthesised_keys_come_from_ids() {
    let (mut ui, _) = engine(200, 100);
    let leaf = ui.create(Panel::new());
    ui.push_child(ui.root(), leaf).unwrap();
    let key = ui.uid(leaf).unwrap().to_string();
    assert_eq!(ui.get(&key), Some(leaf));
}

#[test]
fn test_traversals_visit_every_element_once() {
    let log = journal();
    let (mut ui, _) = engine(200, 100);
    let col = ui.panel(BoxLayout::vertical());
    let row = ui.panel(BoxLayout::horizontal());
    let mut leaves = Vec::new();
    for _ in 0..3 {
        let leaf = ui.create(Recorder::new("leaf", 5, 5, &log));
        ui.push_child(row, leaf).unwrap();
        leaves.push(leaf);
    }
    ui.push_child(col, row).unwrap();
    let extra = ui.create(Recorder::new("extra", 5, 5, &log));
    ui.push_child(col, extra).unwrap();
    ui.push_child(ui.root(), col).unwrap();

    for walk in [ui.walk_pre_order(ui.root()), ui.walk_post_order(ui.root())] {
        let unique: HashSet<_> = walk.iter().copied().collect();
        assert_eq!(walk.len(), unique.len());
        assert_eq!(walk.len(), ui.live_count());
    }

    let pre = ui.walk_pre_order(ui.root());
    assert_eq!(pre[0], ui.root());
    let post = ui.walk_post_order(ui.root());
    assert_eq!(*post.last().unwrap(), ui.root());
    // Most recently added sibling first.
    assert_eq!(post[0], extra);
    assert_eq!(&post[1..4], &[leaves[2], leaves[1], leaves[0]]);
}

#[test]
fn test_leaf_sweep_runs_cleanup_once_and_reflows_parent() {
    let log = journal();
    let (mut ui, _) = engine(200, 100);
    let c = ui.panel(BoxLayout::vertical());
    let leaf = ui.create(Recorder::new("leaf", 10, 10, &log));
    let other = ui.create(Recorder::new("other", 10, 10, &log));
    ui.add_elements(c, vec![(Some("leaf".into()), leaf), (Some("other".into()), other)])
        .unwrap();
    ui.push_child(ui.root(), c).unwrap();
    frame(&mut ui);
    let live_before = ui.live_count();

    ui.delete(leaf).unwrap();
    ui.delete(leaf).unwrap();
    assert!(ui.is_live(leaf));
    frame(&mut ui);

    assert_eq!(count(&log, "cleanup:leaf"), 1);
    assert!(!ui.is_live(leaf));
    assert_eq!(ui.live_count(), live_before - 1);
    assert_eq!(ui.children(c), vec![other]);
    assert!(ui.needs_reflow(c));
    assert!(ui.needs_reflow(ui.root()));

    frame(&mut ui);
    assert_eq!(count(&log, "cleanup:leaf"), 1);
    assert_eq!(ui.rect(c).unwrap().h, 20);
}

#[test]
fn test_sweeping_several_siblings_reflows_their_parent() {
    let log = journal();
    let (mut ui, _) = engine(200, 100);
    let c = ui.panel(BoxLayout::vertical());
    let kids = [
        ui.create(Recorder::new("a", 10, 10, &log)),
        ui.create(Recorder::new("b", 10, 10, &log)),
        ui.create(Recorder::new("c", 10, 10, &log)),
    ];
    ui.add_elements(c, kids.iter().map(|k| (None, *k))).unwrap();
    ui.push_child(ui.root(), c).unwrap();
    frame(&mut ui);
    assert_eq!(ui.rect(c).unwrap().h, 50);

    for kid in kids {
        ui.delete(kid).unwrap();
    }
    frame(&mut ui);

    for name in ["cleanup:a", "cleanup:b", "cleanup:c"] {
        assert_eq!(count(&log, name), 1);
    }
    assert!(ui.is_live(c));
    assert!(ui.children(c).is_empty());
    assert!(ui.needs_reflow(c));
    assert!(ui.needs_reflow(ui.root()));

    frame(&mut ui);
    assert!(!ui.needs_reflow(c));
    assert_eq!(ui.rect(c).unwrap().h, 10);
}

#[test]
fn test_container_sweep_is_post_order() {
    let log = journal();
    let (mut ui, _) = engine(200, 100);
    let c = ui.create_container(Recorder::new("c", 0, 0, &log), BoxLayout::vertical());
    let k1 = ui.create(Recorder::new("k1", 5, 5, &log));
    let k2 = ui.create_container(Recorder::new("k2", 0, 0, &log), StackLayout);
    let g1 = ui.create(Recorder::new("g1", 5, 5, &log));
    ui.push_child(k2, g1).unwrap();
    ui.add_elements(c, vec![(None, k1), (None, k2)]).unwrap();
    ui.push_child(ui.root(), c).unwrap();
    frame(&mut ui);
    log.borrow_mut().clear();

    ui.delete(c).unwrap();
    ui.cleanup();

    assert_eq!(
        hooks(&log),
        vec!["cleanup:g1", "cleanup:k2", "cleanup:k1", "cleanup:c"]
    );
    for id in [c, k1, k2, g1] {
        assert!(!ui.is_live(id));
    }
    assert_eq!(ui.live_count(), 1);
}

#[test]
fn test_deleting_under_queued_ancestor_fails() {
    let (mut ui, _) = engine(200, 100);
    let outer = ui.panel(StackLayout);
    let inner = ui.panel(StackLayout);
    let leaf = ui.create(Panel::new());
    ui.push_child(inner, leaf).unwrap();
    ui.push_child(outer, inner).unwrap();
    ui.push_child(ui.root(), outer).unwrap();

    ui.delete(outer).unwrap();
    let uid = ui.uid(leaf).unwrap();
    assert_eq!(layout_err(ui.delete(leaf)), LayoutError::AncestorQueued(uid));

    ui.cleanup();
    assert!(!ui.is_live(leaf));
    assert!(matches!(
        layout_err(ui.delete(leaf)),
        LayoutError::UnknownElement
    ));
}

#[test]
fn test_deleting_a_child_then_its_parent_sweeps_both_once() {
    let log = journal();
    let (mut ui, _) = engine(200, 100);
    let c = ui.create_container(Recorder::new("c", 0, 0, &log), StackLayout);
    let leaf = ui.create(Recorder::new("leaf", 5, 5, &log));
    ui.push_child(c, leaf).unwrap();
    ui.push_child(ui.root(), c).unwrap();

    ui.delete(leaf).unwrap();
    ui.delete(c).unwrap();
    ui.cleanup();

    assert_eq!(count(&log, "cleanup:leaf"), 1);
    assert_eq!(count(&log, "cleanup:c"), 1);
    assert!(ui.children(ui.root()).is_empty());
}

#[test]
fn test_ids_are_unique_and_24_bit() {
    let (mut ui, _) = engine(200, 100);
    let mut seen = HashSet::new();
    for _ in 0..2000 {
        let id = ui.create(Panel::new());
        let uid = ui.uid(id).unwrap();
        assert!(uid > 0 && uid < 0x100_0000);
        assert!(seen.insert(uid));
        assert_eq!(ui.by_uid(uid), Some(id));
    }
}

#[test]
fn test_ids_stay_unique_across_deletions() {
    let (mut ui, _) = engine(200, 100);
    let mut alive = Vec::new();
    for _ in 0..50 {
        for _ in 0..20 {
            let id = ui.create(Panel::new());
            ui.push_child(ui.root(), id).unwrap();
            alive.push(id);
        }
        for id in alive.drain(..10) {
            ui.delete(id).unwrap();
        }
        ui.cleanup();

        let mut uids: HashSet<u32> = alive.iter().map(|id| ui.uid(*id).unwrap()).collect();
        assert!(uids.insert(ui.uid(ui.root()).unwrap()));
        assert_eq!(uids.len(), alive.len() + 1);
        assert_eq!(ui.live_count(), uids.len());
        for id in &alive {
            assert_eq!(ui.by_uid(ui.uid(*id).unwrap()), Some(*id));
        }
    }
}

#[test]
fn test_reflow_bubbles_to_root_only() {
    let (mut ui, _) = engine(200, 100);
    let a = ui.panel(StackLayout);
    let b = ui.panel(StackLayout);
    let c = ui.create(Panel::new());
    let sibling = ui.create(Panel::new());
    ui.push_child(b, c).unwrap();
    ui.add_elements(a, vec![(None, b), (None, sibling)]).unwrap();
    ui.push_child(ui.root(), a).unwrap();
    frame(&mut ui);
    for id in [ui.root(), a, b, c, sibling] {
        assert!(!ui.needs_reflow(id));
    }

    ui.reflow(c);
    for id in [ui.root(), a, b, c] {
        assert!(ui.needs_reflow(id));
    }
    assert!(!ui.needs_reflow(sibling));
}

#[test]
fn test_sweep_clears_focus_of_deleted_descendant() {
    let (mut ui, _) = engine(200, 100);
    let c = ui.panel(StackLayout);
    let leaf = ui.create(Panel::new());
    ui.push_child(c, leaf).unwrap();
    ui.push_child(ui.root(), c).unwrap();

    ui.focus(leaf).unwrap();
    assert_eq!(ui.focused(), Some(leaf));
    ui.delete(c).unwrap();
    ui.cleanup();
    assert_eq!(ui.focused(), None);
}

#[test]
fn test_widget_downcast() {
    let (mut ui, _) = engine(200, 100);
    let panel = ui.create(Panel::transparent());
    assert_eq!(ui.widget::<Panel>(panel).map(|p| p.background), Some(false));
    assert!(ui.widget::<tableau_ui::widgets::Label>(panel).is_none());
}
