use super::marquee::Rect;
use super::{KeyDirection, SelectionModel, ViewItem};

fn items(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

fn boxed(names: &[&str]) -> Vec<ViewItem> {
    // A vertical list: 20px tall rows with a 4px gap.
    names
        .iter()
        .enumerate()
        .map(|(i, name)| ViewItem {
            id: name.to_string(),
            bounds: Some(Rect {
                x: 0.0,
                y: i as f64 * 24.0,
                w: 100.0,
                h: 20.0,
            }),
        })
        .collect()
}

#[test]
fn plain_click_collapses_to_single_item() {
    let view = items(&["A", "B", "C"]);
    let mut model = SelectionModel::default();
    model.click(&view, 1);
    assert_eq!(model.selected_ids(), vec!["B"]);

    model.click(&view, 2);
    assert_eq!(model.selected_ids(), vec!["C"]);
}

#[test]
fn ctrl_click_toggles_membership_keeping_anchor() {
    let view = items(&["A", "B", "C", "D"]);
    let mut model = SelectionModel::default();
    model.click(&view, 0);
    model.toggle_click(&view, 2);
    assert_eq!(model.selected_ids(), vec!["A", "C"]);

    model.toggle_click(&view, 2);
    assert_eq!(model.selected_ids(), vec!["A"]);

    // Anchor stayed at the plain click; shift extends from A.
    model.shift_click(&view, 1);
    assert_eq!(model.selected_ids(), vec!["A", "B"]);
}

#[test]
fn shift_click_selects_inclusive_range_both_directions() {
    let view = items(&["A", "B", "C", "D", "E"]);
    let mut model = SelectionModel::default();
    model.click(&view, 1); // B
    model.shift_click(&view, 3); // D
    assert_eq!(model.selected_ids(), vec!["B", "C", "D"]);

    // Re-anchored range is recomputed, not unioned with the prior one.
    model.shift_click(&view, 0); // A, anchor still B
    assert_eq!(model.selected_ids(), vec!["A", "B"]);
}

#[test]
fn shift_click_without_anchor_falls_back_to_focus_then_index() {
    let view = items(&["A", "B", "C"]);
    let mut model = SelectionModel::default();
    model.shift_click(&view, 2);
    assert_eq!(model.selected_ids(), vec!["C"]);
}

#[test]
fn key_move_clamps_at_view_bounds() {
    let view = items(&["A", "B"]);
    let mut model = SelectionModel::default();
    model.click(&view, 0);
    model.key_move(&view, KeyDirection::Up, false);
    assert_eq!(model.selected_ids(), vec!["A"]);

    model.key_move(&view, KeyDirection::Down, false);
    model.key_move(&view, KeyDirection::Down, false);
    assert_eq!(model.selected_ids(), vec!["B"]);
}

#[test]
fn shift_key_move_extends_like_shift_click() {
    let view = items(&["A", "B", "C", "D"]);
    let mut model = SelectionModel::default();
    model.click(&view, 1);
    model.key_move(&view, KeyDirection::Down, true);
    model.key_move(&view, KeyDirection::Down, true);
    assert_eq!(model.selected_ids(), vec!["B", "C", "D"]);

    // Dropping shift collapses to the new focus and re-anchors there.
    model.key_move(&view, KeyDirection::Up, false);
    assert_eq!(model.selected_ids(), vec!["C"]);
    model.key_move(&view, KeyDirection::Up, true);
    assert_eq!(model.selected_ids(), vec!["B", "C"]);
}

#[test]
fn stale_indices_clamp_instead_of_panicking() {
    let long = items(&["A", "B", "C", "D", "E"]);
    let mut model = SelectionModel::default();
    model.click(&long, 4);

    // View shrank after a filter; stored indices now point past the end.
    let short = items(&["A", "B"]);
    model.shift_click(&short, 1);
    assert_eq!(model.selected_ids(), vec!["B"]);

    model.key_move(&short, KeyDirection::Down, false);
    assert_eq!(model.selected_ids(), vec!["B"]);

    model.click(&[], 0);
    assert_eq!(model.selected_ids(), vec!["B"], "empty view is a no-op");
}

#[test]
fn context_click_outside_selection_collapses_to_target() {
    let view = items(&["A", "B", "C", "D"]);
    let mut model = SelectionModel::default();
    model.click(&view, 0);
    model.shift_click(&view, 2);
    assert_eq!(model.selected_ids(), vec!["A", "B", "C"]);

    model.context_click(&view, 3);
    assert_eq!(model.selected_ids(), vec!["D"]);
}

#[test]
fn context_click_inside_selection_preserves_it() {
    let view = items(&["A", "B", "C"]);
    let mut model = SelectionModel::default();
    model.click(&view, 0);
    model.shift_click(&view, 2);

    model.context_click(&view, 1);
    assert_eq!(model.selected_ids(), vec!["A", "B", "C"]);
}

#[test]
fn marquee_selects_exactly_the_intersected_boxes() {
    let view = boxed(&["A", "B", "C", "D", "E"]);
    let mut model = SelectionModel::default();

    // Rows B (y 24..44) and C (y 48..68) fall fully inside; A, D, E do not.
    model.begin_marquee(0.0, 22.0);
    model.update_marquee(&view, 100.0, 70.0);
    assert_eq!(model.selected_ids(), vec!["B", "C"]);
}

#[test]
fn marquee_recomputes_from_scratch_each_move() {
    let view = boxed(&["A", "B", "C", "D"]);
    let mut model = SelectionModel::default();

    model.begin_marquee(0.0, 0.0);
    model.update_marquee(&view, 100.0, 70.0);
    assert_eq!(model.selected_ids(), vec!["A", "B", "C"]);

    // Shrinking the drag drops items picked up earlier.
    model.update_marquee(&view, 100.0, 10.0);
    assert_eq!(model.selected_ids(), vec!["A"]);

    model.end_marquee();
    assert_eq!(model.selected_ids(), vec!["A"]);
}

#[test]
fn marquee_upward_drag_normalizes_rectangle() {
    let view = boxed(&["A", "B", "C"]);
    let mut model = SelectionModel::default();

    model.begin_marquee(100.0, 70.0);
    model.update_marquee(&view, 0.0, 22.0);
    assert_eq!(model.selected_ids(), vec!["B", "C"]);
}

#[test]
fn begin_marquee_clears_previous_selection() {
    let view = items(&["A", "B", "C"]);
    let mut model = SelectionModel::default();
    model.click(&view, 0);
    model.begin_marquee(0.0, 0.0);
    assert!(model.selected_ids().is_empty());
}
