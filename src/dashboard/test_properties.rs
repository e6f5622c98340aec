//! Property-based tests for layout, formatting, rendering and normalization
//! invariants.

use proptest::prelude::*;

use super::format::{format_value, strip_markup, visible_width};
use super::layout::{Dimensions, compute_layout};
use super::render::{FIELD_WIDTH, Renderer};
use crate::sensors::normalize::normalize;
use crate::sensors::registry::{FieldId, FormatKind, Registry};
use crate::sensors::snapshot::{Snapshot, Value};

// ──────────────────── strategies ────────────────────

fn arb_dims() -> impl Strategy<Value = Dimensions> {
    (0u16..500, 0u16..500).prop_map(|(rows, cols)| Dimensions::new(rows, cols))
}

fn arb_kind() -> impl Strategy<Value = FormatKind> {
    prop_oneof![
        Just(FormatKind::Plain),
        Just(FormatKind::RpmWithThresholds),
        Just(FormatKind::TempWithThresholds),
        Just(FormatKind::FanModeTag),
        Just(FormatKind::PowerModeTag),
    ]
}

fn arb_value() -> impl Strategy<Value = Value> {
    prop_oneof![
        (-10_000i64..10_000).prop_map(Value::Integer),
        prop_oneof![
            Just("auto"),
            Just("fixed"),
            Just("curve"),
            Just("quiet"),
            Just("balanced"),
            Just("performance"),
        ]
        .prop_map(Value::from),
        "[a-z0-9 °]{0,24}".prop_map(Value::Text),
        Just(Value::NotApplicable),
    ]
}

fn arb_snapshot() -> impl Strategy<Value = Snapshot> {
    proptest::collection::vec(
        (proptest::sample::select(FieldId::ALL.to_vec()), arb_value()),
        0..FieldId::ALL.len() * 2,
    )
    .prop_map(|pairs| pairs.into_iter().collect())
}

fn arb_mode() -> impl Strategy<Value = &'static str> {
    prop_oneof![Just("auto"), Just("fixed"), Just("curve"), Just("manual")]
}

// ──────────────────── properties ────────────────────

proptest! {
    #[test]
    fn layout_is_deterministic(dims in arb_dims()) {
        let registry = Registry::builtin();
        prop_assert_eq!(compute_layout(dims, &registry), compute_layout(dims, &registry));
    }

    #[test]
    fn coordinates_and_cells_stay_in_bounds(dims in arb_dims()) {
        let map = compute_layout(dims, &Registry::builtin());
        for (_, c) in map.fields() {
            prop_assert!(c.row < dims.rows);
            prop_assert!(c.col < dims.cols);
        }
        for b in map.blocks() {
            prop_assert!(b.row < dims.rows && b.col < dims.cols);
        }
    }

    #[test]
    fn blocks_are_placed_whole_or_not_at_all(dims in arb_dims(), count in 0usize..=4) {
        let registry = Registry::builtin().truncated(count);
        let map = compute_layout(dims, &registry);
        for block in registry.blocks() {
            let placed = block.fields.iter().filter(|id| map.coordinate(**id).is_some()).count();
            prop_assert!(placed == 0 || placed == block.fields.len(), "{:?}", block.id);
        }
        prop_assert_eq!(map.blocks().len() + map.dropped_blocks(), registry.blocks().len());
    }

    #[test]
    fn placed_blocks_form_a_prefix(dims in arb_dims()) {
        let registry = Registry::builtin();
        let map = compute_layout(dims, &registry);
        let placed: Vec<_> = map.blocks().iter().map(|b| b.block).collect();
        let expected: Vec<_> = registry.blocks().iter().take(placed.len()).map(|b| b.id).collect();
        prop_assert_eq!(placed, expected);
    }

    #[test]
    fn markup_width_matches_text_width(value in arb_value(), kind in arb_kind(), color in any::<bool>()) {
        let display = format_value(&value, kind);
        let markup = display.to_markup(color);
        prop_assert_eq!(visible_width(&markup), display.visible_width());
        prop_assert_eq!(strip_markup(&markup), display.text);
    }

    #[test]
    fn draw_values_is_idempotent(dims in arb_dims(), snapshot in arb_snapshot(), color in any::<bool>()) {
        let registry = Registry::builtin();
        let map = compute_layout(dims, &registry);
        let mut first = Renderer::new(Vec::new(), color);
        let mut second = Renderer::new(Vec::new(), color);
        first.draw_values(&map, &registry, &snapshot).unwrap();
        second.draw_values(&map, &registry, &snapshot).unwrap();
        second.draw_values(&map, &registry, &snapshot).unwrap();

        let once = first.into_inner();
        let twice = second.into_inner();
        prop_assert_eq!(twice.len(), once.len() * 2);
        prop_assert_eq!(&twice[..once.len()], &twice[once.len()..]);
    }

    #[test]
    fn value_cells_never_exceed_field_width(dims in arb_dims(), snapshot in arb_snapshot()) {
        let registry = Registry::builtin();
        let map = compute_layout(dims, &registry);
        let mut renderer = Renderer::new(Vec::new(), false);
        renderer.draw_values(&map, &registry, &snapshot).unwrap();
        let out = String::from_utf8(renderer.into_inner()).unwrap();
        // Each cell is "ESC [ row ; col H" followed by its text.
        for cell in out.split('\x1b').filter(|s| !s.is_empty()) {
            let text = cell.split_once('H').map_or("", |(_, t)| t);
            prop_assert!(text.chars().count() <= usize::from(FIELD_WIDTH));
        }
    }

    #[test]
    fn normalize_is_idempotent(snapshot in arb_snapshot()) {
        let once = normalize(&snapshot);
        prop_assert_eq!(normalize(&once), once);
    }

    #[test]
    fn normalize_only_adds_governed_fields(
        snapshot in arb_snapshot(),
        fan1 in arb_mode(),
        fan2 in arb_mode(),
    ) {
        let raw = snapshot.with(FieldId::Fan1Mode, fan1).with(FieldId::Fan2Mode, fan2);
        let out = normalize(&raw);
        for (id, value) in raw.iter() {
            prop_assert!(out.get(id).is_some(), "{} dropped", id);
            if out.get(id) != Some(value) {
                prop_assert!(out.get(id).is_some_and(Value::is_not_applicable));
            }
        }
        for (id, value) in out.iter() {
            if raw.get(id).is_none() {
                prop_assert!(value.is_not_applicable(), "{} invented as {:?}", id, value);
            }
        }
        prop_assert_eq!(out.get(FieldId::Fan1Mode), raw.get(FieldId::Fan1Mode));
        prop_assert_eq!(out.get(FieldId::Fan2Rpm), raw.get(FieldId::Fan2Rpm));
    }
}
