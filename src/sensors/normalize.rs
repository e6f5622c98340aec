//! Mode-dependent substitution of "not applicable" markers.
//!
//! A fan in `auto` or `fixed` mode ignores its ramp curve, and a fan in `auto`
//! mode also ignores its manual level. Those fields still hold stale numbers in
//! sysfs, so they are replaced with [`Value::NotApplicable`] before display.
//! The marker is written even when the raw snapshot lacks the field, so a
//! governed field never renders as missing.

use crate::sensors::registry::FieldId;
use crate::sensors::snapshot::{Snapshot, Value};

struct FanFields {
    mode: FieldId,
    level: FieldId,
    ramp_up: FieldId,
    ramp_down: FieldId,
}

const FANS: [FanFields; 2] = [
    FanFields {
        mode: FieldId::Fan1Mode,
        level: FieldId::Fan1Level,
        ramp_up: FieldId::Fan1RampUp,
        ramp_down: FieldId::Fan1RampDown,
    },
    FanFields {
        mode: FieldId::Fan2Mode,
        level: FieldId::Fan2Level,
        ramp_up: FieldId::Fan2RampUp,
        ramp_down: FieldId::Fan2RampDown,
    },
];

/// Apply the mode rules to a raw snapshot. Pure and idempotent.
#[must_use]
pub fn normalize(raw: &Snapshot) -> Snapshot {
    let mut out = raw.clone();
    for fan in &FANS {
        let mode = raw.get(fan.mode).and_then(Value::as_text).map(str::trim);
        let (curve_unused, level_unused) = match mode {
            Some("auto") => (true, true),
            Some("fixed") => (true, false),
            _ => (false, false),
        };
        if curve_unused {
            out.insert(fan.ramp_up, Value::NotApplicable);
            out.insert(fan.ramp_down, Value::NotApplicable);
        }
        if level_unused {
            out.insert(fan.level, Value::NotApplicable);
        }
    }
    out
}
