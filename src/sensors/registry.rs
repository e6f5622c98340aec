//! Static field and block tables.
//!
//! Every displayed value is a [`FieldId`]; each field carries a label, a
//! [`FormatKind`] and the block it is drawn in. Blocks are drawn as units of
//! fixed height: one title row, up to four field rows, one spacer.

#![allow(missing_docs)]

use std::fmt;

/// Rows occupied by every block: title + up to 4 fields + spacer.
pub const BLOCK_HEIGHT: u16 = 6;
/// Most fields a block can hold within [`BLOCK_HEIGHT`].
pub const MAX_FIELDS_PER_BLOCK: usize = (BLOCK_HEIGHT as usize) - 2;

/// Closed set of sensor fields, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FieldId {
    Fan1Rpm,
    Fan1Mode,
    Fan1Level,
    Fan1RampUp,
    Fan1RampDown,
    Fan2Rpm,
    Fan2Mode,
    Fan2Level,
    Fan2RampUp,
    Fan2RampDown,
    TempCurrent,
    TempMin,
    TempMax,
    PowerMode,
}

impl FieldId {
    pub const ALL: [Self; 14] = [
        Self::Fan1Rpm,
        Self::Fan1Mode,
        Self::Fan1Level,
        Self::Fan1RampUp,
        Self::Fan1RampDown,
        Self::Fan2Rpm,
        Self::Fan2Mode,
        Self::Fan2Level,
        Self::Fan2RampUp,
        Self::Fan2RampDown,
        Self::TempCurrent,
        Self::TempMin,
        Self::TempMax,
        Self::PowerMode,
    ];

    /// Dotted identifier used in JSON output.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Fan1Rpm => "fan1.rpm",
            Self::Fan1Mode => "fan1.mode",
            Self::Fan1Level => "fan1.level",
            Self::Fan1RampUp => "fan1.rampUp",
            Self::Fan1RampDown => "fan1.rampDown",
            Self::Fan2Rpm => "fan2.rpm",
            Self::Fan2Mode => "fan2.mode",
            Self::Fan2Level => "fan2.level",
            Self::Fan2RampUp => "fan2.rampUp",
            Self::Fan2RampDown => "fan2.rampDown",
            Self::TempCurrent => "temp.current",
            Self::TempMin => "temp.min",
            Self::TempMax => "temp.max",
            Self::PowerMode => "power.mode",
        }
    }

    /// File name of the field below the sysfs root.
    #[must_use]
    pub const fn sysfs_name(self) -> &'static str {
        match self {
            Self::Fan1Rpm => "fan1_rpm",
            Self::Fan1Mode => "fan1_mode",
            Self::Fan1Level => "fan1_level",
            Self::Fan1RampUp => "fan1_ramp_up",
            Self::Fan1RampDown => "fan1_ramp_down",
            Self::Fan2Rpm => "fan2_rpm",
            Self::Fan2Mode => "fan2_mode",
            Self::Fan2Level => "fan2_level",
            Self::Fan2RampUp => "fan2_ramp_up",
            Self::Fan2RampDown => "fan2_ramp_down",
            Self::TempCurrent => "temp_current",
            Self::TempMin => "temp_min",
            Self::TempMax => "temp_max",
            Self::PowerMode => "power_mode",
        }
    }

    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|id| id.key() == key)
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// How a field's raw value is turned into display text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatKind {
    Plain,
    RpmWithThresholds,
    TempWithThresholds,
    FanModeTag,
    PowerModeTag,
}

/// Logical group of fields drawn under one title.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BlockId {
    Fan1,
    Fan2,
    RampCurves,
    ThermalPower,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub id: FieldId,
    pub label: &'static str,
    pub kind: FormatKind,
    pub block: BlockId,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockSpec {
    pub id: BlockId,
    pub title: &'static str,
    pub fields: Vec<FieldId>,
}

impl BlockSpec {
    /// Rows the block occupies on screen, spacer included.
    #[must_use]
    pub const fn height(&self) -> u16 {
        BLOCK_HEIGHT
    }
}

/// Field and block tables the layout engine and renderer read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registry {
    fields: Vec<FieldSpec>,
    blocks: Vec<BlockSpec>,
}

const fn field(id: FieldId, label: &'static str, kind: FormatKind, block: BlockId) -> FieldSpec {
    FieldSpec {
        id,
        label,
        kind,
        block,
    }
}

impl Registry {
    /// The dashboard's own tables.
    #[must_use]
    pub fn builtin() -> Self {
        use BlockId::{Fan1, Fan2, RampCurves, ThermalPower};
        use FieldId as F;
        use FormatKind as K;

        let fields = vec![
            field(F::Fan1Rpm, "Speed", K::RpmWithThresholds, Fan1),
            field(F::Fan1Mode, "Mode", K::FanModeTag, Fan1),
            field(F::Fan1Level, "Level", K::Plain, Fan1),
            field(F::Fan1RampUp, "Fan 1 ramp up", K::Plain, RampCurves),
            field(F::Fan1RampDown, "Fan 1 ramp down", K::Plain, RampCurves),
            field(F::Fan2Rpm, "Speed", K::RpmWithThresholds, Fan2),
            field(F::Fan2Mode, "Mode", K::FanModeTag, Fan2),
            field(F::Fan2Level, "Level", K::Plain, Fan2),
            field(F::Fan2RampUp, "Fan 2 ramp up", K::Plain, RampCurves),
            field(F::Fan2RampDown, "Fan 2 ramp down", K::Plain, RampCurves),
            field(F::TempCurrent, "Temperature", K::TempWithThresholds, ThermalPower),
            field(F::TempMin, "Minimum", K::TempWithThresholds, ThermalPower),
            field(F::TempMax, "Maximum", K::TempWithThresholds, ThermalPower),
            field(F::PowerMode, "Power mode", K::PowerModeTag, ThermalPower),
        ];

        let blocks = vec![
            BlockSpec {
                id: Fan1,
                title: "Fan 1",
                fields: vec![F::Fan1Rpm, F::Fan1Mode, F::Fan1Level],
            },
            BlockSpec {
                id: Fan2,
                title: "Fan 2",
                fields: vec![F::Fan2Rpm, F::Fan2Mode, F::Fan2Level],
            },
            BlockSpec {
                id: RampCurves,
                title: "Ramp Curves",
                fields: vec![
                    F::Fan1RampUp,
                    F::Fan1RampDown,
                    F::Fan2RampUp,
                    F::Fan2RampDown,
                ],
            },
            BlockSpec {
                id: ThermalPower,
                title: "Thermal & Power",
                fields: vec![F::TempCurrent, F::TempMin, F::TempMax, F::PowerMode],
            },
        ];

        Self { fields, blocks }
    }

    /// Blocks in declared (packing) order.
    #[must_use]
    pub fn blocks(&self) -> &[BlockSpec] {
        &self.blocks
    }

    #[must_use]
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    #[must_use]
    pub fn field(&self, id: FieldId) -> Option<&FieldSpec> {
        self.fields.iter().find(|spec| spec.id == id)
    }

    #[must_use]
    pub fn block(&self, id: BlockId) -> Option<&BlockSpec> {
        self.blocks.iter().find(|spec| spec.id == id)
    }

    /// Copy of the registry keeping only the first `count` blocks.
    #[must_use]
    pub fn truncated(&self, count: usize) -> Self {
        let blocks: Vec<BlockSpec> = self.blocks.iter().take(count).cloned().collect();
        let fields = self
            .fields
            .iter()
            .filter(|f| blocks.iter().any(|b| b.id == f.block))
            .copied()
            .collect();
        Self { fields, blocks }
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::builtin()
    }
}
