//! Column packing of blocks and per-field screen coordinates.
//!
//! The screen is split into fixed 40-column lanes. Blocks are packed first-fit
//! top to bottom, then left to right, in declared order, starting below the
//! title and status rows and stopping above the footer. Blocks that do not fit
//! are dropped together with every block after them; a [`LayoutMap`] never
//! holds a coordinate outside the terminal.

#![allow(missing_docs)]

use std::collections::BTreeMap;

use crate::sensors::registry::{BlockId, FieldId, Registry};

/// Width of one block lane.
pub const COLUMN_WIDTH: u16 = 40;
/// First row available to blocks (row 0 is the title, row 1 the status line).
pub const TOP_ROW: u16 = 2;
/// Rows reserved for title, status and the two footer rows.
pub const RESERVED_ROWS: u16 = 4;
/// Offset of the value cell from the block's left edge.
pub const LABEL_OFFSET: u16 = 20;
/// Indent of field labels from the block's left edge.
pub const LABEL_INDENT: u16 = 2;

/// Terminal size in character cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Dimensions {
    pub rows: u16,
    pub cols: u16,
}

impl Dimensions {
    #[must_use]
    pub const fn new(rows: u16, cols: u16) -> Self {
        Self { rows, cols }
    }

    /// Rows available to blocks.
    #[must_use]
    pub const fn usable_rows(self) -> u16 {
        self.rows.saturating_sub(RESERVED_ROWS)
    }

    /// Number of block lanes, at least one.
    #[must_use]
    pub const fn column_count(self) -> u16 {
        let n = self.cols / COLUMN_WIDTH;
        if n == 0 { 1 } else { n }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ScreenCoordinate {
    pub row: u16,
    pub col: u16,
}

/// Top-left corner of a placed block (its title cell).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockPlacement {
    pub block: BlockId,
    pub row: u16,
    pub col: u16,
}

/// Result of one layout pass. Built whole by [`compute_layout`]; a resize
/// produces a new value rather than editing this one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutMap {
    dims: Dimensions,
    coords: BTreeMap<FieldId, ScreenCoordinate>,
    blocks: Vec<BlockPlacement>,
    dropped_blocks: usize,
}

impl LayoutMap {
    /// Dimensions this map was computed for.
    #[must_use]
    pub const fn dimensions(&self) -> Dimensions {
        self.dims
    }

    /// Value-cell coordinate of a field, if its block was placed.
    #[must_use]
    pub fn coordinate(&self, id: FieldId) -> Option<ScreenCoordinate> {
        self.coords.get(&id).copied()
    }

    /// Placed fields in [`FieldId`] order.
    pub fn fields(&self) -> impl Iterator<Item = (FieldId, ScreenCoordinate)> + '_ {
        self.coords.iter().map(|(id, coord)| (*id, *coord))
    }

    #[must_use]
    pub fn blocks(&self) -> &[BlockPlacement] {
        &self.blocks
    }

    /// Number of registry blocks left off screen.
    #[must_use]
    pub const fn dropped_blocks(&self) -> usize {
        self.dropped_blocks
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.coords.len()
    }
}

/// Assign every field of every block that fits a value-cell coordinate.
#[must_use]
pub fn compute_layout(dims: Dimensions, registry: &Registry) -> LayoutMap {
    let columns = dims.column_count();
    let bottom = TOP_ROW + dims.usable_rows();

    let mut coords = BTreeMap::new();
    let mut blocks = Vec::new();
    let mut column: u16 = 0;
    let mut row = TOP_ROW;

    for block in registry.blocks() {
        let height = block.height();
        if row + height > bottom {
            column += 1;
            row = TOP_ROW;
        }
        let left = column * COLUMN_WIDTH;
        // Taller than the usable area, out of lanes, or no room for the value
        // cell: nothing from here on can be placed.
        if column >= columns || row + height > bottom || left + LABEL_OFFSET >= dims.cols {
            break;
        }

        blocks.push(BlockPlacement {
            block: block.id,
            row,
            col: left,
        });
        for (offset, id) in (1u16..).zip(&block.fields) {
            coords.insert(
                *id,
                ScreenCoordinate {
                    row: row + offset,
                    col: left + LABEL_OFFSET,
                },
            );
        }
        row += height;
    }

    LayoutMap {
        dims,
        coords,
        dropped_blocks: registry.blocks().len() - blocks.len(),
        blocks,
    }
}
