//! Cell storage implementation
//!
//! Sparse storage for worksheet cells. Only non-empty cells are stored, using
//! a row-based BTreeMap so iteration is always row-major.

use std::collections::BTreeMap;

use super::CellValue;
use crate::style::StylePool;

/// Complete data for a single cell
#[derive(Debug, Clone, PartialEq)]
pub struct CellData {
    /// The cell's value
    pub value: CellValue,
    /// Index into the style pool (0 = default style)
    pub style_index: u32,
}

impl CellData {
    /// Create a new cell with a value and default style
    pub fn new(value: CellValue) -> Self {
        Self {
            value,
            style_index: 0,
        }
    }

    /// Check if this cell is effectively empty (no value and default style)
    pub fn is_empty(&self) -> bool {
        self.value.is_empty() && self.style_index == 0
    }
}

impl Default for CellData {
    fn default() -> Self {
        Self::new(CellValue::Empty)
    }
}

/// Sparse row-based storage for worksheet cells
///
/// Structure: `BTreeMap<row_index, BTreeMap<col_index, CellData>>`
#[derive(Debug, Clone, Default)]
pub struct CellStorage {
    rows: BTreeMap<u32, BTreeMap<u16, CellData>>,
    style_pool: StylePool,
}

impl CellStorage {
    /// Create empty storage
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a cell
    pub fn get(&self, row: u32, col: u16) -> Option<&CellData> {
        self.rows.get(&row).and_then(|r| r.get(&col))
    }

    /// Get a mutable cell
    pub fn get_mut(&mut self, row: u32, col: u16) -> Option<&mut CellData> {
        self.rows.get_mut(&row).and_then(|r| r.get_mut(&col))
    }

    /// Set a cell's value, keeping its style
    pub fn set_value(&mut self, row: u32, col: u16, value: CellValue) {
        let cell = self.rows.entry(row).or_default().entry(col).or_default();
        cell.value = value;
        if cell.is_empty() {
            self.remove(row, col);
        }
    }

    /// Set a cell's style index, keeping its value
    pub fn set_style(&mut self, row: u32, col: u16, style_index: u32) {
        let cell = self.rows.entry(row).or_default().entry(col).or_default();
        cell.style_index = style_index;
        if cell.is_empty() {
            self.remove(row, col);
        }
    }

    /// Remove a cell
    pub fn remove(&mut self, row: u32, col: u16) -> Option<CellData> {
        let row_map = self.rows.get_mut(&row)?;
        let removed = row_map.remove(&col);
        if row_map.is_empty() {
            self.rows.remove(&row);
        }
        removed
    }

    /// Number of stored cells
    pub fn len(&self) -> usize {
        self.rows.values().map(BTreeMap::len).sum()
    }

    /// Check if no cells are stored
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Iterate over stored cells in row-major order
    pub fn iter(&self) -> impl Iterator<Item = (u32, u16, &CellData)> {
        self.rows
            .iter()
            .flat_map(|(&row, cols)| cols.iter().map(move |(&col, cell)| (row, col, cell)))
    }

    /// The style pool referenced by stored cells
    pub fn style_pool(&self) -> &StylePool {
        &self.style_pool
    }

    /// Mutable access to the style pool
    pub fn style_pool_mut(&mut self) -> &mut StylePool {
        &mut self.style_pool
    }
}
