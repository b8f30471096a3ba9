//! Worksheet type

use std::collections::BTreeMap;

use crate::cell::{CellAddress, CellData, CellStorage, CellValue};
use crate::comment::CellComment;
use crate::error::{Error, Result};
use crate::style::Style;
use crate::{MAX_COLS, MAX_ROWS};

/// A worksheet (single sheet in a workbook)
#[derive(Debug, Clone)]
pub struct Worksheet {
    /// Sheet name
    name: String,
    /// Cell storage
    cells: CellStorage,
    /// Cell comments (keyed by (row, col))
    comments: BTreeMap<(u32, u16), CellComment>,
}

impl Worksheet {
    /// Create a new worksheet with the given name
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            cells: CellStorage::new(),
            comments: BTreeMap::new(),
        }
    }

    /// Get the sheet name
    pub fn name(&self) -> &str {
        &self.name
    }

    // === Cell Access ===

    /// Get a cell by address string (e.g., "A1")
    pub fn cell(&self, address: &str) -> Result<Option<&CellData>> {
        let addr = CellAddress::parse(address)?;
        Ok(self.cells.get(addr.row, addr.col))
    }

    /// Get a cell by row and column indices
    pub fn cell_at(&self, row: u32, col: u16) -> Option<&CellData> {
        self.cells.get(row, col)
    }

    /// Get cell value by indices
    pub fn get_value_at(&self, row: u32, col: u16) -> CellValue {
        self.cells
            .get(row, col)
            .map(|c| c.value.clone())
            .unwrap_or(CellValue::Empty)
    }

    /// Iterate over stored cells in row-major order: (row, col, cell)
    pub fn cells(&self) -> impl Iterator<Item = (u32, u16, &CellData)> {
        self.cells.iter()
    }

    /// Number of stored (non-empty or styled) cells
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Get the style applied to a cell (the default style for unstyled cells)
    pub fn cell_style_at(&self, row: u32, col: u16) -> &Style {
        let idx = self.cells.get(row, col).map(|c| c.style_index).unwrap_or(0);
        self.cells
            .style_pool()
            .get(idx)
            .unwrap_or_else(|| self.cells.style_pool().default_style())
    }

    /// Get the style applied to a cell by address
    pub fn cell_style(&self, address: &str) -> Result<&Style> {
        let addr = CellAddress::parse(address)?;
        Ok(self.cell_style_at(addr.row, addr.col))
    }

    // === Cell Modification ===

    /// Set a cell value by address string
    pub fn set_cell_value<V: Into<CellValue>>(&mut self, address: &str, value: V) -> Result<()> {
        let addr = CellAddress::parse(address)?;
        self.set_cell_value_at(addr.row, addr.col, value)
    }

    /// Set a cell value by row and column indices
    pub fn set_cell_value_at<V: Into<CellValue>>(
        &mut self,
        row: u32,
        col: u16,
        value: V,
    ) -> Result<()> {
        validate_cell_position(row, col)?;
        self.cells.set_value(row, col, value.into());
        Ok(())
    }

    /// Set a cell style by address string
    pub fn set_cell_style(&mut self, address: &str, style: &Style) -> Result<()> {
        let addr = CellAddress::parse(address)?;
        self.set_cell_style_at(addr.row, addr.col, style)
    }

    /// Set a cell style by row and column indices
    pub fn set_cell_style_at(&mut self, row: u32, col: u16, style: &Style) -> Result<()> {
        validate_cell_position(row, col)?;
        let style_index = self.cells.style_pool_mut().get_or_insert(style.clone());
        self.cells.set_style(row, col, style_index);
        Ok(())
    }

    // === Cell Comments ===

    /// Set a comment on a cell by address string
    pub fn set_comment(&mut self, address: &str, comment: CellComment) -> Result<()> {
        let addr = CellAddress::parse(address)?;
        self.set_comment_at(addr.row, addr.col, comment);
        Ok(())
    }

    /// Set a comment on a cell by row and column indices
    pub fn set_comment_at(&mut self, row: u32, col: u16, comment: CellComment) {
        self.comments.insert((row, col), comment);
    }

    /// Get a comment from a cell by address string
    pub fn comment(&self, address: &str) -> Result<Option<&CellComment>> {
        let addr = CellAddress::parse(address)?;
        Ok(self.comment_at(addr.row, addr.col))
    }

    /// Get a comment from a cell by row and column indices
    pub fn comment_at(&self, row: u32, col: u16) -> Option<&CellComment> {
        self.comments.get(&(row, col))
    }

    /// Remove a comment from a cell by row and column indices
    pub fn remove_comment_at(&mut self, row: u32, col: u16) -> Option<CellComment> {
        self.comments.remove(&(row, col))
    }

    /// Get the number of comments in this worksheet
    pub fn comment_count(&self) -> usize {
        self.comments.len()
    }

    /// Iterate over all comments in row-major order: ((row, col), comment)
    pub fn comments(&self) -> impl Iterator<Item = ((u32, u16), &CellComment)> {
        self.comments.iter().map(|(&k, v)| (k, v))
    }
}

fn validate_cell_position(row: u32, col: u16) -> Result<()> {
    if row >= MAX_ROWS {
        return Err(Error::RowOutOfBounds(row, MAX_ROWS - 1));
    }
    if col >= MAX_COLS {
        return Err(Error::ColumnOutOfBounds(col, MAX_COLS - 1));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::Color;

    #[test]
    fn test_set_and_get_values() {
        let mut ws = Worksheet::new("Test");
        ws.set_cell_value("A1", "Hello").unwrap();
        ws.set_cell_value("B2", 42.0).unwrap();

        assert_eq!(ws.get_value_at(0, 0), CellValue::string("Hello"));
        assert_eq!(ws.get_value_at(1, 1), CellValue::Number(42.0));
        assert_eq!(ws.get_value_at(5, 5), CellValue::Empty);
    }

    #[test]
    fn test_out_of_bounds() {
        let mut ws = Worksheet::new("Test");
        assert!(ws.set_cell_value_at(MAX_ROWS, 0, "x").is_err());
        assert!(ws.set_cell_value_at(0, MAX_COLS, "x").is_err());
    }

    #[test]
    fn test_style_does_not_touch_value() {
        let mut ws = Worksheet::new("Test");
        ws.set_cell_value("A1", "Keep me").unwrap();
        let style = Style::new().fill_color(Color::YELLOW);
        ws.set_cell_style("A1", &style).unwrap();

        assert_eq!(ws.get_value_at(0, 0), CellValue::string("Keep me"));
        assert_eq!(ws.cell_style("A1").unwrap(), &style);
        assert_eq!(ws.cell_style("B1").unwrap(), &Style::default());
    }

    #[test]
    fn test_comments() {
        let mut ws = Worksheet::new("Test");
        ws.set_comment("C3", CellComment::new("a", "note")).unwrap();

        assert_eq!(ws.comment_count(), 1);
        assert_eq!(ws.comment_at(2, 2).unwrap().text, "note");
        assert_eq!(ws.remove_comment_at(2, 2).unwrap().author, "a");
        assert!(ws.comment("C3").unwrap().is_none());
    }
}
