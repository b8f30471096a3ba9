//! Font settings
//!
//! Carried through highlighting untouched.

use super::Color;

#[derive(Debug, Clone, PartialEq)]
pub struct FontStyle {
    /// Family, e.g. "Calibri"
    pub name: String,
    /// Size in points
    pub size: f64,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub color: Color,
}

impl Default for FontStyle {
    fn default() -> Self {
        Self {
            name: "Calibri".to_string(),
            size: 11.0,
            bold: false,
            italic: false,
            underline: false,
            color: Color::Auto,
        }
    }
}

// f64 has no Hash; hash the bit pattern so equal sizes hash alike
impl std::hash::Hash for FontStyle {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.size.to_bits().hash(state);
        (self.bold, self.italic, self.underline).hash(state);
        self.color.hash(state);
    }
}

impl Eq for FontStyle {}
