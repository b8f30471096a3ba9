//! Cell borders

use super::Color;

/// The four edges around a cell; `None` means no line on that side
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct BorderStyle {
    pub left: Option<BorderEdge>,
    pub right: Option<BorderEdge>,
    pub top: Option<BorderEdge>,
    pub bottom: Option<BorderEdge>,
}

impl BorderStyle {
    pub fn new() -> Self {
        Self::default()
    }

    /// The same line on all four sides
    pub fn outline(line: BorderLineStyle, color: Color) -> Self {
        let edge = Some(BorderEdge::new(line, color));
        Self {
            left: edge.clone(),
            right: edge.clone(),
            top: edge.clone(),
            bottom: edge,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.edges().all(Option::is_none)
    }

    /// Left, right, top, bottom
    pub fn edges(&self) -> impl Iterator<Item = &Option<BorderEdge>> {
        [&self.left, &self.right, &self.top, &self.bottom].into_iter()
    }
}

/// One side of a cell border
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BorderEdge {
    pub style: BorderLineStyle,
    pub color: Color,
}

impl BorderEdge {
    pub fn new(style: BorderLineStyle, color: Color) -> Self {
        Self { style, color }
    }
}

/// Line weight of a border edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BorderLineStyle {
    #[default]
    None,
    Thin,
    Medium,
    Thick,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outline() {
        let border = BorderStyle::outline(BorderLineStyle::Thin, Color::BLACK);
        assert!(border
            .edges()
            .all(|e| e.as_ref().map(|e| e.style) == Some(BorderLineStyle::Thin)));
        assert!(!border.is_empty());
        assert!(BorderStyle::new().is_empty());
    }
}
