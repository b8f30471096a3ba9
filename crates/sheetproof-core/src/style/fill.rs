//! Cell background

use super::Color;

/// Background of a cell
///
/// Codecs map pattern fills they cannot represent to their dominant color.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum FillStyle {
    /// Transparent
    #[default]
    None,
    /// One flat color
    Solid { color: Color },
}

impl FillStyle {
    pub fn solid(color: Color) -> Self {
        FillStyle::Solid { color }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, FillStyle::None)
    }

    /// The fill color, if there is one
    pub fn color(&self) -> Option<Color> {
        match self {
            FillStyle::None => None,
            FillStyle::Solid { color } => Some(*color),
        }
    }
}
