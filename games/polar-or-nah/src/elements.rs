//! CPK display styles for the elements the catalog uses.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ElementStyle {
    /// Sphere color as `#RRGGBB`.
    pub color: &'static str,
    /// Sphere radius in scene units.
    pub radius: f32,
    /// Label color drawn over the sphere.
    pub text_color: &'static str,
}

impl ElementStyle {
    const fn new(color: &'static str, radius: f32, text_color: &'static str) -> Self {
        Self { color, radius, text_color }
    }
}

/// Used for any symbol missing from the table.
pub const FALLBACK_STYLE: ElementStyle = ElementStyle::new("#FF69B4", 0.5, "#000000");

const STYLES: &[(&str, ElementStyle)] = &[
    ("H", ElementStyle::new("#FFFFFF", 0.3, "#000000")),
    ("C", ElementStyle::new("#909090", 0.5, "#FFFFFF")),
    ("N", ElementStyle::new("#3050F8", 0.5, "#FFFFFF")),
    ("O", ElementStyle::new("#FF0D0D", 0.5, "#FFFFFF")),
    ("F", ElementStyle::new("#90E050", 0.45, "#000000")),
    ("Cl", ElementStyle::new("#1FF01F", 0.6, "#000000")),
    ("B", ElementStyle::new("#FFB5B5", 0.5, "#000000")),
    ("P", ElementStyle::new("#FF8000", 0.6, "#000000")),
    ("Xe", ElementStyle::new("#429EB0", 0.65, "#000000")),
];

/// Style for an element symbol (case-sensitive, "Cl" not "CL").
pub fn style_for(symbol: &str) -> ElementStyle {
    STYLES
        .iter()
        .find(|(s, _)| *s == symbol)
        .map(|(_, style)| *style)
        .unwrap_or(FALLBACK_STYLE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;

    #[test]
    fn known_symbols() {
        assert_eq!(style_for("O").color, "#FF0D0D");
        assert_eq!(style_for("H").radius, 0.3);
        assert_eq!(style_for("Xe").radius, 0.65);
    }

    #[test]
    fn unknown_symbol_falls_back() {
        assert_eq!(style_for("Uuo"), FALLBACK_STYLE);
        assert_eq!(style_for("cl"), FALLBACK_STYLE);
    }

    #[test]
    fn every_catalog_element_has_a_style() {
        let catalog = Catalog::load().unwrap();
        for molecule in catalog.iter() {
            for atom in &molecule.atoms {
                assert_ne!(
                    style_for(&atom.element),
                    FALLBACK_STYLE,
                    "{} in {} has no style",
                    atom.element,
                    molecule.id
                );
            }
        }
    }
}
