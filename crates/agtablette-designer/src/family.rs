//! # Shape Families
//!
//! A family is a named catalog of shape templates. The create tool picks a
//! template from a family and instantiates it at the click position.

use agtablette_core::{Color, ShapeError};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::{validate_build_steps, Coordinates, Shape, ShapeStep};

/// A named outline with its color, as stored in a family.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeTemplate {
    pub name: String,
    pub build_steps: Vec<ShapeStep>,
    pub color: Color,
}

impl ShapeTemplate {
    /// Instantiates the template as a shape anchored at `position`.
    pub fn instantiate(&self, family_name: &str, position: Coordinates) -> Result<Shape, ShapeError> {
        Shape::from_build_steps(
            self.name.clone(),
            family_name,
            self.color.clone(),
            position,
            self.build_steps.iter().map(ShapeStep::copy).collect(),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Family {
    pub id: Uuid,
    pub name: String,
    pub default_color: Color,
    #[serde(rename = "shapesList")]
    shapes: Vec<ShapeTemplate>,
}

impl Family {
    pub fn new(name: impl Into<String>, default_color: impl Into<Color>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            default_color: default_color.into(),
            shapes: Vec::new(),
        }
    }

    pub fn shapes(&self) -> &[ShapeTemplate] {
        &self.shapes
    }

    /// Adds a template. Invalid build steps are logged and the family is
    /// left unchanged. A missing color falls back to the family default.
    pub fn add_shape(
        &mut self,
        name: impl Into<String>,
        build_steps: Vec<ShapeStep>,
        color: Option<Color>,
    ) -> Result<(), ShapeError> {
        let name = name.into();
        if let Err(e) = validate_build_steps(&name, &build_steps) {
            tracing::warn!("Family '{}': template rejected: {}", self.name, e);
            return Err(e);
        }
        let color = color.unwrap_or_else(|| self.default_color.clone());
        self.shapes.push(ShapeTemplate {
            name,
            build_steps,
            color,
        });
        Ok(())
    }

    /// Deep copy of the named template, or `None` when the family has no
    /// template of that name.
    pub fn get_shape_data(&self, name: &str) -> Option<ShapeTemplate> {
        self.shapes.iter().find(|t| t.name == name).map(|t| ShapeTemplate {
            name: t.name.clone(),
            build_steps: t.build_steps.iter().map(ShapeStep::copy).collect(),
            color: t.color.clone(),
        })
    }

    /// Like [`get_shape_data`](Self::get_shape_data), for names that must exist.
    pub fn require_shape_data(&self, name: &str) -> Result<ShapeTemplate, ShapeError> {
        self.get_shape_data(name)
            .ok_or_else(|| ShapeError::TemplateNotFound {
                family: self.name.clone(),
                name: name.to_string(),
            })
    }

    /// The built-in catalog of regular shapes.
    pub fn standard(default_color: impl Into<Color>) -> Self {
        let mut family = Family::new("Formes standard", default_color);
        let templates: [(&str, Vec<ShapeStep>, Option<&str>); 5] = [
            (
                "Triangle équilatéral",
                vec![
                    ShapeStep::line(0.0, 0.0),
                    ShapeStep::line(50.0, 0.0),
                    ShapeStep::line(25.0, -43.301),
                    ShapeStep::line(0.0, 0.0),
                ],
                Some("#FF0"),
            ),
            (
                "Carré",
                vec![
                    ShapeStep::line(0.0, 0.0),
                    ShapeStep::line(50.0, 0.0),
                    ShapeStep::line(50.0, -50.0),
                    ShapeStep::line(0.0, -50.0),
                    ShapeStep::line(0.0, 0.0),
                ],
                Some("#F00"),
            ),
            (
                "Losange",
                vec![
                    ShapeStep::line(0.0, 0.0),
                    ShapeStep::line(50.0, 0.0),
                    ShapeStep::line(75.0, -43.301),
                    ShapeStep::line(25.0, -43.301),
                    ShapeStep::line(0.0, 0.0),
                ],
                Some("#0F0"),
            ),
            (
                "Hexagone régulier",
                vec![
                    ShapeStep::line(0.0, 0.0),
                    ShapeStep::line(50.0, 0.0),
                    ShapeStep::line(75.0, -43.301),
                    ShapeStep::line(50.0, -86.603),
                    ShapeStep::line(0.0, -86.603),
                    ShapeStep::line(-25.0, -43.301),
                    ShapeStep::line(0.0, 0.0),
                ],
                Some("#00F"),
            ),
            (
                "Disque",
                vec![
                    ShapeStep::line(0.0, -25.0),
                    ShapeStep::arc(0.0, 25.0, 180.0, true),
                    ShapeStep::arc(0.0, -25.0, 180.0, true),
                ],
                None,
            ),
        ];
        for (name, steps, color) in templates {
            if let Err(e) = family.add_shape(name, steps, color.map(str::to_string)) {
                tracing::error!("Built-in template '{}' is invalid: {}", name, e);
            }
        }
        family
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_shape_rejects_empty_steps() {
        let mut family = Family::new("Test", "#123");
        assert!(family.add_shape("vide", vec![], None).is_err());
        assert!(family.shapes().is_empty());
    }

    #[test]
    fn test_add_shape_color_fallback() {
        let mut family = Family::new("Test", "#123");
        family
            .add_shape("a", vec![ShapeStep::line(0.0, 0.0)], None)
            .unwrap();
        family
            .add_shape("b", vec![ShapeStep::line(0.0, 0.0)], Some("#fff".to_string()))
            .unwrap();
        assert_eq!(family.get_shape_data("a").unwrap().color, "#123");
        assert_eq!(family.get_shape_data("b").unwrap().color, "#fff");
    }

    #[test]
    fn test_get_shape_data_is_a_deep_copy() {
        let family = Family::standard("#aaa");
        let mut copy = family.get_shape_data("Carré").unwrap();
        copy.build_steps[1] = ShapeStep::line(999.0, 999.0);
        assert_eq!(
            family.get_shape_data("Carré").unwrap().build_steps[1],
            ShapeStep::line(50.0, 0.0)
        );
        assert!(family.get_shape_data("Inconnue").is_none());
        assert!(matches!(
            family.require_shape_data("Inconnue"),
            Err(ShapeError::TemplateNotFound { .. })
        ));
    }

    #[test]
    fn test_standard_catalog() {
        let family = Family::standard("#aaa");
        assert_eq!(family.shapes().len(), 5);
        assert_eq!(family.get_shape_data("Disque").unwrap().color, "#aaa");
        let shape = family
            .get_shape_data("Disque")
            .unwrap()
            .instantiate(&family.name, Coordinates::new(10.0, 10.0))
            .unwrap();
        assert_eq!(shape.family_name, "Formes standard");
        assert_eq!(shape.position(), Coordinates::new(10.0, 10.0));
    }
}
