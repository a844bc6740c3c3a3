//! Circle definitions, the only shape a bubble chart draws.

use svg::node::element as svg_element;

use crate::{color::Color, draw::StrokeDefinition, geometry::Point};

/// Visual definition for a filled, outlined circle.
///
/// The fill opacity travels with the fill [`Color`]'s alpha channel.
#[derive(Debug, Clone)]
pub struct CircleDefinition {
    fill: Color,
    stroke: StrokeDefinition,
}

impl CircleDefinition {
    pub fn new(fill: Color, stroke: StrokeDefinition) -> Self {
        Self { fill, stroke }
    }

    /// Returns the fill color
    pub fn fill(&self) -> Color {
        self.fill
    }

    /// Returns the outline stroke
    pub fn stroke(&self) -> &StrokeDefinition {
        &self.stroke
    }

    /// Renders a circle of `radius` centered on `center`.
    pub fn render_to_svg(&self, center: Point, radius: f64) -> svg_element::Circle {
        let circle = svg_element::Circle::new()
            .set("cx", center.x())
            .set("cy", center.y())
            .set("r", radius)
            .set("fill", self.fill.with_alpha(1.0).to_string())
            .set("fill-opacity", self.fill.alpha());

        crate::apply_stroke!(circle, &self.stroke)
    }
}
