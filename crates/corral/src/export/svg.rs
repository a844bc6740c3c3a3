use std::{fs, ops::ControlFlow, path::Path};

use log::{debug, error, info};
use svg::{Document, node::element as svg_element};

use corral_core::{
    color::Color,
    draw::CircleDefinition,
    geometry::{Bounds, Insets, Point, Size},
};

use crate::{
    config::AppConfig,
    error::CorralError,
    simulation::{Tick, TickObserver},
};

/// One circle of the current frame.
#[derive(Debug, Clone, Copy)]
struct Bubble {
    center: Point,
    radius: f64,
    flagged: bool,
}

/// Draws the latest simulation frame as an SVG bubble chart.
///
/// The document covers the plot area plus its margins; node coordinates are
/// relative to the plot area's top-left corner.
#[derive(Debug, Clone)]
pub struct SvgRenderer {
    size: Size,
    margin: Insets,
    flag_attribute: String,
    plain: CircleDefinition,
    flagged: CircleDefinition,
    background: Option<Color>,
    frame: Vec<Bubble>,
    frames_seen: usize,
}

impl SvgRenderer {
    /// Creates a renderer for the canvas and style in `config`.
    ///
    /// # Errors
    ///
    /// Returns [`CorralError::Config`] if a configured color or stroke style
    /// cannot be parsed.
    pub fn new(config: &AppConfig) -> Result<Self, CorralError> {
        let style = config.style();
        Ok(Self {
            size: config.layout().size(),
            margin: config.layout().margin(),
            flag_attribute: style.flag_attribute().to_string(),
            plain: style.circle(false)?,
            flagged: style.circle(true)?,
            background: style.background_color()?,
            frame: Vec::new(),
            frames_seen: 0,
        })
    }

    /// Returns how many ticks this renderer has observed
    pub fn frames_seen(&self) -> usize {
        self.frames_seen
    }

    /// Returns the bounds of all circles in the current frame, in plot-area
    /// coordinates, or `None` before the first frame or for an empty one.
    pub fn content_bounds(&self) -> Option<Bounds> {
        self.frame
            .iter()
            .map(|bubble| bubble.center.to_circle_bounds(bubble.radius))
            .reduce(|acc, bounds| acc.merge(&bounds))
    }

    /// Renders the current frame.
    pub fn render(&self) -> Document {
        let canvas = self.size.add_padding(self.margin);
        let mut doc = Document::new()
            .set(
                "viewBox",
                format!("0 0 {} {}", canvas.width(), canvas.height()),
            )
            .set("width", canvas.width())
            .set("height", canvas.height());

        if let Some(color) = &self.background {
            let background = svg_element::Rectangle::new()
                .set("x", 0)
                .set("y", 0)
                .set("width", canvas.width())
                .set("height", canvas.height())
                .set("fill", color);
            doc = doc.add(background);
        }

        let origin = self.margin.origin();
        let mut plot = svg_element::Group::new().set(
            "transform",
            format!("translate({}, {})", origin.x(), origin.y()),
        );
        for bubble in &self.frame {
            let definition = if bubble.flagged {
                &self.flagged
            } else {
                &self.plain
            };
            plot = plot.add(definition.render_to_svg(bubble.center, bubble.radius));
        }

        debug!(
            bubbles = self.frame.len(),
            width = canvas.width(),
            height = canvas.height();
            "SVG document rendered"
        );
        doc.add(plot)
    }

    /// Renders the current frame to a string.
    pub fn to_svg_string(&self) -> String {
        self.render().to_string()
    }

    /// Writes the current frame to `path`.
    ///
    /// # Errors
    ///
    /// Returns [`CorralError::Io`] if the file cannot be written.
    pub fn write_document(&self, path: &Path) -> Result<(), CorralError> {
        info!(path:? = path; "Creating SVG file");
        fs::write(path, self.to_svg_string()).map_err(|err| {
            error!(path:? = path, err:err; "Failed to write SVG file");
            CorralError::Io(err)
        })
    }
}

impl TickObserver for SvgRenderer {
    fn on_tick(&mut self, tick: &Tick<'_>) -> ControlFlow<()> {
        self.frame.clear();
        self.frame.extend(tick.nodes().iter().map(|node| Bubble {
            center: node.position(),
            radius: node.entity().radius(),
            flagged: node.entity().flag(&self.flag_attribute),
        }));
        self.frames_seen += 1;
        ControlFlow::Continue(())
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;
    use crate::{
        config::{LayoutConfig, StyleConfig},
        entity::{AttributeValue, Entity, Group},
        simulation::Simulation,
    };

    fn config() -> AppConfig {
        let layout = LayoutConfig::default()
            .with_size(200.0, 100.0)
            .with_margin(Insets::new(10.0, 0.0, 20.0, 30.0))
            .with_groups(vec![Group::new(1), Group::new(2)], vec![50.0, 150.0]);
        AppConfig::new(layout, StyleConfig::default())
    }

    #[test]
    fn test_empty_document_before_first_tick() {
        let renderer = SvgRenderer::new(&config()).unwrap();
        assert_eq!(renderer.frames_seen(), 0);
        assert!(renderer.content_bounds().is_none());

        let svg = renderer.to_svg_string();
        assert!(svg.contains(r#"viewBox="0 0 230 130""#));
        assert!(svg.contains("translate(30, 10)"));
        assert!(!svg.contains("<circle"));
    }

    #[test]
    fn test_renders_last_frame_with_flag_colors() {
        let entities = vec![
            Entity::new(1, 10.0).with_attribute("advantage", AttributeValue::Bool(true)),
            Entity::new(2, 10.0),
        ];
        let mut simulation = Simulation::new(entities, config().layout()).unwrap();
        let mut renderer = SvgRenderer::new(&config()).unwrap();
        simulation.run(&mut renderer).unwrap();

        assert_eq!(renderer.frames_seen(), simulation.step_count());
        let svg = renderer.to_svg_string();
        assert_eq!(svg.matches("<circle").count(), 2);
        let flagged_fill = StyleConfig::default()
            .circle(true)
            .unwrap()
            .fill()
            .with_alpha(1.0)
            .to_string();
        assert_eq!(svg.matches(flagged_fill.as_str()).count(), 1);

        let nodes = simulation.nodes().unwrap();
        let bounds = renderer.content_bounds().unwrap();
        assert_approx_eq!(f64, bounds.min_x(), nodes[0].x().min(nodes[1].x()) - 10.0);
    }

    #[test]
    fn test_background() {
        let style = StyleConfig::default().with_background_color("white");
        let config = AppConfig::new(config().layout().clone(), style);
        let svg = SvgRenderer::new(&config).unwrap().to_svg_string();
        assert!(svg.contains("<rect"));
    }

    #[test]
    fn test_write_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.svg");

        SvgRenderer::new(&config())
            .unwrap()
            .write_document(&path)
            .unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("<svg"));
    }
}
