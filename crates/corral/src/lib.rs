//! Corral - Force-directed layout of grouped, non-overlapping circles.
//!
//! Entities carry a categorical group and a radius. A [`Simulation`] pulls
//! each entity toward the horizontal position of its group and toward a
//! central band while keeping the circles from overlapping, then cools down
//! to a stable arrangement. The [`export::SvgRenderer`] draws the result as a
//! bubble chart.
//!
//! [`Simulation`]: simulation::Simulation

pub mod config;
pub mod entity;
pub mod export;
pub mod generate;
pub mod layout;
pub mod simulation;

mod error;

pub use corral_core::{color, draw, geometry};

pub use error::CorralError;

use log::{debug, info};

use config::AppConfig;
use entity::Entity;
use export::SvgRenderer;
use layout::Node;
use simulation::Simulation;

/// Builder for laying out and rendering bubble charts.
///
/// # Examples
///
/// ```rust
/// use corral::{ChartBuilder, config::AppConfig, entity::Entity};
///
/// let builder = ChartBuilder::new(AppConfig::default());
/// let entities = vec![Entity::new(1, 10.0), Entity::new(2, 10.0), Entity::new(3, 10.0)];
///
/// let svg = builder.render_svg(entities)
///     .expect("Failed to render");
/// assert!(svg.contains("<circle"));
/// ```
#[derive(Debug, Default)]
pub struct ChartBuilder {
    config: AppConfig,
}

impl ChartBuilder {
    /// Create a new chart builder with the given configuration.
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Run a simulation to convergence and return the final nodes.
    ///
    /// # Errors
    ///
    /// Returns `CorralError` for invalid entities or configuration, and for
    /// any error raised while stepping.
    pub fn layout(&self, entities: Vec<Entity>) -> Result<Vec<Node>, CorralError> {
        let mut simulation = Simulation::new(entities, self.config.layout())?;
        let nodes = simulation.run_to_convergence()?;
        debug!(nodes = nodes.len(); "Layout converged");
        Ok(nodes.to_vec())
    }

    /// Lay out entities and render the converged frame to an SVG string.
    ///
    /// # Errors
    ///
    /// Returns `CorralError` for layout or style errors. No SVG is produced
    /// when the simulation fails.
    pub fn render_svg(&self, entities: Vec<Entity>) -> Result<String, CorralError> {
        info!(entities = entities.len(); "Rendering bubble chart");

        let mut renderer = SvgRenderer::new(&self.config)?;
        let mut simulation = Simulation::new(entities, self.config.layout())?;
        simulation.run(&mut renderer)?;

        info!(steps = simulation.step_count(); "Bubble chart rendered");
        Ok(renderer.to_svg_string())
    }
}
