//! Configuration types for Corral layouts.
//!
//! This module provides configuration structures that control how the force
//! simulation lays out entities and how the renderer styles them. All types
//! implement [`serde::Deserialize`] with per-field defaults, so a partial TOML
//! file only overrides what it names.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining layout and style settings.
//! - [`LayoutConfig`] - Canvas, ordinal group scale, force strengths and cooling schedule.
//! - [`StyleConfig`] - Fill colors, flag attribute and outline.
//!
//! # Example
//!
//! ```
//! # use corral::config::AppConfig;
//! let config = AppConfig::default();
//! assert!(config.layout().validate().is_ok());
//! assert!(config.style().background_color().is_ok());
//! ```

use log::warn;
use serde::Deserialize;

use corral_core::{
    color::Color,
    draw::{CircleDefinition, StrokeDefinition, StrokeStyle},
    geometry::{Insets, Point, Size},
};

use crate::{entity::Group, error::CorralError, layout::RepulsionFalloff};

/// Number of steps the default cooling schedule aims for.
const DEFAULT_TARGET_STEPS: f64 = 300.0;

/// Longest cooling schedule a configuration may ask for.
const MAX_COOLING_STEPS: f64 = 1_000_000.0;

/// Top-level application configuration combining layout and style settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Layout configuration section.
    #[serde(default)]
    layout: LayoutConfig,

    /// Style configuration section.
    #[serde(default)]
    style: StyleConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] with the specified layout and style configurations.
    pub fn new(layout: LayoutConfig, style: StyleConfig) -> Self {
        Self { layout, style }
    }

    /// Returns the layout configuration.
    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    /// Returns the style configuration.
    pub fn style(&self) -> &StyleConfig {
        &self.style
    }
}

/// Canvas geometry, forces and cooling schedule for one simulation.
///
/// `width` and `height` describe the plot area inside `margin`. Group targets
/// come from a parallel `group_domain`/`group_range` pair forming an ordinal
/// scale.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    width: f64,
    height: f64,
    margin: Insets,

    group_domain: Vec<Group>,
    group_range: Vec<f64>,
    group_strength: f64,

    band_strength: f64,

    center_strength_x: f64,
    center_strength_y: f64,

    repulsion_strength: f64,
    repulsion_distance_min: f64,
    repulsion_falloff: RepulsionFalloff,

    /// Uniform collision radius; when unset each entity's own radius is used.
    collision_radius: Option<f64>,
    collision_padding: f64,
    collision_strength: f64,
    collision_iterations: usize,

    velocity_decay: f64,
    alpha_min: f64,
    /// Per-step multiplicative decay; derived from `alpha_min` when unset.
    alpha_decay: Option<f64>,

    /// Seed for the coincident-node jitter random source.
    seed: u64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            width: 400.0,
            height: 300.0,
            margin: Insets::new(40.0, 0.0, 60.0, 60.0),
            group_domain: vec![Group::new(1), Group::new(2), Group::new(3)],
            group_range: vec![50.0, 200.0, 340.0],
            group_strength: 0.5,
            band_strength: 0.1,
            center_strength_x: 0.0,
            center_strength_y: 0.01,
            repulsion_strength: -1.0,
            repulsion_distance_min: 1.0,
            repulsion_falloff: RepulsionFalloff::default(),
            collision_radius: None,
            collision_padding: 6.0,
            collision_strength: 0.1,
            collision_iterations: 1,
            velocity_decay: 0.4,
            alpha_min: 0.001,
            alpha_decay: None,
            seed: 0,
        }
    }
}

impl LayoutConfig {
    /// Sets the plot area size.
    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Sets the margins around the plot area.
    pub fn with_margin(mut self, margin: Insets) -> Self {
        self.margin = margin;
        self
    }

    /// Sets the ordinal group scale: `domain[i]` maps to x-coordinate `range[i]`.
    pub fn with_groups(mut self, domain: Vec<Group>, range: Vec<f64>) -> Self {
        self.group_domain = domain;
        self.group_range = range;
        self
    }

    /// Sets the strength of the pull toward each node's group column.
    pub fn with_group_strength(mut self, strength: f64) -> Self {
        self.group_strength = strength;
        self
    }

    /// Sets the strength of the pull toward the horizontal center band.
    pub fn with_band_strength(mut self, strength: f64) -> Self {
        self.band_strength = strength;
        self
    }

    /// Sets the global center pull strengths on each axis.
    pub fn with_center_strength(mut self, x: f64, y: f64) -> Self {
        self.center_strength_x = x;
        self.center_strength_y = y;
        self
    }

    /// Sets the many-body strength; positive pushes nodes apart.
    pub fn with_repulsion_strength(mut self, strength: f64) -> Self {
        self.repulsion_strength = strength;
        self
    }

    /// Sets how repulsion weakens with distance.
    pub fn with_repulsion_falloff(mut self, falloff: RepulsionFalloff) -> Self {
        self.repulsion_falloff = falloff;
        self
    }

    /// Sets the collision strength, padding and passes per step.
    pub fn with_collision(mut self, strength: f64, padding: f64, iterations: usize) -> Self {
        self.collision_strength = strength;
        self.collision_padding = padding;
        self.collision_iterations = iterations;
        self
    }

    /// Overrides every entity's collision radius with one value.
    pub fn with_collision_radius(mut self, radius: f64) -> Self {
        self.collision_radius = Some(radius);
        self
    }

    /// Sets the velocity decay (friction).
    pub fn with_velocity_decay(mut self, decay: f64) -> Self {
        self.velocity_decay = decay;
        self
    }

    /// Sets the cooling schedule explicitly.
    pub fn with_alpha(mut self, alpha_min: f64, alpha_decay: Option<f64>) -> Self {
        self.alpha_min = alpha_min;
        self.alpha_decay = alpha_decay;
        self
    }

    /// Sets the seed of the simulation's random source.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Returns the plot area size.
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Returns the margins around the plot area.
    pub fn margin(&self) -> Insets {
        self.margin
    }

    /// Returns the center of the plot area, the target of the global pull.
    pub fn center(&self) -> Point {
        self.size().center()
    }

    /// Returns the y-coordinate of the band every node is pulled toward.
    pub fn band_center(&self) -> f64 {
        self.height / 2.0
    }

    pub fn group_domain(&self) -> &[Group] {
        &self.group_domain
    }

    pub fn group_range(&self) -> &[f64] {
        &self.group_range
    }

    pub fn group_strength(&self) -> f64 {
        self.group_strength
    }

    pub fn band_strength(&self) -> f64 {
        self.band_strength
    }

    pub fn center_strength_x(&self) -> f64 {
        self.center_strength_x
    }

    pub fn center_strength_y(&self) -> f64 {
        self.center_strength_y
    }

    pub fn repulsion_strength(&self) -> f64 {
        self.repulsion_strength
    }

    pub fn repulsion_distance_min(&self) -> f64 {
        self.repulsion_distance_min
    }

    pub fn repulsion_falloff(&self) -> RepulsionFalloff {
        self.repulsion_falloff
    }

    pub fn collision_radius(&self) -> Option<f64> {
        self.collision_radius
    }

    pub fn collision_padding(&self) -> f64 {
        self.collision_padding
    }

    pub fn collision_strength(&self) -> f64 {
        self.collision_strength
    }

    pub fn collision_iterations(&self) -> usize {
        self.collision_iterations
    }

    pub fn velocity_decay(&self) -> f64 {
        self.velocity_decay
    }

    pub fn alpha_min(&self) -> f64 {
        self.alpha_min
    }

    /// Returns the per-step alpha decay.
    ///
    /// When not configured it is derived so alpha reaches `alpha_min` after
    /// roughly 300 steps: `1 - alpha_min^(1/300)`.
    pub fn alpha_decay(&self) -> f64 {
        self.alpha_decay
            .unwrap_or_else(|| 1.0 - self.alpha_min.powf(1.0 / DEFAULT_TARGET_STEPS))
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Checks that the configuration describes a layout that terminates.
    ///
    /// # Errors
    ///
    /// Returns [`CorralError::Config`] naming the first offending option.
    pub fn validate(&self) -> Result<(), CorralError> {
        let config_err = |msg: String| Err(CorralError::Config(msg));

        if !(self.width.is_finite() && self.width > 0.0)
            || !(self.height.is_finite() && self.height > 0.0)
        {
            return config_err(format!(
                "canvas size must be positive, got {}x{}",
                self.width, self.height
            ));
        }
        if self.group_domain.len() != self.group_range.len() {
            return config_err(format!(
                "group_domain has {} entries but group_range has {}",
                self.group_domain.len(),
                self.group_range.len()
            ));
        }
        if self.group_range.iter().any(|x| !x.is_finite()) {
            return config_err("group_range must contain finite coordinates".to_string());
        }
        if !(0.0..=1.0).contains(&self.group_strength) {
            return config_err(format!(
                "group_strength must be in [0, 1], got {}",
                self.group_strength
            ));
        }
        if !(self.alpha_min > 0.0 && self.alpha_min < 1.0) {
            return config_err(format!(
                "alpha_min must be in (0, 1), got {}",
                self.alpha_min
            ));
        }
        let alpha_decay = self.alpha_decay();
        if !(alpha_decay > 0.0 && alpha_decay < 1.0) {
            return config_err(format!(
                "alpha_decay must be in (0, 1), got {alpha_decay}"
            ));
        }
        // Zero when 1 - alpha_decay rounds to 1 and alpha never moves.
        let shrink = (1.0 - alpha_decay).ln();
        let cooling_steps = self.alpha_min.ln() / shrink;
        if !(shrink < 0.0 && cooling_steps <= MAX_COOLING_STEPS) {
            return config_err(format!(
                "alpha_decay {alpha_decay} is too small to cool from 1 to alpha_min {} \
                 within {MAX_COOLING_STEPS} steps",
                self.alpha_min
            ));
        }
        if !(0.0..=1.0).contains(&self.velocity_decay) {
            return config_err(format!(
                "velocity_decay must be in [0, 1], got {}",
                self.velocity_decay
            ));
        }
        if self.collision_iterations == 0 {
            return config_err("collision_iterations must be at least 1".to_string());
        }
        if let Some(radius) = self.collision_radius {
            if !(radius.is_finite() && radius >= 0.0) {
                return config_err(format!(
                    "collision_radius must be a non-negative number, got {radius}"
                ));
            }
        }
        let strengths = [
            ("band_strength", self.band_strength),
            ("center_strength_x", self.center_strength_x),
            ("center_strength_y", self.center_strength_y),
            ("repulsion_strength", self.repulsion_strength),
            ("repulsion_distance_min", self.repulsion_distance_min),
            ("collision_padding", self.collision_padding),
            ("collision_strength", self.collision_strength),
        ];
        if let Some((name, value)) = strengths.iter().find(|(_, value)| !value.is_finite()) {
            return config_err(format!("{name} must be finite, got {value}"));
        }

        if self.center_strength_x != 0.0 && self.group_strength > 0.0 {
            warn!(
                center_strength_x = self.center_strength_x;
                "Global center pull on x competes with group separation as alpha cools"
            );
        }

        Ok(())
    }
}

/// Visual styling for rendered bubbles.
///
/// Each bubble is filled with `flagged_fill` when the boolean passthrough
/// attribute named by `flag_attribute` is set, `default_fill` otherwise.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    flag_attribute: String,
    flagged_fill: String,
    default_fill: String,
    fill_opacity: f32,
    stroke_color: String,
    stroke_width: f32,
    stroke_style: String,
    background_color: Option<String>,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            flag_attribute: "advantage".to_string(),
            flagged_fill: "#EC7063".to_string(),
            default_fill: "#a2dbc0".to_string(),
            fill_opacity: 0.85,
            stroke_color: "black".to_string(),
            stroke_width: 4.0,
            stroke_style: "solid".to_string(),
            background_color: None,
        }
    }
}

impl StyleConfig {
    /// Sets the name of the boolean attribute that selects the fill.
    pub fn with_flag_attribute(mut self, name: impl Into<String>) -> Self {
        self.flag_attribute = name.into();
        self
    }

    /// Sets the background color.
    pub fn with_background_color(mut self, color: impl Into<String>) -> Self {
        self.background_color = Some(color.into());
        self
    }

    /// Returns the name of the boolean attribute that selects the fill.
    pub fn flag_attribute(&self) -> &str {
        &self.flag_attribute
    }

    /// Builds the circle definition for flagged (`true`) or plain entities.
    ///
    /// # Errors
    ///
    /// Returns [`CorralError::Config`] if a configured color cannot be parsed.
    pub fn circle(&self, flagged: bool) -> Result<CircleDefinition, CorralError> {
        let fill = if flagged {
            &self.flagged_fill
        } else {
            &self.default_fill
        };
        let fill = parse_color(fill)?.with_alpha(self.fill_opacity);

        let mut stroke = StrokeDefinition::new(parse_color(&self.stroke_color)?, self.stroke_width);
        let style = self
            .stroke_style
            .parse::<StrokeStyle>()
            .map_err(CorralError::Config)?;
        stroke.set_style(style);

        Ok(CircleDefinition::new(fill, stroke))
    }

    /// Returns the parsed background [`Color`], or `None` if no color is configured.
    ///
    /// # Errors
    ///
    /// Returns [`CorralError::Config`] if the configured color string cannot be parsed.
    pub fn background_color(&self) -> Result<Option<Color>, CorralError> {
        self.background_color
            .as_deref()
            .map(parse_color)
            .transpose()
    }
}

fn parse_color(value: &str) -> Result<Color, CorralError> {
    Color::new(value).map_err(|err| CorralError::Config(format!("invalid color in style: {err}")))
}
