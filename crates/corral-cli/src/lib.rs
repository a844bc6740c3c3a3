//! CLI logic for the Corral bubble chart tool.
//!
//! This module contains the core CLI logic: it loads configuration, reads or
//! generates the entities, runs the layout and writes the SVG chart.

pub mod error_adapter;

mod args;
mod config;
mod dataset;

pub use args::Args;

use std::fs;

use log::info;

use corral::{
    ChartBuilder, CorralError,
    config::AppConfig,
    entity::Entity,
    generate::{PopulationGenerator, mutate_flags},
};

/// Radius of generated entities.
const GENERATED_RADIUS: f64 = 29.0;

/// Run the Corral CLI application
///
/// This function lays out the input entities and writes the resulting SVG to
/// the output file.
///
/// # Errors
///
/// Returns `CorralError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Malformed datasets
/// - Layout errors
pub fn run(args: &Args) -> Result<(), CorralError> {
    info!(
        input_path:? = args.input,
        generate:? = args.generate,
        output_path = args.output;
        "Processing chart"
    );

    let app_config = config::load_config(args.config.as_ref())?;

    let mut entities = load_entities(args, &app_config)?;
    if let Some(probability) = args.mutate_flags {
        let attribute = app_config.style().flag_attribute();
        let changed = mutate_flags(&mut entities, attribute, probability, args.seed)?;
        info!(attribute, changed; "Flags mutated");
    }

    let builder = ChartBuilder::new(app_config);
    let svg = builder.render_svg(entities)?;

    fs::write(&args.output, svg)?;

    info!(output_file = args.output; "SVG exported successfully");

    Ok(())
}

fn load_entities(args: &Args, config: &AppConfig) -> Result<Vec<Entity>, CorralError> {
    match (&args.input, args.generate) {
        (Some(path), _) => dataset::load_entities(path),
        (None, Some(count)) => {
            let generator = PopulationGenerator::new(
                config.layout().group_domain().to_vec(),
                GENERATED_RADIUS,
            )?
            .with_flag_attribute(config.style().flag_attribute())
            .with_seed(args.seed);
            Ok(generator.generate(count))
        }
        (None, None) => Err(CorralError::Config(
            "either an input dataset or --generate is required".to_string(),
        )),
    }
}
