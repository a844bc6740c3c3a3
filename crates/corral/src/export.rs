//! Export of laid-out bubbles.
//!
//! The only backend is [`svg`]: an [`SvgRenderer`] observes a running
//! simulation, keeps the most recent frame and renders it as a standalone SVG
//! document. Because a failed step produces no tick, the renderer always holds
//! the last good frame.

/// SVG export backend.
pub mod svg;

pub use svg::SvgRenderer;
