//! Corral Core Types and Definitions
//!
//! This crate provides the foundational types shared by the Corral layout
//! engine and its renderers. It includes:
//!
//! - **Geometry**: Points, sizes, bounds and insets ([`geometry`] module)
//! - **Colors**: Color handling with CSS color support ([`color::Color`])
//! - **Draw**: Visual definitions for rendered circles ([`draw`] module)

pub mod color;
pub mod draw;
pub mod geometry;
