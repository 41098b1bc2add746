//! zonemerge - Merge overlapping inside/outside map zones into a consistent partition

pub mod codec;
pub mod config;
pub mod domain;
pub mod error;
pub mod geometry;
pub mod overlay;
