#![deny(warnings)]
#![deny(rust_2018_idioms)]

//! Implements a binary that converts an archived vessel-encounter collection
//! into a flat CSV export and regroups the exported rows into per-encounter
//! tracks for rendering.

pub mod error;
pub mod settings;
pub mod startup;
