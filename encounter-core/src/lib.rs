#![deny(warnings)]
#![deny(rust_2018_idioms)]

//! Core model for archived vessel-encounter trajectories: the AIS position
//! report with its compact positional line format, and the pipeline that
//! flattens encounter collections into tabular rows and regroups exported
//! rows into draw-ready tracks.

mod domain;
mod error;
mod export;
mod ports;

pub use domain::*;
pub use error::*;
pub use export::*;
pub use ports::*;
