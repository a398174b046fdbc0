#![allow(non_snake_case)]

mod midi_importer;
mod mml;
mod model;
mod util;

pub use midi_importer::*;
pub use mml::*;
pub use model::config::*;
pub use model::event::*;
pub use util::*;
