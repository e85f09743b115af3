use wasm_bindgen::prelude::*;

// Domain
pub mod catalog;
pub mod dipole;
pub mod elements;
pub mod scoring;

// Session
pub mod controller;
pub mod cues;
pub mod explain;
pub mod phase;

// Host surface
pub mod game;
pub mod messages;
pub mod view;

pub use controller::{PhaseController, RoundConfig};
use game::PolarOrNah;

quiz_web::export_game!(PolarOrNah, "polar-or-nah");
