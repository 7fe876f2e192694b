// Gaze aiming and dwell selection.
//
// The aim resolver turns a camera ray (or a projected pointer position) into
// the target currently aimed at; the dwell selector turns sustained aim into
// confirmations.

pub mod aim;
pub mod dwell;

pub use aim::{resolve, CameraPose, Ray};
pub use dwell::{DwellSelector, DEFAULT_DWELL_DURATION_MS};
