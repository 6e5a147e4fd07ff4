//! Controller layer: UI events and command orchestration around the
//! submission controller.

pub mod events;
pub mod orchestration;
