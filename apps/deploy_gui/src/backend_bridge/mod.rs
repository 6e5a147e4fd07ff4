//! Bridge between the UI thread and the async worker that talks to the
//! deployment service.

pub mod commands;
pub mod runtime;
