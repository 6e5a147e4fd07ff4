//! UI layer: the single deploy page.

pub mod app;

pub use app::DeployApp;
