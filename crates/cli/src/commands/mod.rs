//! CLI Commands

pub mod check;
pub mod route;

pub use check::{CheckCommand, ConfigArgs};
pub use route::RouteCommand;
