//! ttargets
//!
//! Terminal browser for the targets collection of an ENCODE-style REST service.

pub mod api;
pub mod app;
pub mod config;
pub mod event;
pub mod resource;
pub mod router;
pub mod ui;
pub mod view;

/// Version injected at compile time via TTARGETS_VERSION env var (set by CI/CD),
/// or "dev" for local builds.
pub const VERSION: &str = match option_env!("TTARGETS_VERSION") {
    Some(v) => v,
    None => "dev",
};
