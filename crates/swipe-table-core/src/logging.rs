//! Logging facilities for swipe-table.
//!
//! swipe-table uses the `tracing` crate for instrumentation and never installs
//! a subscriber itself. To see logs, install one in your application:
//!
//! ```ignore
//! fn main() {
//!     tracing_subscriber::fmt()
//!         .with_env_filter("swipe_table::cell=debug")
//!         .init();
//! }
//! ```
//!
//! State transitions are logged at `debug`, per-frame animation and gesture
//! updates at `trace`, and clamped configuration at `warn`.

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Signal/slot system target.
    pub const SIGNAL: &str = "swipe_table_core::signal";
    /// Swipe cell state machine target.
    pub const CELL: &str = "swipe_table::cell";
    /// Offset animator target.
    pub const ANIMATION: &str = "swipe_table::animation";
    /// Pan/tap recognition target.
    pub const GESTURE: &str = "swipe_table::gesture";
    /// Button strip layout target.
    pub const BUTTONS: &str = "swipe_table::buttons";
    /// Configuration loading target.
    pub const CONFIG: &str = "swipe_table::config";
    /// Table view manager target.
    pub const MANAGER: &str = "swipe_table::manager";
}

/// Returns all target names, for building filter directives.
pub fn all_targets() -> &'static [&'static str] {
    &[
        targets::SIGNAL,
        targets::CELL,
        targets::ANIMATION,
        targets::GESTURE,
        targets::BUTTONS,
        targets::CONFIG,
        targets::MANAGER,
    ]
}

/// Builds an `EnvFilter`-style directive enabling `level` for every target.
///
/// ```
/// use swipe_table_core::logging::directive_for_all;
///
/// let directive = directive_for_all("debug");
/// assert!(directive.contains("swipe_table::cell=debug"));
/// ```
pub fn directive_for_all(level: &str) -> String {
    all_targets()
        .iter()
        .map(|target| format!("{target}={level}"))
        .collect::<Vec<_>>()
        .join(",")
}
