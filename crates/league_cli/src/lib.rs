//! League Projection CLI support
//!
//! CSV loading, plain-text reports and logging setup for `league-sim`.

pub mod loader;
pub mod report;

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

pub use loader::{load_coefficients, load_fixtures};
pub use report::{render_projection, render_standing};

static INIT: Once = Once::new();

/// Installs the global subscriber. Levels come from `LEAGUE_SIM_LOG`
/// (e.g. `LEAGUE_SIM_LOG=league_core=debug`), falling back to info for both
/// crates. Safe to call more than once.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env("LEAGUE_SIM_LOG")
            .unwrap_or_else(|_| EnvFilter::new("league_core=info,league_cli=info"));

        tracing_subscriber::registry()
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .with(filter)
            .init();
    });
}
