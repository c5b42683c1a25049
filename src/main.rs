//! Command-line entry point.
//!
//! Opens (and if needed creates or migrates) the data directory, then prints
//! a progress summary. The interactive pages are driven by a front end on top
//! of the library.

use std::process::ExitCode;
use student_helper::app::DashboardPage;
use student_helper::{initialize, Config};

fn run() -> student_helper::Result<()> {
    let config = Config::load();
    let store = initialize(&config)?;

    let settings = store.load_settings()?;
    if !settings.last_user.is_empty() {
        println!("Welcome back, {}", settings.last_user);
    }

    let dashboard = DashboardPage::load(&store)?;
    for progress in dashboard.all() {
        println!("{:<20} {:>3}%", progress.to_string(), progress.percent());
    }
    Ok(())
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "startup failed");
            eprintln!("student-helper: {e}");
            ExitCode::FAILURE
        }
    }
}
