mod cli;

pub(crate) use cli::as_cli;

use anyhow::{Context, Result};

use crate::config::Config;
use crate::report::MonthlyReport;
use crate::schedule::{self, OutboxSink, ReportSink};
use crate::store;

/// Run the month-end report scheduler in the foreground until Enter is pressed.
///
/// Each tick opens its own read handle on the ledger, so foreground commands
/// in other processes keep working while this runs.
pub(crate) fn as_watch(config: &Config) -> Result<()> {
    let mut sink = OutboxSink::new(&config.outbox_dir)?;
    let job_config = config.clone();

    let handle = schedule::spawn(
        || chrono::Local::now().naive_local(),
        move |month| {
            let (ledger, _) = store::open(&job_config)?;
            let report = MonthlyReport::build(month, &ledger.all()?);
            if report.is_empty() {
                tracing::info!(%month, "no expenses to report");
                return Ok(());
            }
            sink.deliver(&report)
        },
    )?;

    println!(
        "Watching for month end ({} backend); reports go to {}",
        config.backend.as_str(),
        config.outbox_dir.display()
    );
    println!("Press Enter to stop.");

    let mut line = String::new();
    std::io::stdin()
        .read_line(&mut line)
        .context("Failed to read from stdin")?;
    handle.cancel();
    println!("Stopped.");
    Ok(())
}
