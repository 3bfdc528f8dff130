//! Month-end report timer. Runs outside the core on its own thread and only
//! ever reads the ledger through the job it is given.

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use std::path::PathBuf;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::models::YearMonth;
use crate::report::MonthlyReport;

/// Reports go out at this hour on the last day of the month.
pub(crate) const REPORT_HOUR: u32 = 18;

/// The next report time strictly after `now`: the last day of `now`'s month at
/// 18:00, or the last day of the following month once that has passed.
pub(crate) fn next_report_time(now: NaiveDateTime) -> Option<NaiveDateTime> {
    let this_month = YearMonth::from_date(now.date());
    let candidate = report_time_for(this_month)?;
    if now >= candidate {
        report_time_for(this_month.next())
    } else {
        Some(candidate)
    }
}

fn report_time_for(month: YearMonth) -> Option<NaiveDateTime> {
    month.last_day()?.and_hms_opt(REPORT_HOUR, 0, 0)
}

/// Where finished reports are handed off.
pub(crate) trait ReportSink: Send {
    fn deliver(&mut self, report: &MonthlyReport) -> Result<()>;
}

/// Writes each report as `report-YYYY-MM.html` into a directory.
pub(crate) struct OutboxSink {
    dir: PathBuf,
}

impl OutboxSink {
    pub(crate) fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create outbox: {}", dir.display()))?;
        Ok(Self { dir })
    }

    pub(crate) fn path_for(&self, month: YearMonth) -> PathBuf {
        self.dir.join(format!("report-{month}.html"))
    }
}

impl ReportSink for OutboxSink {
    fn deliver(&mut self, report: &MonthlyReport) -> Result<()> {
        let path = self.path_for(report.month);
        std::fs::write(&path, report.to_html())
            .with_context(|| format!("Failed to write report: {}", path.display()))?;
        tracing::info!(month = %report.month, path = %path.display(), "report delivered");
        Ok(())
    }
}

/// Handle to a running scheduler thread.
pub(crate) struct ScheduleHandle {
    stop: mpsc::Sender<()>,
    thread: JoinHandle<()>,
}

impl ScheduleHandle {
    /// Stop waiting and join the thread. A job already running finishes first.
    pub(crate) fn cancel(self) {
        let _ = self.stop.send(());
        if self.thread.join().is_err() {
            tracing::error!("report scheduler thread panicked");
        }
    }
}

/// Start a thread that calls `job` with the report month at every month-end
/// report time, as seen by `clock`. Job errors are logged and the loop goes on.
pub(crate) fn spawn<C, J>(clock: C, mut job: J) -> Result<ScheduleHandle>
where
    C: Fn() -> NaiveDateTime + Send + 'static,
    J: FnMut(YearMonth) -> Result<()> + Send + 'static,
{
    let (stop, stop_rx) = mpsc::channel::<()>();
    let thread = thread::Builder::new()
        .name("report-scheduler".into())
        .spawn(move || loop {
            let now = clock();
            let Some(fire_at) = next_report_time(now) else {
                tracing::error!(%now, "no report time after now; scheduler exiting");
                return;
            };
            let wait = (fire_at - now).to_std().unwrap_or(Duration::ZERO);
            tracing::info!(%fire_at, "next report scheduled");

            match stop_rx.recv_timeout(wait) {
                Err(RecvTimeoutError::Timeout) => {
                    let month = YearMonth::from_date(fire_at.date());
                    if let Err(e) = job(month) {
                        tracing::error!(%month, error = %format!("{e:#}"), "scheduled report failed");
                    }
                }
                Ok(()) | Err(RecvTimeoutError::Disconnected) => {
                    tracing::debug!("report scheduler stopped");
                    return;
                }
            }
        })
        .context("Failed to start report scheduler")?;
    Ok(ScheduleHandle { stop, thread })
}

#[cfg(test)]
mod tests;
