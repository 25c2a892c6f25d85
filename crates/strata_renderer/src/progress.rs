//! Progress reporting for a running render.
//!
//! Workers send one message per finished scanline. The monitor runs on its
//! own thread, counts them, and keeps a status line with throughput and ETA
//! up to date on stderr. Dropping every sender ends the monitor.

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// How often the status line is refreshed while no rows arrive.
pub const TICK: Duration = Duration::from_millis(200);

/// Handle to the monitor thread.
pub struct ProgressMonitor {
    handle: JoinHandle<usize>,
}

impl ProgressMonitor {
    /// Start watching `rows` for `total_rows` completions.
    pub fn spawn(total_rows: usize, rows: Receiver<usize>) -> std::io::Result<Self> {
        let bar = ProgressBar::with_draw_target(Some(total_rows as u64), ProgressDrawTarget::stderr());
        bar.set_style(ProgressStyle::with_template("{msg}").unwrap_or_else(|_| ProgressStyle::default_bar()));

        let handle = thread::Builder::new()
            .name("strata-progress".into())
            .spawn(move || watch(total_rows, rows, bar))?;

        Ok(Self { handle })
    }

    /// Wait for the monitor to see the end of the render.
    ///
    /// Returns the number of rows it counted.
    pub fn join(self) -> usize {
        self.handle.join().unwrap_or_else(|_| {
            log::warn!("Progress monitor panicked");
            0
        })
    }
}

fn watch(total_rows: usize, rows: Receiver<usize>, bar: ProgressBar) -> usize {
    let start = Instant::now();
    let mut completed = 0;

    bar.set_message(status_line(completed, total_rows, Duration::ZERO));

    while completed < total_rows {
        match rows.recv_timeout(TICK) {
            Ok(_) => completed += 1 + rows.try_iter().count(),
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => break,
        }

        bar.set_position(completed as u64);
        bar.set_message(status_line(completed, total_rows, start.elapsed()));
    }

    bar.finish_with_message("Rendering completed");
    // The bar is hidden when stderr is not a terminal
    log::info!("Rendering completed: {}/{} scanlines", completed, total_rows);
    log::debug!("Progress monitor counted {}/{} scanlines", completed, total_rows);
    completed
}

/// Format the status line for `completed` of `total` rows after `elapsed`.
///
/// Throughput is measured in whole seconds, so nothing past the remaining
/// count is shown during the first second.
pub fn status_line(completed: usize, total: usize, elapsed: Duration) -> String {
    let remaining = total.saturating_sub(completed);
    let secs = elapsed.as_secs();

    if completed == 0 || secs == 0 {
        return format!("Scanlines remaining: {}", remaining);
    }

    let rows_per_second = completed as f64 / secs as f64;
    let eta = (remaining as f64 / rows_per_second) as u64;
    let percent = completed * 100 / total.max(1);

    format!(
        "Scanlines remaining: {} ({}%) ETA: {}m {}s",
        remaining,
        percent,
        eta / 60,
        eta % 60
    )
}
