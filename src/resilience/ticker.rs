//! Run an async job now, then on every interval
//!
//! ```rust,ignore
//! use corekit::resilience::exec_every;
//!
//! let handle = exec_every(
//!     |tick| async move {
//!         println!("tick {} at {}", tick.count, tick.at);
//!         if tick.count == 3 {
//!             tick.interval.change(Duration::from_secs(5));
//!         }
//!     },
//!     Duration::from_secs(1),
//! );
//! handle.ping();
//! handle.stop();
//! ```

use std::future::Future;
use std::time::Duration;

use tokio::sync::mpsc::{self, UnboundedSender, WeakUnboundedSender};
use tokio::time::{self, Instant, Interval, MissedTickBehavior};
use tracing::{debug, trace};

use crate::codec::time::Time;

#[derive(Debug)]
enum Command {
    Ping,
    Change(Duration),
    Stop,
}

/// One run of the job
#[derive(Debug, Clone)]
pub struct Tick {
    /// 0 for the initial run, then +1 per elapsed interval (pings reuse the current count)
    pub count: u64,
    pub at: Time,
    pub interval: IntervalHandle,
}

/// Lets a running job change its own period
///
/// Does not keep the loop alive.
#[derive(Debug, Clone)]
pub struct IntervalHandle(WeakUnboundedSender<Command>);

impl IntervalHandle {
    /// Returns false when the loop is already gone
    pub fn change(&self, every: Duration) -> bool {
        self.0
            .upgrade()
            .is_some_and(|tx| tx.send(Command::Change(every)).is_ok())
    }
}

/// Controls a loop started by [`exec_every`]; the loop ends when every handle is dropped
#[derive(Debug, Clone)]
pub struct ExecHandle {
    tx: UnboundedSender<Command>,
}

impl ExecHandle {
    /// Run the job now, outside the schedule
    pub fn ping(&self) {
        let _ = self.tx.send(Command::Ping);
    }

    /// Restart the schedule with a new period; zero is ignored
    pub fn change_interval(&self, every: Duration) {
        let _ = self.tx.send(Command::Change(every));
    }

    pub fn stop(&self) {
        let _ = self.tx.send(Command::Stop);
    }

    pub fn is_stopped(&self) -> bool {
        self.tx.is_closed()
    }
}

fn ticker(every: Duration) -> Interval {
    let mut ticker = time::interval_at(Instant::now() + every, every);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    ticker
}

/// Run `job` immediately, then every `every`, each run in its own task
///
/// Must be called from within a tokio runtime. A zero period is raised to
/// one millisecond.
pub fn exec_every<F, Fut>(job: F, every: Duration) -> ExecHandle
where
    F: Fn(Tick) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    let every = every.max(Duration::from_millis(1));
    let (tx, mut rx) = mpsc::unbounded_channel();
    let weak = tx.downgrade();

    tokio::spawn(async move {
        let run = |count: u64| {
            trace!(count, "Running periodic job");
            tokio::spawn(job(Tick {
                count,
                at: Time::now(),
                interval: IntervalHandle(weak.clone()),
            }));
        };

        let mut count = 0;
        run(count);
        let mut schedule = ticker(every);

        loop {
            tokio::select! {
                command = rx.recv() => match command {
                    Some(Command::Ping) => run(count),
                    Some(Command::Change(next)) if !next.is_zero() => {
                        debug!(every_ms = next.as_millis() as u64, "Changing job interval");
                        schedule = ticker(next);
                    }
                    Some(Command::Change(_)) => {}
                    Some(Command::Stop) | None => break,
                },
                _ = schedule.tick() => {
                    count += 1;
                    run(count);
                }
            }
        }
        debug!(count, "Periodic job stopped");
    });

    ExecHandle { tx }
}
