//! Periodic telemetry push to registered clients.

use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::context::{AppContext, ConnectionState};
use crate::output::{Formatter, create_formatter};
use crate::protocol::{ClientFeed, PushSender};

pub struct TelemetryPoller {
    ctx: Arc<AppContext>,
    push: Arc<PushSender>,
    feeds: Vec<(ClientFeed, Box<dyn Formatter>)>,
}

impl TelemetryPoller {
    pub fn new(ctx: Arc<AppContext>, push: Arc<PushSender>) -> Self {
        let feeds = ClientFeed::ALL
            .into_iter()
            .filter_map(|feed| create_formatter(feed).map(|formatter| (feed, formatter)))
            .collect();
        Self { ctx, push, feeds }
    }

    /// Push the latest snapshot once to every feed with a registered client
    ///
    /// Nothing is sent unless the provider is connected and a snapshot has
    /// been published. Returns the number of datagrams sent.
    pub fn tick(&self) -> usize {
        if self.ctx.connection_state() != ConnectionState::Connected {
            return 0;
        }
        let Some(snapshot) = self.ctx.snapshot() else {
            return 0;
        };

        let mut sent = 0;
        for (feed, formatter) in &self.feeds {
            let message = formatter.format(&snapshot);
            match self.push.push(&self.ctx.clients, *feed, &message) {
                Ok(true) => sent += 1,
                Ok(false) => {}
                Err(e) => log::warn!("{:?} push failed: {}", feed, e),
            }
        }
        sent
    }

    /// Tick on the configured cadence until shutdown
    pub fn run(&self) {
        let period = self.ctx.config.poller.interval.as_duration();
        log::info!("Telemetry poller started, pushing every {:?}", period);

        let mut next_run = Instant::now();
        loop {
            self.tick();

            next_run += period;
            let now = Instant::now();
            let wait = if next_run > now {
                next_run - now
            } else {
                log::debug!("Poller running late");
                next_run = now;
                Duration::ZERO
            };
            if self.ctx.shutdown.wait(wait) {
                break;
            }
        }
        log::info!("Telemetry poller stopped");
    }
}
