//! Wires the relay together and runs its four loops.
//!
//! | thread            | loop                                   |
//! |-------------------|----------------------------------------|
//! | `supervisor`      | connection state machine ticks         |
//! | `provider-events` | provider notifications and deliveries  |
//! | `control`         | control datagram receive loop          |
//! | `poller`          | telemetry push cadence                 |
//!
//! All four observe the shared [`Shutdown`](crate::shutdown::Shutdown)
//! within one wait cycle.

use std::net::{SocketAddr, UdpSocket};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam_channel::{Receiver, select};

use crate::config::RelayConfig;
use crate::context::AppContext;
use crate::error::{RelayError, Result};
use crate::poller::TelemetryPoller;
use crate::protocol::{ClientNotifier, ControlChannel, ControlServer, PushSender};
use crate::provider::{ProviderEvent, TelemetryProvider};
use crate::shutdown::Shutdown;
use crate::supervisor::ConnectionSupervisor;

pub struct RelayHandle {
    ctx: Arc<AppContext>,
    control_addr: SocketAddr,
    threads: Vec<JoinHandle<()>>,
}

impl RelayHandle {
    pub fn context(&self) -> &Arc<AppContext> {
        &self.ctx
    }

    /// Address the control socket is bound to
    pub fn control_addr(&self) -> SocketAddr {
        self.control_addr
    }

    pub fn shutdown(&self) {
        self.ctx.shutdown.trigger();
    }

    /// Wait for every loop to exit
    pub fn join(self) {
        for handle in self.threads {
            let name = handle.thread().name().unwrap_or("relay").to_string();
            if handle.join().is_err() {
                log::error!("Thread {} panicked", name);
            }
        }
        log::info!("Relay stopped");
    }
}

fn dispatch_events(
    supervisor: &ConnectionSupervisor,
    events: &Receiver<ProviderEvent>,
    shutdown: &Shutdown,
) {
    loop {
        select! {
            recv(events) -> event => match event {
                Ok(event) => supervisor.handle_event(event),
                Err(_) => break,
            },
            recv(shutdown.receiver()) -> _ => break,
        }
    }
    log::debug!("Provider event dispatch stopped");
}

fn spawn<F>(threads: &mut Vec<JoinHandle<()>>, name: &str, body: F) -> Result<()>
where
    F: FnOnce() + Send + 'static,
{
    let handle = thread::Builder::new().name(name.to_string()).spawn(body)?;
    threads.push(handle);
    Ok(())
}

/// Everything the four loops own once started
struct Loops {
    supervisor: Arc<ConnectionSupervisor>,
    events: Receiver<ProviderEvent>,
    server: ControlServer,
    socket: UdpSocket,
    poller: TelemetryPoller,
}

impl Loops {
    fn spawn(self, shutdown: Shutdown, threads: &mut Vec<JoinHandle<()>>) -> Result<()> {
        let Loops {
            supervisor,
            events,
            server,
            socket,
            poller,
        } = self;

        let ticking = supervisor.clone();
        spawn(threads, "supervisor", move || ticking.run())?;
        spawn(threads, "provider-events", move || {
            dispatch_events(&supervisor, &events, &shutdown)
        })?;
        spawn(threads, "control", move || server.run(socket))?;
        spawn(threads, "poller", move || poller.run())
    }
}

/// Bind the control socket and start the relay loops
///
/// A control port that cannot be bound is the one fatal startup error.
pub fn start(config: RelayConfig, provider: Box<dyn TelemetryProvider>) -> Result<RelayHandle> {
    config.validate()?;

    let addr = config.network.control_addr();
    let socket = UdpSocket::bind(addr).map_err(|source| RelayError::Bind { addr, source })?;
    let control_addr = socket.local_addr()?;

    let ctx = Arc::new(AppContext::new(config));
    let push = Arc::new(PushSender::bind(&ctx.config.network)?);
    let channel = Arc::new(ControlChannel::new(Box::new(socket.try_clone()?)));
    let notifier = Arc::new(ClientNotifier::new(ctx.clone(), channel.clone(), push.clone()));

    let (events_tx, events_rx) = crossbeam_channel::unbounded();
    let supervisor = Arc::new(ConnectionSupervisor::new(
        ctx.clone(),
        provider,
        events_tx,
        notifier,
    )?);
    let loops = Loops {
        server: ControlServer::new(ctx.clone(), channel, supervisor.clone()),
        poller: TelemetryPoller::new(ctx.clone(), push),
        supervisor,
        events: events_rx,
        socket,
    };

    let mut threads = Vec::with_capacity(4);
    let spawned = loops.spawn(ctx.shutdown.clone(), &mut threads);
    let handle = RelayHandle {
        ctx,
        control_addr,
        threads,
    };
    if let Err(e) = spawned {
        handle.shutdown();
        handle.join();
        return Err(e);
    }

    log::info!("Relay listening for control requests on {}", control_addr);
    Ok(handle)
}
