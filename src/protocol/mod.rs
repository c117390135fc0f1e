//! Text-based UDP protocol spoken with map and gauge clients.
//!
//! Clients send `<code>:<payload>` control datagrams to the control port
//! and receive replies on the same socket. Telemetry is pushed to the
//! address each client registered, on the port of its feed.

pub mod clients;
pub mod command;
pub mod discovery;
pub mod notify;
pub mod push;
pub mod server;

pub use clients::{ClientFeed, ClientRegistry, Registration};
pub use command::ControlCommand;
pub use discovery::Discovery;
pub use notify::ClientNotifier;
pub use push::{DatagramSink, PushSender};
pub use server::{ControlChannel, ControlServer, FacilityRequester};
