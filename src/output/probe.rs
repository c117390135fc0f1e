//! Rendering of datagrams received by the diagnostic probe.

use std::net::SocketAddr;

use serde::Serialize;

use super::iso8601_timestamp;

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReceivedDatagram {
    pub ts: String,
    pub source: SocketAddr,
    /// Leading token of the message (`FM_GPS`, `AIRPORTS`, ...)
    pub kind: String,
    pub fields: usize,
    pub message: String,
}

impl ReceivedDatagram {
    pub fn new(source: SocketAddr, message: String) -> Self {
        let kind = message.split(':').next().unwrap_or_default().to_string();
        let fields = message.split(':').count().saturating_sub(1);
        Self {
            ts: iso8601_timestamp(),
            source,
            kind,
            fields,
            message,
        }
    }
}

pub fn format_received(format: OutputFormat, datagram: &ReceivedDatagram) -> String {
    match format {
        OutputFormat::Text => format!(
            "{} {:<21} {:<16} ({} fields) {}",
            datagram.ts, datagram.source, datagram.kind, datagram.fields, datagram.message
        ),
        OutputFormat::Json => serde_json::to_string(datagram)
            .unwrap_or_else(|e| format!(r#"{{"error":"{}"}}"#, e)),
    }
}
