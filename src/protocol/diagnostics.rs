use super::structs::BaudAnnouncement;
use log::debug;

/// What the session reports while walking the handshake. Events borrow
/// from the session; sinks copy out anything they keep.
#[derive(Debug)]
pub enum SessionEvent<'a> {
    FrameSent { frame: &'a [u8] },
    LineReceived { line: &'a str },
    EchoSkipped,
    BaudAnnounced { announcement: &'a BaudAnnouncement },
    PayloadComplete { lines: usize },
}

/// Receives handshake diagnostics. The sink is injected into the session,
/// which otherwise carries no logger of its own.
pub trait DiagnosticsSink {
    fn event(&self, event: SessionEvent<'_>);
}

/// Default sink: forwards everything to the `log` facade.
pub struct LogSink;

impl DiagnosticsSink for LogSink {
    fn event(&self, event: SessionEvent<'_>) {
        match event {
            SessionEvent::FrameSent { frame } => {
                debug!("Sending {:?}", String::from_utf8_lossy(frame));
            }
            SessionEvent::LineReceived { line } => {
                debug!("Received {:?}", line);
            }
            SessionEvent::EchoSkipped => {
                debug!("Skipping echo of our own frame");
            }
            SessionEvent::BaudAnnounced { announcement } => {
                debug!(
                    "Manufacturer flag ID: {}, preferred baud rate: {} (code {:?}, staying at the configured rate)",
                    announcement.manufacturer_id,
                    announcement.baud_rate_label(),
                    announcement.baud_code,
                );
            }
            SessionEvent::PayloadComplete { lines } => {
                debug!("Data transfer complete after {} line(s)", lines);
            }
        }
    }
}
