use crate::models::MeterReading;
use crate::serial_link::MeterLink;
use std::io;
use thiserror::Error;

pub mod diagnostics;
pub mod register_parser;
pub mod registers;
pub mod structs;
pub mod utils;

use self::diagnostics::{DiagnosticsSink, LogSink, SessionEvent};
use self::structs::{HandshakeState, Phase};

/// Request that opens the sign-on phase.
const INIT_FRAME: &[u8] = b"/?!\r\n";
/// Acknowledge selecting reading mode. Baud digit "0" and mode digit "0":
/// the session never requests programming mode and never follows the
/// announced rate.
const ACK_FRAME: &[u8] = b"\x06000\r\n";
/// What an echoed request or acknowledge looks like at the start of a line.
const INIT_ECHO: &str = "/?!";
const ACK_ECHO: &str = "\u{6}000";
/// End-of-text byte closing the data response.
const ETX: char = '\u{3}';
/// A phase that reads this many lines without seeing its marker is not
/// talking to a meter anymore.
pub const MAX_LINES_PER_PHASE: usize = 16;

#[derive(Error, Debug)]
pub enum ReadError {
    /// The port itself failed: disconnected, write error, permission lost.
    #[error("transport failure during {phase}: {source}")]
    Transport {
        phase: Phase,
        #[source]
        source: io::Error,
    },
    /// The meter sent nothing at all within the configured timeout.
    #[error("meter sent nothing during {phase} within the timeout")]
    Timeout { phase: Phase },
    /// Lines kept arriving but the phase's marker never showed up.
    #[error("gave up on {phase} after {limit} lines without a terminator")]
    MissingTerminator { phase: Phase, limit: usize },
}

/// Drives one IEC 62056-21 sign-on / readout exchange per call.
///
/// The session owns its link; at most one read cycle is in flight at a
/// time. There are no internal retries: a failed call is reported and the
/// caller's schedule decides when to try again.
pub struct ReadSession<L> {
    link: L,
    sink: Box<dyn DiagnosticsSink>,
    line_limit: usize,
}

impl<L: MeterLink> ReadSession<L> {
    pub fn new(link: L) -> Self {
        Self::with_sink(link, Box::new(LogSink))
    }

    /// Use a custom diagnostics sink instead of the `log` bridge.
    pub fn with_sink(link: L, sink: Box<dyn DiagnosticsSink>) -> Self {
        ReadSession {
            link,
            sink,
            line_limit: MAX_LINES_PER_PHASE,
        }
    }

    /// Perform one full read cycle and extract the known registers.
    ///
    /// Transport and timeout conditions abort the call; registers that do
    /// not appear in the response are simply absent in the result.
    pub fn read_meter(&mut self) -> Result<MeterReading, ReadError> {
        let mut response = Vec::new();
        let mut state = HandshakeState::AwaitingIdentification;

        loop {
            state = match state {
                HandshakeState::AwaitingIdentification => {
                    self.await_identification()?;
                    HandshakeState::AwaitingAcknowledgement
                }
                HandshakeState::AwaitingAcknowledgement => {
                    response = self.await_data_transfer()?;
                    HandshakeState::Complete
                }
                HandshakeState::Complete => break,
            };
        }

        /* The meter puts the whole payload on the first accumulated line;
         * later lines only carry the terminator. */
        let payload = response.first().map(String::as_str).unwrap_or("");
        self.sink.event(SessionEvent::PayloadComplete {
            lines: response.len(),
        });
        Ok(register_parser::parse(payload))
    }

    /// Phase one: request identification, read until the marker line.
    fn await_identification(&mut self) -> Result<(), ReadError> {
        self.send(Phase::Identification, INIT_FRAME)?;

        for _ in 0..self.line_limit {
            let line = self.receive(Phase::Identification)?;
            if line.contains(INIT_ECHO) {
                self.sink.event(SessionEvent::EchoSkipped);
                continue;
            }
            if line.contains('/') {
                /* A line too short to decode still counts as the marker;
                 * the announcement is diagnostic, not load-bearing. */
                if let Some(announcement) = utils::parse_identification_line(&line) {
                    self.sink.event(SessionEvent::BaudAnnounced {
                        announcement: &announcement,
                    });
                }
                return Ok(());
            }
        }
        Err(ReadError::MissingTerminator {
            phase: Phase::Identification,
            limit: self.line_limit,
        })
    }

    /// Phase two: acknowledge reading mode, accumulate lines until ETX.
    fn await_data_transfer(&mut self) -> Result<Vec<String>, ReadError> {
        self.send(Phase::DataTransfer, ACK_FRAME)?;

        let mut response = Vec::new();
        for _ in 0..self.line_limit {
            let raw = self.receive(Phase::DataTransfer)?;
            let line = utils::strip_echo(&raw, ACK_ECHO);
            if line.len() != raw.len() {
                self.sink.event(SessionEvent::EchoSkipped);
            }

            let trimmed = line.trim();
            if !trimmed.is_empty() {
                response.push(trimmed.to_string());
            }
            if line.contains(ETX) {
                return Ok(response);
            }
        }
        Err(ReadError::MissingTerminator {
            phase: Phase::DataTransfer,
            limit: self.line_limit,
        })
    }

    fn send(&mut self, phase: Phase, frame: &'static [u8]) -> Result<(), ReadError> {
        self.sink.event(SessionEvent::FrameSent { frame });
        self.link
            .write_frame(frame)
            .map_err(|source| ReadError::Transport { phase, source })
    }

    fn receive(&mut self, phase: Phase) -> Result<String, ReadError> {
        match self.link.read_line() {
            Ok(line) => {
                self.sink.event(SessionEvent::LineReceived { line: &line });
                Ok(line)
            }
            Err(e) if e.kind() == io::ErrorKind::TimedOut => Err(ReadError::Timeout { phase }),
            Err(source) => Err(ReadError::Transport { phase, source }),
        }
    }
}

/// One-shot convenience around [`ReadSession`].
pub fn read_meter<L: MeterLink>(link: L) -> Result<MeterReading, ReadError> {
    ReadSession::new(link).read_meter()
}
