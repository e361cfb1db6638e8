use crate::config::MeterConfig;
use log::debug;
use serialport::{DataBits, FlowControl, Parity, SerialPort, StopBits};
use std::io::{self, Read, Write};
use std::time::Duration;

/// Longest line we are willing to assemble before handing it back as-is.
const MAX_LINE_BYTES: usize = 512;

/// Line-oriented access to the meter. The handshake engine only talks to
/// this trait, so tests can script a meter without a physical port. Links
/// are not reentrant; one read cycle at a time.
pub trait MeterLink {
    /// Write one protocol frame and flush it out.
    fn write_frame(&mut self, frame: &[u8]) -> io::Result<()>;

    /// Block until a newline-terminated line arrives. If the timeout hits
    /// while bytes are already buffered, the partial line is returned
    /// instead; the meter ends some fragments with a bare control byte and
    /// no newline. A timeout with nothing buffered surfaces as
    /// `ErrorKind::TimedOut`.
    fn read_line(&mut self) -> io::Result<String>;
}

/// A serial port opened with the meter's fixed 7E2 framing.
pub struct SerialLink {
    port: Box<dyn SerialPort>,
}

impl SerialLink {
    pub fn open(config: &MeterConfig) -> Result<Self, serialport::Error> {
        debug!(
            "Opening {} at {} baud (7E2), timeout {}s",
            config.port, config.baudrate, config.timeout_secs
        );
        let port = serialport::new(&config.port, config.baudrate)
            .data_bits(DataBits::Seven)
            .parity(Parity::Even)
            .stop_bits(StopBits::Two)
            .flow_control(FlowControl::None)
            .timeout(Duration::from_secs(config.timeout_secs))
            .open()?;
        Ok(SerialLink { port })
    }
}

impl MeterLink for SerialLink {
    fn write_frame(&mut self, frame: &[u8]) -> io::Result<()> {
        self.port.write_all(frame)?;
        self.port.flush()
    }

    fn read_line(&mut self) -> io::Result<String> {
        read_line_from(&mut self.port)
    }
}

/// Assemble one line byte by byte. Factored over `Read` so the assembly
/// rules are testable without a port. Frames are 7-bit, so lossy UTF-8
/// decoding never loses payload data.
fn read_line_from<R: Read + ?Sized>(reader: &mut R) -> io::Result<String> {
    let mut buf: Vec<u8> = Vec::new();
    let mut byte = [0u8; 1];
    loop {
        match reader.read(&mut byte) {
            Ok(0) => {
                /* A live serial handle never reports end-of-file */
                return Err(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    "serial port closed",
                ));
            }
            Ok(_) => {
                buf.push(byte[0]);
                if byte[0] == b'\n' || buf.len() >= MAX_LINE_BYTES {
                    break;
                }
            }
            Err(e) if e.kind() == io::ErrorKind::TimedOut && !buf.is_empty() => break,
            Err(e) => return Err(e),
        }
    }
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Replays a fixed byte stream, then a scripted error.
    struct ScriptedReader {
        data: Vec<u8>,
        pos: usize,
        then: Option<io::ErrorKind>,
    }

    impl Read for ScriptedReader {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.pos < self.data.len() {
                buf[0] = self.data[self.pos];
                self.pos += 1;
                return Ok(1);
            }
            match self.then.take() {
                Some(kind) => Err(io::Error::new(kind, "scripted")),
                None => Ok(0),
            }
        }
    }

    #[test]
    fn test_reads_one_line_at_a_time() {
        let mut reader = ScriptedReader {
            data: b"/KAM0MCC\r\nsecond\r\n".to_vec(),
            pos: 0,
            then: None,
        };
        assert_eq!(read_line_from(&mut reader).unwrap(), "/KAM0MCC\r\n");
        assert_eq!(read_line_from(&mut reader).unwrap(), "second\r\n");
    }

    #[test]
    fn test_partial_line_returned_on_timeout() {
        let mut reader = ScriptedReader {
            data: b"\x03".to_vec(),
            pos: 0,
            then: Some(io::ErrorKind::TimedOut),
        };
        assert_eq!(read_line_from(&mut reader).unwrap(), "\u{3}");
    }

    #[test]
    fn test_timeout_with_nothing_buffered_is_an_error() {
        let mut reader = ScriptedReader {
            data: Vec::new(),
            pos: 0,
            then: Some(io::ErrorKind::TimedOut),
        };
        let err = read_line_from(&mut reader).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::TimedOut);
    }

    #[test]
    fn test_eof_is_an_error() {
        let mut reader = ScriptedReader {
            data: b"no newline".to_vec(),
            pos: 0,
            then: None,
        };
        let err = read_line_from(&mut reader).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }
}
