use std::fmt;

/// Where a read cycle currently stands. One `read_meter` call walks this
/// top to bottom and the state never outlives the call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum HandshakeState {
    AwaitingIdentification,
    AwaitingAcknowledgement,
    Complete,
}

/// Handshake phase, named in errors and diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Identification,
    DataTransfer,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Identification => write!(f, "identification"),
            Phase::DataTransfer => write!(f, "data transfer"),
        }
    }
}

/// Decoded identification line: the manufacturer flag and the baud rate
/// the meter would prefer to continue at. Informational only; the session
/// always stays at the configured rate.
#[derive(Debug, Clone, PartialEq)]
pub struct BaudAnnouncement {
    pub manufacturer_id: String,
    pub baud_code: char,
    pub baud_rate: Option<u32>,
}

impl BaudAnnouncement {
    pub fn baud_rate_label(&self) -> String {
        match self.baud_rate {
            Some(rate) => rate.to_string(),
            None => "unknown".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_names() {
        assert_eq!(Phase::Identification.to_string(), "identification");
        assert_eq!(Phase::DataTransfer.to_string(), "data transfer");
    }

    #[test]
    fn test_baud_rate_label() {
        let known = BaudAnnouncement {
            manufacturer_id: "KAM".to_string(),
            baud_code: '5',
            baud_rate: Some(9600),
        };
        assert_eq!(known.baud_rate_label(), "9600");

        let unknown = BaudAnnouncement {
            manufacturer_id: "KAM".to_string(),
            baud_code: '9',
            baud_rate: None,
        };
        assert_eq!(unknown.baud_rate_label(), "unknown");
    }
}
