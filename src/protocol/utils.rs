use super::structs::BaudAnnouncement;

/// Baud rates a meter may announce, indexed by the code character from the
/// identification line.
pub fn baud_rate_for_code(code: char) -> Option<u32> {
    match code {
        '0' => Some(300),
        '1' => Some(600),
        '2' => Some(1200),
        '3' => Some(2400),
        '4' => Some(4800),
        '5' => Some(9600),
        '6' => Some(19200),
        _ => None,
    }
}

/// Decode the manufacturer flag and proposed baud rate from an
/// identification line.
///
/// Expected shape: "/KAM0MCC" — the marker, three flag characters, one
/// baud code character, then model text. Returns None when the line is too
/// short to carry the five marker characters.
pub fn parse_identification_line(line: &str) -> Option<BaudAnnouncement> {
    let start = line.find('/')?;
    let mut chars = line[start..].chars();
    chars.next(); // the marker itself

    let manufacturer_id: String = chars.by_ref().take(3).collect();
    if manufacturer_id.chars().count() < 3 {
        return None;
    }
    let baud_code = chars.next()?;

    Some(BaudAnnouncement {
        manufacturer_id,
        baud_code,
        baud_rate: baud_rate_for_code(baud_code),
    })
}

/// Drop an echoed frame from the front of a received line. Half-duplex
/// optical heads feed our own transmission back before the meter's data.
pub fn strip_echo<'a>(line: &'a str, echo: &str) -> &'a str {
    line.strip_prefix(echo).unwrap_or(line)
}
