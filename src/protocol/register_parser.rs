use super::registers::{RegisterId, RegisterValue};
use crate::models::MeterReading;

/// One `id(value*unit)` group lifted out of the data response.
#[derive(Debug, Clone, PartialEq)]
pub struct RegisterGroup {
    pub id: String,
    pub value: String,
    pub unit: Option<String>,
}

/// Extract the known registers from the accumulated response text.
///
/// Unknown groups are ignored. A register whose group is missing, carries
/// the wrong unit, or fails numeric coercion simply stays absent; this
/// function never fails.
pub fn parse(text: &str) -> MeterReading {
    let groups = scan_groups(text);
    let mut reading = MeterReading::default();

    for register in RegisterId::ALL {
        let group = match groups.iter().find(|g| g.id == register.code()) {
            Some(group) => group,
            None => continue,
        };
        if group.unit.as_deref() != Some(register.unit()) {
            continue;
        }
        let value = match register.kind().coerce(&group.value) {
            Some(value) => value,
            None => continue,
        };
        match (register, value) {
            (RegisterId::ThermalEnergy, RegisterValue::Float(v)) => reading.heat_energy = Some(v),
            (RegisterId::Volume, RegisterValue::Float(v)) => reading.volume = Some(v),
            (RegisterId::HoursCounter, RegisterValue::Integer(v)) => {
                reading.hours_counter = Some(v)
            }
            _ => {}
        }
    }

    reading
}

/// Split a payload into register groups.
///
/// The grammar is `id "(" value [ "*" unit ] ")"` with ids made of digits
/// and dots, e.g.
/// `0.0(00002742640)6.8(0456.631*GJ)6.26(3447.381*m3)6.31(0040345*h)!`
/// Anything between groups (the leading STX byte, the trailing "!", stray
/// noise) is skipped while resynchronizing on the next id.
pub fn scan_groups(text: &str) -> Vec<RegisterGroup> {
    let mut scanner = GroupScanner::new(text);
    let mut groups = Vec::new();
    while let Some(group) = scanner.next_group() {
        groups.push(group);
    }
    groups
}

struct GroupScanner<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> GroupScanner<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            data: text.as_bytes(),
            pos: 0,
        }
    }

    fn next_group(&mut self) -> Option<RegisterGroup> {
        loop {
            self.skip_to_digit()?;
            let id = self.take_while(|b| b.is_ascii_digit() || b == b'.');
            if self.peek() != Some(b'(') {
                /* Not a group, resync on the next digit run */
                continue;
            }
            self.pos += 1;

            let value = self.take_while(|b| b != b'*' && b != b')');
            let unit = if self.peek() == Some(b'*') {
                self.pos += 1;
                Some(self.take_while(|b| b != b')'))
            } else {
                None
            };

            if self.peek() != Some(b')') {
                /* Truncated group at end of input */
                return None;
            }
            self.pos += 1;

            return Some(RegisterGroup { id, value, unit });
        }
    }

    fn skip_to_digit(&mut self) -> Option<()> {
        while self.pos < self.data.len() && !self.data[self.pos].is_ascii_digit() {
            self.pos += 1;
        }
        if self.pos < self.data.len() {
            Some(())
        } else {
            None
        }
    }

    fn peek(&self) -> Option<u8> {
        self.data.get(self.pos).copied()
    }

    fn take_while<F: Fn(u8) -> bool>(&mut self, pred: F) -> String {
        let start = self.pos;
        while self.pos < self.data.len() && pred(self.data[self.pos]) {
            self.pos += 1;
        }
        String::from_utf8_lossy(&self.data[start..self.pos]).into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL_PAYLOAD: &str =
        "\u{2}0.0(00002742640)6.8(0456.631*GJ)6.26(3447.381*m3)6.31(0040345*h)!";

    #[test]
    fn test_scan_groups() {
        let groups = scan_groups(FULL_PAYLOAD);
        assert_eq!(groups.len(), 4);
        assert_eq!(groups[0].id, "0.0");
        assert_eq!(groups[0].value, "00002742640");
        assert_eq!(groups[0].unit, None);
        assert_eq!(groups[1].id, "6.8");
        assert_eq!(groups[1].value, "0456.631");
        assert_eq!(groups[1].unit.as_deref(), Some("GJ"));
        assert_eq!(groups[3].id, "6.31");
        assert_eq!(groups[3].unit.as_deref(), Some("h"));
    }

    #[test]
    fn test_parse_full_payload() {
        let reading = parse(FULL_PAYLOAD);
        assert_eq!(reading.heat_energy, Some(456.631));
        assert_eq!(reading.volume, Some(3447.381));
        assert_eq!(reading.hours_counter, Some(40345));
    }

    #[test]
    fn test_parse_missing_group_leaves_only_that_field_absent() {
        let reading = parse("\u{2}6.8(0456.631*GJ)6.31(0040345*h)!");
        assert_eq!(reading.heat_energy, Some(456.631));
        assert_eq!(reading.volume, None);
        assert_eq!(reading.hours_counter, Some(40345));
    }

    #[test]
    fn test_parse_no_groups_is_all_absent() {
        let reading = parse("nothing resembling a register here");
        assert!(reading.is_empty());

        let reading = parse("");
        assert!(reading.is_empty());
    }

    #[test]
    fn test_parse_wrong_unit_leaves_field_absent() {
        let reading = parse("6.8(0456.631*kWh)6.26(3447.381*m3)");
        assert_eq!(reading.heat_energy, None);
        assert_eq!(reading.volume, Some(3447.381));
    }

    #[test]
    fn test_parse_unparseable_value_leaves_field_absent() {
        let reading = parse("6.8(garbage*GJ)6.31(0040345*h)");
        assert_eq!(reading.heat_energy, None);
        assert_eq!(reading.hours_counter, Some(40345));
    }

    #[test]
    fn test_truncated_group_is_dropped() {
        let groups = scan_groups("6.8(0456.631*GJ)6.26(3447.381");
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].id, "6.8");
    }

    #[test]
    fn test_group_without_opening_paren_is_skipped() {
        let groups = scan_groups("6.8 no group 6.26(3447.381*m3)");
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].id, "6.26");
    }
}
