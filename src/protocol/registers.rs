/// Target numeric type of a register value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterKind {
    Float,
    Integer,
}

/// A coerced register value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RegisterValue {
    Float(f64),
    Integer(u32),
}

impl RegisterKind {
    /// Coerce a raw payload value. Leading zeros are plain positional
    /// notation here ("0456.631" is 456.631, "0040345" is 40345).
    pub fn coerce(&self, raw: &str) -> Option<RegisterValue> {
        match self {
            RegisterKind::Float => raw.parse::<f64>().ok().map(RegisterValue::Float),
            RegisterKind::Integer => raw.parse::<u32>().ok().map(RegisterValue::Integer),
        }
    }
}

/// The registers a Multical 401 reports over the optical head.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterId {
    ThermalEnergy,
    Volume,
    HoursCounter,
}

impl RegisterId {
    pub const ALL: [RegisterId; 3] = [
        RegisterId::ThermalEnergy,
        RegisterId::Volume,
        RegisterId::HoursCounter,
    ];

    /// Register number as it appears in the data response.
    pub fn code(&self) -> &'static str {
        match self {
            RegisterId::ThermalEnergy => "6.8",
            RegisterId::Volume => "6.26",
            RegisterId::HoursCounter => "6.31",
        }
    }

    /// Unit literal the meter appends to the value.
    pub fn unit(&self) -> &'static str {
        match self {
            RegisterId::ThermalEnergy => "GJ",
            RegisterId::Volume => "m3",
            RegisterId::HoursCounter => "h",
        }
    }

    pub fn kind(&self) -> RegisterKind {
        match self {
            RegisterId::ThermalEnergy => RegisterKind::Float,
            RegisterId::Volume => RegisterKind::Float,
            RegisterId::HoursCounter => RegisterKind::Integer,
        }
    }

    /// Human-readable name, as the meter's documentation calls it.
    pub fn name(&self) -> &'static str {
        match self {
            RegisterId::ThermalEnergy => "Thermal Energy",
            RegisterId::Volume => "Volume",
            RegisterId::HoursCounter => "Hour Counter",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_codes_and_units() {
        assert_eq!(RegisterId::ThermalEnergy.code(), "6.8");
        assert_eq!(RegisterId::ThermalEnergy.unit(), "GJ");
        assert_eq!(RegisterId::Volume.code(), "6.26");
        assert_eq!(RegisterId::Volume.unit(), "m3");
        assert_eq!(RegisterId::HoursCounter.code(), "6.31");
        assert_eq!(RegisterId::HoursCounter.unit(), "h");
        assert_eq!(RegisterId::ALL.len(), 3);
    }

    #[test]
    fn test_coerce_ignores_leading_zeros() {
        assert_eq!(
            RegisterKind::Float.coerce("0456.631"),
            Some(RegisterValue::Float(456.631))
        );
        assert_eq!(
            RegisterKind::Integer.coerce("0040345"),
            Some(RegisterValue::Integer(40345))
        );
    }

    #[test]
    fn test_coerce_failure_is_none() {
        assert_eq!(RegisterKind::Float.coerce("not a number"), None);
        assert_eq!(RegisterKind::Integer.coerce("12.5"), None);
        assert_eq!(RegisterKind::Integer.coerce(""), None);
    }
}
