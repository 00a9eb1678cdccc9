//! Core Types für die Lampen-Steuerung
//!
//! Datenstrukturen ohne Hardware-Dependencies

use core::fmt;

/// Schaltzustand einer Lampe (logisch oder physikalisch)
///
/// Es gibt bewusst keinen dritten Zustand: fehlende Information wird über
/// `Option`/`Result` ausgedrückt, nie als `Off` geraten.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LightState {
    On,
    Off,
}

impl LightState {
    /// Dekodiert den Mesh-Wire-Wert (0x00 = Off, 0x01 = On)
    ///
    /// Alle anderen Werte sind ungültig und liefern `None`.
    pub const fn from_wire(value: u8) -> Option<Self> {
        match value {
            0x00 => Some(Self::Off),
            0x01 => Some(Self::On),
            _ => None,
        }
    }

    pub const fn to_wire(self) -> u8 {
        match self {
            Self::On => 0x01,
            Self::Off => 0x00,
        }
    }

    pub const fn toggled(self) -> Self {
        match self {
            Self::On => Self::Off,
            Self::Off => Self::On,
        }
    }

    pub const fn is_on(self) -> bool {
        matches!(self, Self::On)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::On => "on",
            Self::Off => "off",
        }
    }
}

impl fmt::Display for LightState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Physikalischer Ausgang des Boards
///
/// Die Zuordnung Kanal → Pin wird einmal beim Start festgelegt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OutputChannel {
    /// Status-LED (Heartbeat)
    Indicator,
    /// Die geschaltete Lampe
    Lamp,
}

impl OutputChannel {
    pub const ALL: [OutputChannel; 2] = [OutputChannel::Indicator, OutputChannel::Lamp];

    pub const fn index(self) -> usize {
        match self {
            Self::Indicator => 0,
            Self::Lamp => 1,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Indicator => "indicator",
            Self::Lamp => "lamp",
        }
    }
}

impl fmt::Display for OutputChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Verdrahtung eines Ausgangs
///
/// Bei `ActiveLow` leuchtet die LED, wenn der Pin auf Low liegt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Polarity {
    ActiveHigh,
    ActiveLow,
}

impl Polarity {
    /// Pin-Pegel (true = High) für einen logischen Zustand
    pub const fn level_for(self, state: LightState) -> bool {
        match self {
            Self::ActiveHigh => state.is_on(),
            Self::ActiveLow => !state.is_on(),
        }
    }

    /// Logischer Zustand für einen gelesenen Pin-Pegel
    pub const fn state_for(self, high: bool) -> LightState {
        let lit = match self {
            Self::ActiveHigh => high,
            Self::ActiveLow => !high,
        };
        if lit { LightState::On } else { LightState::Off }
    }
}

/// 16-Bit Mesh-Adresse
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Address(u16);

impl Address {
    pub const UNASSIGNED: Address = Address(0x0000);

    pub const fn new(raw: u16) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u16 {
        self.0
    }

    pub const fn is_assigned(self) -> bool {
        self.0 != Self::UNASSIGNED.0
    }

    /// Element-Adressen liegen im Unicast-Bereich 0x0001..=0x7FFF
    pub const fn is_unicast(self) -> bool {
        self.0 >= 0x0001 && self.0 <= 0x7FFF
    }

}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:04x}", self.0)
    }
}

/// Adressierungs-Kontext einer empfangenen Nachricht
///
/// Wird vom Mesh-Layer mitgeliefert und für Antworten unverändert
/// zurückgegeben.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageContext {
    pub net_idx: u16,
    pub app_idx: u16,
    pub src: Address,
    pub dst: Address,
    pub recv_ttl: u8,
}

impl MessageContext {
    pub const fn new(src: Address, dst: Address) -> Self {
        Self {
            net_idx: 0,
            app_idx: 0,
            src,
            dst,
            recv_ttl: 0,
        }
    }
}

// ============================================================================
// defmt::Format Implementations (optional feature)
// ============================================================================

#[cfg(feature = "defmt")]
impl defmt::Format for LightState {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "{=str}", self.as_str())
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for OutputChannel {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "{=str}", self.as_str())
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Address {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "0x{=u16:x}", self.0)
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for MessageContext {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(
            fmt,
            "MessageContext {{ src: {}, dst: {}, net_idx: {}, app_idx: {} }}",
            self.src,
            self.dst,
            self.net_idx,
            self.app_idx
        )
    }
}
