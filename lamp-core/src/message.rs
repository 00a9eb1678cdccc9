//! Generic OnOff Nachrichten
//!
//! Dekodiert eingehende Opcodes + Payload in eine getaggte Nachricht und
//! kodiert die Status-Antwort.

use core::fmt;

use crate::types::LightState;

/// Generic OnOff Opcodes (2-Oktett, SIG-definiert)
pub mod opcode {
    pub const GET: u16 = 0x8201;
    pub const SET: u16 = 0x8202;
    pub const SET_UNACK: u16 = 0x8203;
    pub const STATUS: u16 = 0x8204;
}

/// Fehler beim Dekodieren einer eingehenden Nachricht
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DecodeError {
    UnknownOpcode(u16),
    InvalidLength { expected: u8, actual: usize },
    InvalidValue(u8),
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::UnknownOpcode(op) => write!(f, "unknown opcode 0x{:04x}", op),
            DecodeError::InvalidLength { expected, actual } => {
                write!(f, "invalid length {} (expected {})", actual, expected)
            }
            DecodeError::InvalidValue(v) => write!(f, "invalid onoff value 0x{:02x}", v),
        }
    }
}

/// Eingehende Nachricht an den OnOff Server
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OnOffMessage {
    Get,
    Set(LightState),
    SetUnacknowledged(LightState),
}

impl OnOffMessage {
    /// Dekodiert Opcode + Payload
    ///
    /// GET erwartet keine Payload, SET/SET-UNACK genau ein Byte (0x00/0x01).
    pub fn decode(opcode: u16, payload: &[u8]) -> Result<Self, DecodeError> {
        match opcode {
            opcode::GET => {
                if !payload.is_empty() {
                    return Err(DecodeError::InvalidLength {
                        expected: 0,
                        actual: payload.len(),
                    });
                }
                Ok(Self::Get)
            }
            opcode::SET => decode_target(payload).map(Self::Set),
            opcode::SET_UNACK => decode_target(payload).map(Self::SetUnacknowledged),
            other => Err(DecodeError::UnknownOpcode(other)),
        }
    }
}

fn decode_target(payload: &[u8]) -> Result<LightState, DecodeError> {
    match payload {
        [value] => LightState::from_wire(*value).ok_or(DecodeError::InvalidValue(*value)),
        _ => Err(DecodeError::InvalidLength {
            expected: 1,
            actual: payload.len(),
        }),
    }
}

/// Generic OnOff Status (Antwort und Publish)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct OnOffStatus {
    pub present: LightState,
}

impl OnOffStatus {
    /// Opcode (2 Byte) + Present OnOff (1 Byte)
    pub const PDU_LEN: usize = 3;

    pub const fn new(present: LightState) -> Self {
        Self { present }
    }

    pub const fn payload(&self) -> u8 {
        self.present.to_wire()
    }

    /// Access-Layer PDU ohne MIC (den hängt der Transport an)
    pub const fn to_pdu(&self) -> [u8; Self::PDU_LEN] {
        let [hi, lo] = opcode::STATUS.to_be_bytes();
        [hi, lo, self.payload()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_get() {
        assert_eq!(OnOffMessage::decode(opcode::GET, &[]), Ok(OnOffMessage::Get));
    }

    #[test]
    fn test_decode_get_with_payload_rejected() {
        assert_eq!(
            OnOffMessage::decode(opcode::GET, &[0x01]),
            Err(DecodeError::InvalidLength {
                expected: 0,
                actual: 1
            })
        );
    }

    #[test]
    fn test_decode_set_variants() {
        assert_eq!(
            OnOffMessage::decode(opcode::SET, &[0x01]),
            Ok(OnOffMessage::Set(LightState::On))
        );
        assert_eq!(
            OnOffMessage::decode(opcode::SET_UNACK, &[0x00]),
            Ok(OnOffMessage::SetUnacknowledged(LightState::Off))
        );
    }

    #[test]
    fn test_decode_invalid_value() {
        assert_eq!(
            OnOffMessage::decode(opcode::SET, &[0x02]),
            Err(DecodeError::InvalidValue(0x02))
        );
    }

    #[test]
    fn test_decode_invalid_length() {
        assert_eq!(
            OnOffMessage::decode(opcode::SET_UNACK, &[]),
            Err(DecodeError::InvalidLength {
                expected: 1,
                actual: 0
            })
        );
        assert_eq!(
            OnOffMessage::decode(opcode::SET, &[0x01, 0x07]),
            Err(DecodeError::InvalidLength {
                expected: 1,
                actual: 2
            })
        );
    }

    #[test]
    fn test_decode_status_opcode_is_not_a_request() {
        assert_eq!(
            OnOffMessage::decode(opcode::STATUS, &[0x01]),
            Err(DecodeError::UnknownOpcode(opcode::STATUS))
        );
    }

    #[test]
    fn test_status_pdu_layout() {
        assert_eq!(OnOffStatus::new(LightState::On).to_pdu(), [0x82, 0x04, 0x01]);
        assert_eq!(OnOffStatus::new(LightState::Off).to_pdu(), [0x82, 0x04, 0x00]);
    }
}
