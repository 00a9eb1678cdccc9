//! Board: Zuordnung Kanal → Pin + Polarität
//!
//! Implementiert `HardwareOutput` über beliebige `DigitalLine`s, damit die
//! Logik mit Mock-Pins auf dem Host testbar bleibt.

use crate::traits::{DigitalLine, HardwareOutput, HwError};
use crate::types::{LightState, OutputChannel, Polarity};

struct BoundLine<L> {
    line: L,
    polarity: Polarity,
}

/// Alle Ausgänge des Boards
///
/// Ein Kanal ohne Pin bleibt unbenutzbar (`HwError::Unbound`), die anderen
/// funktionieren weiter.
pub struct Board<L> {
    lines: [Option<BoundLine<L>>; 2],
}

impl<L> Board<L> {
    pub const fn new() -> Self {
        Self {
            lines: [None, None],
        }
    }

    /// Bindet einen Pin an einen Kanal (nur beim Start)
    pub fn with_line(mut self, channel: OutputChannel, line: L, polarity: Polarity) -> Self {
        self.lines[channel.index()] = Some(BoundLine { line, polarity });
        self
    }

    pub fn line(&self, channel: OutputChannel) -> Option<&L> {
        self.lines[channel.index()].as_ref().map(|bound| &bound.line)
    }

    fn bound(&mut self, channel: OutputChannel) -> Result<&mut BoundLine<L>, HwError> {
        self.lines[channel.index()]
            .as_mut()
            .ok_or(HwError::Unbound(channel))
    }
}

impl<L> Default for Board<L> {
    fn default() -> Self {
        Self::new()
    }
}

impl<L: DigitalLine> HardwareOutput for Board<L> {
    fn configure(&mut self, channel: OutputChannel) -> Result<(), HwError> {
        let bound = self.bound(channel)?;
        bound
            .line
            .drive(bound.polarity.level_for(LightState::Off))
            .map_err(|_| HwError::ConfigureFailed(channel))
    }

    fn write(&mut self, channel: OutputChannel, state: LightState) -> Result<(), HwError> {
        let bound = self.bound(channel)?;
        bound
            .line
            .drive(bound.polarity.level_for(state))
            .map_err(|_| HwError::WriteFailed(channel))
    }

    fn read(&mut self, channel: OutputChannel) -> Result<LightState, HwError> {
        let bound = self.bound(channel)?;
        bound
            .line
            .is_driven_high()
            .map(|high| bound.polarity.state_for(high))
            .map_err(|_| HwError::ReadFailed(channel))
    }
}

/// Initialisiert alle Kanäle (Board-Init beim Start)
///
/// Fehler betreffen nur den jeweiligen Kanal. Liefert die Anzahl der
/// erfolgreich konfigurierten Kanäle.
pub fn configure_outputs<H: HardwareOutput>(hardware: &mut H) -> usize {
    let mut configured = 0;
    for channel in OutputChannel::ALL {
        match hardware.configure(channel) {
            Ok(()) => {
                debug!("Board: {} configured", channel);
                configured += 1;
            }
            Err(e) => error!("Board: {}, channel disabled", e),
        }
    }
    configured
}
