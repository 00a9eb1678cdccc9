//! Heartbeat-Blinker für die Status-LED
//!
//! Läuft unabhängig vom Mesh, berührt nur den Indicator-Kanal.

use crate::traits::HardwareOutput;
use crate::types::OutputChannel;

/// Invertiert die Status-LED bei jedem `tick()`
///
/// Der Aufrufer sorgt für das feste Intervall (Timer/Ticker). Fehler werden
/// geloggt und verschluckt, der nächste Tick versucht es erneut.
pub struct IndicatorBlinker<H> {
    hardware: H,
    channel: OutputChannel,
    consecutive_failures: u32,
}

impl<H: HardwareOutput> IndicatorBlinker<H> {
    pub fn new(hardware: H) -> Self {
        Self::with_channel(hardware, OutputChannel::Indicator)
    }

    pub fn with_channel(hardware: H, channel: OutputChannel) -> Self {
        Self {
            hardware,
            channel,
            consecutive_failures: 0,
        }
    }

    pub fn tick(&mut self) {
        match self.hardware.toggle(self.channel) {
            Ok(level) => {
                if self.consecutive_failures > 0 {
                    info!(
                        "Indicator: recovered after {} missed toggles",
                        self.consecutive_failures
                    );
                }
                self.consecutive_failures = 0;
                debug!("Blink! ({})", level);
            }
            Err(e) => {
                self.consecutive_failures = self.consecutive_failures.saturating_add(1);
                warn!("Indicator: toggle failed ({}), retrying next period", e);
            }
        }
    }

    pub fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures
    }

    pub fn hardware(&self) -> &H {
        &self.hardware
    }

    pub fn hardware_mut(&mut self) -> &mut H {
        &mut self.hardware
    }
}
