//! Hardware- und Mesh-Abstraktions-Traits
//!
//! Diese Traits definieren die Schnittstellen zu den externen Kollaborateuren
//! (GPIO, Mesh-Stack, Persistenz) ohne konkrete Implementierung.

use core::fmt;

use crate::lifecycle::{Bearers, NodeConfig, ProvisioningParams};
use crate::message::OnOffStatus;
use crate::types::{Address, LightState, MessageContext, OutputChannel};

// ============================================================================
// Fehler-Typen
// ============================================================================

/// Fehler-Typ für GPIO-Operationen
///
/// Nie fatal: Aufrufer loggen und machen weiter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HwError {
    /// Kanal hat beim Start keinen Pin bekommen
    Unbound(OutputChannel),
    ConfigureFailed(OutputChannel),
    WriteFailed(OutputChannel),
    ReadFailed(OutputChannel),
}

impl fmt::Display for HwError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HwError::Unbound(ch) => write!(f, "{} channel not bound", ch),
            HwError::ConfigureFailed(ch) => write!(f, "{} configure failed", ch),
            HwError::WriteFailed(ch) => write!(f, "{} write failed", ch),
            HwError::ReadFailed(ch) => write!(f, "{} read failed", ch),
        }
    }
}

/// Rohfehler eines einzelnen Pins (ohne Kanal-Kontext)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LineFault;

/// Fehler beim Senden über den Mesh-Layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TransportError {
    /// Ausgangs-Queue zum Stack ist voll
    QueueFull,
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportError::QueueFull => f.write_str("queue full"),
        }
    }
}

/// Fehler der Plattform-Persistenz
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StoreError {
    Unavailable,
    WriteFailed,
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Unavailable => f.write_str("store unavailable"),
            StoreError::WriteFailed => f.write_str("store write failed"),
        }
    }
}

/// Fehlercode des Mesh-Stacks (wie vom Stack gemeldet)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StackError(pub i32);

impl fmt::Display for StackError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "err {}", self.0)
    }
}

// ============================================================================
// Hardware
// ============================================================================

/// Ein einzelner digitaler Ausgang (Pin-Ebene, ohne Polarität)
///
/// # Implementierungen
/// - **Production:** GpioLine (esp-hal `Output`)
/// - **Testing:** MockLine (in-memory)
pub trait DigitalLine {
    /// Treibt den Pin auf High (`true`) oder Low (`false`)
    fn drive(&mut self, high: bool) -> Result<(), LineFault>;

    /// Liest den aktuell getriebenen Pegel zurück
    fn is_driven_high(&self) -> Result<bool, LineFault>;
}

/// Zugriff auf die Ausgänge des Boards
///
/// Alle Operationen sind synchron und kurz. Fehler sind nie fatal.
pub trait HardwareOutput {
    /// Initialisiert den Kanal als Ausgang mit bekanntem Default (unlit)
    fn configure(&mut self, channel: OutputChannel) -> Result<(), HwError>;

    fn write(&mut self, channel: OutputChannel, state: LightState) -> Result<(), HwError>;

    fn read(&mut self, channel: OutputChannel) -> Result<LightState, HwError>;

    /// Invertiert den Kanal und liefert den neuen Zustand
    ///
    /// Schlägt das Lesen fehl, wird nicht geschrieben.
    fn toggle(&mut self, channel: OutputChannel) -> Result<LightState, HwError> {
        let next = self.read(channel)?.toggled();
        self.write(channel, next)?;
        Ok(next)
    }
}

impl<H: HardwareOutput + ?Sized> HardwareOutput for &mut H {
    fn configure(&mut self, channel: OutputChannel) -> Result<(), HwError> {
        (**self).configure(channel)
    }

    fn write(&mut self, channel: OutputChannel, state: LightState) -> Result<(), HwError> {
        (**self).write(channel, state)
    }

    fn read(&mut self, channel: OutputChannel) -> Result<LightState, HwError> {
        (**self).read(channel)
    }

    fn toggle(&mut self, channel: OutputChannel) -> Result<LightState, HwError> {
        (**self).toggle(channel)
    }
}

// ============================================================================
// Mesh
// ============================================================================

/// Ausgehender Pfad zum Mesh-Layer
///
/// Fire-and-forget: Retry und Rate-Limiting gehören dem Transport.
pub trait MeshTransport {
    /// Unicast-Antwort an den Absender von `ctx`
    fn send_reply(&mut self, ctx: &MessageContext, status: OnOffStatus) -> Result<(), TransportError>;

    /// Status an die Publish-Adresse des Models
    fn publish(&mut self, destination: Address, status: OnOffStatus) -> Result<(), TransportError>;
}

/// Steuerung des Mesh-Stacks über seinen Lebenszyklus
pub trait MeshStack {
    /// Startet das Bluetooth-Subsystem, Ergebnis kommt als Ready-Event
    fn enable(&mut self) -> Result<(), StackError>;

    fn init(&mut self, node: &NodeConfig, provisioning: &ProvisioningParams) -> Result<(), StackError>;

    /// Fordert das Laden persistenter Mesh-Settings an (Provisionierung,
    /// Keys, Publish-Config)
    ///
    /// Das Ergebnis kommt als Settings-Loaded Event. Bis dahin muss
    /// `is_provisioned()` noch nicht stimmen, danach schon.
    fn load_settings(&mut self) -> Result<(), StackError>;

    fn is_provisioned(&self) -> bool;

    fn enable_provisioning(&mut self, bearers: Bearers) -> Result<(), StackError>;
}

/// Plattform-Persistenz für den Lampen-Zustand
///
/// Das Speicherformat gehört der Plattform.
pub trait StateStore {
    /// `None` wenn nichts (gültiges) gespeichert ist
    fn load_state(&mut self) -> Option<LightState>;

    fn save_state(&mut self, state: LightState) -> Result<(), StoreError>;
}
