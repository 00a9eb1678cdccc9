//! Node-Lebenszyklus: Stack-Bring-up, Provisionierung, Boot-Zustand
//!
//! Reiner Glue-Code gegen [`MeshStack`]. Der eigentliche Mesh-Stack
//! (Bearer, Transport, Security, Provisioning) ist extern.

use core::fmt;

use crate::model::ModelInstance;
use crate::traits::{HardwareOutput, MeshStack, StackError, StateStore};
use crate::types::{Address, LightState, OutputChannel};

// ============================================================================
// Node-Konfiguration (Configuration Server Defaults)
// ============================================================================

/// Zustand eines optionalen Node-Features
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FeatureState {
    Disabled,
    Enabled,
    NotSupported,
}

/// Anzahl + Intervall von Netzwerk-Wiederholungen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Transmit {
    /// Zusätzliche Übertragungen (0..=7)
    pub count: u8,
    /// Schrittweite 10 ms (10..=320)
    pub interval_ms: u16,
}

impl Transmit {
    pub const fn new(count: u8, interval_ms: u16) -> Self {
        Self { count, interval_ms }
    }

    /// Mesh-Kodierung: Bits 0-2 Count, Bits 3-7 Intervall-Schritte minus 1
    pub const fn encoded(&self) -> u8 {
        let steps = self.interval_ms / 10;
        let steps = if steps == 0 { 0 } else { steps - 1 };
        (self.count & 0x07) | (((steps as u8) & 0x1F) << 3)
    }
}

/// Feature- und Transport-Defaults des Nodes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct NodeConfig {
    pub relay: FeatureState,
    pub beacon: bool,
    pub friend: FeatureState,
    pub gatt_proxy: FeatureState,
    pub default_ttl: u8,
    pub net_transmit: Transmit,
    pub relay_retransmit: Transmit,
}

impl Default for NodeConfig {
    fn default() -> Self {
        // 3 Übertragungen mit 20 ms Abstand
        Self {
            relay: FeatureState::Disabled,
            beacon: true,
            friend: FeatureState::NotSupported,
            gatt_proxy: FeatureState::NotSupported,
            default_ttl: 7,
            net_transmit: Transmit::new(2, 20),
            relay_retransmit: Transmit::new(2, 20),
        }
    }
}

// ============================================================================
// Provisionierung
// ============================================================================

/// OOB-Output-Aktionen (Bitmaske)
pub mod output_action {
    pub const DISPLAY_NUMBER: u16 = 0x0008;
}

/// Provisioning-Bearer (Bitmaske)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Bearers(u8);

impl Bearers {
    pub const ADV: Bearers = Bearers(0x01);
    pub const GATT: Bearers = Bearers(0x02);
    pub const ALL: Bearers = Bearers(0x03);

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn contains(self, other: Bearers) -> bool {
        self.0 & other.0 == other.0
    }
}

/// Fehler beim Parsen einer Device-UUID
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum UuidError {
    InvalidLength(usize),
    InvalidDigit(usize),
}

impl fmt::Display for UuidError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UuidError::InvalidLength(len) => write!(f, "expected 32 hex digits, got {}", len),
            UuidError::InvalidDigit(pos) => write!(f, "invalid hex digit at {}", pos),
        }
    }
}

/// 16-Byte Device UUID für unprovisionierte Beacons
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DeviceUuid(pub [u8; 16]);

impl DeviceUuid {
    /// Parst 32 Hex-Ziffern, Bindestriche werden ignoriert
    pub fn parse_hex(text: &str) -> Result<Self, UuidError> {
        let mut bytes = [0u8; 16];
        let mut nibbles = 0usize;
        for (pos, c) in text.char_indices() {
            if c == '-' {
                continue;
            }
            let value = c.to_digit(16).ok_or(UuidError::InvalidDigit(pos))? as u8;
            if nibbles >= 32 {
                return Err(UuidError::InvalidLength(nibbles + 1));
            }
            bytes[nibbles / 2] |= if nibbles % 2 == 0 { value << 4 } else { value };
            nibbles += 1;
        }
        if nibbles != 32 {
            return Err(UuidError::InvalidLength(nibbles));
        }
        Ok(Self(bytes))
    }
}

/// Parameter für das Provisioning-Protokoll
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ProvisioningParams {
    pub uuid: DeviceUuid,
    /// Maximale Ziffernanzahl der OOB-Ausgabe
    pub output_size: u8,
    pub output_actions: u16,
}

// ============================================================================
// Lebenszyklus
// ============================================================================

/// Steuert Bring-up und Provisionierungs-Callbacks des Nodes
///
/// Ablauf: `start()` → Stack meldet Ready → `on_stack_ready()` → Stack meldet
/// Settings geladen → `on_settings_loaded()`. Erst danach ist klar, ob der
/// Node schon provisioniert ist.
pub struct NodeLifecycle<M> {
    stack: M,
    node: NodeConfig,
    provisioning: ProvisioningParams,
    load_settings: bool,
    awaiting_settings: bool,
    initialized: bool,
}

impl<M: MeshStack> NodeLifecycle<M> {
    pub fn new(stack: M, node: NodeConfig, provisioning: ProvisioningParams) -> Self {
        Self {
            stack,
            node,
            provisioning,
            load_settings: true,
            awaiting_settings: false,
            initialized: false,
        }
    }

    /// Ob beim Stack-Ready persistente Settings geladen werden
    pub fn with_settings(mut self, load_settings: bool) -> Self {
        self.load_settings = load_settings;
        self
    }

    /// Bluetooth-Subsystem starten, Antwort kommt über `on_stack_ready`
    pub fn start(&mut self) -> Result<(), StackError> {
        info!("Node: Initializing ...");
        self.stack.enable().inspect_err(|e| {
            error!("Node: Bluetooth init failed ({})", e);
        })
    }

    /// Stack-Ready Callback: Mesh init, dann Settings anfordern
    ///
    /// Ohne Settings (oder wenn die Anfrage scheitert) geht es direkt mit
    /// der Provisionierung weiter.
    pub fn on_stack_ready(&mut self, result: Result<(), StackError>) -> Result<(), StackError> {
        if let Err(e) = result {
            error!("Node: Bluetooth init failed ({})", e);
            return Err(e);
        }
        info!("Node: Bluetooth initialized");

        if let Err(e) = self.stack.init(&self.node, &self.provisioning) {
            error!("Node: Initializing mesh failed ({})", e);
            return Err(e);
        }

        if !self.load_settings {
            self.finish_bring_up();
            return Ok(());
        }

        match self.stack.load_settings() {
            Ok(()) => self.awaiting_settings = true,
            Err(e) => {
                warn!("Node: Loading settings failed ({}), starting fresh", e);
                self.finish_bring_up();
            }
        }
        Ok(())
    }

    /// Settings-Loaded Callback: der Provisionierungs-Status ist jetzt aktuell
    pub fn on_settings_loaded(&mut self, result: Result<(), StackError>) {
        if !self.awaiting_settings {
            warn!("Node: unexpected settings-loaded event ignored");
            return;
        }
        self.awaiting_settings = false;

        if let Err(e) = result {
            warn!("Node: Loading settings failed ({}), starting fresh", e);
        }
        self.finish_bring_up();
    }

    fn finish_bring_up(&mut self) {
        if self.stack.is_provisioned() {
            info!("Node: Already provisioned");
        } else {
            self.enable_provisioning();
        }

        self.initialized = true;
        info!("Node: Mesh initialized");
    }

    pub fn on_output_number(&self, number: u32) {
        info!("Node: OOB Number: {}", number);
    }

    /// Provisionierung abgeschlossen: primäre Element-Adresse übernehmen
    pub fn on_provisioning_complete(
        &mut self,
        instance: &mut ModelInstance,
        net_idx: u16,
        addr: Address,
    ) {
        info!("Node: Provisionee Index: {} addr {}", net_idx, addr);
        if !addr.is_unicast() {
            warn!("Node: {} is no unicast address, element stays unassigned", addr);
            return;
        }
        instance.set_element_address(addr);
    }

    /// Node wurde zurückgesetzt: Adressen vergessen, wieder auffindbar machen
    ///
    /// Der Lampen-Zustand bleibt erhalten.
    pub fn on_provisioning_reset(&mut self, instance: &mut ModelInstance) {
        info!("Node: Provisioning reset");
        instance.set_publish_address(Address::UNASSIGNED);
        instance.set_element_address(Address::UNASSIGNED);
        self.enable_provisioning();
    }

    fn enable_provisioning(&mut self) {
        if let Err(e) = self.stack.enable_provisioning(Bearers::ALL) {
            error!("Node: Enabling provisioning failed ({})", e);
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn stack(&self) -> &M {
        &self.stack
    }

    pub fn stack_mut(&mut self) -> &mut M {
        &mut self.stack
    }
}

/// Bestimmt den Startwert des Lampen-Models
///
/// Reihenfolge: persistierter Wert (wird auf die Lampe geschrieben), dann
/// Hardware-Readback, dann `fallback`.
pub fn restore_lamp_state<H, S>(
    hardware: &mut H,
    store: &mut S,
    channel: OutputChannel,
    fallback: LightState,
) -> LightState
where
    H: HardwareOutput,
    S: StateStore,
{
    if let Some(saved) = store.load_state() {
        info!("Node: restored {} state {}", channel, saved);
        if let Err(e) = hardware.write(channel, saved) {
            error!("Node: {}", e);
        }
        return saved;
    }

    match hardware.read(channel) {
        Ok(current) => {
            info!("Node: no saved state, {} reads {}", channel, current);
            current
        }
        Err(e) => {
            warn!("Node: {}, using default {}", e, fallback);
            fallback
        }
    }
}
