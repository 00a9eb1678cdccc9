// Projekt-Konfiguration: Konstanten und Hardware-Zuordnungen
#![allow(dead_code)]

use lamp_core::lifecycle::output_action;
use lamp_core::{
    DeviceUuid, FeatureState, LightState, NodeConfig, Polarity, ProvisioningParams, Transmit,
};

// ============================================================================
// Board Konfiguration
// ============================================================================

/// GPIO-Pin für die geschaltete Lampe (LED1 / Bulb)
pub const LAMP_GPIO_PIN: u8 = 5;

/// GPIO-Pin für die Status-LED (LED0 / Indicator)
pub const INDICATOR_GPIO_PIN: u8 = 4;

/// Verdrahtung der Lampe
/// Referenz-Board schaltet gegen GND (Low = an).
/// TODO: Polarität am echten Board nachmessen, bevor eine Lampe dranhängt
pub const LAMP_POLARITY: Polarity = Polarity::ActiveLow;

/// Verdrahtung der Status-LED
pub const INDICATOR_POLARITY: Polarity = Polarity::ActiveLow;

/// Zustand nach Power-On, falls weder Flash noch Hardware etwas liefern
pub const LAMP_DEFAULT_STATE: LightState = LightState::Off;

/// Blink-Intervall der Status-LED in Millisekunden
pub const BLINK_INTERVAL_MS: u64 = 1000;

// ============================================================================
// Persistenz
// ============================================================================

/// Label der Data-Partition für den Lampen-Zustand (siehe partitions.csv)
/// Eigene 4 KB Partition: das Sektor-Löschen beim Schreiben trifft nie NVS
pub const STATE_PARTITION_LABEL: &str = "lamp";

// ============================================================================
// Mesh Konfiguration
// ============================================================================

/// Default TTL für ausgehende Nachrichten
pub const MESH_DEFAULT_TTL: u8 = 7;

/// Netzwerk-Wiederholungen (zusätzlich zur ersten Übertragung)
pub const NET_TRANSMIT_COUNT: u8 = 2;

/// Abstand der Netzwerk-Wiederholungen in Millisekunden
pub const NET_TRANSMIT_INTERVAL_MS: u16 = 20;

/// Relay-Wiederholungen (Relay selbst ist deaktiviert)
pub const RELAY_RETRANSMIT_COUNT: u8 = 2;
pub const RELAY_RETRANSMIT_INTERVAL_MS: u16 = 20;

/// Persistente Mesh-Settings beim Stack-Ready laden
pub const LOAD_PERSISTED_SETTINGS: bool = true;

/// Anzahl Ziffern der OOB-Ausgabe beim Provisioning
pub const OOB_OUTPUT_SIZE: u8 = 4;

/// Default Device-UUID (dd dd 00 ... 00)
pub const DEFAULT_DEVICE_UUID: [u8; 16] = [
    0xdd, 0xdd, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
];

/// Device-UUID aus der Build-Umgebung (32 Hex-Ziffern)
/// Wird zur Build-Zeit aus der Environment Variable MESH_DEVICE_UUID geladen
/// Setze diese optional in .env file
pub const MESH_DEVICE_UUID: Option<&str> = option_env!("MESH_DEVICE_UUID");

/// Kapazität der Event-Queue (Stack → Node)
pub const MESH_EVENT_QUEUE_DEPTH: usize = 4;

/// Kapazität der Command-Queue (Node → Stack)
pub const MESH_COMMAND_QUEUE_DEPTH: usize = 4;

/// Maximale Access-Payload eines OnOff Requests
/// SET mit TID + Transition + Delay wäre 4 Byte, alles darüber ist Müll
pub const MESH_PAYLOAD_CAPACITY: usize = 8;

// ============================================================================
// Abgeleitete Konfiguration
// ============================================================================

/// Configuration-Server Defaults des Nodes
pub fn node_config() -> NodeConfig {
    NodeConfig {
        relay: FeatureState::Disabled,
        beacon: true,
        friend: if cfg!(feature = "friend") {
            FeatureState::Enabled
        } else {
            FeatureState::NotSupported
        },
        gatt_proxy: if cfg!(feature = "gatt-proxy") {
            FeatureState::Enabled
        } else {
            FeatureState::NotSupported
        },
        default_ttl: MESH_DEFAULT_TTL,
        net_transmit: Transmit::new(NET_TRANSMIT_COUNT, NET_TRANSMIT_INTERVAL_MS),
        relay_retransmit: Transmit::new(RELAY_RETRANSMIT_COUNT, RELAY_RETRANSMIT_INTERVAL_MS),
    }
}

/// Provisioning-Parameter (UUID aus .env oder Default)
pub fn provisioning_params() -> ProvisioningParams {
    let uuid = match MESH_DEVICE_UUID.map(DeviceUuid::parse_hex) {
        Some(Ok(uuid)) => uuid,
        Some(Err(e)) => {
            defmt::warn!("Config: MESH_DEVICE_UUID invalid ({}), using default", e);
            DeviceUuid(DEFAULT_DEVICE_UUID)
        }
        None => DeviceUuid(DEFAULT_DEVICE_UUID),
    };

    ProvisioningParams {
        uuid,
        output_size: OOB_OUTPUT_SIZE,
        output_actions: output_action::DISPLAY_NUMBER,
    }
}
