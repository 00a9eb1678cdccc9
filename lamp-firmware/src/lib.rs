// Library-Root: Wiederverwendbare Logik und Module
// Keine Standard-Bibliothek (Embedded System)
#![no_std]

// Module
pub mod config;
pub mod hal;
pub mod mesh;
pub mod tasks;

// Re-exports von lamp-core
pub use lamp_core::{
    HardwareOutput, IndicatorBlinker, LightState, ModelInstance, NodeLifecycle, OnOffServer,
    OutputChannel, StateStore,
};

// Embassy Channel-Typen
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::{Channel, Receiver, Sender};

use crate::config::{MESH_COMMAND_QUEUE_DEPTH, MESH_EVENT_QUEUE_DEPTH};
use crate::mesh::{MeshCommand, MeshEvent};

// ============================================================================
// Type-Aliase für Channel-Typen
// ============================================================================
//
// Diese Type-Aliase vereinfachen die Lesbarkeit der Funktionssignaturen.
// CriticalSectionRawMutex statt NoopRawMutex: der Mesh-Stack darf auch
// aus einem anderen Kontext (Radio-Interrupt, zweiter Executor) senden.

/// Channel für Mesh-Events (Stack → Node Task)
pub type MeshEventChannel = Channel<CriticalSectionRawMutex, MeshEvent, MESH_EVENT_QUEUE_DEPTH>;

/// Sender für Mesh-Events (vom externen Stack genutzt)
pub type MeshEventSender =
    Sender<'static, CriticalSectionRawMutex, MeshEvent, MESH_EVENT_QUEUE_DEPTH>;

/// Receiver für Mesh-Events (Node Task empfängt)
pub type MeshEventReceiver =
    Receiver<'static, CriticalSectionRawMutex, MeshEvent, MESH_EVENT_QUEUE_DEPTH>;

/// Channel für Mesh-Commands (Node Task → Stack)
pub type MeshCommandChannel =
    Channel<CriticalSectionRawMutex, MeshCommand, MESH_COMMAND_QUEUE_DEPTH>;

/// Sender für Mesh-Commands (ChannelStack)
pub type MeshCommandSender =
    Sender<'static, CriticalSectionRawMutex, MeshCommand, MESH_COMMAND_QUEUE_DEPTH>;

/// Receiver für Mesh-Commands (vom externen Stack genutzt)
pub type MeshCommandReceiver =
    Receiver<'static, CriticalSectionRawMutex, MeshCommand, MESH_COMMAND_QUEUE_DEPTH>;

// ============================================================================
// Mesh-Channels
// ============================================================================
//
// Der externe Mesh-Stack sendet nach MESH_EVENTS und empfängt aus
// MESH_COMMANDS. Der Node Task ist jeweils die Gegenseite.

/// Events vom Mesh-Stack an den Node Task
pub static MESH_EVENTS: MeshEventChannel = Channel::new();

/// Commands vom Node Task an den Mesh-Stack
pub static MESH_COMMANDS: MeshCommandChannel = Channel::new();
