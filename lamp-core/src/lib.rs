//! Lamp Core - Platform-agnostic Generic OnOff Server
//!
//! Diese Crate enthält KEINE Hardware-Dependencies.
//! Sie definiert Traits, Model-State, die OnOff-Logik und den Node-Dispatcher.

#![no_std]

// Muss zuerst kommen: Logging-Makros für alle Module
mod fmt;

pub mod blinker;
pub mod board;
pub mod lifecycle;
pub mod message;
pub mod model;
pub mod node;
pub mod server;
pub mod store;
pub mod traits;
pub mod types;

// Re-exports für einfachen Zugriff
pub use blinker::IndicatorBlinker;
pub use board::{Board, configure_outputs};
pub use lifecycle::{
    Bearers, DeviceUuid, FeatureState, NodeConfig, NodeLifecycle, ProvisioningParams, Transmit,
    UuidError, restore_lamp_state,
};
pub use message::{DecodeError, OnOffMessage, OnOffStatus, opcode};
pub use model::{ModelInstance, OnOffModelState, TransactionContext};
pub use node::{MeshNode, NodeEvent};
pub use server::{OnOffServer, Transition};
pub use store::FlashStateStore;
pub use traits::{
    DigitalLine, HardwareOutput, HwError, LineFault, MeshStack, MeshTransport, StackError,
    StateStore, StoreError, TransportError,
};
pub use types::{Address, LightState, MessageContext, OutputChannel, Polarity};
