// Mesh-Boundary: Events und Commands zwischen Node und Mesh-Stack
//
// Der Bluetooth-Mesh-Stack (Bearer, Transport, Security, Provisioning,
// Configuration Server) ist extern und hängt an den beiden Channels aus
// lib.rs. Der Node-Task ist der einzige Konsument der Events.
//
// Vertrag mit dem Stack:
// - `Enable` wird mit `MeshEvent::Ready` beantwortet.
// - `LoadSettings` wird mit `MeshEvent::SettingsLoaded` beantwortet. Vorher
//   setzt der Stack `PROVISIONED` passend zu den geladenen Settings.

use core::sync::atomic::{AtomicBool, Ordering};

use defmt::warn;
use embassy_sync::channel::TrySendError;
use heapless::Vec;
use lamp_core::{
    Address, Bearers, MeshStack, MeshTransport, MessageContext, NodeConfig, NodeEvent,
    OnOffStatus, ProvisioningParams, StackError, TransportError,
};

use crate::MeshCommandSender;
use crate::config::MESH_PAYLOAD_CAPACITY;

/// Access-Payload einer eingehenden Nachricht
pub type AccessPayload = Vec<u8, MESH_PAYLOAD_CAPACITY>;

/// Stack → Node
pub enum MeshEvent {
    /// Antwort auf `MeshCommand::Enable`
    Ready(Result<(), StackError>),
    /// Antwort auf `MeshCommand::LoadSettings`, `PROVISIONED` ist aktuell
    SettingsLoaded(Result<(), StackError>),
    /// Nachricht für das OnOff Server Model
    Access {
        ctx: MessageContext,
        opcode: u16,
        payload: AccessPayload,
    },
    /// Configuration Client hat die Publish-Adresse geändert (0x0000 = aus)
    PublicationChanged(Address),
    ProvisioningComplete { net_idx: u16, addr: Address },
    ProvisioningReset,
    /// OOB-Zahl zum Anzeigen während des Provisionings
    OutputNumber(u32),
}

impl MeshEvent {
    /// Sicht des Core-Nodes auf das Event (Payload wird nur geliehen)
    pub fn as_node_event(&self) -> NodeEvent<'_> {
        match self {
            MeshEvent::Ready(result) => NodeEvent::StackReady(*result),
            MeshEvent::SettingsLoaded(result) => NodeEvent::SettingsLoaded(*result),
            MeshEvent::Access {
                ctx,
                opcode,
                payload,
            } => NodeEvent::Access {
                ctx: *ctx,
                opcode: *opcode,
                payload: payload.as_slice(),
            },
            MeshEvent::PublicationChanged(address) => NodeEvent::PublicationChanged(*address),
            MeshEvent::ProvisioningComplete { net_idx, addr } => NodeEvent::ProvisioningComplete {
                net_idx: *net_idx,
                addr: *addr,
            },
            MeshEvent::ProvisioningReset => NodeEvent::ProvisioningReset,
            MeshEvent::OutputNumber(number) => NodeEvent::OutputNumber(*number),
        }
    }
}

/// Node → Stack
pub enum MeshCommand {
    Enable,
    Init {
        node: NodeConfig,
        provisioning: ProvisioningParams,
    },
    LoadSettings,
    /// Wie bei Zephyr ein No-op, wenn der Stack bereits provisioniert ist
    EnableProvisioning(Bearers),
    Reply {
        ctx: MessageContext,
        pdu: [u8; OnOffStatus::PDU_LEN],
    },
    Publish {
        destination: Address,
        pdu: [u8; OnOffStatus::PDU_LEN],
    },
}

impl defmt::Format for MeshCommand {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            MeshCommand::Enable => defmt::write!(fmt, "Enable"),
            MeshCommand::Init { .. } => defmt::write!(fmt, "Init"),
            MeshCommand::LoadSettings => defmt::write!(fmt, "LoadSettings"),
            MeshCommand::EnableProvisioning(bearers) => {
                defmt::write!(fmt, "EnableProvisioning({=u8:x})", bearers.bits())
            }
            MeshCommand::Reply { ctx, .. } => defmt::write!(fmt, "Reply {{ to: {} }}", ctx.src),
            MeshCommand::Publish { destination, .. } => {
                defmt::write!(fmt, "Publish {{ to: {} }}", destination)
            }
        }
    }
}

/// Vom Stack gesetzt, sobald Provisioning-Daten vorhanden sind
/// (aus den Settings geladen oder frisch provisioniert)
pub static PROVISIONED: AtomicBool = AtomicBool::new(false);

pub fn set_provisioned(provisioned: bool) {
    PROVISIONED.store(provisioned, Ordering::Release);
}

/// MeshStack + MeshTransport über den Command-Channel
///
/// Alle Sends sind non-blocking (`try_send`): eine volle Queue ist ein
/// Transportfehler, kein Warten.
#[derive(Clone, Copy)]
pub struct ChannelStack {
    commands: MeshCommandSender,
}

impl ChannelStack {
    pub fn new(commands: MeshCommandSender) -> Self {
        Self { commands }
    }

    fn submit(&self, command: MeshCommand) -> Result<(), TransportError> {
        self.commands
            .try_send(command)
            .map_err(|TrySendError::Full(command)| {
                warn!("Mesh: command queue full, dropped {}", command);
                TransportError::QueueFull
            })
    }
}

/// Stack-Fehlercode für eine volle Command-Queue (-ENOBUFS)
const ENOBUFS: i32 = -105;

fn queue_full(_: TransportError) -> StackError {
    StackError(ENOBUFS)
}

impl MeshTransport for ChannelStack {
    fn send_reply(&mut self, ctx: &MessageContext, status: OnOffStatus) -> Result<(), TransportError> {
        self.submit(MeshCommand::Reply {
            ctx: *ctx,
            pdu: status.to_pdu(),
        })
    }

    fn publish(&mut self, destination: Address, status: OnOffStatus) -> Result<(), TransportError> {
        self.submit(MeshCommand::Publish {
            destination,
            pdu: status.to_pdu(),
        })
    }
}

impl MeshStack for ChannelStack {
    fn enable(&mut self) -> Result<(), StackError> {
        self.submit(MeshCommand::Enable).map_err(queue_full)
    }

    fn init(&mut self, node: &NodeConfig, provisioning: &ProvisioningParams) -> Result<(), StackError> {
        self.submit(MeshCommand::Init {
            node: *node,
            provisioning: *provisioning,
        })
        .map_err(queue_full)
    }

    fn load_settings(&mut self) -> Result<(), StackError> {
        self.submit(MeshCommand::LoadSettings).map_err(queue_full)
    }

    fn is_provisioned(&self) -> bool {
        PROVISIONED.load(Ordering::Acquire)
    }

    fn enable_provisioning(&mut self, bearers: Bearers) -> Result<(), StackError> {
        self.submit(MeshCommand::EnableProvisioning(bearers))
            .map_err(queue_full)
    }
}
