//! Node: verteilt Mesh-Events an Lebenszyklus und OnOff Server
//!
//! Die Firmware übersetzt ihre Channel-Events in [`NodeEvent`] und ruft
//! [`MeshNode::handle`] strikt nacheinander auf. Jeder Handler läuft bis zum
//! Ende, bevor das nächste Event kommt.

use crate::lifecycle::NodeLifecycle;
use crate::server::OnOffServer;
use crate::traits::{HardwareOutput, MeshStack, MeshTransport, StackError, StateStore};
use crate::types::{Address, MessageContext};

/// Ein Event vom Mesh-Stack
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeEvent<'a> {
    /// Antwort auf `MeshStack::enable`
    StackReady(Result<(), StackError>),
    /// Antwort auf `MeshStack::load_settings`
    SettingsLoaded(Result<(), StackError>),
    /// Nachricht für das OnOff Server Model
    Access {
        ctx: MessageContext,
        opcode: u16,
        payload: &'a [u8],
    },
    /// Configuration Client hat die Publish-Adresse geändert (0x0000 = aus)
    PublicationChanged(Address),
    ProvisioningComplete { net_idx: u16, addr: Address },
    ProvisioningReset,
    /// OOB-Zahl zum Anzeigen während des Provisionings
    OutputNumber(u32),
}

/// Ein Node mit genau einem Generic OnOff Server
pub struct MeshNode<H, T, S, M> {
    server: OnOffServer<H, T, S>,
    lifecycle: NodeLifecycle<M>,
}

impl<H, T, S, M> MeshNode<H, T, S, M>
where
    H: HardwareOutput,
    T: MeshTransport,
    S: StateStore,
    M: MeshStack,
{
    pub fn new(server: OnOffServer<H, T, S>, lifecycle: NodeLifecycle<M>) -> Self {
        Self { server, lifecycle }
    }

    pub fn start(&mut self) -> Result<(), StackError> {
        self.lifecycle.start()
    }

    pub fn handle(&mut self, event: NodeEvent<'_>) {
        match event {
            NodeEvent::StackReady(result) => {
                // Fehler ist bereits geloggt, der Node bleibt ansprechbar
                let _ = self.lifecycle.on_stack_ready(result);
            }
            NodeEvent::SettingsLoaded(result) => self.lifecycle.on_settings_loaded(result),
            NodeEvent::Access {
                ctx,
                opcode,
                payload,
            } => self.server.dispatch(&ctx, opcode, payload),
            NodeEvent::PublicationChanged(address) => {
                info!("Node: publish address {}", address);
                self.server.instance_mut().set_publish_address(address);
            }
            NodeEvent::ProvisioningComplete { net_idx, addr } => {
                self.lifecycle
                    .on_provisioning_complete(self.server.instance_mut(), net_idx, addr);
            }
            NodeEvent::ProvisioningReset => {
                self.lifecycle
                    .on_provisioning_reset(self.server.instance_mut());
            }
            NodeEvent::OutputNumber(number) => self.lifecycle.on_output_number(number),
        }
    }

    pub fn server(&self) -> &OnOffServer<H, T, S> {
        &self.server
    }

    pub fn server_mut(&mut self) -> &mut OnOffServer<H, T, S> {
        &mut self.server
    }

    pub fn lifecycle(&self) -> &NodeLifecycle<M> {
        &self.lifecycle
    }
}
