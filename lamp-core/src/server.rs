//! Generic OnOff Server
//!
//! Eine Instanz pro Model. Die drei Opcodes werden über ein einziges `match`
//! auf [`OnOffMessage`] verteilt. Der Mesh-Dispatcher ruft die Handler
//! nacheinander auf, daher ist kein Locking nötig.

use crate::message::{OnOffMessage, OnOffStatus};
use crate::model::ModelInstance;
use crate::traits::{HardwareOutput, MeshTransport, StateStore};
use crate::types::{LightState, MessageContext, OutputChannel};

/// Ergebnis eines angewendeten SET
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub old: LightState,
    pub new: LightState,
    pub published: bool,
}

impl Transition {
    pub fn changed(&self) -> bool {
        self.old != self.new
    }
}

/// OnOff Server über Hardware, Mesh-Transport und Persistenz
///
/// # Trait-basierte Abstraktion
/// Die generischen Parameter erlauben echte Hardware im Production-Code und
/// Mocks in den Tests.
pub struct OnOffServer<H, T, S> {
    instance: ModelInstance,
    hardware: H,
    transport: T,
    store: S,
    lamp: OutputChannel,
}

impl<H, T, S> OnOffServer<H, T, S>
where
    H: HardwareOutput,
    T: MeshTransport,
    S: StateStore,
{
    pub fn new(instance: ModelInstance, hardware: H, transport: T, store: S) -> Self {
        Self {
            instance,
            hardware,
            transport,
            store,
            lamp: OutputChannel::Lamp,
        }
    }

    /// Einstieg vom Mesh-Layer: Opcode + rohe Payload
    ///
    /// Kaputte Nachrichten werden verworfen, ohne den State zu berühren.
    pub fn dispatch(&mut self, ctx: &MessageContext, opcode: u16, payload: &[u8]) {
        match OnOffMessage::decode(opcode, payload) {
            Ok(message) => self.handle(ctx, message),
            Err(e) => warn!("OnOff: discarding message from {}: {}", ctx.src, e),
        }
    }

    pub fn handle(&mut self, ctx: &MessageContext, message: OnOffMessage) {
        match message {
            OnOffMessage::Get => self.get(ctx),
            OnOffMessage::Set(target) => {
                self.set_unacknowledged(ctx, target);
                self.get(ctx);
            }
            OnOffMessage::SetUnacknowledged(target) => {
                self.set_unacknowledged(ctx, target);
            }
        }
    }

    /// GET: aktuellen Zustand an den Absender zurückmelden
    pub fn get(&mut self, ctx: &MessageContext) {
        let present = self.instance.state();
        info!(
            "OnOff: addr {} current state {}",
            self.instance.element_address(),
            present
        );

        if let Err(e) = self.transport.send_reply(ctx, OnOffStatus::new(present)) {
            warn!("OnOff: status reply to {} failed: {}", ctx.src, e);
        }
    }

    /// SET-UNACK: Zustand übernehmen, Lampe schreiben, ggf. publishen
    pub fn set_unacknowledged(&mut self, ctx: &MessageContext, target: LightState) -> Transition {
        if self.instance.transaction_mut().observe(ctx.src, target) {
            debug!(
                "OnOff: repeated set from {} ({} repeats)",
                ctx.src,
                self.instance.transaction().repeats()
            );
        }

        let old = self.instance.model_state_mut().set(target);
        info!(
            "OnOff: addr {} set to {}",
            self.instance.element_address(),
            target
        );

        // Hardware-Fehler blockieren weder State noch Publish
        if let Err(e) = self.hardware.write(self.lamp, target) {
            error!("OnOff: {}", e);
        }

        let mut transition = Transition {
            old,
            new: target,
            published: false,
        };
        if !transition.changed() {
            info!("OnOff: no need to update");
            return transition;
        }

        if let Err(e) = self.store.save_state(target) {
            warn!("OnOff: persisting {} failed: {}", target, e);
        }

        // Server mit Publish-Adresse muss bei Zustandsänderung publishen
        if let Some(destination) = self.instance.publish_address() {
            info!("OnOff: publish last {} cur {}", old, target);
            match self.transport.publish(destination, OnOffStatus::new(target)) {
                Ok(()) => transition.published = true,
                Err(e) => warn!("OnOff: publish to {} failed: {}", destination, e),
            }
        }

        transition
    }

    pub fn state(&self) -> LightState {
        self.instance.state()
    }

    pub fn instance(&self) -> &ModelInstance {
        &self.instance
    }

    pub fn instance_mut(&mut self) -> &mut ModelInstance {
        &mut self.instance
    }

    pub fn hardware(&self) -> &H {
        &self.hardware
    }

    pub fn hardware_mut(&mut self) -> &mut H {
        &mut self.hardware
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}
