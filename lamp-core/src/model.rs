//! Model-State des Generic OnOff Servers
//!
//! Reine Daten ohne I/O. Der Server mutiert sie nur über eingehende SETs.

use crate::types::{Address, LightState};

/// Autoritativer logischer Wert "Lampe an?"
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OnOffModelState {
    value: LightState,
}

impl OnOffModelState {
    pub const fn new(initial: LightState) -> Self {
        Self { value: initial }
    }

    pub const fn get(&self) -> LightState {
        self.value
    }

    /// Setzt den Wert und liefert den vorherigen zurück
    pub fn set(&mut self, value: LightState) -> LightState {
        core::mem::replace(&mut self.value, value)
    }
}

/// Merkt sich den letzten SET, um Wiederholungen zu erkennen
///
/// Wiederholungen laufen ganz normal durch den idempotenten Pfad, sie
/// werden nur als solche geloggt.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransactionContext {
    last: Option<(Address, LightState)>,
    repeats: u32,
}

impl TransactionContext {
    pub const fn new() -> Self {
        Self {
            last: None,
            repeats: 0,
        }
    }

    /// Registriert einen SET; `true` wenn er den vorherigen wiederholt
    pub fn observe(&mut self, src: Address, target: LightState) -> bool {
        let repeated = self.last == Some((src, target));
        if repeated {
            self.repeats = self.repeats.saturating_add(1);
        } else {
            self.last = Some((src, target));
            self.repeats = 0;
        }
        repeated
    }

    /// Anzahl direkt aufeinanderfolgender Wiederholungen des letzten SET
    pub const fn repeats(&self) -> u32 {
        self.repeats
    }

    pub const fn last_source(&self) -> Option<Address> {
        match self.last {
            Some((src, _)) => Some(src),
            None => None,
        }
    }
}

/// Ein adressierbares Element + Model Paar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelInstance {
    element: Address,
    state: OnOffModelState,
    publish: Option<Address>,
    transaction: TransactionContext,
}

impl ModelInstance {
    /// Neue Instanz mit Startwert (persistiert, Hardware oder Default)
    pub const fn new(initial: LightState) -> Self {
        Self {
            element: Address::UNASSIGNED,
            state: OnOffModelState::new(initial),
            publish: None,
            transaction: TransactionContext::new(),
        }
    }

    pub const fn state(&self) -> LightState {
        self.state.get()
    }

    pub fn model_state_mut(&mut self) -> &mut OnOffModelState {
        &mut self.state
    }

    /// Primäre Element-Adresse (nach Provisionierung vergeben)
    pub const fn element_address(&self) -> Address {
        self.element
    }

    pub fn set_element_address(&mut self, address: Address) {
        self.element = address;
    }

    pub const fn publish_address(&self) -> Option<Address> {
        self.publish
    }

    /// `Address::UNASSIGNED` schaltet das Publishing ab
    pub fn set_publish_address(&mut self, address: Address) {
        self.publish = address.is_assigned().then_some(address);
    }

    pub const fn transaction(&self) -> &TransactionContext {
        &self.transaction
    }

    pub fn transaction_mut(&mut self) -> &mut TransactionContext {
        &mut self.transaction
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_returns_previous_value() {
        let mut state = OnOffModelState::new(LightState::Off);
        assert_eq!(state.set(LightState::On), LightState::Off);
        assert_eq!(state.set(LightState::On), LightState::On);
        assert_eq!(state.get(), LightState::On);
    }

    #[test]
    fn test_unassigned_publish_address_disables_publishing() {
        let mut instance = ModelInstance::new(LightState::Off);
        assert_eq!(instance.publish_address(), None);

        instance.set_publish_address(Address::new(0xC001));
        assert_eq!(instance.publish_address(), Some(Address::new(0xC001)));

        instance.set_publish_address(Address::UNASSIGNED);
        assert_eq!(instance.publish_address(), None);
    }

    #[test]
    fn test_transaction_detects_repeats_from_same_source() {
        let mut tx = TransactionContext::new();
        let src = Address::new(0x0002);

        assert!(!tx.observe(src, LightState::On));
        assert!(tx.observe(src, LightState::On));
        assert!(tx.observe(src, LightState::On));
        assert_eq!(tx.repeats(), 2);

        // Anderer Zielwert setzt zurück
        assert!(!tx.observe(src, LightState::Off));
        assert_eq!(tx.repeats(), 0);

        // Gleicher Wert von anderem Absender ist keine Wiederholung
        assert!(!tx.observe(Address::new(0x0003), LightState::Off));
        assert_eq!(tx.last_source(), Some(Address::new(0x0003)));
    }
}
