//! Flash-Persistenz für den Lampen-Zustand
//!
//! Ein 4-Byte Record am Anfang einer eigenen Flash-Region: Magic, Version,
//! Wert, invertierter Wert. Gelöschter Flash (0xFF) oder ein kaputter Record
//! gelten als "nichts gespeichert".
//!
//! Die Region muss exklusiv sein (eigene Partition): Flash-Treiber löschen
//! beim Schreiben den ganzen Sektor.

use embedded_storage::Storage;

use crate::traits::{StateStore, StoreError};
use crate::types::LightState;

const RECORD_MAGIC: u8 = 0x4C; // 'L'
const RECORD_VERSION: u8 = 0x01;

/// Größe eines Records in Bytes
pub const RECORD_LEN: usize = 4;

fn encode_record(state: LightState) -> [u8; RECORD_LEN] {
    let value = state.to_wire();
    [RECORD_MAGIC, RECORD_VERSION, value, !value]
}

fn decode_record(record: &[u8; RECORD_LEN]) -> Option<LightState> {
    match *record {
        [RECORD_MAGIC, RECORD_VERSION, value, check] if check == !value => {
            LightState::from_wire(value)
        }
        _ => None,
    }
}

/// StateStore über beliebigen embedded-storage Flash
///
/// Ohne Region (`unplaced`) wird nichts gelesen oder geschrieben.
pub struct FlashStateStore<F> {
    flash: F,
    region: Option<u32>,
    /// Letzter bekannter Record, spart identische Schreibzyklen
    cached: Option<LightState>,
}

impl<F: Storage> FlashStateStore<F> {
    /// Store am Anfang der Region bei `offset`
    pub fn new(flash: F, offset: u32) -> Self {
        Self {
            flash,
            region: Some(offset),
            cached: None,
        }
    }

    /// Store ohne Region: Zustand wird nicht persistiert
    pub fn unplaced(flash: F) -> Self {
        Self {
            flash,
            region: None,
            cached: None,
        }
    }

    pub fn region(&self) -> Option<u32> {
        self.region
    }

    pub fn flash(&self) -> &F {
        &self.flash
    }
}

impl<F: Storage> StateStore for FlashStateStore<F> {
    fn load_state(&mut self) -> Option<LightState> {
        let offset = self.region?;
        let mut record = [0u8; RECORD_LEN];
        if self.flash.read(offset, &mut record).is_err() {
            warn!("Store: flash read at {} failed", offset);
            return None;
        }

        let state = decode_record(&record);
        match state {
            Some(state) => info!("Store: loaded lamp state {}", state),
            None => info!("Store: no valid lamp state record"),
        }
        self.cached = state;
        state
    }

    fn save_state(&mut self, state: LightState) -> Result<(), StoreError> {
        let offset = self.region.ok_or(StoreError::Unavailable)?;
        if self.cached == Some(state) {
            return Ok(());
        }

        self.flash
            .write(offset, &encode_record(state))
            .map_err(|_| StoreError::WriteFailed)?;
        self.cached = Some(state);
        Ok(())
    }
}
