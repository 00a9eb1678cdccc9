// Flash-Persistenz: sucht die eigene Partition für den Lampen-Zustand
//
// Der Record liegt in einer eigenen Data-Partition (siehe partitions.csv).
// NVS und andere Partitionen werden nie beschrieben: fehlt die Partition,
// läuft der Node ohne Persistenz.

use defmt::{error, info, warn};
use esp_bootloader_esp_idf::partitions::{self, PARTITION_TABLE_MAX_LEN, PartitionType};
use esp_storage::FlashStorage;

use lamp_core::FlashStateStore;
use lamp_core::store::RECORD_LEN;

use crate::config::STATE_PARTITION_LABEL;

/// Flash-Treiber des Boards
pub type StateFlash = FlashStorage<'static>;

/// Offset der Lampen-Partition, falls in der Partitionstabelle vorhanden
fn find_state_partition(flash: &mut StateFlash) -> Option<u32> {
    let mut buffer = [0u8; PARTITION_TABLE_MAX_LEN];
    let table = match partitions::read_partition_table(flash, &mut buffer) {
        Ok(table) => table,
        Err(_) => {
            error!("Store: reading partition table failed");
            return None;
        }
    };

    for index in 0..table.len() {
        let Ok(entry) = table.get_partition(index) else {
            continue;
        };
        if entry.label_as_str() != STATE_PARTITION_LABEL {
            continue;
        }
        if !matches!(entry.partition_type(), PartitionType::Data(_)) {
            warn!("Store: partition '{}' is no data partition", STATE_PARTITION_LABEL);
            return None;
        }
        if (entry.len() as usize) < RECORD_LEN {
            warn!("Store: partition '{}' too small", STATE_PARTITION_LABEL);
            return None;
        }
        return Some(entry.offset());
    }

    warn!("Store: no '{}' partition, lamp state is not persisted", STATE_PARTITION_LABEL);
    None
}

/// Öffnet den Store in der Lampen-Partition (oder ohne Region)
pub fn open_state_store(mut flash: StateFlash) -> FlashStateStore<StateFlash> {
    match find_state_partition(&mut flash) {
        Some(offset) => {
            info!("Store: lamp state at 0x{=u32:x}", offset);
            FlashStateStore::new(flash, offset)
        }
        None => FlashStateStore::unplaced(flash),
    }
}
