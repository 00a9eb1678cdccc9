// Hardware Abstraction Layer (HAL) Module
//
// Dieses Modul verbindet die Traits aus lamp-core mit der ESP32-Hardware
// (GPIO-Ausgänge, Flash).

pub mod flash_store;
pub mod gpio_line;

pub use flash_store::{StateFlash, open_state_store};
pub use gpio_line::{BoardMutex, GpioLine, SharedBoard};
