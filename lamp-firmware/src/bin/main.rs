// Keine Standard-Bibliothek verwenden (Embedded System)
#![no_std]
// Kein normaler main() Einstiegspunkt (wird von esp_rtos bereitgestellt)
#![no_main]
// Verbiete mem::forget - gefährlich bei ESP HAL Types mit DMA-Buffern
#![deny(
    clippy::mem_forget,
    reason = "mem::forget is generally not safe to do with esp_hal types, especially those \
    holding buffers for the duration of a data transfer."
)]
// Verbiete große Stack-Frames (Stack ist auf Embedded Systemen begrenzt)
#![deny(clippy::large_stack_frames)]

use core::cell::RefCell;

// Embassy Async Runtime
use embassy_executor::Spawner;
use embassy_sync::blocking_mutex::Mutex;
use embassy_time::{Duration, Timer};

// ESP32-C6 HAL
use esp_hal::clock::CpuClock;
use esp_hal::gpio::{Level, Output, OutputConfig};
use esp_hal::timer::timg::TimerGroup;
use esp_storage::FlashStorage;

// Backtrace bei Panic und println!() Support
use {esp_backtrace as _, esp_println as _};

use defmt::info;

// Projekt-Module und Konfiguration
use lamp_core::{Board, LightState, OutputChannel, configure_outputs};
use mesh_lamp::config::{INDICATOR_POLARITY, LAMP_POLARITY};
use mesh_lamp::hal::{BoardMutex, GpioLine, SharedBoard, open_state_store};
use mesh_lamp::mesh::ChannelStack;
use mesh_lamp::tasks::{indicator_blink_task, mesh_node_task};
use mesh_lamp::{MESH_COMMANDS, MESH_EVENTS};

// ESP-IDF App Descriptor - erforderlich für den Bootloader!
// Ohne diesen schlägt das Flashen mit "ESP-IDF App Descriptor missing" fehl
esp_bootloader_esp_idf::esp_app_desc!();

/// Main Entry Point
///
/// Initialisiert Board und Flash, verbindet die Mesh-Channels und spawnt Tasks.
/// Danach schläft main() - alle Arbeit läuft in Tasks.
#[esp_rtos::main]
async fn main(spawner: Spawner) -> ! {
    // ESP32-C6 Konfiguration: CPU auf maximale Taktfrequenz (160 MHz)
    let config = esp_hal::Config::default().with_cpu_clock(CpuClock::max());
    let peripherals = esp_hal::init(config);

    // Embassy Runtime initialisieren (Timer + Software Interrupt)
    let timg0 = TimerGroup::new(peripherals.TIMG0);
    let sw_interrupt =
        esp_hal::interrupt::software::SoftwareInterruptControl::new(peripherals.SW_INTERRUPT);
    esp_rtos::start(timg0.timer0, sw_interrupt.software_interrupt0);

    info!("Initializing ...");

    // Board: Pins starten direkt auf "aus" (Pegel hängt von der Polarität ab)
    let lamp = Output::new(
        peripherals.GPIO5,
        Level::from(LAMP_POLARITY.level_for(LightState::Off)),
        OutputConfig::default(),
    );
    let indicator = Output::new(
        peripherals.GPIO4,
        Level::from(INDICATOR_POLARITY.level_for(LightState::Off)),
        OutputConfig::default(),
    );

    let board = Board::new()
        .with_line(OutputChannel::Lamp, GpioLine::new(lamp), LAMP_POLARITY)
        .with_line(
            OutputChannel::Indicator,
            GpioLine::new(indicator),
            INDICATOR_POLARITY,
        );

    // Board muss 'static sein für Tasks
    static BOARD: static_cell::StaticCell<BoardMutex> = static_cell::StaticCell::new();
    let mut board = SharedBoard::new(BOARD.init(Mutex::new(RefCell::new(board))));
    let configured = configure_outputs(&mut board);
    info!("Board: {} of {} outputs ready", configured, OutputChannel::ALL.len());

    // Flash für den persistierten Lampen-Zustand (eigene Partition)
    let store = open_state_store(FlashStorage::new(peripherals.FLASH));

    // Command-Seite zum Mesh-Stack (der Stack liest aus MESH_COMMANDS)
    let stack = ChannelStack::new(MESH_COMMANDS.sender());

    // Spawn Indicator Task (Heartbeat)
    spawner.spawn(indicator_blink_task(board)).unwrap();

    // Spawn Node Task (Lifecycle + OnOff Server)
    spawner
        .spawn(mesh_node_task(
            MESH_EVENTS.receiver(),
            stack,
            board,
            store,
        ))
        .unwrap();

    // Main-Loop: schläft (alle Arbeit läuft in Tasks)
    loop {
        Timer::after(Duration::from_secs(3600)).await;
    }
}
