// GPIO Ausgänge und geteiltes Board
//
// GpioLine verbindet esp-hal Output-Pins mit dem DigitalLine Trait aus
// lamp-core. SharedBoard macht das Board für mehrere Tasks nutzbar.

use core::cell::RefCell;

use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use esp_hal::gpio::{Level, Output};

use lamp_core::{
    Board, DigitalLine, HardwareOutput, HwError, LightState, LineFault, OutputChannel,
};

/// Ein esp-hal Output-Pin als DigitalLine
///
/// Push-Pull Ausgänge können nicht fehlschlagen, der Readback liest das
/// Output-Register.
pub struct GpioLine<'d> {
    pin: Output<'d>,
}

impl<'d> GpioLine<'d> {
    pub fn new(pin: Output<'d>) -> Self {
        Self { pin }
    }
}

impl<'d> DigitalLine for GpioLine<'d> {
    fn drive(&mut self, high: bool) -> Result<(), LineFault> {
        self.pin.set_level(Level::from(high));
        Ok(())
    }

    fn is_driven_high(&self) -> Result<bool, LineFault> {
        Ok(self.pin.is_set_high())
    }
}

/// Board mit beiden Ausgängen, geschützt durch eine Critical Section
pub type BoardMutex = Mutex<CriticalSectionRawMutex, RefCell<Board<GpioLine<'static>>>>;

/// Geteilter Zugriff auf das Board (Copy, für mehrere Tasks)
///
/// Jede Operation hält den Lock nur für die Dauer des Registerzugriffs.
/// `toggle()` macht Read-Modify-Write unter einem einzigen Lock.
#[derive(Clone, Copy)]
pub struct SharedBoard {
    board: &'static BoardMutex,
}

impl SharedBoard {
    pub fn new(board: &'static BoardMutex) -> Self {
        Self { board }
    }
}

impl HardwareOutput for SharedBoard {
    fn configure(&mut self, channel: OutputChannel) -> Result<(), HwError> {
        self.board.lock(|board| board.borrow_mut().configure(channel))
    }

    fn write(&mut self, channel: OutputChannel, state: LightState) -> Result<(), HwError> {
        self.board.lock(|board| board.borrow_mut().write(channel, state))
    }

    fn read(&mut self, channel: OutputChannel) -> Result<LightState, HwError> {
        self.board.lock(|board| board.borrow_mut().read(channel))
    }

    fn toggle(&mut self, channel: OutputChannel) -> Result<LightState, HwError> {
        self.board.lock(|board| board.borrow_mut().toggle(channel))
    }
}
