// Indicator Task - Heartbeat der Status-LED
use embassy_time::{Duration, Ticker};

use crate::IndicatorBlinker;
use crate::config::BLINK_INTERVAL_MS;
use crate::hal::SharedBoard;

/// Indicator Blink Task - Embassy Task für parallele Ausführung
///
/// Toggelt die Status-LED im festen Intervall, unabhängig vom Mesh.
/// Die Periode zählt ab Tick-Start, nicht ab Tick-Ende.
///
/// # Parameter
/// - `board`: geteiltes Board (nur der Indicator-Kanal wird berührt)
#[embassy_executor::task]
pub async fn indicator_blink_task(board: SharedBoard) {
    let mut blinker = IndicatorBlinker::new(board);
    let mut ticker = Ticker::every(Duration::from_millis(BLINK_INTERVAL_MS));

    loop {
        blinker.tick();
        ticker.next().await;
    }
}
