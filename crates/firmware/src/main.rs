//! Manual Transmission is [Embassy](https://embassy.dev)-based firmware for the key-scanning brain of a
//! dual-manual Hammond-style organ console. It runs on the [Nucleo-F767ZI development
//! board](https://www.st.com/en/evaluation-tools/nucleo-f767zi.html), which is powered by an F7-series
//! STM32 microcontroller.
//!
//! Each 61-key manual is wired as a diode matrix whose keys carry paired break and make contacts.
//! The firmware strobes the matrix columns, walks the multiplexer addresses to sample the contact
//! rows, debounces keys from the order in which their two contacts move, and streams the resulting
//! note on/off messages over a serial link to a host running the
//! [setBfree](https://setbfree.org) tonewheel emulator.
//!
//! For details about the hardware or how to use the device, see the `README`.

#![no_std]
#![no_main]

mod io;

use crate::io::{ColumnPins, SensePins};
use defmt::*;
use embassy_executor::Spawner;
use embassy_stm32::{
    Config,
    gpio::{Input, Level, Output, Pull, Speed},
    mode::Async,
    usart::{self, UartTx},
};
use embassy_sync::{
    blocking_mutex::raw::CriticalSectionRawMutex,
    channel::{Channel, Receiver, Sender},
};
use manual_transmission_lib::{midi::NoteEvent, scan::MatrixScanner};

use {defmt_rtt as _, panic_probe as _};

const NOTE_QUEUE_DEPTH: usize = 32;
type NoteQueue = Channel<CriticalSectionRawMutex, NoteEvent, NOTE_QUEUE_DEPTH>;
type NoteSender<'a> = Sender<'a, CriticalSectionRawMutex, NoteEvent, NOTE_QUEUE_DEPTH>;
type NoteReceiver<'a> = Receiver<'a, CriticalSectionRawMutex, NoteEvent, NOTE_QUEUE_DEPTH>;

/// Buffers note events between the matrix sweep and the serial link, so a slow wire never stalls
/// the sweep.
static NOTE_EVENTS: NoteQueue = Channel::new();

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Initializing Manual Transmission");

    // The default clock tree (16MHz HSI) comfortably covers GPIO scanning and a 115200 baud wire.
    let p = embassy_stm32::init(Config::default());

    let columns = ColumnPins([
        Output::new(p.PE2, Level::Low, Speed::Low),
        Output::new(p.PE3, Level::Low, Speed::Low),
        Output::new(p.PE4, Level::Low, Speed::Low),
        Output::new(p.PE5, Level::Low, Speed::Low),
        Output::new(p.PE6, Level::Low, Speed::Low),
        Output::new(p.PE7, Level::Low, Speed::Low),
        Output::new(p.PE8, Level::Low, Speed::Low),
        Output::new(p.PE9, Level::Low, Speed::Low),
    ]);

    let rows = SensePins {
        address: [
            Output::new(p.PF0, Level::Low, Speed::Low),
            Output::new(p.PF1, Level::Low, Speed::Low),
            Output::new(p.PF2, Level::Low, Speed::Low),
        ],
        lower_break: Input::new(p.PG0, Pull::Down),
        lower_make: Input::new(p.PG1, Pull::Down),
        upper_break: Input::new(p.PG2, Pull::Down),
        upper_make: Input::new(p.PG3, Pull::Down),
    };

    unwrap!(spawner.spawn(scan(columns, rows, NOTE_EVENTS.sender())));

    // setBfree's MIDI bridge on the host side expects the console's historical 115200 baud
    let mut config = usart::Config::default();
    config.baudrate = 115_200;
    let tx = unwrap!(UartTx::new(p.USART3, p.PD8, p.DMA1_CH3, config));

    unwrap!(spawner.spawn(host_link(tx, NOTE_EVENTS.receiver())));
}

/// Task responsible for sweeping the key matrix and publishing the transitions it finds.
#[embassy_executor::task]
async fn scan(mut columns: ColumnPins, mut rows: SensePins, events: NoteSender<'static>) -> ! {
    let mut scanner = MatrixScanner::new();
    info!("Scanning both manuals");
    loop {
        for event in scanner.tick(&mut columns, &mut rows).await {
            if events.try_send(event).is_err() {
                // the serial link has fallen behind; dropping beats stalling the sweep
                warn!("Note queue full, dropping {}", event);
            }
        }
    }
}

/// Task responsible for the serial link to the synthesizer host.
#[embassy_executor::task]
async fn host_link(mut tx: UartTx<'static, Async>, events: NoteReceiver<'static>) -> ! {
    loop {
        let event = events.receive().await;
        info!("Sending {}", event);
        if let Err(e) = tx.write(&event.to_bytes()).await {
            warn!("Dropped {} on the wire: {}", event, e);
        }
    }
}
