#![no_std]
#![no_main]

#[cfg(feature = "defmt")]
use defmt_rtt as _;

// RISC-V runtime
use riscv_rt as _;

// Panic handler
use panic_halt as _;

use embassy_executor::Spawner;
use embassy_time::Duration;
use heapless::spsc::Queue;
use static_cell::StaticCell;

use decoder_core::*;
use morsekbd_firmware::*;

// Static resources
static SHARED_FLAGS: SharedFlags = SharedFlags::new();
static ACTION_QUEUE: StaticCell<Queue<Action, 64>> = StaticCell::new();

/// Main firmware entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    #[cfg(feature = "defmt")]
    defmt::info!("morse keyboard firmware starting");

    // Initialize hardware; real pin drivers will replace the mocks
    let mut key = MockKeyLine::new();
    let flags = MockHostFlags::new();
    let feedback = MockFeedbackPins::new();

    // One-shot boot sample: key held at power-on selects raw passthrough
    let mode = boot_mode_check(&mut key).await;
    #[cfg(feature = "defmt")]
    defmt::info!(
        "session mode: {}",
        if mode.decode_default() { "decode" } else { "raw passthrough" }
    );

    SHARED_FLAGS.set_decode(mode.decode_default());

    let config = default_config();
    #[cfg(feature = "defmt")]
    defmt::info!("decoder config: {} WPM", config.wpm());

    // Initialize action queue
    let queue = ACTION_QUEUE.init(Queue::new());
    let (producer, consumer) = queue.split();

    let typist_poll = config.unit / 8;

    #[cfg(feature = "defmt")]
    defmt::info!("spawning decoder tasks");

    spawner.must_spawn(decoder_task_wrapper(
        key,
        flags,
        feedback,
        &SHARED_FLAGS,
        producer,
        config,
        mode,
    ));
    spawner.must_spawn(typist_task(consumer, &SHARED_FLAGS, typist_poll));

    #[cfg(feature = "defmt")]
    defmt::info!("morse keyboard ready");

    // Main supervision loop
    loop {
        embassy_time::Timer::after(Duration::from_secs(1)).await;
        #[cfg(feature = "defmt")]
        defmt::trace!("heartbeat");
    }
}
