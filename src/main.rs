//! tomopet - a rotary-encoder virtual pet on an ESP32 with an SSD1306 OLED.
//!
//! Architecture:
//!   - App core (CPU1): encoder sampling task at 1 kHz, feeding the event
//!     channel
//!   - Pro core (CPU0): logic/render loop - background ticks, state
//!     machine, menus, minigames, display
//!
//! The event channel is the only state the two cores share.

#![no_std]
#![no_main]

use core::cell::RefCell;
use core::ptr::addr_of_mut;

use defmt::{error, info};
use embassy_executor::Spawner;
use embassy_time::{Delay, Duration, Instant, Ticker, Timer};
use embedded_hal::delay::DelayNs;
use embedded_hal_bus::i2c::RefCellDevice;
use esp_hal::clock::CpuClock;
use esp_hal::cpu_control::{CpuControl, Stack};
use esp_hal::gpio::{Input, Pull};
use esp_hal::i2c::master::{Config as I2cConfig, I2c};
use esp_hal::rng::Rng;
use esp_hal::time::RateExtU32;
use esp_hal::timer::timg::TimerGroup;
use esp_hal::Blocking;
use esp_hal_embassy::Executor;
use static_cell::StaticCell;
use {esp_backtrace as _, esp_println as _};

use tomopet::app::App;
use tomopet::clock::Clock;
use tomopet::config::{ENCODER_POLL_HZ, I2C_FREQUENCY_KHZ, LOOP_PAUSE_MS};
use tomopet::env::htu21d::Htu21d;
use tomopet::env::OfflineWeather;
use tomopet::games::{GameTable, PerfectTen, SpinRace};
use tomopet::input::{DebounceConfig, EventChannel, QuadratureDecoder};
use tomopet::ui::oled;

// ═══════════════════════════════════════════════════════════════════════════
// Shared state
// ═══════════════════════════════════════════════════════════════════════════

/// Encoder events, written on the app core and drained by the logic loop.
static EVENTS: EventChannel = EventChannel::new();

static mut APP_CORE_STACK: Stack<8192> = Stack::new();

type I2cBus = RefCell<I2c<'static, Blocking>>;
static I2C_BUS: StaticCell<I2cBus> = StaticCell::new();

type Screen = oled::Display<RefCellDevice<'static, I2c<'static, Blocking>>>;

// ═══════════════════════════════════════════════════════════════════════════
// Time base
// ═══════════════════════════════════════════════════════════════════════════

/// `embassy_time` as a blocking millisecond clock.
struct BoardClock;

impl DelayNs for BoardClock {
    fn delay_ns(&mut self, ns: u32) {
        embassy_time::block_for(Duration::from_nanos(ns as u64));
    }

    fn delay_ms(&mut self, ms: u32) {
        embassy_time::block_for(Duration::from_millis(ms as u64));
    }
}

impl Clock for BoardClock {
    fn now_ms(&self) -> u32 {
        now_ms()
    }
}

fn now_ms() -> u32 {
    // Truncation is the wrap the core expects.
    Instant::now().as_millis() as u32
}

// ═══════════════════════════════════════════════════════════════════════════
// Encoder sampling (app core)
// ═══════════════════════════════════════════════════════════════════════════

#[embassy_executor::task]
async fn encoder_task(pin_a: Input<'static>, pin_b: Input<'static>, button: Input<'static>) {
    let mut decoder = QuadratureDecoder::new(
        pin_a,
        pin_b,
        button,
        &EVENTS,
        DebounceConfig::default(),
        now_ms(),
    );
    info!("Encoder: sampling at {} Hz", ENCODER_POLL_HZ);

    let mut ticker = Ticker::every(Duration::from_hz(ENCODER_POLL_HZ));
    loop {
        decoder.sample(now_ms());
        ticker.next().await;
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Entry point (pro core)
// ═══════════════════════════════════════════════════════════════════════════

#[esp_hal_embassy::main]
async fn main(_spawner: Spawner) {
    info!("tomopet starting...");

    let config = esp_hal::Config::default().with_cpu_clock(CpuClock::max());
    let peripherals = esp_hal::init(config);

    let timg0 = TimerGroup::new(peripherals.TIMG0);
    esp_hal_embassy::init(timg0.timer0);

    // ── Encoder on the app core ──────────────────────────────────────────
    let pin_a = Input::new(peripherals.GPIO25, Pull::Up);
    let pin_b = Input::new(peripherals.GPIO26, Pull::Up);
    let button = Input::new(peripherals.GPIO27, Pull::Up);

    let mut cpu_control = CpuControl::new(peripherals.CPU_CTRL);
    let app_core = cpu_control.start_app_core(
        unsafe { &mut *addr_of_mut!(APP_CORE_STACK) },
        move || {
            static EXECUTOR: StaticCell<Executor> = StaticCell::new();
            let executor = EXECUTOR.init(Executor::new());
            executor.run(|spawner| {
                if spawner.spawn(encoder_task(pin_a, pin_b, button)).is_err() {
                    error!("Encoder: task spawn failed");
                }
            });
        },
    );
    // Dropping the guard would park the app core again.
    let _app_core = match app_core {
        Ok(guard) => guard,
        Err(_) => {
            error!("Encoder: could not start app core");
            park().await
        }
    };

    // ── Shared I²C bus: display + climate sensor ─────────────────────────
    let i2c = match I2c::new(
        peripherals.I2C0,
        I2cConfig::default().with_frequency(I2C_FREQUENCY_KHZ.kHz()),
    ) {
        Ok(i2c) => i2c.with_sda(peripherals.GPIO21).with_scl(peripherals.GPIO22),
        Err(_) => {
            error!("I2C: bad configuration");
            park().await
        }
    };
    let bus: &'static I2cBus = I2C_BUS.init(RefCell::new(i2c));

    let display = match oled::init(RefCellDevice::new(bus)) {
        Ok(display) => display,
        Err(e) => {
            error!("Display: init failed: {}", e);
            park().await
        }
    };
    let sensor = Htu21d::new(RefCellDevice::new(bus), Delay);
    let rng = Rng::new(peripherals.RNG);

    // ── Minigames ────────────────────────────────────────────────────────
    let mut perfect_ten = PerfectTen::new();
    let mut spin_race = SpinRace::new();
    let mut games: GameTable<'_, Screen> = GameTable::new();
    if games.register(&mut perfect_ten).is_err() || games.register(&mut spin_race).is_err() {
        error!("Games: table full");
    }

    // ── Logic loop ───────────────────────────────────────────────────────
    let mut clock = BoardClock;
    let mut app = App::new(display, sensor, OfflineWeather, rng, &EVENTS, games, clock.now_ms());
    app.start(&mut clock);
    info!("tomopet ready");

    loop {
        app.step(&mut clock);
        Timer::after(Duration::from_millis(LOOP_PAUSE_MS)).await;
    }
}

/// Nothing useful left to do; keep the executor alive for logging.
async fn park() -> ! {
    loop {
        Timer::after(Duration::from_secs(60)).await;
    }
}
