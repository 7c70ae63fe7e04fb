//! Application state machine.
//!
//! [`App`] owns everything the logic loop touches: the display, the
//! collaborators, the pet, the navigator and the current screen. The
//! firmware calls [`App::step`] in a tight loop; each pass
//!
//! 1. drains the event channel once,
//! 2. runs the background ticks (sensor, mood, weather, decay, animation),
//! 3. applies at most one state transition,
//! 4. renders, if the render cadence has elapsed.
//!
//! Action handlers and minigames are the only fallible steps. Their errors
//! stop at this boundary. They are logged and shown as a short banner
//! before the user is put back where they were.

pub mod menus;

use core::mem;

use rand_core::RngCore;

use crate::clock::{ticks_diff, Clock, Interval, WallClock};
use crate::config::{Timing, SPLASH_MS, UTC_OFFSET_S};
use crate::env::{ClimateSensor, WeatherSource};
use crate::error::Error;
use crate::games::GameTable;
use crate::input::{EncoderEvent, EventChannel};
use crate::pet::actions;
use crate::pet::{Notice, Pet};
use crate::ui::display::{draw_idle, draw_menu, draw_message, draw_splash, draw_stats};
use crate::ui::{GameSlot, ItemKind, MenuItem, MenuStack, NavOutcome, Navigator, Surface, Target};

/// Which screen is active, without the state-scoped data.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
    Idle,
    Menu,
    Stats,
    Message,
    Minigame,
}

/// The active screen and the data it needs.
///
/// `back_to` is the menu stack to restore when the screen is dismissed;
/// `None` means return to idle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AppState {
    Idle,
    Menu,
    Stats {
        back_to: Option<MenuStack>,
    },
    Message {
        notice: Notice,
        since_ms: u32,
        duration_ms: u32,
        back_to: Option<MenuStack>,
    },
    /// Launched but not yet run. The game takes over on the next pass.
    Minigame {
        slot: GameSlot,
        back_to: MenuStack,
    },
}

impl AppState {
    pub fn mode(&self) -> Mode {
        match self {
            AppState::Idle => Mode::Idle,
            AppState::Menu => Mode::Menu,
            AppState::Stats { .. } => Mode::Stats,
            AppState::Message { .. } => Mode::Message,
            AppState::Minigame { .. } => Mode::Minigame,
        }
    }
}

struct Ticks {
    sensor: Interval,
    mood: Interval,
    weather: Interval,
    decay: Interval,
    frame: Interval,
    render: Interval,
}

impl Ticks {
    fn new(timing: &Timing, now_ms: u32) -> Self {
        Self {
            sensor: Interval::new(timing.sensor_ms, now_ms),
            mood: Interval::new(timing.mood_ms, now_ms),
            weather: Interval::new(timing.weather_ms, now_ms),
            decay: Interval::new(timing.decay_ms, now_ms),
            frame: Interval::new(timing.frame_ms, now_ms),
            render: Interval::new(timing.render_ms, now_ms),
        }
    }
}

pub struct App<'a, D, S, W, R>
where
    D: Surface,
{
    display: D,
    sensor: S,
    weather: W,
    rng: R,
    input: &'a EventChannel,
    games: GameTable<'a, D>,
    nav: Navigator,
    pet: Pet,
    state: AppState,
    timing: Timing,
    ticks: Ticks,
    wall: WallClock,
    last_input_ms: u32,
}

impl<'a, D, S, W, R> App<'a, D, S, W, R>
where
    D: Surface,
    S: ClimateSensor,
    W: WeatherSource,
    R: RngCore,
{
    pub fn new(
        display: D,
        sensor: S,
        weather: W,
        rng: R,
        input: &'a EventChannel,
        games: GameTable<'a, D>,
        now_ms: u32,
    ) -> Self {
        let timing = Timing::default();
        Self {
            display,
            sensor,
            weather,
            rng,
            input,
            games,
            nav: menus::navigator(),
            pet: Pet::new(),
            state: AppState::Idle,
            ticks: Ticks::new(&timing, now_ms),
            timing,
            wall: WallClock::new(),
            last_input_ms: now_ms,
        }
    }

    /// Replace the timing knobs. All tick schedules restart from `now_ms`.
    pub fn with_timing(mut self, timing: Timing, now_ms: u32) -> Self {
        self.ticks = Ticks::new(&timing, now_ms);
        self.timing = timing;
        self
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn mode(&self) -> Mode {
        self.state.mode()
    }

    pub fn pet(&self) -> &Pet {
        &self.pet
    }

    pub fn pet_mut(&mut self) -> &mut Pet {
        &mut self.pet
    }

    pub fn navigator(&self) -> &Navigator {
        &self.nav
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn timing(&self) -> &Timing {
        &self.timing
    }

    pub fn wall_clock(&self) -> &WallClock {
        &self.wall
    }

    /// Boot sequence: splash with network status, first readings, then
    /// every schedule starts from the end of the splash.
    pub fn start<C: Clock>(&mut self, clock: &mut C) {
        let online = self.weather.is_online();
        info!("app: starting, network {}", if online { "up" } else { "down" });
        let status = if online { "Online" } else { "Offline" };
        if let Err(e) = draw_splash(&mut self.display, status) {
            warn!("app: splash failed: {}", e);
        }

        self.pet.readings.refresh_indoor(&mut self.sensor);
        if online {
            self.pet.readings.refresh_outdoor(&mut self.weather);
            self.sync_time(clock.now_ms());
        }
        clock.delay_ms(SPLASH_MS);

        let now = clock.now_ms();
        self.ticks = Ticks::new(&self.timing, now);
        self.last_input_ms = now;
    }

    /// One pass of the logic loop.
    pub fn step<C: Clock>(&mut self, clock: &mut C) {
        let now = clock.now_ms();
        let event = self.input.read();
        if event.is_active() {
            self.last_input_ms = now;
        }

        self.run_ticks(now);
        self.advance(event, now, clock);

        // A minigame may have held the loop for a while.
        let now = clock.now_ms();
        if self.ticks.render.due(now) {
            self.render(now);
        }
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Background ticks
    // ═══════════════════════════════════════════════════════════════════════

    fn run_ticks(&mut self, now: u32) {
        if self.ticks.sensor.due(now) {
            self.pet.readings.refresh_indoor(&mut self.sensor);
        }
        if self.ticks.mood.due(now) {
            self.pet.drift_mood(&mut self.rng);
        }
        if self.ticks.weather.due(now) && self.weather.is_online() {
            self.pet.readings.refresh_outdoor(&mut self.weather);
            self.sync_time(now);
        }
        if self.ticks.decay.due(now) {
            self.pet.stats.decay(self.timing.decay_amount);
            debug!("pet: decay {}", self.pet.stats);
        }
        if self.ticks.frame.due(now) {
            self.pet.advance_frame();
        }
    }

    fn sync_time(&mut self, now: u32) {
        match self.weather.unix_time() {
            Some(unix) => {
                self.wall.sync(unix, now);
                debug!("app: wall clock at {}", unix);
            }
            None if self.wall.is_synced() => warn!("app: time sync failed, clock runs on"),
            None => {}
        }
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Transitions
    // ═══════════════════════════════════════════════════════════════════════

    fn advance<C: Clock>(&mut self, event: EncoderEvent, now: u32, clock: &mut C) {
        let state = mem::replace(&mut self.state, AppState::Idle);
        let before = state.mode();

        let next = match state {
            AppState::Idle => {
                if event.clicked {
                    self.nav.open_root();
                    AppState::Menu
                } else {
                    AppState::Idle
                }
            }
            AppState::Menu => self.advance_menu(event, now),
            AppState::Stats { back_to } => {
                if event.clicked {
                    self.resume(back_to, now)
                } else if self.idle_timed_out(now) {
                    self.nav.close();
                    AppState::Idle
                } else {
                    AppState::Stats { back_to }
                }
            }
            AppState::Message {
                notice,
                since_ms,
                duration_ms,
                back_to,
            } => {
                if event.clicked || ticks_diff(now, since_ms) >= duration_ms {
                    self.resume(back_to, now)
                } else {
                    AppState::Message {
                        notice,
                        since_ms,
                        duration_ms,
                        back_to,
                    }
                }
            }
            AppState::Minigame { slot, back_to } => self.play(slot, back_to, clock),
        };

        if next.mode() != before {
            info!("app: {} -> {}", before, next.mode());
        }
        self.state = next;
    }

    fn idle_timed_out(&self, now: u32) -> bool {
        ticks_diff(now, self.last_input_ms) >= self.timing.menu_timeout_ms
    }

    fn advance_menu(&mut self, event: EncoderEvent, now: u32) -> AppState {
        if event.steps != 0 {
            self.nav.move_by(event.steps);
        }
        if event.clicked {
            return match self.nav.activate() {
                NavOutcome::Pushed(_) | NavOutcome::Popped(_) | NavOutcome::Ignored => AppState::Menu,
                NavOutcome::Exit => {
                    self.nav.close();
                    AppState::Idle
                }
                NavOutcome::Activated(item) => self.perform(item, now),
            };
        }
        if self.idle_timed_out(now) {
            debug!("app: menu timed out at depth {}", self.nav.depth());
            self.nav.close();
            return AppState::Idle;
        }
        AppState::Menu
    }

    /// Carry out a leaf item picked in the menu.
    fn perform(&mut self, item: MenuItem, now: u32) -> AppState {
        match item.kind {
            ItemKind::Action(handler) => {
                let back_to = self.leave_menu();
                match handler(&mut self.pet, &mut self.rng) {
                    Ok(notice) => self.message(notice, now, Some(back_to)),
                    Err(e) => self.error_banner(item.label, e, now, Some(back_to)),
                }
            }
            ItemKind::Toggle(toggle) => {
                let on = self.pet.settings.flip(toggle);
                info!("settings: {} -> {}", toggle, on);
                AppState::Menu
            }
            ItemKind::Goto(Target::Idle) => {
                self.nav.close();
                AppState::Idle
            }
            ItemKind::Goto(Target::Stats) => AppState::Stats {
                back_to: Some(self.leave_menu()),
            },
            ItemKind::Minigame(slot) => AppState::Minigame {
                slot,
                back_to: self.leave_menu(),
            },
            // Handled by the navigator.
            ItemKind::Submenu(_) | ItemKind::Back => AppState::Menu,
        }
    }

    /// Record where the user is and close the navigator.
    fn leave_menu(&mut self) -> MenuStack {
        let stack = self.nav.stack().clone();
        self.nav.close();
        stack
    }

    /// Return to the recorded menu, or to idle.
    fn resume(&mut self, back_to: Option<MenuStack>, now: u32) -> AppState {
        match back_to {
            Some(stack) if !stack.is_empty() => {
                self.nav.restore(&stack);
                self.last_input_ms = now;
                AppState::Menu
            }
            _ => {
                self.nav.close();
                AppState::Idle
            }
        }
    }

    fn message(&self, notice: Notice, now: u32, back_to: Option<MenuStack>) -> AppState {
        AppState::Message {
            notice,
            since_ms: now,
            duration_ms: self.timing.message_ms,
            back_to,
        }
    }

    fn error_banner(
        &self,
        source: &'static str,
        error: Error,
        now: u32,
        back_to: Option<MenuStack>,
    ) -> AppState {
        error!("app: {} failed: {}", source, error);
        AppState::Message {
            notice: Notice::new("Oops!", error.summary()),
            since_ms: now,
            duration_ms: self.timing.error_banner_ms,
            back_to,
        }
    }

    /// Hand the display and input to a minigame until it returns.
    fn play<C: Clock>(&mut self, slot: GameSlot, back_to: MenuStack, clock: &mut C) -> AppState {
        let Some(game) = self.games.get_mut(slot) else {
            return self.error_banner("game", Error::Game("No such game"), clock.now_ms(), Some(back_to));
        };
        let name = game.name();
        info!("app: starting {}", name);

        self.input.reset();
        let cap = self.input.delta_cap();
        let result = game.run(&mut self.display, self.input, &mut *clock);
        self.input.set_delta_cap(cap);
        // Whatever the game left behind must not leak into the menu.
        self.input.reset();

        let now = clock.now_ms();
        self.last_input_ms = now;
        // The game drew over the screen; redraw on this pass.
        self.ticks.render.restart(now.wrapping_sub(self.timing.render_ms));

        match result {
            Ok(title) => {
                actions::play(&mut self.pet);
                self.message(Notice::new(title, "Joy +15"), now, Some(back_to))
            }
            Err(e) => self.error_banner(name, e, now, Some(back_to)),
        }
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Rendering
    // ═══════════════════════════════════════════════════════════════════════

    fn render(&mut self, now: u32) {
        let result = match &self.state {
            AppState::Idle => {
                let time = self.wall.local_time(now, UTC_OFFSET_S);
                draw_idle(&mut self.display, &self.pet, time)
            }
            AppState::Menu => match self.nav.current() {
                Some(menu) => draw_menu(&mut self.display, menu, &self.pet.settings),
                None => Ok(()),
            },
            AppState::Stats { .. } => draw_stats(&mut self.display, &self.pet.stats),
            AppState::Message { notice, .. } => draw_message(&mut self.display, notice),
            // The game drives the display itself.
            AppState::Minigame { .. } => Ok(()),
        };
        if let Err(e) = result {
            warn!("app: render failed: {}", e);
        }
    }
}
