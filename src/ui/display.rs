//! Screen rendering on a 128×64 monochrome surface.
//!
//! Every `draw_*` function clears the frame, draws one complete screen and
//! presents it. Individual primitive draw errors are ignored; only the
//! final flush is reported.

use core::fmt::Write;

use embedded_graphics::mono_font::ascii::FONT_6X10;
use embedded_graphics::mono_font::{MonoTextStyle, MonoTextStyleBuilder};
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Circle, Line, PrimitiveStyle, Rectangle};
use embedded_graphics::text::Text;
use heapless::String;
use rand_core::{RngCore, SeedableRng};
use rand_pcg::Pcg32;

use super::menu::{ItemKind, Menu};
use crate::clock::TimeOfDay;
use crate::config::{SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::env::c_to_f;
use crate::error::Error;
use crate::pet::{Mood, Notice, Pet, Settings, Stat, Stats};

/// A monochrome frame buffer that can be pushed to the panel.
pub trait Surface: DrawTarget<Color = BinaryColor> {
    /// Flush the frame to the device.
    fn present(&mut self) -> Result<(), Error>;
}

const WIDTH: i32 = SCREEN_WIDTH as i32;
const HEIGHT: i32 = SCREEN_HEIGHT as i32;
const CHAR_WIDTH: i32 = 6;
/// Offset from a text row's top edge to its baseline.
const BASELINE: i32 = 8;

const ROW_HEIGHT: i32 = 12;
const LIST_TOP: i32 = 12;
const SCROLLBAR_X: i32 = WIDTH - 3;
const RAIN_DROPS: usize = 18;

fn text_style(color: BinaryColor) -> MonoTextStyle<'static, BinaryColor> {
    MonoTextStyleBuilder::new()
        .font(&FONT_6X10)
        .text_color(color)
        .build()
}

fn text_width(text: &str) -> i32 {
    text.len() as i32 * CHAR_WIDTH
}

/// Draw `text` with its baseline at `y`.
pub fn text_at<D: Surface>(display: &mut D, text: &str, x: i32, y: i32) {
    let _ = Text::new(text, Point::new(x, y), text_style(BinaryColor::On)).draw(display);
}

/// Draw `text` horizontally centred with its baseline at `y`.
pub fn centered_text<D: Surface>(display: &mut D, text: &str, y: i32) {
    let x = ((WIDTH - text_width(text)) / 2).max(0);
    text_at(display, text, x, y);
}

fn right_text<D: Surface>(display: &mut D, text: &str, y: i32) {
    text_at(display, text, (WIDTH - text_width(text)).max(0), y);
}

fn round(value: f32) -> i32 {
    if value >= 0.0 {
        (value + 0.5) as i32
    } else {
        (value - 0.5) as i32
    }
}

/// `72F`, `22C` or `--`.
pub fn format_temperature(celsius_value: Option<f32>, celsius: bool) -> String<8> {
    let mut out = String::new();
    match celsius_value {
        Some(c) if celsius => {
            let _ = write!(out, "{}C", round(c));
        }
        Some(c) => {
            let _ = write!(out, "{}F", round(c_to_f(c)));
        }
        None => {
            let _ = out.push_str("--");
        }
    }
    out
}

/// `45%` or `--`.
pub fn format_humidity(rh: Option<f32>) -> String<8> {
    let mut out = String::new();
    match rh {
        Some(rh) => {
            let _ = write!(out, "{}%", round(rh));
        }
        None => {
            let _ = out.push_str("--");
        }
    }
    out
}

/// `9:45 AM`, with a blank in place of the colon on odd seconds, or
/// `--:--` before the first time sync.
pub fn format_clock(time: Option<TimeOfDay>) -> String<12> {
    let mut out = String::new();
    match time {
        Some(time) => {
            let (hour, period) = time.hour12();
            let separator = if time.second % 2 == 0 { ':' } else { ' ' };
            let _ = write!(out, "{}{}{:02} {}", hour, separator, time.minute, period);
        }
        None => {
            let _ = out.push_str("--:--");
        }
    }
    out
}

// ═══════════════════════════════════════════════════════════════════════════
// Idle screen
// ═══════════════════════════════════════════════════════════════════════════

/// Home screen: clock on top, the pet, indoor readings on the left and
/// outdoor on the right.
pub fn draw_idle<D: Surface>(display: &mut D, pet: &Pet, time: Option<TimeOfDay>) -> Result<(), Error> {
    let _ = display.clear(BinaryColor::Off);

    centered_text(display, &format_clock(time), BASELINE);

    let celsius = pet.settings.celsius;
    let readings = &pet.readings;

    text_at(display, "IN", 0, BASELINE);
    text_at(display, &format_temperature(readings.indoor_c, celsius), 0, 22);
    text_at(display, &format_humidity(readings.indoor_rh), 0, 34);

    let outdoor = &readings.outdoor;
    right_text(display, "OUT", BASELINE);
    right_text(display, &format_temperature(outdoor.temp_c, celsius), 22);
    right_text(display, &format_humidity(outdoor.humidity), 34);
    if let Some(condition) = outdoor.condition {
        right_text(display, condition.label(), 46);
    }

    let bob = if pet.frame() == 1 { 2 } else { 0 };
    draw_pet(display, pet.mood, Point::new(WIDTH / 2, 34 + bob));

    if pet.settings.rain_overlay || readings.is_raining() {
        draw_rain(display, pet.frame());
    }

    display.present()
}

const HEART: [&str; 4] = [".X.X.", "XXXXX", ".XXX.", "..X.."];

fn draw_heart<D: Surface>(display: &mut D, centre: Point) {
    let origin = centre - Point::new(2, 2);
    let pixels = HEART.iter().enumerate().flat_map(|(y, row)| {
        row.bytes()
            .enumerate()
            .filter(|&(_, b)| b == b'X')
            .map(move |(x, _)| Pixel(origin + Point::new(x as i32, y as i32), BinaryColor::On))
    });
    let _ = display.draw_iter(pixels);
}

fn line<D: Surface>(display: &mut D, centre: Point, from: (i32, i32), to: (i32, i32)) {
    let _ = Line::new(centre + Point::new(from.0, from.1), centre + Point::new(to.0, to.1))
        .into_styled(PrimitiveStyle::with_stroke(BinaryColor::On, 1))
        .draw(display);
}

fn dot<D: Surface>(display: &mut D, centre: Point, diameter: u32) {
    let _ = Circle::with_center(centre, diameter)
        .into_styled(PrimitiveStyle::with_fill(BinaryColor::On))
        .draw(display);
}

fn smile<D: Surface>(display: &mut D, c: Point) {
    line(display, c, (-5, 4), (-2, 7));
    line(display, c, (-2, 7), (2, 7));
    line(display, c, (2, 7), (5, 4));
}

/// Round-bodied pet whose face follows its mood.
fn draw_pet<D: Surface>(display: &mut D, mood: Mood, c: Point) {
    let _ = Circle::with_center(c, 29)
        .into_styled(PrimitiveStyle::with_stroke(BinaryColor::On, 1))
        .draw(display);
    // Ears.
    line(display, c, (-10, -10), (-12, -17));
    line(display, c, (-12, -17), (-5, -13));
    line(display, c, (10, -10), (12, -17));
    line(display, c, (12, -17), (5, -13));

    let left_eye = c + Point::new(-5, -3);
    let right_eye = c + Point::new(5, -3);

    match mood {
        Mood::Happy => {
            dot(display, left_eye, 3);
            dot(display, right_eye, 3);
            smile(display, c);
        }
        Mood::Sad => {
            dot(display, left_eye, 3);
            dot(display, right_eye, 3);
            line(display, c, (-5, 8), (-2, 5));
            line(display, c, (-2, 5), (2, 5));
            line(display, c, (2, 5), (5, 8));
        }
        Mood::Bored => {
            line(display, c, (-7, -3), (-3, -3));
            line(display, c, (3, -3), (7, -3));
            line(display, c, (-4, 6), (4, 6));
        }
        Mood::Love => {
            draw_heart(display, left_eye);
            draw_heart(display, right_eye);
            smile(display, c);
        }
        Mood::Pouting => {
            dot(display, left_eye, 3);
            dot(display, right_eye, 3);
            line(display, c, (-8, -8), (-3, -6));
            line(display, c, (8, -8), (3, -6));
            let _ = Circle::with_center(c + Point::new(0, 6), 4)
                .into_styled(PrimitiveStyle::with_stroke(BinaryColor::On, 1))
                .draw(display);
        }
    }
}

/// Falling streaks. Seeded from the frame so the two animation frames
/// alternate between two fixed patterns.
fn draw_rain<D: Surface>(display: &mut D, frame: u8) {
    let mut rng = Pcg32::seed_from_u64(frame as u64);
    for _ in 0..RAIN_DROPS {
        let x = (rng.next_u32() % SCREEN_WIDTH) as i32;
        let y = (rng.next_u32() % SCREEN_HEIGHT) as i32;
        let _ = Line::new(Point::new(x, y), Point::new(x - 1, y + 3))
            .into_styled(PrimitiveStyle::with_stroke(BinaryColor::On, 1))
            .draw(display);
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Menu and stats
// ═══════════════════════════════════════════════════════════════════════════

pub fn draw_menu<D: Surface>(display: &mut D, menu: &Menu, settings: &Settings) -> Result<(), Error> {
    let _ = display.clear(BinaryColor::Off);

    text_at(display, menu.title(), 0, BASELINE);
    let _ = Line::new(Point::new(0, 10), Point::new(WIDTH - 1, 10))
        .into_styled(PrimitiveStyle::with_stroke(BinaryColor::On, 1))
        .draw(display);

    for (row, (index, item)) in menu.visible_items().enumerate() {
        let top = LIST_TOP + row as i32 * ROW_HEIGHT;
        let selected = index == menu.index();
        let color = if selected {
            let _ = Rectangle::new(Point::new(0, top), Size::new((SCROLLBAR_X - 1) as u32, ROW_HEIGHT as u32))
                .into_styled(PrimitiveStyle::with_fill(BinaryColor::On))
                .draw(display);
            BinaryColor::Off
        } else {
            BinaryColor::On
        };
        let style = text_style(color);
        let baseline = top + BASELINE + 1;
        let _ = Text::new(item.label, Point::new(2, baseline), style).draw(display);

        let marker = match item.kind {
            ItemKind::Toggle(toggle) if settings.get(toggle) => "[x]",
            ItemKind::Toggle(_) => "[ ]",
            ItemKind::Submenu(_) => ">",
            _ => "",
        };
        if !marker.is_empty() {
            let x = SCROLLBAR_X - 2 - text_width(marker);
            let _ = Text::new(marker, Point::new(x, baseline), style).draw(display);
        }
    }

    if menu.len() > menu.visible() {
        draw_scrollbar(display, menu);
    }

    display.present()
}

fn draw_scrollbar<D: Surface>(display: &mut D, menu: &Menu) {
    let track = HEIGHT - LIST_TOP - 4;
    let len = menu.len() as i32;
    let visible = menu.visible() as i32;
    let thumb = (track * visible / len).max(4);
    let top = LIST_TOP + (track - thumb) * menu.offset() as i32 / (len - visible);

    let _ = Line::new(Point::new(SCROLLBAR_X + 1, LIST_TOP), Point::new(SCROLLBAR_X + 1, LIST_TOP + track - 1))
        .into_styled(PrimitiveStyle::with_stroke(BinaryColor::On, 1))
        .draw(display);
    let _ = Rectangle::new(Point::new(SCROLLBAR_X, top), Size::new(3, thumb as u32))
        .into_styled(PrimitiveStyle::with_fill(BinaryColor::On))
        .draw(display);
}

pub fn draw_stats<D: Surface>(display: &mut D, stats: &Stats) -> Result<(), Error> {
    const BAR_X: i32 = 26;
    const BAR_WIDTH: u32 = 70;

    let _ = display.clear(BinaryColor::Off);
    text_at(display, "Stats", 0, BASELINE);

    for (row, stat) in Stat::ALL.into_iter().enumerate() {
        let top = 14 + row as i32 * ROW_HEIGHT;
        let value = stats.get(stat).value();
        text_at(display, stat.short_label(), 0, top + BASELINE);

        let _ = Rectangle::new(Point::new(BAR_X, top), Size::new(BAR_WIDTH, 9))
            .into_styled(PrimitiveStyle::with_stroke(BinaryColor::On, 1))
            .draw(display);
        let fill = (BAR_WIDTH - 2) * value as u32 / 100;
        if fill > 0 {
            let _ = Rectangle::new(Point::new(BAR_X + 1, top + 1), Size::new(fill, 7))
                .into_styled(PrimitiveStyle::with_fill(BinaryColor::On))
                .draw(display);
        }

        let mut number: String<4> = String::new();
        let _ = write!(number, "{}", value);
        text_at(display, &number, BAR_X + BAR_WIDTH as i32 + 4, top + BASELINE);
    }

    display.present()
}

// ═══════════════════════════════════════════════════════════════════════════
// Messages
// ═══════════════════════════════════════════════════════════════════════════

pub fn draw_message<D: Surface>(display: &mut D, notice: &Notice) -> Result<(), Error> {
    let _ = display.clear(BinaryColor::Off);
    let _ = Rectangle::new(Point::zero(), Size::new(SCREEN_WIDTH, SCREEN_HEIGHT))
        .into_styled(PrimitiveStyle::with_stroke(BinaryColor::On, 1))
        .draw(display);
    centered_text(display, notice.title, 26);
    centered_text(display, notice.subtitle, 42);
    display.present()
}

/// Boot screen with a one-line status underneath.
pub fn draw_splash<D: Surface>(display: &mut D, status: &str) -> Result<(), Error> {
    let _ = display.clear(BinaryColor::Off);
    centered_text(display, "tomopet", 24);
    centered_text(display, status, 44);
    display.present()
}
