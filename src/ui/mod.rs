//! User interface - menus, navigation and screen rendering.
//!
//! ## Components
//!
//! - **Menu**: items, scrollable menus and the arena that owns them
//! - **Navigator**: stack of open menus, cursor movement and activation
//! - **Display**: the `Surface` seam and one `draw_*` function per screen
//! - **OLED**: SSD1306 128×64 panel via I²C (firmware only)

pub mod display;
pub mod menu;
pub mod navigator;
#[cfg(feature = "embedded")]
pub mod oled;

pub use display::Surface;
pub use menu::{GameSlot, ItemKind, Menu, MenuId, MenuItem, MenuTree, Target};
pub use navigator::{MenuStack, NavOutcome, Navigator};
