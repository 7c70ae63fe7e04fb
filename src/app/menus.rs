//! The menu tree shipped on the device.

use crate::config::MENU_VISIBLE_ROWS;
use crate::games::{PERFECT_TEN, SPIN_RACE};
use crate::pet::actions::{cuddle, feed, medicine, rest, snack};
use crate::pet::Toggle;
use crate::ui::{Menu, MenuId, MenuItem, MenuTree, Navigator, Target};

pub const ROOT: MenuId = MenuId::new(0);
pub const CARE: MenuId = MenuId::new(1);
pub const GAMES: MenuId = MenuId::new(2);
pub const SETTINGS: MenuId = MenuId::new(3);

static ROOT_ITEMS: [MenuItem; 5] = [
    MenuItem::submenu("Care", CARE),
    MenuItem::goto("Stats", Target::Stats),
    MenuItem::submenu("Games", GAMES),
    MenuItem::submenu("Settings", SETTINGS),
    MenuItem::back("Exit"),
];

static CARE_ITEMS: [MenuItem; 6] = [
    MenuItem::action("Feed", feed),
    MenuItem::action("Snack", snack),
    MenuItem::action("Rest", rest),
    MenuItem::action("Medicine", medicine),
    MenuItem::action("Cuddle", cuddle),
    MenuItem::back("Back"),
];

static GAMES_ITEMS: [MenuItem; 3] = [
    MenuItem::minigame("Perfect 10", PERFECT_TEN),
    MenuItem::minigame("Spin Race", SPIN_RACE),
    MenuItem::back("Back"),
];

static SETTINGS_ITEMS: [MenuItem; 4] = [
    MenuItem::toggle("Rain", Toggle::RainOverlay),
    MenuItem::toggle("Celsius", Toggle::Celsius),
    MenuItem::goto("Home", Target::Idle),
    MenuItem::back("Back"),
];

/// Build the tree. Insertion order must match the ids above.
pub fn build() -> MenuTree {
    let mut tree = MenuTree::new();
    for (title, items) in [
        ("Menu", &ROOT_ITEMS[..]),
        ("Care", &CARE_ITEMS[..]),
        ("Games", &GAMES_ITEMS[..]),
        ("Settings", &SETTINGS_ITEMS[..]),
    ] {
        if tree.insert(Menu::new(title, items, MENU_VISIBLE_ROWS)).is_err() {
            error!("menu: tree full at {}", title);
        }
    }
    tree
}

pub fn navigator() -> Navigator {
    Navigator::new(build(), ROOT)
}
