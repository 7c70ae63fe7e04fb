//! Menu data: items, scrollable menus, and the arena that owns them.
//!
//! Menus are built once at startup and addressed by [`MenuId`]. Parent
//! links are back-references used for navigation only.

use heapless::Vec;

use crate::config::MAX_MENUS;
use crate::pet::actions::ActionFn;
use crate::pet::Toggle;

/// Index of a menu in a [`MenuTree`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MenuId(u8);

impl MenuId {
    pub const fn new(index: u8) -> Self {
        Self(index)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Non-menu screens an item can jump to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Target {
    Idle,
    Stats,
}

/// Slot of a minigame in the game table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GameSlot(pub u8);

/// What selecting an item does.
#[derive(Clone, Copy, Debug)]
pub enum ItemKind {
    /// Run a handler, then show its notice.
    Action(ActionFn),
    /// Descend into another menu.
    Submenu(MenuId),
    /// Flip a setting and stay put.
    Toggle(Toggle),
    /// Go up one level, or leave the menu from the root.
    Back,
    /// Switch to a non-menu screen.
    Goto(Target),
    /// Launch a minigame.
    Minigame(GameSlot),
}

#[derive(Clone, Copy, Debug)]
pub struct MenuItem {
    pub label: &'static str,
    pub kind: ItemKind,
}

impl MenuItem {
    pub const fn action(label: &'static str, handler: ActionFn) -> Self {
        Self {
            label,
            kind: ItemKind::Action(handler),
        }
    }

    pub const fn submenu(label: &'static str, child: MenuId) -> Self {
        Self {
            label,
            kind: ItemKind::Submenu(child),
        }
    }

    pub const fn toggle(label: &'static str, toggle: Toggle) -> Self {
        Self {
            label,
            kind: ItemKind::Toggle(toggle),
        }
    }

    pub const fn back(label: &'static str) -> Self {
        Self {
            label,
            kind: ItemKind::Back,
        }
    }

    pub const fn goto(label: &'static str, target: Target) -> Self {
        Self {
            label,
            kind: ItemKind::Goto(target),
        }
    }

    pub const fn minigame(label: &'static str, slot: GameSlot) -> Self {
        Self {
            label,
            kind: ItemKind::Minigame(slot),
        }
    }
}

/// An ordered list of items with a selection cursor and a scrolling
/// viewport of `visible` rows.
///
/// After every mutation `offset <= index < offset + visible` holds (for a
/// non-empty menu) and `offset <= len - visible` whenever the menu is
/// longer than the viewport.
#[derive(Clone, Debug)]
pub struct Menu {
    title: &'static str,
    items: &'static [MenuItem],
    index: usize,
    offset: usize,
    visible: usize,
    parent: Option<MenuId>,
}

impl Menu {
    /// A zero-row viewport is treated as one row.
    pub const fn new(title: &'static str, items: &'static [MenuItem], visible: usize) -> Self {
        Self {
            title,
            items,
            index: 0,
            offset: 0,
            visible: if visible == 0 { 1 } else { visible },
            parent: None,
        }
    }

    pub fn title(&self) -> &'static str {
        self.title
    }

    pub fn items(&self) -> &'static [MenuItem] {
        self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn visible(&self) -> usize {
        self.visible
    }

    pub fn parent(&self) -> Option<MenuId> {
        self.parent
    }

    pub(crate) fn set_parent(&mut self, parent: Option<MenuId>) {
        self.parent = parent;
    }

    /// Move the cursor by `delta` rows, wrapping at both ends.
    pub fn move_by(&mut self, delta: i32) {
        if self.items.is_empty() || delta == 0 {
            return;
        }
        let len = self.items.len() as i64;
        self.index = (self.index as i64 + delta as i64).rem_euclid(len) as usize;
        self.ensure_visible();
    }

    /// Back to the first item with the viewport at the top.
    pub fn reset(&mut self) {
        self.index = 0;
        self.offset = 0;
    }

    pub fn selected(&self) -> Option<&MenuItem> {
        self.items.get(self.index)
    }

    /// The rows currently on screen, with their absolute indices.
    pub fn visible_items(&self) -> impl Iterator<Item = (usize, &MenuItem)> {
        self.items
            .iter()
            .enumerate()
            .skip(self.offset)
            .take(self.visible)
    }

    /// Scroll just enough to keep the cursor on screen.
    fn ensure_visible(&mut self) {
        if self.index < self.offset {
            self.offset = self.index;
        } else if self.index >= self.offset + self.visible {
            self.offset = self.index + 1 - self.visible;
        }
        let max_offset = self.items.len().saturating_sub(self.visible);
        self.offset = self.offset.min(max_offset);
    }
}

/// Arena holding every menu for the lifetime of the program.
pub struct MenuTree {
    menus: Vec<Menu, MAX_MENUS>,
}

impl MenuTree {
    pub const fn new() -> Self {
        Self { menus: Vec::new() }
    }

    /// Store a menu and return its id, or hand the menu back if the arena
    /// is full.
    pub fn insert(&mut self, menu: Menu) -> Result<MenuId, Menu> {
        let id = MenuId::new(self.menus.len() as u8);
        self.menus.push(menu)?;
        Ok(id)
    }

    pub fn get(&self, id: MenuId) -> Option<&Menu> {
        self.menus.get(id.index())
    }

    pub fn get_mut(&mut self, id: MenuId) -> Option<&mut Menu> {
        self.menus.get_mut(id.index())
    }

    pub fn len(&self) -> usize {
        self.menus.len()
    }

    pub fn is_empty(&self) -> bool {
        self.menus.is_empty()
    }
}

impl Default for MenuTree {
    fn default() -> Self {
        Self::new()
    }
}
