//! Menu navigation: a stack of menu ids over a [`MenuTree`].
//!
//! The navigator only moves the cursor and walks the tree. Leaf items are
//! reported back as [`NavOutcome::Activated`] and the state machine decides
//! what they do.

use heapless::Vec;

use super::menu::{ItemKind, Menu, MenuId, MenuItem, MenuTree};
use crate::config::MAX_MENU_DEPTH;

/// Path from the root menu to the one on screen.
pub type MenuStack = Vec<MenuId, MAX_MENU_DEPTH>;

/// Result of activating an item.
#[derive(Clone, Copy, Debug)]
pub enum NavOutcome {
    /// Descended into a submenu.
    Pushed(MenuId),
    /// Went up one level.
    Popped(MenuId),
    /// Back from the root: leave the menu context.
    Exit,
    /// A leaf item for the caller to act on.
    Activated(MenuItem),
    /// Nothing happened (no menu open, empty menu, stack full).
    Ignored,
}

pub struct Navigator {
    tree: MenuTree,
    stack: MenuStack,
    root: MenuId,
}

impl Navigator {
    pub fn new(tree: MenuTree, root: MenuId) -> Self {
        Self {
            tree,
            stack: MenuStack::new(),
            root,
        }
    }

    pub fn tree(&self) -> &MenuTree {
        &self.tree
    }

    pub fn root(&self) -> MenuId {
        self.root
    }

    /// Start a fresh session at the root with the cursor on the first item.
    pub fn open_root(&mut self) {
        self.stack.clear();
        if let Some(menu) = self.tree.get_mut(self.root) {
            menu.reset();
            menu.set_parent(None);
            // Capacity is at least one.
            let _ = self.stack.push(self.root);
        }
    }

    /// Drop the whole stack.
    pub fn close(&mut self) {
        self.stack.clear();
    }

    /// Put back a previously recorded stack. Cursor positions live in the
    /// menus themselves, so the user lands on the item they left.
    pub fn restore(&mut self, stack: &MenuStack) {
        self.stack.clone_from(stack);
    }

    pub fn stack(&self) -> &MenuStack {
        &self.stack
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn is_open(&self) -> bool {
        !self.stack.is_empty()
    }

    pub fn current_id(&self) -> Option<MenuId> {
        self.stack.last().copied()
    }

    pub fn current(&self) -> Option<&Menu> {
        self.current_id().and_then(|id| self.tree.get(id))
    }

    fn current_mut(&mut self) -> Option<&mut Menu> {
        let id = self.current_id()?;
        self.tree.get_mut(id)
    }

    pub fn move_by(&mut self, delta: i32) {
        if let Some(menu) = self.current_mut() {
            menu.move_by(delta);
        }
    }

    /// Activate the item under the cursor.
    pub fn activate(&mut self) -> NavOutcome {
        match self.current().and_then(Menu::selected).copied() {
            Some(item) => self.enter(item),
            None => NavOutcome::Ignored,
        }
    }

    /// Apply an item's navigation effect.
    pub fn enter(&mut self, item: MenuItem) -> NavOutcome {
        match item.kind {
            ItemKind::Submenu(child) => self.push(child),
            ItemKind::Back => {
                if self.stack.len() > 1 {
                    let left = self.stack.pop();
                    debug!("menu: back to depth {}", self.stack.len());
                    left.map_or(NavOutcome::Ignored, NavOutcome::Popped)
                } else {
                    NavOutcome::Exit
                }
            }
            _ => NavOutcome::Activated(item),
        }
    }

    fn push(&mut self, child: MenuId) -> NavOutcome {
        if self.stack.is_full() {
            warn!("menu: stack full, not entering {}", child.index());
            return NavOutcome::Ignored;
        }
        let parent = self.current_id();
        let Some(menu) = self.tree.get_mut(child) else {
            warn!("menu: unknown submenu {}", child.index());
            return NavOutcome::Ignored;
        };
        menu.reset();
        menu.set_parent(parent);
        let _ = self.stack.push(child);
        NavOutcome::Pushed(child)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::menu::Target;

    const ROOT: MenuId = MenuId::new(0);
    const SUB: MenuId = MenuId::new(1);
    const DEEP: MenuId = MenuId::new(2);

    static ROOT_ITEMS: [MenuItem; 3] = [
        MenuItem::submenu("Sub", SUB),
        MenuItem::goto("Stats", Target::Stats),
        MenuItem::back("Exit"),
    ];
    static SUB_ITEMS: [MenuItem; 2] = [MenuItem::submenu("Deep", DEEP), MenuItem::back("Back")];
    static DEEP_ITEMS: [MenuItem; 2] = [MenuItem::submenu("Again", DEEP), MenuItem::back("Back")];

    fn navigator() -> Navigator {
        let mut tree = MenuTree::new();
        tree.insert(Menu::new("Root", &ROOT_ITEMS, 4)).unwrap();
        tree.insert(Menu::new("Sub", &SUB_ITEMS, 4)).unwrap();
        tree.insert(Menu::new("Deep", &DEEP_ITEMS, 4)).unwrap();
        Navigator::new(tree, ROOT)
    }

    #[test]
    fn open_root_starts_fresh() {
        let mut nav = navigator();
        nav.open_root();
        nav.move_by(2);
        nav.open_root();
        assert_eq!(nav.stack().as_slice(), &[ROOT]);
        assert_eq!(nav.current().map(Menu::index), Some(0));
    }

    #[test]
    fn submenu_push_sets_parent_and_resets_child() {
        let mut nav = navigator();
        nav.open_root();
        assert!(matches!(nav.activate(), NavOutcome::Pushed(SUB)));
        nav.move_by(1);
        assert!(matches!(nav.activate(), NavOutcome::Popped(SUB)));
        assert!(matches!(nav.activate(), NavOutcome::Pushed(SUB)));

        let sub = nav.current().unwrap();
        assert_eq!(sub.parent(), Some(ROOT));
        assert_eq!(sub.index(), 0);
        assert_eq!(nav.depth(), 2);
    }

    #[test]
    fn back_at_root_exits() {
        let mut nav = navigator();
        nav.open_root();
        nav.move_by(-1);
        assert!(matches!(nav.activate(), NavOutcome::Exit));
        assert_eq!(nav.depth(), 1);
    }

    #[test]
    fn leaf_items_are_reported() {
        let mut nav = navigator();
        nav.open_root();
        nav.move_by(1);
        match nav.activate() {
            NavOutcome::Activated(item) => {
                assert!(matches!(item.kind, ItemKind::Goto(Target::Stats)))
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn full_stack_is_a_no_op() {
        let mut nav = navigator();
        nav.open_root();
        for _ in 0..10 {
            nav.activate();
        }
        assert_eq!(nav.depth(), MAX_MENU_DEPTH);
        assert!(matches!(nav.activate(), NavOutcome::Ignored));
        assert_eq!(nav.depth(), MAX_MENU_DEPTH);
    }

    #[test]
    fn close_and_restore_round_trip() {
        let mut nav = navigator();
        nav.open_root();
        nav.activate();
        nav.move_by(1);
        let saved = nav.stack().clone();

        nav.close();
        assert!(!nav.is_open());
        assert!(matches!(nav.activate(), NavOutcome::Ignored));

        nav.restore(&saved);
        assert_eq!(nav.stack(), &saved);
        assert_eq!(nav.current().map(Menu::index), Some(1));
    }
}
