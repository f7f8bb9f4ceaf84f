//! Click/tap and keyboard handling for the browser host.
//!
//! This module separates the pure logic (key bindings, coordinate conversion,
//! target matching, command dispatch) from web_sys DOM access so it can be
//! unit tested.

use gem_clicker::{GemGame, KeyValueStore};

/// Everything the player can ask the engine to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Hit the gem (feeds the combo).
    Tap,
    /// Buy the n-th generator in shop order.
    BuyGenerator(usize),
    /// Buy the n-th upgrade in shop order.
    BuyUpgrade(usize),
    Reset,
}

/// Keyboard bindings: space/x taps, digits buy generators, letters buy
/// upgrades, shift-R resets.
pub fn command_for_key(c: char) -> Option<Command> {
    match c {
        ' ' | 'x' => Some(Command::Tap),
        '1'..='9' => Some(Command::BuyGenerator((c as u8 - b'1') as usize)),
        'a'..='h' => Some(Command::BuyUpgrade((c as u8 - b'a') as usize)),
        'R' => Some(Command::Reset),
        _ => None,
    }
}

/// Key hint shown next to a shop row.
pub fn generator_key(index: usize) -> char {
    (b'1' + index as u8) as char
}

pub fn upgrade_key(index: usize) -> char {
    (b'a' + index as u8) as char
}

/// Run a command against the engine. Returns true if anything changed.
pub fn dispatch<S: KeyValueStore>(game: &mut GemGame<S>, command: Command, now_ms: f64) -> bool {
    match command {
        Command::Tap => game.tap(now_ms).is_some(),
        Command::BuyGenerator(i) => match game.generators().get(i) {
            Some(item) => game.buy_generator(item.id),
            None => false,
        },
        Command::BuyUpgrade(i) => match game.upgrades().get(i) {
            Some(item) => game.buy_upgrade(item.id),
            None => false,
        },
        Command::Reset => {
            game.reset();
            true
        }
    }
}

/// A terminal row that triggers a command when tapped.
#[derive(Debug, Clone)]
pub struct ClickTarget {
    pub row: u16,
    pub command: Command,
}

/// Shared state between the render loop and click handler.
pub struct ClickState {
    pub targets: Vec<ClickTarget>,
    pub terminal_cols: u16,
    pub terminal_rows: u16,
}

impl ClickState {
    pub fn new() -> Self {
        Self {
            targets: Vec::new(),
            terminal_cols: 0,
            terminal_rows: 0,
        }
    }

    pub fn clear_targets(&mut self) {
        self.targets.clear();
    }

    pub fn add_target(&mut self, row: u16, command: Command) {
        self.targets.push(ClickTarget { row, command });
    }

    /// Find the command for a given terminal row.
    pub fn find_target(&self, row: u16) -> Option<Command> {
        self.targets
            .iter()
            .find(|t| t.row == row)
            .map(|t| t.command)
    }
}

/// Convert a pixel Y coordinate to a terminal row index.
///
/// `click_y` is relative to the grid container's top edge.
/// Returns `None` if the click is outside the grid or inputs are invalid.
pub fn pixel_y_to_row(click_y: f64, grid_height: f64, terminal_rows: u16) -> Option<u16> {
    if grid_height <= 0.0 || terminal_rows == 0 || click_y < 0.0 {
        return None;
    }

    let cell_height = grid_height / terminal_rows as f64;
    let row = (click_y / cell_height) as u16;

    if row >= terminal_rows {
        return None;
    }

    Some(row)
}

/// Determine whether a screen width (in columns) should use narrow layout.
pub fn is_narrow_layout(width: u16) -> bool {
    width < 60
}

#[cfg(test)]
mod tests {
    use super::*;
    use gem_clicker::MemoryStore;

    // ── key bindings ───────────────────────────────────────────────────

    #[test]
    fn keys_map_to_commands() {
        assert_eq!(command_for_key(' '), Some(Command::Tap));
        assert_eq!(command_for_key('x'), Some(Command::Tap));
        assert_eq!(command_for_key('1'), Some(Command::BuyGenerator(0)));
        assert_eq!(command_for_key('3'), Some(Command::BuyGenerator(2)));
        assert_eq!(command_for_key('a'), Some(Command::BuyUpgrade(0)));
        assert_eq!(command_for_key('f'), Some(Command::BuyUpgrade(5)));
        assert_eq!(command_for_key('R'), Some(Command::Reset));
        assert_eq!(command_for_key('r'), None);
        assert_eq!(command_for_key('z'), None);
    }

    #[test]
    fn key_hints_invert_bindings() {
        for i in 0..6 {
            assert_eq!(command_for_key(generator_key(i)), Some(Command::BuyGenerator(i)));
            assert_eq!(command_for_key(upgrade_key(i)), Some(Command::BuyUpgrade(i)));
        }
    }

    // ── dispatch ───────────────────────────────────────────────────────

    #[test]
    fn tap_dispatch_earns() {
        let mut game = GemGame::with_store(MemoryStore::new());
        assert!(dispatch(&mut game, Command::Tap, 0.0));
        assert_eq!(game.money(), 1.0);
        assert_eq!(game.combo().count, 1);
    }

    #[test]
    fn buy_dispatch_uses_shop_order() {
        let mut game = GemGame::with_store(MemoryStore::new());
        for i in 0..15 {
            dispatch(&mut game, Command::Tap, i as f64 * 1_000.0);
        }
        assert!(dispatch(&mut game, Command::BuyGenerator(0), 15_000.0));
        assert_eq!(game.generators()[0].quantity, 1);
        assert!(!dispatch(&mut game, Command::BuyGenerator(99), 15_000.0));
        assert!(!dispatch(&mut game, Command::BuyUpgrade(0), 15_000.0));
    }

    #[test]
    fn reset_dispatch() {
        let mut game = GemGame::with_store(MemoryStore::new());
        dispatch(&mut game, Command::Tap, 0.0);
        assert!(dispatch(&mut game, Command::Reset, 0.0));
        assert_eq!(game.money(), 0.0);
    }

    // ── pixel_y_to_row ─────────────────────────────────────────────────

    #[test]
    fn pixel_to_row_basic() {
        // 30 rows, grid 450px tall → each row is 15px
        assert_eq!(pixel_y_to_row(0.0, 450.0, 30), Some(0));
        assert_eq!(pixel_y_to_row(14.0, 450.0, 30), Some(0));
        assert_eq!(pixel_y_to_row(15.0, 450.0, 30), Some(1));
        assert_eq!(pixel_y_to_row(449.0, 450.0, 30), Some(29));
    }

    #[test]
    fn pixel_to_row_out_of_bounds() {
        assert_eq!(pixel_y_to_row(450.0, 450.0, 30), None);
        assert_eq!(pixel_y_to_row(-1.0, 450.0, 30), None);
        assert_eq!(pixel_y_to_row(10.0, 0.0, 30), None);
        assert_eq!(pixel_y_to_row(10.0, 450.0, 0), None);
    }

    // ── targets ────────────────────────────────────────────────────────

    #[test]
    fn find_target_matches_row() {
        let mut cs = ClickState::new();
        cs.add_target(5, Command::Tap);
        cs.add_target(6, Command::BuyGenerator(0));

        assert_eq!(cs.find_target(5), Some(Command::Tap));
        assert_eq!(cs.find_target(6), Some(Command::BuyGenerator(0)));
        assert_eq!(cs.find_target(7), None);

        cs.clear_targets();
        assert_eq!(cs.find_target(5), None);
    }

    #[test]
    fn narrow_layout_threshold() {
        assert!(is_narrow_layout(59));
        assert!(!is_narrow_layout(60));
    }
}
