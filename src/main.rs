//! Browser host: draws the HUD with ratzilla and feeds input and frame
//! timestamps into the engine.
#![cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]

mod click;
mod render;

#[cfg(target_arch = "wasm32")]
mod web {
    use std::{cell::RefCell, io, rc::Rc};

    use gem_clicker::storage::LocalStore;
    use gem_clicker::GemGame;
    use log::{Level, LevelFilter, Log, Metadata, Record};
    use ratzilla::event::{KeyCode, MouseButton, MouseEventKind};
    use ratzilla::ratatui::Terminal;
    use ratzilla::{DomBackend, WebRenderer};

    use crate::click::{command_for_key, dispatch, pixel_y_to_row, ClickState, Command};
    use crate::render;

    /// Forwards `log` records to the browser console.
    struct ConsoleLogger;

    impl Log for ConsoleLogger {
        fn enabled(&self, metadata: &Metadata) -> bool {
            metadata.level() <= Level::Info
        }

        fn log(&self, record: &Record) {
            if !self.enabled(record.metadata()) {
                return;
            }
            let msg = format!("[{}] {}", record.target(), record.args()).into();
            match record.level() {
                Level::Error => web_sys::console::error_1(&msg),
                Level::Warn => web_sys::console::warn_1(&msg),
                _ => web_sys::console::log_1(&msg),
            }
        }

        fn flush(&self) {}
    }

    static LOGGER: ConsoleLogger = ConsoleLogger;

    /// Milliseconds from `performance.now()`, or wall-clock if unavailable.
    fn now_ms() -> f64 {
        web_sys::window()
            .and_then(|w| w.performance())
            .map(|p| p.now())
            .unwrap_or_else(js_sys::Date::now)
    }

    /// Query the grid container's bounding rect and convert pixel coordinates to a row.
    fn dom_pixel_to_row(mouse_x: u32, mouse_y: u32, cs: &ClickState) -> Option<u16> {
        let window = web_sys::window()?;
        let document = window.document()?;

        // DomBackend creates a <div> as the grid container inside <body>.
        let grid = document.query_selector("body > div").ok()??;
        let rect = grid.get_bounding_client_rect();

        if (mouse_x as f64) < rect.left() {
            return None;
        }
        pixel_y_to_row(mouse_y as f64 - rect.top(), rect.height(), cs.terminal_rows)
    }

    pub fn run() -> io::Result<()> {
        console_error_panic_hook::set_once();
        if log::set_logger(&LOGGER).is_ok() {
            log::set_max_level(LevelFilter::Info);
        }

        let game = Rc::new(RefCell::new(GemGame::with_store(LocalStore)));
        game.borrow_mut().start();
        let click_state = Rc::new(RefCell::new(ClickState::new()));
        let backend = DomBackend::new()?;
        let terminal = Terminal::new(backend)?;

        // Mouse/touch click handler
        terminal.on_mouse_event({
            let game = game.clone();
            let click_state = click_state.clone();
            move |mouse_event| {
                if mouse_event.event != MouseEventKind::Pressed
                    || mouse_event.button != MouseButton::Left
                {
                    return;
                }

                let command = {
                    let cs = click_state.borrow();
                    if cs.terminal_rows == 0 || cs.terminal_cols == 0 {
                        return;
                    }
                    dom_pixel_to_row(mouse_event.x, mouse_event.y, &cs)
                        .and_then(|row| cs.find_target(row))
                };

                if let Some(command) = command {
                    dispatch(&mut *game.borrow_mut(), command, now_ms());
                }
            }
        });

        // Keyboard handler
        terminal.on_key_event({
            let game = game.clone();
            move |key_event| {
                let command = match key_event.code {
                    KeyCode::Char(c) => command_for_key(c),
                    KeyCode::Enter => Some(Command::Tap),
                    _ => None,
                };
                if let Some(command) = command {
                    dispatch(&mut *game.borrow_mut(), command, now_ms());
                }
            }
        });

        terminal.draw_web(move |f| {
            game.borrow_mut().update(now_ms());
            render::render(f, &*game.borrow(), &mut *click_state.borrow_mut());
        });

        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
fn main() -> std::io::Result<()> {
    web::run()
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    eprintln!("gem-clicker runs in the browser; build it for wasm32-unknown-unknown.");
}
