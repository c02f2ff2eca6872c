//! TUI application - keyboard handling over the session controller
//!
//! The App owns the SessionController plus the few bits of purely visual
//! state (cursor, spinner). It never issues requests itself; an accepted
//! Enter only raises `pending_submit` for the runner to pick up.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tracing::{debug, trace};

use crate::session::{SessionController, SessionState};

/// Spinner frames shown next to "Thinking..." while a turn is in flight
pub const SPINNER_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// TUI application
pub struct App {
    controller: SessionController,
    /// Byte offset of the cursor within the pending input
    cursor_pos: usize,
    /// Enter was pressed on submittable input
    pending_submit: bool,
    /// Animation counter, advanced on every tick
    tick: usize,
    should_quit: bool,
}

impl App {
    pub fn new(controller: SessionController) -> Self {
        debug!("App::new: called");
        Self {
            controller,
            cursor_pos: 0,
            pending_submit: false,
            tick: 0,
            should_quit: false,
        }
    }

    pub fn state(&self) -> &SessionState {
        trace!("App::state: called");
        self.controller.state()
    }

    pub fn controller(&self) -> &SessionController {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut SessionController {
        &mut self.controller
    }

    /// Cursor position, clamped to the current input
    pub fn cursor_pos(&self) -> usize {
        self.cursor_pos.min(self.state().pending_input.len())
    }

    pub fn spinner(&self) -> &'static str {
        SPINNER_FRAMES[self.tick % SPINNER_FRAMES.len()]
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn on_tick(&mut self) {
        self.tick = self.tick.wrapping_add(1);
    }

    /// Take the submit request raised by Enter, if any
    pub fn take_pending_submit(&mut self) -> bool {
        std::mem::take(&mut self.pending_submit)
    }

    /// Handle a key event
    ///
    /// Returns true if the application should exit.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        debug!(?key, "App::handle_key: called");
        if key.kind != KeyEventKind::Press {
            return false;
        }

        // The controller may have cleared the input since the last key
        self.cursor_pos = self.cursor_pos();

        match (key.code, key.modifiers) {
            (KeyCode::Char('c'), KeyModifiers::CONTROL) | (KeyCode::Char('q'), KeyModifiers::CONTROL) => {
                debug!("App::handle_key: quit requested");
                self.should_quit = true;
                return true;
            }
            (KeyCode::Enter, _) => {
                // Mirrors a disabled Send button: no session or still loading
                if self.state().can_submit() {
                    debug!("App::handle_key: Enter - submit queued");
                    self.pending_submit = true;
                } else {
                    debug!("App::handle_key: Enter - submit not available");
                }
            }
            (KeyCode::Esc, _) => {
                debug!("App::handle_key: Esc - clear input");
                self.controller.update_pending_input(String::new());
                self.cursor_pos = 0;
            }
            (KeyCode::Backspace, _) => {
                if self.cursor_pos > 0 {
                    let new_pos = self.prev_char_boundary(self.cursor_pos);
                    let end = self.cursor_pos;
                    self.edit_input(|input| {
                        input.drain(new_pos..end);
                    });
                    self.cursor_pos = new_pos;
                }
            }
            (KeyCode::Delete, _) => {
                if self.cursor_pos < self.state().pending_input.len() {
                    let end_pos = self.next_char_boundary(self.cursor_pos);
                    let start = self.cursor_pos;
                    self.edit_input(|input| {
                        input.drain(start..end_pos);
                    });
                }
            }
            (KeyCode::Left, _) => {
                self.cursor_pos = self.prev_char_boundary(self.cursor_pos);
            }
            (KeyCode::Right, _) => {
                self.cursor_pos = self.next_char_boundary(self.cursor_pos);
            }
            (KeyCode::Home, _) | (KeyCode::Char('a'), KeyModifiers::CONTROL) => {
                self.cursor_pos = 0;
            }
            (KeyCode::End, _) | (KeyCode::Char('e'), KeyModifiers::CONTROL) => {
                self.cursor_pos = self.state().pending_input.len();
            }
            (KeyCode::Char('u'), KeyModifiers::CONTROL) => {
                let end = self.cursor_pos;
                self.edit_input(|input| {
                    input.drain(..end);
                });
                self.cursor_pos = 0;
            }
            (KeyCode::Char(c), modifiers) if !modifiers.contains(KeyModifiers::CONTROL) => {
                let pos = self.cursor_pos;
                self.edit_input(|input| input.insert(pos, c));
                self.cursor_pos += c.len_utf8();
            }
            _ => {
                trace!("App::handle_key: unbound key");
            }
        }
        false
    }

    /// Insert pasted text at the cursor
    pub fn handle_paste(&mut self, text: &str) {
        debug!(text_len = text.len(), "App::handle_paste: called");
        let pos = self.cursor_pos();
        self.edit_input(|input| input.insert_str(pos, text));
        self.cursor_pos = pos + text.len();
    }

    fn edit_input(&mut self, edit: impl FnOnce(&mut String)) {
        let mut input = self.state().pending_input.clone();
        edit(&mut input);
        self.controller.update_pending_input(input);
    }

    /// Find the previous character boundary in the input
    fn prev_char_boundary(&self, pos: usize) -> usize {
        let input = &self.state().pending_input;
        let mut new_pos = pos.saturating_sub(1);
        while new_pos > 0 && !input.is_char_boundary(new_pos) {
            new_pos -= 1;
        }
        new_pos
    }

    /// Find the next character boundary in the input
    fn next_char_boundary(&self, pos: usize) -> usize {
        let input = &self.state().pending_input;
        let mut new_pos = pos + 1;
        while new_pos < input.len() && !input.is_char_boundary(new_pos) {
            new_pos += 1;
        }
        new_pos.min(input.len())
    }
}
