use std::sync::Arc;

use chat_core::{ControllerOptions, Dispatch, RequestController, Resolution, Transport};
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tui_input::backend::crossterm::EventHandler;
use tui_input::Input;

use crate::theme::Theme;

pub const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

#[derive(Debug)]
pub enum Action {
    Tick,
    Resolved(Resolution),
}

pub struct App {
    /// Owns the draft and the request state; everything below is view-only.
    pub controller: RequestController<dyn Transport>,
    /// Text box mirroring the controller's draft
    pub input: Input,
    pub theme: Theme,
    pub spinner_frame: usize,
    pub should_quit: bool,
}

impl App {
    pub fn new(transport: Arc<dyn Transport>, options: ControllerOptions, theme: Theme) -> Self {
        Self {
            controller: RequestController::with_options(transport, options),
            input: Input::default(),
            theme,
            spinner_frame: 0,
            should_quit: false,
        }
    }

    /// Enter is ignored while a request is pending.
    pub fn can_submit(&self) -> bool {
        !self.controller.is_pending()
    }

    pub fn spinner(&self) -> &'static str {
        SPINNER[self.spinner_frame % SPINNER.len()]
    }

    /// Handle a key press. Returns the request to run when the user submits.
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<Dispatch<dyn Transport>> {
        if key.kind != KeyEventKind::Press {
            return None;
        }

        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return None;
        }

        match key.code {
            KeyCode::Enter => {
                if !self.can_submit() {
                    return None;
                }
                let dispatch = self.controller.dispatch().ok();
                self.sync_input();
                dispatch
            }
            KeyCode::Esc => {
                self.input.reset();
                self.controller.update_draft("");
                None
            }
            _ => {
                self.input.handle_event(&Event::Key(key));
                self.controller.update_draft(self.input.value());
                None
            }
        }
    }

    pub fn apply(&mut self, action: Action) {
        match action {
            Action::Tick => {
                if self.controller.is_pending() {
                    self.spinner_frame = self.spinner_frame.wrapping_add(1);
                }
            }
            Action::Resolved(resolution) => {
                self.controller.resolve(resolution);
                self.sync_input();
            }
        }
    }

    // The controller may clear the draft on submit.
    fn sync_input(&mut self) {
        if self.input.value() != self.controller.draft() {
            self.input = Input::new(self.controller.draft().to_string());
        }
    }
}
