// Input manager: key events in, queued action events out

use std::collections::{HashSet, VecDeque};

use super::action::Action;
use super::config::InputConfig;
use winit::event::{ElementState, KeyEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

/// An action starting or, for held actions, stopping
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionEvent {
    pub action: Action,
    pub pressed: bool,
}

/// Queues actions from key presses and keeps track of held actions
pub struct InputManager {
    config: InputConfig,
    held: HashSet<Action>,
    events: VecDeque<ActionEvent>,
}

impl InputManager {
    /// With the default key layout
    pub fn new() -> Self {
        Self::with_config(InputConfig::default())
    }

    pub fn with_config(config: InputConfig) -> Self {
        Self {
            config,
            held: HashSet::new(),
            events: VecDeque::new(),
        }
    }

    /// Process a keyboard event from winit
    pub fn process_keyboard_event(&mut self, event: &KeyEvent) {
        // Only physical keys are bound
        if let PhysicalKey::Code(code) = event.physical_key {
            self.handle_key(code, event.state, event.repeat);
        }
    }

    /// Map one key transition; repeats are ignored
    pub fn handle_key(&mut self, code: KeyCode, state: ElementState, repeat: bool) {
        let Some(action) = self.config.get_action(code) else {
            return;
        };

        match state {
            ElementState::Pressed => {
                if repeat {
                    return;
                }
                self.held.insert(action);
                self.events.push_back(ActionEvent { action, pressed: true });
            }
            ElementState::Released => {
                self.held.remove(&action);
                if action.is_held() {
                    self.events.push_back(ActionEvent { action, pressed: false });
                }
            }
        }
    }

    /// Take every queued event, oldest first
    pub fn drain(&mut self) -> impl Iterator<Item = ActionEvent> + '_ {
        self.events.drain(..)
    }

    /// Let go of every held key, e.g. when focus is lost and no key-up will come.
    ///
    /// Held actions get their release queued after anything already pending.
    pub fn release_all(&mut self) {
        for action in self.held.drain() {
            if action.is_held() {
                self.events.push_back(ActionEvent { action, pressed: false });
            }
        }
    }
}

impl Default for InputManager {
    fn default() -> Self {
        Self::new()
    }
}
