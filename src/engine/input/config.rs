// Key binding configuration

use super::action::{default_bindings, Action};
use std::collections::HashMap;
use winit::keyboard::KeyCode;

/// Maps keys to game actions
#[derive(Debug, Clone)]
pub struct InputConfig {
    bindings: HashMap<KeyCode, Action>,
}

impl InputConfig {
    pub fn from_bindings(bindings: Vec<(KeyCode, Action)>) -> Self {
        let mut config = Self {
            bindings: HashMap::new(),
        };
        for (key, action) in bindings {
            config.bind(key, action);
        }
        config
    }

    /// Bind a key to an action, replacing whatever it did before
    pub fn bind(&mut self, key: KeyCode, action: Action) {
        self.bindings.insert(key, action);
    }

    pub fn get_action(&self, key: KeyCode) -> Option<Action> {
        self.bindings.get(&key).copied()
    }
}

impl Default for InputConfig {
    /// The default key layout
    fn default() -> Self {
        Self::from_bindings(default_bindings())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = InputConfig::default();
        assert_eq!(config.get_action(KeyCode::Space), Some(Action::WorkLift));
        assert_eq!(config.get_action(KeyCode::Digit3), Some(Action::CameraPlan));
        assert_eq!(config.get_action(KeyCode::KeyZ), None);
    }

    #[test]
    fn test_turns_on_letters_and_arrows() {
        let config = InputConfig::default();
        assert_eq!(config.get_action(KeyCode::KeyA), Some(Action::TurnLeft));
        assert_eq!(config.get_action(KeyCode::ArrowLeft), Some(Action::TurnLeft));
        assert_eq!(config.get_action(KeyCode::ArrowUp), Some(Action::FastPolar));
    }

    #[test]
    fn test_bind_replaces_previous_action() {
        let mut config = InputConfig::from_bindings(vec![(KeyCode::KeyA, Action::TurnLeft)]);
        config.bind(KeyCode::KeyA, Action::TurnRight);
        config.bind(KeyCode::Enter, Action::StartPlay);

        assert_eq!(config.get_action(KeyCode::KeyA), Some(Action::TurnRight));
        assert_eq!(config.get_action(KeyCode::Enter), Some(Action::StartPlay));
    }
}
