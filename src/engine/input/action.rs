// Game action definitions and default key bindings

use winit::keyboard::KeyCode;

/// Everything a key can do in the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    // Flying
    TurnLeft,
    TurnRight,
    WorkLift,
    FastPolar,
    SlowPolar,

    // Camera
    CameraUser,
    CameraGaggle,
    CameraPlan,
    CameraTile,
    PanLeft,
    PanRight,
    PanForward,
    PanBack,

    // Weather
    CloudBaseHigh,
    CloudBaseLow,

    // Meta actions
    Pause,
    StartPlay,
    FastForward,
    Quit,
}

impl Action {
    /// Actions that keep acting while held and stop on release
    pub fn is_held(self) -> bool {
        matches!(self, Action::TurnLeft | Action::TurnRight)
    }
}

/// Default keyboard bindings
pub fn default_bindings() -> Vec<(KeyCode, Action)> {
    vec![
        (KeyCode::KeyA, Action::TurnLeft),
        (KeyCode::ArrowLeft, Action::TurnLeft),
        (KeyCode::KeyD, Action::TurnRight),
        (KeyCode::ArrowRight, Action::TurnRight),
        (KeyCode::Space, Action::WorkLift),
        (KeyCode::KeyW, Action::FastPolar),
        (KeyCode::ArrowUp, Action::FastPolar),
        (KeyCode::KeyS, Action::SlowPolar),
        (KeyCode::ArrowDown, Action::SlowPolar),
        (KeyCode::Digit1, Action::CameraUser),
        (KeyCode::Digit2, Action::CameraGaggle),
        (KeyCode::Digit3, Action::CameraPlan),
        (KeyCode::Digit4, Action::CameraTile),
        (KeyCode::KeyK, Action::PanLeft),
        (KeyCode::KeyL, Action::PanRight),
        (KeyCode::KeyM, Action::PanForward),
        (KeyCode::KeyN, Action::PanBack),
        (KeyCode::KeyH, Action::CloudBaseHigh),
        (KeyCode::KeyG, Action::CloudBaseLow),
        (KeyCode::KeyP, Action::Pause),
        (KeyCode::KeyY, Action::StartPlay),
        (KeyCode::KeyQ, Action::FastForward),
        (KeyCode::Escape, Action::Quit),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_equality() {
        assert_eq!(Action::WorkLift, Action::WorkLift);
        assert_ne!(Action::FastPolar, Action::SlowPolar);
    }

    #[test]
    fn test_only_turns_are_held() {
        assert!(Action::TurnLeft.is_held());
        assert!(Action::TurnRight.is_held());
        assert!(!Action::WorkLift.is_held());
        assert!(!Action::Pause.is_held());
    }

    #[test]
    fn test_turns_on_letters_and_arrows() {
        let bindings = default_bindings();
        let keys_for = |action: Action| {
            bindings
                .iter()
                .filter(|(_, a)| *a == action)
                .map(|(k, _)| *k)
                .collect::<Vec<_>>()
        };
        assert_eq!(keys_for(Action::TurnLeft), vec![KeyCode::KeyA, KeyCode::ArrowLeft]);
        assert_eq!(keys_for(Action::TurnRight), vec![KeyCode::KeyD, KeyCode::ArrowRight]);
        assert_eq!(keys_for(Action::Quit), vec![KeyCode::Escape]);
    }

    #[test]
    fn test_no_duplicate_keys() {
        let bindings = default_bindings();
        let mut seen = std::collections::HashSet::new();
        for (key, _) in bindings {
            assert!(seen.insert(key), "Duplicate key found in default bindings");
        }
    }
}
