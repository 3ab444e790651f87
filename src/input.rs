use crate::sim::Controls;

/// One-shot actions triggered on key press.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Start,
    Pause,
    ToggleDebug,
    ToggleMinimap,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Held {
    Left,
    Right,
    Thrust,
    Fire,
}

fn held_for(key: &str) -> Option<Held> {
    match key {
        "ArrowLeft" | "a" | "A" => Some(Held::Left),
        "ArrowRight" | "d" | "D" => Some(Held::Right),
        "ArrowUp" | "w" | "W" => Some(Held::Thrust),
        " " | "Spacebar" => Some(Held::Fire),
        _ => None,
    }
}

fn command_for(key: &str) -> Option<Command> {
    match key {
        "Enter" => Some(Command::Start),
        "p" | "P" | "Escape" => Some(Command::Pause),
        "F3" | "`" => Some(Command::ToggleDebug),
        "m" | "M" => Some(Command::ToggleMinimap),
        _ => None,
    }
}

/// Keyboard state fed from DOM `key` strings. Keys we do not know about
/// are ignored.
#[derive(Debug, Default)]
pub struct InputState {
    controls: Controls,
}

impl InputState {
    pub fn controls(&self) -> Controls {
        self.controls
    }

    /// Whether the browser default for this key should be suppressed.
    pub fn is_game_key(key: &str) -> bool {
        held_for(key).is_some() || command_for(key).is_some()
    }

    pub fn key_down(&mut self, key: &str, repeat: bool) -> Option<Command> {
        if let Some(held) = held_for(key) {
            self.set(held, true);
            return None;
        }
        if repeat {
            return None;
        }
        command_for(key)
    }

    pub fn key_up(&mut self, key: &str) {
        if let Some(held) = held_for(key) {
            self.set(held, false);
        }
    }

    pub fn release_all(&mut self) {
        self.controls = Controls::default();
    }

    fn set(&mut self, held: Held, down: bool) {
        match held {
            Held::Left => self.controls.left = down,
            Held::Right => self.controls.right = down,
            Held::Thrust => self.controls.thrust = down,
            Held::Fire => self.controls.fire = down,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn held_keys_track_press_and_release() {
        let mut input = InputState::default();
        assert_eq!(input.key_down("ArrowLeft", false), None);
        assert_eq!(input.key_down("w", false), None);
        assert_eq!(input.key_down(" ", true), None);
        let c = input.controls();
        assert!(c.left && c.thrust && c.fire && !c.right);

        input.key_up("ArrowLeft");
        input.key_up("W");
        assert!(!input.controls().left);
        assert!(!input.controls().thrust);

        input.release_all();
        assert_eq!(input.controls(), Controls::default());
    }

    #[test]
    fn commands_fire_once() {
        let mut input = InputState::default();
        assert_eq!(input.key_down("Enter", false), Some(Command::Start));
        assert_eq!(input.key_down("Enter", true), None);
        assert_eq!(input.key_down("Escape", false), Some(Command::Pause));
        assert_eq!(input.key_down("F3", false), Some(Command::ToggleDebug));
        assert_eq!(input.key_down("m", false), Some(Command::ToggleMinimap));
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let mut input = InputState::default();
        assert_eq!(input.key_down("", false), None);
        assert_eq!(input.key_down("Unidentified", false), None);
        assert_eq!(input.key_down("ö", false), None);
        input.key_up("Tab");
        assert_eq!(input.controls(), Controls::default());
        assert!(!InputState::is_game_key("Tab"));
        assert!(InputState::is_game_key("ArrowUp"));
    }
}
