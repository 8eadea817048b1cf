use std::collections::VecDeque;

use bracket_terminal::prelude::VirtualKeyCode;

/// A decoded player intent.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlayerAction {
    Move { dx: i32, dy: i32 },
    Wait,
    Quit,
}

impl PlayerAction {
    pub const fn step(dx: i32, dy: i32) -> Self {
        Self::Move { dx, dy }
    }
}

/// Anything that can hand the engine at most one action per player turn.
pub trait InputSource {
    fn poll(&mut self) -> Option<PlayerAction>;
}

impl InputSource for Option<PlayerAction> {
    fn poll(&mut self) -> Option<PlayerAction> {
        self.take()
    }
}

impl InputSource for VecDeque<PlayerAction> {
    fn poll(&mut self) -> Option<PlayerAction> {
        self.pop_front()
    }
}

/// What a single keypress asks of the front end.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyCommand {
    Act(PlayerAction),
    DumpState,
}

/// Arrows move orthogonally; Q W A S cover the four diagonals.
pub fn command_for_key(key: VirtualKeyCode) -> Option<KeyCommand> {
    let action = match key {
        VirtualKeyCode::Up => PlayerAction::step(0, -1),
        VirtualKeyCode::Down => PlayerAction::step(0, 1),
        VirtualKeyCode::Left => PlayerAction::step(-1, 0),
        VirtualKeyCode::Right => PlayerAction::step(1, 0),
        VirtualKeyCode::Q => PlayerAction::step(-1, -1),
        VirtualKeyCode::W => PlayerAction::step(1, -1),
        VirtualKeyCode::A => PlayerAction::step(-1, 1),
        VirtualKeyCode::S => PlayerAction::step(1, 1),
        VirtualKeyCode::Period => PlayerAction::Wait,
        VirtualKeyCode::Escape => PlayerAction::Quit,
        VirtualKeyCode::P => return Some(KeyCommand::DumpState),
        _ => return None,
    };
    Some(KeyCommand::Act(action))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eight_directions_wait_and_quit() {
        let steps: Vec<_> = [
            VirtualKeyCode::Up,
            VirtualKeyCode::Down,
            VirtualKeyCode::Left,
            VirtualKeyCode::Right,
            VirtualKeyCode::Q,
            VirtualKeyCode::W,
            VirtualKeyCode::A,
            VirtualKeyCode::S,
        ]
        .into_iter()
        .filter_map(command_for_key)
        .collect();
        assert_eq!(steps.len(), 8);
        assert_eq!(
            command_for_key(VirtualKeyCode::Q),
            Some(KeyCommand::Act(PlayerAction::step(-1, -1)))
        );
        assert_eq!(
            command_for_key(VirtualKeyCode::Escape),
            Some(KeyCommand::Act(PlayerAction::Quit))
        );
        assert_eq!(
            command_for_key(VirtualKeyCode::Period),
            Some(KeyCommand::Act(PlayerAction::Wait))
        );
        assert_eq!(command_for_key(VirtualKeyCode::Z), None);
    }

    #[test]
    fn sources_yield_each_action_once() {
        let mut single = Some(PlayerAction::Wait);
        assert_eq!(single.poll(), Some(PlayerAction::Wait));
        assert_eq!(single.poll(), None);

        let mut queue = VecDeque::from(vec![PlayerAction::step(1, 0), PlayerAction::Quit]);
        assert_eq!(queue.poll(), Some(PlayerAction::step(1, 0)));
        assert_eq!(queue.poll(), Some(PlayerAction::Quit));
        assert_eq!(queue.poll(), None);
    }
}
