use bracket_terminal::prelude::VirtualKeyCode;
use std::{
    fs::File,
    io::{self, BufRead, BufReader, Read},
    path::Path,
};

use crate::input::{InputSource, KeyCommand, PlayerAction, command_for_key};

/// Replays a keypress script. Each non-comment line is read one character per
/// keypress; blank lines and lines starting with `#` are skipped.
pub struct ScriptedInput {
    script_commands: Vec<VirtualKeyCode>,
    current_command_index: usize,
}

impl ScriptedInput {
    pub fn from_file<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        Self::from_reader(File::open(path)?)
    }

    pub fn from_reader<R: Read>(source: R) -> io::Result<Self> {
        let reader = BufReader::new(source);
        let mut script_commands = Vec::new();

        for line in reader.lines() {
            let line = line?;
            let trimmed_line = line.trim();
            if trimmed_line.is_empty() || trimmed_line.starts_with('#') {
                continue;
            }

            for char_code in trimmed_line.chars() {
                if let Some(key) = char_to_virtualkeycode(char_code) {
                    script_commands.push(key);
                } else {
                    log::warn!("unknown key in script: {char_code:?}");
                }
            }
        }

        Ok(Self {
            script_commands,
            current_command_index: 0,
        })
    }

    pub fn next_key(&mut self) -> Option<VirtualKeyCode> {
        let key = self.script_commands.get(self.current_command_index).copied()?;
        self.current_command_index += 1;
        Some(key)
    }

    /// The next key that means something, skipping unbound ones.
    pub fn next_command(&mut self) -> Option<KeyCommand> {
        while let Some(key) = self.next_key() {
            if let Some(command) = command_for_key(key) {
                return Some(command);
            }
        }
        None
    }

    pub fn remaining(&self) -> usize {
        self.script_commands.len() - self.current_command_index
    }
}

impl InputSource for ScriptedInput {
    /// Dump requests carry no action and are skipped here.
    fn poll(&mut self) -> Option<PlayerAction> {
        while let Some(command) = self.next_command() {
            if let KeyCommand::Act(action) = command {
                return Some(action);
            }
        }
        None
    }
}

fn char_to_virtualkeycode(c: char) -> Option<VirtualKeyCode> {
    match c {
        'k' | 'K' | '8' => Some(VirtualKeyCode::Up),
        'j' | 'J' | '2' => Some(VirtualKeyCode::Down),
        'h' | 'H' | '4' => Some(VirtualKeyCode::Left),
        'l' | 'L' | '6' => Some(VirtualKeyCode::Right),
        'y' | 'Y' | '7' => Some(VirtualKeyCode::Q),
        'u' | 'U' | '9' => Some(VirtualKeyCode::W),
        'b' | 'B' | '1' => Some(VirtualKeyCode::A),
        'n' | 'N' | '3' => Some(VirtualKeyCode::S),
        '.' | '5' => Some(VirtualKeyCode::Period), // wait
        'p' | 'P' => Some(VirtualKeyCode::P),      // dump state
        'q' | 'Q' | '\x1B' => Some(VirtualKeyCode::Escape),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comments_and_blank_lines_are_skipped() {
        let script = "# opening\n\nll.\n  # aside\nyq\n";
        let mut input = ScriptedInput::from_reader(script.as_bytes()).unwrap();
        assert_eq!(input.remaining(), 5);
        assert_eq!(input.next_key(), Some(VirtualKeyCode::Right));
        assert_eq!(input.next_key(), Some(VirtualKeyCode::Right));
        assert_eq!(input.next_key(), Some(VirtualKeyCode::Period));
        assert_eq!(input.next_key(), Some(VirtualKeyCode::Q));
        assert_eq!(input.next_key(), Some(VirtualKeyCode::Escape));
        assert_eq!(input.next_key(), None);
    }

    #[test]
    fn unknown_characters_are_dropped() {
        let mut input = ScriptedInput::from_reader("lzx!j".as_bytes()).unwrap();
        assert_eq!(input.remaining(), 2);
        assert_eq!(input.poll(), Some(PlayerAction::step(1, 0)));
        assert_eq!(input.poll(), Some(PlayerAction::step(0, 1)));
        assert_eq!(input.poll(), None);
    }

    #[test]
    fn polling_skips_dump_requests() {
        let mut input = ScriptedInput::from_reader("pn".as_bytes()).unwrap();
        assert_eq!(input.poll(), Some(PlayerAction::step(1, 1)));

        let mut input = ScriptedInput::from_reader("pn".as_bytes()).unwrap();
        assert_eq!(input.next_command(), Some(KeyCommand::DumpState));
    }
}
