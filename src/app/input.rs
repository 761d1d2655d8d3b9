use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCommand {
    Save,
    Quit,
    SwitchSection(i32),
    NextField,
    PrevField,
    /// Left/Right: cycle select options, accept suggestions.
    Cycle(i32),
    Confirm,
    Cancel,
    Backspace,
    ClearFile,
    Char(char),
    None,
}

pub fn classify(key: &KeyEvent) -> KeyCommand {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('s') | KeyCode::Char('S') => KeyCommand::Save,
            KeyCode::Char('q') | KeyCode::Char('Q') => KeyCommand::Quit,
            KeyCode::Char('c') | KeyCode::Char('C') => KeyCommand::Quit,
            KeyCode::Char('d') | KeyCode::Char('D') => KeyCommand::ClearFile,
            KeyCode::Tab => {
                let delta = if key.modifiers.contains(KeyModifiers::SHIFT) {
                    -1
                } else {
                    1
                };
                KeyCommand::SwitchSection(delta)
            }
            KeyCode::BackTab => KeyCommand::SwitchSection(-1),
            _ => KeyCommand::None,
        };
    }

    match key.code {
        KeyCode::PageDown => KeyCommand::SwitchSection(1),
        KeyCode::PageUp => KeyCommand::SwitchSection(-1),
        KeyCode::Tab | KeyCode::Down => KeyCommand::NextField,
        KeyCode::BackTab | KeyCode::Up => KeyCommand::PrevField,
        KeyCode::Left => KeyCommand::Cycle(-1),
        KeyCode::Right => KeyCommand::Cycle(1),
        KeyCode::Enter => KeyCommand::Confirm,
        KeyCode::Esc => KeyCommand::Cancel,
        KeyCode::Backspace => KeyCommand::Backspace,
        KeyCode::Delete => KeyCommand::ClearFile,
        KeyCode::Char(ch) => KeyCommand::Char(ch),
        _ => KeyCommand::None,
    }
}
