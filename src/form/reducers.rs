use super::{
    actions::FormCommand, error::FormError, navigator::SectionNavigator, session::FormSession,
};

pub fn apply_command(navigator: &mut SectionNavigator, command: &FormCommand) {
    match command {
        FormCommand::FocusNextField => navigator.focus_next_field(),
        FormCommand::FocusPrevField => navigator.focus_prev_field(),
        FormCommand::FocusNextSection(delta) => navigator.step(*delta),
        FormCommand::GoToSection(index) => navigator.go_to(*index),
        FormCommand::FieldEdited { .. } => {}
    }
}

/// Routes form commands: navigation goes to the navigator, edits to the session.
pub struct FormEngine<'a> {
    session: &'a mut FormSession,
    navigator: &'a mut SectionNavigator,
}

impl<'a> FormEngine<'a> {
    pub fn new(session: &'a mut FormSession, navigator: &'a mut SectionNavigator) -> Self {
        Self { session, navigator }
    }

    pub fn dispatch(&mut self, command: FormCommand) -> Result<(), FormError> {
        match command {
            FormCommand::FieldEdited { key, raw } => self.session.set_field(&key, &raw),
            other => {
                apply_command(self.navigator, &other);
                Ok(())
            }
        }
    }
}
