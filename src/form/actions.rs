#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormCommand {
    FocusNextField,
    FocusPrevField,
    FocusNextSection(i32),
    GoToSection(usize),
    FieldEdited { key: String, raw: String },
}
