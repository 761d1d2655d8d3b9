use crate::domain::RecordSchema;

/// Which section of a form is visible, and which of its fields has focus.
/// Purely view state: moving never reads or touches the edit buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionNavigator {
    field_counts: Vec<usize>,
    section_index: usize,
    field_index: usize,
}

impl SectionNavigator {
    /// Counts the rendered (non-hidden) fields of every section.
    pub fn new(schema: &RecordSchema) -> Self {
        let field_counts = schema
            .sections()
            .iter()
            .map(|section| section.visible_fields().count())
            .collect();
        Self::from_counts(field_counts)
    }

    pub fn from_counts(field_counts: Vec<usize>) -> Self {
        Self {
            field_counts,
            section_index: 0,
            field_index: 0,
        }
    }

    pub fn section_count(&self) -> usize {
        self.field_counts.len()
    }

    pub fn current(&self) -> usize {
        self.section_index
    }

    pub fn field_index(&self) -> usize {
        self.field_index
    }

    /// Jumps to `index`, clamped to the last section.
    pub fn go_to(&mut self, index: usize) {
        if self.field_counts.is_empty() {
            return;
        }
        let bounded = index.min(self.field_counts.len() - 1);
        if bounded != self.section_index {
            self.section_index = bounded;
            self.field_index = 0;
        }
    }

    /// Moves `delta` sections forward or back, wrapping around.
    pub fn step(&mut self, delta: i32) {
        let len = self.field_counts.len() as i32;
        if len == 0 {
            return;
        }
        let next = (self.section_index as i32 + delta).rem_euclid(len);
        self.go_to(next as usize);
    }

    pub fn next(&mut self) {
        self.step(1);
    }

    pub fn prev(&mut self) {
        self.step(-1);
    }

    /// Next field; past the last field of a section, continues on the next
    /// section that has fields.
    pub fn focus_next_field(&mut self) {
        let Some(count) = self.field_counts.get(self.section_index).copied() else {
            return;
        };
        if self.field_index + 1 < count {
            self.field_index += 1;
            return;
        }
        if let Some(section) = self.find_populated(1) {
            self.section_index = section;
            self.field_index = 0;
        }
    }

    pub fn focus_prev_field(&mut self) {
        if self.field_index > 0 {
            self.field_index -= 1;
            return;
        }
        if let Some(section) = self.find_populated(-1) {
            self.section_index = section;
            self.field_index = self.field_counts[section].saturating_sub(1);
        }
    }

    pub fn focus_field(&mut self, index: usize) {
        let count = self
            .field_counts
            .get(self.section_index)
            .copied()
            .unwrap_or_default();
        self.field_index = index.min(count.saturating_sub(1));
    }

    fn find_populated(&self, direction: i32) -> Option<usize> {
        let len = self.field_counts.len() as i32;
        (1..=len)
            .map(|offset| (self.section_index as i32 + direction * offset).rem_euclid(len) as usize)
            .find(|candidate| self.field_counts[*candidate] > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn go_to_clamps_and_resets_field_focus() {
        let mut nav = SectionNavigator::from_counts(vec![3, 2, 4]);
        nav.focus_field(2);
        nav.go_to(9);
        assert_eq!(nav.current(), 2);
        assert_eq!(nav.field_index(), 0);
    }

    #[test]
    fn stepping_wraps_both_ways() {
        let mut nav = SectionNavigator::from_counts(vec![1, 1, 1]);
        nav.prev();
        assert_eq!(nav.current(), 2);
        nav.next();
        assert_eq!(nav.current(), 0);
    }

    #[test]
    fn field_focus_skips_empty_sections() {
        let mut nav = SectionNavigator::from_counts(vec![2, 0, 1]);
        nav.focus_next_field();
        nav.focus_next_field();
        assert_eq!((nav.current(), nav.field_index()), (2, 0));
        nav.focus_next_field();
        assert_eq!((nav.current(), nav.field_index()), (0, 0));
        nav.focus_prev_field();
        assert_eq!((nav.current(), nav.field_index()), (2, 0));
        nav.focus_prev_field();
        assert_eq!((nav.current(), nav.field_index()), (0, 1));
    }
}
