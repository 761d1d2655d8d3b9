use indexmap::IndexMap;

use crate::domain::catalog;

/// One sidebar entry. Entries with children toggle open and closed; leaves
/// may open the list screen of a record kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItem {
    pub key: &'static str,
    pub label: &'static str,
    pub kind: Option<&'static str>,
    pub children: Vec<MenuItem>,
}

impl MenuItem {
    pub fn leaf(key: &'static str, label: &'static str) -> Self {
        Self {
            key,
            label,
            kind: None,
            children: Vec::new(),
        }
    }

    pub fn records(key: &'static str, label: &'static str, kind: &'static str) -> Self {
        Self {
            kind: Some(kind),
            ..Self::leaf(key, label)
        }
    }

    pub fn group(key: &'static str, label: &'static str, children: Vec<MenuItem>) -> Self {
        Self {
            children,
            ..Self::leaf(key, label)
        }
    }

    pub fn is_group(&self) -> bool {
        !self.children.is_empty()
    }
}

pub fn default_menu() -> Vec<MenuItem> {
    vec![
        MenuItem::leaf("dashboard", "Dashboard"),
        MenuItem::group(
            "sales",
            "Sales",
            vec![
                MenuItem::records("orders", "Orders", catalog::ORDER),
                MenuItem::records("customers", "Customers", catalog::CUSTOMER),
                MenuItem::leaf("opportunities", "Opportunities"),
                MenuItem::leaf("quotes", "Quotes"),
            ],
        ),
        MenuItem::group(
            "inventory",
            "Inventory",
            vec![
                MenuItem::records("products", "Inventory", catalog::PRODUCT),
                MenuItem::leaf("brands", "Brand Management"),
                MenuItem::leaf("categories", "Category Management"),
                MenuItem::leaf("colors", "Color Management"),
                MenuItem::leaf("tax-codes", "Tax Code Management"),
                MenuItem::leaf("unit-types", "Unit Type Management"),
            ],
        ),
        MenuItem::group(
            "purchasing",
            "Purchasing",
            vec![
                MenuItem::leaf("purchase-orders", "Purchase Orders"),
                MenuItem::leaf("vendors", "Vendors"),
                MenuItem::leaf("receipts", "Receipts"),
                MenuItem::leaf("requisitions", "Requisitions"),
            ],
        ),
        MenuItem::group(
            "hr",
            "Human Resources",
            vec![
                MenuItem::records("employees", "Employees", catalog::EMPLOYEE),
                MenuItem::leaf("departments", "Departments"),
                MenuItem::leaf("leave", "Leave Management"),
            ],
        ),
        MenuItem::group(
            "finance",
            "Finance",
            vec![
                MenuItem::leaf("transactions", "Transactions"),
                MenuItem::leaf("invoices", "Invoices"),
            ],
        ),
        MenuItem::leaf("reports", "Reports"),
        MenuItem::leaf("calendar", "Calendar"),
        MenuItem::leaf("settings", "Settings"),
    ]
}

/// A sidebar row after expansion is applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuLine<'a> {
    pub depth: usize,
    pub item: &'a MenuItem,
    pub expanded: bool,
}

/// Which groups of the sidebar are open. Unknown keys read as collapsed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MenuState {
    expanded: IndexMap<String, bool>,
}

impl MenuState {
    pub fn toggle(&mut self, key: &str) -> bool {
        let entry = self.expanded.entry(key.to_string()).or_insert(false);
        *entry = !*entry;
        *entry
    }

    pub fn is_expanded(&self, key: &str) -> bool {
        self.expanded.get(key).copied().unwrap_or(false)
    }

    pub fn collapse_all(&mut self) {
        self.expanded.clear();
    }

    /// Flattens `items` into the rows currently shown.
    pub fn lines<'a>(&self, items: &'a [MenuItem]) -> Vec<MenuLine<'a>> {
        let mut lines = Vec::new();
        self.push_lines(items, 0, &mut lines);
        lines
    }

    fn push_lines<'a>(&self, items: &'a [MenuItem], depth: usize, out: &mut Vec<MenuLine<'a>>) {
        for item in items {
            let expanded = item.is_group() && self.is_expanded(item.key);
            out.push(MenuLine {
                depth,
                item,
                expanded,
            });
            if expanded {
                self.push_lines(&item.children, depth + 1, out);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggling_reveals_children() {
        let menu = default_menu();
        let mut state = MenuState::default();
        let collapsed = state.lines(&menu).len();
        assert_eq!(collapsed, menu.len());

        assert!(state.toggle("hr"));
        let lines = state.lines(&menu);
        assert_eq!(lines.len(), collapsed + 3);
        let employees = lines
            .iter()
            .find(|line| line.item.key == "employees")
            .unwrap();
        assert_eq!(employees.depth, 1);
        assert_eq!(employees.item.kind, Some(catalog::EMPLOYEE));

        assert!(!state.toggle("hr"));
        assert_eq!(state.lines(&menu).len(), collapsed);
    }

    #[test]
    fn collapse_all_closes_every_group() {
        let mut state = MenuState::default();
        state.toggle("sales");
        state.toggle("finance");
        state.collapse_all();
        assert!(!state.is_expanded("sales"));
        assert!(!state.is_expanded("finance"));
    }
}
