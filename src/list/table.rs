use serde_json::Value;

use crate::domain::{InputKind, Record, RecordSchema, catalog, display_text, numeric};

use super::collection::RecordCollection;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CellFormat {
    #[default]
    Plain,
    /// Two decimals with a leading currency sign.
    Currency,
    Percent,
}

impl CellFormat {
    pub fn render(self, value: Option<&Value>) -> String {
        let Some(value) = value else {
            return String::new();
        };
        match self {
            CellFormat::Plain => display_text(value),
            CellFormat::Currency => format!("${:.2}", numeric(value)),
            CellFormat::Percent => format!("{}%", display_text(value)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableColumn {
    pub key: String,
    pub header: String,
    pub format: CellFormat,
}

impl TableColumn {
    pub fn new(key: impl Into<String>, header: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            header: header.into(),
            format: CellFormat::Plain,
        }
    }

    pub fn with_format(mut self, format: CellFormat) -> Self {
        self.format = format;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowAction {
    View,
    Edit,
    Delete,
}

/// Which row controls the table offers. A disabled slot hides its control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableActions {
    pub view: bool,
    pub edit: bool,
    pub delete: bool,
}

impl Default for TableActions {
    fn default() -> Self {
        Self {
            view: true,
            edit: true,
            delete: true,
        }
    }
}

impl TableActions {
    pub fn none() -> Self {
        Self {
            view: false,
            edit: false,
            delete: false,
        }
    }

    pub fn allows(&self, action: RowAction) -> bool {
        match action {
            RowAction::View => self.view,
            RowAction::Edit => self.edit,
            RowAction::Delete => self.delete,
        }
    }

    pub fn visible(&self) -> Vec<RowAction> {
        [RowAction::View, RowAction::Edit, RowAction::Delete]
            .into_iter()
            .filter(|action| self.allows(*action))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    pub key: String,
    pub cells: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataTable {
    pub columns: Vec<TableColumn>,
    pub actions: TableActions,
}

impl DataTable {
    pub fn new(columns: Vec<TableColumn>) -> Self {
        Self {
            columns,
            actions: TableActions::default(),
        }
    }

    pub fn with_actions(mut self, actions: TableActions) -> Self {
        self.actions = actions;
        self
    }

    pub fn row(&self, key: &str, record: &Record) -> TableRow {
        TableRow {
            key: key.to_string(),
            cells: self
                .columns
                .iter()
                .map(|column| column.format.render(record.get(&column.key)))
                .collect(),
        }
    }

    /// Rows whose rendered cells contain `query`, ignoring case. A blank
    /// query keeps every row.
    pub fn rows(&self, collection: &RecordCollection, query: &str) -> Vec<TableRow> {
        let needle = query.trim().to_lowercase();
        collection
            .iter()
            .map(|(key, record)| self.row(key, record))
            .filter(|row| {
                needle.is_empty()
                    || row
                        .cells
                        .iter()
                        .any(|cell| cell.to_lowercase().contains(&needle))
            })
            .collect()
    }
}

/// Columns the list view shows for a record kind. Kinds outside the catalog
/// get the identifier plus the first visible fields of the schema.
pub fn columns_for(schema: &RecordSchema) -> Vec<TableColumn> {
    use CellFormat::{Currency, Percent};
    match schema.kind() {
        catalog::EMPLOYEE => vec![
            TableColumn::new("id", "ID"),
            TableColumn::new("name", "Name"),
            TableColumn::new("position", "Position"),
            TableColumn::new("department", "Department"),
            TableColumn::new("salary", "Salary").with_format(Currency),
            TableColumn::new("status", "Status"),
        ],
        catalog::PRODUCT => vec![
            TableColumn::new("itemCode", "Item Code"),
            TableColumn::new("name", "Name"),
            TableColumn::new("category", "Category"),
            TableColumn::new("tradePrice", "Trade Price").with_format(Currency),
            TableColumn::new("discount", "Discount").with_format(Percent),
            TableColumn::new("finalPrice", "Final Price").with_format(Currency),
            TableColumn::new("stock", "Stock"),
            TableColumn::new("status", "Status"),
        ],
        catalog::CUSTOMER => vec![
            TableColumn::new("id", "ID"),
            TableColumn::new("name", "Name"),
            TableColumn::new("email", "Email"),
            TableColumn::new("phone", "Phone"),
            TableColumn::new("company", "Company"),
            TableColumn::new("status", "Status"),
        ],
        catalog::ORDER => vec![
            TableColumn::new("id", "Order ID"),
            TableColumn::new("customer", "Customer"),
            TableColumn::new("items", "Items"),
            TableColumn::new("total", "Total").with_format(Currency),
            TableColumn::new("status", "Status"),
        ],
        _ => {
            let id_key = schema.id_key();
            let mut columns = Vec::new();
            if let Some(field) = schema.field(id_key) {
                columns.push(TableColumn::new(id_key, field.label.clone()));
            }
            columns.extend(
                schema
                    .fields()
                    .filter(|field| !field.hidden && field.key != id_key)
                    .filter(|field| field.kind != InputKind::Password)
                    .filter(|field| field.kind.is_textual() || field.kind.is_numeric())
                    .take(5)
                    .map(|field| TableColumn::new(field.key.clone(), field.label.clone())),
            );
            columns
        }
    }
}
