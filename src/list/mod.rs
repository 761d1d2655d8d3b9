mod collection;
mod coordinator;
mod table;

pub use collection::{CollectionError, RecordCollection};
pub use coordinator::{ActiveSession, ListCoordinator, Reconciled};
pub use table::{
    CellFormat, DataTable, RowAction, TableActions, TableColumn, TableRow, columns_for,
};
