use crate::domain::{ColumnTable, Record};

/// Turns a column table into one record per row, in row order.
///
/// Every record carries every column name of the table.
pub fn columns_to_records(table: &ColumnTable) -> Vec<Record> {
    let mut records = vec![Record::new(); table.row_count()];
    for (name, values) in table.columns() {
        for (record, value) in records.iter_mut().zip(values) {
            record.insert(name.to_string(), *value);
        }
    }
    records
}
