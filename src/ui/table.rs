//! Record Table: the current page as aligned text columns.

use crate::model::{Record, RecordId};

const HEADERS: [&str; 4] = ["ID", "Name", "Email", "Department"];

/// Shown in place of the table while a remote call is outstanding.
pub const BUSY_INDICATOR: &str = "Loading users...";

/// What a row affordance asks the controller to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableAction {
    Edit(Record),
    Delete(RecordId),
}

/// Renders a page of records and resolves row actions against it.
#[derive(Debug, Clone, Copy)]
pub struct RecordTable<'a> {
    records: &'a [Record],
    loading: bool,
}

impl<'a> RecordTable<'a> {
    pub fn new(records: &'a [Record], loading: bool) -> Self {
        Self { records, loading }
    }

    fn cells(record: &Record) -> [String; 4] {
        [
            record.id.as_ref().map(ToString::to_string).unwrap_or_default(),
            record.name.clone(),
            record.email.clone(),
            record.department.clone(),
        ]
    }

    pub fn render(&self) -> String {
        if self.loading {
            return format!("{BUSY_INDICATOR}\n");
        }

        let rows: Vec<[String; 4]> = self.records.iter().map(Self::cells).collect();
        let mut widths = HEADERS.map(str::len);
        for row in &rows {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.chars().count());
            }
        }

        let line = |cells: [&str; 4]| {
            let padded: Vec<String> = cells
                .iter()
                .zip(widths)
                .map(|(cell, width)| format!("{cell:<width$}"))
                .collect();
            format!("| {} |\n", padded.join(" | "))
        };
        let rule = format!(
            "|{}|\n",
            widths
                .map(|width| "-".repeat(width + 2))
                .join("|")
        );

        let mut out = line(HEADERS);
        out.push_str(&rule);
        if rows.is_empty() {
            out.push_str("(no users on this page)\n");
        }
        for row in &rows {
            out.push_str(&line([&row[0], &row[1], &row[2], &row[3]]));
        }
        out
    }

    /// Edit affordance for the row with `id`, if it is on this page.
    pub fn edit(&self, id: &RecordId) -> Option<TableAction> {
        self.records
            .iter()
            .find(|record| record.has_id(id))
            .map(|record| TableAction::Edit(record.clone()))
    }

    /// Delete affordance for the row with `id`, if it is on this page.
    pub fn delete(&self, id: &RecordId) -> Option<TableAction> {
        self.records
            .iter()
            .any(|record| record.has_id(id))
            .then(|| TableAction::Delete(id.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page() -> Vec<Record> {
        vec![
            Record::new("Leanne Graham", "Sincere@april.biz", "Romaguera-Crona").with_id(1),
            Record::new("Ervin Howell", "Shanna@melissa.tv", "").with_id(2),
        ]
    }

    #[test]
    fn renders_header_and_one_line_per_record() {
        let records = page();
        let rendered = RecordTable::new(&records, false).render();
        let lines: Vec<&str> = rendered.lines().collect();

        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("| ID | Name"));
        assert!(lines[2].contains("Leanne Graham"));
        assert!(lines[3].contains("Shanna@melissa.tv"));
        assert_eq!(lines[2].len(), lines[3].len());
    }

    #[test]
    fn loading_shows_busy_indicator_instead_of_rows() {
        let records = page();
        let rendered = RecordTable::new(&records, true).render();
        assert_eq!(rendered.trim(), BUSY_INDICATOR);
    }

    #[test]
    fn empty_page_says_so() {
        assert!(RecordTable::new(&[], false).render().contains("no users"));
    }

    #[test]
    fn row_actions_only_for_rows_on_page() {
        let records = page();
        let table = RecordTable::new(&records, false);

        assert_eq!(
            table.delete(&RecordId::from(2)),
            Some(TableAction::Delete(RecordId::from(2)))
        );
        assert!(matches!(table.edit(&RecordId::from(1)), Some(TableAction::Edit(r)) if r.name == "Leanne Graham"));
        assert_eq!(table.delete(&RecordId::from(9)), None);
    }
}
