//! Export and import screens.

use std::io;

use chrono::{Local, NaiveDateTime};
use tabula_core::TableSchema;
use tabula_sqlite::ExportFormat;
use tracing::warn;

use crate::console::Console;
use crate::menu::choose;
use crate::session::Session;

/// Default export file name: `<table>-<YYYYmmdd-HHMMSS>.<ext>`.
pub fn export_file_name(table: &str, format: ExportFormat, at: NaiveDateTime) -> String {
    format!(
        "{table}-{}.{}",
        at.format("%Y%m%d-%H%M%S"),
        format.extension()
    )
}

/// Writes every row of the table to a file in the chosen format.
///
/// A blank file name uses a timestamped name in the export directory.
pub fn export<C: Console>(session: &mut Session<C>, schema: &TableSchema) -> io::Result<()> {
    let formats: Vec<(String, ExportFormat)> = ExportFormat::ALL
        .iter()
        .map(|format| (format.to_string(), *format))
        .collect();
    let title = format!("Export {} as", schema.name);
    let Some(format) = choose(&mut session.console, title, formats)? else {
        return Ok(());
    };

    let dir = session.config.export_dir(&session.workdir);
    let default = dir.join(export_file_name(
        &schema.name,
        format,
        Local::now().naive_local(),
    ));
    let Some(answer) = session.ask(&format!("File [{}]", default.display()))? else {
        return Ok(());
    };
    let path = if answer.trim().is_empty() {
        if let Err(err) = std::fs::create_dir_all(&dir) {
            return session.notify(&format!("Cannot create {}: {err}", dir.display()));
        }
        default
    } else {
        session.resolve(&answer)
    };

    match session.transfer().export_to_path(schema, format, &path) {
        Ok(rows) => session.notify(&format!("Exported {rows} row(s) to {}.", path.display())),
        Err(err) => {
            warn!(table = %schema.name, path = %path.display(), %err, "export failed");
            session.notify(&format!("Export failed: {err}"))
        }
    }
}

/// Loads a CSV file into the table in one transaction.
///
/// The first line is a header; fields map onto the columns in order. On any
/// failure nothing is imported.
pub fn import<C: Console>(session: &mut Session<C>, schema: &TableSchema) -> io::Result<()> {
    let label = format!("CSV file to import into {}", schema.name);
    let Some(answer) = session.ask(&label)? else {
        return Ok(());
    };
    if answer.trim().is_empty() {
        return Ok(());
    }
    let path = session.resolve(&answer);

    match session.transfer().import_csv_path(schema, &path) {
        Ok(report) => session.notify(&format!(
            "Imported {} row(s) into {}.",
            report.rows, schema.name
        )),
        Err(err) => {
            warn!(table = %schema.name, path = %path.display(), %err, "import failed");
            session.notify(&format!("Import failed, nothing was imported: {err}"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_export_file_name() {
        let at = NaiveDate::from_ymd_opt(2024, 3, 9)
            .unwrap()
            .and_hms_opt(14, 5, 0)
            .unwrap();
        assert_eq!(
            export_file_name("people", ExportFormat::Markdown, at),
            "people-20240309-140500.md"
        );
        assert_eq!(
            export_file_name("people", ExportFormat::Csv, at),
            "people-20240309-140500.csv"
        );
    }
}
