use crate::error::{Result, SurveyError};
use serde::Serialize;
use std::path::Path;
use tabled::{settings::Style, Table, Tabled};
use tracing::debug;

pub fn write_csv<T: Serialize>(path: impl AsRef<Path>, rows: &[T]) -> Result<()> {
    let path = path.as_ref();
    let mut wtr = csv::Writer::from_path(path)?;
    for r in rows {
        wtr.serialize(r)?;
    }
    wtr.flush().map_err(|source| SurveyError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), rows = rows.len(), "csv written");
    Ok(())
}

pub fn write_json<T: Serialize>(path: impl AsRef<Path>, value: &T) -> Result<()> {
    let path = path.as_ref();
    let s = serde_json::to_string_pretty(value)?;
    std::fs::write(path, s).map_err(|source| SurveyError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(())
}

/// Markdown table of the first `max_rows` rows.
pub fn render_table<T>(rows: &[T], max_rows: usize) -> Option<String>
where
    T: Tabled + Clone,
{
    let slice: Vec<T> = rows.iter().take(max_rows).cloned().collect();
    if slice.is_empty() {
        return None;
    }
    Some(Table::new(slice).with(Style::markdown()).to_string())
}

pub fn preview_table_rows<T>(rows: &[T], max_rows: usize)
where
    T: Tabled + Clone,
{
    match render_table(rows, max_rows) {
        Some(table) => println!("{}\n", table),
        None => println!("(no rows)\n"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SuggestionRow;

    fn row(category: &str) -> SuggestionRow {
        SuggestionRow {
            category: category.to_string(),
            category_pct: 50,
            mentions: 2,
            suggestion: "Mejorar la app".to_string(),
            suggestion_pct: 25,
            priority: "medium".to_string(),
            sentiment: "+1 / -0 / =1".to_string(),
        }
    }

    #[test]
    fn csv_has_header_and_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        write_csv(&path, &[row("Productos y Tasas"), row("Horarios y Disponibilidad")]).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("Category,CategoryPct,Mentions,Suggestion,SuggestionPct,Priority,Sentiment")
        );
        assert_eq!(
            lines.next(),
            Some("Productos y Tasas,50,2,Mejorar la app,25,medium,+1 / -0 / =1")
        );
        assert_eq!(lines.count(), 1);
    }

    #[test]
    fn json_write_to_missing_dir_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("summary.json");
        let err = write_json(&path, &serde_json::json!({ "nps": 10 })).unwrap_err();
        assert!(matches!(err, SurveyError::Io { .. }));
    }

    #[test]
    fn table_is_capped() {
        let rows = vec![row("a"), row("b"), row("c")];
        let table = render_table(&rows, 2).unwrap();
        assert!(table.contains("| a "));
        assert!(!table.contains("| c "));
        assert!(render_table::<SuggestionRow>(&[], 2).is_none());
    }
}
