//! Table output formatting

use tabled::{
    Table, Tabled,
    settings::{Alignment, Modify, Style, object::Rows},
};

/// Format rows as a rounded table, or `empty` when there are none
pub fn format_table<T: Tabled>(data: &[T], empty: &str) -> String {
    if data.is_empty() {
        return empty.to_string();
    }

    let mut table = Table::new(data);
    table
        .with(Style::rounded())
        .with(Modify::new(Rows::first()).with(Alignment::center()));

    table.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Tabled)]
    struct Row {
        #[tabled(rename = "IATA")]
        iata: String,
        #[tabled(rename = "NAME")]
        name: String,
    }

    #[test]
    fn test_empty_message() {
        let rows: Vec<Row> = vec![];
        assert_eq!(format_table(&rows, "No airports found."), "No airports found.");
    }

    #[test]
    fn test_rows_and_headers() {
        let rows = vec![
            Row {
                iata: "BOG".to_string(),
                name: "El Dorado".to_string(),
            },
            Row {
                iata: "JFK".to_string(),
                name: "John F Kennedy".to_string(),
            },
        ];

        let result = format_table(&rows, "");

        assert!(result.contains("IATA"));
        assert!(result.contains("El Dorado"));
        assert!(result.contains("John F Kennedy"));
        assert!(result.contains('╭'));
    }
}
