//! Turns data rows into `.strings` lines.

use crate::{
    cell::ValueResolver,
    config::Config,
    header::ColumnBinding,
    xlsx::{Row, SharedStrings},
};

/// Lines produced by one data row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslatedRow {
    pub key: String,
    /// `(language code, formatted line)` in language code order.
    pub lines: Vec<(String, String)>,
}

/// Escapes double quotes that are not already preceded by a backslash.
///
/// ```
/// use locgen::translate::escape_quotes;
///
/// assert_eq!(escape_quotes(r#"<a href="x">y</a>"#), r#"<a href=\"x\">y</a>"#);
/// assert_eq!(escape_quotes(r#"\"kept\""#), r#"\"kept\""#);
/// ```
pub fn escape_quotes(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut previous = None;
    for c in text.chars() {
        if c == '"' && previous != Some('\\') {
            result.push('\\');
        }
        result.push(c);
        previous = Some(c);
    }
    result
}

/// Formats one `"key" = "value";` line, newline included. Only the value is escaped.
pub fn format_line(key: &str, value: &str) -> String {
    format!("\"{}\" = \"{}\";\n", key, escape_quotes(value))
}

/// Produces the lines of a data row.
///
/// Returns `None` when the key cell is missing or empty. Languages whose cell
/// is missing or empty are left out without affecting the others.
pub fn translate_row(
    row: &Row,
    binding: &ColumnBinding,
    config: &Config,
    shared: Option<&SharedStrings>,
    resolver: &mut ValueResolver,
) -> Option<TranslatedRow> {
    let key = resolver
        .resolve(row.cell(&binding.key_column), shared)
        .filter(|key| !key.is_empty())?;

    let lines = config
        .languages
        .keys()
        .filter_map(|code| {
            let column = binding.column_for(code)?;
            let value = resolver
                .resolve(row.cell(column), shared)
                .filter(|value| !value.is_empty())?;
            Some((code.clone(), format_line(&key, &value)))
        })
        .collect();

    Some(TranslatedRow { key, lines })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xlsx::Cell;
    use std::collections::BTreeMap;

    fn binding() -> ColumnBinding {
        ColumnBinding {
            key_column: "A".to_string(),
            languages: BTreeMap::from([
                ("en".to_string(), "B".to_string()),
                ("fr".to_string(), "C".to_string()),
            ]),
        }
    }

    fn config() -> Config {
        Config::new("Key", [("en", "English"), ("fr", "French")])
    }

    #[test]
    fn test_escape_plain_quotes() {
        let cases = [
            ("Simple text", "Simple text"),
            ("Text with \"quotes\"", "Text with \\\"quotes\\\""),
            (
                "HTML: <div class=\"test\">content</div>",
                "HTML: <div class=\\\"test\\\">content</div>",
            ),
            (
                "Multiple \"quotes\" in \"different\" places",
                "Multiple \\\"quotes\\\" in \\\"different\\\" places",
            ),
            ("\"", "\\\""),
            ("", ""),
        ];
        for (input, expected) in cases {
            assert_eq!(escape_quotes(input), expected, "input: {input}");
        }
    }

    #[test]
    fn test_escape_keeps_escaped_quotes() {
        let cases = [
            (
                "Text with \\\"already escaped\\\" quotes",
                "Text with \\\"already escaped\\\" quotes",
            ),
            (
                "Mixed \\\"escaped\\\" and \"unescaped\" quotes",
                "Mixed \\\"escaped\\\" and \\\"unescaped\\\" quotes",
            ),
            ("\\\"All already escaped\\\"", "\\\"All already escaped\\\""),
            ("No quotes at all", "No quotes at all"),
        ];
        for (input, expected) in cases {
            assert_eq!(escape_quotes(input), expected, "input: {input}");
        }
    }

    #[test]
    fn test_escape_is_idempotent() {
        for input in [
            "<a href=\"x\">y</a>",
            "\"\"",
            "a \\\"b\\\" \"c\"",
            "trailing backslash \\",
        ] {
            let once = escape_quotes(input);
            assert_eq!(escape_quotes(&once), once, "input: {input}");
        }
    }

    #[test]
    fn test_format_line() {
        assert_eq!(
            format_line("greeting", "Hello"),
            "\"greeting\" = \"Hello\";\n"
        );
        assert_eq!(
            format_line("key", "<a href=\"x\">y</a>"),
            "\"key\" = \"<a href=\\\"x\\\">y</a>\";\n"
        );
        // keys are written verbatim
        assert_eq!(format_line("a\"b", "v"), "\"a\"b\" = \"v\";\n");
    }

    #[test]
    fn test_translate_full_row() {
        let row = Row::new(
            2,
            vec![
                Cell::text("A", 2, "greeting"),
                Cell::text("B", 2, "Hello"),
                Cell::text("C", 2, "Bonjour"),
            ],
        );
        let translated =
            translate_row(&row, &binding(), &config(), None, &mut ValueResolver::new()).unwrap();
        assert_eq!(translated.key, "greeting");
        assert_eq!(
            translated.lines,
            vec![
                ("en".to_string(), "\"greeting\" = \"Hello\";\n".to_string()),
                ("fr".to_string(), "\"greeting\" = \"Bonjour\";\n".to_string()),
            ]
        );
    }

    #[test]
    fn test_translate_skips_rows_without_key() {
        let missing = Row::new(3, vec![Cell::text("B", 3, "Hello")]);
        let empty = Row::new(
            4,
            vec![Cell::text("A", 4, ""), Cell::text("B", 4, "Hello")],
        );
        let mut resolver = ValueResolver::new();
        assert_eq!(
            translate_row(&missing, &binding(), &config(), None, &mut resolver),
            None
        );
        assert_eq!(
            translate_row(&empty, &binding(), &config(), None, &mut resolver),
            None
        );
    }

    #[test]
    fn test_translate_skips_empty_language_only() {
        let row = Row::new(
            5,
            vec![
                Cell::text("A", 5, "farewell"),
                Cell::text("B", 5, ""),
                Cell::text("C", 5, "Au revoir"),
            ],
        );
        let translated =
            translate_row(&row, &binding(), &config(), None, &mut ValueResolver::new()).unwrap();
        assert_eq!(
            translated.lines,
            vec![(
                "fr".to_string(),
                "\"farewell\" = \"Au revoir\";\n".to_string()
            )]
        );
    }

    #[test]
    fn test_translate_numeric_cells_are_literal() {
        let row = Row::new(
            6,
            vec![
                Cell::number("A", 6, "404"),
                Cell::number("B", 6, "1.5"),
            ],
        );
        let translated =
            translate_row(&row, &binding(), &config(), None, &mut ValueResolver::new()).unwrap();
        assert_eq!(translated.key, "404");
        assert_eq!(
            translated.lines,
            vec![("en".to_string(), "\"404\" = \"1.5\";\n".to_string())]
        );
    }
}
