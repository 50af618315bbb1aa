/// Canonical form used to compare spreadsheet headers against the alias tables.
pub(crate) fn normalize_header(value: &str) -> String {
    let cleaned = value.replace(['\u{feff}', '\u{200b}', '\u{200f}', '\u{200e}'], "");
    let collapsed = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed.to_lowercase()
}

/// Cell text with surrounding whitespace and invisible marks removed.
pub(crate) fn clean_cell(value: &str) -> String {
    value
        .replace(['\u{feff}', '\u{200b}', '\u{200f}', '\u{200e}'], "")
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_header_strips_marks_and_case() {
        assert_eq!(normalize_header("\u{feff}Preferred   Field "), "preferred field");
        assert_eq!(normalize_header("\u{200f}עיר  מגורים"), "עיר מגורים");
    }

    #[test]
    fn clean_cell_trims() {
        assert_eq!(clean_cell("  Haifa\u{200b} "), "Haifa");
        assert_eq!(clean_cell("   "), "");
    }
}
