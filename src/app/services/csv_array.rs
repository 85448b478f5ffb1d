//! CSV-style array cell parsing.
//!
//! Spreadsheet authors write string arrays as comma-separated text inside a
//! single cell, with double quotes protecting elements that contain commas
//! and `""` escaping a literal quote. This parser is pure and knows nothing
//! about the surrounding pipeline.

/// Split a cell's text into array elements.
///
/// Commas inside double-quote pairs do not split; a doubled quote inside a
/// quoted segment becomes a literal quote; an unmatched quote simply toggles
/// the in-quotes state and is not an error. Elements are trimmed. Empty
/// input yields an empty vector.
pub fn parse(input: &str) -> Vec<String> {
    if input.is_empty() {
        return Vec::new();
    }

    let mut result = Vec::new();
    let mut in_quotes = false;
    let mut current = String::new();

    let chars: Vec<char> = input.chars().collect();
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];

        if c == '"' {
            if i + 1 < chars.len() && chars[i + 1] == '"' {
                // Escaped quote
                current.push('"');
                i += 1;
            } else {
                in_quotes = !in_quotes;
            }
        } else if c == ',' && !in_quotes {
            result.push(current.trim().to_string());
            current.clear();
        } else {
            current.push(c);
        }

        i += 1;
    }

    if !current.is_empty() {
        result.push(current.trim().to_string());
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_elements_round_trip() {
        let elements = vec!["fire", "ice", "poison"];
        let joined = elements.join(",");
        assert_eq!(parse(&joined), elements);
    }

    #[test]
    fn test_quoted_comma_preserved() {
        assert_eq!(parse(r#""a,b",c"#), vec!["a,b", "c"]);
    }

    #[test]
    fn test_escaped_quote() {
        assert_eq!(parse(r#""a""b",c"#), vec![r#"a"b"#, "c"]);
    }

    #[test]
    fn test_empty_input() {
        assert!(parse("").is_empty());
    }

    #[test]
    fn test_elements_are_trimmed() {
        assert_eq!(parse(" fire , ice "), vec!["fire", "ice"]);
    }

    #[test]
    fn test_unmatched_quote_is_not_an_error() {
        // The dangling quote swallows the rest into one element
        assert_eq!(parse(r#""a,b"#), vec!["a,b"]);
    }

    #[test]
    fn test_trailing_comma_drops_empty_tail() {
        assert_eq!(parse("a,b,"), vec!["a", "b"]);
    }

    #[test]
    fn test_single_element() {
        assert_eq!(parse("fire"), vec!["fire"]);
    }
}
