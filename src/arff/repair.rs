// Comma repair for the dataset-key literal
//
// Weka writes filtered dataset names such as
//   @attribute Key_Dataset {'iris-weka.filters.unsupervised.attribute.Remove-R1,2'}
// Readers that do not honour quotes inside nominal lists choke on the embedded
// commas, so the literal is rewritten without them. Only the declaration and
// the dataset column of each data row are touched.

use super::parser::{split_raw, unquote_field};
use regex::Regex;
use std::sync::OnceLock;

fn attribute_regex() -> &'static Regex {
    static ATTRIBUTE: OnceLock<Regex> = OnceLock::new();
    ATTRIBUTE.get_or_init(|| Regex::new(r"(?i)^\s*@attribute\b").expect("attribute regex is valid"))
}

fn data_regex() -> &'static Regex {
    static DATA: OnceLock<Regex> = OnceLock::new();
    DATA.get_or_init(|| Regex::new(r"(?i)^\s*@data\b").expect("data regex is valid"))
}

/// Outcome of a repair pass
#[derive(Debug, Clone, PartialEq)]
pub struct Repair {
    /// Repaired text (identical to the input when nothing was rewritten)
    pub text: String,
    /// The comma-bearing literal that was found, if any
    pub literal: Option<String>,
    /// Number of occurrences rewritten, declaration included
    pub replaced: usize,
}

impl Repair {
    fn unchanged(raw: &str) -> Self {
        Self {
            text: raw.to_string(),
            literal: None,
            replaced: 0,
        }
    }
}

/// Remove commas from the nominal literal declared for `attribute`
///
/// # Example
/// ```
/// use arff_anova::arff::repair_dataset_commas;
///
/// let raw = "@relation r\n@attribute Key_Dataset {'a,b,c'}\n@data\n'a,b,c'\n";
/// let repair = repair_dataset_commas(raw, "Key_Dataset");
/// assert_eq!(repair.text, "@relation r\n@attribute Key_Dataset {'abc'}\n@data\n'abc'\n");
/// assert_eq!(repair.replaced, 2);
/// ```
pub fn repair_dataset_commas(raw: &str, attribute: &str) -> Repair {
    let declaration = match Regex::new(&format!(
        r#"^\s*(?i:@attribute)\s+['"]?{}['"]?\s*\{{(.*)\}}\s*$"#,
        regex::escape(attribute)
    )) {
        Ok(re) => re,
        Err(e) => {
            tracing::warn!("Cannot build declaration pattern for {}: {}", attribute, e);
            return Repair::unchanged(raw);
        }
    };
    let any_attribute = attribute_regex();
    let data_directive = data_regex();

    // Locate the declaration and the column it occupies
    let mut column = 0;
    let mut found: Option<(usize, String)> = None;
    for (idx, line) in raw.lines().enumerate() {
        if let Some(caps) = declaration.captures(line) {
            let literal = caps[1].trim().trim_matches(|c| c == '\'' || c == '"');
            found = Some((idx, literal.to_string()));
            break;
        }
        if any_attribute.is_match(line) {
            column += 1;
        }
    }

    let Some((declaration_line, literal)) = found else {
        tracing::warn!("No nominal declaration for {} found; nothing to repair", attribute);
        return Repair::unchanged(raw);
    };
    if !literal.contains(',') {
        tracing::debug!("{} literal '{}' has no commas", attribute, literal);
        return Repair::unchanged(raw);
    }

    let cleaned = literal.replace(',', "");
    let mut text = String::with_capacity(raw.len());
    let mut replaced = 0;
    let mut in_data = false;

    for (idx, piece) in raw.split_inclusive('\n').enumerate() {
        let (body, ending) = split_line_ending(piece);

        if idx == declaration_line {
            let brace = body.find('{').unwrap_or(0);
            text.push_str(&body[..brace]);
            text.push_str(&body[brace..].replacen(literal.as_str(), &cleaned, 1));
            text.push_str(ending);
            replaced += 1;
            continue;
        }

        let trimmed = body.trim();
        if !in_data {
            in_data = data_directive.is_match(body);
        } else if !trimmed.is_empty() && !trimmed.starts_with('%') && !trimmed.starts_with('{') {
            if let Some(rewritten) = rewrite_row(body, column, &literal, &cleaned) {
                text.push_str(&rewritten);
                text.push_str(ending);
                replaced += 1;
                continue;
            }
        }

        text.push_str(piece);
    }

    tracing::info!(
        "Removed commas from {} literal '{}' ({} occurrences)",
        attribute,
        literal,
        replaced
    );

    Repair {
        text,
        literal: Some(literal),
        replaced,
    }
}

/// Rewrite the dataset column of one data row, if it holds the literal
fn rewrite_row(body: &str, column: usize, literal: &str, cleaned: &str) -> Option<String> {
    let mut fields: Vec<String> = split_raw(body, 0)
        .ok()?
        .into_iter()
        .map(str::to_string)
        .collect();
    let first = fields.get(column)?.clone();

    // Quoted: the literal is intact inside one field
    if let Ok(field) = unquote_field(&first, 0) {
        if field.quoted && field.text == literal {
            fields[column] = first.replacen(literal, cleaned, 1);
            return Some(fields.join(","));
        }
    }

    // Unquoted: the literal was split across consecutive fields
    let span = literal.matches(',').count() + 1;
    if fields.len() < column + span {
        return None;
    }
    let joined = fields[column..column + span].join(",");
    if joined.trim() != literal {
        return None;
    }
    let leading = &joined[..joined.len() - joined.trim_start().len()];
    let trailing = &joined[joined.trim_end().len()..];
    let merged = format!("{}{}{}", leading, cleaned, trailing);
    fields.splice(column..column + span, std::iter::once(merged));
    Some(fields.join(","))
}

fn split_line_ending(piece: &str) -> (&str, &str) {
    if let Some(body) = piece.strip_suffix("\r\n") {
        (body, "\r\n")
    } else if let Some(body) = piece.strip_suffix('\n') {
        (body, "\n")
    } else {
        (piece, "")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_line_ending() {
        assert_eq!(split_line_ending("a\r\n"), ("a", "\r\n"));
        assert_eq!(split_line_ending("a\n"), ("a", "\n"));
        assert_eq!(split_line_ending("a"), ("a", ""));
    }

    #[test]
    fn test_keyword_case_insensitive_name_exact() {
        let upper = "@relation r\n@ATTRIBUTE Key_Dataset {'a,b'}\n@data\n'a,b'\n";
        assert_eq!(repair_dataset_commas(upper, "Key_Dataset").replaced, 2);

        // Attribute names match exactly
        let lower = "@relation r\n@attribute key_dataset {'a,b'}\n@data\n'a,b'\n";
        let repair = repair_dataset_commas(lower, "Key_Dataset");
        assert_eq!(repair.replaced, 0);
        assert_eq!(repair.text, lower);
    }

    #[test]
    fn test_rewrite_row_quoted() {
        let row = rewrite_row("1,'a,b,c',J48", 1, "a,b,c", "abc").unwrap();
        assert_eq!(row, "1,'abc',J48");
    }

    #[test]
    fn test_rewrite_row_unquoted_span() {
        let row = rewrite_row("1, a,b,c ,J48", 1, "a,b,c", "abc").unwrap();
        assert_eq!(row, "1, abc ,J48");
    }

    #[test]
    fn test_rewrite_row_other_column_untouched() {
        assert_eq!(rewrite_row("'a,b,c',x,y", 1, "a,b,c", "abc"), None);
    }

    #[test]
    fn test_rewrite_row_short_row() {
        assert_eq!(rewrite_row("1", 3, "a,b", "ab"), None);
    }
}
