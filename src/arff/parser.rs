// ARFF text → Dataset
//
// Header lines are matched against a directive regex; everything after
// @data is a row. Rows are split on commas outside quotes and each field is
// converted according to its attribute's declared type.

use super::{ArffError, Attribute, AttributeType, Dataset, Value};
use regex::Regex;
use std::collections::HashSet;
use std::sync::OnceLock;

type Result<T> = std::result::Result<T, ArffError>;

fn directive_regex() -> &'static Regex {
    static DIRECTIVE: OnceLock<Regex> = OnceLock::new();
    DIRECTIVE.get_or_init(|| {
        Regex::new(r"(?i)^@(relation|attribute|data)\b(.*)$").expect("directive regex is valid")
    })
}

/// A field after quote removal
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Field {
    pub text: String,
    pub quoted: bool,
}

/// Parse ARFF text into a dataset
///
/// # Example
/// ```
/// let text = "@relation r\n@attribute x numeric\n@data\n1.5\n";
/// let dataset = arff_anova::arff::parse(text).unwrap();
/// assert_eq!(dataset.rows[0][0].as_f64(), Some(1.5));
/// ```
pub fn parse(text: &str) -> Result<Dataset> {
    let mut relation: Option<String> = None;
    let mut attributes: Vec<Attribute> = Vec::new();
    let mut names: HashSet<String> = HashSet::new();
    let mut rows = Vec::new();
    let mut in_data = false;

    for (idx, raw) in text.lines().enumerate() {
        let line = idx + 1;
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with('%') {
            continue;
        }

        if in_data {
            rows.push(parse_row(trimmed, &attributes, line)?);
            continue;
        }

        let caps = directive_regex()
            .captures(trimmed)
            .ok_or_else(|| ArffError::UnexpectedContent {
                line,
                content: trimmed.to_string(),
            })?;
        let rest = caps.get(2).map_or("", |m| m.as_str()).trim();

        match caps[1].to_ascii_lowercase().as_str() {
            "relation" => {
                let (name, _) = split_name(rest, line)?;
                relation = Some(name);
            }
            "attribute" => {
                let attribute = parse_attribute(rest, line)?;
                if !names.insert(attribute.name.clone()) {
                    return Err(ArffError::DuplicateAttribute {
                        line,
                        name: attribute.name,
                    });
                }
                attributes.push(attribute);
            }
            _ => {
                if attributes.is_empty() {
                    return Err(ArffError::NoAttributes);
                }
                in_data = true;
            }
        }
    }

    let relation = relation.ok_or(ArffError::MissingRelation)?;
    if !in_data {
        return Err(ArffError::MissingData);
    }

    tracing::debug!(
        relation = %relation,
        attributes = attributes.len(),
        rows = rows.len(),
        "parsed ARFF dataset"
    );

    Ok(Dataset {
        relation,
        attributes,
        rows,
    })
}

/// Split a leading (optionally quoted) name from the rest of a declaration
fn split_name(rest: &str, line: usize) -> Result<(String, &str)> {
    let rest = rest.trim_start();
    match rest.chars().next() {
        Some(q @ ('\'' | '"')) => {
            let mut name = String::new();
            let mut chars = rest[1..].char_indices();
            while let Some((i, c)) = chars.next() {
                match c {
                    '\\' => {
                        let (_, escaped) =
                            chars.next().ok_or(ArffError::UnterminatedQuote { line })?;
                        name.push(unescape(escaped));
                    }
                    c if c == q => return Ok((name, rest[1 + i + 1..].trim_start())),
                    c => name.push(c),
                }
            }
            Err(ArffError::UnterminatedQuote { line })
        }
        Some(_) => {
            let end = rest
                .find(|c: char| c.is_whitespace() || c == '{')
                .unwrap_or(rest.len());
            Ok((rest[..end].to_string(), rest[end..].trim_start()))
        }
        None => Err(ArffError::BadAttribute {
            line,
            reason: "missing name".to_string(),
        }),
    }
}

fn parse_attribute(rest: &str, line: usize) -> Result<Attribute> {
    let (name, declared) = split_name(rest, line)?;
    if declared.is_empty() {
        return Err(ArffError::BadAttribute {
            line,
            reason: format!("attribute '{}' has no type", name),
        });
    }

    let kind = if let Some(body) = declared.strip_prefix('{') {
        let inner = body
            .trim_end()
            .strip_suffix('}')
            .ok_or_else(|| ArffError::BadAttribute {
                line,
                reason: format!("unclosed nominal list for '{}'", name),
            })?;
        AttributeType::Nominal(parse_nominal_values(inner, line)?)
    } else {
        let (keyword, tail) = match declared.find(char::is_whitespace) {
            Some(pos) => (&declared[..pos], declared[pos..].trim()),
            None => (declared, ""),
        };
        match keyword.to_ascii_lowercase().as_str() {
            "numeric" | "real" | "integer" => AttributeType::Numeric,
            "string" => AttributeType::String,
            "date" if tail.is_empty() => AttributeType::Date(None),
            "date" => AttributeType::Date(Some(unquote_field(tail, line)?.text)),
            other => {
                return Err(ArffError::UnsupportedType {
                    line,
                    kind: other.to_string(),
                })
            }
        }
    };

    Ok(Attribute { name, kind })
}

fn parse_nominal_values(inner: &str, line: usize) -> Result<Vec<String>> {
    if inner.trim().is_empty() {
        return Ok(Vec::new());
    }
    split_raw(inner, line)?
        .into_iter()
        .map(|raw| unquote_field(raw, line).map(|f| f.text))
        .collect()
}

fn parse_row(content: &str, attributes: &[Attribute], line: usize) -> Result<Vec<Value>> {
    if let Some(body) = content.strip_prefix('{').and_then(|b| b.strip_suffix('}')) {
        return parse_sparse_row(body, attributes, line);
    }

    let fields = split_raw(content, line)?;
    if fields.len() != attributes.len() {
        return Err(ArffError::BadDataFormat {
            line,
            expected: attributes.len(),
            found: fields.len(),
        });
    }

    fields
        .into_iter()
        .zip(attributes)
        .map(|(raw, attribute)| convert(unquote_field(raw, line)?, attribute, line))
        .collect()
}

fn parse_sparse_row(body: &str, attributes: &[Attribute], line: usize) -> Result<Vec<Value>> {
    let mut row: Vec<Value> = attributes
        .iter()
        .map(|a| match a.kind {
            AttributeType::Numeric => Value::Numeric(0.0),
            _ => Value::Missing,
        })
        .collect();

    if body.trim().is_empty() {
        return Ok(row);
    }

    for entry in split_raw(body, line)? {
        let entry = entry.trim();
        let bad_entry = || ArffError::BadSparseEntry {
            line,
            entry: entry.to_string(),
        };
        let (index, value) = entry.split_once(char::is_whitespace).ok_or_else(bad_entry)?;
        let index: usize = index.parse().map_err(|_| bad_entry())?;
        let attribute = attributes.get(index).ok_or_else(bad_entry)?;
        row[index] = convert(unquote_field(value, line)?, attribute, line)?;
    }

    Ok(row)
}

fn convert(field: Field, attribute: &Attribute, line: usize) -> Result<Value> {
    if !field.quoted && field.text == "?" {
        return Ok(Value::Missing);
    }

    match &attribute.kind {
        AttributeType::Numeric => {
            field
                .text
                .parse::<f64>()
                .map(Value::Numeric)
                .map_err(|_| ArffError::BadNumeric {
                    line,
                    attribute: attribute.name.clone(),
                    value: field.text,
                })
        }
        AttributeType::Nominal(values) => {
            if values.iter().any(|v| *v == field.text) {
                Ok(Value::Nominal(field.text))
            } else {
                Err(ArffError::BadNominal {
                    line,
                    attribute: attribute.name.clone(),
                    value: field.text,
                })
            }
        }
        AttributeType::String => Ok(Value::String(field.text)),
        AttributeType::Date(_) => Ok(Value::Date(field.text)),
    }
}

/// Split on commas that sit outside quotes, keeping each raw slice intact
pub(crate) fn split_raw(input: &str, line: usize) -> Result<Vec<&str>> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut quote: Option<char> = None;
    let mut escaped = false;

    for (i, c) in input.char_indices() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
        } else if c == '\'' || c == '"' {
            quote = Some(c);
        } else if c == ',' {
            parts.push(&input[start..i]);
            start = i + 1;
        }
    }

    if quote.is_some() {
        return Err(ArffError::UnterminatedQuote { line });
    }
    parts.push(&input[start..]);
    Ok(parts)
}

/// Trim a raw field and strip its quotes, resolving escapes
pub(crate) fn unquote_field(raw: &str, line: usize) -> Result<Field> {
    let trimmed = raw.trim();
    let Some(q @ ('\'' | '"')) = trimmed.chars().next() else {
        return Ok(Field {
            text: trimmed.to_string(),
            quoted: false,
        });
    };

    let mut text = String::new();
    let mut chars = trimmed[1..].chars();
    loop {
        match chars.next() {
            Some('\\') => {
                let escaped = chars.next().ok_or(ArffError::UnterminatedQuote { line })?;
                text.push(unescape(escaped));
            }
            Some(c) if c == q => break,
            Some(c) => text.push(c),
            None => return Err(ArffError::UnterminatedQuote { line }),
        }
    }

    if !chars.as_str().trim().is_empty() {
        return Err(ArffError::TrailingCharacters { line });
    }

    Ok(Field { text, quoted: true })
}

fn unescape(c: char) -> char {
    match c {
        'n' => '\n',
        't' => '\t',
        'r' => '\r',
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_raw_respects_quotes() {
        let parts = split_raw("a,'b,c',\"d,e\",f", 1).unwrap();
        assert_eq!(parts, vec!["a", "'b,c'", "\"d,e\"", "f"]);
    }

    #[test]
    fn test_split_raw_escaped_quote() {
        let parts = split_raw(r"'it\'s, fine',x", 1).unwrap();
        assert_eq!(parts.len(), 2);
    }

    #[test]
    fn test_split_raw_unterminated() {
        assert_eq!(
            split_raw("a,'b,c", 7),
            Err(ArffError::UnterminatedQuote { line: 7 })
        );
    }

    #[test]
    fn test_unquote_plain_field_is_trimmed() {
        let field = unquote_field("  weka.classifiers.trees.J48 ", 1).unwrap();
        assert_eq!(field.text, "weka.classifiers.trees.J48");
        assert!(!field.quoted);
    }

    #[test]
    fn test_unquote_quoted_field() {
        let field = unquote_field(" 'iris, setosa' ", 1).unwrap();
        assert_eq!(field.text, "iris, setosa");
        assert!(field.quoted);
    }

    #[test]
    fn test_unquote_trailing_garbage() {
        assert_eq!(
            unquote_field("'a'b", 3),
            Err(ArffError::TrailingCharacters { line: 3 })
        );
    }

    #[test]
    fn test_split_name_quoted() {
        let (name, rest) = split_name("'Key Scheme' numeric", 1).unwrap();
        assert_eq!(name, "Key Scheme");
        assert_eq!(rest, "numeric");
    }

    #[test]
    fn test_split_name_attached_brace() {
        let (name, rest) = split_name("Key_Dataset{iris}", 1).unwrap();
        assert_eq!(name, "Key_Dataset");
        assert_eq!(rest, "{iris}");
    }

    #[test]
    fn test_parse_attribute_types() {
        assert_eq!(
            parse_attribute("x REAL", 1).unwrap().kind,
            AttributeType::Numeric
        );
        assert_eq!(
            parse_attribute("s string", 1).unwrap().kind,
            AttributeType::String
        );
        assert_eq!(
            parse_attribute("d date 'yyyy-MM-dd'", 1).unwrap().kind,
            AttributeType::Date(Some("yyyy-MM-dd".to_string()))
        );
        assert_eq!(
            parse_attribute("n {a, 'b c'}", 1).unwrap().kind,
            AttributeType::Nominal(vec!["a".to_string(), "b c".to_string()])
        );
    }

    #[test]
    fn test_parse_attribute_unsupported() {
        assert!(matches!(
            parse_attribute("bag relational", 4),
            Err(ArffError::UnsupportedType { line: 4, .. })
        ));
    }
}
