//! `${identifier}` substitution for ZPL templates.
//!
//! Placeholders are `$name` or `${name}`, where a name starts with a letter
//! or underscore followed by letters, digits or underscores. `$$` produces a
//! literal `$`.

use log::debug;
use std::collections::HashMap;
use std::path::Path;

use crate::error::Error;

/// Replace every placeholder in `text` with its value from `fields`.
pub fn render_template(text: &str, fields: &HashMap<String, String>) -> Result<String, Error> {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.char_indices().peekable();

    while let Some((pos, c)) = chars.next() {
        if c != '$' {
            out.push(c);
            continue;
        }

        let name = match chars.peek() {
            Some(&(_, '$')) => {
                chars.next();
                out.push('$');
                continue;
            }
            Some(&(_, '{')) => {
                chars.next();
                let name = take_identifier(&mut chars);
                match chars.next() {
                    Some((_, '}')) if !name.is_empty() => name,
                    _ => return Err(invalid_at(text, pos)),
                }
            }
            _ => {
                let name = take_identifier(&mut chars);
                if name.is_empty() {
                    return Err(invalid_at(text, pos));
                }
                name
            }
        };

        match fields.get(&name) {
            Some(value) => out.push_str(value),
            None => return Err(Error::TemplateKeyError(name)),
        }
    }

    Ok(out)
}

/// Read a template file and render it with `fields`.
pub fn zpl_from_template<P: AsRef<Path>>(
    path: P,
    fields: &HashMap<String, String>,
) -> Result<String, Error> {
    debug!("rendering template {:?}", path.as_ref());
    let text = std::fs::read_to_string(path)?;
    render_template(&text, fields)
}

fn take_identifier(chars: &mut std::iter::Peekable<std::str::CharIndices<'_>>) -> String {
    let mut name = String::new();
    while let Some(&(_, c)) = chars.peek() {
        let valid = if name.is_empty() {
            c == '_' || c.is_ascii_alphabetic()
        } else {
            c == '_' || c.is_ascii_alphanumeric()
        };
        if !valid {
            break;
        }
        name.push(c);
        chars.next();
    }
    name
}

fn invalid_at(text: &str, pos: usize) -> Error {
    let before = &text[..pos];
    let line = before.matches('\n').count() + 1;
    let column = match before.rfind('\n') {
        Some(nl) => before[nl + 1..].chars().count() + 1,
        None => before.chars().count() + 1,
    };
    Error::InvalidTemplate { line, column }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn substitutes_both_forms() {
        let f = fields(&[("name", "Widget"), ("sku", "W-1")]);
        let out = render_template("^FD${name}^FS\n^FD$sku^FS", &f).unwrap();
        assert_eq!(out, "^FDWidget^FS\n^FDW-1^FS");
    }

    #[test]
    fn braces_allow_adjacent_text() {
        let f = fields(&[("n", "4")]);
        assert_eq!(render_template("${n}x", &f).unwrap(), "4x");
    }

    #[test]
    fn double_dollar_is_literal() {
        let f = fields(&[]);
        assert_eq!(render_template("cost: $$5", &f).unwrap(), "cost: $5");
    }

    #[test]
    fn missing_key_is_reported() {
        let f = fields(&[]);
        let err = render_template("^FD${missing}^FS", &f).unwrap_err();
        assert!(matches!(err, Error::TemplateKeyError(ref k) if k == "missing"));
    }

    #[test]
    fn bare_dollar_reports_position() {
        let f = fields(&[]);
        let err = render_template("^XA\n^FO5 $ 1", &f).unwrap_err();
        assert!(matches!(err, Error::InvalidTemplate { line: 2, column: 6 }));
    }

    #[test]
    fn unterminated_brace_is_invalid() {
        let f = fields(&[("a", "1")]);
        assert!(matches!(
            render_template("${a", &f),
            Err(Error::InvalidTemplate { line: 1, column: 1 })
        ));
    }

    #[test]
    fn graphics_field_placeholders() {
        let f = fields(&[("graphic", "A,1,1,1,\n:B64:/w==:0000")]);
        let out = render_template("^FO10,10^GF${graphic}^FS", &f).unwrap();
        assert_eq!(out, "^FO10,10^GFA,1,1,1,\n:B64:/w==:0000^FS");
    }
}
