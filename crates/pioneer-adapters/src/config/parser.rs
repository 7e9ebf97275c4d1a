//! `platformio.ini` reader and writer.
//!
//! The dialect is the INI subset the build tool accepts:
//! `[section]` headers, `name = value` (or `name: value`) options, indented
//! continuation lines forming multi-line values, and `;`/`#` comments, also
//! inline when preceded by whitespace. Option names are case-insensitive and
//! stored lowercased.

use pioneer_core::domain::{ConfigSection, ConfigValue};
use thiserror::Error;

/// Why a configuration file could not be read or expanded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IniError {
    #[error("line {line}: option outside of any section")]
    MissingSectionHeader { line: usize },

    #[error("line {line}: duplicate section [{section}]")]
    DuplicateSection { line: usize, section: String },

    #[error("line {line}: duplicate option '{option}' in [{section}]")]
    DuplicateOption {
        line: usize,
        section: String,
        option: String,
    },

    #[error("line {line}: expected 'name = value', got '{text}'")]
    Malformed { line: usize, text: String },

    #[error("unterminated interpolation in '{0}'")]
    UnterminatedInterpolation(String),

    #[error("interpolation of '{0}' nests too deeply")]
    InterpolationTooDeep(String),

    #[error("bad interpolation reference '${{{0}}}'")]
    BadReference(String),

    #[error("'extends' loops back to [{0}]")]
    ExtendsCycle(String),
}

/// Parse INI text into sections, in file order.
pub fn parse(text: &str) -> Result<Vec<ConfigSection>, IniError> {
    let mut sections: Vec<ConfigSection> = Vec::new();
    // (option, first line, continuation lines) of the option being read
    let mut pending: Option<(String, String, Vec<String>)> = None;

    for (idx, raw_line) in text.lines().enumerate() {
        let line_no = idx + 1;
        let is_continuation = raw_line.starts_with([' ', '\t']);
        let line = strip_inline_comment(raw_line).trim();

        if line.is_empty() || line.starts_with(['#', ';']) {
            continue;
        }

        if is_continuation && pending.is_some() {
            if let Some((_, _, continuation)) = pending.as_mut() {
                continuation.push(line.to_string());
            }
            continue;
        }

        if let Some(pending) = pending.take() {
            finish_option(&mut sections, pending);
        }

        if let Some(name) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
            let name = name.trim().to_string();
            if sections.iter().any(|s| s.0 == name) {
                return Err(IniError::DuplicateSection {
                    line: line_no,
                    section: name,
                });
            }
            sections.push(ConfigSection(name, Vec::new()));
            continue;
        }

        let Some((key, value)) = split_option(line) else {
            return Err(IniError::Malformed {
                line: line_no,
                text: line.to_string(),
            });
        };
        let Some(section) = sections.last() else {
            return Err(IniError::MissingSectionHeader { line: line_no });
        };
        if section.1.iter().any(|(name, _)| *name == key) {
            return Err(IniError::DuplicateOption {
                line: line_no,
                section: section.0.clone(),
                option: key,
            });
        }
        pending = Some((key, value, Vec::new()));
    }

    if let Some(pending) = pending.take() {
        finish_option(&mut sections, pending);
    }
    Ok(sections)
}

/// Render sections back to INI text.
///
/// Multi-line values are written as an empty first line followed by
/// indented items, which [`parse`] reads back as the same list. An empty
/// list renders as `name =` and reads back as an empty string.
pub fn render(sections: &[ConfigSection]) -> String {
    let mut out = String::new();
    for (idx, ConfigSection(name, options)) in sections.iter().enumerate() {
        if idx > 0 {
            out.push('\n');
        }
        out.push_str(&format!("[{name}]\n"));
        for (option, value) in options {
            match value {
                ConfigValue::Single(v) if !v.contains('\n') => {
                    if v.is_empty() {
                        out.push_str(&format!("{option} =\n"));
                    } else {
                        out.push_str(&format!("{option} = {v}\n"));
                    }
                }
                ConfigValue::Single(v) => render_multi(&mut out, option, v.lines()),
                ConfigValue::Multi(items) => {
                    render_multi(&mut out, option, items.iter().map(String::as_str))
                }
            }
        }
    }
    out
}

fn render_multi<'a>(out: &mut String, option: &str, items: impl Iterator<Item = &'a str>) {
    out.push_str(&format!("{option} =\n"));
    for item in items.filter(|i| !i.trim().is_empty()) {
        out.push_str(&format!("    {}\n", item.trim()));
    }
}

fn finish_option(sections: &mut [ConfigSection], (key, first, rest): (String, String, Vec<String>)) {
    let Some(section) = sections.last_mut() else {
        return;
    };
    let value = if rest.is_empty() {
        ConfigValue::Single(first)
    } else {
        let mut items = Vec::with_capacity(rest.len() + 1);
        if !first.is_empty() {
            items.push(first);
        }
        items.extend(rest);
        ConfigValue::Multi(items)
    };
    section.1.push((key, value));
}

/// Split `name = value` / `name: value` at whichever delimiter comes first.
fn split_option(line: &str) -> Option<(String, String)> {
    let idx = line.find(['=', ':'])?;
    let key = line[..idx].trim();
    if key.is_empty() {
        return None;
    }
    Some((key.to_lowercase(), line[idx + 1..].trim().to_string()))
}

/// Drop a `;` or `#` comment that follows whitespace.
fn strip_inline_comment(line: &str) -> &str {
    let bytes = line.as_bytes();
    for (idx, b) in bytes.iter().enumerate() {
        if (*b == b';' || *b == b'#') && idx > 0 && bytes[idx - 1].is_ascii_whitespace() {
            return &line[..idx];
        }
    }
    line
}
