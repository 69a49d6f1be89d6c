#![forbid(unsafe_code)]

//! Minimal CSS selector matching for the fake document.
//!
//! Supported grammar (enough for everything the controller and the tests
//! build):
//!
//! ```text
//! list      := compound ( "," compound )*
//! compound  := tag? ( "[" name ( "=" quoted )? "]" | "." class | "#" id )*
//! quoted    := '"' ( '\' any | [^"\\] )* '"'
//! ```
//!
//! Combinators (descendant, child, sibling) and pseudo-classes are not
//! supported; [`SelectorList::parse`] returns `None` for them.

/// One simple condition inside a compound selector.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Condition {
    Tag(String),
    HasAttr(String),
    AttrEquals(String, String),
    Class(String),
    Id(String),
}

/// A compound selector: every condition must hold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Compound {
    conditions: Vec<Condition>,
}

/// A comma-separated selector list: any compound may match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorList {
    compounds: Vec<Compound>,
}

/// What the matcher needs to know about an element.
pub trait Matchable {
    fn tag(&self) -> &str;
    fn attr(&self, name: &str) -> Option<&str>;
    fn has_class(&self, class: &str) -> bool;
}

impl SelectorList {
    /// Parse a selector list. `None` if it uses unsupported syntax.
    pub fn parse(input: &str) -> Option<Self> {
        let mut compounds = Vec::new();
        for part in split_top_level(input)? {
            let part = part.trim();
            if part.is_empty() {
                return None;
            }
            compounds.push(Compound::parse(part)?);
        }
        if compounds.is_empty() {
            return None;
        }
        Some(Self { compounds })
    }

    /// Whether `el` matches any compound of the list.
    pub fn matches(&self, el: &impl Matchable) -> bool {
        self.compounds.iter().any(|c| c.matches(el))
    }
}

impl Compound {
    fn parse(input: &str) -> Option<Self> {
        let chars: Vec<char> = input.chars().collect();
        let mut i = 0;
        let mut conditions = Vec::new();

        let tag = take_ident(&chars, &mut i);
        if !tag.is_empty() {
            conditions.push(Condition::Tag(tag.to_ascii_lowercase()));
        }

        while i < chars.len() {
            match chars[i] {
                '[' => {
                    i += 1;
                    let name = take_ident(&chars, &mut i);
                    if name.is_empty() {
                        return None;
                    }
                    match chars.get(i) {
                        Some(']') => {
                            i += 1;
                            conditions.push(Condition::HasAttr(name));
                        }
                        Some('=') => {
                            i += 1;
                            let value = take_quoted(&chars, &mut i)?;
                            if chars.get(i) != Some(&']') {
                                return None;
                            }
                            i += 1;
                            conditions.push(Condition::AttrEquals(name, value));
                        }
                        _ => return None,
                    }
                }
                '.' => {
                    i += 1;
                    let class = take_ident(&chars, &mut i);
                    if class.is_empty() {
                        return None;
                    }
                    conditions.push(Condition::Class(class));
                }
                '#' => {
                    i += 1;
                    let id = take_ident(&chars, &mut i);
                    if id.is_empty() {
                        return None;
                    }
                    conditions.push(Condition::Id(id));
                }
                _ => return None,
            }
        }

        if conditions.is_empty() {
            return None;
        }
        Some(Self { conditions })
    }

    fn matches(&self, el: &impl Matchable) -> bool {
        self.conditions.iter().all(|cond| match cond {
            Condition::Tag(tag) => el.tag().eq_ignore_ascii_case(tag),
            Condition::HasAttr(name) => el.attr(name).is_some(),
            Condition::AttrEquals(name, value) => el.attr(name) == Some(value.as_str()),
            Condition::Class(class) => el.has_class(class),
            Condition::Id(id) => el.attr("id") == Some(id.as_str()),
        })
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

fn take_ident(chars: &[char], i: &mut usize) -> String {
    let start = *i;
    while *i < chars.len() && is_ident_char(chars[*i]) {
        *i += 1;
    }
    chars[start..*i].iter().collect()
}

fn take_quoted(chars: &[char], i: &mut usize) -> Option<String> {
    if chars.get(*i) != Some(&'"') {
        return None;
    }
    *i += 1;
    let mut out = String::new();
    loop {
        match chars.get(*i)? {
            '\\' => {
                out.push(*chars.get(*i + 1)?);
                *i += 2;
            }
            '"' => {
                *i += 1;
                return Some(out);
            }
            c => {
                out.push(*c);
                *i += 1;
            }
        }
    }
}

/// Split on commas that are not inside brackets or quotes.
fn split_top_level(input: &str) -> Option<Vec<&str>> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut in_quotes = false;
    let mut escaped = false;
    let mut start = 0;
    for (idx, c) in input.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' if in_quotes => escaped = true,
            '"' => in_quotes = !in_quotes,
            '[' if !in_quotes => depth += 1,
            ']' if !in_quotes => depth = depth.checked_sub(1)?,
            ',' if !in_quotes && depth == 0 => {
                parts.push(&input[start..idx]);
                start = idx + 1;
            }
            _ => {}
        }
    }
    if in_quotes || depth != 0 {
        return None;
    }
    parts.push(&input[start..]);
    Some(parts)
}
