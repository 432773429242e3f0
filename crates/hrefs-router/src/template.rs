//! Path templates with typed parameters.
//!
//! `/heroes/{hero_id:uuid}/journal/{entry:int}` declares two parameters. A
//! parameter without a convertor is `str`: one non-empty path segment.

use crate::error::RouterError;
use hrefs_core::{Params, ResolveError};
use regex::Regex;
use std::collections::BTreeSet;
use std::fmt;
use std::sync::OnceLock;

fn placeholder_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\{([A-Za-z_][A-Za-z0-9_]*)(?::([a-z]+))?\}")
            .expect("placeholder regex must compile")
    })
}

/// How a path parameter is matched and rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Convertor {
    Str,
    Int,
    Float,
    Uuid,
    /// Any remainder of the path, slashes included.
    Path,
}

impl Convertor {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "str" => Some(Self::Str),
            "int" => Some(Self::Int),
            "float" => Some(Self::Float),
            "uuid" => Some(Self::Uuid),
            "path" => Some(Self::Path),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Str => "str",
            Self::Int => "int",
            Self::Float => "float",
            Self::Uuid => "uuid",
            Self::Path => "path",
        }
    }

    fn pattern(self) -> &'static str {
        match self {
            Self::Str => "[^/]+",
            Self::Int => "-?[0-9]+",
            Self::Float => r"-?[0-9]+(?:\.[0-9]+)?",
            Self::Uuid => {
                "[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}"
            }
            Self::Path => ".*",
        }
    }

    /// Whether `value` can be rendered by this convertor.
    fn accepts(self, value: &str) -> bool {
        match self {
            Self::Str => !value.is_empty() && !value.contains('/'),
            Self::Int => is_digits(value.strip_prefix('-').unwrap_or(value)),
            Self::Float => {
                let unsigned = value.strip_prefix('-').unwrap_or(value);
                match unsigned.split_once('.') {
                    Some((whole, fraction)) => is_digits(whole) && is_digits(fraction),
                    None => is_digits(unsigned),
                }
            }
            Self::Uuid => {
                value.len() == 36
                    && value.char_indices().all(|(i, c)| match i {
                        8 | 13 | 18 | 23 => c == '-',
                        _ => c.is_ascii_hexdigit(),
                    })
            }
            Self::Path => true,
        }
    }

    fn encode(self, value: &str) -> String {
        match self {
            Self::Path => value
                .split('/')
                .map(|segment| urlencoding::encode(segment).into_owned())
                .collect::<Vec<_>>()
                .join("/"),
            _ => urlencoding::encode(value).into_owned(),
        }
    }
}

fn is_digits(value: &str) -> bool {
    !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit())
}

#[derive(Debug, Clone)]
enum Segment {
    Literal(String),
    Param { name: String, convertor: Convertor },
}

/// A parsed route path.
#[derive(Debug, Clone)]
pub struct PathTemplate {
    source: String,
    segments: Vec<Segment>,
    regex: Regex,
}

impl PathTemplate {
    pub fn parse(template: &str) -> Result<Self, RouterError> {
        let invalid = |reason: &str| RouterError::InvalidTemplate {
            template: template.to_string(),
            reason: reason.to_string(),
        };
        if !template.starts_with('/') {
            return Err(invalid("must start with '/'"));
        }

        let mut segments = Vec::new();
        let mut pattern = String::from("^");
        let mut seen = BTreeSet::new();
        let mut last = 0;
        for captures in placeholder_re().captures_iter(template) {
            let Some(whole) = captures.get(0) else {
                continue;
            };
            push_literal(&template[last..whole.start()], &mut segments, &mut pattern)
                .map_err(invalid)?;
            last = whole.end();

            let name = captures[1].to_string();
            let convertor = match captures.get(2) {
                None => Convertor::Str,
                Some(raw) => Convertor::from_name(raw.as_str()).ok_or_else(|| {
                    RouterError::UnknownConvertor {
                        template: template.to_string(),
                        convertor: raw.as_str().to_string(),
                    }
                })?,
            };
            if !seen.insert(name.clone()) {
                return Err(RouterError::DuplicateParam {
                    template: template.to_string(),
                    param: name,
                });
            }
            pattern.push_str(&format!("(?P<{name}>{})", convertor.pattern()));
            segments.push(Segment::Param { name, convertor });
        }
        push_literal(&template[last..], &mut segments, &mut pattern)
            .map_err(invalid)?;
        pattern.push('$');

        let regex = Regex::new(&pattern).map_err(|err| invalid(&err.to_string()))?;
        Ok(Self {
            source: template.to_string(),
            segments,
            regex,
        })
    }

    /// This template under a mount prefix.
    pub fn prefixed(&self, prefix: &str) -> Result<Self, RouterError> {
        Self::parse(&format!("{}{}", prefix.trim_end_matches('/'), self.source))
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn param_names(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Param { name, .. } => Some(name.as_str()),
            Segment::Literal(_) => None,
        })
    }

    /// Render the path. Parameters the template does not bind are returned.
    pub fn build(&self, params: &Params) -> Result<(String, Params), ResolveError> {
        let mut rest = params.clone();
        let mut path = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => path.push_str(text),
                Segment::Param { name, convertor } => {
                    let value = rest.remove(name).ok_or_else(|| ResolveError::MissingParam {
                        param: name.clone(),
                    })?;
                    if !convertor.accepts(&value) {
                        return Err(ResolveError::InvalidParam {
                            param: name.clone(),
                            value,
                            expected: convertor.name(),
                        });
                    }
                    path.push_str(&convertor.encode(&value));
                }
            }
        }
        Ok((path, rest))
    }

    /// Decoded path parameters if `path` matches.
    pub fn matches(&self, path: &str) -> Option<Params> {
        let captures = self.regex.captures(path)?;
        let mut params = Params::new();
        for name in self.param_names() {
            let raw = captures.name(name)?.as_str();
            let decoded = urlencoding::decode(raw).ok()?;
            params.insert(name.to_string(), decoded.into_owned());
        }
        Some(params)
    }
}

fn push_literal(
    text: &str,
    segments: &mut Vec<Segment>,
    pattern: &mut String,
) -> Result<(), &'static str> {
    if text.contains(['{', '}']) {
        return Err("malformed parameter braces");
    }
    if !text.is_empty() {
        pattern.push_str(&regex::escape(text));
        segments.push(Segment::Literal(text.to_string()));
    }
    Ok(())
}

impl fmt::Display for PathTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}
