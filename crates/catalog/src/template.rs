//! Archive path templates with named placeholders.

use std::collections::BTreeSet;
use std::fmt;
use std::path::PathBuf;

use crate::error::CatalogError;

/// A named slot in a [`PathTemplate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Placeholder {
    /// `{base_path}`: the source's data directory.
    BasePath,
    /// `{parameter}`: the parameter identifier, e.g. `Temp`.
    Parameter,
    /// `{date_time}`: the issue cycle, `YYYYMMDD_HH`.
    DateTime,
    /// `{ensemble}`: the representative ensemble member.
    Ensemble,
    /// `{file_name}`: the target day-of-year code, `YYYYJJJ`.
    FileName,
    /// `{doy}`: the target ordinal day alone, `JJJ`.
    Doy,
}

impl Placeholder {
    fn parse(name: &str) -> Option<Self> {
        match name {
            "base_path" => Some(Self::BasePath),
            "parameter" => Some(Self::Parameter),
            "date_time" => Some(Self::DateTime),
            "ensemble" => Some(Self::Ensemble),
            "file_name" => Some(Self::FileName),
            "doy" => Some(Self::Doy),
            _ => None,
        }
    }

    /// The name as written between braces.
    pub fn name(self) -> &'static str {
        match self {
            Self::BasePath => "base_path",
            Self::Parameter => "parameter",
            Self::DateTime => "date_time",
            Self::Ensemble => "ensemble",
            Self::FileName => "file_name",
            Self::Doy => "doy",
        }
    }
}

impl fmt::Display for Placeholder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}}}", self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Slot(Placeholder),
}

/// Values substituted into a template. `None` means the caller has no
/// value for that slot; filling a template that uses it is an error.
#[derive(Debug, Clone, Default)]
pub struct TemplateValues<'a> {
    pub base_path: Option<&'a str>,
    pub parameter: Option<&'a str>,
    pub date_time: Option<String>,
    pub ensemble: Option<&'a str>,
    pub file_name: Option<String>,
    pub doy: Option<String>,
}

impl TemplateValues<'_> {
    fn get(&self, slot: Placeholder) -> Option<&str> {
        match slot {
            Placeholder::BasePath => self.base_path,
            Placeholder::Parameter => self.parameter,
            Placeholder::DateTime => self.date_time.as_deref(),
            Placeholder::Ensemble => self.ensemble,
            Placeholder::FileName => self.file_name.as_deref(),
            Placeholder::Doy => self.doy.as_deref(),
        }
    }
}

/// A parsed path template such as
/// `{base_path}/{parameter}/{date_time}/{ensemble}/Daily/{file_name}.nc`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathTemplate {
    raw: String,
    segments: Vec<Segment>,
}

impl PathTemplate {
    /// Parses a template.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Template`] on an unknown placeholder name, an
    /// empty `{}`, an unclosed `{` or a stray `}`.
    pub fn parse(raw: &str) -> Result<Self, CatalogError> {
        let err = |reason: String| CatalogError::Template {
            template: raw.to_string(),
            reason,
        };

        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut chars = raw.chars();

        while let Some(c) = chars.next() {
            match c {
                '{' => {
                    let mut name = String::new();
                    let mut closed = false;
                    for n in chars.by_ref() {
                        if n == '}' {
                            closed = true;
                            break;
                        }
                        if n == '{' {
                            return Err(err("nested '{'".to_string()));
                        }
                        name.push(n);
                    }
                    if !closed {
                        return Err(err("unclosed '{'".to_string()));
                    }
                    if name.is_empty() {
                        return Err(err("empty placeholder '{}'".to_string()));
                    }
                    let slot = Placeholder::parse(&name)
                        .ok_or_else(|| err(format!("unknown placeholder '{name}'")))?;
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(Segment::Slot(slot));
                }
                '}' => return Err(err("unmatched '}'".to_string())),
                other => literal.push(other),
            }
        }
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Ok(Self {
            raw: raw.to_string(),
            segments,
        })
    }

    /// The template text as written.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// The distinct placeholders this template uses.
    pub fn placeholders(&self) -> BTreeSet<Placeholder> {
        self.segments
            .iter()
            .filter_map(|s| match s {
                Segment::Slot(p) => Some(*p),
                Segment::Literal(_) => None,
            })
            .collect()
    }

    /// Whether the template uses `slot`.
    pub fn uses(&self, slot: Placeholder) -> bool {
        self.segments.contains(&Segment::Slot(slot))
    }

    /// Substitutes every placeholder.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Template`] if the template uses a slot for
    /// which `values` has no value.
    pub fn fill(&self, values: &TemplateValues<'_>) -> Result<PathBuf, CatalogError> {
        let mut out = String::with_capacity(self.raw.len() + 32);
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Slot(slot) => {
                    let value = values.get(*slot).ok_or_else(|| CatalogError::Template {
                        template: self.raw.clone(),
                        reason: format!("no value for {slot}"),
                    })?;
                    out.push_str(value);
                }
            }
        }
        Ok(PathBuf::from(out))
    }
}

impl fmt::Display for PathTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}
