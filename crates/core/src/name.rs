// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Hierarchical unit names
//!
//! A `UnitName` is a non-empty sequence of segments. Its canonical text form
//! joins segments with `.`; a segment that is empty or contains `.`, `"`, `\`
//! or whitespace is written in double quotes with `"` and `\` escaped.
//!
//! ```text
//! deployment."app.war".INSTALL  =>  ["deployment", "app.war", "INSTALL"]
//! ```

use serde::{Deserialize, Serialize};
use std::fmt::{self, Write};
use std::str::FromStr;
use thiserror::Error;

/// Root segment for deployment units
pub const DEPLOYMENT_BASE: &str = "deployment";

/// Suffix naming the install phase of a deployment unit
pub const INSTALL_PHASE: &str = "INSTALL";

/// Errors from building or parsing a unit name
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UnitNameError {
    #[error("unit name must have at least one segment")]
    Empty,
    #[error("empty segment at position {position} in {input:?}")]
    EmptySegment { input: String, position: usize },
    #[error("unterminated quote in {0:?}")]
    UnterminatedQuote(String),
    #[error("unexpected {found:?} in {input:?}")]
    UnexpectedChar { input: String, found: char },
}

/// Opaque, hierarchical identifier of a unit in the registry
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UnitName(Vec<String>);

impl UnitName {
    /// Build a name from its segments
    pub fn of<I, S>(segments: I) -> Result<Self, UnitNameError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let segments: Vec<String> = segments.into_iter().map(Into::into).collect();
        if segments.is_empty() {
            return Err(UnitNameError::Empty);
        }
        Ok(Self(segments))
    }

    /// Single-segment name
    pub fn root(segment: impl Into<String>) -> Self {
        Self(vec![segment.into()])
    }

    /// Name of the unit representing deployment `name`
    pub fn deployment(name: &str) -> Self {
        Self::root(DEPLOYMENT_BASE).append(name)
    }

    /// Parse the canonical text form
    pub fn parse(input: &str) -> Result<Self, UnitNameError> {
        if input.is_empty() {
            return Err(UnitNameError::Empty);
        }

        let mut segments = Vec::new();
        let mut chars = input.chars().peekable();

        loop {
            let mut segment = String::new();
            if chars.peek() == Some(&'"') {
                chars.next();
                loop {
                    match chars.next() {
                        Some('\\') => match chars.next() {
                            Some(c) => segment.push(c),
                            None => return Err(UnitNameError::UnterminatedQuote(input.to_string())),
                        },
                        Some('"') => break,
                        Some(c) => segment.push(c),
                        None => return Err(UnitNameError::UnterminatedQuote(input.to_string())),
                    }
                }
                match chars.peek() {
                    None | Some('.') => {}
                    Some(&found) => {
                        return Err(UnitNameError::UnexpectedChar {
                            input: input.to_string(),
                            found,
                        })
                    }
                }
            } else {
                while let Some(&c) = chars.peek() {
                    match c {
                        '.' => break,
                        '"' => {
                            return Err(UnitNameError::UnexpectedChar {
                                input: input.to_string(),
                                found: c,
                            })
                        }
                        _ => {
                            segment.push(c);
                            chars.next();
                        }
                    }
                }
                if segment.is_empty() {
                    return Err(UnitNameError::EmptySegment {
                        input: input.to_string(),
                        position: segments.len(),
                    });
                }
            }
            segments.push(segment);

            // Only '.' or end of input can follow a segment
            if chars.next().is_none() {
                break;
            }
        }

        Ok(Self(segments))
    }

    /// Child name with one more segment
    pub fn append(&self, segment: impl Into<String>) -> Self {
        let mut segments = self.0.clone();
        segments.push(segment.into());
        Self(segments)
    }

    /// Name of this deployment's install phase
    pub fn install_phase(&self) -> Self {
        self.append(INSTALL_PHASE)
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    pub fn last(&self) -> &str {
        self.0.last().map(String::as_str).unwrap_or_default()
    }

    /// Parent name, `None` for a single-segment name
    pub fn parent(&self) -> Option<Self> {
        if self.0.len() < 2 {
            return None;
        }
        Some(Self(self.0[..self.0.len() - 1].to_vec()))
    }

    /// True if `self` is strictly below `ancestor`
    pub fn is_descendant_of(&self, ancestor: &UnitName) -> bool {
        self.0.len() > ancestor.0.len() && self.0.starts_with(&ancestor.0)
    }
}

fn needs_quoting(segment: &str) -> bool {
    segment.is_empty()
        || segment
            .chars()
            .any(|c| matches!(c, '.' | '"' | '\\') || c.is_whitespace())
}

impl fmt::Display for UnitName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_char('.')?;
            }
            if needs_quoting(segment) {
                f.write_char('"')?;
                for c in segment.chars() {
                    if matches!(c, '"' | '\\') {
                        f.write_char('\\')?;
                    }
                    f.write_char(c)?;
                }
                f.write_char('"')?;
            } else {
                f.write_str(segment)?;
            }
        }
        Ok(())
    }
}

impl FromStr for UnitName {
    type Err = UnitNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for UnitName {
    type Error = UnitNameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<UnitName> for String {
    fn from(name: UnitName) -> Self {
        name.to_string()
    }
}

#[cfg(test)]
#[path = "name_tests.rs"]
mod tests;
