use serde::{Serialize, Serializer};
use std::fmt;
use thiserror::Error;

/// The first rule a rejected branch name breaks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BranchNameRule {
    Empty,
    LeadingHyphen,
    ConsecutiveDots,
    ForbiddenCharacter(char),
    EmptyComponent,
    HiddenComponent,
    LockSuffix,
    TrailingDot,
    ReflogSyntax,
    Reserved,
}

impl fmt::Display for BranchNameRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("name is empty"),
            Self::LeadingHyphen => f.write_str("starts with '-'"),
            Self::ConsecutiveDots => f.write_str("contains consecutive dots"),
            Self::ForbiddenCharacter(c) if c.is_control() => {
                write!(f, "contains control character {:?}", c)
            }
            Self::ForbiddenCharacter(c) => write!(f, "contains '{}'", c),
            Self::EmptyComponent => f.write_str("has an empty path component"),
            Self::HiddenComponent => f.write_str("has a component starting with '.'"),
            Self::LockSuffix => f.write_str("a component ends with '.lock'"),
            Self::TrailingDot => f.write_str("ends with '.'"),
            Self::ReflogSyntax => f.write_str("contains '@{'"),
            Self::Reserved => f.write_str("is reserved by git"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("'{name}' is not a valid branch name: {rule}")]
pub struct BranchNameError {
    pub name: String,
    pub rule: BranchNameRule,
}

/// A branch name git would accept, local (`main`) or remote-qualified
/// (`origin/main`). It says nothing about whether any repository has it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BranchName(String);

const FORBIDDEN: &[char] = &[' ', '~', '^', ':', '?', '*', '[', '\\'];

impl BranchName {
    pub fn new(name: &str) -> Result<Self, BranchNameError> {
        match Self::broken_rule(name) {
            Some(rule) => Err(BranchNameError {
                name: name.to_string(),
                rule,
            }),
            None => Ok(Self(name.to_string())),
        }
    }

    fn broken_rule(name: &str) -> Option<BranchNameRule> {
        if name.is_empty() {
            return Some(BranchNameRule::Empty);
        }
        if name.starts_with('-') {
            return Some(BranchNameRule::LeadingHyphen);
        }
        if matches!(name, "@" | "HEAD" | "FETCH_HEAD" | "ORIG_HEAD" | "MERGE_HEAD") {
            return Some(BranchNameRule::Reserved);
        }
        if let Some(c) = name.chars().find(|c| c.is_control() || FORBIDDEN.contains(c)) {
            return Some(BranchNameRule::ForbiddenCharacter(c));
        }
        if name.contains("..") {
            return Some(BranchNameRule::ConsecutiveDots);
        }
        if name.contains("@{") {
            return Some(BranchNameRule::ReflogSyntax);
        }
        if name.ends_with('.') {
            return Some(BranchNameRule::TrailingDot);
        }

        name.split('/').find_map(|component| {
            if component.is_empty() {
                Some(BranchNameRule::EmptyComponent)
            } else if component.starts_with('.') {
                Some(BranchNameRule::HiddenComponent)
            } else if component.ends_with(".lock") {
                Some(BranchNameRule::LockSuffix)
            } else {
                None
            }
        })
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    /// The name with a leading `<remote>/` removed.
    ///
    /// `origin/release/1.0` with remote `origin` gives `release/1.0`; anything
    /// else comes back unchanged.
    pub fn without_remote<'a>(&'a self, remote: &str) -> &'a str {
        self.0
            .strip_prefix(remote)
            .and_then(|rest| rest.strip_prefix('/'))
            .filter(|rest| !rest.is_empty())
            .unwrap_or(&self.0)
    }
}

impl fmt::Display for BranchName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for BranchName {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl std::str::FromStr for BranchName {
    type Err = BranchNameError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Self::new(name)
    }
}
