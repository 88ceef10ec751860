use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Which admin surface a category set belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryScope {
    Agents,
    Candidates,
}

impl fmt::Display for CategoryScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CategoryScope::Agents => write!(f, "agents"),
            CategoryScope::Candidates => write!(f, "candidates"),
        }
    }
}

impl FromStr for CategoryScope {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "agents" => Ok(CategoryScope::Agents),
            "candidates" => Ok(CategoryScope::Candidates),
            _ => Err(format!("Unknown category scope: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub scope: CategoryScope,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl Category {
    pub fn new(scope: CategoryScope, name: &str) -> Self {
        Self {
            scope,
            name: name.to_string(),
            created_at: Utc::now(),
        }
    }
}
