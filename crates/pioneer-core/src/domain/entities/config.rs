//! Structural view of a project configuration and the closed set of queries
//! a caller may run against it.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::error::DomainError;

/// An option value: one line, or a multi-line list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConfigValue {
    Single(String),
    Multi(Vec<String>),
}

impl ConfigValue {
    /// List items: one per line, comma-separated lines split further.
    pub fn items(&self) -> Vec<String> {
        let lines: Vec<&str> = match self {
            Self::Single(s) => s.lines().collect(),
            Self::Multi(v) => v.iter().map(String::as_str).collect(),
        };
        lines
            .into_iter()
            .flat_map(|line| line.split(','))
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// The value as a single string, list entries joined by newlines.
    pub fn joined(&self) -> String {
        match self {
            Self::Single(s) => s.clone(),
            Self::Multi(v) => v.join("\n"),
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            Self::Single(s) => Value::String(s.clone()),
            Self::Multi(v) => Value::from(v.clone()),
        }
    }
}

impl From<&str> for ConfigValue {
    fn from(s: &str) -> Self {
        Self::Single(s.to_string())
    }
}

impl From<String> for ConfigValue {
    fn from(s: String) -> Self {
        Self::Single(s)
    }
}

impl From<Vec<String>> for ConfigValue {
    fn from(v: Vec<String>) -> Self {
        Self::Multi(v)
    }
}

/// One section in raw structural form: `[name, [[option, value], ...]]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigSection(pub String, pub Vec<(String, ConfigValue)>);

impl ConfigSection {
    pub fn name(&self) -> &str {
        &self.0
    }

    pub fn options(&self) -> &[(String, ConfigValue)] {
        &self.1
    }
}

/// A whole configuration in raw structural form, sections in file order.
pub type ConfigTuple = Vec<ConfigSection>;

/// How much processing a configuration gets when opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadMode {
    /// Interpolate `${...}` references, apply `[env]`/`extends` inheritance
    /// and merge `extra_configs`.
    #[default]
    Full,
    /// Exactly what the file says; suitable for an editor round-trip.
    Raw,
}

/// A read-only question asked of a project configuration.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigQuery {
    Sections,
    Envs,
    DefaultEnvs,
    HasSection { section: String },
    HasOption { section: String, option: String },
    Options { section: String },
    Get {
        section: String,
        option: String,
        default: Option<Value>,
    },
    GetList { section: String, option: String },
    Items { section: String },
    AsTuple,
    Validate { silent: bool },
}

impl ConfigQuery {
    /// Map an RPC-style `method(args...)` call onto a query.
    ///
    /// Unknown methods and malformed arguments are rejected here, before any
    /// configuration file is touched.
    pub fn from_call(method: &str, args: &[Value]) -> Result<Self, DomainError> {
        let arity = |min: usize, max: usize| -> Result<(), DomainError> {
            if args.len() < min || args.len() > max {
                return Err(DomainError::InvalidConfigArguments {
                    method: method.to_string(),
                    reason: format!("expected {min}..={max} arguments, got {}", args.len()),
                });
            }
            Ok(())
        };
        let string_at = |idx: usize| -> Result<String, DomainError> {
            args.get(idx)
                .and_then(Value::as_str)
                .map(str::to_string)
                .ok_or_else(|| DomainError::InvalidConfigArguments {
                    method: method.to_string(),
                    reason: format!("argument {} must be a string", idx + 1),
                })
        };

        let query = match method {
            "sections" => {
                arity(0, 0)?;
                Self::Sections
            }
            "envs" => {
                arity(0, 0)?;
                Self::Envs
            }
            "default_envs" => {
                arity(0, 0)?;
                Self::DefaultEnvs
            }
            "has_section" => {
                arity(1, 1)?;
                Self::HasSection {
                    section: string_at(0)?,
                }
            }
            "has_option" => {
                arity(2, 2)?;
                Self::HasOption {
                    section: string_at(0)?,
                    option: string_at(1)?,
                }
            }
            "options" => {
                arity(1, 1)?;
                Self::Options {
                    section: string_at(0)?,
                }
            }
            "get" => {
                arity(2, 3)?;
                Self::Get {
                    section: string_at(0)?,
                    option: string_at(1)?,
                    default: args.get(2).cloned(),
                }
            }
            "get_list" => {
                arity(2, 2)?;
                Self::GetList {
                    section: string_at(0)?,
                    option: string_at(1)?,
                }
            }
            "items" => {
                arity(1, 1)?;
                Self::Items {
                    section: string_at(0)?,
                }
            }
            "as_tuple" => {
                arity(0, 0)?;
                Self::AsTuple
            }
            "validate" => {
                arity(0, 1)?;
                let silent = match args.first() {
                    None => false,
                    Some(v) => v.as_bool().ok_or_else(|| DomainError::InvalidConfigArguments {
                        method: method.to_string(),
                        reason: "argument 1 must be a boolean".into(),
                    })?,
                };
                Self::Validate { silent }
            }
            other => {
                return Err(DomainError::UnknownConfigMethod {
                    method: other.to_string(),
                });
            }
        };
        Ok(query)
    }

    /// The method name this query answers to.
    pub const fn method(&self) -> &'static str {
        match self {
            Self::Sections => "sections",
            Self::Envs => "envs",
            Self::DefaultEnvs => "default_envs",
            Self::HasSection { .. } => "has_section",
            Self::HasOption { .. } => "has_option",
            Self::Options { .. } => "options",
            Self::Get { .. } => "get",
            Self::GetList { .. } => "get_list",
            Self::Items { .. } => "items",
            Self::AsTuple => "as_tuple",
            Self::Validate { .. } => "validate",
        }
    }
}
