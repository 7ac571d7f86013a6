//! Typed configuration store (component 4.A).
//!
//! A small key→value dictionary where each value's type (integer or string)
//! is fixed the moment it's inserted. Recognized keys are the closed set in
//! [`Key`]; callers may also look up by the literal string name.

use crate::errors::ConfigError;
use std::collections::HashMap;

/// The closed set of configuration options the core understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Address,
    Port,
    Webroot,
    Nthreads,
    QueueSize,
    MimeFile,
}

impl Key {
    /// The literal name used in `server.cfg` and in string-keyed lookups.
    pub const fn name(self) -> &'static str {
        match self {
            Key::Address => "ADDRESS",
            Key::Port => "PORT",
            Key::Webroot => "WEBROOT",
            Key::Nthreads => "NTHREADS",
            Key::QueueSize => "QUEUE_SIZE",
            Key::MimeFile => "MIME_FILE",
        }
    }

    /// Reverse lookup from the literal config-file name, used by the
    /// external `KEY=VALUE` loader (4.L).
    pub fn from_name(name: &str) -> Option<Key> {
        match name {
            "ADDRESS" => Some(Key::Address),
            "PORT" => Some(Key::Port),
            "WEBROOT" => Some(Key::Webroot),
            "NTHREADS" => Some(Key::Nthreads),
            "QUEUE_SIZE" => Some(Key::QueueSize),
            "MIME_FILE" => Some(Key::MimeFile),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
enum Value {
    Int(i32),
    Str(String),
}

/// The dictionary itself. Not thread-safe by construction — it is filled
/// once during init and only ever read afterward (see §9, Global state).
#[derive(Debug, Default)]
pub struct Config {
    entries: HashMap<String, Value>,
}

impl Config {
    pub fn new() -> Self {
        Self { entries: HashMap::new() }
    }

    /// Inserts an integer entry. Errs if `name` is already present.
    pub fn add_int(&mut self, name: &str, value: i32) -> Result<(), ConfigError> {
        if self.entries.contains_key(name) {
            return Err(ConfigError::AlreadyExists);
        }
        self.entries.insert(name.to_string(), Value::Int(value));
        Ok(())
    }

    /// Inserts a string entry. Errs if `name` is already present.
    pub fn add_str(&mut self, name: &str, value: impl Into<String>) -> Result<(), ConfigError> {
        if self.entries.contains_key(name) {
            return Err(ConfigError::AlreadyExists);
        }
        self.entries.insert(name.to_string(), Value::Str(value.into()));
        Ok(())
    }

    /// Parses `raw` as a string and inserts it as an integer, rejecting
    /// values that don't fit `i32` rather than truncating them.
    pub fn add_int_from_str(&mut self, name: &str, raw: &str) -> Result<(), ConfigError> {
        let parsed: i32 = raw.parse()?;
        self.add_int(name, parsed)
    }

    pub fn get_int(&self, name: &str) -> Result<i32, ConfigError> {
        match self.entries.get(name) {
            None => Err(ConfigError::NotFound),
            Some(Value::Int(v)) => Ok(*v),
            Some(Value::Str(_)) => Err(ConfigError::WrongType),
        }
    }

    pub fn get_str(&self, name: &str) -> Result<&str, ConfigError> {
        match self.entries.get(name) {
            None => Err(ConfigError::NotFound),
            Some(Value::Str(v)) => Ok(v.as_str()),
            Some(Value::Int(_)) => Err(ConfigError::WrongType),
        }
    }

    /// Convenience overloads keyed by the enumerated option instead of a
    /// literal string; these are the only entry points the server core uses.
    pub fn get_int_key(&self, key: Key) -> Result<i32, ConfigError> {
        self.get_int(key.name())
    }

    pub fn get_str_key(&self, key: Key) -> Result<&str, ConfigError> {
        self.get_str(key.name())
    }

    pub fn get_int_or(&self, key: Key, default: i32) -> i32 {
        self.get_int_key(key).unwrap_or(default)
    }
}
