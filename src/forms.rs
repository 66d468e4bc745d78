use std::fmt;

use serde::Deserialize;

use crate::models::{Energy, Friend};

pub const FRIEND_NAME_MAX: usize = 100;
pub const MESSAGE_TEXT_MAX: usize = 255;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> FieldError {
        FieldError { field: field.into(), message: message.into() }
    }
}

/// Every problem found in one submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(pub Vec<FieldError>);

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.push(FieldError::new(field, message));
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    fn into_result<T>(self, value: impl FnOnce() -> T) -> Result<T, ValidationErrors> {
        if self.is_empty() { Ok(value()) } else { Err(self) }
    }
}

impl From<Vec<FieldError>> for ValidationErrors {
    fn from(errors: Vec<FieldError>) -> Self {
        ValidationErrors(errors)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (i, FieldError { field, message }) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{field}: {message}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Raw urlencoded pairs, for forms whose field names are only known at runtime.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct FormFields(pub Vec<(String, String)>);

impl FormFields {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|(key, _)| key == name)
    }

    /// Pairs whose key starts with `prefix`, with the prefix stripped.
    pub fn with_prefix<'a>(&'a self, prefix: &'a str) -> impl Iterator<Item = (&'a str, &'a str)> + 'a {
        self.0
            .iter()
            .filter_map(move |(key, value)| Some((key.strip_prefix(prefix)?, value.as_str())))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewFriend {
    pub name: String,
    pub energy: Energy,
}

/// Name is required and trimmed; energy falls back to medium when left out.
pub fn validate_new_friend(name: Option<&str>, energy: Option<&str>) -> Result<NewFriend, ValidationErrors> {
    let mut errors = ValidationErrors::default();

    let name = name.unwrap_or_default().trim();
    if name.is_empty() {
        errors.push("name", "This field is required.");
    } else if name.chars().count() > FRIEND_NAME_MAX {
        errors.push("name", format!("Ensure this value has at most {FRIEND_NAME_MAX} characters."));
    }

    let energy = match energy.map(str::trim).filter(|raw| !raw.is_empty()) {
        None => Energy::default(),
        Some(raw) => raw.parse::<Energy>().unwrap_or_else(|_| {
            errors.push("energy", format!("Select a valid choice. {raw} is not one of the available choices."));
            Energy::default()
        }),
    };

    errors.into_result(|| NewFriend { name: name.to_owned(), energy })
}

/// Reads `energy-<id>=<level>` pairs against the current friend list.
/// Friends without a pair keep their level.
pub fn validate_energy_updates(fields: &FormFields, friends: &[Friend]) -> Result<Vec<(i64, Energy)>, ValidationErrors> {
    let mut errors = ValidationErrors::default();
    let mut updates = Vec::new();

    for (raw_id, raw_energy) in fields.with_prefix("energy-") {
        let field = format!("energy-{raw_id}");
        let Ok(id) = raw_id.parse::<i64>() else {
            errors.push(field, "Unknown friend.");
            continue;
        };
        if !friends.iter().any(|friend| friend.id == id) {
            errors.push(field, "Unknown friend.");
            continue;
        }
        match raw_energy.parse::<Energy>() {
            Ok(energy) => updates.push((id, energy)),
            Err(_) => errors.push(field, format!("Select a valid choice. {raw_energy} is not one of the available choices.")),
        }
    }

    errors.into_result(|| updates)
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatForm {
    pub sender_id: Option<String>,
    pub text: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatPost {
    /// Sender or text missing; nothing to store.
    Empty,
    Message { sender_id: i64, text: String },
}

pub fn validate_chat_post(ChatForm { sender_id, text }: &ChatForm) -> Result<ChatPost, ValidationErrors> {
    let sender_id = sender_id.as_deref().unwrap_or_default().trim();
    let text = text.as_deref().unwrap_or_default().trim();
    if sender_id.is_empty() || text.is_empty() {
        return Ok(ChatPost::Empty);
    }

    let mut errors = ValidationErrors::default();
    let sender_id = parse_id("sender_id", sender_id).unwrap_or_else(|err| {
        errors.0.extend(err.0);
        0
    });
    if text.chars().count() > MESSAGE_TEXT_MAX {
        errors.push("text", format!("Ensure this value has at most {MESSAGE_TEXT_MAX} characters."));
    }

    errors.into_result(|| ChatPost::Message { sender_id, text: text.to_owned() })
}

pub fn parse_id(field: &str, raw: &str) -> Result<i64, ValidationErrors> {
    raw.trim()
        .parse()
        .map_err(|_| ValidationErrors::from(vec![FieldError::new(field, "Enter a whole number.")]))
}
