//! Free-text `user_message` parsing
//!
//! Messages are a small line grammar:
//!
//! ```text
//! message   := line* main_text?
//! line      := key ':' value
//! main_text := 'Main Text' ':' <anything up to end of message>
//! ```
//!
//! Keys are case-insensitive and normalised to snake case. `Main Text` is the
//! only field allowed to span lines, so it is cut off before the line scan
//! and can never leak `Key: value` lookalikes into the other fields.

use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

use super::query::{split_keywords, QueryParams};
use crate::models::{CefrLevel, Workflow};

static MAIN_TEXT_LABEL: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"(?im)^[ \t]*main[ _]text[ \t]*:").expect("main text label pattern is valid")
});

static KEY_VALUE_LINE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"^\s*([A-Za-z][A-Za-z0-9 _-]*?)\s*:\s*(.*?)\s*$")
    .expect("key/value line pattern is valid")
});

/// A field the message must provide for retrieval to run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequiredField {
  Workflow,
  CefrLevel,
  Topic,
}

impl RequiredField {
  pub fn as_str(&self) -> &'static str {
    match self {
      RequiredField::Workflow => "workflow",
      RequiredField::CefrLevel => "cefr_level",
      RequiredField::Topic => "topic",
    }
  }
}

/// Every required field that was absent or carried an unacceptable value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseFailure {
  pub missing: Vec<RequiredField>,
}

impl fmt::Display for ParseFailure {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let names: Vec<&str> = self.missing.iter().map(RequiredField::as_str).collect();
    write!(f, "Could not parse 'user_message': missing or invalid {}.", names.join(", "))
  }
}

impl std::error::Error for ParseFailure {}

#[derive(Debug, Default)]
struct ScannedFields {
  workflow: Option<Workflow>,
  cefr_level: Option<CefrLevel>,
  topic: Option<String>,
  keywords: Vec<String>,
  length: Option<String>,
}

impl ScannedFields {
  fn accept(&mut self, key: &str, value: &str) {
    match key {
      "workflow" => {
        if let Some(workflow) = Workflow::parse_loose(value) {
          self.workflow = Some(workflow);
        }
      }
      "level" | "cefr_level" => {
        if let Some(level) = CefrLevel::parse_loose(value) {
          self.cefr_level = Some(level);
        }
      }
      "topic" if !value.is_empty() => self.topic = Some(value.to_string()),
      "keywords" => {
        let keywords = split_keywords(value);
        if !keywords.is_empty() {
          self.keywords = keywords;
        }
      }
      "length" if !value.is_empty() && value.chars().all(|c| c.is_ascii_digit()) => {
        self.length = Some(value.to_string());
      }
      _ => {}
    }
  }
}

/// Parse a `user_message` into retrieval parameters.
pub fn parse_user_message(message: &str) -> Result<QueryParams, ParseFailure> {
  let (head, main_text) = split_main_text(message);

  let mut fields = ScannedFields::default();
  for line in head.lines() {
    if let Some((key, value)) = key_value(line) {
      fields.accept(&key, &value);
    }
  }

  let mut missing = Vec::new();
  if fields.workflow.is_none() {
    missing.push(RequiredField::Workflow);
  }
  if fields.cefr_level.is_none() {
    missing.push(RequiredField::CefrLevel);
  }
  if fields.topic.is_none() {
    missing.push(RequiredField::Topic);
  }

  match (fields.workflow, fields.cefr_level, fields.topic) {
    (Some(workflow), Some(cefr_level), Some(topic)) => Ok(QueryParams {
      workflow,
      cefr_level,
      topic,
      keywords: fields.keywords,
      length: fields.length,
      main_text,
    }),
    _ => Err(ParseFailure { missing }),
  }
}

fn split_main_text(message: &str) -> (&str, Option<String>) {
  match MAIN_TEXT_LABEL.find(message) {
    Some(label) => {
      let text = message[label.end()..].trim();
      let main_text = (!text.is_empty()).then(|| text.to_string());
      (&message[..label.start()], main_text)
    }
    None => (message, None),
  }
}

fn key_value(line: &str) -> Option<(String, String)> {
  let captures = KEY_VALUE_LINE.captures(line)?;
  let key = captures.get(1)?.as_str().trim().to_lowercase().replace(' ', "_");
  let value = captures.get(2)?.as_str().to_string();
  Some((key, value))
}
