//! Metadata filters applied to similarity queries

use serde::Serialize;
use std::collections::BTreeMap;

use super::query::QueryParams;

/// A single-field condition, serialised in the `{"$op": value}` shape the
/// index expects
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum FilterCondition {
  #[serde(rename = "$eq")]
  Eq(String),
  #[serde(rename = "$in")]
  In(Vec<String>),
}

/// Conjunction of per-field conditions
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct MetadataFilter {
  conditions: BTreeMap<String, FilterCondition>,
}

impl MetadataFilter {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn eq(mut self, field: &str, value: impl Into<String>) -> Self {
    self.conditions.insert(field.to_string(), FilterCondition::Eq(value.into()));
    self
  }

  pub fn one_of(mut self, field: &str, values: Vec<String>) -> Self {
    self.conditions.insert(field.to_string(), FilterCondition::In(values));
    self
  }

  /// Filter for a retrieval request. `keywords` is only constrained when the
  /// caller supplied some; `topic` only when `match_topic` is set.
  pub fn for_query(params: &QueryParams, match_topic: bool) -> Self {
    let mut filter = Self::new().eq("cefr_level", params.cefr_level.as_str());
    if match_topic {
      filter = filter.eq("topic", params.topic.clone());
    }
    if !params.keywords.is_empty() {
      filter = filter.one_of("keywords", params.keywords.clone());
    }
    filter
  }

  pub fn get(&self, field: &str) -> Option<&FilterCondition> {
    self.conditions.get(field)
  }

  pub fn len(&self) -> usize {
    self.conditions.len()
  }

  pub fn is_empty(&self) -> bool {
    self.conditions.is_empty()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::models::{CefrLevel, Workflow};
  use serde_json::json;

  fn params(keywords: &[&str]) -> QueryParams {
    QueryParams {
      workflow: Workflow::Bespoke,
      cefr_level: CefrLevel::B1,
      topic: "Travel".to_string(),
      keywords: keywords.iter().map(|k| k.to_string()).collect(),
      length: None,
      main_text: None,
    }
  }

  #[test]
  fn test_filter_without_keywords() {
    let filter = MetadataFilter::for_query(&params(&[]), true);
    assert_eq!(
      serde_json::to_value(&filter).unwrap(),
      json!({
        "cefr_level": { "$eq": "B1" },
        "topic": { "$eq": "Travel" }
      })
    );
    assert!(filter.get("keywords").is_none());
  }

  #[test]
  fn test_filter_with_keywords() {
    let filter = MetadataFilter::for_query(&params(&["airport", "hotel"]), true);
    assert_eq!(
      serde_json::to_value(&filter).unwrap(),
      json!({
        "cefr_level": { "$eq": "B1" },
        "keywords": { "$in": ["airport", "hotel"] },
        "topic": { "$eq": "Travel" }
      })
    );
  }

  #[test]
  fn test_topic_condition_can_be_dropped() {
    let filter = MetadataFilter::for_query(&params(&[]), false);
    assert_eq!(filter.len(), 1);
    assert!(filter.get("topic").is_none());
  }
}
