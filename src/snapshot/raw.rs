use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::types::{
    Child, ClassGameAssignment, Game, GameResult, Gender, Group, Id, ScoringDirection, Snapshot,
};
use crate::error::ValidationError;

/// Snapshot document as handed over by the persistence layer.
///
/// Example YAML:
/// ```yaml
/// games:
///   - { id: 1, name: Sackhüpfen, scoring_type: time with penalty }
///   - { id: 2, name: Weitwurf, scoring_type: distance }
/// groups:
///   - { id: 10, name: Füchse, class: 2a }
/// children:
///   - { id: 100, name: Anna, gender: w, class: 2a, group: 10 }
/// assignments:
///   - { class: 2a, game: 1 }
/// results:
///   - { id: 1000, child: 100, game: 1, group: 10, value: "12,4", recorded_at: 2026-06-19T09:30:00Z }
/// ```
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawSnapshot {
    #[serde(default)]
    pub games: Vec<RawGame>,
    #[serde(default)]
    pub groups: Vec<RawGroup>,
    #[serde(default)]
    pub children: Vec<RawChild>,
    #[serde(default)]
    pub assignments: Vec<RawAssignment>,
    #[serde(default)]
    pub results: Vec<RawResult>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RawGame {
    pub id: Id,
    pub name: String,
    /// Free-form tag such as "time with penalty" or "distance"
    #[serde(default)]
    pub scoring_type: Option<String>,
    /// Explicit direction, takes precedence over `scoring_type`
    #[serde(default)]
    pub direction: Option<ScoringDirection>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RawGroup {
    pub id: Id,
    pub name: String,
    #[serde(rename = "class")]
    pub class_label: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RawChild {
    pub id: Id,
    pub name: String,
    pub gender: String,
    #[serde(rename = "class")]
    pub class_label: String,
    #[serde(default, rename = "group")]
    pub group_id: Option<Id>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RawAssignment {
    #[serde(rename = "class")]
    pub class_label: String,
    #[serde(rename = "game")]
    pub game_id: Id,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RawResult {
    pub id: Id,
    #[serde(rename = "child")]
    pub child_id: Id,
    #[serde(rename = "game")]
    pub game_id: Id,
    #[serde(rename = "group")]
    pub group_id: Id,
    #[serde(default)]
    pub value: Option<RawValue>,
    #[serde(default)]
    pub recorded_at: Option<DateTime<Utc>>,
}

/// Measured value as entered at the station: a number or whatever text was typed.
///
/// Anything else (booleans, lists, maps) is kept as `Other` so the document
/// still loads and the result is reported by id during validation.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(untagged)]
pub enum RawValue {
    Number(f64),
    Text(String),
    Other(serde_json::Value),
}

impl RawValue {
    /// Parse to a finite number. Text may use a decimal comma ("12,5").
    pub fn parse(&self) -> Option<f64> {
        let value = match self {
            RawValue::Number(n) => *n,
            RawValue::Text(s) => s.trim().replace(',', ".").parse::<f64>().ok()?,
            RawValue::Other(_) => return None,
        };
        value.is_finite().then_some(value)
    }

    fn display(&self) -> String {
        match self {
            RawValue::Number(n) => n.to_string(),
            RawValue::Text(s) => s.clone(),
            RawValue::Other(v) => v.to_string(),
        }
    }
}

impl RawSnapshot {
    /// Validate the document into an immutable [`Snapshot`].
    /// Returns all validation errors at once (not just the first).
    pub fn validate(self) -> Result<Snapshot, Vec<ValidationError>> {
        let mut errors = Vec::new();

        let games = self
            .games
            .into_iter()
            .map(|g| {
                let direction = match (g.direction, g.scoring_type.as_deref()) {
                    (Some(direction), _) => direction,
                    (None, Some(tag)) => ScoringDirection::from_scoring_type(tag),
                    (None, None) => {
                        warn!("Game {} has no scoring type, assuming higher is better", g.id);
                        ScoringDirection::HigherIsBetter
                    }
                };
                Game {
                    id: g.id,
                    name: g.name,
                    direction,
                }
            })
            .collect();

        let groups: Vec<Group> = self
            .groups
            .into_iter()
            .map(|g| Group {
                id: g.id,
                name: g.name,
                class_label: g.class_label.trim().to_string(),
            })
            .collect();

        let children = self
            .children
            .into_iter()
            .map(|c| Child {
                id: c.id,
                name: c.name,
                gender: Gender::parse(&c.gender),
                class_label: c.class_label.trim().to_string(),
                group_id: c.group_id,
            })
            .collect();

        let assignments = self
            .assignments
            .into_iter()
            .map(|a| ClassGameAssignment {
                class_label: a.class_label.trim().to_string(),
                game_id: a.game_id,
            })
            .collect();

        let mut results = Vec::with_capacity(self.results.len());
        for r in self.results {
            let parsed = r.value.as_ref().and_then(RawValue::parse);
            let Some(value) = parsed else {
                errors.push(ValidationError::NonNumericValue {
                    result_id: r.id,
                    value: r.value.as_ref().map(RawValue::display).unwrap_or_default(),
                });
                continue;
            };

            if !groups.iter().any(|g| g.id == r.group_id) {
                warn!("Result {} refers to unknown group {}", r.id, r.group_id);
            }

            results.push(GameResult {
                id: r.id,
                child_id: r.child_id,
                game_id: r.game_id,
                group_id: r.group_id,
                value,
                recorded_at: r.recorded_at,
            });
        }

        if errors.is_empty() {
            Ok(Snapshot {
                games,
                groups,
                children,
                assignments,
                results,
            })
        } else {
            Err(errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
games:
  - { id: 1, name: Sackhüpfen, scoring_type: time with penalty }
  - { id: "2", name: Weitwurf, scoring_type: distance }
  - { id: 3, name: Zielwurf, direction: lower_is_better }
groups:
  - { id: 10, name: Füchse, class: 2a }
children:
  - { id: 100, name: Anna, gender: w, class: 2a, group: 10 }
  - { id: 101, name: Ben, gender: m, class: 2a }
assignments:
  - { class: 2a, game: "1" }
results:
  - { id: 1000, child: 100, game: 1, group: 10, value: "12,5", recorded_at: "2026-06-19T09:30:00Z" }
  - { id: 1001, child: "101", game: 2, group: "10", value: 31 }
"#;

    #[test]
    fn test_validate_sample() {
        let raw: RawSnapshot = serde_saphyr::from_str(SAMPLE).unwrap();
        let snapshot = raw.validate().unwrap();

        assert_eq!(snapshot.games.len(), 3);
        assert_eq!(snapshot.games[0].direction, ScoringDirection::LowerIsBetter);
        assert_eq!(snapshot.games[1].direction, ScoringDirection::HigherIsBetter);
        assert_eq!(snapshot.games[2].direction, ScoringDirection::LowerIsBetter);
        assert_eq!(snapshot.children[0].gender, Gender::Girl);
        assert_eq!(snapshot.children[1].group_id, None);
        assert_eq!(snapshot.assignments[0].game_id, Id::from(1));
        assert_eq!(snapshot.results[0].value, 12.5);
        assert!(snapshot.results[0].recorded_at.is_some());
        assert_eq!(snapshot.results[1].child_id, Id::from(101));
        assert_eq!(snapshot.results[1].value, 31.0);
    }

    #[test]
    fn test_raw_value_parse() {
        assert_eq!(RawValue::Number(8.0).parse(), Some(8.0));
        assert_eq!(RawValue::Text(" 3.25 ".into()).parse(), Some(3.25));
        assert_eq!(RawValue::Text("3,25".into()).parse(), Some(3.25));
        assert_eq!(RawValue::Text("abc".into()).parse(), None);
        assert_eq!(RawValue::Text("".into()).parse(), None);
        assert_eq!(RawValue::Text("NaN".into()).parse(), None);
        assert_eq!(RawValue::Text("inf".into()).parse(), None);
    }

    #[test]
    fn test_non_numeric_values_are_rejected_not_zeroed() {
        let yaml = r#"
results:
  - { id: 1, child: 1, game: 1, group: 1, value: "dnf" }
  - { id: 2, child: 2, game: 1, group: 1, value: 4 }
  - { id: 3, child: 3, game: 1, group: 1 }
"#;
        let raw: RawSnapshot = serde_saphyr::from_str(yaml).unwrap();
        let errors = raw.validate().unwrap_err();

        assert_eq!(errors.len(), 2);
        assert_eq!(
            errors[0],
            ValidationError::NonNumericValue {
                result_id: Id::from(1),
                value: "dnf".to_string(),
            }
        );
        assert!(matches!(
            &errors[1],
            ValidationError::NonNumericValue { result_id, .. } if *result_id == Id::from(3)
        ));
    }

    #[test]
    fn test_json_values_of_other_types_are_reported_by_id() {
        let json = r#"{
            "results": [
                {"id": 42, "child": 1, "game": 1, "group": 1, "value": true},
                {"id": 43, "child": 2, "game": 1, "group": 1, "value": [1]},
                {"id": 44, "child": 3, "game": 1, "group": 1, "value": 7}
            ]
        }"#;
        let raw: RawSnapshot = serde_json::from_str(json).unwrap();
        let errors = raw.validate().unwrap_err();

        assert_eq!(
            errors,
            vec![
                ValidationError::NonNumericValue {
                    result_id: Id::from(42),
                    value: "true".to_string(),
                },
                ValidationError::NonNumericValue {
                    result_id: Id::from(43),
                    value: "[1]".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_yaml_boolean_value_is_reported_by_id() {
        let yaml = r#"
results:
  - { id: 42, child: 1, game: 1, group: 1, value: true }
  - { id: 43, child: 2, game: 1, group: 1, value: [1, 2] }
  - { id: 44, child: 3, game: 1, group: 1, value: "5,5" }
"#;
        let raw: RawSnapshot = serde_saphyr::from_str(yaml).unwrap();
        let errors = raw.validate().unwrap_err();

        let ids: Vec<&Id> = errors
            .iter()
            .filter_map(|e| match e {
                ValidationError::NonNumericValue { result_id, .. } => Some(result_id),
                _ => None,
            })
            .collect();
        assert_eq!(ids, vec![&Id::from(42), &Id::from(43)]);
    }

    #[test]
    fn test_empty_document() {
        let raw: RawSnapshot = serde_saphyr::from_str("{}").unwrap();
        let snapshot = raw.validate().unwrap();
        assert!(snapshot.games.is_empty());
        assert!(snapshot.results.is_empty());
    }

    #[test]
    fn test_json_document() {
        let json = r#"{
            "games": [{"id": 1, "name": "Lauf", "scoring_type": "time"}],
            "results": [{"id": 5, "child": 1, "game": 1, "group": 1, "value": 9.8}]
        }"#;
        let raw: RawSnapshot = serde_json::from_str(json).unwrap();
        let snapshot = raw.validate().unwrap();
        assert_eq!(snapshot.results[0].value, 9.8);
    }
}
