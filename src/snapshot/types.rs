use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Identifier for games, groups, children and results.
///
/// Upstream data mixes numeric and textual ids, so `7` and `"7"` both
/// deserialize to the same `Id`. Everything past the snapshot boundary
/// compares `Id` values only.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Id(String);

impl Id {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Id {
    fn from(s: &str) -> Self {
        Id(s.trim().to_string())
    }
}

impl From<String> for Id {
    fn from(s: String) -> Self {
        Id::from(s.as_str())
    }
}

impl From<i64> for Id {
    fn from(n: i64) -> Self {
        Id(n.to_string())
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Id {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Int(i64),
            Text(String),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Int(n) => Id::from(n),
            RawId::Text(s) => Id::from(s),
        })
    }
}

/// Whether a smaller or larger raw value wins a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringDirection {
    HigherIsBetter,
    LowerIsBetter,
}

impl ScoringDirection {
    /// Map a scoring-type tag ("time with penalty", "distance", ...) to a direction.
    ///
    /// Time-like tags are lower-is-better; every other tag counts upwards.
    pub fn from_scoring_type(tag: &str) -> Self {
        let tag = tag.trim().to_lowercase();
        let lower_wins = tag.starts_with("time")
            || tag.starts_with("zeit")
            || tag.contains("lower")
            || tag == "errors"
            || tag == "fehler";

        if lower_wins {
            ScoringDirection::LowerIsBetter
        } else {
            ScoringDirection::HigherIsBetter
        }
    }

    /// Order two values best-first: `Less` means `a` beats `b`.
    pub fn compare(&self, a: f64, b: f64) -> Ordering {
        match self {
            ScoringDirection::HigherIsBetter => b.total_cmp(&a),
            ScoringDirection::LowerIsBetter => a.total_cmp(&b),
        }
    }

    pub fn is_better(&self, a: f64, b: f64) -> bool {
        self.compare(a, b) == Ordering::Less
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Game {
    pub id: Id,
    pub name: String,
    pub direction: ScoringDirection,
}

#[derive(Debug, Clone, Serialize)]
pub struct Group {
    pub id: Id,
    pub name: String,
    pub class_label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Gender {
    Boy,
    Girl,
    /// Kept verbatim so crown selection can reject it.
    Unrecognized(String),
}

impl Gender {
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "boy" | "b" | "m" | "male" | "junge" | "j" => Gender::Boy,
            "girl" | "g" | "w" | "f" | "female" | "mädchen" | "maedchen" => Gender::Girl,
            _ => Gender::Unrecognized(s.to_string()),
        }
    }

    /// Title of the crown this gender competes for.
    pub fn crown_title(&self) -> Option<&'static str> {
        match self {
            Gender::Boy => Some("König"),
            Gender::Girl => Some("Königin"),
            Gender::Unrecognized(_) => None,
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Gender::Boy => write!(f, "m"),
            Gender::Girl => write!(f, "w"),
            Gender::Unrecognized(raw) => write!(f, "?{}", raw),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Child {
    pub id: Id,
    pub name: String,
    pub gender: Gender,
    pub class_label: String,
    /// Primary group; absent when the roster has no assignment yet.
    pub group_id: Option<Id>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ClassGameAssignment {
    pub class_label: String,
    pub game_id: Id,
}

/// One validated measurement of a child in a game.
#[derive(Debug, Clone, Serialize)]
pub struct GameResult {
    pub id: Id,
    pub child_id: Id,
    pub game_id: Id,
    pub group_id: Id,
    pub value: f64,
    pub recorded_at: Option<DateTime<Utc>>,
}

/// Immutable, validated view of everything the engine reads.
///
/// Built once per computation pass; all scoring functions borrow it.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub games: Vec<Game>,
    pub groups: Vec<Group>,
    pub children: Vec<Child>,
    pub assignments: Vec<ClassGameAssignment>,
    pub results: Vec<GameResult>,
}

impl Snapshot {
    pub fn group(&self, id: &Id) -> Option<&Group> {
        self.groups.iter().find(|g| &g.id == id)
    }

    /// Class labels seen on groups or children, sorted and deduplicated.
    pub fn class_labels(&self) -> Vec<String> {
        let mut labels: Vec<String> = self
            .groups
            .iter()
            .map(|g| g.class_label.clone())
            .chain(self.children.iter().map(|c| c.class_label.clone()))
            .collect();
        labels.sort();
        labels.dedup();
        labels
    }

    pub fn has_class(&self, class_label: &str) -> bool {
        self.groups.iter().any(|g| g.class_label == class_label)
            || self.children.iter().any(|c| c.class_label == class_label)
    }

    /// Children of a class in roster order.
    pub fn children_in_class<'a>(&'a self, class_label: &'a str) -> impl Iterator<Item = &'a Child> {
        self.children
            .iter()
            .filter(move |c| c.class_label == class_label)
    }

    pub fn groups_in_class<'a>(&'a self, class_label: &'a str) -> impl Iterator<Item = &'a Group> {
        self.groups
            .iter()
            .filter(move |g| g.class_label == class_label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_from_number_and_text_are_equal() {
        let from_json: Id = serde_json::from_str("7").unwrap();
        let from_text: Id = serde_json::from_str("\" 7 \"").unwrap();
        assert_eq!(from_json, from_text);
        assert_eq!(from_json.as_str(), "7");
    }

    #[test]
    fn test_id_from_yaml() {
        let ids: Vec<Id> = serde_saphyr::from_str("[12, \"12\", abc]").unwrap();
        assert_eq!(ids[0], ids[1]);
        assert_eq!(ids[2], Id::from("abc"));
    }

    #[test]
    fn test_direction_from_scoring_type() {
        assert_eq!(
            ScoringDirection::from_scoring_type("time with penalty"),
            ScoringDirection::LowerIsBetter
        );
        assert_eq!(
            ScoringDirection::from_scoring_type("Zeit"),
            ScoringDirection::LowerIsBetter
        );
        assert_eq!(
            ScoringDirection::from_scoring_type("distance"),
            ScoringDirection::HigherIsBetter
        );
        assert_eq!(
            ScoringDirection::from_scoring_type("points"),
            ScoringDirection::HigherIsBetter
        );
    }

    #[test]
    fn test_direction_compare() {
        assert!(ScoringDirection::HigherIsBetter.is_better(8.0, 5.0));
        assert!(ScoringDirection::LowerIsBetter.is_better(10.0, 12.0));
        assert!(!ScoringDirection::LowerIsBetter.is_better(10.0, 10.0));
    }

    #[test]
    fn test_gender_parse() {
        assert_eq!(Gender::parse("Junge"), Gender::Boy);
        assert_eq!(Gender::parse(" w "), Gender::Girl);
        assert_eq!(Gender::parse("Mädchen"), Gender::Girl);
        assert_eq!(Gender::parse("x"), Gender::Unrecognized("x".to_string()));
    }

    #[test]
    fn test_class_labels_sorted_unique() {
        let snapshot = Snapshot {
            groups: vec![
                Group { id: Id::from("g2"), name: "B".into(), class_label: "2a".into() },
                Group { id: Id::from("g1"), name: "A".into(), class_label: "1b".into() },
            ],
            children: vec![Child {
                id: Id::from("c1"),
                name: "Anna".into(),
                gender: Gender::Girl,
                class_label: "2a".into(),
                group_id: None,
            }],
            ..Default::default()
        };
        assert_eq!(snapshot.class_labels(), vec!["1b".to_string(), "2a".to_string()]);
        assert!(snapshot.has_class("1b"));
        assert!(!snapshot.has_class("3c"));
    }
}
