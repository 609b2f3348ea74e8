use serde::Serialize;

use super::aggregate::AggregatedScore;
use crate::error::ValidationError;
use crate::snapshot::{Child, Gender, Id};

/// Best boy (König) or best girl (Königin) of a class.
#[derive(Debug, Clone, Serialize)]
pub struct Crown {
    pub class_label: String,
    pub gender: Gender,
    pub title: &'static str,
    pub child_id: Id,
    pub child_name: String,
    pub points: f64,
}

/// Pick the first boy and the first girl from a class's ranking.
///
/// `entries` must already be in ranking order. A gender with no children
/// gets no crown. Crowns are awarded regardless of completion.
pub fn select_crowns(
    class_label: &str,
    entries: &[(&Child, &AggregatedScore)],
) -> Result<Vec<Crown>, ValidationError> {
    let unrecognized = entries.iter().find_map(|(child, _)| match &child.gender {
        Gender::Unrecognized(value) => Some(ValidationError::UnrecognizedGender {
            child_id: child.id.clone(),
            value: value.clone(),
        }),
        Gender::Boy | Gender::Girl => None,
    });
    if let Some(err) = unrecognized {
        return Err(err);
    }

    let crowns = [Gender::Boy, Gender::Girl]
        .into_iter()
        .filter_map(|gender| {
            let (child, score) = entries.iter().find(|(c, _)| c.gender == gender)?;
            let title = gender.crown_title()?;
            Some(Crown {
                class_label: class_label.to_string(),
                title,
                child_id: child.id.clone(),
                child_name: child.name.clone(),
                points: score.total,
                gender,
            })
        })
        .collect();

    Ok(crowns)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::completion::CompletionStatus;
    use crate::scoring::policy::AggregationMode;

    fn child(id: &str, gender: Gender) -> Child {
        Child {
            id: Id::from(id),
            name: id.to_string(),
            gender,
            class_label: "2a".into(),
            group_id: None,
        }
    }

    fn score(id: &str, total: f64) -> AggregatedScore {
        AggregatedScore {
            child_id: Id::from(id),
            total,
            games_participated: 1,
            games_expected: 2,
            status: CompletionStatus::Incomplete,
            mode: AggregationMode::Ranked,
            rank: None,
        }
    }

    #[test]
    fn test_one_king_one_queen() {
        let children = vec![
            child("ben", Gender::Boy),
            child("anna", Gender::Girl),
            child("cem", Gender::Boy),
            child("dora", Gender::Girl),
        ];
        let scores = vec![score("ben", 20.0), score("anna", 19.0), score("cem", 16.0), score("dora", 3.0)];
        let entries: Vec<(&Child, &AggregatedScore)> = children.iter().zip(scores.iter()).collect();

        let crowns = select_crowns("2a", &entries).unwrap();
        assert_eq!(crowns.len(), 2);
        assert_eq!(crowns[0].title, "König");
        assert_eq!(crowns[0].child_id, Id::from("ben"));
        assert_eq!(crowns[0].gender, Gender::Boy);
        assert_eq!(crowns[1].title, "Königin");
        assert_eq!(crowns[1].child_id, Id::from("anna"));
        assert_eq!(crowns[1].points, 19.0);
    }

    #[test]
    fn test_missing_gender_gets_no_crown() {
        let children = vec![child("ben", Gender::Boy)];
        let scores = vec![score("ben", 0.0)];
        let entries: Vec<(&Child, &AggregatedScore)> = children.iter().zip(scores.iter()).collect();

        let crowns = select_crowns("2a", &entries).unwrap();
        assert_eq!(crowns.len(), 1);
        assert_eq!(crowns[0].title, "König");
    }

    #[test]
    fn test_empty_class() {
        assert!(select_crowns("2a", &[]).unwrap().is_empty());
    }

    #[test]
    fn test_unrecognized_gender_is_error() {
        let children = vec![
            child("ben", Gender::Boy),
            child("kim", Gender::Unrecognized("d".into())),
        ];
        let scores = vec![score("ben", 10.0), score("kim", 5.0)];
        let entries: Vec<(&Child, &AggregatedScore)> = children.iter().zip(scores.iter()).collect();

        let err = select_crowns("2a", &entries).unwrap_err();
        assert_eq!(
            err,
            ValidationError::UnrecognizedGender {
                child_id: Id::from("kim"),
                value: "d".to_string(),
            }
        );
    }
}
