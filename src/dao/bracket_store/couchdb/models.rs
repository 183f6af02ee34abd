use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::dao::models::{PredictionEntity, TournamentEntity};

pub const TOURNAMENT_PREFIX: &str = "tournament::";
pub const PREDICTION_PREFIX: &str = "prediction::";
pub const END_SUFFIX: &str = "\u{ffff}";

#[derive(Debug, Deserialize)]
pub struct AllDocsResponse {
    pub rows: Vec<AllDocsRow>,
}

#[derive(Debug, Deserialize)]
pub struct AllDocsRow {
    #[serde(default)]
    pub doc: Option<Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CouchTournamentDocument {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "_rev", skip_serializing_if = "Option::is_none")]
    pub rev: Option<String>,
    #[serde(flatten)]
    pub tournament: TournamentEntity,
}

impl From<TournamentEntity> for CouchTournamentDocument {
    fn from(tournament: TournamentEntity) -> Self {
        Self {
            id: tournament_doc_id(&tournament.game_id),
            rev: None,
            tournament,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CouchPredictionDocument {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "_rev", skip_serializing_if = "Option::is_none")]
    pub rev: Option<String>,
    #[serde(flatten)]
    pub prediction: PredictionEntity,
}

impl From<PredictionEntity> for CouchPredictionDocument {
    fn from(prediction: PredictionEntity) -> Self {
        Self {
            id: prediction_doc_id(&prediction.game_id, prediction.id),
            rev: None,
            prediction,
        }
    }
}

pub fn tournament_doc_id(game_id: &str) -> String {
    format!("{TOURNAMENT_PREFIX}{game_id}")
}

pub fn prediction_doc_id(game_id: &str, id: Uuid) -> String {
    format!("{}{id}", prediction_prefix(game_id))
}

/// Prefix shared by every prediction of `game_id`.
pub fn prediction_prefix(game_id: &str) -> String {
    format!("{PREDICTION_PREFIX}{game_id}:")
}

#[cfg(test)]
mod tests {
    use std::time::SystemTime;

    use super::*;
    use crate::bracket::{Bracket, BracketSize, GameKey};

    #[test]
    fn prediction_ids_share_the_game_prefix() {
        let id = Uuid::nil();
        let doc_id = prediction_doc_id("ABC1234", id);
        assert!(doc_id.starts_with(&prediction_prefix("ABC1234")));
        assert!(!doc_id.starts_with(&prediction_prefix("ABC123")));
        assert_eq!(tournament_doc_id("ABC1234"), "tournament::ABC1234");
    }

    #[test]
    fn tournament_document_keeps_couch_metadata_at_the_top_level() {
        let tournament = TournamentEntity {
            game_id: "ABC1234".into(),
            size: BracketSize::Eight,
            entrants: (0..8).map(|i| format!("N{i}")).collect(),
            bracket: [(GameKey::new(1, 0), "N1".to_owned())].into_iter().collect(),
            champion: "N1".into(),
            created_at: SystemTime::UNIX_EPOCH,
            updated_at: SystemTime::UNIX_EPOCH,
        };
        let mut document = CouchTournamentDocument::from(tournament.clone());
        document.rev = Some("1-abc".into());

        let value = serde_json::to_value(&document).unwrap();
        assert_eq!(value["_id"], "tournament::ABC1234");
        assert_eq!(value["_rev"], "1-abc");
        assert_eq!(value["size"], 8);

        let back: CouchTournamentDocument = serde_json::from_value(value).unwrap();
        assert_eq!(back.tournament, tournament);
        assert_eq!(back.tournament.bracket, Bracket::from_iter([(GameKey::new(1, 0), "N1".to_owned())]));
    }
}
