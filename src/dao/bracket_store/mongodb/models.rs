use mongodb::bson::{Binary, DateTime, Document, doc, spec::BinarySubtype};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    bracket::{Bracket, BracketSize},
    dao::models::{PredictionEntity, TournamentEntity},
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoTournamentDocument {
    #[serde(rename = "_id")]
    game_id: String,
    size: BracketSize,
    entrants: Vec<String>,
    bracket: Bracket,
    champion: String,
    created_at: DateTime,
    updated_at: DateTime,
}

impl From<TournamentEntity> for MongoTournamentDocument {
    fn from(value: TournamentEntity) -> Self {
        Self {
            game_id: value.game_id,
            size: value.size,
            entrants: value.entrants,
            bracket: value.bracket,
            champion: value.champion,
            created_at: DateTime::from_system_time(value.created_at),
            updated_at: DateTime::from_system_time(value.updated_at),
        }
    }
}

impl From<MongoTournamentDocument> for TournamentEntity {
    fn from(value: MongoTournamentDocument) -> Self {
        Self {
            game_id: value.game_id,
            size: value.size,
            entrants: value.entrants,
            bracket: value.bracket,
            champion: value.champion,
            created_at: value.created_at.to_system_time(),
            updated_at: value.updated_at.to_system_time(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoPredictionDocument {
    #[serde(rename = "_id")]
    pub id: Binary,
    pub game_id: String,
    player_name: String,
    size: BracketSize,
    bracket: Bracket,
    predicted_winner: String,
    submitted_at: DateTime,
}

impl From<PredictionEntity> for MongoPredictionDocument {
    fn from(value: PredictionEntity) -> Self {
        Self {
            id: uuid_as_binary(value.id),
            game_id: value.game_id,
            player_name: value.player_name,
            size: value.size,
            bracket: value.bracket,
            predicted_winner: value.predicted_winner,
            submitted_at: DateTime::from_system_time(value.submitted_at),
        }
    }
}

impl TryFrom<MongoPredictionDocument> for PredictionEntity {
    type Error = uuid::Error;

    fn try_from(value: MongoPredictionDocument) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::from_slice(&value.id.bytes)?,
            game_id: value.game_id,
            player_name: value.player_name,
            size: value.size,
            bracket: value.bracket,
            predicted_winner: value.predicted_winner,
            submitted_at: value.submitted_at.to_system_time(),
        })
    }
}

pub fn uuid_as_binary(id: Uuid) -> Binary {
    Binary {
        subtype: BinarySubtype::Uuid,
        bytes: id.into_bytes().to_vec(),
    }
}

pub fn tournament_filter(game_id: &str) -> Document {
    doc! {"_id": game_id}
}
