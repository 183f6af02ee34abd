use std::time::SystemTime;

use tokio::time::Instant;
use uuid::Uuid;

use crate::{
    bracket::{BracketError, BracketSession, start_bracket},
    dao::models::{PredictionEntity, TournamentEntity},
};

/// Live prediction session of one participant. Holds a snapshot of the entrants, never the
/// master bracket.
#[derive(Debug, Clone)]
pub struct PredictionSession {
    id: Uuid,
    game_id: String,
    player_name: String,
    bracket: BracketSession,
    last_touched: Instant,
}

impl PredictionSession {
    /// Open an empty prediction over the entrants of `record`.
    pub fn open(record: &TournamentEntity, player_name: String) -> Result<Self, BracketError> {
        let entrants = start_bracket(record.size, record.entrants.clone())?;
        Ok(Self {
            id: Uuid::new_v4(),
            game_id: record.game_id.clone(),
            player_name,
            bracket: BracketSession::new(entrants),
            last_touched: Instant::now(),
        })
    }

    /// Identifier of the prediction, kept once submitted.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Tournament this prediction targets.
    pub fn game_id(&self) -> &str {
        &self.game_id
    }

    /// Participant display name.
    pub fn player_name(&self) -> &str {
        &self.player_name
    }

    /// Last time a request changed this prediction.
    pub fn last_touched(&self) -> Instant {
        self.last_touched
    }

    /// Mark the prediction as active now.
    pub fn touch(&mut self) {
        self.last_touched = Instant::now();
    }

    /// The participant's bracket.
    pub fn bracket(&self) -> &BracketSession {
        &self.bracket
    }

    /// Mutable access to the participant's bracket.
    pub fn bracket_mut(&mut self) -> &mut BracketSession {
        &mut self.bracket
    }

    /// Build the entity to persist. Fails unless the final has a winner.
    pub fn to_entity(&self, submitted_at: SystemTime) -> Result<PredictionEntity, BracketError> {
        let predicted_winner = self.bracket.finalize()?.to_owned();
        Ok(PredictionEntity {
            id: self.id,
            game_id: self.game_id.clone(),
            player_name: self.player_name.clone(),
            size: self.bracket.size(),
            bracket: self.bracket.bracket().clone(),
            predicted_winner,
            submitted_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bracket::{Bracket, BracketSize, GameKey};

    fn record() -> TournamentEntity {
        TournamentEntity {
            game_id: "ABC1234".into(),
            size: BracketSize::Eight,
            entrants: ["A", "B", "C", "D", "E", "F", "G", "H"]
                .map(String::from)
                .to_vec(),
            bracket: Bracket::from_iter([(GameKey::new(1, 0), "A".to_owned())]),
            champion: "A".into(),
            created_at: SystemTime::UNIX_EPOCH,
            updated_at: SystemTime::UNIX_EPOCH,
        }
    }

    #[test]
    fn predictions_start_empty_regardless_of_master_picks() {
        let session = PredictionSession::open(&record(), "ada".into()).unwrap();
        assert!(session.bracket().bracket().is_empty());
        assert_eq!(session.bracket().current_round(), 1);
        assert_eq!(session.game_id(), "ABC1234");
        assert_eq!(session.player_name(), "ada");
    }

    #[test]
    fn entity_requires_a_champion() {
        let mut session = PredictionSession::open(&record(), "ada".into()).unwrap();
        assert!(matches!(
            session.to_entity(SystemTime::now()),
            Err(BracketError::RoundNotComplete { .. })
        ));

        let picks = [
            ((1, 0), "B"),
            ((1, 1), "C"),
            ((1, 2), "E"),
            ((1, 3), "G"),
            ((2, 0), "B"),
            ((2, 1), "G"),
            ((3, 0), "G"),
        ];
        for ((round, game), winner) in picks {
            session
                .bracket_mut()
                .select(GameKey::new(round, game), winner)
                .unwrap();
        }

        let entity = session.to_entity(SystemTime::UNIX_EPOCH).unwrap();
        assert_eq!(entity.predicted_winner, "G");
        assert_eq!(entity.id, session.id());
        assert_eq!(entity.bracket.len(), 7);
    }
}
