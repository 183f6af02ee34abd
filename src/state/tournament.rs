use std::time::SystemTime;

use tokio::time::Instant;

use crate::{
    bracket::{BracketError, BracketSession, BracketSize, Entrants, GameKey, start_bracket},
    dao::models::TournamentEntity,
    state::state_machine::{HostEvent, HostPhase, HostStateMachine, InvalidTransition},
};

/// Live host session: the entrant list being edited and, once started, the bracket being built.
#[derive(Debug, Clone)]
pub struct HostSession {
    game_id: String,
    size: BracketSize,
    machine: HostStateMachine,
    names: Vec<String>,
    bracket: Option<BracketSession>,
    created_at: SystemTime,
    last_touched: Instant,
}

impl HostSession {
    /// Open a session with no entrants.
    pub fn new(game_id: String, size: BracketSize) -> Self {
        Self {
            game_id,
            size,
            machine: HostStateMachine::new(),
            names: Vec::new(),
            bracket: None,
            created_at: SystemTime::now(),
            last_touched: Instant::now(),
        }
    }

    /// Reopen a stored tournament, positioned on its furthest round.
    pub fn resume(record: TournamentEntity) -> Result<Self, BracketError> {
        let entrants = start_bracket(record.size, record.entrants.clone())?;
        let bracket = BracketSession::restore(entrants, record.bracket)?;
        Ok(Self {
            game_id: record.game_id,
            size: record.size,
            machine: HostStateMachine::starting_at(HostPhase::Picking),
            names: record.entrants,
            bracket: Some(bracket),
            created_at: record.created_at,
            last_touched: Instant::now(),
        })
    }

    /// Game id shared with participants.
    pub fn game_id(&self) -> &str {
        &self.game_id
    }

    /// Number of entrants.
    pub fn size(&self) -> BracketSize {
        self.size
    }

    /// Current workflow phase.
    pub fn phase(&self) -> HostPhase {
        self.machine.phase()
    }

    /// Entrant names as last submitted, or the locked entrants once the bracket started.
    pub fn names(&self) -> &[String] {
        match &self.bracket {
            Some(bracket) => bracket.entrants().names(),
            None => &self.names,
        }
    }

    /// When the session was first opened.
    pub fn created_at(&self) -> SystemTime {
        self.created_at
    }

    /// Last time a request changed this session.
    pub fn last_touched(&self) -> Instant {
        self.last_touched
    }

    /// Mark the session as active now.
    pub fn touch(&mut self) {
        self.last_touched = Instant::now();
    }

    /// The bracket under construction, once started.
    pub fn bracket(&self) -> Option<&BracketSession> {
        self.bracket.as_ref()
    }

    /// Record the winner of `key`. Only allowed while picking.
    pub fn pick(&mut self, key: GameKey, winner: &str) -> Result<(), HostSessionError> {
        let phase = self.machine.plan(HostEvent::Pick)?;
        let bracket = self.bracket.as_mut().ok_or(InvalidTransition {
            from: phase,
            event: HostEvent::Pick,
        })?;
        bracket.select(key, winner)?;
        Ok(())
    }

    /// Mutable access to the bracket under construction, once started.
    pub fn bracket_mut(&mut self) -> Option<&mut BracketSession> {
        self.bracket.as_mut()
    }

    /// Replace the entrant list. A started bracket is discarded.
    pub fn set_names(&mut self, names: Vec<String>) -> Result<(), InvalidTransition> {
        self.machine.apply(HostEvent::EditEntrants)?;
        self.bracket = None;
        self.names = names;
        Ok(())
    }

    /// Lock the entrants and build the first round.
    pub fn start(&mut self) -> Result<&BracketSession, HostSessionError> {
        self.machine.plan(HostEvent::StartBracket)?;
        let entrants: Entrants = start_bracket(self.size, self.names.clone())?;
        self.machine.apply(HostEvent::StartBracket)?;
        Ok(self.bracket.insert(BracketSession::new(entrants)))
    }

    /// Build the record to persist, checking the session may be saved.
    pub fn to_record(&self, now: SystemTime) -> Result<TournamentEntity, HostSessionError> {
        self.machine.plan(HostEvent::Save)?;
        let bracket = self.bracket.as_ref().ok_or(InvalidTransition {
            from: self.phase(),
            event: HostEvent::Save,
        })?;
        let champion = bracket.finalize()?.to_owned();
        Ok(TournamentEntity {
            game_id: self.game_id.clone(),
            size: self.size,
            entrants: bracket.entrants().names().to_vec(),
            bracket: bracket.bracket().clone(),
            champion,
            created_at: self.created_at,
            updated_at: now,
        })
    }

    /// Mark the session as saved.
    pub fn mark_saved(&mut self) -> Result<HostPhase, InvalidTransition> {
        self.machine.apply(HostEvent::Save)
    }
}

/// Failure while moving a host session forward: either the phase forbids it or the bracket does.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HostSessionError {
    /// The host workflow does not allow the step in the current phase.
    #[error(transparent)]
    Transition(#[from] InvalidTransition),
    /// The bracket rules reject the step.
    #[error(transparent)]
    Bracket(#[from] BracketError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bracket::{GameKey, matchup_for, rounds_for};

    fn names(count: u32) -> Vec<String> {
        (0..count).map(|i| format!("N{i}")).collect()
    }

    fn fill(session: &mut HostSession) {
        let bracket = session.bracket_mut().unwrap();
        for round in rounds_for(bracket.size()) {
            for game in 0..round.game_count {
                let key = GameKey::new(round.number, game);
                let winner = matchup_for(bracket.entrants(), bracket.bracket(), key)
                    .unwrap()
                    .left
                    .unwrap()
                    .to_owned();
                bracket.select(key, &winner).unwrap();
            }
        }
    }

    #[test]
    fn starting_requires_every_name() {
        let mut session = HostSession::new("ABC1234".into(), BracketSize::Eight);
        session.set_names(names(7)).unwrap();
        let err = session.start().unwrap_err();
        assert_eq!(
            err,
            HostSessionError::Bracket(BracketError::IncompleteEntrants { filled: 7, size: 8 })
        );
        assert_eq!(session.phase(), HostPhase::EnteringNames);

        session.set_names(names(8)).unwrap();
        assert_eq!(session.start().unwrap().current_round(), 1);
        assert_eq!(session.phase(), HostPhase::Picking);
    }

    #[test]
    fn editing_names_discards_the_bracket() {
        let mut session = HostSession::new("ABC1234".into(), BracketSize::Eight);
        session.set_names(names(8)).unwrap();
        session.start().unwrap();
        session.pick(GameKey::new(1, 0), "N0").unwrap();

        session.set_names(names(8)).unwrap();
        assert!(session.bracket().is_none());
        assert_eq!(session.phase(), HostPhase::EnteringNames);
    }

    #[test]
    fn record_requires_a_complete_bracket() {
        let mut session = HostSession::new("ABC1234".into(), BracketSize::Eight);
        assert!(matches!(
            session.to_record(SystemTime::now()),
            Err(HostSessionError::Transition(_))
        ));

        session.set_names(names(8)).unwrap();
        session.start().unwrap();
        assert!(matches!(
            session.to_record(SystemTime::now()),
            Err(HostSessionError::Bracket(BracketError::RoundNotComplete { .. }))
        ));

        fill(&mut session);
        let record = session.to_record(SystemTime::now()).unwrap();
        assert_eq!(record.champion, "N0");
        assert_eq!(record.bracket.len(), 7);
        assert_eq!(session.mark_saved(), Ok(HostPhase::Saved));
    }

    #[test]
    fn saved_sessions_reject_picks_and_edits() {
        let mut session = HostSession::new("ABC1234".into(), BracketSize::Eight);
        assert!(matches!(
            session.pick(GameKey::new(1, 0), "N0"),
            Err(HostSessionError::Transition(_))
        ));
        session.set_names(names(8)).unwrap();
        session.start().unwrap();
        fill(&mut session);
        session.mark_saved().unwrap();

        assert!(matches!(
            session.pick(GameKey::new(1, 0), "N1"),
            Err(HostSessionError::Transition(InvalidTransition {
                from: HostPhase::Saved,
                event: HostEvent::Pick,
            }))
        ));
        assert!(session.set_names(names(8)).is_err());
        assert_eq!(session.bracket().unwrap().finalize(), Ok("N0"));
    }

    #[test]
    fn resumed_session_sits_on_the_final_round() {
        let mut session = HostSession::new("ABC1234".into(), BracketSize::Sixteen);
        session.set_names(names(16)).unwrap();
        session.start().unwrap();
        fill(&mut session);
        let record = session.to_record(SystemTime::now()).unwrap();

        let resumed = HostSession::resume(record.clone()).unwrap();
        assert_eq!(resumed.phase(), HostPhase::Picking);
        assert_eq!(resumed.game_id(), "ABC1234");
        let bracket = resumed.bracket().unwrap();
        assert!(bracket.is_final_round());
        assert_eq!(bracket.bracket(), &record.bracket);
        assert_eq!(resumed.created_at(), record.created_at);
    }
}
