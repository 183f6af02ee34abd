use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

/// Phases a host session goes through while building a tournament.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum HostPhase {
    /// Entrant names are being typed in; no bracket exists yet.
    #[default]
    EnteringNames,
    /// Entrants are locked and winners are being picked round by round.
    Picking,
    /// The master record has been persisted. Resume the tournament to change it.
    Saved,
}

/// Events that can be applied to the host state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostEvent {
    /// Lock the entrant list and build the bracket.
    StartBracket,
    /// Go back to the entrant list, discarding any picks.
    EditEntrants,
    /// Record a winner; keeps the session picking.
    Pick,
    /// Persist the completed bracket.
    Save,
}

/// Error returned when attempting to apply an invalid transition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid transition: {event:?} cannot be applied while in {from:?}")]
pub struct InvalidTransition {
    /// The phase the state machine was in when the invalid event was received.
    pub from: HostPhase,
    /// The event that cannot be applied from this phase.
    pub event: HostEvent,
}

/// State machine implementing the host workflow.
#[derive(Debug, Clone, Default)]
pub struct HostStateMachine {
    phase: HostPhase,
}

impl HostStateMachine {
    /// Create a new state machine waiting for entrant names.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a state machine already in `phase`, used when resuming a stored tournament.
    pub fn starting_at(phase: HostPhase) -> Self {
        Self { phase }
    }

    /// Inspect the current phase.
    pub fn phase(&self) -> HostPhase {
        self.phase
    }

    /// Validate `event` against the current phase without applying it.
    pub fn plan(&self, event: HostEvent) -> Result<HostPhase, InvalidTransition> {
        self.compute_transition(event)
    }

    /// Apply `event`, returning the new phase.
    pub fn apply(&mut self, event: HostEvent) -> Result<HostPhase, InvalidTransition> {
        self.phase = self.compute_transition(event)?;
        Ok(self.phase)
    }

    fn compute_transition(&self, event: HostEvent) -> Result<HostPhase, InvalidTransition> {
        let next = match (self.phase, event) {
            (HostPhase::EnteringNames, HostEvent::StartBracket) => HostPhase::Picking,
            (HostPhase::EnteringNames | HostPhase::Picking, HostEvent::EditEntrants) => {
                HostPhase::EnteringNames
            }
            (HostPhase::Picking, HostEvent::Pick) => HostPhase::Picking,
            (HostPhase::Picking, HostEvent::Save) => HostPhase::Saved,
            (from, event) => return Err(InvalidTransition { from, event }),
        };

        Ok(next)
    }
}
