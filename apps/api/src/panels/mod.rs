// Presentation panels: one per analysis capability.
// Each panel owns an in-memory state machine (idle → loading → success | error)
// that allows at most one analysis in flight. Nothing here is persisted.

pub mod handlers;
pub mod view;

use std::str::FromStr;
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info};
use uuid::Uuid;

use crate::errors::AppError;
use view::{HeadlineView, SuitabilityView, SwotView};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PanelId {
    Headline,
    Swot,
    Suitability,
}

impl PanelId {
    pub fn as_str(&self) -> &'static str {
        match self {
            PanelId::Headline => "headline",
            PanelId::Swot => "swot",
            PanelId::Suitability => "suitability",
        }
    }
}

impl FromStr for PanelId {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "headline" => Ok(PanelId::Headline),
            "swot" => Ok(PanelId::Swot),
            "suitability" => Ok(PanelId::Suitability),
            other => Err(AppError::NotFound(format!("Unknown panel '{other}'"))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PanelStatus {
    Idle,
    Loading,
    Success,
    Error,
}

#[derive(Debug, Clone)]
enum PanelState<V> {
    Idle,
    Loading { run_id: Uuid },
    Success { run_id: Uuid, view: V },
    Error { run_id: Uuid, message: String },
}

impl<V> PanelState<V> {
    fn status(&self) -> PanelStatus {
        match self {
            PanelState::Idle => PanelStatus::Idle,
            PanelState::Loading { .. } => PanelStatus::Loading,
            PanelState::Success { .. } => PanelStatus::Success,
            PanelState::Error { .. } => PanelStatus::Error,
        }
    }

    fn run_id(&self) -> Option<Uuid> {
        match self {
            PanelState::Idle => None,
            PanelState::Loading { run_id }
            | PanelState::Success { run_id, .. }
            | PanelState::Error { run_id, .. } => Some(*run_id),
        }
    }
}

struct Slot<V> {
    state: PanelState<V>,
    updated_at: DateTime<Utc>,
}

/// Point-in-time view of a panel, as returned to clients.
#[derive(Debug, Clone, Serialize)]
pub struct PanelSnapshot<V> {
    pub panel: PanelId,
    pub status: PanelStatus,
    pub run_id: Option<Uuid>,
    pub view: Option<V>,
    pub error: Option<String>,
    pub updated_at: DateTime<Utc>,
}

pub struct Panel<V> {
    id: PanelId,
    slot: Mutex<Slot<V>>,
}

impl<V: Clone> Panel<V> {
    pub fn new(id: PanelId) -> Self {
        Self {
            id,
            slot: Mutex::new(Slot {
                state: PanelState::Idle,
                updated_at: Utc::now(),
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Slot<V>> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn set(&self, state: PanelState<V>) {
        let mut slot = self.lock();
        slot.state = state;
        slot.updated_at = Utc::now();
    }

    /// Moves the panel into `loading`, discarding any previous result.
    /// Fails with `Conflict` while another run is still in flight.
    pub fn begin(&self) -> Result<PanelRun<'_, V>, AppError> {
        let mut slot = self.lock();
        if let PanelState::Loading { run_id } = slot.state {
            debug!(panel = self.id.as_str(), %run_id, "Rejected trigger while loading");
            return Err(AppError::Conflict(
                "An analysis is already in progress for this panel.".to_string(),
            ));
        }

        let run_id = Uuid::new_v4();
        slot.state = PanelState::Loading { run_id };
        slot.updated_at = Utc::now();
        info!(panel = self.id.as_str(), %run_id, "Analysis started");

        Ok(PanelRun {
            panel: self,
            run_id,
            finished: false,
        })
    }

    pub fn snapshot(&self) -> PanelSnapshot<V> {
        let slot = self.lock();
        let (view, error) = match &slot.state {
            PanelState::Success { view, .. } => (Some(view.clone()), None),
            PanelState::Error { message, .. } => (None, Some(message.clone())),
            _ => (None, None),
        };

        PanelSnapshot {
            panel: self.id,
            status: slot.state.status(),
            run_id: slot.state.run_id(),
            view,
            error,
            updated_at: slot.updated_at,
        }
    }

    /// The current result, if the last run succeeded.
    pub fn last_success(&self) -> Option<V> {
        match &self.lock().state {
            PanelState::Success { view, .. } => Some(view.clone()),
            _ => None,
        }
    }
}

/// An in-flight run on a panel. Finishing records the outcome; dropping an
/// unfinished run (e.g. the client went away) returns the panel to idle.
pub struct PanelRun<'a, V: Clone> {
    panel: &'a Panel<V>,
    run_id: Uuid,
    finished: bool,
}

impl<V: Clone> PanelRun<'_, V> {
    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    /// Records the outcome on the panel and hands it back to the caller.
    pub fn finish(mut self, outcome: Result<V, AppError>) -> Result<V, AppError> {
        self.finished = true;
        let run_id = self.run_id;
        let panel = self.panel.id.as_str();

        match outcome {
            Ok(view) => {
                self.panel.set(PanelState::Success {
                    run_id,
                    view: view.clone(),
                });
                info!(panel, %run_id, "Analysis succeeded");
                Ok(view)
            }
            Err(e) => {
                self.panel.set(PanelState::Error {
                    run_id,
                    message: e.user_message(),
                });
                info!(panel, %run_id, "Analysis failed");
                Err(e)
            }
        }
    }
}

impl<V: Clone> Drop for PanelRun<'_, V> {
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        let mut slot = self.panel.lock();
        if slot.state.run_id() == Some(self.run_id) {
            slot.state = PanelState::Idle;
            slot.updated_at = Utc::now();
            info!(panel = self.panel.id.as_str(), run_id = %self.run_id, "Analysis abandoned");
        }
    }
}

/// The three panels of the application.
pub struct Panels {
    pub headline: Panel<HeadlineView>,
    pub swot: Panel<SwotView>,
    pub suitability: Panel<SuitabilityView>,
}

impl Panels {
    pub fn new() -> Self {
        Self {
            headline: Panel::new(PanelId::Headline),
            swot: Panel::new(PanelId::Swot),
            suitability: Panel::new(PanelId::Suitability),
        }
    }
}

impl Default for Panels {
    fn default() -> Self {
        Self::new()
    }
}
