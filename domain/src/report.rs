//! Report triage reducer.
//!
//! Any authenticated user can submit a problem report; admins work the
//! queue by moving reports forward through OPEN → IN_PROGRESS → RESOLVED.
//! No backwards moves, no reopening.

use std::collections::BTreeMap;
use std::sync::Arc;

use taroudant_core::{
    effect::{Effect, Effects},
    reducer::Reducer,
    smallvec,
};

use crate::api::SharedReportApi;
use crate::error::LifecycleError;
use crate::rules;
use crate::types::{Actor, Report, ReportDraft, ReportId, ReportStatus, Role};

/// Locally known reports. Populated for admin sessions only.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ReportState {
    /// Reports by id.
    pub reports: BTreeMap<ReportId, Report>,
    /// Why the most recent command was refused, if it was.
    pub last_error: Option<LifecycleError>,
}

impl ReportState {
    /// Creates an empty state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up one report.
    #[must_use]
    pub fn get(&self, id: &ReportId) -> Option<&Report> {
        self.reports.get(id)
    }

    /// Reports still awaiting triage, in id order.
    pub fn open(&self) -> impl Iterator<Item = &Report> {
        self.reports
            .values()
            .filter(|r| r.status == ReportStatus::Open)
    }
}

/// Actions for report triage.
#[derive(Clone, Debug, PartialEq)]
pub enum ReportAction {
    // Commands
    /// Submit a new report.
    Submit {
        /// Acting user. Any authenticated role.
        actor: Actor,
        /// What to report.
        draft: ReportDraft,
    },

    /// Move a report forward in triage.
    Advance {
        /// Acting user.
        actor: Actor,
        /// Which report.
        id: ReportId,
        /// The requested status.
        status: ReportStatus,
    },

    /// Load every report. Admin only.
    LoadAll {
        /// Acting user.
        actor: Actor,
    },

    // Events
    /// The backend stored the report.
    Submitted {
        /// The new report, OPEN.
        report: Report,
    },

    /// The backend applied the triage move.
    Advanced {
        /// The report in its new status.
        report: Report,
    },

    /// The backend answered the list call.
    Loaded {
        /// All reports.
        reports: Vec<Report>,
    },

    /// A command was refused, locally or by the backend.
    OperationFailed {
        /// Why.
        error: LifecycleError,
    },
}

/// Environment dependencies for the report reducer.
#[derive(Clone)]
pub struct ReportEnvironment {
    /// The backend the triage talks to.
    pub api: SharedReportApi,
}

impl ReportEnvironment {
    /// Creates a new `ReportEnvironment`.
    #[must_use]
    pub fn new(api: SharedReportApi) -> Self {
        Self { api }
    }
}

/// Reducer driving the forward-only triage machine.
#[derive(Clone, Debug, Default)]
pub struct ReportReducer;

impl ReportReducer {
    /// Creates a new `ReportReducer`.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn validate_draft(draft: &ReportDraft) -> Result<(), LifecycleError> {
        if draft.report_type.trim().is_empty() {
            return Err(LifecycleError::InvalidInput {
                reason: "report type is required".to_owned(),
            });
        }
        if draft.description.trim().is_empty() {
            return Err(LifecycleError::InvalidInput {
                reason: "description is required".to_owned(),
            });
        }
        Ok(())
    }

    fn apply_event(state: &mut ReportState, action: &ReportAction) {
        match action {
            ReportAction::Submitted { report } | ReportAction::Advanced { report } => {
                state.reports.insert(report.id, report.clone());
                state.last_error = None;
            },

            ReportAction::Loaded { reports } => {
                state.reports = reports.iter().map(|r| (r.id, r.clone())).collect();
                state.last_error = None;
            },

            ReportAction::OperationFailed { error } => {
                state.last_error = Some(error.clone());
            },

            // Commands don't modify state
            ReportAction::Submit { .. }
            | ReportAction::Advance { .. }
            | ReportAction::LoadAll { .. } => {},
        }
    }

    fn reject(state: &mut ReportState, error: LifecycleError) -> Effects<ReportAction> {
        tracing::warn!(%error, "report command refused");
        Self::apply_event(state, &ReportAction::OperationFailed { error });
        Effects::new()
    }
}

impl Reducer for ReportReducer {
    type State = ReportState;
    type Action = ReportAction;
    type Environment = ReportEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> Effects<Self::Action> {
        match action {
            ReportAction::Submit { actor: _, draft } => {
                if let Err(error) = Self::validate_draft(&draft) {
                    return Self::reject(state, error);
                }

                let api = Arc::clone(&env.api);
                smallvec![Effect::future(async move {
                    Some(match api.submit(draft).await {
                        Ok(report) => ReportAction::Submitted { report },
                        Err(error) => ReportAction::OperationFailed { error },
                    })
                })]
            },

            ReportAction::Advance { actor, id, status } => {
                let Some(report) = state.reports.get(&id) else {
                    return Self::reject(state, LifecycleError::NotFound);
                };
                if let Err(error) = rules::can_advance_report(actor, report, status) {
                    return Self::reject(state, error);
                }

                let api = Arc::clone(&env.api);
                smallvec![Effect::future(async move {
                    Some(match api.set_status(id, status).await {
                        Ok(report) => ReportAction::Advanced { report },
                        Err(error) => ReportAction::OperationFailed { error },
                    })
                })]
            },

            ReportAction::LoadAll { actor } => {
                if actor.role != Role::Admin {
                    return Self::reject(state, LifecycleError::PermissionDenied);
                }
                let api = Arc::clone(&env.api);
                smallvec![Effect::future(async move {
                    Some(match api.list_all().await {
                        Ok(reports) => ReportAction::Loaded { reports },
                        Err(error) => ReportAction::OperationFailed { error },
                    })
                })]
            },

            event => {
                Self::apply_event(state, &event);
                Effects::new()
            },
        }
    }
}
