//! Entity lifecycle reducer, shared by all five content kinds.
//!
//! The workflow is the same for places, activities, circuits, events and
//! artisans: guide submissions enter PENDING, an admin validates them to
//! ACTIVE, owners edit and delete, admins do everything. One reducer runs
//! the whole catalog; the kind only matters at draft validation and when
//! the client picks a route.
//!
//! Commands are authorized locally through [`rules`] before any network
//! effect is emitted, and state mutates only when the backend confirms;
//! a command either produces a request effect or records why it was
//! refused, never both.
//!
//! [`rules`]: crate::rules

use std::collections::BTreeMap;
use std::sync::Arc;

use taroudant_core::{
    effect::{Effect, Effects},
    reducer::Reducer,
    smallvec,
};

use crate::api::{ListScope, SharedCatalogApi};
use crate::entity::{Entity, EntityDraft, EntityKey, EntityKind};
use crate::error::LifecycleError;
use crate::rules::{self, ValidateOutcome};
use crate::types::{Actor, Role};

// ============================================================================
// State
// ============================================================================

/// Locally known slice of the content catalog.
///
/// This is a cache of what the backend has confirmed, keyed so that
/// iteration order is stable for list projections.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CatalogState {
    /// Entities by kind-tagged key.
    pub entities: BTreeMap<EntityKey, Entity>,
    /// Why the most recent command was refused, if it was.
    pub last_error: Option<LifecycleError>,
}

impl CatalogState {
    /// Creates an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up one entity.
    #[must_use]
    pub fn get(&self, key: &EntityKey) -> Option<&Entity> {
        self.entities.get(key)
    }

    /// Number of known entities across all kinds.
    #[must_use]
    pub fn count(&self) -> usize {
        self.entities.len()
    }
}

// ============================================================================
// Actions
// ============================================================================

/// Actions for the catalog lifecycle.
///
/// Commands carry the acting user; events describe backend-confirmed
/// outcomes and are the only things that mutate entities in state.
#[derive(Clone, Debug, PartialEq)]
pub enum CatalogAction {
    // Commands
    /// Submit a new entity.
    Submit {
        /// Acting user.
        actor: Actor,
        /// The fields to create.
        draft: EntityDraft,
    },

    /// Replace the payload fields of an existing entity.
    Edit {
        /// Acting user.
        actor: Actor,
        /// Which entity.
        key: EntityKey,
        /// Replacement fields. Must be of the same kind.
        draft: EntityDraft,
    },

    /// Delete an entity.
    Remove {
        /// Acting user.
        actor: Actor,
        /// Which entity.
        key: EntityKey,
    },

    /// Approve a pending entity.
    Approve {
        /// Acting user.
        actor: Actor,
        /// Which entity.
        key: EntityKey,
    },

    /// Load one kind of the catalog at the given scope.
    Load {
        /// Acting user. Admin scopes are refused for everyone else.
        actor: Actor,
        /// Which kind to load.
        kind: EntityKind,
        /// Which slice of it.
        scope: ListScope,
    },

    // Events
    /// The backend created the entity.
    Created {
        /// The stored entity, with id and status stamped.
        entity: Entity,
    },

    /// The backend stored the edited entity.
    Updated {
        /// The entity after the edit.
        entity: Entity,
    },

    /// The backend deleted the entity.
    Deleted {
        /// Which entity is gone.
        key: EntityKey,
    },

    /// The backend approved the entity.
    Validated {
        /// The entity in its new status.
        entity: Entity,
    },

    /// The backend answered a list call.
    Loaded {
        /// Which kind was loaded.
        kind: EntityKind,
        /// The entities at the requested scope.
        entities: Vec<Entity>,
    },

    /// A command was refused, locally or by the backend.
    OperationFailed {
        /// Why.
        error: LifecycleError,
    },
}

// ============================================================================
// Environment
// ============================================================================

/// Environment dependencies for the catalog reducer.
#[derive(Clone)]
pub struct CatalogEnvironment {
    /// The backend the lifecycle talks to.
    pub api: SharedCatalogApi,
}

impl CatalogEnvironment {
    /// Creates a new `CatalogEnvironment`.
    #[must_use]
    pub fn new(api: SharedCatalogApi) -> Self {
        Self { api }
    }
}

// ============================================================================
// Reducer
// ============================================================================

/// Reducer driving the PENDING → ACTIVE moderation workflow.
#[derive(Clone, Debug, Default)]
pub struct CatalogReducer;

impl CatalogReducer {
    /// Creates a new `CatalogReducer`.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn apply_event(state: &mut CatalogState, action: &CatalogAction) {
        match action {
            CatalogAction::Created { entity }
            | CatalogAction::Updated { entity }
            | CatalogAction::Validated { entity } => {
                state.entities.insert(entity.key(), entity.clone());
                state.last_error = None;
            },

            CatalogAction::Deleted { key } => {
                state.entities.remove(key);
                state.last_error = None;
            },

            CatalogAction::Loaded { kind, entities } => {
                state.entities.retain(|key, _| key.kind != *kind);
                for entity in entities {
                    state.entities.insert(entity.key(), entity.clone());
                }
                state.last_error = None;
            },

            CatalogAction::OperationFailed { error } => {
                state.last_error = Some(error.clone());
            },

            // Commands don't modify state
            CatalogAction::Submit { .. }
            | CatalogAction::Edit { .. }
            | CatalogAction::Remove { .. }
            | CatalogAction::Approve { .. }
            | CatalogAction::Load { .. } => {},
        }
    }

    fn reject(state: &mut CatalogState, error: LifecycleError) -> Effects<CatalogAction> {
        tracing::warn!(%error, "catalog command refused");
        Self::apply_event(state, &CatalogAction::OperationFailed { error });
        Effects::new()
    }
}

impl Reducer for CatalogReducer {
    type State = CatalogState;
    type Action = CatalogAction;
    type Environment = CatalogEnvironment;

    #[allow(clippy::too_many_lines)]
    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> Effects<Self::Action> {
        match action {
            // ========== Submit ==========
            CatalogAction::Submit { actor, draft } => {
                if let Err(error) = rules::initial_status(actor.role) {
                    return Self::reject(state, error);
                }
                if let Err(error) = draft.validate() {
                    return Self::reject(state, error);
                }

                let api = Arc::clone(&env.api);
                smallvec![Effect::future(async move {
                    Some(match api.create(draft).await {
                        Ok(entity) => CatalogAction::Created { entity },
                        Err(error) => CatalogAction::OperationFailed { error },
                    })
                })]
            },

            // ========== Edit ==========
            CatalogAction::Edit { actor, key, draft } => {
                let Some(entity) = state.entities.get(&key) else {
                    return Self::reject(state, LifecycleError::NotFound);
                };
                if draft.kind() != key.kind {
                    return Self::reject(
                        state,
                        LifecycleError::InvalidInput {
                            reason: format!(
                                "draft kind {} does not match entity kind {}",
                                draft.kind(),
                                key.kind
                            ),
                        },
                    );
                }
                if let Err(error) = rules::can_edit(actor, entity) {
                    return Self::reject(state, error);
                }
                if let Err(error) = draft.validate() {
                    return Self::reject(state, error);
                }

                let api = Arc::clone(&env.api);
                smallvec![Effect::future(async move {
                    Some(match api.update(key, draft).await {
                        Ok(entity) => CatalogAction::Updated { entity },
                        Err(error) => CatalogAction::OperationFailed { error },
                    })
                })]
            },

            // ========== Remove ==========
            CatalogAction::Remove { actor, key } => {
                let Some(entity) = state.entities.get(&key) else {
                    return Self::reject(state, LifecycleError::NotFound);
                };
                if let Err(error) = rules::can_delete(actor, entity) {
                    return Self::reject(state, error);
                }

                let api = Arc::clone(&env.api);
                smallvec![Effect::future(async move {
                    Some(match api.delete(key).await {
                        Ok(()) => CatalogAction::Deleted { key },
                        Err(error) => CatalogAction::OperationFailed { error },
                    })
                })]
            },

            // ========== Approve ==========
            CatalogAction::Approve { actor, key } => {
                let Some(entity) = state.entities.get(&key) else {
                    return Self::reject(state, LifecycleError::NotFound);
                };
                match rules::validate(actor, entity) {
                    Err(error) => Self::reject(state, error),
                    // Already active: idempotent no-op, no request
                    Ok(ValidateOutcome::NoOp) => {
                        state.last_error = None;
                        Effects::new()
                    },
                    Ok(ValidateOutcome::Activate) => {
                        let api = Arc::clone(&env.api);
                        smallvec![Effect::future(async move {
                            Some(match api.validate(key).await {
                                Ok(entity) => CatalogAction::Validated { entity },
                                Err(error) => CatalogAction::OperationFailed { error },
                            })
                        })]
                    },
                }
            },

            // ========== Load ==========
            CatalogAction::Load { actor, kind, scope } => {
                let admin_scope = matches!(scope, ListScope::All | ListScope::Pending);
                if admin_scope && actor.role != Role::Admin {
                    return Self::reject(state, LifecycleError::PermissionDenied);
                }

                let api = Arc::clone(&env.api);
                smallvec![Effect::future(async move {
                    Some(match api.list(kind, scope).await {
                        Ok(entities) => CatalogAction::Loaded { kind, entities },
                        Err(error) => CatalogAction::OperationFailed { error },
                    })
                })]
            },

            // ========== Events ==========
            event => {
                Self::apply_event(state, &event);
                Effects::new()
            },
        }
    }
}
