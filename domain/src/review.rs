//! Place review reducer.
//!
//! Reviews have no state machine: tourists append them to places, admins
//! delete them as a moderation privilege. Authors cannot retract their
//! own reviews.

use std::collections::BTreeMap;
use std::sync::Arc;

use taroudant_core::{
    effect::{Effect, Effects},
    reducer::Reducer,
    smallvec,
};

use crate::api::{ReviewDraft, SharedReviewApi};
use crate::entity::PlaceId;
use crate::error::LifecycleError;
use crate::rules;
use crate::types::{Actor, Review, ReviewId, Role};

/// Locally known reviews for the places the viewer has opened.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ReviewState {
    /// Reviews by id.
    pub reviews: BTreeMap<ReviewId, Review>,
    /// Why the most recent command was refused, if it was.
    pub last_error: Option<LifecycleError>,
}

impl ReviewState {
    /// Creates an empty state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reviews attached to one place, in id order.
    pub fn for_place(&self, place: PlaceId) -> impl Iterator<Item = &Review> {
        self.reviews.values().filter(move |r| r.place == place)
    }
}

/// Actions for reviews.
#[derive(Clone, Debug, PartialEq)]
pub enum ReviewAction {
    // Commands
    /// Submit a review for a place.
    Submit {
        /// Acting user. Tourists only.
        actor: Actor,
        /// The review fields.
        draft: ReviewDraft,
    },

    /// Delete a review. Admin moderation.
    Remove {
        /// Acting user.
        actor: Actor,
        /// Which review.
        id: ReviewId,
    },

    /// Load the reviews of one place.
    LoadForPlace {
        /// Which place.
        place: PlaceId,
    },

    /// Load every review on the platform. Admin moderation view.
    LoadAll {
        /// Acting user.
        actor: Actor,
    },

    // Events
    /// The backend stored the review.
    Submitted {
        /// The new review.
        review: Review,
    },

    /// The backend deleted the review.
    Deleted {
        /// Which review is gone.
        id: ReviewId,
    },

    /// The backend answered the per-place list call.
    Loaded {
        /// Which place was asked about.
        place: PlaceId,
        /// Its reviews.
        reviews: Vec<Review>,
    },

    /// The backend answered the list-everything call.
    AllLoaded {
        /// Every review.
        reviews: Vec<Review>,
    },

    /// A command was refused, locally or by the backend.
    OperationFailed {
        /// Why.
        error: LifecycleError,
    },
}

/// Environment dependencies for the review reducer.
#[derive(Clone)]
pub struct ReviewEnvironment {
    /// The backend reviews are stored through.
    pub api: SharedReviewApi,
}

impl ReviewEnvironment {
    /// Creates a new `ReviewEnvironment`.
    #[must_use]
    pub fn new(api: SharedReviewApi) -> Self {
        Self { api }
    }
}

/// Reducer for review submission and moderation.
#[derive(Clone, Debug, Default)]
pub struct ReviewReducer;

impl ReviewReducer {
    /// Creates a new `ReviewReducer`.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn apply_event(state: &mut ReviewState, action: &ReviewAction) {
        match action {
            ReviewAction::Submitted { review } => {
                state.reviews.insert(review.id, review.clone());
                state.last_error = None;
            },

            ReviewAction::Deleted { id } => {
                state.reviews.remove(id);
                state.last_error = None;
            },

            ReviewAction::Loaded { place, reviews } => {
                state.reviews.retain(|_, r| r.place != *place);
                for review in reviews {
                    state.reviews.insert(review.id, review.clone());
                }
                state.last_error = None;
            },

            ReviewAction::AllLoaded { reviews } => {
                state.reviews.clear();
                for review in reviews {
                    state.reviews.insert(review.id, review.clone());
                }
                state.last_error = None;
            },

            ReviewAction::OperationFailed { error } => {
                state.last_error = Some(error.clone());
            },

            // Commands don't modify state
            ReviewAction::Submit { .. }
            | ReviewAction::Remove { .. }
            | ReviewAction::LoadForPlace { .. }
            | ReviewAction::LoadAll { .. } => {},
        }
    }

    fn reject(state: &mut ReviewState, error: LifecycleError) -> Effects<ReviewAction> {
        tracing::warn!(%error, "review command refused");
        Self::apply_event(state, &ReviewAction::OperationFailed { error });
        Effects::new()
    }
}

impl Reducer for ReviewReducer {
    type State = ReviewState;
    type Action = ReviewAction;
    type Environment = ReviewEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> Effects<Self::Action> {
        match action {
            ReviewAction::Submit { actor, draft } => {
                if actor.role != Role::Tourist {
                    return Self::reject(state, LifecycleError::PermissionDenied);
                }
                if draft.comment.trim().is_empty() {
                    return Self::reject(
                        state,
                        LifecycleError::InvalidInput {
                            reason: "comment is required".to_owned(),
                        },
                    );
                }

                let api = Arc::clone(&env.api);
                smallvec![Effect::future(async move {
                    Some(match api.submit(draft).await {
                        Ok(review) => ReviewAction::Submitted { review },
                        Err(error) => ReviewAction::OperationFailed { error },
                    })
                })]
            },

            ReviewAction::Remove { actor, id } => {
                if let Err(error) = rules::can_delete_review(actor) {
                    return Self::reject(state, error);
                }
                if !state.reviews.contains_key(&id) {
                    return Self::reject(state, LifecycleError::NotFound);
                }

                let api = Arc::clone(&env.api);
                smallvec![Effect::future(async move {
                    Some(match api.delete(id).await {
                        Ok(()) => ReviewAction::Deleted { id },
                        Err(error) => ReviewAction::OperationFailed { error },
                    })
                })]
            },

            ReviewAction::LoadAll { actor } => {
                if actor.role != Role::Admin {
                    return Self::reject(state, LifecycleError::PermissionDenied);
                }

                let api = Arc::clone(&env.api);
                smallvec![Effect::future(async move {
                    Some(match api.list_all().await {
                        Ok(reviews) => ReviewAction::AllLoaded { reviews },
                        Err(error) => ReviewAction::OperationFailed { error },
                    })
                })]
            },

            ReviewAction::LoadForPlace { place } => {
                let api = Arc::clone(&env.api);
                smallvec![Effect::future(async move {
                    Some(match api.list_for_place(place).await {
                        Ok(reviews) => ReviewAction::Loaded { place, reviews },
                        Err(error) => ReviewAction::OperationFailed { error },
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
