//! Admin user directory reducer.
//!
//! Accounts have a small lifecycle of their own: a guide registers into
//! PENDING, an admin activates or suspends the account, and accounts of
//! either role can be removed. This reducer drives that surface plus the
//! dashboard statistics; every command is admin-only.

use std::collections::BTreeMap;
use std::sync::Arc;

use taroudant_core::{
    effect::{Effect, Effects},
    reducer::Reducer,
    smallvec,
};

use crate::api::{SharedDirectoryApi, UserGroup};
use crate::error::LifecycleError;
use crate::rules;
use crate::types::{AccountStatus, Actor, Identity, Role, UserId, UserStats};

/// Locally known accounts and dashboard counts.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DirectoryState {
    /// Accounts by id, merged across list calls.
    pub users: BTreeMap<UserId, Identity>,
    /// Dashboard counts, once loaded.
    pub stats: Option<UserStats>,
    /// Why the most recent command was refused, if it was.
    pub last_error: Option<LifecycleError>,
}

impl DirectoryState {
    /// Creates an empty state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Guide accounts, in id order.
    pub fn guides(&self) -> impl Iterator<Item = &Identity> {
        self.users.values().filter(|u| u.role == Role::Guide)
    }

    /// Guide accounts still awaiting approval. The admin approval queue.
    pub fn pending_guides(&self) -> impl Iterator<Item = &Identity> {
        self.guides()
            .filter(|u| u.account_status == AccountStatus::Pending)
    }
}

/// Actions for the user directory.
#[derive(Clone, Debug, PartialEq)]
pub enum DirectoryAction {
    // Commands
    /// Load one slice of the account base.
    Load {
        /// Acting user. Admins only.
        actor: Actor,
        /// Which slice.
        group: UserGroup,
    },

    /// Move a guide account to a new status (approve, suspend, reinstate).
    SetGuideStatus {
        /// Acting user.
        actor: Actor,
        /// Which guide.
        id: UserId,
        /// Requested status.
        status: AccountStatus,
    },

    /// Delete a guide account.
    RemoveGuide {
        /// Acting user.
        actor: Actor,
        /// Which guide.
        id: UserId,
    },

    /// Delete a tourist account.
    RemoveTourist {
        /// Acting user.
        actor: Actor,
        /// Which tourist.
        id: UserId,
    },

    /// Load the dashboard counts.
    LoadStats {
        /// Acting user.
        actor: Actor,
    },

    // Events
    /// The backend answered a list call.
    Loaded {
        /// Which slice was asked for.
        group: UserGroup,
        /// Its accounts.
        users: Vec<Identity>,
    },

    /// The backend stored a status move.
    StatusChanged {
        /// The updated account.
        user: Identity,
    },

    /// The backend deleted the account.
    Removed {
        /// Which account is gone.
        id: UserId,
    },

    /// The backend answered the stats call.
    StatsLoaded {
        /// The counts.
        stats: UserStats,
    },

    /// A command was refused, locally or by the backend.
    OperationFailed {
        /// Why.
        error: LifecycleError,
    },
}

/// Environment dependencies for the directory reducer.
#[derive(Clone)]
pub struct DirectoryEnvironment {
    /// The backend accounts are managed through.
    pub api: SharedDirectoryApi,
}

impl DirectoryEnvironment {
    /// Creates a new `DirectoryEnvironment`.
    #[must_use]
    pub fn new(api: SharedDirectoryApi) -> Self {
        Self { api }
    }
}

/// Reducer for admin account management.
#[derive(Clone, Debug, Default)]
pub struct DirectoryReducer;

impl DirectoryReducer {
    /// Creates a new `DirectoryReducer`.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn apply_event(state: &mut DirectoryState, action: &DirectoryAction) {
        match action {
            DirectoryAction::Loaded { group, users } => {
                // A list call replaces only the slice it asked for;
                // the other roles' records stay as loaded earlier.
                match group {
                    UserGroup::All => state.users.clear(),
                    UserGroup::Guides => state.users.retain(|_, u| u.role != Role::Guide),
                    UserGroup::Tourists => state.users.retain(|_, u| u.role != Role::Tourist),
                }
                for user in users {
                    state.users.insert(user.id, user.clone());
                }
                state.last_error = None;
            },

            DirectoryAction::StatusChanged { user } => {
                state.users.insert(user.id, user.clone());
                state.last_error = None;
            },

            DirectoryAction::Removed { id } => {
                state.users.remove(id);
                state.last_error = None;
            },

            DirectoryAction::StatsLoaded { stats } => {
                state.stats = Some(*stats);
                state.last_error = None;
            },

            DirectoryAction::OperationFailed { error } => {
                state.last_error = Some(error.clone());
            },

            // Commands don't modify state
            DirectoryAction::Load { .. }
            | DirectoryAction::SetGuideStatus { .. }
            | DirectoryAction::RemoveGuide { .. }
            | DirectoryAction::RemoveTourist { .. }
            | DirectoryAction::LoadStats { .. } => {},
        }
    }

    fn reject(state: &mut DirectoryState, error: LifecycleError) -> Effects<DirectoryAction> {
        tracing::warn!(%error, "directory command refused");
        Self::apply_event(state, &DirectoryAction::OperationFailed { error });
        Effects::new()
    }

    /// Local role check for a guide-routed command, when the record is
    /// known. An unknown id is left to the backend to refuse.
    fn check_target(
        state: &DirectoryState,
        actor: Actor,
        id: UserId,
        expected: Role,
    ) -> Result<(), LifecycleError> {
        match state.users.get(&id) {
            Some(target) => rules::can_moderate_account(actor, target, expected),
            None => rules::can_manage_users(actor),
        }
    }
}

impl Reducer for DirectoryReducer {
    type State = DirectoryState;
    type Action = DirectoryAction;
    type Environment = DirectoryEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> Effects<Self::Action> {
        match action {
            DirectoryAction::Load { actor, group } => {
                if let Err(error) = rules::can_manage_users(actor) {
                    return Self::reject(state, error);
                }

                let api = Arc::clone(&env.api);
                smallvec![Effect::future(async move {
                    Some(match api.list_users(group).await {
                        Ok(users) => DirectoryAction::Loaded { group, users },
                        Err(error) => DirectoryAction::OperationFailed { error },
                    })
                })]
            },

            DirectoryAction::SetGuideStatus { actor, id, status } => {
                if let Err(error) = Self::check_target(state, actor, id, Role::Guide) {
                    return Self::reject(state, error);
                }

                let api = Arc::clone(&env.api);
                smallvec![Effect::future(async move {
                    Some(match api.set_guide_status(id, status).await {
                        Ok(user) => DirectoryAction::StatusChanged { user },
                        Err(error) => DirectoryAction::OperationFailed { error },
                    })
                })]
            },

            DirectoryAction::RemoveGuide { actor, id } => {
                if let Err(error) = Self::check_target(state, actor, id, Role::Guide) {
                    return Self::reject(state, error);
                }

                let api = Arc::clone(&env.api);
                smallvec![Effect::future(async move {
                    Some(match api.delete_guide(id).await {
                        Ok(()) => DirectoryAction::Removed { id },
                        Err(error) => DirectoryAction::OperationFailed { error },
                    })
                })]
            },

            DirectoryAction::RemoveTourist { actor, id } => {
                if let Err(error) = Self::check_target(state, actor, id, Role::Tourist) {
                    return Self::reject(state, error);
                }

                let api = Arc::clone(&env.api);
                smallvec![Effect::future(async move {
                    Some(match api.delete_tourist(id).await {
                        Ok(()) => DirectoryAction::Removed { id },
                        Err(error) => DirectoryAction::OperationFailed { error },
                    })
                })]
            },

            DirectoryAction::LoadStats { actor } => {
                if let Err(error) = rules::can_manage_users(actor) {
                    return Self::reject(state, error);
                }

                let api = Arc::clone(&env.api);
                smallvec![Effect::future(async move {
                    Some(match api.user_stats().await {
                        Ok(stats) => DirectoryAction::StatsLoaded { stats },
                        Err(error) => DirectoryAction::OperationFailed { error },
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

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::api::DirectoryApi;
    use crate::error::Result;
    use async_trait::async_trait;
    use taroudant_testing::{ReducerTest, assertions};

    struct UnreachableApi;

    #[async_trait]
    impl DirectoryApi for UnreachableApi {
        async fn list_users(&self, _group: UserGroup) -> Result<Vec<Identity>> {
            Err(LifecycleError::Network("not wired in this test".to_owned()))
        }
        async fn set_guide_status(&self, _id: UserId, _status: AccountStatus) -> Result<Identity> {
            Err(LifecycleError::Network("not wired in this test".to_owned()))
        }
        async fn delete_guide(&self, _id: UserId) -> Result<()> {
            Err(LifecycleError::Network("not wired in this test".to_owned()))
        }
        async fn delete_tourist(&self, _id: UserId) -> Result<()> {
            Err(LifecycleError::Network("not wired in this test".to_owned()))
        }
        async fn user_stats(&self) -> Result<UserStats> {
            Err(LifecycleError::Network("not wired in this test".to_owned()))
        }
    }

    fn test_env() -> DirectoryEnvironment {
        DirectoryEnvironment::new(Arc::new(UnreachableApi))
    }

    fn admin() -> Actor {
        Actor::new(UserId::new(1), Role::Admin)
    }

    fn account(id: i64, role: Role, status: AccountStatus) -> Identity {
        Identity {
            id: UserId::new(id),
            full_name: "Sam".to_owned(),
            email: "sam@example.com".to_owned(),
            phone: None,
            role,
            account_status: status,
            created_at: None,
            guide: None,
        }
    }

    #[test]
    fn admin_loads_the_guide_list() {
        ReducerTest::new(DirectoryReducer::new())
            .with_env(test_env())
            .given_state(DirectoryState::new())
            .when_action(DirectoryAction::Load {
                actor: admin(),
                group: UserGroup::Guides,
            })
            .then_effects(|effects| assertions::assert_has_future_effect(effects))
            .run();
    }

    #[test]
    fn guide_cannot_read_the_directory() {
        ReducerTest::new(DirectoryReducer::new())
            .with_env(test_env())
            .given_state(DirectoryState::new())
            .when_action(DirectoryAction::Load {
                actor: Actor::new(UserId::new(7), Role::Guide),
                group: UserGroup::All,
            })
            .then_state(|state| {
                assert_eq!(state.last_error, Some(LifecycleError::PermissionDenied));
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn tourist_cannot_read_the_stats() {
        ReducerTest::new(DirectoryReducer::new())
            .with_env(test_env())
            .given_state(DirectoryState::new())
            .when_action(DirectoryAction::LoadStats {
                actor: Actor::new(UserId::new(5), Role::Tourist),
            })
            .then_state(|state| {
                assert_eq!(state.last_error, Some(LifecycleError::PermissionDenied));
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn guide_status_move_rejects_a_tourist_target() {
        let mut state = DirectoryState::new();
        state.users.insert(
            UserId::new(5),
            account(5, Role::Tourist, AccountStatus::Active),
        );

        ReducerTest::new(DirectoryReducer::new())
            .with_env(test_env())
            .given_state(state)
            .when_action(DirectoryAction::SetGuideStatus {
                actor: admin(),
                id: UserId::new(5),
                status: AccountStatus::Suspended,
            })
            .then_state(|state| {
                assert!(matches!(
                    state.last_error,
                    Some(LifecycleError::InvalidInput { .. })
                ));
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn approving_a_pending_guide_emits_the_status_call() {
        let mut state = DirectoryState::new();
        state.users.insert(
            UserId::new(7),
            account(7, Role::Guide, AccountStatus::Pending),
        );

        ReducerTest::new(DirectoryReducer::new())
            .with_env(test_env())
            .given_state(state)
            .when_action(DirectoryAction::SetGuideStatus {
                actor: admin(),
                id: UserId::new(7),
                status: AccountStatus::Active,
            })
            .then_effects(|effects| assertions::assert_has_future_effect(effects))
            .run();
    }

    #[test]
    fn loading_a_group_replaces_only_that_slice() {
        let mut state = DirectoryState::new();
        state.users.insert(
            UserId::new(5),
            account(5, Role::Tourist, AccountStatus::Active),
        );
        state.users.insert(
            UserId::new(7),
            account(7, Role::Guide, AccountStatus::Pending),
        );

        DirectoryReducer::apply_event(
            &mut state,
            &DirectoryAction::Loaded {
                group: UserGroup::Guides,
                users: vec![account(8, Role::Guide, AccountStatus::Active)],
            },
        );

        assert!(state.users.contains_key(&UserId::new(5)));
        assert!(!state.users.contains_key(&UserId::new(7)));
        assert!(state.users.contains_key(&UserId::new(8)));
    }

    #[test]
    fn removal_and_status_events_update_the_map() {
        let mut state = DirectoryState::new();
        state.users.insert(
            UserId::new(7),
            account(7, Role::Guide, AccountStatus::Pending),
        );

        DirectoryReducer::apply_event(
            &mut state,
            &DirectoryAction::StatusChanged {
                user: account(7, Role::Guide, AccountStatus::Active),
            },
        );
        assert_eq!(state.pending_guides().count(), 0);
        assert_eq!(state.guides().count(), 1);

        DirectoryReducer::apply_event(
            &mut state,
            &DirectoryAction::Removed { id: UserId::new(7) },
        );
        assert!(state.users.is_empty());
    }
}
