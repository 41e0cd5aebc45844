//! # Taroudant Core
//!
//! Core traits and types for the Taroudant platform client.
//!
//! Every feature of the client (session, catalog moderation, reservations,
//! report triage) is written as a reducer: a pure function from the current
//! state and an action to a set of effect descriptions. Effects are values,
//! not executions: the store runtime in `taroudant-runtime` executes them
//! and feeds any resulting actions back into the reducer.
//!
//! ## Core Concepts
//!
//! - **State**: owned domain state for a feature
//! - **Action**: all possible inputs to a reducer (commands and the events
//!   the remote backend confirms)
//! - **Reducer**: pure function `(State, Action, Environment) → Effects`
//! - **Effect**: side effect description (usually an HTTP round trip)
//! - **Environment**: injected dependencies behind traits
//!
//! The split matters for this client in particular: the remote backend is
//! the source of truth, so a reducer never mutates state optimistically on
//! a command. It authorizes locally, describes the request as an effect,
//! and applies the confirmed event when the response comes back.

// Re-export commonly used types so feature crates depend on one surface.
pub use chrono::{DateTime, Utc};
pub use serde::{Deserialize, Serialize};
pub use smallvec::{SmallVec, smallvec};

/// Reducer module - the core trait for feature logic.
///
/// Reducers contain every authorization and transition rule of the client.
/// They are deterministic: given the same state, action and environment
/// values they always produce the same state change and effect list, which
/// is what makes the permission matrices directly unit-testable.
pub mod reducer {
    use super::effect::Effects;

    /// The Reducer trait - core abstraction for feature logic.
    ///
    /// # Example
    ///
    /// ```ignore
    /// impl Reducer for CatalogReducer {
    ///     type State = CatalogState;
    ///     type Action = CatalogAction;
    ///     type Environment = CatalogEnvironment;
    ///
    ///     fn reduce(
    ///         &self,
    ///         state: &mut CatalogState,
    ///         action: CatalogAction,
    ///         env: &CatalogEnvironment,
    ///     ) -> Effects<CatalogAction> {
    ///         // authorization + transition rules here
    ///         smallvec![Effect::None]
    ///     }
    /// }
    /// ```
    pub trait Reducer {
        /// The state type this reducer operates on
        type State;

        /// The action type this reducer processes
        type Action;

        /// The environment type with injected dependencies
        type Environment;

        /// Reduce an action into state changes and effects.
        ///
        /// This is a pure function that:
        /// 1. Validates and authorizes the action against current state
        /// 2. Updates state in place (confirmed events only)
        /// 3. Returns effect descriptions for the runtime to execute
        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            env: &Self::Environment,
        ) -> Effects<Self::Action>;

        /// An empty effect list, for reducers that handled an action
        /// purely in state.
        fn no_effects() -> Effects<Self::Action> {
            Effects::new()
        }
    }
}

/// Effect module - side effect descriptions.
///
/// Effects are NOT executed by the reducer. They are descriptions of what
/// should happen, returned from reducers and executed by the store runtime.
pub mod effect {
    use smallvec::SmallVec;
    use std::future::Future;
    use std::pin::Pin;
    use std::time::Duration;

    /// The inline-capacity effect vector returned by every reducer.
    ///
    /// Most actions produce zero or one effect; four covers every reducer
    /// in the workspace without a heap allocation.
    pub type Effects<Action> = SmallVec<[Effect<Action>; 4]>;

    /// Boxed future resolving to an optional feedback action.
    pub type EffectFuture<Action> = Pin<Box<dyn Future<Output = Option<Action>> + Send>>;

    /// Effect type - describes a side effect to be executed.
    ///
    /// # Type Parameters
    ///
    /// - `Action`: the action type that effects can produce (feedback loop)
    pub enum Effect<Action> {
        /// No-op effect
        None,

        /// Run effects in parallel
        Parallel(Vec<Effect<Action>>),

        /// Run effects sequentially
        Sequential(Vec<Effect<Action>>),

        /// Delayed action (for timeouts, debounced retries)
        Delay {
            /// How long to wait
            duration: Duration,
            /// Action to dispatch after delay
            action: Box<Action>,
        },

        /// Arbitrary async computation, typically one HTTP round trip.
        ///
        /// Returns `Option<Action>` - if `Some`, the action is fed back into
        /// the reducer. This is how a confirmed server response becomes an
        /// applied event.
        Future(EffectFuture<Action>),
    }

    // Manual Debug implementation since Future doesn't implement Debug
    impl<Action> std::fmt::Debug for Effect<Action>
    where
        Action: std::fmt::Debug,
    {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            match self {
                Effect::None => write!(f, "Effect::None"),
                Effect::Parallel(effects) => {
                    f.debug_tuple("Effect::Parallel").field(effects).finish()
                },
                Effect::Sequential(effects) => {
                    f.debug_tuple("Effect::Sequential").field(effects).finish()
                },
                Effect::Delay { duration, action } => f
                    .debug_struct("Effect::Delay")
                    .field("duration", duration)
                    .field("action", action)
                    .finish(),
                Effect::Future(_) => write!(f, "Effect::Future(<future>)"),
            }
        }
    }

    impl<Action> Effect<Action> {
        /// Wrap an async computation into a single feedback effect.
        pub fn future<F>(fut: F) -> Self
        where
            F: Future<Output = Option<Action>> + Send + 'static,
        {
            Effect::Future(Box::pin(fut))
        }

        /// Combine effects to run in parallel
        #[must_use]
        pub fn merge(effects: Vec<Effect<Action>>) -> Effect<Action> {
            Effect::Parallel(effects)
        }

        /// Chain effects to run sequentially
        #[must_use]
        pub fn chain(effects: Vec<Effect<Action>>) -> Effect<Action> {
            Effect::Sequential(effects)
        }
    }
}

/// Environment module - dependency injection traits.
///
/// All external dependencies (clocks, API clients, session storage) are
/// abstracted behind traits and injected via each feature's Environment
/// type, so every reducer is testable against fakes.
pub mod environment {
    use chrono::{DateTime, Utc};

    /// Clock trait - abstracts time operations for testability.
    ///
    /// Booking-date validation and session timestamps read the clock from
    /// the environment rather than calling `Utc::now()` directly.
    pub trait Clock: Send + Sync {
        /// Get the current time
        fn now(&self) -> DateTime<Utc>;
    }

    /// Production clock backed by the system time.
    #[derive(Debug, Clone, Copy, Default)]
    pub struct SystemClock;

    impl Clock for SystemClock {
        fn now(&self) -> DateTime<Utc> {
            Utc::now()
        }
    }
}
