//! Store runtime for the Taroudant platform client.
//!
//! The [`Store`] owns a feature's state, runs its reducer, and executes the
//! effects the reducer returns. The execution model follows the client's
//! concurrency contract: a UI event handler sends one action and awaits the
//! whole round trip, so [`Store::send`] drains every produced effect (and
//! every feedback action those effects yield) to completion before it
//! returns. There is no optimistic mutation to roll back; state only
//! changes when the reducer applies a command locally or a confirmed event
//! comes back from the backend.
//!
//! State changes are published on a `tokio::sync::watch` channel so other
//! holders of the store (a second "tab", a dashboard widget) can observe
//! transitions without polling.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use taroudant_core::effect::Effect;
use taroudant_core::reducer::Reducer;
use tokio::sync::{RwLock, watch};

/// Errors surfaced by the store runtime.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The state watch channel has no remaining receivers and was closed.
    ///
    /// In practice this cannot happen while the store itself is alive (the
    /// store keeps one receiver), but the variant keeps `subscribe` honest.
    #[error("State watch channel closed")]
    ChannelClosed,
}

/// The store: state + reducer + environment, with effect execution.
///
/// # Type Parameters
///
/// - `S`: state type (cloned into the watch channel on every change)
/// - `A`: action type
/// - `E`: environment type
/// - `R`: reducer implementation
///
/// # Example
///
/// ```ignore
/// let store = Store::new(CatalogState::default(), CatalogReducer::new(), env);
///
/// store.send(CatalogAction::Validate { id, actor }).await;
/// let status = store.state(|s| s.get(&id).map(|e| e.status())).await;
/// ```
pub struct Store<S, A, E, R>
where
    R: Reducer<State = S, Action = A, Environment = E>,
{
    state: Arc<RwLock<S>>,
    reducer: R,
    environment: E,
    state_tx: watch::Sender<S>,
    // Kept so the channel stays open with zero external subscribers.
    _state_rx: watch::Receiver<S>,
}

impl<S, A, E, R> Store<S, A, E, R>
where
    R: Reducer<State = S, Action = A, Environment = E>,
    S: Clone + Send + Sync + 'static,
    A: Send + 'static,
{
    /// Create a new store with initial state, reducer, and environment.
    #[must_use]
    pub fn new(initial_state: S, reducer: R, environment: E) -> Self {
        let (state_tx, state_rx) = watch::channel(initial_state.clone());
        Self {
            state: Arc::new(RwLock::new(initial_state)),
            reducer,
            environment,
            state_tx,
            _state_rx: state_rx,
        }
    }

    /// Send an action to the store and run it to completion.
    ///
    /// 1. Acquires the state write lock and calls the reducer synchronously
    /// 2. Publishes the new state on the watch channel
    /// 3. Executes every returned effect, awaiting each round trip
    /// 4. Feeds actions produced by effects back into step 1
    ///
    /// When this returns, the action and all of its consequences have been
    /// applied: the request/await/apply-on-success cycle is complete.
    pub async fn send(&self, action: A) {
        let mut queue = std::collections::VecDeque::new();
        queue.push_back(action);

        while let Some(action) = queue.pop_front() {
            let effects = {
                let mut state = self.state.write().await;
                let effects = self.reducer.reduce(&mut state, action, &self.environment);
                // Publish while still holding the lock so observers never
                // see the watch channel lag behind a later write.
                self.state_tx.send_replace(state.clone());
                effects
            };

            for effect in effects {
                let feedback = execute_effect(effect).await;
                queue.extend(feedback);
            }
        }
    }

    /// Read the current state through a closure.
    pub async fn state<T>(&self, f: impl FnOnce(&S) -> T) -> T {
        let state = self.state.read().await;
        f(&state)
    }

    /// Clone the current state.
    pub async fn snapshot(&self) -> S {
        self.state.read().await.clone()
    }

    /// Subscribe to state changes.
    ///
    /// The receiver yields the state as of each completed reduce step.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<S> {
        self.state_tx.subscribe()
    }
}

/// Execute one effect tree, collecting feedback actions in order.
fn execute_effect<A>(effect: Effect<A>) -> Pin<Box<dyn Future<Output = Vec<A>> + Send>>
where
    A: Send + 'static,
{
    Box::pin(async move {
        match effect {
            Effect::None => Vec::new(),
            Effect::Future(fut) => fut.await.into_iter().collect(),
            Effect::Parallel(effects) => {
                let results =
                    futures::future::join_all(effects.into_iter().map(execute_effect)).await;
                results.into_iter().flatten().collect()
            },
            Effect::Sequential(effects) => {
                let mut actions = Vec::new();
                for effect in effects {
                    actions.extend(execute_effect(effect).await);
                }
                actions
            },
            Effect::Delay { duration, action } => {
                tokio::time::sleep(duration).await;
                vec![*action]
            },
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use taroudant_core::effect::Effects;
    use taroudant_core::smallvec;

    #[derive(Clone, Debug, Default)]
    struct PingState {
        sent: u32,
        acknowledged: u32,
    }

    #[derive(Clone, Debug)]
    enum PingAction {
        Ping,
        Acknowledged,
    }

    struct PingReducer;

    impl Reducer for PingReducer {
        type State = PingState;
        type Action = PingAction;
        type Environment = ();

        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            (): &Self::Environment,
        ) -> Effects<Self::Action> {
            match action {
                PingAction::Ping => {
                    state.sent += 1;
                    smallvec![Effect::future(async { Some(PingAction::Acknowledged) })]
                },
                PingAction::Acknowledged => {
                    state.acknowledged += 1;
                    Self::no_effects()
                },
            }
        }
    }

    #[tokio::test]
    async fn send_drains_feedback_actions_before_returning() {
        let store = Store::new(PingState::default(), PingReducer, ());
        store.send(PingAction::Ping).await;

        let state = store.snapshot().await;
        assert_eq!(state.sent, 1);
        assert_eq!(state.acknowledged, 1);
    }

    #[tokio::test]
    async fn subscribe_observes_each_reduce_step() {
        let store = Store::new(PingState::default(), PingReducer, ());
        let mut rx = store.subscribe();

        store.send(PingAction::Ping).await;

        // The receiver sees at least the final state.
        rx.borrow_and_update();
        let latest = rx.borrow().clone();
        assert_eq!(latest.acknowledged, 1);
    }

    #[tokio::test]
    async fn parallel_effects_all_feed_back() {
        struct FanOutReducer;

        #[derive(Clone, Debug)]
        enum FanAction {
            Start,
            Leaf,
        }

        #[derive(Clone, Debug, Default)]
        struct FanState {
            leaves: u32,
        }

        impl Reducer for FanOutReducer {
            type State = FanState;
            type Action = FanAction;
            type Environment = ();

            fn reduce(
                &self,
                state: &mut Self::State,
                action: Self::Action,
                (): &Self::Environment,
            ) -> Effects<Self::Action> {
                match action {
                    FanAction::Start => smallvec![Effect::merge(vec![
                        Effect::future(async { Some(FanAction::Leaf) }),
                        Effect::future(async { Some(FanAction::Leaf) }),
                        Effect::future(async { Some(FanAction::Leaf) }),
                    ])],
                    FanAction::Leaf => {
                        state.leaves += 1;
                        Self::no_effects()
                    },
                }
            }
        }

        let store = Store::new(FanState::default(), FanOutReducer, ());
        store.send(FanAction::Start).await;
        assert_eq!(store.state(|s| s.leaves).await, 3);
    }
}
