//! Online Q-learning, tabular and linear-approximate
//!
//! Both agents learn only through [`ReinforcementLearner::observe_transition`].
//! After `num_training` episodes they stop exploring and stop learning.

use std::fmt::Debug;
use std::hash::Hash;
use std::path::Path;

use anyhow::Context;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace};
use wayfarer_core::{
    AgentMetrics, FeatureExtractor, FeatureVector, LearningConfig, Persist, ReinforcementLearner,
    Result, Transition, ValueEstimator, ValueTable,
};

use crate::policy::EpsilonGreedy;
use crate::utils::{best_action, max_value};

/// Legal actions in a state; empty for terminal states
pub type LegalActions<S, A> = Box<dyn Fn(&S) -> Vec<A> + Send + Sync>;

/// Bookkeeping shared by the tabular and approximate agents
struct LearnerCore<S, A> {
    config: LearningConfig,
    alpha: f64,
    exploration: EpsilonGreedy,
    legal_actions: LegalActions<S, A>,
    metrics: AgentMetrics,
}

impl<S, A> LearnerCore<S, A> {
    fn new<F>(config: LearningConfig, legal_actions: F) -> Result<Self>
    where
        F: Fn(&S) -> Vec<A> + Send + Sync + 'static,
    {
        config.validate()?;
        Ok(Self {
            alpha: config.alpha,
            exploration: EpsilonGreedy::new(config.epsilon),
            legal_actions: Box::new(legal_actions),
            metrics: AgentMetrics::default(),
            config,
        })
    }

    fn reseed(&mut self, seed: u64) {
        self.exploration = EpsilonGreedy::with_seed(self.exploration.epsilon(), seed);
    }

    fn legal(&self, state: &S) -> Vec<A> {
        (self.legal_actions)(state)
    }

    fn stop_episode(&mut self) {
        let reward = self.metrics.episode_rewards;
        let was_training = self.metrics.is_in_training(self.config.num_training);
        let finished = self.metrics.end_episode(self.config.num_training);
        debug!(
            episode = self.metrics.episodes_so_far,
            reward, "episode finished"
        );
        if finished {
            if was_training {
                info!(
                    episodes = self.metrics.episodes_so_far,
                    accum_train_rewards = self.metrics.accum_train_rewards,
                    "training done, switching to evaluation"
                );
            }
            self.alpha = 0.0;
            self.exploration.set_epsilon(0.0);
        }
    }

    fn restore<K: Eq + Hash>(&mut self, snapshot: Snapshot<K>) -> ValueTable<K> {
        self.config = snapshot.config;
        self.alpha = snapshot.alpha;
        self.exploration.set_epsilon(snapshot.epsilon);
        self.metrics = snapshot.metrics;
        snapshot.table
    }

    fn snapshot<'a, K: Eq + Hash>(&'a self, table: &'a ValueTable<K>) -> SnapshotRef<'a, K> {
        SnapshotRef {
            config: &self.config,
            alpha: self.alpha,
            epsilon: self.exploration.epsilon(),
            metrics: &self.metrics,
            table,
        }
    }
}

/// On-disk form of a learner: its configuration, live rates, statistics
/// and learned table
#[derive(Serialize)]
struct SnapshotRef<'a, K: Eq + Hash> {
    config: &'a LearningConfig,
    alpha: f64,
    epsilon: f64,
    metrics: &'a AgentMetrics,
    table: &'a ValueTable<K>,
}

#[derive(Deserialize)]
#[serde(bound(deserialize = "K: DeserializeOwned"))]
struct Snapshot<K: Eq + Hash> {
    config: LearningConfig,
    alpha: f64,
    epsilon: f64,
    metrics: AgentMetrics,
    table: ValueTable<K>,
}

async fn write_json(path: &Path, json: String) -> Result<()> {
    tokio::fs::write(path, json)
        .await
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}

async fn read_snapshot<K: Eq + Hash + DeserializeOwned>(path: &Path) -> Result<Snapshot<K>> {
    let json = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))?;
    Ok(serde_json::from_str(&json)?)
}

/// Tabular Q-learning over `(state, action)` pairs
pub struct QLearningAgent<S: Eq + Hash, A: Eq + Hash> {
    core: LearnerCore<S, A>,
    q_values: ValueTable<(S, A)>,
}

impl<S, A> QLearningAgent<S, A>
where
    S: Clone + Eq + Hash + Debug,
    A: Clone + Eq + Hash + Debug,
{
    /// Create an agent; `legal_actions` lists the actions of a state
    ///
    /// # Errors
    ///
    /// Rejects rates outside `[0, 1]`.
    pub fn new<F>(config: LearningConfig, legal_actions: F) -> Result<Self>
    where
        F: Fn(&S) -> Vec<A> + Send + Sync + 'static,
    {
        Ok(Self {
            core: LearnerCore::new(config, legal_actions)?,
            q_values: ValueTable::new(),
        })
    }

    /// Use a fixed seed for exploration
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.core.reseed(seed);
        self
    }

    /// Legal actions in `state`
    pub fn legal_actions(&self, state: &S) -> Vec<A> {
        self.core.legal(state)
    }

    /// Learned Q-values
    pub fn q_values(&self) -> &ValueTable<(S, A)> {
        &self.q_values
    }

    /// Configuration the agent was built with
    pub fn config(&self) -> &LearningConfig {
        &self.core.config
    }

    /// Current learning rate; 0 once training is over
    #[must_use]
    pub fn alpha(&self) -> f64 {
        self.core.alpha
    }

    /// Current exploration probability; 0 once training is over
    #[must_use]
    pub fn epsilon(&self) -> f64 {
        self.core.exploration.epsilon()
    }

    fn update(&mut self, transition: &Transition<S, A>) {
        let key = (transition.state.clone(), transition.action.clone());
        let former = self.q_values.get(&key);
        let best_next = self.get_value(&transition.next_state);
        let sample = transition.reward + self.core.config.discount * best_next;
        let updated = former + self.core.alpha * (sample - former);
        trace!(?key, former, updated, "q-value update");
        self.q_values.set(key, updated);
    }
}

impl<S, A> ValueEstimator for QLearningAgent<S, A>
where
    S: Clone + Eq + Hash + Debug,
    A: Clone + Eq + Hash + Debug,
{
    type State = S;
    type Action = A;

    fn get_value(&self, state: &S) -> f64 {
        max_value(self.core.legal(state), |action| self.get_q_value(state, action), 0.0)
    }

    fn get_q_value(&self, state: &S, action: &A) -> f64 {
        self.q_values.get(&(state.clone(), action.clone()))
    }

    fn get_policy(&self, state: &S) -> Option<A> {
        best_action(self.core.legal(state), |action| self.get_q_value(state, action))
            .map(|(action, _)| action)
    }
}

impl<S, A> ReinforcementLearner for QLearningAgent<S, A>
where
    S: Clone + Eq + Hash + Debug,
    A: Clone + Eq + Hash + Debug,
{
    type State = S;
    type Action = A;

    fn get_action(&mut self, state: &S) -> Option<A> {
        let legal = self.core.legal(state);
        let q_values = &self.q_values;
        self.core.exploration.select(&legal, || {
            best_action(legal.iter().cloned(), |action| {
                q_values.get(&(state.clone(), action.clone()))
            })
            .map(|(action, _)| action)
        })
    }

    fn observe_transition(&mut self, transition: Transition<S, A>) {
        self.core.metrics.record(transition.reward);
        self.update(&transition);
    }

    fn start_episode(&mut self) {
        self.core.metrics.begin_episode();
    }

    fn stop_episode(&mut self) {
        self.core.stop_episode();
    }

    fn metrics(&self) -> &AgentMetrics {
        &self.core.metrics
    }
}

#[async_trait]
impl<S, A> Persist for QLearningAgent<S, A>
where
    S: Clone + Eq + Hash + Debug + Serialize + DeserializeOwned + Send + Sync,
    A: Clone + Eq + Hash + Debug + Serialize + DeserializeOwned + Send + Sync,
{
    async fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.core.snapshot(&self.q_values))?;
        write_json(path, json).await?;
        debug!(path = %path.display(), entries = self.q_values.len(), "saved q-values");
        Ok(())
    }

    async fn load(&mut self, path: &Path) -> Result<()> {
        let snapshot: Snapshot<(S, A)> = read_snapshot(path).await?;
        self.q_values = self.core.restore(snapshot);
        debug!(path = %path.display(), entries = self.q_values.len(), "loaded q-values");
        Ok(())
    }
}

/// Q-learning with a linear value function over extracted features
pub struct ApproximateQAgent<S, A, E> {
    core: LearnerCore<S, A>,
    weights: ValueTable<String>,
    extractor: E,
}

impl<S, A, E> ApproximateQAgent<S, A, E>
where
    S: Clone + Eq + Hash + Debug,
    A: Clone + Eq + Hash + Debug,
    E: FeatureExtractor<S, A>,
{
    /// Create an agent scoring pairs through `extractor`
    ///
    /// # Errors
    ///
    /// Rejects rates outside `[0, 1]`.
    pub fn new<F>(config: LearningConfig, extractor: E, legal_actions: F) -> Result<Self>
    where
        F: Fn(&S) -> Vec<A> + Send + Sync + 'static,
    {
        Ok(Self {
            core: LearnerCore::new(config, legal_actions)?,
            weights: ValueTable::new(),
            extractor,
        })
    }

    /// Use a fixed seed for exploration
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.core.reseed(seed);
        self
    }

    /// Learned feature weights
    pub fn weights(&self) -> &ValueTable<String> {
        &self.weights
    }

    /// Features of `action` in `state`
    pub fn features(&self, state: &S, action: &A) -> FeatureVector {
        self.extractor.features(state, action)
    }

    /// Configuration the agent was built with
    pub fn config(&self) -> &LearningConfig {
        &self.core.config
    }

    /// Current learning rate; 0 once training is over
    #[must_use]
    pub fn alpha(&self) -> f64 {
        self.core.alpha
    }

    /// Current exploration probability; 0 once training is over
    #[must_use]
    pub fn epsilon(&self) -> f64 {
        self.core.exploration.epsilon()
    }

    fn update(&mut self, transition: &Transition<S, A>) {
        let features = self.extractor.features(&transition.state, &transition.action);
        let current = features.dot(&self.weights);
        let best_next = self.get_value(&transition.next_state);
        let correction = transition.reward + self.core.config.discount * best_next - current;
        for (name, value) in features.iter() {
            self.weights
                .add(name.clone(), self.core.alpha * correction * value);
        }
        trace!(correction, features = features.len(), "weight update");
    }
}

impl<S, A, E> ValueEstimator for ApproximateQAgent<S, A, E>
where
    S: Clone + Eq + Hash + Debug,
    A: Clone + Eq + Hash + Debug,
    E: FeatureExtractor<S, A>,
{
    type State = S;
    type Action = A;

    fn get_value(&self, state: &S) -> f64 {
        max_value(self.core.legal(state), |action| self.get_q_value(state, action), 0.0)
    }

    fn get_q_value(&self, state: &S, action: &A) -> f64 {
        self.extractor.features(state, action).dot(&self.weights)
    }

    fn get_policy(&self, state: &S) -> Option<A> {
        best_action(self.core.legal(state), |action| self.get_q_value(state, action))
            .map(|(action, _)| action)
    }
}

impl<S, A, E> ReinforcementLearner for ApproximateQAgent<S, A, E>
where
    S: Clone + Eq + Hash + Debug,
    A: Clone + Eq + Hash + Debug,
    E: FeatureExtractor<S, A>,
{
    type State = S;
    type Action = A;

    fn get_action(&mut self, state: &S) -> Option<A> {
        let legal = self.core.legal(state);
        let (weights, extractor) = (&self.weights, &self.extractor);
        self.core.exploration.select(&legal, || {
            best_action(legal.iter().cloned(), |action| {
                extractor.features(state, action).dot(weights)
            })
            .map(|(action, _)| action)
        })
    }

    fn observe_transition(&mut self, transition: Transition<S, A>) {
        self.core.metrics.record(transition.reward);
        self.update(&transition);
    }

    fn start_episode(&mut self) {
        self.core.metrics.begin_episode();
    }

    fn stop_episode(&mut self) {
        self.core.stop_episode();
    }

    fn metrics(&self) -> &AgentMetrics {
        &self.core.metrics
    }
}

#[async_trait]
impl<S, A, E> Persist for ApproximateQAgent<S, A, E>
where
    S: Send + Sync,
    A: Send + Sync,
    E: Send + Sync,
{
    async fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.core.snapshot(&self.weights))?;
        write_json(path, json).await?;
        debug!(path = %path.display(), weights = self.weights.len(), "saved weights");
        Ok(())
    }

    async fn load(&mut self, path: &Path) -> Result<()> {
        let snapshot: Snapshot<String> = read_snapshot(path).await?;
        self.weights = self.core.restore(snapshot);
        debug!(path = %path.display(), weights = self.weights.len(), "loaded weights");
        Ok(())
    }
}
