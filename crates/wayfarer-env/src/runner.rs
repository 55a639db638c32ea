//! Sampled episodes: an MDP as an environment, and the loop that feeds a
//! learner from it

use rand::distributions::{Distribution, WeightedIndex};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use wayfarer_core::{
    Environment, Episode, MarkovDecisionProcess, ReinforcementLearner, Result, Step, Transition,
    WayfarerError,
};

/// Steps through an MDP by sampling its transition model
pub struct MdpEnvironment<M: MarkovDecisionProcess> {
    mdp: M,
    state: M::State,
    rng: StdRng,
}

impl<M: MarkovDecisionProcess> MdpEnvironment<M> {
    /// Environment positioned at the start state
    pub fn new(mdp: M) -> Self {
        let state = mdp.start_state();
        Self {
            mdp,
            state,
            rng: StdRng::from_entropy(),
        }
    }

    /// Use a fixed seed for sampling
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// The underlying process
    pub fn mdp(&self) -> &M {
        &self.mdp
    }
}

impl<M: MarkovDecisionProcess> Environment for MdpEnvironment<M> {
    type State = M::State;
    type Action = M::Action;

    fn reset(&mut self) -> M::State {
        self.state = self.mdp.start_state();
        self.state.clone()
    }

    fn current_state(&self) -> &M::State {
        &self.state
    }

    fn possible_actions(&self, state: &M::State) -> Vec<M::Action> {
        self.mdp.possible_actions(state)
    }

    fn step(&mut self, action: &M::Action) -> Result<Step<M::State>> {
        if self.mdp.is_terminal(&self.state) {
            return Err(WayfarerError::InvalidAction(format!(
                "{action:?} taken after the episode ended in {:?}",
                self.state
            )));
        }
        if !self.mdp.possible_actions(&self.state).contains(action) {
            return Err(WayfarerError::InvalidAction(format!(
                "{action:?} is not legal in {:?}",
                self.state
            )));
        }

        let mut transitions = self.mdp.transition_states_and_probs(&self.state, action);
        let weights = WeightedIndex::new(transitions.iter().map(|(_, probability)| *probability))
            .map_err(|err| {
                WayfarerError::InvalidState(format!(
                    "no transition out of {:?} under {action:?}: {err}",
                    self.state
                ))
            })?;
        let (next_state, _) = transitions.swap_remove(weights.sample(&mut self.rng));

        let reward = self.mdp.reward(&self.state, action, &next_state);
        let done =
            self.mdp.is_terminal(&next_state) || self.mdp.possible_actions(&next_state).is_empty();
        self.state = next_state.clone();
        Ok(Step {
            next_state,
            reward,
            done,
        })
    }

    fn is_terminal(&self) -> bool {
        self.mdp.is_terminal(&self.state) || self.mdp.possible_actions(&self.state).is_empty()
    }
}

/// Episode loop settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    /// Episodes played by [`EpisodeRunner::run`]
    pub num_episodes: usize,
    /// Steps after which an episode is cut off
    pub max_steps: usize,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            num_episodes: 100,
            max_steps: 1000,
        }
    }
}

impl RunnerConfig {
    /// Check the settings
    ///
    /// # Errors
    ///
    /// A zero step limit is an [`WayfarerError::InvalidParameter`].
    pub fn validate(&self) -> Result<()> {
        if self.max_steps == 0 {
            return Err(WayfarerError::InvalidParameter(
                "max_steps must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Parse settings from JSON, filling gaps with defaults
    ///
    /// # Errors
    ///
    /// Fails on malformed JSON or invalid values.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }
}

/// Play one episode, letting `learner` observe every transition.
///
/// The episode ends when the environment is done, when the learner has no
/// action, or after `max_steps` steps (reported as truncated).
///
/// # Errors
///
/// Propagates environment errors such as an illegal action. The learner's
/// episode is closed before the error is returned.
pub fn run_episode<E, L>(env: &mut E, learner: &mut L, max_steps: usize) -> Result<Episode>
where
    E: Environment,
    L: ReinforcementLearner<State = E::State, Action = E::Action>,
{
    let mut episode = Episode::begin();
    let mut state = env.reset();
    let mut truncated = false;
    learner.start_episode();

    loop {
        if env.is_terminal() {
            break;
        }
        if episode.steps >= max_steps {
            truncated = true;
            break;
        }
        let Some(action) = learner.get_action(&state) else {
            break;
        };
        let step = match env.step(&action) {
            Ok(step) => step,
            Err(err) => {
                learner.stop_episode();
                episode.finish(true);
                warn!(id = %episode.id, steps = episode.steps, %err, "episode aborted");
                return Err(err);
            }
        };
        learner.observe_transition(Transition::new(
            state,
            action,
            step.next_state.clone(),
            step.reward,
        ));
        episode.record(step.reward);
        state = step.next_state;
        if step.done {
            break;
        }
    }

    learner.stop_episode();
    episode.finish(truncated);
    debug!(
        id = %episode.id,
        steps = episode.steps,
        reward = episode.total_reward,
        truncated,
        "episode complete"
    );
    Ok(episode)
}

/// Owns an environment and a learner and plays episodes between them
pub struct EpisodeRunner<E, L> {
    env: E,
    learner: L,
    config: RunnerConfig,
    history: Vec<Episode>,
}

impl<E, L> EpisodeRunner<E, L>
where
    E: Environment,
    L: ReinforcementLearner<State = E::State, Action = E::Action>,
{
    /// Pair `env` with `learner`
    ///
    /// # Errors
    ///
    /// Rejects an invalid `config`.
    pub fn new(env: E, learner: L, config: RunnerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            env,
            learner,
            config,
            history: Vec::new(),
        })
    }

    /// Play a single episode
    ///
    /// # Errors
    ///
    /// Propagates environment errors.
    pub fn run_episode(&mut self) -> Result<&Episode> {
        let episode = run_episode(&mut self.env, &mut self.learner, self.config.max_steps)?;
        self.history.push(episode);
        self.history
            .last()
            .ok_or_else(|| WayfarerError::InvalidState("episode history is empty".to_string()))
    }

    /// Play `episodes` episodes and return their mean reward
    ///
    /// # Errors
    ///
    /// Stops at the first environment error.
    pub fn train(&mut self, episodes: usize) -> Result<f64> {
        let mut total = 0.0;
        for _ in 0..episodes {
            total += self.run_episode()?.total_reward;
        }
        #[allow(clippy::cast_precision_loss)]
        let mean = if episodes == 0 { 0.0 } else { total / episodes as f64 };
        info!(
            episodes,
            mean_reward = mean,
            played = self.history.len(),
            "training batch finished"
        );
        Ok(mean)
    }

    /// Play the configured number of episodes
    ///
    /// # Errors
    ///
    /// Stops at the first environment error.
    pub fn run(&mut self) -> Result<f64> {
        self.train(self.config.num_episodes)
    }

    /// Episodes played so far, oldest first
    pub fn history(&self) -> &[Episode] {
        &self.history
    }

    /// The learner
    pub fn learner(&self) -> &L {
        &self.learner
    }

    /// The environment
    pub fn env(&self) -> &E {
        &self.env
    }

    /// Give back the learner
    pub fn into_learner(self) -> L {
        self.learner
    }
}
