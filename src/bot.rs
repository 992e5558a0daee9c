// Episode-aware front end for the HTTP adapter
//
// The host drives one or more episodes; each episode gets its own Agent so
// jump timers never leak between runs. The map lock is only held to look an
// agent up; each agent has its own lock, taken on the blocking pool while the
// tick is computed.

use log::{info, warn};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use crate::agent::{Agent, Decision, DecisionSource};
use crate::config::Config;
use crate::debug_logger::DebugLogger;
use crate::types::{Action, Percept};

/// Episode metadata sent with every request
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct Episode {
    pub id: String,
}

/// Body of /start and /end
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct EpisodeRequest {
    pub episode: Episode,
}

/// Body of /act
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct TickRequest {
    pub episode: Episode,
    pub tick: u64,
    pub percept: Percept,
}

/// Agent host with OOP-style API
/// Takes static configuration and exposes methods corresponding to API endpoints
pub struct Bot {
    config: Config,
    agents: Mutex<HashMap<String, Arc<Mutex<Agent>>>>,
    logger: DebugLogger,
}

impl Bot {
    /// Creates a new Bot instance with the given configuration
    ///
    /// # Arguments
    /// * `config` - Static configuration that does not change during the bot's lifetime
    /// * `logger` - Decision log sink; pass `DebugLogger::disabled()` to skip logging
    pub fn new(config: Config, logger: DebugLogger) -> Self {
        Bot {
            config,
            agents: Mutex::new(HashMap::new()),
            logger,
        }
    }

    /// Returns agent metadata
    /// Corresponds to GET / endpoint
    pub fn info(&self) -> Value {
        info!("INFO");

        json!({
            "apiversion": "1",
            "name": "greedy-lookahead",
            "horizon": self.config.search.horizon,
            "keys": ["left", "right", "down", "jump", "sprint", "up"],
        })
    }

    /// Called when an episode starts; replaces any agent left under the same id
    /// Corresponds to POST /start endpoint
    pub fn start(&self, episode: &Episode) {
        info!("EPISODE START: {}", episode.id);
        self.agents.lock().insert(
            episode.id.clone(),
            Arc::new(Mutex::new(Agent::new(&self.config))),
        );
    }

    /// Called when an episode ends
    /// Corresponds to POST /end endpoint
    pub fn end(&self, episode: &Episode) {
        info!("EPISODE OVER: {}", episode.id);
        self.agents.lock().remove(&episode.id);
    }

    /// Number of episodes currently holding an agent
    pub fn active_episodes(&self) -> usize {
        self.agents.lock().len()
    }

    /// The episode's agent, created on first use
    fn agent_for(&self, episode_id: &str) -> Arc<Mutex<Agent>> {
        self.agents
            .lock()
            .entry(episode_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(Agent::new(&self.config))))
            .clone()
    }

    /// Computes this tick's action for the episode
    /// Corresponds to POST /act endpoint
    ///
    /// An episode that never called /start gets a fresh agent on its first tick.
    /// The tick runs on tokio's blocking pool so a long search neither stalls
    /// the executor nor holds up other episodes.
    ///
    /// # Returns
    /// * `Value` - JSON response with the pressed keys, the raw flag vector and the decision source
    pub async fn act(&self, episode: &Episode, tick: u64, percept: &Percept) -> Value {
        let start_time = Instant::now();

        let agent = self.agent_for(&episode.id);
        let tick_percept = percept.clone();
        let decision: Decision =
            match tokio::task::spawn_blocking(move || agent.lock().act(&tick_percept)).await {
                Ok(decision) => decision,
                Err(e) => {
                    warn!("Tick {}: agent task failed ({}), falling back to cruise", tick, e);
                    Decision {
                        action: Action::cruise(),
                        source: DecisionSource::Fallback,
                    }
                }
            };

        info!(
            "Tick {}: Chose {} (source: {}, time: {}us)",
            tick,
            decision.action,
            decision.source.as_str(),
            start_time.elapsed().as_micros()
        );

        self.logger
            .log_decision(&episode.id, tick, percept.clone(), decision);

        json!({
            "action": decision.action,
            "flags": decision.action.flags(),
            "source": decision.source,
        })
    }
}
