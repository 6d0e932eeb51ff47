//! Episode controller - runs one example from reset to persisted score.

use std::path::Path;
use std::time::Instant;

use chrono::Local;
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

use super::agent::{
    ConversationalAgent, EpisodeAgent, ExecutionMode, Prediction, ServerAgent, StepwiseAgent,
};
use super::config::EpisodeConfig;
use super::environment::{Environment, Example};
use super::result::{self, EpisodeOutcome};
use super::scores::ScoreSink;
use crate::error::EpisodeError;
use crate::trajectory::{format_elapsed, format_timestamp, StepRecord, TrajectoryRecorder};

/// Inputs describing one episode.
#[derive(Debug, Clone, Copy)]
pub struct EpisodeRequest<'a> {
    /// Task configuration handed to the environment.
    pub example: &'a Example,
    /// Natural-language goal.
    pub instruction: &'a str,
    /// Outer-loop iterations allowed in stepwise mode.
    pub max_steps: usize,
    /// Directory receiving `result.txt` and friends.
    pub result_dir: &'a Path,
}

/// Drives a single episode in the mode matching the agent's capability.
#[derive(Debug, Clone, Default)]
pub struct EpisodeController {
    config: EpisodeConfig,
}

impl EpisodeController {
    /// Creates a controller with the given configuration.
    pub fn new(config: EpisodeConfig) -> Self {
        Self { config }
    }

    /// Returns the controller configuration.
    pub fn config(&self) -> &EpisodeConfig {
        &self.config
    }

    /// Runs the episode, appends its score to `scores`, and persists the
    /// result according to the mode's policy.
    ///
    /// Any collaborator failure aborts the episode and is returned as is;
    /// nothing is retried except a missing stepwise observation.
    pub async fn run(
        &self,
        agent: &mut EpisodeAgent,
        env: &mut dyn Environment,
        recorder: &mut dyn TrajectoryRecorder,
        request: EpisodeRequest<'_>,
        scores: &dyn ScoreSink,
    ) -> Result<EpisodeOutcome, EpisodeError> {
        info!(
            "Starting {} episode for example {}",
            agent.mode(),
            request.example.id().unwrap_or("<unnamed>")
        );
        if let Some(limit) = self.config.time_limit() {
            // TODO: enforce time_limit as a wall-clock cutoff once the abort policy is decided.
            debug!(?limit, "time limit configured but not enforced");
        }

        match agent {
            EpisodeAgent::Stepwise(agent) => {
                self.run_stepwise(&mut **agent, env, recorder, request, scores)
                    .await
            }
            EpisodeAgent::ServerDelegated(agent) => {
                self.run_server_delegated(agent, env, request, scores).await
            }
            EpisodeAgent::Conversational(agent) => {
                self.run_conversational(&mut **agent, env, request, scores)
                    .await
            }
        }
    }

    /// Predict/act loop bounded by `max_steps` outer iterations.
    ///
    /// A missing observation costs one iteration, a recovery delay and a
    /// fresh `observe` call, without consulting the agent. A
    /// `done` step ends its batch; the loop condition then ends the episode.
    async fn run_stepwise(
        &self,
        agent: &mut dyn StepwiseAgent,
        env: &mut dyn Environment,
        recorder: &mut dyn TrajectoryRecorder,
        request: EpisodeRequest<'_>,
        scores: &dyn ScoreSink,
    ) -> Result<EpisodeOutcome, EpisodeError> {
        agent.reset();
        let mut observation = env.reset(Some(request.example)).await?;
        let mut done = false;
        let mut step_idx = 0;

        let start_time = Local::now();
        let started = Instant::now();
        recorder
            .record_init(
                observation.as_ref(),
                request.example,
                &format_timestamp(start_time),
            )
            .await?;

        while !done && step_idx < request.max_steps {
            let Some(current) = observation.as_ref() else {
                error!("Observation is None. Waiting a little to do next step.");
                sleep(self.config.recovery_delay).await;
                step_idx += 1;
                observation = env.observe().await?;
                continue;
            };

            info!("Agent: Thinking...");
            let prediction = agent.predict(request.instruction, current).await?;

            if let Some(args) = prediction.pending_update() {
                env.update_computer(args).await?;
            }

            let Prediction { actions, logs, .. } = prediction;
            for action in actions {
                let now = Local::now();
                let action_timestamp = format_timestamp(now);
                let elapsed_timestamp = format_elapsed(now - start_time);
                info!("Step {}: {}", step_idx + 1, action);

                let outcome = env
                    .step(&action, self.config.sleep_after_execution)
                    .await?;
                info!("Reward: {:.2}", outcome.reward);
                info!("Done: {}", outcome.done);

                observation = outcome.observation;
                done = outcome.done;
                recorder
                    .record_step(StepRecord {
                        observation: observation.clone(),
                        logs: logs.clone(),
                        step_index: step_idx,
                        action_timestamp,
                        elapsed_timestamp,
                        action,
                        reward: outcome.reward,
                        done,
                        info: outcome.info,
                    })
                    .await?;

                if done {
                    info!("The episode is done.");
                    break;
                }
            }
            step_idx += 1;
        }

        if !done {
            debug!(steps = step_idx, "step budget exhausted");
        }

        let score = self.evaluate(env, scores).await?;
        result::write_result(request.result_dir, score).await?;
        recorder.record_end(score, start_time).await?;

        Ok(EpisodeOutcome {
            mode: ExecutionMode::Stepwise,
            score,
            elapsed: started.elapsed(),
            steps: step_idx,
            done,
            result_persisted: true,
        })
    }

    /// Single blocking call into the environment's own agent runner.
    /// No trajectory is recorded.
    async fn run_server_delegated(
        &self,
        agent: &ServerAgent,
        env: &mut dyn Environment,
        request: EpisodeRequest<'_>,
        scores: &dyn ScoreSink,
    ) -> Result<EpisodeOutcome, EpisodeError> {
        env.reset(Some(request.example)).await?;
        let started = Instant::now();

        info!("Agent: Running server agent {}...", agent.name);
        env.run_agent(&agent.name, request.instruction, &agent.settings)
            .await?;

        let score = self.evaluate(env, scores).await?;
        result::write_result(request.result_dir, score).await?;

        Ok(EpisodeOutcome {
            mode: ExecutionMode::ServerDelegated,
            score,
            elapsed: started.elapsed(),
            steps: 0,
            done: false,
            result_persisted: true,
        })
    }

    /// Display setup, warm-up, then one blocking chat session. `result.txt`
    /// is skipped when the agent left `debug/error.txt`; `time_taken.txt` is
    /// always written. No trajectory is recorded.
    async fn run_conversational(
        &self,
        agent: &mut dyn ConversationalAgent,
        env: &mut dyn Environment,
        request: EpisodeRequest<'_>,
        scores: &dyn ScoreSink,
    ) -> Result<EpisodeOutcome, EpisodeError> {
        env.reset(None).await?;
        env.configure_display(self.config.screen_width, self.config.screen_height)
            .await?;
        env.prepare_input_focus().await?;
        env.reset(Some(request.example)).await?;

        let started = Instant::now();

        info!(
            "Agent: Starting to execute the instruction '{}'",
            request.instruction
        );
        sleep(self.config.warmup_delay).await;

        let debug_path = result::debug_path(request.result_dir);
        agent.chat(request.instruction, &debug_path).await?;
        info!("Agent: Finished executing the instruction");

        let score = self.evaluate(env, scores).await?;

        let result_persisted = if result::has_error_marker(&debug_path).await {
            warn!(
                "Agent reported an error in {}; result not saved",
                debug_path.display()
            );
            false
        } else {
            result::write_result(request.result_dir, score).await?;
            true
        };

        let elapsed = started.elapsed();
        result::write_time_taken(request.result_dir, elapsed).await?;

        Ok(EpisodeOutcome {
            mode: ExecutionMode::Conversational,
            score,
            elapsed,
            steps: 0,
            done: false,
            result_persisted,
        })
    }

    async fn evaluate(
        &self,
        env: &mut dyn Environment,
        scores: &dyn ScoreSink,
    ) -> Result<f64, EpisodeError> {
        info!("Running evaluator(s)...");
        let score = env.evaluate().await?;
        info!("Result: {:.2}", score);
        scores.append(score);
        Ok(score)
    }
}
