//! Battle state machine
//!
//! Drives one battle from the opening screen to a winner. All mutable
//! battle state (hp, log, creativity tracker) is touched only here, on the
//! caller's thread; thinking phases run the judge, damage calculator, and
//! narrator on a worker and hand back an [`ActionOutcome`].

use crate::battle::ai::{ActionRequest, BattleAi};
use crate::battle::log::BattleLog;
use crate::battle::outcome::ActionOutcome;
use crate::battle::ports::{ActionContext, Collaborators, EnemyActionGenerator};
use crate::battle::state::{BattleResult, BattleState, BattleStateKind};
use crate::battle::task::{BackgroundTask, TaskResult};
use crate::battle::turn::{ProposedHeroAction, TurnInput};
use crate::combat::creativity::CreativityTracker;
use crate::combat::damage::DamageCalculator;
use crate::core::config::{BattleConfig, GameConfig};
use crate::core::error::{Result, RpgError};
use crate::core::types::Side;
use crate::entity::character::Combatant;
use crate::entity::enemy::Enemy;
use crate::entity::hero::Hero;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::fmt::Write;
use std::sync::Arc;
use tokio::runtime::Handle;

/// Player input, either keystroke-level or a whole line
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    Char(char),
    Backspace,
    Submit,
    Confirm,
    Line(String),
}

impl InputEvent {
    fn is_acknowledgement(&self) -> bool {
        matches!(self, Self::Confirm | Self::Submit | Self::Line(_))
    }
}

pub struct BattleScene {
    hero: Hero,
    enemy: Enemy,
    battle_log: BattleLog,
    creativity_tracker: CreativityTracker,
    ai: Arc<BattleAi>,
    enemy_action_generator: Arc<dyn EnemyActionGenerator>,
    runtime: Handle,
    config: BattleConfig,
    debug_mode: bool,
    rng: ChaCha8Rng,
    state: BattleState,
    /// The END screen has been seen and dismissed
    end_acknowledged: bool,
}

impl BattleScene {
    pub fn new(
        hero: Hero,
        enemy: Enemy,
        collaborators: &Collaborators,
        config: &GameConfig,
        runtime: Handle,
        rng: ChaCha8Rng,
    ) -> Self {
        let ai = BattleAi::new(
            collaborators.judge.clone(),
            collaborators.narrator.clone(),
            DamageCalculator::new(config.damage_calculator.clone()),
        );
        Self {
            hero,
            enemy,
            battle_log: BattleLog::new(),
            creativity_tracker: CreativityTracker::new(
                config.creativity_tracker.word_overuse_threshold,
            ),
            ai: Arc::new(ai),
            enemy_action_generator: collaborators.enemy_action_generator.clone(),
            runtime,
            config: config.battle.clone(),
            debug_mode: config.debug_mode,
            rng,
            state: BattleState::Start,
            end_acknowledged: false,
        }
    }

    pub fn hero(&self) -> &Hero {
        &self.hero
    }

    pub fn enemy(&self) -> &Enemy {
        &self.enemy
    }

    pub fn battle_log(&self) -> &BattleLog {
        &self.battle_log
    }

    pub fn creativity_tracker(&self) -> &CreativityTracker {
        &self.creativity_tracker
    }

    pub fn state(&self) -> &BattleState {
        &self.state
    }

    pub fn state_kind(&self) -> BattleStateKind {
        self.state.kind()
    }

    /// Winner, once the battle has ended
    pub fn result(&self) -> Option<BattleResult> {
        match self.state {
            BattleState::End(result) => Some(result),
            _ => None,
        }
    }

    /// Winner, once the END screen has been acknowledged
    pub fn finished(&self) -> Option<BattleResult> {
        self.result().filter(|_| self.end_acknowledged)
    }

    /// Give the hero back once the battle is over
    pub fn into_hero(self) -> Hero {
        self.hero
    }

    /// Move to `next` if the transition table allows it
    pub fn change_state(&mut self, next: BattleState) -> Result<()> {
        let from = self.state.kind();
        let to = next.kind();
        if !from.can_transition_to(to) {
            return Err(RpgError::InvalidTransition { from, to });
        }
        tracing::debug!(?from, ?to, "Battle state change");
        self.state = next;
        Ok(())
    }

    pub fn handle_input(&mut self, event: InputEvent) -> Result<()> {
        match self.state.kind() {
            BattleStateKind::Start if event.is_acknowledgement() => {
                let focus = self.hero.current_stats().focus;
                self.change_state(BattleState::Turn(TurnInput::new(focus)))
            }
            BattleStateKind::Turn => {
                let idle_answer_speed_s = self.config.idle_answer_speed_s;
                let proposed = match &mut self.state {
                    BattleState::Turn(input) => match event {
                        InputEvent::Char(c) => {
                            input.push_char(c);
                            None
                        }
                        InputEvent::Backspace => {
                            input.backspace();
                            None
                        }
                        InputEvent::Submit => Some(input.submit(idle_answer_speed_s)),
                        InputEvent::Line(text) => {
                            input.set_text(&text);
                            Some(input.submit(idle_answer_speed_s))
                        }
                        InputEvent::Confirm => None,
                    },
                    _ => None,
                };
                match proposed {
                    Some(proposed) => self.submit_hero_action(proposed),
                    None => Ok(()),
                }
            }
            BattleStateKind::HeroResult if event.is_acknowledgement() => {
                if self.enemy.is_dead() {
                    self.finish(Side::Hero)
                } else {
                    self.start_enemy_thinking()
                }
            }
            BattleStateKind::EnemyResult if event.is_acknowledgement() => {
                if self.hero.is_dead() {
                    self.finish(Side::Enemy)
                } else {
                    let focus = self.hero.current_stats().focus;
                    self.change_state(BattleState::Turn(TurnInput::new(focus)))
                }
            }
            BattleStateKind::End if event.is_acknowledgement() => {
                self.end_acknowledged = true;
                Ok(())
            }
            _ => Ok(()),
        }
    }

    /// Advance timers and collect finished thinking phases
    pub fn update(&mut self, dt: f64) -> Result<()> {
        match &mut self.state {
            BattleState::Turn(input) => {
                input.tick(dt);
                let timed_out = self
                    .config
                    .turn_input_timeout_s
                    .is_some_and(|limit| input.elapsed_s() >= limit);
                if timed_out {
                    tracing::info!("Turn input timed out, submitting current text");
                    let proposed = input.submit(self.config.idle_answer_speed_s);
                    self.submit_hero_action(proposed)?;
                }
            }
            BattleState::HeroThinking(task) => {
                if let Some(result) = task.update(dt) {
                    let outcome = self.outcome_from(result, Side::Hero);
                    self.apply_hero_outcome(outcome)?;
                }
            }
            BattleState::EnemyThinking(task) => {
                if let Some(result) = task.update(dt) {
                    let outcome = self.outcome_from(result, Side::Enemy);
                    self.apply_enemy_outcome(outcome)?;
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn submit_hero_action(&mut self, proposed: ProposedHeroAction) -> Result<()> {
        if !proposed.is_valid {
            tracing::info!(
                reason = proposed.invalid_reason.as_deref().unwrap_or_default(),
                "Hero action rejected"
            );
            return Ok(());
        }
        tracing::info!(
            action = %proposed.action,
            time_to_answer_s = proposed.time_to_answer_seconds,
            "Hero action submitted"
        );

        let request = ActionRequest {
            n_new_words_in_action: self
                .creativity_tracker
                .count_new_words_in_action(&proposed.action),
            n_overused_words_in_action: self
                .creativity_tracker
                .count_overused_words_in_action(&proposed.action),
            answer_speed_s: proposed.time_to_answer_seconds,
            items: self.hero.equipped_items(),
            context: ActionContext {
                is_hero_turn: true,
                attacker: self.hero.snapshot(),
                defender: self.enemy.snapshot(),
                proposed_action: proposed.action,
                battle_history: self.battle_history(),
            },
        };

        let ai = self.ai.clone();
        let runtime = self.runtime.clone();
        let seed: u64 = self.rng.gen();
        let task = BackgroundTask::spawn(
            "hero-thinking",
            self.config.hero_max_wait_s,
            self.config.minimum_display_s,
            move || {
                let mut rng = ChaCha8Rng::seed_from_u64(seed);
                runtime.block_on(ai.resolve_action(&request, &mut rng))
            },
        )?;
        self.change_state(BattleState::HeroThinking(task))
    }

    fn start_enemy_thinking(&mut self) -> Result<()> {
        let enemy = self.enemy.snapshot();
        let hero = self.hero.snapshot();
        let history = self.battle_history();
        let answer_speed_s = self.config.enemy_answer_speed_s;

        let ai = self.ai.clone();
        let generator = self.enemy_action_generator.clone();
        let runtime = self.runtime.clone();
        let seed: u64 = self.rng.gen();
        let task = BackgroundTask::spawn(
            "enemy-thinking",
            self.config.enemy_max_wait_s,
            self.config.minimum_display_s,
            move || {
                let action = runtime
                    .block_on(generator.generate_next_action(&enemy, &hero, &history))
                    .map_err(|e| {
                        RpgError::Collaborator(format!("enemy action generator: {}", e))
                    })?;
                let request = ActionRequest {
                    context: ActionContext {
                        is_hero_turn: false,
                        attacker: enemy,
                        defender: hero,
                        proposed_action: action.trim().to_string(),
                        battle_history: history,
                    },
                    n_new_words_in_action: 0,
                    n_overused_words_in_action: 0,
                    answer_speed_s,
                    items: Vec::new(),
                };
                let mut rng = ChaCha8Rng::seed_from_u64(seed);
                runtime.block_on(ai.resolve_action(&request, &mut rng))
            },
        )?;
        self.change_state(BattleState::EnemyThinking(task))
    }

    fn battle_history(&self) -> String {
        self.battle_log
            .to_string_for_battle_ai(self.config.battle_log_context_events)
    }

    fn outcome_from(&self, result: TaskResult<ActionOutcome>, side: Side) -> ActionOutcome {
        let (name, max_wait_s) = match side {
            Side::Hero => (self.hero.name(), self.config.hero_max_wait_s),
            Side::Enemy => (self.enemy.name(), self.config.enemy_max_wait_s),
        };
        let is_hero_turn = side == Side::Hero;
        match result {
            TaskResult::Completed(outcome) => outcome,
            TaskResult::Failed(reason) => ActionOutcome::failed(is_hero_turn, name, reason),
            TaskResult::TimedOut => ActionOutcome::failed(
                is_hero_turn,
                name,
                format!("No answer within {} seconds", max_wait_s),
            ),
        }
    }

    fn apply_hero_outcome(&mut self, outcome: ActionOutcome) -> Result<()> {
        if outcome.is_failure() {
            tracing::warn!(error = ?outcome.error, "Hero action failed");
        } else {
            self.enemy.inflict_damage(outcome.total_dmg());
            self.creativity_tracker.add_action(&outcome.proposed_action);
            tracing::info!(
                damage = outcome.total_dmg(),
                enemy_hp = self.enemy.hp(),
                "Hero action resolved"
            );
        }
        // Failed halves are logged too so the next prompt sees the lost turn.
        self.battle_log.add_event(outcome.to_event());
        self.change_state(BattleState::HeroResult(outcome))
    }

    fn apply_enemy_outcome(&mut self, outcome: ActionOutcome) -> Result<()> {
        if outcome.is_failure() {
            tracing::warn!(error = ?outcome.error, "Enemy action failed");
        } else {
            self.hero.inflict_damage(outcome.total_dmg());
            tracing::info!(
                damage = outcome.total_dmg(),
                hero_hp = self.hero.hp(),
                "Enemy action resolved"
            );
        }
        self.battle_log.add_event(outcome.to_event());
        self.change_state(BattleState::EnemyResult(outcome))
    }

    fn finish(&mut self, winner: Side) -> Result<()> {
        tracing::info!(
            ?winner,
            turns = self.battle_log.len(),
            "Battle ended"
        );
        self.change_state(BattleState::End(BattleResult { winner }))
    }

    /// Text for the current screen
    pub fn render(&self) -> String {
        let mut out = String::new();
        let hero_stats = self.hero.current_stats();
        let enemy_stats = self.enemy.current_stats();
        match &self.state {
            BattleState::Start => {
                let _ = writeln!(
                    out,
                    "{} (level {}) appears!",
                    self.enemy.name(),
                    self.enemy.character.level
                );
                let _ = writeln!(out, "{}", self.enemy.character.description);
                out.push_str("Press enter to begin.");
            }
            BattleState::Turn(input) => {
                if !self.battle_log.is_empty() {
                    let _ = writeln!(
                        out,
                        "{}\n",
                        self.battle_log
                            .string_of_last_events(self.config.displayed_events, self.debug_mode)
                    );
                }
                let _ = writeln!(
                    out,
                    "{}: {}/{} hp | {}: {}/{} hp",
                    self.hero.name(),
                    self.hero.hp(),
                    hero_stats.max_hp,
                    self.enemy.name(),
                    self.enemy.hp(),
                    enemy_stats.max_hp
                );
                if let Some(reason) = input.invalid_reason() {
                    let _ = writeln!(out, "{}", reason);
                }
                let _ = write!(
                    out,
                    "What do you do? (focus {}/{})",
                    input.remaining_focus(),
                    input.focus()
                );
            }
            BattleState::HeroThinking(_) => {
                let _ = write!(out, "{} is thinking...", self.hero.name());
            }
            BattleState::EnemyThinking(_) => {
                let _ = write!(out, "{} is thinking...", self.enemy.name());
            }
            BattleState::HeroResult(outcome) | BattleState::EnemyResult(outcome) => {
                let _ = writeln!(out, "{}: {}", outcome.character_name, outcome.proposed_action);
                let _ = writeln!(out, "{}", outcome.effect_description);
                if let Some(error) = &outcome.error {
                    let _ = writeln!(out, "Error: {}", error);
                }
                let breakdown = if self.debug_mode {
                    outcome.damage.to_debug_string(outcome.is_hero_turn)
                } else {
                    outcome.damage.to_summary_string(outcome.is_hero_turn)
                };
                let _ = writeln!(out, "{}", breakdown);
                out.push_str("Press enter to continue.");
            }
            BattleState::End(result) => {
                if result.hero_won() {
                    let _ = writeln!(out, "{} is defeated. You win!", self.enemy.name());
                } else {
                    let _ = writeln!(out, "{} has fallen. {} won!", self.hero.name(), self.enemy.name());
                }
                out.push_str("Press enter to continue.");
            }
        }
        out
    }
}
