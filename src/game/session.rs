//! One play session: scene routing between battles
//!
//! Loading → Battle → RestingHub → Loading ... until the hero falls,
//! then GameOver.

use crate::battle::ports::{Collaborators, GeneratedEnemy};
use crate::battle::scene::{BattleScene, InputEvent};
use crate::battle::state::BattleResult;
use crate::battle::task::{BackgroundTask, TaskResult};
use crate::combat::scaling::scale_enemy;
use crate::core::config::GameConfig;
use crate::core::error::{Result, RpgError};
use crate::core::types::StatType;
use crate::entity::archetype::EnemyArchetype;
use crate::entity::character::Combatant;
use crate::entity::enemy::Enemy;
use crate::entity::hero::Hero;
use crate::entity::item::ItemRef;
use crate::game::resting_hub::RestingHub;
use crate::game::roster::roster_enemy;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tokio::runtime::Handle;

/// Enemy generation in progress
#[derive(Debug)]
pub struct LoadingScene {
    archetype: EnemyArchetype,
    task: Option<BackgroundTask<GeneratedEnemy>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameSceneKind {
    Loading,
    Battle,
    RestingHub,
    GameOver,
}

pub enum GameScene {
    Loading(LoadingScene),
    Battle(Box<BattleScene>),
    RestingHub(RestingHub),
    GameOver,
}

impl GameScene {
    pub fn kind(&self) -> GameSceneKind {
        match self {
            Self::Loading(_) => GameSceneKind::Loading,
            Self::Battle(_) => GameSceneKind::Battle,
            Self::RestingHub(_) => GameSceneKind::RestingHub,
            Self::GameOver => GameSceneKind::GameOver,
        }
    }
}

pub struct Game {
    config: GameConfig,
    collaborators: Collaborators,
    runtime: Handle,
    rng: ChaCha8Rng,
    /// Owned by the battle scene while a battle runs
    hero: Option<Hero>,
    battles_won: u32,
    scene: GameScene,
}

impl Game {
    /// Validate the config and start loading the first battle
    pub fn new(
        hero: Hero,
        config: GameConfig,
        collaborators: Collaborators,
        runtime: Handle,
        seed: u64,
    ) -> Result<Self> {
        config.validate()?;
        let mut game = Self {
            config,
            collaborators,
            runtime,
            rng: ChaCha8Rng::seed_from_u64(seed),
            hero: Some(hero),
            battles_won: 0,
            scene: GameScene::GameOver,
        };
        game.start_loading()?;
        Ok(game)
    }

    pub fn battles_won(&self) -> u32 {
        self.battles_won
    }

    pub fn scene(&self) -> &GameScene {
        &self.scene
    }

    pub fn scene_kind(&self) -> GameSceneKind {
        self.scene.kind()
    }

    pub fn is_over(&self) -> bool {
        matches!(self.scene, GameScene::GameOver)
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn hero(&self) -> Option<&Hero> {
        match &self.scene {
            GameScene::Battle(battle) => Some(battle.hero()),
            _ => self.hero.as_ref(),
        }
    }

    pub fn battle(&self) -> Option<&BattleScene> {
        match &self.scene {
            GameScene::Battle(battle) => Some(battle),
            _ => None,
        }
    }

    fn start_loading(&mut self) -> Result<()> {
        let archetype = EnemyArchetype::random(&mut self.rng);
        let task = match &self.collaborators.enemy_generator {
            Some(generator) => {
                let generator = generator.clone();
                let runtime = self.runtime.clone();
                Some(BackgroundTask::spawn(
                    "enemy-generation",
                    self.config.battle.generation_max_wait_s,
                    self.config.battle.minimum_display_s,
                    move || {
                        runtime
                            .block_on(generator.generate_enemy(archetype))
                            .map_err(|e| RpgError::Collaborator(format!("enemy generator: {}", e)))
                    },
                )?)
            }
            None => None,
        };
        tracing::info!(battles_won = self.battles_won, %archetype, "Preparing next battle");
        self.scene = GameScene::Loading(LoadingScene { archetype, task });
        Ok(())
    }

    pub fn update(&mut self, dt: f64) -> Result<()> {
        match &mut self.scene {
            GameScene::Loading(loading) => {
                let generated = match loading.task.as_mut() {
                    Some(task) => match task.update(dt) {
                        Some(result) => Some(result),
                        None => return Ok(()),
                    },
                    None => None,
                };
                let archetype = loading.archetype;
                self.begin_battle(generated, archetype)
            }
            GameScene::Battle(battle) => {
                battle.update(dt)?;
                let result = battle.finished();
                match result {
                    Some(result) => self.conclude_battle(result),
                    None => Ok(()),
                }
            }
            GameScene::RestingHub(_) | GameScene::GameOver => Ok(()),
        }
    }

    fn begin_battle(
        &mut self,
        generated: Option<TaskResult<GeneratedEnemy>>,
        archetype: EnemyArchetype,
    ) -> Result<()> {
        let base_stats = self.config.enemy.base_stats;
        let mut enemy = match generated {
            Some(TaskResult::Completed(generated)) => Enemy::new(
                &generated.name,
                &generated.description,
                base_stats,
                archetype,
            ),
            Some(TaskResult::Failed(reason)) => {
                tracing::warn!(%reason, "Enemy generation failed, using roster enemy");
                roster_enemy(self.battles_won, base_stats)
            }
            Some(TaskResult::TimedOut) => {
                tracing::warn!("Enemy generation timed out, using roster enemy");
                roster_enemy(self.battles_won, base_stats)
            }
            None => roster_enemy(self.battles_won, base_stats),
        };
        scale_enemy(&mut enemy, self.battles_won, &self.config.enemy, &mut self.rng)?;

        let hero = self
            .hero
            .take()
            .ok_or_else(|| RpgError::InvalidAction("no hero to send into battle".into()))?;
        tracing::info!(
            enemy = %enemy.character.name,
            level = enemy.character.level,
            "Battle starting"
        );
        let battle = BattleScene::new(
            hero,
            enemy,
            &self.collaborators,
            &self.config,
            self.runtime.clone(),
            ChaCha8Rng::seed_from_u64(self.rng.gen()),
        );
        self.scene = GameScene::Battle(Box::new(battle));
        Ok(())
    }

    /// Reward or end the run once the END screen is dismissed
    fn conclude_battle(&mut self, result: BattleResult) -> Result<()> {
        let mut hero = match std::mem::replace(&mut self.scene, GameScene::GameOver) {
            GameScene::Battle(battle) => battle.into_hero(),
            other => {
                self.scene = other;
                return Err(RpgError::InvalidAction("no battle to conclude".into()));
            }
        };

        if result.hero_won() {
            self.battles_won += 1;
            if self.battles_won % 2 == 0 {
                hero.discovered_item = true;
            } else {
                hero.should_level_up = true;
            }
            hero.full_heal();
            tracing::info!(battles_won = self.battles_won, "Battle won");
            let hub = RestingHub::new(&hero, &mut self.rng);
            self.hero = Some(hero);
            self.scene = GameScene::RestingHub(hub);
        } else {
            tracing::info!(battles_won = self.battles_won, "Game over");
            self.hero = Some(hero);
        }
        Ok(())
    }

    /// Route input to the running battle
    pub fn handle_input(&mut self, event: InputEvent) -> Result<()> {
        match &mut self.scene {
            GameScene::Battle(battle) => battle.handle_input(event),
            _ => Ok(()),
        }
    }

    fn hub_mut(&mut self) -> Result<(&mut RestingHub, &mut Hero)> {
        match (&mut self.scene, self.hero.as_mut()) {
            (GameScene::RestingHub(hub), Some(hero)) => Ok((hub, hero)),
            _ => Err(RpgError::InvalidAction("not at the resting hub".into())),
        }
    }

    pub fn item_choices(&self) -> &[ItemRef] {
        match &self.scene {
            GameScene::RestingHub(hub) => hub.item_choices(),
            _ => &[],
        }
    }

    pub fn level_up(&mut self, stat: StatType) -> Result<()> {
        let amount = self.config.hero.stats_level_up_amount;
        let (hub, hero) = self.hub_mut()?;
        hub.level_up(hero, stat, amount)
    }

    pub fn pick_up(&mut self, index: usize) -> Result<()> {
        let (hub, hero) = self.hub_mut()?;
        hub.pick_up(hero, index)
    }

    pub fn replace(&mut self, index: usize, inventory_index: usize) -> Result<ItemRef> {
        let (hub, hero) = self.hub_mut()?;
        hub.replace(hero, index, inventory_index)
    }

    pub fn skip_item(&mut self) -> Result<()> {
        let (hub, hero) = self.hub_mut()?;
        hub.skip_item(hero);
        Ok(())
    }

    pub fn start_next_battle(&mut self) -> Result<()> {
        let (hub, hero) = self.hub_mut()?;
        if !hub.can_continue(hero) {
            return Err(RpgError::InvalidAction(
                "choose a stat to level up first".into(),
            ));
        }
        hub.skip_item(hero);
        self.start_loading()
    }

    /// Text for the current screen
    pub fn render(&self) -> String {
        match &self.scene {
            GameScene::Loading(_) => "Looking for the next opponent...".to_string(),
            GameScene::Battle(battle) => battle.render(),
            GameScene::RestingHub(hub) => match &self.hero {
                Some(hero) => hub.render(hero, self.battles_won),
                None => String::new(),
            },
            GameScene::GameOver => format!(
                "Game over. You won {} battle{}.",
                self.battles_won,
                if self.battles_won == 1 { "" } else { "s" }
            ),
        }
    }
}
