//! Battle state machine integration tests
//!
//! Drives `BattleScene` and `Game` tick by tick with in-process stub
//! collaborators, the way the binary's fixed-tick loop does.

use async_trait::async_trait;
use llm_rpg::battle::{
    ActionContext, ActionJudge, ActionJudgment, ActionNarrator, BattleResult, BattleScene,
    BattleState, BattleStateKind, Collaborators, EnemyActionGenerator, EnemyGenerator,
    GeneratedEnemy, InputEvent,
};
use llm_rpg::core::config::GameConfig;
use llm_rpg::core::error::{Result, RpgError};
use llm_rpg::core::types::{Side, StatType};
use llm_rpg::entity::item::chewed_up_pen;
use llm_rpg::entity::{
    Combatant, CombatantSnapshot, Enemy, EnemyArchetype, Hero, HeroClass, Stats,
};
use llm_rpg::game::{Game, GameSceneKind};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Runtime;

/// Fixed estimates per side
struct StubJudge {
    hero: ActionJudgment,
    enemy: ActionJudgment,
    calls: AtomicUsize,
}

impl StubJudge {
    fn new(hero: f64, enemy: f64) -> Arc<Self> {
        Arc::new(Self {
            hero: ActionJudgment::new(hero, hero),
            enemy: ActionJudgment::new(enemy, enemy),
            calls: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl ActionJudge for StubJudge {
    async fn judge(&self, context: &ActionContext) -> Result<ActionJudgment> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(if context.is_hero_turn {
            self.hero
        } else {
            self.enemy
        })
    }
}

struct FailingJudge;

#[async_trait]
impl ActionJudge for FailingJudge {
    async fn judge(&self, _context: &ActionContext) -> Result<ActionJudgment> {
        Err(RpgError::LlmError("judge unavailable".into()))
    }
}

struct SlowJudge;

#[async_trait]
impl ActionJudge for SlowJudge {
    async fn judge(&self, _context: &ActionContext) -> Result<ActionJudgment> {
        tokio::time::sleep(Duration::from_secs(5)).await;
        Ok(ActionJudgment::new(1.0, 1.0))
    }
}

struct StubNarrator;

#[async_trait]
impl ActionNarrator for StubNarrator {
    async fn describe(
        &self,
        context: &ActionContext,
        _judgment: &ActionJudgment,
        total_dmg: i64,
    ) -> Result<String> {
        Ok(format!("{} deals {} damage.", context.attacker.name, total_dmg))
    }
}

struct FailingNarrator;

#[async_trait]
impl ActionNarrator for FailingNarrator {
    async fn describe(&self, _: &ActionContext, _: &ActionJudgment, _: i64) -> Result<String> {
        Err(RpgError::LlmError("narrator down".into()))
    }
}

struct StubEnemyAction;

#[async_trait]
impl EnemyActionGenerator for StubEnemyAction {
    async fn generate_next_action(
        &self,
        _enemy: &CombatantSnapshot,
        _hero: &CombatantSnapshot,
        _battle_history: &str,
    ) -> Result<String> {
        Ok("I bite your ankle".to_string())
    }
}

struct FailingEnemyAction;

#[async_trait]
impl EnemyActionGenerator for FailingEnemyAction {
    async fn generate_next_action(
        &self,
        _: &CombatantSnapshot,
        _: &CombatantSnapshot,
        _: &str,
    ) -> Result<String> {
        Err(RpgError::LlmError("rate limited".into()))
    }
}

struct StubEnemyGenerator;

#[async_trait]
impl EnemyGenerator for StubEnemyGenerator {
    async fn generate_enemy(&self, _archetype: EnemyArchetype) -> Result<GeneratedEnemy> {
        Ok(GeneratedEnemy {
            name: "Angry Toaster".to_string(),
            description: "A toaster that has seen too much.".to_string(),
        })
    }
}

fn collaborators(judge: Arc<dyn ActionJudge>) -> Collaborators {
    Collaborators {
        judge,
        narrator: Arc::new(StubNarrator),
        enemy_action_generator: Arc::new(StubEnemyAction),
        enemy_generator: None,
    }
}

fn config() -> GameConfig {
    let mut config = GameConfig::default();
    config.damage_calculator.ad_parity_dmg = 1.0;
    config.damage_calculator.ad_diff_scaling = 0.5;
    config.damage_calculator.random_factor_min = 1.0;
    config.damage_calculator.random_factor_max = 1.0;
    config.damage_calculator.llm_dmg_impact = 2.0;
    config.battle.minimum_display_s = 0.0;
    config.battle.hero_max_wait_s = 5.0;
    config.battle.enemy_max_wait_s = 5.0;
    config
}

/// Hero with attack 10, defense 4, focus 20 and no items
fn hero(config: &GameConfig) -> Hero {
    let class = HeroClass {
        class_name: "Tester".to_string(),
        description: "Runs tests.".to_string(),
        base_stats: Stats::new(10, 4, 20, 30),
        starting_item: chewed_up_pen(),
    };
    let mut hero = Hero::new("Hero", &class, &config.hero).unwrap();
    hero.inventory.remove_item("Chewed Up Pen");
    hero
}

fn enemy(max_hp: i32) -> Enemy {
    Enemy::new("Tree", "Grew an appetite.", Stats::new(3, 4, 0, max_hp), EnemyArchetype::Tank)
}

fn scene(rt: &Runtime, judge: Arc<dyn ActionJudge>, config: &GameConfig, enemy_hp: i32) -> BattleScene {
    BattleScene::new(
        hero(config),
        enemy(enemy_hp),
        &collaborators(judge),
        config,
        rt.handle().clone(),
        ChaCha8Rng::seed_from_u64(7),
    )
}

fn run_until(scene: &mut BattleScene, kind: BattleStateKind) {
    for _ in 0..2000 {
        if scene.state_kind() == kind {
            return;
        }
        scene.update(0.1).unwrap();
        std::thread::sleep(Duration::from_millis(1));
    }
    panic!("never reached {:?}, stuck in {:?}", kind, scene.state_kind());
}

fn begin_turn(scene: &mut BattleScene) {
    assert_eq!(scene.state_kind(), BattleStateKind::Start);
    scene.handle_input(InputEvent::Confirm).unwrap();
    assert_eq!(scene.state_kind(), BattleStateKind::Turn);
}

#[test]
fn test_hero_turn_deals_expected_damage() {
    let rt = Runtime::new().unwrap();
    let config = config();
    let mut scene = scene(&rt, StubJudge::new(1.0, 1.0), &config, 50);
    begin_turn(&mut scene);

    scene
        .handle_input(InputEvent::Line("I smash the tree with a rock".into()))
        .unwrap();
    assert_eq!(scene.state_kind(), BattleStateKind::HeroThinking);
    run_until(&mut scene, BattleStateKind::HeroResult);

    let BattleState::HeroResult(outcome) = scene.state() else {
        panic!("expected hero result");
    };
    assert!(!outcome.is_failure());
    assert_eq!(outcome.damage.base_dmg, 4.0);
    assert_eq!(outcome.damage.llm_dmg_scaling, 2.0);
    assert_eq!(outcome.total_dmg(), 8);
    assert_eq!(outcome.effect_description, "Hero deals 8 damage.");
    assert_eq!(scene.enemy().hp(), 42);
    assert_eq!(scene.battle_log().len(), 1);
    assert_eq!(scene.creativity_tracker().usage_count("smash"), 1);
}

#[test]
fn test_over_focus_input_rejected_locally() {
    let rt = Runtime::new().unwrap();
    let config = config();
    let judge = StubJudge::new(1.0, 1.0);
    let mut scene = scene(&rt, judge.clone(), &config, 50);
    begin_turn(&mut scene);

    scene.update(3.0).unwrap();
    scene
        .handle_input(InputEvent::Line("a".repeat(21)))
        .unwrap();

    assert_eq!(scene.state_kind(), BattleStateKind::Turn);
    let BattleState::Turn(input) = scene.state() else {
        panic!("expected turn");
    };
    assert_eq!(input.elapsed_s(), 0.0);
    assert!(input.invalid_reason().unwrap().contains("focus"));
    assert!(scene.battle_log().is_empty());
    assert_eq!(scene.enemy().hp(), 50);
    assert_eq!(judge.calls.load(Ordering::SeqCst), 0);
    assert_eq!(scene.creativity_tracker().usage_count("aaaaaaaaaaaaaaaaaaaaa"), 0);
}

#[test]
fn test_keystrokes_cannot_exceed_focus() {
    let rt = Runtime::new().unwrap();
    let config = config();
    let mut scene = scene(&rt, StubJudge::new(1.0, 1.0), &config, 50);
    begin_turn(&mut scene);

    for c in "kick ".repeat(10).chars() {
        scene.handle_input(InputEvent::Char(c)).unwrap();
    }
    let BattleState::Turn(input) = scene.state() else {
        panic!("expected turn");
    };
    assert_eq!(input.remaining_focus(), 0);

    scene.handle_input(InputEvent::Submit).unwrap();
    assert_eq!(scene.state_kind(), BattleStateKind::HeroThinking);
}

#[test]
fn test_full_round_returns_to_turn() {
    let rt = Runtime::new().unwrap();
    let config = config();
    let mut scene = scene(&rt, StubJudge::new(1.0, 1.0), &config, 50);
    begin_turn(&mut scene);

    scene.handle_input(InputEvent::Line("punch".into())).unwrap();
    run_until(&mut scene, BattleStateKind::HeroResult);
    scene.handle_input(InputEvent::Confirm).unwrap();
    assert_eq!(scene.state_kind(), BattleStateKind::EnemyThinking);
    run_until(&mut scene, BattleStateKind::EnemyResult);

    let BattleState::EnemyResult(outcome) = scene.state() else {
        panic!("expected enemy result");
    };
    // attack 3 vs defense 4: max(1, 1 - 0.5) = 1, × 2 = 2
    assert_eq!(outcome.proposed_action, "I bite your ankle");
    assert_eq!(outcome.total_dmg(), 2);
    assert_eq!(outcome.damage.answer_speed_s, 1000.0);
    assert_eq!(outcome.damage.n_new_words_in_action, 0);
    assert_eq!(scene.hero().hp(), 28);
    assert_eq!(scene.battle_log().len(), 2);
    // enemy words are not tracked
    assert_eq!(scene.creativity_tracker().usage_count("ankle"), 0);

    scene.handle_input(InputEvent::Confirm).unwrap();
    assert_eq!(scene.state_kind(), BattleStateKind::Turn);
}

#[test]
fn test_idle_submission_is_resolved() {
    let rt = Runtime::new().unwrap();
    let config = config();
    let mut scene = scene(&rt, StubJudge::new(1.0, 1.0), &config, 50);
    begin_turn(&mut scene);

    scene.handle_input(InputEvent::Submit).unwrap();
    run_until(&mut scene, BattleStateKind::HeroResult);
    let BattleState::HeroResult(outcome) = scene.state() else {
        panic!("expected hero result");
    };
    assert_eq!(outcome.proposed_action, "Decided to do nothing this turn.");
    assert_eq!(outcome.damage.answer_speed_s, 100.0);
}

#[test]
fn test_judge_failure_becomes_zero_damage_outcome() {
    let rt = Runtime::new().unwrap();
    let config = config();
    let mut scene = scene(&rt, Arc::new(FailingJudge), &config, 50);
    begin_turn(&mut scene);

    scene.handle_input(InputEvent::Line("fireball".into())).unwrap();
    run_until(&mut scene, BattleStateKind::HeroResult);

    let BattleState::HeroResult(outcome) = scene.state() else {
        panic!("expected hero result");
    };
    assert!(outcome.is_failure());
    assert!(outcome.error.as_deref().unwrap().contains("judge unavailable"));
    assert_eq!(outcome.proposed_action, "...");
    assert_eq!(outcome.effect_description, "The action failed.");
    assert_eq!(outcome.total_dmg(), 0);
    assert_eq!(scene.enemy().hp(), 50);
    assert_eq!(scene.creativity_tracker().usage_count("fireball"), 0);
    assert!(scene.render().contains("judge unavailable"));

    // the lost turn is still part of the history the next prompt sees
    assert_eq!(scene.battle_log().len(), 1);
    let event = &scene.battle_log().events()[0];
    assert!(event.is_hero_turn);
    assert_eq!(event.proposed_action, "...");
    assert_eq!(event.effect_description, "The action failed.");
    assert_eq!(event.damage_calculation_result.total_dmg, 0);
    assert_eq!(
        scene.battle_log().to_string_for_battle_ai(5),
        "Hero turn: The action failed."
    );

    // the battle keeps going
    scene.handle_input(InputEvent::Confirm).unwrap();
    assert_eq!(scene.state_kind(), BattleStateKind::EnemyThinking);
}

#[test]
fn test_slow_judge_times_out() {
    let rt = Runtime::new().unwrap();
    let mut config = config();
    config.battle.hero_max_wait_s = 0.5;
    let mut scene = scene(&rt, Arc::new(SlowJudge), &config, 50);
    begin_turn(&mut scene);

    scene.handle_input(InputEvent::Line("wait".into())).unwrap();
    for _ in 0..4 {
        scene.update(0.1).unwrap();
    }
    assert_eq!(scene.state_kind(), BattleStateKind::HeroThinking);
    run_until(&mut scene, BattleStateKind::HeroResult);

    let BattleState::HeroResult(outcome) = scene.state() else {
        panic!("expected hero result");
    };
    assert!(outcome.error.as_deref().unwrap().contains("No answer"));
    assert_eq!(outcome.total_dmg(), 0);
    assert_eq!(scene.battle_log().len(), 1);
    assert_eq!(scene.battle_log().events()[0].effect_description, "The action failed.");
    assert_eq!(scene.creativity_tracker().usage_count("wait"), 0);
}

#[test]
fn test_enemy_generator_failure_is_logged() {
    let rt = Runtime::new().unwrap();
    let config = config();
    let collaborators = Collaborators {
        judge: StubJudge::new(1.0, 1.0),
        narrator: Arc::new(StubNarrator),
        enemy_action_generator: Arc::new(FailingEnemyAction),
        enemy_generator: None,
    };
    let mut scene = BattleScene::new(
        hero(&config),
        enemy(50),
        &collaborators,
        &config,
        rt.handle().clone(),
        ChaCha8Rng::seed_from_u64(2),
    );
    begin_turn(&mut scene);
    scene.handle_input(InputEvent::Line("jab".into())).unwrap();
    run_until(&mut scene, BattleStateKind::HeroResult);
    scene.handle_input(InputEvent::Confirm).unwrap();
    run_until(&mut scene, BattleStateKind::EnemyResult);

    let BattleState::EnemyResult(outcome) = scene.state() else {
        panic!("expected enemy result");
    };
    assert!(outcome.error.as_deref().unwrap().contains("enemy action generator"));
    assert_eq!(scene.hero().hp(), 30);
    assert_eq!(scene.battle_log().len(), 2);
    let event = &scene.battle_log().events()[1];
    assert!(!event.is_hero_turn);
    assert_eq!(event.character_name, "Tree");
    assert_eq!(event.effect_description, "The action failed.");
}

#[test]
fn test_narrator_failure_keeps_damage() {
    let rt = Runtime::new().unwrap();
    let config = config();
    let collaborators = Collaborators {
        judge: StubJudge::new(1.0, 1.0),
        narrator: Arc::new(FailingNarrator),
        enemy_action_generator: Arc::new(StubEnemyAction),
        enemy_generator: None,
    };
    let mut scene = BattleScene::new(
        hero(&config),
        enemy(50),
        &collaborators,
        &config,
        rt.handle().clone(),
        ChaCha8Rng::seed_from_u64(1),
    );
    begin_turn(&mut scene);
    scene.handle_input(InputEvent::Line("kick".into())).unwrap();
    run_until(&mut scene, BattleStateKind::HeroResult);

    let BattleState::HeroResult(outcome) = scene.state() else {
        panic!("expected hero result");
    };
    assert!(!outcome.is_failure());
    assert_eq!(outcome.total_dmg(), 8);
    assert_eq!(outcome.effect_description, "Hero: kick");
}

#[test]
fn test_killing_blow_ends_battle() {
    let rt = Runtime::new().unwrap();
    let config = config();
    let mut scene = scene(&rt, StubJudge::new(1.0, 1.0), &config, 5);
    begin_turn(&mut scene);

    scene.handle_input(InputEvent::Line("uppercut".into())).unwrap();
    run_until(&mut scene, BattleStateKind::HeroResult);
    assert!(scene.enemy().is_dead());
    assert_eq!(scene.result(), None);

    scene.handle_input(InputEvent::Confirm).unwrap();
    assert_eq!(scene.result(), Some(BattleResult { winner: Side::Hero }));
    assert_eq!(scene.finished(), None);
    let screen = scene.render();
    assert!(screen.contains("Tree is defeated. You win!"));
    assert!(screen.contains("Press enter to continue."));

    // ticking alone never dismisses the END screen
    scene.update(1.0).unwrap();
    assert_eq!(scene.finished(), None);

    scene.handle_input(InputEvent::Confirm).unwrap();
    assert_eq!(scene.finished(), Some(BattleResult { winner: Side::Hero }));
}

#[test]
fn test_invalid_transition_is_error() {
    let rt = Runtime::new().unwrap();
    let config = config();
    let mut scene = scene(&rt, StubJudge::new(1.0, 1.0), &config, 50);

    let result = scene.change_state(BattleState::End(BattleResult { winner: Side::Hero }));
    assert!(matches!(
        result,
        Err(RpgError::InvalidTransition {
            from: BattleStateKind::Start,
            to: BattleStateKind::End
        })
    ));
    assert_eq!(scene.state_kind(), BattleStateKind::Start);
}

fn drive_game_until(game: &mut Game, done: impl Fn(&Game) -> bool) {
    for _ in 0..2000 {
        if done(game) {
            return;
        }
        game.update(0.1).unwrap();
        std::thread::sleep(Duration::from_millis(1));
    }
    panic!("game never reached the expected state: {:?}", game.scene_kind());
}

fn battle_state(game: &Game) -> Option<BattleStateKind> {
    game.battle().map(|battle| battle.state_kind())
}

#[test]
fn test_victory_leads_to_resting_hub() {
    let rt = Runtime::new().unwrap();
    let mut config = config();
    config.damage_calculator.llm_dmg_impact = 100.0;
    let hero = hero(&config);
    let mut game = Game::new(
        hero,
        config,
        collaborators(StubJudge::new(1.0, 0.0)),
        rt.handle().clone(),
        3,
    )
    .unwrap();

    drive_game_until(&mut game, |g| g.scene_kind() == GameSceneKind::Battle);
    assert_eq!(game.battle().unwrap().enemy().name(), "Devil Dog");
    assert!(game.battle().unwrap().enemy().character.level >= 1);

    game.handle_input(InputEvent::Confirm).unwrap();
    game.handle_input(InputEvent::Line("flying kick".into())).unwrap();
    drive_game_until(&mut game, |g| battle_state(g) == Some(BattleStateKind::HeroResult));
    game.handle_input(InputEvent::Confirm).unwrap();
    drive_game_until(&mut game, |g| battle_state(g) == Some(BattleStateKind::End));
    for _ in 0..5 {
        game.update(0.1).unwrap();
    }
    assert_eq!(game.scene_kind(), GameSceneKind::Battle);
    assert_eq!(game.battles_won(), 0);
    assert!(game.render().contains("You win!"));

    game.handle_input(InputEvent::Confirm).unwrap();
    drive_game_until(&mut game, |g| g.scene_kind() == GameSceneKind::RestingHub);

    assert_eq!(game.battles_won(), 1);
    let hero = game.hero().unwrap();
    assert!(hero.should_level_up);
    assert!(!hero.discovered_item);
    assert_eq!(hero.hp(), hero.current_stats().max_hp);
    assert!(game.item_choices().is_empty());

    assert!(matches!(game.start_next_battle(), Err(RpgError::InvalidAction(_))));
    game.level_up(StatType::Attack).unwrap();
    assert_eq!(game.hero().unwrap().character.base_stats.attack, 15);
    game.start_next_battle().unwrap();
    drive_game_until(&mut game, |g| g.scene_kind() == GameSceneKind::Battle);
    assert_eq!(game.battle().unwrap().enemy().name(), "Hippy");
}

#[test]
fn test_defeat_leads_to_game_over() {
    let rt = Runtime::new().unwrap();
    let mut config = config();
    config.damage_calculator.llm_dmg_impact = 100.0;
    let hero = hero(&config);
    // hero actions do nothing, enemy actions always land
    let mut game = Game::new(
        hero,
        config,
        collaborators(StubJudge::new(0.0, 1.0)),
        rt.handle().clone(),
        4,
    )
    .unwrap();

    drive_game_until(&mut game, |g| g.scene_kind() == GameSceneKind::Battle);
    game.handle_input(InputEvent::Confirm).unwrap();
    game.handle_input(InputEvent::Line("wave".into())).unwrap();
    drive_game_until(&mut game, |g| battle_state(g) == Some(BattleStateKind::HeroResult));
    game.handle_input(InputEvent::Confirm).unwrap();
    drive_game_until(&mut game, |g| battle_state(g) == Some(BattleStateKind::EnemyResult));
    assert!(game.hero().unwrap().is_dead());

    game.handle_input(InputEvent::Confirm).unwrap();
    drive_game_until(&mut game, |g| battle_state(g) == Some(BattleStateKind::End));
    assert!(!game.is_over());
    assert!(game.render().contains("Hero has fallen. Devil Dog won!"));

    game.handle_input(InputEvent::Confirm).unwrap();
    drive_game_until(&mut game, |g| g.is_over());
    assert_eq!(game.battles_won(), 0);
    assert!(game.render().contains("Game over"));
}

#[test]
fn test_generated_enemy_is_used() {
    let rt = Runtime::new().unwrap();
    let config = config();
    let hero = hero(&config);
    let mut collaborators = collaborators(StubJudge::new(1.0, 1.0));
    collaborators.enemy_generator = Some(Arc::new(StubEnemyGenerator));
    let mut game = Game::new(hero, config, collaborators, rt.handle().clone(), 5).unwrap();

    assert_eq!(game.scene_kind(), GameSceneKind::Loading);
    drive_game_until(&mut game, |g| g.scene_kind() == GameSceneKind::Battle);
    assert_eq!(game.battle().unwrap().enemy().name(), "Angry Toaster");
}
