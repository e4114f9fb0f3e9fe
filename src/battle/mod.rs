//! Turn-based battle between the hero and one enemy

pub mod ai;
pub mod log;
pub mod outcome;
pub mod ports;
pub mod scene;
pub mod state;
pub mod task;
pub mod turn;

pub use ai::{ActionRequest, BattleAi};
pub use log::{BattleEvent, BattleLog};
pub use outcome::ActionOutcome;
pub use ports::{
    ActionContext, ActionJudge, ActionJudgment, ActionNarrator, Collaborators,
    EnemyActionGenerator, EnemyGenerator, GeneratedEnemy,
};
pub use scene::{BattleScene, InputEvent};
pub use state::{BattleResult, BattleState, BattleStateKind};
pub use task::{BackgroundTask, TaskResult};
pub use turn::{ProposedHeroAction, TurnInput};
