//! Battle states and their transition table

use crate::battle::outcome::ActionOutcome;
use crate::battle::task::BackgroundTask;
use crate::battle::turn::TurnInput;
use crate::core::types::Side;

/// State tags, used for transition checks and error reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BattleStateKind {
    Start,
    Turn,
    HeroThinking,
    HeroResult,
    EnemyThinking,
    EnemyResult,
    End,
}

impl BattleStateKind {
    /// START → TURN → HERO_THINKING → HERO_RESULT → ENEMY_THINKING →
    /// ENEMY_RESULT → (TURN | END); HERO_RESULT may also go to END.
    pub fn can_transition_to(self, next: BattleStateKind) -> bool {
        use BattleStateKind::*;
        matches!(
            (self, next),
            (Start, Turn)
                | (Turn, HeroThinking)
                | (HeroThinking, HeroResult)
                | (HeroResult, EnemyThinking)
                | (HeroResult, End)
                | (EnemyThinking, EnemyResult)
                | (EnemyResult, Turn)
                | (EnemyResult, End)
        )
    }
}

/// How a finished battle ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BattleResult {
    pub winner: Side,
}

impl BattleResult {
    pub fn hero_won(&self) -> bool {
        self.winner == Side::Hero
    }
}

#[derive(Debug)]
pub enum BattleState {
    Start,
    Turn(TurnInput),
    HeroThinking(BackgroundTask<ActionOutcome>),
    HeroResult(ActionOutcome),
    EnemyThinking(BackgroundTask<ActionOutcome>),
    EnemyResult(ActionOutcome),
    End(BattleResult),
}

impl BattleState {
    pub fn kind(&self) -> BattleStateKind {
        match self {
            Self::Start => BattleStateKind::Start,
            Self::Turn(_) => BattleStateKind::Turn,
            Self::HeroThinking(_) => BattleStateKind::HeroThinking,
            Self::HeroResult(_) => BattleStateKind::HeroResult,
            Self::EnemyThinking(_) => BattleStateKind::EnemyThinking,
            Self::EnemyResult(_) => BattleStateKind::EnemyResult,
            Self::End(_) => BattleStateKind::End,
        }
    }
}
