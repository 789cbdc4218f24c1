//! Boss battle model: two clamped health pools and a score accumulator.
//!
//! Damage numbers come from outside — the boss takes the XP earned by a
//! correct answer, the player takes a random counterattack on a wrong one.
//! The DOM layer renders whatever this module says the numbers are.

use rand::Rng;

/// Both combatants start here; health never leaves `[0, MAX_HEALTH]`.
pub const MAX_HEALTH: i32 = 100;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Combatant {
    Boss,
    Player,
}

/// Battle verdict. The boss is checked first, so a turn that somehow floors
/// both pools counts as a win.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BattleOutcome {
    InProgress,
    Victory,
    Defeat,
}

impl BattleOutcome {
    pub fn is_over(self) -> bool {
        self != BattleOutcome::InProgress
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BattleState {
    boss_health: i32,
    player_health: i32,
    score: u32,
}

impl BattleState {
    pub fn new() -> Self {
        Self {
            boss_health: MAX_HEALTH,
            player_health: MAX_HEALTH,
            score: 0,
        }
    }

    pub fn boss_health(&self) -> i32 {
        self.boss_health
    }

    pub fn player_health(&self) -> i32 {
        self.player_health
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    /// Subtract `amount` from the target's health, clamped to
    /// `[0, MAX_HEALTH]` whatever the magnitude. Returns the remaining health.
    pub fn apply_damage(&mut self, target: Combatant, amount: u32) -> i32 {
        let pool = match target {
            Combatant::Boss => &mut self.boss_health,
            Combatant::Player => &mut self.player_health,
        };
        *pool = (*pool - amount.min(i32::MAX as u32) as i32).clamp(0, MAX_HEALTH);
        *pool
    }

    pub fn add_score(&mut self, xp: u32) {
        self.score += xp;
    }

    pub fn outcome(&self) -> BattleOutcome {
        if self.boss_health == 0 {
            BattleOutcome::Victory
        } else if self.player_health == 0 {
            BattleOutcome::Defeat
        } else {
            BattleOutcome::InProgress
        }
    }
}

impl Default for BattleState {
    fn default() -> Self {
        Self::new()
    }
}

/// Counterattack damage for a wrong answer: uniform in `[10, 19]`.
pub fn boss_attack_damage(rng: &mut impl Rng) -> u32 {
    rng.gen_range(10..20)
}

/// Horizontal position (percent) for a floating damage indicator, kept away
/// from the container edges: uniform in `[30, 70)`.
pub fn effect_offset_percent(rng: &mut impl Rng) -> f64 {
    30.0 + rng.gen_range(0.0..40.0)
}
