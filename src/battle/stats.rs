use crate::battle::active::SideState;
use crate::monster::{STAT_ATTACK, STAT_DEFENSE, STAT_SPECIAL, STAT_SPEED};
use crate::rng::BattleRng;

/// The fixed 13-entry stage percentage table, stages -6..+6.
pub const STAGE_PERCENTS: [u16; 13] = [25, 28, 33, 40, 50, 66, 100, 150, 200, 250, 300, 350, 400];

pub fn stage_multiplier(stage: i8) -> u16 {
    STAGE_PERCENTS[(stage.clamp(-6, 6) + 6) as usize]
}

/// Scale a stat by its stage, flooring at 1.
pub fn apply_stage(stat: u16, stage: i8) -> u16 {
    ((stat as u32 * stage_multiplier(stage) as u32) / 100).max(1) as u16
}

/// Stage-modified Speed through the transform overlay. Paralysis already
/// rewrote the raw stat when it landed, so nothing is reapplied here.
pub fn effective_speed(side: &SideState) -> u16 {
    apply_stage(side.raw_stat(STAT_SPEED), side.overlay.stages.speed)
}

/// Offensive stat for the move's category, stage-applied.
pub fn effective_attack(side: &SideState, special: bool) -> u16 {
    if special {
        apply_stage(side.raw_stat(STAT_SPECIAL), side.overlay.stages.special)
    } else {
        apply_stage(side.raw_stat(STAT_ATTACK), side.overlay.stages.attack)
    }
}

/// Defensive stat for the move's category, stage-applied. The era's
/// single Special stat defends against special moves.
pub fn effective_defense(side: &SideState, special: bool) -> u16 {
    if special {
        apply_stage(side.raw_stat(STAT_SPECIAL), side.overlay.stages.special)
    } else {
        apply_stage(side.raw_stat(STAT_DEFENSE), side.overlay.stages.defense)
    }
}

/// Resolve a move's hit chance in the 0-255 domain: scale the base
/// percent, apply the attacker's accuracy multiplier and the defender's
/// evasion multiplier, clamp to [1, 255].
pub fn scaled_accuracy(base_percent: u8, accuracy_stage: i8, evasion_stage: i8) -> u8 {
    let mut value = base_percent as u32 * 255 / 100;
    value = value * stage_multiplier(accuracy_stage) as u32 / 100;
    value = value * stage_multiplier(-evasion_stage) as u32 / 100;
    value.clamp(1, 255) as u8
}

/// Success iff a fresh 0-255 draw lands strictly below the threshold.
pub fn accuracy_roll(rng: &mut dyn BattleRng, threshold: u8) -> bool {
    rng.rand_u8() < threshold
}

/// Critical-hit threshold over the 0-255 domain, derived from the user's
/// species base Speed. Focus energy divides instead of multiplying — the
/// era's inverted bonus, preserved on purpose.
pub fn crit_threshold(base_speed: u8, high_crit: bool, focus_energy: bool) -> u8 {
    match (high_crit, focus_energy) {
        (false, false) => base_speed / 2,
        (false, true) => base_speed / 8,
        (true, false) => ((base_speed as u16) * 2).min(255) as u8,
        (true, true) => base_speed,
    }
}

pub fn crit_roll(rng: &mut dyn BattleRng, threshold: u8) -> bool {
    rng.rand_u8() < threshold
}
