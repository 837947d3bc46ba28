//! Spread target arbitration.
//!
//! The target is recomputed from scratch after every input mutation, never
//! patched incrementally, so it cannot drift. Rules run in fixed precedence
//! as an ordered table of pure functions; a later rule can raise or cap the
//! running offset but never push it below zero.

use crate::config::EngineConfig;
use crate::input::{InputState, ModifierId};

type SpreadRule = fn(&InputState, &EngineConfig, f32) -> f32;

const RULES: [SpreadRule; 3] = [movement_rule, click_rule, crouch_rule];

/// Compute the spread offset above the base gap for the current held state.
pub fn arbitrate(state: &InputState, config: &EngineConfig) -> f32 {
    RULES
        .iter()
        .fold(0.0, |offset, rule| rule(state, config, offset))
}

fn movement_rule(state: &InputState, config: &EngineConfig, offset: f32) -> f32 {
    if !config.movement.enabled || !state.any_movement_key_held() {
        return offset;
    }
    if config.counter_strafe.enabled && state.opposing_pair_held() {
        let reduced = config.movement.amount - config.counter_strafe.reduction;
        offset + reduced.max(config.counter_strafe.min_spread)
    } else {
        offset + config.movement.amount
    }
}

fn click_rule(state: &InputState, config: &EngineConfig, offset: f32) -> f32 {
    if config.click.enabled && config.click.trigger.held(state) {
        offset.max(config.click.amount)
    } else {
        offset
    }
}

fn crouch_rule(state: &InputState, config: &EngineConfig, offset: f32) -> f32 {
    if config.crouch.enabled && state.modifier_held(ModifierId::Control) {
        (offset - config.crouch.amount).max(0.0)
    } else {
        offset
    }
}

/// Smoothing speed for the gap/length animation, selected by the same
/// precedence the rules use: counter-strafe, then click, then crouch, then
/// plain movement.
pub fn active_rule_speed(state: &InputState, config: &EngineConfig) -> f32 {
    if config.counter_strafe.enabled && state.opposing_pair_held() {
        config.counter_strafe.reduction
    } else if config.click.enabled && config.click.trigger.held(state) {
        config.click.speed
    } else if config.crouch.enabled && state.modifier_held(ModifierId::Control) {
        config.crouch.speed
    } else {
        config.movement.speed
    }
}
