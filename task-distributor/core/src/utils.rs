// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use rand::Rng;

/// Generate `count` random work payloads in `1..=max_value`
pub fn generate_work_items(rng: &mut impl Rng, count: usize, max_value: i64) -> Vec<i64> {
    let max_value = max_value.max(1);
    (0..count).map(|_| rng.random_range(1..=max_value)).collect()
}

/// Decide whether an event with the given 0-100 probability happens
pub fn roll(rng: &mut impl Rng, probability: u32) -> bool {
    if probability == 0 {
        return false;
    }
    rng.random_range(0..100) < probability
}

/// Best-effort message extraction from a panic payload
pub fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
