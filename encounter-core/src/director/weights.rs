//! Difficulty-tiered weight tables for the ad-hoc spawn channel.
//!
//! Selection draws `r ~ U(1, total)` and returns the first entry whose
//! cumulative weight reaches `r`, so zero-weight entries are never picked.

use rand::Rng;

use crate::archetype::Archetype;
use crate::constants::{BOSS_CHANCE_BASE, BOSS_CHANCE_CAP, BOSS_CHANCE_STEP};
use crate::error::{EncounterError, EncounterResult};

/// Regular archetypes in table order
pub const BASE_ORDER: [Archetype; 8] = [
    Archetype::Goblin,
    Archetype::Skeleton,
    Archetype::Orc,
    Archetype::Zombie,
    Archetype::Demon,
    Archetype::Wraith,
    Archetype::Golem,
    Archetype::Vampire,
];

/// Boss archetypes in table order
pub const BOSS_ORDER: [Archetype; 4] = [
    Archetype::Dragon,
    Archetype::Necromancer,
    Archetype::DemonLord,
    Archetype::Lich,
];

/// Cumulative-weight picker
#[derive(Debug, Clone, PartialEq)]
pub struct WeightTable<T> {
    entries: Vec<(T, u32)>,
    total: u32,
}

impl<T: Copy + std::fmt::Debug> WeightTable<T> {
    pub fn new(entries: Vec<(T, u32)>) -> EncounterResult<Self> {
        let Some(total) = entries
            .iter()
            .try_fold(0u32, |total, (_, w)| total.checked_add(*w))
        else {
            return Err(EncounterError::WeightOverflow(format!("{entries:?}")));
        };
        if total == 0 {
            return Err(EncounterError::EmptyWeightTable(format!("{entries:?}")));
        }
        Ok(Self { entries, total })
    }

    pub fn total(&self) -> u32 {
        self.total
    }

    pub fn entries(&self) -> &[(T, u32)] {
        &self.entries
    }

    /// Expected frequency of `item`
    pub fn probability(&self, item: T) -> f64
    where
        T: PartialEq,
    {
        let weight: u32 = self
            .entries
            .iter()
            .filter(|(t, _)| *t == item)
            .map(|(_, w)| *w)
            .sum();
        weight as f64 / self.total as f64
    }

    pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> T {
        let roll = rng.gen_range(1..=self.total);
        self.select(roll)
    }

    /// First entry whose cumulative weight reaches `roll`
    pub fn select(&self, roll: u32) -> T {
        let mut cumulative = 0;
        for (item, weight) in &self.entries {
            cumulative += weight;
            if roll <= cumulative {
                return *item;
            }
        }
        // Only reachable for roll > total; clamp to the last weighted entry
        self.entries
            .iter()
            .rev()
            .find(|(_, w)| *w > 0)
            .map(|(item, _)| *item)
            .unwrap_or(self.entries[self.entries.len() - 1].0)
    }
}

fn zip_table<const N: usize>(order: [Archetype; N], weights: [u32; N]) -> WeightTable<Archetype> {
    let total = weights.iter().sum();
    WeightTable {
        entries: order.into_iter().zip(weights).collect(),
        total,
    }
}

/// Base weights by difficulty tier (<=3, <=6, <=10, above)
pub fn base_weights(difficulty: u32) -> [u32; 8] {
    match difficulty {
        0..=3 => [40, 30, 20, 10, 0, 0, 0, 0],
        4..=6 => [30, 25, 20, 15, 10, 0, 0, 0],
        7..=10 => [15, 20, 20, 15, 15, 10, 5, 0],
        _ => [10, 15, 15, 15, 15, 15, 10, 5],
    }
}

/// Boss weights; extra bosses unlock past 10, 20 and 30
pub fn boss_weights(difficulty: u32) -> [u32; 4] {
    match difficulty {
        0..=10 => [100, 0, 0, 0],
        11..=20 => [60, 40, 0, 0],
        21..=30 => [40, 30, 30, 0],
        _ => [25, 25, 25, 25],
    }
}

pub fn base_table(difficulty: u32) -> WeightTable<Archetype> {
    zip_table(BASE_ORDER, base_weights(difficulty))
}

pub fn boss_table(difficulty: u32) -> WeightTable<Archetype> {
    zip_table(BOSS_ORDER, boss_weights(difficulty))
}

/// `min(0.05 + (d - 1) * 0.005, 0.15)`
pub fn boss_chance(difficulty: u32) -> f64 {
    let steps = difficulty.max(1) - 1;
    (BOSS_CHANCE_BASE + steps as f64 * BOSS_CHANCE_STEP).min(BOSS_CHANCE_CAP)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timing::seeded_rng;

    #[test]
    fn test_select_cumulative() {
        let table = base_table(1);
        assert_eq!(table.total(), 100);
        assert_eq!(table.select(1), Archetype::Goblin);
        assert_eq!(table.select(40), Archetype::Goblin);
        assert_eq!(table.select(41), Archetype::Skeleton);
        assert_eq!(table.select(90), Archetype::Orc);
        assert_eq!(table.select(100), Archetype::Zombie);
    }

    #[test]
    fn test_zero_weights_never_picked() {
        let table = base_table(2);
        let mut rng = seeded_rng(3);
        for _ in 0..2000 {
            let pick = table.pick(&mut rng);
            assert!(!matches!(
                pick,
                Archetype::Demon | Archetype::Wraith | Archetype::Golem | Archetype::Vampire
            ));
        }
    }

    #[test]
    fn test_tier_boundaries() {
        assert_eq!(base_weights(3)[0], 40);
        assert_eq!(base_weights(4)[0], 30);
        assert_eq!(base_weights(10)[6], 5);
        assert_eq!(base_weights(11)[7], 5);
        assert_eq!(boss_weights(10), [100, 0, 0, 0]);
        assert_eq!(boss_weights(11), [60, 40, 0, 0]);
        assert_eq!(boss_weights(31), [25, 25, 25, 25]);
    }

    #[test]
    fn test_boss_chance_curve() {
        assert!((boss_chance(0) - 0.05).abs() < 1e-9);
        assert!((boss_chance(1) - 0.05).abs() < 1e-9);
        assert!((boss_chance(11) - 0.10).abs() < 1e-9);
        assert!((boss_chance(21) - 0.15).abs() < 1e-9);
        assert!((boss_chance(500) - 0.15).abs() < 1e-9);
    }

    #[test]
    fn test_empty_table_rejected() {
        let result = WeightTable::new(vec![(Archetype::Goblin, 0), (Archetype::Orc, 0)]);
        assert!(matches!(result, Err(EncounterError::EmptyWeightTable(_))));
    }

    #[test]
    fn test_overflowing_total_rejected() {
        let result = WeightTable::new(vec![(Archetype::Goblin, u32::MAX), (Archetype::Orc, 1)]);
        assert!(matches!(result, Err(EncounterError::WeightOverflow(_))));
        assert!(WeightTable::new(vec![(Archetype::Goblin, u32::MAX)]).is_ok());
    }

    #[test]
    fn test_probability() {
        let table = boss_table(15);
        assert!((table.probability(Archetype::Dragon) - 0.6).abs() < 1e-9);
        assert_eq!(table.probability(Archetype::Lich), 0.0);
    }
}
