//! City resource pool.
//!
//! Money and population are the spendable currencies. The remaining
//! counters are influence scores; the core enforces no range on them,
//! building and event effects may push them anywhere.
//!
//! All values are integers so the simulation stays deterministic.

use serde::{Deserialize, Serialize};

/// One of the named resource counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ResourceKind {
    /// Treasury used to pay for construction.
    Money,
    /// Inhabitants of the city.
    Population,
    /// Standing of the city among its neighbours.
    Prestige,
    /// Public order.
    Safety,
    /// Research progress.
    Technology,
    /// Food supply.
    Food,
    /// Public health.
    Health,
}

impl ResourceKind {
    /// Every kind, in display order.
    pub const ALL: [Self; 7] = [
        Self::Money,
        Self::Population,
        Self::Prestige,
        Self::Safety,
        Self::Technology,
        Self::Food,
        Self::Health,
    ];
}

/// The city's resource counters.
///
/// Also used as a signed delta: building and event effects are expressed as
/// a `Resources` value that gets added to the pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Resources {
    /// Treasury.
    pub money: i64,
    /// Inhabitants.
    pub population: i64,
    /// Influence score.
    pub prestige: i64,
    /// Influence score.
    pub safety: i64,
    /// Influence score.
    pub technology: i64,
    /// Influence score.
    pub food: i64,
    /// Influence score.
    pub health: i64,
}

impl Resources {
    /// All counters at zero.
    pub const ZERO: Self = Self {
        money: 0,
        population: 0,
        prestige: 0,
        safety: 0,
        technology: 0,
        food: 0,
        health: 0,
    };

    /// Create a pool with the two currencies set and influence at zero.
    #[must_use]
    pub const fn new(money: i64, population: i64) -> Self {
        Self {
            money,
            population,
            ..Self::ZERO
        }
    }

    /// Read a single counter.
    #[must_use]
    pub const fn get(&self, kind: ResourceKind) -> i64 {
        match kind {
            ResourceKind::Money => self.money,
            ResourceKind::Population => self.population,
            ResourceKind::Prestige => self.prestige,
            ResourceKind::Safety => self.safety,
            ResourceKind::Technology => self.technology,
            ResourceKind::Food => self.food,
            ResourceKind::Health => self.health,
        }
    }

    /// Mutable access to a single counter.
    pub fn get_mut(&mut self, kind: ResourceKind) -> &mut i64 {
        match kind {
            ResourceKind::Money => &mut self.money,
            ResourceKind::Population => &mut self.population,
            ResourceKind::Prestige => &mut self.prestige,
            ResourceKind::Safety => &mut self.safety,
            ResourceKind::Technology => &mut self.technology,
            ResourceKind::Food => &mut self.food,
            ResourceKind::Health => &mut self.health,
        }
    }

    /// Add `amount` (possibly negative) to one counter, saturating.
    pub fn adjust(&mut self, kind: ResourceKind, amount: i64) {
        let counter = self.get_mut(kind);
        *counter = counter.saturating_add(amount);
    }

    /// Check if the treasury covers a price.
    #[must_use]
    pub const fn can_afford(&self, price: i64) -> bool {
        self.money >= price
    }

    /// Take money from the treasury if available.
    ///
    /// Returns true if the transaction succeeded.
    pub fn spend(&mut self, price: i64) -> bool {
        if self.can_afford(price) {
            self.money = self.money.saturating_sub(price);
            true
        } else {
            false
        }
    }

    /// True when every counter is zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }
}

impl std::ops::Add for Resources {
    type Output = Self;

    fn add(mut self, rhs: Self) -> Self::Output {
        self += rhs;
        self
    }
}

impl std::ops::AddAssign for Resources {
    fn add_assign(&mut self, rhs: Self) {
        for kind in ResourceKind::ALL {
            self.adjust(kind, rhs.get(kind));
        }
    }
}

impl std::ops::SubAssign for Resources {
    fn sub_assign(&mut self, rhs: Self) {
        for kind in ResourceKind::ALL {
            let counter = self.get_mut(kind);
            *counter = counter.saturating_sub(rhs.get(kind));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_sets_currencies_only() {
        let pool = Resources::new(1000, 100);
        assert_eq!(pool.money, 1000);
        assert_eq!(pool.population, 100);
        assert_eq!(pool.prestige, 0);
        assert_eq!(pool.health, 0);
    }

    #[test]
    fn test_get_and_adjust() {
        let mut pool = Resources::ZERO;
        pool.adjust(ResourceKind::Safety, 5);
        pool.adjust(ResourceKind::Safety, -8);
        assert_eq!(pool.get(ResourceKind::Safety), -3);
        assert_eq!(pool.safety, -3);
    }

    #[test]
    fn test_arithmetic_saturates() {
        let mut pool = Resources::new(i64::MAX - 1, i64::MIN + 1);
        pool += Resources::new(10, 0);
        pool -= Resources::new(0, 10);

        assert_eq!(pool.money, i64::MAX);
        assert_eq!(pool.population, i64::MIN);
    }

    #[test]
    fn test_spend() {
        let mut pool = Resources::new(100, 0);

        assert!(pool.can_afford(100));
        assert!(pool.spend(60));
        assert_eq!(pool.money, 40);

        assert!(!pool.spend(41));
        assert_eq!(pool.money, 40);
    }

    #[test]
    fn test_delta_arithmetic() {
        let mut pool = Resources::new(500, 10);
        let delta = Resources {
            money: -50,
            food: 3,
            ..Resources::ZERO
        };

        pool += delta;
        assert_eq!(pool.money, 450);
        assert_eq!(pool.food, 3);

        pool -= delta;
        assert_eq!(pool, Resources::new(500, 10));
        assert_eq!(Resources::ZERO + delta, delta);
    }

    #[test]
    fn test_partial_ron_uses_defaults() {
        let pool: Resources = ron::from_str("(money: 25, prestige: 2)").unwrap();
        assert_eq!(pool.money, 25);
        assert_eq!(pool.prestige, 2);
        assert_eq!(pool.population, 0);
    }
}
