// src/simulation/config.rs

use crate::error::{PharmaError, PharmaResult};

/// Shelf-life below which regular stock moves to the discounted tier.
pub const DISCOUNT_THRESHOLD_DAYS: i32 = 31;

#[derive(Debug, Clone)]
pub struct WarehouseConfig {
    /// A SKU is flagged for restock while its total stock is below this.
    pub min_instances: u32,
    pub discount_threshold: i32,
}

impl Default for WarehouseConfig {
    fn default() -> Self {
        Self {
            min_instances: 5,
            discount_threshold: DISCOUNT_THRESHOLD_DAYS,
        }
    }
}

impl WarehouseConfig {
    pub fn validate(&self) -> PharmaResult<()> {
        if self.discount_threshold < 1 {
            return Err(PharmaError::Config(format!(
                "discount threshold must be at least 1 day, got {}",
                self.discount_threshold
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct ReplenishmentConfig {
    /// Units delivered by one restock.
    pub batch_size: u32,
    /// Inclusive lead-time range, in days.
    pub lead_time_min: u32,
    pub lead_time_max: u32,
    /// Seed for the lead-time draws.
    pub seed: u64,
}

impl Default for ReplenishmentConfig {
    fn default() -> Self {
        Self {
            batch_size: 30,
            lead_time_min: 1,
            lead_time_max: 3,
            seed: 42,
        }
    }
}

impl ReplenishmentConfig {
    pub fn validate(&self) -> PharmaResult<()> {
        if self.lead_time_min > self.lead_time_max {
            return Err(PharmaError::Config(format!(
                "lead time range {}..={} is empty",
                self.lead_time_min, self.lead_time_max
            )));
        }
        if self.batch_size == 0 {
            return Err(PharmaError::Config("restock batch size must be positive".into()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct DispatchConfig {
    /// Couriers on staff from day one.
    pub min_couriers: usize,
    /// Hiring stops at this pool size.
    pub max_couriers: usize,
    pub orders_per_courier: u32,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            min_couriers: 3,
            max_couriers: 9,
            orders_per_courier: 15,
        }
    }
}

impl DispatchConfig {
    pub fn validate(&self) -> PharmaResult<()> {
        if self.min_couriers > self.max_couriers {
            return Err(PharmaError::Config(format!(
                "min couriers {} exceeds max couriers {}",
                self.min_couriers, self.max_couriers
            )));
        }
        if self.orders_per_courier == 0 {
            return Err(PharmaError::Config("courier capacity must be positive".into()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct SimulationConfig {
    pub total_days: u32,
    /// Units of every catalog line stocked before day one.
    pub initial_stock: u32,
    pub warehouse: WarehouseConfig,
    pub replenishment: ReplenishmentConfig,
    pub dispatch: DispatchConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            total_days: 45,
            initial_stock: 30,
            warehouse: WarehouseConfig::default(),
            replenishment: ReplenishmentConfig::default(),
            dispatch: DispatchConfig::default(),
        }
    }
}

impl SimulationConfig {
    pub fn validate(&self) -> PharmaResult<()> {
        self.warehouse.validate()?;
        self.replenishment.validate()?;
        self.dispatch.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        SimulationConfig::default().validate().unwrap();
    }

    #[test]
    fn inverted_ranges_are_rejected() {
        let mut cfg = SimulationConfig::default();
        cfg.replenishment.lead_time_min = 5;
        assert!(matches!(cfg.validate(), Err(PharmaError::Config(_))));

        let mut cfg = SimulationConfig::default();
        cfg.dispatch.min_couriers = 10;
        assert!(matches!(cfg.validate(), Err(PharmaError::Config(_))));
    }

    #[test]
    fn zero_capacity_is_rejected() {
        let cfg = DispatchConfig {
            orders_per_courier: 0,
            ..DispatchConfig::default()
        };
        assert!(cfg.validate().is_err());
    }
}
