// src/operations/dispatcher.rs

use crate::error::PharmaResult;
use crate::model::courier::Courier;
use crate::simulation::config::DispatchConfig;

/// Elastic courier pool.
///
/// Orders go to the least-loaded courier (lowest index on ties). When every
/// courier is full a new one is hired, up to `max_couriers`; past that the
/// order is dropped and counted as an overload. The pool never shrinks.
/// Assignment is strictly sequential: each pick depends on the loads left by
/// the previous one.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    couriers: Vec<Courier>,
    max_couriers: usize,
    capacity: u32,
    overload_today: u32,
}

impl Dispatcher {
    pub fn new(config: &DispatchConfig) -> PharmaResult<Self> {
        config.validate()?;
        Ok(Self {
            couriers: vec![Courier::new(config.orders_per_courier); config.min_couriers],
            max_couriers: config.max_couriers,
            capacity: config.orders_per_courier,
            overload_today: 0,
        })
    }

    /// Index of the courier with the smallest load, lowest index on ties.
    fn least_loaded(&self) -> Option<usize> {
        self.couriers
            .iter()
            .enumerate()
            .min_by_key(|(i, c)| (c.load, *i))
            .map(|(i, _)| i)
    }

    fn hire(&mut self) -> Option<usize> {
        if self.couriers.len() >= self.max_couriers {
            return None;
        }
        self.couriers.push(Courier::new(self.capacity));
        tracing::info!(pool = self.couriers.len(), "courier hired");
        Some(self.couriers.len() - 1)
    }

    /// Places one order. Returns `false` if it had to be dropped.
    fn place(&mut self) -> bool {
        let slot = match self.least_loaded() {
            Some(i) if !self.couriers[i].is_busy() => Some(i),
            // The least-loaded courier is full, so every courier is.
            _ => self.hire(),
        };
        match slot {
            Some(i) => self.couriers[i].take_order(),
            None => false,
        }
    }

    /// Assigns a batch of orders in arrival order and returns how many were
    /// dropped because the pool was full at its ceiling.
    pub fn assign<O>(&mut self, orders: &[O]) -> u32 {
        let mut dropped = 0;
        for _ in orders {
            if !self.place() {
                dropped += 1;
            }
        }
        if dropped > 0 {
            tracing::warn!(dropped, pool = self.couriers.len(), "couriers overloaded");
        }
        self.overload_today += dropped;
        dropped
    }

    /// Day boundary: loads reset, the pool stays.
    pub fn end_day(&mut self) {
        for courier in &mut self.couriers {
            courier.reset();
        }
        self.overload_today = 0;
    }

    pub fn pool_size(&self) -> usize {
        self.couriers.len()
    }

    pub fn overload_today(&self) -> u32 {
        self.overload_today
    }

    pub fn loads(&self) -> Vec<u32> {
        self.couriers.iter().map(|c| c.load).collect()
    }

    /// Orders handed out today.
    pub fn assigned_today(&self) -> u32 {
        self.couriers.iter().map(|c| c.load).sum()
    }
}
