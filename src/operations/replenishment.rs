// src/operations/replenishment.rs

use crate::error::{PharmaError, PharmaResult};
use crate::model::catalog::Catalog;
use crate::model::sku::SkuId;
use crate::model::store::ExpiringStore;
use crate::model::warehouse::Warehouse;
use crate::simulation::config::ReplenishmentConfig;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Uniform};
use std::collections::BTreeMap;

/// Restock state of one SKU.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RequestState {
    #[default]
    Idle,
    /// A restock is on its way and lands once `days_left` reaches zero.
    Pending { days_left: u32 },
}

/// A fulfilled restock.
#[derive(Debug, Clone, PartialEq)]
pub struct Restock {
    pub sku: SkuId,
    pub quantity: u32,
    pub expense: f64,
}

/// Keeps at most one outstanding restock order per SKU.
#[derive(Debug, Clone)]
pub struct ReplenishmentScheduler {
    requests: Vec<RequestState>,
    lead_time: Uniform<u32>,
    batch_size: u32,
    rng: SmallRng,
}

impl ReplenishmentScheduler {
    /// One request slot per catalog line; anything else is an unknown SKU.
    pub fn new(catalog: &Catalog, config: &ReplenishmentConfig) -> PharmaResult<Self> {
        config.validate()?;
        Ok(Self {
            requests: vec![RequestState::Idle; catalog.len()],
            lead_time: Uniform::new_inclusive(config.lead_time_min, config.lead_time_max),
            batch_size: config.batch_size,
            rng: SmallRng::seed_from_u64(config.seed),
        })
    }

    pub fn state(&self, sku: SkuId) -> PharmaResult<RequestState> {
        self.requests
            .get(sku.index())
            .copied()
            .ok_or_else(|| PharmaError::UnknownSku(sku.to_string()))
    }

    /// Opens a restock for `sku` unless one is already outstanding.
    ///
    /// Returns `true` when a new request was placed.
    pub fn request_if_needed(&mut self, sku: SkuId) -> PharmaResult<bool> {
        if let RequestState::Pending { .. } = self.state(sku)? {
            return Ok(false);
        }
        let days = self.lead_time.sample(&mut self.rng);
        self.requests[sku.index()] = RequestState::Pending { days_left: days };
        tracing::info!(%sku, lead_time = days, "restock requested");
        Ok(true)
    }

    /// Moves every outstanding countdown one day closer.
    pub fn tick(&mut self) {
        for state in &mut self.requests {
            if let RequestState::Pending { days_left } = state {
                *days_left = days_left.saturating_sub(1);
            }
        }
    }

    /// Delivers every restock whose countdown has run out.
    ///
    /// All due lines are costed against the warehouse catalog first, so a
    /// line the warehouse does not carry fails the call before any stock
    /// moves or any request goes idle.
    pub fn fulfill_due<S: ExpiringStore>(
        &mut self,
        warehouse: &mut Warehouse<S>,
    ) -> PharmaResult<Vec<Restock>> {
        let due = self
            .requests
            .iter()
            .enumerate()
            .filter(|(_, state)| **state == RequestState::Pending { days_left: 0 })
            .map(|(i, _)| {
                let sku = SkuId(i as u32);
                let unit_cost = warehouse.catalog().entry(sku)?.unit_cost;
                Ok(Restock {
                    sku,
                    quantity: self.batch_size,
                    expense: unit_cost * self.batch_size as f64,
                })
            })
            .collect::<PharmaResult<Vec<_>>>()?;

        for restock in &due {
            warehouse.restock(restock.sku, restock.quantity)?;
            self.requests[restock.sku.index()] = RequestState::Idle;
            tracing::info!(
                sku = %restock.sku,
                quantity = restock.quantity,
                expense = restock.expense,
                "restock delivered"
            );
        }
        Ok(due)
    }

    /// Outstanding requests and their remaining days.
    pub fn pending(&self) -> BTreeMap<SkuId, u32> {
        self.requests
            .iter()
            .enumerate()
            .filter_map(|(i, state)| match state {
                RequestState::Pending { days_left } => Some((SkuId(i as u32), *days_left)),
                RequestState::Idle => None,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::catalog::{Catalog, CatalogEntry};
    use crate::model::sku::Sku;
    use crate::simulation::config::WarehouseConfig;

    fn fixed_lead(days: u32) -> ReplenishmentConfig {
        ReplenishmentConfig {
            batch_size: 30,
            lead_time_min: days,
            lead_time_max: days,
            seed: 7,
        }
    }

    fn catalog() -> Catalog {
        Catalog::new(vec![
            CatalogEntry::new(Sku::new("Imodium", "Capsules", 2), 250.0, 200),
            CatalogEntry::new(Sku::new("Iodomarin", "Tablets", 100), 110.0, 200),
        ])
        .unwrap()
    }

    fn numbered_catalog(n: u32) -> Catalog {
        Catalog::new(
            (1..=n)
                .map(|dosage| {
                    CatalogEntry::new(Sku::new("Paracetamol", "Tablets", dosage), 5.0, 90)
                })
                .collect(),
        )
        .unwrap()
    }

    fn warehouse() -> Warehouse {
        Warehouse::new(catalog(), &WarehouseConfig::default()).unwrap()
    }

    #[test]
    fn second_request_is_debounced() {
        let mut sched = ReplenishmentScheduler::new(&catalog(), &fixed_lead(2)).unwrap();
        assert!(sched.request_if_needed(SkuId(0)).unwrap());
        assert!(!sched.request_if_needed(SkuId(0)).unwrap());
        assert_eq!(sched.pending().len(), 1);
        assert_eq!(
            sched.state(SkuId(0)).unwrap(),
            RequestState::Pending { days_left: 2 }
        );
    }

    #[test]
    fn unknown_sku_cannot_be_requested() {
        let mut sched = ReplenishmentScheduler::new(&catalog(), &fixed_lead(1)).unwrap();
        assert!(matches!(
            sched.request_if_needed(SkuId(5)),
            Err(PharmaError::UnknownSku(_))
        ));
    }

    #[test]
    fn tick_counts_down_without_delivering() {
        let mut wh = warehouse();
        let mut sched = ReplenishmentScheduler::new(&catalog(), &fixed_lead(2)).unwrap();
        sched.request_if_needed(SkuId(1)).unwrap();

        sched.tick();
        assert!(sched.fulfill_due(&mut wh).unwrap().is_empty());
        assert_eq!(wh.total_quantity(SkuId(1)), 0);

        sched.tick();
        assert_eq!(sched.pending().get(&SkuId(1)), Some(&0));
        assert_eq!(wh.total_quantity(SkuId(1)), 0);
    }

    #[test]
    fn due_request_restocks_and_goes_idle() {
        let mut wh = warehouse();
        let mut sched = ReplenishmentScheduler::new(&catalog(), &fixed_lead(1)).unwrap();
        sched.request_if_needed(SkuId(0)).unwrap();
        sched.tick();

        let restocks = sched.fulfill_due(&mut wh).unwrap();
        assert_eq!(
            restocks,
            vec![Restock {
                sku: SkuId(0),
                quantity: 30,
                expense: 7500.0,
            }]
        );
        assert_eq!(wh.total_quantity(SkuId(0)), 30);
        assert!(!wh.needs_replenishment(SkuId(0)));
        assert_eq!(sched.state(SkuId(0)).unwrap(), RequestState::Idle);

        // Idle again, so a fresh request is accepted.
        assert!(sched.request_if_needed(SkuId(0)).unwrap());
    }

    #[test]
    fn lead_times_stay_in_range() {
        let cfg = ReplenishmentConfig {
            lead_time_min: 1,
            lead_time_max: 3,
            ..ReplenishmentConfig::default()
        };
        let mut sched = ReplenishmentScheduler::new(&numbered_catalog(50), &cfg).unwrap();
        for i in 0..50 {
            sched.request_if_needed(SkuId(i)).unwrap();
        }
        assert!(sched.pending().values().all(|d| (1..=3).contains(d)));
    }

    #[test]
    fn same_seed_same_schedule() {
        let cfg = ReplenishmentConfig::default();
        let mut a = ReplenishmentScheduler::new(&numbered_catalog(10), &cfg).unwrap();
        let mut b = ReplenishmentScheduler::new(&numbered_catalog(10), &cfg).unwrap();
        for i in 0..10 {
            a.request_if_needed(SkuId(i)).unwrap();
            b.request_if_needed(SkuId(i)).unwrap();
        }
        assert_eq!(a.pending(), b.pending());
    }

    #[test]
    fn foreign_line_fails_before_any_restock() {
        // Scheduler sized for five lines, warehouse carrying only two.
        let mut wh = warehouse();
        let mut sched = ReplenishmentScheduler::new(&numbered_catalog(5), &fixed_lead(0)).unwrap();
        assert!(sched.request_if_needed(SkuId(0)).unwrap());
        assert!(sched.request_if_needed(SkuId(3)).unwrap());

        assert!(matches!(
            sched.fulfill_due(&mut wh),
            Err(PharmaError::UnknownSku(_))
        ));
        assert_eq!(wh.total_quantity(SkuId(0)), 0);
        assert_eq!(
            sched.state(SkuId(0)).unwrap(),
            RequestState::Pending { days_left: 0 }
        );
    }
}
