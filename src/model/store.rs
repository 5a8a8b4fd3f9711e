// src/model/store.rs

use crate::error::{PharmaError, PharmaResult};
use crate::model::sku::{SkuId, StockUnit};
use std::collections::{BTreeSet, VecDeque};
use std::fmt::Debug;

/// Result of pulling stock out of a store.
///
/// A shortfall is a normal outcome: `units.len() + shortfall` always equals
/// the requested count.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Extraction {
    pub units: Vec<StockUnit>,
    pub shortfall: u32,
}

impl Extraction {
    pub fn delivered(&self) -> u32 {
        self.units.len() as u32
    }
}

/// One tier of perishable stock, keyed by SKU and ordered by remaining
/// shelf-life.
///
/// Implementations must keep the cached per-SKU quantity equal to the number
/// of units physically held for that SKU.
pub trait ExpiringStore: Debug {
    /// Creates an empty store that accepts SKUs `0..catalog_len`.
    fn for_catalog(catalog_len: usize) -> Self
    where
        Self: Sized;

    /// Adds units of `sku`. Fails with `UnknownSku` outside the catalog.
    fn add(&mut self, sku: SkuId, units: Vec<StockUnit>) -> PharmaResult<()>;

    /// Removes up to `count` units of `sku`, smallest shelf-life first.
    fn extract_oldest(&mut self, sku: SkuId, count: u32) -> PharmaResult<Extraction>;

    /// Decrements the shelf-life of every held unit by one.
    fn age_one_day(&mut self);

    /// Drops every unit with shelf-life <= 0 and returns how many went.
    fn evict_expired(&mut self) -> u32;

    /// Removes every unit with shelf-life strictly below `threshold`,
    /// returned in ascending shelf-life order.
    fn take_below(&mut self, threshold: i32) -> Vec<StockUnit>;

    fn quantity(&self, sku: SkuId) -> u32;

    /// The unit of `sku` that would be extracted next.
    fn oldest(&self, sku: SkuId) -> Option<&StockUnit>;

    /// SKUs with at least one unit in stock.
    fn available(&self) -> BTreeSet<SkuId>;

    /// Verifies the quantity index, lane ordering and SKU filing.
    fn check_invariants(&self) -> PharmaResult<()>;
}

/// The ordered store: one lane per SKU, each lane sorted by ascending
/// shelf-life with insertion order kept among equal shelf-lives.
#[derive(Debug, Clone)]
pub struct SortedStore {
    lanes: Vec<VecDeque<StockUnit>>,
    quantity: Vec<u32>,
}

impl SortedStore {
    fn lane_mut(&mut self, sku: SkuId) -> PharmaResult<&mut VecDeque<StockUnit>> {
        self.lanes
            .get_mut(sku.index())
            .ok_or_else(|| PharmaError::UnknownSku(sku.to_string()))
    }

    /// Total units held across all SKUs.
    pub fn len(&self) -> u32 {
        self.quantity.iter().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Shelf-lives held for one SKU, oldest first.
    pub fn shelf_lives(&self, sku: SkuId) -> Vec<i32> {
        self.lanes
            .get(sku.index())
            .map(|lane| lane.iter().map(|u| u.shelf_life).collect())
            .unwrap_or_default()
    }

    /// Every held unit, globally sorted by ascending shelf-life.
    pub fn sorted_view(&self) -> Vec<&StockUnit> {
        let mut all: Vec<&StockUnit> = self.lanes.iter().flatten().collect();
        all.sort_by_key(|u| u.shelf_life);
        all
    }
}

impl ExpiringStore for SortedStore {
    fn for_catalog(catalog_len: usize) -> Self {
        Self {
            lanes: vec![VecDeque::new(); catalog_len],
            quantity: vec![0; catalog_len],
        }
    }

    fn add(&mut self, sku: SkuId, units: Vec<StockUnit>) -> PharmaResult<()> {
        if let Some(stray) = units.iter().find(|u| u.sku != sku) {
            return Err(PharmaError::InvariantViolation(format!(
                "unit of {} filed under {}",
                stray.sku, sku
            )));
        }
        let added = units.len() as u32;
        let lane = self.lane_mut(sku)?;
        lane.extend(units);
        // Stable: units already held stay ahead of new ones with equal shelf-life.
        lane.make_contiguous().sort_by_key(|u| u.shelf_life);
        self.quantity[sku.index()] += added;
        Ok(())
    }

    fn extract_oldest(&mut self, sku: SkuId, count: u32) -> PharmaResult<Extraction> {
        let lane = self.lane_mut(sku)?;
        let take = lane.len().min(count as usize);
        let units: Vec<StockUnit> = lane.drain(..take).collect();
        self.quantity[sku.index()] -= take as u32;
        Ok(Extraction {
            shortfall: count - take as u32,
            units,
        })
    }

    fn age_one_day(&mut self) {
        for unit in self.lanes.iter_mut().flatten() {
            unit.shelf_life -= 1;
        }
    }

    fn evict_expired(&mut self) -> u32 {
        let mut evicted = 0;
        for (i, lane) in self.lanes.iter_mut().enumerate() {
            let dead = lane.partition_point(|u| u.is_expired());
            if dead > 0 {
                lane.drain(..dead);
                self.quantity[i] -= dead as u32;
                evicted += dead as u32;
                tracing::debug!(sku = i, dead, "evicted expired units");
            }
        }
        evicted
    }

    fn take_below(&mut self, threshold: i32) -> Vec<StockUnit> {
        let mut taken = Vec::new();
        for (i, lane) in self.lanes.iter_mut().enumerate() {
            let cut = lane.partition_point(|u| u.shelf_life < threshold);
            if cut > 0 {
                taken.extend(lane.drain(..cut));
                self.quantity[i] -= cut as u32;
            }
        }
        taken.sort_by_key(|u| u.shelf_life);
        taken
    }

    fn quantity(&self, sku: SkuId) -> u32 {
        self.quantity.get(sku.index()).copied().unwrap_or(0)
    }

    fn oldest(&self, sku: SkuId) -> Option<&StockUnit> {
        self.lanes.get(sku.index()).and_then(|lane| lane.front())
    }

    fn available(&self) -> BTreeSet<SkuId> {
        self.quantity
            .iter()
            .enumerate()
            .filter(|(_, q)| **q > 0)
            .map(|(i, _)| SkuId(i as u32))
            .collect()
    }

    fn check_invariants(&self) -> PharmaResult<()> {
        for (i, lane) in self.lanes.iter().enumerate() {
            let sku = SkuId(i as u32);
            if lane.len() as u32 != self.quantity[i] {
                return Err(PharmaError::InvariantViolation(format!(
                    "{sku}: quantity index says {} but {} units are held",
                    self.quantity[i],
                    lane.len()
                )));
            }
            if let Some(u) = lane.iter().find(|u| u.sku != sku) {
                return Err(PharmaError::InvariantViolation(format!(
                    "unit of {} found in lane {sku}",
                    u.sku
                )));
            }
            if let Some(u) = lane.iter().find(|u| u.is_expired()) {
                return Err(PharmaError::InvariantViolation(format!(
                    "{sku}: unit with shelf-life {} survived eviction",
                    u.shelf_life
                )));
            }
            if lane
                .iter()
                .zip(lane.iter().skip(1))
                .any(|(a, b)| a.shelf_life > b.shelf_life)
            {
                return Err(PharmaError::InvariantViolation(format!(
                    "{sku}: lane is out of shelf-life order"
                )));
            }
        }
        Ok(())
    }
}
