// src/model/warehouse.rs

use crate::error::{PharmaError, PharmaResult};
use crate::model::catalog::Catalog;
use crate::model::order::{CustomerOrder, LineOutcome};
use crate::model::sku::{Sku, SkuId, SkuMatcher, StockUnit, Tier};
use crate::model::store::{ExpiringStore, Extraction, SortedStore};
use crate::simulation::config::WarehouseConfig;
use std::collections::{BTreeMap, BTreeSet};

/// Outcome of one `extract` call: which catalog line served it and what came out.
#[derive(Debug, Clone, PartialEq)]
pub struct Fulfillment {
    pub sku: SkuId,
    pub extraction: Extraction,
}

/// Stock movements caused by one `advance_day`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DayTurnover {
    /// Units lost to expiry, both tiers.
    pub evicted: u32,
    /// Units moved from the regular to the discounted tier.
    pub promoted: u32,
}

/// The perishable inventory: a regular tier and a discounted tier over one
/// fixed catalog, plus per-SKU totals and restock flags.
#[derive(Debug, Clone)]
pub struct Warehouse<S: ExpiringStore = SortedStore> {
    catalog: Catalog,
    regular: S,
    discounted: S,
    min_instances: u32,
    discount_threshold: i32,
    totals: Vec<u32>,
    needs_restock: Vec<bool>,
    day: u32,
}

impl<S: ExpiringStore> Warehouse<S> {
    pub fn new(catalog: Catalog, config: &WarehouseConfig) -> PharmaResult<Self> {
        config.validate()?;
        let n = catalog.len();
        let mut warehouse = Self {
            regular: S::for_catalog(n),
            discounted: S::for_catalog(n),
            catalog,
            min_instances: config.min_instances,
            discount_threshold: config.discount_threshold,
            totals: vec![0; n],
            needs_restock: vec![false; n],
            day: 1,
        };
        warehouse.refresh_all();
        Ok(warehouse)
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Current simulated day; stamped on newly produced units.
    pub fn day(&self) -> u32 {
        self.day
    }

    pub fn store(&self, tier: Tier) -> &S {
        match tier {
            Tier::Regular => &self.regular,
            Tier::Discounted => &self.discounted,
        }
    }

    fn store_mut(&mut self, tier: Tier) -> &mut S {
        match tier {
            Tier::Regular => &mut self.regular,
            Tier::Discounted => &mut self.discounted,
        }
    }

    /// Adds `quantity` fresh units of `sku` to the regular tier.
    pub fn add_regular(&mut self, sku: &Sku, quantity: u32) -> PharmaResult<SkuId> {
        let id = self.catalog.id_of(sku)?;
        self.restock(id, quantity)?;
        Ok(id)
    }

    /// Same as [`add_regular`](Self::add_regular), addressed by catalog id.
    pub fn restock(&mut self, id: SkuId, quantity: u32) -> PharmaResult<()> {
        let units = self.produce(id, quantity)?;
        self.regular.add(id, units)?;
        self.refresh(id);
        Ok(())
    }

    fn produce(&self, id: SkuId, quantity: u32) -> PharmaResult<Vec<StockUnit>> {
        let shelf_life = self.catalog.entry(id)?.shelf_life;
        Ok((0..quantity)
            .map(|_| StockUnit::new(id, shelf_life, self.day))
            .collect())
    }

    /// Picks the catalog line a (possibly partial) matcher refers to.
    ///
    /// Among matching lines with stock in `tier`, the one with the smallest
    /// total quantity wins (ties: lowest id). With no stock anywhere the
    /// lowest matching id is returned and the caller sees a full shortfall.
    fn resolve_matcher(&self, matcher: &SkuMatcher, tier: Tier) -> PharmaResult<SkuId> {
        let store = self.store(tier);
        let mut first = None;
        let mut best: Option<SkuId> = None;
        for id in self.catalog.matching(matcher) {
            first.get_or_insert(id);
            if store.quantity(id) == 0 {
                continue;
            }
            match best {
                Some(b) if self.totals[b.index()] <= self.totals[id.index()] => {}
                _ => best = Some(id),
            }
        }
        best.or(first)
            .ok_or_else(|| PharmaError::UnknownSku(matcher.to_string()))
    }

    /// Takes up to `quantity` units matching `matcher` from `tier`, oldest first.
    pub fn extract(
        &mut self,
        matcher: &SkuMatcher,
        quantity: u32,
        tier: Tier,
    ) -> PharmaResult<Fulfillment> {
        let sku = self.resolve_matcher(matcher, tier)?;
        let extraction = self.store_mut(tier).extract_oldest(sku, quantity)?;
        self.refresh(sku);
        Ok(Fulfillment { sku, extraction })
    }

    /// Serves a batch of customer orders line by line.
    ///
    /// Every line is checked against the catalog before anything is taken,
    /// so a batch with an unknown SKU leaves the stock untouched.
    pub fn resolve(&mut self, orders: &[CustomerOrder]) -> PharmaResult<Vec<LineOutcome>> {
        for order in orders {
            for line in &order.lines {
                if self.catalog.matching(&line.matcher).next().is_none() {
                    return Err(PharmaError::UnknownSku(format!(
                        "{} (order {})",
                        line.matcher, order.id
                    )));
                }
            }
        }

        let mut outcomes = Vec::new();
        for order in orders {
            for line in &order.lines {
                let served = self.extract(&line.matcher, line.quantity, order.tier)?;
                outcomes.push(LineOutcome {
                    order_id: order.id,
                    sku: served.sku,
                    tier: order.tier,
                    requested: line.quantity,
                    delivered: served.extraction.delivered(),
                    shortfall: served.extraction.shortfall,
                });
            }
        }
        Ok(outcomes)
    }

    /// Runs the end-of-day cycle: age, evict, promote, recount.
    pub fn advance_day(&mut self) -> PharmaResult<DayTurnover> {
        self.regular.age_one_day();
        self.discounted.age_one_day();

        let evicted = self.regular.evict_expired() + self.discounted.evict_expired();

        let mut by_sku: BTreeMap<SkuId, Vec<StockUnit>> = BTreeMap::new();
        for unit in self.regular.take_below(self.discount_threshold) {
            by_sku.entry(unit.sku).or_default().push(unit);
        }
        let mut promoted = 0;
        for (sku, units) in by_sku {
            promoted += units.len() as u32;
            self.discounted.add(sku, units)?;
        }

        self.refresh_all();
        self.check_invariants()?;
        self.day += 1;

        tracing::debug!(day = self.day, evicted, promoted, "warehouse advanced");
        Ok(DayTurnover { evicted, promoted })
    }

    fn check_invariants(&self) -> PharmaResult<()> {
        self.regular.check_invariants()?;
        self.discounted.check_invariants()?;
        for id in self.catalog.ids() {
            if let Some(unit) = self.regular.oldest(id) {
                if unit.shelf_life < self.discount_threshold {
                    return Err(PharmaError::InvariantViolation(format!(
                        "{id}: regular unit with shelf-life {} escaped promotion",
                        unit.shelf_life
                    )));
                }
            }
        }
        Ok(())
    }

    fn refresh(&mut self, id: SkuId) {
        let total = self.regular.quantity(id) + self.discounted.quantity(id);
        self.totals[id.index()] = total;
        self.needs_restock[id.index()] = total < self.min_instances;
    }

    fn refresh_all(&mut self) {
        for i in 0..self.totals.len() {
            self.refresh(SkuId(i as u32));
        }
    }

    /// SKUs whose total stock is below the minimum, in catalog order.
    pub fn required_replenishments(&self) -> Vec<SkuId> {
        self.needs_restock
            .iter()
            .enumerate()
            .filter(|(_, flagged)| **flagged)
            .map(|(i, _)| SkuId(i as u32))
            .collect()
    }

    pub fn needs_replenishment(&self, id: SkuId) -> bool {
        self.needs_restock.get(id.index()).copied().unwrap_or(false)
    }

    /// Units of `id` across both tiers.
    pub fn total_quantity(&self, id: SkuId) -> u32 {
        self.totals.get(id.index()).copied().unwrap_or(0)
    }

    pub fn tier_quantity(&self, id: SkuId, tier: Tier) -> u32 {
        self.store(tier).quantity(id)
    }

    /// Per-SKU totals, indexed by `SkuId`.
    pub fn quantities(&self) -> &[u32] {
        &self.totals
    }

    pub fn stock_on_hand(&self) -> u32 {
        self.totals.iter().sum()
    }

    /// SKUs with stock in `tier`.
    pub fn available(&self, tier: Tier) -> BTreeSet<SkuId> {
        self.store(tier).available()
    }
}
