// src/model/catalog.rs

use crate::error::{PharmaError, PharmaResult};
use crate::model::sku::{Sku, SkuId, SkuMatcher};
use std::collections::HashMap;

/// Static data for one catalog line.
#[derive(Debug, Clone)]
pub struct CatalogEntry {
    pub sku: Sku,
    /// Purchase price of one unit, used to cost restocks.
    pub unit_cost: f64,
    /// Shelf-life a freshly produced unit starts with.
    pub shelf_life: i32,
}

impl CatalogEntry {
    pub fn new(sku: Sku, unit_cost: f64, shelf_life: i32) -> Self {
        Self {
            sku,
            unit_cost,
            shelf_life,
        }
    }
}

/// The fixed set of SKUs a warehouse may hold, with their cost and
/// shelf-life lookups. Immutable after construction.
#[derive(Debug, Clone)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
    index: HashMap<Sku, SkuId>,
}

impl Catalog {
    pub fn new(entries: Vec<CatalogEntry>) -> PharmaResult<Self> {
        let mut index = HashMap::with_capacity(entries.len());
        for (i, entry) in entries.iter().enumerate() {
            if entry.shelf_life <= 0 {
                return Err(PharmaError::Config(format!(
                    "{} has non-positive shelf-life {}",
                    entry.sku, entry.shelf_life
                )));
            }
            if entry.unit_cost.is_nan() || entry.unit_cost < 0.0 {
                return Err(PharmaError::Config(format!(
                    "{} has invalid unit cost {}",
                    entry.sku, entry.unit_cost
                )));
            }
            if index.insert(entry.sku.clone(), SkuId(i as u32)).is_some() {
                return Err(PharmaError::Config(format!(
                    "{} listed twice in catalog",
                    entry.sku
                )));
            }
        }
        Ok(Self { entries, index })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = SkuId> + '_ {
        (0..self.entries.len()).map(|i| SkuId(i as u32))
    }

    pub fn id_of(&self, sku: &Sku) -> PharmaResult<SkuId> {
        self.index
            .get(sku)
            .copied()
            .ok_or_else(|| PharmaError::UnknownSku(sku.to_string()))
    }

    pub fn entry(&self, id: SkuId) -> PharmaResult<&CatalogEntry> {
        self.entries
            .get(id.index())
            .ok_or_else(|| PharmaError::UnknownSku(id.to_string()))
    }

    /// Every catalog line the matcher accepts, in catalog order.
    pub fn matching<'a>(&'a self, matcher: &'a SkuMatcher) -> impl Iterator<Item = SkuId> + 'a {
        self.entries
            .iter()
            .enumerate()
            .filter(move |(_, e)| matcher.matches(&e.sku))
            .map(|(i, _)| SkuId(i as u32))
    }
}
