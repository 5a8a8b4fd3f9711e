// src/model/order.rs

use crate::model::sku::{SkuId, SkuMatcher, Tier};
use serde::Serialize;

/// One requested item of a customer order.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderLine {
    pub matcher: SkuMatcher,
    pub quantity: u32,
}

impl OrderLine {
    pub fn new(matcher: SkuMatcher, quantity: u32) -> Self {
        Self { matcher, quantity }
    }
}

/// A customer order. Every line is served from the same tier.
#[derive(Debug, Clone, PartialEq)]
pub struct CustomerOrder {
    pub id: u64,
    pub tier: Tier,
    pub lines: Vec<OrderLine>,
}

impl CustomerOrder {
    pub fn new(id: u64, tier: Tier, lines: Vec<OrderLine>) -> Self {
        Self { id, tier, lines }
    }

    pub fn units_requested(&self) -> u32 {
        self.lines.iter().map(|l| l.quantity).sum()
    }
}

/// What the warehouse did with one order line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineOutcome {
    pub order_id: u64,
    pub sku: SkuId,
    pub tier: Tier,
    pub requested: u32,
    pub delivered: u32,
    pub shortfall: u32,
}
