// src/io/orders.rs

use crate::error::{PharmaError, PharmaResult};
use crate::model::order::{CustomerOrder, OrderLine};
use crate::model::sku::{SkuMatcher, Tier};
use crate::model::warehouse::Warehouse;
use std::fmt::Debug;

/// Supplies each simulated day's batch of customer orders.
///
/// The warehouse is visible read-only so a source can tailor its batch to
/// what is actually on the shelves.
pub trait OrderSource: Debug {
    fn orders_for_day(&mut self, day: u32, warehouse: &Warehouse) -> Vec<CustomerOrder>;
}

/// The same batch every day. Order ids are rewritten so they stay unique
/// across days.
#[derive(Debug, Clone)]
pub struct ConstantOrders {
    batch: Vec<CustomerOrder>,
    next_id: u64,
}

impl ConstantOrders {
    pub fn new(batch: Vec<CustomerOrder>) -> Self {
        Self { batch, next_id: 1 }
    }
}

impl OrderSource for ConstantOrders {
    fn orders_for_day(&mut self, _day: u32, _warehouse: &Warehouse) -> Vec<CustomerOrder> {
        self.batch
            .iter()
            .map(|order| {
                let mut order = order.clone();
                order.id = self.next_id;
                self.next_id += 1;
                order
            })
            .collect()
    }
}

/// A fixed day-by-day plan: `days[0]` is day 1. Days past the end get no
/// orders.
#[derive(Debug, Clone, Default)]
pub struct ScheduledOrders {
    days: Vec<Vec<CustomerOrder>>,
}

impl ScheduledOrders {
    pub fn new(days: Vec<Vec<CustomerOrder>>) -> Self {
        Self { days }
    }
}

impl OrderSource for ScheduledOrders {
    fn orders_for_day(&mut self, day: u32, _warehouse: &Warehouse) -> Vec<CustomerOrder> {
        day.checked_sub(1)
            .and_then(|i| self.days.get(i as usize))
            .cloned()
            .unwrap_or_default()
    }
}

/// One standing item of a regular customer: `quantity` of `matcher` on
/// every day divisible by `period`.
#[derive(Debug, Clone, PartialEq)]
pub struct Subscription {
    pub matcher: SkuMatcher,
    pub quantity: u32,
    pub period: u32,
}

impl Subscription {
    pub fn new(matcher: SkuMatcher, quantity: u32, period: u32) -> Self {
        Self {
            matcher,
            quantity,
            period,
        }
    }

    fn is_due(&self, day: u32) -> bool {
        day % self.period == 0
    }
}

/// Regular customers' recurring orders on top of another source.
///
/// On each day a customer gets one order holding every subscription that is
/// due, always served from the regular tier. Customers with nothing due
/// place no order. The whole day's batch (base orders first) is renumbered
/// so ids stay unique across both sources.
#[derive(Debug)]
pub struct PeriodicOrders {
    base: Box<dyn OrderSource>,
    customers: Vec<Vec<Subscription>>,
    next_id: u64,
}

impl PeriodicOrders {
    pub fn new(
        base: Box<dyn OrderSource>,
        customers: Vec<Vec<Subscription>>,
    ) -> PharmaResult<Self> {
        for (i, subscriptions) in customers.iter().enumerate() {
            if let Some(sub) = subscriptions.iter().find(|s| s.period == 0) {
                return Err(PharmaError::Config(format!(
                    "regular customer {i}: {} has a zero-day period",
                    sub.matcher
                )));
            }
        }
        Ok(Self {
            base,
            customers,
            next_id: 1,
        })
    }
}

impl OrderSource for PeriodicOrders {
    fn orders_for_day(&mut self, day: u32, warehouse: &Warehouse) -> Vec<CustomerOrder> {
        let mut batch = self.base.orders_for_day(day, warehouse);

        for subscriptions in &self.customers {
            let lines: Vec<OrderLine> = subscriptions
                .iter()
                .filter(|s| s.is_due(day))
                .map(|s| OrderLine::new(s.matcher.clone(), s.quantity))
                .collect();
            if !lines.is_empty() {
                batch.push(CustomerOrder::new(0, Tier::Regular, lines));
            }
        }

        for order in &mut batch {
            order.id = self.next_id;
            self.next_id += 1;
        }
        batch
    }
}
