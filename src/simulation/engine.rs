// src/simulation/engine.rs

use crate::error::PharmaResult;
use crate::io::orders::OrderSource;
use crate::model::catalog::Catalog;
use crate::model::order::CustomerOrder;
use crate::model::warehouse::Warehouse;
use crate::operations::dispatcher::Dispatcher;
use crate::operations::replenishment::ReplenishmentScheduler;
use crate::simulation::config::SimulationConfig;
use serde::Serialize;

// Serialize so the history can go straight to CSV
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayRecord {
    pub day: u32,
    pub orders: u32,
    pub units_requested: u32,
    pub units_delivered: u32,
    pub units_short: u32,
    pub evicted: u32,
    pub promoted: u32,
    pub restocked_units: u32,
    pub expenses: f64,
    pub pending_requests: u32,
    pub couriers: u32,
    pub overloaded: u32,
    pub stock_on_hand: u32,
}

/// Runs the pharmacy one day at a time.
///
/// Each `step` is all-or-nothing: if any phase fails, the warehouse,
/// scheduler and dispatcher are put back exactly as they were at dawn, and
/// the day's order batch is kept so a retry replays the same orders instead
/// of drawing a fresh batch from the source.
pub struct PharmacySimulation {
    config: SimulationConfig,

    pub warehouse: Warehouse,
    pub scheduler: ReplenishmentScheduler,
    pub dispatcher: Dispatcher,

    orders: Box<dyn OrderSource>,
    // Batch of a day that was rolled back
    carried: Option<Vec<CustomerOrder>>,

    pub current_day: u32,
    pub history: Vec<DayRecord>,
}

impl PharmacySimulation {
    pub fn new(
        config: SimulationConfig,
        catalog: Catalog,
        orders: Box<dyn OrderSource>,
    ) -> PharmaResult<Self> {
        config.validate()?;

        let mut warehouse: Warehouse = Warehouse::new(catalog, &config.warehouse)?;
        let ids: Vec<_> = warehouse.catalog().ids().collect();
        for id in ids {
            warehouse.restock(id, config.initial_stock)?;
        }

        let mut scheduler = ReplenishmentScheduler::new(warehouse.catalog(), &config.replenishment)?;
        for sku in warehouse.required_replenishments() {
            scheduler.request_if_needed(sku)?;
        }

        let dispatcher = Dispatcher::new(&config.dispatch)?;

        Ok(Self {
            config,
            warehouse,
            scheduler,
            dispatcher,
            orders,
            carried: None,
            current_day: 1, // Day 1 is the first trading day
            history: Vec::new(),
        })
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn run(&mut self) -> PharmaResult<()> {
        while self.current_day <= self.config.total_days {
            self.step()?;
        }
        Ok(())
    }

    /// Simulates one full day and appends its record to the history.
    ///
    /// The order source is asked for the day's batch at dawn, before the
    /// morning deliveries land.
    pub fn step(&mut self) -> PharmaResult<DayRecord> {
        let orders = match self.carried.take() {
            Some(batch) => batch,
            None => self.orders.orders_for_day(self.current_day, &self.warehouse),
        };
        let dawn = (
            self.warehouse.clone(),
            self.scheduler.clone(),
            self.dispatcher.clone(),
        );

        match self.run_day(&orders) {
            Ok(record) => {
                if record.day % 5 == 0 {
                    tracing::info!(
                        day = record.day,
                        delivered = record.units_delivered,
                        short = record.units_short,
                        stock = record.stock_on_hand,
                        couriers = record.couriers,
                        "day closed"
                    );
                }
                self.history.push(record.clone());
                self.current_day += 1;
                Ok(record)
            }
            Err(err) => {
                (self.warehouse, self.scheduler, self.dispatcher) = dawn;
                self.carried = Some(orders);
                tracing::error!(day = self.current_day, %err, "day aborted, state rolled back");
                Err(err)
            }
        }
    }

    fn run_day(&mut self, orders: &[CustomerOrder]) -> PharmaResult<DayRecord> {
        let day = self.current_day;

        // =================================================================
        // PHASE 1: MORNING (Deliveries)
        // Restocks whose lead time ran out overnight land on the shelves.
        // =================================================================
        let restocks = self.scheduler.fulfill_due(&mut self.warehouse)?;

        // =================================================================
        // PHASE 2: DAY (Orders)
        // Pull the stock for today's orders, hand the orders to couriers.
        // =================================================================
        let outcomes = self.warehouse.resolve(orders)?;
        let overloaded = self.dispatcher.assign(orders);
        let couriers = self.dispatcher.pool_size() as u32;

        // =================================================================
        // PHASE 3: EVENING (Aging)
        // Shelves age, expired stock goes, near-expiry stock is discounted.
        // =================================================================
        let turnover = self.warehouse.advance_day()?;
        self.dispatcher.end_day();

        // =================================================================
        // PHASE 4: NIGHT (Replenishment)
        // =================================================================
        self.scheduler.tick();
        for sku in self.warehouse.required_replenishments() {
            self.scheduler.request_if_needed(sku)?;
        }

        Ok(DayRecord {
            day,
            orders: orders.len() as u32,
            units_requested: orders.iter().map(CustomerOrder::units_requested).sum(),
            units_delivered: outcomes.iter().map(|o| o.delivered).sum(),
            units_short: outcomes.iter().map(|o| o.shortfall).sum(),
            evicted: turnover.evicted,
            promoted: turnover.promoted,
            restocked_units: restocks.iter().map(|r| r.quantity).sum(),
            expenses: restocks.iter().map(|r| r.expense).sum(),
            pending_requests: self.scheduler.pending().len() as u32,
            couriers,
            overloaded,
            stock_on_hand: self.warehouse.stock_on_hand(),
        })
    }

    /// Restock spending over the whole run.
    pub fn total_expenses(&self) -> f64 {
        self.history.iter().map(|r| r.expenses).sum()
    }

    /// Orders dropped by the courier pool over the whole run.
    pub fn total_overloaded(&self) -> u32 {
        self.history.iter().map(|r| r.overloaded).sum()
    }

    pub fn total_evicted(&self) -> u32 {
        self.history.iter().map(|r| r.evicted).sum()
    }

    /// Share of requested units actually delivered (1.0 with no demand).
    pub fn fill_rate(&self) -> f64 {
        let requested: u32 = self.history.iter().map(|r| r.units_requested).sum();
        if requested == 0 {
            return 1.0;
        }
        let delivered: u32 = self.history.iter().map(|r| r.units_delivered).sum();
        delivered as f64 / requested as f64
    }
}
