//! Perishable-stock pharmacy simulation.
//!
//! Two engines do the real work:
//!
//! - [`Warehouse`]: a two-tier (regular / discounted) store of perishable
//!   units that ages stock daily, evicts what expired and discounts what is
//!   about to.
//! - [`Dispatcher`]: a least-loaded-first courier pool that hires on demand
//!   up to a ceiling and reports the orders it had to drop.
//!
//! [`ReplenishmentScheduler`] restocks low lines with a debounced, delayed
//! order, and [`PharmacySimulation`] strings everything together day by day.

pub mod error;
pub mod io;
pub mod model;
pub mod operations;
pub mod simulation;

pub use error::{PharmaError, PharmaResult};
pub use model::catalog::{Catalog, CatalogEntry};
pub use model::order::{CustomerOrder, LineOutcome, OrderLine};
pub use model::sku::{FieldSpec, Sku, SkuId, SkuMatcher, StockUnit, Tier};
pub use model::store::{ExpiringStore, Extraction, SortedStore};
pub use model::warehouse::{DayTurnover, Fulfillment, Warehouse};
pub use operations::dispatcher::Dispatcher;
pub use operations::replenishment::{ReplenishmentScheduler, RequestState, Restock};
pub use simulation::config::SimulationConfig;
pub use simulation::engine::{DayRecord, PharmacySimulation};
