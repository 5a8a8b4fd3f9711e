//! Day-loop driver behaviour.

use pharmacy_sim::io::orders::{ConstantOrders, OrderSource, ScheduledOrders};
use pharmacy_sim::io::reporting::write_day_log;
use pharmacy_sim::simulation::config::{DispatchConfig, ReplenishmentConfig};
use pharmacy_sim::{
    Catalog, CatalogEntry, CustomerOrder, OrderLine, PharmaError, PharmacySimulation,
    RequestState, SimulationConfig, Sku, SkuId, SkuMatcher, Tier, Warehouse,
};

fn catalog() -> Catalog {
    Catalog::new(vec![
        CatalogEntry::new(Sku::new("Voltaren", "Gel", 50), 400.0, 200),
        CatalogEntry::new(Sku::new("Rinostop", "Spray", 10), 120.0, 200),
    ])
    .unwrap()
}

fn voltaren(qty: u32) -> CustomerOrder {
    CustomerOrder::new(
        0,
        Tier::Regular,
        vec![OrderLine::new(SkuMatcher::by_name("Voltaren"), qty)],
    )
}

fn config(days: u32) -> SimulationConfig {
    SimulationConfig {
        total_days: days,
        initial_stock: 10,
        replenishment: ReplenishmentConfig {
            batch_size: 30,
            lead_time_min: 1,
            lead_time_max: 1,
            seed: 3,
        },
        ..SimulationConfig::default()
    }
}

#[test]
fn run_records_every_day() {
    let orders = Box::new(ConstantOrders::new(vec![voltaren(2)]));
    let mut sim = PharmacySimulation::new(config(12), catalog(), orders).unwrap();
    sim.run().unwrap();

    assert_eq!(sim.history.len(), 12);
    assert_eq!(sim.current_day, 13);
    assert!(sim.history.iter().enumerate().all(|(i, r)| r.day == i as u32 + 1));
    assert!(sim.history.iter().all(|r| r.orders == 1 && r.units_requested == 2));
}

#[test]
fn low_stock_triggers_a_costed_restock() {
    // 10 units, 2 sold per day: below 5 after day 3.
    let orders = Box::new(ConstantOrders::new(vec![voltaren(2)]));
    let mut sim = PharmacySimulation::new(config(6), catalog(), orders).unwrap();

    for _ in 0..3 {
        sim.step().unwrap();
    }
    let voltaren_id = SkuId(0);
    assert_eq!(sim.warehouse.total_quantity(voltaren_id), 4);
    assert_eq!(
        sim.scheduler.state(voltaren_id).unwrap(),
        RequestState::Pending { days_left: 1 }
    );

    // Ticked at the end of day 4, delivered the morning of day 5.
    let day4 = sim.step().unwrap();
    assert_eq!(day4.restocked_units, 0);
    let day5 = sim.step().unwrap();
    assert_eq!(day5.restocked_units, 30);
    assert_eq!(day5.expenses, 400.0 * 30.0);
    assert_eq!(sim.warehouse.total_quantity(voltaren_id), 2 + 30 - 2);
}

#[test]
fn shortfall_is_reported_not_raised() {
    let orders = Box::new(ConstantOrders::new(vec![voltaren(25)]));
    let mut sim = PharmacySimulation::new(config(1), catalog(), orders).unwrap();
    let day = sim.step().unwrap();
    assert_eq!(day.units_delivered, 10);
    assert_eq!(day.units_short, 15);
    assert!(sim.fill_rate() < 0.5);
}

#[test]
fn courier_overload_shows_in_the_record() {
    let cfg = SimulationConfig {
        dispatch: DispatchConfig {
            min_couriers: 1,
            max_couriers: 2,
            orders_per_courier: 3,
        },
        ..config(2)
    };
    let batch = (0..8).map(|_| voltaren(1)).collect();
    let mut sim =
        PharmacySimulation::new(cfg, catalog(), Box::new(ConstantOrders::new(batch))).unwrap();

    let day1 = sim.step().unwrap();
    assert_eq!(day1.couriers, 2);
    assert_eq!(day1.overloaded, 2);
    assert_eq!(sim.dispatcher.overload_today(), 0);

    sim.step().unwrap();
    assert_eq!(sim.total_overloaded(), 4);
    assert_eq!(sim.dispatcher.pool_size(), 2);
}

/// Numbers its orders itself; day 2 asks for a line the catalog lacks.
#[derive(Debug, Default)]
struct BadDayTwo {
    last_id: u64,
}

impl OrderSource for BadDayTwo {
    fn orders_for_day(&mut self, day: u32, _warehouse: &Warehouse) -> Vec<CustomerOrder> {
        self.last_id += 1;
        let name = if day == 2 { "Aspirin" } else { "Voltaren" };
        vec![CustomerOrder::new(
            self.last_id,
            Tier::Regular,
            vec![OrderLine::new(SkuMatcher::by_name(name), 1)],
        )]
    }
}

#[test]
fn failed_day_rolls_back() {
    let cfg = SimulationConfig {
        initial_stock: 3,
        ..config(3)
    };
    let mut sim =
        PharmacySimulation::new(cfg, catalog(), Box::new(BadDayTwo::default())).unwrap();

    // Day 1: both lines start below the minimum and are requested at
    // construction; they are ticked at the end of day 1.
    sim.step().unwrap();
    let before = sim.warehouse.quantities().to_vec();
    let pending_before = sim.scheduler.pending();
    assert!(pending_before.values().all(|&d| d == 0));

    // Day 2 would restock in the morning, then hits an unknown SKU.
    let err = sim.step().unwrap_err();
    assert!(matches!(err, PharmaError::UnknownSku(_)));
    assert!(err.to_string().ends_with("(order 2)"));
    assert_eq!(sim.warehouse.quantities(), before.as_slice());
    assert_eq!(sim.scheduler.pending(), pending_before);
    assert_eq!(sim.current_day, 2);
    assert_eq!(sim.history.len(), 1);

    // The retry replays the same batch; the source is not asked again.
    let again = sim.step().unwrap_err();
    assert!(again.to_string().ends_with("(order 2)"));
    assert_eq!(sim.warehouse.quantities(), before.as_slice());
    assert_eq!(sim.current_day, 2);
}

#[test]
fn quiet_days_still_age_stock() {
    let catalog = Catalog::new(vec![CatalogEntry::new(
        Sku::new("Ambroxol", "Syrup", 30),
        150.0,
        33,
    )])
    .unwrap();
    let cfg = SimulationConfig {
        initial_stock: 6,
        ..config(3)
    };
    let mut sim =
        PharmacySimulation::new(cfg, catalog, Box::new(ScheduledOrders::default())).unwrap();
    sim.run().unwrap();

    let promoted: u32 = sim.history.iter().map(|r| r.promoted).sum();
    assert_eq!(promoted, 6);
    assert_eq!(sim.warehouse.tier_quantity(SkuId(0), Tier::Discounted), 6);
    assert_eq!(sim.total_expenses(), 0.0);
}

#[test]
fn history_exports_to_csv() {
    let orders = Box::new(ConstantOrders::new(vec![voltaren(1)]));
    let mut sim = PharmacySimulation::new(config(4), catalog(), orders).unwrap();
    sim.run().unwrap();

    let path = std::env::temp_dir().join(format!("pharmacy-sim-{}.csv", std::process::id()));
    write_day_log(&path, &sim.history).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    let _ = std::fs::remove_file(&path);
    let mut lines = text.lines();
    assert!(lines.next().unwrap().starts_with("day,orders,units_requested"));
    assert_eq!(lines.count(), 4);
}

#[test]
fn invalid_config_is_rejected() {
    let cfg = SimulationConfig {
        dispatch: DispatchConfig {
            min_couriers: 5,
            max_couriers: 2,
            orders_per_courier: 10,
        },
        ..config(1)
    };
    let result = PharmacySimulation::new(cfg, catalog(), Box::new(ScheduledOrders::default()));
    assert!(matches!(result, Err(PharmaError::Config(_))));
}
