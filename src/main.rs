use pharmacy_sim::io::logging;
use pharmacy_sim::io::orders::{ConstantOrders, PeriodicOrders, Subscription};
use pharmacy_sim::io::reporting;
use pharmacy_sim::{
    Catalog, CatalogEntry, CustomerOrder, OrderLine, PharmacySimulation, PharmaResult,
    SimulationConfig, Sku, SkuMatcher, Tier,
};

fn main() {
    logging::init_logger();
    println!("=== Pharmacy Warehouse Simulation ===");

    if let Err(e) = run() {
        eprintln!("Simulation failed: {}", e);
        std::process::exit(1);
    }

    println!("\nSimulation Complete.");
}

fn run() -> PharmaResult<()> {
    // 1. SETUP CONFIGURATION
    let config = SimulationConfig::default();

    // 2. CATALOG
    // Short-lived lines reach the discount threshold within the run.
    let catalog = Catalog::new(vec![
        CatalogEntry::new(Sku::new("Omeprazole", "Capsules", 20), 180.0, 60),
        CatalogEntry::new(Sku::new("Omeprazole", "Tablets", 40), 240.0, 120),
        CatalogEntry::new(Sku::new("Diclofenac", "Ointment", 50), 95.0, 45),
        CatalogEntry::new(Sku::new("Cetirizine", "Drops", 10), 310.0, 90),
        CatalogEntry::new(Sku::new("Ambroxol", "Syrup", 30), 150.0, 35),
    ])?;

    // 3. DAILY ORDER BATCH
    // Partial matchers leave the choice of form or dosage to the warehouse.
    let batch = vec![
        CustomerOrder::new(
            0,
            Tier::Regular,
            vec![
                OrderLine::new(SkuMatcher::by_name("Omeprazole"), 2),
                OrderLine::new(SkuMatcher::by_name("Cetirizine").with_form("Drops"), 1),
            ],
        ),
        CustomerOrder::new(
            0,
            Tier::Discounted,
            vec![OrderLine::new(SkuMatcher::by_name("Ambroxol").with_dosage(30), 3)],
        ),
        CustomerOrder::new(
            0,
            Tier::Regular,
            vec![OrderLine::new(
                SkuMatcher::exact(&Sku::new("Diclofenac", "Ointment", 50)),
                2,
            )],
        ),
    ];

    // Regular customers repeat their prescriptions every few days.
    let regulars = vec![
        vec![
            Subscription::new(SkuMatcher::by_name("Omeprazole").with_form("Tablets"), 1, 3),
            Subscription::new(SkuMatcher::by_name("Cetirizine"), 2, 7),
        ],
        vec![Subscription::new(SkuMatcher::by_name("Ambroxol"), 1, 5)],
    ];
    let orders = Box::new(PeriodicOrders::new(
        Box::new(ConstantOrders::new(batch)),
        regulars,
    )?);

    // 4. INITIALIZE & RUN
    let mut sim = PharmacySimulation::new(config, catalog, orders)?;
    println!("Running simulation for {} days...", sim.config().total_days);
    sim.run()?;

    // 5. EXPORT RESULTS
    let output_file = "simulation_results.csv";
    match reporting::write_day_log(output_file, &sim.history) {
        Ok(_) => println!("Success! Data written to ./{}", output_file),
        Err(e) => eprintln!("Error writing CSV: {}", e),
    }

    // 6. SUMMARY
    println!("\n=== Summary ===");
    println!("Restock expenses: ${:.2}", sim.total_expenses());
    println!("Units lost to expiry: {}", sim.total_evicted());
    println!("Fill rate: {:.1}%", sim.fill_rate() * 100.0);
    println!("Orders dropped by couriers: {}", sim.total_overloaded());
    println!("Courier pool: {}", sim.dispatcher.pool_size());
    Ok(())
}
