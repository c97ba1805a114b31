//! Seeds a Shoplite database with demo data.
//!
//! Usage: `seed [path]` (default `./shoplite.db`). Seeding only runs
//! against an empty database; re-running against a populated one just
//! prints the reports.

use tracing::info;
use tracing_subscriber::EnvFilter;

use shoplite_core::{Customer, Money, Order, OrderItem, Product};
use shoplite_db::{Database, DbConfig, DbResult};

#[tokio::main]
async fn main() -> DbResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "./shoplite.db".to_string());

    let db = Database::new(DbConfig::new(&path)).await?;

    seed_if_empty(&db).await?;
    print_reports(&db).await?;

    db.close().await;
    Ok(())
}

async fn seed_if_empty(db: &Database) -> DbResult<()> {
    if db.customers().count().await? > 0 || db.products().count().await? > 0 {
        info!("Database already populated, skipping seed");
        return Ok(());
    }

    info!("Seeding demo data");

    let ada = db
        .customers()
        .insert(&Customer::new(
            "Ada Lovelace",
            Some("ada@example.com".into()),
            Some("+44 20 7946 0958".into()),
            Some("London".into()),
        ))
        .await?;
    let grace = db
        .customers()
        .insert(&Customer::new(
            "Grace Hopper",
            Some("grace@example.com".into()),
            Some("+1 212 555 0142".into()),
            Some("New York".into()),
        ))
        .await?;
    // Alan has no orders yet; he still shows up in the city report.
    let _alan = db
        .customers()
        .insert(&Customer::new(
            "Alan Turing",
            Some("alan@example.com".into()),
            None,
            Some("London".into()),
        ))
        .await?;

    let notebook = db
        .products()
        .insert(&Product::new(
            "Notebook",
            Money::from_major_minor(599, 90),
            Some("NB-001".into()),
        ))
        .await?;
    let mouse = db
        .products()
        .insert(&Product::new(
            "Mouse",
            Money::from_major_minor(12, 90),
            Some("MS-002".into()),
        ))
        .await?;
    let keyboard = db
        .products()
        .insert(&Product::new(
            "Keyboard",
            Money::from_major_minor(24, 90),
            Some("KB-003".into()),
        ))
        .await?;

    let mut first = Order::new(
        ada,
        vec![
            OrderItem::for_product(notebook, 1),
            OrderItem::for_product(mouse, 2),
        ],
    );
    db.orders().create(&mut first).await?;

    let mut second = Order::new(ada, vec![OrderItem::for_product(keyboard, 1)]);
    db.orders().create(&mut second).await?;

    let mut third = Order::new(grace, vec![OrderItem::for_product(mouse, 1)]);
    db.orders().create(&mut third).await?;

    info!("Seed complete");
    Ok(())
}

async fn print_reports(db: &Database) -> DbResult<()> {
    for row in db.reports().top_customers(5).await? {
        info!(
            customer = %row.name,
            orders = row.order_count,
            total = %row.total,
            "Top customer"
        );
    }

    for day in db.reports().orders_per_day().await? {
        info!(date = %day.date, orders = day.count, "Orders per day");
    }

    for edge in db.reports().city_edges().await? {
        info!(a = edge.a, b = edge.b, city = %edge.city, "Customers sharing a city");
    }

    Ok(())
}
