//! Bundled demo database.
//!
//! Seeds a small synthetic e-commerce dataset (customers and orders with a
//! foreign key between them) so the app is usable before any file is
//! uploaded. Seeding is deterministic: a fixed-seed LCG drives the value
//! choices, so tests can rely on the exact contents.

use rusqlite::{params, Connection};
use tracing::info;

const CITIES: &[&str] = &[
    "Lahore",
    "Karachi",
    "Islamabad",
    "Multan",
    "Faisalabad",
    "Rawalpindi",
    "Peshawar",
    "Quetta",
];

const FIRST_NAMES: &[&str] = &[
    "Ali", "Bilal", "Zara", "Sara", "Ahmed", "Omer", "Fatima", "Ayesha", "Hassan", "Zainab",
    "Usman", "Hamza",
];

const LAST_NAMES: &[&str] = &[
    "Khan", "Ahmed", "Ali", "Butt", "Sheikh", "Malik", "Raja", "Chaudhry",
];

const STATUSES: &[&str] = &["Pending", "Completed", "Cancelled", "Shipped"];

const CUSTOMER_COUNT: usize = 50;
const ORDER_COUNT: usize = 200;

/// Minimal fixed-seed PRNG; good enough for synthetic demo rows and keeps
/// the seeded database reproducible.
struct Lcg(u64);

impl Lcg {
    fn new() -> Self {
        Self(0x4d595df4d0f33173)
    }

    fn next(&mut self) -> u64 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.0 >> 33
    }

    fn below(&mut self, n: usize) -> usize {
        (self.next() % n as u64) as usize
    }
}

/// Drop and recreate the demo tables, then seed them.
pub fn seed_demo_db(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(
        "DROP TABLE IF EXISTS orders;
         DROP TABLE IF EXISTS customers;

         CREATE TABLE customers (
             id INTEGER PRIMARY KEY AUTOINCREMENT,
             name TEXT NOT NULL,
             city TEXT NOT NULL,
             created_at TEXT NOT NULL
         );

         CREATE TABLE orders (
             id INTEGER PRIMARY KEY AUTOINCREMENT,
             customer_id INTEGER,
             amount REAL NOT NULL,
             status TEXT NOT NULL,
             created_at TEXT NOT NULL,
             FOREIGN KEY (customer_id) REFERENCES customers(id)
         );",
    )?;

    let mut rng = Lcg::new();

    for _ in 0..CUSTOMER_COUNT {
        let name = format!(
            "{} {}",
            FIRST_NAMES[rng.below(FIRST_NAMES.len())],
            LAST_NAMES[rng.below(LAST_NAMES.len())]
        );
        let city = CITIES[rng.below(CITIES.len())];
        let created_at = synthetic_date(&mut rng, 2022, 2024);
        conn.execute(
            "INSERT INTO customers (name, city, created_at) VALUES (?1, ?2, ?3)",
            params![name, city, created_at],
        )?;
    }

    for _ in 0..ORDER_COUNT {
        let customer_id = (rng.below(CUSTOMER_COUNT) + 1) as i64;
        let amount = 100.0 + rng.below(990_000) as f64 / 100.0;
        let status = STATUSES[rng.below(STATUSES.len())];
        let created_at = synthetic_date(&mut rng, 2023, 2024);
        conn.execute(
            "INSERT INTO orders (customer_id, amount, status, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![customer_id, amount, status, created_at],
        )?;
    }

    info!(
        customers = CUSTOMER_COUNT,
        orders = ORDER_COUNT,
        "seeded demo database"
    );
    Ok(())
}

/// A date-time string in SQLite's text format; days capped at 28 to stay
/// valid in every month.
fn synthetic_date(rng: &mut Lcg, from_year: i32, to_year: i32) -> String {
    let year = from_year + rng.below((to_year - from_year + 1) as usize) as i32;
    let month = rng.below(12) + 1;
    let day = rng.below(28) + 1;
    let hour = rng.below(24);
    format!("{year}-{month:02}-{day:02} {hour:02}:00:00")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeds_expected_row_counts() {
        let conn = Connection::open_in_memory().unwrap();
        seed_demo_db(&conn).unwrap();

        let customers: i64 = conn
            .query_row("SELECT COUNT(*) FROM customers", [], |r| r.get(0))
            .unwrap();
        let orders: i64 = conn
            .query_row("SELECT COUNT(*) FROM orders", [], |r| r.get(0))
            .unwrap();
        assert_eq!(customers, 50);
        assert_eq!(orders, 200);
    }

    #[test]
    fn every_order_references_an_existing_customer() {
        let conn = Connection::open_in_memory().unwrap();
        seed_demo_db(&conn).unwrap();

        let orphans: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM orders o
                 LEFT JOIN customers c ON o.customer_id = c.id
                 WHERE c.id IS NULL",
                [],
                |r| r.get(0),
            )
            .unwrap();
        assert_eq!(orphans, 0);
    }

    #[test]
    fn reseeding_is_reproducible() {
        let a = Connection::open_in_memory().unwrap();
        let b = Connection::open_in_memory().unwrap();
        seed_demo_db(&a).unwrap();
        seed_demo_db(&b).unwrap();

        let dump = |conn: &Connection| -> Vec<(String, String)> {
            let mut stmt = conn
                .prepare("SELECT name, city FROM customers ORDER BY id")
                .unwrap();
            stmt.query_map([], |r| Ok((r.get(0)?, r.get(1)?)))
                .unwrap()
                .map(Result::unwrap)
                .collect()
        };
        assert_eq!(dump(&a), dump(&b));
    }

    #[test]
    fn reseeding_an_existing_database_resets_it() {
        let conn = Connection::open_in_memory().unwrap();
        seed_demo_db(&conn).unwrap();
        conn.execute(
            "INSERT INTO customers (name, city, created_at) VALUES ('X', 'Y', '2024-01-01 00:00:00')",
            [],
        )
        .unwrap();
        seed_demo_db(&conn).unwrap();
        let customers: i64 = conn
            .query_row("SELECT COUNT(*) FROM customers", [], |r| r.get(0))
            .unwrap();
        assert_eq!(customers, 50);
    }
}
