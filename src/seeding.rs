use crate::dates::to_iso;
use crate::db::{FUEL_TABLE, MAINTENANCE_TABLE, setup_database};
use crate::models::{FuelRecord, FuelRecordRow, MaintenanceRecord, MaintenanceRecordRow};

use chrono::{Duration, NaiveDate, Utc};
use rand::RngExt;
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use surrealdb::{Surreal, engine::local::Db};

// Constants
const STARTING_ODOMETER: i32 = 48000;
const SEED_DAYS: i64 = 365;
const STATIONS: &[&str] = &["Posto Shell Centro", "Ipiranga Av. Brasil", "Posto BR Rodovia"];

// Helper struct for random fill-up data
struct FillUpData {
    days_until_next: i64,
    km_driven: i32,
    liters_float: f64,
    price_per_liter: f64,
    station: &'static str,
    ethanol: bool,
}

impl FillUpData {
    fn random() -> Self {
        let mut rng = rand::rng();

        Self {
            days_until_next: rng.random_range(6..13),
            km_driven: rng.random_range(280..520),
            liters_float: rng.random_range(28.0..44.0),
            price_per_liter: rng.random_range(5.49..6.39),
            station: STATIONS[rng.random_range(0..STATIONS.len())],
            ethanol: rng.random_bool(0.2),
        }
    }

    /// Convert to FuelRecordRow and return new odometer reading
    fn to_fuel_row(&self, date: NaiveDate, current_odometer: i32) -> (FuelRecordRow, i32) {
        let odometer = current_odometer + self.km_driven;
        let liters = Decimal::from_f64(self.liters_float)
            .unwrap_or(Decimal::ZERO)
            .round_dp(2);
        let total_cost = Decimal::from_f64(self.liters_float * self.price_per_liter)
            .unwrap_or(Decimal::ZERO)
            .round_dp(2);

        let row = FuelRecordRow {
            station: self.station.to_string(),
            liters,
            fuel_type: if self.ethanol { "Etanol" } else { "Gasolina" }.to_string(),
            total_cost,
            odometer,
            date: to_iso(date),
        };

        (row, odometer)
    }
}

// Maintenance history configuration, offsets counted back from today
struct ServiceConfig {
    service_type: &'static str,
    days_ago: i64,
    cost: f64,
    workshop: Option<&'static str>,
    notes: Option<&'static str>,
}

impl ServiceConfig {
    fn create_row<F>(&self, today: NaiveDate, odometer_at: F) -> MaintenanceRecordRow
    where
        F: Fn(NaiveDate) -> i32,
    {
        let date = today - Duration::days(self.days_ago);
        MaintenanceRecordRow {
            service_type: self.service_type.to_string(),
            date: to_iso(date),
            cost: Decimal::from_f64(self.cost).map(|c| c.round_dp(2)),
            odometer: Some(odometer_at(date)),
            workshop: self.workshop.map(|s| s.to_string()),
            notes: self.notes.map(|s| s.to_string()),
        }
    }
}

pub async fn seed_demo_data(db: &Surreal<Db>) -> surrealdb::Result<()> {
    setup_database(db).await;

    let today = Utc::now().date_naive();
    let readings = seed_fuel_records(db, today).await?;
    seed_maintenance_records(db, today, &readings).await?;

    Ok(())
}

async fn seed_fuel_records(
    db: &Surreal<Db>,
    today: NaiveDate,
) -> surrealdb::Result<Vec<(NaiveDate, i32)>> {
    let mut current_odometer = STARTING_ODOMETER;
    let mut current_date = today - Duration::days(SEED_DAYS);
    let mut readings = vec![(current_date, current_odometer)];

    while current_date <= today {
        let fill_up = FillUpData::random();
        let (row, new_odometer) = fill_up.to_fuel_row(current_date, current_odometer);

        let _: Option<FuelRecord> = db.create(FUEL_TABLE).content(row).await?;
        current_odometer = new_odometer;
        readings.push((current_date, current_odometer));

        current_date += Duration::days(fill_up.days_until_next);
    }

    Ok(readings)
}

async fn seed_maintenance_records(
    db: &Surreal<Db>,
    today: NaiveDate,
    readings: &[(NaiveDate, i32)],
) -> surrealdb::Result<()> {
    // The two recent alignments form a recurring problem in the demo
    let configs = [
        ServiceConfig {
            service_type: "Revisão",
            days_ago: 330,
            cost: 890.0,
            workshop: Some("Auto Center Paulista"),
            notes: Some("Revisão dos 50 mil km"),
        },
        ServiceConfig {
            service_type: "Troca de Óleo",
            days_ago: 240,
            cost: 260.0,
            workshop: Some("Oficina do Zé"),
            notes: Some("Óleo sintético 5W30"),
        },
        ServiceConfig {
            service_type: "Troca de Pneus",
            days_ago: 150,
            cost: 2100.0,
            workshop: Some("Pneus & Cia"),
            notes: None,
        },
        ServiceConfig {
            service_type: "Troca de Óleo",
            days_ago: 60,
            cost: 275.0,
            workshop: Some("Oficina do Zé"),
            notes: None,
        },
        ServiceConfig {
            service_type: "Alinhamento",
            days_ago: 75,
            cost: 120.0,
            workshop: Some("Pneus & Cia"),
            notes: None,
        },
        ServiceConfig {
            service_type: "Alinhamento",
            days_ago: 20,
            cost: 120.0,
            workshop: Some("Auto Center Paulista"),
            notes: Some("Volante puxando para a direita"),
        },
    ];

    // Last known reading on or before a date
    let odometer_at = |date: NaiveDate| {
        readings
            .iter()
            .take_while(|(d, _)| *d <= date)
            .last()
            .map_or(STARTING_ODOMETER, |(_, km)| *km)
    };

    for config in &configs {
        let row = config.create_row(today, &odometer_at);
        let _: Option<MaintenanceRecord> = db.create(MAINTENANCE_TABLE).content(row).await?;
    }

    Ok(())
}
