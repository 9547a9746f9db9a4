use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::dates;
use crate::models::{FuelEconomy, FuelRecord, MaintenanceRecord};

/// Average km/l over a set of fuel purchases, from the odometer delta between
/// the newest and oldest purchase and the total volume bought.
///
/// Purchases whose date cannot be read are ignored. With fewer than two
/// usable purchases the average is zero. A negative odometer delta yields a
/// zero average and sets `odometer_inconsistent`.
pub fn calculate_fuel_economy(records: &[FuelRecord]) -> FuelEconomy {
    let mut dated: Vec<(NaiveDate, &FuelRecord)> = records
        .iter()
        .filter_map(|r| dates::parse_date(&r.date).map(|d| (d, r)))
        .collect();

    let total_liters = saturating_sum(dated.iter().map(|(_, r)| r.liters));

    if dated.len() < 2 {
        return FuelEconomy {
            total_distance: 0,
            total_liters,
            avg_km_per_liter: Decimal::ZERO,
            odometer_inconsistent: false,
        };
    }

    dated.sort_by(|a, b| b.0.cmp(&a.0));
    let newest = dated[0].1.odometer;
    let oldest = dated[dated.len() - 1].1.odometer;
    let total_distance = calculate_distance(oldest, newest);

    if total_distance < 0 {
        return FuelEconomy {
            total_distance,
            total_liters,
            avg_km_per_liter: Decimal::ZERO,
            odometer_inconsistent: true,
        };
    }

    let avg_km_per_liter = if total_liters > Decimal::ZERO {
        Decimal::from(total_distance)
            .checked_div(total_liters)
            .map_or(Decimal::ZERO, |avg| avg.round_dp(2))
    } else {
        Decimal::ZERO
    };

    FuelEconomy {
        total_distance,
        total_liters,
        avg_km_per_liter,
        odometer_inconsistent: false,
    }
}

pub fn calculate_distance(odometer_start: i32, odometer_end: i32) -> i32 {
    odometer_end - odometer_start
}

/// Sums without panicking; clamps at `Decimal::MAX` on overflow.
fn saturating_sum<I>(values: I) -> Decimal
where
    I: IntoIterator<Item = Decimal>,
{
    values.into_iter().fold(Decimal::ZERO, |acc, v| {
        acc.checked_add(v).unwrap_or(Decimal::MAX)
    })
}

pub fn calculate_total_spent(records: &[FuelRecord]) -> Decimal {
    saturating_sum(records.iter().map(|r| r.total_cost)).round_dp(2)
}

pub fn calculate_price_per_liter(total_cost: &Decimal, liters: &Decimal) -> Option<Decimal> {
    if liters > &Decimal::ZERO {
        total_cost.checked_div(*liters).map(|price| price.round_dp(2))
    } else {
        None
    }
}

pub fn calculate_cost_per_km(total_cost: &Decimal, distance: i32) -> Option<Decimal> {
    if distance > 0 {
        Some((total_cost / Decimal::from(distance)).round_dp(2))
    } else {
        None
    }
}

/// Services without a recorded cost count as zero.
pub fn calculate_maintenance_spent(records: &[MaintenanceRecord]) -> Decimal {
    saturating_sum(records.iter().filter_map(|r| r.cost)).round_dp(2)
}

// Helper function to ensure decimal values from user input are properly normalized with 2 decimal places
pub fn normalize_decimal(value: Decimal) -> Decimal {
    value.round_dp(2)
}
