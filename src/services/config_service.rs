use futures::TryStreamExt;
use mongodb::bson::doc;
use mongodb::Client;

use crate::models::config::{ConfigEntry, DriverRateConfig};

const MIN_PER_KM_CAR: &str = "min_per_km_car";
const MIN_PER_KM_MOTO: &str = "min_per_km_moto";
const MIN_PER_HOUR_CAR: &str = "min_per_hour_car";
const MIN_PER_HOUR_MOTO: &str = "min_per_hour_moto";

/// All settings rows. A store failure degrades to an empty list, which in
/// turn yields all-zero driver minimums.
pub async fn fetch_settings(client: &Client) -> Vec<ConfigEntry> {
    let collection: mongodb::Collection<ConfigEntry> =
        client.database("App").collection("Settings");

    match collection.find(doc! {}).await {
        Ok(cursor) => match cursor.try_collect::<Vec<ConfigEntry>>().await {
            Ok(entries) => entries,
            Err(err) => {
                eprintln!("Failed to collect settings: {:?}", err);
                Vec::new()
            }
        },
        Err(err) => {
            eprintln!("Failed to find settings: {:?}", err);
            Vec::new()
        }
    }
}

/// Minimum driver rates from the settings collection. A missing or
/// unparsable key defaults to 0, which every reported rate trivially meets.
pub fn driver_rate_config(entries: &[ConfigEntry]) -> DriverRateConfig {
    DriverRateConfig {
        min_per_km_car: decimal_setting(entries, MIN_PER_KM_CAR),
        min_per_km_moto: decimal_setting(entries, MIN_PER_KM_MOTO),
        min_per_hour_car: decimal_setting(entries, MIN_PER_HOUR_CAR),
        min_per_hour_moto: decimal_setting(entries, MIN_PER_HOUR_MOTO),
    }
}

fn decimal_setting(entries: &[ConfigEntry], key: &str) -> f64 {
    entries
        .iter()
        .find(|entry| entry.key == key)
        .and_then(|entry| parse_decimal(&entry.value))
        .unwrap_or(0.0)
}

/// Settings are typed as strings and edited by hand, so both "1,80" and
/// "1.80" must parse.
pub fn parse_decimal(value: &str) -> Option<f64> {
    match value.trim().replace(',', ".").parse::<f64>() {
        Ok(parsed) if parsed.is_finite() => Some(parsed),
        _ => None,
    }
}
