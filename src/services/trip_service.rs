use futures::TryStreamExt;
use mongodb::bson::{doc, Document};
use mongodb::Client;
use std::collections::HashMap;

use crate::models::config::DriverRateConfig;
use crate::models::dashboard::{RideOptionRow, TripRow};
use crate::models::trip::{RideOption, Trip};
use crate::models::user::AppUser;
use crate::services::valuation_service::ValuationService;

/// Placeholder shown when the trip has no usable client name.
const NO_NAME: &str = "—";

/// Join one trip with its already-fetched options and user into the
/// denormalized table row. Pure assembly; all fetching happens upstream.
pub fn assemble_trip_row(
    trip: &Trip,
    options: &[RideOption],
    user: Option<&AppUser>,
    rate_config: Option<&DriverRateConfig>,
) -> TripRow {
    let valuation = ValuationService::aggregate(trip.discount_percent, options);

    let name = user
        .and_then(|u| u.name_user.as_deref())
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .unwrap_or(NO_NAME)
        .to_string();
    let phone = user
        .and_then(|u| u.phone.as_deref())
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string);

    TripRow {
        id: trip.id,
        name,
        phone,
        origin: trip.origin.clone(),
        destination: trip.destination.clone(),
        app: trip.app.clone(),
        valor_app: valuation.base,
        valor_com_desconto: valuation.discounted,
        discount_percent: valuation.discount_percent_display,
        created_at: trip.created_at,
        rides: options
            .iter()
            .map(|option| build_ride_row(option, rate_config))
            .collect(),
    }
}

/// Ride option pass-through plus, when the rate config is available, the
/// derived "meets minimum" flags for the driver rates.
pub fn build_ride_row(option: &RideOption, rate_config: Option<&DriverRateConfig>) -> RideOptionRow {
    let (min_per_km, min_per_hour) = match rate_config {
        Some(config) if is_moto(option) => (Some(config.min_per_km_moto), Some(config.min_per_hour_moto)),
        Some(config) => (Some(config.min_per_km_car), Some(config.min_per_hour_car)),
        None => (None, None),
    };

    RideOptionRow {
        r#type: option.r#type.clone(),
        name: option.name.clone(),
        price: option.price.clone(),
        value: option.value.filter(|v| v.is_finite()),
        estimated_time: option.estimated_time.clone(),
        driver_value_per_km: option.driver_value_per_km,
        driver_value_per_hour: option.driver_value_per_hour,
        pickup_km: option.pickup_km,
        trip_km: option.trip_km,
        total_km: option.total_km,
        pickup_min: option.pickup_min,
        trip_duration_min: option.trip_duration_min,
        total_min: option.total_min,
        meets_min_per_km: option
            .driver_value_per_km
            .zip(min_per_km)
            .map(|(rate, min)| rate >= min),
        meets_min_per_hour: option
            .driver_value_per_hour
            .zip(min_per_hour)
            .map(|(rate, min)| rate >= min),
    }
}

/// An option whose name or type mentions "moto" is held to the moto
/// minimums; everything else is a car.
fn is_moto(option: &RideOption) -> bool {
    let label = format!(
        "{} {}",
        option.name.as_deref().unwrap_or(""),
        option.r#type.as_deref().unwrap_or("")
    );
    label.to_lowercase().contains("moto")
}

/// Trips per user for the given ids. Errors degrade to an empty map so a
/// failed count never blocks the page.
pub async fn trip_counts_by_user(client: &Client, user_ids: &[String]) -> HashMap<String, i64> {
    let mut counts = HashMap::new();
    if user_ids.is_empty() {
        return counts;
    }

    let collection: mongodb::Collection<Trip> = client.database("Rides").collection("Trips");
    let pipeline = vec![
        doc! { "$match": { "user_id": { "$in": user_ids.to_vec() } } },
        doc! { "$group": { "_id": "$user_id", "count": { "$sum": 1 } } },
    ];

    let documents = match collection.aggregate(pipeline).await {
        Ok(cursor) => match cursor.try_collect::<Vec<Document>>().await {
            Ok(documents) => documents,
            Err(err) => {
                eprintln!("Failed to collect trip counts: {:?}", err);
                return counts;
            }
        },
        Err(err) => {
            eprintln!("Failed to aggregate trip counts: {:?}", err);
            return counts;
        }
    };

    for document in documents {
        let user_id = match document.get_str("_id") {
            Ok(user_id) => user_id.to_string(),
            Err(_) => continue,
        };
        let count = document
            .get_i64("count")
            .or_else(|_| document.get_i32("count").map(i64::from))
            .unwrap_or(0);
        counts.insert(user_id, count);
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trip(discount_percent: Option<f64>, user_id: Option<&str>) -> Trip {
        Trip {
            id: 7,
            origin: Some("Centro".to_string()),
            destination: Some("Aldeota".to_string()),
            app: Some("99".to_string()),
            user_id: user_id.map(|id| id.to_string()),
            discount_percent,
            timestamp: None,
            created_at: None,
            updated_at: None,
        }
    }

    fn moto_option(value: f64, per_km: f64) -> RideOption {
        RideOption {
            trip_id: 7,
            r#type: Some("moto".to_string()),
            name: Some("Moto Táxi".to_string()),
            price: None,
            value: Some(value),
            estimated_time: Some("5 min".to_string()),
            driver_value_per_km: Some(per_km),
            driver_value_per_hour: None,
            pickup_km: Some(1.2),
            trip_km: Some(4.0),
            total_km: Some(5.2),
            pickup_min: Some(4),
            trip_duration_min: Some(11),
            total_min: Some(15),
            created_at: None,
        }
    }

    fn user(name: &str, phone: Option<&str>) -> AppUser {
        AppUser {
            id_user: "u1".to_string(),
            id_customer: None,
            name_user: Some(name.to_string()),
            nickname: None,
            email: None,
            phone: phone.map(|p| p.to_string()),
            document: None,
            customer_register_status_id: None,
            created_at: None,
            updated_at: None,
        }
    }

    const RATES: DriverRateConfig = DriverRateConfig {
        min_per_km_car: 1.8,
        min_per_km_moto: 1.2,
        min_per_hour_car: 30.0,
        min_per_hour_moto: 20.0,
    };

    #[test]
    fn test_row_uses_trimmed_user_name() {
        let row = assemble_trip_row(
            &trip(Some(0.10), Some("u1")),
            &[],
            Some(&user("  Maria Silva  ", Some(" 85912722350 "))),
            None,
        );
        assert_eq!(row.name, "Maria Silva");
        assert_eq!(row.phone.as_deref(), Some("85912722350"));
    }

    #[test]
    fn test_row_placeholder_without_user() {
        let row = assemble_trip_row(&trip(None, None), &[], None, None);
        assert_eq!(row.name, "—");
        assert_eq!(row.phone, None);
        assert_eq!(row.valor_app, 0.0);
        assert_eq!(row.discount_percent, None);
    }

    #[test]
    fn test_row_carries_valuation() {
        let options = vec![moto_option(18.0, 1.5), moto_option(22.0, 1.5)];
        let row = assemble_trip_row(&trip(Some(0.10), None), &options, None, None);
        assert_eq!(row.valor_app, 18.0);
        assert!((row.valor_com_desconto - 16.2).abs() < 1e-9);
        assert_eq!(row.discount_percent, Some(10));
        assert_eq!(row.rides.len(), 2);
    }

    #[test]
    fn test_meets_flags_need_rate_config() {
        let option = moto_option(18.0, 1.5);

        let without = build_ride_row(&option, None);
        assert_eq!(without.meets_min_per_km, None);

        let with = build_ride_row(&option, Some(&RATES));
        assert_eq!(with.meets_min_per_km, Some(true));
        // No R$/h reported by this option, so the flag stays unknown.
        assert_eq!(with.meets_min_per_hour, None);
    }

    #[test]
    fn test_moto_uses_moto_minimums() {
        let mut option = moto_option(18.0, 1.3);
        let row = build_ride_row(&option, Some(&RATES));
        assert_eq!(row.meets_min_per_km, Some(true)); // 1.3 >= moto 1.2

        option.name = Some("Pop".to_string());
        option.r#type = Some("car".to_string());
        let row = build_ride_row(&option, Some(&RATES));
        assert_eq!(row.meets_min_per_km, Some(false)); // 1.3 < car 1.8
    }

    #[test]
    fn test_trip_row_json_contract() {
        let row = assemble_trip_row(
            &trip(Some(0.10), None),
            &[moto_option(18.0, 1.5)],
            None,
            None,
        );
        let json = serde_json::to_value(&row).unwrap();
        assert!(json.get("valorApp").is_some());
        assert!(json.get("valorComDesconto").is_some());
        assert!(json.get("discountPercent").is_some());
        assert!(json.get("createdAt").is_some());
        let ride = &json["rides"][0];
        assert!(ride.get("estimatedTime").is_some());
        assert!(ride.get("meetsMinPerKm").is_some());
        assert!(ride.get("type").is_some());
    }
}
