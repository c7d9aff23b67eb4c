use actix_web::{web, HttpResponse, Responder};
use bson::doc;
use futures::TryStreamExt;
use mongodb::Client;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::models::dashboard::{TripData, TripDetailResponse};
use crate::models::trip::{RideOption, Trip};
use crate::models::user::AppUser;
use crate::services::config_service;
use crate::services::trip_service::assemble_trip_row;

const PAGE_SIZE_DEFAULT: i64 = 20;
const PAGE_SIZE_MAX: i64 = 100;

#[derive(serde::Deserialize)]
pub struct QueryParams {
    limit: Option<i64>,
    offset: Option<u64>,
}

/*
    /api/trips?limit&offset
*/
pub async fn get_trips(
    data: web::Data<Arc<Client>>,
    params: web::Query<QueryParams>,
) -> impl Responder {
    let client = data.into_inner();
    let collection: mongodb::Collection<Trip> = client.database("Rides").collection("Trips");

    let limit = params
        .limit
        .unwrap_or(PAGE_SIZE_DEFAULT)
        .clamp(1, PAGE_SIZE_MAX);
    let offset = params.offset.unwrap_or(0);

    let total = match collection.count_documents(doc! {}).await {
        Ok(count) => count,
        Err(err) => {
            eprintln!("Failed to count trips: {:?}", err);
            return HttpResponse::InternalServerError().body("Failed to count trips");
        }
    };

    let trips = match collection
        .find(doc! {})
        .sort(doc! { "id": -1 })
        .skip(offset)
        .limit(limit)
        .await
    {
        Ok(cursor) => match cursor.try_collect::<Vec<Trip>>().await {
            Ok(trips) => trips,
            Err(err) => {
                eprintln!("Failed to collect trips: {:?}", err);
                return HttpResponse::InternalServerError().body("Failed to collect trips");
            }
        },
        Err(err) => {
            eprintln!("Failed to find trips: {:?}", err);
            return HttpResponse::InternalServerError().body("Failed to find trips");
        }
    };

    if trips.is_empty() {
        return HttpResponse::Ok().json(TripData {
            rows: Vec::new(),
            total,
        });
    }

    let trip_ids: Vec<i64> = trips.iter().map(|trip| trip.id).collect();
    let user_ids: Vec<String> = trips
        .iter()
        .filter_map(|trip| trip.user_id.clone())
        .collect::<HashSet<_>>()
        .into_iter()
        .collect();

    let (options, users) = fetch_trip_children(&client, &trip_ids, &user_ids).await;
    let user_map: HashMap<&str, &AppUser> = users
        .iter()
        .map(|user| (user.id_user.as_str(), user))
        .collect();

    let rows = trips
        .iter()
        .map(|trip| {
            let trip_options: Vec<RideOption> = options
                .iter()
                .filter(|option| option.trip_id == trip.id)
                .cloned()
                .collect();
            let user = trip
                .user_id
                .as_deref()
                .and_then(|id| user_map.get(id).copied());
            assemble_trip_row(trip, &trip_options, user, None)
        })
        .collect();

    HttpResponse::Ok().json(TripData { rows, total })
}

/*
    /api/trips/{id}

    Returns the assembled row plus the driver rate config so the detail
    modal can label the per-option minimum-rate checks.
*/
pub async fn get_trip_by_id(
    path: web::Path<String>,
    data: web::Data<Arc<Client>>,
) -> impl Responder {
    let client = data.into_inner();

    let trip_id: i64 = match path.into_inner().parse() {
        Ok(id) if id >= 1 => id,
        _ => return HttpResponse::BadRequest().body("Invalid trip id"),
    };

    let collection: mongodb::Collection<Trip> = client.database("Rides").collection("Trips");

    match collection.find_one(doc! { "id": trip_id }).await {
        Ok(Some(trip)) => {
            let user_ids: Vec<String> = trip.user_id.clone().into_iter().collect();
            let trip_ids = [trip_id];
            let ((options, users), settings) = futures::join!(
                fetch_trip_children(&client, &trip_ids, &user_ids),
                config_service::fetch_settings(&client)
            );

            let rate_config = config_service::driver_rate_config(&settings);
            let user = trip
                .user_id
                .as_deref()
                .and_then(|id| users.iter().find(|u| u.id_user == id));
            let row = assemble_trip_row(&trip, &options, user, Some(&rate_config));

            HttpResponse::Ok().json(TripDetailResponse {
                trip: row,
                driver_rate_config: rate_config,
            })
        }
        Ok(None) => HttpResponse::NotFound().body("Trip not found"),
        Err(err) => {
            eprintln!("Failed to retrieve trip: {:?}", err);
            HttpResponse::InternalServerError().body("Failed to retrieve trip")
        }
    }
}

/// Ride options and users for the given trips, fetched in parallel. Either
/// lookup failing degrades to an empty list so the page still renders the
/// trips themselves.
async fn fetch_trip_children(
    client: &Client,
    trip_ids: &[i64],
    user_ids: &[String],
) -> (Vec<RideOption>, Vec<AppUser>) {
    let options_collection: mongodb::Collection<RideOption> =
        client.database("Rides").collection("RideOptions");
    let users_collection: mongodb::Collection<AppUser> =
        client.database("Account").collection("Users");

    let options_future = async {
        match options_collection
            .find(doc! { "trip_id": { "$in": trip_ids.to_vec() } })
            .await
        {
            Ok(cursor) => match cursor.try_collect::<Vec<RideOption>>().await {
                Ok(options) => options,
                Err(err) => {
                    eprintln!("Failed to collect ride options: {:?}", err);
                    Vec::new()
                }
            },
            Err(err) => {
                eprintln!("Failed to find ride options: {:?}", err);
                Vec::new()
            }
        }
    };

    let users_future = async {
        if user_ids.is_empty() {
            return Vec::new();
        }
        match users_collection
            .find(doc! { "id_user": { "$in": user_ids.to_vec() } })
            .await
        {
            Ok(cursor) => match cursor.try_collect::<Vec<AppUser>>().await {
                Ok(users) => users,
                Err(err) => {
                    eprintln!("Failed to collect users: {:?}", err);
                    Vec::new()
                }
            },
            Err(err) => {
                eprintln!("Failed to find users: {:?}", err);
                Vec::new()
            }
        }
    };

    futures::join!(options_future, users_future)
}
