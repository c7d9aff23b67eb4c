use actix_web::{web, HttpResponse, Responder};
use futures::TryStreamExt;
use mongodb::bson::doc;
use mongodb::Client;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::models::dashboard::OptOutRow;
use crate::models::opt_out::OptOut;
use crate::models::trip::Trip;
use crate::models::user::AppUser;

const OPT_OUTS_LIMIT_DEFAULT: i64 = 200;
const OPT_OUTS_LIMIT_MAX: i64 = 1000;

#[derive(serde::Deserialize)]
pub struct QueryParams {
    limit: Option<i64>,
}

/*
    /api/opt-outs?limit

    Abandoned rides joined with the client name and the linked trip, newest
    first.
*/
pub async fn get_opt_outs(
    data: web::Data<Arc<Client>>,
    params: web::Query<QueryParams>,
) -> impl Responder {
    let client = data.into_inner();
    let collection: mongodb::Collection<OptOut> = client.database("Rides").collection("OptOuts");

    let limit = params
        .limit
        .unwrap_or(OPT_OUTS_LIMIT_DEFAULT)
        .clamp(1, OPT_OUTS_LIMIT_MAX);

    let opt_outs = match collection
        .find(doc! {})
        .sort(doc! { "id": -1 })
        .limit(limit)
        .await
    {
        Ok(cursor) => match cursor.try_collect::<Vec<OptOut>>().await {
            Ok(opt_outs) => opt_outs,
            Err(err) => {
                eprintln!("Failed to collect opt-outs: {:?}", err);
                return HttpResponse::InternalServerError().body("Failed to collect opt-outs");
            }
        },
        Err(err) => {
            eprintln!("Failed to find opt-outs: {:?}", err);
            return HttpResponse::InternalServerError().body("Failed to find opt-outs");
        }
    };

    let user_ids: Vec<String> = opt_outs
        .iter()
        .filter_map(|opt_out| opt_out.user_id.clone())
        .collect::<HashSet<_>>()
        .into_iter()
        .collect();
    let trip_ids: Vec<i64> = opt_outs
        .iter()
        .filter_map(|opt_out| opt_out.trip_id)
        .collect::<HashSet<_>>()
        .into_iter()
        .collect();

    let (users, trips) = fetch_joins(&client, &user_ids, &trip_ids).await;

    let name_by_user: HashMap<&str, &AppUser> = users
        .iter()
        .map(|user| (user.id_user.as_str(), user))
        .collect();
    let trip_by_id: HashMap<i64, &Trip> = trips.iter().map(|trip| (trip.id, trip)).collect();

    let rows: Vec<OptOutRow> = opt_outs
        .into_iter()
        .map(|opt_out| {
            let user = opt_out
                .user_id
                .as_deref()
                .and_then(|id| name_by_user.get(id).copied());
            let trip = opt_out.trip_id.and_then(|id| trip_by_id.get(&id).copied());

            OptOutRow {
                id: opt_out.id,
                user_id: opt_out.user_id,
                device_model: opt_out.device_model,
                app_version: opt_out.app_version,
                app_name: opt_out.app_name,
                occurred_at: opt_out.occurred_at,
                created_at: opt_out.created_at,
                trip_id: opt_out.trip_id,
                client_name: user
                    .and_then(|u| u.name_user.as_deref())
                    .map(str::trim)
                    .filter(|name| !name.is_empty())
                    .map(str::to_string),
                trip_origin: trip.and_then(|t| t.origin.clone()),
                trip_destination: trip.and_then(|t| t.destination.clone()),
                trip_app: trip.and_then(|t| t.app.clone()),
                trip_created_at: trip.and_then(|t| t.created_at),
            }
        })
        .collect();

    HttpResponse::Ok().json(rows)
}

/// Users and linked trips for the listed opt-outs, fetched in parallel.
/// Either lookup failing only costs its joined columns.
async fn fetch_joins(
    client: &Client,
    user_ids: &[String],
    trip_ids: &[i64],
) -> (Vec<AppUser>, Vec<Trip>) {
    let users_collection: mongodb::Collection<AppUser> =
        client.database("Account").collection("Users");
    let trips_collection: mongodb::Collection<Trip> =
        client.database("Rides").collection("Trips");

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
                    eprintln!("Failed to collect opt-out users: {:?}", err);
                    Vec::new()
                }
            },
            Err(err) => {
                eprintln!("Failed to find opt-out users: {:?}", err);
                Vec::new()
            }
        }
    };

    let trips_future = async {
        if trip_ids.is_empty() {
            return Vec::new();
        }
        match trips_collection
            .find(doc! { "id": { "$in": trip_ids.to_vec() } })
            .await
        {
            Ok(cursor) => match cursor.try_collect::<Vec<Trip>>().await {
                Ok(trips) => trips,
                Err(err) => {
                    eprintln!("Failed to collect opt-out trips: {:?}", err);
                    Vec::new()
                }
            },
            Err(err) => {
                eprintln!("Failed to find opt-out trips: {:?}", err);
                Vec::new()
            }
        }
    };

    futures::join!(users_future, trips_future)
}
