use actix_web::{web, HttpResponse, Responder};
use futures::TryStreamExt;
use mongodb::bson::{doc, Document};
use mongodb::Client;
use std::sync::Arc;

use crate::models::dashboard::StatsSummary;
use crate::models::trip::Trip;

/*
    /api/stats

    Trip count prefers the deduplicating aggregation (distinct
    origin+destination+day, matching how the mobile client can record the
    same quote several times); a plain count is the fallback when the
    aggregation fails. is_unique_trips tells the frontend which one it got.
*/
pub async fn get_stats(data: web::Data<Arc<Client>>) -> impl Responder {
    let client = data.into_inner();
    let trips: mongodb::Collection<Trip> = client.database("Rides").collection("Trips");

    let pipeline = vec![
        doc! { "$group": { "_id": {
            "origin": "$origin",
            "destination": "$destination",
            "day": { "$substrCP": [ { "$ifNull": [ "$created_at", "" ] }, 0, 10 ] },
        } } },
        doc! { "$count": "unique_trips" },
    ];

    let unique_count: Option<i64> = match trips.aggregate(pipeline).await {
        Ok(cursor) => match cursor.try_collect::<Vec<Document>>().await {
            Ok(documents) => Some(
                documents
                    .first()
                    .map(|document| {
                        document
                            .get_i64("unique_trips")
                            .or_else(|_| document.get_i32("unique_trips").map(i64::from))
                            .unwrap_or(0)
                    })
                    .unwrap_or(0),
            ),
            Err(err) => {
                eprintln!("Unique trip aggregation failed, using plain count: {:?}", err);
                None
            }
        },
        Err(err) => {
            eprintln!("Unique trip aggregation failed, using plain count: {:?}", err);
            None
        }
    };

    let (total_trips, is_unique_trips) = match unique_count {
        Some(count) => (count, true),
        None => match trips.count_documents(doc! {}).await {
            Ok(count) => (count as i64, false),
            Err(err) => {
                eprintln!("Failed to count trips: {:?}", err);
                return HttpResponse::InternalServerError().body("Failed to count trips");
            }
        },
    };

    let last_future = async {
        match trips.find(doc! {}).sort(doc! { "id": -1 }).limit(1).await {
            Ok(cursor) => match cursor.try_collect::<Vec<Trip>>().await {
                Ok(mut latest) => latest.pop().and_then(|trip| trip.created_at),
                Err(err) => {
                    eprintln!("Failed to collect latest trip: {:?}", err);
                    None
                }
            },
            Err(err) => {
                eprintln!("Failed to find latest trip: {:?}", err);
                None
            }
        }
    };

    let users_future = async {
        match trips
            .distinct("user_id", doc! { "user_id": { "$ne": null } })
            .await
        {
            Ok(values) => values.iter().filter(|value| value.as_str().is_some()).count() as i64,
            Err(err) => {
                eprintln!("Failed to count distinct users: {:?}", err);
                0
            }
        }
    };

    let (last_trip_at, total_users) = futures::join!(last_future, users_future);

    HttpResponse::Ok().json(StatsSummary {
        total_trips,
        total_users,
        last_trip_at,
        is_unique_trips,
    })
}
