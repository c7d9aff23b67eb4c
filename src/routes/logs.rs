use actix_web::{web, HttpResponse, Responder};
use futures::TryStreamExt;
use mongodb::bson::doc;
use mongodb::Client;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::models::dashboard::LogData;
use crate::models::log::AppLog;
use crate::models::user::AppUser;
use crate::services::trip_service::trip_counts_by_user;

const LOGS_LIMIT_DEFAULT: i64 = 200;
const LOGS_LIMIT_MAX: i64 = 1000;

#[derive(serde::Deserialize)]
pub struct QueryParams {
    limit: Option<i64>,
}

/*
    /api/logs?limit

    Latest telemetry events plus per-user lookup maps (name, phone, trip
    count) for the users mentioned in them.
*/
pub async fn get_logs(
    data: web::Data<Arc<Client>>,
    params: web::Query<QueryParams>,
) -> impl Responder {
    let client = data.into_inner();
    let collection: mongodb::Collection<AppLog> = client.database("App").collection("Logs");

    let limit = params
        .limit
        .unwrap_or(LOGS_LIMIT_DEFAULT)
        .clamp(1, LOGS_LIMIT_MAX);

    let logs = match collection
        .find(doc! {})
        .sort(doc! { "id": -1 })
        .limit(limit)
        .await
    {
        Ok(cursor) => match cursor.try_collect::<Vec<AppLog>>().await {
            Ok(logs) => logs,
            Err(err) => {
                eprintln!("Failed to collect logs: {:?}", err);
                return HttpResponse::InternalServerError().body("Failed to collect logs");
            }
        },
        Err(err) => {
            eprintln!("Failed to find logs: {:?}", err);
            return HttpResponse::InternalServerError().body("Failed to find logs");
        }
    };

    let user_ids: Vec<String> = logs
        .iter()
        .filter_map(|log| log.user_id.clone())
        .collect::<HashSet<_>>()
        .into_iter()
        .collect();

    let mut user_name_by_user_id = HashMap::new();
    let mut user_phone_by_user_id = HashMap::new();

    if !user_ids.is_empty() {
        let users_collection: mongodb::Collection<AppUser> =
            client.database("Account").collection("Users");
        // A failed user lookup only costs the name/phone columns.
        match users_collection
            .find(doc! { "id_user": { "$in": user_ids.clone() } })
            .await
        {
            Ok(cursor) => match cursor.try_collect::<Vec<AppUser>>().await {
                Ok(users) => {
                    for user in users {
                        if let Some(name) = user.name_user.as_deref().map(str::trim) {
                            if !name.is_empty() {
                                user_name_by_user_id
                                    .insert(user.id_user.clone(), name.to_string());
                            }
                        }
                        if let Some(phone) = user.phone.as_deref().map(str::trim) {
                            if !phone.is_empty() {
                                user_phone_by_user_id
                                    .insert(user.id_user.clone(), phone.to_string());
                            }
                        }
                    }
                }
                Err(err) => eprintln!("Failed to collect log users: {:?}", err),
            },
            Err(err) => eprintln!("Failed to find log users: {:?}", err),
        }
    }

    let trip_count_by_user_id = trip_counts_by_user(&client, &user_ids).await;

    HttpResponse::Ok().json(LogData {
        logs,
        user_name_by_user_id,
        user_phone_by_user_id,
        trip_count_by_user_id,
    })
}
