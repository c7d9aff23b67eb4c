use actix_web::{web, HttpResponse, Responder};
use futures::TryStreamExt;
use mongodb::bson::doc;
use mongodb::Client;
use std::sync::Arc;

use crate::models::dashboard::ClientRow;
use crate::models::trip::Trip;
use crate::models::user::AppUser;
use crate::services::trip_service::trip_counts_by_user;

/*
    /api/clients

    Users with at least one logged-in trip, sorted by name, each with the
    number of trips across all apps.
*/
pub async fn get_clients(data: web::Data<Arc<Client>>) -> impl Responder {
    let client = data.into_inner();
    let trips: mongodb::Collection<Trip> = client.database("Rides").collection("Trips");

    let user_ids: Vec<String> = match trips
        .distinct("user_id", doc! { "user_id": { "$ne": null } })
        .await
    {
        Ok(values) => values
            .iter()
            .filter_map(|value| value.as_str().map(str::to_string))
            .collect(),
        Err(err) => {
            eprintln!("Failed to list trip user ids: {:?}", err);
            return HttpResponse::InternalServerError().body("Failed to list clients");
        }
    };

    if user_ids.is_empty() {
        return HttpResponse::Ok().json(Vec::<ClientRow>::new());
    }

    let users_collection: mongodb::Collection<AppUser> =
        client.database("Account").collection("Users");

    let users = match users_collection
        .find(doc! { "id_user": { "$in": user_ids.clone() } })
        .await
    {
        Ok(cursor) => match cursor.try_collect::<Vec<AppUser>>().await {
            Ok(users) => users,
            Err(err) => {
                eprintln!("Failed to collect users: {:?}", err);
                return HttpResponse::InternalServerError().body("Failed to collect clients");
            }
        },
        Err(err) => {
            eprintln!("Failed to find users: {:?}", err);
            return HttpResponse::InternalServerError().body("Failed to find clients");
        }
    };

    let counts = trip_counts_by_user(&client, &user_ids).await;

    let mut rows: Vec<ClientRow> = users
        .into_iter()
        .map(|user| {
            let trip_count = counts.get(&user.id_user).copied().unwrap_or(0);
            ClientRow {
                id_user: user.id_user,
                name_user: user.name_user,
                phone: user.phone,
                email: user.email,
                trip_count,
            }
        })
        .collect();

    // Named clients first, alphabetically; unnamed ones at the end.
    rows.sort_by(|a, b| match (&a.name_user, &b.name_user) {
        (Some(a_name), Some(b_name)) => a_name.to_lowercase().cmp(&b_name.to_lowercase()),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });

    HttpResponse::Ok().json(rows)
}
