use actix_web::{web, HttpResponse, Responder};
use futures::TryStreamExt;
use mongodb::bson::doc;
use mongodb::Client;
use std::sync::Arc;

use crate::models::config::ConfigEntry;

/*
    /api/configs
*/
pub async fn get_configs(data: web::Data<Arc<Client>>) -> impl Responder {
    let client = data.into_inner();
    let collection: mongodb::Collection<ConfigEntry> =
        client.database("App").collection("Settings");

    match collection.find(doc! {}).sort(doc! { "key": 1 }).await {
        Ok(cursor) => match cursor.try_collect::<Vec<ConfigEntry>>().await {
            Ok(entries) => HttpResponse::Ok().json(entries),
            Err(err) => {
                eprintln!("Failed to collect settings: {:?}", err);
                HttpResponse::InternalServerError().body("Failed to collect settings")
            }
        },
        Err(err) => {
            eprintln!("Failed to find settings: {:?}", err);
            HttpResponse::InternalServerError().body("Failed to find settings")
        }
    }
}
