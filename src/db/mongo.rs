use mongodb::{
    options::{ClientOptions, ServerApi, ServerApiVersion},
    Client,
};
use std::sync::Arc;
use std::time::Duration;

const CONNECT_TIMEOUT_SECS: u64 = 10;
const MAX_POOL_SIZE: u32 = 10;

/// Build the shared client handle injected into every handler. The handle
/// is cheap to clone and owns the connection pool; handlers never create
/// their own connections.
pub async fn create_mongo_client(uri: &String) -> Arc<Client> {
    let mut client_options = ClientOptions::parse(uri)
        .await
        .expect("MongoDB URI may be incorrect! Failed to parse.");

    client_options.connect_timeout = Some(Duration::from_secs(CONNECT_TIMEOUT_SECS));
    client_options.server_selection_timeout = Some(Duration::from_secs(CONNECT_TIMEOUT_SECS));
    client_options.max_pool_size = Some(MAX_POOL_SIZE);
    client_options.min_pool_size = Some(1);

    // Stable API so a cluster upgrade does not change query behavior
    client_options.server_api = Some(ServerApi::builder().version(ServerApiVersion::V1).build());

    let client =
        Client::with_options(client_options).expect("Failed to create MongoDB client with options");

    // Connections are lazy; ping once so a bad deployment shows up in the
    // startup log instead of on the first dashboard request.
    match client
        .database("Rides")
        .run_command(mongodb::bson::doc! {"ping": 1})
        .await
    {
        Ok(_) => println!("Successfully connected to MongoDB and verified with ping command"),
        Err(e) => {
            eprintln!("WARNING: MongoDB ping failed: {}", e);
            eprintln!("The API may still work, but some functionality might be impaired");
        }
    }

    Arc::new(client)
}
