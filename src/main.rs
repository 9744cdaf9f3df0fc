extern crate rocket;

use chargenode_controller::config::{read_config, Config};
use chargenode_controller::node::NodeClient;
use chargenode_controller::routes;
use chargenode_controller::service::ChargeNodeService;
use chargenode_controller::state::AppState;
use std::sync::Arc;

#[rocket::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = std::env::var("APP_CONFIG").unwrap_or_else(|_| "config.toml".to_string());
    let config: Config = read_config(&config_path)?;

    let node_client = NodeClient::new(config.node.request_timeout())?;
    let (charge_node, updates) = ChargeNodeService::spawn(config.node, config.app, node_client);

    let app_state = Arc::new(AppState::new(charge_node));
    AppState::watch_updates(&app_state, updates);

    let _ = rocket::build()
        .mount("/charge-node", routes::charge_node::routes())
        .manage(app_state)
        .launch()
        .await?;

    Ok(())
}
