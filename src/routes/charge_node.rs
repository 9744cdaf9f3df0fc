use rocket::http::Status;
use rocket::response::content::RawHtml;
use rocket::response::status::Custom;
use rocket::serde::json::Json;
use rocket::{get, post, routes, State};
use std::sync::Arc;

use crate::models::{Command, Credentials};
use crate::state::{AppState, StatusView};

fn submit(state: &AppState, command: Command) -> Result<Status, Custom<String>> {
    state
        .submit(command)
        .map(|_| Status::Accepted)
        .map_err(|e| Custom(Status::ServiceUnavailable, e.to_string()))
}

#[get("/status")]
pub async fn get_status(state: &State<Arc<AppState>>) -> Json<StatusView> {
    Json(state.status().await)
}

/// Page shown by the dashboard for the current display marker
#[get("/page")]
pub async fn get_page(state: &State<Arc<AppState>>) -> RawHtml<&'static str> {
    RawHtml(state.status().await.status.marker.html())
}

/// Toggles the connection; credentials are only needed when offline.
#[post("/connect", data = "<credentials>")]
pub async fn connect(
    credentials: Option<Json<Credentials>>,
    state: &State<Arc<AppState>>,
) -> Result<Status, Custom<String>> {
    submit(state, Command::Connect(credentials.map(Json::into_inner)))
}

#[post("/charge/start")]
pub async fn charge_start(state: &State<Arc<AppState>>) -> Result<Status, Custom<String>> {
    submit(state, Command::ChargeStart)
}

#[post("/charge/stop")]
pub async fn charge_stop(state: &State<Arc<AppState>>) -> Result<Status, Custom<String>> {
    submit(state, Command::ChargeStop)
}

#[post("/keep-alive")]
pub async fn keep_alive(state: &State<Arc<AppState>>) -> Result<Status, Custom<String>> {
    submit(state, Command::KeepAlive)
}

#[post("/suspend")]
pub async fn suspend(state: &State<Arc<AppState>>) -> Result<Status, Custom<String>> {
    submit(state, Command::Suspend)
}

#[post("/resume")]
pub async fn resume(state: &State<Arc<AppState>>) -> Result<Status, Custom<String>> {
    submit(state, Command::Resume)
}

pub fn routes() -> Vec<rocket::Route> {
    routes![
        get_status,
        get_page,
        connect,
        charge_start,
        charge_stop,
        keep_alive,
        suspend,
        resume
    ]
}
