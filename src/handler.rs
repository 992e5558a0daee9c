// HTTP handler bindings for the agent API endpoints
//
// This module provides thin wrapper functions that bind Rocket HTTP routes
// to the Bot's core logic methods. Handlers are responsible for:
// - Deserializing incoming JSON requests
// - Extracting Bot instance from Rocket's managed state
// - Delegating to Bot methods
// - Serializing responses

use rocket::http::Status;
use rocket::serde::json::Json;
use serde_json::Value;

use scroller_agent::bot::{Bot, EpisodeRequest, TickRequest};

/// GET / endpoint
/// Returns agent metadata
#[get("/")]
pub fn index(bot: &rocket::State<Bot>) -> Json<Value> {
    Json(bot.info())
}

/// POST /start endpoint
/// Called when an episode starts - creates the episode's agent
#[post("/start", format = "json", data = "<start_req>")]
pub fn start(bot: &rocket::State<Bot>, start_req: Json<EpisodeRequest>) -> Status {
    bot.start(&start_req.episode);

    Status::Ok
}

/// POST /act endpoint
/// Called each tick to compute and return the next action
#[post("/act", format = "json", data = "<act_req>")]
pub async fn act(bot: &rocket::State<Bot>, act_req: Json<TickRequest>) -> Json<Value> {
    let response = bot
        .act(&act_req.episode, act_req.tick, &act_req.percept)
        .await;

    Json(response)
}

/// POST /end endpoint
/// Called when an episode ends - drops the episode's agent
#[post("/end", format = "json", data = "<end_req>")]
pub fn end(bot: &rocket::State<Bot>, end_req: Json<EpisodeRequest>) -> Status {
    bot.end(&end_req.episode);

    Status::Ok
}
