mod api;
mod blockchain;
mod config;
mod error;
mod network;
mod transaction;

use actix_web::{App, HttpServer, web};
use dotenvy::dotenv;
use log::info;
use uuid::Uuid;

use api::AppState;
use blockchain::{ChainValidator, ProofOfWork};
use config::Config;
use network::{ConsensusResolver, HttpChainSource};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let _ = dotenv();
    env_logger::init();

    let config = Config::load();
    let node_id = Uuid::new_v4().simple().to_string();
    let pow = ProofOfWork::new(config.difficulty);

    println!(
        "⛓️ Starting ledger node {node_id} at http://{}:{}",
        config.host, config.port
    );
    info!(
        "difficulty={} peer_timeout={:?} peer_fetch_concurrency={}",
        pow.difficulty(),
        config.peer_timeout,
        config.peer_fetch_concurrency
    );

    let state = web::Data::new(AppState::new(node_id, pow));
    let (peer_timeout, concurrency) = (config.peer_timeout, config.peer_fetch_concurrency);

    HttpServer::new(move || {
        // awc clients are per-worker, so each worker gets its own resolver.
        let resolver = ConsensusResolver::new(
            HttpChainSource::new(peer_timeout),
            ChainValidator::new(pow),
            concurrency,
        );
        App::new()
            .app_data(state.clone())
            .app_data(web::Data::new(resolver))
            .configure(api::init_routes)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
