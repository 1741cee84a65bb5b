mod chain;
mod mining;
pub mod models;
mod nodes;
mod tx;

use actix_web::web::ServiceConfig;

pub use models::AppState;

pub fn init_routes(cfg: &mut ServiceConfig) {
    cfg.service(chain::full_chain)
        .service(chain::validate_chain)
        .service(tx::new_transaction)
        .service(tx::pending_transactions)
        .service(mining::mine)
        .service(nodes::register_nodes)
        .service(nodes::resolve_conflicts);
}
