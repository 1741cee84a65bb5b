use actix_web::{HttpResponse, Responder, get, post, web};
use log::{info, warn};

use super::models::{AppState, RegisterNodesRequest, RegisterNodesResponse, ResolveResponse};
use crate::error::LedgerError;
use crate::network::{ConsensusResolver, HttpChainSource};

/// Register peers. The whole list is rejected if any entry is unparsable.
#[post("/nodes/register")]
pub async fn register_nodes(
    state: web::Data<AppState>,
    body: web::Json<RegisterNodesRequest>,
) -> Result<HttpResponse, LedgerError> {
    let Some(nodes) = body.into_inner().nodes.filter(|n| !n.is_empty()) else {
        warn!("POST /nodes/register - rejected: no node list");
        return Err(LedgerError::MissingNodes);
    };

    let mut registry = state.nodes.write().expect("registry lock poisoned");
    let added = registry.register_all(&nodes).inspect_err(|e| {
        warn!("POST /nodes/register - rejected: {e}");
    })?;
    info!(
        "POST /nodes/register - {added} new, {} known",
        registry.len()
    );

    Ok(HttpResponse::Created().json(RegisterNodesResponse {
        message: "New nodes have been added",
        total_nodes: registry.nodes(),
    }))
}

/// Run longest-valid-chain consensus against all known peers.
#[get("/nodes/resolve")]
pub async fn resolve_conflicts(
    state: web::Data<AppState>,
    resolver: web::Data<ConsensusResolver<HttpChainSource>>,
) -> impl Responder {
    let replaced = resolver.resolve(&state.ledger, &state.nodes).await;
    let chain = state
        .ledger
        .read()
        .expect("ledger lock poisoned")
        .chain()
        .to_vec();

    let resp = if replaced {
        ResolveResponse::Replaced {
            message: "Our chain was replaced",
            new_chain: chain,
        }
    } else {
        ResolveResponse::Authoritative {
            message: "Our chain is authoritative",
            chain,
        }
    };
    HttpResponse::Ok().json(resp)
}
