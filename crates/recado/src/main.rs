//! recado — WhatsApp command webhook.
//!
//! Receives WhatsApp Cloud-API webhooks, interprets `TAREFA:` / `EVENTO:` /
//! `CONTATO:` commands, and writes the resulting records to Supabase on
//! behalf of the sender.

use std::sync::Arc;

use recado_core::{config::Config, interpreter::Interpreter, logging, ports::Store};
use recado_supabase::SupabaseStore;
use recado_webhook::server::{self, AppState};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init("recado");

    let cfg = Config::load()?;
    info!(
        supabase = %cfg.supabase_url,
        bind = %cfg.bind_addr,
        "starting webhook"
    );

    let store: Arc<dyn Store> = Arc::new(SupabaseStore::new(
        cfg.supabase_url.clone(),
        cfg.supabase_anon_key.clone(),
        cfg.store_timeout,
    ));
    let interpreter = Arc::new(Interpreter::new(store));

    let state = AppState { interpreter };

    tokio::select! {
        result = server::serve(state, cfg.bind_addr) => result?,
        _ = tokio::signal::ctrl_c() => info!("received Ctrl+C, shutting down"),
    }

    Ok(())
}
