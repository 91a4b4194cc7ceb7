//! Headless PDV client: restores (or creates) a session and dumps the catalog.

use anyhow::Context;

use pdv_auth::Credentials;
use pdv_client::{ClientConfig, FileStorage, PdvClient, RecordingNavigator, SessionGuard};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    pdv_observability::init();

    let config = ClientConfig::from_env();

    let storage_path = match std::env::var("PDV_SESSION_FILE") {
        Ok(path) => std::path::PathBuf::from(path),
        Err(_) => FileStorage::default_path()?,
    };
    let storage = FileStorage::open(&storage_path)
        .with_context(|| format!("failed to open session store at {:?}", storage_path))?;

    let navigator = RecordingNavigator::at("/login");
    let guard = SessionGuard::load(storage, navigator.clone(), config.storage_keys.clone())?.into_shared();
    let client = PdvClient::new(config, guard.clone())?;

    let authenticated = pdv_client::guard::lock(&guard).is_authenticated();
    if authenticated {
        tracing::info!("reusing persisted session");
    } else {
        let login = std::env::var("PDV_LOGIN").context("PDV_LOGIN not set and no valid session stored")?;
        let password = std::env::var("PDV_PASSWORD").context("PDV_PASSWORD not set")?;
        client.login(Credentials::new(login, password)).await?;
    }

    let products = client.list_products().await?;
    tracing::info!(
        count = products.len(),
        low_stock = products.iter().filter(|p| p.is_low_stock()).count(),
        landing = ?navigator.last(),
        "catalog loaded"
    );
    println!("{}", serde_json::to_string_pretty(&products)?);

    Ok(())
}
