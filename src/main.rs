//! Wiring & DI. Entry point: bootstrap adapters, inject into services, run UI.
//! No business logic here.

use clinic_admin::adapters::clock::SystemClock;
use clinic_admin::adapters::local::LocalAuthAdapter;
use clinic_admin::adapters::persistence::{SqliteMembershipStore, StateJson};
use clinic_admin::adapters::supabase::{
    SupabaseAuthAdapter, SupabaseClient, SupabaseMembershipStore,
};
use clinic_admin::adapters::ui::tui::TuiInputPort;
use clinic_admin::domain::GuardStatus;
use clinic_admin::ports::{AuthPort, Clock, InputPort, MembershipStore, StatePort};
use clinic_admin::shared::config::AppConfig;
use clinic_admin::usecases::{
    ActionAuthorizer, AttemptGuardService, AuthService, MembershipService,
};
use dotenv::dotenv;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let env_loaded = dotenv();
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    match &env_loaded {
        Ok(path) => info!(path = %path.display(), "loaded .env"),
        Err(_) => info!(cwd = %cwd.display(), "no .env found (check CWD)"),
    }

    let cfg = AppConfig::load().map_err(|e| anyhow::anyhow!("invalid configuration: {}", e))?;

    let data_path = cfg.data_dir_or_default();
    tokio::fs::create_dir_all(&data_path)
        .await
        .map_err(|e| anyhow::anyhow!("create data dir {}: {}", data_path.display(), e))?;
    let data_dir_abs = data_path
        .canonicalize()
        .unwrap_or_else(|_| data_path.clone());
    info!(path = %data_dir_abs.display(), "data directory");

    // --- Local state: guard counters, deadlines, auth flag ---
    let state_impl = StateJson::new(cfg.state_path());
    state_impl
        .load()
        .await
        .map_err(|e| anyhow::anyhow!("{}", e))?;
    let state: Arc<dyn StatePort> = Arc::new(state_impl);
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    // --- Backend: hosted when configured, local libsql file otherwise ---
    let (auth_port, store, backend): (Arc<dyn AuthPort>, Arc<dyn MembershipStore>, String) =
        if cfg.is_supabase_configured() {
            let url = cfg.supabase_url.clone().unwrap_or_default();
            let key = cfg.supabase_anon_key.clone().unwrap_or_default();
            let client = Arc::new(SupabaseClient::new(url, key));
            info!(url = %client.base_url(), "using hosted membership backend");
            let backend = client.base_url().to_string();
            (
                Arc::new(SupabaseAuthAdapter::new(Arc::clone(&client))) as Arc<dyn AuthPort>,
                Arc::new(SupabaseMembershipStore::new(client)) as Arc<dyn MembershipStore>,
                backend,
            )
        } else {
            warn!("SUPABASE_URL / SUPABASE_ANON_KEY not set or placeholders; using local store");
            let local_auth = LocalAuthAdapter::new(
                cfg.local_admin_email.clone(),
                cfg.local_admin_password.clone(),
            );
            if !local_auth.is_configured() {
                warn!(
                    "CLINIC_ADMIN_LOCAL_ADMIN_EMAIL / CLINIC_ADMIN_LOCAL_ADMIN_PASSWORD not set; sign-in will fail"
                );
            }
            let sqlite = SqliteMembershipStore::connect(&data_path)
                .await
                .map_err(|e| anyhow::anyhow!("SQLite connect failed: {}", e))?;
            let backend = format!("local ({})", sqlite.db_path().display());
            (
                Arc::new(local_auth) as Arc<dyn AuthPort>,
                Arc::new(sqlite) as Arc<dyn MembershipStore>,
                backend,
            )
        };

    clinic_admin::adapters::ui::init_ui(&backend);

    // --- Guards (restored from state; expired lockouts cleared) ---
    let login_guard = Arc::new(AttemptGuardService::login(
        Arc::clone(&state),
        Arc::clone(&clock),
    ));
    let pin_guard = Arc::new(AttemptGuardService::action_pin(
        Arc::clone(&state),
        Arc::clone(&clock),
    ));
    for (name, guard) in [("login", &login_guard), ("action_pin", &pin_guard)] {
        let status = guard.load().await.map_err(|e| anyhow::anyhow!("{}", e))?;
        if let GuardStatus::Locked { remaining_secs } = status {
            warn!(guard = name, remaining_secs, "guard is locked from a previous run");
        }
    }

    // --- Services ---
    let auth_service = Arc::new(AuthService::new(
        auth_port,
        login_guard,
        Arc::clone(&state),
    ));
    let membership_service = Arc::new(MembershipService::new(
        store,
        cfg.export_dir_or_default(),
    ));
    let authorizer = Arc::new(ActionAuthorizer::new(pin_guard, cfg.action_pin()));

    let input_port: Arc<dyn InputPort> = Arc::new(TuiInputPort::new(
        auth_service,
        membership_service,
        authorizer,
    ));

    // --- Run (login -> admin menu) ---
    input_port
        .run()
        .await
        .map_err(|e| anyhow::anyhow!("{}", e))?;

    Ok(())
}
