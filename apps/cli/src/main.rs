use std::sync::Arc;

use anyhow::Context;
use dotenv::dotenv;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use appointment_cell::services::{AppointmentStatsService, AppointmentStore};
use auth_cell::services::AuthService;
use shared_config::AppConfig;

/// Smoke client: log in with the credentials from the environment and print
/// the patient's appointments and dashboard counters.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Loading Env Vars
    dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Careline client");

    let config = Arc::new(AppConfig::from_env());
    let email = std::env::var("CLINIC_EMAIL").context("CLINIC_EMAIL not set")?;
    let password = std::env::var("CLINIC_PASSWORD").context("CLINIC_PASSWORD not set")?;

    let auth = AuthService::new(Arc::clone(&config));
    let session = auth.login(&email, &password).await?;
    info!("Logged in as {}", session.user.display_name());

    let store = AppointmentStore::new(session.api());
    let appointments = store.list_appointments(session.local_id()).await?;
    for appointment in &appointments {
        info!(
            "{} — {} [{}] {}",
            appointment.schedule_label(),
            appointment.doctor_name,
            appointment.status,
            appointment.description
        );
    }

    let stats = AppointmentStatsService::new(session.api());
    let counters = stats.refresh(session.local_id()).await;
    info!(
        "{} appointments total, {} today, {} pending",
        counters.total, counters.today, counters.pending
    );

    auth.logout(session);
    Ok(())
}
