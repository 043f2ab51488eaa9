//! Super admin bootstrap
//!
//! Creates the first cross-tenant operator. Aucune route HTTP ne peut créer
//! de super admin ; ce binaire est le seul chemin d'amorçage.
//!
//! Usage:
//!   DATABASE_URL=... ./seed-admin --email admin@example.com --password 'S3cret!!' \
//!       --first-name Admin --last-name System
//!
//! Idempotent : si un compte existe déjà pour cet email (hors tenant), il
//! est laissé tel quel.

use anyhow::{Context, Result};
use clap::Parser;
use sqlx::postgres::PgPoolOptions;
use std::env;
use uuid::Uuid;

use cordia_api::services::password;

#[derive(Parser)]
#[command(name = "seed-admin", about = "Crée le premier super admin")]
struct Args {
    #[arg(long)]
    email: String,
    #[arg(long)]
    password: String,
    #[arg(long, default_value = "Admin")]
    first_name: String,
    #[arg(long, default_value = "System")]
    last_name: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let args = Args::parse();
    let database_url = env::var("DATABASE_URL").context("DATABASE_URL required")?;

    if !args.email.contains('@') {
        anyhow::bail!("email invalide : {}", args.email);
    }
    if args.password.len() < 8 {
        anyhow::bail!("le mot de passe doit contenir au moins 8 caractères");
    }

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .context("Failed to connect to database")?;

    let email = args.email.trim().to_lowercase();

    let existing: Option<Uuid> = sqlx::query_scalar(
        "SELECT id FROM users WHERE email = $1 AND tenant_id IS NULL",
    )
    .bind(&email)
    .fetch_optional(&pool)
    .await?;

    if let Some(id) = existing {
        println!("Super admin déjà présent : {email} ({id})");
        return Ok(());
    }

    let password_hash = password::hash(&args.password)?;

    let id: Uuid = sqlx::query_scalar(
        "INSERT INTO users (email, password_hash, first_name, last_name, is_super_admin)
         VALUES ($1, $2, $3, $4, TRUE)
         RETURNING id",
    )
    .bind(&email)
    .bind(&password_hash)
    .bind(args.first_name.trim())
    .bind(args.last_name.trim())
    .fetch_one(&pool)
    .await?;

    println!("Super admin créé : {email} ({id})");
    Ok(())
}
