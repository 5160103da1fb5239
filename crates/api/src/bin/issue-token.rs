//! Access token utility for Linkup
//!
//! Mints an access token for an existing user so the realtime endpoint can be
//! exercised without the REST login flow. Development use only.
//!
//! Usage:
//!   cargo run --bin issue-token -- <user-id> [user-name] [email]
//!
//! Reads ACCESS_TOKEN_SECRET and ACCESS_TOKEN_EXPIRY_HOURS from the
//! environment (or `.env`).

use linkup_api::auth::JwtManager;
use linkup_shared::UserProfile;
use std::env;
use uuid::Uuid;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let mut args = env::args().skip(1);
    let Some(raw_id) = args.next() else {
        eprintln!("Usage: issue-token <user-id> [user-name] [email]");
        std::process::exit(1);
    };

    let user_id: Uuid = raw_id
        .parse()
        .map_err(|e| format!("Invalid user id '{raw_id}': {e}"))?;
    let user_name = args.next().unwrap_or_else(|| "dev".to_string());
    let email = args.next().unwrap_or_else(|| format!("{user_name}@localhost"));

    let secret = env::var("ACCESS_TOKEN_SECRET").map_err(|_| "ACCESS_TOKEN_SECRET is not set")?;
    let expiry_hours = env::var("ACCESS_TOKEN_EXPIRY_HOURS")
        .ok()
        .and_then(|h| h.parse().ok())
        .unwrap_or(24);

    let jwt = JwtManager::new(&secret, expiry_hours);
    let token = jwt.generate_access_token(&UserProfile::new(user_id, user_name, email))?;

    println!("{token}");
    eprintln!("\nConnect with: ws://localhost:8000/ws?token=<token above>");

    Ok(())
}
