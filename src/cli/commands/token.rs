use serde_json::json;
use uuid::Uuid;

use crate::auth::{AuthKeys, Claims};
use crate::cli::OutputFormat;
use crate::config::config;

pub fn handle(sub: Option<String>, email: Option<String>, output_format: OutputFormat) -> anyhow::Result<()> {
    let security = &config().security;
    let keys = AuthKeys::new(security.jwt_secret.clone());

    let sub = sub.unwrap_or_else(|| Uuid::new_v4().to_string());
    let claims = Claims::new(sub, email, security.jwt_expiry_hours);
    let token = keys.generate_jwt(&claims)?;

    match output_format {
        OutputFormat::Text => println!("{}", token),
        OutputFormat::Json => println!(
            "{}",
            json!({
                "token": token,
                "sub": claims.sub,
                "expires_at": claims.exp,
            })
        ),
    }
    Ok(())
}
