//! Example showing how to wire the LinkedIn adapter into a host
//!
//! This example demonstrates:
//! 1. Loading the adapter configuration from `linkedin.toml` and `LINKEDIN_*` variables
//! 2. Building the authorization and callback URLs
//! 3. Verifying an access token obtained by the host's code exchange
//!
//! Run with `LINKEDIN_ACCESS_TOKEN=<token>` to fetch a real profile.

use ras_identity_linkedin::{CallbackContext, IdentityProvider, LinkedInConfig, LinkedInProvider};
use std::path::Path;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let config = LinkedInConfig::load(Some(Path::new("linkedin.toml")))?;
    config.validate()?;

    let provider = LinkedInProvider::new(config)?;

    println!("LinkedIn Example - {} API", provider.config().api_version);
    println!("==============================");

    let context = CallbackContext::new("http://localhost:3000", "");
    let callback_url = provider.callback_url(&context);
    println!("\nCallback URL: {}", callback_url);

    // The host engine generates and later checks the state value
    let authorization_url = provider.authorization_url(&callback_url, "example-state")?;
    println!("Authorization URL: {}", authorization_url);

    let Ok(access_token) = std::env::var("LINKEDIN_ACCESS_TOKEN") else {
        println!("\nSet LINKEDIN_ACCESS_TOKEN to fetch and normalize a profile.");
        return Ok(());
    };

    let payload = serde_json::json!({
        "provider": provider.provider_id(),
        "access_token": access_token,
    });

    match provider.verify(payload).await {
        Ok(identity) => {
            println!("\nUID: {}", identity.uid);
            println!("Name: {:?}", identity.info.name);
            println!("Email: {:?}", identity.info.email);
            println!("Headline: {:?}", identity.info.description);
            println!("Raw profile: {}", identity.extra["raw_profile"]);
        }
        Err(e) => {
            println!("\nVerification failed: {}", e);
        }
    }

    Ok(())
}
