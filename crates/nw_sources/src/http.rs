use std::time::Duration;

use nw_core::Result;
use reqwest::Client;

/// Some publishers refuse requests carrying reqwest's default agent.
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0";

pub fn build_client(timeout: Duration) -> Result<Client> {
    Ok(Client::builder().timeout(timeout).build()?)
}

pub fn browser_client(timeout: Duration) -> Result<Client> {
    Ok(Client::builder()
        .timeout(timeout)
        .user_agent(BROWSER_USER_AGENT)
        .build()?)
}
