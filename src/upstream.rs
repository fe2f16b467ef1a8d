use std::env;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use once_cell::sync::OnceCell;
use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, USER_AGENT};
use serde_json::Value;

const REQUEST_TIMEOUT_SECS: u64 = 10;

const FOTMOB_API_BASE: &str = "https://www.fotmob.com/api/";
const DEFAULT_TOKEN_URL: &str = "http://46.101.91.154:6006/";
const TOKEN_HEADER: &str = "x-mas";
const BROWSER_UA: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

static CLIENT: OnceCell<Client> = OnceCell::new();

pub fn http_client() -> Result<&'static Client> {
    CLIENT.get_or_try_init(|| {
        Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .context("failed to build http client")
    })
}

/// Forwards a relative lookup path to the fotmob API, attaching a freshly
/// fetched auth token. The token is never cached; its failure is the
/// request's failure.
pub fn fetch_upstream(path: &str) -> Result<String> {
    let client = http_client()?;
    let token = fetch_token(client).context("token fetch failed")?;

    let url = format!("{FOTMOB_API_BASE}{path}");
    let resp = client
        .get(&url)
        .header(USER_AGENT, BROWSER_UA)
        .header(ACCEPT, "application/json")
        .header(TOKEN_HEADER, token)
        .send()
        .context("request failed")?;
    let status = resp.status();
    let body = resp.text().context("failed reading body")?;
    if !status.is_success() {
        bail!("http {}: {}", status, body);
    }
    Ok(body)
}

fn fetch_token(client: &Client) -> Result<String> {
    let url = env::var("CARD_TOKEN_URL").unwrap_or_else(|_| DEFAULT_TOKEN_URL.to_string());
    let resp = client.get(&url).send().context("request failed")?;
    let status = resp.status();
    let body = resp.text().context("failed reading body")?;
    if !status.is_success() {
        bail!("http {}: {}", status, body);
    }
    parse_token_json(&body)
}

// The token endpoint is an undocumented third-party service; the only thing
// assumed about its response is a top-level "x-mas" string.
pub fn parse_token_json(raw: &str) -> Result<String> {
    let root: Value = serde_json::from_str(raw.trim()).context("invalid token json")?;
    let token = root
        .get(TOKEN_HEADER)
        .and_then(|v| v.as_str())
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());
    match token {
        Some(token) => Ok(token),
        None => bail!("token response missing {TOKEN_HEADER}"),
    }
}
