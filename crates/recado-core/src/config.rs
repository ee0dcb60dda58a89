use std::{
    env, fs,
    net::SocketAddr,
    path::Path,
    time::Duration,
};

use crate::{errors::Error, Result};

/// Typed runtime configuration, loaded from the environment (with optional
/// `.env` file support, which never overrides variables already set).
#[derive(Clone, Debug)]
pub struct Config {
    /// Supabase project URL, e.g. `https://abc123.supabase.co`.
    pub supabase_url: String,
    pub supabase_anon_key: String,

    /// Address the webhook server binds to.
    pub bind_addr: SocketAddr,

    /// Per-request timeout for identity lookups and inserts.
    pub store_timeout: Duration,
}

impl Config {
    pub fn load() -> Result<Self> {
        load_dotenv_if_present(Path::new(".env"));

        let supabase_url = env_str("SUPABASE_URL")
            .and_then(non_empty)
            .ok_or_else(|| {
                Error::Config("SUPABASE_URL environment variable is required".to_string())
            })?
            .trim_end_matches('/')
            .to_string();

        let supabase_anon_key = env_str("SUPABASE_ANON_KEY")
            .and_then(non_empty)
            .ok_or_else(|| {
                Error::Config("SUPABASE_ANON_KEY environment variable is required".to_string())
            })?;

        let bind_addr = env_str("BIND_ADDR")
            .unwrap_or_else(|| "0.0.0.0:8787".to_string())
            .parse::<SocketAddr>()
            .map_err(|e| Error::Config(format!("invalid BIND_ADDR: {e}")))?;

        let store_timeout = Duration::from_millis(env_u64("STORE_TIMEOUT_MS").unwrap_or(10_000));

        Ok(Self {
            supabase_url,
            supabase_anon_key,
            bind_addr,
            store_timeout,
        })
    }
}

fn load_dotenv_if_present(path: &Path) {
    let Ok(contents) = fs::read_to_string(path) else {
        return;
    };

    for raw in contents.lines() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some((k, v)) = line.split_once('=') else {
            continue;
        };

        let key = k.trim();
        if key.is_empty() {
            continue;
        }
        if env::var_os(key).is_some() {
            continue; // do not override existing env
        }

        let mut val = v.trim().to_string();
        // Strip optional surrounding quotes.
        if val.len() >= 2
            && ((val.starts_with('"') && val.ends_with('"'))
                || (val.starts_with('\'') && val.ends_with('\'')))
        {
            val = val[1..val.len() - 1].to_string();
        }

        env::set_var(key, val);
    }
}

fn env_str(key: &str) -> Option<String> {
    env::var(key).ok()
}

fn env_u64(key: &str) -> Option<u64> {
    env_str(key).and_then(|s| s.trim().parse::<u64>().ok())
}

fn non_empty(s: String) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s)
    }
}
