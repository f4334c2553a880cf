use std::path::PathBuf;
use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};
use chrono_tz::Tz;

use crate::deliver::SmtpSettings;

#[derive(Debug, Clone)]
pub struct Config {
    pub smtp: Option<SmtpSettings>,
    pub recipients: Vec<String>,
    pub timezone: Tz,
    pub max_results: usize,
    pub llm_timeout: Option<Duration>,
    pub narrative_concurrency: usize,
    pub tpl_select: String,
    pub tpl_narrative: String,
}

fn var(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<String> {
    lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn parsed<T: std::str::FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    match var(lookup, key) {
        Some(raw) => raw.parse().map_err(|e| anyhow!("{} has invalid value {:?}: {}", key, raw, e)),
        None => Ok(default),
    }
}

pub fn parse_recipients(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

impl Config {
    pub fn from_env(require_email: bool) -> Result<Self> {
        Self::from_lookup(|k| std::env::var(k).ok(), require_email)
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>, require_email: bool) -> Result<Self> {
        let address = var(&lookup, "EMAIL_ADDRESS");
        let password = var(&lookup, "EMAIL_PASSWORD");
        let recipients = var(&lookup, "RECEIVER_EMAILS")
            .map(|r| parse_recipients(&r))
            .unwrap_or_default();

        let smtp = match (address, password) {
            (Some(username), Some(password)) => Some(SmtpSettings {
                host: var(&lookup, "SMTP_HOST").unwrap_or_else(|| "smtp.gmail.com".to_string()),
                port: parsed(&lookup, "SMTP_PORT", 587u16)?,
                username,
                password,
            }),
            _ => None,
        };

        if require_email {
            let mut missing = Vec::new();
            if var(&lookup, "EMAIL_ADDRESS").is_none() {
                missing.push("EMAIL_ADDRESS");
            }
            if var(&lookup, "EMAIL_PASSWORD").is_none() {
                missing.push("EMAIL_PASSWORD");
            }
            if recipients.is_empty() {
                missing.push("RECEIVER_EMAILS");
            }
            if !missing.is_empty() {
                bail!("Missing required environment variables: {}", missing.join(", "));
            }
        }

        let timezone: Tz = parsed(&lookup, "DIGEST_TIMEZONE", chrono_tz::America::New_York)?;
        let llm_timeout = var(&lookup, "DIGEST_LLM_TIMEOUT_SECS")
            .map(|s| {
                s.parse::<u64>()
                    .map(Duration::from_secs)
                    .with_context(|| format!("DIGEST_LLM_TIMEOUT_SECS has invalid value {:?}", s))
            })
            .transpose()?;

        Ok(Self {
            smtp,
            recipients,
            timezone,
            max_results: parsed(&lookup, "DIGEST_MAX_RESULTS", 100usize)?,
            llm_timeout,
            narrative_concurrency: parsed(&lookup, "DIGEST_NARRATIVE_CONCURRENCY", 1usize)?.max(1),
            tpl_select: var(&lookup, "AJ_TEMPLATE_SELECT").unwrap_or_else(|| "arxiv_digest_select".to_string()),
            tpl_narrative: var(&lookup, "AJ_TEMPLATE_NARRATIVE")
                .unwrap_or_else(|| "arxiv_digest_narrative".to_string()),
        })
    }
}

/// Locate awful_aj's config: `--config`, else `AJ_CONFIG`, else
/// `<AJ_CONFIG_DIR or awful_aj config dir>/config.yaml`. Also points the
/// template loader at `<base>/templates` unless `AJ_TEMPLATE_DIR` is set.
pub fn resolve_aj_config(cli_override: Option<&str>) -> Result<PathBuf> {
    if let Some(p) = cli_override {
        return Ok(PathBuf::from(p));
    }

    let base_dir = if let Ok(dir) = std::env::var("AJ_CONFIG_DIR") {
        PathBuf::from(dir)
    } else {
        awful_aj::config_dir().map_err(|e| anyhow!(e.to_string()))?
    };

    if std::env::var("AJ_TEMPLATE_DIR").is_err() {
        // make it visible to awful_aj::template loader
        std::env::set_var("AJ_TEMPLATE_DIR", base_dir.join("templates"));
    }

    Ok(match std::env::var("AJ_CONFIG") {
        Ok(p) => PathBuf::from(p),
        Err(_) => base_dir.join("config.yaml"),
    })
}
