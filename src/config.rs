use clap::Parser;
use serde::Deserialize;

use crate::{
    error::{AppError, Result},
    reconciliation::{JointAccountCheck, Player},
    report::ReportFormat,
    source::Credential,
    up::DEFAULT_BASE_URL,
};

const DEFAULT_CONFIG_PATH: &str = "compte-joint.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub base_url: String,
    pub page_size: u32,
    pub joint_match: JointAccountCheck,
    pub format: ReportFormat,
    pub log_level: String,
    pub player_1_token: Option<String>,
    pub player_2_token: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            page_size: 100,
            joint_match: JointAccountCheck::Ordered,
            format: ReportFormat::Text,
            log_level: "info".to_string(),
            player_1_token: None,
            player_2_token: None,
        }
    }
}

impl AppConfig {
    pub fn credentials(&self) -> Result<(Credential, Credential)> {
        let token = |token: &Option<String>, player| match token.as_deref() {
            Some(token) if !token.trim().is_empty() => Ok(Credential::new(token.trim())),
            _ => Err(AppError::MissingToken(player)),
        };
        Ok((
            token(&self.player_1_token, Player::One)?,
            token(&self.player_2_token, Player::Two)?,
        ))
    }
}

/// Splits the money moving through shared accounts by the player it came
/// from or went to.
#[derive(Debug, Parser)]
#[command(name = "compte-joint", version)]
pub struct Args {
    /// Optional config file path (TOML).
    #[arg(long)]
    config: Option<String>,
    /// Override the banking API base URL.
    #[arg(long)]
    base_url: Option<String>,
    /// Transactions requested per page.
    #[arg(long)]
    page_size: Option<u32>,
    /// How joint account listings are compared: ordered or unordered.
    #[arg(long)]
    joint_match: Option<JointAccountCheck>,
    /// Report format: text or csv.
    #[arg(long)]
    format: Option<ReportFormat>,
    /// Log level used when RUST_LOG is not set.
    #[arg(long)]
    log_level: Option<String>,
    #[arg(long, env = "TOKEN1", hide_env_values = true)]
    player_1_token: Option<String>,
    #[arg(long, env = "TOKEN2", hide_env_values = true)]
    player_2_token: Option<String>,
}

pub fn load() -> Result<AppConfig> {
    resolve(Args::parse())
}

/// Layers the config file, `COMPTE_JOINT_*` variables and the command line,
/// later sources winning.
pub fn resolve(args: Args) -> Result<AppConfig> {
    let config_path = args.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);
    let mut builder = config::Config::builder();
    builder = builder.add_source(config::File::with_name(config_path).required(false));
    builder = builder
        .add_source(config::Environment::with_prefix("COMPTE_JOINT").try_parsing(true));
    let mut settings: AppConfig = builder.build()?.try_deserialize()?;

    if let Some(base_url) = args.base_url {
        settings.base_url = base_url;
    }
    if let Some(page_size) = args.page_size {
        settings.page_size = page_size;
    }
    if let Some(joint_match) = args.joint_match {
        settings.joint_match = joint_match;
    }
    if let Some(format) = args.format {
        settings.format = format;
    }
    if let Some(log_level) = args.log_level {
        settings.log_level = log_level;
    }
    if let Some(token) = args.player_1_token {
        settings.player_1_token = Some(token);
    }
    if let Some(token) = args.player_2_token {
        settings.player_2_token = Some(token);
    }

    Ok(settings)
}
