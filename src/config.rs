use crate::widget::ContentPolicy;
use clap::Parser;
use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file path
    #[arg(short, long, env = "CONFIG_FILE")]
    pub config: Option<String>,

    /// Port to listen on
    #[arg(long, env = "PORT")]
    pub port: Option<u16>,

    /// Endpoint the widget sends messages to
    #[arg(long, env = "RESPONDER_URL")]
    pub responder_url: Option<Url>,

    /// How bot replies are inserted into the transcript
    #[arg(long, value_enum, env = "CONTENT_POLICY")]
    pub content_policy: Option<ContentPolicy>,

    /// Emit logs as JSON
    #[arg(long, env = "LOG_JSON")]
    pub log_json: Option<bool>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub responder: ResponderConfig,
    pub widget: WidgetConfig,
    pub directory: DirectoryConfig,
    pub log: LogConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
    /// Origins allowed to call `/api/*` from a browser.
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ResponderConfig {
    pub url: Url,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl ResponderConfig {
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct WidgetConfig {
    pub content_policy: ContentPolicy,
    pub session_idle_secs: u64,
}

impl WidgetConfig {
    #[must_use]
    pub fn session_idle(&self) -> Duration {
        Duration::from_secs(self.session_idle_secs)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct DirectoryConfig {
    pub enabled: bool,
    pub data_path: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LogConfig {
    pub json: bool,
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from_args(std::env::args())
    }

    pub fn load_from_args<I, T>(args: I) -> Result<Self, config::ConfigError>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let cli =
            Cli::try_parse_from(args).map_err(|e| config::ConfigError::Message(e.to_string()))?;

        // 1. Defaults
        let mut builder = Config::builder()
            .set_default("server.port", 3000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.allowed_origins", Vec::<String>::new())?
            .set_default("responder.url", "http://127.0.0.1:3000/api/chat")?
            .set_default("widget.content_policy", "markup")?
            .set_default("widget.session_idle_secs", 30 * 60)?
            .set_default("directory.enabled", true)?
            .set_default("directory.data_path", "data/centros_saude.csv")?
            .set_default("log.json", false)?;

        // 2. Config file: explicit path, else ./config.yaml if present
        builder = match &cli.config {
            Some(path) => builder.add_source(File::with_name(path)),
            None => builder.add_source(File::with_name("config").required(false)),
        };

        // 3. Environment, e.g. CHAT__SERVER__PORT=8000
        builder = builder.add_source(
            Environment::with_prefix("CHAT")
                .prefix_separator("__")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("server.allowed_origins")
                .try_parsing(true),
        );

        // 4. CLI flags (and their env aliases) win
        if let Some(port) = cli.port {
            builder = builder.set_override("server.port", port)?;
        }
        if let Some(url) = &cli.responder_url {
            builder = builder.set_override("responder.url", url.as_str())?;
        }
        if let Some(policy) = cli.content_policy {
            let value = match policy {
                ContentPolicy::Markup => "markup",
                ContentPolicy::Escape => "escape",
            };
            builder = builder.set_override("widget.content_policy", value)?;
        }
        if let Some(json) = cli.log_json {
            builder = builder.set_override("log.json", json)?;
        }

        builder.build()?.try_deserialize()
    }
}
