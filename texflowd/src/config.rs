use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    /// Port the server listens on
    pub port: u16,
    /// Root directory under which per-request workspaces are created
    pub workspace_root: PathBuf,
    /// Renderer executable (pdflatex or compatible)
    pub renderer_bin: String,
    /// Bibliography resolver executable
    pub bibtex_bin: String,
    /// Budget applied when a request omits `timeout`
    pub default_timeout: Duration,
    /// Hard ceiling any requested budget is clamped to
    pub max_timeout: Duration,
    /// Fixed budget for the bibliography pass, independent of the
    /// user-requested budget
    pub bib_timeout: Duration,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Self {
            port: env_parse("TEXFLOW_PORT", 8080)?,
            workspace_root: PathBuf::from(env_str(
                "TEXFLOW_WORKSPACE_ROOT",
                "/tmp/texflow_compilations",
            )),
            renderer_bin: env_str("TEXFLOW_RENDERER_BIN", "pdflatex"),
            bibtex_bin: env_str("TEXFLOW_BIBTEX_BIN", "bibtex"),
            default_timeout: Duration::from_secs(env_parse("TEXFLOW_DEFAULT_TIMEOUT_SECS", 30)?),
            max_timeout: Duration::from_secs(env_parse("TEXFLOW_MAX_TIMEOUT_SECS", 300)?),
            bib_timeout: Duration::from_secs(env_parse("TEXFLOW_BIB_TIMEOUT_SECS", 30)?),
        })
    }
}

fn env_str(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> anyhow::Result<T>
where
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(val) => val
            .parse::<T>()
            .map_err(|e| anyhow::anyhow!("Failed to parse env var {key}={val}: {e}")),
        Err(_) => Ok(default),
    }
}
