use std::path::{Path, PathBuf};

use clap::Parser;

/// Glossa protocol adapter
#[derive(Debug, Parser)]
#[command(
    name = "glossa",
    about = "Run a canonical chat-completion request against a provider without native function calling"
)]
pub struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "glossa.toml", env = "GLOSSA_CONFIG")]
    pub config: PathBuf,

    /// Provider to use instead of `default_provider`
    #[arg(short, long, env = "GLOSSA_PROVIDER")]
    pub provider: Option<String>,

    /// Override the request model
    #[arg(short, long)]
    pub model: Option<String>,

    /// Override the request temperature
    #[arg(short, long)]
    pub temperature: Option<f64>,

    /// Print the provider request body instead of sending it
    #[arg(long)]
    pub dry_run: bool,

    /// Log filter directive, e.g. `glossa_llm=debug`
    #[arg(long, default_value = "warn", env = "GLOSSA_LOG")]
    pub log_filter: String,

    /// Canonical request JSON file, `-` or absent for stdin
    pub request: Option<PathBuf>,
}

impl Args {
    /// Request file, `None` when reading stdin
    pub fn request_path(&self) -> Option<&Path> {
        self.request.as_deref().filter(|path| path.as_os_str() != "-")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let args = Args::try_parse_from(["glossa"]).unwrap();
        assert_eq!(args.config, PathBuf::from("glossa.toml"));
        assert!(!args.dry_run);
        assert!(args.request_path().is_none());
    }

    #[test]
    fn overrides_and_request_file() {
        let args = Args::try_parse_from([
            "glossa",
            "--provider",
            "deepseek",
            "--model",
            "deepseek-chat",
            "--temperature",
            "0.2",
            "--dry-run",
            "request.json",
        ])
        .unwrap();

        assert_eq!(args.provider.as_deref(), Some("deepseek"));
        assert_eq!(args.model.as_deref(), Some("deepseek-chat"));
        assert!(args.temperature.is_some_and(|t| (t - 0.2).abs() < f64::EPSILON));
        assert!(args.dry_run);
        assert_eq!(args.request_path(), Some(Path::new("request.json")));
    }

    #[test]
    fn dash_reads_stdin() {
        let args = Args::try_parse_from(["glossa", "-"]).unwrap();
        assert!(args.request_path().is_none());
    }
}
