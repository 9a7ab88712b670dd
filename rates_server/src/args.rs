//! Command-line arguments for the rates server.
//!
//! Every flag can also be supplied through the environment variable named in
//! its help text; the command line wins when both are set.
use clap::Parser;
use rates_common::ExtractorConfig;
use rates_common::text::TokenPolicy;
use std::path::PathBuf;
use std::time::Duration;

use crate::fetcher::{FetcherKind, Readiness};
use crate::model::response::StalePolicy;
use crate::scheduler::{Cadence, Target};

/// Parsed command-line arguments.
#[derive(Debug, Parser)]
#[command(version, about = "Serves the latest rates extracted from a remote page", long_about = None)]
pub struct Args {
    /// Source page to extract rates from.
    #[clap(long, env = "RATES_URL", default_value = "http://anjujewellery.in/")]
    pub url: String,

    /// Address the HTTP API binds to.
    #[clap(long, env = "RATES_BIND", default_value = "0.0.0.0")]
    pub bind: String,

    /// Port the HTTP API listens on.
    #[clap(long, env = "PORT", default_value_t = 5000)]
    pub port: u16,

    /// Refresh period (fixed cadence) or idle gap between attempts (sequential cadence).
    #[clap(long, env = "RATES_INTERVAL_SECS", default_value_t = 30, value_parser = clap::value_parser!(u64).range(1..))]
    pub interval_secs: u64,

    /// How refresh attempts are spaced.
    #[clap(long, env = "RATES_CADENCE", value_enum, default_value_t = Cadence::Fixed)]
    pub cadence: Cadence,

    /// Hard upper bound for one fetch.
    #[clap(long, env = "RATES_TIMEOUT_SECS", default_value_t = 60, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout_secs: u64,

    /// Extra wait after the page settles, for late client-side rendering.
    #[clap(long, env = "RATES_SETTLE_MS", default_value_t = 5000)]
    pub settle_ms: u64,

    /// How the source page is fetched.
    #[clap(long, env = "RATES_FETCHER", value_enum, default_value_t = FetcherKind::Http)]
    pub fetcher: FetcherKind,

    /// Renderer executable used by the browser fetcher.
    #[clap(long, env = "BROWSER_PATH", default_value = "chromium")]
    pub browser_path: PathBuf,

    /// Comma-separated flags replacing the renderer's default headless flags.
    #[clap(long, env = "BROWSER_FLAGS", value_delimiter = ',', allow_hyphen_values = true)]
    pub browser_flags: Vec<String>,

    /// What the API serves while the latest attempt failed but older data exists.
    #[clap(long, env = "RATES_STALE", value_enum, default_value_t = StalePolicy::Serve)]
    pub stale: StalePolicy,

    /// Which value texts count as numbers.
    #[clap(long, env = "RATES_TOKENS", value_enum, default_value_t = TokenPolicy::Lenient)]
    pub tokens: TokenPolicy,
}

impl Args {
    /// Refresh interval.
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    /// Fetch target built from the URL and readiness flags.
    pub fn target(&self) -> Target {
        Target {
            url: self.url.trim().to_string(),
            readiness: Readiness {
                settle: Duration::from_millis(self.settle_ms),
                timeout: Duration::from_secs(self.timeout_secs),
            },
        }
    }

    /// Extractor configuration with the selected token policy.
    pub fn extractor_config(&self) -> ExtractorConfig {
        ExtractorConfig {
            token_policy: self.tokens,
            ..ExtractorConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_deployment() {
        let args = Args::try_parse_from(["rates_server"]).unwrap();
        assert_eq!(args.interval(), Duration::from_secs(30));
        assert_eq!(args.cadence, Cadence::Fixed);
        assert_eq!(args.fetcher, FetcherKind::Http);
        assert_eq!(args.stale, StalePolicy::Serve);
        assert!(args.browser_flags.is_empty());
        let target = args.target();
        assert_eq!(target.readiness.timeout, Duration::from_secs(60));
        assert_eq!(target.readiness.settle, Duration::from_millis(5000));
    }

    #[test]
    fn flags_override_defaults() {
        let args = Args::try_parse_from([
            "rates_server",
            "--url",
            " http://rates.test/ ",
            "--cadence",
            "sequential",
            "--fetcher",
            "browser",
            "--stale",
            "report",
            "--tokens",
            "strict",
            "--interval-secs",
            "5",
            "--browser-flags=--headless,--no-sandbox",
        ])
        .unwrap();
        assert_eq!(args.target().url, "http://rates.test/");
        assert_eq!(args.cadence, Cadence::Sequential);
        assert_eq!(args.fetcher, FetcherKind::Browser);
        assert_eq!(args.stale, StalePolicy::Report);
        assert_eq!(args.extractor_config().token_policy, TokenPolicy::Strict);
        assert_eq!(args.interval(), Duration::from_secs(5));
        assert_eq!(args.browser_flags, ["--headless", "--no-sandbox"]);
    }

    #[test]
    fn zero_interval_is_rejected() {
        assert!(Args::try_parse_from(["rates_server", "--interval-secs", "0"]).is_err());
    }

    #[test]
    fn choices_log_under_their_flag_values() {
        let args = Args::try_parse_from(["rates_server", "--fetcher", "browser"]).unwrap();
        assert_eq!(args.fetcher.to_string(), "browser");
        assert_eq!(args.stale.to_string(), "serve");
        assert_eq!(args.cadence.to_string(), "fixed");
    }
}
