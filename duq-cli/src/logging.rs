//! Tracing setup
//!
//! Logging has to be running before the site config is loaded so config
//! fallback warnings reach stderr, but the configured level is only known
//! afterwards. The filter therefore starts at `RUST_LOG` (or `warn`) and is
//! swapped for `logging.level` once the config is in hand, unless `RUST_LOG`
//! was set.

use std::path::Path;

use anyhow::{Context, Result};
use duq_common::config::{load_site_config, SiteConfig};
use tracing::Subscriber;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{reload, EnvFilter, Registry};

/// Level used until a site config says otherwise
const STARTUP_LEVEL: &str = "warn";

/// Handle for replacing the startup filter
pub struct LogLevel {
    handle: reload::Handle<EnvFilter, Registry>,
    from_env: bool,
}

impl LogLevel {
    /// Switch to the configured level; `RUST_LOG` keeps priority
    pub fn apply(&self, config: &SiteConfig) -> Result<()> {
        if self.from_env {
            return Ok(());
        }
        self.handle
            .reload(EnvFilter::new(&config.logging.level))
            .context("Failed to apply configured log level")
    }
}

/// Subscriber writing to `writer`, filtered by `rust_log` or the startup level
pub fn subscriber<W>(rust_log: Option<&str>, writer: W) -> (impl Subscriber + Send + Sync + 'static, LogLevel)
where
    W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    let from_env = rust_log.is_some();
    let filter = EnvFilter::new(rust_log.unwrap_or(STARTUP_LEVEL));
    let (filter, handle) = reload::Layer::new(filter);

    let subscriber = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(writer));

    (subscriber, LogLevel { handle, from_env })
}

/// Load the site config with logging already live, then apply its level
pub fn load_config(cli_arg: Option<&Path>, level: &LogLevel) -> Result<SiteConfig> {
    // Only an explicit --config can fail here
    let config = load_site_config(cli_arg).context("Failed to load site config")?;
    level.apply(&config)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use duq_common::config::CONFIG_ENV_VAR;
    use serial_test::serial;
    use std::io;
    use std::sync::{Arc, Mutex};
    use tempfile::TempDir;

    /// Shared in-memory log sink
    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl Captured {
        fn text(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn capture(rust_log: Option<&str>) -> (impl Subscriber + Send + Sync + 'static, LogLevel, Captured) {
        let captured = Captured::default();
        let sink = captured.clone();
        let (subscriber, level) = subscriber(rust_log, move || sink.clone());
        (subscriber, level, captured)
    }

    #[test]
    #[serial]
    fn test_env_config_fallback_is_logged() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("missing.toml");
        let (subscriber, level, captured) = capture(None);

        std::env::set_var(CONFIG_ENV_VAR, &missing);
        let result = tracing::subscriber::with_default(subscriber, || load_config(None, &level));
        std::env::remove_var(CONFIG_ENV_VAR);

        assert!(result.is_ok());
        let logs = captured.text();
        assert!(logs.contains("WARN"), "{}", logs);
        assert!(logs.contains("Ignoring DUQ_CONFIG="), "{}", logs);
    }

    #[test]
    fn test_configured_level_applies_after_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("site.toml");
        std::fs::write(&path, "site_key = \"chatty\"\n[logging]\nlevel = \"info\"\n").unwrap();
        let (subscriber, level, captured) = capture(None);

        tracing::subscriber::with_default(subscriber, || {
            tracing::info!("before config");
            let config = load_config(Some(&path), &level).unwrap();
            tracing::info!("after config for {}", config.site_key);
        });

        let logs = captured.text();
        assert!(!logs.contains("before config"), "{}", logs);
        assert!(logs.contains("after config for chatty"), "{}", logs);
    }

    #[test]
    fn test_rust_log_overrides_configured_level() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("site.toml");
        std::fs::write(&path, "site_key = \"quiet\"\n[logging]\nlevel = \"error\"\n").unwrap();
        let (subscriber, level, captured) = capture(Some("info"));

        tracing::subscriber::with_default(subscriber, || {
            load_config(Some(&path), &level).unwrap();
            tracing::info!("still visible");
        });

        let logs = captured.text();
        assert!(logs.contains("Loading site config from"), "{}", logs);
        assert!(logs.contains("still visible"), "{}", logs);
    }
}
