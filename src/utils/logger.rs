use tracing_subscriber::fmt::Layer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_FILTER: &str = "garden_stock=info";
const VERBOSE_FILTER: &str = "garden_stock=debug,tower_http=debug,info";

/// `RUST_LOG` wins over the built-in directives.
fn env_filter(default_directives: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directives))
}

/// Bare message lines: no target, thread, file or line decorations.
fn plain_layer<S>() -> Layer<S> {
    tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
}

pub fn init_cli_logger(verbose: bool) {
    let filter = env_filter(if verbose { VERBOSE_FILTER } else { DEFAULT_FILTER });

    tracing_subscriber::registry()
        .with(filter)
        .with(plain_layer().compact())
        .init();
}

/// JSON lines for log collectors in container deployments.
pub fn init_json_logger() {
    tracing_subscriber::registry()
        .with(env_filter(DEFAULT_FILTER))
        .with(plain_layer().json())
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_directives_parse() {
        assert!(DEFAULT_FILTER.parse::<EnvFilter>().is_ok());
        assert!(VERBOSE_FILTER.parse::<EnvFilter>().is_ok());
    }

    #[test]
    fn test_shared_layer_builds_both_formats() {
        let compact = tracing_subscriber::registry()
            .with(EnvFilter::new(VERBOSE_FILTER))
            .with(plain_layer().compact());
        tracing::subscriber::with_default(compact, || tracing::debug!("compact line"));

        let json = tracing_subscriber::registry()
            .with(EnvFilter::new(DEFAULT_FILTER))
            .with(plain_layer().json());
        tracing::subscriber::with_default(json, || tracing::info!("json line"));
    }
}
