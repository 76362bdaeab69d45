use tracing_subscriber::EnvFilter;

const VERBOSE_DIRECTIVES: &str =
    "info,ar_core=debug,ar_storage=debug,ar_scrapers=debug,ar_inference=debug,ar_web=debug,ar_cli=debug";

fn default_directives(verbose: bool) -> &'static str {
    if verbose {
        VERBOSE_DIRECTIVES
    } else {
        "info"
    }
}

/// Installs the fmt subscriber. `RUST_LOG` wins unless `--verbose` is given.
pub fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new(VERBOSE_DIRECTIVES)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directives(false)))
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
