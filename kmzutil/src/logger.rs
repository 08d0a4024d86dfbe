use env_logger::{Builder, Env, Target};

/// Intercept messages using the `log` crate and print them to STDOUT. Defaults to `info`; set
/// `RUST_LOG` to change the filter.
///
/// Calling this twice (common in tests) is harmless; only the first call installs the logger.
pub fn setup() {
    let _ = Builder::from_env(Env::default().default_filter_or("info"))
        .target(Target::Stdout)
        .try_init();
}
