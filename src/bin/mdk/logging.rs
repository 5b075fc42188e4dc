/// Crates whose log records are shown at the requested level.
const CRATES: &[&str] = &["mdkernel", "mdk"];

/// Installs the global logger.
///
/// `RUST_LOG`, when set, wins over `level`.
pub fn init(level: log::LevelFilter) {
    let filter = filter_string(CRATES, level);
    if std::env::var_os("RUST_LOG").is_some() {
        env_logger::init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter))
            .format_timestamp(None)
            .init();
    }
}

fn filter_string(crates: &[&str], level: log::LevelFilter) -> String {
    let level = level.as_str().to_lowercase();
    crates
        .iter()
        .map(|name| format!("{name}={level}"))
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_lists_each_crate() {
        assert_eq!(
            filter_string(&["mdkernel", "mdk"], log::LevelFilter::Debug),
            "mdkernel=debug,mdk=debug"
        );
        assert_eq!(
            filter_string(&["mdkernel"], log::LevelFilter::Off),
            "mdkernel=off"
        );
    }
}
