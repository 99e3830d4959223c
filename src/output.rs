use std::sync::OnceLock;

static QUIET: OnceLock<bool> = OnceLock::new();

/// Environment variable that turns on quiet mode without `--quiet`
pub const QUIET_ENV: &str = "SEMGRAPH_QUIET";

/// Suppress human-mode chatter (progress bars, banners, status lines)
pub fn is_quiet() -> bool {
    *QUIET.get_or_init(|| std::env::var(QUIET_ENV).is_ok_and(|v| flag_enabled(&v)))
}

/// Force quiet mode from the `--quiet` flag; must run before the first `is_quiet` call
pub fn set_quiet(quiet: bool) {
    if quiet {
        QUIET.set(true).ok();
    }
}

fn flag_enabled(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_values() {
        assert!(flag_enabled("1"));
        assert!(flag_enabled("TRUE"));
        assert!(flag_enabled(" yes "));
        assert!(!flag_enabled("0"));
        assert!(!flag_enabled(""));
        assert!(!flag_enabled("off"));
    }
}
