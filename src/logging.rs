use std::io::Write;

use env_logger::{Builder, Env};

/// Environment variable that overrides the `-v` derived level.
pub const LOG_ENV: &str = "CODEMERGE_LOG";

fn level_for(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    }
}

/// Route `log` records to stderr so they never mix with merged output on stdout.
pub fn setup_logger(verbosity: u8) -> Result<(), log::SetLoggerError> {
    let env = Env::default().filter_or(LOG_ENV, level_for(verbosity));

    Builder::from_env(env)
        .format(|buf, record| writeln!(buf, "[{}] {}", record.level(), record.args()))
        .try_init()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_maps_to_levels() {
        assert_eq!(level_for(0), "warn");
        assert_eq!(level_for(1), "info");
        assert_eq!(level_for(2), "debug");
        assert_eq!(level_for(9), "debug");
    }

    #[test]
    fn second_init_is_reported_not_panicking() {
        let _ = setup_logger(0);
        assert!(setup_logger(0).is_err());
    }
}
