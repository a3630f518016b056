use std::ffi::OsString;

pub mod commands;

/// Rewrite the single-dash `-conf` spelling into `--config`
///
/// Clap only knows one-letter short flags, so `-conf=PATH` would otherwise
/// parse as `-c` with the value `onf=PATH`.
pub fn normalize_legacy_args<I>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = OsString>,
{
    args.into_iter()
        .map(|arg| match arg.to_str() {
            Some("-conf") => OsString::from("--config"),
            Some(s) if s.starts_with("-conf=") => {
                OsString::from(format!("--config={}", &s["-conf=".len()..]))
            }
            _ => arg,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalize(args: &[&str]) -> Vec<OsString> {
        normalize_legacy_args(args.iter().map(OsString::from))
    }

    #[test]
    fn test_rewrites_legacy_conf_flag() {
        assert_eq!(
            normalize(&["log-analyzer", "-conf=fixtures/test_config.json"]),
            vec!["log-analyzer", "--config=fixtures/test_config.json"]
        );
        assert_eq!(
            normalize(&["log-analyzer", "-conf", "config.json"]),
            vec!["log-analyzer", "--config", "config.json"]
        );
    }

    #[test]
    fn test_leaves_other_args_alone() {
        assert_eq!(
            normalize(&["log-analyzer", "-c", "-config.json", "--verbose"]),
            vec!["log-analyzer", "-c", "-config.json", "--verbose"]
        );
    }
}
