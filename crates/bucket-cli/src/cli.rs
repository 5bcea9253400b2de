use std::path::PathBuf;

use clap::Parser;

#[derive(Debug, Parser)]
#[command(
    name = "bucket",
    about = "Bucket — bearer-gated, content-addressed blob server",
    version,
)]
pub struct Cli {
    /// Config file (`.json` or TOML)
    #[arg(short, long, default_value = "config.json")]
    pub config: PathBuf,

    /// Append-only log file
    #[arg(long, default_value = "server.log")]
    pub log_file: PathBuf,

    /// Log to stderr instead of the log file
    #[arg(long, conflicts_with = "log_file")]
    pub stderr: bool,

    /// Storage root, overriding `storage_root` from the config
    #[arg(short, long)]
    pub data_dir: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_legacy_layout() {
        let cli = Cli::try_parse_from(["bucket"]).unwrap();
        assert_eq!(cli.config, PathBuf::from("config.json"));
        assert_eq!(cli.log_file, PathBuf::from("server.log"));
        assert!(!cli.stderr);
        assert!(cli.data_dir.is_none());
    }

    #[test]
    fn parse_overrides() {
        let cli = Cli::try_parse_from([
            "bucket", "-c", "/etc/bucket.toml", "--log-file", "/var/log/bucket.log", "-d", "/srv/blobs",
        ])
        .unwrap();
        assert_eq!(cli.config, PathBuf::from("/etc/bucket.toml"));
        assert_eq!(cli.log_file, PathBuf::from("/var/log/bucket.log"));
        assert_eq!(cli.data_dir, Some(PathBuf::from("/srv/blobs")));
    }

    #[test]
    fn stderr_conflicts_with_log_file() {
        assert!(Cli::try_parse_from(["bucket", "--stderr", "--log-file", "x.log"]).is_err());
        assert!(Cli::try_parse_from(["bucket", "--stderr"]).unwrap().stderr);
    }
}
