use std::path::PathBuf;

use clap::Parser;

/// Shoji: native windows, web views and trays driven over stdin/stdout.
#[derive(Parser, Debug)]
#[command(name = "shoji", version, about)]
pub struct Args {
    /// Config file path override.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log level or filter directive (trace, debug, info, warn, error).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Open a window with one full-size view of this URL at startup.
    #[arg(long)]
    pub url: Option<String>,

    /// Title of the startup window.
    #[arg(long)]
    pub title: Option<String>,

    /// Do not read control requests from stdin.
    #[arg(long)]
    pub no_control: bool,
}

pub fn parse() -> Args {
    Args::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_control_mode() {
        let args = Args::parse_from(["shoji"]);
        assert!(!args.no_control);
        assert!(args.url.is_none());
    }

    #[test]
    fn startup_window_flags() {
        let args = Args::parse_from([
            "shoji",
            "--url",
            "https://example.test",
            "--title",
            "Demo",
            "--no-control",
            "--log-level",
            "debug",
        ]);
        assert_eq!(args.url.as_deref(), Some("https://example.test"));
        assert_eq!(args.title.as_deref(), Some("Demo"));
        assert!(args.no_control);
        assert_eq!(args.log_level.as_deref(), Some("debug"));
    }
}
