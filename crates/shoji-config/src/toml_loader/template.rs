//! Default TOML config template with inline documentation comments.

/// Generate the default TOML config content with comments.
pub(crate) fn default_config_toml() -> String {
    r##"# Shoji Configuration
# Only override what you want to change -- missing fields use defaults.

[app]
name = "Shoji App"
identifier = "dev.shoji.app"
channel = "dev"

[window]
# title = "Shoji"
# width = 800
# height = 600
# transparent = false
# decorations = true
# keep_alive_with_tray = true

[navigation]
# Glob patterns, "*" wildcard only, case-insensitive.
# A leading "^" blocks; the last matching rule wins.
# rules = ["^*", "https://*.example.com/*"]
# default_allow = true

[engine]
# devtools = false
# build_json = "/path/to/build.json"

[engine.flags]
# disable-gpu = true
# lang = "en-US"

[logging]
# level = "INFO"         # TRACE, DEBUG, INFO, WARNING, ERROR
"##
    .to_string()
}
