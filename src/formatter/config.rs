// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

use std::collections::HashSet;
use std::fmt::{Display, Formatter};
use std::fs;
use std::path::Path;

pub const DEFAULT_TAB_SIZE: usize = 4;
pub const CONFIG_FILE_NAME: &str = ".asmalignfmt.toml";

/// Formatter settings used by the formatting engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatterConfig {
    /// Columns per tab, used only to compare leading indentation.
    pub tab_size: usize,
    pub preserve_line_endings: bool,
}

impl Default for FormatterConfig {
    fn default() -> Self {
        Self {
            tab_size: DEFAULT_TAB_SIZE,
            preserve_line_endings: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatterConfigError {
    message: String,
}

impl FormatterConfigError {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl Display for FormatterConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for FormatterConfigError {}

impl FormatterConfig {
    pub fn load_from_path(path: &Path) -> Result<Self, FormatterConfigError> {
        let text = fs::read_to_string(path).map_err(|err| {
            FormatterConfigError::new(format!("failed to read '{}': {err}", path.display()))
        })?;
        Self::parse_toml(path, &text)
    }

    fn parse_toml(path: &Path, source: &str) -> Result<Self, FormatterConfigError> {
        let mut config = Self::default();
        let mut section = ConfigSection::Root;
        let mut seen_keys = HashSet::new();

        for (index, raw_line) in source.lines().enumerate() {
            let line_no = index + 1;
            let line = strip_toml_comment(raw_line).trim();
            if line.is_empty() {
                continue;
            }

            if line.starts_with('[') {
                if !line.ends_with(']') {
                    return Err(config_error(path, line_no, "invalid section header"));
                }
                let name = line[1..line.len() - 1].trim();
                section = if name.eq_ignore_ascii_case("formatter") {
                    ConfigSection::Formatter
                } else {
                    ConfigSection::Other
                };
                continue;
            }

            if section == ConfigSection::Other {
                continue;
            }

            let Some((raw_key, raw_value)) = line.split_once('=') else {
                return Err(config_error(path, line_no, "expected key = value"));
            };
            let key = raw_key.trim();
            let value = raw_value.trim();
            if key.is_empty() || value.is_empty() {
                return Err(config_error(path, line_no, "expected key = value"));
            }

            let canonical_key = normalize_key(key);
            if !seen_keys.insert(normalize_dedup_key(&canonical_key)) {
                return Err(config_error(
                    path,
                    line_no,
                    format!("duplicate key '{}'", key),
                ));
            }

            match canonical_key.as_str() {
                "tab_size" | "indent_width" => {
                    config.tab_size = parse_usize(path, line_no, key, value)?
                }
                "preserve_line_endings" => {
                    config.preserve_line_endings = parse_bool(path, line_no, key, value)?
                }
                _ => {
                    return Err(config_error(
                        path,
                        line_no,
                        format!("unknown key '{}'", key),
                    ));
                }
            }
        }

        Ok(config)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConfigSection {
    Root,
    Formatter,
    Other,
}

fn config_error(path: &Path, line_no: usize, message: impl Into<String>) -> FormatterConfigError {
    FormatterConfigError::new(format!(
        "{}:{}: {}",
        path.display(),
        line_no,
        message.into()
    ))
}

fn normalize_key(key: &str) -> String {
    key.trim().to_ascii_lowercase().replace('-', "_")
}

fn normalize_dedup_key(key: &str) -> String {
    match key {
        "indent_width" => "tab_size".to_string(),
        other => other.to_string(),
    }
}

fn parse_bool(
    path: &Path,
    line_no: usize,
    key: &str,
    value: &str,
) -> Result<bool, FormatterConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(config_error(
            path,
            line_no,
            format!("invalid boolean for '{}': {}", key, value),
        )),
    }
}

fn parse_usize(
    path: &Path,
    line_no: usize,
    key: &str,
    value: &str,
) -> Result<usize, FormatterConfigError> {
    let normalized = value.trim().replace('_', "");
    let parsed = normalized.parse::<usize>().map_err(|_| {
        config_error(
            path,
            line_no,
            format!("invalid integer for '{}': {}", key, value),
        )
    })?;
    if parsed == 0 {
        return Err(config_error(
            path,
            line_no,
            format!("'{}' must be >= 1", key),
        ));
    }
    Ok(parsed)
}

fn strip_toml_comment(line: &str) -> &str {
    let mut in_single = false;
    let mut in_double = false;
    let mut escaped = false;

    for (idx, ch) in line.char_indices() {
        match ch {
            '\'' if !in_double => in_single = !in_single,
            '"' if !in_single && !escaped => in_double = !in_double,
            '#' if !in_single && !in_double => return &line[..idx],
            _ => {}
        }

        escaped = in_double && ch == '\\' && !escaped;
    }
    line
}

#[cfg(test)]
mod tests {
    use super::{FormatterConfig, FormatterConfigError, DEFAULT_TAB_SIZE};
    use std::fs;
    use std::path::{Path, PathBuf};
    use std::process;
    use std::time::{SystemTime, UNIX_EPOCH};

    #[test]
    fn default_config_uses_four_column_tabs() {
        let cfg = FormatterConfig::default();
        assert_eq!(cfg.tab_size, DEFAULT_TAB_SIZE);
        assert_eq!(cfg.tab_size, 4);
        assert!(cfg.preserve_line_endings);
    }

    #[test]
    fn load_from_path_parses_root_keys() {
        let path = create_temp_config(
            "root-keys",
            "tab_size = 8
preserve_line_endings = false # normalize
",
        );
        let cfg = FormatterConfig::load_from_path(&path).expect("load config");
        assert_eq!(cfg.tab_size, 8);
        assert!(!cfg.preserve_line_endings);
    }

    #[test]
    fn load_from_path_parses_formatter_section_with_alias_keys() {
        let path = create_temp_config(
            "formatter-section",
            "[other]
ignored = \"yes\"

[formatter]
indent-width = 2
",
        );
        let cfg = FormatterConfig::load_from_path(&path).expect("load config");
        assert_eq!(cfg.tab_size, 2);
        assert!(cfg.preserve_line_endings);
    }

    #[test]
    fn load_from_path_rejects_unknown_key() {
        let path = create_temp_config("unknown-key", "oops = 1\n");
        let err = FormatterConfig::load_from_path(&path).expect_err("unknown key must fail");
        assert_error_contains(&err, "unknown key 'oops'");
    }

    #[test]
    fn load_from_path_rejects_zero_tab_size() {
        let path = create_temp_config("zero-tab", "tab_size = 0\n");
        let err = FormatterConfig::load_from_path(&path).expect_err("zero tab size should fail");
        assert_error_contains(&err, "'tab_size' must be >= 1");
    }

    #[test]
    fn load_from_path_rejects_duplicate_keys_across_sections() {
        let path = create_temp_config(
            "duplicate",
            "tab_size = 8
[formatter]
indent_width = 2
",
        );
        let err = FormatterConfig::load_from_path(&path).expect_err("duplicate should fail");
        assert_error_contains(&err, "duplicate key 'indent_width'");
        assert_error_contains(&err, ":3:");
    }

    #[test]
    fn load_from_path_rejects_invalid_boolean() {
        let path = create_temp_config("bad-bool", "preserve_line_endings = maybe\n");
        let err = FormatterConfig::load_from_path(&path).expect_err("invalid boolean");
        assert_error_contains(&err, "invalid boolean for 'preserve_line_endings'");
    }

    #[test]
    fn load_from_path_reports_missing_file() {
        let err = FormatterConfig::load_from_path(Path::new("/nonexistent/.asmalignfmt.toml"))
            .expect_err("missing file");
        assert_error_contains(&err, "failed to read");
    }

    fn assert_error_contains(err: &FormatterConfigError, needle: &str) {
        assert!(
            err.to_string().contains(needle),
            "error '{}' did not contain '{}'",
            err,
            needle
        );
    }

    fn create_temp_config(label: &str, content: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos();
        let dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("target")
            .join(format!(
                "formatter-config-{label}-{}-{nanos}",
                process::id()
            ));
        fs::create_dir_all(&dir).expect("create temp dir");
        let path = dir.join(".asmalignfmt.toml");
        fs::write(&path, content).expect("write config");
        assert!(Path::new(&path).exists());
        path
    }
}
