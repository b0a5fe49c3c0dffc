//! OpenVPN client configuration parsing
//!
//! The client config format is line oriented: `directive value` pairs,
//! bare flag directives, `#` comments, and multi-line blocks delimited
//! by `<name>`/`</name>` tags (embedded certificates and keys). The
//! format belongs to third-party tooling, so the parser is deliberately
//! lenient: repeated directives overwrite, unterminated tags are
//! tolerated, nothing past a missing file is fatal.

use crate::error::ConfigError;
use regex::Regex;
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info};

/// Fallback OS error number for a missing file when the platform
/// reports none (ENOENT)
const ENOENT: i32 = 2;

/// Parsed value of a single configuration directive
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    /// Bare directive with no argument, e.g. `persist-tun`
    Flag,
    /// Directive with the rest of the line as its argument
    Value(String),
    /// Body of a `<name>...</name>` block, lines concatenated verbatim
    Block(String),
}

impl Directive {
    /// The argument of a `Value` directive
    pub fn as_value(&self) -> Option<&str> {
        match self {
            Directive::Value(v) => Some(v),
            _ => None,
        }
    }

    /// The accumulated body of a `Block` directive
    pub fn as_block(&self) -> Option<&str> {
        match self {
            Directive::Block(b) => Some(b),
            _ => None,
        }
    }

    pub fn is_flag(&self) -> bool {
        matches!(self, Directive::Flag)
    }
}

/// An OpenVPN client configuration, read once at startup
#[derive(Debug, Clone, Default)]
pub struct ClientConfig {
    directives: HashMap<String, Directive>,
}

impl ClientConfig {
    /// Read and parse a client config file
    ///
    /// A missing file maps to `ConfigError::NotFound` carrying the OS
    /// error number; parsing itself never fails.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        info!("Reading ovpn config file: {}", path.display());

        let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ConfigError::NotFound {
                path: path.to_string_lossy().into_owned(),
                errno: e.raw_os_error().unwrap_or(ENOENT),
            },
            _ => ConfigError::Unreadable {
                path: path.to_string_lossy().into_owned(),
                source: e,
            },
        })?;

        let config = Self::parse(&content);
        info!("Config parsed successfully: {}", path.display());
        Ok(config)
    }

    /// Parse client config text into a directive map
    pub fn parse(content: &str) -> Self {
        // Closing tags must be tested first: `</ca>` also matches the
        // opening pattern with a leading slash in the name.
        let tag_close = Regex::new(r"^</(.*)>$").expect("Failed to compile tag_close pattern");
        let tag_open = Regex::new(r"^<(.*)>$").expect("Failed to compile tag_open pattern");

        let mut directives = HashMap::new();
        let mut open_tag: Option<String> = None;

        for raw in content.lines() {
            debug!("Reading line: {}", raw);
            let line = raw.trim();

            // skip comments and empty lines
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            // closing tag lines (</some_tag>)
            if tag_close.is_match(line) {
                open_tag = None;
                continue;
            }

            // opening tag lines (<some_tag>)
            if let Some(caps) = tag_open.captures(line) {
                let name = caps[1].to_string();
                directives.insert(name.clone(), Directive::Block(String::new()));
                open_tag = Some(name);
                continue;
            }

            // content inside a tagged block
            if let Some(tag) = &open_tag {
                if let Some(Directive::Block(body)) = directives.get_mut(tag) {
                    body.push_str(line);
                }
                continue;
            }

            // common directive lines
            match line.split_once(' ') {
                Some((name, value)) => {
                    directives.insert(name.to_string(), Directive::Value(value.to_string()));
                }
                None => {
                    directives.insert(line.to_string(), Directive::Flag);
                }
            }
        }

        Self { directives }
    }

    /// Look up a directive by name
    pub fn get(&self, name: &str) -> Option<&Directive> {
        self.directives.get(name)
    }

    /// The argument of a `Value` directive, if present in that form
    pub fn value(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Directive::as_value)
    }

    /// The tunnel interface name from the `dev` directive
    pub fn device(&self) -> Option<&str> {
        self.value("dev")
    }

    /// Whether the directive appears in the file in any form
    pub fn is_set(&self, name: &str) -> bool {
        self.directives.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.directives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.directives.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_value_directive() {
        let config = ClientConfig::parse("dev tun0\n");
        assert_eq!(config.value("dev"), Some("tun0"));
        assert_eq!(config.device(), Some("tun0"));
    }

    #[test]
    fn test_parse_flag_directive() {
        let config = ClientConfig::parse("persist-tun\n");
        assert_eq!(config.get("persist-tun"), Some(&Directive::Flag));
        assert!(config.get("persist-tun").unwrap().is_flag());
    }

    #[test]
    fn test_parse_tagged_block_concatenates_lines() {
        let config = ClientConfig::parse("<ca>\nLINE1\nLINE2\n</ca>\n");
        assert_eq!(config.get("ca").unwrap().as_block(), Some("LINE1LINE2"));
    }

    #[test]
    fn test_comments_and_blank_lines_are_skipped() {
        let config = ClientConfig::parse("# a comment\n\n   \n# dev tun9\n");
        assert!(config.is_empty());
    }

    #[test]
    fn test_repeated_directive_overwrites() {
        let config = ClientConfig::parse("dev tun0\ndev tun1\n");
        assert_eq!(config.device(), Some("tun1"));
        assert_eq!(config.len(), 1);
    }

    #[test]
    fn test_unterminated_tag_is_tolerated() {
        let config = ClientConfig::parse("<key>\nSECRET\n");
        assert_eq!(config.get("key").unwrap().as_block(), Some("SECRET"));
    }

    #[test]
    fn test_lines_are_trimmed_before_classification() {
        let config = ClientConfig::parse("   remote vpn.example.com 1194   \n");
        assert_eq!(config.value("remote"), Some("vpn.example.com 1194"));
    }
}
