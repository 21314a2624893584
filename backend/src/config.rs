use dotenv::dotenv;
use log::warn;
use std::env;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Ledger file names looked for in the working directory, in order.
const DEFAULT_LEDGER_FILES: [&str; 2] = ["business_excel.xlsx", "customers.xlsx"];

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    // Server configuration
    pub server_host: String,
    pub server_port: u16,
    pub open_browser: bool,

    // Files
    pub ledger_file: PathBuf,
    pub backup_dir: Option<PathBuf>,
    pub fonts_dir: PathBuf,
}

impl Config {
    /// Reads the configuration from the environment, after loading `.env` if present.
    pub fn from_env() -> Self {
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok(), Path::new("."))
    }

    /// Builds the configuration from `lookup`; `cwd` is where a default ledger
    /// file is searched for.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>, cwd: &Path) -> Self {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let server_host = var("LEDGER_HOST").unwrap_or_else(|| "127.0.0.1".to_string());
        let server_port = parse_or("LEDGER_PORT", var("LEDGER_PORT"), 8080);
        let open_browser = var("LEDGER_OPEN_BROWSER")
            .map(|v| parse_bool(&v).unwrap_or_else(|| {
                warn!("LEDGER_OPEN_BROWSER must be true or false, got {:?}", v);
                true
            }))
            .unwrap_or(true);

        let ledger_file = var("LEDGER_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|| default_ledger_file(cwd));
        let backup_dir = var("LEDGER_BACKUP_DIR").map(PathBuf::from);
        let fonts_dir = var("LEDGER_FONTS_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("./fonts"));

        Config {
            server_host,
            server_port,
            open_browser,
            ledger_file,
            backup_dir,
            fonts_dir,
        }
    }

    pub fn server_url(&self) -> String {
        format!("http://{}:{}", self.server_host, self.server_port)
    }
}

/// First of the known ledger names that exists in `dir`, else the first name.
pub fn default_ledger_file(dir: &Path) -> PathBuf {
    DEFAULT_LEDGER_FILES
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.exists())
        .unwrap_or_else(|| dir.join(DEFAULT_LEDGER_FILES[0]))
}

fn parse_or<T: FromStr + Copy + std::fmt::Debug>(key: &str, value: Option<String>, default: T) -> T {
    match value {
        None => default,
        Some(v) => v.trim().parse().unwrap_or_else(|_| {
            warn!("{} has invalid value {:?}, using {:?}", key, v, default);
            default
        }),
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
