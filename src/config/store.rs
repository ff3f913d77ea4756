//! TOML-backed config store, the lowest-precedence layer of [`super::Resolver`].
//!
//! Nested tables are flattened into `PARENT_CHILD` keys so a file like
//!
//! ```toml
//! [db]
//! engine = "mysql"
//! ```
//!
//! answers lookups for `DB_ENGINE`. `${VAR}` references are substituted from
//! the process environment before parsing.

use crate::utils::error::{SdkError, Result};
use regex::Regex;
use std::collections::HashMap;
use std::path::Path;
use std::sync::OnceLock;
use toml::{Table, Value};

/// 從 TOML 檔案載入設定
pub fn load_file<P: AsRef<Path>>(path: P) -> Result<HashMap<String, String>> {
    let content = std::fs::read_to_string(&path).map_err(SdkError::IoError)?;
    load_str(&content)
}

/// 從 TOML 字串解析設定
pub fn load_str(content: &str) -> Result<HashMap<String, String>> {
    let processed = substitute_env_vars(content);
    let table: Table = toml::from_str(&processed)?;

    let mut entries = HashMap::new();
    flatten("", &table, &mut entries);
    Ok(entries)
}

/// 替換環境變數 (例如 ${DB_PASSWORD})；未設定的變數保持原樣
pub fn substitute_env_vars(content: &str) -> String {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    let re = PATTERN.get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("valid env-var pattern"));

    re.replace_all(content, |caps: &regex::Captures| {
        let var_name = &caps[1];
        std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
    })
    .into_owned()
}

fn flatten(prefix: &str, table: &Table, out: &mut HashMap<String, String>) {
    for (key, value) in table {
        let name = if prefix.is_empty() {
            key.to_uppercase()
        } else {
            format!("{}_{}", prefix, key.to_uppercase())
        };

        match value {
            Value::Table(nested) => flatten(&name, nested, out),
            other => {
                if let Some(text) = scalar_to_string(other) {
                    out.insert(name, text);
                }
            }
        }
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Integer(i) => Some(i.to_string()),
        Value::Float(f) => Some(f.to_string()),
        Value::Boolean(b) => Some(b.to_string()),
        Value::Datetime(dt) => Some(dt.to_string()),
        Value::Array(items) => Some(
            items
                .iter()
                .filter_map(scalar_to_string)
                .collect::<Vec<_>>()
                .join(","),
        ),
        Value::Table(_) => None,
    }
}
