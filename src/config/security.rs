use crate::errors::DefensisError;

/// Config keys whose values are opened on disk. Everything else (subject, phase labels,
/// finding text) is display data and may legitimately describe `../` or `<script>` payloads.
const PATH_KEYS: &[&[&str]] = &[&["session", "dir"]];

pub fn validate_security_patterns(value: &serde_yaml::Value) -> Result<(), DefensisError> {
    for key in PATH_KEYS {
        if let Some(s) = lookup(value, key).and_then(|v| v.as_str()) {
            check_path(s, key)?;
        }
    }
    Ok(())
}

fn lookup<'a>(value: &'a serde_yaml::Value, key: &[&str]) -> Option<&'a serde_yaml::Value> {
    key.iter().try_fold(value, |v, part| v.get(*part))
}

/// Rejects `..` components, with either separator, and NUL bytes.
fn check_path(raw: &str, key: &[&str]) -> Result<(), DefensisError> {
    if raw.split(['/', '\\']).any(|part| part == "..") {
        return Err(DefensisError::Config(format!(
            "Path traversal found at config path: {}",
            key.join(".")
        )));
    }
    if raw.contains('\0') {
        return Err(DefensisError::Config(format!(
            "NUL byte found at config path: {}",
            key.join(".")
        )));
    }
    Ok(())
}
