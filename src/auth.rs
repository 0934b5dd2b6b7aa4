use crate::error::{NudgeError, Result};

const TOKEN_ENV_VARS: [&str; 2] = ["GITHUB_TOKEN", "GH_TOKEN"];
const TOKEN_COMMAND: &str = "gh auth token";

/// Try to run a CLI command and capture stdout as a token
fn try_cli_token(command: &str) -> Option<String> {
    let output = std::process::Command::new("sh")
        .args(["-c", command])
        .output()
        .ok()?;

    if output.status.success() {
        let token = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if !token.is_empty() {
            return Some(token);
        }
    }
    None
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|token| token.trim().to_string())
        .filter(|token| !token.is_empty())
}

/// Pick up an existing GitHub token:
/// 1. `GITHUB_TOKEN` or `GH_TOKEN`
/// 2. `gh auth token`
pub fn load_token() -> Result<String> {
    for var in TOKEN_ENV_VARS {
        if let Some(token) = non_empty(std::env::var(var).ok()) {
            tracing::debug!(source = var, "using token from environment");
            return Ok(token);
        }
    }

    if let Some(token) = try_cli_token(TOKEN_COMMAND) {
        tracing::debug!(source = TOKEN_COMMAND, "using token from gh");
        return Ok(token);
    }

    Err(NudgeError::Auth(
        "no GitHub token found; set GITHUB_TOKEN or run `gh auth login`".to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_token_trims_output() {
        assert_eq!(try_cli_token("echo '  abc123  '"), Some("abc123".to_string()));
    }

    #[test]
    fn cli_token_rejects_failure_and_empty_output() {
        assert_eq!(try_cli_token("exit 1"), None);
        assert_eq!(try_cli_token("true"), None);
    }

    #[test]
    fn blank_values_are_ignored() {
        assert_eq!(non_empty(Some("   ".to_string())), None);
        assert_eq!(non_empty(None), None);
        assert_eq!(non_empty(Some(" t ".to_string())), Some("t".to_string()));
    }
}
