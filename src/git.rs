//! Repository detection for the working directory.

/// `owner/name` of the `origin` remote, when it points at GitHub.
pub fn current_repo() -> Option<String> {
    let output = std::process::Command::new("git")
        .args(["remote", "get-url", "origin"])
        .output()
        .ok()?;

    if !output.status.success() {
        return None;
    }

    let url = String::from_utf8_lossy(&output.stdout).trim().to_string();
    let repo = repo_from_remote(&url);
    tracing::debug!(%url, ?repo, "origin remote");
    repo
}

/// Extract `owner/name` from SSH (git@github.com:owner/name.git), `ssh://`
/// or HTTPS remote URLs. Remotes on other hosts yield `None`.
fn repo_from_remote(url: &str) -> Option<String> {
    let path = match url.strip_prefix("git@github.com:") {
        Some(rest) => rest.to_string(),
        None => {
            let parsed = url::Url::parse(url).ok()?;
            if parsed.host_str() != Some("github.com") {
                return None;
            }
            parsed.path().to_string()
        }
    };

    let path = path.trim_matches('/').trim_end_matches(".git");
    let mut parts = path.split('/');
    let owner = parts.next().filter(|s| !s.is_empty())?;
    let name = parts.next().filter(|s| !s.is_empty())?;
    if parts.next().is_some() {
        return None;
    }
    Some(format!("{}/{}", owner, name))
}
