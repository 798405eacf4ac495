use serde::Serialize;
use std::fmt;

/// Hosting classification of a remote URL, used for display only
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum RemoteKind {
    GitHub,
    GitLab,
    Bitbucket,
    Http,
    Git,
    Ssh,
    Custom,
}

impl RemoteKind {
    /// Classify a remote URL. Well-known hosts win over the transport.
    pub fn classify(url: &str) -> Self {
        if url.contains("github.com") {
            RemoteKind::GitHub
        } else if url.contains("gitlab.com") {
            RemoteKind::GitLab
        } else if url.contains("bitbucket.org") {
            RemoteKind::Bitbucket
        } else if url.starts_with("http://") || url.starts_with("https://") {
            RemoteKind::Http
        } else if url.starts_with("git://") {
            RemoteKind::Git
        } else if url.contains('@') {
            RemoteKind::Ssh
        } else {
            RemoteKind::Custom
        }
    }
}

impl fmt::Display for RemoteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RemoteKind::GitHub => "GitHub",
            RemoteKind::GitLab => "GitLab",
            RemoteKind::Bitbucket => "Bitbucket",
            RemoteKind::Http => "HTTP",
            RemoteKind::Git => "GIT",
            RemoteKind::Ssh => "SSH",
            RemoteKind::Custom => "Custom",
        };
        write!(f, "{}", label)
    }
}

/// Shorten a URL for table display, appending `...` when truncated.
///
/// Truncation respects char boundaries so multi-byte URLs never panic.
pub fn shorten_url(url: &str, max_len: usize) -> String {
    if url.chars().count() <= max_len {
        return url.to_string();
    }
    let keep = max_len.saturating_sub(3);
    let mut shortened: String = url.chars().take(keep).collect();
    shortened.push_str("...");
    shortened
}
