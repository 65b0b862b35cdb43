//! Remote repository URL handling.
//!
//! Turns the forms users type (`https://host/owner/name`,
//! `git@host:owner/name.git`, `host/owner/name`, `owner/name`) into a
//! [`Url`], and derives the canonical relative path
//! `<host>/<owner>/.../<name>` used to lay clones out under a root.

use percent_encoding::percent_decode_str;
use url::Url;

use crate::error::{Error, Result};

/// Host assumed for bare `owner/name` arguments.
pub const DEFAULT_HOST: &str = "github.com";

const GIT_SUFFIX: &str = ".git";

/// Parses a remote repository argument into a URL.
pub fn parse_remote(input: &str) -> Result<Url> {
    let input = input.trim();
    if input.is_empty() {
        return Err(invalid(input, "empty repository"));
    }

    if input.contains("://") {
        return Ok(Url::parse(input)?);
    }

    if let Some(url) = parse_scp_like(input)? {
        return Ok(url);
    }

    let first = input.split('/').next().unwrap_or_default();
    if first.contains('.') {
        return Ok(Url::parse(&format!("https://{}", input))?);
    }

    let segments = input.split('/').filter(|s| !s.is_empty()).count();
    if segments >= 2 {
        return Ok(Url::parse(&format!("https://{}/{}", DEFAULT_HOST, input))?);
    }

    Err(invalid(input, "expected <owner>/<name> or a URL"))
}

/// `[user@]host:path` becomes `ssh://[user@]host/path`.
fn parse_scp_like(input: &str) -> Result<Option<Url>> {
    let Some(colon) = input.find(':') else {
        return Ok(None);
    };
    let (authority, path) = (&input[..colon], &input[colon + 1..]);
    if authority.is_empty() || authority.contains('/') || path.is_empty() {
        return Ok(None);
    }

    let path = path.trim_start_matches('/');
    Ok(Some(Url::parse(&format!("ssh://{}/{}", authority, path))?))
}

/// Derives the relative path and its segments from a remote URL.
///
/// The first segment is the host name (without port); the rest are the
/// non-empty segments of the percent-decoded URL path. A trailing `.git` is
/// stripped from the joined path and from the last segment, so both views
/// agree.
pub fn rel_path_parts(url: &Url) -> Result<(String, Vec<String>)> {
    let host = url
        .host_str()
        .filter(|h| !h.is_empty())
        .ok_or_else(|| invalid(url.as_str(), "URL has no host"))?;

    let path = percent_decode_str(url.path())
        .decode_utf8()
        .map_err(|_| invalid(url.as_str(), "URL path is not valid UTF-8"))?;

    let mut parts: Vec<String> = std::iter::once(host.to_string())
        .chain(
            path.split('/')
                .filter(|s| !s.is_empty())
                .map(str::to_string),
        )
        .collect();

    let joined = parts.join("/");
    let rel_path = joined
        .strip_suffix(GIT_SUFFIX)
        .unwrap_or(&joined)
        .to_string();

    if let Some(last) = parts.last_mut() {
        if let Some(stripped) = last.strip_suffix(GIT_SUFFIX) {
            *last = stripped.to_string();
        }
    }

    if parts.last().is_some_and(|last| last.is_empty()) {
        return Err(invalid(url.as_str(), "repository name is empty"));
    }

    Ok((rel_path, parts))
}

fn invalid(input: &str, message: &str) -> Error {
    Error::InvalidRemote {
        input: input.to_string(),
        message: message.to_string(),
    }
}
