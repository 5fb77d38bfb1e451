use std::fmt;

use url::{Position, Url};

/// Href prefixes that never point at a crawlable page.
const SKIPPED_PREFIXES: &[&str] = &["javascript:", "mailto:", "tel:", "#"];

/// Canonical form of a link: `scheme://host/path[?query]`, no fragment, no trailing slash.
///
/// Two links are the same iff their normalized strings are equal.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NormalizedUrl(String);

impl NormalizedUrl {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    /// Key used for dedup: the link without its `http://` or `https://` prefix,
    /// so both schemes of one page count as the same link.
    ///
    /// This is deliberately looser than plain string equality of normalized
    /// links: `http://a.com/p1/` found next to `/p1` on an https page is
    /// reported once, in the form seen first. Host and path still compare
    /// case-sensitively.
    pub fn identity(&self) -> &str {
        self.0
            .strip_prefix("https://")
            .or_else(|| self.0.strip_prefix("http://"))
            .unwrap_or(&self.0)
    }

    /// Host of this link, compared by exact string equality.
    pub fn domain(&self) -> String {
        domain_of(&self.0)
    }
}

impl fmt::Display for NormalizedUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for NormalizedUrl {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Returns true for hrefs that are dropped before resolution:
/// empty, `javascript:`, `mailto:`, `tel:` and in-page `#` anchors.
pub fn is_skipped_href(href: &str) -> bool {
    let trimmed = href.trim();
    if trimmed.is_empty() {
        return true;
    }
    let lower = trimmed.to_ascii_lowercase();
    SKIPPED_PREFIXES
        .iter()
        .any(|prefix| lower.starts_with(prefix))
}

/// Resolve `href` against `base` and canonicalize it.
///
/// Returns `None` when the href is one of the skipped kinds or cannot be
/// resolved to an absolute URL.
pub fn normalize_url(href: &str, base: &str) -> Option<NormalizedUrl> {
    if is_skipped_href(href) {
        return None;
    }
    let href = href.trim();
    let base = base.trim();
    let resolved = match Url::parse(base) {
        Ok(base) => base.join(href).ok()?,
        Err(_) => Url::parse(href).ok()?,
    };
    // The host comes from the href when it names one, otherwise from the base.
    let written_host = authority_host(href).or_else(|| authority_host(base));
    Some(NormalizedUrl(canonical_form(&resolved, written_host)))
}

/// Host component of `url` as written; empty when the URL has no host or does not parse.
pub fn domain_of(url: &str) -> String {
    let url = url.trim();
    Url::parse(url)
        .ok()
        .and_then(|parsed| {
            parsed
                .host_str()
                .map(|host| host_as_written(host, authority_host(url)).to_owned())
        })
        .unwrap_or_default()
}

/// Raw host text of an absolute (`scheme://`) or protocol-relative (`//`) URL.
fn authority_host(raw: &str) -> Option<&str> {
    let rest = match raw.strip_prefix("//") {
        Some(rest) => rest,
        None => {
            let (scheme, rest) = raw.split_once("://")?;
            let valid_scheme = scheme.starts_with(|c: char| c.is_ascii_alphabetic())
                && scheme
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
            if !valid_scheme {
                return None;
            }
            rest
        }
    };
    let authority = rest.split(['/', '?', '#', '\\']).next().unwrap_or(rest);
    let host_port = authority.rsplit_once('@').map_or(authority, |(_, hp)| hp);
    if host_port.starts_with('[') {
        return host_port.find(']').map(|end| &host_port[..=end]);
    }
    Some(host_port.split(':').next().unwrap_or(host_port))
}

/// `url` lowercases hosts while parsing; keep the original spelling when it is
/// the same host. Punycode or percent-decoded hosts keep the parsed form.
fn host_as_written<'a>(parsed: &'a str, written: Option<&'a str>) -> &'a str {
    match written {
        Some(written) if written != parsed && written.eq_ignore_ascii_case(parsed) => written,
        _ => parsed,
    }
}

fn canonical_form(url: &Url, written_host: Option<&str>) -> String {
    let mut out = match url.host_str() {
        Some(host) => format!(
            "{}{}{}",
            &url[..Position::BeforeHost],
            host_as_written(host, written_host),
            &url[Position::AfterHost..Position::AfterPath]
        ),
        None => url[..Position::AfterPath].to_string(),
    };
    if let Some(query) = url.query().filter(|q| !q.is_empty()) {
        out.push('?');
        out.push_str(query);
    }
    strip_trailing(out)
}

// `?` left dangling by slash stripping (`/x?/`) would normalize differently
// on a second pass, so it goes too.
fn strip_trailing(mut out: String) -> String {
    loop {
        let trimmed_len = out.trim_end_matches('/').len();
        out.truncate(trimmed_len);
        if out.ends_with('?') {
            out.pop();
        } else {
            return out;
        }
    }
}
