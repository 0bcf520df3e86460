//! Hosts to probe and the URLs planned for them

use crate::error::{Error, Result};
use url::Url;

/// Path segment standing for the site root
pub const ROOT_SEGMENT: &str = "/";

/// A candidate site and the URLs that will be fetched from it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Host {
    domain: String,
    url_names: Vec<String>,
    urls: Vec<Url>,
}

impl Host {
    /// Plan a host from its domain and the relative paths to probe.
    ///
    /// The root segment is always first; repeated roots and empty segments
    /// are dropped.
    pub fn new(domain: impl Into<String>, paths: &[String]) -> Result<Self> {
        let domain = domain.into();

        let mut url_names = vec![ROOT_SEGMENT.to_string()];
        url_names.extend(
            paths
                .iter()
                .filter_map(|p| normalize_segment(p))
                .map(str::to_string),
        );

        let urls = plan_urls(&domain, paths)?;

        Ok(Self {
            domain,
            url_names,
            urls,
        })
    }

    /// Domain name
    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// Relative segments, root first
    pub fn url_names(&self) -> &[String] {
        &self.url_names
    }

    /// Absolute URLs, one per segment
    pub fn urls(&self) -> &[Url] {
        &self.urls
    }

    /// URL of the site root
    pub fn root_url(&self) -> &Url {
        &self.urls[0]
    }
}

/// Root URL for a domain (`https://<domain>/`)
pub fn root_url(domain: &str) -> Result<Url> {
    Url::parse(&format!("https://{}/", domain)).map_err(|e| Error::InvalidUrl(e.to_string()))
}

/// Build the absolute URLs to probe for `domain`.
///
/// `https://<domain>/` always comes first, followed by
/// `https://<domain>/<segment>/` for every other segment in input order.
pub fn plan_urls<S: AsRef<str>>(domain: &str, segments: &[S]) -> Result<Vec<Url>> {
    let mut urls = vec![root_url(domain)?];

    for segment in segments.iter().filter_map(|s| normalize_segment(s.as_ref())) {
        let url = Url::parse(&format!("https://{}/{}/", domain, segment))
            .map_err(|e| Error::InvalidUrl(e.to_string()))?;
        urls.push(url);
    }

    Ok(urls)
}

/// Strip surrounding slashes and whitespace; `None` for the root or an empty segment
fn normalize_segment(segment: &str) -> Option<&str> {
    let trimmed = segment.trim().trim_matches('/');
    (!trimmed.is_empty()).then_some(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn as_strings(urls: &[Url]) -> Vec<String> {
        urls.iter().map(Url::to_string).collect()
    }

    #[test]
    fn root_first_and_not_repeated() {
        let urls = plan_urls("example.com", &["blog", "/"]).unwrap();
        assert_eq!(
            as_strings(&urls),
            vec!["https://example.com/", "https://example.com/blog/"]
        );
    }

    #[test]
    fn root_only_when_no_segments() {
        let urls = plan_urls::<&str>("example.com", &[]).unwrap();
        assert_eq!(as_strings(&urls), vec!["https://example.com/"]);
    }

    #[test]
    fn trailing_slash_normalized() {
        let urls = plan_urls("example.com", &["shop/", "/contact", "", "  "]).unwrap();
        assert_eq!(
            as_strings(&urls),
            vec![
                "https://example.com/",
                "https://example.com/shop/",
                "https://example.com/contact/",
            ]
        );
    }

    #[test]
    fn nested_segment_kept_as_path() {
        let urls = plan_urls("example.com", &["blog/2024"]).unwrap();
        assert_eq!(urls[1].as_str(), "https://example.com/blog/2024/");
    }

    #[test]
    fn host_tracks_names_and_urls() {
        let host = Host::new(
            "example.com",
            &["blog".to_string(), "/".to_string(), "shop".to_string()],
        )
        .unwrap();

        assert_eq!(host.domain(), "example.com");
        assert_eq!(host.url_names(), &["/", "blog", "shop"]);
        assert_eq!(host.urls().len(), host.url_names().len());
        assert_eq!(host.root_url().as_str(), "https://example.com/");
    }

    #[test]
    fn unparsable_domain_is_rejected() {
        assert!(matches!(
            plan_urls::<&str>("exa mple.com", &[]),
            Err(Error::InvalidUrl(_))
        ));
    }
}
