use reqwest::header::HeaderMap;
use url::Url;

/// Validate that a link is a valid URL and starts with http/https
pub fn is_crawlable_url(link: &str) -> bool {
    if let Ok(url) = Url::parse(link) {
        let scheme = url.scheme();
        if scheme != "http" && scheme != "https" {
            return false;
        }
        return true;
    }
    false
}

pub fn get_content_type<'a>(headers: &HeaderMap, url: &str) -> Option<&'a str> {
    if let Some(value) = headers.get("content-type") {
        let clean_type = if let Ok(value) = value.to_str() {
            value.split(';').next().unwrap_or("").trim()
        } else {
            ""
        };

        if clean_type == "text/html" {
            Some("text/html")
        } else {
            None
        }
    } else if url.ends_with(".html") || url.ends_with(".htm") {
        Some("text/html")
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_crawlable_url() {
        assert_eq!(is_crawlable_url("https://google.com"), true);
        assert_eq!(is_crawlable_url("http://google.com"), true);
        assert_eq!(is_crawlable_url("https://google.com/hello"), true);
        assert_eq!(is_crawlable_url("sftp://google.com"), false);
        assert_eq!(is_crawlable_url("ws://google.com"), false);
        assert_eq!(is_crawlable_url("wss://google.com"), false);
    }
}
