use scraper::{Html, Selector};
use std::collections::HashSet;
use std::error::Error;
use utils::url::normalize_href;

const LINK_SELECTOR: &str = concat!(
    "a[href]",
    ":not([href$=\".jpg\"])",
    ":not([href$=\".jpeg\"])",
    ":not([href$=\".png\"])",
    ":not([href$=\".gif\"])",
    ":not([href$=\".svg\"])",
    ":not([href$=\".webp\"])",
    ":not([href$=\".mp4\"])",
    ":not([href$=\".avi\"])",
    ":not([href$=\".mov\"])",
    ":not([href$=\".wmv\"])",
    ":not([href$=\".flv\"])",
    ":not([href$=\".mp3\"])",
    ":not([href$=\".wav\"])",
    ":not([href$=\".wma\"])",
    ":not([href$=\".wpl\"])",
    ":not([href$=\".mpa\"])",
    ":not([href$=\".ogg\"])",
    ":not([href$=\".woff\"])",
    ":not([href$=\".woff2\"])",
    ":not([href$=\".ttf\"])",
    ":not([href$=\".otf\"])",
    ":not([href$=\".swf\"])",
    ":not([href$=\".xap\"])",
    ":not([href$=\".ico\"])",
    ":not([href$=\".eot\"])",
    ":not([href$=\".bmp\"])",
    ":not([href$=\".psd\"])",
    ":not([href$=\".tiff\"])",
    ":not([href$=\".tif\"])",
    ":not([href$=\".heic\"])",
    ":not([href$=\".heif\"])",
    ":not([href$=\".mkv\"])",
    ":not([href$=\".webm\"])",
    ":not([href$=\".m4v\"])",
    ":not([href$=\".aac\"])",
    ":not([href$=\".flac\"])",
    ":not([href$=\".m4a\"])",
    ":not([href$=\".aiff\"])",
    ":not([href$=\".pdf\"])",
    ":not([href$=\".eps\"])",
    ":not([href$=\".yaml\"])",
    ":not([href$=\".yml\"])",
    ":not([href$=\".xml\"])",
    ":not([href$=\".css\"])",
    ":not([href$=\".js\"])",
    ":not([href$=\".txt\"])",
    ":not([href$=\".tar\"])",
    ":not([href$=\".doc\"])",
    ":not([href$=\".docx\"])",
    ":not([href$=\".zip\"])",
    ":not([href$=\".deb\"])",
    ":not([href$=\".pkg\"])",
    ":not([href$=\".tar.gz\"])",
    ":not([href$=\".rpm\"])",
    ":not([href$=\".z\"])",
    ":not([href$=\".7z\"])",
    ":not([href$=\".arj\"])",
    ":not([href$=\".rar\"])",
    ":not([href$=\".bin\"])",
    ":not([href$=\".msi\"])",
    ":not([href$=\".sh\"])",
    ":not([href$=\".bat\"])",
    ":not([href$=\".dmg\"])",
    ":not([href$=\".iso\"])",
    ":not([href$=\".toast\"])",
    ":not([href$=\".vcd\"])",
    ":not([href$=\".csv\"])",
    ":not([href$=\".log\"])",
    ":not([href$=\".sql\"])",
    ":not([href$=\".db\"])",
    ":not([href$=\".exe\"])",
    ":not([href$=\".rss\"])",
    ":not([href$=\".key\"])",
    ":not([href$=\".odp\"])",
    ":not([href$=\".pps\"])",
    ":not([href$=\".ptt\"])",
    ":not([href$=\".pptx\"])",
    ":not([href$=\".dump\"])",
);

type ScraperResult<T> = Result<T, Box<dyn Error>>;

pub struct ScrapedPage {
    pub text: String,
    pub links: HashSet<String>,
}

/// Parses one fetched page: resolves every crawlable `<a href>` against the
/// base URL and extracts whitespace-joined visible text with `script`,
/// `style` and `noscript` subtrees removed.
pub fn scrape_page(url: &str, page: &str) -> ScraperResult<ScrapedPage> {
    let document = Html::parse_document(page);
    let selector = Selector::parse(LINK_SELECTOR)?;

    let mut links = HashSet::new();
    for element in document.select(&selector) {
        if let Some(link) = element.value().attr("href") {
            if let Ok(normalized_url) = normalize_href(url, link) {
                links.insert(normalized_url);
            }
        }
    }

    let text = extract_text_content(&document)?;

    Ok(ScrapedPage { text, links })
}

fn extract_text_content(document: &Html) -> ScraperResult<String> {
    let body_selector = Selector::parse("body")?;
    let all_selector = Selector::parse("*")?;
    let ignore_selector = Selector::parse("script, style, noscript")?;

    let mut text_content = String::new();

    if let Some(body) = document.select(&body_selector).next() {
        for node in body.select(&all_selector) {
            if !ignore_selector.matches(&node) {
                let text = node.text().collect::<Vec<_>>().join(" ");
                let text = text.trim();
                if !text.is_empty() {
                    text_content.push_str(text);
                    text_content.push(' ');
                }
            }
        }
    }

    Ok(text_content.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_script_and_style_text() {
        let html = r#"
            <html><body>
                <h1>Hello</h1>
                <script>var x = 1;</script>
                <style>body { color: red; }</style>
                <p>World</p>
            </body></html>
        "#;

        let scraped = scrape_page("https://example.com", html).unwrap();
        assert!(scraped.text.contains("Hello"));
        assert!(scraped.text.contains("World"));
        assert!(!scraped.text.contains("var x"));
        assert!(!scraped.text.contains("color: red"));
    }

    #[test]
    fn resolves_relative_links() {
        let html = r#"<html><body><a href="/about">About</a><a href="pic.png">img</a></body></html>"#;
        let scraped = scrape_page("https://example.com/base/", html).unwrap();
        assert!(scraped.links.contains("https://example.com/about"));
        assert!(!scraped.links.iter().any(|l| l.ends_with("pic.png")));
    }
}
