//! Google News RSS search, used when no article API is available.

use crate::clients::NewsProvider;
use crate::types::NewsSource;
use crate::{AppError, Result};
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Client;
use std::time::Duration;
use url::Url;

const TIMEOUT_SECS: u64 = 10;
const MAX_ITEMS: usize = 5;
const SOURCE_NAME: &str = "Google News";
const USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

static ITEM_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<item(?:\s[^>]*)?>(.*?)</item>").expect("valid item regex"));
static TITLE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<title(?:\s[^>]*)?>(.*?)</title>").expect("valid title regex"));
static LINK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<link(?:\s[^>]*)?>(.*?)</link>").expect("valid link regex"));
static NUMERIC_ENTITY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"&#(?:[xX]([0-9a-fA-F]+)|([0-9]+));").expect("valid numeric entity regex")
});

pub struct GoogleNewsRss {
    client: Client,
    search_url: String,
}

impl GoogleNewsRss {
    pub fn new(search_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(TIMEOUT_SECS))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            search_url: search_url.into(),
        })
    }

    fn feed_url(&self, query: &str) -> Result<Url> {
        Url::parse_with_params(&self.search_url, &[("q", query), ("hl", "en-US")])
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Invalid RSS search URL: {}", e)))
    }
}

#[async_trait]
impl NewsProvider for GoogleNewsRss {
    async fn search(&self, query: &str) -> Result<Vec<NewsSource>> {
        let url = self.feed_url(query)?;

        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::ExternalApi(format!(
                "Google News RSS returned {}",
                status
            )));
        }

        let body = response.text().await?;
        Ok(parse_rss_items(&body, MAX_ITEMS))
    }

    fn provider_name(&self) -> &'static str {
        "google-news-rss"
    }
}

/// Extracts up to `limit` items from an RSS document. Items without a title
/// or link keep an empty string for the missing field.
pub fn parse_rss_items(xml: &str, limit: usize) -> Vec<NewsSource> {
    ITEM_RE
        .captures_iter(xml)
        .take(limit)
        .map(|item| {
            let body = item.get(1).map_or("", |m| m.as_str());
            NewsSource {
                title: element_text(&TITLE_RE, body),
                description: String::new(),
                url: element_text(&LINK_RE, body),
                source: SOURCE_NAME.to_string(),
            }
        })
        .collect()
}

fn element_text(re: &Regex, body: &str) -> String {
    re.captures(body)
        .and_then(|c| c.get(1))
        .map(|m| unescape(strip_cdata(m.as_str().trim())))
        .unwrap_or_default()
}

fn strip_cdata(text: &str) -> &str {
    text.strip_prefix("<![CDATA[")
        .and_then(|t| t.strip_suffix("]]>"))
        .unwrap_or(text)
}

fn unescape(text: &str) -> String {
    let named = text
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'");
    // &amp; last so "&amp;lt;" decodes to "&lt;" and not "<".
    decode_numeric_entities(&named).replace("&amp;", "&")
}

/// Decodes `&#NNN;` and `&#xHH;`. References to invalid code points are kept.
fn decode_numeric_entities(text: &str) -> String {
    NUMERIC_ENTITY_RE
        .replace_all(text, |caps: &regex::Captures| {
            let code = match (caps.get(1), caps.get(2)) {
                (Some(hex), _) => u32::from_str_radix(hex.as_str(), 16).ok(),
                (None, Some(dec)) => dec.as_str().parse::<u32>().ok(),
                _ => None,
            };
            code.and_then(char::from_u32)
                .map(String::from)
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}
