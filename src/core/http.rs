//! Browser-like request headers.
//!
//! The statistics API throttles obvious scripted traffic, so every request
//! carries headers picked per request from the pools below.

use rand::seq::SliceRandom;
use rand::Rng;
use reqwest::header::{
    HeaderMap, HeaderName, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CACHE_CONTROL, REFERER,
    USER_AGENT,
};

pub const USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/119.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/119.0.0.0 Safari/537.36",
    "Mozilla/5.0 (X11; Ubuntu; Linux x86_64; rv:109.0) Gecko/20100101 Firefox/119.0",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:109.0) Gecko/20100101 Firefox/119.0",
    "Mozilla/5.0 (Linux; Android 11; SM-G998B) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/119.0.0.0 Mobile Safari/537.36",
    "Mozilla/5.0 (iPhone; CPU iPhone OS 15_7_1 like Mac OS X) AppleWebKit/537.36 (KHTML, like Gecko) Version/15.7 Mobile/15E148 Safari/537.36",
    "Mozilla/5.0 (Android 13; Mobile; rv:119.0) Gecko/119.0 Firefox/119.0",
    "Mozilla/5.0 (iPhone; CPU iPhone OS 16_6 like Mac OS X) AppleWebKit/537.36 (KHTML, like Gecko) Version/16.6 Mobile/15E148 Safari/537.36",
    "Mozilla/5.0 (Linux; Android 12; Pixel 7 Pro) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/119.0.0.0 Mobile Safari/537.36",
];

pub const ACCEPT_LANGUAGES: &[&str] = &["en-US,en;q=0.5", "en-GB,en;q=0.9", "fr-FR,fr;q=0.9"];

pub const REFERERS: &[&str] = &[
    "https://www.sofascore.com/football",
    "https://www.sofascore.com/",
];

fn pick<R: Rng + ?Sized>(rng: &mut R, pool: &'static [&'static str]) -> HeaderValue {
    HeaderValue::from_static(pool.choose(rng).copied().unwrap_or(pool[0]))
}

/// Build one request's worth of headers, rotating user agent, language and referer.
pub fn browser_headers<R: Rng + ?Sized>(rng: &mut R) -> HeaderMap {
    let mut h = HeaderMap::new();
    h.insert(USER_AGENT, pick(rng, USER_AGENTS));
    h.insert(ACCEPT, HeaderValue::from_static("*/*"));
    h.insert(ACCEPT_LANGUAGE, pick(rng, ACCEPT_LANGUAGES));
    h.insert(REFERER, pick(rng, REFERERS));
    h.insert(CACHE_CONTROL, HeaderValue::from_static("max-age=0"));
    h.insert(
        HeaderName::from_static("x-requested-with"),
        HeaderValue::from_static("12456b"),
    );
    h
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_browser_headers_use_known_values() {
        let mut rng = rand::thread_rng();
        let headers = browser_headers(&mut rng);

        let ua = headers.get(USER_AGENT).unwrap().to_str().unwrap();
        assert!(USER_AGENTS.contains(&ua));

        let lang = headers.get(ACCEPT_LANGUAGE).unwrap().to_str().unwrap();
        assert!(ACCEPT_LANGUAGES.contains(&lang));

        let referer = headers.get(REFERER).unwrap().to_str().unwrap();
        assert!(REFERERS.contains(&referer));

        assert_eq!(headers.get(ACCEPT).unwrap(), "*/*");
        assert!(headers.contains_key("x-requested-with"));
    }

    #[test]
    fn test_browser_headers_rotate_user_agents() {
        let mut rng = rand::thread_rng();
        let seen: HashSet<String> = (0..200)
            .map(|_| {
                browser_headers(&mut rng)
                    .get(USER_AGENT)
                    .unwrap()
                    .to_str()
                    .unwrap()
                    .to_string()
            })
            .collect();

        assert!(seen.len() > 1, "expected more than one user agent in 200 draws");
    }
}
