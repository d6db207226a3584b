//! Browser identity sent with engine requests

use rand::seq::SliceRandom;
use rand::Rng;

const PLATFORMS: &[&str] = &[
    "Windows NT 10.0; Win64; x64",
    "Macintosh; Intel Mac OS X 10_15_7",
    "Macintosh; Intel Mac OS X 14_4_1",
    "X11; Linux x86_64",
    "X11; Ubuntu; Linux x86_64",
];

const CHROME: &[&str] = &["122.0.0.0", "123.0.0.0", "124.0.0.0", "125.0.0.0", "126.0.0.0"];
const FIREFOX: &[&str] = &["124.0", "125.0", "126.0", "127.0"];
const SAFARI: &[&str] = &["17.3", "17.4", "17.5"];

#[derive(Debug, Clone, Copy)]
enum Browser {
    Chrome(&'static str),
    Firefox(&'static str),
    Safari(&'static str),
}

impl Browser {
    /// Roughly the desktop market share: mostly Chrome, some Firefox, little Safari
    fn pick<R: Rng>(rng: &mut R) -> Self {
        let version = |versions: &[&'static str], rng: &mut R| {
            versions.choose(rng).copied().unwrap_or(versions[0])
        };
        match rng.gen_range(0..10) {
            0..=5 => Browser::Chrome(version(CHROME, rng)),
            6..=8 => Browser::Firefox(version(FIREFOX, rng)),
            _ => Browser::Safari(version(SAFARI, rng)),
        }
    }

    fn user_agent(self, platform: &str) -> String {
        match self {
            Browser::Chrome(v) => format!(
                "Mozilla/5.0 ({}) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/{} Safari/537.36",
                platform, v
            ),
            Browser::Firefox(v) => format!(
                "Mozilla/5.0 ({}; rv:{}) Gecko/20100101 Firefox/{}",
                platform, v, v
            ),
            // Safari only ships on macOS
            Browser::Safari(v) => format!(
                "Mozilla/5.0 (Macintosh; Intel Mac OS X 14_4_1) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/{} Safari/605.1.15",
                v
            ),
        }
    }
}

/// Random desktop browser user agent
pub fn generate_user_agent() -> String {
    let mut rng = rand::thread_rng();
    let platform = PLATFORMS.choose(&mut rng).copied().unwrap_or(PLATFORMS[0]);
    Browser::pick(&mut rng).user_agent(platform)
}

/// Accept header of a browser page load
pub fn accept_html() -> &'static str {
    "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,*/*;q=0.8"
}

/// Accept-Language for a search region such as "us-en" or "de-de"
///
/// Regions without a country ("wt-wt") fall back to US English.
pub fn accept_language(region: &str) -> String {
    let region = region.trim().to_lowercase();
    let (country, lang) = region.split_once('-').unwrap_or(("", region.as_str()));

    if lang.is_empty() || lang == "wt" {
        return "en-US,en;q=0.9".to_string();
    }
    if country.is_empty() || country == "wt" {
        return format!("{},en;q=0.8", lang);
    }

    let tag = format!("{}-{}", lang, country.to_uppercase());
    if lang == "en" {
        format!("{},en;q=0.9", tag)
    } else {
        format!("{},{};q=0.9,en;q=0.8", tag, lang)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_user_agent() {
        for _ in 0..20 {
            let ua = generate_user_agent();
            assert!(ua.starts_with("Mozilla/5.0 ("));
            assert!(ua.contains("Chrome/") || ua.contains("Firefox/") || ua.contains("Version/"));
        }
    }

    #[test]
    fn test_accept_language() {
        assert_eq!(accept_language("us-en"), "en-US,en;q=0.9");
        assert_eq!(accept_language("de-de"), "de-DE,de;q=0.9,en;q=0.8");
        assert_eq!(accept_language("wt-wt"), "en-US,en;q=0.9");
        assert_eq!(accept_language("fr"), "fr,en;q=0.8");
        assert_eq!(accept_language(""), "en-US,en;q=0.9");
    }
}
