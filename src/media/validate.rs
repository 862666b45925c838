use super::{
    error::ResolveError,
    types::{Rejection, Verdict},
};
use regex::Regex;
use std::sync::LazyLock;
use url::Url;

/// Link shapes accepted by the advisory check. Matching any one is enough.
static PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        Regex::new(r"https?://(www\.|vm\.|vt\.|m\.)?tiktok\.com/(.*/video/\d+|.*\?|t/\w+/|\w+/|\S+)")
            .unwrap(),
        Regex::new(r"https?://(vm|vt)\.tiktok\.com/\w+").unwrap(),
        Regex::new(r"https?://www\.tiktok\.com/t/\w+").unwrap(),
    ]
});

const ALLOWED_HOSTS: &[&str] = &["tiktok.com", "vm.tiktok.com", "vt.tiktok.com", "m.tiktok.com"];

/// Advisory shape check, meant for feedback while the user types.
pub fn validate(input: &str) -> Verdict {
    let input = input.trim();
    if input.is_empty() {
        return Verdict::rejected(Rejection::MissingUrl);
    }

    if PATTERNS.iter().any(|pattern| pattern.is_match(input)) {
        Verdict::accepted()
    } else {
        Verdict::rejected(Rejection::UnrecognizedShape)
    }
}

/// Submit-time gate. Looser than [`validate`]: the input only has to parse as an absolute
/// URL whose host contains an allowed domain. Returns the trimmed input on success.
pub fn admit(input: &str) -> Result<&str, ResolveError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(ResolveError::MissingInput);
    }

    let allowed = Url::parse(input)
        .ok()
        .and_then(|url| url.host_str().map(str::to_ascii_lowercase))
        .is_some_and(|host| ALLOWED_HOSTS.iter().any(|domain| host.contains(domain)));

    if allowed {
        Ok(input)
    } else {
        Err(ResolveError::InvalidUrlShape(input.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::ErrorKind;

    #[test]
    fn test_blank_input_is_missing() {
        for input in ["", "   ", "\t", "\n  \r\n", " \u{3000} "] {
            let verdict = validate(input);
            assert!(!verdict.valid, "{input:?}");
            assert_eq!(verdict.rejection, Some(Rejection::MissingUrl));
            assert_eq!(verdict.reason(), Some("missing URL"));

            let err = admit(input).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::MissingInput);
        }
    }

    #[test]
    fn test_accepts_known_shapes() {
        let urls = [
            "https://www.tiktok.com/@username/video/123456789",
            "http://tiktok.com/@user.name/video/7234567890123456789",
            "https://m.tiktok.com/v/123456.html",
            "https://vm.tiktok.com/ZMA56TGY8/",
            "https://vt.tiktok.com/ZSabc123/",
            "https://vm.tiktok.com/ZMA56TGY8",
            "https://www.tiktok.com/t/abc123def",
            "https://www.tiktok.com/t/abc123def/",
            "https://www.tiktok.com/@user/video/1?is_from_webapp=1",
            "https://tiktok.com/explore",
            "  https://www.tiktok.com/@username/video/123456789  ",
            "Check this out https://vm.tiktok.com/ZMA56TGY8/",
            "https://www.tiktok.com/t/ZTabc123/ shared via app",
        ];
        for url in urls {
            assert_eq!(validate(url), Verdict::accepted(), "{url}");
        }
    }

    #[test]
    fn test_rejects_foreign_shapes() {
        let urls = [
            "not a url",
            "https://www.youtube.com/watch?v=123",
            "tiktok.com/@user/video/1",
            "ftp://www.tiktok.com/@user/video/1",
            "https://www.tiktok.com/",
        ];
        for url in urls {
            let verdict = validate(url);
            assert!(!verdict.valid, "{url}");
            assert_eq!(verdict.rejection, Some(Rejection::UnrecognizedShape));
            assert!(verdict.reason().is_some_and(|r| r.contains("valid TikTok URL")));
        }
    }

    #[test]
    fn test_admission_accepts_platform_hosts() {
        for url in [
            "https://www.tiktok.com/@user/video/1",
            "https://vm.tiktok.com/ZMA56TGY8/",
            "https://m.tiktok.com/anything",
            "https://WWW.TIKTOK.COM/@user",
            "https://www.tiktok.com/",
        ] {
            assert!(admit(url).is_ok(), "{url}");
        }
        assert_eq!(
            admit("  https://vt.tiktok.com/x  ").unwrap(),
            "https://vt.tiktok.com/x"
        );
    }

    #[test]
    fn test_admission_rejects_other_hosts_regardless_of_path() {
        for url in [
            "https://www.youtube.com/@user/video/123456789",
            "https://example.com/t/abc123/",
            "https://evil.example/?next=https://www.tiktok.com/@u/video/1",
            "www.tiktok.com/@user/video/1",
            "mailto:someone@tiktok.com",
            "garbage",
        ] {
            let err = admit(url).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidUrlShape, "{url}");
        }
    }

    #[test]
    fn test_share_text_is_advisory_only() {
        let shared = "Check this out https://vm.tiktok.com/ZMA56TGY8/";
        assert!(validate(shared).valid);
        assert_eq!(admit(shared).unwrap_err().kind(), ErrorKind::InvalidUrlShape);
    }

    #[test]
    fn test_admission_is_looser_than_pattern_check() {
        let url = "https://www.tiktok.com/";
        assert!(!validate(url).valid);
        assert!(admit(url).is_ok());
    }
}
