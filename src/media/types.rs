use serde::Serialize;
use serde_json::Value;

/// Why the advisory check rejected an input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    MissingUrl,
    UnrecognizedShape,
}

impl Rejection {
    pub fn reason(&self) -> &'static str {
        match self {
            Self::MissingUrl => "missing URL",
            Self::UnrecognizedShape => {
                "Please enter a valid TikTok URL. Examples:\n\
                 • https://www.tiktok.com/@username/video/123456789\n\
                 • https://vm.tiktok.com/ZMA56TGY8/\n\
                 • https://www.tiktok.com/t/abc123def"
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Verdict {
    pub valid: bool,
    pub rejection: Option<Rejection>,
}

impl Verdict {
    pub fn accepted() -> Self {
        Self {
            valid: true,
            rejection: None,
        }
    }

    pub fn rejected(rejection: Rejection) -> Self {
        Self {
            valid: false,
            rejection: Some(rejection),
        }
    }

    pub fn reason(&self) -> Option<&'static str> {
        self.rejection.as_ref().map(Rejection::reason)
    }
}

/// A playable media URL plus the provider document it was found in.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Extraction {
    pub media_url: String,
    pub source: Value,
}

/// Status and raw body of one provider round trip.
#[derive(Debug, Clone)]
pub struct Reply {
    pub status: u16,
    pub body: Vec<u8>,
}

/// Where a session's current request stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Validating,
    Rejected,
    Requesting,
    TimedOut,
    HttpError,
    Parsing,
    Extracted,
    NoMatch,
}
