use crate::curl::tokenizer::split_words;
use crate::error::{DocError, Result};
use crate::models::{ParsedCommand, RequestDescriptor};
use base64::{engine::general_purpose, Engine as _};
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::LazyLock;

const CLIENT_NAME: &str = "curl";

// RFC 3986 appendix B, except that a scheme only counts when followed by `//`
static URL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)^(?:([A-Za-z][A-Za-z0-9+.\-]*)://([^/?#]*))?([^?#]*)(?:\?([^#]*))?(?:#.*)?$")
        .expect("url pattern is valid")
});

static LINE_CONTINUATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\\\r?\n").expect("line continuation pattern is valid"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flag {
    Header,
    Method,
    Data,
    User,
}

impl Flag {
    fn from_long(name: &str) -> Option<Self> {
        match name {
            "header" => Some(Self::Header),
            "request" => Some(Self::Method),
            "data" | "data-raw" | "data-binary" | "data-ascii" => Some(Self::Data),
            "user" => Some(Self::User),
            _ => None,
        }
    }

    fn from_short(c: char) -> Option<Self> {
        match c {
            'H' => Some(Self::Header),
            'X' => Some(Self::Method),
            'd' => Some(Self::Data),
            'u' => Some(Self::User),
            _ => None,
        }
    }

    fn describe(self) -> &'static str {
        match self {
            Self::Header => "-H/--header",
            Self::Method => "-X/--request",
            Self::Data => "-d/--data-raw",
            Self::User => "-u/--user",
        }
    }
}

/// Raw flag values in the order curl would see them.
#[derive(Debug, Default)]
struct CurlArgs {
    url: Option<String>,
    headers: Vec<String>,
    method: Option<String>,
    data: Option<String>,
    user: Option<String>,
    unknown: Vec<String>,
}

impl CurlArgs {
    fn set(&mut self, flag: Flag, value: String) {
        match flag {
            Flag::Header => self.headers.push(value),
            Flag::Method => self.method = Some(value),
            Flag::Data => self.data = Some(value),
            Flag::User => self.user = Some(value),
        }
    }

    fn operand(&mut self, word: String) {
        if self.url.is_none() {
            self.url = Some(word);
        } else {
            self.unknown.push(word);
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
struct UrlParts<'a> {
    path: &'a str,
    query: &'a str,
}

/// Turns a captured `curl ...` invocation into a [`RequestDescriptor`].
#[derive(Debug, Clone, Default)]
pub struct CurlParser {
    strict: bool,
}

impl CurlParser {
    pub fn new() -> Self {
        Self { strict: false }
    }

    /// Fail on unknown flags instead of reporting them as warnings.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn parse(&self, command: &str) -> Result<ParsedCommand> {
        let command = clean_command(command);
        let words = split_words(&command)?;

        let mut words = words.into_iter();
        match words.next() {
            Some(first) if first == CLIENT_NAME => {}
            _ => {
                return Err(DocError::malformed_command(format!(
                    "a curl command must start with \"{CLIENT_NAME}\""
                )));
            }
        }

        let args = collect_args(words)?;

        if !args.unknown.is_empty() {
            if self.strict {
                return Err(DocError::UnrecognizedOption(args.unknown));
            }
            for option in &args.unknown {
                tracing::warn!(option = %option, "ignoring unrecognized curl option");
            }
        }

        let warnings = args
            .unknown
            .iter()
            .map(|option| format!("unrecognized option: {option}"))
            .collect();
        let request = build_request(args)?;

        tracing::debug!(
            method = %request.method,
            url = %request.url,
            headers = request.headers.len(),
            has_body = request.body.is_some(),
            "parsed curl command"
        );

        Ok(ParsedCommand { request, warnings })
    }
}

/// Drops shell line continuations and surrounding whitespace.
pub fn clean_command(command: &str) -> String {
    LINE_CONTINUATION.replace_all(command, "").trim().to_string()
}

fn collect_args(mut words: impl Iterator<Item = String>) -> Result<CurlArgs> {
    let mut args = CurlArgs::default();

    while let Some(word) = words.next() {
        if word == "--" {
            for operand in words.by_ref() {
                args.operand(operand);
            }
            break;
        }
        if let Some(long) = word.strip_prefix("--").filter(|l| !l.is_empty()) {
            let (name, inline) = match long.split_once('=') {
                Some((name, value)) => (name, Some(value.to_string())),
                None => (long, None),
            };
            let Some(flag) = Flag::from_long(name) else {
                args.unknown.push(word);
                continue;
            };
            let value = match inline {
                Some(value) => value,
                None => take_value(&mut words, flag)?,
            };
            args.set(flag, value);
        } else if let Some(short) = word.strip_prefix('-').filter(|s| !s.is_empty()) {
            let mut chars = short.chars();
            let Some(flag) = chars.next().and_then(Flag::from_short) else {
                args.unknown.push(word);
                continue;
            };
            let attached = chars.as_str();
            let value = if attached.is_empty() {
                take_value(&mut words, flag)?
            } else {
                attached.to_string()
            };
            args.set(flag, value);
        } else {
            args.operand(word);
        }
    }

    Ok(args)
}

fn take_value(words: &mut impl Iterator<Item = String>, flag: Flag) -> Result<String> {
    words.next().ok_or_else(|| {
        DocError::malformed_command(format!("argument {}: expected one argument", flag.describe()))
    })
}

fn build_request(args: CurlArgs) -> Result<RequestDescriptor> {
    let raw_url = args
        .url
        .ok_or_else(|| DocError::malformed_command("the following arguments are required: url"))?;

    let url = if split_url(&raw_url).is_some() {
        raw_url.clone()
    } else {
        format!("http://{raw_url}")
    };
    let parts = split_url(&url)
        .ok_or_else(|| DocError::malformed_command(format!("cannot decompose url {raw_url}")))?;

    let mut request = RequestDescriptor {
        method: args.method.as_deref().unwrap_or("GET").to_uppercase(),
        path: parts.path.to_string(),
        query: parts.query.to_string(),
        ..RequestDescriptor::default()
    };
    request.url = url;

    for header in &args.headers {
        let (name, value) = header
            .split_once(':')
            .ok_or_else(|| DocError::malformed_command(format!("header without a colon: {header}")))?;
        let (name, value) = (name.trim(), value.trim());
        if name.eq_ignore_ascii_case("cookie") {
            parse_cookies(value, &mut request.cookies);
        } else {
            request.headers.push((name.to_string(), value.to_string()));
        }
    }

    if let Some(auth) = &args.user {
        let (user, password) = auth.split_once(':').unwrap_or((auth.as_str(), ""));
        request
            .headers
            .push(("Authorization".to_string(), basic_auth_header(user, password)));
    }

    request.body = args.data;

    Ok(request)
}

/// Splits a url that carries a `scheme://` prefix; `None` when it has none.
fn split_url(url: &str) -> Option<UrlParts<'_>> {
    let caps = URL_PATTERN.captures(url)?;
    caps.get(1)?;
    Some(UrlParts {
        path: caps.get(3).map_or("", |m| m.as_str()),
        query: caps.get(4).map_or("", |m| m.as_str()),
    })
}

fn parse_cookies(value: &str, cookies: &mut BTreeMap<String, String>) {
    for pair in value.split(';') {
        let Some((name, value)) = pair.split_once('=') else {
            continue;
        };
        let name = name.trim();
        if name.is_empty() {
            continue;
        }
        let value = value.trim();
        let value = value
            .strip_prefix('"')
            .and_then(|v| v.strip_suffix('"'))
            .unwrap_or(value);
        cookies.insert(name.to_string(), value.to_string());
    }
}

fn basic_auth_header(user: &str, password: &str) -> String {
    let credentials = general_purpose::STANDARD.encode(format!("{user}:{password}"));
    format!("Basic {credentials}")
}
