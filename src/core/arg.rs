//! Positional message arguments and redaction
//!
//! Arguments are kept unrendered on the record until the message is first
//! needed. A value either renders through `Display` or, when it carries
//! sensitive data, through its [`Redactor`] implementation.

use std::fmt;
use std::sync::Arc;

/// Values that must not appear verbatim in log output.
pub trait Redactor: Send + Sync {
    /// Text to print in place of the real value.
    fn redacted(&self) -> String;
}

/// Returns a string of `*` with one star per character of `s`.
pub fn redact(s: &str) -> String {
    "*".repeat(s.chars().count())
}

/// A string that is always printed redacted.
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The unredacted value.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl Redactor for Secret {
    fn redacted(&self) -> String {
        redact(&self.0)
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Secret({})", redact(&self.0))
    }
}

/// One positional argument of a message template.
#[derive(Clone)]
pub enum Arg {
    Plain(Arc<dyn fmt::Display + Send + Sync>),
    Redactable(Arc<dyn Redactor>),
}

impl Arg {
    pub fn plain<T>(value: T) -> Self
    where
        T: fmt::Display + Send + Sync + 'static,
    {
        Arg::Plain(Arc::new(value))
    }

    pub fn redactable<R: Redactor + 'static>(value: R) -> Self {
        Arg::Redactable(Arc::new(value))
    }

    /// Render the argument as it should appear in the message.
    pub fn render(&self) -> String {
        match self {
            Arg::Plain(value) => value.to_string(),
            Arg::Redactable(value) => value.redacted(),
        }
    }
}

impl fmt::Debug for Arg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arg::Plain(value) => f.debug_tuple("Plain").field(&value.to_string()).finish(),
            Arg::Redactable(value) => f.debug_tuple("Redactable").field(&value.redacted()).finish(),
        }
    }
}

impl From<Secret> for Arg {
    fn from(secret: Secret) -> Self {
        Arg::redactable(secret)
    }
}

impl From<&str> for Arg {
    fn from(s: &str) -> Self {
        Arg::plain(s.to_string())
    }
}

impl From<&String> for Arg {
    fn from(s: &String) -> Self {
        Arg::plain(s.clone())
    }
}

macro_rules! plain_arg_from {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Arg {
                fn from(value: $ty) -> Self {
                    Arg::plain(value)
                }
            }
        )*
    };
}

plain_arg_from!(
    String, char, bool, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64,
);

/// Substitute `args` into `template`.
///
/// Each `{}` consumes the next argument; `{{` and `}}` are literal braces.
/// Placeholders without an argument become `{!missing}` and leftover
/// arguments are appended as ` {!extra: a, b}`.
pub fn render_template(template: &str, args: &[Arg]) -> String {
    let mut out = String::with_capacity(template.len() + args.len() * 8);
    let mut next = 0;
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '{' if chars.peek() == Some(&'{') => {
                chars.next();
                out.push('{');
            }
            '{' if chars.peek() == Some(&'}') => {
                chars.next();
                match args.get(next) {
                    Some(arg) => out.push_str(&arg.render()),
                    None => out.push_str("{!missing}"),
                }
                next += 1;
            }
            '}' if chars.peek() == Some(&'}') => {
                chars.next();
                out.push('}');
            }
            _ => out.push(c),
        }
    }

    if next < args.len() {
        let extra = args[next..]
            .iter()
            .map(Arg::render)
            .collect::<Vec<_>>()
            .join(", ");
        out.push_str(" {!extra: ");
        out.push_str(&extra);
        out.push('}');
    }

    out
}
