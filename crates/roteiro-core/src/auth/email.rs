use regex::Regex;
use std::sync::OnceLock;

const MAX_EMAIL_LEN: usize = 254;

fn email_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)*\.[A-Za-z]{2,}$",
        )
        .expect("static email regex")
    })
}

/// Address with a local part, a dotted domain and an alphabetic TLD.
pub fn is_email(candidate: &str) -> bool {
    if candidate.len() > MAX_EMAIL_LEN {
        return false;
    }
    let Some((local, _)) = candidate.split_once('@') else {
        return false;
    };
    if local.len() > 64 || local.starts_with('.') || local.ends_with('.') || local.contains("..")
    {
        return false;
    }
    email_regex().is_match(candidate)
}
