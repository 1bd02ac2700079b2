//! Rendering of command lines for logs and operator hints.

/// Quote `s` for a POSIX shell, leaving plain words untouched.
///
/// # Examples
///
/// ```
/// use agent_deploy::utils::shell::quote;
///
/// assert_eq!(quote("get-value"), "get-value");
/// assert_eq!(quote("--format=value(config.name)"), "'--format=value(config.name)'");
/// assert_eq!(quote("foo'bar"), "'foo'\\''bar'");
/// ```
pub fn quote(s: &str) -> String {
    if !s.is_empty() && s.chars().all(is_plain) {
        return s.to_string();
    }
    format!("'{}'", s.replace('\'', r"'\''"))
}

fn is_plain(c: char) -> bool {
    c.is_ascii_alphanumeric() || "-_./=:@,+%".contains(c)
}

/// Join arguments into a line that can be pasted into a terminal
pub fn join_args(args: &[impl AsRef<str>]) -> String {
    args.iter()
        .map(|arg| quote(arg.as_ref()))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_words_unquoted() {
        assert_eq!(quote("roles/owner"), "roles/owner");
        assert_eq!(quote("--project=acme-prod"), "--project=acme-prod");
        assert_eq!(quote("user:dev@acme.com"), "user:dev@acme.com");
    }

    #[test]
    fn test_empty_is_quoted() {
        assert_eq!(quote(""), "''");
    }

    #[test]
    fn test_special_chars_quoted() {
        assert_eq!(quote("$(whoami)"), "'$(whoami)'");
        assert_eq!(quote("bindings[].members"), "'bindings[].members'");
        assert_eq!(quote("hello world"), "'hello world'");
    }

    #[test]
    fn test_single_quote_escaped() {
        assert_eq!(quote("it's"), "'it'\\''s'");
    }

    #[test]
    fn test_join_args() {
        let args = ["gcloud", "projects", "get-iam-policy", "acme", "--flatten=bindings[].members"];
        assert_eq!(
            join_args(&args),
            "gcloud projects get-iam-policy acme '--flatten=bindings[].members'"
        );
    }
}
