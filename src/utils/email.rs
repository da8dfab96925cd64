use validator::ValidateEmail;

/// Top-level names that never route on the public internet.
const SPECIAL_USE_DOMAINS: [&str; 6] = ["arpa", "invalid", "local", "localhost", "onion", "test"];

/// Checks the address and returns its stored form: the local part as given,
/// the domain lowercased. Domains must be dotted and publicly routable.
pub fn normalize_email(raw: &str) -> Option<String> {
    if !raw.validate_email() {
        return None;
    }

    let (local, domain) = raw.rsplit_once('@')?;
    let domain = domain.to_ascii_lowercase();

    if !domain.contains('.') || domain.starts_with('[') {
        return None;
    }

    let special = SPECIAL_USE_DOMAINS
        .iter()
        .any(|name| domain == *name || domain.ends_with(&format!(".{name}")));
    if special {
        return None;
    }

    Some(format!("{local}@{domain}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercases_the_domain_only() {
        assert_eq!(normalize_email("Jane.Doe@Example.COM").as_deref(), Some("Jane.Doe@example.com"));
        assert_eq!(normalize_email("a@x.com").as_deref(), Some("a@x.com"));
    }

    #[test]
    fn rejects_undotted_and_special_use_domains() {
        for raw in ["a@localhost", "a@LOCALHOST", "a@intranet", "a@host.local", "a@site.test", "a@[127.0.0.1]"] {
            assert_eq!(normalize_email(raw), None, "{raw}");
        }
    }

    #[test]
    fn rejects_malformed_addresses() {
        for raw in ["", "plain", "@x.com", "a@", "a b@x.com"] {
            assert_eq!(normalize_email(raw), None, "{raw}");
        }
    }
}
