//! Wrap-preference parsing for the `standardPayload` query token.

/// Interpret a client-supplied wrap preference.
///
/// Truthy tokens opt in, falsy tokens opt out, anything else expresses
/// no preference and the process default applies. Matching is
/// case-insensitive and ignores surrounding whitespace.
pub fn resolve_wrap_preference(raw: Option<&str>) -> Option<bool> {
    let token = raw?.trim().to_ascii_lowercase();
    match token.as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truthy_tokens() {
        for token in ["1", "true", "yes", "on", "TRUE", " Yes "] {
            assert_eq!(resolve_wrap_preference(Some(token)), Some(true), "{token}");
        }
    }

    #[test]
    fn falsy_tokens() {
        for token in ["0", "false", "no", "off", "OFF", " False "] {
            assert_eq!(resolve_wrap_preference(Some(token)), Some(false), "{token}");
        }
    }

    #[test]
    fn unrecognized_tokens_express_no_preference() {
        for token in ["", "2", "maybe", "y", "enabled"] {
            assert_eq!(resolve_wrap_preference(Some(token)), None, "{token:?}");
        }
        assert_eq!(resolve_wrap_preference(None), None);
    }
}
