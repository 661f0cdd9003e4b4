/// Display name stored for a user: the given name, or the login when the name
/// is missing or blank.
pub fn display_name(name: Option<String>, login: &str) -> String {
    match name {
        Some(name) if !name.trim().is_empty() => name,
        _ => login.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_names_fall_back_to_login() {
        for name in [None, Some(""), Some("   "), Some("\t")] {
            assert_eq!(display_name(name.map(str::to_string), "testlogin"), "testlogin");
        }
    }

    #[test]
    fn given_name_is_kept_verbatim() {
        assert_eq!(display_name(Some(" Test User ".to_string()), "testlogin"), " Test User ");
    }
}
