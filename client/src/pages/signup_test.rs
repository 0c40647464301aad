use super::*;

#[test]
fn validate_signup_input_normalizes_fields() {
    assert_eq!(
        validate_signup_input("  Ada  ", " ADA@example.com ", "password1", "password1"),
        Ok(SignupInput { name: "Ada".into(), email: "ada@example.com".into(), password: "password1".into() })
    );
}

#[test]
fn validate_signup_input_requires_name() {
    assert_eq!(validate_signup_input("  ", "a@b.com", "password1", "password1"), Err(MSG_NAME_MISSING));
}

#[test]
fn validate_signup_input_requires_valid_email() {
    assert_eq!(validate_signup_input("Ada", "", "password1", "password1"), Err(MSG_INVALID_EMAIL));
    assert_eq!(validate_signup_input("Ada", "ada.example.com", "password1", "password1"), Err(MSG_INVALID_EMAIL));
}

#[test]
fn validate_signup_input_enforces_password_length() {
    assert_eq!(validate_signup_input("Ada", "a@b.com", "short", "short"), Err(MSG_PASSWORD_SHORT));
    assert!(validate_signup_input("Ada", "a@b.com", "12345678", "12345678").is_ok());
}

#[test]
fn validate_signup_input_requires_matching_confirmation() {
    assert_eq!(
        validate_signup_input("Ada", "a@b.com", "password1", "password2"),
        Err(MSG_PASSWORD_MISMATCH)
    );
}

#[test]
fn signup_form_renders_four_inputs() {
    let html = Owner::new().with(|| view! { <Signup/> }.to_html());
    assert!(html.contains("class=\"signup-card\""));
    assert_eq!(html.matches("class=\"auth-input\"").count(), 4);
}
