//! Header identity shown by each layout

use serde_json::Value;

use crate::auth::Role;

/// What a layout prints in its header: display email, role badge and avatar
/// initial. Built from the raw `user` value and never fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileDisplay {
    pub email: String,
    pub role_label: String,
    pub initial: char,
}

impl ProfileDisplay {
    /// Placeholder text for the layout of `role`
    pub fn placeholder(role: Role) -> Self {
        let email = default_email(role);
        Self {
            initial: initial_of(email, role),
            email: email.to_string(),
            role_label: role.as_str().to_uppercase(),
        }
    }

    pub fn from_stored_user(layout_role: Role, raw: Option<&str>) -> Self {
        let Some(raw) = raw else {
            return Self::placeholder(layout_role);
        };

        let user: Value = match serde_json::from_str(raw) {
            Ok(user) => user,
            Err(e) => {
                tracing::debug!("User data error: {}", e);
                return Self::placeholder(layout_role);
            }
        };

        let non_empty = |field: &str| {
            user.get(field)
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };

        let email = non_empty("email").unwrap_or_else(|| default_email(layout_role).to_string());
        let role_label = non_empty("role")
            .unwrap_or_else(|| layout_role.as_str().to_string())
            .to_uppercase();

        Self {
            initial: initial_of(&email, layout_role),
            email,
            role_label,
        }
    }
}

fn default_email(role: Role) -> &'static str {
    match role {
        Role::Superadmin => "Admin",
        Role::Vendor => "Vendor",
        Role::Customer => "Customer",
    }
}

fn initial_of(email: &str, role: Role) -> char {
    email
        .chars()
        .next()
        .and_then(|c| c.to_uppercase().next())
        .unwrap_or(match role {
            Role::Superadmin => 'A',
            Role::Vendor => 'V',
            Role::Customer => 'C',
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_email_and_role() {
        let profile = ProfileDisplay::from_stored_user(
            Role::Vendor,
            Some(r#"{"email":"shop@example.com","role":"vendor"}"#),
        );
        assert_eq!(profile.email, "shop@example.com");
        assert_eq!(profile.role_label, "VENDOR");
        assert_eq!(profile.initial, 'S');
    }

    #[test]
    fn test_malformed_user_uses_layout_placeholders() {
        for (role, email, label, initial) in [
            (Role::Superadmin, "Admin", "SUPERADMIN", 'A'),
            (Role::Vendor, "Vendor", "VENDOR", 'V'),
            (Role::Customer, "Customer", "CUSTOMER", 'C'),
        ] {
            let profile = ProfileDisplay::from_stored_user(role, Some("{broken"));
            assert_eq!(profile.email, email);
            assert_eq!(profile.role_label, label);
            assert_eq!(profile.initial, initial);
        }
    }

    #[test]
    fn test_empty_fields_fall_back() {
        let profile = ProfileDisplay::from_stored_user(Role::Customer, Some(r#"{"email":""}"#));
        assert_eq!(profile.email, "Customer");
        assert_eq!(profile.role_label, "CUSTOMER");
        assert_eq!(ProfileDisplay::from_stored_user(Role::Customer, None), ProfileDisplay::placeholder(Role::Customer));
    }
}
