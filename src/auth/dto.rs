use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Request body for login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Response returned after login.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub customer: PublicCustomer,
}

/// Public part of the customer returned to the client.
#[derive(Debug, Serialize)]
pub struct PublicCustomer {
    pub id: Uuid,
    pub email: String,
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_customer_serializes_without_password() {
        let customer = PublicCustomer {
            id: Uuid::new_v4(),
            email: "acme@example.com".into(),
            name: "Acme".into(),
        };
        let json = serde_json::to_string(&customer).unwrap();
        assert!(json.contains("acme@example.com"));
        assert!(!json.contains("password"));
    }
}
