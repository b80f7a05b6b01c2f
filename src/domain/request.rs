use serde_json::{json, Value};

use crate::domain::call::{AssertionOptions, Method, Params};

/// A fully-specified account operation, ready to be turned into wire params.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountRequest {
    GetAccount,
    Logout,
    QueryAccount { email: String },
    VerificationStatus { email: String },
    SignIn { email: String, password: String },
    SignUp { email: String, password: String },
    ResendVerificationEmail { email: String },
    GetKeys,
    GetAssertion(Option<AssertionOptions>),
}

impl AccountRequest {
    pub fn method(&self) -> Method {
        match self {
            Self::GetAccount => Method::GetAccount,
            Self::Logout => Method::Logout,
            Self::QueryAccount { .. } => Method::QueryAccount,
            Self::VerificationStatus { .. } => Method::VerificationStatus,
            Self::SignIn { .. } => Method::SignIn,
            Self::SignUp { .. } => Method::SignUp,
            Self::ResendVerificationEmail { .. } => Method::ResendVerificationEmail,
            Self::GetKeys => Method::GetKeys,
            Self::GetAssertion(_) => Method::GetAssertion,
        }
    }

    /// Wire params; nullable arguments are always present, as `null` when unset.
    pub fn into_params(self) -> Params {
        let mut params = Params::new();
        match self {
            Self::GetAccount | Self::Logout | Self::GetKeys => {}
            Self::QueryAccount { email }
            | Self::VerificationStatus { email }
            | Self::ResendVerificationEmail { email } => {
                params.insert("email".to_owned(), Value::String(email));
            }
            Self::SignIn { email, password } | Self::SignUp { email, password } => {
                params.insert("email".to_owned(), Value::String(email));
                params.insert("password".to_owned(), Value::String(password));
            }
            Self::GetAssertion(options) => {
                let options = options.unwrap_or_default();
                params.insert("silent".to_owned(), json!(options.silent));
                params.insert("audience".to_owned(), json!(options.audience));
            }
        }
        params
    }
}
