use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Identifier shared by an outbound call and its reply.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CallId(String);

impl CallId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CallId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    GetAccount,
    Logout,
    QueryAccount,
    VerificationStatus,
    SignIn,
    SignUp,
    ResendVerificationEmail,
    GetKeys,
    GetAssertion,
}

impl Method {
    pub const ALL: [Method; 9] = [
        Method::GetAccount,
        Method::Logout,
        Method::QueryAccount,
        Method::VerificationStatus,
        Method::SignIn,
        Method::SignUp,
        Method::ResendVerificationEmail,
        Method::GetKeys,
        Method::GetAssertion,
    ];

    /// Name carried in the `method` field of the outbound payload.
    pub fn wire_name(self) -> &'static str {
        match self {
            Self::GetAccount => "getAccount",
            Self::Logout => "logout",
            Self::QueryAccount => "queryAccount",
            Self::VerificationStatus => "verificationStatus",
            Self::SignIn => "signIn",
            Self::SignUp => "signUp",
            Self::ResendVerificationEmail => "resendVerificationEmail",
            Self::GetKeys => "getKeys",
            Self::GetAssertion => "getAssertion",
        }
    }

    pub fn operation_name(self) -> &'static str {
        match self {
            Self::GetAccount => "fetch-account",
            Self::Logout => "logout",
            Self::QueryAccount => "query-account",
            Self::VerificationStatus => "check-verification-status",
            Self::SignIn => "sign-in",
            Self::SignUp => "sign-up",
            Self::ResendVerificationEmail => "resend-verification-email",
            Self::GetKeys => "fetch-keys",
            Self::GetAssertion => "fetch-assertion",
        }
    }

    pub fn from_operation_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|method| method.operation_name() == name)
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

/// Named call arguments. Optional arguments are present with a `null` value.
pub type Params = Map<String, Value>;

#[derive(Debug, Clone, PartialEq)]
pub struct OutboundMessage {
    id: CallId,
    method: Method,
    params: Params,
}

impl OutboundMessage {
    pub fn new(id: CallId, method: Method, params: Params) -> Self {
        Self { id, method, params }
    }

    pub fn id(&self) -> &CallId {
        &self.id
    }

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Flattens method and params into the `data` object sent on the wire.
    pub fn payload(&self) -> Value {
        let mut data = Map::with_capacity(self.params.len() + 1);
        for (key, value) in &self.params {
            data.insert(key.clone(), value.clone());
        }
        // A "method" param never overrides the method of the call.
        data.insert(
            "method".to_owned(),
            Value::String(self.method.wire_name().to_owned()),
        );
        Value::Object(data)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InboundReply {
    pub id: CallId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<Value>,
}

impl InboundReply {
    /// A `null` payload is stored as absent, the same as `"data": null`
    /// read off the wire, so the reply resolves through the error path.
    pub fn success(id: CallId, data: Value) -> Self {
        Self {
            id,
            data: (!data.is_null()).then_some(data),
            error: None,
        }
    }

    pub fn failure(id: CallId, error: Value) -> Self {
        Self {
            id,
            data: None,
            error: Some(error),
        }
    }

    /// Splits the reply into its outcome. A reply without data is a failure,
    /// carrying `null` when the remote side sent no error payload either.
    pub fn into_outcome(self) -> Result<Value, Value> {
        match self.data {
            Some(data) => Ok(data),
            None => Err(self.error.unwrap_or(Value::Null)),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssertionOptions {
    pub silent: Option<bool>,
    pub audience: Option<String>,
}
