use serde_json::Value;

use crate::{
    domain::{
        call::{AssertionOptions, CallId},
        request::AccountRequest,
    },
    usecases::correlator::{Correlator, CorrelatorError},
};

/// Account operations exposed to application code. Each one returns as soon
/// as the request is on the bus; exactly one of the callbacks runs when the
/// reply arrives.
pub struct AccountsClient {
    correlator: Correlator,
}

impl AccountsClient {
    pub fn new(correlator: Correlator) -> Self {
        Self { correlator }
    }

    pub fn correlator(&self) -> &Correlator {
        &self.correlator
    }

    pub fn request<S, E>(
        &self,
        request: AccountRequest,
        on_success: S,
        on_error: E,
    ) -> Result<CallId, CorrelatorError>
    where
        S: FnOnce(Value) + Send + 'static,
        E: FnOnce(Value) + Send + 'static,
    {
        let method = request.method();
        self.correlator
            .call(method, request.into_params(), on_success, on_error)
    }

    pub fn get_account<S, E>(&self, on_success: S, on_error: E) -> Result<CallId, CorrelatorError>
    where
        S: FnOnce(Value) + Send + 'static,
        E: FnOnce(Value) + Send + 'static,
    {
        self.request(AccountRequest::GetAccount, on_success, on_error)
    }

    pub fn logout<S, E>(&self, on_success: S, on_error: E) -> Result<CallId, CorrelatorError>
    where
        S: FnOnce(Value) + Send + 'static,
        E: FnOnce(Value) + Send + 'static,
    {
        self.request(AccountRequest::Logout, on_success, on_error)
    }

    pub fn query_account<S, E>(
        &self,
        email: &str,
        on_success: S,
        on_error: E,
    ) -> Result<CallId, CorrelatorError>
    where
        S: FnOnce(Value) + Send + 'static,
        E: FnOnce(Value) + Send + 'static,
    {
        let request = AccountRequest::QueryAccount {
            email: email.to_owned(),
        };
        self.request(request, on_success, on_error)
    }

    pub fn verification_status<S, E>(
        &self,
        email: &str,
        on_success: S,
        on_error: E,
    ) -> Result<CallId, CorrelatorError>
    where
        S: FnOnce(Value) + Send + 'static,
        E: FnOnce(Value) + Send + 'static,
    {
        let request = AccountRequest::VerificationStatus {
            email: email.to_owned(),
        };
        self.request(request, on_success, on_error)
    }

    pub fn sign_in<S, E>(
        &self,
        email: &str,
        password: &str,
        on_success: S,
        on_error: E,
    ) -> Result<CallId, CorrelatorError>
    where
        S: FnOnce(Value) + Send + 'static,
        E: FnOnce(Value) + Send + 'static,
    {
        let request = AccountRequest::SignIn {
            email: email.to_owned(),
            password: password.to_owned(),
        };
        self.request(request, on_success, on_error)
    }

    pub fn sign_up<S, E>(
        &self,
        email: &str,
        password: &str,
        on_success: S,
        on_error: E,
    ) -> Result<CallId, CorrelatorError>
    where
        S: FnOnce(Value) + Send + 'static,
        E: FnOnce(Value) + Send + 'static,
    {
        let request = AccountRequest::SignUp {
            email: email.to_owned(),
            password: password.to_owned(),
        };
        self.request(request, on_success, on_error)
    }

    pub fn resend_verification_email<S, E>(
        &self,
        email: &str,
        on_success: S,
        on_error: E,
    ) -> Result<CallId, CorrelatorError>
    where
        S: FnOnce(Value) + Send + 'static,
        E: FnOnce(Value) + Send + 'static,
    {
        let request = AccountRequest::ResendVerificationEmail {
            email: email.to_owned(),
        };
        self.request(request, on_success, on_error)
    }

    pub fn get_keys<S, E>(&self, on_success: S, on_error: E) -> Result<CallId, CorrelatorError>
    where
        S: FnOnce(Value) + Send + 'static,
        E: FnOnce(Value) + Send + 'static,
    {
        self.request(AccountRequest::GetKeys, on_success, on_error)
    }

    pub fn get_assertion<S, E>(
        &self,
        options: Option<AssertionOptions>,
        on_success: S,
        on_error: E,
    ) -> Result<CallId, CorrelatorError>
    where
        S: FnOnce(Value) + Send + 'static,
        E: FnOnce(Value) + Send + 'static,
    {
        self.request(AccountRequest::GetAssertion(options), on_success, on_error)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use serde_json::json;

    use super::*;
    use crate::{
        bus::{loopback::LoopbackBus, MessageBus},
        domain::call::{InboundReply, Method},
        usecases::{correlator::CorrelatorSettings, ids::SequentialIds},
    };

    const CHANNEL: &str = "mozFxAccountsChromeEvent";

    type Log = Arc<Mutex<Vec<String>>>;

    fn client() -> (AccountsClient, Arc<LoopbackBus>) {
        let bus = Arc::new(LoopbackBus::new());
        let shared: Arc<dyn MessageBus> = bus.clone();
        let correlator = Correlator::new(
            shared,
            Box::new(SequentialIds::default()),
            CHANNEL,
            CorrelatorSettings::default(),
        );
        (AccountsClient::new(correlator), bus)
    }

    fn log_success(log: &Log, tag: &str) -> impl FnOnce(Value) + Send + 'static {
        let log = Arc::clone(log);
        let tag = tag.to_owned();
        move |data| log.lock().expect("log lock").push(format!("{tag} ok {data}"))
    }

    fn log_error(log: &Log, tag: &str) -> impl FnOnce(Value) + Send + 'static {
        let log = Arc::clone(log);
        let tag = tag.to_owned();
        move |error| log.lock().expect("log lock").push(format!("{tag} err {error}"))
    }

    fn entries(log: &Log) -> Vec<String> {
        log.lock().expect("log lock").clone()
    }

    fn sent_payloads(bus: &LoopbackBus) -> Vec<Value> {
        bus.dispatched_on(CHANNEL)
            .iter()
            .map(|message| message.payload())
            .collect()
    }

    #[test]
    fn fetch_account_round_trip() {
        let (client, bus) = client();
        let log = Log::default();

        let id = client
            .get_account(log_success(&log, "account"), log_error(&log, "account"))
            .expect("call should dispatch");

        let sent = bus.dispatched_on(CHANNEL);
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].id(), &id);
        assert_eq!(sent[0].payload(), json!({"method": "getAccount"}));

        bus.deliver(
            CHANNEL,
            InboundReply::success(id, json!({"email": "a@example.com", "verified": true})),
        );
        assert_eq!(
            entries(&log),
            vec![r#"account ok {"email":"a@example.com","verified":true}"#.to_owned()]
        );
    }

    #[test]
    fn fetch_account_error_reply_reaches_error_callback() {
        let (client, bus) = client();
        let log = Log::default();

        let id = client
            .get_account(log_success(&log, "account"), log_error(&log, "account"))
            .expect("call should dispatch");
        bus.deliver(CHANNEL, InboundReply::failure(id, json!("error")));

        assert_eq!(entries(&log), vec![r#"account err "error""#.to_owned()]);
    }

    #[test]
    fn sign_in_and_sign_up_resolve_in_reverse_order() {
        let (client, bus) = client();
        let log = Log::default();

        let sign_in = client
            .sign_in(
                "a@example.com",
                "pw",
                log_success(&log, "in"),
                log_error(&log, "in"),
            )
            .expect("sign-in should dispatch");
        let sign_up = client
            .sign_up(
                "a@example.com",
                "pw",
                log_success(&log, "up"),
                log_error(&log, "up"),
            )
            .expect("sign-up should dispatch");

        assert_ne!(sign_in, sign_up);
        assert_eq!(
            sent_payloads(&bus),
            vec![
                json!({"method": "signIn", "email": "a@example.com", "password": "pw"}),
                json!({"method": "signUp", "email": "a@example.com", "password": "pw"}),
            ]
        );

        bus.deliver(CHANNEL, InboundReply::success(sign_up, json!("created")));
        bus.deliver(CHANNEL, InboundReply::failure(sign_in, json!("locked")));

        assert_eq!(
            entries(&log),
            vec![r#"up ok "created""#.to_owned(), r#"in err "locked""#.to_owned()]
        );
    }

    #[test]
    fn email_operations_carry_the_email() {
        let (client, bus) = client();
        let log = Log::default();

        client
            .query_account("e", log_success(&log, "q"), log_error(&log, "q"))
            .expect("dispatch");
        client
            .verification_status("e", log_success(&log, "v"), log_error(&log, "v"))
            .expect("dispatch");
        client
            .resend_verification_email("e", log_success(&log, "r"), log_error(&log, "r"))
            .expect("dispatch");

        assert_eq!(
            sent_payloads(&bus),
            vec![
                json!({"method": "queryAccount", "email": "e"}),
                json!({"method": "verificationStatus", "email": "e"}),
                json!({"method": "resendVerificationEmail", "email": "e"}),
            ]
        );
    }

    #[test]
    fn parameterless_operations_send_only_the_method() {
        let (client, bus) = client();
        let log = Log::default();

        client
            .logout(log_success(&log, "l"), log_error(&log, "l"))
            .expect("dispatch");
        client
            .get_keys(log_success(&log, "k"), log_error(&log, "k"))
            .expect("dispatch");

        assert_eq!(
            sent_payloads(&bus),
            vec![json!({"method": "logout"}), json!({"method": "getKeys"})]
        );
    }

    #[test]
    fn get_assertion_normalizes_missing_options_to_null() {
        let (client, bus) = client();
        let log = Log::default();

        client
            .get_assertion(
                Some(AssertionOptions {
                    silent: Some(true),
                    audience: Some("audience".into()),
                }),
                log_success(&log, "a"),
                log_error(&log, "a"),
            )
            .expect("dispatch");
        let id = client
            .get_assertion(None, log_success(&log, "b"), log_error(&log, "b"))
            .expect("dispatch");

        assert_eq!(
            sent_payloads(&bus),
            vec![
                json!({"method": "getAssertion", "silent": true, "audience": "audience"}),
                json!({"method": "getAssertion", "silent": null, "audience": null}),
            ]
        );

        bus.deliver(CHANNEL, InboundReply::success(id, json!("data")));
        assert_eq!(entries(&log), vec![r#"b ok "data""#.to_owned()]);
    }

    #[test]
    fn every_operation_uses_its_own_method() {
        let (client, bus) = client();
        let requests = [
            AccountRequest::GetAccount,
            AccountRequest::Logout,
            AccountRequest::QueryAccount { email: "e".into() },
            AccountRequest::VerificationStatus { email: "e".into() },
            AccountRequest::SignIn {
                email: "e".into(),
                password: "p".into(),
            },
            AccountRequest::SignUp {
                email: "e".into(),
                password: "p".into(),
            },
            AccountRequest::ResendVerificationEmail { email: "e".into() },
            AccountRequest::GetKeys,
            AccountRequest::GetAssertion(None),
        ];

        for request in requests {
            client
                .request(request, |_| {}, |_| {})
                .expect("dispatch");
        }

        let methods: Vec<Method> = bus
            .dispatched_on(CHANNEL)
            .iter()
            .map(|message| message.method())
            .collect();
        assert_eq!(methods, Method::ALL.to_vec());
        assert_eq!(client.correlator().pending_count(), Method::ALL.len());
    }
}
