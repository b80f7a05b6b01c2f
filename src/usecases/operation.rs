use std::io;

use crate::{
    domain::{
        call::{AssertionOptions, Method},
        request::AccountRequest,
    },
    infra::error::AppError,
    usecases::contracts::SecretPrompt,
};

/// Raw operation arguments as collected from the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OperationArgs {
    pub email: Option<String>,
    pub password: Option<String>,
    pub silent: Option<bool>,
    pub audience: Option<String>,
}

pub struct RpasswordPrompt;

impl SecretPrompt for RpasswordPrompt {
    fn prompt_secret(&mut self, prompt: &str) -> io::Result<Option<String>> {
        match rpassword::prompt_password(prompt) {
            Ok(password) => Ok(Some(password.trim_end_matches(['\r', '\n']).to_owned())),
            Err(source) if source.kind() == io::ErrorKind::UnexpectedEof => Ok(None),
            Err(source) => Err(source),
        }
    }
}

/// Resolves an operation name and its arguments into a request. Required
/// arguments are checked here, before anything reaches the bus.
pub fn build_request(
    operation: &str,
    args: OperationArgs,
    prompt: &mut dyn SecretPrompt,
) -> Result<AccountRequest, AppError> {
    let method =
        Method::from_operation_name(operation).ok_or_else(|| AppError::UnknownOperation {
            name: operation.to_owned(),
        })?;
    let operation = method.operation_name();

    let request = match method {
        Method::GetAccount => AccountRequest::GetAccount,
        Method::Logout => AccountRequest::Logout,
        Method::GetKeys => AccountRequest::GetKeys,
        Method::QueryAccount => AccountRequest::QueryAccount {
            email: require_email(operation, args.email)?,
        },
        Method::VerificationStatus => AccountRequest::VerificationStatus {
            email: require_email(operation, args.email)?,
        },
        Method::ResendVerificationEmail => AccountRequest::ResendVerificationEmail {
            email: require_email(operation, args.email)?,
        },
        Method::SignIn => {
            let email = require_email(operation, args.email)?;
            let password = resolve_password(operation, args.password, prompt)?;
            AccountRequest::SignIn { email, password }
        }
        Method::SignUp => {
            let email = require_email(operation, args.email)?;
            let password = resolve_password(operation, args.password, prompt)?;
            AccountRequest::SignUp { email, password }
        }
        Method::GetAssertion => {
            if args.silent.is_none() && args.audience.is_none() {
                AccountRequest::GetAssertion(None)
            } else {
                AccountRequest::GetAssertion(Some(AssertionOptions {
                    silent: args.silent,
                    audience: args.audience,
                }))
            }
        }
    };

    Ok(request)
}

fn require_email(operation: &'static str, email: Option<String>) -> Result<String, AppError> {
    email
        .filter(|email| !email.trim().is_empty())
        .ok_or(AppError::MissingArgument {
            operation,
            argument: "email",
        })
}

fn resolve_password(
    operation: &'static str,
    password: Option<String>,
    prompt: &mut dyn SecretPrompt,
) -> Result<String, AppError> {
    let password = match password {
        Some(password) => Some(password),
        None => prompt
            .prompt_secret("Password: ")
            .map_err(AppError::PasswordPrompt)?,
    };

    password
        .filter(|password| !password.is_empty())
        .ok_or(AppError::MissingArgument {
            operation,
            argument: "password",
        })
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use super::*;

    struct FakePrompt {
        answers: VecDeque<Option<String>>,
        asked: usize,
    }

    impl FakePrompt {
        fn new(answers: Vec<Option<&str>>) -> Self {
            Self {
                answers: answers
                    .into_iter()
                    .map(|answer| answer.map(str::to_owned))
                    .collect(),
                asked: 0,
            }
        }
    }

    impl SecretPrompt for FakePrompt {
        fn prompt_secret(&mut self, _prompt: &str) -> io::Result<Option<String>> {
            self.asked += 1;
            Ok(self.answers.pop_front().flatten())
        }
    }

    fn email(value: &str) -> OperationArgs {
        OperationArgs {
            email: Some(value.to_owned()),
            ..OperationArgs::default()
        }
    }

    #[test]
    fn unknown_operation_is_rejected() {
        let mut prompt = FakePrompt::new(vec![]);
        let error = build_request("getAccount", OperationArgs::default(), &mut prompt)
            .expect_err("wire names are not operation names");

        assert!(matches!(error, AppError::UnknownOperation { name } if name == "getAccount"));
    }

    #[test]
    fn email_operations_require_email() {
        let mut prompt = FakePrompt::new(vec![]);
        let error = build_request("query-account", OperationArgs::default(), &mut prompt)
            .expect_err("email is required");

        assert!(matches!(
            error,
            AppError::MissingArgument {
                operation: "query-account",
                argument: "email"
            }
        ));
    }

    #[test]
    fn sign_in_uses_given_password_without_prompting() {
        let mut prompt = FakePrompt::new(vec![]);
        let args = OperationArgs {
            password: Some("pw".into()),
            ..email("a@example.com")
        };

        let request = build_request("sign-in", args, &mut prompt).expect("request should build");

        assert_eq!(
            request,
            AccountRequest::SignIn {
                email: "a@example.com".into(),
                password: "pw".into(),
            }
        );
        assert_eq!(prompt.asked, 0);
    }

    #[test]
    fn sign_up_prompts_for_missing_password() {
        let mut prompt = FakePrompt::new(vec![Some("typed")]);

        let request = build_request("sign-up", email("a@example.com"), &mut prompt)
            .expect("request should build");

        assert_eq!(
            request,
            AccountRequest::SignUp {
                email: "a@example.com".into(),
                password: "typed".into(),
            }
        );
        assert_eq!(prompt.asked, 1);
    }

    #[test]
    fn cancelled_password_prompt_is_a_missing_argument() {
        let mut prompt = FakePrompt::new(vec![None]);

        let error = build_request("sign-in", email("a@example.com"), &mut prompt)
            .expect_err("no password means no request");

        assert!(matches!(
            error,
            AppError::MissingArgument {
                argument: "password",
                ..
            }
        ));
    }

    #[test]
    fn assertion_options_are_optional() {
        let mut prompt = FakePrompt::new(vec![]);

        let bare = build_request("fetch-assertion", OperationArgs::default(), &mut prompt)
            .expect("request should build");
        let audience_only = build_request(
            "fetch-assertion",
            OperationArgs {
                audience: Some("https://example.com".into()),
                ..OperationArgs::default()
            },
            &mut prompt,
        )
        .expect("request should build");

        assert_eq!(bare, AccountRequest::GetAssertion(None));
        assert_eq!(
            audience_only,
            AccountRequest::GetAssertion(Some(AssertionOptions {
                silent: None,
                audience: Some("https://example.com".into()),
            }))
        );
    }
}
