use super::contract::{FlatMerge, ResponseContract, Wrapped};
use super::core::RequestClient;
use super::headers::parse_headers;
use crate::error::HeaderLayer;
use crate::notify::NotificationPresenter;
use crate::transport::{HttpTransport, Transport};
use crate::types::HeaderList;
use crate::Result;
use arc_swap::ArcSwapOption;
use std::marker::PhantomData;
use std::sync::Arc;

const LOG_ENV: &str = "FORMFETCH_LOG";
const TOKEN_ENV: &str = "FORMFETCH_TOKEN";

/// Builder for [`RequestClient`].
///
/// Defaults can also come from the environment:
/// - `FORMFETCH_LOG` (`1`/`true`) enables request logging when not set here
/// - `FORMFETCH_TOKEN` supplies the initial bearer token when not set here
/// - `FORMFETCH_PROXY_URL` is honoured by the default transport
pub struct RequestClientBuilder<M: ResponseContract = FlatMerge> {
    base_url: String,
    default_headers: HeaderList,
    token: Option<String>,
    logging: Option<bool>,
    transport: Option<Arc<dyn Transport>>,
    presenter: Option<Arc<NotificationPresenter>>,
    _contract: PhantomData<fn() -> M>,
}

impl<M: ResponseContract> RequestClientBuilder<M> {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            default_headers: Vec::new(),
            token: None,
            logging: None,
            transport: None,
            presenter: None,
            _contract: PhantomData,
        }
    }

    /// Switch to another response contract, keeping everything else.
    pub fn contract<N: ResponseContract>(self) -> RequestClientBuilder<N> {
        RequestClientBuilder {
            base_url: self.base_url,
            default_headers: self.default_headers,
            token: self.token,
            logging: self.logging,
            transport: self.transport,
            presenter: self.presenter,
            _contract: PhantomData,
        }
    }

    pub fn wrapped(self) -> RequestClientBuilder<Wrapped> {
        self.contract::<Wrapped>()
    }

    pub fn flat_merge(self) -> RequestClientBuilder<FlatMerge> {
        self.contract::<FlatMerge>()
    }

    /// Add one instance-level default header.
    pub fn default_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_headers.push((name.into(), value.into()));
        self
    }

    pub fn default_headers(mut self, headers: HeaderList) -> Self {
        self.default_headers.extend(headers);
        self
    }

    /// Initial bearer token. Can be replaced later with [`RequestClient::set_token`].
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Log every completed request at info level and failures at error level.
    pub fn logging(mut self, enable: bool) -> Self {
        self.logging = Some(enable);
        self
    }

    /// Replace the default reqwest transport.
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Presenter used for `success_message` / `error_message` toasts.
    pub fn presenter(mut self, presenter: Arc<NotificationPresenter>) -> Self {
        self.presenter = Some(presenter);
        self
    }

    pub fn build(self) -> Result<RequestClient<M>> {
        self.build_with_env(|key| std::env::var(key).ok())
    }

    /// Explicit builder settings always win; `env` only fills gaps.
    fn build_with_env(self, env: impl Fn(&str) -> Option<String>) -> Result<RequestClient<M>> {
        let default_headers = parse_headers(&self.default_headers, HeaderLayer::Default)?;

        let log_requests = self.logging.unwrap_or_else(|| {
            env(LOG_ENV)
                .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                .unwrap_or(false)
        });

        let token = self
            .token
            .or_else(|| env(TOKEN_ENV).filter(|t| !t.is_empty()));

        let transport = match self.transport {
            Some(t) => t,
            None => Arc::new(HttpTransport::new()?),
        };

        Ok(RequestClient {
            base_url: self.base_url,
            default_headers: Arc::new(default_headers),
            token: ArcSwapOption::from(token.map(Arc::new)),
            transport,
            log_requests,
            presenter: self.presenter,
            _contract: PhantomData,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::RecordingTransport;
    use std::collections::HashMap;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    fn builder() -> RequestClientBuilder {
        RequestClientBuilder::new("https://api.test").transport(Arc::new(RecordingTransport::new()))
    }

    #[test]
    fn log_env_enables_logging_when_unset() {
        for value in ["1", "true", "TRUE"] {
            let client = builder().build_with_env(env_of(&[(LOG_ENV, value)])).unwrap();
            assert!(client.log_requests, "FORMFETCH_LOG={value}");
        }
        for value in ["0", "false", "yes", ""] {
            let client = builder().build_with_env(env_of(&[(LOG_ENV, value)])).unwrap();
            assert!(!client.log_requests, "FORMFETCH_LOG={value}");
        }
        let client = builder().build_with_env(env_of(&[])).unwrap();
        assert!(!client.log_requests);
    }

    #[test]
    fn explicit_logging_wins_over_env() {
        let client = builder()
            .logging(false)
            .build_with_env(env_of(&[(LOG_ENV, "1")]))
            .unwrap();
        assert!(!client.log_requests);

        let client = builder().logging(true).build_with_env(env_of(&[])).unwrap();
        assert!(client.log_requests);
    }

    #[test]
    fn token_env_fills_only_a_missing_token() {
        let client = builder()
            .build_with_env(env_of(&[(TOKEN_ENV, "from-env")]))
            .unwrap();
        assert_eq!(client.token().as_deref(), Some("from-env"));

        let client = builder()
            .token("explicit")
            .build_with_env(env_of(&[(TOKEN_ENV, "from-env")]))
            .unwrap();
        assert_eq!(client.token().as_deref(), Some("explicit"));
    }

    #[test]
    fn empty_token_env_is_ignored() {
        let client = builder().build_with_env(env_of(&[(TOKEN_ENV, "")])).unwrap();
        assert_eq!(client.token(), None);
    }

    #[test]
    fn invalid_default_header_fails_the_build() {
        let err = builder()
            .default_header("bad header", "v")
            .build_with_env(env_of(&[]))
            .err()
            .unwrap();
        assert_eq!(err.context().map(|c| c.layer), Some(HeaderLayer::Default));
    }
}
