//! One-shot helper: build a throwaway client and issue a single call.

use super::contract::ResponseContract;
use super::core::RequestClient;
use crate::types::{HeaderList, HttpMethod, RequestBody};

/// Issue one request against an absolute `url`, with the same contract as
/// [`RequestClient::request`].
///
/// ```rust,no_run
/// use formfetch::client::{send, FlatMerge};
/// use formfetch::HttpMethod;
///
/// # async fn demo() -> formfetch::Result<()> {
/// let resp = send::<FlatMerge>("https://example.com/health", HttpMethod::Get, None, Vec::new()).await?;
/// println!("{}", resp.status());
/// # Ok(())
/// # }
/// ```
pub async fn send<M: ResponseContract>(
    url: &str,
    method: HttpMethod,
    body: Option<RequestBody>,
    headers: HeaderList,
) -> M::Output {
    match RequestClient::<M>::new(url) {
        Ok(client) => client.request("", method, body, headers).await,
        Err(e) => M::shape(Err(e)),
    }
}

/// Like [`send`], but with a caller-supplied token.
pub async fn send_authorized<M: ResponseContract>(
    url: &str,
    token: &str,
    method: HttpMethod,
    body: Option<RequestBody>,
    headers: HeaderList,
) -> M::Output {
    match RequestClient::<M>::builder(url).token(token).build() {
        Ok(client) => client.request("", method, body, headers).await,
        Err(e) => M::shape(Err(e)),
    }
}
