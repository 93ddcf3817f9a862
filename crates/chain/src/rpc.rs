use {
    crate::{
        ChainClient,
        ContractAddress,
        DeployRequest,
        Error,
        Receipt,
        TransactionHash,
        TransactionStatus,
    },
    reqwest::header,
    serde::{Deserialize, de::DeserializeOwned},
    serde_json::{Value, json},
    std::{
        fmt::{self, Debug, Formatter},
        future::Future,
        sync::{
            Arc,
            atomic::{AtomicUsize, Ordering},
        },
        time::Duration,
    },
    url::Url,
};

/// Deploy entry point of the GenLayer simulator node.
pub const DEPLOY_INTELLIGENT_CONTRACT: &str = "deploy_intelligent_contract";
const GET_TRANSACTION_BY_HASH: &str = "eth_getTransactionByHash";

#[derive(Debug, Clone)]
pub struct Config {
    /// The node RPC API endpoint.
    pub url: Url,
    /// JSON-RPC method deployments are submitted with. Its params are
    /// `[sender, code, constructor_params]`.
    pub deploy_method: String,
    /// Account deployments are sent from. The node picks its default account
    /// when unset.
    pub sender: Option<String>,
    /// Timeout of a single HTTP request.
    pub request_timeout: Duration,
    pub polling: Polling,
}

/// How the client polls the node while waiting for a receipt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Polling {
    /// Time between two lookups.
    pub interval: Duration,
    /// Maximum number of lookups before giving up.
    pub retries: u32,
}

impl Default for Polling {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(3),
            retries: 10,
        }
    }
}

/// JSON-RPC client of a single node.
#[derive(Clone)]
pub struct Client {
    http: reqwest::Client,
    inner: Arc<Inner>,
}

struct Inner {
    url: Url,
    id: AtomicUsize,
    deploy_method: String,
    sender: Option<String>,
    polling: Polling,
}

impl Client {
    pub fn new(config: Config) -> Result<Self, Error> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self {
            http,
            inner: Arc::new(Inner {
                url: config.url,
                id: AtomicUsize::new(0),
                deploy_method: config.deploy_method,
                sender: config.sender,
                polling: config.polling,
            }),
        })
    }

    fn next_id(&self) -> usize {
        self.inner.id.fetch_add(1, Ordering::SeqCst)
    }

    async fn execute<T: DeserializeOwned>(&self, method: &str, params: Value) -> Result<T, Error> {
        // Id is only used for logging.
        let id = self.next_id();
        let body = serde_json::to_string(&json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params,
        }))?;
        tracing::trace!(%id, %method, %body, "executing request");

        let response = self
            .http
            .post(self.inner.url.clone())
            .header(header::CONTENT_TYPE, "application/json")
            .header("X-RPC-REQUEST-ID", id.to_string())
            .header("X-RPC-METHOD", method)
            .body(body)
            .send()
            .await
            .inspect_err(|err| tracing::warn!(%id, %method, %err, "failed to send request"))?;
        let status = response.status();
        let text = response
            .text()
            .await
            .inspect_err(|err| tracing::warn!(%id, %err, "failed to get response body"))?;
        // Log the raw text before decoding to get more information on responses that
        // aren't valid json.
        tracing::trace!(%id, body = %text.trim(), "received response");
        if !status.is_success() {
            return Err(Error::Http(status));
        }

        decode_response(&text)
    }

    /// Looks up a transaction. `None` while the node doesn't know it.
    async fn transaction(&self, hash: &TransactionHash) -> Result<Option<Receipt>, Error> {
        let transaction: Option<Transaction> =
            self.execute(GET_TRANSACTION_BY_HASH, json!([hash])).await?;
        Ok(transaction.map(Into::into))
    }
}

impl Debug for Client {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("url", &self.inner.url)
            .field("deploy_method", &self.inner.deploy_method)
            .field("polling", &self.inner.polling)
            .finish()
    }
}

#[async_trait::async_trait]
impl ChainClient for Client {
    async fn deploy_contract(&self, request: DeployRequest) -> Result<TransactionHash, Error> {
        let params = deploy_params(request, self.inner.sender.as_deref())?;
        let hash: TransactionHash = self.execute(&self.inner.deploy_method, params).await?;
        tracing::debug!(%hash, "deployment submitted");
        Ok(hash)
    }

    async fn wait_for_transaction_receipt(
        &self,
        hash: &TransactionHash,
        status: TransactionStatus,
    ) -> Result<Receipt, Error> {
        poll_receipt(hash, status, self.inner.polling, || self.transaction(hash)).await
    }
}

/// Positional deploy params. Constructor params travel as a JSON encoded
/// string, `"{}"` when there are none.
fn deploy_params(request: DeployRequest, sender: Option<&str>) -> Result<Value, Error> {
    let constructor_params = if request.args.is_empty() {
        "{}".to_owned()
    } else {
        serde_json::to_string(&request.args)?
    };
    Ok(json!([sender, request.code, constructor_params]))
}

/// Calls `lookup` until the transaction reached `target`, it got rejected or
/// `polling.retries` lookups happened. Failed lookups are not retried.
async fn poll_receipt<F, Fut>(
    hash: &TransactionHash,
    target: TransactionStatus,
    polling: Polling,
    mut lookup: F,
) -> Result<Receipt, Error>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Option<Receipt>, Error>>,
{
    let mut last = None;
    for attempt in 1..=polling.retries {
        match lookup().await? {
            Some(receipt) if receipt.status.has_reached(target) => return Ok(receipt),
            Some(receipt) if receipt.status.is_rejected() => {
                return Err(Error::Rejected {
                    hash: hash.clone(),
                    status: receipt.status,
                });
            }
            Some(receipt) => {
                tracing::debug!(
                    %hash,
                    status = %receipt.status,
                    %target,
                    attempt,
                    "waiting for transaction"
                );
                last = Some(receipt.status);
            }
            None => tracing::debug!(%hash, attempt, "transaction not known yet"),
        }
        if attempt < polling.retries {
            tokio::time::sleep(polling.interval).await;
        }
    }
    Err(Error::Timeout {
        hash: hash.clone(),
        status: target,
        last,
        attempts: polling.retries,
    })
}

#[derive(Deserialize)]
struct Response {
    #[serde(default)]
    result: Value,
    error: Option<ErrorObject>,
}

#[derive(Deserialize)]
struct ErrorObject {
    code: i64,
    message: String,
}

fn decode_response<T: DeserializeOwned>(text: &str) -> Result<T, Error> {
    let response: Response = serde_json::from_str(text)?;
    if let Some(err) = response.error {
        return Err(Error::Rpc {
            code: err.code,
            message: err.message,
        });
    }
    Ok(serde_json::from_value(response.result)?)
}

/// Transaction as returned by `eth_getTransactionByHash`.
#[derive(Deserialize)]
struct Transaction {
    hash: TransactionHash,
    status: TransactionStatus,
    #[serde(default)]
    data: Option<TransactionData>,
}

#[derive(Deserialize)]
struct TransactionData {
    #[serde(default, alias = "contractAddress")]
    contract_address: Option<ContractAddress>,
}

impl From<Transaction> for Receipt {
    fn from(transaction: Transaction) -> Self {
        Self {
            hash: transaction.hash,
            status: transaction.status,
            contract_address: transaction.data.and_then(|data| data.contract_address),
        }
    }
}
