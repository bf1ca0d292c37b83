//! Signature header generation.
//!
//! Signed endpoints require `x-s` and `x-t` headers produced by a vendor
//! JavaScript routine. The routine runs inside an embedded engine on a
//! dedicated worker thread; the engine context is not `Send`, so requests
//! are marshalled to it over a channel.

use crate::error::XhsError;
use boa_engine::{Context, JsObject, JsString, JsValue, Source, js_string};
use serde_json::Value;
use std::path::Path;
use std::sync::OnceLock;
use tokio::sync::{mpsc, oneshot};

const BUNDLED_SCRIPT: &str = include_str!("signature.js");

/// Header values produced for one signed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignHeaders {
    /// The `x-s` signature
    pub x_s: String,
    /// The `x-t` millisecond timestamp, as the script rendered it
    pub x_t: String,
}

struct SignJob {
    url: String,
    data: Option<Value>,
    cookie: String,
    ts: i64,
    reply: oneshot::Sender<Result<SignHeaders, XhsError>>,
}

/// Handle to a signing worker thread.
///
/// Clones share the same thread. The thread exits once every handle has
/// been dropped.
///
/// # Example
///
/// ```no_run
/// use xhs_client::Signer;
///
/// let signer = Signer::bundled()?;
/// let headers = signer.sign("/api/sns/web/v1/homefeed", None, "a1=abc; web_session=xyz")?;
/// assert!(headers.x_s.starts_with("XYW_"));
/// # Ok::<(), xhs_client::XhsError>(())
/// ```
#[derive(Clone)]
pub struct Signer {
    tx: mpsc::UnboundedSender<SignJob>,
}

impl std::fmt::Debug for Signer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signer").finish_non_exhaustive()
    }
}

impl Signer {
    /// Start a signer running the bundled script.
    ///
    /// # Errors
    ///
    /// Returns [`XhsError::Signature`] if the script fails to evaluate.
    pub fn bundled() -> Result<Self, XhsError> {
        Self::from_source(BUNDLED_SCRIPT)
    }

    /// Start a signer running a script read from `path`.
    ///
    /// The script must define `GetXsXt(url, data, cookie, ts)` at the top
    /// level, returning the header values as a JSON string or plain object.
    ///
    /// # Errors
    ///
    /// Returns [`XhsError::ClientInit`] if the file cannot be read and
    /// [`XhsError::Signature`] if the script fails to evaluate.
    pub fn from_script_file(path: impl AsRef<Path>) -> Result<Self, XhsError> {
        let script = std::fs::read_to_string(path.as_ref()).map_err(|err| {
            XhsError::ClientInit(format!(
                "failed to read signature script {}: {err}",
                path.as_ref().display()
            ))
        })?;
        Self::from_source(&script)
    }

    /// Start a signer running script source held in memory.
    ///
    /// # Errors
    ///
    /// Returns [`XhsError::Signature`] if the script fails to evaluate or
    /// does not define `GetXsXt`.
    pub fn from_source(script: &str) -> Result<Self, XhsError> {
        let (tx, rx) = mpsc::unbounded_channel();
        let (ready_tx, ready_rx) = std::sync::mpsc::channel();
        let script = script.to_string();
        std::thread::Builder::new()
            .name("xhs-signer".to_string())
            .spawn(move || run_worker(script, ready_tx, rx))
            .map_err(|err| {
                XhsError::ClientInit(format!("failed to spawn signer thread: {err}"))
            })?;
        match ready_rx.recv() {
            Ok(Ok(())) => Ok(Self { tx }),
            Ok(Err(err)) => Err(err),
            Err(_) => Err(XhsError::Signature(
                "signer thread exited during startup".to_string(),
            )),
        }
    }

    /// The process-wide signer for the bundled script, started on first use.
    ///
    /// # Errors
    ///
    /// Returns [`XhsError::Signature`] if the bundled script fails to start.
    pub fn shared() -> Result<&'static Signer, XhsError> {
        static SHARED: OnceLock<Signer> = OnceLock::new();
        if let Some(signer) = SHARED.get() {
            return Ok(signer);
        }
        let signer = Signer::bundled()?;
        Ok(SHARED.get_or_init(|| signer))
    }

    /// Sign a request using the current time.
    ///
    /// Blocks until the worker replies. Do not call from inside an async
    /// runtime; use [`Signer::sign_async`] there.
    ///
    /// # Errors
    ///
    /// Returns [`XhsError::Signature`] if the script throws or returns a
    /// malformed result.
    pub fn sign(
        &self,
        url: &str,
        data: Option<&Value>,
        cookie: &str,
    ) -> Result<SignHeaders, XhsError> {
        self.sign_at(url, data, cookie, chrono::Utc::now().timestamp_millis())
    }

    /// Sign a request with an explicit millisecond timestamp.
    ///
    /// Output is deterministic for fixed inputs.
    ///
    /// # Errors
    ///
    /// Same as [`Signer::sign`].
    pub fn sign_at(
        &self,
        url: &str,
        data: Option<&Value>,
        cookie: &str,
        ts: i64,
    ) -> Result<SignHeaders, XhsError> {
        let reply = self.submit(url, data, cookie, ts)?;
        reply.blocking_recv().map_err(|_| worker_gone())?
    }

    /// Async counterpart of [`Signer::sign`].
    ///
    /// # Errors
    ///
    /// Same as [`Signer::sign`].
    pub async fn sign_async(
        &self,
        url: &str,
        data: Option<&Value>,
        cookie: &str,
    ) -> Result<SignHeaders, XhsError> {
        self.sign_at_async(url, data, cookie, chrono::Utc::now().timestamp_millis())
            .await
    }

    /// Async counterpart of [`Signer::sign_at`].
    ///
    /// # Errors
    ///
    /// Same as [`Signer::sign`].
    pub async fn sign_at_async(
        &self,
        url: &str,
        data: Option<&Value>,
        cookie: &str,
        ts: i64,
    ) -> Result<SignHeaders, XhsError> {
        let reply = self.submit(url, data, cookie, ts)?;
        reply.await.map_err(|_| worker_gone())?
    }

    fn submit(
        &self,
        url: &str,
        data: Option<&Value>,
        cookie: &str,
        ts: i64,
    ) -> Result<oneshot::Receiver<Result<SignHeaders, XhsError>>, XhsError> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(SignJob {
                url: url.to_string(),
                data: data.cloned(),
                cookie: cookie.to_string(),
                ts,
                reply,
            })
            .map_err(|_| worker_gone())?;
        Ok(rx)
    }
}

fn worker_gone() -> XhsError {
    XhsError::Signature("signer thread is no longer running".to_string())
}

fn run_worker(
    script: String,
    ready: std::sync::mpsc::Sender<Result<(), XhsError>>,
    mut rx: mpsc::UnboundedReceiver<SignJob>,
) {
    let mut context = Context::default();
    if let Err(err) = context.eval(Source::from_bytes(script.as_bytes())) {
        let _ = ready.send(Err(XhsError::Signature(format!(
            "signature script failed to evaluate: {err}"
        ))));
        return;
    }
    let function = match context.global_object().get(js_string!("GetXsXt"), &mut context) {
        Ok(value) => value,
        Err(err) => {
            let _ = ready.send(Err(XhsError::Signature(format!(
                "signature script lookup failed: {err}"
            ))));
            return;
        }
    };
    let Some(function) = function
        .as_object()
        .filter(|object| object.is_callable())
        .cloned()
    else {
        let _ = ready.send(Err(XhsError::Signature(
            "signature script does not define a GetXsXt function".to_string(),
        )));
        return;
    };
    let _ = ready.send(Ok(()));

    while let Some(job) = rx.blocking_recv() {
        let result = invoke(&function, &mut context, &job);
        let _ = job.reply.send(result);
    }
}

fn invoke(
    function: &JsObject,
    context: &mut Context,
    job: &SignJob,
) -> Result<SignHeaders, XhsError> {
    let data = match &job.data {
        Some(value) => JsValue::from_json(value, context)
            .map_err(|err| XhsError::Signature(format!("request body rejected by engine: {err}")))?,
        None => JsValue::undefined(),
    };
    let args = [
        JsValue::from(JsString::from(job.url.as_str())),
        data,
        JsValue::from(JsString::from(job.cookie.as_str())),
        JsValue::from(job.ts as f64),
    ];
    let result = function
        .call(&JsValue::undefined(), &args, context)
        .map_err(|err| XhsError::Signature(format!("GetXsXt threw: {err}")))?;

    // Accept either a JSON string or a plain object return.
    let parsed: Value = if let Some(text) = result.as_string() {
        let text = text.to_std_string_escaped();
        serde_json::from_str(&text).map_err(|_| {
            XhsError::Signature(format!("GetXsXt returned invalid JSON: {text}"))
        })?
    } else if result.is_undefined() || result.is_null() {
        return Err(XhsError::Signature("GetXsXt returned no value".to_string()));
    } else {
        result.to_json(context).map_err(|err| {
            XhsError::Signature(format!("GetXsXt result is not convertible: {err}"))
        })?
    };

    let x_s = parsed
        .get("X-s")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| XhsError::Signature("GetXsXt result is missing X-s".to_string()))?;
    let x_t = match parsed.get("X-t") {
        Some(Value::String(text)) => text.clone(),
        Some(Value::Number(number)) => number.to_string(),
        _ => return Err(XhsError::Signature("GetXsXt result is missing X-t".to_string())),
    };
    Ok(SignHeaders { x_s, x_t })
}
