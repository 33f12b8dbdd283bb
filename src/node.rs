//! Per-item execution: resolve, call, normalize.

use crate::dispatch;
use crate::error::Result;
use crate::http::HttpHelper;
use crate::params::{ParameterSource, Params};
use crate::types::{Operation, OutputItem, ResponseShape};
use futures::stream::{self, StreamExt};
use log::{debug, info, warn};

/// Run-level settings, fixed before any item is processed.
#[derive(Debug, Clone, Copy)]
pub struct NodeRun {
    pub operation: Operation,
    /// Turn per-item failures into `{"error": ...}` items instead of aborting.
    pub continue_on_fail: bool,
    /// Items in flight at once; 1 is strictly sequential.
    pub concurrency: usize,
}

impl NodeRun {
    pub fn new(operation: Operation) -> Self {
        Self {
            operation,
            continue_on_fail: false,
            concurrency: 1,
        }
    }

    pub fn continue_on_fail(mut self, flag: bool) -> Self {
        self.continue_on_fail = flag;
        self
    }

    pub fn concurrency(mut self, n: usize) -> Self {
        self.concurrency = n.max(1);
        self
    }
}

async fn execute_item<H: HttpHelper>(
    op: Operation,
    source: &dyn ParameterSource,
    index: usize,
    http: &H,
) -> Result<Vec<OutputItem>> {
    let params = Params::new(source, index, op);
    let req = dispatch::resolve(op, &params)?;
    debug!("item {}: {} {}", params.index(), req.method, req.path);
    let body = http.request(&req).await?;
    Ok(ResponseShape::from_body(body).into_items())
}

/// Execute `run` over `item_count` input items.
///
/// Output order follows input order regardless of concurrency. Without
/// `continue_on_fail` the first failure aborts the run and nothing is
/// returned.
pub async fn execute<H: HttpHelper>(
    run: &NodeRun,
    source: &dyn ParameterSource,
    item_count: usize,
    http: &H,
) -> Result<Vec<OutputItem>> {
    info!(
        "executing {} over {} item(s), concurrency={}",
        run.operation, item_count, run.concurrency
    );
    let op = run.operation;
    let results = stream::iter(0..item_count)
        .map(move |index| async move { (index, execute_item(op, source, index, http).await) })
        .buffered(run.concurrency.max(1));
    let mut results = std::pin::pin!(results);

    let mut out = Vec::with_capacity(item_count);
    while let Some((index, result)) = results.next().await {
        match result {
            Ok(items) => out.extend(items),
            Err(e) if run.continue_on_fail => {
                warn!("item {} failed, continuing: {}", index, e);
                out.push(OutputItem::error(e.to_string()));
            }
            Err(e) => {
                warn!("item {} failed, aborting run: {}", index, e);
                return Err(e);
            }
        }
    }
    Ok(out)
}
