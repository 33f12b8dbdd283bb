use crate::config::Config;
use crate::credentials;
use crate::error::Result;
use crate::http::{ForgejoClient, HttpHelper};
use crate::node::{self, NodeRun};
use crate::params::JsonParameters;
use crate::schema;
use crate::types::{Operation, OutputItem};
use anyhow::Context;
use log::{debug, info};
use serde::Deserialize;
use std::io::{self, Read, Write};

/// One node execution as read from stdin.
#[derive(Debug, Deserialize)]
pub struct RunRequest {
    pub resource: String,
    pub operation: String,
    #[serde(default)]
    pub continue_on_fail: bool,
    #[serde(default)]
    pub concurrency: Option<usize>,
    #[serde(flatten)]
    pub params: JsonParameters,
}

/// Flags from the command line; they take precedence over the request.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub continue_on_fail: bool,
    pub concurrency: Option<usize>,
}

impl RunRequest {
    pub fn node_run(&self, opts: &RunOptions) -> Result<NodeRun> {
        let op = Operation::parse(&self.resource, &self.operation)?;
        Ok(NodeRun::new(op)
            .continue_on_fail(self.continue_on_fail || opts.continue_on_fail)
            .concurrency(opts.concurrency.or(self.concurrency).unwrap_or(1)))
    }
}

pub async fn run_request<H: HttpHelper>(
    req: &RunRequest,
    opts: &RunOptions,
    http: &H,
) -> Result<Vec<OutputItem>> {
    let run = req.node_run(opts)?;
    node::execute(&run, &req.params, req.params.item_count(), http).await
}

pub async fn run_stdio(opts: RunOptions) -> anyhow::Result<()> {
    let mut input = String::new();
    io::stdin().read_to_string(&mut input)?;
    if input.trim().is_empty() {
        return Ok(());
    }
    let req: RunRequest = serde_json::from_str(&input).context("Parse error in run request")?;
    debug!("Received {}.{}", req.resource, req.operation);

    let cfg = Config::from_env()?;
    let client = ForgejoClient::new(&cfg)?;
    let items = run_request(&req, &opts, &client).await?;
    info!("{} output item(s)", items.len());
    write_json(&serde_json::to_value(items)?)
}

pub fn print_schema() -> anyhow::Result<()> {
    write_json(&serde_json::json!({
        "node": schema::node_description(),
        "credential": credentials::describe(),
    }))
}

pub async fn check_credentials() -> anyhow::Result<()> {
    let cfg = Config::from_env()?;
    let client = ForgejoClient::new(&cfg)?;
    let user = client.check_credentials().await?;
    info!(
        "Credentials valid for {} as {}",
        cfg.server_url,
        user.get("login").and_then(|v| v.as_str()).unwrap_or("<unknown>")
    );
    write_json(&user)
}

fn write_json(value: &serde_json::Value) -> anyhow::Result<()> {
    let mut out = io::stdout();
    let payload = serde_json::to_string(value)?;
    writeln!(out, "{}", payload)?;
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_flattens_parameters_and_items() {
        let req: RunRequest = serde_json::from_value(json!({
            "resource": "issue",
            "operation": "close",
            "parameters": {"owner": "o", "repository": "r"},
            "items": [{"issueNumber": 1}, {"issueNumber": 2}]
        }))
        .unwrap();
        assert_eq!(req.params.item_count(), 2);
        let run = req.node_run(&RunOptions::default()).unwrap();
        assert!(!run.continue_on_fail);
        assert_eq!(run.concurrency, 1);
    }

    #[test]
    fn cli_flags_override_request() {
        let req: RunRequest = serde_json::from_value(json!({
            "resource": "user",
            "operation": "list",
            "concurrency": 2
        }))
        .unwrap();
        let opts = RunOptions {
            continue_on_fail: true,
            concurrency: Some(4),
        };
        let run = req.node_run(&opts).unwrap();
        assert!(run.continue_on_fail);
        assert_eq!(run.concurrency, 4);
    }

    #[test]
    fn unknown_pair_is_rejected_up_front() {
        let req: RunRequest =
            serde_json::from_value(json!({"resource": "tag", "operation": "merge"})).unwrap();
        let err = req.node_run(&RunOptions::default()).unwrap_err();
        assert!(err.to_string().starts_with("Unsupported operation"));
    }
}
