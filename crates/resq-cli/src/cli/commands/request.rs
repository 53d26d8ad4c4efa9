//! `resq get|post|put|delete` – issue one request and print the result.

use anyhow::{bail, Result};
use resq_core::config::ResqConfig;
use resq_core::retry::set_default_retry_delay;
use resq_core::{Http, Method, RequestDescriptor};
use std::time::Duration;

use crate::cli::RequestArgs;

pub async fn run_request(
    cfg: &ResqConfig,
    method: Method,
    url: &str,
    data: Option<String>,
    args: &RequestArgs,
) -> Result<()> {
    if let Some(ms) = args.delay_ms {
        set_default_retry_delay(Duration::from_millis(ms));
    }

    let options = args.to_options(cfg.retry.max_retries);
    let mut request = RequestDescriptor::new(method, url).with_options(options);
    if let Some(body) = data {
        request = request.with_body(body);
    }

    let http = Http::from_config(cfg);
    match http.fetch(request).await {
        Ok(response) => {
            tracing::debug!(status = response.status, "{} {} finished", method, url);
            println!("{}", response.payload.to_text());
            Ok(())
        }
        Err(e) => bail!("{} {}: {}", method, url, e),
    }
}
