//! formfetch — issue one request and print the normalized result.
//!
//! Usage:
//!   formfetch <METHOD> <URL> [--json <body>] [--data <text>] [--header K:V]... [--token T] [--wrapped] [--log]

use anyhow::{anyhow, bail, Context};
use formfetch::client::{FlatMerge, ResponseContract, Wrapped};
use formfetch::{HttpMethod, RequestBody, RequestClient};

struct Invocation {
    method: HttpMethod,
    url: url::Url,
    body: Option<RequestBody>,
    headers: Vec<(String, String)>,
    token: Option<String>,
    wrapped: bool,
    log: bool,
}

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.is_empty() || matches!(args[0].as_str(), "help" | "--help" | "-h") {
        print_usage();
        std::process::exit(if args.is_empty() { 1 } else { 0 });
    }
    if matches!(args[0].as_str(), "version" | "--version" | "-V") {
        println!("formfetch {}", env!("CARGO_PKG_VERSION"));
        return;
    }

    if let Err(e) = run(&args) {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn print_usage() {
    println!(
        r#"formfetch — send one HTTP request and print the normalized response

USAGE:
    formfetch <METHOD> <URL> [OPTIONS]

OPTIONS:
    --json <body>       JSON body (serialized when Content-Type is application/json)
    --data <text>       Raw text body, sent as-is
    --header <K:V>      Extra header; repeatable, later wins
    --token <T>         Bearer token
    --wrapped           Use the wrapped contract (never fails)
    --log               Log the request

ENVIRONMENT:
    FORMFETCH_TOKEN     Bearer token when --token is absent
    FORMFETCH_LOG       Log every request when set to 1 or true
    FORMFETCH_PROXY_URL Proxy for all requests
    RUST_LOG            Log filter (default formfetch=info)"#
    );
}

fn parse_args(args: &[String]) -> anyhow::Result<Invocation> {
    let method: HttpMethod = args[0].parse().map_err(|e: String| anyhow!(e))?;
    let raw_url = args.get(1).context("missing <URL>")?;
    let url = url::Url::parse(raw_url).with_context(|| format!("invalid URL: {raw_url}"))?;

    let mut inv = Invocation {
        method,
        url,
        body: None,
        headers: Vec::new(),
        token: None,
        wrapped: false,
        log: false,
    };

    let mut rest = args[2..].iter();
    while let Some(arg) = rest.next() {
        match arg.as_str() {
            "--json" => {
                let raw = rest.next().context("--json needs a value")?;
                let value: serde_json::Value =
                    serde_json::from_str(raw).context("--json is not valid JSON")?;
                inv.body = Some(RequestBody::Json(value));
            }
            "--data" => {
                let raw = rest.next().context("--data needs a value")?;
                inv.body = Some(RequestBody::Text(raw.clone()));
            }
            "--header" => {
                let raw = rest.next().context("--header needs a value")?;
                let (k, v) = raw
                    .split_once(':')
                    .with_context(|| format!("header must be K:V, got {raw}"))?;
                inv.headers.push((k.trim().to_string(), v.trim().to_string()));
            }
            "--token" => {
                inv.token = Some(rest.next().context("--token needs a value")?.clone());
            }
            "--wrapped" => inv.wrapped = true,
            "--log" => inv.log = true,
            other => bail!("unknown option: {other}"),
        }
    }
    Ok(inv)
}

/// Client rooted at the full target URL; the request then uses an empty endpoint.
fn build_client<M: ResponseContract>(inv: &Invocation) -> formfetch::Result<RequestClient<M>> {
    let mut builder = RequestClient::<M>::builder(inv.url.as_str());
    if let Some(token) = &inv.token {
        builder = builder.token(token.clone());
    }
    if inv.log {
        builder = builder.logging(true);
    }
    builder.build()
}

fn run(args: &[String]) -> anyhow::Result<()> {
    let inv = parse_args(args)?;
    formfetch::logging::init();

    let runtime = tokio::runtime::Runtime::new().context("failed to start tokio runtime")?;

    let output = runtime.block_on(async move {
        if inv.wrapped {
            let client = build_client::<Wrapped>(&inv)?;
            let r = client.request("", inv.method, inv.body, inv.headers).await;
            serde_json::to_value(r).map_err(anyhow::Error::from)
        } else {
            let client = build_client::<FlatMerge>(&inv)?;
            client
                .request("", inv.method, inv.body, inv.headers)
                .await
                .map(|r| r.into_value())
                .map_err(anyhow::Error::from)
        }
    })?;

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
