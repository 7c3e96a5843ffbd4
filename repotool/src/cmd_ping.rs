use repocommon::prelude::*;

use std::io::Write;

use clap::Args;
use derive_more::derive::Deref;

use crate::cli::{CommonOptions, TopLevelOptions};
use crate::config::{self, Config};
use crate::error::Error;

/// CLI Options for the ping command
#[derive(Debug, Clone, PartialEq, Args, Deref)]
pub struct Options {
    /// URL to send the GET request to
    pub url: String,

    /// Common options
    #[deref]
    #[clap(flatten)]
    pub options: CommonOptions,
}

/// Status of a GET request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Response {
    /// HTTP status code
    pub status: u16,
    /// If the status is not a client or server error
    pub ok: bool,
}

impl Response {
    pub fn from_status(status: u16) -> Self {
        Self {
            status,
            ok: !(400..600).contains(&status),
        }
    }
}

/// Something that can GET a URL
pub trait HttpGet {
    fn get(&self, url: &str) -> Result<Response, Error>;
}

/// Blocking HTTP client
pub struct Client {
    inner: reqwest::blocking::Client,
}

impl Client {
    pub fn new(config: &config::Ping) -> Result<Self, Error> {
        let inner = reqwest::blocking::Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent())
            .build()
            .change_context(Error::HttpClient)?;
        Ok(Self { inner })
    }
}

impl HttpGet for Client {
    fn get(&self, url: &str) -> Result<Response, Error> {
        verboseln!("GET {}", url);
        let response = self
            .inner
            .get(url)
            .send()
            .change_context_lazy(|| Error::Request(url.to_string()))?;
        let status = response.status();
        verboseln!("{} responded with {}", url, status);

        Ok(Response::from_status(status.as_u16()))
    }
}

pub fn run(top: &TopLevelOptions, options: &Options) -> Result<(), Error> {
    let config = Config::load(&top.dir)?;
    let client = Client::new(&config.ping)?;
    let mut stdout = std::io::stdout().lock();
    ping(&client, &options.url, &mut stdout)
}

/// Request `url` and print if it's up or down
///
/// Request failures are returned as errors, not reported as down
pub fn ping(client: &impl HttpGet, url: &str, out: &mut impl Write) -> Result<(), Error> {
    let response = client.get(url)?;
    let state = if response.ok { "up" } else { "down" };
    writeln!(out, "{} is {}", url, state).change_context(Error::PingOutput)?;
    out.flush().change_context(Error::PingOutput)?;

    Ok(())
}
