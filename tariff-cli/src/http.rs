use std::time::Duration;

use log::debug;
use reqwest::blocking::Client;

use tariff_core::{Fetch, FetchError};

use crate::config::USER_AGENT;

/// Блокирующий HTTP-клиент для `tariff-core`
pub(crate) struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub(crate) fn new(timeout: Duration) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self { client })
    }
}

impl Fetch for HttpFetcher {
    fn get(&self, url: &str) -> Result<String, FetchError> {
        let resp = self
            .client
            .get(url)
            .send()
            .map_err(|e| FetchError::new(url, e.to_string()))?;

        // Ошибку сервис отдаёт полем `error` в теле, статус не смотрим
        debug!("http status {} for {url}", resp.status());

        resp.text().map_err(|e| FetchError::new(url, e.to_string()))
    }
}
