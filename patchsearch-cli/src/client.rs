//! Query client construction for CLI commands.

use patchsearch_client::HttpQueryClient;
use patchsearch_core::QueryClient;

use crate::CliError;

/// Builds the query client used by one command invocation.
pub(crate) trait QueryClientBuilder {
    fn build(&self, base_url: &str) -> Result<Box<dyn QueryClient>, CliError>;
}

/// Connects to the backend over HTTP.
pub(crate) struct HttpClientBuilder;

impl QueryClientBuilder for HttpClientBuilder {
    fn build(&self, base_url: &str) -> Result<Box<dyn QueryClient>, CliError> {
        let client = HttpQueryClient::new(base_url).map_err(|source| CliError::BuildClient {
            base_url: base_url.to_owned(),
            source,
        })?;
        Ok(Box::new(client))
    }
}
