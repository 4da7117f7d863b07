//! Sessions that show results in submission order.
//!
//! A new submission cancels whichever request is still in flight, and any
//! completion older than the newest accepted one is dropped. The display
//! therefore follows the last request sent, not the last response received.

use std::fmt;

use log::{debug, warn};
use patchsearch_core::{
    LabelCatalog, LatestResponse, QueryError, QueryRequest, QueryResult, RequestSequencer,
    RequestTicket,
};
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

use crate::AsyncQueryClient;

/// What became of one submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionOutcome {
    /// The request finished and is the newest to do so; show `result`.
    Completed {
        /// Ticket of the request.
        ticket: RequestTicket,
        /// Backend answer or failure.
        result: Result<QueryResult, QueryError>,
    },
    /// A newer submission replaced this one; show nothing.
    Superseded {
        /// Ticket of the replaced request.
        ticket: RequestTicket,
    },
}

impl SessionOutcome {
    /// Ticket of the submission.
    #[must_use]
    pub const fn ticket(&self) -> RequestTicket {
        match self {
            Self::Completed { ticket, .. } | Self::Superseded { ticket } => *ticket,
        }
    }

    /// The result to display, if any.
    #[must_use]
    pub fn into_result(self) -> Option<Result<QueryResult, QueryError>> {
        match self {
            Self::Completed { result, .. } => Some(result),
            Self::Superseded { .. } => None,
        }
    }
}

/// Submits queries through `C`, keeping only the newest answer.
///
/// # Examples
///
/// ```no_run
/// use patchsearch_client::{HttpQueryClient, QuerySession, SessionOutcome};
/// use patchsearch_core::{
///     BoundingBoxFields, LabelCatalog, QueryPayloadBuilder, QueryType, SpatialOperator,
/// };
///
/// # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
/// let session = QuerySession::new(HttpQueryClient::new("http://localhost:8080")?);
/// let catalog = session.fetch_labels().await?;
/// let builder =
///     QueryPayloadBuilder::new(&catalog, QueryType::default(), SpatialOperator::default());
/// let request = builder
///     .analogue_from_fields::<&str>(&BoundingBoxFields::blank(), &[])
///     .into_request()?;
/// if let SessionOutcome::Completed { result, .. } = session.submit(&request).await {
///     let names = result?;
///     assert!(names.reported_count() >= names.names().count());
/// }
/// # Ok(())
/// # }
/// ```
pub struct QuerySession<C> {
    client: C,
    sequencer: RequestSequencer,
    latest: LatestResponse,
    in_flight: Mutex<CancellationToken>,
}

impl<C: fmt::Debug> fmt::Debug for QuerySession<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuerySession")
            .field("client", &self.client)
            .field("latest_issued", &self.sequencer.latest())
            .field("latest_applied", &self.latest.applied())
            .finish_non_exhaustive()
    }
}

impl<C: AsyncQueryClient> QuerySession<C> {
    /// Start a session with no requests in flight.
    #[must_use]
    pub fn new(client: C) -> Self {
        Self {
            client,
            sequencer: RequestSequencer::new(),
            latest: LatestResponse::new(),
            in_flight: Mutex::new(CancellationToken::new()),
        }
    }

    /// The wrapped client.
    #[must_use]
    pub const fn client(&self) -> &C {
        &self.client
    }

    /// Submit `request`, cancelling the one before it.
    pub async fn submit(&self, request: &QueryRequest) -> SessionOutcome {
        let (ticket, token) = self.begin().await;
        debug!("submitting {} query {ticket}", request.kind());

        let finished = tokio::select! {
            biased;
            () = token.cancelled() => None,
            result = self.client.submit(request) => Some(result),
        };
        self.settle(ticket, finished)
    }

    /// Turn the end of request `ticket` into an outcome.
    ///
    /// A completion loses to any newer ticket already accepted, which can
    /// happen when it finishes on another worker while a newer request is
    /// being settled.
    fn settle(
        &self,
        ticket: RequestTicket,
        finished: Option<Result<QueryResult, QueryError>>,
    ) -> SessionOutcome {
        match finished {
            None => {
                debug!("query {ticket} cancelled by a newer submission");
                SessionOutcome::Superseded { ticket }
            }
            Some(result) if self.latest.accept(ticket) => {
                SessionOutcome::Completed { ticket, result }
            }
            Some(_) => {
                warn!("dropping stale response for query {ticket}");
                SessionOutcome::Superseded { ticket }
            }
        }
    }

    /// Fetch the label catalogue. Not sequenced.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError`] from the client.
    pub async fn fetch_labels(&self) -> Result<LabelCatalog, QueryError> {
        self.client.fetch_labels().await
    }

    /// Issue a ticket and swap in a fresh token, cancelling the previous one.
    ///
    /// Both happen under the lock so tickets and tokens are issued in the
    /// same order.
    async fn begin(&self) -> (RequestTicket, CancellationToken) {
        let mut current = self.in_flight.lock().await;
        current.cancel();
        let ticket = self.sequencer.issue();
        let token = CancellationToken::new();
        *current = token.clone();
        (ticket, token)
    }
}
