//! Request/response session over one device transport.
//!
//! The session owns the transport, the table of in-flight requests and the
//! UI model. Every outbound message gets its own id and deadline; a reply
//! cancels exactly the request it answers.

use log::{debug, error, info, warn};
use std::time::Duration;
use tokio::time::{Instant, sleep_until};

use crate::correlator::{Correlator, PendingRequest};
use crate::error::{SessionError, SessionResult};
use crate::events::{DeviceEvent, Event, WebSocketEvent};
use crate::model::Model;
use crate::protocol::{self, Dispatch, Inbound, OutboundMessage, RequestId};
use crate::transport::Transport;
use crate::update::update;

/// What the session observed while waiting
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// An inbound frame was decoded and applied
    Reply {
        request: Option<PendingRequest>,
        dispatch: Dispatch,
    },
    /// An inbound frame could not be decoded and was dropped
    Dropped,
    /// These requests passed their deadline without a reply
    TimedOut(Vec<PendingRequest>),
    /// The transport closed; the session is inert from now on
    Closed,
}

enum Wake {
    Inbound(Option<anyhow::Result<String>>),
    Deadline,
}

pub struct Session<T: Transport> {
    transport: T,
    correlator: Correlator,
    model: Model,
}

impl<T: Transport> Session<T> {
    pub fn new(transport: T) -> Self {
        let mut model = Model::default();
        if transport.is_open() {
            update(Event::WebSocket(WebSocketEvent::Connected), &mut model);
        }

        Self {
            transport,
            correlator: Correlator::new(),
            model,
        }
    }

    pub fn model(&self) -> &Model {
        &self.model
    }

    /// Apply a UI event that did not come from the transport
    pub fn apply(&mut self, event: Event) -> bool {
        update(event, &mut self.model)
    }

    pub fn is_pending(&self, id: &RequestId) -> bool {
        self.correlator.is_pending(id)
    }

    pub fn pending_count(&self) -> usize {
        self.correlator.len()
    }

    /// Send `message` and arm a deadline of `timeout` for its reply.
    ///
    /// Fails with [`SessionError::Disconnected`] without touching the
    /// pending table when the transport is not open.
    pub async fn send_message(
        &mut self,
        message: OutboundMessage,
        timeout: Duration,
    ) -> SessionResult<RequestId> {
        let request_type = message.request_type();
        debug!("send_message() called: type={request_type} timeout={timeout:?}");

        if !self.transport.is_open() {
            error!("send_message: transport is not open");
            update(Event::WebSocket(WebSocketEvent::SendRejected), &mut self.model);
            return Err(SessionError::Disconnected);
        }

        let id = RequestId::generate();
        let text = protocol::encode(&id, &message)?;

        if let Err(e) = self.transport.send(text).await {
            error!("send_message: {e:#}");
            if !self.transport.is_open() {
                update(Event::WebSocket(WebSocketEvent::Disconnected), &mut self.model);
                update(Event::WebSocket(WebSocketEvent::SendRejected), &mut self.model);
                return Err(SessionError::Disconnected);
            }
            return Err(SessionError::Transport(e));
        }

        self.correlator
            .register(id.clone(), request_type, timeout, Instant::now());

        if let OutboundMessage::Provision { ssid, .. } = &message {
            update(
                Event::Device(DeviceEvent::ProvisionStarted { ssid: ssid.clone() }),
                &mut self.model,
            );
        }
        update(
            Event::WebSocket(WebSocketEvent::RequestStarted(request_type)),
            &mut self.model,
        );

        debug!("request {id} sent");
        Ok(id)
    }

    /// Decode and apply one inbound frame.
    ///
    /// Malformed frames are logged and dropped without touching the model.
    pub fn handle_inbound(&mut self, text: &str) -> SessionEvent {
        let Inbound { id, dispatch } = match protocol::decode(text) {
            Ok(inbound) => inbound,
            Err(e) => {
                warn!("dropping malformed message: {e}");
                return SessionEvent::Dropped;
            }
        };

        let answers = dispatch.answers();
        let request = match &id {
            Some(id) => match self.correlator.request_type(id) {
                None => {
                    info!("late or unknown reply for request {id}");
                    None
                }
                Some(pending) if answers == Some(pending) => self.correlator.resolve(id),
                Some(pending) => {
                    warn!(
                        "message for {pending} request {id} does not answer it, keeping it pending"
                    );
                    None
                }
            },
            None => answers.and_then(|request_type| self.correlator.resolve_oldest(request_type)),
        };

        if request.is_some() {
            update(
                Event::WebSocket(WebSocketEvent::RequestSettled {
                    pending: self.correlator.has_pending(),
                }),
                &mut self.model,
            );
        }

        match &dispatch {
            Dispatch::ScanResults(networks) => {
                update(
                    Event::Device(DeviceEvent::ScanResultsReceived(networks.clone())),
                    &mut self.model,
                );
            }
            Dispatch::ProvisionAck(ack) => {
                update(
                    Event::Device(DeviceEvent::ProvisionAcknowledged(ack.clone())),
                    &mut self.model,
                );
            }
            Dispatch::ConnectionStatus { connected } => {
                update(
                    Event::Device(DeviceEvent::WifiConnectionChanged {
                        connected: *connected,
                    }),
                    &mut self.model,
                );
            }
            Dispatch::Unrecognized(kind) => {
                warn!("ignoring message of unrecognized type {kind:?}");
            }
        }

        SessionEvent::Reply { request, dispatch }
    }

    /// Expire every request whose deadline passed by `now`
    pub fn expire_overdue(&mut self, now: Instant) -> Vec<PendingRequest> {
        let expired = self.correlator.expire(now);

        for request in &expired {
            update(
                Event::WebSocket(WebSocketEvent::RequestTimedOut {
                    request_type: request.request_type,
                    pending: self.correlator.has_pending(),
                }),
                &mut self.model,
            );
        }

        expired
    }

    /// Wait for the next inbound frame or the earliest pending deadline.
    ///
    /// Once the transport is closed, requests still in flight keep their
    /// deadlines: each call waits for the next one to pass and reports it as
    /// timed out, then `Closed` when nothing is pending anymore.
    pub async fn next_event(&mut self) -> SessionEvent {
        if !self.transport.is_open() {
            return match self.correlator.next_deadline() {
                Some(deadline) => {
                    sleep_until(deadline).await;
                    SessionEvent::TimedOut(self.expire_overdue(Instant::now()))
                }
                None => self.on_closed(),
            };
        }

        let deadline = self.correlator.next_deadline();

        let wake = tokio::select! {
            inbound = self.transport.recv() => Wake::Inbound(inbound),
            _ = wait_for(deadline) => Wake::Deadline,
        };

        match wake {
            Wake::Inbound(Some(Ok(text))) => self.handle_inbound(&text),
            Wake::Inbound(Some(Err(e))) => {
                warn!("receive failed: {e:#}");
                if self.transport.is_open() {
                    SessionEvent::Dropped
                } else {
                    self.on_closed()
                }
            }
            Wake::Inbound(None) => self.on_closed(),
            Wake::Deadline => SessionEvent::TimedOut(self.expire_overdue(Instant::now())),
        }
    }

    /// Wait until `id` is answered or times out.
    ///
    /// Other replies arriving in the meantime are applied to the model.
    pub async fn wait_for_reply(&mut self, id: &RequestId) -> SessionEvent {
        loop {
            let event = self.next_event().await;

            match &event {
                SessionEvent::Reply {
                    request: Some(request),
                    ..
                } if &request.id == id => return event,
                SessionEvent::TimedOut(expired) if expired.iter().any(|r| &r.id == id) => {
                    return event;
                }
                SessionEvent::Closed => return event,
                _ => continue,
            }
        }
    }

    pub async fn close(&mut self) -> anyhow::Result<()> {
        debug!("close() called");
        self.transport.close().await?;
        update(Event::WebSocket(WebSocketEvent::Disconnected), &mut self.model);
        Ok(())
    }

    fn on_closed(&mut self) -> SessionEvent {
        if self.model.transport_open {
            info!("transport closed");
        }
        update(Event::WebSocket(WebSocketEvent::Disconnected), &mut self.model);
        SessionEvent::Closed
    }
}

async fn wait_for(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}
