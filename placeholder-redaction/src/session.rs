//! One detect, redact, generate, restore cycle.
//!
//! A [`RedactionSession`] binds one input text to exactly one
//! [`RedactionMap`]. The session is the privacy boundary: it is not `Clone`,
//! the map cannot be merged or shared, and dropping the session drops the map.
//! Sessions are independent, so any number can run concurrently as long as
//! each is owned by one caller at a time.
//!
//! The collaborators on either side of the engine are single-method traits:
//!
//! - [`Detector`] finds entity spans in text;
//! - [`Generator`] sends redacted text to an external service.
//!
//! Both are implemented for plain closures.

use std::fmt;

use crate::{
    audit::AuditSink,
    config::RedactionConfig,
    error::{PipelineError, RedactionError},
    map::RedactionMap,
    redact::{Redaction, RedactionEngine},
    restore::{Restoration, RestorationEngine},
    span::EntitySpan,
};

/// Finds sensitive entities in text.
///
/// Output may be unsorted, overlapping, or noisy; the engine copes.
pub trait Detector {
    /// Returns every entity span found in `text`.
    fn detect(&self, text: &str) -> Vec<EntitySpan>;
}

impl<F> Detector for F
where
    F: Fn(&str) -> Vec<EntitySpan>,
{
    fn detect(&self, text: &str) -> Vec<EntitySpan> {
        self(text)
    }
}

/// Sends text to an untrusted generation service.
///
/// Only ever receives redacted text.
pub trait Generator {
    /// The service's failure type.
    type Error;

    /// Returns the service's response to `prompt`.
    fn generate(&self, prompt: &str) -> Result<String, Self::Error>;
}

impl<F, E> Generator for F
where
    F: Fn(&str) -> Result<String, E>,
{
    type Error = E;

    fn generate(&self, prompt: &str) -> Result<String, E> {
        self(prompt)
    }
}

/// The unit of work for one input text.
pub struct RedactionSession {
    original: String,
    engine: RedactionEngine,
    redaction: Option<Redaction>,
    audit: Option<Box<dyn AuditSink>>,
}

impl RedactionSession {
    /// Starts a session over `text` with the default configuration.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            original: text.into(),
            engine: RedactionEngine::default(),
            redaction: None,
            audit: None,
        }
    }

    /// Replaces the redaction configuration.
    #[must_use]
    pub fn with_config(mut self, config: RedactionConfig) -> Self {
        self.engine = RedactionEngine::new(config);
        self
    }

    /// Sends an audit event to `sink` after every pass.
    #[must_use]
    pub fn with_audit_sink(mut self, sink: impl AuditSink + 'static) -> Self {
        self.audit = Some(Box::new(sink));
        self
    }

    /// The input text.
    pub fn original(&self) -> &str {
        &self.original
    }

    /// The redaction, once [`RedactionSession::redact`] has succeeded.
    pub fn redaction(&self) -> Option<&Redaction> {
        self.redaction.as_ref()
    }

    /// The redacted text, once available.
    pub fn redacted_text(&self) -> Option<&str> {
        self.redaction.as_ref().map(Redaction::text)
    }

    /// The session's map, once available.
    pub fn map(&self) -> Option<&RedactionMap> {
        self.redaction.as_ref().map(Redaction::map)
    }

    /// Runs `detector` over the input and redacts it.
    pub fn redact<D>(&mut self, detector: &D) -> Result<&Redaction, RedactionError>
    where
        D: Detector + ?Sized,
    {
        if self.redaction.is_some() {
            return Err(RedactionError::AlreadyRedacted);
        }
        let spans = detector.detect(&self.original);
        self.redact_spans(&spans)
    }

    /// Redacts the input with spans the caller already has.
    ///
    /// A session redacts once. A second call fails with
    /// [`RedactionError::AlreadyRedacted`] and leaves the first map intact.
    pub fn redact_spans(&mut self, spans: &[EntitySpan]) -> Result<&Redaction, RedactionError> {
        if self.redaction.is_some() {
            return Err(RedactionError::AlreadyRedacted);
        }
        let redaction = self.engine.redact(&self.original, spans)?;
        if let Some(sink) = &self.audit {
            sink.record(&redaction.audit_event());
        }
        Ok(self.redaction.insert(redaction))
    }

    /// Restores `output` against this session's map.
    ///
    /// Before redaction the map is empty, so every token is reported and
    /// nothing is substituted.
    pub fn restore(&self, output: &str) -> Restoration {
        let restoration = match self.map() {
            Some(map) => RestorationEngine.restore(output, map),
            None => RestorationEngine.restore(output, &RedactionMap::default()),
        };
        if let Some(sink) = &self.audit {
            sink.record(&restoration.audit_event());
        }
        restoration
    }

    /// Runs the whole cycle: detect and redact (unless already redacted),
    /// send the redacted text to `generator`, and restore its response.
    ///
    /// Redaction failures are returned before `generator` is called.
    pub fn round_trip<D, G>(
        &mut self,
        detector: &D,
        generator: &G,
    ) -> Result<Restoration, PipelineError<G::Error>>
    where
        D: Detector + ?Sized,
        G: Generator + ?Sized,
    {
        if self.redaction.is_none() {
            self.redact(detector)?;
        }
        let prompt = self.redacted_text().unwrap_or_default();
        let response = generator
            .generate(prompt)
            .map_err(PipelineError::Generation)?;
        Ok(self.restore(&response))
    }

    /// Ends the session, handing back the input and the map for
    /// host-managed retention.
    pub fn into_parts(self) -> (String, Option<RedactionMap>) {
        let map = self.redaction.map(|redaction| redaction.into_parts().1);
        (self.original, map)
    }
}

impl fmt::Debug for RedactionSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedactionSession")
            .field("redaction", &self.redaction)
            .field("audit", &self.audit.is_some())
            .finish_non_exhaustive()
    }
}
