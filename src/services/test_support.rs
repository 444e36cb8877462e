//! Stub question generator shared by the service tests.

use std::{
    sync::{Mutex, PoisonError},
    time::Duration,
};

use futures::future::BoxFuture;
use tokio::sync::oneshot;

use crate::{
    generator::{GenerationRequest, GeneratorError, GeneratorResult, QuestionGenerator},
    state::question::{Choice, QuestionRecord, sample_record},
};

enum Behaviour {
    Answer,
    Fail,
    Delay(Duration),
    Gate(Mutex<Option<oneshot::Receiver<()>>>),
}

pub(crate) struct StubGenerator {
    choices: Vec<Choice>,
    behaviour: Behaviour,
    last_keyword: Mutex<Option<String>>,
}

impl StubGenerator {
    fn with(choices: Vec<Choice>, behaviour: Behaviour) -> Self {
        Self {
            choices,
            behaviour,
            last_keyword: Mutex::new(None),
        }
    }

    /// Returns one record per choice, each expecting that choice.
    pub(crate) fn answering(choices: Vec<Choice>) -> Self {
        Self::with(choices, Behaviour::Answer)
    }

    pub(crate) fn failing() -> Self {
        Self::with(Vec::new(), Behaviour::Fail)
    }

    pub(crate) fn delayed(choices: Vec<Choice>, delay: Duration) -> Self {
        Self::with(choices, Behaviour::Delay(delay))
    }

    /// Holds the response until the returned sender fires.
    pub(crate) fn gated(choices: Vec<Choice>) -> (Self, oneshot::Sender<()>) {
        let (tx, rx) = oneshot::channel();
        (
            Self::with(choices, Behaviour::Gate(Mutex::new(Some(rx)))),
            tx,
        )
    }

    pub(crate) fn last_keyword(&self) -> Option<String> {
        self.last_keyword
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl QuestionGenerator for StubGenerator {
    fn generate(
        &self,
        request: GenerationRequest,
    ) -> BoxFuture<'static, GeneratorResult<Vec<QuestionRecord>>> {
        *self
            .last_keyword
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(request.keyword.as_string());

        let records: Vec<QuestionRecord> = self.choices.iter().copied().map(sample_record).collect();
        match &self.behaviour {
            Behaviour::Answer => Box::pin(async move { Ok(records) }),
            Behaviour::Fail => Box::pin(async {
                Err(GeneratorError::unavailable(
                    "stub failure".into(),
                    std::io::Error::other("stub failure"),
                ))
            }),
            Behaviour::Delay(delay) => {
                let delay = *delay;
                Box::pin(async move {
                    tokio::time::sleep(delay).await;
                    Ok(records)
                })
            }
            Behaviour::Gate(gate) => {
                let gate = gate.lock().unwrap_or_else(PoisonError::into_inner).take();
                Box::pin(async move {
                    if let Some(gate) = gate {
                        let _ = gate.await;
                    }
                    Ok(records)
                })
            }
        }
    }
}
