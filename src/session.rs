//! Estado de la sesión de auditoría
//!
//! Transiciones permitidas:
//! - `Idle -> Loading` al enviar parámetros válidos
//! - `Loading -> Ready` cuando la invocación termina bien (los resultados se reemplazan)
//! - `Loading -> Error` cuando falla (los resultados anteriores se descartan)
//! - `Ready | Error -> Loading` en el siguiente envío válido (el error se limpia antes)
//! - `Loading -> Idle` si se cancela
//!
//! Nunca hay dos invocaciones en vuelo para la misma sesión.

use tokio::sync::watch;
use tracing::{error, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::error::{AuditError, InvocationError};
use crate::models::{GeneratorParams, TestCase};
use crate::utils::gemini::ScenarioGenerator;
use crate::utils::prompt::{build_request, AuditRequest};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditStatus {
    Idle,
    Loading,
    Ready,
    Error,
}

/// Extremo que dispara la cancelación
#[derive(Debug)]
pub struct CancelHandle(watch::Sender<bool>);

/// Extremo que observa la invocación en curso
#[derive(Debug, Clone)]
pub struct CancelToken(watch::Receiver<bool>);

pub fn cancel_pair() -> (CancelHandle, CancelToken) {
    let (tx, rx) = watch::channel(false);
    (CancelHandle(tx), CancelToken(rx))
}

impl CancelHandle {
    pub fn cancel(&self) {
        // Sin receptores no hay nada que cancelar
        let _ = self.0.send(true);
    }
}

impl CancelToken {
    pub fn is_cancelled(&self) -> bool {
        *self.0.borrow()
    }

    /// Se completa cuando se cancela. Si el handle desaparece sin cancelar, no se completa nunca.
    pub async fn cancelled(&mut self) {
        loop {
            if *self.0.borrow_and_update() {
                return;
            }
            if self.0.changed().await.is_err() {
                std::future::pending::<()>().await;
            }
        }
    }
}

/// Contenedor explícito del estado de la vista
pub struct AuditSession<G> {
    generator: G,
    status: AuditStatus,
    params: Option<GeneratorParams>,
    scenarios: Vec<TestCase>,
    last_error: Option<&'static str>,
    audit_id: Option<Uuid>,
}

impl<G: ScenarioGenerator> AuditSession<G> {
    pub fn new(generator: G) -> Self {
        Self {
            generator,
            status: AuditStatus::Idle,
            params: None,
            scenarios: Vec::new(),
            last_error: None,
            audit_id: None,
        }
    }

    pub fn status(&self) -> AuditStatus {
        self.status
    }

    pub fn params(&self) -> Option<&GeneratorParams> {
        self.params.as_ref()
    }

    pub fn audit_id(&self) -> Option<Uuid> {
        self.audit_id
    }

    /// Mensaje de error visible para el usuario, si lo hay
    pub fn last_error(&self) -> Option<&'static str> {
        self.last_error
    }

    /// Escenarios visibles. Con un error activo no se muestra ningún resultado.
    pub fn scenarios(&self) -> &[TestCase] {
        match self.status {
            AuditStatus::Error => &[],
            _ => &self.scenarios,
        }
    }

    /// La exportación solo se ofrece con al menos un escenario
    pub fn can_export(&self) -> bool {
        self.status == AuditStatus::Ready && !self.scenarios.is_empty()
    }

    /// Valida y pasa a `Loading`. Devuelve la petición que hay que enviar.
    pub fn submit(&mut self, params: GeneratorParams) -> Result<AuditRequest, AuditError> {
        if self.status == AuditStatus::Loading {
            return Err(AuditError::Busy);
        }

        // El error anterior se reemplaza, nunca se acumula
        self.last_error = None;

        if let Err(e) = params.validate() {
            let err = AuditError::from(e);
            warn!("envío rechazado: {}", err);
            self.fail(&err);
            return Err(err);
        }

        let request = build_request(&params);
        self.params = Some(params);
        self.audit_id = Some(Uuid::new_v4());
        self.status = AuditStatus::Loading;

        Ok(request)
    }

    /// Cierra la invocación en curso con su resultado
    pub fn complete(&mut self, outcome: Result<Vec<TestCase>, InvocationError>) -> Result<&[TestCase], AuditError> {
        // Un resultado que llega tras cancelar se descarta
        if self.status != AuditStatus::Loading {
            warn!("resultado descartado: no hay auditoría en curso");
            return Err(AuditError::Cancelled);
        }

        match outcome {
            Ok(scenarios) => {
                info!(count = scenarios.len(), "auditoría completada");
                self.scenarios = scenarios;
                self.status = AuditStatus::Ready;
                Ok(&self.scenarios)
            }
            Err(e) => {
                error!("fallo de invocación: {}", e);
                let err = AuditError::from(e);
                self.fail(&err);
                Err(err)
            }
        }
    }

    /// Vuelve a `Idle` sin tocar los resultados del último éxito
    pub fn cancel(&mut self) {
        if self.status == AuditStatus::Loading {
            info!("auditoría cancelada");
            self.status = AuditStatus::Idle;
        }
    }

    /// Descarta resultados, error y parámetros
    pub fn reset(&mut self) {
        self.status = AuditStatus::Idle;
        self.params = None;
        self.scenarios.clear();
        self.last_error = None;
        self.audit_id = None;
    }

    /// Envío completo: validación, invocación única y transición final
    pub async fn run(
        &mut self,
        params: GeneratorParams,
        cancel: Option<CancelToken>,
    ) -> Result<&[TestCase], AuditError> {
        let request = self.submit(params)?;
        let span = info_span!("audit", id = %self.audit_id.unwrap_or_default());

        let outcome = {
            let call = self.generator.generate(&request).instrument(span.clone());
            match cancel {
                Some(mut token) => {
                    tokio::select! {
                        result = call => Some(result),
                        _ = token.cancelled() => None,
                    }
                }
                None => Some(call.await),
            }
        };

        // Los eventos de cierre también llevan el id de la auditoría
        let _entered = span.enter();
        match outcome {
            Some(result) => self.complete(result),
            None => {
                self.cancel();
                Err(AuditError::Cancelled)
            }
        }
    }

    fn fail(&mut self, err: &AuditError) {
        self.scenarios.clear();
        self.status = AuditStatus::Error;
        self.last_error = Some(err.user_message());
    }
}
